//! SQL assembly for descriptor-driven statements.
//!
//! Identifiers come only from static descriptors and are always quoted;
//! every value, including `LIMIT` and `OFFSET`, is a positional `$n`
//! parameter. Row-returning statements project `to_jsonb(t) AS record` so one
//! row type serves every relation.

use pagination::PageRequest;

use crate::domain::entity::{EntityDescriptor, FieldSpec, FieldType, SortDirection};
use crate::domain::ports::ListQuery;
use crate::domain::{FieldBinding, FieldValue};

/// A value bound to one positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// SQL type the parameter is bound as; also types a NULL.
    pub ty: FieldType,
    /// Bound value.
    pub value: FieldValue,
}

impl BoundParam {
    fn field(field: &FieldSpec, value: FieldValue) -> Self {
        Self { ty: field.ty, value }
    }

    const fn count(value: i64) -> Self {
        Self {
            ty: FieldType::Integer,
            value: FieldValue::Integer(value),
        }
    }
}

/// SQL text and its parameters in `$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Statement text.
    pub sql: String,
    /// Parameters; element `i` binds `$i+1`.
    pub params: Vec<BoundParam>,
}

impl Statement {
    fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter and return its placeholder.
    fn push(&mut self, param: BoundParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

fn select_records(descriptor: &EntityDescriptor) -> Statement {
    Statement::new(format!(
        r#"SELECT to_jsonb(t) AS record FROM "{}" t"#,
        descriptor.table
    ))
}

/// `INSERT` of `bindings` in the order given.
#[must_use]
pub fn insert(descriptor: &EntityDescriptor, bindings: &[FieldBinding]) -> Statement {
    if bindings.is_empty() {
        return Statement::new(format!(r#"INSERT INTO "{}" DEFAULT VALUES"#, descriptor.table));
    }
    let mut statement = Statement::new(String::new());
    let columns: Vec<String> = bindings
        .iter()
        .map(|binding| format!(r#""{}""#, binding.field.column))
        .collect();
    let placeholders: Vec<String> = bindings
        .iter()
        .map(|binding| statement.push(BoundParam::field(binding.field, binding.value.clone())))
        .collect();
    statement.sql = format!(
        r#"INSERT INTO "{}" ({}) VALUES ({})"#,
        descriptor.table,
        columns.join(", "),
        placeholders.join(", ")
    );
    statement
}

/// Read-back of the row just inserted on the same connection.
///
/// Relations with a generated identity are read through the sequence's
/// session-local `currval`; others by the supplied key in `bindings`.
#[must_use]
pub fn read_back(descriptor: &EntityDescriptor, bindings: &[FieldBinding]) -> Statement {
    let mut statement = select_records(descriptor);
    if let Some(generated) = descriptor.generated.as_ref() {
        statement.sql.push_str(&format!(
            r#" WHERE t."{column}" = currval(pg_get_serial_sequence('{table}', '{column}'))"#,
            column = generated.column,
            table = descriptor.table,
        ));
        return statement;
    }
    let key = bindings
        .iter()
        .find(|binding| binding.field.column == descriptor.key.column)
        .map_or(FieldValue::Null, |binding| binding.value.clone());
    let placeholder = statement.push(BoundParam::field(&descriptor.key, key));
    statement.sql.push_str(&format!(
        r#" WHERE t."{}" = {placeholder}"#,
        descriptor.key.column
    ));
    statement
}

/// Row whose lookup key equals `key`.
#[must_use]
pub fn find(descriptor: &EntityDescriptor, key: &FieldValue) -> Statement {
    let mut statement = select_records(descriptor);
    let placeholder = statement.push(BoundParam::field(&descriptor.key, key.clone()));
    statement.sql.push_str(&format!(
        r#" WHERE t."{}" = {placeholder}"#,
        descriptor.key.column
    ));
    statement
}

/// Existence probe by lookup key, projecting a boolean `found`.
#[must_use]
pub fn exists(descriptor: &EntityDescriptor, key: &FieldValue) -> Statement {
    let mut statement = Statement::new(String::new());
    let placeholder = statement.push(BoundParam::field(&descriptor.key, key.clone()));
    statement.sql = format!(
        r#"SELECT EXISTS (SELECT 1 FROM "{}" WHERE "{}" = {placeholder}) AS found"#,
        descriptor.table, descriptor.key.column
    );
    statement
}

/// Filtered, ordered and optionally windowed selection.
///
/// When the query orders by a field other than the descriptor's ordering
/// field, the latter is appended ascending as a tiebreak.
#[must_use]
pub fn list(descriptor: &EntityDescriptor, query: &ListQuery) -> Statement {
    let mut statement = select_records(descriptor);
    let predicates: Vec<String> = query
        .filters
        .iter()
        .map(|filter| {
            let placeholder =
                statement.push(BoundParam::field(filter.field, filter.value.clone()));
            format!(r#"t."{}" = {placeholder}"#, filter.field.column)
        })
        .collect();
    if !predicates.is_empty() {
        statement.sql.push_str(" WHERE ");
        statement.sql.push_str(&predicates.join(" AND "));
    }
    statement.sql.push_str(&format!(
        r#" ORDER BY t."{}" {}"#,
        query.order_by.column,
        query.direction.keyword()
    ));
    if query.order_by.column != descriptor.order_by.column {
        statement.sql.push_str(&format!(
            r#", t."{}" {}"#,
            descriptor.order_by.column,
            SortDirection::Ascending.keyword()
        ));
    }
    if let Some(page) = query.page {
        push_window(&mut statement, page);
    }
    statement
}

fn push_window(statement: &mut Statement, page: PageRequest) {
    let limit = statement.push(BoundParam::count(page.limit()));
    let offset = statement.push(BoundParam::count(page.skip()));
    statement.sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
}

/// `UPDATE` of `bindings`, restricted to the lookup key.
#[must_use]
pub fn update(descriptor: &EntityDescriptor, key: &FieldValue, bindings: &[FieldBinding]) -> Statement {
    let mut statement = Statement::new(String::new());
    let assignments: Vec<String> = bindings
        .iter()
        .map(|binding| {
            let placeholder =
                statement.push(BoundParam::field(binding.field, binding.value.clone()));
            format!(r#""{}" = {placeholder}"#, binding.field.column)
        })
        .collect();
    let key_placeholder = statement.push(BoundParam::field(&descriptor.key, key.clone()));
    statement.sql = format!(
        r#"UPDATE "{}" SET {} WHERE "{}" = {key_placeholder}"#,
        descriptor.table,
        assignments.join(", "),
        descriptor.key.column
    );
    statement
}

/// `DELETE` by lookup key.
#[must_use]
pub fn delete(descriptor: &EntityDescriptor, key: &FieldValue) -> Statement {
    let mut statement = Statement::new(String::new());
    let placeholder = statement.push(BoundParam::field(&descriptor.key, key.clone()));
    statement.sql = format!(
        r#"DELETE FROM "{}" WHERE "{}" = {placeholder}"#,
        descriptor.table, descriptor.key.column
    );
    statement
}

#[cfg(test)]
mod tests {
    //! Statement text and bind order.

    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;
    use crate::domain::entity::{EntityKind, describe};

    fn binding(descriptor: &'static EntityDescriptor, name: &str, value: FieldValue) -> FieldBinding {
        let field = descriptor.field(name).expect("field declared");
        FieldBinding::new(field, value)
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_owned())
    }

    #[rstest]
    fn insert_lists_columns_in_binding_order() {
        let allowances = describe(EntityKind::Allowance);
        let bindings = vec![
            binding(allowances, "EmployeeID", text("E100")),
            binding(allowances, "Amount", FieldValue::Decimal(2500.0)),
            binding(allowances, "IsActive", FieldValue::Null),
        ];
        let statement = insert(allowances, &bindings);
        assert_eq!(
            statement.sql,
            r#"INSERT INTO "allowances" ("employee_id", "amount", "is_active") VALUES ($1, $2, $3)"#
        );
        assert_eq!(
            statement.params,
            vec![
                BoundParam { ty: FieldType::Text, value: text("E100") },
                BoundParam { ty: FieldType::Decimal, value: FieldValue::Decimal(2500.0) },
                BoundParam { ty: FieldType::Text, value: FieldValue::Null },
            ]
        );
    }

    #[rstest]
    fn insert_without_columns_uses_defaults() {
        let taxes = describe(EntityKind::EmployeeTax);
        let statement = insert(taxes, &[]);
        assert_eq!(statement.sql, r#"INSERT INTO "employee_taxes" DEFAULT VALUES"#);
        assert!(statement.params.is_empty());
    }

    #[rstest]
    fn generated_identity_reads_back_through_currval() {
        let employees = describe(EntityKind::Employee);
        let bindings = vec![binding(employees, "EmployeeID", text("E100"))];
        let statement = read_back(employees, &bindings);
        assert_eq!(
            statement.sql,
            r#"SELECT to_jsonb(t) AS record FROM "employees" t WHERE t."uid" = currval(pg_get_serial_sequence('employees', 'uid'))"#
        );
        assert!(statement.params.is_empty());
    }

    #[rstest]
    fn supplied_identity_reads_back_by_key() {
        let holidays = describe(EntityKind::GazettedHoliday);
        let date = NaiveDate::from_ymd_opt(2024, 3, 23).expect("valid date");
        let bindings = vec![
            binding(holidays, "HolidayDate", FieldValue::Date(date)),
            binding(holidays, "Description", text("Pakistan Day")),
        ];
        let statement = read_back(holidays, &bindings);
        assert_eq!(
            statement.sql,
            r#"SELECT to_jsonb(t) AS record FROM "gazetted_holidays" t WHERE t."holiday_date" = $1"#
        );
        assert_eq!(
            statement.params,
            vec![BoundParam { ty: FieldType::Date, value: FieldValue::Date(date) }]
        );
    }

    #[rstest]
    fn find_and_exists_bind_the_key_once() {
        let departments = describe(EntityKind::Department);
        let key = FieldValue::Integer(7);
        let found = find(departments, &key);
        assert_eq!(
            found.sql,
            r#"SELECT to_jsonb(t) AS record FROM "departments" t WHERE t."department_id" = $1"#
        );
        let probe = exists(departments, &key);
        assert_eq!(
            probe.sql,
            r#"SELECT EXISTS (SELECT 1 FROM "departments" WHERE "department_id" = $1) AS found"#
        );
        assert_eq!(found.params, probe.params);
        assert_eq!(found.params.len(), 1);
    }

    #[rstest]
    fn page_binds_filters_then_limit_then_offset() {
        let leaves = describe(EntityKind::Leave);
        let filters = vec![
            binding(leaves, "EmployeeID", text("E100")),
            binding(leaves, "Status", text("Approved")),
        ];
        let page = PageRequest::new(20, 10).expect("valid window");
        let statement = list(leaves, &ListQuery::page(leaves, filters, page));
        assert_eq!(
            statement.sql,
            r#"SELECT to_jsonb(t) AS record FROM "employee_leaves" t WHERE t."employee_id" = $1 AND t."status" = $2 ORDER BY t."uid" ASC LIMIT $3 OFFSET $4"#
        );
        let values: Vec<FieldValue> = statement.params.into_iter().map(|param| param.value).collect();
        assert_eq!(
            values,
            vec![
                text("E100"),
                text("Approved"),
                FieldValue::Integer(10),
                FieldValue::Integer(20),
            ]
        );
    }

    #[rstest]
    fn owner_listing_adds_identity_tiebreak_without_window() {
        let leaves = describe(EntityKind::Leave);
        let listing = leaves.owner_listing.as_ref().expect("leaves have owners");
        let statement = list(leaves, &ListQuery::owned_by(listing, text("E100")));
        assert_eq!(
            statement.sql,
            r#"SELECT to_jsonb(t) AS record FROM "employee_leaves" t WHERE t."employee_id" = $1 ORDER BY t."start_date" DESC, t."uid" ASC"#
        );
        assert_eq!(statement.params.len(), 1);
    }

    #[rstest]
    fn zero_limit_is_still_bound() {
        let users = describe(EntityKind::User);
        let page = PageRequest::new(0, 0).expect("valid window");
        let statement = list(users, &ListQuery::page(users, Vec::new(), page));
        assert!(statement.sql.ends_with(r#"ORDER BY t."uid" ASC LIMIT $1 OFFSET $2"#));
        assert_eq!(statement.params.first().map(|param| &param.value), Some(&FieldValue::Integer(0)));
    }

    #[rstest]
    fn update_binds_assignments_before_key() {
        let employees = describe(EntityKind::Employee);
        let bindings = vec![
            binding(employees, "Designation", text("Manager")),
            binding(employees, "ModifiedOn", text("2026-02-24 10:30:00")),
        ];
        let statement = update(employees, &text("E100"), &bindings);
        assert_eq!(
            statement.sql,
            r#"UPDATE "employees" SET "designation" = $1, "modified_on" = $2 WHERE "employee_id" = $3"#
        );
        assert_eq!(statement.params.last().map(|param| &param.value), Some(&text("E100")));
    }

    #[rstest]
    fn delete_by_supplied_integer_key() {
        let summaries = describe(EntityKind::LeaveSummary);
        let statement = delete(summaries, &FieldValue::Integer(42));
        assert_eq!(
            statement.sql,
            r#"DELETE FROM "employee_leave_summaries" WHERE "employee_id" = $1"#
        );
        assert_eq!(
            statement.params,
            vec![BoundParam { ty: FieldType::Integer, value: FieldValue::Integer(42) }]
        );
    }
}
