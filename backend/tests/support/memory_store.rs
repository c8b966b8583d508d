//! In-memory `RecordStore` double with PostgreSQL-like semantics.
//!
//! Generated identities come from a per-table counter, supplied keys are
//! unique, and listings honour filters, ordering and the offset window.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use payroll_backend::domain::entity::{EntityDescriptor, SortDirection};
use payroll_backend::domain::ports::{ListQuery, RecordStore, RecordStoreError};
use payroll_backend::domain::{FieldBinding, FieldValue, Record};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: Vec<Record>,
}

/// Record store holding every table in memory.
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<&'static str, Table>>,
}

impl MemoryRecordStore {
    fn with_table<T>(&self, descriptor: &EntityDescriptor, f: impl FnOnce(&mut Table) -> T) -> T {
        let mut tables = self
            .tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(tables.entry(descriptor.table).or_default())
    }
}

fn compare(left: Option<&FieldValue>, right: Option<&FieldValue>) -> Ordering {
    match (left, right) {
        (Some(FieldValue::Integer(a)), Some(FieldValue::Integer(b))) => a.cmp(b),
        (Some(FieldValue::Decimal(a)), Some(FieldValue::Decimal(b))) => a.total_cmp(b),
        (Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => a.cmp(b),
        (Some(FieldValue::Date(a)), Some(FieldValue::Date(b))) => a.cmp(b),
        (Some(FieldValue::Null) | None, Some(FieldValue::Null) | None) => Ordering::Equal,
        // PostgreSQL sorts NULL last in ascending order.
        (Some(FieldValue::Null) | None, _) => Ordering::Greater,
        (_, Some(FieldValue::Null) | None) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn key_of<'a>(descriptor: &EntityDescriptor, row: &'a Record) -> Option<&'a FieldValue> {
    row.get(descriptor.key.name)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(
        &self,
        descriptor: &'static EntityDescriptor,
        bindings: &[FieldBinding],
    ) -> Result<Option<Record>, RecordStoreError> {
        self.with_table(descriptor, |table| {
            let supplied = |name: &str| {
                bindings
                    .iter()
                    .find(|binding| binding.field.name == name)
                    .map(|binding| binding.value.clone())
            };
            let generated = descriptor.generated.map(|field| field.name);
            let next_id = table.last_id + 1;
            let record = Record::from_values(descriptor.fields.iter().map(|field| {
                let value = if Some(field.name) == generated {
                    FieldValue::Integer(next_id)
                } else {
                    supplied(field.name).unwrap_or(FieldValue::Null)
                };
                (field.name, value)
            }));

            let key = key_of(descriptor, &record);
            if table.rows.iter().any(|row| key_of(descriptor, row) == key) {
                return Err(RecordStoreError::unique_violation(format!(
                    "{}_{}_key",
                    descriptor.table, descriptor.key.column
                )));
            }
            if generated.is_some() {
                table.last_id = next_id;
            }
            table.rows.push(record.clone());
            Ok(Some(record))
        })
    }

    async fn list(
        &self,
        descriptor: &'static EntityDescriptor,
        query: &ListQuery,
    ) -> Result<Vec<Record>, RecordStoreError> {
        self.with_table(descriptor, |table| {
            let mut rows: Vec<Record> = table
                .rows
                .iter()
                .filter(|row| {
                    query
                        .filters
                        .iter()
                        .all(|filter| row.get(filter.field.name) == Some(&filter.value))
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| {
                let primary = compare(a.get(query.order_by.name), b.get(query.order_by.name));
                let primary = match query.direction {
                    SortDirection::Ascending => primary,
                    SortDirection::Descending => primary.reverse(),
                };
                primary.then_with(|| {
                    compare(
                        a.get(descriptor.order_by.name),
                        b.get(descriptor.order_by.name),
                    )
                })
            });
            Ok(match query.page {
                Some(page) => page.window(rows),
                None => rows,
            })
        })
    }

    async fn find(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<Option<Record>, RecordStoreError> {
        self.with_table(descriptor, |table| {
            Ok(table
                .rows
                .iter()
                .find(|row| key_of(descriptor, row) == Some(key))
                .cloned())
        })
    }

    async fn exists(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<bool, RecordStoreError> {
        self.with_table(descriptor, |table| {
            Ok(table
                .rows
                .iter()
                .any(|row| key_of(descriptor, row) == Some(key)))
        })
    }

    async fn update(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
        bindings: &[FieldBinding],
    ) -> Result<u64, RecordStoreError> {
        self.with_table(descriptor, |table| {
            let Some(row) = table
                .rows
                .iter_mut()
                .find(|row| key_of(descriptor, row) == Some(key))
            else {
                return Ok(0);
            };
            for binding in bindings {
                row.set(binding.field.name, binding.value.clone());
            }
            Ok(1)
        })
    }

    async fn delete(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<u64, RecordStoreError> {
        self.with_table(descriptor, |table| {
            let before = table.rows.len();
            table.rows.retain(|row| key_of(descriptor, row) != Some(key));
            Ok(u64::try_from(before - table.rows.len()).unwrap_or(u64::MAX))
        })
    }
}
