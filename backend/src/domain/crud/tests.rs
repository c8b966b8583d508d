//! Engine behaviour against a mocked record store.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::entity::{EntityKind, SortDirection, describe};
use crate::domain::payload::IssueCode;
use crate::domain::ports::MockRecordStore;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    })
}

fn service(store: MockRecordStore, clock: Arc<dyn Clock>) -> RecordService {
    RecordService::new(Arc::new(store), clock)
}

fn department(id: i64, name: &str) -> Record {
    Record::from_values([
        ("DepartmentID", FieldValue::Integer(id)),
        ("DepartmentName", FieldValue::Text(name.to_owned())),
    ])
}

fn record_from(bindings: &[FieldBinding], generated: (&'static str, i64)) -> Record {
    Record::from_values(
        std::iter::once((generated.0, FieldValue::Integer(generated.1))).chain(
            bindings
                .iter()
                .map(|binding| (binding.field.name, binding.value.clone())),
        ),
    )
}

#[rstest]
#[tokio::test]
async fn create_inserts_every_insertable_field(clock: Arc<dyn Clock>) {
    let employees = describe(EntityKind::Employee);
    let mut store = MockRecordStore::new();
    store
        .expect_insert()
        .withf(|descriptor, bindings| {
            descriptor.kind == EntityKind::Employee
                && bindings.len() == 23
                && bindings.iter().all(|b| b.field.name != "uid")
        })
        .times(1)
        .returning(|_, bindings| Ok(Some(record_from(bindings, ("uid", 1)))));

    let record = service(store, clock)
        .create(
            employees,
            &json!({"EmployeeID": "E100", "EmployeeName": "A. Khan", "BasicSalary": 50000}),
        )
        .await
        .expect("create succeeds");

    assert_eq!(record.get("uid"), Some(&FieldValue::Integer(1)));
    assert_eq!(record.get("BasicSalary"), Some(&FieldValue::Decimal(50_000.0)));
    assert_eq!(record.get("CNIC"), Some(&FieldValue::Null));
}

#[rstest]
#[tokio::test]
async fn create_rejects_missing_required_fields_before_touching_the_store(
    clock: Arc<dyn Clock>,
) {
    let mut store = MockRecordStore::new();
    store.expect_insert().times(0);

    let err = service(store, clock)
        .create(describe(EntityKind::Department), &json!({}))
        .await
        .expect_err("payload is invalid");

    match err {
        CrudError::ValidationFailed(issue) => {
            assert_eq!(issue.field, "DepartmentName");
            assert_eq!(issue.code, IssueCode::MissingField);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn create_reports_duplicate_supplied_identity(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store
        .expect_insert()
        .times(1)
        .returning(|_, _| Err(RecordStoreError::unique_violation("employees_employee_id_key")));

    let err = service(store, clock)
        .create(describe(EntityKind::Employee), &json!({"EmployeeID": "E100"}))
        .await
        .expect_err("duplicate");

    assert_eq!(
        err,
        CrudError::DuplicateIdentity {
            field: "EmployeeID",
            value: FieldValue::Text("E100".to_owned()),
        }
    );
}

#[rstest]
#[tokio::test]
async fn unique_violations_on_generated_identities_are_store_faults(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store
        .expect_insert()
        .times(1)
        .returning(|_, _| Err(RecordStoreError::unique_violation("departments_pkey")));

    let err = service(store, clock)
        .create(
            describe(EntityKind::Department),
            &json!({"DepartmentName": "Finance"}),
        )
        .await
        .expect_err("store fault");

    assert!(matches!(err, CrudError::Store(_)));
}

#[rstest]
#[tokio::test]
async fn create_without_read_back_is_insert_failed(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_insert().times(1).returning(|_, _| Ok(None));

    let err = service(store, clock)
        .create(
            describe(EntityKind::Department),
            &json!({"DepartmentName": "Finance"}),
        )
        .await
        .expect_err("read-back empty");

    assert_eq!(
        err,
        CrudError::InsertFailed {
            entity: "Department"
        }
    );
}

#[rstest]
#[tokio::test]
async fn list_page_passes_window_and_declared_filters(clock: Arc<dyn Clock>) {
    let page = PageRequest::new(10, 5).expect("valid bounds");
    let mut store = MockRecordStore::new();
    store
        .expect_list()
        .withf(move |descriptor, query| {
            descriptor.kind == EntityKind::Leave
                && query.page == Some(page)
                && query.order_by.name == "uid"
                && query.direction == SortDirection::Ascending
                && query.filters.len() == 1
                && query.filters.iter().all(|f| f.field.name == "Status")
        })
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let params = BTreeMap::from([
        ("status".to_owned(), "Approved".to_owned()),
        ("unrelated".to_owned(), "x".to_owned()),
    ]);
    let rows = service(store, clock)
        .list_page(describe(EntityKind::Leave), page, &params)
        .await
        .expect("list succeeds");
    assert!(rows.is_empty());
}

#[rstest]
#[tokio::test]
async fn list_by_owner_uses_owner_ordering(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store
        .expect_list()
        .withf(|_, query| {
            query.page.is_none()
                && query.order_by.name == "StartDate"
                && query.direction == SortDirection::Descending
                && query.filters.iter().any(|f| {
                    f.field.name == "EmployeeID" && f.value == FieldValue::Text("E7".to_owned())
                })
        })
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    service(store, clock)
        .list_by_owner(describe(EntityKind::Leave), "E7")
        .await
        .expect("owner listing succeeds");
}

#[rstest]
#[tokio::test]
async fn list_by_owner_is_not_found_without_owner_listing(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_list().times(0);

    let err = service(store, clock)
        .list_by_owner(describe(EntityKind::Department), "E7")
        .await
        .expect_err("no owner listing");
    assert_eq!(err, CrudError::not_found("Department"));
}

#[rstest]
#[tokio::test]
async fn get_one_maps_missing_rows_to_not_found(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store
        .expect_find()
        .withf(|_, key| *key == FieldValue::Integer(9))
        .times(1)
        .returning(|_, _| Ok(None));

    let err = service(store, clock)
        .get_one(describe(EntityKind::Department), "9")
        .await
        .expect_err("missing");
    assert_eq!(err, CrudError::not_found("Department"));
}

#[rstest]
#[tokio::test]
async fn get_one_rejects_malformed_keys(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_find().times(0);

    let err = service(store, clock)
        .get_one(describe(EntityKind::Department), "nine")
        .await
        .expect_err("malformed key");
    assert!(matches!(
        err,
        CrudError::ValidationFailed(ref issue) if issue.code == IssueCode::InvalidKey
    ));
}

#[rstest]
#[tokio::test]
async fn update_probes_existence_before_writing(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_exists().times(1).returning(|_, _| Ok(false));
    store.expect_update().times(0);

    let err = service(store, clock)
        .update_partial(
            describe(EntityKind::Department),
            "4",
            &json!({"DepartmentName": "Audit"}),
        )
        .await
        .expect_err("missing");
    assert_eq!(err, CrudError::not_found("Department"));
}

#[rstest]
#[tokio::test]
async fn empty_update_is_rejected_without_writing(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_exists().times(1).returning(|_, _| Ok(true));
    store.expect_update().times(0);

    let err = service(store, clock)
        .update_partial(describe(EntityKind::Employee), "E100", &json!({}))
        .await
        .expect_err("nothing to update");
    assert_eq!(err, CrudError::NoFieldsProvided);
}

#[rstest]
#[tokio::test]
async fn update_writes_submitted_fields_and_rereads(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_exists().times(1).returning(|_, _| Ok(true));
    store
        .expect_update()
        .withf(|_, key, bindings| {
            *key == FieldValue::Integer(4)
                && bindings.len() == 1
                && bindings.iter().all(|b| {
                    b.field.name == "DepartmentName"
                        && b.value == FieldValue::Text("Finance & Accounts".to_owned())
                })
        })
        .times(1)
        .returning(|_, _, _| Ok(1));
    store
        .expect_find()
        .times(1)
        .returning(|_, _| Ok(Some(department(4, "Finance & Accounts"))));

    let record = service(store, clock)
        .update_partial(
            describe(EntityKind::Department),
            "4",
            &json!({"DepartmentName": "Finance & Accounts"}),
        )
        .await
        .expect("update succeeds");
    assert_eq!(record, department(4, "Finance & Accounts"));
}

#[rstest]
#[tokio::test]
async fn employee_updates_are_stamped_with_the_request_time(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_exists().times(1).returning(|_, _| Ok(true));
    store
        .expect_update()
        .withf(|_, _, bindings| {
            let names: Vec<_> = bindings.iter().map(|b| b.field.name).collect();
            names == ["Designation", "ModifiedOn"]
                && bindings.iter().any(|b| {
                    b.value == FieldValue::Text("2026-02-24 10:30:00".to_owned())
                })
        })
        .times(1)
        .returning(|_, _, _| Ok(1));
    store
        .expect_find()
        .times(1)
        .returning(|_, _| Ok(Some(Record::default())));

    service(store, clock)
        .update_partial(
            describe(EntityKind::Employee),
            "E100",
            &json!({"Designation": "Lead", "ModifiedOn": "1999-01-01 00:00:00"}),
        )
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_reports_not_found_when_the_row_vanishes(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_exists().times(1).returning(|_, _| Ok(true));
    store.expect_update().times(1).returning(|_, _, _| Ok(1));
    store.expect_find().times(1).returning(|_, _| Ok(None));

    let err = service(store, clock)
        .update_partial(
            describe(EntityKind::Department),
            "4",
            &json!({"DepartmentName": "Audit"}),
        )
        .await
        .expect_err("row vanished");
    assert_eq!(err, CrudError::not_found("Department"));
}

#[rstest]
#[case(1, true)]
#[case(0, false)]
#[tokio::test]
async fn delete_uses_affected_row_count(
    clock: Arc<dyn Clock>,
    #[case] affected: u64,
    #[case] succeeds: bool,
) {
    let mut store = MockRecordStore::new();
    store
        .expect_delete()
        .times(1)
        .returning(move |_, _| Ok(affected));

    let result = service(store, clock)
        .delete(describe(EntityKind::Department), "4")
        .await;
    assert_eq!(result.is_ok(), succeeds);
}

#[rstest]
#[tokio::test]
async fn store_faults_propagate(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store
        .expect_find()
        .times(1)
        .returning(|_, _| Err(RecordStoreError::connection("pool timed out")));

    let err = service(store, clock)
        .get_one(describe(EntityKind::Department), "1")
        .await
        .expect_err("store fault");
    assert_eq!(
        err,
        CrudError::Store(RecordStoreError::connection("pool timed out"))
    );
}

#[rstest]
#[tokio::test]
async fn driving_port_resolves_entities_by_path(clock: Arc<dyn Clock>) {
    let mut store = MockRecordStore::new();
    store.expect_delete().times(1).returning(|_, _| Ok(1));
    let records = service(store, clock);

    let label = EntityRecords::delete(&records, "departments", "4")
        .await
        .expect("delete succeeds");
    assert_eq!(label, "Department");

    let err = EntityRecords::get_one(&records, "payslips", "1")
        .await
        .expect_err("unknown entity");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
