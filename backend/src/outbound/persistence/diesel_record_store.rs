//! PostgreSQL-backed `RecordStore` implementation using Diesel ORM.
//!
//! Statements come from [`super::statement`] and run through
//! `diesel::sql_query` with every parameter bound by type. Rows arrive as one
//! JSONB object per row and are decoded against the entity descriptor, so a
//! single adapter serves every relation.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{self, BigInt, Bool, Double, Jsonb, Nullable, Text};
use diesel::{OptionalExtension, QueryableByName, sql_query};
use diesel_async::RunQueryDsl;
use serde_json::Value;
use tracing::debug;

use crate::domain::entity::{EntityDescriptor, FieldSpec, FieldType};
use crate::domain::ports::{ListQuery, RecordStore, RecordStoreError};
use crate::domain::record::DATE_FORMAT;
use crate::domain::{FieldBinding, FieldValue, Record};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::statement::{self, BoundParam, Statement};

type BoxedQuery = BoxedSqlQuery<'static, Pg, SqlQuery>;

/// One row projected as `to_jsonb(t) AS record`.
#[derive(Debug, QueryableByName)]
struct RecordRow {
    #[diesel(sql_type = Jsonb)]
    record: Value,
}

/// Result of an existence probe.
#[derive(Debug, QueryableByName)]
struct FoundRow {
    #[diesel(sql_type = Bool)]
    found: bool,
}

/// Diesel-backed implementation of the [`RecordStore`] port.
#[derive(Clone)]
pub struct DieselRecordStore {
    pool: DbPool,
}

impl DieselRecordStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn bind_param(query: BoxedQuery, param: BoundParam) -> BoxedQuery {
    match (param.ty, param.value) {
        (_, FieldValue::Text(text)) => query.bind::<Text, _>(text),
        (_, FieldValue::Integer(number)) => query.bind::<BigInt, _>(number),
        (_, FieldValue::Decimal(number)) => query.bind::<Double, _>(number),
        (_, FieldValue::Date(date)) => query.bind::<sql_types::Date, _>(date),
        (FieldType::Text, FieldValue::Null) => query.bind::<Nullable<Text>, _>(None::<String>),
        (FieldType::Integer, FieldValue::Null) => query.bind::<Nullable<BigInt>, _>(None::<i64>),
        (FieldType::Decimal, FieldValue::Null) => query.bind::<Nullable<Double>, _>(None::<f64>),
        (FieldType::Date, FieldValue::Null) => {
            query.bind::<Nullable<sql_types::Date>, _>(None::<NaiveDate>)
        }
    }
}

fn prepare(statement: Statement) -> BoxedQuery {
    let Statement { sql, params } = statement;
    params
        .into_iter()
        .fold(sql_query(sql).into_boxed::<Pg>(), bind_param)
}

fn decode_value(field: &FieldSpec, raw: Value) -> Result<FieldValue, RecordStoreError> {
    let value = match (field.ty, raw) {
        (_, Value::Null) => Some(FieldValue::Null),
        (FieldType::Text, Value::String(text)) => Some(FieldValue::Text(text)),
        (FieldType::Integer, Value::Number(number)) => number.as_i64().map(FieldValue::Integer),
        (FieldType::Decimal, Value::Number(number)) => number.as_f64().map(FieldValue::Decimal),
        (FieldType::Date, Value::String(text)) => NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .ok()
            .map(FieldValue::Date),
        _ => None,
    };
    value.ok_or_else(|| {
        RecordStoreError::decode(format!(
            "column {}: expected {}",
            field.column,
            field.ty.name()
        ))
    })
}

/// Decode a JSONB row into a record in descriptor order.
fn decode_record(descriptor: &EntityDescriptor, row: RecordRow) -> Result<Record, RecordStoreError> {
    let Value::Object(mut columns) = row.record else {
        return Err(RecordStoreError::decode(format!(
            "{} row is not an object",
            descriptor.table
        )));
    };
    let values = descriptor
        .fields
        .iter()
        .map(|field| {
            let raw = columns.remove(field.column).ok_or_else(|| {
                RecordStoreError::decode(format!(
                    "{} row has no column {}",
                    descriptor.table, field.column
                ))
            })?;
            decode_value(field, raw).map(|value| (field.name, value))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Record::from_values(values))
}

#[async_trait]
impl RecordStore for DieselRecordStore {
    async fn insert(
        &self,
        descriptor: &'static EntityDescriptor,
        bindings: &[FieldBinding],
    ) -> Result<Option<Record>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        prepare(statement::insert(descriptor, bindings))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // The read-back must stay on this connection: currval is session-local.
        let row: Option<RecordRow> = prepare(statement::read_back(descriptor, bindings))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        debug!(table = descriptor.table, found = row.is_some(), "insert read back");
        row.map(|found| decode_record(descriptor, found)).transpose()
    }

    async fn list(
        &self,
        descriptor: &'static EntityDescriptor,
        query: &ListQuery,
    ) -> Result<Vec<Record>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecordRow> = prepare(statement::list(descriptor, query))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| decode_record(descriptor, row))
            .collect()
    }

    async fn find(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<Option<Record>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecordRow> = prepare(statement::find(descriptor, key))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|found| decode_record(descriptor, found)).transpose()
    }

    async fn exists(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: FoundRow = prepare(statement::exists(descriptor, key))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row.found)
    }

    async fn update(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
        bindings: &[FieldBinding],
    ) -> Result<u64, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = prepare(statement::update(descriptor, key, bindings))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }

    async fn delete(
        &self,
        descriptor: &'static EntityDescriptor,
        key: &FieldValue,
    ) -> Result<u64, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = prepare(statement::delete(descriptor, key))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected as u64)
    }
}
