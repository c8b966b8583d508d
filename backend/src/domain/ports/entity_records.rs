//! Driving port for entity CRUD use-cases.
//!
//! Inbound adapters address entities by their path name (for example
//! `employees`) and pass raw keys and JSON payloads through unchanged; the
//! domain resolves, validates and maps every failure to [`Error`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::Value;

use crate::domain::{Error, Record};

/// Domain use-case port for entity records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityRecords: Send + Sync {
    /// Create a record from a create-shape payload.
    async fn create(&self, entity: &str, payload: &Value) -> Result<Record, Error>;

    /// List one page of records, applying any declared equality filters
    /// found in `params`.
    async fn list_page(
        &self,
        entity: &str,
        page: PageRequest,
        params: &BTreeMap<String, String>,
    ) -> Result<Vec<Record>, Error>;

    /// List every record owned by one employee.
    async fn list_by_owner(&self, entity: &str, owner: &str) -> Result<Vec<Record>, Error>;

    /// Fetch one record by its lookup key.
    async fn get_one(&self, entity: &str, key: &str) -> Result<Record, Error>;

    /// Apply a sparse update and return the updated record.
    async fn update_partial(
        &self,
        entity: &str,
        key: &str,
        payload: &Value,
    ) -> Result<Record, Error>;

    /// Delete one record, returning the entity's display label.
    async fn delete(&self, entity: &str, key: &str) -> Result<&'static str, Error>;
}
