//! Engine outcome taxonomy and its mapping onto the domain error payload.

use serde_json::json;
use tracing::{error, warn};

use crate::domain::entity::UnknownEntity;
use crate::domain::payload::FieldIssue;
use crate::domain::ports::RecordStoreError;
use crate::domain::{Error, FieldValue};

/// Failures produced by the CRUD engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrudError {
    /// The entity name is not registered.
    #[error(transparent)]
    UnknownEntity(#[from] UnknownEntity),
    /// The payload, key or a filter failed validation.
    #[error(transparent)]
    ValidationFailed(#[from] FieldIssue),
    /// An update carried no effective field.
    #[error("no fields provided for update")]
    NoFieldsProvided,
    /// The lookup key does not resolve to a record.
    #[error("{entity} not found")]
    NotFound {
        /// Display label of the entity.
        entity: &'static str,
    },
    /// A create collided with an existing lookup key.
    #[error("{field} `{value}` already exists")]
    DuplicateIdentity {
        /// Lookup key field.
        field: &'static str,
        /// Conflicting key value.
        value: FieldValue,
    },
    /// The post-insert read-back returned no row.
    #[error("{entity} was inserted but could not be read back")]
    InsertFailed {
        /// Display label of the entity.
        entity: &'static str,
    },
    /// Any other store failure, including connectivity.
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

impl CrudError {
    /// Not-found outcome for `entity`.
    #[must_use]
    pub const fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

impl From<CrudError> for Error {
    fn from(err: CrudError) -> Self {
        match err {
            CrudError::UnknownEntity(unknown) => {
                Self::not_found(format!("Unknown entity: {}", unknown.name))
                    .with_details(json!({ "entity": unknown.name, "code": "unknown_entity" }))
            }
            CrudError::ValidationFailed(issue) => Self::invalid_request(issue.message)
                .with_details(json!({ "field": issue.field, "code": issue.code.as_str() })),
            CrudError::NoFieldsProvided => Self::invalid_request("No fields provided for update")
                .with_details(json!({ "code": "no_fields_provided" })),
            CrudError::NotFound { entity } => Self::not_found(format!("{entity} not found")),
            CrudError::DuplicateIdentity { field, value } => {
                Self::invalid_request(format!("{field} `{value}` already exists")).with_details(json!({
                    "field": field,
                    "value": value.to_json(),
                    "code": "duplicate_identity",
                }))
            }
            CrudError::InsertFailed { entity } => {
                warn!(entity, "insert read-back returned no row");
                Self::internal(format!("Failed to read back {entity} after insert"))
            }
            CrudError::Store(store) => {
                error!(error = %store, "record store failure");
                Self::internal(store.to_string())
            }
        }
    }
}
