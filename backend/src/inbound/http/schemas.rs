//! OpenAPI schema definitions for descriptor-driven domain types.
//!
//! Records are shaped by entity descriptors at runtime, so their schema is an
//! open object; the wrapper lives here to keep `utoipa` out of the record
//! model.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::Record`].
///
/// Field names and types follow the entity's descriptor, for example
/// `{"DepartmentID": 1, "DepartmentName": "Finance"}`.
#[derive(ToSchema)]
#[schema(
    as = crate::domain::Record,
    example = json!({"DepartmentID": 1, "DepartmentName": "Finance"})
)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RecordSchema(serde_json::Value);
