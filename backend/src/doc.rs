//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every record handler, the health probes and the
//! shared response schemas. Record bodies are free-form objects whose shape
//! depends on the entity named in the path, so they are documented through
//! [`RecordSchema`] rather than one schema per entity.
//!
//! The generated specification is served by Swagger UI in debug builds and
//! printed by `cargo run --bin openapi_dump`.

use utoipa::OpenApi;

use crate::domain::ports::LeaveStat;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::records::{DeleteResponse, IndexResponse};
use crate::inbound::http::schemas::RecordSchema;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management API",
        description = "CRUD access to payroll records and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::records::index,
        crate::inbound::http::records::create_record,
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::list_by_owner,
        crate::inbound::http::records::get_record,
        crate::inbound::http::records::update_record,
        crate::inbound::http::records::delete_record,
        crate::inbound::http::records::leave_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RecordSchema,
        Error,
        ErrorCode,
        DeleteResponse,
        IndexResponse,
        LeaveStat
    )),
    tags(
        (name = "records", description = "Generic operations over payroll entities"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
