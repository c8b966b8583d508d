//! Entity record HTTP handlers.
//!
//! ```text
//! GET    /
//! POST   /{entity}
//! GET    /{entity}?skip=0&limit=100
//! GET    /{entity}/{id}
//! PUT    /{entity}/{id}
//! DELETE /{entity}/{id}
//! GET    /{entity}/employee/{owner}
//! GET    /leaves/stats/{employee_id}?year=2024
//! ```
//!
//! Handlers are generic over the entity named in the path; the domain
//! resolves the name and validates keys and payloads.

use std::collections::BTreeMap;

use actix_web::{delete, get, post, put, web};
use pagination::{LIMIT_PARAM, PageRequest, PageRequestError, SKIP_PARAM};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::domain::crud::CrudError;
use crate::domain::entity::{EntityKind, describe};
use crate::domain::payload::BODY_FIELD;
use crate::domain::ports::LeaveStat;
use crate::domain::{Error, Record};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::RecordSchema;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
struct EntityPath {
    entity: String,
}

#[derive(Debug, Deserialize)]
struct RecordPath {
    entity: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct OwnerPath {
    entity: String,
    owner: String,
}

#[derive(Debug, Deserialize)]
struct EmployeePath {
    employee_id: String,
}

/// Query parameters for leave statistics.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaveStatsParams {
    /// Restrict the statistics to one leave year.
    year: Option<String>,
}

impl LeaveStatsParams {
    /// Requested year; a blank value means no restriction.
    fn year(&self) -> Option<&str> {
        self.year.as_deref().filter(|year| !year.is_empty())
    }
}

/// Confirmation returned by delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    /// Human-readable confirmation, e.g. `Employee deleted successfully`.
    pub message: String,
}

/// Service index listing entity endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    /// Service title.
    pub message: String,
    /// Endpoint name to path prefix.
    pub endpoints: BTreeMap<String, String>,
}

fn map_page_error(err: &PageRequestError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.param(), "code": "invalid_page" }))
}

fn page_from(params: &BTreeMap<String, String>) -> Result<PageRequest, Error> {
    PageRequest::from_query(
        params.get(SKIP_PARAM).map(String::as_str),
        params.get(LIMIT_PARAM).map(String::as_str),
    )
    .map_err(|err| map_page_error(&err))
}

/// Service title and entity endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service index", body = IndexResponse)),
    tags = ["records"],
    operation_id = "index"
)]
#[get("/")]
pub async fn index() -> web::Json<IndexResponse> {
    let mut endpoints: BTreeMap<String, String> = EntityKind::ALL
        .into_iter()
        .map(describe)
        .map(|descriptor| (descriptor.path.to_owned(), format!("/{}", descriptor.path)))
        .collect();
    endpoints.insert("docs".to_owned(), "/docs".to_owned());
    web::Json(IndexResponse {
        message: "Employee Management API".to_owned(),
        endpoints,
    })
}

/// Create a record.
#[utoipa::path(
    post,
    path = "/{entity}",
    params(("entity" = String, Path, description = "Entity path, e.g. `employees`")),
    request_body(content = RecordSchema, description = "Create-shape payload"),
    responses(
        (status = 200, description = "Persisted record", body = RecordSchema),
        (status = 400, description = "Invalid payload or duplicate identity", body = Error),
        (status = 404, description = "Unknown entity", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "createRecord"
)]
#[post("/{entity}")]
pub async fn create_record(
    state: web::Data<HttpState>,
    path: web::Path<EntityPath>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Record>> {
    let EntityPath { entity } = path.into_inner();
    let record = state.records.create(&entity, &payload).await?;
    Ok(web::Json(record))
}

/// List one page of records.
#[utoipa::path(
    get,
    path = "/{entity}",
    params(
        ("entity" = String, Path, description = "Entity path, e.g. `leaves`"),
        ("skip" = Option<i64>, Query, description = "Rows to skip; defaults to 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows; defaults to 100, zero returns none"),
        ("employee_id" = Option<String>, Query, description = "Leaves only: owner filter"),
        ("status" = Option<String>, Query, description = "Leaves only: status filter"),
        ("year" = Option<String>, Query, description = "Leaves only: leave year filter")
    ),
    responses(
        (status = 200, description = "Records ordered by identity", body = [RecordSchema]),
        (status = 400, description = "Invalid pagination or filter", body = Error),
        (status = 404, description = "Unknown entity", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/{entity}")]
pub async fn list_records(
    state: web::Data<HttpState>,
    path: web::Path<EntityPath>,
    query: web::Query<BTreeMap<String, String>>,
) -> ApiResult<web::Json<Vec<Record>>> {
    let EntityPath { entity } = path.into_inner();
    let params = query.into_inner();
    let page = page_from(&params)?;
    let records = state.records.list_page(&entity, page, &params).await?;
    Ok(web::Json(records))
}

/// List every record owned by one employee.
#[utoipa::path(
    get,
    path = "/{entity}/employee/{owner}",
    params(
        ("entity" = String, Path, description = "Entity path; only `leaves` has owners"),
        ("owner" = String, Path, description = "Owning employee identifier")
    ),
    responses(
        (status = 200, description = "Owned records", body = [RecordSchema]),
        (status = 404, description = "Unknown entity or no owner listing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "listRecordsByOwner"
)]
#[get("/{entity}/employee/{owner}")]
pub async fn list_by_owner(
    state: web::Data<HttpState>,
    path: web::Path<OwnerPath>,
) -> ApiResult<web::Json<Vec<Record>>> {
    let OwnerPath { entity, owner } = path.into_inner();
    let records = state.records.list_by_owner(&entity, &owner).await?;
    Ok(web::Json(records))
}

/// Fetch one record.
#[utoipa::path(
    get,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity path"),
        ("id" = String, Path, description = "Lookup key")
    ),
    responses(
        (status = 200, description = "Record", body = RecordSchema),
        (status = 400, description = "Malformed key", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "getRecord"
)]
#[get("/{entity}/{id}")]
pub async fn get_record(
    state: web::Data<HttpState>,
    path: web::Path<RecordPath>,
) -> ApiResult<web::Json<Record>> {
    let RecordPath { entity, id } = path.into_inner();
    let record = state.records.get_one(&entity, &id).await?;
    Ok(web::Json(record))
}

/// Apply a sparse update.
///
/// Absent fields are left unchanged; `null` clears an optional field.
#[utoipa::path(
    put,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity path"),
        ("id" = String, Path, description = "Lookup key")
    ),
    request_body(content = RecordSchema, description = "Sparse update payload"),
    responses(
        (status = 200, description = "Updated record", body = RecordSchema),
        (status = 400, description = "Invalid payload or no fields provided", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "updateRecord"
)]
#[put("/{entity}/{id}")]
pub async fn update_record(
    state: web::Data<HttpState>,
    path: web::Path<RecordPath>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<Record>> {
    let RecordPath { entity, id } = path.into_inner();
    let record = state.records.update_partial(&entity, &id, &payload).await?;
    Ok(web::Json(record))
}

/// Delete one record.
#[utoipa::path(
    delete,
    path = "/{entity}/{id}",
    params(
        ("entity" = String, Path, description = "Entity path"),
        ("id" = String, Path, description = "Lookup key")
    ),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 400, description = "Malformed key", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/{entity}/{id}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    path: web::Path<RecordPath>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let RecordPath { entity, id } = path.into_inner();
    let label = state.records.delete(&entity, &id).await?;
    Ok(web::Json(DeleteResponse {
        message: format!("{label} deleted successfully"),
    }))
}

/// Leave usage of one employee grouped by type, status and year.
#[utoipa::path(
    get,
    path = "/leaves/stats/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee identifier"),
        LeaveStatsParams
    ),
    responses(
        (status = 200, description = "Leave statistics", body = [LeaveStat]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["records"],
    operation_id = "leaveStats"
)]
#[get("/leaves/stats/{employee_id}")]
pub async fn leave_stats(
    state: web::Data<HttpState>,
    path: web::Path<EmployeePath>,
    query: web::Query<LeaveStatsParams>,
) -> ApiResult<web::Json<Vec<LeaveStat>>> {
    let EmployeePath { employee_id } = path.into_inner();
    let stats = state
        .leave_stats
        .leave_stats(&employee_id, query.year())
        .await
        .map_err(|err| Error::from(CrudError::from(err)))?;
    Ok(web::Json(stats))
}

/// Register the record routes.
///
/// Fixed-prefix routes come before the generic `/{entity}/...` patterns.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(leave_stats)
        .service(list_by_owner)
        .service(create_record)
        .service(list_records)
        .service(get_record)
        .service(update_record)
        .service(delete_record);
}

/// JSON body extractor configuration mapping malformed bodies to
/// `invalid_request` errors.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _request| {
        Error::invalid_request(format!("Invalid JSON body: {err}"))
            .with_details(json!({ "field": BODY_FIELD, "code": "invalid_json" }))
            .into()
    })
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
