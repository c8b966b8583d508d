//! Domain types, the entity registry and the CRUD engine.
//!
//! Purpose: describe every record kind once as data and run the record
//! operations generically over those descriptions. Nothing here knows about
//! HTTP or SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - `entity`: descriptors and the static registry (`describe`, `lookup`).
//! - `Record` / `FieldValue`: persisted rows and typed values.
//! - `payload`: create/update/key/filter parsing.
//! - `RecordService`: the CRUD engine; `CrudError` its outcomes.
//! - `Error` / `ErrorCode`: transport-agnostic error payload.
//! - `TraceId`: request correlation identifier.

pub mod crud;
pub mod entity;
pub mod error;
pub mod payload;
pub mod ports;
pub mod record;
mod trace_id;

pub use self::crud::{CrudError, RecordService};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::record::{FieldBinding, FieldValue, Record};
pub use self::trace_id::TraceId;
