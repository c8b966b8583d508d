//! Diesel and pool failures mapped onto [`RecordStoreError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RecordStoreError;

use super::pool::PoolError;

/// Pool failures are connection faults.
pub(crate) fn map_pool_error(error: PoolError) -> RecordStoreError {
    RecordStoreError::connection(error.into_message())
}

/// Classify a Diesel failure, logging the database error kind.
///
/// Unique violations keep the constraint name so the engine can report a
/// duplicate identity; everything else is an opaque query fault.
pub(crate) fn map_diesel_error(error: DieselError) -> RecordStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RecordStoreError::unique_violation(
                info.constraint_name()
                    .map_or_else(|| info.message().to_owned(), str::to_owned),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordStoreError::connection("database connection error")
        }
        DieselError::DeserializationError(err) => RecordStoreError::decode(err.to_string()),
        DieselError::QueryBuilderError(_) => RecordStoreError::query("database query error"),
        _ => RecordStoreError::query("database error"),
    }
}
