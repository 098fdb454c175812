//! Shared helpers for Diesel repository implementations.
//!
//! Repositories classify Diesel failures once here and then map the class
//! into their own port error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Failure classes the adapters distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// `lock_timeout` expired while waiting for a row lock.
    LockTimeout,
    /// The transaction could not be serialised against a concurrent one.
    Serialization,
    /// The connection was lost.
    Connection(String),
    /// Any other query failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn is_lock_timeout(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("lock timeout") || lower.contains("could not obtain lock")
}

/// Classify a Diesel error, logging diagnostics at debug level.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                %operation,
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            DieselFailure::Serialization
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection closed".to_owned())
        }
        DieselError::DatabaseError(_, info) if is_lock_timeout(info.message()) => {
            DieselFailure::LockTimeout
        }
        DieselError::DatabaseError(_, _) => {
            DieselFailure::Query(format!("{operation}: database error"))
        }
        DieselError::NotFound => DieselFailure::Query(format!("{operation}: record not found")),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query(format!("{operation}: query builder error"))
        }
        DieselError::DeserializationError(err) => {
            DieselFailure::Query(format!("{operation}: row decoding failed: {err}"))
        }
        _ => DieselFailure::Query(format!("{operation}: database error")),
    }
}
