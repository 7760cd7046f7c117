//! SQL storage error mapping.

use gate_storage::StorageError;
use sqlx::Error as SqlxError;

/// Converts a `SQLx` error to a storage error.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::RowNotFound => StorageError::Internal("Row not found".to_string()),
        SqlxError::Database(db_err) => {
            if db_err.is_unique_violation() {
                StorageError::Internal(format!("Duplicate entry: {}", db_err.message()))
            } else {
                StorageError::Query(db_err.to_string())
            }
        }
        SqlxError::PoolTimedOut => StorageError::Connection("Connection pool timeout".to_string()),
        SqlxError::PoolClosed => StorageError::Connection("Connection pool closed".to_string()),
        SqlxError::Io(e) => StorageError::Connection(e.to_string()),
        _ => StorageError::Internal(err.to_string()),
    }
}

/// Converts an insert error, reporting a primary key clash as a duplicate.
pub fn from_insert_error(err: SqlxError, entity_type: &'static str, id: &str) -> StorageError {
    match &err {
        SqlxError::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::duplicate(entity_type, "id", id)
        }
        _ => from_sqlx_error(err),
    }
}

/// Converts a transaction control error (begin, commit).
#[allow(clippy::needless_pass_by_value)]
pub fn from_transaction_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => from_sqlx_error(err),
        _ => StorageError::Transaction(err.to_string()),
    }
}
