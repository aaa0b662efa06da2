// src/storage/error.rs
// DOCUMENTATION: Errors raised by storage backends
// PURPOSE: One error type shared by the file and database engines

use thiserror::Error;

/// Storage failure
/// DOCUMENTATION: Missing entities are never errors; lookups return `None`
/// and deleting an unknown entity is a no-op.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A reference does not resolve, or a uniqueness rule was broken
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds data that is not a valid object map
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The database could not be reached or the pool is gone
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Any other database failure
    #[error("Database query error: {0}")]
    Query(String),

    /// The configured engine cannot be built
    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // SQLSTATE class 23: integrity constraint violation
            sqlx::Error::Database(db_err)
                if db_err.code().map_or(false, |code| code.starts_with("23")) =>
            {
                StorageError::ConstraintViolation(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StorageError::Connection(err.to_string()),
            _ => StorageError::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connection_failures() {
        let err: StorageError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StorageError::Connection(_)));

        let err: StorageError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: StorageError = io.into();
        assert!(err.to_string().contains("read-only"));
    }
}
