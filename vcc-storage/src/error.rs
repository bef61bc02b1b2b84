//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by the DuckDB layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("DuckDB error: {0}")]
    DuckDb(duckdb::Error),

    /// Another transaction committed a conflicting write first. The current
    /// transaction has been rolled back and may be retried as a whole.
    #[error("concurrent write conflict")]
    ConcurrencyConflict,
}

impl StorageError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::ConcurrencyConflict)
    }
}

impl From<duckdb::Error> for StorageError {
    fn from(err: duckdb::Error) -> Self {
        // DuckDB reports optimistic-concurrency failures as
        // "TransactionContext Error: ... Conflict ..." without a distinct code.
        let msg = err.to_string();
        if msg.contains("Conflict") || msg.contains("conflict") {
            StorageError::ConcurrencyConflict
        } else {
            StorageError::DuckDb(err)
        }
    }
}
