//! Ledger error types.

use thiserror::Error;
use vcc_storage::StorageError;
use vcc_types::CompanyId;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("company not found: {0}")]
    CompanyNotFound(CompanyId),

    #[error("aggregate not found for company {0}")]
    AggregateNotFound(CompanyId),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LedgerError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, LedgerError::Storage(e) if e.is_conflict())
    }
}

impl From<duckdb::Error> for LedgerError {
    fn from(err: duckdb::Error) -> Self {
        LedgerError::Storage(err.into())
    }
}
