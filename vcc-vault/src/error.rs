//! Vault error types.

use thiserror::Error;
use vcc_storage::StorageError;
use vcc_types::RecordId;

pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("encryption key unavailable")]
    KeyUnavailable,

    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("access log write failed: {0}")]
    AccessLogWrite(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<duckdb::Error> for VaultError {
    fn from(err: duckdb::Error) -> Self {
        VaultError::Storage(err.into())
    }
}
