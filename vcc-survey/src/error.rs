//! Survey-level error taxonomy.

use thiserror::Error;
use vcc_ledger::LedgerError;
use vcc_storage::StorageError;
use vcc_types::ValidationError;
use vcc_vault::VaultError;

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Every failure a caller of the survey can see.
///
/// Display strings never carry submission content. `UnknownToken` does not
/// echo the token, so callers cannot probe which links ever existed.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("unknown survey link")]
    UnknownToken,

    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    #[error("encryption failed: {0}")]
    EncryptionFailure(String),

    #[error("decryption failed: {0}")]
    DecryptionError(String),

    #[error("encryption key unavailable")]
    KeyUnavailable,

    #[error("concurrent update conflict persisted after retries")]
    ConcurrencyConflict,

    #[error("access log write failed: {0}")]
    AccessLogWrite(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("report export failed: {0}")]
    Export(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl SurveyError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, SurveyError::ConcurrencyConflict)
    }
}

impl From<StorageError> for SurveyError {
    fn from(err: StorageError) -> Self {
        if err.is_conflict() {
            SurveyError::ConcurrencyConflict
        } else {
            SurveyError::Storage(err)
        }
    }
}

impl From<duckdb::Error> for SurveyError {
    fn from(err: duckdb::Error) -> Self {
        StorageError::from(err).into()
    }
}

impl From<LedgerError> for SurveyError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CompanyNotFound(id) => SurveyError::NotFound(format!("company {id}")),
            LedgerError::AggregateNotFound(id) => {
                SurveyError::NotFound(format!("aggregate for company {id}"))
            }
            LedgerError::Storage(e) => e.into(),
        }
    }
}

impl From<VaultError> for SurveyError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::KeyUnavailable => SurveyError::KeyUnavailable,
            VaultError::RecordNotFound(id) => SurveyError::NotFound(format!("record {id}")),
            VaultError::AccessLogWrite(msg) => SurveyError::AccessLogWrite(msg),
            VaultError::Decryption(msg) => SurveyError::DecryptionError(msg),
            VaultError::BlankField(field) => ValidationError::Blank(field).into(),
            VaultError::Storage(e) => e.into(),
        }
    }
}
