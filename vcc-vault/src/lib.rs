//! Compliance vault for individual survey records.
//!
//! Records arrive already encrypted and are appended without touching the
//! key. Reading them back is the only place a key is used, and every read
//! writes an access-log entry first:
//!
//! 1. The request is checked and the key obtained (no key, no access)
//! 2. The encrypted blob is fetched and the access-log entry inserted in one
//!    transaction
//! 3. Only after that transaction commits is the blob decrypted
//!
//! If the log write fails nothing is decrypted.

mod access_log;
mod error;
mod records;

pub use error::{VaultError, VaultResult};
pub use records::NewRecord;

use chrono::Utc;
use duckdb::Connection;
use std::sync::Arc;
use tracing::{info, warn};
use vcc_crypto::{decrypt_blob, EncryptionKey, KeyProvider};
use vcc_storage::{with_transaction, Database};
use vcc_types::{AccessLogEntry, AccessLogId, CompanyId, RecordId, RecordMeta};

/// A decrypted individual record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedRecord {
    pub meta: RecordMeta,
    pub plaintext: Vec<u8>,
}

/// Append-only store of encrypted individual records plus its access log.
#[derive(Clone)]
pub struct ComplianceVault {
    db: Database,
    keys: Arc<dyn KeyProvider>,
}

impl ComplianceVault {
    pub fn new(db: Database, keys: Arc<dyn KeyProvider>) -> Self {
        Self { db, keys }
    }

    /// Appends an encrypted record inside the caller's transaction.
    pub fn store_in(conn: &Connection, record: &NewRecord<'_>) -> VaultResult<RecordId> {
        records::insert_in(conn, record)
    }

    /// Appends an encrypted record in its own transaction.
    pub fn store(&self, record: &NewRecord<'_>) -> VaultResult<RecordId> {
        let conn = self.db.connection()?;
        with_transaction(&conn, |conn| Self::store_in(conn, record))
    }

    /// Decrypts one record for a named accessor and reason.
    pub fn retrieve(
        &self,
        record_id: &RecordId,
        accessor: &str,
        reason: &str,
    ) -> VaultResult<DecryptedRecord> {
        check_request(accessor, reason)?;
        let key = self.require_key()?;

        let conn = self.db.connection()?;
        let (meta, blob) = with_transaction(&conn, |conn| {
            let (meta, blob) =
                records::fetch_in(conn, record_id)?.ok_or(VaultError::RecordNotFound(*record_id))?;
            let entry = new_entry(accessor, reason, Some(meta.company_id), Some(*record_id));
            log_access(conn, &entry)?;
            Ok::<_, VaultError>((meta, blob))
        })?;

        info!(accessor, "compliance access to record {record_id}");
        let plaintext = open_blob(&blob, &key)?;
        Ok(DecryptedRecord { meta, plaintext })
    }

    /// Decrypts every record of one company. Writes a single log entry for
    /// the whole retrieval, even when the company has no records.
    pub fn retrieve_company(
        &self,
        company_id: &CompanyId,
        accessor: &str,
        reason: &str,
    ) -> VaultResult<Vec<DecryptedRecord>> {
        check_request(accessor, reason)?;
        let key = self.require_key()?;

        let conn = self.db.connection()?;
        let rows = with_transaction(&conn, |conn| {
            let rows = records::fetch_company_in(conn, company_id)?;
            let entry = new_entry(accessor, reason, Some(*company_id), None);
            log_access(conn, &entry)?;
            Ok::<_, VaultError>(rows)
        })?;

        info!(
            accessor,
            "compliance access to {} records of company {company_id}",
            rows.len()
        );
        rows.into_iter()
            .map(|(meta, blob)| {
                let plaintext = open_blob(&blob, &key)?;
                Ok(DecryptedRecord { meta, plaintext })
            })
            .collect()
    }

    /// Record metadata of one company, oldest first. Needs no key and
    /// writes no log entry since nothing is decrypted.
    pub fn record_metadata(&self, company_id: &CompanyId) -> VaultResult<Vec<RecordMeta>> {
        let conn = self.db.connection()?;
        records::list_meta_in(&conn, company_id)
    }

    /// The full access log, oldest first.
    pub fn access_log(&self) -> VaultResult<Vec<AccessLogEntry>> {
        let conn = self.db.connection()?;
        access_log::list_in(&conn)
    }

    fn require_key(&self) -> VaultResult<EncryptionKey> {
        self.keys.current_key().ok_or_else(|| {
            warn!("compliance retrieval refused: no encryption key configured");
            VaultError::KeyUnavailable
        })
    }
}

fn check_request(accessor: &str, reason: &str) -> VaultResult<()> {
    if accessor.trim().is_empty() {
        return Err(VaultError::BlankField("accessor"));
    }
    if reason.trim().is_empty() {
        return Err(VaultError::BlankField("reason"));
    }
    Ok(())
}

fn new_entry(
    accessor: &str,
    reason: &str,
    company_id: Option<CompanyId>,
    record_id: Option<RecordId>,
) -> AccessLogEntry {
    AccessLogEntry {
        id: AccessLogId::new(),
        accessor: accessor.trim().to_string(),
        reason: reason.trim().to_string(),
        company_id,
        record_id,
        accessed_at: Utc::now().timestamp_millis(),
    }
}

fn log_access(conn: &Connection, entry: &AccessLogEntry) -> VaultResult<()> {
    access_log::append_in(conn, entry).map_err(|e| {
        warn!("access log write failed for {:?}: {e}", entry.target());
        VaultError::AccessLogWrite(e.to_string())
    })
}

fn open_blob(blob: &[u8], key: &EncryptionKey) -> VaultResult<Vec<u8>> {
    decrypt_blob(blob, key).map_err(|e| VaultError::Decryption(e.to_string()))
}
