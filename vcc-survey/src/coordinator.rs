//! The split point.
//!
//! A submission enters here whole and leaves as two unrelated things: `+1`s
//! on the company aggregate and one encrypted record. Both are written in the
//! same transaction, so either both exist afterwards or neither does.

use crate::error::{SurveyError, SurveyResult};
use crate::locks::CompanyLocks;
use chrono::{DateTime, Months, Utc};
use std::sync::{Arc, PoisonError};
use tracing::{debug, info, warn};
use vcc_crypto::{encrypt_blob, hash_origin, EncryptionKey, KeyProvider};
use vcc_ledger::AggregationLedger;
use vcc_storage::{with_transaction, CompanyStore, Database};
use vcc_types::{Aggregate, CompanyId, ResponsePayload, Selections, SurveySubmission};
use vcc_vault::{ComplianceVault, NewRecord};
use zeroize::Zeroizing;

/// Drives the ledger, the cipher and the vault for one submission.
#[derive(Clone)]
pub struct SplitCoordinator {
    db: Database,
    companies: CompanyStore,
    keys: Arc<dyn KeyProvider>,
    locks: CompanyLocks,
    origin_hash_salt: String,
    retention_years: u32,
    max_conflict_retries: u32,
}

/// Tuning for [`SplitCoordinator`].
#[derive(Debug, Clone)]
pub struct SplitSettings {
    pub origin_hash_salt: String,
    pub retention_years: u32,
    pub max_conflict_retries: u32,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            origin_hash_salt: String::new(),
            retention_years: 4,
            max_conflict_retries: 5,
        }
    }
}

/// Everything one attempt needs, computed once before the retry loop.
struct Split<'a> {
    company_id: CompanyId,
    selections: &'a Selections,
    plaintext: &'a [u8],
    origin_hash: &'a str,
    submitted_at: i64,
    retain_until: i64,
}

impl SplitCoordinator {
    pub fn new(
        db: Database,
        keys: Arc<dyn KeyProvider>,
        locks: CompanyLocks,
        settings: SplitSettings,
    ) -> Self {
        Self {
            companies: CompanyStore::new(db.clone()),
            db,
            keys,
            locks,
            origin_hash_salt: settings.origin_hash_salt,
            retention_years: settings.retention_years,
            max_conflict_retries: settings.max_conflict_retries,
        }
    }

    /// Accepts one submission from `origin` (the submitter's network
    /// address, hashed before storage).
    ///
    /// Validation, token resolution and the key check all happen before any
    /// write. The caller learns success or failure and nothing else.
    pub fn submit(&self, submission: SurveySubmission, origin: &str) -> SurveyResult<()> {
        let selections = submission.validate()?;

        let company = self
            .companies
            .get_by_token(&submission.company_token)?
            .ok_or(SurveyError::UnknownToken)?;

        let key = self.keys.current_key().ok_or_else(|| {
            warn!("submission for company {} refused: no encryption key", company.id);
            SurveyError::KeyUnavailable
        })?;

        let submitted_at = Utc::now().timestamp_millis();
        let retain_until = retention_horizon(submitted_at, self.retention_years)?;
        let origin_hash = hash_origin(&self.origin_hash_salt, origin);

        let payload = ResponsePayload {
            submission,
            submitted_at,
        };
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&payload)
                .map_err(|e| SurveyError::EncryptionFailure(e.to_string()))?,
        );
        drop(payload);

        let split = Split {
            company_id: company.id,
            selections: &selections,
            plaintext: &plaintext,
            origin_hash: &origin_hash,
            submitted_at,
            retain_until,
        };

        let lock = self.locks.lock_for(&company.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut retries = 0;
        loop {
            match self.split_once(&split, &key) {
                Ok(aggregate) => {
                    info!(
                        "submission accepted for company {} ({} responses)",
                        company.id, aggregate.total_responses
                    );
                    return Ok(());
                }
                Err(e) if e.is_conflict() && retries < self.max_conflict_retries => {
                    retries += 1;
                    debug!(
                        "conflict on company {}, retry {retries}/{}",
                        company.id, self.max_conflict_retries
                    );
                }
                Err(e) => {
                    warn!("submission for company {} failed: {e}", company.id);
                    return Err(e);
                }
            }
        }
    }

    /// One attempt: increment, encrypt, append, commit.
    fn split_once(&self, split: &Split<'_>, key: &EncryptionKey) -> SurveyResult<Aggregate> {
        let conn = self.db.connection()?;
        with_transaction(&conn, |conn| {
            let aggregate =
                AggregationLedger::increment_in(conn, &split.company_id, split.selections)?;

            let blob = encrypt_blob(split.plaintext, key)
                .map_err(|e| SurveyError::EncryptionFailure(e.to_string()))?;

            ComplianceVault::store_in(
                conn,
                &NewRecord {
                    company_id: split.company_id,
                    encrypted_payload: &blob,
                    origin_hash: split.origin_hash,
                    submitted_at: split.submitted_at,
                    retain_until: split.retain_until,
                },
            )?;
            Ok(aggregate)
        })
    }
}

/// `submitted_at` plus `years` calendar years, in Unix millis.
pub fn retention_horizon(submitted_at: i64, years: u32) -> SurveyResult<i64> {
    DateTime::<Utc>::from_timestamp_millis(submitted_at)
        .and_then(|at| at.checked_add_months(Months::new(years.saturating_mul(12))))
        .map(|until| until.timestamp_millis())
        .ok_or_else(|| SurveyError::Config(format!("retention of {years} years is out of range")))
}
