//! Operator and survey facade over the ledger, vault and coordinator.

use crate::config::SurveyConfig;
use crate::coordinator::{SplitCoordinator, SplitSettings};
use crate::error::{SurveyError, SurveyResult};
use crate::export::render_report;
use crate::locks::CompanyLocks;
use chrono::Utc;
use std::sync::{Arc, PoisonError};
use tracing::{info, warn};
use vcc_crypto::{generate_survey_token, EnvKeyProvider, KeyProvider};
use vcc_ledger::AggregationLedger;
use vcc_storage::{with_transaction, CompanyStore, Database};
use vcc_types::{
    AccessLogEntry, Aggregate, Company, CompanyId, CompanySummary, RecordId, RecordMeta,
    ResponsePayload, SurveySubmission, ValidationError,
};
use vcc_vault::{ComplianceVault, DecryptedRecord};
use zeroize::Zeroizing;

const MIN_INVESTMENT_YEAR: i32 = 1900;
const MAX_INVESTMENT_YEAR: i32 = 9999;

/// A decrypted individual response, as handed to a compliance accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedResponse {
    pub meta: RecordMeta,
    pub response: ResponsePayload,
}

/// The survey system as seen by its callers.
pub struct SurveyService {
    config: SurveyConfig,
    companies: CompanyStore,
    ledger: AggregationLedger,
    vault: ComplianceVault,
    coordinator: SplitCoordinator,
    locks: CompanyLocks,
    db: Database,
}

impl SurveyService {
    /// Opens the database named in `config`, reading the key from the
    /// configured environment variable.
    pub fn open(config: SurveyConfig) -> SurveyResult<Self> {
        let provider = EnvKeyProvider::new(config.encryption_key_env.clone());
        if !provider.is_available() {
            warn!(
                "no valid encryption key in ${}; submissions will be refused",
                provider.var()
            );
        }
        Self::build(config, Arc::new(provider))
    }

    /// Opens the database named in `config` with an explicit key provider.
    pub fn open_with_keys(config: SurveyConfig, keys: Arc<dyn KeyProvider>) -> SurveyResult<Self> {
        if !keys.is_available() {
            warn!("no encryption key configured; submissions will be refused");
        }
        Self::build(config, keys)
    }

    fn build(config: SurveyConfig, keys: Arc<dyn KeyProvider>) -> SurveyResult<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path, &config.memory_limit, config.threads)?;

        if config.origin_hash_salt.is_empty() {
            warn!("origin_hash_salt is empty; origin hashes are unsalted");
        }

        let locks = CompanyLocks::new();
        let coordinator = SplitCoordinator::new(
            db.clone(),
            keys.clone(),
            locks.clone(),
            SplitSettings {
                origin_hash_salt: config.origin_hash_salt.clone(),
                retention_years: config.retention_years,
                max_conflict_retries: config.max_conflict_retries,
            },
        );

        info!("survey service opened at {}", config.database_path.display());
        Ok(Self {
            companies: CompanyStore::new(db.clone()),
            ledger: AggregationLedger::new(db.clone()),
            vault: ComplianceVault::new(db.clone(), keys),
            coordinator,
            locks,
            config,
            db,
        })
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    // ── Operator: companies ─────────────────────────────────────────

    /// Registers a portfolio company with a fresh survey token and a zeroed
    /// aggregate.
    pub fn create_company(
        &self,
        name: &str,
        investment_year: i32,
        founder_count: u32,
    ) -> SurveyResult<Company> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Blank("name").into());
        }
        if !(MIN_INVESTMENT_YEAR..=MAX_INVESTMENT_YEAR).contains(&investment_year) {
            return Err(ValidationError::OutOfRange("investment_year").into());
        }

        let company = Company {
            id: CompanyId::new(),
            name: name.to_string(),
            investment_year,
            founder_count,
            survey_token: generate_survey_token(),
            created_at: Utc::now().timestamp_millis(),
        };

        let conn = self.db.connection()?;
        with_transaction(&conn, |conn| {
            CompanyStore::insert_in(conn, &company)?;
            AggregationLedger::open_in(conn, &company.id)?;
            Ok::<_, SurveyError>(())
        })?;

        info!("company {} created for investment year {investment_year}", company.id);
        Ok(company)
    }

    /// Corrects the declared founder count and re-runs the classifier.
    pub fn correct_founder_count(
        &self,
        company_id: &CompanyId,
        founder_count: u32,
    ) -> SurveyResult<Aggregate> {
        let lock = self.locks.lock_for(company_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let conn = self.db.connection()?;
        let aggregate = with_transaction(&conn, |conn| {
            if !CompanyStore::set_founder_count_in(conn, company_id, founder_count)? {
                return Err(SurveyError::NotFound(format!("company {company_id}")));
            }
            Ok(AggregationLedger::reclassify_in(conn, company_id)?)
        })?;

        info!("company {company_id} founder count set to {founder_count}");
        Ok(aggregate)
    }

    pub fn company(&self, company_id: &CompanyId) -> SurveyResult<Company> {
        self.companies
            .get(company_id)?
            .ok_or_else(|| SurveyError::NotFound(format!("company {company_id}")))
    }

    /// Every company with its headline numbers, newest year first.
    pub fn list_companies(&self) -> SurveyResult<Vec<CompanySummary>> {
        self.companies
            .list()?
            .into_iter()
            .map(|company| {
                let aggregate = self.ledger.read(&company.id)?;
                Ok::<_, SurveyError>(CompanySummary {
                    id: company.id,
                    name: company.name,
                    investment_year: company.investment_year,
                    founder_count: company.founder_count,
                    total_responses: aggregate.total_responses,
                    is_primarily_diverse: aggregate.is_primarily_diverse,
                })
            })
            .collect()
    }

    pub fn company_aggregate(&self, company_id: &CompanyId) -> SurveyResult<Aggregate> {
        Ok(self.ledger.read(company_id)?)
    }

    /// CSV report of every company of `investment_year`, by name.
    pub fn export_report(&self, investment_year: i32) -> SurveyResult<String> {
        let rows = self
            .companies
            .list_by_year(investment_year)?
            .into_iter()
            .map(|company| {
                let aggregate = self.ledger.read(&company.id)?;
                Ok::<_, SurveyError>((company, aggregate))
            })
            .collect::<SurveyResult<Vec<_>>>()?;

        info!("exported {} companies for {investment_year}", rows.len());
        render_report(&rows)
    }

    // ── Founders: survey ────────────────────────────────────────────

    /// Resolves a survey link to the company name shown on the form.
    pub fn survey_landing(&self, token: &str) -> SurveyResult<String> {
        self.companies
            .get_by_token(token)?
            .map(|company| company.name)
            .ok_or(SurveyError::UnknownToken)
    }

    pub fn submit(&self, submission: SurveySubmission, origin: &str) -> SurveyResult<()> {
        self.coordinator.submit(submission, origin)
    }

    /// Accepts a JSON request body. Unparseable bodies and unknown dimensions
    /// are `Malformed`.
    pub fn submit_json(&self, body: &str, origin: &str) -> SurveyResult<()> {
        let submission: SurveySubmission =
            serde_json::from_str(body).map_err(|_| ValidationError::Malformed)?;
        self.submit(submission, origin)
    }

    // ── Compliance ──────────────────────────────────────────────────

    pub fn retrieve_record(
        &self,
        record_id: &RecordId,
        accessor: &str,
        reason: &str,
    ) -> SurveyResult<RetrievedResponse> {
        let record = self.vault.retrieve(record_id, accessor, reason)?;
        parse_record(record)
    }

    pub fn retrieve_company_records(
        &self,
        company_id: &CompanyId,
        accessor: &str,
        reason: &str,
    ) -> SurveyResult<Vec<RetrievedResponse>> {
        self.vault
            .retrieve_company(company_id, accessor, reason)?
            .into_iter()
            .map(parse_record)
            .collect()
    }

    pub fn record_metadata(&self, company_id: &CompanyId) -> SurveyResult<Vec<RecordMeta>> {
        Ok(self.vault.record_metadata(company_id)?)
    }

    pub fn access_log(&self) -> SurveyResult<Vec<AccessLogEntry>> {
        Ok(self.vault.access_log()?)
    }
}

fn parse_record(record: DecryptedRecord) -> SurveyResult<RetrievedResponse> {
    let plaintext = Zeroizing::new(record.plaintext);
    let response = serde_json::from_slice(&plaintext).map_err(|_| {
        SurveyError::DecryptionError(format!("record {} is not a survey response", record.meta.id))
    })?;
    Ok(RetrievedResponse {
        meta: record.meta,
        response,
    })
}
