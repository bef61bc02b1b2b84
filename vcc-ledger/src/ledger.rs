//! Per-company running counters.

use crate::classifier::is_primarily_diverse;
use crate::error::{LedgerError, LedgerResult};
use chrono::Utc;
use duckdb::{params, Connection};
use tracing::debug;
use vcc_storage::{optional, with_transaction, CompanyStore, Database};
use vcc_types::{Aggregate, Category, CompanyId, Selections};

/// Owns the `aggregates` table.
///
/// Every mutation is a `+1` to counters, issued as `col = col + 1` inside the
/// caller's transaction, so concurrent submissions for one company can never
/// overwrite each other. A concurrent committed write surfaces as a storage
/// conflict and the whole transaction is retried by the caller.
#[derive(Clone)]
pub struct AggregationLedger {
    db: Database,
}

impl AggregationLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates the zeroed aggregate for a new company.
    pub fn open_in(conn: &Connection, company_id: &CompanyId) -> LedgerResult<()> {
        conn.execute(
            "INSERT INTO aggregates (company_id, updated_at) VALUES (?, ?)",
            params![company_id.to_string(), Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    /// Reads a company's aggregate. Side-effect free.
    pub fn read(&self, company_id: &CompanyId) -> LedgerResult<Aggregate> {
        let conn = self.db.connection()?;
        Self::read_in(&conn, company_id)
    }

    /// Reads a company's aggregate inside the caller's transaction.
    pub fn read_in(conn: &Connection, company_id: &CompanyId) -> LedgerResult<Aggregate> {
        let sql = format!("SELECT {} FROM aggregates WHERE company_id = ?", select_columns());
        let result = conn.query_row(&sql, params![company_id.to_string()], |row| {
            let mut aggregate = Aggregate::empty(*company_id);
            for (i, category) in Category::ALL.iter().enumerate() {
                let count: i64 = row.get(i)?;
                aggregate.counts.insert(*category, to_count(count));
            }
            let base = Category::ALL.len();
            aggregate.total_responses = to_count(row.get(base)?);
            aggregate.total_declined_all = to_count(row.get(base + 1)?);
            aggregate.diverse_responders = to_count(row.get(base + 2)?);
            aggregate.is_primarily_diverse = row.get(base + 3)?;
            aggregate.updated_at = row.get(base + 4)?;
            Ok(aggregate)
        });
        optional(result)?.ok_or(LedgerError::AggregateNotFound(*company_id))
    }

    /// Counts one submission in its own transaction.
    pub fn increment(
        &self,
        company_id: &CompanyId,
        selections: &Selections,
    ) -> LedgerResult<Aggregate> {
        let conn = self.db.connection()?;
        with_transaction(&conn, |conn| Self::increment_in(conn, company_id, selections))
    }

    /// Counts one submission inside the caller's transaction and returns the
    /// post-increment aggregate with its recomputed diversity flag.
    ///
    /// `total_responses` always moves by one. A decline-all submission moves
    /// `total_declined_all` and nothing else; otherwise every selected
    /// category moves by one, and `diverse_responders` moves by one when any
    /// of them is a diverse identity.
    pub fn increment_in(
        conn: &Connection,
        company_id: &CompanyId,
        selections: &Selections,
    ) -> LedgerResult<Aggregate> {
        let founders = CompanyStore::get_in(conn, company_id)?
            .ok_or(LedgerError::CompanyNotFound(*company_id))?
            .founder_count;

        let mut aggregate = Self::read_in(conn, company_id)?;
        apply_selections(&mut aggregate, selections);
        aggregate.is_primarily_diverse = is_primarily_diverse(&aggregate, founders);
        aggregate.updated_at = Utc::now().timestamp_millis();

        let mut assignments = vec![bump("total_responses")];
        if selections.is_decline_all() {
            assignments.push(bump("total_declined_all"));
        } else {
            assignments.extend(selections.categories().map(|c| bump(c.column())));
            if selections.has_diverse_identity() {
                assignments.push(bump("diverse_responders"));
            }
        }

        let sql = format!(
            "UPDATE aggregates SET {}, is_primarily_diverse = ?, updated_at = ? WHERE company_id = ?",
            assignments.join(", ")
        );
        let affected = conn.execute(
            &sql,
            params![
                aggregate.is_primarily_diverse,
                aggregate.updated_at,
                company_id.to_string()
            ],
        )?;
        if affected == 0 {
            return Err(LedgerError::AggregateNotFound(*company_id));
        }

        debug!(
            "aggregate for company {company_id} now at {} responses",
            aggregate.total_responses
        );
        Ok(aggregate)
    }

    /// Recomputes the diversity flag after a founder-count correction.
    pub fn reclassify_in(conn: &Connection, company_id: &CompanyId) -> LedgerResult<Aggregate> {
        let founders = CompanyStore::get_in(conn, company_id)?
            .ok_or(LedgerError::CompanyNotFound(*company_id))?
            .founder_count;

        let mut aggregate = Self::read_in(conn, company_id)?;
        let flag = is_primarily_diverse(&aggregate, founders);
        if flag != aggregate.is_primarily_diverse {
            aggregate.is_primarily_diverse = flag;
            aggregate.updated_at = Utc::now().timestamp_millis();
            conn.execute(
                "UPDATE aggregates SET is_primarily_diverse = ?, updated_at = ? WHERE company_id = ?",
                params![flag, aggregate.updated_at, company_id.to_string()],
            )?;
        }
        Ok(aggregate)
    }
}

/// Applies one submission's increments to an in-memory aggregate.
///
/// Mirrors the SQL issued by [`AggregationLedger::increment_in`].
pub fn apply_selections(aggregate: &mut Aggregate, selections: &Selections) {
    aggregate.total_responses += 1;
    if selections.is_decline_all() {
        aggregate.total_declined_all += 1;
        return;
    }
    for category in selections.categories() {
        *aggregate.counts.entry(category).or_insert(0) += 1;
    }
    if selections.has_diverse_identity() {
        aggregate.diverse_responders += 1;
    }
}

fn bump(column: &str) -> String {
    format!("{column} = {column} + 1")
}

fn select_columns() -> String {
    let mut columns: Vec<&str> = Category::ALL.iter().map(|c| c.column()).collect();
    columns.extend([
        "total_responses",
        "total_declined_all",
        "diverse_responders",
        "is_primarily_diverse",
        "updated_at",
    ]);
    columns.join(", ")
}

fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}
