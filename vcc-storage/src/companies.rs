//! Portfolio company persistence.
//!
//! Companies are never deleted; they are the referential target of both the
//! aggregate and the individual records.

use crate::Database;
use crate::error::StorageResult;
use duckdb::{params, Connection};
use vcc_types::{Company, CompanyId};

const COMPANY_COLUMNS: &str = "id, name, investment_year, founder_count, survey_token, created_at";

/// Reads and writes the `companies` table.
#[derive(Clone)]
pub struct CompanyStore {
    db: Database,
}

impl CompanyStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a company inside the caller's transaction.
    pub fn insert_in(conn: &Connection, company: &Company) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO companies (id, name, investment_year, founder_count, survey_token, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                company.id.to_string(),
                company.name,
                company.investment_year,
                i64::from(company.founder_count),
                company.survey_token,
                company.created_at,
            ],
        )?;
        Ok(())
    }

    /// Looks up a company inside the caller's transaction.
    pub fn get_in(conn: &Connection, id: &CompanyId) -> StorageResult<Option<Company>> {
        let result = conn.query_row(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?"),
            params![id.to_string()],
            row_to_company,
        );
        optional(result)
    }

    /// Updates the declared founder count. Returns false when the company
    /// does not exist.
    pub fn set_founder_count_in(
        conn: &Connection,
        id: &CompanyId,
        founder_count: u32,
    ) -> StorageResult<bool> {
        let affected = conn.execute(
            "UPDATE companies SET founder_count = ? WHERE id = ?",
            params![i64::from(founder_count), id.to_string()],
        )?;
        Ok(affected > 0)
    }

    pub fn get(&self, id: &CompanyId) -> StorageResult<Option<Company>> {
        let conn = self.db.connection()?;
        Self::get_in(&conn, id)
    }

    /// Resolves a survey token to its company.
    pub fn get_by_token(&self, token: &str) -> StorageResult<Option<Company>> {
        let conn = self.db.connection()?;
        let result = conn.query_row(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE survey_token = ?"),
            params![token],
            row_to_company,
        );
        optional(result)
    }

    /// All companies, newest investment year first, then by name.
    pub fn list(&self) -> StorageResult<Vec<Company>> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY investment_year DESC, name"
        ))?;
        let companies = stmt
            .query_map([], row_to_company)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }

    /// Companies of one investment year, by name.
    pub fn list_by_year(&self, investment_year: i32) -> StorageResult<Vec<Company>> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE investment_year = ? ORDER BY name"
        ))?;
        let companies = stmt
            .query_map(params![investment_year], row_to_company)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }
}

fn row_to_company(row: &duckdb::Row<'_>) -> duckdb::Result<Company> {
    let id: String = row.get(0)?;
    let founder_count: i64 = row.get(3)?;

    Ok(Company {
        id: parse_id(&id, 0)?,
        name: row.get(1)?,
        investment_year: row.get(2)?,
        founder_count: u32::try_from(founder_count).unwrap_or(0),
        survey_token: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Maps "no rows" to `None`.
pub fn optional<T>(result: duckdb::Result<T>) -> StorageResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Parses a stored id column, reporting corruption as a conversion failure.
pub fn parse_id<T>(raw: &str, column: usize) -> duckdb::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        duckdb::Error::FromSqlConversionFailure(column, duckdb::types::Type::Text, Box::new(e))
    })
}
