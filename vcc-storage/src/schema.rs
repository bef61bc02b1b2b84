//! Table definitions.

use crate::error::StorageResult;
use duckdb::Connection;
use vcc_types::Category;

/// Creates all survey tables if they do not exist.
///
/// `aggregates` gets one fixed `BIGINT` counter per [`Category`] column.
/// `individual_records` carries a company reference only.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let counter_columns: String = Category::ALL
        .iter()
        .map(|c| format!("{} BIGINT NOT NULL DEFAULT 0,\n", c.column()))
        .collect();

    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL,
            investment_year INTEGER NOT NULL,
            founder_count BIGINT NOT NULL,
            survey_token VARCHAR NOT NULL UNIQUE,
            created_at BIGINT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS aggregates (
            company_id VARCHAR PRIMARY KEY,
            {counter_columns}
            total_responses BIGINT NOT NULL DEFAULT 0,
            total_declined_all BIGINT NOT NULL DEFAULT 0,
            diverse_responders BIGINT NOT NULL DEFAULT 0,
            is_primarily_diverse BOOLEAN NOT NULL DEFAULT FALSE,
            updated_at BIGINT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS individual_records (
            id VARCHAR PRIMARY KEY,
            company_id VARCHAR NOT NULL,
            encrypted_payload BLOB NOT NULL,
            origin_hash VARCHAR NOT NULL,
            submitted_at BIGINT NOT NULL,
            retain_until BIGINT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_records_company ON individual_records(company_id);

        CREATE TABLE IF NOT EXISTS access_log (
            id VARCHAR PRIMARY KEY,
            accessor VARCHAR NOT NULL,
            reason VARCHAR NOT NULL,
            company_id VARCHAR,
            record_id VARCHAR,
            accessed_at BIGINT NOT NULL
        );
        "#
    ))?;
    Ok(())
}
