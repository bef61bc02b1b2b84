//! Encrypted individual records.
//!
//! Appending needs no key: the caller hands over an already-encrypted blob.

use crate::error::VaultResult;
use duckdb::{params, Connection};
use vcc_storage::{optional, parse_id};
use vcc_types::{CompanyId, RecordId, RecordMeta};

/// An encrypted record ready to be appended.
#[derive(Debug, Clone)]
pub struct NewRecord<'a> {
    pub company_id: CompanyId,
    pub encrypted_payload: &'a [u8],
    pub origin_hash: &'a str,
    /// Unix millis.
    pub submitted_at: i64,
    /// Unix millis.
    pub retain_until: i64,
}

const META_COLUMNS: &str = "id, company_id, submitted_at, origin_hash, retain_until";

pub(crate) fn insert_in(conn: &Connection, record: &NewRecord<'_>) -> VaultResult<RecordId> {
    let id = RecordId::new();
    conn.execute(
        "INSERT INTO individual_records \
         (id, company_id, encrypted_payload, origin_hash, submitted_at, retain_until) \
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            id.to_string(),
            record.company_id.to_string(),
            record.encrypted_payload,
            record.origin_hash,
            record.submitted_at,
            record.retain_until,
        ],
    )?;
    Ok(id)
}

pub(crate) fn fetch_in(
    conn: &Connection,
    id: &RecordId,
) -> VaultResult<Option<(RecordMeta, Vec<u8>)>> {
    let result = conn.query_row(
        &format!("SELECT {META_COLUMNS}, encrypted_payload FROM individual_records WHERE id = ?"),
        params![id.to_string()],
        |row| Ok((row_to_meta(row)?, row.get::<_, Vec<u8>>(5)?)),
    );
    Ok(optional(result)?)
}

pub(crate) fn fetch_company_in(
    conn: &Connection,
    company_id: &CompanyId,
) -> VaultResult<Vec<(RecordMeta, Vec<u8>)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {META_COLUMNS}, encrypted_payload FROM individual_records \
         WHERE company_id = ? ORDER BY submitted_at, id"
    ))?;
    let rows = stmt
        .query_map(params![company_id.to_string()], |row| {
            Ok((row_to_meta(row)?, row.get::<_, Vec<u8>>(5)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn list_meta_in(conn: &Connection, company_id: &CompanyId) -> VaultResult<Vec<RecordMeta>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {META_COLUMNS} FROM individual_records WHERE company_id = ? ORDER BY submitted_at, id"
    ))?;
    let metas = stmt
        .query_map(params![company_id.to_string()], row_to_meta)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(metas)
}

fn row_to_meta(row: &duckdb::Row<'_>) -> duckdb::Result<RecordMeta> {
    let id: String = row.get(0)?;
    let company_id: String = row.get(1)?;
    Ok(RecordMeta {
        id: parse_id(&id, 0)?,
        company_id: parse_id(&company_id, 1)?,
        submitted_at: row.get(2)?,
        origin_hash: row.get(3)?,
        retain_until: row.get(4)?,
    })
}
