//! Append-only access log.
//!
//! The only operations are insert and list. There is deliberately no update
//! or delete here, and nothing else in the workspace touches the table.

use crate::error::VaultResult;
use duckdb::{params, Connection};
use vcc_storage::parse_id;
use vcc_types::AccessLogEntry;

pub(crate) fn append_in(conn: &Connection, entry: &AccessLogEntry) -> VaultResult<()> {
    conn.execute(
        "INSERT INTO access_log (id, accessor, reason, company_id, record_id, accessed_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            entry.id.to_string(),
            entry.accessor,
            entry.reason,
            entry.company_id.map(|id| id.to_string()),
            entry.record_id.map(|id| id.to_string()),
            entry.accessed_at,
        ],
    )?;
    Ok(())
}

pub(crate) fn list_in(conn: &Connection) -> VaultResult<Vec<AccessLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, accessor, reason, company_id, record_id, accessed_at \
         FROM access_log ORDER BY accessed_at, id",
    )?;
    let entries = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let company_id: Option<String> = row.get(3)?;
            let record_id: Option<String> = row.get(4)?;
            Ok(AccessLogEntry {
                id: parse_id(&id, 0)?,
                accessor: row.get(1)?,
                reason: row.get(2)?,
                company_id: company_id.map(|s| parse_id(&s, 3)).transpose()?,
                record_id: record_id.map(|s| parse_id(&s, 4)).transpose()?,
                accessed_at: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}
