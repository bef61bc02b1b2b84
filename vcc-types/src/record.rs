//! Compliance-tier record metadata and the access log.

use crate::ids::{AccessLogId, CompanyId, RecordId};
use serde::{Deserialize, Serialize};

/// Metadata of one encrypted individual record. Never includes the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    pub id: RecordId,
    pub company_id: CompanyId,
    /// Unix millis.
    pub submitted_at: i64,
    /// One-way hash of the submitter's network origin.
    pub origin_hash: String,
    /// Unix millis before which the record must be retained.
    pub retain_until: i64,
}

/// What a compliance retrieval targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum AccessTarget {
    Record(RecordId),
    Company(CompanyId),
}

/// Append-only entry written before every decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub id: AccessLogId,
    pub accessor: String,
    pub reason: String,
    pub company_id: Option<CompanyId>,
    pub record_id: Option<RecordId>,
    /// Unix millis.
    pub accessed_at: i64,
}

impl AccessLogEntry {
    /// What the logged retrieval targeted. A record reference wins over the
    /// company reference it was stored under.
    pub fn target(&self) -> Option<AccessTarget> {
        match (self.record_id, self.company_id) {
            (Some(id), _) => Some(AccessTarget::Record(id)),
            (None, Some(id)) => Some(AccessTarget::Company(id)),
            (None, None) => None,
        }
    }
}
