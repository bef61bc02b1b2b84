//! Portfolio companies.

use crate::ids::CompanyId;
use serde::{Deserialize, Serialize};

/// A portfolio company surveyed under one unguessable token.
///
/// Created once by an operator; only `founder_count` may be corrected later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub investment_year: i32,
    /// Founder count declared by the operator, the response-rate denominator.
    pub founder_count: u32,
    pub survey_token: String,
    /// Unix millis.
    pub created_at: i64,
}

/// One row of the operator's company list. Tier 1 data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub investment_year: i32,
    pub founder_count: u32,
    pub total_responses: u64,
    pub is_primarily_diverse: bool,
}
