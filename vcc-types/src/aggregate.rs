//! Per-company operational aggregate.

use crate::demographics::Category;
use crate::ids::CompanyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running counters for one company.
///
/// Holds counts only. No field carries free text or anything derived from a
/// single response, so nothing here can be traced back to an individual
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub company_id: CompanyId,
    /// One entry per [`Category`], zero when never selected.
    pub counts: BTreeMap<Category, u64>,
    pub total_responses: u64,
    pub total_declined_all: u64,
    /// Submissions with at least one diverse answer, counted once each.
    pub diverse_responders: u64,
    pub is_primarily_diverse: bool,
    /// Unix millis of the last mutation.
    pub updated_at: i64,
}

impl Aggregate {
    /// A zeroed aggregate with every category present.
    pub fn empty(company_id: CompanyId) -> Self {
        Self {
            company_id,
            counts: Category::ALL.into_iter().map(|c| (c, 0)).collect(),
            total_responses: 0,
            total_declined_all: 0,
            diverse_responders: 0,
            is_primarily_diverse: false,
            updated_at: 0,
        }
    }

    pub fn count(&self, category: Category) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Responses that answered at least one question.
    pub fn answered_responses(&self) -> u64 {
        self.total_responses.saturating_sub(self.total_declined_all)
    }

    /// `total_responses / founders`, or 0.0 when no founders are declared.
    pub fn response_rate(&self, founder_count: u32) -> f64 {
        if founder_count == 0 {
            return 0.0;
        }
        self.total_responses as f64 / f64::from(founder_count)
    }
}
