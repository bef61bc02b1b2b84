//! Per-company submission locks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use vcc_types::CompanyId;

/// Thread-safe registry of one mutex per company.
///
/// Writers for the same company queue on its mutex; writers for different
/// companies never share one.
#[derive(Clone, Default)]
pub struct CompanyLocks {
    locks: Arc<Mutex<HashMap<CompanyId, Arc<Mutex<()>>>>>,
}

impl CompanyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `company_id`, created on first use.
    pub fn lock_for(&self, company_id: &CompanyId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(*company_id).or_default().clone()
    }

    /// Number of companies that have been locked at least once.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
