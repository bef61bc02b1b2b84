//! Operational (Tier 1) side of the survey split.
//!
//! - [`classifier`] decides the statutory "primarily diverse" flag from
//!   counts alone
//! - [`AggregationLedger`] owns the per-company counters and is the only
//!   writer of the `aggregates` table
//!
//! Nothing here accepts or returns data that identifies a submitter: the
//! ledger is handed validated [`Selections`](vcc_types::Selections), never
//! the raw submission.

pub mod classifier;
mod error;
mod ledger;

pub use classifier::is_primarily_diverse;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{apply_selections, AggregationLedger};
