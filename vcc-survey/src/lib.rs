//! VCC founder demographic survey.
//!
//! Founders submit one anonymous survey per portfolio company. Each
//! submission is split at a single point into:
//!
//! - `+1`s on the company's [`Aggregate`](vcc_types::Aggregate), the only
//!   data used for the annual DFPI report
//! - one encrypted individual record in the compliance vault, readable only
//!   through an access-logged retrieval
//!
//! Both halves are committed in one transaction and never reference each
//! other afterwards. [`SurveyService`] is the entry point.

mod config;
mod coordinator;
mod error;
mod export;
mod locks;
mod logging;
mod service;

pub use config::{SurveyConfig, DATABASE_PATH_ENV, ORIGIN_HASH_SALT_ENV};
pub use coordinator::{retention_horizon, SplitCoordinator, SplitSettings};
pub use error::{SurveyError, SurveyResult};
pub use export::{render_report, report_header};
pub use locks::CompanyLocks;
pub use logging::init_logging;
pub use service::{RetrievedResponse, SurveyService};
