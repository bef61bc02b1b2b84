//! Shared data model for the VCC founder demographic survey.
//!
//! The survey is split into two tiers that never reference each other:
//!
//! 1. **Operational (Tier 1)**: [`Company`] and its per-company [`Aggregate`]
//!    of category counters. Nothing here identifies an individual founder.
//!
//! 2. **Compliance (Tier 2)**: encrypted individual responses and the
//!    append-only [`AccessLogEntry`] trail written on every decrypt.
//!
//! Demographic answers are modeled as closed enumerations ([`Dimension`],
//! [`Category`]) so the aggregate schema stays fixed and auditable.

mod aggregate;
mod company;
mod demographics;
mod ids;
mod record;
mod submission;

pub use aggregate::Aggregate;
pub use company::{Company, CompanySummary};
pub use demographics::{Category, Dimension};
pub use ids::{AccessLogId, CompanyId, RecordId};
pub use record::{AccessLogEntry, AccessTarget, RecordMeta};
pub use submission::{ResponsePayload, Selections, SurveySubmission, ValidationError};
