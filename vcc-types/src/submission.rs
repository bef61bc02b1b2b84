//! Raw survey submissions and their validated, non-identifying form.

use crate::demographics::{Category, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// One founder's survey submission, exactly as received.
///
/// This is the only type that carries a founder's raw answers. It is consumed
/// at the split point: validated into [`Selections`] for the aggregate and
/// serialized (inside a [`ResponsePayload`]) for encryption. `Debug` is
/// redacted so the answers cannot reach logs by accident.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub company_token: String,
    #[serde(default)]
    pub selections: BTreeMap<Dimension, BTreeSet<String>>,
    #[serde(default)]
    pub decline_all: bool,
}

impl fmt::Debug for SurveySubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveySubmission")
            .field("company_token", &"<redacted>")
            .field("selections", &"<redacted>")
            .field("decline_all", &"<redacted>")
            .finish()
    }
}

/// Rejections raised before any storage effect.
///
/// Messages name the dimension at most, never the submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed submission")]
    Malformed,

    #[error("unknown answer for {0}")]
    UnknownCategory(Dimension),

    #[error("{0} accepts a single answer")]
    MultipleAnswers(Dimension),

    #[error("{0} combines decline with other answers")]
    DeclineCombined(Dimension),

    #[error("submission contains no answers")]
    Empty,

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

impl SurveySubmission {
    /// Checks the submission against the closed enumerations and returns the
    /// categories to count. Nothing identifying survives this step.
    pub fn validate(&self) -> Result<Selections, ValidationError> {
        if self.company_token.trim().is_empty() {
            return Err(ValidationError::Blank("company_token"));
        }

        // Decline-all wins over whatever else the form still carried.
        if self.decline_all {
            return Ok(Selections::declined_all());
        }
        if !self.selections.values().any(|s| !s.is_empty()) {
            return Err(ValidationError::Empty);
        }

        let mut by_dimension = BTreeMap::new();
        for (&dimension, answers) in &self.selections {
            if answers.is_empty() {
                continue;
            }
            if !dimension.is_multi_select() && answers.len() > 1 {
                return Err(ValidationError::MultipleAnswers(dimension));
            }

            let categories = answers
                .iter()
                .map(|a| {
                    Category::parse(dimension, a).ok_or(ValidationError::UnknownCategory(dimension))
                })
                .collect::<Result<BTreeSet<_>, _>>()?;

            if categories.len() > 1 && categories.iter().any(|c| c.is_decline()) {
                return Err(ValidationError::DeclineCombined(dimension));
            }
            by_dimension.insert(dimension, categories);
        }

        Ok(Selections {
            by_dimension,
            decline_all: false,
        })
    }
}

/// Validated answers of one submission, stripped of the company token.
///
/// This is all the aggregation side ever sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selections {
    by_dimension: BTreeMap<Dimension, BTreeSet<Category>>,
    decline_all: bool,
}

impl Selections {
    pub fn declined_all() -> Self {
        Self {
            by_dimension: BTreeMap::new(),
            decline_all: true,
        }
    }

    pub fn is_decline_all(&self) -> bool {
        self.decline_all
    }

    /// Every selected category across all dimensions.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.by_dimension.values().flat_map(|set| set.iter().copied())
    }

    pub fn for_dimension(&self, dimension: Dimension) -> Option<&BTreeSet<Category>> {
        self.by_dimension.get(&dimension)
    }

    /// True when at least one answer is a diverse identity. Counts the
    /// submission once regardless of how many dimensions qualify.
    pub fn has_diverse_identity(&self) -> bool {
        self.categories().any(Category::is_diverse)
    }
}

/// The plaintext that gets encrypted into an individual record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub submission: SurveySubmission,
    /// Unix millis when the submission was accepted.
    pub submitted_at: i64,
}
