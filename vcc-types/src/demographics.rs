//! Closed demographic enumerations.
//!
//! Every [`Category`] maps to exactly one fixed aggregate column. Adding a
//! category is a schema change, never a runtime decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Gender,
    Race,
    Lgbtq,
    Disability,
    Veteran,
    CaResident,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Gender,
        Dimension::Race,
        Dimension::Lgbtq,
        Dimension::Disability,
        Dimension::Veteran,
        Dimension::CaResident,
    ];

    /// Wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Gender => "gender",
            Dimension::Race => "race",
            Dimension::Lgbtq => "lgbtq",
            Dimension::Disability => "disability",
            Dimension::Veteran => "veteran",
            Dimension::CaResident => "ca_resident",
        }
    }

    /// Gender and race allow several answers; everything else allows one.
    pub fn is_multi_select(self) -> bool {
        matches!(self, Dimension::Gender | Dimension::Race)
    }

    /// All categories belonging to this dimension, in column order.
    pub fn categories(self) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |c| c.dimension() == self)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answer to one [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    GenderWoman,
    GenderMan,
    GenderNonbinary,
    GenderTransgender,
    GenderOther,
    GenderDeclined,
    RaceBlack,
    RaceAsian,
    RaceHispanic,
    RaceNativeAmerican,
    RacePacificIslander,
    RaceWhite,
    RaceOther,
    RaceDeclined,
    LgbtqYes,
    LgbtqNo,
    LgbtqDeclined,
    DisabilityYes,
    DisabilityNo,
    DisabilityDeclined,
    VeteranYes,
    VeteranDisabled,
    VeteranNo,
    VeteranDeclined,
    CaResidentYes,
    CaResidentNo,
    CaResidentDeclined,
}

struct CategoryInfo {
    dimension: Dimension,
    wire: &'static str,
    column: &'static str,
    label: &'static str,
    diverse: bool,
}

const fn info(
    dimension: Dimension,
    wire: &'static str,
    column: &'static str,
    label: &'static str,
    diverse: bool,
) -> CategoryInfo {
    CategoryInfo {
        dimension,
        wire,
        column,
        label,
        diverse,
    }
}

impl Category {
    pub const ALL: [Category; 27] = [
        Category::GenderWoman,
        Category::GenderMan,
        Category::GenderNonbinary,
        Category::GenderTransgender,
        Category::GenderOther,
        Category::GenderDeclined,
        Category::RaceBlack,
        Category::RaceAsian,
        Category::RaceHispanic,
        Category::RaceNativeAmerican,
        Category::RacePacificIslander,
        Category::RaceWhite,
        Category::RaceOther,
        Category::RaceDeclined,
        Category::LgbtqYes,
        Category::LgbtqNo,
        Category::LgbtqDeclined,
        Category::DisabilityYes,
        Category::DisabilityNo,
        Category::DisabilityDeclined,
        Category::VeteranYes,
        Category::VeteranDisabled,
        Category::VeteranNo,
        Category::VeteranDeclined,
        Category::CaResidentYes,
        Category::CaResidentNo,
        Category::CaResidentDeclined,
    ];

    fn info(self) -> CategoryInfo {
        use Dimension::*;
        match self {
            Category::GenderWoman => info(Gender, "woman", "gender_woman", "Gender: Woman", true),
            Category::GenderMan => info(Gender, "man", "gender_man", "Gender: Man", false),
            Category::GenderNonbinary => {
                info(Gender, "nonbinary", "gender_nonbinary", "Gender: Nonbinary", true)
            }
            Category::GenderTransgender => info(
                Gender,
                "transgender",
                "gender_transgender",
                "Gender: Transgender",
                true,
            ),
            Category::GenderOther => {
                info(Gender, "none", "gender_other", "Gender: None of the Above", false)
            }
            Category::GenderDeclined => {
                info(Gender, "decline", "gender_declined", "Gender: Declined", false)
            }
            Category::RaceBlack => {
                info(Race, "black", "race_black", "Race: Black/African American", true)
            }
            Category::RaceAsian => info(Race, "asian", "race_asian", "Race: Asian", true),
            Category::RaceHispanic => {
                info(Race, "hispanic", "race_hispanic", "Race: Hispanic/Latino", true)
            }
            Category::RaceNativeAmerican => info(
                Race,
                "native_american",
                "race_native_american",
                "Race: Native American",
                true,
            ),
            Category::RacePacificIslander => info(
                Race,
                "pacific_islander",
                "race_pacific_islander",
                "Race: Pacific Islander",
                true,
            ),
            Category::RaceWhite => info(Race, "white", "race_white", "Race: White", false),
            Category::RaceOther => info(Race, "none", "race_other", "Race: None of the Above", false),
            Category::RaceDeclined => info(Race, "decline", "race_declined", "Race: Declined", false),
            Category::LgbtqYes => info(Lgbtq, "yes", "lgbtq_yes", "LGBTQ+: Yes", true),
            Category::LgbtqNo => info(Lgbtq, "no", "lgbtq_no", "LGBTQ+: No", false),
            Category::LgbtqDeclined => {
                info(Lgbtq, "decline", "lgbtq_declined", "LGBTQ+: Declined", false)
            }
            Category::DisabilityYes => {
                info(Disability, "yes", "disability_yes", "Disability: Yes", true)
            }
            Category::DisabilityNo => info(Disability, "no", "disability_no", "Disability: No", false),
            Category::DisabilityDeclined => info(
                Disability,
                "decline",
                "disability_declined",
                "Disability: Declined",
                false,
            ),
            Category::VeteranYes => info(Veteran, "veteran", "veteran_yes", "Veteran", true),
            Category::VeteranDisabled => info(
                Veteran,
                "disabled_veteran",
                "veteran_disabled",
                "Disabled Veteran",
                true,
            ),
            Category::VeteranNo => info(Veteran, "no", "veteran_no", "Veteran: No", false),
            Category::VeteranDeclined => {
                info(Veteran, "decline", "veteran_declined", "Veteran: Declined", false)
            }
            Category::CaResidentYes => {
                info(CaResident, "yes", "ca_resident_yes", "CA Resident: Yes", false)
            }
            Category::CaResidentNo => {
                info(CaResident, "no", "ca_resident_no", "CA Resident: No", false)
            }
            Category::CaResidentDeclined => info(
                CaResident,
                "decline",
                "ca_resident_declined",
                "CA Resident: Declined",
                false,
            ),
        }
    }

    pub fn dimension(self) -> Dimension {
        self.info().dimension
    }

    /// The answer as submitted by the survey form (e.g. `"disabled_veteran"`).
    pub fn wire_name(self) -> &'static str {
        self.info().wire
    }

    /// Aggregate column holding this category's counter.
    pub fn column(self) -> &'static str {
        self.info().column
    }

    /// Human-readable header for regulator reports.
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Whether the governing statute treats this answer as a diverse identity.
    pub fn is_diverse(self) -> bool {
        self.info().diverse
    }

    /// Whether this is the per-question "decline to state" answer.
    pub fn is_decline(self) -> bool {
        self.info().wire == "decline"
    }

    /// Resolves a submitted answer within a dimension.
    pub fn parse(dimension: Dimension, wire: &str) -> Option<Category> {
        dimension.categories().find(|c| c.wire_name() == wire)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
