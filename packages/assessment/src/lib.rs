#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Self-assessment wizard and assistance lookups.
//!
//! The wizard is a linear walk over a fixed list of steps with a
//! required-field gate on each step. Finishing it derives risk factors,
//! recommendations and an illustrative adjusted score from the answers.
//! Nothing here is persisted; an assessment lives as long as its caller
//! keeps it.
//!
//! Assistance programs and crisis-mode resources are static registries
//! embedded from TOML files at compile time.

pub mod crisis;
pub mod factors;
pub mod programs;
pub mod wizard;

use std::collections::BTreeMap;

use nc_resilience_county_models::EntityType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use factors::{RiskFactor, assess};
pub use wizard::Wizard;

/// Field ids used by the wizard steps and the derivation rules.
pub mod fields {
    pub const COUNTY: &str = "county";
    pub const FARM_ACRES: &str = "farm_acres";
    pub const PRIMARY_CROPS: &str = "primary_crops";
    pub const EMPLOYEE_COUNT: &str = "employee_count";
    pub const BUSINESS_TYPE: &str = "business_type";
    pub const PREPAREDNESS_LEVEL: &str = "preparedness_level";
    pub const HAS_EMERGENCY_PLAN: &str = "has_emergency_plan";
    pub const INSURANCE_COVERAGE: &str = "insurance_coverage";
    pub const CASH_RESERVE_MONTHS: &str = "cash_reserve_months";
    pub const SUPPLIER_COUNT: &str = "supplier_count";
    pub const PAST_DISASTERS: &str = "past_disasters";
}

/// A single answer to a wizard question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Yes/no question.
    YesNo(bool),
    /// Numeric input or slider.
    Number(f64),
    /// Single selection or free text.
    Text(String),
    /// Multi-select checklist.
    Checklist(Vec<String>),
}

impl Answer {
    /// Whether this answer satisfies a required field: text and selections
    /// must be non-empty, checklists must have at least one item, numbers
    /// must be finite.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            Self::YesNo(_) => true,
            Self::Number(n) => n.is_finite(),
            Self::Text(s) => !s.trim().is_empty(),
            Self::Checklist(items) => !items.is_empty(),
        }
    }

    /// The numeric value, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a yes/no answer.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::YesNo(b) => Some(*b),
            _ => None,
        }
    }

    /// The text value, if this is a selection or free text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The checklist items, if this is a checklist.
    #[must_use]
    pub fn as_checklist(&self) -> Option<&[String]> {
        match self {
            Self::Checklist(items) => Some(items),
            _ => None,
        }
    }
}

/// Answers keyed by field id.
pub type Responses = BTreeMap<String, Answer>;

/// The derived result of a completed self-assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardAssessment {
    /// Sector the assessment was taken for.
    pub entity_type: EntityType,
    /// Raw answers.
    pub responses: Responses,
    /// Risk factors triggered by the answers.
    pub risk_factors: Vec<RiskFactor>,
    /// One recommendation per risk factor, or a general one if none fired.
    pub recommendations: Vec<String>,
    /// Score adjustments keyed by area.
    pub score_modifiers: BTreeMap<String, i32>,
    /// Score the modifiers were applied to.
    pub base_score: f64,
    /// `base_score` plus modifiers, clamped to 0-100.
    pub adjusted_score: u8,
}

/// Errors from driving the wizard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    /// The current step has unanswered required fields.
    #[error("Step '{step}' is missing required answers: {}", .fields.join(", "))]
    MissingRequired {
        /// Step id.
        step: String,
        /// Field ids still unanswered.
        fields: Vec<String>,
    },

    /// No question with this id exists for the wizard's entity type.
    #[error("Unknown question '{field}'")]
    UnknownField {
        /// The rejected field id.
        field: String,
    },

    /// The answer does not fit the question.
    #[error("Invalid answer for '{field}': {message}")]
    InvalidAnswer {
        /// Field id.
        field: String,
        /// What is wrong with the answer.
        message: String,
    },

    /// Tried to advance past the last step.
    #[error("Already on the last step")]
    AtLastStep,
}
