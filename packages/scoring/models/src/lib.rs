#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Impact metric, insight and score bucket types.
//!
//! Shared by the scoring engine, the report exporters and the dashboard
//! server's view models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Unit of an impact metric. Determines how the raw value is normalized
/// onto the common 0-100 scale.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum MetricUnit {
    /// A percentage, already on the 0-100 scale.
    #[serde(rename = "%")]
    #[strum(serialize = "%")]
    Percent,
    /// A count of independent sources (suppliers, water sources, ...).
    #[serde(rename = "sources")]
    #[strum(serialize = "sources")]
    Sources,
    /// A duration in months (e.g. cash reserves).
    #[serde(rename = "months")]
    #[strum(serialize = "months")]
    Months,
    /// A rating out of ten.
    #[serde(rename = "/10")]
    #[strum(serialize = "/10")]
    OutOfTen,
    /// A recovery time in days; lower is better.
    #[serde(rename = "days")]
    #[strum(serialize = "days")]
    Days,
}

/// Category an impact metric contributes to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricCategory {
    Preparedness,
    Financial,
    Infrastructure,
    Community,
}

impl MetricCategory {
    /// Weight of this category in the overall impact score.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Preparedness | Self::Financial => 0.30,
            Self::Infrastructure => 0.25,
            Self::Community => 0.15,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Preparedness,
            Self::Financial,
            Self::Infrastructure,
            Self::Community,
        ]
    }
}

/// A named, unit-tagged indicator used as input to the overall impact
/// score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMetric {
    /// Stable identifier (e.g. `"crop_insurance"`).
    pub id: String,
    /// Display name (e.g. "Crop Insurance Coverage").
    pub name: String,
    /// Raw value in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: MetricUnit,
    /// Change since the previous period, in `unit`.
    pub change: f64,
    /// Category this metric is aggregated under.
    pub category: MetricCategory,
}

/// A resilience activity or event with a measured impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEvent {
    /// Stable identifier.
    pub id: String,
    /// What happened (e.g. "Installed backup generator").
    pub title: String,
    /// When it happened.
    pub date: NaiveDate,
    /// Impact score attributed to the event.
    pub impact_score: f64,
}

/// Kind of generated insight.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InsightCategory {
    Strength,
    Improvement,
    Trend,
    Warning,
    Effectiveness,
    Sector,
    Benchmark,
}

/// A human-readable observation derived from metrics and events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Kind of insight.
    pub category: InsightCategory,
    /// Short heading (e.g. "Strongest Area").
    pub title: String,
    /// Full sentence(s) of explanation.
    pub description: String,
}

/// Color token attached to a score bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColorToken {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    /// Neutral color used when there is no data.
    Gray,
}

impl ColorToken {
    /// Hex color used by the frontend for this token.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#22c55e",
            Self::Blue => "#3b82f6",
            Self::Yellow => "#eab308",
            Self::Orange => "#f97316",
            Self::Red => "#ef4444",
            Self::Gray => "#9ca3af",
        }
    }
}

/// The call site a score is being bucketed for. Each context has its own
/// threshold table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BucketContext {
    /// County choropleth map.
    Map,
    /// Score card for risk-direction sub-scores (lower is better).
    CardRisk,
    /// Score card for resilience-direction scores (higher is better).
    CardResilience,
    /// Hazard list rows.
    HazardList,
}

impl BucketContext {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Map,
            Self::CardRisk,
            Self::CardResilience,
            Self::HazardList,
        ]
    }
}

/// The tier and color a score falls into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Tier label, or `None` when there is no data.
    pub tier: Option<String>,
    /// Color token.
    pub color: ColorToken,
}

impl Bucket {
    /// The neutral bucket for a missing score.
    #[must_use]
    pub const fn no_data() -> Self {
        Self {
            tier: None,
            color: ColorToken::Gray,
        }
    }

    /// Whether this is the no-data bucket.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        self.tier.is_none()
    }
}
