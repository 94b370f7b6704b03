#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County, resilience score and disaster risk types.
//!
//! These are the records served by the upstream resilience API. The
//! dashboard never creates or mutates them; it fetches, shapes them for
//! display and discards them.

pub mod fips;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use fips::{CountyFips, InvalidFipsError};

/// The sector lens applied to a county's data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityType {
    /// Farms and agricultural operations.
    #[default]
    Agriculture,
    /// Small businesses.
    SmallBusiness,
}

impl EntityType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Agriculture, Self::SmallBusiness]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Agriculture => "Agriculture",
            Self::SmallBusiness => "Small Business",
        }
    }
}

/// Natural hazard categories, keyed by the National Risk Index hazard code.
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
pub enum HazardType {
    #[serde(rename = "HRCN")]
    #[strum(serialize = "HRCN")]
    Hurricane,
    #[serde(rename = "RFLD")]
    #[strum(serialize = "RFLD")]
    RiverineFlooding,
    #[serde(rename = "CFLD")]
    #[strum(serialize = "CFLD")]
    CoastalFlooding,
    #[serde(rename = "DRGT")]
    #[strum(serialize = "DRGT")]
    Drought,
    #[serde(rename = "TRND")]
    #[strum(serialize = "TRND")]
    Tornado,
    #[serde(rename = "WNTW")]
    #[strum(serialize = "WNTW")]
    WinterWeather,
    #[serde(rename = "ISTM")]
    #[strum(serialize = "ISTM")]
    IceStorm,
    #[serde(rename = "WFIR")]
    #[strum(serialize = "WFIR")]
    Wildfire,
    #[serde(rename = "HWAV")]
    #[strum(serialize = "HWAV")]
    HeatWave,
    #[serde(rename = "CWAV")]
    #[strum(serialize = "CWAV")]
    ColdWave,
    #[serde(rename = "HAIL")]
    #[strum(serialize = "HAIL")]
    Hail,
    #[serde(rename = "SWND")]
    #[strum(serialize = "SWND")]
    StrongWind,
    #[serde(rename = "LTNG")]
    #[strum(serialize = "LTNG")]
    Lightning,
    #[serde(rename = "LNDS")]
    #[strum(serialize = "LNDS")]
    Landslide,
    #[serde(rename = "ERQK")]
    #[strum(serialize = "ERQK")]
    Earthquake,
    /// Any code this build does not know about.
    #[serde(other, rename = "OTHER")]
    #[strum(serialize = "OTHER")]
    Other,
}

impl HazardType {
    /// Human-readable hazard name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Hurricane => "Hurricane",
            Self::RiverineFlooding => "Riverine Flooding",
            Self::CoastalFlooding => "Coastal Flooding",
            Self::Drought => "Drought",
            Self::Tornado => "Tornado",
            Self::WinterWeather => "Winter Weather",
            Self::IceStorm => "Ice Storm",
            Self::Wildfire => "Wildfire",
            Self::HeatWave => "Heat Wave",
            Self::ColdWave => "Cold Wave",
            Self::Hail => "Hail",
            Self::StrongWind => "Strong Wind",
            Self::Lightning => "Lightning",
            Self::Landslide => "Landslide",
            Self::Earthquake => "Earthquake",
            Self::Other => "Other Hazard",
        }
    }
}

/// A county record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    /// Five-digit county FIPS code, unique across the dataset.
    pub fips_code: CountyFips,
    /// County name (e.g. "Wake").
    pub name: String,
    /// Population estimate.
    #[serde(default)]
    pub population: Option<u64>,
    /// Land area in square miles.
    #[serde(default)]
    pub area_sq_miles: Option<f64>,
    /// Resilience scores, present when requested with `include_scores`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resilience_scores: Vec<ResilienceScore>,
}

impl County {
    /// The embedded resilience score for `entity_type`, if the API included
    /// one.
    #[must_use]
    pub fn score_for(&self, entity_type: EntityType) -> Option<&ResilienceScore> {
        self.resilience_scores
            .iter()
            .find(|s| s.entity_type == entity_type)
    }
}

/// A county's resilience score for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceScore {
    /// The county this score belongs to.
    pub county_fips: CountyFips,
    /// Sector lens the score was computed for.
    pub entity_type: EntityType,
    /// Overall resilience score (0-100).
    pub overall_score: f64,
    /// Credit risk sub-score (0-100).
    pub credit_risk_component: f64,
    /// Disaster risk sub-score (0-100).
    pub disaster_risk_component: f64,
    /// Supply chain risk sub-score (0-100).
    pub supply_chain_risk_component: f64,
    /// Lower bound of the confidence interval.
    #[serde(default)]
    pub confidence_lower: Option<f64>,
    /// Upper bound of the confidence interval.
    #[serde(default)]
    pub confidence_upper: Option<f64>,
}

/// Expected risk from one hazard in a county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterRisk {
    /// The county this risk belongs to.
    pub county_fips: CountyFips,
    /// Hazard code.
    pub hazard_type: HazardType,
    /// Risk score (0-100); drives sort order and color.
    pub risk_score: f64,
    /// Expected annual loss in dollars.
    #[serde(default)]
    pub annual_loss_expected: Option<f64>,
    /// Rating label assigned upstream (e.g. "Relatively High").
    #[serde(default)]
    pub risk_rating: Option<String>,
}

/// One row of the statewide resilience ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRanking {
    /// 1-based position, highest score first.
    pub rank: u32,
    pub county_fips: CountyFips,
    pub county_name: String,
    pub entity_type: EntityType,
    pub overall_score: f64,
}

/// Sorts risks by descending risk score. Ties keep their upstream order.
pub fn sort_risks_descending(risks: &mut [DisasterRisk]) {
    risks.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
}
