#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! JSON view models for the dashboard server.
//!
//! These are shaped for the frontend (`camelCase`, buckets resolved,
//! values pre-formatted) and are separate from the upstream wire types so
//! the two can evolve independently.

use nc_resilience_api_models::ScoreStatistics;
use nc_resilience_assessment::WizardAssessment;
use nc_resilience_assessment::programs::ProgramMatch;
use nc_resilience_assessment::{Responses, crisis::CrisisGuide};
use nc_resilience_county_models::{CountyFips, EntityType, HazardType};
use nc_resilience_scoring_models::{
    Bucket, ColorToken, ImpactEvent, ImpactMetric, Insight, MetricCategory,
};
use serde::{Deserialize, Serialize};

/// Title of the error panel shown when county details fail to load.
pub const COUNTY_LOAD_ERROR_TITLE: &str = "Unable to Load County Data";

/// Message shown in place of a score card when the county has no score.
pub const NO_DATA_MESSAGE: &str = "No resilience data available for this county.";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

/// JSON body of a 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: String,
}

/// Something the user can do from an error panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAction {
    /// Stable action id the frontend dispatches on (e.g. `"reset"`).
    pub id: String,
    pub label: String,
}

impl ApiAction {
    /// Clears the selection so the user can try again.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            id: "reset".to_string(),
            label: "Try Again".to_string(),
        }
    }
}

/// A recoverable error rendered in place of a panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorPanel {
    pub title: String,
    pub message: String,
    pub actions: Vec<ApiAction>,
}

/// `entityType` query parameter shared by most endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeParams {
    #[serde(default)]
    pub entity_type: EntityType,
}

/// Query parameters for the rankings endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsParams {
    #[serde(default)]
    pub entity_type: EntityType,
    pub limit: Option<u32>,
}

/// Query parameters for the programs endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramParams {
    #[serde(default)]
    pub entity_type: EntityType,
    /// Five-digit county FIPS code.
    pub county_fips: Option<String>,
    /// Comma-separated hazard codes (e.g. `"HRCN,RFLD"`).
    pub hazards: Option<String>,
}

/// Query parameters for the crisis endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrisisParams {
    /// Hazard code (e.g. `"HRCN"`).
    pub hazard: Option<String>,
}

/// A score bucket with its color resolved to hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBucket {
    /// Tier label, or `None` for no data.
    pub tier: Option<String>,
    pub color: ColorToken,
    pub hex: String,
}

impl From<Bucket> for ApiBucket {
    fn from(bucket: Bucket) -> Self {
        Self {
            hex: bucket.color.hex().to_string(),
            tier: bucket.tier,
            color: bucket.color,
        }
    }
}

/// One county on the choropleth map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapCounty {
    pub fips_code: CountyFips,
    pub name: String,
    pub score: Option<f64>,
    pub bucket: ApiBucket,
}

/// A legend row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegendEntry {
    pub label: String,
    pub color: ColorToken,
    pub hex: String,
}

/// Response of `GET /api/map`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMap {
    pub entity_type: EntityType,
    pub counties: Vec<ApiMapCounty>,
    pub legend: Vec<ApiLegendEntry>,
}

/// A score-card sub-score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScoreComponent {
    /// Stable key (`credit`, `disaster`, `supply_chain`).
    pub key: String,
    pub label: String,
    pub score: f64,
    /// Risk-direction bucket (lower is better).
    pub bucket: ApiBucket,
}

/// The resilience score card on the details panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScoreCard {
    pub overall_score: f64,
    /// Resilience-direction bucket (higher is better).
    pub overall_bucket: ApiBucket,
    pub components: Vec<ApiScoreComponent>,
    pub confidence_lower: Option<f64>,
    pub confidence_upper: Option<f64>,
}

/// One hazard row on the details panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHazard {
    pub hazard_type: HazardType,
    pub name: String,
    pub risk_score: f64,
    pub annual_loss_expected: Option<f64>,
    pub risk_rating: Option<String>,
    pub bucket: ApiBucket,
}

/// Response of `GET /api/counties/{fips}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCountyDetails {
    pub fips_code: CountyFips,
    pub name: String,
    pub population: Option<u64>,
    pub area_sq_miles: Option<f64>,
    pub entity_type: EntityType,
    /// `None` when the county has no score for `entity_type`.
    pub score_card: Option<ApiScoreCard>,
    /// Set exactly when `score_card` is `None`.
    pub no_data_message: Option<String>,
    /// Highest risk first.
    pub hazards: Vec<ApiHazard>,
}

/// An impact metric with display strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetric {
    #[serde(flatten)]
    pub metric: ImpactMetric,
    pub formatted_value: String,
    pub formatted_change: String,
    /// Value on the common 0-100 scale.
    pub normalized_value: f64,
}

/// Mean normalized score of one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategoryScore {
    pub category: MetricCategory,
    pub score: f64,
    pub weight: f64,
}

/// Response of `GET /api/counties/{fips}/dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    pub fips_code: CountyFips,
    pub county_name: String,
    pub entity_type: EntityType,
    pub overall_score: u8,
    pub overall_bucket: ApiBucket,
    pub metrics: Vec<ApiMetric>,
    pub category_scores: Vec<ApiCategoryScore>,
    pub insights: Vec<Insight>,
    pub events: Vec<ImpactEvent>,
}

/// One row of `GET /api/rankings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRanking {
    pub rank: u32,
    pub fips_code: CountyFips,
    pub county_name: String,
    pub overall_score: f64,
    pub bucket: ApiBucket,
}

/// Count of counties in one map tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTierCount {
    /// Tier label, or `None` for counties without a score.
    pub tier: Option<String>,
    pub color: ColorToken,
    pub count: usize,
}

/// Response of `GET /api/analytics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalytics {
    pub entity_type: EntityType,
    pub total_counties: u32,
    pub scored_counties: usize,
    pub statistics: Option<ScoreStatistics>,
    /// Map tiers in legend order, then counties without data.
    pub distribution: Vec<ApiTierCount>,
    pub top_counties: Vec<ApiMapCounty>,
    pub bottom_counties: Vec<ApiMapCounty>,
}

/// Body of `POST /api/assessment`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAssessmentRequest {
    pub entity_type: EntityType,
    /// Overrides the county picked in the wizard's location step.
    pub county_fips: Option<String>,
    pub responses: Responses,
}

/// Response of `POST /api/assessment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAssessmentResult {
    pub county_fips: Option<CountyFips>,
    /// Whether `assessment.base_score` came from the county's real score.
    pub uses_county_score: bool,
    pub assessment: WizardAssessment,
    pub programs: Vec<ProgramMatch>,
}

/// Response of `GET /api/crisis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCrisis {
    pub hazard: Option<HazardType>,
    pub guides: Vec<CrisisGuide>,
}
