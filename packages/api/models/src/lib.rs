#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire types for the upstream resilience API.
//!
//! Every response is wrapped in an [`ApiEnvelope`]. Field names are
//! `snake_case`, matching the upstream service.

use nc_resilience_county_models::{CountyFips, EntityType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Outcome reported inside the envelope.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// `{ status, data, message?, metadata }` wrapper around every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: ApiStatus,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Free-form metadata (paging, timing). Passed through untouched.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl<T> ApiEnvelope<T> {
    /// A success envelope around `data`.
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data: Some(data),
            message: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// An error envelope carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            data: None,
            message: Some(message.into()),
            metadata: serde_json::Value::Null,
        }
    }

    /// Whether the envelope reports success.
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ApiStatus::Success)
    }
}

/// Filters for `GET /counties`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fips_code: Option<CountyFips>,
    /// Embed each county's resilience scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_scores: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

impl CountyQuery {
    /// All counties with their scores for `entity_type`.
    #[must_use]
    pub const fn with_scores(entity_type: EntityType) -> Self {
        Self {
            name: None,
            fips_code: None,
            include_scores: Some(true),
            entity_type: Some(entity_type),
        }
    }
}

/// Parameters for `GET /resilience/rankings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingsQuery {
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Body of `POST /resilience/assess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessRequest {
    pub county_fips: CountyFips,
    pub entity_type: EntityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_acres: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_crops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
}

impl AssessRequest {
    /// A request with no sector fields.
    #[must_use]
    pub const fn new(county_fips: CountyFips, entity_type: EntityType) -> Self {
        Self {
            county_fips,
            entity_type,
            farm_acres: None,
            primary_crops: Vec::new(),
            employee_count: None,
            business_type: None,
        }
    }
}

/// Score distribution for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub entity_type: EntityType,
    pub count: u32,
    pub mean_score: f64,
    #[serde(default)]
    pub median_score: Option<f64>,
    pub min_score: f64,
    pub max_score: f64,
    #[serde(default)]
    pub std_dev: Option<f64>,
}

/// Response of `GET /resilience/statistics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceStatistics {
    pub total_counties: u32,
    #[serde(default)]
    pub by_entity_type: Vec<ScoreStatistics>,
}

impl ResilienceStatistics {
    /// The distribution for `entity_type`, if reported.
    #[must_use]
    pub fn for_entity_type(&self, entity_type: EntityType) -> Option<&ScoreStatistics> {
        self.by_entity_type
            .iter()
            .find(|s| s.entity_type == entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_metadata() {
        let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"status":"success","data":[1,2],"metadata":{"count":2}}"#,
        )
        .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.data, Some(vec![1, 2]));
        assert_eq!(envelope.metadata["count"], 2);
    }

    #[test]
    fn error_envelope_without_data() {
        let envelope: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":"error","message":"County not found"}"#).unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.message.as_deref(), Some("County not found"));
    }

    #[test]
    fn assess_request_omits_empty_sector_fields() {
        let mut request = AssessRequest::new(
            CountyFips::new("37183").unwrap(),
            EntityType::Agriculture,
        );
        request.farm_acres = Some(120.0);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["county_fips"], "37183");
        assert_eq!(json["entity_type"], "agriculture");
        assert_eq!(json["farm_acres"], 120.0);
        assert!(json.get("primary_crops").is_none());
        assert!(json.get("business_type").is_none());
    }
}
