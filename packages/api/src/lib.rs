#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the upstream resilience REST API.
//!
//! [`ResilienceApi`] is the seam the dashboard server and CLI depend on;
//! [`ApiClient`] implements it over HTTP. The [`loaders`] module composes
//! independent calls into concurrent fan-outs.
//!
//! Errors fall into two kinds: the request never completed
//! ([`ApiError::Network`]), or the API answered with a failure
//! ([`ApiError::Api`], message taken verbatim from the response). There are
//! no retries.

pub mod client;
pub mod loaders;

use async_trait::async_trait;
use nc_resilience_api_models::{
    AssessRequest, CountyQuery, RankingsQuery, ResilienceStatistics,
};
use nc_resilience_county_models::{
    County, CountyFips, CountyRanking, DisasterRisk, ResilienceScore,
};
use thiserror::Error;

pub use client::ApiClient;
pub use loaders::{CountyDetails, Overview, load_county_details, load_overview};

/// Upstream base URL used when `RESILIENCE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Environment variable holding the upstream base URL.
pub const API_URL_ENV: &str = "RESILIENCE_API_URL";

/// Errors returned by [`ResilienceApi`] calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status or an error envelope.
    #[error("{message}")]
    Api {
        /// Message from the response body, or the HTTP status reason.
        message: String,
    },

    /// The request did not complete (DNS, connection, TLS, body read).
    #[error("network error")]
    Network(#[from] reqwest::Error),

    /// The API answered 2xx but the body was not the expected shape.
    #[error("Invalid response from resilience API: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Shorthand for an [`ApiError::Api`].
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}

/// The upstream resilience API.
#[async_trait]
pub trait ResilienceApi: Send + Sync {
    /// `GET /counties`
    async fn list_counties(&self, query: &CountyQuery) -> Result<Vec<County>, ApiError>;

    /// `GET /counties/{fips}`
    async fn get_county(&self, fips: &CountyFips) -> Result<County, ApiError>;

    /// `GET /counties/{fips}/resilience`
    async fn get_county_resilience(
        &self,
        fips: &CountyFips,
    ) -> Result<Vec<ResilienceScore>, ApiError>;

    /// `GET /counties/{fips}/risks`
    async fn get_county_risks(&self, fips: &CountyFips) -> Result<Vec<DisasterRisk>, ApiError>;

    /// `GET /resilience/rankings`
    async fn rankings(&self, query: &RankingsQuery) -> Result<Vec<CountyRanking>, ApiError>;

    /// `POST /resilience/assess`
    async fn assess(&self, request: &AssessRequest) -> Result<ResilienceScore, ApiError>;

    /// `GET /resilience/statistics`
    async fn statistics(&self) -> Result<ResilienceStatistics, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_message() {
        let err = ApiError::api("County 99999 not found");
        assert_eq!(err.to_string(), "County 99999 not found");
    }
}
