//! `reqwest`-backed [`ResilienceApi`] implementation.

use async_trait::async_trait;
use nc_resilience_api_models::{
    ApiEnvelope, AssessRequest, CountyQuery, RankingsQuery, ResilienceStatistics,
};
use nc_resilience_county_models::{
    County, CountyFips, CountyRanking, DisasterRisk, ResilienceScore,
};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};

use crate::{API_URL_ENV, ApiError, DEFAULT_API_URL, ResilienceApi};

/// HTTP client for the resilience API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (trailing slashes are ignored).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from `RESILIENCE_API_URL`, falling back to
    /// [`DEFAULT_API_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        log::info!("Using resilience API at {base_url}");
        Self::new(&base_url)
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned, Q: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        query: Option<&Q>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url}");
        let mut request = self.client.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        parse_response(status, &body)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("POST {url}");
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        parse_response(status, &body)
    }
}

/// Unwraps an enveloped response body.
///
/// A non-2xx status or an error envelope becomes [`ApiError::Api`] with the
/// body's `message`, falling back to the HTTP status reason.
///
/// # Errors
///
/// * [`ApiError::Api`] if the API reported a failure or sent no data
/// * [`ApiError::Decode`] if a 2xx body is not a valid envelope
pub fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ApiEnvelope<serde::de::IgnoredAny>>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                status.canonical_reason().map_or_else(
                    || format!("HTTP {}", status.as_u16()),
                    ToString::to_string,
                )
            });
        log::warn!("Resilience API returned {status}: {message}");
        return Err(ApiError::Api { message });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.is_success() {
        let message = envelope
            .message
            .unwrap_or_else(|| "Request failed".to_string());
        log::warn!("Resilience API reported an error: {message}");
        return Err(ApiError::Api { message });
    }

    envelope
        .data
        .ok_or_else(|| ApiError::api("Response contained no data"))
}

#[async_trait]
impl ResilienceApi for ApiClient {
    async fn list_counties(&self, query: &CountyQuery) -> Result<Vec<County>, ApiError> {
        self.get("/counties", Some(query)).await
    }

    async fn get_county(&self, fips: &CountyFips) -> Result<County, ApiError> {
        self.get::<_, ()>(&format!("/counties/{fips}"), None).await
    }

    async fn get_county_resilience(
        &self,
        fips: &CountyFips,
    ) -> Result<Vec<ResilienceScore>, ApiError> {
        self.get::<_, ()>(&format!("/counties/{fips}/resilience"), None)
            .await
    }

    async fn get_county_risks(&self, fips: &CountyFips) -> Result<Vec<DisasterRisk>, ApiError> {
        self.get::<_, ()>(&format!("/counties/{fips}/risks"), None)
            .await
    }

    async fn rankings(&self, query: &RankingsQuery) -> Result<Vec<CountyRanking>, ApiError> {
        self.get("/resilience/rankings", Some(query)).await
    }

    async fn assess(&self, request: &AssessRequest) -> Result<ResilienceScore, ApiError> {
        self.post("/resilience/assess", request).await
    }

    async fn statistics(&self) -> Result<ResilienceStatistics, ApiError> {
        self.get::<_, ()>("/resilience/statistics", None).await
    }
}
