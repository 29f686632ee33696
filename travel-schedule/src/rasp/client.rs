//! Schedule API HTTP client.
//!
//! Provides async methods for the three endpoints the app consumes.
//! Every request carries the API key, language and response format.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use super::api::{ScheduleApi, SegmentQuery};
use super::error::RaspError;
use super::types::{AllStationsResponse, CarrierResponse, Segments};

/// Default base URL for the schedule API.
const DEFAULT_BASE_URL: &str = "https://api.rasp.yandex-net.ru";

/// Default response language.
const DEFAULT_LANG: &str = "ru_RU";

/// Default cap on streamed response bodies (50 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Configuration for the schedule API client.
#[derive(Debug, Clone)]
pub struct RaspConfig {
    /// API key passed as the `apikey` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Response language (`lang` parameter)
    pub lang: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum accepted size of a streamed body
    pub max_body_bytes: usize,
}

impl RaspConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the response language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the body size cap.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

/// Schedule API client.
#[derive(Debug, Clone)]
pub struct RaspClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
    max_body_bytes: usize,
}

impl RaspClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RaspConfig) -> Result<Self, RaspError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            lang: config.lang,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Issue a GET with the common query parameters plus `params`.
    async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response, RaspError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("lang", self.lang.as_str()),
                ("format", "json"),
            ])
            .query(params)
            .send()
            .await?;

        Ok(response)
    }

    /// Read the body, refusing to buffer more than the configured cap.
    async fn read_capped(&self, mut response: reqwest::Response) -> Result<Vec<u8>, RaspError> {
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(RaspError::ResponseTooLarge {
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Search scheduled legs between two points.
    ///
    /// A 404 means the API knows no such route on that day; it is reported
    /// as an empty result rather than an error.
    pub async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        let date = query.date_param();
        debug!(from = %query.from, to = %query.to, %date, "searching segments");

        let response = self
            .get(
                "/v3.0/search/",
                &[
                    ("from", query.from.as_str()),
                    ("to", query.to.as_str()),
                    ("date", date.as_str()),
                ],
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Segments::empty());
        }

        let response = check_status(response).await?;
        let body = self.read_capped(response).await?;
        serde_json::from_slice(&body).map_err(|e| RaspError::json(&e, &body))
    }

    /// Fetch the full station listing.
    ///
    /// The API labels this document as HTML, so the body is decoded from raw
    /// bytes regardless of content type.
    pub async fn all_stations(&self) -> Result<AllStationsResponse, RaspError> {
        debug!("fetching all stations");

        let response = self.get("/v3.0/stations_list/", &[]).await?;
        let response = check_status(response).await?;
        let body = self.read_capped(response).await?;

        debug!(bytes = body.len(), "all stations downloaded");
        serde_json::from_slice(&body).map_err(|e| RaspError::json(&e, &body))
    }

    /// Fetch a carrier profile.
    pub async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        debug!(code, "fetching carrier info");

        let response = self.get("/v3.0/carrier/", &[("code", code)]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RaspError::NotFound(format!("carrier {code}")));
        }

        let response = check_status(response).await?;
        let body = self.read_capped(response).await?;
        serde_json::from_slice(&body).map_err(|e| RaspError::json(&e, &body))
    }
}

/// Map non-success statuses to errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RaspError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RaspError::Unauthorized);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RaspError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response)
}

impl ScheduleApi for RaspClient {
    async fn search_segments(&self, query: &SegmentQuery) -> Result<Segments, RaspError> {
        RaspClient::search_segments(self, query).await
    }

    async fn all_stations(&self) -> Result<Arc<AllStationsResponse>, RaspError> {
        RaspClient::all_stations(self).await.map(Arc::new)
    }

    async fn carrier_info(&self, code: &str) -> Result<CarrierResponse, RaspError> {
        RaspClient::carrier_info(self, code).await
    }
}
