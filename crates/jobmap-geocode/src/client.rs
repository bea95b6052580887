//! HTTP client for the Nominatim search API.
//!
//! Wraps `reqwest` with a request throttle, retry on transient failures and
//! typed parsing of `format=jsonv2` results.

use std::time::Duration;

use jobmap_core::{AppConfig, Coordinate, GeoResolver};
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;
use crate::types::SearchHit;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection and pacing settings for [`NominatimClient`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Minimum spacing between two requests, in milliseconds.
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "jobmap/0.1 (job-posting-map)".to_string(),
            timeout_secs: 30,
            min_interval_ms: 1_000,
            max_retries: 3,
            retry_backoff_base_ms: 1_000,
        }
    }
}

impl NominatimConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocoder_url.clone(),
            user_agent: config.geocoder_user_agent.clone(),
            timeout_secs: config.geocoder_timeout_secs,
            min_interval_ms: config.geocoder_min_interval_ms,
            max_retries: config.geocoder_max_retries,
            retry_backoff_base_ms: config.geocoder_retry_backoff_base_ms,
        }
    }
}

/// Client for the Nominatim `search` endpoint.
///
/// Requests are spaced at least `min_interval_ms` apart across all callers
/// sharing the client.
pub struct NominatimClient {
    client: Client,
    search_url: Url,
    min_interval: Duration,
    max_retries: u32,
    retry_backoff_base_ms: u64,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(&config.user_agent)
            .build()?;

        // Exactly one trailing slash, so joining "search" appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            search_url,
            min_interval: Duration::from_millis(config.min_interval_ms),
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
            last_request: Mutex::new(None),
        })
    }

    /// Looks up the best match for `place`.
    ///
    /// Returns `Ok(None)` for a blank query or when the service has no match.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::RateLimited`] or [`GeocodeError::UnexpectedStatus`]
    ///   once retries are exhausted or for a non-retriable status.
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::Deserialize`] if the body is not a result list.
    /// - [`GeocodeError::InvalidCoordinate`] if the hit's coordinates are
    ///   unusable.
    pub async fn search(&self, place: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let query = place.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let hit = retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.search_once(query)
        })
        .await?;

        let Some(hit) = hit else {
            tracing::debug!(place = %query, "geocoder returned no match");
            return Ok(None);
        };

        let coordinate = parse_hit(query, &hit)?;
        tracing::debug!(
            place = %query,
            display_name = hit.display_name.as_deref().unwrap_or(""),
            %coordinate,
            "geocoded"
        );
        Ok(Some(coordinate))
    }

    fn build_search_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }

    async fn search_once(&self, query: &str) -> Result<Option<SearchHit>, GeocodeError> {
        self.throttle().await;

        let url = self.build_search_url(query);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let hits: Vec<SearchHit> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;
        Ok(hits.into_iter().next())
    }

    /// Wait until `min_interval` has passed since the previous request.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

fn parse_hit(place: &str, hit: &SearchHit) -> Result<Coordinate, GeocodeError> {
    let invalid = |reason: String| GeocodeError::InvalidCoordinate {
        place: place.to_string(),
        reason,
    };
    let lat = hit
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("lat '{}': {e}", hit.lat)))?;
    let lng = hit
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("lon '{}': {e}", hit.lon)))?;
    Coordinate::new(lat, lng).map_err(|e| invalid(e.to_string()))
}

impl GeoResolver for NominatimClient {
    type Error = GeocodeError;

    async fn resolve(&self, place: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.search(place).await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
