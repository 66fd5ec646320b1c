//! Nominatim (OpenStreetMap) search client.

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinate;

use super::Geocoder;
use super::error::GeocodeError;

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default User-Agent. Nominatim rejects requests without one.
const DEFAULT_USER_AGENT: &str = "postcode_heatmap";

/// A single search result. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API (defaults to the public instance)
    pub base_url: String,
    /// User-Agent identifying this application
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominatim search API client.
///
/// Requests are made one at a time by the caller; there is no retry or
/// backoff, and the only timeout is the HTTP client's.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for a free-text query, returning the best match if any.
    pub async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(GeocodeError::Blocked);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let places: Vec<Place> = serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

        let Some(place) = places.into_iter().next() else {
            debug!(query, "geocoder found no match");
            return Ok(None);
        };

        let latitude = parse_degrees(&place.lat)?;
        let longitude = parse_degrees(&place.lon)?;
        let coordinate = Coordinate::new(latitude, longitude)?;

        debug!(
            query,
            %coordinate,
            place = place.display_name.as_deref().unwrap_or(""),
            "geocoder match"
        );

        Ok(Some(coordinate))
    }
}

fn parse_degrees(s: &str) -> Result<f64, GeocodeError> {
    s.trim().parse().map_err(|_| GeocodeError::Json {
        message: format!("invalid coordinate component: {s:?}"),
        body: None,
    })
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        self.search(query).await
    }
}
