//! Road proximity check backed by the Overpass API.
//!
//! A traffic report is only plausible if it was made on or next to a road.
//! The check asks Overpass for any `highway` way within 50 metres.

use std::future::Future;

use serde::Deserialize;

use crate::domain::Coordinates;

/// Public Overpass interpreter.
const DEFAULT_URL: &str = "https://overpass-api.de/api/interpreter";

/// Search radius around the reported point, in metres.
const ROAD_RADIUS_M: u32 = 50;

/// Errors from the road proximity service.
#[derive(Debug, thiserror::Error)]
pub enum ProximityError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("overpass returned {status}")]
    Status { status: u16 },

    /// Body did not match the expected shape
    #[error("malformed overpass response: {0}")]
    Malformed(String),
}

/// Is a point on a road?
pub trait RoadProximity: Send + Sync {
    fn is_on_road(&self, point: Coordinates) -> impl Future<Output = Result<bool, ProximityError>> + Send;
}

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OverpassConfig {
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 10,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: String,
}

/// Overpass query for highways near a point.
fn road_query(point: Coordinates) -> String {
    format!(
        "[out:json];way[\"highway\"](around:{ROAD_RADIUS_M},{},{});out center;",
        point.lat(),
        point.lon()
    )
}

fn parse_overpass_response(body: &str) -> Result<bool, ProximityError> {
    let parsed: OverpassResponse =
        serde_json::from_str(body).map_err(|e| ProximityError::Malformed(e.to_string()))?;
    Ok(parsed.elements.iter().any(|e| e.kind == "way"))
}

/// Overpass HTTP client.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    url: String,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, ProximityError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: config.url,
        })
    }

    async fn query(&self, point: Coordinates) -> Result<bool, ProximityError> {
        let response = self
            .http
            .post(&self.url)
            .form(&[("data", road_query(point))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProximityError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_overpass_response(&body)
    }
}

impl RoadProximity for OverpassClient {
    fn is_on_road(&self, point: Coordinates) -> impl Future<Output = Result<bool, ProximityError>> + Send {
        self.query(point)
    }
}
