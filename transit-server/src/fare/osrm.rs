//! OSRM road distance client.
//!
//! Asks an OSRM `route` service for the driving distance between two
//! points. Every failure mode (network, status, body shape, "no route")
//! surfaces as a [`DistanceError`].

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::RoadDistance;
use super::error::DistanceError;

/// Public OSRM demo server.
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM HTTP API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted router).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Metres
    distance: f64,
}

/// Extract the first route's distance in kilometres from an OSRM body.
fn parse_route_response(body: &str) -> Result<f64, DistanceError> {
    let parsed: RouteResponse =
        serde_json::from_str(body).map_err(|e| DistanceError::Malformed(e.to_string()))?;
    if parsed.code != "Ok" {
        return Err(DistanceError::NoRoute(
            parsed.message.unwrap_or(parsed.code),
        ));
    }
    let route = parsed
        .routes
        .first()
        .ok_or_else(|| DistanceError::Malformed("no routes in response".to_string()))?;
    if !route.distance.is_finite() || route.distance < 0.0 {
        return Err(DistanceError::Malformed(format!(
            "distance {} is not a length",
            route.distance
        )));
    }
    Ok(route.distance / 1000.0)
}

/// OSRM HTTP client.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, DistanceError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_km(&self, from: Coordinates, to: Coordinates) -> Result<f64, DistanceError> {
        // OSRM takes lon,lat pairs
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url,
            from.lon(),
            from.lat(),
            to.lon(),
            to.lat()
        );

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "false")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DistanceError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await?;
        let km = parse_route_response(&body)?;
        debug!(km, "osrm distance");
        Ok(km)
    }
}

impl RoadDistance for OsrmClient {
    fn driving_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl Future<Output = Result<f64, DistanceError>> + Send {
        self.fetch_km(from, to)
    }
}
