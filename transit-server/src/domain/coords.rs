//! Geographic coordinates.

use serde::Serialize;

use super::error::DomainError;

/// A validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Create a point, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(DomainError::InvalidCoordinates(format!(
                "({lat}, {lon}) is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::InvalidCoordinates(format!(
                "({lat}, {lon}) is out of range"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Parse the decimal strings stored on a stop.
    ///
    /// Returns `None` when either part is absent, blank, or not a valid
    /// number; such stops take no part in distance queries.
    pub fn from_decimal_strings(lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        let lat = lat?.trim().parse::<f64>().ok()?;
        let lon = lon?.trim().parse::<f64>().ok()?;
        Self::new(lat, lon).ok()
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}
