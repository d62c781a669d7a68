//! Nearest-stop lookups.
//!
//! Two metrics are in use. The general "which stop am I at" query compares
//! squared coordinate differences, which is cheap and good enough for ranking
//! stops a few hundred metres apart. The bounded check used when confirming
//! traffic reports needs a real distance to compare against a radius, so it
//! uses the haversine great-circle distance.

use crate::domain::{Coordinates, Stop};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Squared difference in degrees. Only meaningful for ranking.
pub fn planar_squared(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = a.lat() - b.lat();
    let d_lon = a.lon() - b.lon();
    d_lat * d_lat + d_lon * d_lon
}

/// A stop matched to a point, with the distance under the metric used.
#[derive(Debug, Clone, PartialEq)]
pub struct StopMatch {
    pub stop: Stop,
    pub distance: f64,
}

/// Finds the stop closest to a point.
pub struct NearestStopLocator<'a> {
    store: &'a dyn ScheduleStore,
}

impl<'a> NearestStopLocator<'a> {
    pub fn new(store: &'a dyn ScheduleStore) -> Self {
        Self { store }
    }

    /// Closest stop by squared coordinate distance.
    pub fn nearest_planar(&self, point: Coordinates) -> Result<Option<StopMatch>, CoreError> {
        self.closest(point, planar_squared)
    }

    /// Closest stop by haversine distance, if it lies within `max_km`.
    ///
    /// When the closest stop is further than `max_km` there is no match,
    /// even if other stops exist.
    pub fn nearest_within(
        &self,
        point: Coordinates,
        max_km: f64,
    ) -> Result<Option<StopMatch>, CoreError> {
        Ok(self
            .closest(point, haversine_km)?
            .filter(|m| m.distance <= max_km))
    }

    fn closest(
        &self,
        point: Coordinates,
        metric: fn(Coordinates, Coordinates) -> f64,
    ) -> Result<Option<StopMatch>, CoreError> {
        let mut best: Option<StopMatch> = None;
        for stop in self.store.list_stops()? {
            // stops without numeric coordinates are never candidates
            let Some(at) = stop.coordinates() else {
                continue;
            };
            let distance = metric(point, at);
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(StopMatch { stop, distance });
            }
        }
        Ok(best)
    }
}
