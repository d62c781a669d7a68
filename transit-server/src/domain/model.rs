//! Schedule and report records as seen by the query core.
//!
//! These are flat, already-validated snapshots handed out by the schedule
//! store. Nothing here lazily loads related rows.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::Serialize;

use super::coords::Coordinates;
use super::district::District;
use super::ids::{BusId, StopId, TrafficBlockId, TripId};
use super::levels::{CrowdLevel, Severity};

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// Raw latitude as stored (decimal string).
    pub latitude: Option<String>,
    /// Raw longitude as stored (decimal string).
    pub longitude: Option<String>,
    pub district: Option<District>,
    pub location_link: Option<String>,
}

impl Stop {
    /// Parsed coordinates, if both parts are present and numeric.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_decimal_strings(self.latitude.as_deref(), self.longitude.as_deref())
    }
}

/// A bus. Limited-stop buses are charged on a separate fare schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    pub registration: String,
    pub is_active: bool,
    pub is_limited_stop: bool,
}

/// One scheduled run of a bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub bus_id: BusId,
    pub route_name: String,
    pub departure_time: NaiveTime,
    pub direction: String,
}

/// A trip's scheduled visit to one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub arrival_time: NaiveTime,
    pub sequence: u32,
}

/// A rider's crowd report for a bus.
#[derive(Debug, Clone, PartialEq)]
pub struct CrowdSubmission {
    pub bus_id: BusId,
    pub level: CrowdLevel,
    pub timestamp: DateTime<Utc>,
}

/// A crowd observation at a stop for a weekday and time of day.
#[derive(Debug, Clone, PartialEq)]
pub struct StopCrowdReport {
    pub stop_id: StopId,
    pub level: CrowdLevel,
    pub weekday: Weekday,
    pub time_of_day: NaiveTime,
    pub description: Option<String>,
}

/// A rider-reported traffic block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficBlock {
    pub id: TrafficBlockId,
    pub description: String,
    pub severity: Severity,
    pub location: Coordinates,
    pub route_name: Option<String>,
    pub nearest_stop_id: Option<StopId>,
    pub is_confirmed: bool,
    pub reported_time: DateTime<Utc>,
}

/// A traffic block that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrafficBlock {
    pub description: String,
    pub severity: Severity,
    pub location: Coordinates,
    pub route_name: Option<String>,
    pub reported_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(lat: Option<&str>, lon: Option<&str>) -> Stop {
        Stop {
            id: StopId::new(1),
            name: "Vyttila".into(),
            latitude: lat.map(String::from),
            longitude: lon.map(String::from),
            district: Some(District::Ernakulam),
            location_link: None,
        }
    }

    #[test]
    fn stop_coordinates() {
        let s = stop(Some("9.9674"), Some("76.3185"));
        let c = s.coordinates().unwrap();
        assert_eq!(c.lat(), 9.9674);

        assert!(stop(None, Some("76.3")).coordinates().is_none());
        assert!(stop(Some("n/a"), Some("76.3")).coordinates().is_none());
    }
}
