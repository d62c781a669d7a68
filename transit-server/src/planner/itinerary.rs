//! Itineraries returned by route search.

use chrono::NaiveTime;
use serde::Serialize;

use crate::domain::{BusId, TripId};

/// One bus that takes the rider from start to end with no change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectItinerary {
    pub trip_id: TripId,
    pub bus_id: BusId,
    pub bus_name: String,
    pub route_name: String,
    pub direction: String,
    pub start_arrival: NaiveTime,
    pub end_arrival: NaiveTime,
}

/// One bus ride within a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferLeg {
    pub trip_id: TripId,
    pub bus_id: BusId,
    pub bus_name: String,
    pub route_name: String,
    pub direction: String,
    pub start_stop_name: String,
    pub end_stop_name: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
}

/// Two rides joined at a transfer stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferItinerary {
    pub first_leg: TransferLeg,
    pub second_leg: TransferLeg,
    pub transfer_at_stop_name: String,
    /// Whole minutes between the two legs, e.g. `"7 min"`.
    pub transfer_wait_time: String,
}

/// Outcome of a route search.
///
/// A search that finds nothing is not an error; it yields [`RouteResponse::NoRoute`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "results", rename_all = "snake_case")]
pub enum RouteResponse {
    Direct(Vec<DirectItinerary>),
    Transfer(Vec<TransferItinerary>),
    #[serde(rename = "none")]
    NoRoute,
}

impl RouteResponse {
    pub fn is_empty(&self) -> bool {
        match self {
            RouteResponse::Direct(r) => r.is_empty(),
            RouteResponse::Transfer(r) => r.is_empty(),
            RouteResponse::NoRoute => true,
        }
    }
}

/// Render a wait as floor minutes.
pub(crate) fn wait_text(wait: chrono::Duration) -> String {
    format!("{} min", wait.num_minutes())
}
