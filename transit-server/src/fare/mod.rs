//! Fare estimation between two stops.
//!
//! The fare depends only on the driving distance between the two stops and
//! the class of bus. Distances come from a [`RoadDistance`] service; when it
//! fails the whole estimate fails with `UpstreamUnavailable`.

mod error;
mod osrm;
mod table;

use std::future::Future;

use chrono::NaiveTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{BusId, Coordinates, Stop, StopId};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

pub use error::DistanceError;
pub use osrm::{OsrmClient, OsrmConfig};
pub use table::{FareSchedule, FareTable};

/// Driving distance between two points.
pub trait RoadDistance: Send + Sync {
    fn driving_distance_km(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl Future<Output = Result<f64, DistanceError>> + Send;
}

/// One trip serving the stop pair, with its fare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFare {
    pub bus_id: BusId,
    pub bus_name: String,
    pub is_limited_stop: bool,
    pub route_name: String,
    pub direction: String,
    pub departure_time: NaiveTime,
    pub start_arrival_time: NaiveTime,
    pub end_arrival_time: NaiveTime,
    pub calculated_fare: u32,
}

/// Fare estimate for a stop pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub start_stop_name: String,
    pub end_stop_name: String,
    /// Rounded to two decimals.
    pub distance_km: f64,
    pub routes_found: Vec<RouteFare>,
}

/// Prices every trip that runs from one stop to another.
pub struct FareEstimator<'a, D> {
    store: &'a dyn ScheduleStore,
    distance: &'a D,
    table: &'a FareTable,
}

impl<'a, D: RoadDistance> FareEstimator<'a, D> {
    pub fn new(store: &'a dyn ScheduleStore, distance: &'a D, table: &'a FareTable) -> Self {
        Self {
            store,
            distance,
            table,
        }
    }

    /// Price all trips visiting `start` and later `end`.
    ///
    /// No day or time filter applies: a fare is the same whenever the bus
    /// runs.
    pub async fn routes_between(&self, start: StopId, end: StopId) -> Result<FareQuote, CoreError> {
        let start_stop = self.require_stop(start, "start")?;
        let end_stop = self.require_stop(end, "end")?;
        let from = placed(&start_stop)?;
        let to = placed(&end_stop)?;

        let distance_km = self
            .distance
            .driving_distance_km(from, to)
            .await
            .inspect_err(|e| warn!(%start, %end, error = %e, "road distance unavailable"))?;

        let mut routes = Vec::new();
        for trip in self.store.list_trips()? {
            let stop_times = self.store.stop_times_for(trip.id)?;
            let board = stop_times.iter().find(|st| st.stop_id == start);
            let alight = stop_times.iter().find(|st| st.stop_id == end);
            let (Some(board), Some(alight)) = (board, alight) else {
                continue;
            };
            if board.sequence >= alight.sequence {
                continue;
            }
            let bus = self.store.bus_by_id(trip.bus_id)?.ok_or_else(|| {
                CoreError::Internal(format!("trip {} references missing bus {}", trip.id, trip.bus_id))
            })?;
            routes.push(RouteFare {
                bus_id: bus.id,
                calculated_fare: self.table.fare(distance_km, bus.is_limited_stop),
                bus_name: bus.name,
                is_limited_stop: bus.is_limited_stop,
                route_name: trip.route_name,
                direction: trip.direction,
                departure_time: trip.departure_time,
                start_arrival_time: board.arrival_time,
                end_arrival_time: alight.arrival_time,
            });
        }
        routes.sort_by_key(|r| (r.departure_time, r.bus_id));
        debug!(%start, %end, distance_km, routes = routes.len(), "fare quote");

        Ok(FareQuote {
            start_stop_name: start_stop.name,
            end_stop_name: end_stop.name,
            distance_km: (distance_km * 100.0).round_ties_even() / 100.0,
            routes_found: routes,
        })
    }

    fn require_stop(&self, id: StopId, role: &str) -> Result<Stop, CoreError> {
        self.store
            .stop_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("{role} stop {id}")))
    }
}

fn placed(stop: &Stop) -> Result<Coordinates, CoreError> {
    stop.coordinates().ok_or_else(|| {
        CoreError::Validation(format!(
            "stop {} has no valid latitude/longitude",
            stop.id
        ))
    })
}
