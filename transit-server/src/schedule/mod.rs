//! Read access to the bus schedule and rider reports.
//!
//! The query core never touches persistence directly. It asks a
//! [`ScheduleStore`] for flat, point-in-time snapshots of the join shape it
//! needs, and a [`ReportStore`] for the append-only crowd and traffic
//! history. [`MemoryStore`] implements both over a JSON snapshot file.

mod error;
#[cfg(test)]
pub(crate) mod fixture;
mod memory;
mod snapshot;

use chrono::{DateTime, NaiveDate, Utc, Weekday};

use crate::domain::{
    Bus, BusId, CrowdSubmission, NewTrafficBlock, Stop, StopCrowdReport, StopId, StopTime,
    TrafficBlock, TrafficBlockId, Trip, TripId,
};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::Snapshot;

/// Read operations over the schedule.
///
/// Every call returns an owned snapshot; callers never hold store locks.
pub trait ScheduleStore: Send + Sync {
    /// All trips, regardless of bus state.
    fn list_trips(&self) -> Result<Vec<Trip>, StoreError>;

    /// Trips whose owning bus is flagged active.
    fn list_active_trips(&self) -> Result<Vec<Trip>, StoreError>;

    /// Trips owned by one bus.
    fn trips_for_bus(&self, bus_id: BusId) -> Result<Vec<Trip>, StoreError>;

    /// Stop times of a trip, ordered by ascending sequence.
    fn stop_times_for(&self, trip_id: TripId) -> Result<Vec<StopTime>, StoreError>;

    /// Weekdays on which a trip normally runs.
    fn service_days_for(&self, trip_id: TripId) -> Result<Vec<Weekday>, StoreError>;

    /// Dates on which a trip is cancelled.
    fn exclusions_for(&self, trip_id: TripId) -> Result<Vec<NaiveDate>, StoreError>;

    fn stop_by_id(&self, id: StopId) -> Result<Option<Stop>, StoreError>;

    fn bus_by_id(&self, id: BusId) -> Result<Option<Bus>, StoreError>;

    /// All stops, in id order.
    fn list_stops(&self) -> Result<Vec<Stop>, StoreError>;

    /// All buses, in id order.
    fn list_buses(&self) -> Result<Vec<Bus>, StoreError>;
}

/// Append-only rider report history.
pub trait ReportStore: Send + Sync {
    fn crowd_submissions_for_bus(&self, bus_id: BusId)
    -> Result<Vec<CrowdSubmission>, StoreError>;

    fn crowd_reports_for_stop(&self, stop_id: StopId) -> Result<Vec<StopCrowdReport>, StoreError>;

    /// Traffic blocks attributed to a stop and reported at or after `since`.
    fn traffic_blocks_near_stop(
        &self,
        stop_id: StopId,
        since: DateTime<Utc>,
    ) -> Result<Vec<TrafficBlock>, StoreError>;

    fn traffic_block(&self, id: TrafficBlockId) -> Result<Option<TrafficBlock>, StoreError>;

    /// Store a new, unconfirmed traffic block and return it with its id.
    fn append_traffic_block(&self, block: NewTrafficBlock) -> Result<TrafficBlock, StoreError>;

    /// Mark a block confirmed and attribute it to a stop.
    fn confirm_traffic_block(
        &self,
        id: TrafficBlockId,
        nearest_stop: StopId,
    ) -> Result<(), StoreError>;
}
