//! Today's runnable trips, joined with their bus and stop times.

use chrono::NaiveDate;

use crate::calendar::CalendarValidator;
use crate::domain::{Bus, StopId, StopTime, Trip};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

/// A trip that runs on the query date with an active bus.
#[derive(Debug, Clone)]
pub struct ActiveTrip {
    pub trip: Trip,
    pub bus: Bus,
    /// Ordered by ascending sequence.
    pub stop_times: Vec<StopTime>,
}

impl ActiveTrip {
    /// This trip's visit to `stop`, if any. A trip visits a stop at most once.
    pub fn visit(&self, stop: StopId) -> Option<&StopTime> {
        self.stop_times.iter().find(|st| st.stop_id == stop)
    }

    /// Visits strictly after `sequence`.
    pub fn after(&self, sequence: u32) -> impl Iterator<Item = &StopTime> {
        self.stop_times.iter().filter(move |st| st.sequence > sequence)
    }

    /// Visits strictly before `sequence`.
    pub fn before(&self, sequence: u32) -> impl Iterator<Item = &StopTime> {
        self.stop_times.iter().filter(move |st| st.sequence < sequence)
    }
}

/// Load every trip that runs on `date` and whose bus is active.
pub fn active_trips(store: &dyn ScheduleStore, date: NaiveDate) -> Result<Vec<ActiveTrip>, CoreError> {
    let calendar = CalendarValidator::new(store);
    let mut trips = Vec::new();

    for trip in store.list_active_trips()? {
        if !calendar.is_active(&trip, date)? {
            continue;
        }
        let bus = store
            .bus_by_id(trip.bus_id)?
            .ok_or_else(|| CoreError::Internal(format!("trip {} references missing bus {}", trip.id, trip.bus_id)))?;
        if !bus.is_active {
            continue;
        }
        let stop_times = store.stop_times_for(trip.id)?;
        trips.push(ActiveTrip { trip, bus, stop_times });
    }

    Ok(trips)
}
