//! The trip a bus is running right now, with its stops.

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use serde::Serialize;

use crate::calendar::CalendarValidator;
use crate::domain::{BusId, StopId, Trip};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentTripStop {
    pub stop_id: StopId,
    pub stop_name: String,
    pub arrival_time: NaiveTime,
    pub sequence: u32,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub location_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentTrip {
    pub trip: Trip,
    pub stops: Vec<CurrentTripStop>,
}

/// The bus's trip under way at `now`, stops in visiting order.
///
/// An unknown bus and a bus with nothing running are both `NotFound`.
pub fn current_trip(
    store: &dyn ScheduleStore,
    bus_id: BusId,
    now: &DateTime<Tz>,
) -> Result<CurrentTrip, CoreError> {
    if store.bus_by_id(bus_id)?.is_none() {
        return Err(CoreError::NotFound(format!("bus {bus_id}")));
    }
    let Some(trip) = CalendarValidator::new(store).current_trip(bus_id, now)? else {
        return Err(CoreError::NotFound(format!("running trip for bus {bus_id}")));
    };

    let stops = store
        .stop_times_for(trip.id)?
        .into_iter()
        .map(|st| {
            let stop = store.stop_by_id(st.stop_id)?.ok_or_else(|| {
                CoreError::Internal(format!("trip {} visits missing stop {}", trip.id, st.stop_id))
            })?;
            Ok(CurrentTripStop {
                stop_id: stop.id,
                stop_name: stop.name,
                arrival_time: st.arrival_time,
                sequence: st.sequence,
                latitude: stop.latitude,
                longitude: stop.longitude,
                location_link: stop.location_link,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(CurrentTrip { trip, stops })
}
