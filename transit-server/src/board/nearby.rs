//! Upcoming arrivals at the stop nearest a rider.

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::domain::{BusId, Coordinates, Stop};
use crate::error::CoreError;
use crate::geo::NearestStopLocator;
use crate::planner::active_trips;
use crate::schedule::ScheduleStore;

/// One bus due at the stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyArrival {
    pub bus_id: BusId,
    pub bus_name: String,
    pub route_name: String,
    pub direction: String,
    pub arrival_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyArrivals {
    pub nearest_stop: Stop,
    pub arrivals: Vec<NearbyArrival>,
}

/// Find the nearest stop to `point` and list today's remaining arrivals
/// there, earliest first.
///
/// A bus due exactly now is still listed.
pub fn nearby_arrivals(
    store: &dyn ScheduleStore,
    point: Coordinates,
    now: &DateTime<Tz>,
) -> Result<NearbyArrivals, CoreError> {
    let Some(nearest) = NearestStopLocator::new(store).nearest_planar(point)? else {
        return Err(CoreError::NotFound("stop with coordinates".into()));
    };
    let stop = nearest.stop;
    let time = now.time();

    let mut arrivals: Vec<NearbyArrival> = active_trips(store, now.date_naive())?
        .into_iter()
        .filter_map(|t| {
            let visit = t.visit(stop.id)?;
            (visit.arrival_time >= time).then(|| NearbyArrival {
                bus_id: t.bus.id,
                bus_name: t.bus.name.clone(),
                route_name: t.trip.route_name.clone(),
                direction: t.trip.direction.clone(),
                arrival_time: visit.arrival_time,
            })
        })
        .collect();
    arrivals.sort_by(|a, b| a.arrival_time.cmp(&b.arrival_time).then(a.bus_id.cmp(&b.bus_id)));

    debug!(stop_id = %stop.id, arrivals = arrivals.len(), "nearby arrivals");
    Ok(NearbyArrivals {
        nearest_stop: stop,
        arrivals,
    })
}
