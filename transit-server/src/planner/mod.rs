//! Route search between two stops.
//!
//! Direct itineraries are tried first. Only when none remain does the
//! search look for single-transfer itineraries, and an empty transfer
//! search yields [`RouteResponse::NoRoute`].

mod config;
mod direct;
mod itinerary;
mod timetable;
mod transfer;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::debug;

use crate::domain::{Stop, StopId};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

pub use config::PlannerConfig;
pub use direct::find_direct;
pub use itinerary::{DirectItinerary, RouteResponse, TransferItinerary, TransferLeg};
pub use timetable::{ActiveTrip, active_trips};
pub use transfer::{Connection, find_transfers};

/// Finds itineraries between two stops for a given instant.
pub struct RouteFinder<'a> {
    store: &'a dyn ScheduleStore,
    config: &'a PlannerConfig,
}

impl<'a> RouteFinder<'a> {
    pub fn new(store: &'a dyn ScheduleStore, config: &'a PlannerConfig) -> Self {
        Self { store, config }
    }

    /// Search itineraries from `start` to `end` departing after `now`.
    pub fn find(&self, start: StopId, end: StopId, now: &DateTime<Tz>) -> Result<RouteResponse, CoreError> {
        let start_stop = self.require_stop(start)?;
        let end_stop = self.require_stop(end)?;

        let today = now.date_naive();
        let time = now.time();
        let trips = active_trips(self.store, today)?;

        let direct = find_direct(&trips, start, end, time, self.config.max_direct_results);
        if !direct.is_empty() {
            debug!(%start, %end, found = direct.len(), "direct routes");
            return Ok(RouteResponse::Direct(direct));
        }

        let connections = find_transfers(
            &trips,
            start,
            end,
            today,
            time,
            self.config.min_transfer(),
            self.config.max_transfer_results,
        );
        debug!(%start, %end, found = connections.len(), "transfer routes");
        if connections.is_empty() {
            return Ok(RouteResponse::NoRoute);
        }

        let itineraries = connections
            .iter()
            .map(|c| self.transfer_itinerary(&trips, c, &start_stop, &end_stop))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RouteResponse::Transfer(itineraries))
    }

    fn require_stop(&self, id: StopId) -> Result<Stop, CoreError> {
        self.store
            .stop_by_id(id)?
            .ok_or_else(|| CoreError::NotFound(format!("stop {id}")))
    }

    fn transfer_itinerary(
        &self,
        trips: &[ActiveTrip],
        c: &Connection,
        start: &Stop,
        end: &Stop,
    ) -> Result<TransferItinerary, CoreError> {
        let hub = self.store.stop_by_id(c.transfer_stop)?.ok_or_else(|| {
            CoreError::Internal(format!("stop time references missing stop {}", c.transfer_stop))
        })?;
        let (t1, t2) = (&trips[c.first], &trips[c.second]);

        Ok(TransferItinerary {
            first_leg: leg(t1, &start.name, &hub.name, c.first_departure, c.first_arrival),
            second_leg: leg(t2, &hub.name, &end.name, c.second_departure, c.second_arrival),
            transfer_at_stop_name: hub.name.clone(),
            transfer_wait_time: itinerary::wait_text(c.wait()),
        })
    }
}

fn leg(
    trip: &ActiveTrip,
    from: &str,
    to: &str,
    departure: chrono::NaiveTime,
    arrival: chrono::NaiveTime,
) -> TransferLeg {
    TransferLeg {
        trip_id: trip.trip.id,
        bus_id: trip.bus.id,
        bus_name: trip.bus.name.clone(),
        route_name: trip.trip.route_name.clone(),
        direction: trip.trip.direction.clone(),
        start_stop_name: from.to_string(),
        end_stop_name: to.to_string(),
        departure_time: departure,
        arrival_time: arrival,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::schedule::fixture::ScheduleBuilder;
    use chrono::NaiveTime;

    fn now(local: &str) -> DateTime<Tz> {
        FixedClock::at_local(chrono_tz::Asia::Kolkata, local)
            .unwrap()
            .now()
    }

    fn network() -> ScheduleBuilder {
        ScheduleBuilder::new()
            .stop(1, "Aluva", "10.1004", "76.3570")
            .stop(2, "Edappally", "10.0261", "76.3125")
            .stop(3, "Vyttila", "9.9674", "76.3185")
            .stop(4, "Kakkanad", "10.0159", "76.3419")
            .bus(1, "Aluva Fast", false)
            .bus(2, "Vyttila Local", false)
            .trip(1, 1, "07:00", &["mon"], &[])
            .calls(1, &[(1, "07:00", 1), (2, "07:30", 2)])
            .trip(2, 2, "07:30", &["mon"], &[])
            .calls(2, &[(2, "07:40", 1), (3, "08:05", 2)])
    }

    #[test]
    fn direct_preferred() {
        let store = network().build();
        let config = PlannerConfig::default();
        let finder = RouteFinder::new(&store, &config);

        let RouteResponse::Direct(found) = finder
            .find(StopId::new(1), StopId::new(2), &now("2026-10-19 06:30"))
            .unwrap()
        else {
            panic!("expected direct routes");
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bus_name, "Aluva Fast");
    }

    #[test]
    fn transfer_when_no_direct() {
        let store = network().build();
        let config = PlannerConfig::default();
        let finder = RouteFinder::new(&store, &config);

        let RouteResponse::Transfer(found) = finder
            .find(StopId::new(1), StopId::new(3), &now("2026-10-19 06:30"))
            .unwrap()
        else {
            panic!("expected transfer routes");
        };
        assert_eq!(found.len(), 1);
        let it = &found[0];
        assert_eq!(it.transfer_at_stop_name, "Edappally");
        assert_eq!(it.transfer_wait_time, "10 min");
        assert_eq!(it.first_leg.start_stop_name, "Aluva");
        assert_eq!(it.first_leg.end_stop_name, "Edappally");
        assert_eq!(it.second_leg.start_stop_name, "Edappally");
        assert_eq!(it.second_leg.end_stop_name, "Vyttila");
        assert_eq!(it.second_leg.arrival_time, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
    }

    #[test]
    fn tight_transfer_is_no_route() {
        let store = ScheduleBuilder::new()
            .stop(1, "A", "10.0", "76.0")
            .stop(2, "B", "10.1", "76.1")
            .stop(3, "C", "10.2", "76.2")
            .bus(1, "One", false)
            .bus(2, "Two", false)
            .trip(1, 1, "07:00", &["mon"], &[])
            .calls(1, &[(1, "07:00", 1), (2, "07:40", 2)])
            .trip(2, 2, "07:30", &["mon"], &[])
            .calls(2, &[(2, "07:44", 1), (3, "08:10", 2)])
            .build();
        let at = now("2026-10-19 06:50");

        let config = PlannerConfig::default();
        let result = RouteFinder::new(&store, &config)
            .find(StopId::new(1), StopId::new(3), &at)
            .unwrap();
        assert_eq!(result, RouteResponse::NoRoute);
        assert!(result.is_empty());

        let relaxed = PlannerConfig::new(10, 5, 0);
        let result = RouteFinder::new(&store, &relaxed)
            .find(StopId::new(1), StopId::new(3), &at)
            .unwrap();
        let RouteResponse::Transfer(found) = result else {
            panic!("expected a transfer once the buffer is removed");
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transfer_wait_time, "4 min");
    }

    #[test]
    fn unknown_stop_is_not_found() {
        let store = network().build();
        let config = PlannerConfig::default();
        let err = RouteFinder::new(&store, &config)
            .find(StopId::new(1), StopId::new(99), &now("2026-10-19 06:30"))
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn nothing_runs_on_sunday() {
        let store = network().build();
        let config = PlannerConfig::default();
        let result = RouteFinder::new(&store, &config)
            .find(StopId::new(1), StopId::new(2), &now("2026-10-18 06:30"))
            .unwrap();
        assert_eq!(result, RouteResponse::NoRoute);
    }
}
