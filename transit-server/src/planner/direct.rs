//! Itineraries with no change of bus.

use chrono::NaiveTime;

use crate::domain::StopId;

use super::itinerary::DirectItinerary;
use super::timetable::ActiveTrip;

/// Trips that visit `start` and later `end`, reaching `start` after `now`.
///
/// Sorted by arrival at `start`, earliest first, and capped at `limit`.
pub fn find_direct(
    trips: &[ActiveTrip],
    start: StopId,
    end: StopId,
    now: NaiveTime,
    limit: usize,
) -> Vec<DirectItinerary> {
    let mut found: Vec<DirectItinerary> = trips
        .iter()
        .filter_map(|t| {
            let board = t.visit(start)?;
            let alight = t.visit(end)?;
            if board.sequence >= alight.sequence || board.arrival_time <= now {
                return None;
            }
            Some(DirectItinerary {
                trip_id: t.trip.id,
                bus_id: t.bus.id,
                bus_name: t.bus.name.clone(),
                route_name: t.trip.route_name.clone(),
                direction: t.trip.direction.clone(),
                start_arrival: board.arrival_time,
                end_arrival: alight.arrival_time,
            })
        })
        .collect();

    found.sort_by_key(|d| d.start_arrival);
    found.truncate(limit);
    found
}
