//! Itineraries with exactly one change of bus.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::domain::StopId;

use super::timetable::ActiveTrip;

/// A valid connection between two trips at a transfer stop.
///
/// Trips are referenced by index into the slice handed to [`find_transfers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub first: usize,
    pub second: usize,
    pub transfer_stop: StopId,
    pub first_departure: NaiveTime,
    pub first_arrival: NaiveTime,
    pub second_departure: NaiveTime,
    pub second_arrival: NaiveTime,
}

impl Connection {
    pub fn wait(&self) -> Duration {
        self.second_departure - self.first_arrival
    }
}

/// Search a rider's transfer options from `start` to `end`.
///
/// The first trip must reach `start` after `now`. The second must leave the
/// transfer stop after `now` and no sooner than `min_transfer` after the
/// first trip gets there. Sorted by final arrival and capped at `limit`.
pub fn find_transfers(
    trips: &[ActiveTrip],
    start: StopId,
    end: StopId,
    today: NaiveDate,
    now: NaiveTime,
    min_transfer: Duration,
    limit: usize,
) -> Vec<Connection> {
    let now = today.and_time(now);

    // second legs: per trip, the stops it calls at before `end`
    let inbound: Vec<(usize, NaiveTime, HashMap<StopId, NaiveTime>)> = trips
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            let alight = t.visit(end)?;
            let origins = t
                .before(alight.sequence)
                .map(|st| (st.stop_id, st.arrival_time))
                .collect();
            Some((i, alight.arrival_time, origins))
        })
        .collect();

    let mut found = Vec::new();
    for (first, t1) in trips.iter().enumerate() {
        let Some(board) = t1.visit(start) else {
            continue;
        };
        if today.and_time(board.arrival_time) <= now {
            continue;
        }
        for hop in t1.after(board.sequence) {
            let ready = today.and_time(hop.arrival_time) + min_transfer;
            for (second, end_arrival, origins) in &inbound {
                if *second == first {
                    continue;
                }
                let Some(&departure) = origins.get(&hop.stop_id) else {
                    continue;
                };
                let leaves = today.and_time(departure);
                if leaves > now && leaves >= ready {
                    found.push(Connection {
                        first,
                        second: *second,
                        transfer_stop: hop.stop_id,
                        first_departure: board.arrival_time,
                        first_arrival: hop.arrival_time,
                        second_departure: departure,
                        second_arrival: *end_arrival,
                    });
                }
            }
        }
    }

    found.sort_by_key(|c| c.second_arrival);
    found.truncate(limit);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TripId;
    use crate::planner::timetable::active_trips;
    use crate::schedule::fixture::ScheduleBuilder;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    /// A to B on trip 1, arriving 07:40. B to C on trip 2, leaving 07:44.
    fn tight_connection() -> Vec<ActiveTrip> {
        let store = ScheduleBuilder::new()
            .bus(1, "Feeder", false)
            .bus(2, "Trunk", false)
            .trip(1, 1, "07:00", &["mon"], &[])
            .calls(1, &[(1, "07:00", 1), (2, "07:40", 2)])
            .trip(2, 2, "07:30", &["mon"], &[])
            .calls(2, &[(2, "07:44", 1), (3, "08:10", 2)])
            .build();
        active_trips(&store, monday()).unwrap()
    }

    #[test]
    fn four_minute_connection_rejected() {
        let trips = tight_connection();
        let found = find_transfers(
            &trips,
            StopId::new(1),
            StopId::new(3),
            monday(),
            t("06:50"),
            Duration::minutes(5),
            5,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn zero_buffer_admits_same_fixture() {
        let trips = tight_connection();
        let found = find_transfers(
            &trips,
            StopId::new(1),
            StopId::new(3),
            monday(),
            t("06:50"),
            Duration::zero(),
            5,
        );
        assert_eq!(found.len(), 1);
        let c = found[0];
        assert_eq!(trips[c.first].trip.id, TripId::new(1));
        assert_eq!(trips[c.second].trip.id, TripId::new(2));
        assert_eq!(c.transfer_stop, StopId::new(2));
        assert_eq!(c.wait(), Duration::minutes(4));
        assert_eq!(c.second_arrival, t("08:10"));
    }

    #[test]
    fn same_trip_never_connects_to_itself() {
        let store = ScheduleBuilder::new()
            .bus(1, "Loop", false)
            .trip(1, 1, "07:00", &["mon"], &[])
            .calls(1, &[(1, "07:00", 1), (2, "07:10", 2), (3, "07:30", 3)])
            .build();
        let trips = active_trips(&store, monday()).unwrap();
        let found = find_transfers(
            &trips,
            StopId::new(1),
            StopId::new(3),
            monday(),
            t("06:00"),
            Duration::zero(),
            5,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn sorted_by_final_arrival_and_capped() {
        let mut builder = ScheduleBuilder::new()
            .bus(1, "Feeder", false)
            .bus(2, "Trunk", false)
            .trip(1, 1, "07:00", &["mon"], &[])
            .calls(1, &[(1, "07:00", 1), (2, "07:20", 2)]);
        // later departures from the transfer stop are added first
        for (i, dep) in ["09:00", "08:40", "08:20", "08:00", "07:50", "07:40", "07:30"]
            .iter()
            .enumerate()
        {
            let id = 10 + i as i64;
            let (h, m) = dep.split_once(':').unwrap();
            let arrive = format!("{:02}:{m}", h.parse::<u32>().unwrap() + 1);
            builder = builder
                .trip(id, 2, *dep, &["mon"], &[])
                .calls(id, &[(2, *dep, 1), (3, arrive.as_str(), 2)]);
        }
        let trips = active_trips(&builder.build(), monday()).unwrap();

        let found = find_transfers(
            &trips,
            StopId::new(1),
            StopId::new(3),
            monday(),
            t("06:00"),
            Duration::minutes(5),
            5,
        );
        let arrivals: Vec<_> = found.iter().map(|c| c.second_arrival).collect();
        assert_eq!(arrivals, vec![t("08:30"), t("08:40"), t("08:50"), t("09:00"), t("09:20")]);
    }

    #[test]
    fn first_leg_must_board_after_now() {
        let trips = tight_connection();
        // trip 1 reaches the start stop at exactly 07:00
        let found = find_transfers(
            &trips,
            StopId::new(1),
            StopId::new(3),
            monday(),
            t("07:00"),
            Duration::zero(),
            5,
        );
        assert!(found.is_empty());
    }
}
