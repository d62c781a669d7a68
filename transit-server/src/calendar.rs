//! Service calendar: does a trip run on a given date?
//!
//! A trip runs on a date when the date's weekday is one of its service days
//! and no exclusion cancels it for that date. Every query that filters trips
//! by day goes through [`CalendarValidator`]; nothing else checks service
//! days or exclusions on its own.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

use crate::domain::{BusId, Trip};
use crate::error::CoreError;
use crate::schedule::ScheduleStore;

/// Service days and exclusions of one trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripCalendar {
    service_days: HashSet<Weekday>,
    exclusions: HashSet<NaiveDate>,
}

impl TripCalendar {
    pub fn new(
        service_days: impl IntoIterator<Item = Weekday>,
        exclusions: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            service_days: service_days.into_iter().collect(),
            exclusions: exclusions.into_iter().collect(),
        }
    }

    /// True iff the weekday is a service day and the date is not excluded.
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.service_days.contains(&date.weekday()) && !self.exclusions.contains(&date)
    }
}

/// Checks trips against the service calendar held by a store.
pub struct CalendarValidator<'a> {
    store: &'a dyn ScheduleStore,
}

impl<'a> CalendarValidator<'a> {
    pub fn new(store: &'a dyn ScheduleStore) -> Self {
        Self { store }
    }

    /// Load the calendar of one trip.
    pub fn calendar(&self, trip: &Trip) -> Result<TripCalendar, CoreError> {
        Ok(TripCalendar::new(
            self.store.service_days_for(trip.id)?,
            self.store.exclusions_for(trip.id)?,
        ))
    }

    /// Does `trip` run on `date`?
    pub fn is_active(&self, trip: &Trip, date: NaiveDate) -> Result<bool, CoreError> {
        Ok(self.calendar(trip)?.is_active(date))
    }

    /// The bus's trip currently under way: the latest trip running today
    /// whose departure time is at or before `now`.
    pub fn current_trip(&self, bus_id: BusId, now: &DateTime<Tz>) -> Result<Option<Trip>, CoreError> {
        let today = now.date_naive();
        let time = now.time();
        self.pick_trip(bus_id, today, |departure| departure <= time, Pick::Latest)
    }

    /// The bus's next trip today departing strictly after `now`.
    pub fn next_trip(&self, bus_id: BusId, now: &DateTime<Tz>) -> Result<Option<Trip>, CoreError> {
        let today = now.date_naive();
        let time = now.time();
        self.pick_trip(bus_id, today, |departure| departure > time, Pick::Earliest)
    }

    fn pick_trip(
        &self,
        bus_id: BusId,
        date: NaiveDate,
        accept: impl Fn(NaiveTime) -> bool,
        pick: Pick,
    ) -> Result<Option<Trip>, CoreError> {
        let mut best: Option<Trip> = None;
        for trip in self.store.trips_for_bus(bus_id)? {
            if !accept(trip.departure_time) || !self.is_active(&trip, date)? {
                continue;
            }
            let better = match (&best, pick) {
                (None, _) => true,
                (Some(b), Pick::Latest) => trip.departure_time > b.departure_time,
                (Some(b), Pick::Earliest) => trip.departure_time < b.departure_time,
            };
            if better {
                best = Some(trip);
            }
        }
        Ok(best)
    }
}

#[derive(Clone, Copy)]
enum Pick {
    Latest,
    Earliest,
}
