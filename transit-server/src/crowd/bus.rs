//! Crowd outlook for a bus's next departure.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::CalendarValidator;
use crate::domain::BusId;
use crate::error::CoreError;
use crate::schedule::{ReportStore, ScheduleStore};

use super::{CrowdOutlook, Sample, predict};

/// Predicts how crowded a bus will be on its next trip today.
pub struct BusCrowdPredictor<'a> {
    schedule: &'a dyn ScheduleStore,
    reports: &'a dyn ReportStore,
}

impl<'a> BusCrowdPredictor<'a> {
    pub fn new(schedule: &'a dyn ScheduleStore, reports: &'a dyn ReportStore) -> Self {
        Self { schedule, reports }
    }

    /// Outlook for `bus_id`'s next departure after `now`.
    ///
    /// Unknown and inactive buses are both `NotFound`.
    pub fn predict(&self, bus_id: BusId, now: &DateTime<Tz>) -> Result<CrowdOutlook, CoreError> {
        match self.schedule.bus_by_id(bus_id)? {
            Some(bus) if bus.is_active => {}
            _ => return Err(CoreError::NotFound(format!("active bus {bus_id}"))),
        }

        let Some(next) = CalendarValidator::new(self.schedule).next_trip(bus_id, now)? else {
            return Ok(CrowdOutlook::NoUpcomingTrip);
        };

        let tz = now.timezone();
        let samples: Vec<Sample> = self
            .reports
            .crowd_submissions_for_bus(bus_id)?
            .into_iter()
            .map(|s| {
                let local = s.timestamp.with_timezone(&tz);
                Sample {
                    weekday: local.weekday(),
                    hour: local.hour(),
                    level: s.level,
                }
            })
            .collect();

        let outlook = predict(&samples, now.weekday(), next.departure_time.hour());
        debug!(%bus_id, trip = %next.id, reports = samples.len(), ?outlook, "bus crowd outlook");
        Ok(outlook)
    }
}
