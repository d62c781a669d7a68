//! Crowd outlook at a stop.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;

use crate::domain::StopId;
use crate::error::CoreError;
use crate::schedule::{ReportStore, ScheduleStore};

use super::{CrowdOutlook, Sample, predict};

/// Predicts how crowded a stop is around the current hour.
///
/// Stop reports carry the weekday and local time they describe, so no
/// timezone conversion is needed.
pub struct StopCrowdPredictor<'a> {
    schedule: &'a dyn ScheduleStore,
    reports: &'a dyn ReportStore,
}

impl<'a> StopCrowdPredictor<'a> {
    pub fn new(schedule: &'a dyn ScheduleStore, reports: &'a dyn ReportStore) -> Self {
        Self { schedule, reports }
    }

    pub fn predict(&self, stop_id: StopId, now: &DateTime<Tz>) -> Result<CrowdOutlook, CoreError> {
        if self.schedule.stop_by_id(stop_id)?.is_none() {
            return Err(CoreError::NotFound(format!("stop {stop_id}")));
        }

        let samples: Vec<Sample> = self
            .reports
            .crowd_reports_for_stop(stop_id)?
            .into_iter()
            .map(|r| Sample {
                weekday: r.weekday,
                hour: r.time_of_day.hour(),
                level: r.level,
            })
            .collect();

        Ok(predict(&samples, now.weekday(), now.hour()))
    }
}
