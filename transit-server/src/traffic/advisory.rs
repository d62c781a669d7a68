//! Traffic advisories for the stops a bus has yet to reach.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::calendar::CalendarValidator;
use crate::domain::{BusId, StopId};
use crate::error::CoreError;
use crate::schedule::{ReportStore, ScheduleStore};

/// An advisory needs strictly more reports than this at one stop.
pub const REPORT_THRESHOLD: usize = 2;

/// How far back reports count.
pub fn lookback() -> Duration {
    Duration::hours(1)
}

/// Traffic level derived from mean severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
}

impl TrafficLevel {
    pub fn from_average(avg: f64) -> Self {
        if avg < 1.5 {
            TrafficLevel::Light
        } else if avg < 2.5 {
            TrafficLevel::Moderate
        } else {
            TrafficLevel::Heavy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrafficLevel::Light => "Light",
            TrafficLevel::Moderate => "Moderate",
            TrafficLevel::Heavy => "Heavy",
        }
    }
}

/// A warning for one upcoming stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficAdvisory {
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub level: TrafficLevel,
    pub description: String,
    /// Rounded to two decimals.
    pub average_severity: f64,
}

/// Builds advisories from recent traffic reports.
pub struct TrafficAdvisoryAggregator<'a> {
    schedule: &'a dyn ScheduleStore,
    reports: &'a dyn ReportStore,
}

impl<'a> TrafficAdvisoryAggregator<'a> {
    pub fn new(schedule: &'a dyn ScheduleStore, reports: &'a dyn ReportStore) -> Self {
        Self { schedule, reports }
    }

    /// Advisories for the stops ahead on the bus's current trip.
    ///
    /// A bus with no trip under way gets no advisories.
    pub fn advisories_for_bus(
        &self,
        bus_id: BusId,
        now: &DateTime<Tz>,
    ) -> Result<Vec<TrafficAdvisory>, CoreError> {
        let Some(trip) = CalendarValidator::new(self.schedule).current_trip(bus_id, now)? else {
            return Ok(Vec::new());
        };

        let since = now.with_timezone(&Utc) - lookback();
        let today = now.date_naive();
        let local_now = now.naive_local();
        let mut advisories = Vec::new();

        for st in self.schedule.stop_times_for(trip.id)? {
            // already passed
            if today.and_time(st.arrival_time) < local_now {
                continue;
            }
            let blocks = self.reports.traffic_blocks_near_stop(st.stop_id, since)?;
            if blocks.len() <= REPORT_THRESHOLD {
                continue;
            }
            let total: u32 = blocks.iter().map(|b| u32::from(b.severity.value())).sum();
            let average = f64::from(total) / blocks.len() as f64;
            let level = TrafficLevel::from_average(average);

            advisories.push(TrafficAdvisory {
                stop_id: st.stop_id,
                stop_sequence: st.sequence,
                level,
                description: format!(
                    "{} traffic reported by {} users ahead.",
                    level.label(),
                    blocks.len()
                ),
                average_severity: (average * 100.0).round() / 100.0,
            });
        }

        debug!(%bus_id, trip = %trip.id, advisories = advisories.len(), "traffic advisories");
        Ok(advisories)
    }
}
