//! Crowd level predictions from rider reports.
//!
//! Reports near the target hour on the same weekday are preferred. When
//! there are too few of them, every report on that weekday is used instead.
//! With too few of those as well, there is no prediction.

mod bus;
mod stop;

use chrono::Weekday;

use crate::domain::CrowdLevel;

pub use bus::BusCrowdPredictor;
pub use stop::StopCrowdPredictor;

/// Reports needed before a prediction is made.
pub const MIN_SAMPLES: usize = 5;

/// Hours either side of the target hour counted as "near".
pub const HOUR_WINDOW: u32 = 1;

/// Which set of reports a prediction was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Same weekday, within [`HOUR_WINDOW`] of the target hour
    NearHour,
    /// Same weekday, any hour
    Weekday,
}

/// Outcome of a crowd prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum CrowdOutlook {
    /// The bus has no further trip today.
    NoUpcomingTrip,
    /// Fewer than [`MIN_SAMPLES`] reports at both stages.
    InsufficientData { near_hour_count: usize },
    Predicted {
        level: CrowdLevel,
        basis: Basis,
        based_on: usize,
    },
}

impl CrowdOutlook {
    /// Text shown alongside the outcome.
    pub fn description(&self) -> &'static str {
        match self {
            CrowdOutlook::NoUpcomingTrip => "No upcoming trip today",
            CrowdOutlook::InsufficientData { .. } => "Insufficient data",
            CrowdOutlook::Predicted { level, .. } => level.label(),
        }
    }

    /// Advice for the rider, if any.
    pub fn recommendation(&self) -> Option<&'static str> {
        let CrowdOutlook::Predicted { level, basis, .. } = self else {
            return None;
        };
        Some(match (basis, level) {
            (Basis::NearHour, CrowdLevel::High) => {
                "Crowd likely high; consider earlier bus or alternate route"
            }
            (Basis::NearHour, CrowdLevel::Medium) => "Moderate crowd expected",
            (Basis::Weekday, CrowdLevel::High) => {
                "High crowd likely on this bus around this weekday"
            }
            (Basis::Weekday, CrowdLevel::Medium) => "Moderate crowd likely",
            (_, CrowdLevel::Low) => "Likely low crowd",
        })
    }

    pub fn level(&self) -> Option<CrowdLevel> {
        match self {
            CrowdOutlook::Predicted { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Number of reports the outcome rests on.
    pub fn based_on_count(&self) -> usize {
        match self {
            CrowdOutlook::NoUpcomingTrip => 0,
            CrowdOutlook::InsufficientData { near_hour_count } => *near_hour_count,
            CrowdOutlook::Predicted { based_on, .. } => *based_on,
        }
    }
}

/// A report reduced to what prediction needs, in the service timezone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sample {
    pub weekday: Weekday,
    pub hour: u32,
    pub level: CrowdLevel,
}

/// Apply the two-stage rule to `samples` for a target weekday and hour.
pub(crate) fn predict(samples: &[Sample], weekday: Weekday, hour: u32) -> CrowdOutlook {
    let same_day: Vec<&Sample> = samples.iter().filter(|s| s.weekday == weekday).collect();
    // the window does not wrap past midnight
    let near: Vec<&Sample> = same_day
        .iter()
        .copied()
        .filter(|s| s.hour.abs_diff(hour) <= HOUR_WINDOW)
        .collect();

    if near.len() >= MIN_SAMPLES {
        return predicted(&near, Basis::NearHour);
    }
    if same_day.len() >= MIN_SAMPLES {
        return predicted(&same_day, Basis::Weekday);
    }
    CrowdOutlook::InsufficientData {
        near_hour_count: near.len(),
    }
}

fn predicted(samples: &[&Sample], basis: Basis) -> CrowdOutlook {
    let total: u32 = samples.iter().map(|s| u32::from(s.level.value())).sum();
    let mean = f64::from(total) / samples.len() as f64;
    CrowdOutlook::Predicted {
        level: CrowdLevel::from_mean(mean),
        basis,
        based_on: samples.len(),
    }
}
