//! Ordinal levels reported by riders: crowding and traffic severity.

use std::fmt;

use serde::{Serialize, Serializer};

use super::error::DomainError;

/// A 3-point crowd occupancy estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrowdLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl CrowdLevel {
    /// Returns the persisted numeric value (1..=3).
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CrowdLevel::Low => "Low",
            CrowdLevel::Medium => "Medium",
            CrowdLevel::High => "High",
        }
    }

    /// The level nearest to a mean of reported levels.
    ///
    /// Halves round to even, then the result is clamped into 1..=3.
    pub fn from_mean(mean: f64) -> Self {
        match mean.round_ties_even() {
            r if r <= 1.0 => CrowdLevel::Low,
            r if r >= 3.0 => CrowdLevel::High,
            _ => CrowdLevel::Medium,
        }
    }
}

impl TryFrom<i64> for CrowdLevel {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CrowdLevel::Low),
            2 => Ok(CrowdLevel::Medium),
            3 => Ok(CrowdLevel::High),
            other => Err(DomainError::InvalidCrowdLevel(other)),
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CrowdLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// Severity of a reported traffic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Minor = 1,
    Moderate = 2,
    Severe = 3,
}

impl Severity {
    /// Returns the persisted numeric value (1..=3).
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Severity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Severity::Minor),
            2 => Ok(Severity::Moderate),
            3 => Ok(Severity::Severe),
            other => Err(DomainError::InvalidSeverity(other)),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}
