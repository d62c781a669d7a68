//! Domain error types.
//!
//! These errors represent validation failures for values crossing into the
//! domain layer. They are distinct from store and upstream errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier was empty or not a positive integer
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    /// Crowd level outside 1..=3
    #[error("crowd level must be 1, 2 or 3 (got {0})")]
    InvalidCrowdLevel(i64),

    /// Traffic severity outside 1..=3
    #[error("severity must be 1, 2 or 3 (got {0})")]
    InvalidSeverity(i64),

    /// Unrecognised weekday name or index
    #[error("invalid weekday: {0}")]
    InvalidWeekday(String),

    /// Unrecognised district name or index
    #[error("invalid district: {0}")]
    InvalidDistrict(String),

    /// Latitude/longitude out of range or not finite
    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Unparseable timestamp
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A required text field was blank
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
