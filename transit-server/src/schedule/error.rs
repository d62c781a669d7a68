//! Schedule store error types.

use crate::domain::{DomainError, TrafficBlockId, TripId};

/// Errors from loading or querying a schedule store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the snapshot file failed
    #[error("failed to read schedule snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON for the expected shape
    #[error("failed to parse schedule snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed domain validation
    #[error("invalid {record}: {source}")]
    Invalid {
        record: String,
        #[source]
        source: DomainError,
    },

    /// Stop times of a trip break the sequence invariant
    #[error("trip {trip}: {reason}")]
    InconsistentTrip { trip: TripId, reason: String },

    /// Update targeted a row that does not exist
    #[error("traffic block {0} does not exist")]
    UnknownTrafficBlock(TrafficBlockId),

    /// A writer panicked while holding the store lock
    #[error("schedule store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn invalid(record: impl Into<String>, source: DomainError) -> Self {
        StoreError::Invalid {
            record: record.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::invalid("bus 3", DomainError::InvalidCrowdLevel(9));
        assert_eq!(
            err.to_string(),
            "invalid bus 3: crowd level must be 1, 2 or 3 (got 9)"
        );

        let err = StoreError::InconsistentTrip {
            trip: TripId::new(4),
            reason: "duplicate sequence 2".into(),
        };
        assert_eq!(err.to_string(), "trip 4: duplicate sequence 2");
    }
}
