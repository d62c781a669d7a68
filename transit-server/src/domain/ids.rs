//! Identifier newtypes for stops, buses, trips and traffic blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Parse an id from request input.
            ///
            /// Blank input and non-positive numbers are rejected.
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                let trimmed = s.trim();
                match trimmed.parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(DomainError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }

            /// Returns the raw id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a bus stop.
    StopId,
    "stop"
);
id_type!(
    /// Identifier of a bus.
    BusId,
    "bus"
);
id_type!(
    /// Identifier of a scheduled trip.
    TripId,
    "trip"
);
id_type!(
    /// Identifier of a traffic block report.
    TrafficBlockId,
    "traffic block"
);
