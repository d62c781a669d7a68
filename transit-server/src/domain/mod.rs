//! Domain types for the bus network query core.
//!
//! This module contains the validated value types and the flat record
//! snapshots the core reasons about. Values enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod coords;
mod district;
mod error;
mod ids;
mod levels;
mod model;
mod time;
mod weekday;

pub use coords::Coordinates;
pub use district::District;
pub use error::DomainError;
pub use ids::{BusId, StopId, TrafficBlockId, TripId};
pub use levels::{CrowdLevel, Severity};
pub use model::{
    Bus, CrowdSubmission, NewTrafficBlock, Stop, StopCrowdReport, StopTime, TrafficBlock, Trip,
};
pub use time::{parse_time_of_day, parse_timestamp_utc};
pub use weekday::parse_weekday;
