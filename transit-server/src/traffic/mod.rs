//! Rider traffic reports: intake, background confirmation and advisories.

mod advisory;
pub(crate) mod confirm;
mod intake;
mod proximity;

pub use advisory::{TrafficAdvisory, TrafficAdvisoryAggregator, TrafficLevel};
pub use confirm::{
    ConfirmationOutcome, ConfirmationQueue, ConfirmationRequest, ConfirmationWorker, confirm_block,
};
pub use intake::{TrafficReport, submit_traffic_block};
pub use proximity::{OverpassClient, OverpassConfig, ProximityError, RoadProximity};
