//! Live board views: what arrives near a rider, and where a bus is headed.
//! Also the name search riders use to find a stop or bus id.

mod current;
mod nearby;
mod search;

pub use current::{CurrentTrip, CurrentTripStop, current_trip};
pub use nearby::{NearbyArrival, NearbyArrivals, nearby_arrivals};
pub use search::{BusSummary, search_buses, search_stops};
