//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRoadDistance;
use crate::clock::Clock;
use crate::fare::{FareTable, OsrmClient};
use crate::planner::PlannerConfig;
use crate::schedule::{ReportStore, ScheduleStore};
use crate::traffic::ConfirmationQueue;

/// Shared application state.
///
/// `D` is the road distance service; production uses the cached OSRM client.
pub struct AppState<D = CachedRoadDistance<OsrmClient>> {
    pub schedule: Arc<dyn ScheduleStore>,
    pub reports: Arc<dyn ReportStore>,
    pub clock: Arc<dyn Clock>,
    pub distance: Arc<D>,
    pub fares: Arc<FareTable>,
    pub planner: Arc<PlannerConfig>,
    /// Hands new traffic blocks to the confirmation worker
    pub confirmations: ConfirmationQueue,
}

impl<D> AppState<D> {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        reports: Arc<dyn ReportStore>,
        clock: Arc<dyn Clock>,
        distance: D,
        confirmations: ConfirmationQueue,
    ) -> Self {
        Self {
            schedule,
            reports,
            clock,
            distance: Arc::new(distance),
            fares: Arc::new(FareTable::default()),
            planner: Arc::new(PlannerConfig::default()),
            confirmations,
        }
    }
}

// Derived Clone would require D: Clone.
impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            schedule: Arc::clone(&self.schedule),
            reports: Arc::clone(&self.reports),
            clock: Arc::clone(&self.clock),
            distance: Arc::clone(&self.distance),
            fares: Arc::clone(&self.fares),
            planner: Arc::clone(&self.planner),
            confirmations: self.confirmations.clone(),
        }
    }
}
