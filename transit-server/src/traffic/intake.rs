//! Accepting new traffic reports from riders.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::domain::{Coordinates, DomainError, NewTrafficBlock, Severity, TrafficBlock};
use crate::error::CoreError;
use crate::schedule::ReportStore;

use super::confirm::{ConfirmationQueue, ConfirmationRequest};

/// A traffic report as received, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficReport {
    pub description: String,
    pub severity: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub route_name: Option<String>,
}

impl TrafficReport {
    fn validate(self, now: &DateTime<Tz>) -> Result<NewTrafficBlock, DomainError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DomainError::EmptyField("description"));
        }
        let severity = Severity::try_from(self.severity)?;
        let location = Coordinates::new(self.latitude, self.longitude)?;
        let route_name = self
            .route_name
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Ok(NewTrafficBlock {
            description: description.to_string(),
            severity,
            location,
            route_name,
            reported_time: now.with_timezone(&Utc),
        })
    }
}

/// Store a report unconfirmed and queue it for background confirmation.
///
/// The stored block is returned whether or not the queue accepted it.
pub fn submit_traffic_block(
    report: TrafficReport,
    now: &DateTime<Tz>,
    reports: &dyn ReportStore,
    queue: &ConfirmationQueue,
) -> Result<TrafficBlock, CoreError> {
    let block = reports.append_traffic_block(report.validate(now)?)?;
    info!(block_id = %block.id, severity = block.severity.value(), "traffic block reported");

    queue.enqueue(ConfirmationRequest {
        block_id: block.id,
        location: block.location,
    });
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::schedule::fixture::ScheduleBuilder;
    use crate::traffic::ConfirmationWorker;
    use crate::traffic::confirm::tests::FixedRoad;
    use std::sync::Arc;

    fn report(description: &str, severity: i64, lat: f64) -> TrafficReport {
        TrafficReport {
            description: description.into(),
            severity,
            latitude: lat,
            longitude: 76.3185,
            route_name: Some(" Aluva - Vyttila ".into()),
        }
    }

    #[tokio::test]
    async fn stores_unconfirmed_and_queues() {
        let store = Arc::new(ScheduleBuilder::new().build());
        let (worker, queue) =
            ConfirmationWorker::new(store.clone(), store.clone(), Arc::new(FixedRoad(Some(false))), 4);
        let now = FixedClock::at_local(chrono_tz::Asia::Kolkata, "2026-10-19 08:30")
            .unwrap()
            .now();

        let block = submit_traffic_block(report("Waterlogging", 3, 9.9674), &now, &*store, &queue).unwrap();
        assert!(!block.is_confirmed);
        assert_eq!(block.nearest_stop_id, None);
        assert_eq!(block.severity, Severity::Severe);
        assert_eq!(block.route_name.as_deref(), Some("Aluva - Vyttila"));
        assert_eq!(block.reported_time.to_rfc3339(), "2026-10-19T03:00:00+00:00");
        assert_eq!(store.traffic_block(block.id).unwrap(), Some(block.clone()));

        let mut worker = worker;
        let queued = worker.pending().unwrap();
        assert_eq!(queued.block_id, block.id);
        assert_eq!(queued.location, block.location);
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let store = Arc::new(ScheduleBuilder::new().build());
        let (_worker, queue) =
            ConfirmationWorker::new(store.clone(), store.clone(), Arc::new(FixedRoad(Some(true))), 4);
        let now = FixedClock::at_local(chrono_tz::Asia::Kolkata, "2026-10-19 08:30")
            .unwrap()
            .now();

        for bad in [report("  ", 2, 9.9), report("Jam", 4, 9.9), report("Jam", 2, 95.0)] {
            let err = submit_traffic_block(bad, &now, &*store, &queue).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{err}");
        }
    }
}
