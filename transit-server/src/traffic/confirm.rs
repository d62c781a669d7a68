//! Background confirmation of rider traffic reports.
//!
//! Creating a report never waits on confirmation. The request handler puts
//! a message on a bounded channel and returns. A [`ConfirmationWorker`]
//! receives those messages and spawns one task per report, so several
//! confirmations run at once, up to a fixed limit. While the limit is
//! reached the worker stops receiving and the queue fills. Each task checks
//! that the report was made on a road, then attributes it to the nearest
//! stop within 1 km. Any failure leaves the report unconfirmed; nothing is
//! retried.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, StopId, TrafficBlockId};
use crate::error::CoreError;
use crate::geo::NearestStopLocator;
use crate::schedule::{ReportStore, ScheduleStore};

use super::proximity::RoadProximity;

/// Radius within which a report is attributed to a stop.
pub const MAX_STOP_DISTANCE_KM: f64 = 1.0;

/// Default cap on confirmations talking to the road service at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// A stored report awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationRequest {
    pub block_id: TrafficBlockId,
    pub location: Coordinates,
}

/// What happened to one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed(StopId),
    /// Not on a road, or the road check failed.
    OffRoad,
    NoNearbyStop,
}

/// Sending half held by request handlers.
#[derive(Debug, Clone)]
pub struct ConfirmationQueue {
    sender: mpsc::Sender<ConfirmationRequest>,
}

impl ConfirmationQueue {
    /// Hand a report to the worker without waiting.
    ///
    /// Returns false if the queue is full or the worker has stopped; the
    /// report then simply stays unconfirmed.
    pub fn enqueue(&self, request: ConfirmationRequest) -> bool {
        match self.sender.try_send(request) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(r)) => {
                warn!(block_id = %r.block_id, "confirmation queue full, report left unconfirmed");
                false
            }
            Err(mpsc::error::TrySendError::Closed(r)) => {
                warn!(block_id = %r.block_id, "confirmation worker stopped, report left unconfirmed");
                false
            }
        }
    }
}

/// Receives confirmation requests and processes each on its own task.
pub struct ConfirmationWorker<P> {
    schedule: Arc<dyn ScheduleStore>,
    reports: Arc<dyn ReportStore>,
    proximity: Arc<P>,
    requests: mpsc::Receiver<ConfirmationRequest>,
    in_flight: Arc<Semaphore>,
}

impl<P: RoadProximity + 'static> ConfirmationWorker<P> {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        reports: Arc<dyn ReportStore>,
        proximity: Arc<P>,
        capacity: usize,
    ) -> (Self, ConfirmationQueue) {
        let (sender, requests) = mpsc::channel(capacity);
        let worker = Self {
            schedule,
            reports,
            proximity,
            requests,
            in_flight: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT)),
        };
        (worker, ConfirmationQueue { sender })
    }

    /// Limit how many confirmations run at once.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.in_flight = Arc::new(Semaphore::new(n.max(1)));
        self
    }

    /// Process requests until every queue handle is dropped.
    pub async fn run(mut self) {
        info!("traffic confirmation worker started");
        loop {
            // wait for a free slot before taking the next message
            let Ok(permit) = Arc::clone(&self.in_flight).acquire_owned().await else {
                break;
            };
            let Some(request) = self.requests.recv().await else {
                break;
            };
            let schedule = Arc::clone(&self.schedule);
            let reports = Arc::clone(&self.reports);
            let proximity = Arc::clone(&self.proximity);
            tokio::spawn(async move {
                let _permit = permit;
                match confirm_block(&*schedule, &*reports, &*proximity, request).await {
                    Ok(outcome) => {
                        debug!(block_id = %request.block_id, ?outcome, "traffic block processed");
                    }
                    Err(e) => {
                        warn!(block_id = %request.block_id, error = %e, "traffic block confirmation failed");
                    }
                }
            });
        }
        info!("traffic confirmation worker stopped");
    }

    #[cfg(test)]
    pub(crate) fn pending(&mut self) -> Option<ConfirmationRequest> {
        self.requests.try_recv().ok()
    }
}

/// Run the confirmation steps for one report.
///
/// The store is only written when the report is confirmed.
pub async fn confirm_block<P: RoadProximity>(
    schedule: &dyn ScheduleStore,
    reports: &dyn ReportStore,
    proximity: &P,
    request: ConfirmationRequest,
) -> Result<ConfirmationOutcome, CoreError> {
    let on_road = match proximity.is_on_road(request.location).await {
        Ok(on_road) => on_road,
        Err(e) => {
            warn!(block_id = %request.block_id, error = %e, "road check failed");
            false
        }
    };
    if !on_road {
        return Ok(ConfirmationOutcome::OffRoad);
    }

    let Some(nearest) =
        NearestStopLocator::new(schedule).nearest_within(request.location, MAX_STOP_DISTANCE_KM)?
    else {
        return Ok(ConfirmationOutcome::NoNearbyStop);
    };

    reports.confirm_traffic_block(request.block_id, nearest.stop.id)?;
    Ok(ConfirmationOutcome::Confirmed(nearest.stop.id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{NewTrafficBlock, Severity};
    use crate::schedule::MemoryStore;
    use crate::schedule::fixture::ScheduleBuilder;
    use crate::traffic::ProximityError;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Road check with a canned answer. `None` fails the check.
    pub(crate) struct FixedRoad(pub Option<bool>);

    impl RoadProximity for FixedRoad {
        fn is_on_road(&self, _point: Coordinates) -> impl Future<Output = Result<bool, ProximityError>> + Send {
            let result = self.0.ok_or(ProximityError::Status { status: 504 });
            std::future::ready(result)
        }
    }

    fn store_with_block() -> (Arc<MemoryStore>, ConfirmationRequest) {
        let store = ScheduleBuilder::new()
            .stop(1, "Vyttila", "9.9674", "76.3185")
            .stop(2, "Aluva", "10.1004", "76.3570")
            .build();
        let location = Coordinates::new(9.9700, 76.3190).unwrap();
        let block = store
            .append_traffic_block(NewTrafficBlock {
                description: "Signal failure".into(),
                severity: Severity::Moderate,
                location,
                route_name: None,
                reported_time: chrono::Utc::now(),
            })
            .unwrap();
        (
            Arc::new(store),
            ConfirmationRequest {
                block_id: block.id,
                location,
            },
        )
    }

    #[tokio::test]
    async fn confirms_near_stop_on_road() {
        let (store, request) = store_with_block();
        let outcome = confirm_block(&*store, &*store, &FixedRoad(Some(true)), request)
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmationOutcome::Confirmed(StopId::new(1)));

        let block = store.traffic_block(request.block_id).unwrap().unwrap();
        assert!(block.is_confirmed);
        assert_eq!(block.nearest_stop_id, Some(StopId::new(1)));
    }

    #[tokio::test]
    async fn off_road_or_failed_check_leaves_unconfirmed() {
        for road in [Some(false), None] {
            let (store, request) = store_with_block();
            let outcome = confirm_block(&*store, &*store, &FixedRoad(road), request)
                .await
                .unwrap();
            assert_eq!(outcome, ConfirmationOutcome::OffRoad);
            assert!(!store.traffic_block(request.block_id).unwrap().unwrap().is_confirmed);
        }
    }

    #[tokio::test]
    async fn far_from_any_stop() {
        let (store, mut request) = store_with_block();
        request.location = Coordinates::new(10.5, 76.0).unwrap();
        let outcome = confirm_block(&*store, &*store, &FixedRoad(Some(true)), request)
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmationOutcome::NoNearbyStop);
        let block = store.traffic_block(request.block_id).unwrap().unwrap();
        assert!(!block.is_confirmed);
        assert_eq!(block.nearest_stop_id, None);
    }

    #[tokio::test]
    async fn worker_confirms_in_background() {
        let (store, request) = store_with_block();
        let (worker, queue) = ConfirmationWorker::new(
            store.clone(),
            store.clone(),
            Arc::new(FixedRoad(Some(true))),
            8,
        );
        let handle = tokio::spawn(worker.run());

        assert!(queue.enqueue(request));

        let mut confirmed = false;
        for _ in 0..100 {
            if store.traffic_block(request.block_id).unwrap().unwrap().is_confirmed {
                confirmed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(confirmed);

        drop(queue);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn enqueue_fails_once_worker_gone() {
        let (store, request) = store_with_block();
        let (worker, queue) =
            ConfirmationWorker::new(store.clone(), store, Arc::new(FixedRoad(Some(true))), 1);
        drop(worker);
        assert!(!queue.enqueue(request));
    }

    /// Counts road checks and never answers them.
    struct StuckRoad(AtomicUsize);

    impl RoadProximity for StuckRoad {
        fn is_on_road(&self, _point: Coordinates) -> impl Future<Output = Result<bool, ProximityError>> + Send {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn in_flight_checks_are_capped() {
        let (store, request) = store_with_block();
        let road = Arc::new(StuckRoad(AtomicUsize::new(0)));
        let (worker, queue) = ConfirmationWorker::new(store.clone(), store, road.clone(), 8);
        tokio::spawn(worker.with_max_concurrent(3).run());

        let accepted = (0..50).filter(|_| queue.enqueue(request)).count();
        assert_eq!(accepted, 8);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(road.0.load(Ordering::SeqCst), 3);

        // the worker took three messages; the rest wait in the queue
        let refilled = (0..50).filter(|_| queue.enqueue(request)).count();
        assert_eq!(refilled, 3);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(road.0.load(Ordering::SeqCst), 3);
    }
}
