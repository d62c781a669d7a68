//! In-memory schedule store backed by a JSON snapshot.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc, Weekday};

use crate::domain::{
    Bus, BusId, CrowdSubmission, NewTrafficBlock, Stop, StopCrowdReport, StopId, StopTime,
    TrafficBlock, TrafficBlockId, Trip, TripId,
};

use super::error::StoreError;
use super::snapshot::{ScheduleData, Snapshot};
use super::{ReportStore, ScheduleStore};

/// Schedule and report store held in memory.
///
/// Reads clone out of a shared lock, so every result is a point-in-time
/// snapshot. Traffic block writes are the only mutation.
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<ScheduleData>,
}

impl MemoryStore {
    /// Build a store from an already-parsed snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        Ok(Self {
            data: RwLock::new(snapshot.into_data()?),
        })
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;
        Self::from_snapshot(snapshot)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ScheduleData>, StoreError> {
        self.data.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ScheduleData>, StoreError> {
        self.data.write().map_err(|_| StoreError::Poisoned)
    }

    /// Number of stops, buses and trips loaded.
    pub fn counts(&self) -> Result<(usize, usize, usize), StoreError> {
        let data = self.read()?;
        Ok((data.stops.len(), data.buses.len(), data.trips.len()))
    }
}

impl ScheduleStore for MemoryStore {
    fn list_trips(&self) -> Result<Vec<Trip>, StoreError> {
        Ok(self.read()?.trips.values().cloned().collect())
    }

    fn list_active_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let data = self.read()?;
        Ok(data
            .trips
            .values()
            .filter(|t| data.buses.get(&t.bus_id).is_some_and(|b| b.is_active))
            .cloned()
            .collect())
    }

    fn trips_for_bus(&self, bus_id: BusId) -> Result<Vec<Trip>, StoreError> {
        Ok(self
            .read()?
            .trips
            .values()
            .filter(|t| t.bus_id == bus_id)
            .cloned()
            .collect())
    }

    fn stop_times_for(&self, trip_id: TripId) -> Result<Vec<StopTime>, StoreError> {
        Ok(self
            .read()?
            .stop_times
            .get(&trip_id)
            .cloned()
            .unwrap_or_default())
    }

    fn service_days_for(&self, trip_id: TripId) -> Result<Vec<Weekday>, StoreError> {
        Ok(self
            .read()?
            .service_days
            .get(&trip_id)
            .cloned()
            .unwrap_or_default())
    }

    fn exclusions_for(&self, trip_id: TripId) -> Result<Vec<NaiveDate>, StoreError> {
        Ok(self
            .read()?
            .exclusions
            .get(&trip_id)
            .cloned()
            .unwrap_or_default())
    }

    fn stop_by_id(&self, id: StopId) -> Result<Option<Stop>, StoreError> {
        Ok(self.read()?.stops.get(&id).cloned())
    }

    fn bus_by_id(&self, id: BusId) -> Result<Option<Bus>, StoreError> {
        Ok(self.read()?.buses.get(&id).cloned())
    }

    fn list_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.read()?.stops.values().cloned().collect())
    }

    fn list_buses(&self) -> Result<Vec<Bus>, StoreError> {
        Ok(self.read()?.buses.values().cloned().collect())
    }
}

impl ReportStore for MemoryStore {
    fn crowd_submissions_for_bus(
        &self,
        bus_id: BusId,
    ) -> Result<Vec<CrowdSubmission>, StoreError> {
        Ok(self
            .read()?
            .crowd_submissions
            .iter()
            .filter(|s| s.bus_id == bus_id)
            .cloned()
            .collect())
    }

    fn crowd_reports_for_stop(&self, stop_id: StopId) -> Result<Vec<StopCrowdReport>, StoreError> {
        Ok(self
            .read()?
            .stop_crowd_reports
            .iter()
            .filter(|r| r.stop_id == stop_id)
            .cloned()
            .collect())
    }

    fn traffic_blocks_near_stop(
        &self,
        stop_id: StopId,
        since: DateTime<Utc>,
    ) -> Result<Vec<TrafficBlock>, StoreError> {
        Ok(self
            .read()?
            .traffic_blocks
            .values()
            .filter(|b| b.nearest_stop_id == Some(stop_id) && b.reported_time >= since)
            .cloned()
            .collect())
    }

    fn traffic_block(&self, id: TrafficBlockId) -> Result<Option<TrafficBlock>, StoreError> {
        Ok(self.read()?.traffic_blocks.get(&id).cloned())
    }

    fn append_traffic_block(&self, block: NewTrafficBlock) -> Result<TrafficBlock, StoreError> {
        let mut data = self.write()?;
        let next = data
            .traffic_blocks
            .keys()
            .next_back()
            .map_or(1, |id| id.get() + 1);
        let stored = TrafficBlock {
            id: TrafficBlockId::new(next),
            description: block.description,
            severity: block.severity,
            location: block.location,
            route_name: block.route_name,
            nearest_stop_id: None,
            is_confirmed: false,
            reported_time: block.reported_time,
        };
        data.traffic_blocks.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn confirm_traffic_block(
        &self,
        id: TrafficBlockId,
        nearest_stop: StopId,
    ) -> Result<(), StoreError> {
        let mut data = self.write()?;
        let block = data
            .traffic_blocks
            .get_mut(&id)
            .ok_or(StoreError::UnknownTrafficBlock(id))?;
        block.is_confirmed = true;
        block.nearest_stop_id = Some(nearest_stop);
        Ok(())
    }
}
