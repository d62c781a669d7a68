//! Builder for in-memory schedules used by unit tests.

use super::MemoryStore;
use super::snapshot::{
    BusRecord, CrowdSubmissionRecord, Snapshot, StopCrowdReportRecord, StopRecord,
    StopTimeRecord, TrafficBlockRecord, TripRecord,
};

#[derive(Default)]
pub(crate) struct ScheduleBuilder {
    snapshot: Snapshot,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(mut self, id: i64, name: &str, lat: &str, lon: &str) -> Self {
        self.snapshot.stops.push(StopRecord {
            id,
            name: name.to_string(),
            latitude: Some(lat.to_string()),
            longitude: Some(lon.to_string()),
            district: None,
            loc_link: None,
        });
        self
    }

    /// A stop without usable coordinates.
    pub fn unplaced_stop(mut self, id: i64, name: &str) -> Self {
        self.snapshot.stops.push(StopRecord {
            id,
            name: name.to_string(),
            latitude: None,
            longitude: Some("not-a-number".to_string()),
            district: None,
            loc_link: None,
        });
        self
    }

    pub fn bus(mut self, id: i64, name: &str, is_ls: bool) -> Self {
        self.snapshot.buses.push(BusRecord {
            id,
            name: name.to_string(),
            registration_no: format!("KL-{id:02}"),
            is_active: true,
            is_ls,
        });
        self
    }

    pub fn inactive_bus(mut self, id: i64, name: &str) -> Self {
        self.snapshot.buses.push(BusRecord {
            id,
            name: name.to_string(),
            registration_no: format!("KL-{id:02}"),
            is_active: false,
            is_ls: false,
        });
        self
    }

    /// A trip named `Route <id>` running on `days`, cancelled on `excluded` dates.
    pub fn trip(
        mut self,
        id: i64,
        bus_id: i64,
        departure: &str,
        days: &[&str],
        excluded: &[&str],
    ) -> Self {
        self.snapshot.trips.push(TripRecord {
            id,
            bus_id,
            route_name: format!("Route {id}"),
            departure_time: departure.to_string(),
            direction: "up".to_string(),
            service_days: days.iter().map(|d| d.to_string()).collect(),
            exclusions: excluded
                .iter()
                .map(|d| d.parse().expect("fixture date"))
                .collect(),
            stop_times: Vec::new(),
        });
        self
    }

    /// Stop visits `(stop_id, arrival, sequence)` for an already-added trip.
    pub fn calls(mut self, trip_id: i64, calls: &[(i64, &str, u32)]) -> Self {
        let trip = self
            .snapshot
            .trips
            .iter_mut()
            .find(|t| t.id == trip_id)
            .expect("calls added before trip");
        trip.stop_times
            .extend(calls.iter().map(|(stop_id, time, sequence)| StopTimeRecord {
                stop_id: *stop_id,
                arrival_time: time.to_string(),
                sequence: *sequence,
            }));
        self
    }

    pub fn crowd(mut self, bus_id: i64, level: i64, timestamp: &str) -> Self {
        self.snapshot.crowd_submissions.push(CrowdSubmissionRecord {
            bus_id,
            crowd_level: level,
            timestamp: timestamp.to_string(),
        });
        self
    }

    pub fn stop_crowd(mut self, stop_id: i64, level: i64, weekday: &str, time: &str) -> Self {
        self.snapshot.stop_crowd_reports.push(StopCrowdReportRecord {
            stop_id,
            crowd_level: level,
            report_time: time.to_string(),
            report_weekday: weekday.to_string(),
            description: None,
        });
        self
    }

    /// A traffic block at a fixed point near Kochi.
    pub fn traffic(
        mut self,
        id: i64,
        nearest_stop: Option<i64>,
        severity: i64,
        reported: &str,
    ) -> Self {
        self.snapshot.traffic_blocks.push(TrafficBlockRecord {
            id,
            description: format!("block {id}"),
            severity,
            latitude: 9.98,
            longitude: 76.28,
            route_name: None,
            is_confirmed: nearest_stop.is_some(),
            nearest_stop_id: nearest_stop,
            reported_time: reported.to_string(),
        });
        self
    }

    pub fn build(self) -> MemoryStore {
        MemoryStore::from_snapshot(self.snapshot).expect("valid fixture")
    }
}
