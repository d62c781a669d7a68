//! JSON snapshot format for the schedule store.
//!
//! Raw records mirror the persisted columns (strings for enums and times).
//! [`Snapshot::into_data`] is the single validated mapping from those
//! columns into domain types.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Bus, BusId, Coordinates, CrowdLevel, CrowdSubmission, District, DomainError, Severity, Stop,
    StopCrowdReport, StopId, StopTime, TrafficBlock, TrafficBlockId, Trip, TripId,
    parse_time_of_day, parse_timestamp_utc, parse_weekday,
};

use super::error::StoreError;

/// A complete schedule and report snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub buses: Vec<BusRecord>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
    #[serde(default)]
    pub crowd_submissions: Vec<CrowdSubmissionRecord>,
    #[serde(default)]
    pub stop_crowd_reports: Vec<StopCrowdReportRecord>,
    #[serde(default)]
    pub traffic_blocks: Vec<TrafficBlockRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: i64,
    pub name: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub district: Option<String>,
    pub loc_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusRecord {
    pub id: i64,
    pub name: String,
    pub registration_no: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_ls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: i64,
    pub bus_id: i64,
    pub route_name: String,
    pub departure_time: String,
    pub direction: String,
    #[serde(default)]
    pub service_days: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<NaiveDate>,
    #[serde(default)]
    pub stop_times: Vec<StopTimeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub stop_id: i64,
    pub arrival_time: String,
    pub sequence: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdSubmissionRecord {
    pub bus_id: i64,
    pub crowd_level: i64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopCrowdReportRecord {
    pub stop_id: i64,
    pub crowd_level: i64,
    pub report_time: String,
    pub report_weekday: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficBlockRecord {
    pub id: i64,
    pub description: String,
    pub severity: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub route_name: Option<String>,
    #[serde(default)]
    pub is_confirmed: bool,
    pub nearest_stop_id: Option<i64>,
    pub reported_time: String,
}

fn default_true() -> bool {
    true
}

/// Validated tables backing a [`super::MemoryStore`].
#[derive(Debug, Default)]
pub(super) struct ScheduleData {
    pub stops: BTreeMap<StopId, Stop>,
    pub buses: BTreeMap<BusId, Bus>,
    pub trips: BTreeMap<TripId, Trip>,
    pub stop_times: HashMap<TripId, Vec<StopTime>>,
    pub service_days: HashMap<TripId, Vec<Weekday>>,
    pub exclusions: HashMap<TripId, Vec<NaiveDate>>,
    pub crowd_submissions: Vec<CrowdSubmission>,
    pub stop_crowd_reports: Vec<StopCrowdReport>,
    pub traffic_blocks: BTreeMap<TrafficBlockId, TrafficBlock>,
}

impl Snapshot {
    /// Validate every record and build the store tables.
    pub(super) fn into_data(self) -> Result<ScheduleData, StoreError> {
        let mut data = ScheduleData::default();

        for s in self.stops {
            let district = s
                .district
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(str::parse::<District>)
                .transpose()
                .map_err(|e| StoreError::invalid(format!("stop {}", s.id), e))?;
            let stop = Stop {
                id: StopId::new(s.id),
                name: s.name,
                latitude: s.latitude,
                longitude: s.longitude,
                district,
                location_link: s.loc_link,
            };
            data.stops.insert(stop.id, stop);
        }

        for b in self.buses {
            let bus = Bus {
                id: BusId::new(b.id),
                name: b.name,
                registration: b.registration_no,
                is_active: b.is_active,
                is_limited_stop: b.is_ls,
            };
            data.buses.insert(bus.id, bus);
        }

        for t in self.trips {
            let trip_id = TripId::new(t.id);
            let record = || format!("trip {}", t.id);

            let departure_time = parse_time_of_day(&t.departure_time)
                .map_err(|e| StoreError::invalid(record(), e))?;

            let service_days = t
                .service_days
                .iter()
                .map(|d| parse_weekday(d))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::invalid(record(), e))?;

            let mut stop_times = t
                .stop_times
                .iter()
                .map(|st| -> Result<StopTime, DomainError> {
                    Ok(StopTime {
                        trip_id,
                        stop_id: StopId::new(st.stop_id),
                        arrival_time: parse_time_of_day(&st.arrival_time)?,
                        sequence: st.sequence,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::invalid(record(), e))?;
            stop_times.sort_by_key(|st| st.sequence);
            check_stop_sequence(trip_id, &stop_times)?;

            data.trips.insert(
                trip_id,
                Trip {
                    id: trip_id,
                    bus_id: BusId::new(t.bus_id),
                    route_name: t.route_name,
                    departure_time,
                    direction: t.direction,
                },
            );
            data.stop_times.insert(trip_id, stop_times);
            data.service_days.insert(trip_id, service_days);
            data.exclusions.insert(trip_id, t.exclusions);
        }

        for (i, c) in self.crowd_submissions.into_iter().enumerate() {
            let record = || format!("crowd submission #{i}");
            data.crowd_submissions.push(CrowdSubmission {
                bus_id: BusId::new(c.bus_id),
                level: CrowdLevel::try_from(c.crowd_level)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                timestamp: parse_timestamp_utc(&c.timestamp)
                    .map_err(|e| StoreError::invalid(record(), e))?,
            });
        }

        for (i, r) in self.stop_crowd_reports.into_iter().enumerate() {
            let record = || format!("stop crowd report #{i}");
            data.stop_crowd_reports.push(StopCrowdReport {
                stop_id: StopId::new(r.stop_id),
                level: CrowdLevel::try_from(r.crowd_level)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                weekday: parse_weekday(&r.report_weekday)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                time_of_day: parse_time_of_day(&r.report_time)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                description: r.description,
            });
        }

        for b in self.traffic_blocks {
            let record = || format!("traffic block {}", b.id);
            let block = TrafficBlock {
                id: TrafficBlockId::new(b.id),
                description: b.description,
                severity: Severity::try_from(b.severity)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                location: Coordinates::new(b.latitude, b.longitude)
                    .map_err(|e| StoreError::invalid(record(), e))?,
                route_name: b.route_name,
                nearest_stop_id: b.nearest_stop_id.map(StopId::new),
                is_confirmed: b.is_confirmed,
                reported_time: parse_timestamp_utc(&b.reported_time)
                    .map_err(|e| StoreError::invalid(record(), e))?,
            };
            data.traffic_blocks.insert(block.id, block);
        }

        Ok(data)
    }
}

/// Sequences must be unique and arrival times strictly increasing along
/// them, and a trip visits each stop at most once.
fn check_stop_sequence(trip: TripId, stop_times: &[StopTime]) -> Result<(), StoreError> {
    let mut seen_stops = HashSet::new();
    for st in stop_times {
        if !seen_stops.insert(st.stop_id) {
            return Err(StoreError::InconsistentTrip {
                trip,
                reason: format!("stop {} visited twice", st.stop_id),
            });
        }
    }
    for pair in stop_times.windows(2) {
        if pair[0].sequence == pair[1].sequence {
            return Err(StoreError::InconsistentTrip {
                trip,
                reason: format!("duplicate sequence {}", pair[0].sequence),
            });
        }
        if pair[1].arrival_time <= pair[0].arrival_time {
            return Err(StoreError::InconsistentTrip {
                trip,
                reason: format!(
                    "sequence {} does not arrive after sequence {}",
                    pair[1].sequence, pair[0].sequence
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(json: &str) -> Snapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_minimal_snapshot() {
        let data = snapshot(
            r#"{
                "stops": [{"id": 1, "name": "Aluva", "latitude": "10.1", "longitude": "76.35",
                           "district": "Ernakulam", "loc_link": null}],
                "buses": [{"id": 1, "name": "Swift", "registration_no": "KL-07-1"}],
                "trips": [{"id": 5, "bus_id": 1, "route_name": "Aluva - Fort Kochi",
                           "departure_time": "06:30", "direction": "south",
                           "service_days": ["monday", "4"],
                           "exclusions": ["2026-10-19"],
                           "stop_times": [
                               {"stop_id": 1, "arrival_time": "06:30", "sequence": 2},
                               {"stop_id": 2, "arrival_time": "06:10", "sequence": 1}
                           ]}]
            }"#,
        )
        .into_data()
        .unwrap();

        let bus = &data.buses[&BusId::new(1)];
        assert!(bus.is_active);
        assert!(!bus.is_limited_stop);
        assert_eq!(data.stops[&StopId::new(1)].district, Some(District::Ernakulam));

        let times = &data.stop_times[&TripId::new(5)];
        assert_eq!(times[0].sequence, 1);
        assert_eq!(times[1].sequence, 2);
        assert_eq!(
            data.service_days[&TripId::new(5)],
            vec![Weekday::Mon, Weekday::Fri]
        );
    }

    #[test]
    fn rejects_invalid_crowd_level() {
        let err = snapshot(
            r#"{"crowd_submissions": [{"bus_id": 1, "crowd_level": 4,
                 "timestamp": "2026-10-12T08:00:00"}]}"#,
        )
        .into_data()
        .unwrap_err();
        assert!(err.to_string().contains("crowd level"));
    }

    #[test]
    fn rejects_unknown_weekday() {
        let err = snapshot(
            r#"{"trips": [{"id": 1, "bus_id": 1, "route_name": "r", "departure_time": "06:00",
                 "direction": "d", "service_days": ["someday"]}]}"#,
        )
        .into_data()
        .unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
    }

    #[test]
    fn rejects_duplicate_sequence() {
        let err = snapshot(
            r#"{"trips": [{"id": 1, "bus_id": 1, "route_name": "r", "departure_time": "06:00",
                 "direction": "d", "stop_times": [
                    {"stop_id": 1, "arrival_time": "06:00", "sequence": 1},
                    {"stop_id": 2, "arrival_time": "06:10", "sequence": 1}]}]}"#,
        )
        .into_data()
        .unwrap_err();
        assert!(matches!(err, StoreError::InconsistentTrip { .. }));
    }

    #[test]
    fn rejects_revisited_stop() {
        let err = snapshot(
            r#"{"trips": [{"id": 1, "bus_id": 1, "route_name": "r", "departure_time": "06:00",
                 "direction": "d", "stop_times": [
                    {"stop_id": 1, "arrival_time": "06:00", "sequence": 1},
                    {"stop_id": 1, "arrival_time": "06:10", "sequence": 2}]}]}"#,
        )
        .into_data()
        .unwrap_err();
        assert!(err.to_string().contains("visited twice"));
    }

    #[test]
    fn rejects_arrivals_that_do_not_advance() {
        for second in ["06:10", "05:50"] {
            let json = format!(
                r#"{{"trips": [{{"id": 1, "bus_id": 1, "route_name": "r", "departure_time": "06:00",
                     "direction": "d", "stop_times": [
                        {{"stop_id": 1, "arrival_time": "06:10", "sequence": 1}},
                        {{"stop_id": 2, "arrival_time": "{second}", "sequence": 2}}]}}]}}"#
            );
            let err = snapshot(&json).into_data().unwrap_err();
            assert!(err.to_string().contains("does not arrive after"), "{second}: {err}");
        }
    }

    #[test]
    fn naive_crowd_timestamp_is_utc() {
        let data = snapshot(
            r#"{"crowd_submissions": [{"bus_id": 1, "crowd_level": 2,
                 "timestamp": "2026-10-12T20:00:00"}]}"#,
        )
        .into_data()
        .unwrap();
        assert_eq!(
            data.crowd_submissions[0].timestamp.to_rfc3339(),
            "2026-10-12T20:00:00+00:00"
        );
    }
}
