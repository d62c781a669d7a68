//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::crowd::CrowdOutlook;
use crate::domain::{BusId, StopId};
use crate::traffic::{TrafficAdvisory, TrafficReport};

/// Query for endpoints that take a start and end stop.
///
/// Both ids stay raw strings so that a bad value produces the same JSON
/// error as any other validation failure.
#[derive(Debug, Deserialize)]
pub struct StopPairQuery {
    pub start_stop_id: Option<String>,
    pub end_stop_id: Option<String>,
}

/// A rider's position.
#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Name search. `limit` defaults to 20 and is capped at 50.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Body of `POST /api/traffic_blocks`.
#[derive(Debug, Deserialize)]
pub struct TrafficBlockRequest {
    pub description: String,
    pub severity: i64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub route_name: Option<String>,
}

impl From<TrafficBlockRequest> for TrafficReport {
    fn from(req: TrafficBlockRequest) -> Self {
        TrafficReport {
            description: req.description,
            severity: req.severity,
            latitude: req.latitude,
            longitude: req.longitude,
            route_name: req.route_name,
        }
    }
}

/// Crowd outlook for a bus or a stop.
#[derive(Debug, Serialize)]
pub struct CrowdPrediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_id: Option<BusId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<StopId>,
    /// 1..=3, absent when there is nothing to predict from
    pub predicted_level: Option<u8>,
    pub description: &'static str,
    pub based_on_count: usize,
    pub recommended_action: Option<&'static str>,
}

impl CrowdPrediction {
    fn from_outlook(outlook: &CrowdOutlook) -> Self {
        Self {
            bus_id: None,
            stop_id: None,
            predicted_level: outlook.level().map(|l| l.value()),
            description: outlook.description(),
            based_on_count: outlook.based_on_count(),
            recommended_action: outlook.recommendation(),
        }
    }

    pub fn for_bus(bus_id: BusId, outlook: &CrowdOutlook) -> Self {
        Self {
            bus_id: Some(bus_id),
            ..Self::from_outlook(outlook)
        }
    }

    pub fn for_stop(stop_id: StopId, outlook: &CrowdOutlook) -> Self {
        Self {
            stop_id: Some(stop_id),
            ..Self::from_outlook(outlook)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrafficNotifications {
    pub bus_id: BusId,
    pub notifications: Vec<TrafficAdvisory>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crowd::Basis;
    use crate::domain::CrowdLevel;

    #[test]
    fn bus_prediction_json() {
        let outlook = CrowdOutlook::Predicted {
            level: CrowdLevel::High,
            basis: Basis::NearHour,
            based_on: 6,
        };
        let json = serde_json::to_value(CrowdPrediction::for_bus(BusId::new(4), &outlook)).unwrap();
        assert_eq!(json["bus_id"], 4);
        assert_eq!(json["predicted_level"], 3);
        assert_eq!(json["description"], "High");
        assert_eq!(json["based_on_count"], 6);
        assert!(json.get("stop_id").is_none());
        assert!(json["recommended_action"].as_str().unwrap().contains("earlier bus"));
    }

    #[test]
    fn no_trip_json() {
        let json =
            serde_json::to_value(CrowdPrediction::for_stop(StopId::new(2), &CrowdOutlook::NoUpcomingTrip))
                .unwrap();
        assert_eq!(json["stop_id"], 2);
        assert!(json["predicted_level"].is_null());
        assert_eq!(json["based_on_count"], 0);
    }
}
