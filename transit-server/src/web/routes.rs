//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::board::{
    BusSummary, CurrentTrip, NearbyArrivals, current_trip, nearby_arrivals, search_buses,
    search_stops,
};
use crate::crowd::{BusCrowdPredictor, StopCrowdPredictor};
use crate::domain::{BusId, Coordinates, DomainError, Stop, StopId, TrafficBlock};
use crate::error::CoreError;
use crate::fare::{FareEstimator, FareQuote, RoadDistance};
use crate::planner::{RouteFinder, RouteResponse};
use crate::traffic::{TrafficAdvisoryAggregator, submit_traffic_block};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<D: RoadDistance + 'static>(state: AppState<D>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/find_route_results", get(find_route_results::<D>))
        .route("/api/nearby_buses", get(nearby_buses::<D>))
        .route("/api/bus/:id/current_trip", get(bus_current_trip::<D>))
        .route("/api/bus/:id/crowd_prediction", get(bus_crowd_prediction::<D>))
        .route("/api/stop/:id/crowd_prediction", get(stop_crowd_prediction::<D>))
        .route(
            "/api/bus/:id/traffic_notifications",
            get(traffic_notifications::<D>),
        )
        .route("/api/calculate_fare", get(calculate_fare::<D>))
        .route("/api/traffic_blocks", post(create_traffic_block::<D>))
        .route("/api/search_stop", get(search_stop::<D>))
        .route("/api/search_bus", get(search_bus::<D>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn stop_pair(query: &StopPairQuery) -> Result<(StopId, StopId), AppError> {
    let start = query
        .start_stop_id
        .as_deref()
        .ok_or(DomainError::EmptyField("start_stop_id"))?;
    let end = query
        .end_stop_id
        .as_deref()
        .ok_or(DomainError::EmptyField("end_stop_id"))?;
    Ok((StopId::parse(start)?, StopId::parse(end)?))
}

fn coordinate(value: Option<&str>, name: &'static str) -> Result<f64, DomainError> {
    let raw = value.ok_or(DomainError::EmptyField(name))?;
    raw.trim()
        .parse()
        .map_err(|_| DomainError::InvalidCoordinates(format!("{name} {raw:?} is not a number")))
}

async fn find_route_results<D>(
    State(state): State<AppState<D>>,
    query: Result<Query<StopPairQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, AppError> {
    let Query(query) = query?;
    let (start, end) = stop_pair(&query)?;
    let now = state.clock.now();
    let found = RouteFinder::new(&*state.schedule, &state.planner).find(start, end, &now)?;
    Ok(Json(found))
}

async fn nearby_buses<D>(
    State(state): State<AppState<D>>,
    query: Result<Query<PointQuery>, QueryRejection>,
) -> Result<Json<NearbyArrivals>, AppError> {
    let Query(query) = query?;
    let lat = coordinate(query.lat.as_deref(), "lat")?;
    let lon = coordinate(query.lon.as_deref(), "lon")?;
    let point = Coordinates::new(lat, lon)?;
    let now = state.clock.now();
    Ok(Json(nearby_arrivals(&*state.schedule, point, &now)?))
}

async fn bus_current_trip<D>(
    State(state): State<AppState<D>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<CurrentTrip>, AppError> {
    let Path(id) = id?;
    let bus_id = BusId::parse(&id)?;
    let now = state.clock.now();
    Ok(Json(current_trip(&*state.schedule, bus_id, &now)?))
}

async fn bus_crowd_prediction<D>(
    State(state): State<AppState<D>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<CrowdPrediction>, AppError> {
    let Path(id) = id?;
    let bus_id = BusId::parse(&id)?;
    let now = state.clock.now();
    let outlook = BusCrowdPredictor::new(&*state.schedule, &*state.reports).predict(bus_id, &now)?;
    Ok(Json(CrowdPrediction::for_bus(bus_id, &outlook)))
}

async fn stop_crowd_prediction<D>(
    State(state): State<AppState<D>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<CrowdPrediction>, AppError> {
    let Path(id) = id?;
    let stop_id = StopId::parse(&id)?;
    let now = state.clock.now();
    let outlook =
        StopCrowdPredictor::new(&*state.schedule, &*state.reports).predict(stop_id, &now)?;
    Ok(Json(CrowdPrediction::for_stop(stop_id, &outlook)))
}

async fn traffic_notifications<D>(
    State(state): State<AppState<D>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<TrafficNotifications>, AppError> {
    let Path(id) = id?;
    let bus_id = BusId::parse(&id)?;
    let now = state.clock.now();
    let notifications = TrafficAdvisoryAggregator::new(&*state.schedule, &*state.reports)
        .advisories_for_bus(bus_id, &now)?;
    Ok(Json(TrafficNotifications {
        bus_id,
        notifications,
    }))
}

async fn calculate_fare<D: RoadDistance>(
    State(state): State<AppState<D>>,
    query: Result<Query<StopPairQuery>, QueryRejection>,
) -> Result<Json<FareQuote>, AppError> {
    let Query(query) = query?;
    let (start, end) = stop_pair(&query)?;
    let quote = FareEstimator::new(&*state.schedule, &*state.distance, &state.fares)
        .routes_between(start, end)
        .await?;
    Ok(Json(quote))
}

async fn create_traffic_block<D>(
    State(state): State<AppState<D>>,
    body: Result<Json<TrafficBlockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrafficBlock>), AppError> {
    let Json(req) = body?;
    let now = state.clock.now();
    let block =
        submit_traffic_block(req.into(), &now, &*state.reports, &state.confirmations)?;
    Ok((StatusCode::CREATED, Json(block)))
}

async fn search_stop<D>(
    State(state): State<AppState<D>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Stop>>, AppError> {
    let Query(query) = query?;
    let q = query.q.as_deref().ok_or(DomainError::EmptyField("q"))?;
    Ok(Json(search_stops(&*state.schedule, q, query.limit)?))
}

async fn search_bus<D>(
    State(state): State<AppState<D>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<BusSummary>>, AppError> {
    let Query(query) = query?;
    let q = query.q.as_deref().ok_or(DomainError::EmptyField("q"))?;
    Ok(Json(search_buses(&*state.schedule, q, query.limit)?))
}

/// Application error type, rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct AppError(CoreError);

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        AppError(e)
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError(e.into())
    }
}

// Extractor rejections render as 400 with the JSON error body.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(CoreError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(CoreError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self.0 {
            CoreError::Internal(detail) => {
                error!(%detail, "request failed");
                "internal error".to_string()
            }
            CoreError::UpstreamUnavailable(detail) => {
                warn!(%detail, "upstream unavailable");
                self.0.to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
