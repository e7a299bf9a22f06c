//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, error, info, warn};

use crate::board::{BoardReconciler, InvalidStation, ReconciledBoard};
use crate::domain::Coordinate;
use crate::feed::{
    FeedError, LiveBoardDto, VehiclePositionDto, convert_live_board, convert_vehicle_positions,
    decode_items, parse_payload,
};
use crate::stations::{NoStations, SelectionError};
use crate::vehicles::locate_vehicles;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/stations/nearest", get(nearest_station))
        .route("/stations/:id/board", post(reconcile_station))
        .route("/feed", post(ingest_feed))
        .route("/board", get(current_board))
        .route("/vehicles", post(locate))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations in line order, for the selection control.
async fn list_stations(State(state): State<AppState>) -> Json<StationListResponse> {
    let stations = state.stations.all().iter().map(StationView::from).collect();
    Json(StationListResponse { stations })
}

/// Station nearest to a point.
async fn nearest_station(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestStationResponse>, AppError> {
    let point = parse_coordinate(query.lat, query.lon)?;
    let (station, distance_m) = state.stations.nearest_with_distance(point)?;

    Ok(Json(NearestStationResponse {
        station: station.into(),
        distance_m,
    }))
}

/// Reconcile a raw live-board payload for one station, without storing it.
async fn reconcile_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<BoardResponse>, AppError> {
    let dtos: Vec<LiveBoardDto> = parse_payload(&body)?;
    let batch = convert_live_board(&dtos, state.language);

    let board = BoardReconciler::new(&state.stations).reconcile(&id, &batch.records)?;
    let station = state
        .stations
        .get(&board.station_id)
        .ok_or_else(|| AppError::Internal {
            message: format!("station {} vanished from the index", board.station_id),
        })?;

    Ok(Json(BoardResponse::from_board(station, &board)))
}

/// Ingest one poll of the whole line and publish the boards.
async fn ingest_feed(
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> Json<FeedResponse> {
    let dtos: Vec<LiveBoardDto> = decode_items(req.records);
    let batch = convert_live_board(&dtos, state.language);

    let boards = BoardReconciler::new(&state.stations).reconcile_line(&batch.records);
    let summary = state
        .snapshots
        .publish_all(req.poll, boards, batch.updated_at)
        .await;

    if summary.stale > 0 {
        debug!(poll = req.poll, stale = summary.stale, "poll finished after a newer one");
    }
    info!(
        poll = req.poll,
        records = batch.records.len(),
        stored = summary.stored,
        boards = state.snapshots.entry_count(),
        "ingested feed"
    );

    Json(FeedResponse {
        poll: req.poll,
        records: batch.records.len(),
        stored: summary.stored,
        stale: summary.stale,
    })
}

/// Latest board for the selected (or nearest) station.
async fn current_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let explicit = query.station.as_deref().filter(|s| !s.trim().is_empty());
    let location = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => Some(parse_coordinate(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest {
                message: "lat and lon must be given together".to_string(),
            });
        }
    };

    let station = state.stations.select(explicit, location)?;

    let response = match state.snapshots.latest(&station.id).await {
        Some(snapshot) => BoardResponse::from_snapshot(station, &snapshot),
        // Nothing published yet (or it expired): show an empty board
        None => BoardResponse::from_board(station, &ReconciledBoard::empty(station.id.clone())),
    };

    Ok(Json(response))
}

/// Annotate raw vehicle positions with their nearest station.
async fn locate(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<VehiclesResponse>, AppError> {
    let dtos: Vec<VehiclePositionDto> = parse_payload(&body)?;
    let positions = convert_vehicle_positions(&dtos);
    let vehicles = locate_vehicles(&state.stations, &positions)?;

    Ok(Json(VehiclesResponse { vehicles }))
}

fn parse_coordinate(lat: f64, lon: f64) -> Result<Coordinate, AppError> {
    Coordinate::new(lat, lon).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InvalidStation> for AppError {
    fn from(e: InvalidStation) -> Self {
        match e {
            InvalidStation::Unknown(_) => AppError::NotFound {
                message: e.to_string(),
            },
            InvalidStation::Empty | InvalidStation::Malformed(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::Unknown(_) => AppError::NotFound {
                message: e.to_string(),
            },
            SelectionError::NoStations(inner) => inner.into(),
            SelectionError::InvalidId(_) | SelectionError::NoSelection => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<NoStations> for AppError {
    fn from(e: NoStations) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
