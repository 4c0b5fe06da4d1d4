use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use voyra_core::Trip;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleTripRequest {
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub total_seats: i32,
    pub unit_price_amount: i32,
    pub currency: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", post(schedule_trip))
        .route("/v1/trips/{id}", get(get_trip))
}

/// POST /v1/trips
/// Seeding hook for the external scheduling collaborator
async fn schedule_trip(
    State(state): State<AppState>,
    Json(req): Json<ScheduleTripRequest>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = Trip::new(
        req.origin,
        req.destination,
        req.departure_at,
        req.total_seats,
        req.unit_price_amount,
        req.currency,
    );
    let trip = state.bookings.schedule_trip(trip).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /v1/trips/{id}
/// Trip with live seat availability
async fn get_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.bookings.trip(trip_id).await?;
    Ok(Json(trip))
}
