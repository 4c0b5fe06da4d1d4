use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use voyra_booking::{BookingConfirmation, BookingView};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub passenger_count: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{user_id}", get(list_bookings))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

/// POST /v1/bookings
/// Reserve seats on a trip; the booking starts pending until payment settles
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    let confirmation = state
        .bookings
        .create_booking(req.trip_id, req.user_id, req.passenger_count)
        .await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// GET /v1/bookings/{user_id}
/// All bookings for a user, each with its trip summary
async fn list_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let views = state.bookings.bookings_for_user(user_id).await?;
    Ok(Json(views))
}

/// POST /v1/bookings/{id}/cancel
/// Cancel a booking and release its seats; idempotent
async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<voyra_core::Booking>, AppError> {
    let booking = state.bookings.cancel_booking(booking_id).await?;
    Ok(Json(booking))
}
