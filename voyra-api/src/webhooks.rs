use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use voyra_booking::PaymentApplied;
use voyra_core::PaymentOutcome;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentNotification {
    pub status: PaymentOutcome,
    pub transaction_reference: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/payments/{booking_id}/notify", post(notify_payment))
}

/// POST /v1/payments/{booking_id}/notify
/// Webhook-style endpoint from the payment notifier. Delivery is
/// at-least-once; repeat calls are safe.
async fn notify_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(notification): Json<PaymentNotification>,
) -> Result<Json<PaymentApplied>, AppError> {
    tracing::info!(
        "Payment notification for booking {}: {:?}",
        booking_id,
        notification.status
    );

    let applied = state
        .payments
        .apply(
            booking_id,
            notification.status,
            notification.transaction_reference,
        )
        .await?;

    Ok(Json(applied))
}
