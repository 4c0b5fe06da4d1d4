use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use voyra_core::Ticket;

use crate::error::AppError;
use crate::state::AppState;

/// Rendered ticket artifact, including the QR payload mobile clients encode
#[derive(Debug, Serialize)]
pub struct TicketArtifact {
    pub ticket: Ticket,
    pub qr_data: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings/{id}/ticket", post(issue_ticket))
}

/// POST /v1/bookings/{id}/ticket
/// Issue (or re-fetch) the ticket for a confirmed booking; 409 before
/// confirmation
async fn issue_ticket(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<TicketArtifact>, AppError> {
    let ticket = state.tickets.issue_if_confirmed(booking_id).await?;

    let qr_data = serde_json::json!({
        "reference": ticket.reference,
        "booking_id": ticket.booking_id,
        "expires_at": ticket.expires_at,
    })
    .to_string();

    Ok(Json(TicketArtifact { ticket, qr_data }))
}
