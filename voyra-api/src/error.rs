use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use voyra_booking::BookingError;

#[derive(Debug)]
pub enum AppError {
    Booking(BookingError),
    Anyhow(anyhow::Error),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        Self::Booking(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Booking(err) => {
                let (status, code) = match &err {
                    BookingError::InsufficientCapacity { .. } => {
                        (StatusCode::BAD_REQUEST, "InsufficientCapacity")
                    }
                    BookingError::InvalidPassengerCount(_) => {
                        (StatusCode::BAD_REQUEST, "InvalidPassengerCount")
                    }
                    BookingError::InvalidTripCapacity(_) => {
                        (StatusCode::BAD_REQUEST, "InvalidTripCapacity")
                    }
                    BookingError::InvalidUnitPrice(_) => {
                        (StatusCode::BAD_REQUEST, "InvalidUnitPrice")
                    }
                    BookingError::TripNotFound(_) => (StatusCode::NOT_FOUND, "TripNotFound"),
                    BookingError::BookingNotFound(_) => {
                        (StatusCode::NOT_FOUND, "BookingNotFound")
                    }
                    BookingError::Conflict { .. } => (StatusCode::CONFLICT, "Conflict"),
                    BookingError::TripInactive(_) => (StatusCode::CONFLICT, "TripInactive"),
                    BookingError::BookingNotConfirmed(_) => {
                        (StatusCode::CONFLICT, "BookingNotConfirmed")
                    }
                    BookingError::PaymentSettled(_) => (StatusCode::CONFLICT, "PaymentSettled"),
                    BookingError::CompensationFailed { .. } => {
                        tracing::error!("compensation failed: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "CompensationFailed")
                    }
                    BookingError::Store(_) => {
                        tracing::error!("store error: {}", err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal")
                    }
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "Internal Server Error".to_string()
                } else {
                    err.to_string()
                };
                (status, code, message)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
