use uuid::Uuid;
use voyra_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("trip is not accepting bookings: {0}")]
    TripInactive(Uuid),

    #[error("insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: i32, available: i32 },

    #[error("conditional write contended after {attempts} attempts")]
    Conflict { attempts: u32 },

    #[error("passenger count must be at least 1, got {0}")]
    InvalidPassengerCount(i32),

    #[error("trip capacity must be at least 1 seat, got {0}")]
    InvalidTripCapacity(i32),

    #[error("unit price must be a positive amount, got {0}")]
    InvalidUnitPrice(i32),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("booking {0} has a completed payment and cannot be cancelled")]
    PaymentSettled(Uuid),

    #[error("booking {0} is not confirmed; no ticket can be issued")]
    BookingNotConfirmed(Uuid),

    #[error("compensating seat release failed for booking {booking_id}; operator attention required")]
    CompensationFailed { booking_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}
