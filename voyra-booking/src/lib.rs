pub mod error;
mod guards;
pub mod payment;
pub mod retry;
pub mod service;
pub mod ticket;

pub use error::BookingError;
pub use payment::{PaymentApplied, PaymentStateMachine};
pub use retry::{Attempt, ConflictRetryPolicy, RetryError};
pub use service::{BookingConfirmation, BookingService, BookingView};
pub use ticket::TicketIssuer;
