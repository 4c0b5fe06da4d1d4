pub mod booking;
pub mod payment;
pub mod store;
pub mod ticket;
pub mod trip;

pub use booking::{Booking, BookingStatus};
pub use payment::{Payment, PaymentOutcome, PaymentStatus};
pub use store::{
    BookingLedger, PaymentLedger, StoreError, TicketStore, TripAvailabilityStore, Version,
    Versioned, WriteOutcome,
};
pub use ticket::Ticket;
pub use trip::{Trip, TripStatus, TripSummary};
