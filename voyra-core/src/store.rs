use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::payment::Payment;
use crate::ticket::Ticket;
use crate::trip::Trip;

/// Opaque per-row version token. Changes on every committed write; equality
/// against the token read earlier is the store's entire concurrency contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Version(u64);

impl Version {
    pub fn initial() -> Self {
        Version(0)
    }

    pub fn next(self) -> Self {
        Version(self.0.wrapping_add(1))
    }
}

/// A value read together with the version token it was read at
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

/// Result of a conditional write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The version matched; the write committed and the row now carries the
    /// returned token.
    Committed(Version),
    /// Another writer got there first; the caller must re-read and recompute.
    VersionMismatch,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate row: {0}")]
    Duplicate(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Seat availability rows with optimistic concurrency.
///
/// `put_trip_if_match` is the only mutation path for `available_seats`; any
/// backing store offering row-level compare-and-swap (version column, ETag,
/// CAS primitive) can implement this.
#[async_trait]
pub trait TripAvailabilityStore: Send + Sync {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError>;

    async fn get_trip(&self, trip_id: Uuid) -> Result<Option<Versioned<Trip>>, StoreError>;

    /// Conditional write: commits only if the stored version still equals
    /// `expected`, otherwise reports `VersionMismatch` without writing.
    async fn put_trip_if_match(
        &self,
        trip: &Trip,
        expected: Version,
    ) -> Result<WriteOutcome, StoreError>;
}

/// Durable booking records, keyed by id, independent of trip rows
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), StoreError>;

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError>;

    async fn list_bookings_for_trip(&self, trip_id: Uuid) -> Result<Vec<Booking>, StoreError>;
}

#[async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn record_payment(&self, payment: &Payment) -> Result<(), StoreError>;

    /// The at-most-one completed payment for a booking, if any
    async fn completed_payment_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Payment>, StoreError>;
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Rejects a second ticket for the same booking with
    /// `StoreError::Duplicate`.
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    async fn ticket_for_booking(&self, booking_id: Uuid) -> Result<Option<Ticket>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tokens_differ_after_bump() {
        let v = Version::initial();
        assert_ne!(v, v.next());
        assert_eq!(v.next(), v.next());
    }
}
