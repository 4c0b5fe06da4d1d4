use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use voyra_core::{
    Booking, BookingLedger, BookingStatus, Payment, PaymentLedger, PaymentStatus, StoreError,
    Ticket, TicketStore, Trip, TripAvailabilityStore, Version, Versioned, WriteOutcome,
};

/// In-memory store implementing every backing-store trait with real
/// compare-and-swap semantics on trip rows.
///
/// Stands in for any row-versioned store in tests and single-node deployments;
/// the engine only ever talks to the trait contracts.
#[derive(Default)]
pub struct MemoryStore {
    trips: RwLock<HashMap<Uuid, (Trip, Version)>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    payments: RwLock<Vec<Payment>>,
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripAvailabilityStore for MemoryStore {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        let mut trips = self.trips.write().await;
        if trips.contains_key(&trip.id) {
            return Err(StoreError::Duplicate(format!("trip {}", trip.id)));
        }
        trips.insert(trip.id, (trip.clone(), Version::initial()));
        Ok(())
    }

    async fn get_trip(&self, trip_id: Uuid) -> Result<Option<Versioned<Trip>>, StoreError> {
        let trips = self.trips.read().await;
        Ok(trips.get(&trip_id).map(|(trip, version)| Versioned {
            value: trip.clone(),
            version: *version,
        }))
    }

    async fn put_trip_if_match(
        &self,
        trip: &Trip,
        expected: Version,
    ) -> Result<WriteOutcome, StoreError> {
        let mut trips = self.trips.write().await;
        match trips.get_mut(&trip.id) {
            Some((stored, version)) => {
                if *version != expected {
                    debug!("version mismatch on trip {}", trip.id);
                    return Ok(WriteOutcome::VersionMismatch);
                }
                let next = version.next();
                *stored = trip.clone();
                *version = next;
                Ok(WriteOutcome::Committed(next))
            }
            None => Err(StoreError::Unavailable(format!(
                "trip {} vanished under conditional write",
                trip.id
            ))),
        }
    }
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(StoreError::Duplicate(format!("booking {}", booking.id)));
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&booking_id).cloned())
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<(), StoreError> {
        let mut bookings = self.bookings.write().await;
        match bookings.get_mut(&booking_id) {
            Some(booking) => {
                booking.update_status(status);
                Ok(())
            }
            None => Err(StoreError::Unavailable(format!(
                "booking {} not in ledger",
                booking_id
            ))),
        }
    }

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.created_at);
        Ok(found)
    }

    async fn list_bookings_for_trip(&self, trip_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.bookings.read().await;
        Ok(bookings
            .values()
            .filter(|b| b.trip_id == trip_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentLedger for MemoryStore {
    async fn record_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        if payment.status == PaymentStatus::Completed
            && payments
                .iter()
                .any(|p| p.booking_id == payment.booking_id && p.status == PaymentStatus::Completed)
        {
            return Err(StoreError::Duplicate(format!(
                "completed payment for booking {}",
                payment.booking_id
            )));
        }
        payments.push(payment.clone());
        Ok(())
    }

    async fn completed_payment_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Payment>, StoreError> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .find(|p| p.booking_id == booking_id && p.status == PaymentStatus::Completed)
            .cloned())
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.booking_id) {
            return Err(StoreError::Duplicate(format!(
                "ticket for booking {}",
                ticket.booking_id
            )));
        }
        tickets.insert(ticket.booking_id, ticket.clone());
        Ok(())
    }

    async fn ticket_for_booking(&self, booking_id: Uuid) -> Result<Option<Ticket>, StoreError> {
        let tickets = self.tickets.read().await;
        Ok(tickets.get(&booking_id).cloned())
    }
}
