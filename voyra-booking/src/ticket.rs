use chrono::Duration;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use voyra_core::{BookingLedger, BookingStatus, StoreError, Ticket, TicketStore};

use crate::error::BookingError;

/// Issues at most one ticket per confirmed booking.
pub struct TicketIssuer {
    tickets: Arc<dyn TicketStore>,
    ledger: Arc<dyn BookingLedger>,
    validity: Duration,
}

impl TicketIssuer {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        ledger: Arc<dyn BookingLedger>,
        validity_days: i64,
    ) -> Self {
        Self {
            tickets,
            ledger,
            validity: Duration::days(validity_days),
        }
    }

    /// Issues a ticket for a confirmed booking, or returns the existing one.
    ///
    /// Calling this before the booking is confirmed is caller misuse and
    /// fails with `BookingNotConfirmed`; it is never retried here.
    pub async fn issue_if_confirmed(&self, booking_id: Uuid) -> Result<Ticket, BookingError> {
        let booking = self
            .ledger
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        if booking.status != BookingStatus::Confirmed {
            return Err(BookingError::BookingNotConfirmed(booking_id));
        }

        if let Some(existing) = self.tickets.ticket_for_booking(booking_id).await? {
            return Ok(existing);
        }

        let ticket = Ticket::new(booking_id, self.validity);
        match self.tickets.insert_ticket(&ticket).await {
            Ok(()) => {
                info!(
                    "Ticket {} issued for booking {} (expires {})",
                    ticket.reference, booking_id, ticket.expires_at
                );
                Ok(ticket)
            }
            // Lost an issuance race; hand back the winner's ticket
            Err(StoreError::Duplicate(_)) => self
                .tickets
                .ticket_for_booking(booking_id)
                .await?
                .ok_or_else(|| {
                    StoreError::Unavailable(format!(
                        "ticket for booking {} duplicate-rejected but absent",
                        booking_id
                    ))
                    .into()
                }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn existing_ticket(&self, booking_id: Uuid) -> Result<Option<Ticket>, BookingError> {
        Ok(self.tickets.ticket_for_booking(booking_id).await?)
    }
}
