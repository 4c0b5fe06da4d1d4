use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use voyra_core::{
    Booking, BookingLedger, BookingStatus, Payment, PaymentLedger, PaymentOutcome, PaymentStatus,
    Ticket,
};

use crate::error::BookingError;
use crate::service::BookingService;
use crate::ticket::TicketIssuer;

/// Resolved state after a payment notification was applied
#[derive(Debug, Clone, Serialize)]
pub struct PaymentApplied {
    pub booking: Booking,
    pub payment: Payment,
    pub ticket: Option<Ticket>,
}

/// Drives a booking from pending to confirmed or cancelled on payment
/// outcome.
///
/// The upstream notifier delivers at-least-once, so `apply` is idempotent:
/// once a completed payment exists every further notification for that
/// booking is a no-op. Notifications run under the booking service's
/// per-booking guard, so they serialize with each other and with explicit
/// cancellations; different bookings proceed independently.
pub struct PaymentStateMachine {
    bookings: Arc<BookingService>,
    ledger: Arc<dyn BookingLedger>,
    payments: Arc<dyn PaymentLedger>,
    issuer: Arc<TicketIssuer>,
}

impl PaymentStateMachine {
    pub fn new(
        bookings: Arc<BookingService>,
        ledger: Arc<dyn BookingLedger>,
        payments: Arc<dyn PaymentLedger>,
        issuer: Arc<TicketIssuer>,
    ) -> Self {
        Self {
            bookings,
            ledger,
            payments,
            issuer,
        }
    }

    pub async fn apply(
        &self,
        booking_id: Uuid,
        outcome: PaymentOutcome,
        transaction_reference: String,
    ) -> Result<PaymentApplied, BookingError> {
        let guards = self.bookings.guards();
        let held = guards.acquire(booking_id).await;
        let result = self
            .apply_locked(booking_id, outcome, transaction_reference)
            .await;
        drop(held);
        guards.release(booking_id).await;
        result
    }

    async fn apply_locked(
        &self,
        booking_id: Uuid,
        outcome: PaymentOutcome,
        transaction_reference: String,
    ) -> Result<PaymentApplied, BookingError> {
        let booking = self
            .ledger
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        // Duplicate delivery: a completed payment already settled this
        // booking, nothing left to drive.
        if let Some(existing) = self
            .payments
            .completed_payment_for_booking(booking_id)
            .await?
        {
            if outcome == PaymentOutcome::Failed {
                warn!(
                    "stale failed notification for booking {} after completed payment {}",
                    booking_id, existing.transaction_reference
                );
            }
            let ticket = self.issuer.existing_ticket(booking_id).await?;
            return Ok(PaymentApplied {
                booking,
                payment: existing,
                ticket,
            });
        }

        match outcome {
            PaymentOutcome::Completed => {
                self.apply_completed(booking, transaction_reference).await
            }
            PaymentOutcome::Failed => self.apply_failed(booking, transaction_reference).await,
        }
    }

    async fn apply_completed(
        &self,
        booking: Booking,
        transaction_reference: String,
    ) -> Result<PaymentApplied, BookingError> {
        let payment = Payment::new(
            booking.id,
            booking.total_price_amount,
            booking.currency.clone(),
            PaymentStatus::Completed,
            transaction_reference,
        );
        self.payments.record_payment(&payment).await?;

        match booking.status {
            BookingStatus::Pending => {
                self.ledger
                    .update_booking_status(booking.id, BookingStatus::Confirmed)
                    .await?;
                let mut confirmed = booking;
                confirmed.update_status(BookingStatus::Confirmed);

                info!("Booking {} confirmed by payment {}", confirmed.id, payment.id);

                let ticket = self.issuer.issue_if_confirmed(confirmed.id).await?;
                Ok(PaymentApplied {
                    booking: confirmed,
                    payment,
                    ticket: Some(ticket),
                })
            }
            BookingStatus::Confirmed => {
                // Already confirmed without a recorded completed payment;
                // record settled state and make sure a ticket exists.
                let ticket = self.issuer.issue_if_confirmed(booking.id).await?;
                Ok(PaymentApplied {
                    booking,
                    payment,
                    ticket: Some(ticket),
                })
            }
            BookingStatus::Cancelled => {
                // Funds arrived for a booking that no longer holds seats.
                // Keep the cancellation; the refund flow is outside this
                // engine.
                warn!(
                    "completed payment {} arrived for cancelled booking {}",
                    payment.transaction_reference, booking.id
                );
                Ok(PaymentApplied {
                    booking,
                    payment,
                    ticket: None,
                })
            }
        }
    }

    async fn apply_failed(
        &self,
        booking: Booking,
        transaction_reference: String,
    ) -> Result<PaymentApplied, BookingError> {
        let payment = Payment::new(
            booking.id,
            booking.total_price_amount,
            booking.currency.clone(),
            PaymentStatus::Failed,
            transaction_reference,
        );
        self.payments.record_payment(&payment).await?;

        match booking.status {
            BookingStatus::Pending => {
                info!("Booking {} cancelled after failed payment", booking.id);
                let cancelled = self.bookings.cancel_and_release(booking).await?;
                Ok(PaymentApplied {
                    booking: cancelled,
                    payment,
                    ticket: None,
                })
            }
            // Failed attempt against a booking that is already resolved;
            // record it and leave the state alone.
            _ => Ok(PaymentApplied {
                booking,
                payment,
                ticket: None,
            }),
        }
    }
}
