use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use voyra_core::{
    Booking, BookingLedger, BookingStatus, PaymentLedger, Trip, TripAvailabilityStore,
    TripSummary, Versioned, WriteOutcome,
};

use crate::error::BookingError;
use crate::guards::BookingGuards;
use crate::retry::{Attempt, ConflictRetryPolicy, RetryError};

/// Result of a successful booking creation
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub available_seats: i32,
}

/// A booking joined with its trip summary, for listings
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub booking: Booking,
    pub trip: TripSummary,
}

/// Orchestrates seat-availability checks, the conditional seat decrement and
/// booking-record creation, and owns the booking lifecycle state machine.
///
/// Correctness rests entirely on the availability store's conditional write:
/// no in-process lock is taken on trip rows, so the same guarantees hold
/// across any number of service instances.
pub struct BookingService {
    trips: Arc<dyn TripAvailabilityStore>,
    ledger: Arc<dyn BookingLedger>,
    payments: Arc<dyn PaymentLedger>,
    retry: ConflictRetryPolicy,
    guards: BookingGuards,
}

impl BookingService {
    pub fn new(
        trips: Arc<dyn TripAvailabilityStore>,
        ledger: Arc<dyn BookingLedger>,
        payments: Arc<dyn PaymentLedger>,
        retry: ConflictRetryPolicy,
    ) -> Self {
        Self {
            trips,
            ledger,
            payments,
            retry,
            guards: BookingGuards::default(),
        }
    }

    /// Per-booking locks shared with the payment state machine so both
    /// lifecycle writers serialize on the same booking.
    pub(crate) fn guards(&self) -> &BookingGuards {
        &self.guards
    }

    /// Seeding hook for the external scheduling collaborator
    pub async fn schedule_trip(&self, trip: Trip) -> Result<Trip, BookingError> {
        if trip.total_seats < 1 {
            return Err(BookingError::InvalidTripCapacity(trip.total_seats));
        }
        if trip.unit_price_amount < 1 {
            return Err(BookingError::InvalidUnitPrice(trip.unit_price_amount));
        }

        self.trips.insert_trip(&trip).await?;
        info!(
            "Trip scheduled: {} {} -> {} ({} seats)",
            trip.id, trip.origin, trip.destination, trip.total_seats
        );
        Ok(trip)
    }

    pub async fn trip(&self, trip_id: Uuid) -> Result<Trip, BookingError> {
        let read = self.trips.get_trip(trip_id).await?;
        read.map(|v| v.value)
            .ok_or(BookingError::TripNotFound(trip_id))
    }

    /// Creates a pending booking and consumes seats as one observable unit.
    ///
    /// Each retry round re-reads the trip, re-checks capacity against fresh
    /// state, and attempts the conditional decrement; a version mismatch
    /// yields another round, while capacity and not-found failures abort
    /// without writing. An exhausted budget surfaces as `Conflict` with zero
    /// residual state: no booking row, no seats consumed.
    pub async fn create_booking(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
        passenger_count: i32,
    ) -> Result<BookingConfirmation, BookingError> {
        if passenger_count < 1 {
            return Err(BookingError::InvalidPassengerCount(passenger_count));
        }

        let trips = Arc::clone(&self.trips);
        let ledger = Arc::clone(&self.ledger);
        let retry = self.retry;

        let result = retry
            .run(move |_attempt| {
                let trips = Arc::clone(&trips);
                let ledger = Arc::clone(&ledger);
                async move {
                    let Versioned {
                        value: trip,
                        version,
                    } = trips
                        .get_trip(trip_id)
                        .await?
                        .ok_or(BookingError::TripNotFound(trip_id))?;

                    if !trip.is_bookable() {
                        return Err(BookingError::TripInactive(trip_id));
                    }
                    if passenger_count > trip.available_seats {
                        return Err(BookingError::InsufficientCapacity {
                            requested: passenger_count,
                            available: trip.available_seats,
                        });
                    }

                    let booking = Booking::new(&trip, user_id, passenger_count);
                    let mut updated = trip.clone();
                    updated.available_seats -= passenger_count;

                    match trips.put_trip_if_match(&updated, version).await? {
                        WriteOutcome::Committed(_) => {
                            if let Err(err) = ledger.insert_booking(&booking).await {
                                // The decrement committed but the booking record
                                // did not; put the seats back so neither half is
                                // observable on its own.
                                error!(
                                    "booking insert failed after seat decrement on trip {}: {}",
                                    trip_id, err
                                );
                                if let Err(comp) = Self::release_seats(
                                    Arc::clone(&trips),
                                    retry,
                                    trip_id,
                                    passenger_count,
                                )
                                .await
                                {
                                    error!(
                                        "compensating increment failed for trip {}: {}",
                                        trip_id, comp
                                    );
                                }
                                return Err(err.into());
                            }

                            info!(
                                "Booking {} created on trip {} ({} pax, {} seats left)",
                                booking.id, trip_id, passenger_count, updated.available_seats
                            );
                            Ok(Attempt::Committed(BookingConfirmation {
                                booking,
                                available_seats: updated.available_seats,
                            }))
                        }
                        WriteOutcome::VersionMismatch => Ok(Attempt::Contended),
                    }
                }
            })
            .await;

        match result {
            Ok(confirmation) => Ok(confirmation),
            Err(RetryError::Exhausted { attempts }) => Err(BookingError::Conflict { attempts }),
            Err(RetryError::Inner(err)) => Err(err),
        }
    }

    /// Cancels a booking and releases its seats.
    ///
    /// Idempotent: an already-cancelled booking is returned unchanged. A
    /// booking with a completed payment is refused with `PaymentSettled`;
    /// refunds are a separate concern.
    ///
    /// Runs under the per-booking guard shared with the payment state
    /// machine, so the status read, the settled-payment check and the
    /// cancellation write cannot interleave with a concurrent payment
    /// notification for the same booking.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let held = self.guards.acquire(booking_id).await;
        let result = self.cancel_booking_locked(booking_id).await;
        drop(held);
        self.guards.release(booking_id).await;
        result
    }

    async fn cancel_booking_locked(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let booking = self
            .ledger
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        match booking.status {
            BookingStatus::Cancelled => Ok(booking),
            BookingStatus::Pending | BookingStatus::Confirmed => {
                if self
                    .payments
                    .completed_payment_for_booking(booking_id)
                    .await?
                    .is_some()
                {
                    return Err(BookingError::PaymentSettled(booking_id));
                }
                self.cancel_and_release(booking).await
            }
        }
    }

    pub async fn bookings_for_user(&self, user_id: Uuid) -> Result<Vec<BookingView>, BookingError> {
        let bookings = self.ledger.list_bookings_for_user(user_id).await?;

        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let trip = self.trip(booking.trip_id).await?;
            views.push(BookingView {
                trip: TripSummary::from(&trip),
                booking,
            });
        }
        Ok(views)
    }

    /// Shared cancellation path, also driven by the payment state machine on
    /// payment failure.
    ///
    /// The status flips to cancelled before the seat release so concurrent
    /// cancellations observe `Cancelled` and no-op instead of releasing the
    /// seats twice. If the release then exhausts its budget the booking stays
    /// cancelled and `CompensationFailed` is surfaced: seats may be
    /// under-released until an operator reconciles the trip.
    pub(crate) async fn cancel_and_release(
        &self,
        booking: Booking,
    ) -> Result<Booking, BookingError> {
        self.ledger
            .update_booking_status(booking.id, BookingStatus::Cancelled)
            .await?;

        let mut cancelled = booking;
        cancelled.update_status(BookingStatus::Cancelled);

        match Self::release_seats(
            Arc::clone(&self.trips),
            self.retry,
            cancelled.trip_id,
            cancelled.passenger_count,
        )
        .await
        {
            Ok(available) => {
                info!(
                    "Booking {} cancelled, trip {} back to {} available seats",
                    cancelled.id, cancelled.trip_id, available
                );
                Ok(cancelled)
            }
            Err(BookingError::Conflict { attempts }) => {
                warn!(
                    "seat release for booking {} contended past {} attempts",
                    cancelled.id, attempts
                );
                Err(BookingError::CompensationFailed {
                    booking_id: cancelled.id,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Compensating conditional increment, clamped to the trip's capacity.
    /// Same retry discipline as the decrement.
    async fn release_seats(
        trips: Arc<dyn TripAvailabilityStore>,
        retry: ConflictRetryPolicy,
        trip_id: Uuid,
        seats: i32,
    ) -> Result<i32, BookingError> {
        let result = retry
            .run(move |_attempt| {
                let trips = Arc::clone(&trips);
                async move {
                    let Versioned {
                        value: trip,
                        version,
                    } = trips
                        .get_trip(trip_id)
                        .await?
                        .ok_or(BookingError::TripNotFound(trip_id))?;

                    let mut updated = trip.clone();
                    updated.available_seats =
                        (trip.available_seats + seats).min(trip.total_seats);

                    match trips.put_trip_if_match(&updated, version).await? {
                        WriteOutcome::Committed(_) => {
                            Ok(Attempt::Committed(updated.available_seats))
                        }
                        WriteOutcome::VersionMismatch => Ok(Attempt::Contended),
                    }
                }
            })
            .await;

        match result {
            Ok(available) => Ok(available),
            Err(RetryError::Exhausted { attempts }) => Err(BookingError::Conflict { attempts }),
            Err(RetryError::Inner(err)) => Err(err),
        }
    }
}
