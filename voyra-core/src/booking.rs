use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trip::Trip;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A seat reservation against a trip.
///
/// Prices are copied from the trip at creation time and frozen; later price
/// changes on the trip never affect an existing booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub passenger_count: i32,
    pub unit_price_amount: i32,
    pub total_price_amount: i32,
    pub currency: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(trip: &Trip, user_id: Uuid, passenger_count: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            user_id,
            passenger_count,
            unit_price_amount: trip.unit_price_amount,
            total_price_amount: trip.unit_price_amount * passenger_count,
            currency: trip.currency.clone(),
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Bookings that still hold seats (pending or confirmed)
    pub fn holds_seats(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}
