use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Scheduled,
    Cancelled,
    Completed,
}

/// A scheduled trip with a fixed seat capacity.
///
/// `available_seats` is only ever mutated through the availability store's
/// conditional write; `total_seats` is immutable after scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub total_seats: i32,
    pub available_seats: i32,
    pub unit_price_amount: i32,
    pub currency: String,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn new(
        origin: String,
        destination: String,
        departure_at: DateTime<Utc>,
        total_seats: i32,
        unit_price_amount: i32,
        currency: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            destination,
            departure_at,
            total_seats,
            available_seats: total_seats,
            unit_price_amount,
            currency,
            status: TripStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    /// Only scheduled trips accept new bookings
    pub fn is_bookable(&self) -> bool {
        self.status == TripStatus::Scheduled
    }
}

/// Flattened trip view embedded in booking listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    pub trip_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub departure_at: DateTime<Utc>,
    pub status: TripStatus,
}

impl From<&Trip> for TripSummary {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            departure_at: trip.departure_at,
            status: trip.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trip_starts_full_and_scheduled() {
        let trip = Trip::new(
            "ACC".to_string(),
            "KSI".to_string(),
            Utc::now(),
            45,
            2500,
            "GHS".to_string(),
        );

        assert_eq!(trip.available_seats, 45);
        assert_eq!(trip.total_seats, 45);
        assert!(trip.is_bookable());
    }

    #[test]
    fn test_cancelled_trip_is_not_bookable() {
        let mut trip = Trip::new(
            "ACC".to_string(),
            "TML".to_string(),
            Utc::now(),
            30,
            4000,
            "GHS".to_string(),
        );
        trip.status = TripStatus::Cancelled;

        assert!(!trip.is_bookable());
    }
}
