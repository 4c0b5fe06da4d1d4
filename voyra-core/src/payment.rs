use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Terminal outcome reported by the upstream payment notifier.
///
/// Delivery is at-least-once; the state machine must treat duplicates as
/// no-ops, never as errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Completed,
    Failed,
}

/// A payment attempt against a booking. Multiple failed attempts may exist;
/// at most one reaches `Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub status: PaymentStatus,
    pub transaction_reference: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        booking_id: Uuid,
        amount: i32,
        currency: String,
        status: PaymentStatus,
        transaction_reference: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            amount,
            currency,
            status,
            transaction_reference,
            created_at: Utc::now(),
        }
    }
}
