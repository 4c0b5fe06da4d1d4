use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Travel ticket issued for a confirmed booking. At most one per booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub reference: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(booking_id: Uuid, validity: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            booking_id,
            reference: Self::generate_reference(&booking_id),
            issued_at,
            expires_at: issued_at + validity,
        }
    }

    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        at > self.expires_at
    }

    // Format: VY-{timestamp}-{short_uuid}
    fn generate_reference(booking_id: &Uuid) -> String {
        let timestamp = Utc::now().timestamp();
        let short_id = &booking_id.to_string()[..8];
        format!("VY-{}-{}", timestamp, short_id.to_uppercase())
    }
}
