use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One mutex per booking id so lifecycle writes for the same booking run one
/// at a time; different bookings proceed independently.
///
/// Both the payment state machine and explicit cancellation go through the
/// same map, so a cancellation can never interleave with a payment
/// notification for the same booking.
#[derive(Default)]
pub(crate) struct BookingGuards {
    map: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BookingGuards {
    pub(crate) async fn acquire(&self, booking_id: Uuid) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.map.lock().await;
            map.entry(booking_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }

    /// Drops the entry once no task holds or waits on its mutex. Callers
    /// release after dropping their guard so the map does not grow with every
    /// booking ever touched.
    pub(crate) async fn release(&self, booking_id: Uuid) {
        let mut map = self.map.lock().await;
        if let Some(entry) = map.get(&booking_id) {
            if Arc::strong_count(entry) == 1 {
                map.remove(&booking_id);
            }
        }
    }
}
