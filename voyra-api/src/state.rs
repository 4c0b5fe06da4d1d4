use std::sync::Arc;
use voyra_booking::{BookingService, PaymentStateMachine, TicketIssuer};
use voyra_store::app_config::BusinessRules;

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<BookingService>,
    pub payments: Arc<PaymentStateMachine>,
    pub tickets: Arc<TicketIssuer>,
    pub business_rules: BusinessRules,
}
