use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voyra_api::{app, AppState};
use voyra_booking::{BookingService, ConflictRetryPolicy, PaymentStateMachine, TicketIssuer};
use voyra_core::{BookingLedger, PaymentLedger, TicketStore, TripAvailabilityStore};
use voyra_store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voyra_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = voyra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Voyra API on port {}", config.server.port);

    let rules = config.business_rules.clone();

    // Single-node deployment backed by the in-memory versioned store; any
    // row-versioned store can be wired in through the same traits.
    let store = Arc::new(MemoryStore::new());
    let trips: Arc<dyn TripAvailabilityStore> = store.clone();
    let ledger: Arc<dyn BookingLedger> = store.clone();
    let payment_ledger: Arc<dyn PaymentLedger> = store.clone();
    let ticket_store: Arc<dyn TicketStore> = store.clone();

    let retry = ConflictRetryPolicy::new(
        rules.max_write_attempts,
        Duration::from_millis(rules.retry_backoff_ms),
    );

    let bookings = Arc::new(BookingService::new(
        trips,
        ledger.clone(),
        payment_ledger.clone(),
        retry,
    ));
    let tickets = Arc::new(TicketIssuer::new(
        ticket_store,
        ledger.clone(),
        rules.ticket_validity_days,
    ));
    let payments = Arc::new(PaymentStateMachine::new(
        bookings.clone(),
        ledger,
        payment_ledger,
        tickets.clone(),
    ));

    let app_state = AppState {
        bookings,
        payments,
        tickets,
        business_rules: rules,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
