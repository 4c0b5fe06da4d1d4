use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use uuid::Uuid;

use voyra_api::{app, AppState};
use voyra_booking::{BookingService, ConflictRetryPolicy, PaymentStateMachine, TicketIssuer};
use voyra_core::{BookingLedger, PaymentLedger, TicketStore, TripAvailabilityStore};
use voyra_store::{app_config::BusinessRules, MemoryStore};

fn test_app() -> axum::Router {
    let store = Arc::new(MemoryStore::new());
    let trips: Arc<dyn TripAvailabilityStore> = store.clone();
    let ledger: Arc<dyn BookingLedger> = store.clone();
    let payment_ledger: Arc<dyn PaymentLedger> = store.clone();
    let tickets_store: Arc<dyn TicketStore> = store.clone();

    let bookings = Arc::new(BookingService::new(
        trips,
        ledger.clone(),
        payment_ledger.clone(),
        ConflictRetryPolicy::new(4, Duration::ZERO),
    ));
    let tickets = Arc::new(TicketIssuer::new(tickets_store, ledger.clone(), 7));
    let payments = Arc::new(PaymentStateMachine::new(
        bookings.clone(),
        ledger,
        payment_ledger,
        tickets.clone(),
    ));

    app(AppState {
        bookings,
        payments,
        tickets,
        business_rules: BusinessRules::default(),
    })
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn schedule_trip(app: &axum::Router, seats: i32) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/v1/trips",
        Some(json!({
            "origin": "ACC",
            "destination": "KSI",
            "departure_at": "2026-09-10T06:30:00Z",
            "total_seats": seats,
            "unit_price_amount": 2500,
            "currency": "GHS",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn booking_to_ticket_happy_path() {
    let app = test_app();
    let trip = schedule_trip(&app, 30).await;
    let trip_id = trip["id"].as_str().unwrap();
    let user_id = Uuid::new_v4();

    let (status, created) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({
            "trip_id": trip_id,
            "user_id": user_id,
            "passenger_count": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["booking"]["status"], "PENDING");
    assert_eq!(created["available_seats"], 28);

    let booking_id = created["booking"]["id"].as_str().unwrap();

    // Ticket before confirmation is refused
    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/bookings/{}/ticket", booking_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "BookingNotConfirmed");

    // Payment notification confirms and issues the ticket
    let (status, applied) = send(
        &app,
        "POST",
        &format!("/v1/payments/{}/notify", booking_id),
        Some(json!({
            "status": "completed",
            "transaction_reference": "txn-9000",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["booking"]["status"], "CONFIRMED");
    let reference = applied["ticket"]["reference"].as_str().unwrap().to_string();

    // Re-fetching the ticket yields the same artifact
    let (status, artifact) = send(
        &app,
        "POST",
        &format!("/v1/bookings/{}/ticket", booking_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(artifact["ticket"]["reference"], reference.as_str());
    assert!(artifact["qr_data"].as_str().unwrap().contains(&reference));

    // Listing embeds the trip summary
    let (status, listed) = send(&app, "GET", &format!("/v1/bookings/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["trip"]["origin"], "ACC");
}

#[tokio::test]
async fn webhook_is_safe_to_deliver_twice() {
    let app = test_app();
    let trip = schedule_trip(&app, 10).await;
    let (_, created) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({
            "trip_id": trip["id"],
            "user_id": Uuid::new_v4(),
            "passenger_count": 1,
        })),
    )
    .await;
    let booking_id = created["booking"]["id"].as_str().unwrap().to_string();

    let notify = json!({ "status": "completed", "transaction_reference": "txn-1" });
    let (status, first) = send(
        &app,
        "POST",
        &format!("/v1/payments/{}/notify", booking_id),
        Some(notify.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = send(
        &app,
        "POST",
        &format!("/v1/payments/{}/notify", booking_id),
        Some(notify),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first["ticket"]["reference"],
        second["ticket"]["reference"]
    );
}

#[tokio::test]
async fn capacity_and_not_found_error_contracts() {
    let app = test_app();
    let trip = schedule_trip(&app, 3).await;

    // One seat past capacity
    let (status, body) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({
            "trip_id": trip["id"],
            "user_id": Uuid::new_v4(),
            "passenger_count": 4,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InsufficientCapacity");

    // Unknown trip
    let (status, body) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({
            "trip_id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "passenger_count": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TripNotFound");

    // A trip without capacity cannot be seeded
    let (status, body) = send(
        &app,
        "POST",
        "/v1/trips",
        Some(json!({
            "origin": "ACC",
            "destination": "KSI",
            "departure_at": "2026-09-10T06:30:00Z",
            "total_seats": 0,
            "unit_price_amount": 2500,
            "currency": "GHS",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidTripCapacity");

    // Unknown booking for the webhook
    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/payments/{}/notify", Uuid::new_v4()),
        Some(json!({ "status": "failed", "transaction_reference": "txn-x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BookingNotFound");
}

#[tokio::test]
async fn failed_payment_restores_availability_over_http() {
    let app = test_app();
    let trip = schedule_trip(&app, 8).await;
    let trip_id = trip["id"].as_str().unwrap().to_string();

    let (_, created) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({
            "trip_id": trip_id,
            "user_id": Uuid::new_v4(),
            "passenger_count": 5,
        })),
    )
    .await;
    assert_eq!(created["available_seats"], 3);
    let booking_id = created["booking"]["id"].as_str().unwrap().to_string();

    let (status, applied) = send(
        &app,
        "POST",
        &format!("/v1/payments/{}/notify", booking_id),
        Some(json!({ "status": "failed", "transaction_reference": "txn-bad" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["booking"]["status"], "CANCELLED");

    let (status, fetched) = send(&app, "GET", &format!("/v1/trips/{}", trip_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["available_seats"], 8);
}
