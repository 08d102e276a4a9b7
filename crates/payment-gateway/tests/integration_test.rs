//! Integration tests for the payment gateway
//!
//! Drive the gateway router end-to-end against an in-process acquiring
//! bank: the real simulator for the standard outcomes, plus purpose-built
//! banks for the rejection, retry and bad-body paths.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use payment_gateway::bank::AcquiringBankClient;
use payment_gateway::pipeline::PaymentsPipeline;
use payment_gateway::retry::RetryPolicy;
use payment_gateway::validation::PaymentValidator;
use payment_gateway::{create_router, AppState, PaymentStore};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

/// Serve a router on an ephemeral port, returning its base URL
async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Build a gateway wired to the given bank URL
fn create_test_gateway(bank_url: String) -> (Router, PaymentStore) {
    let bank = AcquiringBankClient::new(
        bank_url,
        Duration::from_secs(2),
        RetryPolicy::new(3, Duration::from_millis(10)),
    )
    .unwrap();

    let validator = PaymentValidator::new(
        ["GBP", "USD", "EUR"].iter().map(|s| s.to_string()).collect(),
    );
    let store = PaymentStore::new();
    let pipeline = Arc::new(PaymentsPipeline::new(
        validator,
        Arc::new(bank),
        store.clone(),
    ));

    let state = AppState {
        submitter: pipeline.clone(),
        reader: pipeline,
    };

    (create_router(state), store)
}

fn payment_json(card_number: &str) -> Value {
    json!({
        "card_number": card_number,
        "expiry_month": 4,
        "expiry_year": 2099,
        "currency": "GBP",
        "amount": 100,
        "cvv": "123"
    })
}

async fn post_payment(app: &Router, body: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/payments")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn get_payment(app: &Router, id: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/payments/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, _store) = create_test_gateway(bank_url);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "payment-gateway");
}

#[tokio::test]
async fn test_authorized_payment_roundtrip() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, _store) = create_test_gateway(bank_url);

    let (status, body) = post_payment(&app, &payment_json("11111111111111")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Authorized");
    assert_eq!(body["card_number_last_four"], "1111");
    assert_eq!(body["expiry_month"], 4);
    assert_eq!(body["expiry_year"], 2099);
    assert_eq!(body["currency"], "GBP");
    assert_eq!(body["amount"], 100);

    // The full PAN never appears in the response.
    assert!(!body.to_string().contains("11111111111111"));

    // Lookup returns a record equal in every field.
    let id = body["id"].as_str().unwrap();
    let (get_status, fetched) = get_payment(&app, id).await;

    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_declined_payment_is_still_retrievable() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, _store) = create_test_gateway(bank_url);

    let (status, body) = post_payment(&app, &payment_json("11111111111112")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Declined");
    assert_eq!(body["card_number_last_four"], "1112");

    let id = body["id"].as_str().unwrap();
    let (get_status, fetched) = get_payment(&app, id).await;

    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_bank_outage_maps_to_internal_error_and_persists_nothing() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, store) = create_test_gateway(bank_url);

    // Card ending 0 makes the simulator return 503 on every attempt.
    let (status, body) = post_payment(&app, &payment_json("11111111111110")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_validation_failure_returns_field_errors() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, store) = create_test_gateway(bank_url);

    let mut body = payment_json("11111111111111");
    body["amount"] = json!(0);

    let (status, response) = post_payment(&app, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["errors"]["amount"].is_array());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_bank_rejection_is_not_retried_and_persists_nothing() {
    // A bank that refuses every submission outright.
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let rejecting_bank = Router::new().route(
        "/payments",
        post(move |Json(_body): Json<Value>| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid payment submission" })),
                )
            }
        }),
    );

    let bank_url = spawn_server(rejecting_bank).await;
    let (app, store) = create_test_gateway(bank_url);

    let (status, body) = post_payment(&app, &payment_json("11111111111111")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["Undefined"][0],
        "Payment was rejected by the bank."
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1, "a bank 400 must not be retried");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_transient_bank_failures_are_retried_to_success() {
    // Fails twice with 503, then authorizes.
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let flaky_bank = Router::new().route(
        "/payments",
        post(move |Json(_body): Json<Value>| {
            let counter = counter.clone();
            async move {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(json!({ "error": "Service unavailable" })),
                    )
                        .into_response()
                } else {
                    Json(json!({
                        "authorized": true,
                        "authorization_code": Uuid::new_v4()
                    }))
                    .into_response()
                }
            }
        }),
    );

    let bank_url = spawn_server(flaky_bank).await;
    let (app, store) = create_test_gateway(bank_url);

    let (status, body) = post_payment(&app, &payment_json("11111111111111")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Authorized");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_unparseable_bank_body_maps_to_internal_error() {
    // 2xx with a body that is not the expected shape.
    let garbage_bank = Router::new().route(
        "/payments",
        post(|Json(_body): Json<Value>| async { "not json at all" }),
    );

    let bank_url = spawn_server(garbage_bank).await;
    let (app, store) = create_test_gateway(bank_url);

    let (status, body) = post_payment(&app, &payment_json("11111111111111")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_unknown_payment_returns_not_found() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, _store) = create_test_gateway(bank_url);

    let (status, _body) = get_payment(&app, &Uuid::new_v4().to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_with_malformed_id_is_bad_request() {
    let bank_url = spawn_server(bank_simulator::create_router()).await;
    let (app, _store) = create_test_gateway(bank_url);

    let (status, _body) = get_payment(&app, "not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
