//! Request handling and decision rules for the simulated acquiring bank

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

/// An authorization submission as the bank receives it
#[derive(Debug, Deserialize)]
pub struct BankPaymentRequest {
    pub card_number: String,

    /// Expiry rendered as `MM/YYYY`
    pub expiry_date: String,

    pub currency: String,
    pub amount: i64,
    pub cvv: String,
}

/// The bank's answer to a well-formed submission
#[derive(Debug, Serialize)]
pub struct BankPaymentResponse {
    pub authorized: bool,
    pub authorization_code: Option<Uuid>,
}

/// Outcome chosen for a structurally valid submission
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Authorized,
    Declined,
    /// Simulated bank outage; reported as 503
    Unavailable,
}

/// Decide the outcome from the card number's final digit
///
/// `0` simulates an outage, odd digits authorize, the remaining even
/// digits decline. Deterministic so tests and demos can pick outcomes.
fn decide(card_number: &str) -> Decision {
    match card_number.chars().last() {
        Some('0') => Decision::Unavailable,
        Some(c) if c.to_digit(10).is_some_and(|d| d % 2 == 1) => Decision::Authorized,
        _ => Decision::Declined,
    }
}

/// Structural checks the real bank performs before considering a payment
fn is_well_formed(request: &BankPaymentRequest) -> bool {
    let card_ok = (14..=19).contains(&request.card_number.len())
        && request.card_number.chars().all(|c| c.is_ascii_digit());

    let expiry_ok = parse_expiry(&request.expiry_date).is_some();

    let cvv_ok =
        (3..=4).contains(&request.cvv.len()) && request.cvv.chars().all(|c| c.is_ascii_digit());

    card_ok && expiry_ok && request.currency.len() == 3 && request.amount >= 1 && cvv_ok
}

/// Parse an `MM/YYYY` expiry, requiring a valid month
fn parse_expiry(expiry_date: &str) -> Option<(u32, i32)> {
    let (month, year) = expiry_date.split_once('/')?;
    if month.len() != 2 || year.len() != 4 {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    if !(1..=12).contains(&month) {
        return None;
    }

    Some((month, year))
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "bank-simulator"
    }))
}

/// Authorize a payment submission
pub async fn post_payment_handler(Json(request): Json<BankPaymentRequest>) -> impl IntoResponse {
    if !is_well_formed(&request) {
        debug!("Rejecting malformed submission");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid payment submission" })),
        )
            .into_response();
    }

    match decide(&request.card_number) {
        Decision::Unavailable => {
            info!("Simulating bank outage");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Service unavailable" })),
            )
                .into_response()
        }
        Decision::Authorized => {
            let response = BankPaymentResponse {
                authorized: true,
                authorization_code: Some(Uuid::new_v4()),
            };
            info!("Authorized payment of {} {}", request.amount, request.currency);
            (StatusCode::OK, Json(response)).into_response()
        }
        Decision::Declined => {
            let response = BankPaymentResponse {
                authorized: false,
                authorization_code: None,
            };
            info!("Declined payment of {} {}", request.amount, request.currency);
            (StatusCode::OK, Json(response)).into_response()
        }
    }
}
