//! Acquiring Bank Simulator
//!
//! Deterministic stand-in for the acquiring bank, used in local
//! development and by the gateway's integration tests. The outcome of a
//! submission is a pure function of the card number's final digit:
//! `0` simulates an outage (503), odd digits authorize, other even digits
//! decline; malformed submissions get a 400.
//!
//! ## Endpoints
//!
//! - `POST /payments` - Authorize a payment submission
//! - `GET /health` - Health check

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{BankPaymentRequest, BankPaymentResponse};

/// Create the application router
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/payments", post(handlers::post_payment_handler))
        .layer(TraceLayer::new_for_http())
}
