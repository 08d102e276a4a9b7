//! Payment Gateway Service
//!
//! Accepts card-payment authorization requests, forwards them to an
//! acquiring bank under a retry policy, and persists the outcome for
//! later retrieval by identifier.
//!
//! ## Endpoints
//!
//! - `POST /api/payments` - Submit a payment for authorization
//! - `GET /api/payments/{id}` - Retrieve a processed payment
//! - `GET /health` - Health check

pub mod bank;
pub mod config;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod storage;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use handlers::AppState;
pub use storage::PaymentStore;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/payments", post(handlers::post_payment_handler))
        .route("/api/payments/{id}", get(handlers::get_payment_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
