//! API handlers for the payment gateway
//!
//! Maps pipeline outcomes to transport-level status codes; the pipeline
//! itself knows nothing about HTTP.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::{masked_for_log, PaymentRecord, PaymentRequest};
use crate::pipeline::{GetPayment, PaymentError, SubmitPayment};

/// Shared application state
///
/// Holds the pipeline behind its two capability traits, mirroring the
/// split between the write and read paths.
#[derive(Clone)]
pub struct AppState {
    pub submitter: Arc<dyn SubmitPayment>,
    pub reader: Arc<dyn GetPayment>,
}

/// API error type
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    fn not_found() -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            body: json!({ "error": "Payment not found" }),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(errors) => ApiError {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "errors": errors.into_map() }),
            },
            PaymentError::RejectedByBank => ApiError {
                status: StatusCode::BAD_REQUEST,
                body: json!({ "errors": { "Undefined": ["Payment was rejected by the bank."] } }),
            },
            PaymentError::Internal => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: json!({ "error": "Internal server error" }),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "payment-gateway"
    }))
}

/// Submit a payment for authorization
pub async fn post_payment_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentRecord>, ApiError> {
    info!(
        "Processing payment for masked card number {}",
        masked_for_log(&request.card_number)
    );

    let record = state.submitter.submit(request).await?;

    info!("Payment {} finalized as {}", record.id, record.status);

    Ok(Json(record))
}

/// Retrieve a previously processed payment by id
pub async fn get_payment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentRecord>, ApiError> {
    match state.reader.get(id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::not_found()),
    }
}
