//! Payment Gateway Service
//!
//! Main entry point wiring configuration, the acquiring-bank client, the
//! in-memory store and the pipeline behind the REST API.

use anyhow::{Context, Result};
use payment_gateway::bank::AcquiringBankClient;
use payment_gateway::pipeline::PaymentsPipeline;
use payment_gateway::retry::RetryPolicy;
use payment_gateway::validation::PaymentValidator;
use payment_gateway::{create_router, AppState, Config, PaymentStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payment_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Payment Gateway Service");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("  API address: {}", config.api_address());
    info!("  Bank base URL: {}", config.bank_base_url);
    info!(
        "  Bank resilience: timeout {}s, {} retries, base delay {}ms",
        config.bank_timeout_secs, config.bank_max_retries, config.bank_retry_base_delay_ms
    );

    // Wire the pipeline
    let retry_policy = RetryPolicy::new(config.bank_max_retries, config.bank_retry_base_delay());
    let bank = AcquiringBankClient::new(
        config.bank_base_url.clone(),
        config.bank_timeout(),
        retry_policy,
    )
    .context("Failed to create acquiring bank client")?;

    let validator = PaymentValidator::new(config.currency_codes.clone());
    let store = PaymentStore::new();
    let pipeline = Arc::new(PaymentsPipeline::new(validator, Arc::new(bank), store));

    let state = AppState {
        submitter: pipeline.clone(),
        reader: pipeline,
    };

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Payment Gateway Service running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
