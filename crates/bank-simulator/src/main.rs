//! Acquiring Bank Simulator
//!
//! Main entry point for the simulated acquiring bank.

use anyhow::{Context, Result};
use bank_simulator::create_router;
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bank_simulator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let host = env::var("SIMULATOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("SIMULATOR_PORT").unwrap_or_else(|_| "8090".to_string());

    info!("Starting Acquiring Bank Simulator");

    let app = create_router();

    // Bind and serve
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Acquiring Bank Simulator running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
