//! Configuration management for the payment gateway
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Acquiring bank base URL
    pub bank_base_url: String,

    /// Total timeout per bank HTTP attempt, in seconds
    pub bank_timeout_secs: u64,

    /// Additional bank-call attempts after the first failure
    pub bank_max_retries: u32,

    /// Base retry delay in milliseconds (doubles per retry)
    pub bank_retry_base_delay_ms: u64,

    /// Recognised ISO currency codes
    pub currency_codes: HashSet<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            bank_base_url: env::var("BANK_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string()),

            bank_timeout_secs: env::var("BANK_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid BANK_TIMEOUT_SECS")?,

            bank_max_retries: env::var("BANK_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("Invalid BANK_MAX_RETRIES")?,

            bank_retry_base_delay_ms: env::var("BANK_RETRY_BASE_DELAY_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .context("Invalid BANK_RETRY_BASE_DELAY_MS")?,

            currency_codes: env::var("CURRENCY_CODES")
                .unwrap_or_else(|_| "GBP,USD,EUR".to_string())
                .split(',')
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        if self.bank_timeout_secs == 0 {
            anyhow::bail!("BANK_TIMEOUT_SECS must be greater than 0");
        }

        if self.currency_codes.is_empty() {
            anyhow::bail!("CURRENCY_CODES must contain at least one currency code");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Total timeout per bank HTTP attempt
    pub fn bank_timeout(&self) -> Duration {
        Duration::from_secs(self.bank_timeout_secs)
    }

    /// Base retry delay for the bank retry policy
    pub fn bank_retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.bank_retry_base_delay_ms)
    }
}
