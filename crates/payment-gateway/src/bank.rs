//! Client for the acquiring bank
//!
//! Sends authorization requests over HTTP under the configured retry
//! policy and maps the bank's answer to a [`PaymentStatus`]. Every failure
//! mode collapses to [`PaymentStatus::Unknown`]; log lines only ever carry
//! the masked card number.

use crate::models::{masked_for_log, PaymentRequest, PaymentStatus};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Seam between the pipeline and the acquiring bank
#[async_trait]
pub trait BankConnector: Send + Sync {
    /// Run one logical authorization attempt for the request
    async fn authorize(&self, request: &PaymentRequest) -> PaymentStatus;
}

/// Wire shape of an authorization submission
#[derive(Debug, Serialize)]
struct BankPaymentRequest<'a> {
    card_number: &'a str,
    expiry_date: String,
    currency: &'a str,
    amount: i64,
    cvv: &'a str,
}

impl<'a> BankPaymentRequest<'a> {
    fn from_request(request: &'a PaymentRequest) -> Self {
        Self {
            card_number: &request.card_number,
            expiry_date: format!("{:02}/{}", request.expiry_month, request.expiry_year),
            currency: &request.currency,
            amount: request.amount,
            cvv: &request.cvv,
        }
    }
}

/// Wire shape of the bank's 2xx answer
#[derive(Debug, Deserialize)]
struct BankPaymentResponse {
    authorized: bool,

    #[serde(default)]
    authorization_code: Option<Uuid>,
}

/// HTTP client for the acquiring bank
pub struct AcquiringBankClient {
    base_url: String,
    client: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl AcquiringBankClient {
    /// Create a client with a bounded total timeout per HTTP attempt
    pub fn new(
        base_url: String,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            retry_policy,
        })
    }

    fn payments_url(&self) -> String {
        format!("{}/payments", self.base_url.trim_end_matches('/'))
    }

    /// Interpret a response the bank actually produced
    ///
    /// Returns `Ok(status)` for a terminal outcome, `Err(status_code)` when
    /// the response is retryable (5xx or 408).
    async fn interpret(
        &self,
        response: reqwest::Response,
        masked_card: &str,
    ) -> Result<PaymentStatus, StatusCode> {
        let status = response.status();

        // The bank refusing the submission outright is terminal.
        if status == StatusCode::BAD_REQUEST {
            return Ok(PaymentStatus::Rejected);
        }

        if status.is_success() {
            return match response.json::<BankPaymentResponse>().await {
                Ok(body) if body.authorized => {
                    debug!(
                        "Bank authorized masked card number {} with code {:?}",
                        masked_card, body.authorization_code
                    );
                    Ok(PaymentStatus::Authorized)
                }
                Ok(_) => Ok(PaymentStatus::Declined),
                Err(err) => {
                    warn!(
                        "Bank response could not be deserialised for masked card number {}: {}",
                        masked_card, err
                    );
                    Ok(PaymentStatus::Unknown)
                }
            };
        }

        if is_retryable_status(status) {
            return Err(status);
        }

        error!(
            "Bank returned unexpected status {} for masked card number {}",
            status, masked_card
        );
        Ok(PaymentStatus::Unknown)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
}

#[async_trait]
impl BankConnector for AcquiringBankClient {
    async fn authorize(&self, request: &PaymentRequest) -> PaymentStatus {
        let wire_request = BankPaymentRequest::from_request(request);
        let masked_card = masked_for_log(&request.card_number);
        let url = self.payments_url();

        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            match self.client.post(&url).json(&wire_request).send().await {
                Ok(response) => match self.interpret(response, &masked_card).await {
                    Ok(status) => return status,
                    Err(http_status) => {
                        if attempt > self.retry_policy.max_retries {
                            error!(
                                "Bank call failed with status {} after {} attempts for masked card number {}",
                                http_status, attempt, masked_card
                            );
                            return PaymentStatus::Unknown;
                        }
                        debug!(
                            "Bank returned {} on attempt {}, retrying for masked card number {}",
                            http_status, attempt, masked_card
                        );
                    }
                },
                Err(err) => {
                    if attempt > self.retry_policy.max_retries {
                        error!(
                            "Bank call errored after {} attempts for masked card number {}: {}",
                            attempt, masked_card, err
                        );
                        return PaymentStatus::Unknown;
                    }
                    debug!(
                        "Bank call errored on attempt {}, retrying for masked card number {}: {}",
                        attempt, masked_card, err
                    );
                }
            }

            // Runs on the caller's timeline; dropping the future cancels it.
            tokio::time::sleep(self.retry_policy.delay_for(attempt)).await;
        }
    }
}
