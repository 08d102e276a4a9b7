//! Payment processing pipeline
//!
//! Orchestrates validation, the bank call, status resolution and
//! persistence. Exposed behind two narrow capability traits so
//! collaborators depend only on the side they need: [`SubmitPayment`]
//! for the write path, [`GetPayment`] for the read path.

use crate::bank::BankConnector;
use crate::models::{masked_for_log, PaymentRecord, PaymentRequest, PaymentStatus};
use crate::storage::PaymentStore;
use crate::validation::{PaymentValidator, ValidationErrors};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Failures a payment submission or lookup can surface to the caller
///
/// Underlying causes of `Internal` are logged (with masked card data only)
/// and never cross this boundary.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("payment request failed validation")]
    Validation(ValidationErrors),

    #[error("payment was rejected by the bank")]
    RejectedByBank,

    #[error("internal server error")]
    Internal,
}

/// Write side of the pipeline
#[async_trait]
pub trait SubmitPayment: Send + Sync {
    /// Run one authorization attempt to a terminal outcome
    async fn submit(&self, request: PaymentRequest) -> Result<PaymentRecord, PaymentError>;
}

/// Read side of the pipeline
#[async_trait]
pub trait GetPayment: Send + Sync {
    /// Look up a previously finalized payment; absence is not an error
    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>, PaymentError>;
}

/// Concrete pipeline implementing both capabilities
pub struct PaymentsPipeline {
    validator: PaymentValidator,
    bank: Arc<dyn BankConnector>,
    store: PaymentStore,
}

impl PaymentsPipeline {
    pub fn new(
        validator: PaymentValidator,
        bank: Arc<dyn BankConnector>,
        store: PaymentStore,
    ) -> Self {
        Self {
            validator,
            bank,
            store,
        }
    }
}

#[async_trait]
impl SubmitPayment for PaymentsPipeline {
    async fn submit(&self, request: PaymentRequest) -> Result<PaymentRecord, PaymentError> {
        // Fail fast; an invalid request never reaches the bank.
        self.validator
            .validate(&request, Utc::now())
            .map_err(PaymentError::Validation)?;

        let payment_id = Uuid::new_v4();
        let status = self.bank.authorize(&request).await;

        match status {
            PaymentStatus::Unknown => Err(PaymentError::Internal),
            PaymentStatus::Rejected => {
                warn!(
                    "Payment rejected by bank for masked card number {}",
                    masked_for_log(&request.card_number)
                );
                Err(PaymentError::RejectedByBank)
            }
            PaymentStatus::Authorized | PaymentStatus::Declined => {
                let record = PaymentRecord::from_request(&request, payment_id, status)
                    .ok_or_else(|| {
                        error!(
                            "Could not build payment record for masked card number {}",
                            masked_for_log(&request.card_number)
                        );
                        PaymentError::Internal
                    })?;

                self.store.put(record.clone()).await;

                Ok(record)
            }
        }
    }
}

#[async_trait]
impl GetPayment for PaymentsPipeline {
    async fn get(&self, id: Uuid) -> Result<Option<PaymentRecord>, PaymentError> {
        Ok(self.store.get(&id).await)
    }
}
