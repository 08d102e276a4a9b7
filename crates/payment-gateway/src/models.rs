//! Domain types for payment processing
//!
//! The full card number and CVV only ever live inside [`PaymentRequest`],
//! which is transient. Anything persisted or logged goes through
//! [`MaskedCardNumber`] first.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An incoming card payment authorization request
///
/// Exists only for the duration of one pipeline invocation; never stored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    /// Full card number (PAN), 14-19 digits
    pub card_number: String,

    /// Expiry month, 1-12
    pub expiry_month: u32,

    /// Expiry year (four digits)
    pub expiry_year: i32,

    /// ISO currency code, 3 characters
    pub currency: String,

    /// Amount in minor currency units
    pub amount: i64,

    /// Card verification value, 3-4 digits
    pub cvv: String,
}

/// Outcome of an authorization attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The bank authorized the payment
    Authorized,
    /// The bank declined the payment
    Declined,
    /// The bank refused the submission itself (e.g. malformed card)
    Rejected,
    /// The outcome could not be determined; never persisted or surfaced
    /// to the caller as a definite decline
    Unknown,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Authorized => write!(f, "Authorized"),
            PaymentStatus::Declined => write!(f, "Declined"),
            PaymentStatus::Rejected => write!(f, "Rejected"),
            PaymentStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A finalized payment, as persisted and returned to callers
///
/// Immutable once written; created only for `Authorized` or `Declined`
/// outcomes. Carries the last four card digits only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Server-generated identifier, never supplied by the caller
    pub id: Uuid,

    /// Terminal status of the attempt
    pub status: PaymentStatus,

    /// Last four digits of the card number
    pub card_number_last_four: String,

    /// Expiry month, 1-12
    pub expiry_month: u32,

    /// Expiry year
    pub expiry_year: i32,

    /// ISO currency code
    pub currency: String,

    /// Amount in minor currency units
    pub amount: i64,
}

impl PaymentRecord {
    /// Build a record from a request, masking the card number
    ///
    /// Returns `None` when the card number cannot be masked; requests that
    /// pass validation always can.
    pub fn from_request(request: &PaymentRequest, id: Uuid, status: PaymentStatus) -> Option<Self> {
        let masked = MaskedCardNumber::new(&request.card_number)?;

        Some(Self {
            id,
            status,
            card_number_last_four: masked.to_string(),
            expiry_month: request.expiry_month,
            expiry_year: request.expiry_year,
            currency: request.currency.clone(),
            amount: request.amount,
        })
    }
}

/// Display-safe last-four-digits view of a card number
///
/// The only card-number fragment that may appear in logs, records or
/// responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedCardNumber(String);

const MASKED_CARD_NUMBER_LENGTH: usize = 4;

impl MaskedCardNumber {
    /// Mask a raw card number, keeping its last four characters
    ///
    /// Returns `None` for blank or too-short input.
    pub fn new(card_number: &str) -> Option<Self> {
        let len = card_number.chars().count();
        if card_number.trim().is_empty() || len < MASKED_CARD_NUMBER_LENGTH {
            return None;
        }

        Some(Self(
            card_number
                .chars()
                .skip(len - MASKED_CARD_NUMBER_LENGTH)
                .collect(),
        ))
    }

    /// The last four characters of the card number
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskedCardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mask a card number for log interpolation, tolerating invalid input
pub fn masked_for_log(card_number: &str) -> String {
    MaskedCardNumber::new(card_number)
        .map(|m| m.to_string())
        .unwrap_or_else(|| "****".to_string())
}
