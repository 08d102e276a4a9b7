//! Business-rule validation for incoming payment requests
//!
//! All rules are evaluated independently so a single response reports
//! every violation. The reference instant (`as_of`) and the currency
//! whitelist are injected, keeping validation deterministic.

use crate::models::PaymentRequest;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const MIN_CARD_NUMBER_LENGTH: usize = 14;
const MAX_CARD_NUMBER_LENGTH: usize = 19;
const MIN_MONTH: u32 = 1;
const MAX_MONTH: u32 = 12;
const CURRENCY_LENGTH: usize = 3;
const MIN_AMOUNT: i64 = 1;
const MIN_CVV_LENGTH: usize = 3;
const MAX_CVV_LENGTH: usize = 4;

/// Field-level validation failures, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

/// A single rule violation scoped to a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any violation was reported against the given field
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Group messages by field for the response body
    pub fn into_map(self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in self.errors {
            map.entry(error.field).or_default().push(error.message);
        }
        map
    }
}

/// Stateless rule evaluator for payment requests
///
/// Owns the injected set of recognised currency codes; the set must be
/// non-empty (enforced at config load).
pub struct PaymentValidator {
    currency_codes: HashSet<String>,
}

impl PaymentValidator {
    /// Create a validator accepting the given currency codes
    pub fn new(currency_codes: HashSet<String>) -> Self {
        Self { currency_codes }
    }

    /// Validate a request against all business rules as of the given instant
    ///
    /// Returns every violation at once; an empty result means the request
    /// may proceed to the bank.
    pub fn validate(
        &self,
        request: &PaymentRequest,
        as_of: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        self.check_card_number(request, &mut errors);
        self.check_expiry(request, as_of, &mut errors);
        self.check_currency(request, &mut errors);
        self.check_amount(request, &mut errors);
        self.check_cvv(request, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_card_number(&self, request: &PaymentRequest, errors: &mut ValidationErrors) {
        let card_number = &request.card_number;

        if card_number.is_empty() {
            errors.add("card_number", "card_number must not be empty.");
        } else if card_number.len() < MIN_CARD_NUMBER_LENGTH
            || card_number.len() > MAX_CARD_NUMBER_LENGTH
        {
            errors.add(
                "card_number",
                format!(
                    "card_number must be between {} and {} characters.",
                    MIN_CARD_NUMBER_LENGTH, MAX_CARD_NUMBER_LENGTH
                ),
            );
        }

        if !card_number.is_empty() && !card_number.chars().all(|c| c.is_ascii_digit()) {
            errors.add(
                "card_number",
                "card_number must contain numerical characters only.",
            );
        }
    }

    fn check_expiry(
        &self,
        request: &PaymentRequest,
        as_of: DateTime<Utc>,
        errors: &mut ValidationErrors,
    ) {
        if request.expiry_month < MIN_MONTH || request.expiry_month > MAX_MONTH {
            errors.add(
                "expiry_month",
                format!(
                    "expiry_month must be between {} and {}.",
                    MIN_MONTH, MAX_MONTH
                ),
            );
        }

        // Strictly after the reference (year, month); day-of-month ignored.
        let in_future = request.expiry_year > as_of.year()
            || (request.expiry_year == as_of.year() && request.expiry_month > as_of.month());

        if !in_future {
            errors.add(
                "expiry_date",
                "expiry_month and expiry_year must be in the future.",
            );
        }
    }

    fn check_currency(&self, request: &PaymentRequest, errors: &mut ValidationErrors) {
        let currency = &request.currency;

        if currency.is_empty() {
            errors.add("currency", "currency must not be empty.");
        } else if currency.len() != CURRENCY_LENGTH {
            errors.add(
                "currency",
                format!("currency must be {} characters.", CURRENCY_LENGTH),
            );
        }

        if !self.currency_codes.contains(currency) {
            errors.add("currency", "currency was not recognised.");
        }
    }

    fn check_amount(&self, request: &PaymentRequest, errors: &mut ValidationErrors) {
        if request.amount < MIN_AMOUNT {
            errors.add(
                "amount",
                format!("amount must be greater than or equal to {}.", MIN_AMOUNT),
            );
        }
    }

    fn check_cvv(&self, request: &PaymentRequest, errors: &mut ValidationErrors) {
        let cvv = &request.cvv;

        if cvv.is_empty() {
            errors.add("cvv", "cvv must not be empty.");
        } else if cvv.len() < MIN_CVV_LENGTH || cvv.len() > MAX_CVV_LENGTH {
            errors.add(
                "cvv",
                format!(
                    "cvv must be between {} and {} characters.",
                    MIN_CVV_LENGTH, MAX_CVV_LENGTH
                ),
            );
        }

        if !cvv.is_empty() && !cvv.chars().all(|c| c.is_ascii_digit()) {
            errors.add("cvv", "cvv must contain numerical characters only.");
        }
    }
}
