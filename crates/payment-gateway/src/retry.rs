//! Retry policy for outbound bank calls
//!
//! Exponential backoff with random jitter; the jitter spreads retries out
//! so concurrent submissions do not hammer the bank in lockstep.

use rand::Rng;
use std::time::Duration;

/// Upper bound on a single backoff delay
const MAX_DELAY_MS: u64 = 10_000;

/// Backoff configuration applied around the acquiring-bank call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the given retry attempt (1-based)
    ///
    /// `base_delay * 2^(attempt-1)`, capped at [`MAX_DELAY_MS`], with up to
    /// 50% uniform jitter added on top.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let exponential = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(MAX_DELAY_MS);

        let jitter = rand::thread_rng().gen_range(0..=capped / 2);

        Duration::from_millis(capped + jitter)
    }
}
