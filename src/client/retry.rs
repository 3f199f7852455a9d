//! Retry Policy
//!
//! Bounded exponential backoff for transient failures.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Total attempts per call (1 initial + 2 retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

// == Retry Decision ==
/// Outcome of inspecting a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    Retry(Duration),
    /// Surface the failure as-is
    GiveUp,
}

// == Retry Policy ==
/// Retries network and timeout failures with exponential backoff.
///
/// The delay before attempt `n + 1` is `multiplier * 2^n`, clamped to
/// `[min_delay, max_delay]`. Upstream status errors and unknown errors are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    multiplier: Duration,
    min_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Default backoff with a custom attempt bound (at least 1).
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_backoff(mut self, multiplier: Duration, min_delay: Duration, max_delay: Duration) -> Self {
        self.multiplier = multiplier;
        self.min_delay = min_delay;
        self.max_delay = max_delay.max(min_delay);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // == Backoff ==
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_delay, self.max_delay)
    }

    // == Decide ==
    /// Whether failed attempt number `attempt` (1-based) should be retried.
    pub fn decide(&self, error: &ClientError, attempt: u32) -> RetryDecision {
        if !error.is_retryable() || attempt >= self.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::Retry(self.backoff(attempt))
        }
    }

    // == Run ==
    /// Drives `op` until it succeeds or the policy gives up.
    ///
    /// `op` receives the 1-based attempt number. The last failure is
    /// returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match self.decide(&err, attempt) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        "Attempt {}/{} failed ({}): {}. Retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        err.kind(),
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    debug!("Giving up after attempt {} ({})", attempt, err.kind());
                    return Err(err);
                }
            }
        }
    }
}
