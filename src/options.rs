use std::time::Duration;

use crate::{InferenceError, Result};

/// Factor applied to the wait after every loading response.
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// Configures HTTP timeout behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
        }
    }
}

/// Controls how long the executor waits for a cold model to load.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total number of HTTP attempts, including the first one.
    pub max_attempts: u32,
    /// Wait after the first loading response; doubled for each later one.
    pub initial_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Creates a validated policy.
    pub fn new(max_attempts: u32, initial_wait: Duration) -> Result<Self> {
        let policy = Self {
            max_attempts,
            initial_wait,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(InferenceError::InvalidPolicy(
                "max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.initial_wait.is_zero() {
            return Err(InferenceError::InvalidPolicy(
                "initial_wait must be greater than zero".to_owned(),
            ));
        }
        // Waits must keep doubling for every attempt the policy allows.
        if self.checked_wait(self.max_attempts).is_none() {
            return Err(InferenceError::InvalidPolicy(format!(
                "max_attempts {} overflows the backoff for initial_wait {:?}",
                self.max_attempts, self.initial_wait
            )));
        }
        Ok(())
    }

    /// Wait applied after the loading response of `attempt` (0-based):
    /// `initial_wait * 2^attempt`, saturating at [`Duration::MAX`].
    ///
    /// Saturation never happens for attempts of a validated policy.
    pub fn wait_for_attempt(&self, attempt: u32) -> Duration {
        self.checked_wait(attempt).unwrap_or(Duration::MAX)
    }

    fn checked_wait(&self, attempt: u32) -> Option<Duration> {
        BACKOFF_MULTIPLIER
            .checked_pow(attempt)
            .and_then(|factor| self.initial_wait.checked_mul(factor))
    }
}
