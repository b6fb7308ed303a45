//! Bounded wait-with-timeout primitive for asynchronous cloud resources

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use super::error::DomainError;

/// How long, and how often, to poll a resource that settles asynchronously
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    /// Maximum number of polls before giving up
    pub max_attempts: u32,
    /// Delay after the first pending poll
    pub initial_delay_ms: u64,
    /// Maximum delay between polls
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Overall deadline across all polls (0 = attempts bound only)
    pub timeout_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            initial_delay_ms: 2_000,
            max_delay_ms: 15_000,
            backoff_multiplier: 1.5,
            timeout_ms: 600_000,
        }
    }
}

impl WaitPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Policy for long-running ingestion jobs
    pub fn ingestion() -> Self {
        Self {
            max_attempts: 240,
            initial_delay_ms: 5_000,
            max_delay_ms: 15_000,
            backoff_multiplier: 1.5,
            timeout_ms: 3_600_000,
        }
    }

    /// Zero-delay policy, used where waiting is simulated
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 1.0,
            timeout_ms: 0,
        }
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Calculate delay after a given pending poll (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms.min(self.max_delay_ms));
        }

        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }

    fn deadline(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Result of one poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// Resource reached the awaited state
    Ready(T),
    /// Still settling; carries the observed status for logging
    Pending(String),
}

/// Call `poll` until it reports ready, fails, or the policy is exhausted.
///
/// Poll errors abort immediately. Terminal failure states should be
/// reported by `poll` as [`DomainError::ProvisioningFailure`].
pub async fn wait_until<T, F, Fut>(
    policy: &WaitPolicy,
    operation: &str,
    mut poll: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>, DomainError>>,
{
    let started = Instant::now();
    let deadline = policy.deadline();
    let mut attempt: u32 = 0;

    loop {
        let status = match poll().await? {
            PollOutcome::Ready(value) => return Ok(value),
            PollOutcome::Pending(status) => status,
        };

        attempt += 1;
        let elapsed = started.elapsed();

        if attempt >= policy.max_attempts {
            return Err(DomainError::deadline_exceeded(
                operation,
                attempt,
                elapsed.as_millis() as u64,
            ));
        }

        let mut delay = policy.delay_for_attempt(attempt - 1);

        if let Some(deadline) = deadline {
            if elapsed >= deadline {
                return Err(DomainError::deadline_exceeded(
                    operation,
                    attempt,
                    elapsed.as_millis() as u64,
                ));
            }
            delay = delay.min(deadline - elapsed);
        }

        debug!(operation, attempt, status = %status, delay_ms = delay.as_millis() as u64, "Waiting");
        tokio::time::sleep(delay).await;
    }
}
