//! Retry policy and backoff state machine

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Retry configuration for remote generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 3000,
            max_delay_ms: 60_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
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

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_attempts == 0 {
            return Err(DomainError::invalid_configuration(
                "max_attempts must be at least 1",
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(DomainError::invalid_configuration(
                "backoff_multiplier must be >= 1.0",
            ));
        }

        Ok(())
    }

    /// Delay before retry number `retry` (0-indexed)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(retry as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }

    /// Start a fresh attempt sequence
    pub fn start(&self) -> RetryState<'_> {
        RetryState {
            policy: self,
            attempts: 0,
            total_delay: Duration::ZERO,
        }
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the delay, then try again
    Retry(Duration),
    /// Transient failure, but the attempt budget is spent
    Exhausted,
    /// Failure that must not be retried
    Abort,
}

/// Bounded attempt counter with a doubling delay schedule
#[derive(Debug, Clone)]
pub struct RetryState<'a> {
    policy: &'a RetryPolicy,
    attempts: u32,
    total_delay: Duration,
}

impl RetryState<'_> {
    /// Record the start of an attempt, returning its 1-based number
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Decide how to proceed after the current attempt failed
    pub fn on_failure(&mut self, error: &DomainError) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::Abort;
        }

        if self.attempts >= self.policy.max_attempts {
            return RetryDecision::Exhausted;
        }

        let delay = self.policy.delay_for_retry(self.attempts.saturating_sub(1));
        self.total_delay += delay;

        RetryDecision::Retry(delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Sum of all backoff delays scheduled so far
    pub fn total_delay(&self) -> Duration {
        self.total_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable() -> DomainError {
        DomainError::remote_unavailable("HTTP 503")
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay_ms, 3000);
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::new(5)
            .with_initial_delay(100)
            .with_backoff_multiplier(2.0)
            .with_max_delay(1000);

        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(1000));
    }

    #[test]
    fn test_state_retries_until_exhausted() {
        let policy = RetryPolicy::new(3).with_initial_delay(10);
        let mut state = policy.start();

        assert_eq!(state.begin_attempt(), 1);
        assert_eq!(
            state.on_failure(&unavailable()),
            RetryDecision::Retry(Duration::from_millis(10))
        );

        assert_eq!(state.begin_attempt(), 2);
        assert_eq!(
            state.on_failure(&unavailable()),
            RetryDecision::Retry(Duration::from_millis(20))
        );

        assert_eq!(state.begin_attempt(), 3);
        assert_eq!(state.on_failure(&unavailable()), RetryDecision::Exhausted);

        assert_eq!(state.attempts(), 3);
        assert_eq!(state.total_delay(), Duration::from_millis(30));
    }

    #[test]
    fn test_state_aborts_on_non_retryable() {
        let policy = RetryPolicy::default();
        let mut state = policy.start();

        state.begin_attempt();

        assert_eq!(
            state.on_failure(&DomainError::remote_status(401, "unauthorized")),
            RetryDecision::Abort
        );
        assert_eq!(state.total_delay(), Duration::ZERO);
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy::new(1);
        let mut state = policy.start();

        state.begin_attempt();

        assert_eq!(state.on_failure(&unavailable()), RetryDecision::Exhausted);
    }

    #[test]
    fn test_invalid_policies_rejected() {
        assert!(RetryPolicy::new(0).validate().is_err());
        assert!(
            RetryPolicy::default()
                .with_backoff_multiplier(0.5)
                .validate()
                .is_err()
        );
    }
}
