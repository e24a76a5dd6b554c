//! Retry policy for transient network failures.
//!
//! The API client retries timeouts and 5xx responses with exponential
//! backoff; this module owns the attempt limit and delay schedule.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first request.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Backoff multiplier applied between retries.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy with zero delays, for tests that exercise the attempt
    /// limit without sleeping.
    pub fn no_delay() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Next delay after `current`, scaled by the multiplier and capped.
    pub fn next_delay(&self, current: Duration) -> Duration {
        Duration::from_secs_f64(current.as_secs_f64() * self.backoff_multiplier)
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
    }

    #[test]
    fn next_delay_applies_multiplier() {
        let policy = RetryPolicy::default();
        let next = policy.next_delay(Duration::from_millis(500));
        assert_eq!(next, Duration::from_millis(1000));
    }

    #[test]
    fn next_delay_caps_at_max() {
        let policy = RetryPolicy::default();
        let next = policy.next_delay(Duration::from_secs(4));
        assert_eq!(next, Duration::from_secs(5));
    }

    #[test]
    fn no_delay_policy_never_sleeps() {
        let policy = RetryPolicy::no_delay();
        assert_eq!(policy.initial_delay, Duration::ZERO);
        assert_eq!(policy.next_delay(Duration::ZERO), Duration::ZERO);
    }
}
