//! Dispatch engine tuning.

use std::time::Duration;

/// Concurrency, retry, and deadline settings for the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum recipients processed at once.
    pub concurrency: usize,
    /// Send attempts per recipient, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound on computed backoff. A longer retry-after hint still wins.
    pub max_backoff: Duration,
    /// Overall call deadline when the request does not set one.
    pub deadline: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            deadline: Duration::from_secs(300),
        }
    }
}

impl DispatchConfig {
    /// Exponential base delay before retry number `attempt` (1-based),
    /// capped at `max_backoff`.
    pub fn retry_base_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 500)]
    #[case(2, 1_000)]
    #[case(3, 2_000)]
    #[case(6, 10_000)]
    #[case(40, 10_000)]
    fn base_delay_doubles_until_capped(#[case] attempt: u32, #[case] expected_ms: u64) {
        let config = DispatchConfig::default();
        assert_eq!(
            config.retry_base_delay(attempt),
            Duration::from_millis(expected_ms)
        );
    }
}
