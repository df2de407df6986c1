//! Backoff policy for idempotent reads.

use std::time::Duration;

use rand::Rng;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

/// Jittered exponential backoff applied to GET requests only.
///
/// Writes are never retried: a POST that timed out may still have been
/// applied server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one. `0` disables retrying.
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each further attempt.
    pub base_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::with_max_retries(2)
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::with_max_retries(0)
    }

    #[must_use]
    pub const fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Override the base and maximum delay.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Delay before retry number `attempt` (zero-based).
    ///
    /// The result lies in `[ceiling / 2, ceiling]` where the ceiling is
    /// `base_delay * 2^attempt` capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.min(16));
        let ceiling = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
        if ceiling_ms == 0 {
            return Duration::ZERO;
        }
        let floor_ms = ceiling_ms / 2;
        Duration::from_millis(rand::rng().random_range(floor_ms..=ceiling_ms))
    }

    /// Delay before retry `attempt`, never shorter than a server-requested
    /// `Retry-After`.
    #[must_use]
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let delay = self.delay_for(attempt);
        retry_after.map_or(delay, |wait| delay.max(wait))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_disables_retries() {
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let policy = RetryPolicy::with_max_retries(5)
            .with_delays(Duration::from_millis(100), Duration::from_millis(700));

        for _ in 0..50 {
            let first = policy.delay_for(0);
            assert!(first >= Duration::from_millis(50) && first <= Duration::from_millis(100));

            let third = policy.delay_for(2);
            assert!(third >= Duration::from_millis(200) && third <= Duration::from_millis(400));

            let capped = policy.delay_for(10);
            assert!(capped >= Duration::from_millis(350) && capped <= Duration::from_millis(700));
        }
    }

    #[test]
    fn test_backoff_honors_retry_after() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.backoff(0, Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
        assert!(policy.backoff(0, None) <= Duration::from_millis(200));

        let slow = RetryPolicy::with_max_retries(1)
            .with_delays(Duration::from_secs(4), Duration::from_secs(4));
        assert!(slow.backoff(0, Some(Duration::from_secs(1))) >= Duration::from_secs(2));
    }

    #[test]
    fn test_zero_delay() {
        let policy = RetryPolicy::with_max_retries(1).with_delays(Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.delay_for(3), Duration::ZERO);
    }
}
