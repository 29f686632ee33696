//! Retry delays for connectivity failures.

use std::time::Duration;

/// Capped exponential backoff: `min(base * 2^attempt, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub base: Duration,
    /// Upper bound on any delay.
    pub cap: Duration,
}

impl RetryPolicy {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Delay before retry number `attempt` (starting at 0).
    pub fn delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.cap, |d| d.min(self.cap))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            cap: Duration::from_secs(10),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Delays never exceed the cap
        #[test]
        fn bounded(attempt in any::<u32>()) {
            prop_assert!(RetryPolicy::default().delay(attempt) <= Duration::from_secs(10));
        }

        /// Delays never shrink as attempts grow
        #[test]
        fn monotonic(attempt in 0u32..64) {
            let policy = RetryPolicy::default();
            prop_assert!(policy.delay(attempt) <= policy.delay(attempt + 1));
        }
    }
}
