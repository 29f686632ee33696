//! Timing configuration shared by all controllers.

use std::time::Duration;

use super::backoff::RetryPolicy;

/// Default delay before a typed query is applied.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Backoff for connectivity failures.
    pub retry: RetryPolicy,

    /// How long a typed query must stay unchanged before filtering.
    pub debounce: Duration,
}

impl ControllerConfig {
    pub fn new(retry: RetryPolicy, debounce: Duration) -> Self {
        Self { retry, debounce }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ControllerConfig::default();

        assert_eq!(config.debounce, Duration::from_millis(150));
        assert_eq!(config.retry.delay(0), Duration::from_secs(1));
        assert_eq!(config.retry.delay(10), Duration::from_secs(10));
    }

    #[test]
    fn custom_config() {
        let retry = RetryPolicy::new(Duration::from_millis(10), Duration::from_millis(40));
        let config = ControllerConfig::default()
            .with_retry(retry)
            .with_debounce(Duration::from_millis(5));

        assert_eq!(config.retry, retry);
        assert_eq!(config.debounce, Duration::from_millis(5));
    }
}
