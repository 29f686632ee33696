//! Timestamp-gated debouncing.
//!
//! [`Debounce`] holds the most recent value and releases it once no newer
//! value has arrived for the configured delay. It owns no timers: callers
//! push values with the current instant and poll once the returned
//! deadline has passed. Consecutive duplicates are released only once.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last: Option<T>,
}

impl<T: Clone + PartialEq> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last: None,
        }
    }

    /// Record a new value; returns the instant it becomes releasable.
    ///
    /// Supersedes any value still pending.
    pub fn push(&mut self, value: T, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.pending = Some((value, deadline));
        deadline
    }

    /// Release the pending value if its deadline has passed.
    ///
    /// Returns `None` while the value is still settling, when nothing is
    /// pending, or when the value equals the last one released.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }

    /// Release a value immediately, dropping anything pending.
    ///
    /// Returns `false` if it equals the last value released.
    pub fn force(&mut self, value: T) -> bool {
        self.pending = None;
        if self.last.as_ref() == Some(&value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// The newest value seen, pending or released.
    pub fn latest(&self) -> Option<&T> {
        self.pending
            .as_ref()
            .map(|(v, _)| v)
            .or(self.last.as_ref())
    }
}
