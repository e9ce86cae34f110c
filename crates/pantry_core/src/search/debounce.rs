//! Quiet-period coalescing for interactive input.
//!
//! Callers pass the current instant explicitly; no timers or threads are
//! involved.

use std::time::{Duration, Instant};

/// Default quiet period for search-as-you-type.
pub const DEFAULT_SEARCH_QUIET: Duration = Duration::from_millis(300);

/// Collects inputs and releases only the most recent one once input has been
/// idle for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Records `value` as the latest input at `at`, replacing any pending one.
    pub fn push(&mut self, value: T, at: Instant) {
        self.pending = Some((value, at));
    }

    /// Returns the pending input if nothing was pushed during the last `quiet`.
    pub fn poll(&mut self, at: Instant) -> Option<T> {
        let settled = match &self.pending {
            Some((_, last)) => at.saturating_duration_since(*last) >= self.quiet,
            None => false,
        };
        if settled {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Releases the pending input immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant at which the pending input settles.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, last)| *last + self.quiet)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_QUIET)
    }
}
