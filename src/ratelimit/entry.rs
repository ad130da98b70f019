//! Per-key window counter state.

use chrono::{DateTime, Duration, Utc};

/// Counter state for a single key's current window.
///
/// Entries are owned exclusively by the limiter's state table; callers
/// only ever see the decisions derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowEntry {
    /// Requests observed in this window, admitted and rejected alike
    pub count: u64,
    /// When this window ends and the count resets
    pub reset_at: DateTime<Utc>,
}

impl WindowEntry {
    /// Open a fresh window at `now`, counting the request that opened it.
    pub fn open(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    /// Whether this window has ended as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at
    }
}
