//! Core rate limiter implementation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::entry::WindowEntry;
use crate::config::RateLimitConfig;

/// The outcome of a rate limit check for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// The configured per-window limit
    pub limit: u64,
    /// Admitted requests left in the current window
    pub remaining: u64,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

/// A fixed-window rate limiter keyed by opaque strings.
///
/// One instance serves the whole process: the composition root constructs
/// it once, wraps it in an [`Arc`], and hands clones to every request
/// handler. All methods take `&self` and are safe under concurrent use;
/// keys are scoped by the caller, typically as `"<route>:<client>"`.
pub struct RateLimiter {
    /// Per-key window state
    entries: DashMap<String, WindowEntry>,
    /// Maximum admitted requests per window
    limit: u64,
    /// Window length
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        // Clamp so that absurdly large windows neither wrap negative nor
        // overflow timestamp arithmetic
        let window_secs = config.window_secs.min(i32::MAX as u64) as i64;
        Self {
            entries: DashMap::new(),
            limit: config.limit,
            window: Duration::seconds(window_secs),
        }
    }

    /// Check and count a request against the quota for `key`.
    ///
    /// Opens a fresh window when the key is unseen or its window has
    /// expired; otherwise increments the existing counter. The request
    /// that brings the count to exactly the limit is still admitted; the
    /// next one in the same window is the first rejected. Never fails:
    /// a rejection is a normal decision, not an error.
    pub fn admit(&self, key: &str) -> Decision {
        self.admit_at(key, Utc::now())
    }

    fn admit_at(&self, key: &str, now: DateTime<Utc>) -> Decision {
        trace!(key = %key, "Checking rate limit");

        // The entry guard holds the shard lock for the whole
        // read-check-write sequence, so exactly one logical increment
        // happens per call even under contention on the same key.
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    debug!(key = %key, "Window expired, opening a new one");
                    *entry = WindowEntry::open(now, self.window);
                    return self.fresh_decision(entry.reset_at);
                }

                entry.count += 1;
                let allowed = entry.count <= self.limit;
                if !allowed {
                    debug!(key = %key, count = entry.count, "Rate limit exceeded");
                }
                Decision {
                    allowed,
                    limit: self.limit,
                    remaining: self.limit.saturating_sub(entry.count),
                    reset_at: entry.reset_at,
                }
            }
            Entry::Vacant(vacant) => {
                debug!(key = %key, limit = self.limit, "Opening window for new key");
                let entry = vacant.insert(WindowEntry::open(now, self.window));
                self.fresh_decision(entry.reset_at)
            }
        }
    }

    /// Decision for a request that just opened a fresh window: always
    /// admitted, with the opening request already counted.
    fn fresh_decision(&self, reset_at: DateTime<Utc>) -> Decision {
        Decision {
            allowed: true,
            limit: self.limit,
            remaining: self.limit.saturating_sub(1),
            reset_at,
        }
    }

    /// Report the current quota state for `key` without counting a request.
    ///
    /// Header generation uses this instead of a second counting check, so
    /// building a response never consumes quota. For an unseen or expired
    /// key the decision describes the window an [`admit`](Self::admit)
    /// would open: full quota, reset one window length from now.
    pub fn peek(&self, key: &str) -> Decision {
        self.peek_at(key, Utc::now())
    }

    fn peek_at(&self, key: &str, now: DateTime<Utc>) -> Decision {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Decision {
                allowed: entry.count <= self.limit,
                limit: self.limit,
                remaining: self.limit.saturating_sub(entry.count),
                reset_at: entry.reset_at,
            },
            _ => Decision {
                allowed: true,
                limit: self.limit,
                remaining: self.limit,
                reset_at: now + self.window,
            },
        }
    }

    /// Render quota headers for `key` based on its current state.
    ///
    /// Read-only, like [`peek`](Self::peek): attaching headers to a
    /// response does not count against the quota.
    pub fn headers(&self, key: &str) -> Vec<(&'static str, String)> {
        let now = Utc::now();
        self.peek_at(key, now).headers_at(now)
    }

    /// Remove every entry whose window has already expired.
    ///
    /// Returns the number of entries removed. This only bounds memory
    /// growth from inactive keys; admission checks treat an expired entry
    /// as expired whether or not it has been swept yet.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(
                removed,
                remaining = self.entries.len(),
                "Swept expired rate limit entries"
            );
        }
        removed
    }

    /// Spawn the background sweep task.
    ///
    /// Runs [`sweep`](Self::sweep) every `interval` for the lifetime of
    /// the process. The returned handle lets the composition root abort
    /// the task during an orderly shutdown.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: std::time::Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.sweep();
            }
        })
    }

    /// The number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    /// The current count for `key`, if a window is being tracked.
    ///
    /// Primarily useful for tests and diagnostics; the count includes
    /// rejected requests.
    pub fn current_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.count)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}
