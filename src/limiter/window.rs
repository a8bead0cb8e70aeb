//! Fixed Window Module
//!
//! Per-identity request counting over fixed, non-overlapping windows.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::time::Instant;

// == Rate Limit Entry ==
/// Request count for one identity within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    /// Requests observed in the current window, rejected ones included
    pub count: u32,
    /// Start of the current window
    pub window_start: Instant,
}

impl RateLimitEntry {
    fn new(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.window_start)
    }
}

// == Rate Limiter ==
/// Fixed-window rate limiter keyed by client identity.
///
/// A burst of up to twice `max_requests` can straddle a window edge. In
/// exchange each identity costs one counter and one timestamp.
#[derive(Debug)]
pub struct RateLimiter<I> {
    entries: HashMap<I, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl<I> RateLimiter<I>
where
    I: Eq + Hash,
{
    // == Constructor ==
    /// # Panics
    /// If `max_requests` is zero or `window` is zero.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        assert!(max_requests > 0, "rate limit must allow at least one request");
        assert!(!window.is_zero(), "rate limit window must be positive");

        Self {
            entries: HashMap::new(),
            max_requests,
            window,
        }
    }

    // == Allow ==
    /// Records a request from `identity` and reports whether it is allowed.
    pub fn allow(&mut self, identity: I) -> bool {
        self.allow_at(identity, Instant::now())
    }

    /// Same as [`allow`](Self::allow) evaluated at `now`.
    ///
    /// The count is incremented even when the request is rejected, so
    /// retrying while over the limit keeps the identity rejected until the
    /// window rolls over.
    pub fn allow_at(&mut self, identity: I, now: Instant) -> bool {
        match self.entries.entry(identity) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry::new(now));
                true
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if entry.elapsed(now) > self.window {
                    *entry = RateLimitEntry::new(now);
                    return true;
                }

                entry.count = entry.count.saturating_add(1);
                entry.count <= self.max_requests
            }
        }
    }

    // == Sweep ==
    /// Forgets identities idle for more than two windows.
    ///
    /// Returns the number of identities removed.
    pub fn sweep(&mut self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Same as [`sweep`](Self::sweep) evaluated at `now`.
    pub fn sweep_at(&mut self, now: Instant) -> usize {
        let stale_after = self.window * 2;
        let before = self.entries.len();

        self.entries.retain(|_, entry| entry.elapsed(now) <= stale_after);

        before - self.entries.len()
    }

    /// Current state for `identity`, if tracked.
    pub fn entry<Q>(&self, identity: &Q) -> Option<&RateLimitEntry>
    where
        I: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.get(identity)
    }

    /// Number of identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
