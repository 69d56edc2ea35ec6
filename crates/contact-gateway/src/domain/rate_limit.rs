//! Fixed-window rate limiting keyed by source identifier.
//!
//! Each source gets `max_requests` attempts per window. The window starts at
//! the source's first request and is replaced (not extended) once it has
//! elapsed. Check-and-increment runs under the entry's shard lock, so the
//! per-window maximum holds with concurrent requests from one source.

use crate::domain::config::RateLimitConfig;
use crate::ports::Clock;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info};

/// Attempts recorded for one source in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRecord {
    pub count: u32,
    pub window_start: Instant,
}

impl WindowRecord {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

/// Result of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Counted against the window; `remaining` attempts are left.
    Allowed { remaining: u32 },
    /// Over the limit. Nothing was recorded.
    Denied { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Per-source attempt counters shared across requests.
pub struct RateLimitStore {
    records: DashMap<String, WindowRecord>,
    config: RateLimitConfig,
}

impl RateLimitStore {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            records: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count an attempt from `source` at `now`.
    pub fn check(&self, source: &str, now: Instant) -> RateDecision {
        if !self.config.enabled {
            return RateDecision::Allowed {
                remaining: self.config.max_requests,
            };
        }

        let max = self.config.max_requests;
        let window = self.config.window;

        match self.records.entry(source.to_string()) {
            Entry::Vacant(vacant) => {
                debug!(source = %source, "Opening rate limit window");
                vacant.insert(WindowRecord::fresh(now));
                RateDecision::Allowed {
                    remaining: max.saturating_sub(1),
                }
            }
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.is_expired(now, window) {
                    *record = WindowRecord::fresh(now);
                    RateDecision::Allowed {
                        remaining: max.saturating_sub(1),
                    }
                } else if record.count < max {
                    record.count += 1;
                    RateDecision::Allowed {
                        remaining: max - record.count,
                    }
                } else {
                    let elapsed = now.saturating_duration_since(record.window_start);
                    RateDecision::Denied {
                        retry_after: window.saturating_sub(elapsed),
                    }
                }
            }
        }
    }

    /// Drop every record whose window has elapsed. Returns how many went.
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.config.window;
        let before = self.records.len();
        self.records.retain(|source, record| {
            let keep = !record.is_expired(now, window);
            if !keep {
                debug!(source = %source, "Removing stale rate limit record");
            }
            keep
        });
        before.saturating_sub(self.records.len())
    }

    /// Number of sources with a live record
    pub fn tracked_sources(&self) -> usize {
        self.records.len()
    }

    /// Attempts recorded for `source` in its current window, if any
    pub fn count_for(&self, source: &str) -> Option<u32> {
        self.records.get(source).map(|record| record.count)
    }
}

/// Periodically sweep stale records until `shutdown` flips to true.
pub async fn sweep_task(
    store: Arc<RateLimitStore>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.sweep(clock.now());
                if removed > 0 {
                    debug!(removed, remaining = store.tracked_sources(), "Rate limit sweep");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Rate limit sweep stopped");
}
