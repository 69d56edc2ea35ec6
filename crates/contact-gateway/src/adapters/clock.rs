//! Clock that only moves when told to.

use crate::ports::Clock;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Test clock. Both monotonic and wall time advance together.
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(Instant, DateTime<Utc>)>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            state: Mutex::new((Instant::now(), Utc::now())),
        }
    }

    /// Start at a fixed wall-clock time.
    pub fn starting_at(utc: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new((Instant::now(), utc)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        state.0 += by;
        if let Ok(delta) = chrono::Duration::from_std(by) {
            state.1 += delta;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.state.lock().0
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.state.lock().1
    }
}
