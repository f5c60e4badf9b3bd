//! Gravity timer for the front end.
//!
//! The game never reads a clock; it asks for a new period with
//! `GameEvent::Reschedule`. `DropTimer` holds at most one pending deadline,
//! so re-arming always replaces the previous one.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct DropTimer {
    interval: Duration,
    deadline: Instant,
}

impl DropTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            deadline: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancels the pending deadline and starts a fresh period from `now`.
    pub fn rearm(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.deadline = now + interval;
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Returns true once per elapsed period and arms the next one.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        self.deadline = now + self.interval;
        true
    }
}
