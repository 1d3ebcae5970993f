//! Countdown that paces enemy spawns.

use std::time::Duration;

/// Fixed-interval countdown owned by the grid controller.
#[derive(Clone, Debug)]
pub(crate) struct SpawnClock {
    interval: Duration,
    remaining: Duration,
}

impl SpawnClock {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Consumes `dt` and reports whether the countdown ran out.
    ///
    /// At most one spawn is signalled per call; the countdown restarts from
    /// the full interval afterwards.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        if !self.remaining.is_zero() {
            return false;
        }
        self.remaining = self.interval;
        true
    }
}
