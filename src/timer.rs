//! Edge-triggered periodic timer driven by elapsed-time comparisons.

use crate::time::{Millis, Tick};

/// Fires once each time `period` has elapsed since the last fire.
///
/// Firing is edge-triggered: if the timer is not polled for several periods it
/// fires once on the next poll and re-arms from that moment. Missed periods
/// are dropped rather than replayed, so a long blocking call elsewhere in the
/// loop causes drift, never a burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTimer {
    last_fire: Tick,
    period: Millis,
}

impl PeriodicTimer {
    /// Creates a timer whose first fire happens one `period` after `start`.
    pub const fn new(period: Millis, start: Tick) -> Self {
        Self {
            last_fire: start,
            period,
        }
    }

    /// Returns true and re-arms from `now` if the period has elapsed.
    pub fn should_fire(&mut self, now: Tick) -> bool {
        if now.elapsed_since(self.last_fire) >= self.period {
            self.last_fire = now;
            true
        } else {
            false
        }
    }

    /// Re-arms the timer as if it had just fired at `now`.
    pub fn reset(&mut self, now: Tick) {
        self.last_fire = now;
    }

    /// Time left until the timer becomes eligible to fire.
    pub fn remaining(&self, now: Tick) -> Millis {
        self.period.saturating_sub(now.elapsed_since(self.last_fire))
    }

    /// The configured period.
    pub fn period(&self) -> Millis {
        self.period
    }

    /// Tick of the most recent fire (or of construction/reset).
    pub fn last_fire(&self) -> Tick {
        self.last_fire
    }
}
