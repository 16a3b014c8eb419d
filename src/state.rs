//! The live values shared between the refresher and the display.
//!
//! [`LiveState`] is owned by the main loop. The refresher receives it by
//! `&mut` and is the only writer; the display multiplexer receives it by `&`.

use crate::time::TimeOfDay;

/// Price and time of day as last fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveState {
    price: u32,
    price_stale: bool,
    time: TimeOfDay,
    time_synced: bool,
}

impl LiveState {
    /// Creates the boot state: price `0` (stale) and time `00:00` (unsynced).
    pub const fn new() -> Self {
        Self {
            price: 0,
            price_stale: true,
            time: TimeOfDay::MIDNIGHT,
            time_synced: false,
        }
    }

    /// Most recent price, possibly stale.
    pub fn price(&self) -> u32 {
        self.price
    }

    /// True until the first successful fetch, and after any failed one.
    pub fn is_price_stale(&self) -> bool {
        self.price_stale
    }

    /// Most recent time of day.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// True once the time source has synced at least once.
    pub fn is_time_synced(&self) -> bool {
        self.time_synced
    }

    /// Copies the whole record in one read.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            price: self.price,
            price_stale: self.price_stale,
            time: self.time,
            time_synced: self.time_synced,
        }
    }

    pub(crate) fn set_price(&mut self, price: u32) {
        self.price = price;
        self.price_stale = false;
    }

    /// Keeps the current price but flags it as out of date.
    pub(crate) fn mark_price_stale(&mut self) {
        self.price_stale = true;
    }

    pub(crate) fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
        self.time_synced = true;
    }
}

impl Default for LiveState {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent copy of [`LiveState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub price: u32,
    pub price_stale: bool,
    pub time: TimeOfDay,
    pub time_synced: bool,
}
