//! Monotonic time and time-of-day types.
//!
//! All elapsed-time arithmetic goes through [`Tick::elapsed_since`], which uses
//! wrapping subtraction so a `u32` millisecond counter rolling over after ~49.7
//! days does not disturb the schedule.

/// Trait for abstracting the boot-relative millisecond counter.
pub trait MonotonicClock {
    /// Returns the current tick.
    fn now(&self) -> Tick;
}

/// A monotonic millisecond count since boot. Wraps at `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Milliseconds elapsed since an earlier tick, tolerating counter wraparound.
    #[inline]
    pub fn elapsed_since(self, earlier: Tick) -> Millis {
        Millis(self.0.wrapping_sub(earlier.0))
    }

    /// Tick reached after `duration` has elapsed.
    #[inline]
    pub fn wrapping_add(self, duration: Millis) -> Tick {
        Tick(self.0.wrapping_add(duration.0))
    }
}

/// A span of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Zero duration constant.
    pub const ZERO: Self = Millis(0);

    /// Creates a duration from whole seconds, saturating at `u32::MAX` ms.
    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Millis(secs.saturating_mul(1000))
    }

    /// Returns the duration in milliseconds.
    #[inline]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Saturating subtraction (returns ZERO on underflow).
    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Millis(self.0.saturating_sub(other.0))
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

/// Local wall-clock time with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hours: u8,
    minutes: u8,
}

impl TimeOfDay {
    /// Midnight, shown before the first successful time sync.
    pub const MIDNIGHT: Self = TimeOfDay {
        hours: 0,
        minutes: 0,
    };

    /// Creates a time of day, returning `None` unless `hours < 24` and `minutes < 60`.
    pub const fn new(hours: u8, minutes: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(TimeOfDay { hours, minutes })
        } else {
            None
        }
    }

    /// Derives the local time of day from Unix seconds and a fixed UTC offset.
    ///
    /// Negative offsets and offsets that cross midnight wrap into the
    /// previous or next day.
    pub fn from_epoch_seconds(epoch_secs: u64, utc_offset_secs: i32) -> Self {
        let epoch_in_day = (epoch_secs % SECONDS_PER_DAY as u64) as i64;
        let local = (epoch_in_day + utc_offset_secs as i64).rem_euclid(SECONDS_PER_DAY);
        let minutes_in_day = local / 60;
        TimeOfDay {
            hours: (minutes_in_day / 60) as u8,
            minutes: (minutes_in_day % 60) as u8,
        }
    }

    /// Hour of day, 0-23.
    #[inline]
    pub const fn hours(&self) -> u8 {
        self.hours
    }

    /// Minute of hour, 0-59.
    #[inline]
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// The four display digits `[H, H, M, M]`.
    #[inline]
    pub const fn digits(&self) -> [u8; 4] {
        [
            self.hours / 10,
            self.hours % 10,
            self.minutes / 10,
            self.minutes % 10,
        ]
    }
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_since_survives_wraparound() {
        let before = Tick(u32::MAX - 99);
        let after = Tick(400);
        assert_eq!(after.elapsed_since(before), Millis(500));
    }

    #[test]
    fn wrapping_add_rolls_over() {
        assert_eq!(Tick(u32::MAX).wrapping_add(Millis(2)), Tick(1));
    }

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(0, 60).is_none());
        assert!(TimeOfDay::new(23, 59).is_some());
    }

    #[test]
    fn epoch_seconds_apply_offset() {
        // 2024-01-01T23:30:00Z
        let epoch = 1_704_151_800;
        assert_eq!(
            TimeOfDay::from_epoch_seconds(epoch, 0),
            TimeOfDay::new(23, 30).unwrap()
        );
        assert_eq!(
            TimeOfDay::from_epoch_seconds(epoch, 3600),
            TimeOfDay::new(0, 30).unwrap()
        );
        assert_eq!(
            TimeOfDay::from_epoch_seconds(epoch, -5 * 3600),
            TimeOfDay::new(18, 30).unwrap()
        );
    }

    #[test]
    fn negative_offset_before_midnight_utc_wraps_to_previous_day() {
        // 1970-01-01T00:10:00Z
        assert_eq!(
            TimeOfDay::from_epoch_seconds(600, -3600),
            TimeOfDay::new(23, 10).unwrap()
        );
    }

    #[test]
    fn digits_keep_leading_zero() {
        assert_eq!(TimeOfDay::new(7, 5).unwrap().digits(), [0, 7, 0, 5]);
    }
}
