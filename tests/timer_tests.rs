//! Property tests for PeriodicTimer

use price_clock::{Millis, PeriodicTimer, Tick};
use proptest::prelude::*;

#[test]
fn two_timers_do_not_interfere() {
    let mut refresh = PeriodicTimer::new(Millis(60_000), Tick(0));
    let mut swap = PeriodicTimer::new(Millis(8_000), Tick(0));

    let mut refresh_fires = 0;
    let mut swap_fires = 0;
    for ms in 1..=120_000u32 {
        if refresh.should_fire(Tick(ms)) {
            refresh_fires += 1;
        }
        if swap.should_fire(Tick(ms)) {
            swap_fires += 1;
        }
    }
    assert_eq!(refresh_fires, 2);
    assert_eq!(swap_fires, 15);
}

proptest! {
    #[test]
    fn fires_at_most_once_per_elapsed_period(
        start in any::<u32>(),
        period in 1u32..500,
        span in 0u32..5_000,
    ) {
        let mut timer = PeriodicTimer::new(Millis(period), Tick(start));
        let mut fires = 0u32;
        for step in 1..=span {
            if timer.should_fire(Tick(start.wrapping_add(step))) {
                fires += 1;
            }
        }
        prop_assert_eq!(fires, span / period);
    }

    #[test]
    fn single_late_poll_fires_exactly_once(
        start in any::<u32>(),
        period in 1u32..10_000,
        periods_missed in 1u32..50,
        extra in 0u32..10_000,
    ) {
        let mut timer = PeriodicTimer::new(Millis(period), Tick(start));
        let late = Tick(start.wrapping_add(period * periods_missed + extra % period));

        prop_assert!(timer.should_fire(late));
        prop_assert!(!timer.should_fire(late));
        prop_assert_eq!(timer.last_fire(), late);
    }

    #[test]
    fn never_fires_before_period(
        start in any::<u32>(),
        period in 2u32..100_000,
        early in 0u32..100_000,
    ) {
        let mut timer = PeriodicTimer::new(Millis(period), Tick(start));
        let now = Tick(start.wrapping_add(early % period));
        prop_assert!(!timer.should_fire(now));
    }
}
