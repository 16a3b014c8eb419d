//! Alternating time/price rendering on an 8-digit display.
//!
//! Provides [`DisplayMultiplexer`], which owns the display mode and the swap
//! timer, and the [`DigitDisplay`] trait for the output hardware.

use crate::config::Brightness;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::layout::DigitLayout;
use crate::state::LiveState;
use crate::time::{Millis, Tick};
use crate::timer::PeriodicTimer;
use crate::types::DisplayMode;

/// Trait for abstracting an 8-position seven-segment display.
///
/// Implement this for your driver (MAX7219 over SPI, shift registers, etc.).
/// Position 0 is the rightmost digit. Handle hardware errors internally -
/// these methods cannot fail.
pub trait DigitDisplay {
    /// Blanks every position.
    fn clear(&mut self);

    /// Shows `digit` (0-9) at `position` (0-7), optionally lighting its decimal point.
    fn set_digit(&mut self, position: u8, digit: u8, decimal_point: bool);

    /// Sets the display intensity.
    fn set_brightness(&mut self, level: Brightness);
}

/// Swaps the display between time and price on a fixed period.
///
/// Modes strictly alternate, starting with [`DisplayMode::ShowingTime`]. Every
/// swap clears and redraws, even if the value has not changed.
pub struct DisplayMultiplexer<D: DigitDisplay> {
    display: D,
    mode: DisplayMode,
    timer: PeriodicTimer,
}

impl<D: DigitDisplay> DisplayMultiplexer<D> {
    /// Creates a multiplexer whose first swap happens one `period` after `start`.
    pub fn new(display: D, period: Millis, start: Tick) -> Self {
        Self {
            display,
            mode: DisplayMode::ShowingTime,
            timer: PeriodicTimer::new(period, start),
        }
    }

    /// Draws the next frame if the swap period has elapsed.
    ///
    /// # Returns
    /// * `Some(mode)` - The mode that was just drawn
    /// * `None` - Period not yet elapsed, nothing drawn
    pub fn on_tick<S: DiagnosticSink>(
        &mut self,
        now: Tick,
        state: &LiveState,
        sink: &mut S,
    ) -> Option<DisplayMode> {
        if !self.timer.should_fire(now) {
            return None;
        }
        Some(self.draw(state, sink))
    }

    /// Draws the current mode immediately and restarts the swap period from `now`.
    pub fn render_now<S: DiagnosticSink>(
        &mut self,
        now: Tick,
        state: &LiveState,
        sink: &mut S,
    ) -> DisplayMode {
        self.timer.reset(now);
        self.draw(state, sink)
    }

    fn draw<S: DiagnosticSink>(&mut self, state: &LiveState, sink: &mut S) -> DisplayMode {
        let shown = self.mode;
        let layout = match shown {
            DisplayMode::ShowingTime => DigitLayout::for_time(state.time()),
            DisplayMode::ShowingPrice => DigitLayout::for_price(state.price()),
        };

        self.display.clear();
        for cell in layout.cells() {
            self.display
                .set_digit(cell.position, cell.digit, cell.decimal_point);
        }

        sink.record(&Diagnostic::Rendered { mode: shown });
        self.mode = shown.toggled();
        shown
    }

    /// Sets the display intensity.
    pub fn set_brightness(&mut self, level: Brightness) {
        self.display.set_brightness(level);
    }

    /// Blanks the display without touching the mode or timer.
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Mode that will be drawn on the next swap.
    pub fn next_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Time until the next swap.
    pub fn remaining(&self, now: Tick) -> Millis {
        self.timer.remaining(now)
    }

    /// Access to the display driver.
    pub fn display(&self) -> &D {
        &self.display
    }
}
