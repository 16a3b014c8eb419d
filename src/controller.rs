//! The cooperative main loop tying refresher, display and settings together.

use crate::command::{AlarmSetting, CommandError, CommandOutcome, DeviceCommand};
use crate::config::{Brightness, Config};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::display::{DigitDisplay, DisplayMultiplexer};
use crate::refresher::{DataRefresher, Endpoint, TimeOfDaySource, Transport};
use crate::state::{LiveState, Snapshot};
use crate::time::{MonotonicClock, TimeOfDay};
use crate::timer::PeriodicTimer;
use crate::types::{DisplayMode, RefreshError};

/// What one [`Controller::poll`] call did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollOutcome {
    /// Result of the refresh, if the refresh timer fired.
    pub refresh: Option<Result<(), RefreshError>>,
    /// Mode drawn, if the display timer fired.
    pub shown: Option<DisplayMode>,
}

/// Runs the refresh and display tasks in one non-preemptive loop.
///
/// The firmware calls [`start`](Self::start) once and then
/// [`poll`](Self::poll) forever. Each poll reads the clock once, runs the
/// blocking refresh if its period elapsed, then swaps the display if its
/// period elapsed. Nothing is retried early: a failed refresh waits for the
/// next period.
///
/// # Type Parameters
/// * `'c` - Lifetime of the configuration and clock references
/// * `C` - Monotonic clock
/// * `T` - Transport to the data source
/// * `S` - Time-of-day source
/// * `D` - Digit display
/// * `L` - Diagnostic sink
pub struct Controller<'c, C, T, S, D, L>
where
    C: MonotonicClock,
    T: Transport,
    S: TimeOfDaySource,
    D: DigitDisplay,
    L: DiagnosticSink,
{
    clock: &'c C,
    state: LiveState,
    refresher: DataRefresher<'c, T, S>,
    refresh_timer: PeriodicTimer,
    multiplexer: DisplayMultiplexer<D>,
    sink: L,
    brightness: Brightness,
    alarm: AlarmSetting,
}

impl<'c, C, T, S, D, L> Controller<'c, C, T, S, D, L>
where
    C: MonotonicClock,
    T: Transport,
    S: TimeOfDaySource,
    D: DigitDisplay,
    L: DiagnosticSink,
{
    /// Creates a controller. Both timers start counting from the current tick.
    pub fn new(
        config: &'c Config,
        clock: &'c C,
        transport: T,
        time_source: S,
        display: D,
        sink: L,
    ) -> Self {
        let now = clock.now();
        let endpoint = Endpoint {
            host: config.host(),
            port: config.port(),
            path: config.path(),
            asset: config.asset(),
            currency: config.currency(),
        };

        Self {
            clock,
            state: LiveState::new(),
            refresher: DataRefresher::new(transport, time_source, endpoint),
            refresh_timer: PeriodicTimer::new(config.refresh_period(), now),
            multiplexer: DisplayMultiplexer::new(display, config.swap_period(), now),
            sink,
            brightness: config.brightness(),
            alarm: AlarmSetting::default(),
        }
    }

    /// Boot sequence: apply brightness, clear, refresh once, draw the first frame.
    ///
    /// Both timers are re-armed from the moment the boot refresh finishes.
    /// Returns the result of that refresh; a failure is not fatal.
    pub fn start(&mut self) -> Result<(), RefreshError> {
        self.multiplexer.set_brightness(self.brightness);
        self.multiplexer.clear();

        let result = self.refresher.refresh(&mut self.state, &mut self.sink);

        let now = self.clock.now();
        self.refresh_timer.reset(now);
        self.multiplexer.render_now(now, &self.state, &mut self.sink);

        result
    }

    /// Runs one loop iteration.
    ///
    /// May block for the duration of a network refresh. The display check
    /// uses a tick read after the refresh returns.
    pub fn poll(&mut self) -> PollOutcome {
        let mut now = self.clock.now();
        let mut outcome = PollOutcome::default();

        if self.refresh_timer.should_fire(now) {
            outcome.refresh = Some(self.refresher.refresh(&mut self.state, &mut self.sink));
            now = self.clock.now();
        }

        outcome.shown = self.multiplexer.on_tick(now, &self.state, &mut self.sink);
        outcome
    }

    /// Applies a command from the admin surface.
    ///
    /// # Errors
    /// * `InvalidBrightness` - Level above 15
    /// * `InvalidAlarmTime` - Hour or minute out of range
    pub fn handle_command(
        &mut self,
        command: DeviceCommand,
    ) -> Result<CommandOutcome, CommandError> {
        match command {
            DeviceCommand::SetBrightness(level) => {
                let brightness =
                    Brightness::new(level).ok_or(CommandError::InvalidBrightness(level))?;
                self.brightness = brightness;
                self.multiplexer.set_brightness(brightness);
                self.sink.record(&Diagnostic::BrightnessChanged(brightness));
                Ok(CommandOutcome::Applied)
            }
            DeviceCommand::SetAlarm(alarm) => {
                if TimeOfDay::new(alarm.hours, alarm.minutes).is_none() {
                    return Err(CommandError::InvalidAlarmTime {
                        hours: alarm.hours,
                        minutes: alarm.minutes,
                    });
                }
                self.alarm = alarm;
                self.sink.record(&Diagnostic::AlarmConfigured {
                    hours: alarm.hours,
                    minutes: alarm.minutes,
                    enabled: alarm.enabled,
                });
                Ok(CommandOutcome::Applied)
            }
            DeviceCommand::ReadStatus => Ok(CommandOutcome::Status(self.state.snapshot())),
            DeviceCommand::Restart => {
                self.sink.record(&Diagnostic::RestartRequested);
                Ok(CommandOutcome::RestartRequested)
            }
        }
    }

    /// True if an enabled alarm matches the synced time of day.
    pub fn alarm_due(&self) -> bool {
        self.state.is_time_synced() && self.alarm.matches(self.state.time())
    }

    /// Consistent copy of the live values.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn alarm(&self) -> AlarmSetting {
        self.alarm
    }

    pub fn multiplexer(&self) -> &DisplayMultiplexer<D> {
        &self.multiplexer
    }

    pub fn refresher(&self) -> &DataRefresher<'c, T, S> {
        &self.refresher
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }
}
