//! Command-based control of device settings.
//!
//! The admin surface (web UI, serial console, MQTT) translates its requests
//! into [`DeviceCommand`] values and hands them to
//! [`Controller::handle_command`](crate::Controller::handle_command).

use crate::state::Snapshot;
use crate::time::TimeOfDay;

/// Daily alarm setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSetting {
    pub hours: u8,
    pub minutes: u8,
    pub enabled: bool,
}

impl AlarmSetting {
    /// True if the alarm is enabled and set to `time`.
    pub fn matches(&self, time: TimeOfDay) -> bool {
        self.enabled && self.hours == time.hours() && self.minutes == time.minutes()
    }
}

/// Actions an admin surface can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceCommand {
    /// Change display brightness (0-15).
    SetBrightness(u8),
    /// Replace the alarm setting.
    SetAlarm(AlarmSetting),
    /// Read the current price and time.
    ReadStatus,
    /// Ask the firmware to restart the device.
    Restart,
}

/// Result of a successfully handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Setting applied.
    Applied,
    /// Current live values.
    Status(Snapshot),
    /// The caller must restart the device.
    RestartRequested,
}

/// Rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Brightness above 15.
    InvalidBrightness(u8),
    /// Alarm hour or minute out of range.
    InvalidAlarmTime { hours: u8, minutes: u8 },
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::InvalidBrightness(level) => {
                write!(f, "brightness {} is outside 0-15", level)
            }
            CommandError::InvalidAlarmTime { hours, minutes } => {
                write!(f, "alarm time {}:{} is not a valid time of day", hours, minutes)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
