//! Diagnostic events and the sink they are reported to.
//!
//! The engine never prints directly. Every noteworthy event is handed to a
//! [`DiagnosticSink`] chosen by the firmware: [`DefmtSink`] (feature `defmt`)
//! forwards to the `defmt` logger, [`NoopSink`] discards.

use crate::config::Brightness;
use crate::time::TimeOfDay;
use crate::types::{DisplayMode, RefreshError};

/// How important an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Info,
    Warn,
}

/// Something the engine did or failed to do.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic<'a> {
    /// Opening a connection to the data source.
    Connecting { host: &'a str, port: u16 },
    /// Price request written to the connection.
    RequestSent,
    /// A refresh step failed; the previous value is kept.
    RefreshFailed(&'a RefreshError),
    /// New price stored.
    PriceUpdated(u32),
    /// New time of day stored.
    TimeUpdated(TimeOfDay),
    /// A frame was drawn.
    Rendered { mode: DisplayMode },
    /// Display brightness changed.
    BrightnessChanged(Brightness),
    /// Alarm setting replaced.
    AlarmConfigured { hours: u8, minutes: u8, enabled: bool },
    /// A restart was requested through the command interface.
    RestartRequested,
}

impl Diagnostic<'_> {
    /// Severity used when forwarding to a logger.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::RefreshFailed(_) => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl core::fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::Connecting { host, port } => write!(f, "connecting to {}:{}", host, port),
            Diagnostic::RequestSent => write!(f, "request sent"),
            Diagnostic::RefreshFailed(err) => write!(f, "refresh failed: {}", err),
            Diagnostic::PriceUpdated(price) => write!(f, "price updated: {}", price),
            Diagnostic::TimeUpdated(time) => write!(f, "time updated: {}", time),
            Diagnostic::Rendered { mode } => match mode {
                DisplayMode::ShowingTime => write!(f, "time on display"),
                DisplayMode::ShowingPrice => write!(f, "price on display"),
            },
            Diagnostic::BrightnessChanged(level) => {
                write!(f, "brightness set to {}", level.level())
            }
            Diagnostic::AlarmConfigured {
                hours,
                minutes,
                enabled,
            } => write!(
                f,
                "alarm set to {:02}:{:02} ({})",
                hours,
                minutes,
                if *enabled { "enabled" } else { "disabled" }
            ),
            Diagnostic::RestartRequested => write!(f, "restart requested"),
        }
    }
}

/// Destination for diagnostic events.
///
/// Implementations must not block; events are fire-and-forget.
pub trait DiagnosticSink {
    /// Records one event.
    fn record(&mut self, event: &Diagnostic<'_>);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, event: &Diagnostic<'_>) {
        (**self).record(event);
    }
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&mut self, _event: &Diagnostic<'_>) {}
}

/// Sink that forwards events to the global `defmt` logger.
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn record(&mut self, event: &Diagnostic<'_>) {
        match event.severity() {
            Severity::Info => defmt::info!("{}", event),
            Severity::Warn => defmt::warn!("{}", event),
        }
    }
}
