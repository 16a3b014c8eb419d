#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Controller`**: Runs the refresh and display tasks in one cooperative loop
//! - **`DataRefresher`**: Blocking fetch-and-parse of the price plus a time-of-day sample
//! - **`DisplayMultiplexer`**: Alternates time and price on the display on a fixed period
//! - **`PeriodicTimer`**: Edge-triggered period check over a wrapping millisecond counter
//! - **`DigitLayout`**: Maps a time or price to `(position, digit, decimal point)` cells
//! - **`LiveState`**: The price and time record written by the refresher, read by the display
//! - **`Transport`**, **`TimeOfDaySource`**, **`DigitDisplay`**, **`MonotonicClock`**: Traits to
//!   implement for your network stack, time client, display driver and tick counter
//! - **`DiagnosticSink`**: Where diagnostic events go (`DefmtSink` with the `defmt` feature)
//! - **`DeviceCommand`**: Settings changes from an admin surface
//!
//! Response bodies are parsed with `serde_json`, which needs a global allocator
//! on `no_std` targets. All other buffers are fixed-size.

pub mod command;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod display;
pub mod layout;
pub mod protocol;
pub mod refresher;
pub mod state;
pub mod time;
pub mod timer;
pub mod types;

pub use command::{AlarmSetting, CommandError, CommandOutcome, DeviceCommand};
pub use config::{Brightness, Config, ConfigBuilder, ConfigError};
pub use controller::{Controller, PollOutcome};
#[cfg(feature = "defmt")]
pub use diagnostics::DefmtSink;
pub use diagnostics::{Diagnostic, DiagnosticSink, NoopSink, Severity};
pub use display::{DigitDisplay, DisplayMultiplexer};
pub use layout::{DISPLAY_WIDTH, DigitCell, DigitLayout};
pub use refresher::{DataRefresher, Endpoint, TimeOfDaySource, Transport};
pub use state::{LiveState, Snapshot};
pub use time::{Millis, MonotonicClock, Tick, TimeOfDay};
pub use timer::PeriodicTimer;
pub use types::{
    ConnectError, DisplayMode, ParseError, ProtocolError, RefreshError, TimeSourceError,
};
