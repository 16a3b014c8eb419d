//! Shared test infrastructure for price-clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_io::{ErrorKind, ErrorType, Read, Write};
use price_clock::{
    Brightness, ConnectError, Diagnostic, DiagnosticSink, DigitDisplay, MonotonicClock, Severity,
    Tick, TimeOfDaySource, TimeSourceError, Transport,
};

// ============================================================================
// Mock Clock
// ============================================================================

/// Mock monotonic clock with controllable time advancement
pub struct MockClock {
    now: Cell<Tick>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            now: Cell::new(Tick(millis)),
        }
    }

    /// Advance time by `millis`, wrapping like a hardware counter
    pub fn advance(&self, millis: u32) {
        self.now.set(Tick(self.now.get().0.wrapping_add(millis)));
    }

    pub fn set(&self, millis: u32) {
        self.now.set(Tick(millis));
    }
}

impl MonotonicClock for MockClock {
    fn now(&self) -> Tick {
        self.now.get()
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

/// What the next `connect` call does
#[derive(Debug, Clone)]
pub enum Exchange {
    /// Accept and serve these bytes, then close
    Respond(Vec<u8>),
    /// Refuse the connection
    Refuse(ConnectError),
    /// Serve these bytes, then fail the next read
    FailAfter(Vec<u8>, ErrorKind),
}

#[derive(Default)]
struct TransportState {
    script: VecDeque<Exchange>,
    connects: Vec<(String, u16)>,
    requests: Vec<String>,
    open: usize,
}

/// Scripted transport; clones share the same script and log
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<TransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, exchange: Exchange) {
        self.state.borrow_mut().script.push_back(exchange);
    }

    /// Queue a 200 response with the given JSON body
    pub fn push_ok_body(&self, body: &str) {
        self.push(Exchange::Respond(ok_response(body).into_bytes()));
    }

    pub fn connects(&self) -> Vec<(String, u16)> {
        self.state.borrow().connects.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }

    /// Connections not yet dropped
    pub fn open_connections(&self) -> usize {
        self.state.borrow().open
    }
}

impl Transport for MockTransport {
    type Connection = MockConnection;

    fn connect(&mut self, host: &str, port: u16) -> Result<MockConnection, ConnectError> {
        let mut state = self.state.borrow_mut();
        state.connects.push((host.to_string(), port));

        let (response, fail_with) = match state.script.pop_front() {
            Some(Exchange::Respond(bytes)) => (bytes, None),
            Some(Exchange::FailAfter(bytes, kind)) => (bytes, Some(kind)),
            Some(Exchange::Refuse(err)) => return Err(err),
            None => return Err(ConnectError::Unreachable),
        };

        state.requests.push(String::new());
        state.open += 1;
        Ok(MockConnection {
            response: response.into(),
            fail_with,
            transport: Rc::clone(&self.state),
        })
    }
}

/// Connection handed out by [`MockTransport`]
pub struct MockConnection {
    response: VecDeque<u8>,
    fail_with: Option<ErrorKind>,
    transport: Rc<RefCell<TransportState>>,
}

impl ErrorType for MockConnection {
    type Error = ErrorKind;
}

impl Read for MockConnection {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        if self.response.is_empty() {
            return match self.fail_with.take() {
                Some(kind) => Err(kind),
                None => Ok(0),
            };
        }
        // Short reads exercise line reassembly
        let n = buf.len().min(self.response.len()).min(5);
        for slot in buf.iter_mut().take(n) {
            *slot = self.response.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl Write for MockConnection {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        let mut state = self.transport.borrow_mut();
        let request = state.requests.last_mut().unwrap();
        request.push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.transport.borrow_mut().open -= 1;
    }
}

/// A complete response with the success status line
pub fn ok_response(body: &str) -> String {
    response_with_status("HTTP/1.1 200 OK", body)
}

pub fn response_with_status(status: &str, body: &str) -> String {
    format!(
        "{status}\r\nContent-Type: application/json; charset=utf-8\r\nConnection: close\r\n\r\n{body}\r\n"
    )
}

// ============================================================================
// Mock Time Source
// ============================================================================

struct TimeState {
    hours: u8,
    minutes: u8,
    fail_next: bool,
    syncs: usize,
}

/// Controllable time-of-day source; clones share state
#[derive(Clone)]
pub struct MockTimeSource {
    state: Rc<RefCell<TimeState>>,
}

impl MockTimeSource {
    pub fn new(hours: u8, minutes: u8) -> Self {
        Self {
            state: Rc::new(RefCell::new(TimeState {
                hours,
                minutes,
                fail_next: false,
                syncs: 0,
            })),
        }
    }

    pub fn set(&self, hours: u8, minutes: u8) {
        let mut state = self.state.borrow_mut();
        state.hours = hours;
        state.minutes = minutes;
    }

    /// Make the next `sync` call fail
    pub fn fail_next_sync(&self) {
        self.state.borrow_mut().fail_next = true;
    }

    pub fn syncs(&self) -> usize {
        self.state.borrow().syncs
    }
}

impl TimeOfDaySource for MockTimeSource {
    fn sync(&mut self) -> Result<(), TimeSourceError> {
        let mut state = self.state.borrow_mut();
        state.syncs += 1;
        if std::mem::take(&mut state.fail_next) {
            return Err(TimeSourceError::SyncFailed);
        }
        Ok(())
    }

    fn hours(&self) -> u8 {
        self.state.borrow().hours
    }

    fn minutes(&self) -> u8 {
        self.state.borrow().minutes
    }
}

// ============================================================================
// Mock Display
// ============================================================================

#[derive(Default)]
struct DisplayState {
    digits: [Option<(u8, bool)>; 8],
    clears: usize,
    brightness: Option<u8>,
    frames: Vec<String>,
}

impl DisplayState {
    fn render(&self) -> String {
        let mut text = String::new();
        for position in (0..8).rev() {
            match self.digits[position] {
                Some((digit, decimal_point)) => {
                    text.push(char::from(b'0' + digit));
                    if decimal_point {
                        text.push('.');
                    }
                }
                None => text.push(' '),
            }
        }
        text
    }
}

/// Mock 8-digit display that records what is shown; clones share state
#[derive(Clone, Default)]
pub struct MockDisplay {
    state: Rc<RefCell<DisplayState>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, leftmost position first, '.' after a lit decimal point
    pub fn shown(&self) -> String {
        self.state.borrow().render()
    }

    /// Every non-blank frame drawn so far, oldest first, including the current one
    pub fn frames(&self) -> Vec<String> {
        let state = self.state.borrow();
        let mut frames = state.frames.clone();
        if state.digits.iter().any(Option::is_some) {
            frames.push(state.render());
        }
        frames
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn brightness(&self) -> Option<u8> {
        self.state.borrow().brightness
    }
}

impl DigitDisplay for MockDisplay {
    fn clear(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.digits.iter().any(Option::is_some) {
            let previous = state.render();
            state.frames.push(previous);
        }
        state.clears += 1;
        state.digits = [None; 8];
    }

    fn set_digit(&mut self, position: u8, digit: u8, decimal_point: bool) {
        assert!(position < 8, "position {position} is off the display");
        assert!(digit < 10, "digit {digit} is not decimal");
        self.state.borrow_mut().digits[position as usize] = Some((digit, decimal_point));
    }

    fn set_brightness(&mut self, level: Brightness) {
        self.state.borrow_mut().brightness = Some(level.level());
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// Sink that keeps every event as text
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<(Severity, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(severity, _)| *severity == Severity::Warn)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|(_, message)| message.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, event: &Diagnostic<'_>) {
        self.events.push((event.severity(), event.to_string()));
    }
}
