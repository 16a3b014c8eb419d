//! Shared types: display modes and the refresh error taxonomy.

use heapless::String;

/// Maximum number of status-line bytes kept for diagnostics.
pub const STATUS_LINE_CAPACITY: usize = 32;

/// Which live value the display shows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Hours and minutes.
    #[default]
    ShowingTime,
    /// Most recently fetched price.
    ShowingPrice,
}

impl DisplayMode {
    /// The other mode.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::ShowingTime => DisplayMode::ShowingPrice,
            DisplayMode::ShowingPrice => DisplayMode::ShowingTime,
        }
    }
}

/// The transport could not establish a trusted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectError {
    /// Host unreachable or DNS/TCP failure.
    Unreachable,
    /// TLS handshake failed or the certificate was not trusted.
    Handshake,
}

impl core::fmt::Display for ConnectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConnectError::Unreachable => write!(f, "host unreachable"),
            ConnectError::Handshake => write!(f, "secure handshake failed"),
        }
    }
}

/// The response did not follow the expected line protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Status line differed from the expected success line.
    ///
    /// Holds at most the first [`STATUS_LINE_CAPACITY`] bytes received.
    UnexpectedStatus(String<STATUS_LINE_CAPACITY>),
    /// Connection closed before the blank line ending the headers.
    TruncatedHeaders,
}

impl ProtocolError {
    pub(crate) fn unexpected_status(line: &str) -> Self {
        ProtocolError::UnexpectedStatus(truncated(line))
    }
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::UnexpectedStatus(line) => {
                write!(f, "unexpected response status {:?}", line.as_str())
            }
            ProtocolError::TruncatedHeaders => {
                write!(f, "connection closed before end of headers")
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProtocolError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ProtocolError::UnexpectedStatus(line) => {
                defmt::write!(f, "UnexpectedStatus({=str})", line.as_str())
            }
            ProtocolError::TruncatedHeaders => defmt::write!(f, "TruncatedHeaders"),
        }
    }
}

/// Why the response body could not yield a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Body is not well-formed JSON.
    Syntax,
    /// Body did not fit the receive buffer.
    CapacityExceeded,
    /// `document[asset][currency]` is absent or not a number.
    MissingField,
    /// The number is negative, not finite, or larger than `u32::MAX`.
    OutOfRange,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Syntax => write!(f, "malformed response body"),
            ParseError::CapacityExceeded => write!(f, "response body exceeds buffer capacity"),
            ParseError::MissingField => write!(f, "price field missing or not numeric"),
            ParseError::OutOfRange => write!(f, "price out of displayable range"),
        }
    }
}

/// The time source could not provide a valid time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeSourceError {
    /// Synchronisation with the upstream time server failed.
    SyncFailed,
    /// The source reported an impossible hour or minute.
    OutOfRange { hours: u8, minutes: u8 },
}

impl core::fmt::Display for TimeSourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimeSourceError::SyncFailed => write!(f, "time sync failed"),
            TimeSourceError::OutOfRange { hours, minutes } => {
                write!(f, "time source reported invalid time {}:{}", hours, minutes)
            }
        }
    }
}

/// Errors that can occur during a refresh cycle.
///
/// None of these are fatal: the affected value keeps its previous contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Could not connect to the data source.
    Connect(ConnectError),
    /// Reading or writing the open connection failed.
    Transport(embedded_io::ErrorKind),
    /// Unexpected status line or malformed framing.
    Protocol(ProtocolError),
    /// Body could not be turned into a price.
    Parse(ParseError),
    /// Time of day could not be refreshed.
    TimeSource(TimeSourceError),
}

impl core::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RefreshError::Connect(err) => write!(f, "connect error: {}", err),
            RefreshError::Transport(kind) => write!(f, "transport error: {:?}", kind),
            RefreshError::Protocol(err) => write!(f, "protocol error: {}", err),
            RefreshError::Parse(err) => write!(f, "parse error: {}", err),
            RefreshError::TimeSource(err) => write!(f, "time source error: {}", err),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RefreshError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RefreshError::Connect(err) => defmt::write!(f, "Connect({})", err),
            RefreshError::Transport(kind) => {
                defmt::write!(f, "Transport({})", defmt::Debug2Format(kind))
            }
            RefreshError::Protocol(err) => defmt::write!(f, "Protocol({})", err),
            RefreshError::Parse(err) => defmt::write!(f, "Parse({})", err),
            RefreshError::TimeSource(err) => defmt::write!(f, "TimeSource({})", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnectError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "std")]
impl std::error::Error for TimeSourceError {}

#[cfg(feature = "std")]
impl std::error::Error for RefreshError {}

impl From<ConnectError> for RefreshError {
    fn from(err: ConnectError) -> Self {
        RefreshError::Connect(err)
    }
}

impl From<ProtocolError> for RefreshError {
    fn from(err: ProtocolError) -> Self {
        RefreshError::Protocol(err)
    }
}

impl From<ParseError> for RefreshError {
    fn from(err: ParseError) -> Self {
        RefreshError::Parse(err)
    }
}

impl From<TimeSourceError> for RefreshError {
    fn from(err: TimeSourceError) -> Self {
        RefreshError::TimeSource(err)
    }
}

/// Copies as much of `text` as fits, cutting on a character boundary.
pub(crate) fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
