//! Minimal line-oriented HTTP/1.1 exchange for the price endpoint.
//!
//! This is not a general HTTP client. The response must start with the exact
//! status line [`EXPECTED_STATUS`], headers are skipped without inspection,
//! and the body is whatever arrives until the peer closes the connection.
//! Chunked transfer encoding is not supported.

use crate::types::{ParseError, ProtocolError, RefreshError};
use embedded_io::{Read, Write};
use heapless::Vec;
use serde_json::Value;

/// The only status line accepted as success.
pub const EXPECTED_STATUS: &str = "HTTP/1.1 200 OK";

/// Maximum bytes kept from a single line.
pub const LINE_CAPACITY: usize = 512;

/// Maximum accumulated body size.
pub const BODY_CAPACITY: usize = 512;

const USER_AGENT: &str = "price-clock";

const READ_CHUNK: usize = 64;

/// Where the price request is sent and what it asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery<'a> {
    pub host: &'a str,
    pub path: &'a str,
    pub asset: &'a str,
    pub currency: &'a str,
}

/// Writes `GET {path}?ids={asset}&vs_currencies={currency}` with the
/// `Host`, `User-Agent` and `Connection: close` headers.
pub fn write_request<W: Write>(conn: &mut W, query: &PriceQuery<'_>) -> Result<(), W::Error> {
    for part in [
        "GET ",
        query.path,
        "?ids=",
        query.asset,
        "&vs_currencies=",
        query.currency,
        " HTTP/1.1\r\nHost: ",
        query.host,
        "\r\nUser-Agent: ",
        USER_AGENT,
        "\r\nConnection: close\r\n\r\n",
    ] {
        conn.write_all(part.as_bytes())?;
    }
    conn.flush()
}

/// One line without its `\n` terminator.
#[derive(Debug, Default)]
pub struct Line {
    bytes: Vec<u8, LINE_CAPACITY>,
    overflowed: bool,
}

impl Line {
    fn clear(&mut self) {
        self.bytes.clear();
        self.overflowed = false;
    }

    fn push(&mut self, byte: u8) {
        if self.bytes.push(byte).is_err() {
            self.overflowed = true;
        }
    }

    /// Line content with a trailing `\r` removed.
    pub fn content(&self) -> &[u8] {
        self.bytes.strip_suffix(b"\r").unwrap_or(&self.bytes[..])
    }

    /// True if bytes were dropped because the line exceeded [`LINE_CAPACITY`].
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// True for the empty line that ends the header block.
    pub fn is_blank(&self) -> bool {
        !self.overflowed && self.content().is_empty()
    }
}

/// Splits a byte stream into `\n`-terminated lines.
pub struct LineReader<R> {
    inner: R,
    chunk: [u8; READ_CHUNK],
    start: usize,
    end: usize,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            chunk: [0; READ_CHUNK],
            start: 0,
            end: 0,
        }
    }

    /// Reads the next line into `line`.
    ///
    /// Returns `Ok(false)` once the peer has closed and no bytes remain. A
    /// final line without a terminator is still returned.
    pub fn read_line(&mut self, line: &mut Line) -> Result<bool, R::Error> {
        line.clear();
        let mut saw_bytes = false;
        loop {
            if self.start == self.end {
                let read = self.inner.read(&mut self.chunk)?;
                if read == 0 {
                    return Ok(saw_bytes);
                }
                self.start = 0;
                self.end = read;
            }

            let byte = self.chunk[self.start];
            self.start += 1;
            saw_bytes = true;

            if byte == b'\n' {
                return Ok(true);
            }
            line.push(byte);
        }
    }
}

/// Reads a full response and extracts `document[asset][currency]`.
pub fn read_price<R: Read>(
    reader: &mut LineReader<R>,
    asset: &str,
    currency: &str,
) -> Result<u32, RefreshError> {
    let mut line = Line::default();

    read_status(reader, &mut line)?;
    skip_headers(reader, &mut line)?;
    let body = read_body(reader, &mut line)?;

    Ok(extract_price(&body, asset, currency)?)
}

fn read_status<R: Read>(reader: &mut LineReader<R>, line: &mut Line) -> Result<(), RefreshError> {
    let got_line = reader.read_line(line).map_err(transport)?;
    if got_line && !line.overflowed() && line.content() == EXPECTED_STATUS.as_bytes() {
        return Ok(());
    }
    let received = core::str::from_utf8(line.content()).unwrap_or("<non-utf8 status>");
    Err(ProtocolError::unexpected_status(received).into())
}

fn skip_headers<R: Read>(reader: &mut LineReader<R>, line: &mut Line) -> Result<(), RefreshError> {
    loop {
        if !reader.read_line(line).map_err(transport)? {
            return Err(ProtocolError::TruncatedHeaders.into());
        }
        if line.is_blank() {
            return Ok(());
        }
    }
}

fn read_body<R: Read>(
    reader: &mut LineReader<R>,
    line: &mut Line,
) -> Result<Vec<u8, BODY_CAPACITY>, RefreshError> {
    let mut body = Vec::new();
    while reader.read_line(line).map_err(transport)? {
        if line.overflowed() {
            return Err(ParseError::CapacityExceeded.into());
        }
        let trimmed = line.content().trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        body.extend_from_slice(trimmed)
            .map_err(|_| ParseError::CapacityExceeded)?;
    }
    Ok(body)
}

/// Parses `body` as JSON and returns `document[asset][currency]` as an integer.
///
/// Fractional prices are truncated toward zero.
///
/// # Errors
/// * `Syntax` - Body is not valid JSON
/// * `MissingField` - Either key is absent or the value is not a number
/// * `OutOfRange` - Negative, non-finite or above `u32::MAX`
pub fn extract_price(body: &[u8], asset: &str, currency: &str) -> Result<u32, ParseError> {
    let document: Value = serde_json::from_slice(body).map_err(|_| ParseError::Syntax)?;

    let field = document
        .get(asset)
        .and_then(|quotes| quotes.get(currency))
        .ok_or(ParseError::MissingField)?;

    let Value::Number(number) = field else {
        return Err(ParseError::MissingField);
    };

    if let Some(whole) = number.as_u64() {
        return u32::try_from(whole).map_err(|_| ParseError::OutOfRange);
    }

    match number.as_f64() {
        Some(value) if value.is_finite() && value >= 0.0 && value < 4_294_967_296.0 => {
            Ok(value as u32)
        }
        _ => Err(ParseError::OutOfRange),
    }
}

fn transport<E: embedded_io::Error>(err: E) -> RefreshError {
    RefreshError::Transport(err.kind())
}
