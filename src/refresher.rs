//! Blocking fetch-and-parse cycle for the price, plus the time-of-day sample.
//!
//! Also defines the [`Transport`] and [`TimeOfDaySource`] traits the firmware
//! implements for its network stack and time server client.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::protocol::{self, LineReader, PriceQuery};
use crate::state::LiveState;
use crate::time::TimeOfDay;
use crate::types::{ConnectError, RefreshError, TimeSourceError};
use embedded_io::{Error as _, Read, Write};

/// Trait for abstracting the secure transport to the data source.
///
/// Certificate validation (pinned fingerprint or CA store) happens inside
/// `connect`. A handshake that fails or is not trusted must surface as a
/// [`ConnectError`], never as garbage on the returned stream. Any timeout is
/// the transport's responsibility.
pub trait Transport {
    /// An open connection. Dropping it closes the connection.
    type Connection: Read + Write;

    /// Opens a connection to `host:port`.
    fn connect(&mut self, host: &str, port: u16) -> Result<Self::Connection, ConnectError>;
}

/// Trait for abstracting the wall-clock time source.
///
/// `hours` and `minutes` return the last synced local time, already adjusted
/// by the UTC offset. Firmware hands [`Config::utc_offset_secs`] to its time
/// client; a client that receives Unix seconds can convert them with
/// [`TimeOfDay::from_epoch_seconds`].
///
/// [`Config::utc_offset_secs`]: crate::Config::utc_offset_secs
pub trait TimeOfDaySource {
    /// Synchronises with the upstream time server. May perform network I/O.
    fn sync(&mut self) -> Result<(), TimeSourceError>;

    /// Hour of day, 0-23.
    fn hours(&self) -> u8;

    /// Minute of hour, 0-59.
    fn minutes(&self) -> u8;
}

/// Fixed request parameters for the refresher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'c> {
    pub host: &'c str,
    pub port: u16,
    pub path: &'c str,
    pub asset: &'c str,
    pub currency: &'c str,
}

/// Refreshes the price and the time of day.
///
/// `refresh` blocks for the whole network exchange. The display is not
/// serviced while it runs.
///
/// # Type Parameters
/// * `'c` - Lifetime of the borrowed endpoint strings
/// * `T` - Transport implementation
/// * `S` - Time source implementation
pub struct DataRefresher<'c, T: Transport, S: TimeOfDaySource> {
    transport: T,
    time_source: S,
    endpoint: Endpoint<'c>,
}

impl<'c, T: Transport, S: TimeOfDaySource> DataRefresher<'c, T, S> {
    pub fn new(transport: T, time_source: S, endpoint: Endpoint<'c>) -> Self {
        Self {
            transport,
            time_source,
            endpoint,
        }
    }

    /// Runs one refresh cycle.
    ///
    /// If the connection cannot be opened the cycle ends there and `state` is
    /// left exactly as it was, time included. Once connected, the price and
    /// the time of day are refreshed independently: a failure in one never
    /// rolls back or skips the other. A failed price fetch keeps the previous
    /// price and marks it stale. Every failure is reported to `sink`.
    ///
    /// # Returns
    /// * `Ok(())` - Both values were updated
    /// * `Err` - The price error if the price failed, otherwise the time error
    pub fn refresh<D: DiagnosticSink>(
        &mut self,
        state: &mut LiveState,
        sink: &mut D,
    ) -> Result<(), RefreshError> {
        let price_result = match self.fetch_price(sink) {
            Ok(price) => {
                state.set_price(price);
                sink.record(&Diagnostic::PriceUpdated(price));
                Ok(())
            }
            Err(err @ RefreshError::Connect(_)) => {
                sink.record(&Diagnostic::RefreshFailed(&err));
                return Err(err);
            }
            Err(err) => {
                state.mark_price_stale();
                sink.record(&Diagnostic::RefreshFailed(&err));
                Err(err)
            }
        };

        let time_result = match self.sample_time() {
            Ok(time) => {
                state.set_time(time);
                sink.record(&Diagnostic::TimeUpdated(time));
                Ok(())
            }
            Err(err) => {
                let err = RefreshError::TimeSource(err);
                sink.record(&Diagnostic::RefreshFailed(&err));
                Err(err)
            }
        };

        price_result.and(time_result)
    }

    /// Connects, requests and parses the price. The connection is dropped on return.
    fn fetch_price<D: DiagnosticSink>(&mut self, sink: &mut D) -> Result<u32, RefreshError> {
        let endpoint = self.endpoint;
        sink.record(&Diagnostic::Connecting {
            host: endpoint.host,
            port: endpoint.port,
        });

        let mut conn = self.transport.connect(endpoint.host, endpoint.port)?;

        let query = PriceQuery {
            host: endpoint.host,
            path: endpoint.path,
            asset: endpoint.asset,
            currency: endpoint.currency,
        };
        protocol::write_request(&mut conn, &query)
            .map_err(|err| RefreshError::Transport(err.kind()))?;
        sink.record(&Diagnostic::RequestSent);

        let mut reader = LineReader::new(&mut conn);
        protocol::read_price(&mut reader, endpoint.asset, endpoint.currency)
    }

    fn sample_time(&mut self) -> Result<TimeOfDay, TimeSourceError> {
        self.time_source.sync()?;
        let hours = self.time_source.hours();
        let minutes = self.time_source.minutes();
        TimeOfDay::new(hours, minutes).ok_or(TimeSourceError::OutOfRange { hours, minutes })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &Endpoint<'c> {
        &self.endpoint
    }

    /// Access to the transport, e.g. for inspection in tests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Access to the time source.
    pub fn time_source(&self) -> &S {
        &self.time_source
    }
}
