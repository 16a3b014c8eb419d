//! Startup configuration for the refresh and display schedule.
//!
//! Loading and persisting configuration belongs to the firmware; this module
//! only defines the values the engine needs and validates them.

use crate::time::Millis;
use crate::types::truncated;
use heapless::String;

/// Capacity of the asset identifier, e.g. `bitcoin`.
pub const ASSET_CAPACITY: usize = 32;
/// Capacity of the quote currency identifier, e.g. `usd`.
pub const CURRENCY_CAPACITY: usize = 16;
/// Capacity of the data source host name.
pub const HOST_CAPACITY: usize = 64;
/// Capacity of the request path.
pub const PATH_CAPACITY: usize = 64;

/// Reference refresh period: one fetch per minute.
pub const DEFAULT_REFRESH_PERIOD: Millis = Millis(60_000);
/// Reference display swap period.
pub const DEFAULT_SWAP_PERIOD: Millis = Millis(8_000);
/// Reference UTC offset (UTC+1).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3600;
pub const DEFAULT_ASSET: &str = "bitcoin";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_HOST: &str = "api.coingecko.com";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_PATH: &str = "/api/v3/simple/price";

/// Display intensity, 0 (dimmest) to 15 (brightest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    /// Brightest supported level.
    pub const MAX: Brightness = Brightness(15);

    /// Returns `None` if `level` is above 15.
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX.0 {
            Some(Brightness(level))
        } else {
            None
        }
    }

    /// Raw level 0-15.
    #[inline]
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Brightness(1)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A schedule period was zero.
    ZeroPeriod { field: &'static str },

    /// A required text field was empty.
    EmptyField { field: &'static str },

    /// A text field exceeded its fixed capacity.
    TooLong {
        field: &'static str,
        capacity: usize,
    },

    /// An asset or currency key contained characters that are not URL-safe.
    InvalidKey { field: &'static str },

    /// Request path did not start with `/`.
    InvalidPath,

    /// Brightness above 15.
    InvalidBrightness(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPeriod { field } => write!(f, "{} must be greater than zero", field),
            ConfigError::EmptyField { field } => write!(f, "{} must not be empty", field),
            ConfigError::TooLong { field, capacity } => {
                write!(f, "{} exceeds {} bytes", field, capacity)
            }
            ConfigError::InvalidKey { field } => {
                write!(f, "{} may only contain ASCII letters, digits, '-', '_' or '.'", field)
            }
            ConfigError::InvalidPath => write!(f, "path must start with '/'"),
            ConfigError::InvalidBrightness(level) => {
                write!(f, "brightness {} is outside 0-15", level)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    refresh_period: Millis,
    swap_period: Millis,
    utc_offset_secs: i32,
    asset: String<ASSET_CAPACITY>,
    currency: String<CURRENCY_CAPACITY>,
    host: String<HOST_CAPACITY>,
    port: u16,
    path: String<PATH_CAPACITY>,
    brightness: Brightness,
}

impl Config {
    /// Creates a builder seeded with the reference defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Interval between data refreshes.
    pub fn refresh_period(&self) -> Millis {
        self.refresh_period
    }

    /// Interval between display mode swaps.
    pub fn swap_period(&self) -> Millis {
        self.swap_period
    }

    /// Offset applied by the time source to UTC, in seconds.
    pub fn utc_offset_secs(&self) -> i32 {
        self.utc_offset_secs
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Brightness applied at startup.
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_period: DEFAULT_REFRESH_PERIOD,
            swap_period: DEFAULT_SWAP_PERIOD,
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            asset: truncated(DEFAULT_ASSET),
            currency: truncated(DEFAULT_CURRENCY),
            host: truncated(DEFAULT_HOST),
            port: DEFAULT_PORT,
            path: truncated(DEFAULT_PATH),
            brightness: Brightness::default(),
        }
    }
}

/// Builder for [`Config`] with validation.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the refresh period.
    pub fn refresh_period(mut self, period: Millis) -> Self {
        self.config.refresh_period = period;
        self
    }

    /// Sets the display swap period.
    pub fn swap_period(mut self, period: Millis) -> Self {
        self.config.swap_period = period;
        self
    }

    /// Sets the UTC offset in seconds.
    pub fn utc_offset_secs(mut self, offset: i32) -> Self {
        self.config.utc_offset_secs = offset;
        self
    }

    /// Sets the asset key looked up in the response document.
    ///
    /// # Errors
    /// Returns `TooLong` if `asset` exceeds [`ASSET_CAPACITY`].
    pub fn asset(mut self, asset: &str) -> Result<Self, ConfigError> {
        self.config.asset = bounded("asset", asset)?;
        Ok(self)
    }

    /// Sets the quote currency key.
    ///
    /// # Errors
    /// Returns `TooLong` if `currency` exceeds [`CURRENCY_CAPACITY`].
    pub fn currency(mut self, currency: &str) -> Result<Self, ConfigError> {
        self.config.currency = bounded("currency", currency)?;
        Ok(self)
    }

    /// Sets the data source host.
    pub fn host(mut self, host: &str) -> Result<Self, ConfigError> {
        self.config.host = bounded("host", host)?;
        Ok(self)
    }

    /// Sets the data source port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the request path (without query string).
    pub fn path(mut self, path: &str) -> Result<Self, ConfigError> {
        self.config.path = bounded("path", path)?;
        Ok(self)
    }

    /// Sets the startup brightness.
    pub fn brightness(mut self, level: u8) -> Result<Self, ConfigError> {
        self.config.brightness =
            Brightness::new(level).ok_or(ConfigError::InvalidBrightness(level))?;
        Ok(self)
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    /// * `ZeroPeriod` - A period is zero
    /// * `EmptyField` - Asset, currency or host is empty
    /// * `InvalidKey` - Asset or currency is not URL-safe
    /// * `InvalidPath` - Path does not start with `/`
    pub fn build(self) -> Result<Config, ConfigError> {
        let config = self.config;

        if config.refresh_period == Millis::ZERO {
            return Err(ConfigError::ZeroPeriod {
                field: "refresh_period",
            });
        }
        if config.swap_period == Millis::ZERO {
            return Err(ConfigError::ZeroPeriod {
                field: "swap_period",
            });
        }

        validate_key("asset", &config.asset)?;
        validate_key("currency", &config.currency)?;

        if config.host.is_empty() {
            return Err(ConfigError::EmptyField { field: "host" });
        }
        if !config.path.starts_with('/') {
            return Err(ConfigError::InvalidPath);
        }

        Ok(config)
    }
}

fn bounded<const N: usize>(field: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(value)
        .map_err(|_| ConfigError::TooLong { field, capacity: N })?;
    Ok(out)
}

fn validate_key(field: &'static str, key: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    let url_safe = key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    if !url_safe {
        return Err(ConfigError::InvalidKey { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = Config::default();
        assert_eq!(config.refresh_period(), Millis(60_000));
        assert_eq!(config.swap_period(), Millis(8_000));
        assert_eq!(config.asset(), "bitcoin");
        assert_eq!(config.currency(), "usd");
        assert_eq!(config.host(), "api.coingecko.com");
        assert_eq!(config.port(), 443);
        assert_eq!(config.brightness().level(), 1);
    }

    #[test]
    fn builder_rejects_zero_periods() {
        let result = Config::builder().refresh_period(Millis::ZERO).build();
        assert!(matches!(result, Err(ConfigError::ZeroPeriod { field: "refresh_period" })));

        let result = Config::builder().swap_period(Millis::ZERO).build();
        assert!(matches!(result, Err(ConfigError::ZeroPeriod { field: "swap_period" })));
    }

    #[test]
    fn builder_rejects_overlong_fields() {
        let result = Config::builder().currency("a-currency-key-that-is-too-long");
        assert!(matches!(
            result,
            Err(ConfigError::TooLong { field: "currency", capacity: CURRENCY_CAPACITY })
        ));
    }

    #[test]
    fn builder_rejects_unsafe_keys() {
        let result = Config::builder().asset("bit coin").unwrap().build();
        assert!(matches!(result, Err(ConfigError::InvalidKey { field: "asset" })));

        let result = Config::builder().currency("").unwrap().build();
        assert!(matches!(result, Err(ConfigError::EmptyField { field: "currency" })));
    }

    #[test]
    fn builder_rejects_relative_path() {
        let result = Config::builder().path("api/v3").unwrap().build();
        assert!(matches!(result, Err(ConfigError::InvalidPath)));
    }

    #[test]
    fn brightness_is_bounded() {
        assert!(Brightness::new(15).is_some());
        assert!(Brightness::new(16).is_none());
        assert!(matches!(
            Config::builder().brightness(20),
            Err(ConfigError::InvalidBrightness(20))
        ));
    }

    #[test]
    fn builder_accepts_custom_source() {
        let config = Config::builder()
            .asset("ethereum")
            .unwrap()
            .currency("eur")
            .unwrap()
            .host("prices.example.org")
            .unwrap()
            .port(8443)
            .refresh_period(Millis::from_secs(30))
            .build()
            .unwrap();
        assert_eq!(config.asset(), "ethereum");
        assert_eq!(config.currency(), "eur");
        assert_eq!(config.port(), 8443);
        assert_eq!(config.refresh_period(), Millis(30_000));
    }
}
