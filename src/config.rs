//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::RelayError;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses `"json"` (case-insensitive) as [`LogFormat::Json`]; anything
    /// else is [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address serving both the pages and the WebSocket endpoint.
    pub listen_addr: SocketAddr,

    /// Static HTML document served at `/`.
    pub monitor_page_path: PathBuf,

    /// Pending outbound payloads buffered per connection before drops.
    pub outbound_buffer: usize,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            monitor_page_path: PathBuf::from("static/monitor.html"),
            outbound_buffer: 64,
            log_format: LogFormat::Pretty,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` is set but
    /// cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidConfig`] if `LISTEN_ADDR` is present but
    /// not a valid socket address.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw.parse().map_err(|_| {
                RelayError::InvalidConfig(format!("LISTEN_ADDR is not a socket address: {raw}"))
            })?,
            None => defaults.listen_addr,
        };

        let monitor_page_path = lookup("MONITOR_PAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.monitor_page_path);

        let outbound_buffer = lookup("OUTBOUND_BUFFER")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.outbound_buffer);

        let log_format = lookup("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(defaults.log_format);

        Ok(Self {
            listen_addr,
            monitor_page_path,
            outbound_buffer,
            log_format,
        })
    }
}
