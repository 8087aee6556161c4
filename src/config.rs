use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

use crate::service::stream::DEFAULT_EVENT_DELAY;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_SNAPSHOT_BIND_ADDR: &str = "127.0.0.1:5001";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_CORS_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a socket address like 127.0.0.1:5000: {source}")]
    InvalidAddr {
        key: &'static str,
        source: std::net::AddrParseError,
    },
    #[error("{key} must be a non-negative integer: {source}")]
    InvalidNumber {
        key: &'static str,
        source: std::num::ParseIntError,
    },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Listener for the main API.
    pub bind_addr: SocketAddr,
    /// Listener for the snapshot endpoints; `None` leaves them off.
    pub snapshot_bind_addr: Option<SocketAddr>,
    /// The single browser origin allowed to call the main API.
    pub allowed_origin: String,
    pub cors_max_age: Duration,
    /// Pause between events on the run stream.
    pub stream_event_delay: Duration,
    /// Optional HTTP proxy for provider requests.
    pub yahoo_proxy: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            snapshot_bind_addr: Some(SocketAddr::from(([127, 0, 0, 1], 5001))),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            cors_max_age: DEFAULT_CORS_MAX_AGE,
            stream_event_delay: DEFAULT_EVENT_DELAY,
            yahoo_proxy: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_addr(
            "BIND_ADDR",
            &read("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let snapshot_bind_addr = match read("SNAPSHOT_BIND_ADDR") {
            Some(v) if v.eq_ignore_ascii_case("off") => None,
            Some(v) => Some(parse_addr("SNAPSHOT_BIND_ADDR", &v)?),
            None => Some(parse_addr(
                "SNAPSHOT_BIND_ADDR",
                DEFAULT_SNAPSHOT_BIND_ADDR,
            )?),
        };

        let cors_max_age = match read("CORS_MAX_AGE_SECS") {
            Some(v) => Duration::from_secs(parse_u64("CORS_MAX_AGE_SECS", &v)?),
            None => DEFAULT_CORS_MAX_AGE,
        };

        let stream_event_delay = match read("STREAM_EVENT_DELAY_MS") {
            Some(v) => Duration::from_millis(parse_u64("STREAM_EVENT_DELAY_MS", &v)?),
            None => DEFAULT_EVENT_DELAY,
        };

        Ok(Self {
            bind_addr,
            snapshot_bind_addr,
            allowed_origin: read("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            cors_max_age,
            stream_event_delay,
            yahoo_proxy: read("YAHOO_PROXY"),
        })
    }
}

fn parse_addr(key: &'static str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.parse()
        .map_err(|source| ConfigError::InvalidAddr { key, source })
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse()
        .map_err(|source| ConfigError::InvalidNumber { key, source })
}
