//! Environment-driven configuration for the gateway.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_CATALOG_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SERVICE_NAME: &str = "catalog-api";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout { key: &'static str, value: String },

    #[error("{key} is not a valid socket address: {value:?}")]
    InvalidAddr { key: &'static str, value: String },

    #[error("{key} is not a valid http(s) URL: {value:?}")]
    InvalidUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL of the catalog backend, without trailing slash.
    pub catalog_api_url: String,
    /// Name reported as `details.service` in error envelopes.
    pub service_name: String,
    /// Bound on each forwarded call.
    pub request_timeout: Duration,
    /// Bound on the liveness probe preceding each call.
    pub health_check_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            catalog_api_url: DEFAULT_CATALOG_API_URL.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            health_check_timeout: Duration::from_millis(DEFAULT_HEALTH_CHECK_TIMEOUT_MS),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout_ms(&self) -> u64 {
        millis(self.request_timeout)
    }

    pub fn health_check_timeout_ms(&self) -> u64 {
        millis(self.health_check_timeout)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in `main`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let catalog_api_url = match get("CATALOG_API_URL") {
            Some(raw) => parse_url("CATALOG_API_URL", raw)?,
            None => defaults.catalog_api_url,
        };
        let service_name = get("CATALOG_SERVICE_NAME").unwrap_or(defaults.service_name);
        let request_timeout = match get("GATEWAY_REQUEST_TIMEOUT_MS") {
            Some(raw) => parse_millis("GATEWAY_REQUEST_TIMEOUT_MS", raw)?,
            None => defaults.request_timeout,
        };
        let health_check_timeout = match get("GATEWAY_HEALTH_CHECK_TIMEOUT_MS") {
            Some(raw) => parse_millis("GATEWAY_HEALTH_CHECK_TIMEOUT_MS", raw)?,
            None => defaults.health_check_timeout,
        };
        let bind_addr = match get("GATEWAY_BIND_ADDR") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidAddr {
                key: "GATEWAY_BIND_ADDR",
                value: raw.clone(),
            })?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            catalog_api_url,
            service_name,
            request_timeout,
            health_check_timeout,
            bind_addr,
        })
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_millis(key: &'static str, raw: String) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout { key, value: raw }),
    }
}

fn parse_url(key: &'static str, raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidUrl { key, value: raw }),
    }
}
