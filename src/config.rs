//! Runtime configuration, read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::{uri::Scheme, Uri};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_QUERY_SERVICE_URL: &str = "http://localhost:8001";
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the query service, without the `/query` path.
    pub query_service_url: String,
    pub query_timeout: Duration,
    /// Deploys the `RETURNING id` variant and answers with the new record id.
    pub return_record_id: bool,
    pub max_body_bytes: usize,
    pub log_level: tracing::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            query_service_url: DEFAULT_QUERY_SERVICE_URL.to_string(),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            return_record_id: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: tracing::Level::INFO,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from `lookup`, using defaults for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            query_service_url: lookup("QUERY_SERVICE_URL").unwrap_or(defaults.query_service_url),
            query_timeout: parse_or(&lookup, "QUERY_SERVICE_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT_MS)
                .map(Duration::from_millis)?,
            return_record_id: match lookup("RETURN_RECORD_ID") {
                Some(value) => parse_bool("RETURN_RECORD_ID", value)?,
                None => defaults.return_record_id,
            },
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.max_body_bytes)?,
            log_level: parse_or(&lookup, "LOG_LEVEL", defaults.log_level)?,
        };

        // Fail at start-up rather than on the first request.
        config.query_endpoint()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// `<query_service_url>/query`, which must be an absolute `http` URL.
    pub fn query_endpoint(&self) -> Result<Uri, ConfigError> {
        let invalid = || ConfigError::Invalid {
            var: "QUERY_SERVICE_URL",
            value: self.query_service_url.clone(),
        };

        let endpoint = format!("{}/query", self.query_service_url.trim_end_matches('/'))
            .parse::<Uri>()
            .map_err(|_| invalid())?;

        if endpoint.scheme() != Some(&Scheme::HTTP) || endpoint.authority().is_none() {
            return Err(invalid());
        }
        Ok(endpoint)
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value }),
    }
}
