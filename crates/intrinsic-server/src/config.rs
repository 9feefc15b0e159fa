//! Service configuration from the environment.

use std::{env, time::Duration};

use crate::{Result, ServerError};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;
/// Default CORS origin (the local frontend dev server).
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
/// Default upstream request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime settings of the HTTP service.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Financial Modeling Prep API key.
    pub fmp_api_key: Option<String>,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// The single origin allowed by CORS.
    pub cors_origin: String,
    /// Base log level.
    pub log_level: String,
    /// `pretty` or `json`.
    pub log_format: String,
    /// Timeout applied to every upstream request.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("fmp_api_key", &self.fmp_api_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origin", &self.cors_origin)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fmp_api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from the environment.
    ///
    /// This will also load from a `.env` file if present. Recognised
    /// variables: `FMP_API_KEY`, `INTRINSIC_HOST`, `INTRINSIC_PORT`,
    /// `INTRINSIC_CORS_ORIGIN`, `INTRINSIC_LOG_LEVEL`, `INTRINSIC_LOG_FORMAT`
    /// and `INTRINSIC_REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("INTRINSIC_PORT") {
            Some(raw) => parse_var("INTRINSIC_PORT", &raw)?,
            None => defaults.port,
        };
        let request_timeout = match var("INTRINSIC_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_var("INTRINSIC_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            fmp_api_key: var("FMP_API_KEY"),
            host: var("INTRINSIC_HOST").unwrap_or(defaults.host),
            port,
            cors_origin: var("INTRINSIC_CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            log_level: var("INTRINSIC_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: var("INTRINSIC_LOG_FORMAT").unwrap_or(defaults.log_format),
            request_timeout,
        })
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| ServerError::Config {
        key,
        value: raw.to_string(),
    })
}
