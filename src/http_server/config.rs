//! HTTP Server Configuration
//!
//! Layering: fixed defaults < environment (`HOST`, `PORT`, `DATABASE_URL`,
//! `CORS_ORIGINS`) < command-line flags.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key} '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 4000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store location (default: "file:./data")
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_database_url() -> String {
    "file:./data".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host.trim().to_string();
        }

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    key: "PORT",
                    value: port.clone(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url.trim().to_string();
        }

        if let Some(origins) = get("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|origin| parse_origin(origin).map(|_| origin.to_string()))
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses one CORS origin: `scheme://host[:port]` with no path, or `null`.
pub fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: "CORS_ORIGINS",
        value: origin.to_string(),
        reason: reason.to_string(),
    };

    if origin != "null" {
        let (scheme, authority) = origin
            .split_once("://")
            .ok_or_else(|| invalid("expected scheme://host[:port]"))?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("bad scheme"));
        }
        if authority.is_empty() || authority.contains('/') {
            return Err(invalid("origin must be a bare host without a path"));
        }
    }

    HeaderValue::from_str(origin).map_err(|e| invalid(&e.to_string()))
}
