// src/common/config.rs
//! Process configuration
//!
//! Read once at startup and never mutated afterwards. Anything missing or
//! malformed here is a startup failure, not a per-request error.

use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Google's token introspection endpoint
pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Largest backup body accepted by the backup routes (5 MiB)
pub const DEFAULT_MAX_BACKUP_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_TOKENINFO_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth client id every verified token must be issued to
    pub google_client_id: String,
    pub tokeninfo_url: Url,
    pub tokeninfo_timeout: Duration,
    pub max_backup_bytes: usize,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_client_id = lookup("GOOGLE_CLIENT_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("GOOGLE_CLIENT_ID"))?;

        let raw_url =
            lookup("GOOGLE_TOKENINFO_URL").unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string());
        let tokeninfo_url = parse_tokeninfo_url(&raw_url)?;

        let timeout_secs = parse_number(
            &lookup,
            "TOKENINFO_TIMEOUT_SECS",
            DEFAULT_TOKENINFO_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "TOKENINFO_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let max_backup_bytes =
            parse_number(&lookup, "MAX_BACKUP_BYTES", DEFAULT_MAX_BACKUP_BYTES)?;
        let port = parse_number(&lookup, "PORT", DEFAULT_PORT)?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            google_client_id,
            tokeninfo_url,
            tokeninfo_timeout: Duration::from_secs(timeout_secs),
            max_backup_bytes,
            port,
            cors_origins,
        })
    }
}

/// Tokens travel in the query string, so only https is allowed. Loopback
/// hosts are the exception for local test doubles.
fn parse_tokeninfo_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var: "GOOGLE_TOKENINFO_URL",
        reason: e.to_string(),
    })?;

    let loopback = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
    match url.scheme() {
        "https" => Ok(url),
        "http" if loopback => Ok(url),
        other => Err(ConfigError::Invalid {
            var: "GOOGLE_TOKENINFO_URL",
            reason: format!("scheme '{}' is not allowed, use https", other),
        }),
    }
}

fn parse_number<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
