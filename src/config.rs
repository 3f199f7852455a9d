//! Configuration Module
//!
//! Loads the n8n endpoint configuration and process settings from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::cache::DEFAULT_TTL_SECS;
use crate::client::DEFAULT_MAX_ATTEMPTS;
use crate::error::ConfigError;

/// Header carrying the static API key on every request.
pub const API_KEY_HEADER: &str = "x-n8n-api-key";

/// Default request timeout (30 s)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default cap on a response body (10 MiB)
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Cap on an outbound JSON body (5 MiB)
pub const MAX_REQUEST_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Accepted values of `LOG_LEVEL`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// == Transport ==
/// How tools are exposed to the calling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// MCP over stdin/stdout
    Stdio,
    /// JSON over HTTP (axum)
    Http,
}

impl Transport {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stdio" => Some(Transport::Stdio),
            "http" => Some(Transport::Http),
            _ => None,
        }
    }
}

// == Config ==
/// Process configuration, immutable once loaded.
#[derive(Clone)]
pub struct Config {
    /// n8n REST base URL without trailing slash (e.g. `https://n8n.local/api/v1`)
    pub api_url: String,
    /// Static pre-shared API key
    pub api_key: String,
    /// Total request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Cache time-to-live in seconds
    pub cache_ttl: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Largest response body accepted, in bytes
    pub max_response_size: usize,
    /// Tool transport
    pub transport: Transport,
    /// HTTP server port for the http transport
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is read first when present.
    ///
    /// # Environment Variables
    /// - `N8N_API_URL` - n8n API base URL (required)
    /// - `N8N_API_KEY` - n8n API key (required)
    /// - `REQUEST_TIMEOUT` - Request timeout in milliseconds (default: 30000)
    /// - `CACHE_TTL` - Response cache TTL in seconds (default: 300)
    /// - `MAX_RETRIES` - Retries after the first attempt (default: 2, so 3 attempts)
    /// - `MAX_RESPONSE_SIZE` - Response body cap in bytes (default: 10 MiB)
    /// - `MCP_TRANSPORT` - `stdio` or `http` (default: stdio)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();
        let api_url = required("N8N_API_URL")?;
        let api_key = required("N8N_API_KEY")?;

        Ok(Self {
            api_url: normalize_api_url(&api_url)?,
            api_key,
            request_timeout_ms: parsed::<u64>("REQUEST_TIMEOUT")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.request_timeout_ms),
            cache_ttl: parsed("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            max_retries: parsed("MAX_RETRIES").unwrap_or(defaults.max_retries),
            max_response_size: parsed::<usize>("MAX_RESPONSE_SIZE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_response_size),
            transport: env::var("MCP_TRANSPORT")
                .ok()
                .and_then(|v| Transport::parse(&v))
                .unwrap_or(defaults.transport),
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
        })
    }

    /// Builds a config for an explicit endpoint, other settings at defaults.
    pub fn for_endpoint(api_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("N8N_API_KEY"));
        }
        Ok(Self {
            api_url: normalize_api_url(api_url)?,
            api_key: api_key.to_string(),
            ..Config::default()
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Total attempts per call (first try plus retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            cache_ttl: DEFAULT_TTL_SECS,
            max_retries: DEFAULT_MAX_ATTEMPTS - 1,
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            transport: Transport::Stdio,
            server_port: 3000,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("cache_ttl", &self.cache_ttl)
            .field("max_retries", &self.max_retries)
            .field("max_response_size", &self.max_response_size)
            .field("transport", &self.transport)
            .field("server_port", &self.server_port)
            .finish()
    }
}

// == Helpers ==
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Default tracing directive when `RUST_LOG` is unset.
///
/// `LOG_LEVEL` (trace, debug, info, warn, error) sets the crate's level;
/// anything else falls back to info.
pub fn log_directive(log_level: Option<&str>) -> String {
    let level = log_level
        .map(|l| l.trim().to_ascii_lowercase())
        .filter(|l| LOG_LEVELS.contains(&l.as_str()))
        .unwrap_or_else(|| "info".to_string());
    format!("n8n_mcp={},tower_http={}", level, level)
}

/// Validates the base URL and strips trailing slashes.
///
/// Plain http is accepted but logged as insecure unless the host is loopback.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Missing("N8N_API_URL"));
    }

    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "https" => {}
        "http" => {
            let host = url.host_str().unwrap_or_default();
            if !matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1") {
                warn!(
                    "N8N_API_URL uses plain http for non-local host {}; use https in production",
                    host
                );
            }
        }
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }

    Ok(trimmed.to_string())
}
