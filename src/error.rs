//! Error types for the n8n bridge
//!
//! Classified failures for every outbound call plus configuration errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Maximum number of characters of an upstream body kept in an error.
pub const BODY_EXCERPT_LIMIT: usize = 100;

// == Client Error Enum ==
/// Classified failure of a call into the n8n API.
///
/// Raw transport errors never cross the executor boundary; they are mapped
/// into one of these variants first.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// n8n answered with a non-2xx status
    #[error("n8n API returned HTTP {status}{}: {body}", status_hint(.status))]
    UpstreamStatus { status: u16, body: String },

    /// Connection could not be established or was dropped
    #[error("Network error talking to n8n: {0}. Check connectivity to the n8n instance")]
    Network(String),

    /// Request exceeded the configured timeout (milliseconds)
    #[error("Request to n8n timed out after {0} ms. Try again")]
    Timeout(u64),

    /// Anything else (malformed response, unexpected client failure)
    #[error("Unexpected error calling n8n: {0}")]
    Unknown(String),

    /// Tool arguments failed validation
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ClientError {
    // == Constructors ==
    /// Builds an upstream status error, truncating the body excerpt.
    pub fn upstream(status: u16, body: &str) -> Self {
        ClientError::UpstreamStatus {
            status,
            body: excerpt(body),
        }
    }

    // == Classification ==
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::UpstreamStatus { .. } => "upstream_status",
            ClientError::Network(_) => "network",
            ClientError::Timeout(_) => "timeout",
            ClientError::Unknown(_) => "unknown",
            ClientError::InvalidParams(_) => "invalid_params",
            ClientError::UnknownTool(_) => "unknown_tool",
        }
    }
}

/// Extra hint appended to well-known upstream status codes.
fn status_hint(status: &u16) -> &'static str {
    match *status {
        401 => " (unauthorized, check N8N_API_KEY)",
        403 => " (access denied)",
        404 => " (resource not found)",
        413 => " (payload too large)",
        _ => "",
    }
}

/// Keeps at most [`BODY_EXCERPT_LIMIT`] characters of a response body.
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LIMIT).collect()
}

// == IntoResponse Implementation ==
impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let status = match &self {
            ClientError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            ClientError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ClientError::UpstreamStatus { .. } => StatusCode::BAD_GATEWAY,
            ClientError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            ClientError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ClientError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Config Error Enum ==
/// Startup configuration failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent or blank
    #[error("{0} is required (set it in the environment or a .env file)")]
    Missing(&'static str),

    /// N8N_API_URL is not an absolute http(s) URL
    #[error("Invalid N8N_API_URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be built (e.g. API key not a valid header value)
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// == Result Type Alias ==
/// Convenience Result type for calls into n8n.
pub type Result<T> = std::result::Result<T, ClientError>;
