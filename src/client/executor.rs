//! Request Executor
//!
//! Issues a single HTTP call against the n8n API and classifies the outcome.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::Signature;
use crate::config::{Config, API_KEY_HEADER, MAX_REQUEST_BODY_SIZE};
use crate::error::{ClientError, ConfigError, Result, BODY_EXCERPT_LIMIT};
use crate::sanitize::{sanitize_headers, sanitize_url, sanitize_value};

// == Api Request ==
/// Description of one outbound call, built per operation invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Whether a GET response may be served from / stored in the cache
    pub cacheable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            cacheable: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn cacheable(mut self) -> Self {
        self.cacheable = true;
        self
    }

    /// Cache key for this call, only for cacheable GETs.
    pub fn cache_signature(&self) -> Option<Signature> {
        (self.cacheable && self.method == Method::GET)
            .then(|| Signature::new(self.method.clone(), self.path.clone()))
    }
}

// == Executor Trait ==
/// Performs one attempt of an [`ApiRequest`].
///
/// Implementations must return only classified [`ClientError`]s.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<Value>;
}

// == Http Executor ==
/// reqwest-backed executor sharing one connection pool for the process.
#[derive(Clone)]
pub struct HttpExecutor {
    http: Client,
    base_url: String,
    timeout_ms: u64,
    max_response_size: usize,
}

impl fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}

impl HttpExecutor {
    /// Builds the HTTP client with the API key and JSON content type set on
    /// every request and a fixed total timeout.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ConfigError::HttpClient(format!("invalid N8N_API_KEY: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        debug!(
            "HTTP executor ready for {} with headers {:?}",
            config.api_url,
            sanitize_headers([
                (API_KEY_HEADER, config.api_key.as_str()),
                ("Content-Type", "application/json"),
            ])
        );

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            timeout_ms: config.request_timeout_ms,
            max_response_size: config.max_response_size,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a send error onto the failure taxonomy.
    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_ms)
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ClientError::Network(err.without_url().to_string())
        } else {
            error!("Unclassified HTTP client error: {}", err);
            ClientError::Unknown(err.without_url().to_string())
        }
    }

    /// Maps a failure while streaming the response body.
    ///
    /// Headers already arrived, so anything but a timeout is a dropped
    /// connection.
    fn classify_read(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout_ms)
        } else {
            ClientError::Network(err.without_url().to_string())
        }
    }

    /// Reads a success body, failing once it grows past the size cap.
    async fn read_body(&self, mut response: Response) -> Result<Vec<u8>> {
        let too_large = || {
            ClientError::Unknown(format!(
                "response body exceeds {} bytes",
                self.max_response_size
            ))
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_response_size as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify_read(e))? {
            if body.len() + chunk.len() > self.max_response_size {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

/// Reads just enough of an error body for the message excerpt.
///
/// Read failures keep whatever arrived.
async fn read_excerpt(mut response: Response) -> String {
    let wanted = BODY_EXCERPT_LIMIT * 4;
    let mut body = Vec::new();
    while body.len() < wanted {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            _ => break,
        }
    }
    body.truncate(wanted);
    String::from_utf8_lossy(&body).into_owned()
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        debug!("→ {} {}", request.method, sanitize_url(&url));

        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            debug!("Body: {}", sanitize_value(body));
            let payload =
                serde_json::to_vec(body).map_err(|e| ClientError::Unknown(e.to_string()))?;
            if payload.len() > MAX_REQUEST_BODY_SIZE {
                return Err(ClientError::InvalidParams(format!(
                    "request body of {} bytes exceeds {} bytes",
                    payload.len(),
                    MAX_REQUEST_BODY_SIZE
                )));
            }
            builder = builder.body(payload);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        debug!("← {} {}", status.as_u16(), sanitize_url(&url));

        if !status.is_success() {
            let body = read_excerpt(response).await;
            let err = ClientError::upstream(status.as_u16(), &body);
            warn!("{} {} failed: {}", request.method, request.path, err);
            return Err(err);
        }

        let bytes = self.read_body(response).await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("{} {} returned invalid JSON: {}", request.method, request.path, e);
            ClientError::Unknown(format!("invalid JSON in response: {}", e))
        })
    }
}
