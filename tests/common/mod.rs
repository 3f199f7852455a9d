//! Fake n8n upstream for integration tests.
//!
//! An in-process axum server on an ephemeral port that records every
//! request and answers a fixed route table shaped like the n8n public API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use n8n_mcp::client::{HttpExecutor, RetryPolicy};
use n8n_mcp::{Config, N8nClient};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-api-key";

/// Size of the `/workflows/huge` response body.
pub const HUGE_BODY_SIZE: usize = 64 * 1024;

// == Recorded Requests ==

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Upstream {
    requests: Mutex<Vec<RecordedRequest>>,
}

impl Upstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

// == Server ==

pub struct FakeN8n {
    pub addr: SocketAddr,
    pub upstream: Arc<Upstream>,
}

impl FakeN8n {
    pub async fn start() -> Self {
        let upstream = Arc::new(Upstream::default());
        let app = Router::new().fallback(handle).with_state(upstream.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, upstream }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Client with real HTTP and millisecond backoff.
    pub fn client(&self, request_timeout_ms: u64) -> N8nClient {
        client_for(&self.api_url(), API_KEY, request_timeout_ms)
    }

    pub fn config(&self) -> Config {
        Config::for_endpoint(&self.api_url(), API_KEY).unwrap()
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3).with_backoff(
        Duration::from_millis(1),
        Duration::from_millis(1),
        Duration::from_millis(5),
    )
}

pub fn client_for(api_url: &str, api_key: &str, request_timeout_ms: u64) -> N8nClient {
    let mut config = Config::for_endpoint(api_url, api_key).unwrap();
    config.request_timeout_ms = request_timeout_ms;
    client_from(&config)
}

pub fn client_from(config: &Config) -> N8nClient {
    let executor = HttpExecutor::new(config).unwrap();
    N8nClient::with_executor(
        Arc::new(executor),
        config.ttl(),
        fast_retry(),
        config.api_url.clone(),
    )
}

/// An address nothing listens on.
pub async fn unreachable_api_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/v1", addr)
}

// == Raw Server ==

/// Answers every connection with fixed bytes, then closes it.
pub struct RawServer {
    pub addr: SocketAddr,
    connections: Arc<AtomicUsize>,
}

impl RawServer {
    pub async fn start(response: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));

        let counter = connections.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let response = response.clone();
                tokio::spawn(async move {
                    let mut request = [0u8; 4096];
                    let _ = socket.read(&mut request).await;
                    let _ = socket.write_all(&response).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, connections }
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

// == Route Table ==

async fn handle(
    State(upstream): State<Arc<Upstream>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let path = uri.path().strip_prefix("/api/v1").unwrap_or(uri.path()).to_string();
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    upstream.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        api_key: header("x-n8n-api-key"),
        content_type: header("content-type"),
        body: body.clone(),
    });

    if header("x-n8n-api-key").as_deref() != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"}))).into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["workflows"]) => Json(json!({
            "data": [
                {"id": 1, "name": "Billing", "active": true, "tags": [{"name": "finance"}],
                 "createdAt": "2025-01-01T00:00:00.000Z", "updatedAt": "2025-03-01T00:00:00.000Z"},
                {"id": 2, "name": "Legacy import", "active": false}
            ]
        }))
        .into_response(),
        ("GET", ["workflows", "huge"]) => {
            let padding = "x".repeat(HUGE_BODY_SIZE);
            Json(json!({"data": {"id": "huge", "padding": padding}})).into_response()
        }
        ("GET", ["workflows", "missing"]) => (
            StatusCode::NOT_FOUND,
            format!("{{\"message\":\"Workflow not found\",\"padding\":\"{}\"}}", "x".repeat(400)),
        )
            .into_response(),
        ("GET", ["workflows", id]) => Json(json!({
            "data": {
                "id": id, "name": "Billing", "active": true,
                "nodes": [{"name": "Start", "type": "n8n-nodes-base.manualTrigger"}],
                "connections": {"Start": {"main": []}},
                "settings": {"executionOrder": "v1"}
            }
        }))
        .into_response(),
        ("POST", ["workflows", _, "execute"]) => Json(json!({
            "data": {"id": "e1", "finished": false, "mode": "manual",
                     "startedAt": "2025-03-01T10:00:00.000Z"}
        }))
        .into_response(),
        ("PATCH", ["workflows", id]) => {
            let active = body
                .as_ref()
                .and_then(|b| b.get("active"))
                .cloned()
                .unwrap_or(Value::Null);
            Json(json!({"data": {"id": id, "active": active}})).into_response()
        }
        ("GET", ["executions"]) => Json(json!({
            "data": [
                {"id": "e1", "workflowId": "1", "finished": true, "mode": "manual",
                 "startedAt": "2025-03-01T10:00:00.000Z", "stoppedAt": "2025-03-01T10:00:02.000Z"},
                {"id": "e2", "workflowId": "1", "finished": false, "mode": "trigger"}
            ]
        }))
        .into_response(),
        ("GET", ["executions", "slow"]) => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"data": {}})).into_response()
        }
        ("GET", ["executions", id]) => Json(json!({
            "data": {
                "id": id, "workflowId": "1", "workflowData": {"name": "Billing"},
                "finished": true, "mode": "manual",
                "data": {"resultData": {"runData": {"Start": []}}}
            }
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
