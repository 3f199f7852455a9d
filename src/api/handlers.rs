//! API Handlers
//!
//! HTTP request handlers for the tool endpoints and cache statistics.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rmcp::model::Tool;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::client::N8nClient;
use crate::error::{ClientError, Result};
use crate::models::HealthReport;
use crate::operations;
use crate::tools;

/// Application state shared across all handlers.
///
/// The client is cheap to clone; its cache sits behind `Arc<RwLock<>>`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: N8nClient,
}

impl AppState {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

/// Handler for GET /health
///
/// Checks n8n. Answers 503 with the error when it is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = operations::health_check(&state.client).await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Handler for GET /tools
pub async fn list_tools_handler() -> Json<Vec<Tool>> {
    Json(tools::catalogue())
}

/// Handler for POST /tools/:name
///
/// The body is the tool's argument object; an empty body means `{}`.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidParams(format!("Invalid JSON body: {}", e)))?
    };

    let result = tools::invoke(&state.client, &name, arguments).await?;
    Ok(Json(result))
}

/// Handler for GET /stats
///
/// Returns the response cache counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.client.cache_stats().await)
}
