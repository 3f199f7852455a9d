//! Normalized result DTOs
//!
//! Shapes returned to the tool caller, projected from n8n's `data` envelope.

use serde::Serialize;
use serde_json::{Map, Value};

// == Execution Status ==
/// Binary status derived from n8n's `finished` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    Running,
}

impl ExecutionStatus {
    /// `finished: true` → completed; absent, null or false → running.
    pub fn from_finished(execution: &Value) -> Self {
        if execution.get("finished").and_then(Value::as_bool).unwrap_or(false) {
            ExecutionStatus::Completed
        } else {
            ExecutionStatus::Running
        }
    }
}

// == Workflows ==
/// One entry of `list_workflows`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
    pub id: Value,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub tags: Vec<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Result of `get_workflow_details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDetails {
    pub id: Value,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub nodes: Vec<Value>,
    pub connections: Map<String, Value>,
    pub settings: Map<String, Value>,
    pub tags: Vec<Value>,
}

/// Result of `activate_workflow`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationResult {
    pub success: bool,
    pub workflow_id: String,
    pub active: bool,
    pub message: String,
}

impl ActivationResult {
    pub fn new(workflow_id: impl Into<String>, active: bool) -> Self {
        let verb = if active { "activated" } else { "deactivated" };
        Self {
            success: true,
            workflow_id: workflow_id.into(),
            active,
            message: format!("Workflow {} successfully", verb),
        }
    }
}

// == Executions ==
/// Result of `execute_workflow`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionStarted {
    pub execution_id: Value,
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub mode: Option<String>,
}

/// One entry of `list_executions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    pub id: Value,
    pub workflow_id: Value,
    pub workflow_name: Option<String>,
    pub status: ExecutionStatus,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub mode: Option<String>,
}

/// Result of `get_execution_status`: a summary plus the raw run data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionDetails {
    #[serde(flatten)]
    pub summary: ExecutionSummary,
    pub data: Value,
}

// == Health ==
/// Result of `health_check`. Never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HealthReport {
    Healthy {
        status: &'static str,
        api_url: String,
        response_time_seconds: f64,
        total_workflows: usize,
        timestamp: String,
    },
    Unhealthy {
        status: &'static str,
        error: String,
        timestamp: String,
    },
}

impl HealthReport {
    pub fn healthy(api_url: impl Into<String>, response_time_seconds: f64, total_workflows: usize) -> Self {
        HealthReport::Healthy {
            status: "healthy",
            api_url: api_url.into(),
            response_time_seconds,
            total_workflows,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        HealthReport::Unhealthy {
            status: "unhealthy",
            error: error.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthReport::Healthy { .. })
    }
}

// == Tool Error ==
/// Body of a failed tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Name of the tool that failed
    pub tool: String,
}

impl ToolErrorResponse {
    pub fn new(error: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            tool: tool.into(),
        }
    }
}
