//! Operation Handlers
//!
//! One function per tool. Each validates its parameters, makes exactly one
//! call through [`N8nClient::call`](crate::client::N8nClient::call) and
//! projects the `data` envelope into a normalized result.
//!
//! | Tool | Upstream call | Cached |
//! |---|---|---|
//! | `health_check` | `GET /workflows` | no |
//! | `list_workflows` | `GET /workflows` | yes |
//! | `get_workflow_details` | `GET /workflows/{id}` | yes |
//! | `execute_workflow` | `POST /workflows/{id}/execute` | no |
//! | `get_execution_status` | `GET /executions/{id}` | no |
//! | `activate_workflow` | `PATCH /workflows/{id}` | no |
//! | `list_executions` | `GET /executions?workflowId&limit` | no |

mod executions;
mod health;
mod workflows;

pub use executions::{execute_workflow, get_execution_status, list_executions};
pub use health::health_check;
pub use workflows::{activate_workflow, get_workflow_details, list_workflows};

use serde_json::{Map, Value};

use crate::error::{ClientError, Result};
use crate::models::{ExecutionStatus, ExecutionSummary};

// == Envelope Helpers ==
/// The payload under the envelope's `data` key (null when absent).
fn data(envelope: &Value) -> &Value {
    envelope.get("data").unwrap_or(&Value::Null)
}

/// `data` as a list; anything else reads as empty.
fn data_list(envelope: &Value) -> &[Value] {
    data(envelope).as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn field(item: &Value, key: &str) -> Value {
    item.get(key).cloned().unwrap_or(Value::Null)
}

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_field(item: &Value, key: &str) -> Option<bool> {
    item.get(key).and_then(Value::as_bool)
}

fn list_field(item: &Value, key: &str) -> Vec<Value> {
    item.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn object_field(item: &Value, key: &str) -> Map<String, Value> {
    item.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Normalizes one n8n execution record.
fn execution_summary(execution: &Value) -> ExecutionSummary {
    ExecutionSummary {
        id: field(execution, "id"),
        workflow_id: field(execution, "workflowId"),
        workflow_name: execution
            .get("workflowData")
            .and_then(|wf| str_field(wf, "name")),
        status: ExecutionStatus::from_finished(execution),
        started_at: str_field(execution, "startedAt"),
        finished_at: str_field(execution, "stoppedAt"),
        mode: str_field(execution, "mode"),
    }
}

// == Parameter Helpers ==
/// Validates an id and escapes it for use as a single path segment.
fn path_segment(name: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::InvalidParams(format!("{} must not be empty", name)));
    }
    Ok(urlencoding::encode(id).into_owned())
}
