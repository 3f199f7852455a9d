//! Execution operations: run a workflow, inspect and list executions.

use serde_json::{json, Value};
use tracing::info;

use super::{data, data_list, execution_summary, field, path_segment, str_field};
use crate::client::{ApiRequest, N8nClient};
use crate::error::{ClientError, Result};
use crate::models::{
    ExecuteWorkflowParams, ExecutionDetails, ExecutionStarted, ExecutionStatus,
    ExecutionSummary, GetExecutionParams, ListExecutionsParams,
};

/// Starts a workflow run.
///
/// Non-empty `input_data` is sent as `{"data": input_data}`; otherwise the
/// body is `{}`. This is a POST and may be retried on transient failures.
pub async fn execute_workflow(
    client: &N8nClient,
    params: ExecuteWorkflowParams,
) -> Result<ExecutionStarted> {
    let id = path_segment("workflow_id", &params.workflow_id)?;
    let payload = match params.input_data {
        Some(input) if !input.is_empty() => json!({ "data": input }),
        _ => json!({}),
    };

    let envelope = client
        .call(ApiRequest::post(format!("/workflows/{}/execute", id)).json(payload))
        .await?;

    let execution = data(&envelope);
    let result = ExecutionStarted {
        execution_id: field(execution, "id"),
        workflow_id: params.workflow_id,
        status: ExecutionStatus::from_finished(execution),
        started_at: str_field(execution, "startedAt"),
        finished_at: str_field(execution, "stoppedAt"),
        mode: str_field(execution, "mode"),
    };

    info!("Workflow {} executed: {}", result.workflow_id, result.execution_id);
    Ok(result)
}

/// Fetches one execution including its run data.
pub async fn get_execution_status(
    client: &N8nClient,
    params: GetExecutionParams,
) -> Result<ExecutionDetails> {
    let id = path_segment("execution_id", &params.execution_id)?;
    let envelope = client
        .call(ApiRequest::get(format!("/executions/{}", id)))
        .await?;

    let execution = data(&envelope);
    Ok(ExecutionDetails {
        summary: execution_summary(execution),
        data: execution.get("data").cloned().unwrap_or(Value::Null),
    })
}

/// Lists recent executions, newest first as returned by n8n.
pub async fn list_executions(
    client: &N8nClient,
    params: ListExecutionsParams,
) -> Result<Vec<ExecutionSummary>> {
    if params.limit < 1 {
        return Err(ClientError::InvalidParams(format!(
            "limit must be at least 1, got {}",
            params.limit
        )));
    }

    let mut request = ApiRequest::get("/executions").query("limit", params.limit);
    if let Some(workflow_id) = params.workflow_id.as_deref().map(str::trim) {
        if !workflow_id.is_empty() {
            request = request.query("workflowId", workflow_id);
        }
    }

    let envelope = client.call(request).await?;
    let executions: Vec<ExecutionSummary> =
        data_list(&envelope).iter().map(execution_summary).collect();

    info!("Listed {} executions", executions.len());
    Ok(executions)
}
