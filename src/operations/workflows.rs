//! Workflow operations: list, details, activation.

use serde_json::json;
use tracing::info;

use super::{bool_field, data, data_list, field, list_field, object_field, path_segment, str_field};
use crate::client::{ApiRequest, N8nClient};
use crate::error::Result;
use crate::models::{
    ActivateWorkflowParams, ActivationResult, GetWorkflowParams, ListWorkflowsParams,
    WorkflowDetails, WorkflowSummary,
};

/// Lists workflows, optionally keeping only active ones.
pub async fn list_workflows(
    client: &N8nClient,
    params: ListWorkflowsParams,
) -> Result<Vec<WorkflowSummary>> {
    let envelope = client.call(ApiRequest::get("/workflows").cacheable()).await?;

    let workflows: Vec<WorkflowSummary> = data_list(&envelope)
        .iter()
        .filter(|wf| !params.active_only || bool_field(wf, "active").unwrap_or(false))
        .map(|wf| WorkflowSummary {
            id: field(wf, "id"),
            name: str_field(wf, "name"),
            active: bool_field(wf, "active"),
            tags: list_field(wf, "tags"),
            created_at: str_field(wf, "createdAt"),
            updated_at: str_field(wf, "updatedAt"),
        })
        .collect();

    info!("Listed {} workflows", workflows.len());
    Ok(workflows)
}

/// Fetches one workflow with its nodes, connections and settings.
pub async fn get_workflow_details(
    client: &N8nClient,
    params: GetWorkflowParams,
) -> Result<WorkflowDetails> {
    let id = path_segment("workflow_id", &params.workflow_id)?;
    let envelope = client
        .call(ApiRequest::get(format!("/workflows/{}", id)).cacheable())
        .await?;

    let wf = data(&envelope);
    Ok(WorkflowDetails {
        id: field(wf, "id"),
        name: str_field(wf, "name"),
        active: bool_field(wf, "active"),
        nodes: list_field(wf, "nodes"),
        connections: object_field(wf, "connections"),
        settings: object_field(wf, "settings"),
        tags: list_field(wf, "tags"),
    })
}

/// Activates or deactivates a workflow.
///
/// The response body is not inspected; success of the PATCH is enough.
pub async fn activate_workflow(
    client: &N8nClient,
    params: ActivateWorkflowParams,
) -> Result<ActivationResult> {
    let id = path_segment("workflow_id", &params.workflow_id)?;
    client
        .call(ApiRequest::patch(format!("/workflows/{}", id)).json(json!({ "active": params.active })))
        .await?;

    let result = ActivationResult::new(params.workflow_id, params.active);
    info!("Workflow {}: {}", result.workflow_id, result.message);
    Ok(result)
}
