//! MCP server handler exposing the n8n tools and workflow resources.

use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData, RoleServer, ServerHandler,
};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::client::N8nClient;
use crate::error::ClientError;
use crate::models::{
    ActivateWorkflowParams, ExecuteWorkflowParams, GetExecutionParams, GetWorkflowParams,
    ListExecutionsParams, ListWorkflowsParams, ToolErrorResponse, WorkflowSummary,
};
use crate::operations;

/// URI prefix for workflow resources: `n8n://workflow/{id}`
pub const WORKFLOW_URI_PREFIX: &str = "n8n://workflow/";

/// MCP handler backed by a shared [`N8nClient`].
#[derive(Clone)]
pub struct N8nMcpServer {
    client: N8nClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl N8nMcpServer {
    pub fn new(client: N8nClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Descriptors of every registered tool.
    pub fn tool_list() -> Vec<Tool> {
        Self::tool_router().list_all()
    }

    // == Health ==

    #[tool(description = "Check connectivity to the n8n instance. Reports response time and workflow count, or the error when unreachable")]
    async fn health_check(&self) -> Result<CallToolResult, ErrorData> {
        render("health_check", Ok(operations::health_check(&self.client).await))
    }

    // == Workflow Tools ==

    #[tool(description = "List the workflows available on the n8n instance with id, name, active flag and tags")]
    async fn list_workflows(
        &self,
        Parameters(params): Parameters<ListWorkflowsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "list_workflows",
            operations::list_workflows(&self.client, params).await,
        )
    }

    #[tool(description = "Get full details of one workflow, including nodes, connections and settings")]
    async fn get_workflow_details(
        &self,
        Parameters(params): Parameters<GetWorkflowParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "get_workflow_details",
            operations::get_workflow_details(&self.client, params).await,
        )
    }

    #[tool(description = "Execute a workflow, optionally passing a JSON object as input data. Returns the execution id and status")]
    async fn execute_workflow(
        &self,
        Parameters(params): Parameters<ExecuteWorkflowParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "execute_workflow",
            operations::execute_workflow(&self.client, params).await,
        )
    }

    #[tool(description = "Activate (active=true, the default) or deactivate a workflow")]
    async fn activate_workflow(
        &self,
        Parameters(params): Parameters<ActivateWorkflowParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "activate_workflow",
            operations::activate_workflow(&self.client, params).await,
        )
    }

    // == Execution Tools ==

    #[tool(description = "Get the status and run data of one execution")]
    async fn get_execution_status(
        &self,
        Parameters(params): Parameters<GetExecutionParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "get_execution_status",
            operations::get_execution_status(&self.client, params).await,
        )
    }

    #[tool(description = "List recent executions, optionally for a single workflow (limit defaults to 10)")]
    async fn list_executions(
        &self,
        Parameters(params): Parameters<ListExecutionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        render(
            "list_executions",
            operations::list_executions(&self.client, params).await,
        )
    }
}

#[tool_handler]
impl ServerHandler for N8nMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "n8n-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("n8n MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Bridge to an n8n workflow automation instance. \
                 Use these tools to list, inspect, activate and execute workflows \
                 and to follow their executions."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        debug!("Listing workflow resources");
        let resources = match operations::list_workflows(&self.client, ListWorkflowsParams::default()).await {
            Ok(workflows) => workflows.iter().filter_map(workflow_resource).collect(),
            Err(err) => {
                error!("Failed to list workflow resources: {}", err);
                Vec::new()
            }
        };
        Ok(ListResourcesResult::with_all_items(resources))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        debug!("Reading resource {}", request.uri);
        let workflow_id = parse_workflow_uri(&request.uri).ok_or_else(|| {
            ErrorData::invalid_params(format!("Invalid resource URI: {}", request.uri), None)
        })?;

        let details = operations::get_workflow_details(
            &self.client,
            GetWorkflowParams {
                workflow_id: workflow_id.to_string(),
            },
        )
        .await
        .map_err(|err| match err {
            ClientError::UpstreamStatus { status: 404, .. } => {
                ErrorData::resource_not_found(err.to_string(), None)
            }
            ClientError::InvalidParams(msg) => ErrorData::invalid_params(msg, None),
            other => ErrorData::internal_error(other.to_string(), None),
        })?;

        let json = serde_json::to_string_pretty(&details)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(json, request.uri.clone())],
        })
    }
}

// == Rendering ==
/// Turns an operation outcome into a tool result.
///
/// Classified failures become error results (`is_error: true`) so the
/// caller sees the message; bad arguments are protocol errors.
fn render<T: Serialize>(tool: &str, outcome: Result<T, ClientError>) -> Result<CallToolResult, ErrorData> {
    match outcome {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value)
                .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
            info!("Tool {} completed", tool);
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        Err(ClientError::InvalidParams(msg)) => Err(ErrorData::invalid_params(msg, None)),
        Err(err) => {
            error!("Tool {} failed ({}): {}", tool, err.kind(), err);
            let body = ToolErrorResponse::new(err.to_string(), tool);
            let json = serde_json::to_string_pretty(&body).unwrap_or_else(|_| err.to_string());
            Ok(CallToolResult::error(vec![Content::text(json)]))
        }
    }
}

// == Resources ==
fn workflow_resource(workflow: &WorkflowSummary) -> Option<Resource> {
    let id = match &workflow.id {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let name = workflow.name.clone().unwrap_or_else(|| id.clone());
    let state = if workflow.active.unwrap_or(false) { "active" } else { "inactive" };

    let mut raw = RawResource::new(format!("{}{}", WORKFLOW_URI_PREFIX, id), name.clone());
    raw.description = Some(format!("Workflow: {} ({})", name, state));
    raw.mime_type = Some("application/json".to_string());
    Some(raw.no_annotation())
}

/// Extracts the workflow id from `n8n://workflow/{id}`.
pub fn parse_workflow_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(WORKFLOW_URI_PREFIX)
        .filter(|id| !id.is_empty())
}
