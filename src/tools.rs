//! Tool Catalogue
//!
//! Name-based entry point for callers that hand over a tool name and a JSON
//! argument object (the HTTP surface). The MCP server uses the same
//! operations through typed parameters.

use rmcp::model::Tool;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::client::N8nClient;
use crate::error::{ClientError, Result};
use crate::mcp::N8nMcpServer;
use crate::operations;

/// Names of every exposed tool.
pub const TOOL_NAMES: &[&str] = &[
    "health_check",
    "list_workflows",
    "get_workflow_details",
    "execute_workflow",
    "get_execution_status",
    "activate_workflow",
    "list_executions",
];

/// Tool descriptors (name, description, input schema).
pub fn catalogue() -> Vec<Tool> {
    N8nMcpServer::tool_list()
}

/// Runs the tool `name` with `arguments`.
///
/// `null` arguments are treated as `{}` so tools whose parameters all have
/// defaults can be called bare.
pub async fn invoke(client: &N8nClient, name: &str, arguments: Value) -> Result<Value> {
    info!("Invoking tool: {}", name);

    let result = dispatch(client, name, arguments).await;
    if let Err(err) = &result {
        error!("Tool {} failed: {}", name, err);
    }
    result
}

async fn dispatch(client: &N8nClient, name: &str, arguments: Value) -> Result<Value> {
    match name {
        "health_check" => to_json(operations::health_check(client).await),
        "list_workflows" => to_json(operations::list_workflows(client, parse(arguments)?).await?),
        "get_workflow_details" => {
            to_json(operations::get_workflow_details(client, parse(arguments)?).await?)
        }
        "execute_workflow" => to_json(operations::execute_workflow(client, parse(arguments)?).await?),
        "get_execution_status" => {
            to_json(operations::get_execution_status(client, parse(arguments)?).await?)
        }
        "activate_workflow" => {
            to_json(operations::activate_workflow(client, parse(arguments)?).await?)
        }
        "list_executions" => to_json(operations::list_executions(client, parse(arguments)?).await?),
        other => Err(ClientError::UnknownTool(other.to_string())),
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ClientError::InvalidParams(e.to_string()))
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Unknown(e.to_string()))
}
