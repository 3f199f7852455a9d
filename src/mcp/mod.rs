//! MCP Module
//!
//! Model Context Protocol surface: the seven n8n tools plus one
//! `n8n://workflow/{id}` resource per workflow, served over stdio.

pub mod server;

pub use server::{parse_workflow_uri, N8nMcpServer, WORKFLOW_URI_PREFIX};

use rmcp::{transport::stdio, ServiceExt};
use tracing::info;

use crate::client::N8nClient;

/// Serves MCP over stdin/stdout until the peer disconnects.
///
/// stdout carries protocol frames only; logs go to stderr.
pub async fn serve_stdio(client: N8nClient) -> anyhow::Result<()> {
    info!("Serving MCP over stdio");

    let service = N8nMcpServer::new(client).serve(stdio()).await?;
    let reason = service.waiting().await?;

    info!("MCP session ended: {:?}", reason);
    Ok(())
}
