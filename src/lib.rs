//! n8n MCP - Tool-calling bridge to the n8n REST API
//!
//! Exposes n8n workflow and execution operations as MCP tools, with a
//! TTL response cache and retrying request dispatch in front of the API.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod operations;
pub mod sanitize;
pub mod tools;

pub use api::AppState;
pub use client::N8nClient;
pub use config::{Config, Transport};
pub use error::{ClientError, ConfigError};
