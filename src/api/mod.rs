//! API Module
//!
//! HTTP surface for the http transport: the same tool catalogue the MCP
//! server exposes, plus cache statistics.
//!
//! # Endpoints
//! - `GET /health` - Check the n8n instance
//! - `GET /tools` - List tool descriptors
//! - `POST /tools/:name` - Invoke a tool
//! - `GET /stats` - Get cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
