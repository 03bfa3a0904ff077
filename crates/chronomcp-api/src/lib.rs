//! MCP server for the Chronosphere observability platform.
//!
//! # Module Structure
//!
//! - `mcp` - Tool registry, dispatcher and the rmcp server handler
//! - `tools` - Tool groups for alerts, events, logs, metrics and configuration
//! - `http` - Inbound credential middleware for the HTTP transport
//! - `transport` - stdio and SSE transports and the multiplexer running them

pub mod http;
pub mod mcp;
pub mod tools;
pub mod transport;

use std::collections::BTreeSet;
use std::sync::Arc;

use chronomcp_client::ApiClient;

pub use mcp::{ChronoMcpServer, Dispatcher, Registry, RegistryError, ToolDefinition, ToolGroup};
pub use transport::{run, TransportError};

/// Register every tool group, minus `disabled`, behind a server handler.
pub fn build_server(
    client: &ApiClient,
    disabled: &BTreeSet<String>,
    service_name: impl Into<String>,
) -> Result<ChronoMcpServer, RegistryError> {
    let registry = Registry::build(&tools::all_groups(client), disabled)?;
    tracing::info!(tools = registry.len(), disabled = disabled.len(), "Tool registry built");
    Ok(ChronoMcpServer::new(
        Dispatcher::new(Arc::new(registry)),
        service_name,
    ))
}
