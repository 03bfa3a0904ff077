//! rmcp server handler

use std::sync::Arc;

use chronomcp_core::{Credential, RequestContext as ToolContext, ToolArgs};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};

use super::dispatch::Dispatcher;

const INSTRUCTIONS: &str = "Tools for the Chronosphere observability platform. \
    Use list_alerts and analyze_alerts to investigate firing monitors, list_events \
    for change events, query_logs_range for logs and the query_prometheus_* tools \
    for metrics. get_* and list_* tools read configuration such as monitors, \
    dashboards and notification policies.";

/// MCP server exposing the registered tools.
///
/// Cheap to clone; the HTTP transport creates one per session.
#[derive(Debug, Clone)]
pub struct ChronoMcpServer {
    dispatcher: Arc<Dispatcher>,
    service_name: String,
}

impl ChronoMcpServer {
    pub fn new(dispatcher: Dispatcher, service_name: impl Into<String>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            service_name: service_name.into(),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Credential attached by the HTTP middleware. Requests arriving over stdio
/// carry none.
fn request_credential(context: &RequestContext<RoleServer>) -> Credential {
    context
        .extensions
        .get::<axum::http::request::Parts>()
        .and_then(|parts| parts.extensions.get::<Credential>())
        .cloned()
        .unwrap_or_default()
}

impl ServerHandler for ChronoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.service_name.clone(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let credential = request_credential(&context);
        Ok(ListToolsResult::with_all_items(
            self.dispatcher.visible_tools(&credential),
        ))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let ctx = ToolContext::with_cancellation(context.ct.clone())
            .with_credential(request_credential(&context));
        let args: ToolArgs = request.arguments.unwrap_or_default();
        Ok(self.dispatcher.dispatch(ctx, &request.name, args).await)
    }
}
