//! Tool registry
//!
//! Built once at startup from a list of [`ToolGroup`]s and read
//! concurrently afterwards. Tools disabled in the config file are dropped
//! here; request-scoped disable lists are applied by the dispatcher.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;

use chronomcp_core::{RequestContext, Result, ToolArgs, ToolResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::ParamSchema;

/// Name, description and parameter schema of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub input_schema: Arc<Map<String, Value>>,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Arc::new(ParamSchema::new().into_object()),
        }
    }

    pub fn with_schema(mut self, schema: ParamSchema) -> Self {
        self.input_schema = Arc::new(schema.into_object());
        self
    }

    /// MCP wire representation.
    pub fn to_tool(&self) -> rmcp::model::Tool {
        rmcp::model::Tool::new(
            self.name.clone(),
            self.description.clone(),
            self.input_schema.clone(),
        )
    }
}

type Handler = Arc<dyn Fn(RequestContext, ToolArgs) -> BoxFuture<'static, Result<ToolResult>> + Send + Sync>;

/// A tool: metadata plus the handler closure invoked on `tools/call`.
#[derive(Clone)]
pub struct ToolDefinition {
    pub metadata: ToolMetadata,
    handler: Handler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.metadata.name)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn new<F, Fut>(metadata: ToolMetadata, handler: F) -> Self
    where
        F: Fn(RequestContext, ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResult>> + Send + 'static,
    {
        Self {
            metadata,
            handler: Arc::new(move |ctx, args| handler(ctx, args).boxed()),
        }
    }

    /// Handler closing over a cloneable state, typically the upstream client.
    pub fn with_state<S, F, Fut>(metadata: ToolMetadata, state: S, handler: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(S, RequestContext, ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResult>> + Send + 'static,
    {
        Self::new(metadata, move |ctx, args| handler(state.clone(), ctx, args))
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn call(&self, ctx: RequestContext, args: ToolArgs) -> BoxFuture<'static, Result<ToolResult>> {
        (self.handler)(ctx, args)
    }
}

/// A family of related tools sharing an upstream dependency.
pub trait ToolGroup: Send + Sync {
    fn name(&self) -> &'static str;

    fn tools(&self) -> Vec<ToolDefinition>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// Immutable name-indexed tool table.
#[derive(Debug, Default)]
pub struct Registry {
    tools: BTreeMap<String, ToolDefinition>,
}

impl Registry {
    /// Collect all tools from `groups`, dropping the names in `disabled`.
    ///
    /// Two enabled tools with the same name are a startup error. A disabled
    /// duplicate is still dropped silently.
    pub fn build(
        groups: &[Box<dyn ToolGroup>],
        disabled: &BTreeSet<String>,
    ) -> std::result::Result<Self, RegistryError> {
        let mut tools = BTreeMap::new();
        for group in groups {
            let mut count = 0usize;
            for tool in group.tools() {
                if disabled.contains(tool.name()) {
                    tracing::debug!(tool = %tool.name(), group = group.name(), "Tool disabled by configuration");
                    continue;
                }
                let name = tool.name().to_string();
                if tools.insert(name.clone(), tool).is_some() {
                    return Err(RegistryError::DuplicateTool(name));
                }
                count += 1;
            }
            tracing::debug!(group = group.name(), tools = count, "Registered tool group");
        }

        for name in disabled {
            if !tools.contains_key(name) {
                tracing::debug!(tool = %name, "Disabled tool is not registered");
            }
        }

        Ok(Self { tools })
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Metadata of every registered tool, sorted by name.
    pub fn list(&self) -> impl Iterator<Item = &ToolMetadata> {
        self.tools.values().map(|t| &t.metadata)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
