//! MCP surface: parameter schemas, the tool registry, dispatch and the
//! rmcp server handler.
//!
//! # Module Structure
//!
//! - `schema` - JSON Schema builder for tool parameters
//! - `registry` - Tool definitions, groups and the immutable registry
//! - `dispatch` - Tool-call routing and content framing
//! - `server` - `ServerHandler` implementation
//! - `error` - Error conversion helpers for handlers

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod schema;
pub mod server;

pub use dispatch::{render, Dispatcher, DEEP_LINK_PREFIX};
pub use error::{OptionArgumentExt, UpstreamResultExt};
pub use registry::{Registry, RegistryError, ToolDefinition, ToolGroup, ToolMetadata};
pub use schema::ParamSchema;
pub use server::ChronoMcpServer;
