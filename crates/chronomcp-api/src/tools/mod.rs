//! Tool groups
//!
//! Handwritten groups cover alerts, events, logs and metrics; `config` is
//! generated from `api/config-entities.yaml`.

pub mod alerts;
pub mod common;
pub mod config;
pub mod events;
pub mod logs;
pub mod metrics;

use chronomcp_client::ApiClient;

use crate::mcp::ToolGroup;

pub use alerts::AlertTools;
pub use events::EventTools;
pub use logs::LogTools;
pub use metrics::MetricTools;

/// Every tool group served by the MCP server.
pub fn all_groups(client: &ApiClient) -> Vec<Box<dyn ToolGroup>> {
    let mut groups: Vec<Box<dyn ToolGroup>> = vec![
        Box::new(AlertTools::new(client.clone())),
        Box::new(EventTools::new(client.clone())),
        Box::new(LogTools::new(client.clone())),
        Box::new(MetricTools::new(client.clone())),
    ];
    groups.extend(config::groups(client));
    groups
}
