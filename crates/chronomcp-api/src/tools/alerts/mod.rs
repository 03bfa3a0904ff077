//! Alert tools: raw listing and analysis

pub mod analysis;
pub mod filter;

use chrono::Utc;
use chronomcp_client::ApiClient;
use chronomcp_core::{params, parse_time_range, RequestContext, Result, ToolArgs, ToolResult};
use serde_json::json;

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common;

pub use analysis::{analyze, AlertAnalysis, ResponseFormat};
pub use filter::build_filter;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

pub struct AlertTools {
    client: ApiClient,
}

impl AlertTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn base_schema() -> ParamSchema {
    let schema = filter::filter_schema(ParamSchema::new()).time_range();
    common::limit_schema(schema, DEFAULT_LIMIT, MAX_LIMIT)
}

/// Fetch alerts matching the filter arguments. Alerts are only bounded by
/// time when the call names a range.
async fn fetch(client: &ApiClient, ctx: &RequestContext, args: &ToolArgs) -> Result<Vec<chronomcp_client::Alert>> {
    let filter = build_filter(args)?;
    let range = if common::has_time_range(args) {
        Some(parse_time_range(args)?)
    } else {
        None
    };
    let limit = common::limit(args, DEFAULT_LIMIT, MAX_LIMIT)?;
    client
        .list_alerts(ctx, filter.as_ref(), range.as_ref(), limit)
        .await
        .upstream("list alerts")
}

async fn list_alerts(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let alerts = fetch(&client, &ctx, &args).await?;
    let result = ToolResult::json(&json!({ "alerts": alerts }))?;
    Ok(match common::alerts_link(&client) {
        Some(link) => result.with_deep_link(link),
        None => result,
    })
}

async fn analyze_alerts(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let format = ResponseFormat::parse(params::optional_string(&args, "response_format")?.as_deref())?;
    let alerts = fetch(&client, &ctx, &args).await?;
    let analysis = analyze(&alerts, format, Utc::now());
    let result = ToolResult::json(&analysis)?;
    Ok(match common::alerts_link(&client) {
        Some(link) => result.with_deep_link(link),
        None => result,
    })
}

impl ToolGroup for AlertTools {
    fn name(&self) -> &'static str {
        "alerts"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_alerts",
                    "List alerts, optionally filtered by monitor, monitor labels, signals, \
                     notification policy and mute status. Returns the raw alert records.",
                )
                .with_schema(base_schema()),
                self.client.clone(),
                list_alerts,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "analyze_alerts",
                    "Analyze alerts matching the filters: summary counts and durations, \
                     clustering by signals and monitor labels, noisy monitors, long-running \
                     alerts and notes. Use response_format to choose the level of detail.",
                )
                .with_schema(base_schema().enumeration(
                    "response_format",
                    "Level of detail (default compact).",
                    &ResponseFormat::NAMES,
                    false,
                )),
                self.client.clone(),
                analyze_alerts,
            ),
        ]
    }
}
