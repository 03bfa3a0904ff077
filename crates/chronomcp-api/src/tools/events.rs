//! Event tools

use chronomcp_client::ApiClient;
use chronomcp_core::{params, parse_time_range, RequestContext, Result, ToolArgs, ToolResult};
use serde_json::json;

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Event labels whose values `get_events_metadata` reports.
pub const METADATA_LABELS: [&str; 3] = ["category", "source", "type"];

pub struct EventTools {
    client: ApiClient,
}

impl EventTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn list_events(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let query = params::optional_string(&args, "query")?;
    let range = parse_time_range(&args)?;
    let limit = common::limit(&args, DEFAULT_LIMIT, MAX_LIMIT)?;

    let events = client
        .list_events(&ctx, &range, query.as_deref(), limit)
        .await
        .upstream("list events")?;

    let result = ToolResult::json(&json!({ "events": events }))?;
    Ok(match common::events_link(&client, query.as_deref(), &range) {
        Some(link) => result.with_deep_link(link),
        None => result,
    })
}

async fn get_events_metadata(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let range = parse_time_range(&args)?;
    let [category, source, event_type] = METADATA_LABELS;

    let (categories, sources, types) = futures::try_join!(
        client.list_event_label_values(&ctx, category, &range),
        client.list_event_label_values(&ctx, source, &range),
        client.list_event_label_values(&ctx, event_type, &range),
    )
    .upstream("get events metadata")?;

    ToolResult::json(&json!({
        "categories": categories,
        "sources": sources,
        "types": types,
    }))
}

async fn list_events_label_values(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let label_name = params::string(&args, "label_name", true, "")?;
    let range = parse_time_range(&args)?;

    let values = client
        .list_event_label_values(&ctx, &label_name, &range)
        .await
        .upstream("list event label values")?;

    ToolResult::json(&json!({ "label_name": label_name, "values": values }))
}

impl ToolGroup for EventTools {
    fn name(&self) -> &'static str {
        "events"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_events",
                    "List change events such as deploys, config changes and feature flag \
                     flips in a time range, optionally narrowed by an event query.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string("query", "Event query, e.g. category = \"deploy\".", false)
                        .time_range(),
                    DEFAULT_LIMIT,
                    MAX_LIMIT,
                )),
                self.client.clone(),
                list_events,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_events_metadata",
                    "List the event categories, sources and types seen in a time range. \
                     Use these values to build list_events queries.",
                )
                .with_schema(ParamSchema::new().time_range()),
                self.client.clone(),
                get_events_metadata,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_events_label_values",
                    "List the values of one event label in a time range.",
                )
                .with_schema(
                    ParamSchema::new()
                        .string("label_name", "Event label to list values for.", true)
                        .time_range(),
                ),
                self.client.clone(),
                list_events_label_values,
            ),
        ]
    }
}
