//! Log tools

use chronomcp_client::ApiClient;
use chronomcp_core::{params, parse_time_range, RequestContext, Result, ToolArgs, ToolResult};
use serde_json::json;

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 10_000;
const DEFAULT_VALUES_LIMIT: usize = 50;
const MAX_VALUES_LIMIT: usize = 1000;

pub struct LogTools {
    client: ApiClient,
}

impl LogTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn query_logs_range(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let query = params::string(&args, "query", true, "")?;
    let repository = params::optional_string(&args, "repository")?;
    let range = parse_time_range(&args)?;
    let limit = common::limit(&args, DEFAULT_LIMIT, MAX_LIMIT)?;

    let rows = client
        .query_logs_range(&ctx, &query, &range, limit, repository.as_deref())
        .await
        .upstream("query logs")?;

    let result = ToolResult::from_value(rows);
    if client.uses_logscale() {
        return Ok(result);
    }
    Ok(match common::logs_link(&client, &query, &range) {
        Some(link) => result.with_deep_link(link),
        None => result,
    })
}

async fn list_log_field_names(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let range = parse_time_range(&args)?;
    let names = client
        .list_log_field_names(&ctx, &range)
        .await
        .upstream("list log field names")?;
    ToolResult::json(&json!({ "field_names": names }))
}

async fn list_log_field_values(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let field_name = params::string(&args, "field_name", true, "")?;
    let range = parse_time_range(&args)?;
    let limit = common::limit(&args, DEFAULT_VALUES_LIMIT, MAX_VALUES_LIMIT)?;
    let values = client
        .list_log_field_values(&ctx, &field_name, &range, limit)
        .await
        .upstream("list log field values")?;
    ToolResult::json(&json!({ "field_name": field_name, "values": values }))
}

impl ToolGroup for LogTools {
    fn name(&self) -> &'static str {
        "logs"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "query_logs_range",
                    "Run a log query over a time range and return matching log lines.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string("query", "Log query.", true)
                        .string(
                            "repository",
                            "LogScale repository (LogScale backend only, default \"logs\").",
                            false,
                        )
                        .time_range(),
                    DEFAULT_LIMIT,
                    MAX_LIMIT,
                )),
                self.client.clone(),
                query_logs_range,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_log_field_names",
                    "List the field names present in logs over a time range.",
                )
                .with_schema(ParamSchema::new().time_range()),
                self.client.clone(),
                list_log_field_names,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_log_field_values",
                    "List the most common values of a log field with their counts.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string("field_name", "Log field to list values for.", true)
                        .time_range(),
                    DEFAULT_VALUES_LIMIT,
                    MAX_VALUES_LIMIT,
                )),
                self.client.clone(),
                list_log_field_values,
            ),
        ]
    }
}
