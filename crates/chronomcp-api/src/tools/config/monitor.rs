// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for monitors

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "monitors";
const ENTITY_KEY: &str = "monitor";
const LIST_KEY: &str = "monitors";

pub struct MonitorTools {
    client: ApiClient,
}

impl MonitorTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_monitor(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get monitor")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_monitors(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "bucket_slugs")?
        .string_array(&args, "collection_slugs")?
        .string_array(&args, "team_slugs")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list monitors")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for MonitorTools {
    fn name(&self) -> &'static str {
        "monitors"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_monitor",
                    "Get the monitor with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the monitor.",
                    true,
                )),
                self.client.clone(),
                get_monitor,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_monitors",
                    "List monitors, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only monitors with these slugs.", false)
                        .string_array("names", "Only monitors with these names.", false)
                        .string_array("bucket_slugs", "Only monitors in these buckets.", false)
                        .string_array("collection_slugs", "Only monitors in these collections.", false)
                        .string_array("team_slugs", "Only monitors owned by these teams.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_monitors,
            ),
        ]
    }
}
