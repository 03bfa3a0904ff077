// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for classic dashboards

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "classic-dashboards";
const ENTITY_KEY: &str = "classic_dashboard";
const LIST_KEY: &str = "classic_dashboards";

pub struct ClassicDashboardTools {
    client: ApiClient,
}

impl ClassicDashboardTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_classic_dashboard(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get classic dashboard")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_classic_dashboards(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "collection_slugs")?
        .string_array(&args, "bucket_slugs")?
        .boolean(&args, "include_dashboard_json")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list classic dashboards")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for ClassicDashboardTools {
    fn name(&self) -> &'static str {
        "classic_dashboards"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_classic_dashboard",
                    "Get the classic dashboard with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the classic dashboard.",
                    true,
                )),
                self.client.clone(),
                get_classic_dashboard,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_classic_dashboards",
                    "List classic dashboards, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only classic dashboards with these slugs.", false)
                        .string_array("names", "Only classic dashboards with these names.", false)
                        .string_array("collection_slugs", "Only classic dashboards in these collections.", false)
                        .string_array("bucket_slugs", "Only classic dashboards in these buckets.", false)
                        .boolean("include_dashboard_json", "Include the full dashboard definition.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_classic_dashboards,
            ),
        ]
    }
}
