// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for dashboards

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "dashboards";
const ENTITY_KEY: &str = "dashboard";
const LIST_KEY: &str = "dashboards";

pub struct DashboardTools {
    client: ApiClient,
}

impl DashboardTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_dashboard(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get dashboard")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_dashboards(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "collection_slugs")?
        .boolean(&args, "include_dashboard_json")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list dashboards")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for DashboardTools {
    fn name(&self) -> &'static str {
        "dashboards"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_dashboard",
                    "Get the dashboard with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the dashboard.",
                    true,
                )),
                self.client.clone(),
                get_dashboard,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_dashboards",
                    "List dashboards, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only dashboards with these slugs.", false)
                        .string_array("names", "Only dashboards with these names.", false)
                        .string_array("collection_slugs", "Only dashboards in these collections.", false)
                        .boolean("include_dashboard_json", "Include the full dashboard definition.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_dashboards,
            ),
        ]
    }
}
