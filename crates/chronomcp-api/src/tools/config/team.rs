// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for teams

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "teams";
const ENTITY_KEY: &str = "team";
const LIST_KEY: &str = "teams";

pub struct TeamTools {
    client: ApiClient,
}

impl TeamTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_team(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get team")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_teams(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list teams")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for TeamTools {
    fn name(&self) -> &'static str {
        "teams"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_team",
                    "Get the team with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the team.",
                    true,
                )),
                self.client.clone(),
                get_team,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_teams",
                    "List teams, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only teams with these slugs.", false)
                        .string_array("names", "Only teams with these names.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_teams,
            ),
        ]
    }
}
