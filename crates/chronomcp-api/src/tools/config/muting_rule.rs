// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for muting rules

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "muting-rules";
const ENTITY_KEY: &str = "muting_rule";
const LIST_KEY: &str = "muting_rules";

pub struct MutingRuleTools {
    client: ApiClient,
}

impl MutingRuleTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_muting_rule(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get muting rule")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_muting_rules(
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
        .upstream("list muting rules")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for MutingRuleTools {
    fn name(&self) -> &'static str {
        "muting_rules"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_muting_rule",
                    "Get the muting rule with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the muting rule.",
                    true,
                )),
                self.client.clone(),
                get_muting_rule,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_muting_rules",
                    "List muting rules, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only muting rules with these slugs.", false)
                        .string_array("names", "Only muting rules with these names.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_muting_rules,
            ),
        ]
    }
}
