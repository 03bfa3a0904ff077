// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for drop rules

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "drop-rules";
const ENTITY_KEY: &str = "drop_rule";
const LIST_KEY: &str = "drop_rules";

pub struct DropRuleTools {
    client: ApiClient,
}

impl DropRuleTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_drop_rule(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get drop rule")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_drop_rules(
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
        .upstream("list drop rules")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for DropRuleTools {
    fn name(&self) -> &'static str {
        "drop_rules"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_drop_rule",
                    "Get the drop rule with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the drop rule.",
                    true,
                )),
                self.client.clone(),
                get_drop_rule,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_drop_rules",
                    "List drop rules, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only drop rules with these slugs.", false)
                        .string_array("names", "Only drop rules with these names.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_drop_rules,
            ),
        ]
    }
}
