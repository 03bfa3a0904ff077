// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for rollup rules

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "rollup-rules";
const ENTITY_KEY: &str = "rollup_rule";
const LIST_KEY: &str = "rollup_rules";

pub struct RollupRuleTools {
    client: ApiClient,
}

impl RollupRuleTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_rollup_rule(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get rollup rule")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_rollup_rules(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "bucket_slugs")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list rollup rules")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for RollupRuleTools {
    fn name(&self) -> &'static str {
        "rollup_rules"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_rollup_rule",
                    "Get the rollup rule with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the rollup rule.",
                    true,
                )),
                self.client.clone(),
                get_rollup_rule,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_rollup_rules",
                    "List rollup rules, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only rollup rules with these slugs.", false)
                        .string_array("names", "Only rollup rules with these names.", false)
                        .string_array("bucket_slugs", "Only rollup rules in these buckets.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_rollup_rules,
            ),
        ]
    }
}
