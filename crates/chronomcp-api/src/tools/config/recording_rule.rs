// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for recording rules

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "recording-rules";
const ENTITY_KEY: &str = "recording_rule";
const LIST_KEY: &str = "recording_rules";

pub struct RecordingRuleTools {
    client: ApiClient,
}

impl RecordingRuleTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_recording_rule(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get recording rule")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_recording_rules(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "bucket_slugs")?
        .string_array(&args, "execution_groups")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list recording rules")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for RecordingRuleTools {
    fn name(&self) -> &'static str {
        "recording_rules"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_recording_rule",
                    "Get the recording rule with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the recording rule.",
                    true,
                )),
                self.client.clone(),
                get_recording_rule,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_recording_rules",
                    "List recording rules, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only recording rules with these slugs.", false)
                        .string_array("names", "Only recording rules with these names.", false)
                        .string_array("bucket_slugs", "Only recording rules in these buckets.", false)
                        .string_array("execution_groups", "Only recording rules in these execution groups.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_recording_rules,
            ),
        ]
    }
}
