// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for buckets

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "buckets";
const ENTITY_KEY: &str = "bucket";
const LIST_KEY: &str = "buckets";

pub struct BucketTools {
    client: ApiClient,
}

impl BucketTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_bucket(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get bucket")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_buckets(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "team_slugs")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list buckets")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for BucketTools {
    fn name(&self) -> &'static str {
        "buckets"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_bucket",
                    "Get the bucket with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the bucket.",
                    true,
                )),
                self.client.clone(),
                get_bucket,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_buckets",
                    "List buckets, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only buckets with these slugs.", false)
                        .string_array("names", "Only buckets with these names.", false)
                        .string_array("team_slugs", "Only buckets owned by these teams.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_buckets,
            ),
        ]
    }
}
