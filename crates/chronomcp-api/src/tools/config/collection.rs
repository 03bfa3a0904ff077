// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for collections

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "collections";
const ENTITY_KEY: &str = "collection";
const LIST_KEY: &str = "collections";

pub struct CollectionTools {
    client: ApiClient,
}

impl CollectionTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_collection(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get collection")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_collections(
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
        .upstream("list collections")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for CollectionTools {
    fn name(&self) -> &'static str {
        "collections"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_collection",
                    "Get the collection with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the collection.",
                    true,
                )),
                self.client.clone(),
                get_collection,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_collections",
                    "List collections, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only collections with these slugs.", false)
                        .string_array("names", "Only collections with these names.", false)
                        .string_array("team_slugs", "Only collections owned by these teams.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_collections,
            ),
        ]
    }
}
