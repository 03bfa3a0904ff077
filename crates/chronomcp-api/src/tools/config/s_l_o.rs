// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for SLOs

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "slos";
const ENTITY_KEY: &str = "slo";
const LIST_KEY: &str = "slos";

pub struct SLOTools {
    client: ApiClient,
}

impl SLOTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_slo(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get SLO")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_slos(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let query = ListQuery::new()
        .string_array(&args, "slugs")?
        .string_array(&args, "names")?
        .string_array(&args, "collection_slugs")?
        .into_pairs();
    let limit = common::limit(&args, common::DEFAULT_CONFIG_LIMIT, common::MAX_CONFIG_LIMIT)?;
    let items = client
        .list_config_entities(&ctx, COLLECTION, LIST_KEY, &query, limit)
        .await
        .upstream("list SLOs")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for SLOTools {
    fn name(&self) -> &'static str {
        "slos"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_slo",
                    "Get the SLO with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the SLO.",
                    true,
                )),
                self.client.clone(),
                get_slo,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_slos",
                    "List SLOs, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only SLOs with these slugs.", false)
                        .string_array("names", "Only SLOs with these names.", false)
                        .string_array("collection_slugs", "Only SLOs in these collections.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_slos,
            ),
        ]
    }
}
