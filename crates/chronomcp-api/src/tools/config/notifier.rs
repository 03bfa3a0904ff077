// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for notifiers

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "notifiers";
const ENTITY_KEY: &str = "notifier";
const LIST_KEY: &str = "notifiers";

pub struct NotifierTools {
    client: ApiClient,
}

impl NotifierTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_notifier(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get notifier")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_notifiers(
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
        .upstream("list notifiers")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for NotifierTools {
    fn name(&self) -> &'static str {
        "notifiers"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_notifier",
                    "Get the notifier with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the notifier.",
                    true,
                )),
                self.client.clone(),
                get_notifier,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_notifiers",
                    "List notifiers, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only notifiers with these slugs.", false)
                        .string_array("names", "Only notifiers with these names.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_notifiers,
            ),
        ]
    }
}
