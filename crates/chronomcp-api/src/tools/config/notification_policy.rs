// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for notification policies

use chronomcp_client::ApiClient;
use chronomcp_core::{params, RequestContext, Result, ToolArgs, ToolResult};

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common::{self, ListQuery};

const COLLECTION: &str = "notification-policies";
const ENTITY_KEY: &str = "notification_policy";
const LIST_KEY: &str = "notification_policies";

pub struct NotificationPolicyTools {
    client: ApiClient,
}

impl NotificationPolicyTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn get_notification_policy(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let slug = params::string(&args, "slug", true, "")?;
    let entity = client
        .read_config_entity(&ctx, COLLECTION, ENTITY_KEY, &slug)
        .await
        .upstream("get notification policy")?;
    Ok(ToolResult::from_value(entity))
}

async fn list_notification_policies(
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
        .upstream("list notification policies")?;
    Ok(common::listing(LIST_KEY, items))
}

impl ToolGroup for NotificationPolicyTools {
    fn name(&self) -> &'static str {
        "notification_policies"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_notification_policy",
                    "Get the notification policy with the given slug.",
                )
                .with_schema(ParamSchema::new().string(
                    "slug",
                    "Slug of the notification policy.",
                    true,
                )),
                self.client.clone(),
                get_notification_policy,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_notification_policies",
                    "List notification policies, optionally filtered.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new()
                        .string_array("slugs", "Only notification policies with these slugs.", false)
                        .string_array("names", "Only notification policies with these names.", false),
                    common::DEFAULT_CONFIG_LIMIT,
                    common::MAX_CONFIG_LIMIT,
                )),
                self.client.clone(),
                list_notification_policies,
            ),
        ]
    }
}
