//! Generic read/list over the config API (`/api/v1/config/<collection>`).
//!
//! Config entities are passed through as JSON; the generated config tools
//! only choose the collection and the list filters.

use chronomcp_core::RequestContext;
use serde_json::{Map, Value};

use crate::client::{page_query, ApiClient};
use crate::error::{ClientError, Result};

pub const CONFIG_API_PREFIX: &str = "/api/v1/config";

pub const MAX_CONFIG_PAGE_SIZE: usize = 200;

/// Slugs are lowercase identifiers; anything that could escape a path
/// segment is rejected.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && slug != "."
        && slug != ".."
}

impl ApiClient {
    /// Fetch one entity. The upstream wraps it under its singular name.
    pub async fn read_config_entity(
        &self,
        ctx: &RequestContext,
        collection: &str,
        entity_key: &str,
        slug: &str,
    ) -> Result<Value> {
        if !is_valid_slug(slug) {
            return Err(ClientError::Api(format!("invalid slug {slug:?}")));
        }
        let path = format!("{CONFIG_API_PREFIX}/{collection}/{slug}");
        let mut body: Map<String, Value> = self.get_json(ctx, &path, &[]).await?;
        Ok(body
            .remove(entity_key)
            .unwrap_or(Value::Object(body)))
    }

    /// List entities of a collection, following page tokens up to `limit`.
    ///
    /// `list_key` is the response field holding the page, e.g.
    /// `notification_policies` for the `notification-policies` collection.
    pub async fn list_config_entities(
        &self,
        ctx: &RequestContext,
        collection: &str,
        list_key: &str,
        filters: &[(String, String)],
        limit: usize,
    ) -> Result<Vec<Value>> {
        let path = format!("{CONFIG_API_PREFIX}/{collection}");
        let mut entities = Vec::new();
        let mut token = String::new();

        while entities.len() < limit {
            let mut params = filters.to_vec();
            page_query(
                &mut params,
                (limit - entities.len()).min(MAX_CONFIG_PAGE_SIZE),
                &token,
            );

            let mut body: Map<String, Value> = self.get_json(ctx, &path, &params).await?;
            let page = match body.remove(list_key) {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(ClientError::Api(format!(
                        "expected {list_key} to be a list, got {other}"
                    )))
                }
            };
            let received = page.len();
            entities.extend(page);

            let next = body
                .get("page")
                .and_then(|p| p.get("next_token"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if next.is_empty() || received == 0 {
                break;
            }
            token = next.to_string();
        }

        entities.truncate(limit);
        Ok(entities)
    }
}
