//! Helpers shared by the tool groups

use chronomcp_client::ApiClient;
use chronomcp_core::{params, Error, Result, TimeRange, ToolArgs, ToolResult};
use reqwest::Url;
use serde_json::{Map, Value};

use crate::mcp::ParamSchema;

pub const LIMIT_PARAM: &str = "limit";

/// Row cap for a listing: `default` when absent, rejected when not positive
/// or above `max`.
pub fn limit(args: &ToolArgs, default: usize, max: usize) -> Result<usize> {
    let raw = params::integer(args, LIMIT_PARAM, false, default as i64)?;
    if raw <= 0 {
        return Err(Error::invalid_argument(LIMIT_PARAM, "must be greater than zero"));
    }
    let value = raw as usize;
    if value > max {
        return Err(Error::invalid_argument(
            LIMIT_PARAM,
            format!("must be at most {max}"),
        ));
    }
    Ok(value)
}

pub fn limit_schema(schema: ParamSchema, default: usize, max: usize) -> ParamSchema {
    schema.integer(
        LIMIT_PARAM,
        &format!("Maximum number of results (default {default}, max {max})."),
        false,
    )
}

fn is_present(args: &ToolArgs, name: &str) -> bool {
    args.get(name).is_some_and(|v| !v.is_null())
}

/// Whether the call names any time-range bound.
pub fn has_time_range(args: &ToolArgs) -> bool {
    use chronomcp_core::time_range::{DURATION_PARAM, END_PARAM, START_PARAM};
    [START_PARAM, END_PARAM, DURATION_PARAM]
        .iter()
        .any(|name| is_present(args, name))
}

/// Link into the web UI of the org, or `None` when the URL cannot be built.
pub fn deep_link(client: &ApiClient, path: &str, query: &[(&str, String)]) -> Option<String> {
    let base = client.ui_url(path);
    let url = if query.is_empty() {
        Url::parse(&base)
    } else {
        Url::parse_with_params(&base, query)
    };
    match url {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::debug!(path, error = %e, "Skipping deep link");
            None
        }
    }
}

/// `start`/`end` query pairs for a UI link, in RFC 3339.
pub fn range_query(range: &TimeRange) -> Vec<(&'static str, String)> {
    vec![
        ("start", range.start().to_rfc3339()),
        ("end", range.end().to_rfc3339()),
    ]
}

pub fn metrics_explorer_link(client: &ApiClient, query: &str, range: &TimeRange) -> Option<String> {
    let mut params = vec![("query", query.to_string())];
    params.extend(range_query(range));
    deep_link(client, "/metrics/explorer", &params)
}

pub fn events_link(client: &ApiClient, query: Option<&str>, range: &TimeRange) -> Option<String> {
    let mut params = Vec::new();
    if let Some(query) = query {
        params.push(("query", query.to_string()));
    }
    params.extend(range_query(range));
    deep_link(client, "/events", &params)
}

pub fn logs_link(client: &ApiClient, query: &str, range: &TimeRange) -> Option<String> {
    let mut params = vec![("query", query.to_string())];
    params.extend(range_query(range));
    deep_link(client, "/logs/explorer", &params)
}

pub fn alerts_link(client: &ApiClient) -> Option<String> {
    deep_link(client, "/alerts", &[])
}

/// Default and maximum row caps of generated configuration listings.
pub const DEFAULT_CONFIG_LIMIT: usize = 100;
pub const MAX_CONFIG_LIMIT: usize = 1000;

/// Query pairs for a configuration listing, built from the optional
/// filter arguments of a call. Absent arguments add nothing.
#[derive(Debug, Default)]
pub struct ListQuery {
    pairs: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &str, value: String) -> Self {
        self.pairs.push((name.to_string(), value));
        self
    }

    pub fn string(self, args: &ToolArgs, name: &str) -> Result<Self> {
        Ok(match params::optional_string(args, name)? {
            Some(value) => self.push(name, value),
            None => self,
        })
    }

    pub fn boolean(self, args: &ToolArgs, name: &str) -> Result<Self> {
        if !is_present(args, name) {
            return Ok(self);
        }
        let value = params::boolean(args, name, true, false)?;
        Ok(self.push(name, value.to_string()))
    }

    pub fn integer(self, args: &ToolArgs, name: &str) -> Result<Self> {
        if !is_present(args, name) {
            return Ok(self);
        }
        let value = params::integer(args, name, true, 0)?;
        Ok(self.push(name, value.to_string()))
    }

    /// One pair per element, the way repeated query parameters are sent.
    pub fn string_array(self, args: &ToolArgs, name: &str) -> Result<Self> {
        let values = params::string_array(args, name, false, &[])?;
        Ok(values.into_iter().fold(self, |query, value| query.push(name, value)))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// `{"<list_key>": [...]}` with the item count as metadata.
pub fn listing(list_key: &str, items: Vec<Value>) -> ToolResult {
    let count = items.len();
    let mut body = Map::new();
    body.insert(list_key.to_string(), Value::Array(items));
    ToolResult::from_value(Value::Object(body)).with_metadata("count", count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use chronomcp_client::ApiClientConfig;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_limit_bounds() {
        assert_eq!(limit(&ToolArgs::new(), 100, 1000).unwrap(), 100);
        assert_eq!(limit(&args(json!({"limit": 5})), 100, 1000).unwrap(), 5);
        assert!(limit(&args(json!({"limit": 0})), 100, 1000).is_err());
        assert!(limit(&args(json!({"limit": -3})), 100, 1000).is_err());
        let err = limit(&args(json!({"limit": 1001})), 100, 1000).unwrap_err();
        assert!(err.to_string().contains("at most 1000"));
    }

    #[test]
    fn test_has_time_range() {
        assert!(!has_time_range(&ToolArgs::new()));
        assert!(!has_time_range(&args(json!({"start": null}))));
        assert!(has_time_range(&args(json!({"duration": "1h"}))));
    }

    #[test]
    fn test_links_are_encoded() {
        let client = ApiClient::new(ApiClientConfig::new("https://acme.chronosphere.io")).unwrap();
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
        .unwrap();
        let link = metrics_explorer_link(&client, "sum(rate(x[5m]))", &range).unwrap();
        assert!(link.starts_with("https://acme.chronosphere.io/metrics/explorer?query=sum%28rate%28x%5B5m%5D%29%29"));
        assert!(link.contains("start=2024-05-01T11%3A00%3A00%2B00%3A00"));
        assert_eq!(
            alerts_link(&client).unwrap(),
            "https://acme.chronosphere.io/alerts"
        );
    }

    #[test]
    fn test_list_query_skips_absent_arguments() -> Result<()> {
        let call = args(json!({
            "slugs": ["a", "b"],
            "include_dashboard_json": true,
            "page_hint": 3
        }));
        let pairs = ListQuery::new()
            .string_array(&call, "slugs")?
            .string_array(&call, "names")?
            .boolean(&call, "include_dashboard_json")?
            .integer(&call, "page_hint")?
            .string(&call, "team_slug")?
            .into_pairs();
        let rendered: Vec<_> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(
            rendered,
            vec!["slugs=a", "slugs=b", "include_dashboard_json=true", "page_hint=3"]
        );
        Ok(())
    }

    #[test]
    fn test_list_query_rejects_wrong_types() {
        assert!(ListQuery::new().boolean(&args(json!({"x": "yes"})), "x").is_err());
        assert!(ListQuery::new().string_array(&args(json!({"x": "a"})), "x").is_err());
    }

    #[test]
    fn test_listing_counts_items() {
        let result = listing("teams", vec![json!({"slug": "a"}), json!({"slug": "b"})]);
        assert_eq!(result.metadata["count"], json!(2));
        assert_eq!(
            result.payload,
            chronomcp_core::Payload::Json(json!({"teams": [{"slug": "a"}, {"slug": "b"}]}))
        );
    }
}
