//! Log queries against the Chronosphere logs API or a LogScale repository

use chronomcp_core::{RequestContext, TimeRange};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::config::is_valid_slug;
use crate::error::{ClientError, Result};

pub const LOGS_RANGE_QUERY_PATH: &str = "/api/v1/data/logs/range-query";
pub const LOG_FIELD_NAMES_PATH: &str = "/api/v1/data/logs/field-names";
pub const LOG_FIELD_VALUES_PATH: &str = "/api/v1/data/logs/field-values";

/// Repository queried on the LogScale backend when none is given
pub const DEFAULT_LOGSCALE_REPOSITORY: &str = "logs";

#[derive(Debug, Serialize)]
struct RangeQueryRequest<'a> {
    query: &'a str,
    happened_after: String,
    happened_before: String,
    limit: usize,
}

/// Body of a LogScale search, times in epoch milliseconds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogscaleQueryRequest<'a> {
    query_string: &'a str,
    start: i64,
    end: i64,
    is_live: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldNamesResponse {
    field_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldValue {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldValuesResponse {
    values: Vec<FieldValue>,
}

fn range_query(range: &TimeRange) -> Vec<(String, String)> {
    vec![
        ("happened_after".to_string(), range.start().to_rfc3339()),
        ("happened_before".to_string(), range.end().to_rfc3339()),
    ]
}

impl ApiClient {
    /// Run a log query over `range`.
    ///
    /// Uses the LogScale backend when it is configured; `repository` only
    /// applies there.
    pub async fn query_logs_range(
        &self,
        ctx: &RequestContext,
        query: &str,
        range: &TimeRange,
        limit: usize,
        repository: Option<&str>,
    ) -> Result<Value> {
        if self.uses_logscale() {
            let repository = repository.unwrap_or(DEFAULT_LOGSCALE_REPOSITORY);
            if !is_valid_slug(repository) {
                return Err(ClientError::Api(format!("invalid repository {repository:?}")));
            }
            let body = LogscaleQueryRequest {
                query_string: query,
                start: range.start().timestamp_millis(),
                end: range.end().timestamp_millis(),
                is_live: false,
            };
            let builder = self
                .logscale_request(
                    Method::POST,
                    &format!("/api/v1/repositories/{repository}/query"),
                )?
                .json(&body);
            return self.send_json(ctx, builder, true).await;
        }

        let body = RangeQueryRequest {
            query,
            happened_after: range.start().to_rfc3339(),
            happened_before: range.end().to_rfc3339(),
            limit,
        };
        self.post_json(ctx, LOGS_RANGE_QUERY_PATH, &body).await
    }

    pub async fn list_log_field_names(
        &self,
        ctx: &RequestContext,
        range: &TimeRange,
    ) -> Result<Vec<String>> {
        let response: FieldNamesResponse = self
            .get_json(ctx, LOG_FIELD_NAMES_PATH, &range_query(range))
            .await?;
        Ok(response.field_names)
    }

    pub async fn list_log_field_values(
        &self,
        ctx: &RequestContext,
        field_name: &str,
        range: &TimeRange,
        limit: usize,
    ) -> Result<Vec<FieldValue>> {
        let mut params = range_query(range);
        params.push(("field_name".to_string(), field_name.to_string()));
        params.push(("limit".to_string(), limit.to_string()));
        let response: FieldValuesResponse =
            self.get_json(ctx, LOG_FIELD_VALUES_PATH, &params).await?;
        Ok(response.values)
    }
}
