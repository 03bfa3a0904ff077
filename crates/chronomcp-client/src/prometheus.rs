//! Prometheus HTTP API served under `/data/m3/api/v1`

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chronomcp_core::{RequestContext, TimeRange};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::{ClientError, Result};

pub const PROMETHEUS_API_PREFIX: &str = "/data/m3/api/v1";

/// Standard Prometheus response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

/// Result of an instant or range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    /// `matrix`, `vector`, `scalar` or `string`
    pub result_type: String,
    pub result: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl QueryData {
    pub fn series_count(&self) -> usize {
        match &self.result {
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// Decode a `matrix` result into typed series.
    pub fn matrix(&self) -> Result<Vec<RangeSeries>> {
        if self.result_type != "matrix" {
            return Err(ClientError::Api(format!(
                "expected a matrix result, got {}",
                self.result_type
            )));
        }
        Ok(serde_json::from_value(self.result.clone())?)
    }
}

/// One series of a range query: labels plus `[unix_seconds, "value"]` samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

impl RangeSeries {
    /// Samples with values that parse as finite floats.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().filter_map(|(ts, raw)| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| (*ts, v))
        })
    }

    /// `name{k="v",...}` rendering used for legends.
    pub fn label(&self) -> String {
        let name = self.metric.get("__name__").cloned().unwrap_or_default();
        let labels: Vec<String> = self
            .metric
            .iter()
            .filter(|(k, _)| k.as_str() != "__name__")
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect();
        if labels.is_empty() {
            name
        } else {
            format!("{name}{{{}}}", labels.join(","))
        }
    }
}

fn seconds(t: DateTime<Utc>) -> String {
    t.timestamp().to_string()
}

fn range_params(range: &TimeRange) -> Vec<(String, String)> {
    vec![
        ("start".to_string(), seconds(range.start())),
        ("end".to_string(), seconds(range.end())),
    ]
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
pub fn is_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn matcher_params(params: &mut Vec<(String, String)>, matchers: &[String]) {
    params.extend(matchers.iter().map(|m| ("match[]".to_string(), m.clone())));
}

impl ApiClient {
    async fn prometheus<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let path = format!("{PROMETHEUS_API_PREFIX}{endpoint}");
        let envelope: Envelope<T> = self.get_json(ctx, &path, params).await?;
        if envelope.status != "success" {
            let kind = envelope.error_type.unwrap_or_else(|| "error".to_string());
            let message = envelope.error.unwrap_or_default();
            return Err(ClientError::Api(format!("{kind}: {message}")));
        }
        for warning in &envelope.warnings {
            tracing::warn!(endpoint, warning = %warning, "Prometheus warning");
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Api("response carried no data".to_string()))
    }

    pub async fn query_prometheus_range(
        &self,
        ctx: &RequestContext,
        query: &str,
        range: &TimeRange,
        step_seconds: u64,
    ) -> Result<QueryData> {
        let mut params = range_params(range);
        params.push(("query".to_string(), query.to_string()));
        params.push(("step".to_string(), format!("{step_seconds}s")));
        self.prometheus(ctx, "/query_range", &params).await
    }

    pub async fn query_prometheus_instant(
        &self,
        ctx: &RequestContext,
        query: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<QueryData> {
        let mut params = vec![("query".to_string(), query.to_string())];
        if let Some(at) = at {
            params.push(("time".to_string(), seconds(at)));
        }
        self.prometheus(ctx, "/query", &params).await
    }

    pub async fn list_prometheus_label_names(
        &self,
        ctx: &RequestContext,
        matchers: &[String],
        range: &TimeRange,
    ) -> Result<Vec<String>> {
        let mut params = range_params(range);
        matcher_params(&mut params, matchers);
        self.prometheus(ctx, "/labels", &params).await
    }

    pub async fn list_prometheus_label_values(
        &self,
        ctx: &RequestContext,
        label_name: &str,
        matchers: &[String],
        range: &TimeRange,
    ) -> Result<Vec<String>> {
        let mut params = range_params(range);
        matcher_params(&mut params, matchers);
        if !is_label_name(label_name) {
            return Err(ClientError::Api(format!(
                "invalid label name {label_name:?}"
            )));
        }
        let endpoint = format!("/label/{label_name}/values");
        self.prometheus(ctx, &endpoint, &params).await
    }

    pub async fn list_prometheus_series(
        &self,
        ctx: &RequestContext,
        matchers: &[String],
        range: &TimeRange,
    ) -> Result<Vec<BTreeMap<String, String>>> {
        let mut params = range_params(range);
        matcher_params(&mut params, matchers);
        self.prometheus(ctx, "/series", &params).await
    }

    pub async fn get_prometheus_metric_metadata(
        &self,
        ctx: &RequestContext,
        metric: Option<&str>,
        limit: usize,
    ) -> Result<Value> {
        let mut params = vec![("limit".to_string(), limit.to_string())];
        if let Some(metric) = metric {
            params.push(("metric".to_string(), metric.to_string()));
        }
        self.prometheus(ctx, "/metadata", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matrix_decoding_and_points() {
        let data: QueryData = serde_json::from_value(json!({
            "resultType": "matrix",
            "result": [{
                "metric": {"__name__": "up", "job": "api"},
                "values": [[1714557600, "1"], [1714557615, "NaN"], [1714557630, "0"]]
            }]
        }))
        .unwrap();
        assert_eq!(data.series_count(), 1);
        let series = data.matrix().unwrap();
        assert_eq!(series[0].label(), "up{job=\"api\"}");
        let points: Vec<_> = series[0].points().collect();
        assert_eq!(points, vec![(1714557600.0, 1.0), (1714557630.0, 0.0)]);
    }

    #[test]
    fn test_label_name_validation() {
        assert!(is_label_name("job"));
        assert!(is_label_name("__name__"));
        assert!(!is_label_name("9lives"));
        assert!(!is_label_name("../admin"));
        assert!(!is_label_name(""));
    }

    #[test]
    fn test_matrix_rejects_vector() {
        let data = QueryData {
            result_type: "vector".into(),
            result: json!([]),
            warnings: vec![],
        };
        assert!(data.matrix().is_err());
    }
}
