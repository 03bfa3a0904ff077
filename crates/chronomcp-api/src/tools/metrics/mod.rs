//! Prometheus metric tools

pub mod chart;

use chrono::{DateTime, Utc};
use chronomcp_client::{ApiClient, QueryData};
use chronomcp_core::{
    params, parse_duration, parse_time_range, Error, RequestContext, Result, TimeRange, ToolArgs,
    ToolResult,
};
use serde_json::json;

use crate::mcp::{ParamSchema, ToolDefinition, ToolGroup, ToolMetadata, UpstreamResultExt};
use crate::tools::common;
use chart::{render_line_chart, series_color, ChartOptions, PNG_MIME};

/// Range queries aim for about this many samples per series.
const TARGET_POINTS: i64 = 200;
const MIN_STEP_SECONDS: u64 = 15;

const MIN_CHART_SIDE: i64 = 100;
const MAX_CHART_WIDTH: i64 = 2000;
const MAX_CHART_HEIGHT: i64 = 1500;

const DEFAULT_METADATA_LIMIT: usize = 100;
const MAX_METADATA_LIMIT: usize = 1000;

pub struct MetricTools {
    client: ApiClient,
}

impl MetricTools {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Step in whole seconds: the `step` argument, or the range split into
/// roughly [`TARGET_POINTS`] samples but never finer than 15s.
pub fn resolve_step(args: &ToolArgs, range: &TimeRange) -> Result<u64> {
    if let Some(raw) = params::optional_string(args, "step")? {
        let step = parse_duration(&raw).map_err(|reason| Error::invalid_argument("step", reason))?;
        let seconds = step.num_seconds();
        if seconds <= 0 {
            return Err(Error::invalid_argument("step", "must be at least 1s"));
        }
        return Ok(seconds as u64);
    }
    let auto = (range.duration().num_seconds() / TARGET_POINTS).max(0) as u64;
    Ok(auto.max(MIN_STEP_SECONDS))
}

fn chart_side(args: &ToolArgs, name: &str, default: u32, max: i64) -> Result<u32> {
    let value = params::integer(args, name, false, i64::from(default))?;
    if !(MIN_CHART_SIDE..=max).contains(&value) {
        return Err(Error::invalid_argument(
            name,
            format!("must be between {MIN_CHART_SIDE} and {max}"),
        ));
    }
    Ok(value as u32)
}

fn matchers(args: &ToolArgs, required: bool) -> Result<Vec<String>> {
    let matchers = params::string_array(args, "match", required, &[])?;
    if required && matchers.is_empty() {
        return Err(Error::invalid_argument("match", "needs at least one series selector"));
    }
    Ok(matchers)
}

fn with_query_metadata(result: ToolResult, data: &QueryData) -> ToolResult {
    result
        .with_metadata("result_type", data.result_type.clone())
        .with_metadata("series_count", data.series_count())
}

fn with_link(result: ToolResult, link: Option<String>) -> ToolResult {
    match link {
        Some(link) => result.with_deep_link(link),
        None => result,
    }
}

async fn query_range(
    client: &ApiClient,
    ctx: &RequestContext,
    args: &ToolArgs,
) -> Result<(String, TimeRange, QueryData)> {
    let query = params::string(args, "query", true, "")?;
    let range = parse_time_range(args)?;
    let step = resolve_step(args, &range)?;
    let data = client
        .query_prometheus_range(ctx, &query, &range, step)
        .await
        .upstream("query prometheus range")?;
    Ok((query, range, data))
}

async fn query_prometheus_range(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let (query, range, data) = query_range(&client, &ctx, &args).await?;
    let result = with_query_metadata(ToolResult::json(&data)?, &data);
    Ok(with_link(result, common::metrics_explorer_link(&client, &query, &range)))
}

async fn render_prometheus_range_query(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let defaults = ChartOptions::default();
    let options = ChartOptions {
        width: chart_side(&args, "width", defaults.width, MAX_CHART_WIDTH)?,
        height: chart_side(&args, "height", defaults.height, MAX_CHART_HEIGHT)?,
    };
    let (query, range, data) = query_range(&client, &ctx, &args).await?;
    let series = data
        .matrix()
        .map_err(|e| Error::Internal(format!("cannot chart query result: {e}")))?;
    let png = render_line_chart(&series, options)
        .map_err(|e| Error::Internal(format!("failed to render chart: {e}")))?;

    let legend: Vec<_> = series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let [r, g, b] = series_color(i).0;
            json!({"series": s.label(), "color": format!("#{r:02x}{g:02x}{b:02x}")})
        })
        .collect();

    let result = with_query_metadata(ToolResult::image(png, PNG_MIME), &data)
        .with_metadata("legend", legend);
    Ok(with_link(result, common::metrics_explorer_link(&client, &query, &range)))
}

async fn query_prometheus_instant(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let query = params::string(&args, "query", true, "")?;
    let at = params::optional_string(&args, "time")?
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| Error::invalid_argument("time", format!("not an RFC 3339 timestamp: {e}")))
        })
        .transpose()?;
    let data = client
        .query_prometheus_instant(&ctx, &query, at)
        .await
        .upstream("query prometheus instant")?;
    Ok(with_query_metadata(ToolResult::json(&data)?, &data))
}

async fn list_prometheus_label_names(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let matchers = matchers(&args, false)?;
    let range = parse_time_range(&args)?;
    let names = client
        .list_prometheus_label_names(&ctx, &matchers, &range)
        .await
        .upstream("list prometheus label names")?;
    ToolResult::json(&json!({ "label_names": names }))
}

async fn list_prometheus_label_values(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let label_name = params::string(&args, "label_name", true, "")?;
    let matchers = matchers(&args, false)?;
    let range = parse_time_range(&args)?;
    let values = client
        .list_prometheus_label_values(&ctx, &label_name, &matchers, &range)
        .await
        .upstream("list prometheus label values")?;
    ToolResult::json(&json!({ "label_name": label_name, "values": values }))
}

async fn list_prometheus_series(client: ApiClient, ctx: RequestContext, args: ToolArgs) -> Result<ToolResult> {
    let matchers = matchers(&args, true)?;
    let range = parse_time_range(&args)?;
    let series = client
        .list_prometheus_series(&ctx, &matchers, &range)
        .await
        .upstream("list prometheus series")?;
    let count = series.len();
    Ok(ToolResult::json(&json!({ "series": series }))?.with_metadata("series_count", count))
}

async fn get_prometheus_metric_metadata(
    client: ApiClient,
    ctx: RequestContext,
    args: ToolArgs,
) -> Result<ToolResult> {
    let metric = params::optional_string(&args, "metric")?;
    let limit = common::limit(&args, DEFAULT_METADATA_LIMIT, MAX_METADATA_LIMIT)?;
    let metadata = client
        .get_prometheus_metric_metadata(&ctx, metric.as_deref(), limit)
        .await
        .upstream("get prometheus metric metadata")?;
    Ok(ToolResult::from_value(metadata))
}

fn range_query_schema() -> ParamSchema {
    ParamSchema::new()
        .string("query", "PromQL expression.", true)
        .time_range()
        .string(
            "step",
            "Resolution as a duration, e.g. 30s or 5m. Defaults to about 200 points, at least 15s.",
            false,
        )
}

fn selector_schema(required: bool) -> ParamSchema {
    ParamSchema::new()
        .string_array(
            "match",
            "Series selectors, e.g. up{job=\"api\"}.",
            required,
        )
        .time_range()
}

impl ToolGroup for MetricTools {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        let client = &self.client;
        vec![
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "query_prometheus_range",
                    "Evaluate a PromQL expression over a time range and return the matrix result.",
                )
                .with_schema(range_query_schema()),
                client.clone(),
                query_prometheus_range,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "render_prometheus_range_query",
                    "Evaluate a PromQL expression over a time range and return a PNG line chart \
                     with one line per series. The legend is returned as metadata.",
                )
                .with_schema(
                    range_query_schema()
                        .integer("width", "Chart width in pixels (default 800).", false)
                        .integer("height", "Chart height in pixels (default 400).", false),
                ),
                client.clone(),
                render_prometheus_range_query,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "query_prometheus_instant",
                    "Evaluate a PromQL expression at a single instant.",
                )
                .with_schema(
                    ParamSchema::new()
                        .string("query", "PromQL expression.", true)
                        .string(
                            "time",
                            "Evaluation instant as an RFC 3339 timestamp. Defaults to now.",
                            false,
                        ),
                ),
                client.clone(),
                query_prometheus_instant,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_prometheus_label_names",
                    "List label names, optionally only those on series matching the selectors.",
                )
                .with_schema(selector_schema(false)),
                client.clone(),
                list_prometheus_label_names,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_prometheus_label_values",
                    "List the values of a label, optionally only on series matching the selectors.",
                )
                .with_schema(selector_schema(false).string("label_name", "Label to list values for.", true)),
                client.clone(),
                list_prometheus_label_values,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "list_prometheus_series",
                    "List the label sets of series matching the selectors.",
                )
                .with_schema(selector_schema(true)),
                client.clone(),
                list_prometheus_series,
            ),
            ToolDefinition::with_state(
                ToolMetadata::new(
                    "get_prometheus_metric_metadata",
                    "Get type, help and unit metadata for metrics, optionally for one metric.",
                )
                .with_schema(common::limit_schema(
                    ParamSchema::new().string("metric", "Metric name.", false),
                    DEFAULT_METADATA_LIMIT,
                    MAX_METADATA_LIMIT,
                )),
                client.clone(),
                get_prometheus_metric_metadata,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chronomcp_testing::fixtures::args;

    fn range(hours: i64) -> TimeRange {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        TimeRange::ending_at(end, Duration::hours(hours)).unwrap()
    }

    #[test]
    fn test_step_defaults() {
        assert_eq!(resolve_step(&ToolArgs::new(), &range(1)).unwrap(), 18);
        assert_eq!(resolve_step(&ToolArgs::new(), &range(0)).unwrap(), 15);
        assert_eq!(resolve_step(&ToolArgs::new(), &range(24)).unwrap(), 432);
    }

    #[test]
    fn test_explicit_step() {
        assert_eq!(resolve_step(&args(json!({"step": "5m"})), &range(1)).unwrap(), 300);
        assert!(resolve_step(&args(json!({"step": "500ms"})), &range(1)).is_err());
        assert!(resolve_step(&args(json!({"step": "-1m"})), &range(1)).is_err());
        assert!(resolve_step(&args(json!({"step": "often"})), &range(1)).is_err());
    }

    #[test]
    fn test_chart_side_bounds() {
        assert_eq!(chart_side(&ToolArgs::new(), "width", 800, MAX_CHART_WIDTH).unwrap(), 800);
        assert!(chart_side(&args(json!({"width": 50})), "width", 800, MAX_CHART_WIDTH).is_err());
        assert!(chart_side(&args(json!({"height": 5000})), "height", 400, MAX_CHART_HEIGHT).is_err());
    }

    #[test]
    fn test_series_requires_selector() {
        assert!(matchers(&ToolArgs::new(), true).is_err());
        assert!(matchers(&args(json!({"match": []})), true).is_err());
        assert_eq!(matchers(&ToolArgs::new(), false).unwrap(), Vec::<String>::new());
    }
}
