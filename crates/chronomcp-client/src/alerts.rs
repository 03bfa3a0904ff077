//! Alert listing

use chrono::{DateTime, Utc};
use chronomcp_core::{RequestContext, TimeRange};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::Result;
use crate::time;

pub const LIST_ALERTS_PATH: &str = "/api/v1/data/alerts/list";

/// Largest page requested from the alert listing
pub const MAX_ALERT_PAGE_SIZE: usize = 500;

/// A `name`/`value` pair as used by signals and monitor labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityChange {
    pub severity: String,
    #[serde(with = "time::optional")]
    pub changed_at: Option<DateTime<Utc>>,
}

/// Alert as returned by the upstream listing.
///
/// `end_time == None` means the alert is still ongoing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub alert_id: String,
    pub monitor_slug: String,
    pub monitor_name: String,
    pub is_muted: bool,
    #[serde(with = "time::optional")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(with = "time::optional")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(alias = "signals")]
    pub signal: Vec<Label>,
    pub monitor_labels: Vec<Label>,
    pub signals_hash: String,
    pub severity_history: Vec<SeverityChange>,
    pub notification_policy_slug: String,
}

impl Alert {
    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    /// Severity of the most recent entry in the history
    pub fn current_severity(&self) -> Option<&str> {
        self.severity_history.last().map(|s| s.severity.as_str())
    }
}

// ============================================================================
// Filter DTO
// ============================================================================

/// String comparison understood by the upstream filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOperation {
    Equal,
    NotEqual,
    Contains,
    NotContains,
    RegexEqual,
    NotRegexEqual,
    AnyOf,
    NoneOf,
}

impl MatchOperation {
    pub const ALL: [MatchOperation; 8] = [
        MatchOperation::Equal,
        MatchOperation::NotEqual,
        MatchOperation::Contains,
        MatchOperation::NotContains,
        MatchOperation::RegexEqual,
        MatchOperation::NotRegexEqual,
        MatchOperation::AnyOf,
        MatchOperation::NoneOf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperation::Equal => "EQUAL",
            MatchOperation::NotEqual => "NOT_EQUAL",
            MatchOperation::Contains => "CONTAINS",
            MatchOperation::NotContains => "NOT_CONTAINS",
            MatchOperation::RegexEqual => "REGEX_EQUAL",
            MatchOperation::NotRegexEqual => "NOT_REGEX_EQUAL",
            MatchOperation::AnyOf => "ANY_OF",
            MatchOperation::NoneOf => "NONE_OF",
        }
    }

    /// Case-insensitive lookup of the canonical name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(raw))
    }

    /// `ANY_OF` and `NONE_OF` compare against a list of values.
    pub fn takes_multiple_values(&self) -> bool {
        matches!(self, MatchOperation::AnyOf | MatchOperation::NoneOf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringMatcher {
    pub operation: MatchOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multi_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatcher {
    pub name: String,
    pub value: StringMatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MuteStatus {
    Muted,
    NotMuted,
}

/// How filter categories combine. `And` is the upstream default and is
/// sent as an absent field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_slug: Option<StringMatcher>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monitor_labels: Vec<LabelMatcher>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<LabelMatcher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_policy_slug: Option<StringMatcher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute_status: Option<MuteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<FilterMode>,
}

// ============================================================================
// Listing
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub max_size: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageResult {
    pub next_token: String,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ListAlertsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a AlertFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_before: Option<String>,
    page: PageRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ListAlertsResponse {
    alerts: Vec<Alert>,
    page: PageResult,
}

impl ApiClient {
    /// List alerts matching `filter`, following page tokens until `limit`
    /// alerts are collected or the listing is exhausted.
    pub async fn list_alerts(
        &self,
        ctx: &RequestContext,
        filter: Option<&AlertFilter>,
        range: Option<&TimeRange>,
        limit: usize,
    ) -> Result<Vec<Alert>> {
        let mut alerts = Vec::new();
        let mut token = String::new();

        while alerts.len() < limit {
            let body = ListAlertsRequest {
                filter,
                started_after: range.map(|r| r.start().to_rfc3339()),
                started_before: range.map(|r| r.end().to_rfc3339()),
                page: PageRequest {
                    max_size: (limit - alerts.len()).min(MAX_ALERT_PAGE_SIZE),
                    token: std::mem::take(&mut token),
                },
            };
            let page: ListAlertsResponse = self.post_json(ctx, LIST_ALERTS_PATH, &body).await?;
            let received = page.alerts.len();
            alerts.extend(page.alerts);

            if page.page.next_token.is_empty() || received == 0 {
                break;
            }
            token = page.page.next_token;
        }

        alerts.truncate(limit);
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_alert_decodes_zero_end_time_as_ongoing() {
        let alert: Alert = serde_json::from_value(json!({
            "alert_id": "a1",
            "monitor_slug": "cpu-high",
            "start_time": "2024-05-01T10:00:00Z",
            "end_time": "0001-01-01T00:00:00Z",
            "signals": [{"name": "service", "value": "api"}],
            "severity_history": [{"severity": "warn"}, {"severity": "critical"}]
        }))
        .unwrap();
        assert!(alert.is_ongoing());
        assert_eq!(alert.signal, vec![Label::new("service", "api")]);
        assert_eq!(alert.current_severity(), Some("critical"));
    }

    #[test]
    fn test_match_operation_parse_is_case_insensitive() {
        assert_eq!(MatchOperation::parse("equal"), Some(MatchOperation::Equal));
        assert_eq!(
            MatchOperation::parse(" Not_Regex_Equal "),
            Some(MatchOperation::NotRegexEqual)
        );
        assert_eq!(MatchOperation::parse("LIKE"), None);
        assert!(MatchOperation::AnyOf.takes_multiple_values());
        assert!(!MatchOperation::Contains.takes_multiple_values());
    }

    #[test]
    fn test_filter_serializes_sparse() {
        let filter = AlertFilter {
            monitor_slug: Some(StringMatcher {
                operation: MatchOperation::Equal,
                single_value: Some("cpu-high".into()),
                multi_values: vec![],
            }),
            ..AlertFilter::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({"monitor_slug": {"operation": "EQUAL", "single_value": "cpu-high"}})
        );
    }
}
