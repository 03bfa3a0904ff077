//! Alert analysis engine
//!
//! Summarizes an alert listing: counts and durations, clusters by signal
//! set and by monitor labels, per-monitor volume, long-running alerts and
//! narrative notes. The response depth is chosen by [`ResponseFormat`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use chronomcp_client::{Alert, Label, SeverityChange};
use chronomcp_core::{deduplicate, Error, Result};
use serde::Serialize;

/// Alerts running longer than this are reported as long-running.
pub const LONG_ALERT_MINUTES: f64 = 30.0;

const LARGE_ALERT_COUNT: usize = 50;
const LONG_AVERAGE_MINUTES: f64 = 60.0;
const LARGE_CLUSTER_SIZE: usize = 3;
const NOISY_MONITOR_COUNT: usize = 5;
const EXTREME_ALERT_MINUTES: f64 = 120.0;

pub const NOTE_NO_ALERTS: &str = "No alerts found matching the specified criteria";
pub const NOTE_SIGNAL_CORRELATION: &str =
    "Multiple alerts share identical signals, suggesting potential incident correlation";
pub const NOTE_LABEL_CORRELATION: &str =
    "Multiple alerts share identical monitor labels, suggesting related monitors are firing together";
pub const NOTE_LARGE_VOLUME: &str = "Large number of alerts detected — consider filtering";
pub const NOTE_LONG_AVERAGE: &str = "Alerts have unusually long average duration";
pub const NOTE_LARGE_CLUSTER: &str = "Large alert cluster detected — possible cascading failure";
pub const NOTE_EXTREME_DURATION: &str = "Extremely long-running alert detected";

/// Depth of the analysis response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Counts, top 5 monitors, top 3 long alerts, minimal per-alert rows
    #[default]
    Compact,
    /// Top 10 of every list, per-alert rows without label arrays
    Standard,
    /// Everything
    Detailed,
}

impl ResponseFormat {
    pub const NAMES: [&'static str; 3] = ["compact", "standard", "detailed"];

    /// Case-insensitive; `None` or empty selects the default.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("") => Ok(Self::default()),
            Some("compact") => Ok(Self::Compact),
            Some("standard") => Ok(Self::Standard),
            Some("detailed") => Ok(Self::Detailed),
            Some(other) => Err(Error::invalid_argument(
                "response_format",
                format!("expected compact, standard or detailed, got {other:?}"),
            )),
        }
    }

    fn profile(self) -> Profile {
        match self {
            Self::Compact => Profile {
                top_monitors: Some(5),
                top_long_alerts: Some(3),
                group_lists: GroupLists::Omit,
            },
            Self::Standard => Profile {
                top_monitors: Some(10),
                top_long_alerts: Some(10),
                group_lists: GroupLists::Top(10),
            },
            Self::Detailed => Profile {
                top_monitors: None,
                top_long_alerts: None,
                group_lists: GroupLists::All,
            },
        }
    }
}

enum GroupLists {
    Omit,
    Top(usize),
    All,
}

struct Profile {
    top_monitors: Option<usize>,
    top_long_alerts: Option<usize>,
    group_lists: GroupLists,
}

fn truncate<T>(mut items: Vec<T>, cap: Option<usize>) -> Vec<T> {
    if let Some(cap) = cap {
        items.truncate(cap);
    }
    items
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_alerts: usize,
    pub unique_monitors: usize,
    pub muted_alerts: usize,
    pub ongoing_alerts: usize,
    pub avg_duration_minutes: f64,
    pub max_duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalGroup {
    pub hash: String,
    pub count: usize,
    pub common_signals: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelGroup {
    pub labels_hash: String,
    pub count: usize,
    pub monitor_labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clustering {
    pub signal_group_count: usize,
    pub label_group_count: usize,
    pub total_alert_groups: usize,
    pub largest_group_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_groups: Option<Vec<SignalGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_groups: Option<Vec<LabelGroup>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorCount {
    pub monitor_slug: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongAlert {
    pub alert_id: String,
    pub monitor_slug: String,
    pub duration_minutes: f64,
    pub ongoing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Patterns {
    pub most_frequent_monitors: Vec<MonitorCount>,
    pub longest_alerts: Vec<LongAlert>,
    pub recent_mutes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactAlert {
    pub alert_id: String,
    pub monitor_slug: String,
    pub is_muted: bool,
    pub duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardAlert {
    pub alert_id: String,
    pub monitor_slug: String,
    pub monitor_name: String,
    pub is_muted: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<f64>,
    pub current_severity: Option<String>,
    pub notification_policy_slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedAlert {
    #[serde(flatten)]
    pub base: StandardAlert,
    pub signals: Vec<Label>,
    pub monitor_labels: Vec<Label>,
    pub signals_hash: String,
    pub severity_history: Vec<SeverityChange>,
}

/// Per-alert row in the shape selected by the response format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertView {
    Compact(CompactAlert),
    Standard(StandardAlert),
    Detailed(DetailedAlert),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertAnalysis {
    pub summary: Summary,
    pub clustering: Clustering,
    pub patterns: Patterns,
    pub alerts: Vec<AlertView>,
    pub notes: Vec<String>,
}

// ============================================================================
// Engine
// ============================================================================

/// Minutes the alert has been (or was) firing, `None` without a start time
/// or when the span is not positive.
pub fn duration_minutes(alert: &Alert, now: DateTime<Utc>) -> Option<f64> {
    let start = alert.start_time?;
    let end = alert.end_time.unwrap_or(now);
    let minutes = (end - start).num_milliseconds() as f64 / 60_000.0;
    (minutes > 0.0).then_some(minutes)
}

/// Order-independent key of a label set: sorted `name:value` pairs joined
/// with `,`.
pub fn labels_hash(labels: &[Label]) -> String {
    let mut pairs: Vec<String> = labels
        .iter()
        .map(|l| format!("{}:{}", l.name, l.value))
        .collect();
    pairs.sort();
    pairs.join(",")
}

fn label_map(labels: &[Label]) -> BTreeMap<String, String> {
    labels
        .iter()
        .map(|l| (l.name.clone(), l.value.clone()))
        .collect()
}

/// Insertion-ordered grouping, later sorted by count with ties kept in
/// first-seen order.
struct Groups<G> {
    index: HashMap<String, usize>,
    groups: Vec<Group<G>>,
}

struct Group<G> {
    key: String,
    count: usize,
    first: G,
}

impl<G> Groups<G> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    fn add(&mut self, key: &str, first: impl FnOnce() -> G) {
        match self.index.get(key) {
            Some(&i) => self.groups[i].count += 1,
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push(Group {
                    key: key.to_string(),
                    count: 1,
                    first: first(),
                });
            }
        }
    }

    fn into_sorted(mut self) -> Vec<Group<G>> {
        self.groups.sort_by(|a, b| b.count.cmp(&a.count));
        self.groups
    }
}

fn summarize(alerts: &[Alert], durations: &[Option<f64>]) -> Summary {
    let positive: Vec<f64> = durations.iter().flatten().copied().collect();
    let (avg, max) = if positive.is_empty() {
        (0.0, 0.0)
    } else {
        let sum: f64 = positive.iter().sum();
        let max = positive.iter().copied().fold(f64::MIN, f64::max);
        (sum / positive.len() as f64, max)
    };

    Summary {
        total_alerts: alerts.len(),
        unique_monitors: alerts
            .iter()
            .filter(|a| !a.monitor_slug.is_empty())
            .map(|a| a.monitor_slug.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        muted_alerts: alerts.iter().filter(|a| a.is_muted).count(),
        ongoing_alerts: alerts.iter().filter(|a| a.is_ongoing()).count(),
        avg_duration_minutes: round2(avg),
        max_duration_minutes: round2(max),
    }
}

fn cluster(alerts: &[Alert]) -> (Vec<SignalGroup>, Vec<LabelGroup>) {
    let mut signals = Groups::new();
    let mut labels = Groups::new();

    for alert in alerts {
        if !alert.signals_hash.is_empty() {
            signals.add(&alert.signals_hash, || label_map(&alert.signal));
        }
        if !alert.monitor_labels.is_empty() {
            labels.add(&labels_hash(&alert.monitor_labels), || {
                label_map(&alert.monitor_labels)
            });
        }
    }

    let signal_groups = signals
        .into_sorted()
        .into_iter()
        .map(|g| SignalGroup {
            hash: g.key,
            count: g.count,
            common_signals: g.first,
        })
        .collect();
    let label_groups = labels
        .into_sorted()
        .into_iter()
        .map(|g| LabelGroup {
            labels_hash: g.key,
            count: g.count,
            monitor_labels: g.first,
        })
        .collect();
    (signal_groups, label_groups)
}

fn view(alert: &Alert, duration: Option<f64>, format: ResponseFormat) -> AlertView {
    let duration = duration.map(round2);
    if format == ResponseFormat::Compact {
        return AlertView::Compact(CompactAlert {
            alert_id: alert.alert_id.clone(),
            monitor_slug: alert.monitor_slug.clone(),
            is_muted: alert.is_muted,
            duration_minutes: duration,
        });
    }

    let base = StandardAlert {
        alert_id: alert.alert_id.clone(),
        monitor_slug: alert.monitor_slug.clone(),
        monitor_name: alert.monitor_name.clone(),
        is_muted: alert.is_muted,
        start_time: alert.start_time,
        end_time: alert.end_time,
        duration_minutes: duration,
        current_severity: alert.current_severity().map(String::from),
        notification_policy_slug: alert.notification_policy_slug.clone(),
    };
    if format == ResponseFormat::Standard {
        return AlertView::Standard(base);
    }
    AlertView::Detailed(DetailedAlert {
        base,
        signals: alert.signal.clone(),
        monitor_labels: alert.monitor_labels.clone(),
        signals_hash: alert.signals_hash.clone(),
        severity_history: alert.severity_history.clone(),
    })
}

/// Analyze `alerts` as of `now`.
pub fn analyze(alerts: &[Alert], format: ResponseFormat, now: DateTime<Utc>) -> AlertAnalysis {
    if alerts.is_empty() {
        return AlertAnalysis {
            notes: vec![NOTE_NO_ALERTS.to_string()],
            ..AlertAnalysis::default()
        };
    }

    let profile = format.profile();
    let durations: Vec<Option<f64>> = alerts.iter().map(|a| duration_minutes(a, now)).collect();
    let summary = summarize(alerts, &durations);

    // Clustering
    let (signal_groups, label_groups) = cluster(alerts);
    let largest_signal = signal_groups.first().map_or(0, |g| g.count);
    let largest_label = label_groups.first().map_or(0, |g| g.count);
    let largest_group_size = largest_signal.max(largest_label);

    let mut notes = Vec::new();
    if largest_signal > 1 {
        notes.push(NOTE_SIGNAL_CORRELATION.to_string());
    }
    if largest_label > 1 {
        notes.push(NOTE_LABEL_CORRELATION.to_string());
    }

    let (signal_list, label_list) = match profile.group_lists {
        GroupLists::Omit => (None, None),
        GroupLists::Top(n) => (
            Some(truncate(signal_groups.clone(), Some(n))),
            Some(truncate(label_groups.clone(), Some(n))),
        ),
        GroupLists::All => (Some(signal_groups.clone()), Some(label_groups.clone())),
    };
    let clustering = Clustering {
        signal_group_count: signal_groups.len(),
        label_group_count: label_groups.len(),
        total_alert_groups: signal_groups.len() + label_groups.len(),
        largest_group_size,
        signal_groups: signal_list,
        label_groups: label_list,
    };

    // Patterns
    let mut monitors = Groups::new();
    for alert in alerts.iter().filter(|a| !a.monitor_slug.is_empty()) {
        monitors.add(&alert.monitor_slug, || ());
    }
    let most_frequent: Vec<MonitorCount> = monitors
        .into_sorted()
        .into_iter()
        .map(|g| MonitorCount {
            monitor_slug: g.key,
            count: g.count,
        })
        .collect();

    let mut longest: Vec<LongAlert> = alerts
        .iter()
        .zip(&durations)
        .filter_map(|(alert, duration)| {
            let minutes = (*duration)?;
            (minutes > LONG_ALERT_MINUTES).then(|| LongAlert {
                alert_id: alert.alert_id.clone(),
                monitor_slug: alert.monitor_slug.clone(),
                duration_minutes: round2(minutes),
                ongoing: alert.is_ongoing(),
            })
        })
        .collect();
    longest.sort_by(|a, b| b.duration_minutes.total_cmp(&a.duration_minutes));

    let recent_mutes = deduplicate(
        alerts
            .iter()
            .filter(|a| a.is_muted && !a.monitor_slug.is_empty())
            .map(|a| a.monitor_slug.clone()),
    );

    // Notes
    if summary.total_alerts > LARGE_ALERT_COUNT {
        notes.push(NOTE_LARGE_VOLUME.to_string());
    }
    if summary.ongoing_alerts > 0 {
        notes.push(format!("{} alerts are still ongoing", summary.ongoing_alerts));
    }
    if summary.avg_duration_minutes > LONG_AVERAGE_MINUTES {
        notes.push(NOTE_LONG_AVERAGE.to_string());
    }
    if largest_group_size > LARGE_CLUSTER_SIZE {
        notes.push(NOTE_LARGE_CLUSTER.to_string());
    }
    if let Some(top) = most_frequent.first().filter(|m| m.count > NOISY_MONITOR_COUNT) {
        notes.push(format!(
            "Monitor '{}' is generating high alert volume",
            top.monitor_slug
        ));
    }
    let longest_minutes = durations.iter().flatten().copied().fold(0.0, f64::max);
    if longest_minutes > EXTREME_ALERT_MINUTES {
        notes.push(NOTE_EXTREME_DURATION.to_string());
    }

    AlertAnalysis {
        summary,
        clustering,
        patterns: Patterns {
            most_frequent_monitors: truncate(most_frequent, profile.top_monitors),
            longest_alerts: truncate(longest, profile.top_long_alerts),
            recent_mutes,
        },
        alerts: alerts
            .iter()
            .zip(&durations)
            .map(|(alert, duration)| view(alert, *duration, format))
            .collect(),
        notes,
    }
}
