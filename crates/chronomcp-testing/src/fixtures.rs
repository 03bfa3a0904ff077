//! Sample alerts and tool arguments

use chrono::{DateTime, Duration, TimeZone, Utc};
use chronomcp_client::{Alert, Label, SeverityChange};
use chronomcp_core::ToolArgs;
use serde_json::Value;

/// 2024-05-01T12:00:00Z, the "now" of every analysis fixture.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// `base_time() - minutes`
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    base_time() - Duration::minutes(minutes)
}

/// Tool arguments from a JSON object literal. Non-objects yield no arguments.
pub fn args(value: Value) -> ToolArgs {
    match value {
        Value::Object(map) => map,
        _ => ToolArgs::new(),
    }
}

/// Builder for upstream [`Alert`]s.
#[derive(Debug, Clone)]
pub struct AlertBuilder {
    alert: Alert,
}

impl AlertBuilder {
    pub fn new(alert_id: &str, monitor_slug: &str) -> Self {
        Self {
            alert: Alert {
                alert_id: alert_id.to_string(),
                monitor_slug: monitor_slug.to_string(),
                monitor_name: monitor_slug.replace('-', " "),
                ..Alert::default()
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.alert.monitor_name = name.to_string();
        self
    }

    pub fn muted(mut self) -> Self {
        self.alert.is_muted = true;
        self
    }

    pub fn started(mut self, at: DateTime<Utc>) -> Self {
        self.alert.start_time = Some(at);
        self
    }

    pub fn ended(mut self, at: DateTime<Utc>) -> Self {
        self.alert.end_time = Some(at);
        self
    }

    /// Started `start` minutes before [`base_time`], ended `end` minutes
    /// before it (`None` keeps it ongoing).
    pub fn window(self, start: i64, end: Option<i64>) -> Self {
        let builder = self.started(minutes_ago(start));
        match end {
            Some(end) => builder.ended(minutes_ago(end)),
            None => builder,
        }
    }

    pub fn signal(mut self, name: &str, value: &str) -> Self {
        self.alert.signal.push(Label::new(name, value));
        self
    }

    pub fn signals_hash(mut self, hash: &str) -> Self {
        self.alert.signals_hash = hash.to_string();
        self
    }

    pub fn monitor_label(mut self, name: &str, value: &str) -> Self {
        self.alert.monitor_labels.push(Label::new(name, value));
        self
    }

    pub fn severity(mut self, severity: &str) -> Self {
        self.alert.severity_history.push(SeverityChange {
            severity: severity.to_string(),
            changed_at: self.alert.start_time,
        });
        self
    }

    pub fn policy(mut self, slug: &str) -> Self {
        self.alert.notification_policy_slug = slug.to_string();
        self
    }

    pub fn build(self) -> Alert {
        self.alert
    }
}

/// `count` finished alerts spread round-robin over `monitors` monitors,
/// each lasting between 20 and 95 minutes.
pub fn alert_storm(count: usize, monitors: usize) -> Vec<Alert> {
    (0..count)
        .map(|i| {
            let monitor = format!("monitor-{}", i % monitors.max(1));
            let length = 20 + (i as i64 * 5) % 80;
            AlertBuilder::new(&format!("alert-{i}"), &monitor)
                .window(length + 5, Some(5))
                .signal("service", &format!("svc-{}", i % 3))
                .signals_hash(&format!("h{}", i % 3))
                .monitor_label("team", "infra")
                .severity("critical")
                .build()
        })
        .collect()
}
