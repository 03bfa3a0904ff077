//! Change events

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chronomcp_core::{RequestContext, TimeRange};
use serde::{Deserialize, Serialize};

use crate::alerts::PageResult;
use crate::client::{page_query, ApiClient};
use crate::error::Result;
use crate::time;

pub const LIST_EVENTS_PATH: &str = "/api/v1/data/events";
pub const EVENT_LABEL_VALUES_PATH: &str = "/api/v1/data/events/label-values";

pub const MAX_EVENT_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    pub summary: String,
    pub labels: BTreeMap<String, String>,
    #[serde(with = "time::optional")]
    pub happened_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ListEventsResponse {
    events: Vec<Event>,
    page: PageResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LabelValuesResponse {
    label_values: Vec<String>,
}

fn range_query(range: &TimeRange) -> Vec<(String, String)> {
    vec![
        ("happened_after".to_string(), range.start().to_rfc3339()),
        ("happened_before".to_string(), range.end().to_rfc3339()),
    ]
}

impl ApiClient {
    /// List events in `range`, optionally narrowed by an event query.
    pub async fn list_events(
        &self,
        ctx: &RequestContext,
        range: &TimeRange,
        query: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let mut token = String::new();

        while events.len() < limit {
            let mut params = range_query(range);
            if let Some(q) = query {
                params.push(("query".to_string(), q.to_string()));
            }
            page_query(
                &mut params,
                (limit - events.len()).min(MAX_EVENT_PAGE_SIZE),
                &token,
            );

            let page: ListEventsResponse = self.get_json(ctx, LIST_EVENTS_PATH, &params).await?;
            let received = page.events.len();
            events.extend(page.events);

            if page.page.next_token.is_empty() || received == 0 {
                break;
            }
            token = page.page.next_token;
        }

        events.truncate(limit);
        Ok(events)
    }

    /// Distinct values of one event label in `range`.
    pub async fn list_event_label_values(
        &self,
        ctx: &RequestContext,
        label_name: &str,
        range: &TimeRange,
    ) -> Result<Vec<String>> {
        let mut params = range_query(range);
        params.push(("label_name".to_string(), label_name.to_string()));
        let response: LabelValuesResponse =
            self.get_json(ctx, EVENT_LABEL_VALUES_PATH, &params).await?;
        Ok(response.label_values)
    }
}
