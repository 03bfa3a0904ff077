//! ChronoMCP Client - Upstream Chronosphere REST API
//!
//! One shared [`ApiClient`] serves every tool. Each call takes the tool
//! call's [`RequestContext`](chronomcp_core::RequestContext): its credential
//! is forwarded by [`AuthForwarder`] and its cancellation token aborts the
//! in-flight HTTP exchange.
//!
//! # Modules
//!
//! - `auth` - Outbound credential precedence
//! - `alerts` - Alert listing and the alert filter DTO
//! - `events` - Change events and label values
//! - `logs` - Log range queries (Chronosphere logs or LogScale)
//! - `prometheus` - Prometheus query API
//! - `config` - Read/list over config entities

pub mod alerts;
pub mod auth;
mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod logs;
pub mod prometheus;
pub mod time;

pub use alerts::{
    Alert, AlertFilter, FilterMode, Label, LabelMatcher, MatchOperation, MuteStatus,
    SeverityChange, StringMatcher,
};
pub use auth::AuthForwarder;
pub use client::{logscale_base_url, org_base_url, ApiClient, ApiClientConfig, LogscaleConfig};
pub use error::{ClientError, Result};
pub use events::Event;
pub use logs::FieldValue;
pub use prometheus::{QueryData, RangeSeries};
