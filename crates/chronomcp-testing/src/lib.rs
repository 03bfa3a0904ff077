//! Test utilities for ChronoMCP
//!
//! # Fixtures
//!
//! - [`fixtures::AlertBuilder`] - Build upstream alerts field by field
//! - [`fixtures::base_time`] - Fixed "now" used across analysis tests
//! - [`fixtures::args`] - Tool arguments from a `json!` literal
//!
//! # Fake upstream
//!
//! - [`upstream::FakeUpstream`] - wiremock server plus an [`ApiClient`](chronomcp_client::ApiClient) pointed at it
//!
//! # Usage
//!
//! ```no_run
//! use chronomcp_testing::{fixtures::AlertBuilder, upstream::FakeUpstream};
//!
//! # async fn demo() {
//! let upstream = FakeUpstream::start().await;
//! let alert = AlertBuilder::new("a1", "cpu-high").build();
//! upstream.mount_alerts(vec![alert]).await;
//! # }
//! ```

pub mod fixtures;
pub mod proptest_config;
pub mod upstream;
