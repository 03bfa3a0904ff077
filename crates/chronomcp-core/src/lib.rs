//! ChronoMCP Core - Domain types shared by every layer
//!
//! This crate has no I/O. It defines what flows between the transport edge,
//! the dispatcher and the upstream client.
//!
//! # Architecture
//!
//! - `context` - Per-request `Credential` and `RequestContext`
//! - `params` - Typed extraction of tool-call arguments
//! - `time_range` - `start`/`end`/`duration` argument parsing
//! - `result` - `ToolResult` returned by handlers
//! - `error` - Handler error kinds and machine-readable codes
//! - `collections` - Order-preserving dedupe

pub mod collections;
pub mod context;
pub mod error;
pub mod params;
pub mod result;
pub mod time_range;

pub use collections::deduplicate;
pub use context::{Credential, RequestContext};
pub use error::{Error, ErrorCode, Result};
pub use params::ToolArgs;
pub use result::{Payload, ToolResult};
pub use time_range::{parse_duration, parse_time_range, parse_time_range_at, TimeRange};
