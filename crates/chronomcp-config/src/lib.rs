//! Configuration types and loading for ChronoMCP
//!
//! # Module Organization
//!
//! - `server` - Transports and tool selection
//! - `instrument` - Service name and logging
//! - `upstream` - REST client tuning
//! - `constants` - Defaults, environment variables, header names
//!
//! # Usage
//!
//! ```rust,ignore
//! use chronomcp_config::{Config, load_config};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("chronomcp.yaml"))?;
//! println!("SSE enabled: {}", config.server.transport.sse.enabled);
//! ```

mod loader;

pub mod constants;

mod instrument;
mod server;
mod upstream;

use serde::{Deserialize, Serialize};

pub use instrument::{InstrumentConfig, LogFormat, LogOutputKind, LogsConfig};
pub use loader::{load_config, load_config_from_str, validate_config, ConfigError};
pub use server::{ServerConfig, SseConfig, StdioConfig, ToolsConfig, TransportConfig};
pub use upstream::UpstreamConfig;

/// Root of the YAML config file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub instrument: InstrumentConfig,
    pub upstream: UpstreamConfig,
}
