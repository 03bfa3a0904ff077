//! `server` section: transports and tool selection

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SSE_ADDRESS, DEFAULT_SSE_BASE_URL};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: TransportConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub stdio: StdioConfig,
    pub sse: SseConfig,
}

impl TransportConfig {
    pub fn any_enabled(&self) -> bool {
        self.stdio.enabled || self.sse.enabled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdioConfig {
    pub enabled: bool,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// HTTP transport with server-sent event responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SseConfig {
    pub enabled: bool,
    /// `host:port` to bind
    pub address: String,
    /// Path the MCP endpoint is mounted under
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: DEFAULT_SSE_ADDRESS.to_string(),
            base_url: DEFAULT_SSE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tool names never registered
    pub disabled: Vec<String>,
}
