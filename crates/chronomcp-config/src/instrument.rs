//! `instrument` section: service identity and logging

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_SERVICE_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstrumentConfig {
    pub service_name: String,
    pub logs: LogsConfig,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            logs: LogsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where log lines go. Stdout is only safe when stdio transport is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutputKind {
    #[default]
    Stderr,
    Stdout,
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogsConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutputKind,
    /// Required when `output: file`
    pub file: Option<PathBuf>,
    pub show_target: bool,
    pub utc: bool,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
            output: LogOutputKind::Stderr,
            file: None,
            show_target: false,
            utc: false,
        }
    }
}
