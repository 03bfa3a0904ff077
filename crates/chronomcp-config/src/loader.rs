//! Configuration file loading and validation
//!
//! - [`load_config`] - Reads a YAML file, errors if it is missing
//! - [`load_config_from_str`] - Parses YAML text
//!
//! Both validate exactly once after parsing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::instrument::LogOutputKind;
use crate::Config;

/// Errors that can occur during config loading
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Load configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "Loading config file");
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a YAML string. An empty document yields defaults.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(content)?
    };
    validate_config(&config)?;
    Ok(config)
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate configuration values, reporting every problem at once.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut all_errors = Vec::new();

    let transport = &config.server.transport;
    if !transport.any_enabled() {
        all_errors.push("at least one of server.transport.stdio or server.transport.sse must be enabled".to_string());
    }

    if transport.sse.enabled {
        if transport.sse.address.parse::<SocketAddr>().is_err() {
            all_errors.push(format!(
                "server.transport.sse.address '{}' is not a valid host:port",
                transport.sse.address
            ));
        }
        if !transport.sse.base_url.starts_with('/') {
            all_errors.push(format!(
                "server.transport.sse.baseURL '{}' must start with '/'",
                transport.sse.base_url
            ));
        }
    }

    if config.server.tools.disabled.iter().any(|t| t.trim().is_empty()) {
        all_errors.push("server.tools.disabled must not contain empty names".to_string());
    }

    let logs = &config.instrument.logs;
    if !LOG_LEVELS.contains(&logs.level.to_ascii_lowercase().as_str()) {
        all_errors.push(format!(
            "instrument.logs.level '{}' must be one of {}",
            logs.level,
            LOG_LEVELS.join(", ")
        ));
    }
    if logs.output == LogOutputKind::File && logs.file.is_none() {
        all_errors.push("instrument.logs.file is required when output is 'file'".to_string());
    }

    if config.upstream.timeout_seconds == 0 {
        all_errors.push("upstream.timeoutSeconds must be greater than 0".to_string());
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(all_errors.join("; ")))
    }
}
