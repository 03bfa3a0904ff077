//! Centralized logging configuration for ChronoMCP
//!
//! Wraps `tracing` and `tracing-subscriber` so the binary and tests share
//! one initialization path.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chronomcp_logging::{init, LogConfig};
//!
//! // MCP over stdio: stdout carries JSON-RPC, logs go to stderr
//! let _guard = init(LogConfig::mcp(false))?;
//!
//! // From the YAML `instrument.logs` section
//! let _guard = init(LogConfig::from_settings(&config.instrument.logs).debug(verbose))?;
//! ```
//!
//! # Re-exports
//!
//! - `trace!`, `debug!`, `info!`, `warn!`, `error!`
//! - `span!`, `Level`
//! - `instrument` attribute macro

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chronomcp_config::{LogFormat as SettingsFormat, LogOutputKind, LogsConfig};
use tracing_subscriber::fmt::time::{LocalTime, UtcTime};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub use tracing::{debug, error, info, span, trace, warn, Level};

pub use tracing::instrument;

pub use tracing;

// Must be held until exit when logging to a file
pub use tracing_appender::non_blocking::WorkerGuard;

/// Output destination for logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogOutput {
    /// Write logs to stderr (default, required for the stdio transport)
    #[default]
    Stderr,
    /// Write logs to stdout
    Stdout,
    /// Write logs to a daily-rotated file
    File(PathBuf),
}

/// Line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Timestamp format for log output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Use local timezone (default)
    #[default]
    Local,
    /// Use UTC timezone
    Utc,
}

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Enable debug-level logging (overrides default_level and RUST_LOG)
    pub debug: bool,
    /// Default log level when RUST_LOG is not set
    pub default_level: String,
    pub output: LogOutput,
    pub format: LogFormat,
    /// Show module target in log output
    pub show_target: bool,
    pub timestamp_format: TimestampFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            default_level: "info".to_string(),
            output: LogOutput::Stderr,
            format: LogFormat::Text,
            show_target: false,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug-level logging
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Set the default log level (used when RUST_LOG is not set)
    pub fn default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Use UTC timestamps
    pub fn utc(self) -> Self {
        self.timestamp_format(TimestampFormat::Utc)
    }

    /// Convenience: logs to stderr, stdout reserved for JSON-RPC
    pub fn mcp(debug: bool) -> Self {
        Self::new().debug(debug).output(LogOutput::Stderr)
    }

    /// Build from the `instrument.logs` section of the config file.
    ///
    /// `output: file` without a path falls back to stderr; the config
    /// validator rejects that combination before it gets here.
    pub fn from_settings(logs: &LogsConfig) -> Self {
        let output = match (logs.output, &logs.file) {
            (LogOutputKind::Stdout, _) => LogOutput::Stdout,
            (LogOutputKind::File, Some(path)) => LogOutput::File(path.clone()),
            _ => LogOutput::Stderr,
        };
        let format = match logs.format {
            SettingsFormat::Text => LogFormat::Text,
            SettingsFormat::Json => LogFormat::Json,
        };
        let timestamp_format = if logs.utc {
            TimestampFormat::Utc
        } else {
            TimestampFormat::Local
        };

        Self::new()
            .default_level(logs.level.to_ascii_lowercase())
            .output(output)
            .format(format)
            .show_target(logs.show_target)
            .timestamp_format(timestamp_format)
    }

    fn build_filter(&self) -> EnvFilter {
        if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&self.default_level))
        }
    }

    fn layer<W>(&self, writer: W, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let base = fmt::layer()
            .with_target(self.show_target)
            .with_writer(writer)
            .with_ansi(ansi);

        match (self.format, self.timestamp_format) {
            (LogFormat::Text, TimestampFormat::Utc) => base.with_timer(UtcTime::rfc_3339()).boxed(),
            (LogFormat::Text, TimestampFormat::Local) => {
                base.with_timer(LocalTime::rfc_3339()).boxed()
            }
            (LogFormat::Json, TimestampFormat::Utc) => {
                base.json().with_timer(UtcTime::rfc_3339()).boxed()
            }
            (LogFormat::Json, TimestampFormat::Local) => {
                base.json().with_timer(LocalTime::rfc_3339()).boxed()
            }
        }
    }
}

/// Initialize the global subscriber.
///
/// Returns a guard for file output that must be held until exit.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Override log level unless `debug` is set
///
/// # Errors
///
/// Fails if the log directory cannot be created or a global subscriber is
/// already installed.
pub fn init(config: LogConfig) -> std::io::Result<Option<WorkerGuard>> {
    let filter = config.build_filter();

    let (layer, guard) = match &config.output {
        LogOutput::Stderr => {
            let is_tty = std::io::stderr().is_terminal();
            (config.layer(std::io::stderr, is_tty), None)
        }
        LogOutput::Stdout => {
            let is_tty = std::io::stdout().is_terminal();
            (config.layer(std::io::stdout, is_tty), None)
        }
        LogOutput::File(path) => {
            let (writer, guard) = file_writer(path)?;
            (config.layer(writer, false), Some(guard))
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| std::io::Error::other(format!("Failed to install log subscriber: {e}")))?;

    Ok(guard)
}

fn file_writer(
    log_path: &Path,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)
        .map_err(|e| std::io::Error::other(format!("Failed to create log directory: {e}")))?;

    let log_filename = log_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("chronomcp.log");

    // Files named: {prefix}.YYYY-MM-DD
    let appender = tracing_appender::rolling::daily(log_dir, log_filename);
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging for tests.
///
/// Safe to call multiple times.
pub fn init_test() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}
