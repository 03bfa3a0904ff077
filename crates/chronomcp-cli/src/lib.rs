//! Startup for the `chronomcp` binary
//!
//! Loads the config, initializes logging, resolves upstream settings,
//! builds the tool registry and runs the enabled transports until they
//! finish or a termination signal arrives.

pub mod cli;
pub mod settings;
pub mod signals;

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chronomcp_api::{build_server, transport};
use chronomcp_client::ApiClient;
use chronomcp_config::{load_config, Config};
use chronomcp_logging::{debug, info, LogConfig};
use tokio_util::sync::CancellationToken;

pub use cli::Cli;
pub use settings::{Settings, SettingsError};

/// The config file named on the command line, or defaults.
pub fn load(cli: &Cli) -> Result<Config> {
    match &cli.config_file {
        Some(path) => {
            load_config(path).with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load(&cli)?;

    let _log_guard = chronomcp_logging::init(
        LogConfig::from_settings(&config.instrument.logs).debug(cli.verbose),
    )
    .context("Failed to initialize logging")?;

    let settings = Settings::resolve(&cli, &config, |name| std::env::var(name).ok())?;
    debug!(?settings, "Resolved upstream settings");

    let client = ApiClient::new(settings.client_config(&config))
        .context("Failed to create upstream client")?;

    let disabled: BTreeSet<String> = config.server.tools.disabled.iter().cloned().collect();
    let server = build_server(&client, &disabled, config.instrument.service_name.clone())
        .context("Failed to register tools")?;

    info!(
        service = %config.instrument.service_name,
        upstream = %client.base_url(),
        logscale = client.uses_logscale(),
        stdio = config.server.transport.stdio.enabled,
        sse = config.server.transport.sse.enabled,
        "Starting MCP server"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(signals::cancel_on_signal(shutdown.clone()));

    let result = transport::run(server, &config.server.transport, shutdown.clone()).await;
    shutdown.cancel();
    result.context("Transport failed")?;

    info!("MCP server stopped");
    Ok(())
}
