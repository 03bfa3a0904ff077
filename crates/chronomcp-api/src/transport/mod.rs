//! Transport multiplexer
//!
//! Starts every enabled transport on its own task and waits for all of
//! them. A transport that fails cancels the others; one that finishes
//! cleanly (stdio at end of input) leaves the rest running.

pub mod sse;
pub mod stdio;

use std::net::SocketAddr;

use chronomcp_config::TransportConfig;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::mcp::ChronoMcpServer;

pub use sse::{mount_path, router, run_sse, serve_sse};
pub use stdio::serve_stdio;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no transport enabled: enable stdio or sse")]
    NoTransportEnabled,

    #[error("invalid SSE address: {0}")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("stdio transport failed: {0}")]
    Stdio(String),

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("transport task failed: {0}")]
    Join(String),

    #[error("{} transports failed: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<TransportError>),
}

fn join_errors(errors: &[TransportError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Run the enabled transports until they all stop or `shutdown` fires.
pub async fn run(
    server: ChronoMcpServer,
    config: &TransportConfig,
    shutdown: CancellationToken,
) -> Result<(), TransportError> {
    if !config.any_enabled() {
        return Err(TransportError::NoTransportEnabled);
    }

    let local = shutdown.child_token();
    let mut tasks = JoinSet::new();

    if config.stdio.enabled {
        tasks.spawn(serve_stdio(server.clone(), local.clone()));
    }
    if config.sse.enabled {
        let sse = config.sse.clone();
        let server = server.clone();
        let token = local.clone();
        tasks.spawn(async move { run_sse(server, &sse, token).await });
    }

    let mut errors = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined.map_err(|e| TransportError::Join(e.to_string())).and_then(|r| r);
        if let Err(e) = result {
            error!(error = %e, "Transport stopped with an error");
            errors.push(e);
            local.cancel();
        }
    }
    info!("All transports stopped");

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(TransportError::Multiple(errors)),
    }
}
