//! MCP over HTTP with server-sent event streams
//!
//! The rmcp streamable HTTP service is mounted under the configured base
//! URL and wrapped by the credential middleware, so every session sees the
//! bearer token, cookie and disable list of the request that carried it.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chronomcp_config::constants::{SSE_KEEP_ALIVE_SECS, SSE_SHUTDOWN_GRACE_MS};
use chronomcp_config::SseConfig;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::TransportError;
use crate::http::credential_middleware;
use crate::mcp::ChronoMcpServer;

/// Normalized mount path: `/` or a path without a trailing slash.
pub fn mount_path(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Router serving MCP at `base_url`.
pub fn router(server: ChronoMcpServer, base_url: &str, shutdown: CancellationToken) -> Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(SSE_KEEP_ALIVE_SECS)),
            cancellation_token: shutdown,
            ..Default::default()
        },
    );

    let path = mount_path(base_url);
    let router = if path == "/" {
        Router::new().fallback_service(service)
    } else {
        Router::new().nest_service(&path, service)
    };
    router.layer(axum::middleware::from_fn(credential_middleware))
}

/// Bind the configured address and serve until `shutdown` fires.
pub async fn run_sse(
    server: ChronoMcpServer,
    config: &SseConfig,
    shutdown: CancellationToken,
) -> Result<(), TransportError> {
    let addr: SocketAddr = config
        .address
        .parse()
        .map_err(|_| TransportError::InvalidAddress(config.address.clone()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind { addr, source })?;
    serve_sse(server, listener, &config.base_url, shutdown).await
}

/// Serve on an already bound listener.
///
/// After `shutdown` fires, open streams get a short grace period before the
/// server task is aborted.
pub async fn serve_sse(
    server: ChronoMcpServer,
    listener: TcpListener,
    base_url: &str,
    shutdown: CancellationToken,
) -> Result<(), TransportError> {
    let local = listener.local_addr().map_err(TransportError::Serve)?;
    let app = router(server, base_url, shutdown.child_token());
    info!("🌐 SSE transport listening on http://{}{}", local, mount_path(base_url));

    let mut task = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future(),
    );

    tokio::select! {
        joined = &mut task => return flatten(joined),
        _ = shutdown.cancelled() => {}
    }

    let grace = Duration::from_millis(SSE_SHUTDOWN_GRACE_MS);
    match tokio::time::timeout(grace, &mut task).await {
        Ok(joined) => {
            info!("SSE transport stopped");
            flatten(joined)
        }
        Err(_) => {
            warn!(grace_ms = SSE_SHUTDOWN_GRACE_MS, "SSE streams still open after grace period, aborting");
            task.abort();
            Ok(())
        }
    }
}

fn flatten(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), TransportError> {
    match joined {
        Ok(result) => result.map_err(TransportError::Serve),
        Err(e) => Err(TransportError::Join(e.to_string())),
    }
}
