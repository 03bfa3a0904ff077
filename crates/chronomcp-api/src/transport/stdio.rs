//! Line-delimited JSON-RPC over standard input and output

use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::TransportError;
use crate::mcp::ChronoMcpServer;

/// Serve one MCP session on stdin/stdout until the client disconnects or
/// `shutdown` fires.
pub async fn serve_stdio(
    server: ChronoMcpServer,
    shutdown: CancellationToken,
) -> Result<(), TransportError> {
    info!("Starting stdio transport");
    let service = server
        .serve_with_ct(stdio(), shutdown)
        .await
        .map_err(|e| TransportError::Stdio(e.to_string()))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| TransportError::Stdio(e.to_string()))?;
    info!(reason = ?reason, "stdio transport stopped");
    Ok(())
}
