//! Default constants for ChronoMCP configuration
//!
//! Single source of truth for defaults, environment variable names and the
//! header/cookie names shared by the inbound and outbound auth layers.

// ============================================================================
// TRANSPORTS
// ============================================================================

/// Default bind address of the SSE transport (localhost only)
pub const DEFAULT_SSE_ADDRESS: &str = "127.0.0.1:8081";

/// Default path the SSE transport is served under
pub const DEFAULT_SSE_BASE_URL: &str = "/";

/// Grace period given to in-flight SSE streams on shutdown
pub const SSE_SHUTDOWN_GRACE_MS: u64 = 1_000;

/// SSE keep-alive ping interval
pub const SSE_KEEP_ALIVE_SECS: u64 = 15;

// ============================================================================
// UPSTREAM
// ============================================================================

/// Per-call timeout applied by the shared upstream client
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// User agent sent upstream
pub const DEFAULT_USER_AGENT: &str = concat!("chronomcp/", env!("CARGO_PKG_VERSION"));

/// Domain the org name is prefixed to
pub const CHRONOSPHERE_DOMAIN: &str = "chronosphere.io";

/// Domain of the LogScale backend
pub const LOGSCALE_DOMAIN: &str = "logs.chronosphere.io";

// ============================================================================
// INSTRUMENTATION
// ============================================================================

pub const DEFAULT_SERVICE_NAME: &str = "chronomcp";

pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// AUTH FORWARDING
// ============================================================================

/// Cookie carrying a browser session token
pub const ACCESS_TOKEN_COOKIE: &str = "chrono-accesstoken";

/// Comma-separated tool names to hide for a single request
pub const HEADER_DISABLE_TOOLS: &str = "X-Chrono-MCP-Disable-Tools";

pub const BEARER_PREFIX: &str = "Bearer ";

// ============================================================================
// ENVIRONMENT VARIABLES
// ============================================================================

pub const ENV_CHRONOSPHERE_API_TOKEN: &str = "CHRONOSPHERE_API_TOKEN";

pub const ENV_CHRONOSPHERE_ORG_NAME: &str = "CHRONOSPHERE_ORG_NAME";

/// Token for the LogScale backend; required with `--use-logscale`
pub const ENV_LOGSCALE_API_TOKEN: &str = "LOGSCALE_API_TOKEN";
