//! Error types for tool handlers

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// Error Codes - Machine-readable codes attached to error logs
// ============================================================================

/// Machine-readable error codes.
///
/// Error code ranges:
/// - 1xxx: Argument errors
/// - 2xxx: Upstream API errors
/// - 9xxx: Generic errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum ErrorCode {
    // Argument errors (1xxx)
    /// Argument missing or of the wrong shape (1001)
    InvalidArgument = 1001,
    /// Tool name not registered (1002)
    UnknownTool = 1002,
    /// Tool disabled for this request (1003)
    ToolDisabled = 1003,

    // Upstream errors (2xxx)
    /// Upstream call failed (2001)
    UpstreamFailure = 2001,

    // Generic (9xxx)
    /// Internal error (9001)
    InternalError = 9001,
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl ErrorCode {
    /// Get the numeric value of the error code
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Stable snake_case name, used as a structured log field
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::UnknownTool => "unknown_tool",
            ErrorCode::ToolDisabled => "tool_disabled",
            ErrorCode::UpstreamFailure => "upstream_failure",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

// ============================================================================
// Error
// ============================================================================

/// Failure reported by a tool handler.
///
/// Every variant is surfaced to the MCP client as an error-flagged tool
/// result whose text is the `Display` rendering, so messages are written
/// for a model to read.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument \"{name}\": {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("failed to {operation}: {cause}")]
    Upstream { operation: String, cause: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool {0} is disabled for this request")]
    ToolDisabled(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a failed upstream call, e.g. `Error::upstream("list alerts", err)`.
    pub fn upstream(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Error::Upstream {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Error::Upstream { .. } => ErrorCode::UpstreamFailure,
            Error::UnknownTool(_) => ErrorCode::UnknownTool,
            Error::ToolDisabled(_) => ErrorCode::ToolDisabled,
            Error::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {err}"))
    }
}
