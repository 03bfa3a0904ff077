//! Upstream client errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Longest response body kept in a [`ClientError::Status`].
pub const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream query error: {0}")]
    Api(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("request body cannot be cloned for credential forwarding")]
    Unclonable,

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ClientError {
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        ClientError::Status {
            status,
            body: truncate(body.trim(), MAX_ERROR_BODY_CHARS),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        let err = ClientError::status(reqwest::StatusCode::BAD_GATEWAY, &body);
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("short", 10), "short");
    }
}
