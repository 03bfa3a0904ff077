//! Inbound credential extraction
//!
//! Builds a [`Credential`] from the bearer token, the access-token cookie
//! and the disable-tools header of every HTTP request, and stores it in the
//! request extensions. The MCP handler reads it back from the request parts
//! that rmcp attaches to each call.

use std::collections::BTreeSet;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, Request,
    },
    middleware::Next,
    response::Response,
};
use chronomcp_config::constants::{ACCESS_TOKEN_COOKIE, BEARER_PREFIX, HEADER_DISABLE_TOOLS};
use chronomcp_core::Credential;
use tracing::debug;

/// Never rejects a request: missing credentials fall back to the static
/// token on the outbound side.
pub async fn credential_middleware(mut request: Request<Body>, next: Next) -> Response {
    let credential = credential_from_headers(request.headers());
    debug!(
        path = %request.uri().path(),
        token = credential.token().is_some(),
        cookie = credential.cookie().is_some(),
        disabled_tools = credential.disabled_tools.as_ref().map_or(0, BTreeSet::len),
        "Inbound credentials"
    );
    request.extensions_mut().insert(credential);
    next.run(request).await
}

pub fn credential_from_headers(headers: &HeaderMap) -> Credential {
    let mut credential = Credential::default();

    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(strip_bearer)
        .filter(|t| !t.is_empty())
    {
        credential = credential.with_api_token(token);
    }

    if let Some(cookie) = access_cookie(headers) {
        credential = credential.with_access_cookie(cookie);
    }

    if let Some(raw) = headers.get(HEADER_DISABLE_TOOLS).and_then(|v| v.to_str().ok()) {
        credential.disabled_tools = parse_disabled_tools(raw);
    }

    credential
}

/// Strip any number of leading `Bearer ` prefixes, case-insensitively.
pub fn strip_bearer(raw: &str) -> &str {
    let mut token = raw.trim_start();
    let prefix = BEARER_PREFIX.len();
    while token.len() >= prefix
        && token.is_char_boundary(prefix)
        && token[..prefix].eq_ignore_ascii_case(BEARER_PREFIX)
    {
        token = token[prefix..].trim_start();
    }
    token.trim_end()
}

fn access_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the comma-separated disable-tools header.
///
/// An empty header is `None`. Anything else, including whitespace only, is
/// a set of trimmed non-empty names.
pub fn parse_disabled_tools(raw: &str) -> Option<BTreeSet<String>> {
    if raw.is_empty() {
        return None;
    }
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Extension, Router};
    use axum::http::{HeaderValue, StatusCode};
    use proptest::prelude::*;
    use tower::ServiceExt;

    async fn echo_credential(Extension(credential): Extension<Credential>) -> String {
        format!(
            "{}|{}|{:?}",
            credential.token().unwrap_or("-"),
            credential.cookie().unwrap_or("-"),
            credential.disabled_tools
        )
    }

    fn router() -> Router {
        Router::new()
            .route("/mcp", get(echo_credential))
            .layer(axum::middleware::from_fn(credential_middleware))
    }

    async fn call(request: Request<Body>) -> String {
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_middleware_attaches_credential() {
        let request = Request::builder()
            .uri("/mcp")
            .header("Authorization", "Bearer TOKEN_A")
            .header("Cookie", "theme=dark; chrono-accesstoken=session-1")
            .header("X-Chrono-MCP-Disable-Tools", "list_events, analyze_alerts")
            .body(Body::empty())
            .unwrap();
        assert_eq!(
            call(request).await,
            r#"TOKEN_A|session-1|Some({"analyze_alerts", "list_events"})"#
        );
    }

    #[tokio::test]
    async fn test_middleware_without_headers_yields_empty_credential() {
        let request = Request::builder().uri("/mcp").body(Body::empty()).unwrap();
        assert_eq!(call(request).await, "-|-|None");
    }

    #[test]
    fn test_strip_bearer_is_idempotent() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("bearer Bearer abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer(strip_bearer("Bearer abc")), "abc");
        assert_eq!(strip_bearer("Bearer "), "");
    }

    #[test]
    fn test_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("chrono-accesstoken=xyz"));
        assert_eq!(credential_from_headers(&headers).cookie(), Some("xyz"));
    }

    #[test]
    fn test_empty_and_whitespace_disable_headers_differ() {
        assert_eq!(parse_disabled_tools(""), None);
        assert_eq!(parse_disabled_tools("  "), Some(BTreeSet::new()));
        assert_eq!(parse_disabled_tools(" , ,"), Some(BTreeSet::new()));
    }

    #[test]
    fn test_disable_header_spacing_is_irrelevant() {
        assert_eq!(parse_disabled_tools("a, b , c"), parse_disabled_tools("a,b,c"));
        assert_eq!(
            parse_disabled_tools("a,b,c").unwrap(),
            BTreeSet::from(["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_padding_does_not_change_parsed_set(
            names in proptest::collection::vec("[a-z_]{1,12}", 1..6),
            pad in " {0,3}",
        ) {
            let tight = names.join(",");
            let loose = names
                .iter()
                .map(|n| format!("{pad}{n}{pad}"))
                .collect::<Vec<_>>()
                .join(",");
            prop_assert_eq!(parse_disabled_tools(&tight), parse_disabled_tools(&loose));
        }
    }
}
