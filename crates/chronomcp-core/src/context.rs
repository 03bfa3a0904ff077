//! Per-request credential and context.
//!
//! A [`RequestContext`] flows from the transport edge through the
//! dispatcher into tool handlers and finally into the outbound API client.
//! Values are keyed by their Rust type, so two layers can never collide on
//! a string key.

use std::collections::BTreeSet;

use tokio_util::sync::CancellationToken;

/// Caller identity extracted from inbound HTTP headers.
///
/// Every field is optional: a stdio session, or an HTTP request without
/// headers, carries [`Credential::EMPTY`] and falls back to the server's
/// static token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token with any `Bearer ` prefix already stripped
    pub api_token: Option<String>,
    /// Value for the `chrono-accesstoken` cookie
    pub access_cookie: Option<String>,
    /// Tools the caller asked to hide for this request.
    ///
    /// `None` means the header was absent; `Some` of an empty set means it
    /// was present but listed nothing.
    pub disabled_tools: Option<BTreeSet<String>>,
}

impl Credential {
    pub const EMPTY: Credential = Credential {
        api_token: None,
        access_cookie: None,
        disabled_tools: None,
    };

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_access_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.access_cookie = Some(cookie.into());
        self
    }

    pub fn with_disabled_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    /// Forwarded token, if non-empty
    pub fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Forwarded cookie, if non-empty
    pub fn cookie(&self) -> Option<&str> {
        self.access_cookie.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_tool_disabled(&self, name: &str) -> bool {
        self.disabled_tools
            .as_ref()
            .is_some_and(|tools| tools.contains(name))
    }
}

/// Request-scoped values plus the cancellation signal of the inbound call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    values: http::Extensions,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context bound to an existing cancellation token.
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            values: http::Extensions::new(),
            cancellation,
        }
    }

    /// Attach a value, replacing any previous value of the same type.
    pub fn with_value<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.values.insert(value);
        self
    }

    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values.get::<T>()
    }

    pub fn with_credential(self, credential: Credential) -> Self {
        self.with_value(credential)
    }

    /// The caller's credential, or [`Credential::EMPTY`] when none was attached.
    pub fn credential(&self) -> &Credential {
        self.value::<Credential>().unwrap_or(&Credential::EMPTY)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_reads_as_empty() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.credential(), &Credential::EMPTY);
        assert!(ctx.credential().token().is_none());
    }

    #[test]
    fn test_credential_round_trips_through_context() {
        let cred = Credential::default()
            .with_api_token("abc")
            .with_disabled_tools(["list_alerts"]);
        let ctx = RequestContext::new().with_credential(cred.clone());

        assert_eq!(ctx.credential(), &cred);
        assert!(ctx.credential().is_tool_disabled("list_alerts"));
        assert!(!ctx.credential().is_tool_disabled("list_events"));
    }

    #[test]
    fn test_empty_token_is_treated_as_absent() {
        let cred = Credential::default().with_api_token("").with_access_cookie("");
        assert!(cred.token().is_none());
        assert!(cred.cookie().is_none());
    }

    #[test]
    fn test_values_are_keyed_by_type() {
        #[derive(Clone, Debug, PartialEq)]
        struct TraceId(&'static str);
        #[derive(Clone, Debug, PartialEq)]
        struct SpanId(&'static str);

        let ctx = RequestContext::new()
            .with_value(TraceId("t"))
            .with_value(SpanId("s"));

        assert_eq!(ctx.value::<TraceId>(), Some(&TraceId("t")));
        assert_eq!(ctx.value::<SpanId>(), Some(&SpanId("s")));
        assert!(ctx.value::<String>().is_none());
    }

    #[tokio::test]
    async fn test_context_observes_parent_cancellation() {
        let parent = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(parent.child_token());
        assert!(!ctx.is_cancelled());
        parent.cancel();
        ctx.cancellation_token().cancelled().await;
        assert!(ctx.is_cancelled());
    }
}
