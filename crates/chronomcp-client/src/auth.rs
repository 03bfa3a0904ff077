//! Outbound credential forwarding.
//!
//! Every upstream request passes through [`AuthForwarder::decorate`], which
//! clones the request and applies, in order of precedence: the token
//! forwarded from the inbound MCP request, then the static token the
//! process was started with, then nothing. The `chrono-accesstoken` cookie
//! follows the same precedence.

use chronomcp_config::constants::{ACCESS_TOKEN_COOKIE, BEARER_PREFIX};
use chronomcp_core::Credential;
use reqwest::header::{HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::Request;

use crate::error::{ClientError, Result};

#[derive(Clone, Default)]
pub struct AuthForwarder {
    static_token: Option<String>,
    static_cookie: Option<String>,
}

impl std::fmt::Debug for AuthForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForwarder")
            .field("static_token", &self.static_token.as_ref().map(|_| "<redacted>"))
            .field("static_cookie", &self.static_cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthForwarder {
    pub fn new(static_token: Option<String>) -> Self {
        Self {
            static_token: static_token.filter(|t| !t.is_empty()),
            static_cookie: None,
        }
    }

    pub fn with_static_cookie(mut self, cookie: Option<String>) -> Self {
        self.static_cookie = cookie.filter(|c| !c.is_empty());
        self
    }

    pub fn has_static_token(&self) -> bool {
        self.static_token.is_some()
    }

    /// Return a copy of `request` carrying the effective credentials.
    ///
    /// The original request is left untouched.
    pub fn decorate(&self, request: &Request, credential: &Credential) -> Result<Request> {
        let mut outbound = request.try_clone().ok_or(ClientError::Unclonable)?;

        if let Some(token) = credential.token().or(self.static_token.as_deref()) {
            let mut value = HeaderValue::from_str(&format!("{BEARER_PREFIX}{token}"))
                .map_err(|_| ClientError::InvalidHeader("Authorization"))?;
            value.set_sensitive(true);
            outbound.headers_mut().insert(AUTHORIZATION, value);
        }

        if let Some(cookie) = credential.cookie().or(self.static_cookie.as_deref()) {
            let mut value = HeaderValue::from_str(&format!("{ACCESS_TOKEN_COOKIE}={cookie}"))
                .map_err(|_| ClientError::InvalidHeader("Cookie"))?;
            value.set_sensitive(true);
            outbound.headers_mut().append(COOKIE, value);
        }

        Ok(outbound)
    }
}
