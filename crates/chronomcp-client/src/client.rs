//! Shared upstream HTTP client

use std::sync::Arc;
use std::time::Duration;

use chronomcp_config::constants::{
    CHRONOSPHERE_DOMAIN, DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_USER_AGENT, LOGSCALE_DOMAIN,
};
use chronomcp_core::{Credential, RequestContext};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::AuthForwarder;
use crate::error::{ClientError, Result};

/// `https://<org>.chronosphere.io`
pub fn org_base_url(org_name: &str) -> String {
    format!("https://{org_name}.{CHRONOSPHERE_DOMAIN}")
}

/// `https://<org>.logs.chronosphere.io`
pub fn logscale_base_url(org_name: &str) -> String {
    format!("https://{org_name}.{LOGSCALE_DOMAIN}")
}

/// LogScale log backend, authenticated by its own static token.
#[derive(Clone)]
pub struct LogscaleConfig {
    pub base_url: String,
    pub api_token: String,
}

impl std::fmt::Debug for LogscaleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogscaleConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// API root, e.g. `https://acme.chronosphere.io`
    pub base_url: String,
    /// Static token used when a request carries no forwarded token
    pub static_token: Option<String>,
    pub logscale: Option<LogscaleConfig>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            static_token: None,
            logscale: None,
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn static_token(mut self, token: Option<String>) -> Self {
        self.static_token = token;
        self
    }

    pub fn logscale(mut self, logscale: Option<LogscaleConfig>) -> Self {
        self.logscale = logscale;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

struct Backend {
    base_url: String,
    auth: AuthForwarder,
    /// Forwarded credentials are only meaningful for the Chronosphere API
    forward_credentials: bool,
}

struct Inner {
    http: Client,
    api: Backend,
    logscale: Option<Backend>,
}

/// Upstream client shared by every tool handler.
///
/// Cheap to clone. Each call takes the [`RequestContext`] of the tool call
/// so credentials and cancellation flow through to the HTTP layer.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.api.base_url)
            .field("logscale", &self.inner.logscale.is_some())
            .finish()
    }
}

fn normalize_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(format!(
            "{raw}: scheme must be http or https"
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        let api = Backend {
            base_url: normalize_base(&config.base_url)?,
            auth: AuthForwarder::new(config.static_token.clone()),
            forward_credentials: true,
        };

        let logscale = match &config.logscale {
            Some(ls) => Some(Backend {
                base_url: normalize_base(&ls.base_url)?,
                auth: AuthForwarder::new(Some(ls.api_token.clone())),
                forward_credentials: false,
            }),
            None => None,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                api,
                logscale,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.api.base_url
    }

    pub fn uses_logscale(&self) -> bool {
        self.inner.logscale.is_some()
    }

    pub fn has_static_token(&self) -> bool {
        self.inner.api.auth.has_static_token()
    }

    /// Link into the web UI. `path` starts with `/`.
    pub fn ui_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.api.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.api.base_url, path);
        self.inner.http.request(method, url)
    }

    pub(crate) fn logscale_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let backend = self
            .inner
            .logscale
            .as_ref()
            .ok_or(ClientError::NotConfigured("LogScale backend"))?;
        let url = format!("{}{}", backend.base_url, path);
        Ok(self.inner.http.request(method, url))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path).query(query);
        self.send_json(ctx, builder, false).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path).json(body);
        self.send_json(ctx, builder, false).await
    }

    /// Send a request and decode its JSON body.
    ///
    /// The whole exchange races the context's cancellation token.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        builder: RequestBuilder,
        logscale: bool,
    ) -> Result<T> {
        let backend = if logscale {
            self.inner
                .logscale
                .as_ref()
                .ok_or(ClientError::NotConfigured("LogScale backend"))?
        } else {
            &self.inner.api
        };

        let request = builder.build()?;
        let credential = if backend.forward_credentials {
            ctx.credential()
        } else {
            &Credential::EMPTY
        };
        let request = backend.auth.decorate(&request, credential)?;

        debug!(method = %request.method(), url = %request.url(), "Upstream request");

        let exchange = async {
            let response = self.inner.http.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?;
            if !status.is_success() {
                return Err(ClientError::status(status, &String::from_utf8_lossy(&body)));
            }
            Ok(serde_json::from_slice::<T>(&body)?)
        };

        tokio::select! {
            biased;
            _ = ctx.cancellation_token().cancelled() => Err(ClientError::Cancelled),
            result = exchange => result,
        }
    }
}

/// Append `page.max_size` and `page.token` query parameters.
pub(crate) fn page_query(query: &mut Vec<(String, String)>, max_size: usize, token: &str) {
    query.push(("page.max_size".to_string(), max_size.to_string()));
    if !token.is_empty() {
        query.push(("page.token".to_string(), token.to_string()));
    }
}
