//! Fake upstream API backed by wiremock

use std::time::Duration;

use chronomcp_client::{Alert, ApiClient, ApiClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A wiremock server and an [`ApiClient`] pointed at it.
pub struct FakeUpstream {
    pub server: MockServer,
    pub client: ApiClient,
}

impl FakeUpstream {
    /// Upstream without a static token.
    pub async fn start() -> Self {
        Self::start_with_token(None).await
    }

    pub async fn start_with_token(static_token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let config = ApiClientConfig::new(server.uri())
            .static_token(static_token.map(String::from))
            .timeout(Duration::from_secs(5));
        let client = match ApiClient::new(config) {
            Ok(client) => client,
            Err(e) => panic!("fake upstream client: {e}"),
        };
        Self { server, client }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond to `method path` with `body`.
    pub async fn mount_json(&self, http_method: &str, url_path: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve `alerts` as a single page of the alert listing.
    pub async fn mount_alerts(&self, alerts: Vec<Alert>) {
        let alerts = serde_json::to_value(alerts).unwrap_or_else(|_| json!([]));
        self.mount_json("POST", "/api/v1/data/alerts/list", json!({"alerts": alerts}))
            .await;
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// `Authorization` header of every received request (`None` when absent).
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.requests()
            .await
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            })
            .collect()
    }
}
