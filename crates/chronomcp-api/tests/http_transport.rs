//! MCP sessions over the streamable HTTP transport
//!
//! Credentials travel from the inbound HTTP headers, through the rmcp
//! request parts, into the upstream request.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::time::Duration;

use chronomcp_api::build_server;
use chronomcp_api::transport::serve_sse;
use chronomcp_testing::upstream::FakeUpstream;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const SESSION_HEADER: &str = "mcp-session-id";

struct Harness {
    upstream: FakeUpstream,
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl Harness {
    async fn start(static_token: Option<&str>) -> Self {
        let upstream = FakeUpstream::start_with_token(static_token).await;
        upstream.mount_alerts(vec![]).await;
        let server = build_server(&upstream.client, &BTreeSet::new(), "chronomcp-test").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                serve_sse(server, listener, "/mcp", shutdown).await.unwrap();
            }
        });

        Self {
            upstream,
            addr,
            shutdown,
            task,
        }
    }

    fn url(&self) -> String {
        format!("http://{}/mcp", self.addr)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .unwrap()
            .unwrap();
    }
}

struct Session {
    http: reqwest::Client,
    url: String,
    id: String,
}

fn post(http: &reqwest::Client, url: &str, body: &Value) -> reqwest::RequestBuilder {
    http.post(url)
        .header("Accept", "application/json, text/event-stream")
        .header("Content-Type", "application/json")
        .body(body.to_string())
}

/// Read SSE frames until the JSON-RPC response with `id` arrives.
async fn read_response(mut response: reqwest::Response, id: u64) -> Value {
    let read = async {
        let mut buffer = String::new();
        loop {
            let chunk = response.chunk().await.unwrap().expect("stream ended before response");
            buffer.push_str(&String::from_utf8_lossy(&chunk));
            let found = buffer
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
                .find(|message| message["id"] == json!(id));
            if let Some(message) = found {
                return message;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), read).await.unwrap()
}

impl Session {
    async fn open(url: String) -> Self {
        let http = reqwest::Client::new();
        let initialize = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "chronomcp-test-client", "version": "0.0.0"}
            }
        });
        let response = post(&http, &url, &initialize).send().await.unwrap();
        assert!(response.status().is_success(), "initialize: {}", response.status());
        let id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("session id header")
            .to_string();
        let reply = read_response(response, 1).await;
        assert_eq!(reply["result"]["serverInfo"]["name"], json!("chronomcp-test"));

        let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        let response = post(&http, &url, &initialized)
            .header(SESSION_HEADER, &id)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success(), "initialized: {}", response.status());

        Self { http, url, id }
    }

    async fn request(&self, id: u64, method: &str, params: Value, headers: &[(&str, &str)]) -> Value {
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});
        let mut builder = post(&self.http, &self.url, &body).header(SESSION_HEADER, &self.id);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = builder.send().await.unwrap();
        assert!(response.status().is_success(), "{method}: {}", response.status());
        read_response(response, id).await
    }
}

fn tool_names(reply: &Value) -> Vec<String> {
    reply["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|t| t["name"].as_str().map(String::from))
        .collect()
}

#[tokio::test]
async fn test_bearer_header_reaches_upstream() {
    let harness = Harness::start(Some("TOKEN_B")).await;
    let session = Session::open(harness.url()).await;

    let reply = session
        .request(
            2,
            "tools/call",
            json!({"name": "list_alerts", "arguments": {}}),
            &[("Authorization", "Bearer TOKEN_A")],
        )
        .await;
    assert_ne!(reply["result"]["isError"], json!(true), "{reply}");

    let reply = session
        .request(3, "tools/call", json!({"name": "list_alerts", "arguments": {}}), &[])
        .await;
    assert_ne!(reply["result"]["isError"], json!(true), "{reply}");

    assert_eq!(
        harness.upstream.authorization_headers().await,
        vec![Some("Bearer TOKEN_A".to_string()), Some("Bearer TOKEN_B".to_string())]
    );
    harness.stop().await;
}

#[tokio::test]
async fn test_disable_header_filters_listing_and_calls() {
    let harness = Harness::start(None).await;
    let session = Session::open(harness.url()).await;

    let all = tool_names(&session.request(2, "tools/list", json!({}), &[]).await);
    assert!(all.iter().any(|n| n == "list_alerts"));

    let disabled = [("X-Chrono-MCP-Disable-Tools", "list_alerts, get_events_metadata")];
    let visible = tool_names(&session.request(3, "tools/list", json!({}), &disabled).await);
    assert!(!visible.iter().any(|n| n == "list_alerts"));
    assert!(!visible.iter().any(|n| n == "get_events_metadata"));
    assert!(visible.iter().any(|n| n == "analyze_alerts"));
    assert_eq!(visible.len(), all.len() - 2);

    let reply = session
        .request(
            4,
            "tools/call",
            json!({"name": "list_alerts", "arguments": {}}),
            &disabled,
        )
        .await;
    assert_eq!(reply["result"]["isError"], json!(true), "{reply}");
    assert!(harness.upstream.requests().await.is_empty());

    harness.stop().await;
}
