//! Upstream client against a wiremock API

use std::time::Duration;

use chrono::{TimeZone, Utc};
use chronomcp_client::{
    AlertFilter, ApiClient, ApiClientConfig, ClientError, LogscaleConfig, MatchOperation,
    StringMatcher,
};
use chronomcp_core::{Credential, RequestContext, TimeRange};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, static_token: Option<&str>) -> ApiClient {
    ApiClient::new(
        ApiClientConfig::new(server.uri())
            .static_token(static_token.map(String::from))
            .timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn range() -> TimeRange {
    TimeRange::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
    .unwrap()
}

async fn mount_empty_events(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/data/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_forwarded_token_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/events"))
        .and(header("Authorization", "Bearer TOKEN_A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::new().with_credential(Credential::default().with_api_token("TOKEN_A"));
    let events = client(&server, Some("TOKEN_B"))
        .list_events(&ctx, &range(), None, 10)
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_static_token_used_without_forwarded_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/events"))
        .and(header("Authorization", "Bearer TOKEN_B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Some("TOKEN_B"))
        .list_events(&RequestContext::new(), &range(), None, 10)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let server = MockServer::start().await;
    mount_empty_events(&server).await;

    client(&server, None)
        .list_events(&RequestContext::new(), &range(), None, 10)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_forwarded_cookie_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/events"))
        .and(header("Cookie", "chrono-accesstoken=session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::new()
        .with_credential(Credential::default().with_access_cookie("session-1"));
    client(&server, None)
        .list_events(&ctx, &range(), None, 10)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/data/alerts/list"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .list_alerts(&RequestContext::new(), None, None, 10)
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "permission denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_alert_listing_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/data/alerts/list"))
        .and(body_partial_json(json!({"page": {"token": "p2"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [{"alert_id": "a3"}],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/data/alerts/list"))
        .and(body_partial_json(json!({
            "filter": {"monitor_slug": {"operation": "EQUAL", "single_value": "cpu-high"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [{"alert_id": "a1"}, {"alert_id": "a2"}],
            "page": {"next_token": "p2"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let filter = AlertFilter {
        monitor_slug: Some(StringMatcher {
            operation: MatchOperation::Equal,
            single_value: Some("cpu-high".into()),
            multi_values: vec![],
        }),
        ..AlertFilter::default()
    };
    let alerts = client(&server, None)
        .list_alerts(&RequestContext::new(), Some(&filter), None, 100)
        .await
        .unwrap();
    let ids: Vec<_> = alerts.iter().map(|a| a.alert_id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
}

#[tokio::test]
async fn test_listing_stops_at_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/data/alerts/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [{"alert_id": "a1"}, {"alert_id": "a2"}, {"alert_id": "a3"}],
            "page": {"next_token": "more"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let alerts = client(&server, None)
        .list_alerts(&RequestContext::new(), None, None, 2)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 2);
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"events": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let ctx = RequestContext::with_cancellation(token.clone());
    let api = client(&server, None);

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = api.list_events(&ctx, &range(), None, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
    canceller.await.unwrap();
}

#[tokio::test]
async fn test_prometheus_range_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/m3/api/v1/query_range"))
        .and(query_param("query", "up"))
        .and(query_param("step", "60s"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [{"metric": {"__name__": "up"}, "values": [[1714561200, "1"]]}]
            }
        })))
        .mount(&server)
        .await;

    let data = client(&server, None)
        .query_prometheus_range(&RequestContext::new(), "up", &range(), 60)
        .await
        .unwrap();
    assert_eq!(data.result_type, "matrix");
    assert_eq!(data.series_count(), 1);
}

#[tokio::test]
async fn test_prometheus_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/m3/api/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "parse error at char 3"
        })))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .query_prometheus_instant(&RequestContext::new(), "up{", None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "upstream query error: bad_data: parse error at char 3"
    );
}

#[tokio::test]
async fn test_logscale_backend_uses_its_own_token() {
    let api_server = MockServer::start().await;
    let logscale_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/repositories/logs/query"))
        .and(header("Authorization", "Bearer LOGSCALE"))
        .and(body_partial_json(json!({"queryString": "error", "isLive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"@rawstring": "boom"}])))
        .expect(1)
        .mount(&logscale_server)
        .await;

    let api = ApiClient::new(
        ApiClientConfig::new(api_server.uri()).logscale(Some(LogscaleConfig {
            base_url: logscale_server.uri(),
            api_token: "LOGSCALE".into(),
        })),
    )
    .unwrap();

    let ctx = RequestContext::new().with_credential(Credential::default().with_api_token("USER"));
    let rows = api
        .query_logs_range(&ctx, "error", &range(), 100, None)
        .await
        .unwrap();
    assert_eq!(rows, json!([{"@rawstring": "boom"}]));
}

#[tokio::test]
async fn test_config_read_unwraps_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config/monitors/cpu-high"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "monitor": {"slug": "cpu-high", "name": "CPU high"}
        })))
        .mount(&server)
        .await;

    let monitor = client(&server, None)
        .read_config_entity(&RequestContext::new(), "monitors", "monitor", "cpu-high")
        .await
        .unwrap();
    assert_eq!(monitor["name"], "CPU high");
}

#[tokio::test]
async fn test_config_list_passes_filters_and_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config/notification-policies"))
        .and(query_param("page.token", "n2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notification_policies": [{"slug": "p3"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/config/notification-policies"))
        .and(query_param("slugs", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notification_policies": [{"slug": "p1"}, {"slug": "p2"}],
            "page": {"next_token": "n2"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let items = client(&server, None)
        .list_config_entities(
            &RequestContext::new(),
            "notification-policies",
            "notification_policies",
            &[("slugs".to_string(), "p1".to_string())],
            50,
        )
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_config_read_rejects_path_escape() {
    let server = MockServer::start().await;
    let err = client(&server, None)
        .read_config_entity(&RequestContext::new(), "monitors", "monitor", "../teams")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
}
