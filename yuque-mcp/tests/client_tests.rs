//! HttpUpstream tests against a mock Yuque API

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yuque_mcp::{
    Credential, HttpUpstream, McpServer, ServerInfo, ToolCatalog, TransportKind, UpstreamBody,
    UpstreamClient, UpstreamConfig, UpstreamOutcome, UpstreamRequest,
};

async fn setup() -> (MockServer, HttpUpstream) {
    let server = MockServer::start().await;
    let config = UpstreamConfig::default()
        .with_base_url(server.uri())
        .with_timeout_ms(2000);
    let client = HttpUpstream::new(config).unwrap();
    (server, client)
}

fn token() -> Credential {
    Credential::new("test-token").unwrap()
}

#[tokio::test]
async fn test_success_sends_auth_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("X-Auth-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"login": "ada"}})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.execute(&token(), &UpstreamRequest::get("/user")).await;
    assert_eq!(outcome, UpstreamOutcome::Success(json!({"data": {"login": "ada"}})));
}

#[tokio::test]
async fn test_http_failure_keeps_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/repos/a/b"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"status": 404, "message": "Not Found"})))
        .mount(&server)
        .await;

    let outcome = client.execute(&token(), &UpstreamRequest::get("/repos/a/b")).await;
    assert_eq!(
        outcome,
        UpstreamOutcome::HttpFailure {
            status: 404,
            body: UpstreamBody::Json(json!({"status": 404, "message": "Not Found"})),
        }
    );
}

#[tokio::test]
async fn test_http_failure_with_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    match client.execute(&token(), &UpstreamRequest::get("/user")).await {
        UpstreamOutcome::HttpFailure { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, UpstreamBody::Text("<html>Bad Gateway</html>".to_string()));
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/a/b/docs/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let outcome = client.execute(&token(), &UpstreamRequest::delete("/repos/a/b/docs/1")).await;
    assert_eq!(outcome, UpstreamOutcome::Success(serde_json::Value::Null));
}

#[tokio::test]
async fn test_undecodable_success_is_transport_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    match client.execute(&token(), &UpstreamRequest::get("/user")).await {
        UpstreamOutcome::TransportFailure { kind, .. } => assert_eq!(kind, TransportKind::Decode),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    let client = HttpUpstream::new(
        UpstreamConfig::default()
            .with_base_url(server.uri())
            .with_timeout_ms(100),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    match client.execute(&token(), &UpstreamRequest::get("/user")).await {
        UpstreamOutcome::TransportFailure { kind, .. } => assert_eq!(kind, TransportKind::Timeout),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    let client = HttpUpstream::new(
        UpstreamConfig::default()
            .with_base_url("http://127.0.0.1:1")
            .with_timeout_ms(2000),
    )
    .unwrap();

    let outcome = client.execute(&token(), &UpstreamRequest::get("/user")).await;
    assert!(matches!(outcome, UpstreamOutcome::TransportFailure { .. }));
}

#[tokio::test]
async fn test_query_and_body_are_sent() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/repos/a/b/docs"))
        .and(query_param("x", "1"))
        .and(body_json(json!({"title": "T", "body": "B"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let request = UpstreamRequest::post("/repos/a/b/docs", json!({"title": "T", "body": "B"})).with_query("x", "1");
    let outcome = client.execute(&token(), &request).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_search_end_to_end() {
    let (mock, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "onboarding guide"))
        .and(query_param("type", "doc"))
        .and(header("X-Auth-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{
            "id": 11,
            "title": "Onboarding",
            "target": {"slug": "onboarding", "book": {"name": "Handbook", "namespace": "team/handbook"}}
        }]})))
        .expect(1)
        .mount(&mock)
        .await;

    let server = McpServer::new(Arc::new(ToolCatalog::new().unwrap()), Arc::new(client), ServerInfo::default());
    let response = server
        .handle_value(
            json!({
                "jsonrpc": "2.0", "id": 9, "method": "tools/call",
                "params": {"name": "search_docs", "arguments": {"query": "onboarding guide"}}
            }),
            Some(&token()),
        )
        .await
        .unwrap();

    let text = response.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
    assert!(text.contains("get_doc(namespace=\"team/handbook\", slug=\"onboarding\")"));
}

#[tokio::test]
async fn test_get_doc_end_to_end_with_upstream_error() {
    let (mock, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/repos/team/handbook/docs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "doc not found"})))
        .mount(&mock)
        .await;

    let server = McpServer::new(Arc::new(ToolCatalog::new().unwrap()), Arc::new(client), ServerInfo::default());
    let response = server
        .handle_value(
            json!({
                "jsonrpc": "2.0", "id": 10, "method": "tools/call",
                "params": {"name": "get_doc", "arguments": {"namespace": "team/handbook", "slug": "missing"}}
            }),
            Some(&token()),
        )
        .await
        .unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, -32003);
    assert_eq!(error.data.unwrap()["upstream_error"], "doc not found");
}
