//! Router tests driven through tower::ServiceExt::oneshot

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yuque_gateway::{GatewayConfig, GatewayServer};
use yuque_mcp::{HttpUpstream, UpstreamConfig};

fn gateway(base_url: &str, default_token: Option<&str>) -> Router {
    let upstream = UpstreamConfig::default()
        .with_base_url(base_url)
        .with_timeout_ms(2000);
    let mut builder = GatewayConfig::builder().upstream(upstream.clone());
    if let Some(token) = default_token {
        builder = builder.default_token(token);
    }
    let client = Arc::new(HttpUpstream::new(upstream).unwrap());
    GatewayServer::with_client(builder.build(), client).unwrap().router()
}

fn offline(default_token: Option<&str>) -> Router {
    gateway("http://127.0.0.1:1", default_token)
}

fn post_mcp(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_ping_returns_200() {
    let response = offline(None)
        .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
}

#[tokio::test]
async fn test_invalid_json_is_parse_error_with_200() {
    let response = offline(None).oneshot(post_mcp("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_notification_returns_204() {
    let response = offline(None)
        .oneshot(post_mcp(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_tools_call_without_token_is_rejected() {
    let response = offline(None)
        .oneshot(post_mcp(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_user_info","arguments":{}}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], 2);
    assert_eq!(body["error"]["code"], -32602);
    assert!(body["error"]["data"]["suggestion"].is_string());
}

#[tokio::test]
async fn test_header_token_takes_precedence() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_is("X-Auth-Token", "from-header"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"login": "ada", "name": "Ada"}})))
        .expect(1)
        .mount(&mock)
        .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Yuque-Token", "from-header")
        .body(Body::from(
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"get_user_info"}}"#,
        ))
        .unwrap();

    let response = gateway(&mock.uri(), Some("from-env")).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], "a");
    assert_eq!(body["result"]["content"][0]["type"], "text");
    assert!(body["result"]["content"][0]["text"].as_str().unwrap().contains("ada"));
}

#[tokio::test]
async fn test_upstream_error_still_returns_200() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&mock)
        .await;

    let response = gateway(&mock.uri(), Some("stale"))
        .oneshot(post_mcp(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_user_info","arguments":{}}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], -32001);
    assert_eq!(body["error"]["data"]["status_code"], 401);
}

#[tokio::test]
async fn test_health_without_token_is_configured() {
    let response = offline(None)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "configured");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_with_default_token_is_healthy() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header_is("X-Auth-Token", "from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"login": "ada"}})))
        .mount(&mock)
        .await;

    let response = gateway(&mock.uri(), Some("from-env"))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["user"], "ada");
    assert_eq!(body["token_source"], "environment");
}

#[tokio::test]
async fn test_health_reports_header_source() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&mock)
        .await;

    let request = Request::get("/health")
        .header("X-Yuque-Token", "mine")
        .body(Body::empty())
        .unwrap();
    let body = json_body(gateway(&mock.uri(), None).oneshot(request).await.unwrap()).await;

    assert_eq!(body["user"], "unknown");
    assert_eq!(body["token_source"], "header");
}

#[tokio::test]
async fn test_health_upstream_failure_is_500() {
    let response = offline(Some("from-env"))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_static_probe() {
    let response = offline(None)
        .oneshot(Request::get("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["server"], yuque_mcp::SERVER_NAME);
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/mcp")
        .header(header::ORIGIN, "https://agent.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-yuque-token")
        .body(Body::empty())
        .unwrap();

    let response = offline(None).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    assert!(allowed.contains("x-yuque-token"));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let response = offline(None)
        .oneshot(post_mcp(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
        .await
        .unwrap();

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_heartbeat_is_event_stream() {
    let response = offline(None)
        .oneshot(Request::get("/mcp").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}
