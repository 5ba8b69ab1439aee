//! HTTP route handlers

mod mcp;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use yuque_mcp::endpoint::CURRENT_USER;
use yuque_mcp::{Credential, McpResult, UpstreamRequest};

use crate::credentials::TOKEN_HEADER;
use crate::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Static liveness probe response
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub server: String,
    pub version: String,
    pub status: String,
}

/// Health check endpoint. Verifies the credential against `GET /user`.
async fn health(State(state): State<Arc<AppState>>, headers: HeaderMap) -> (StatusCode, Json<HealthResponse>) {
    let Some((credential, source)) = state.credential(&headers) else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "configured".to_string(),
                message: Some("Gateway is running, but no Yuque token is configured".to_string()),
                user: None,
                token_source: None,
                error: Some("Provide a token via the X-Yuque-Token header or YUQUE_TOKEN".to_string()),
            }),
        );
    };

    match current_user(&state, &credential).await {
        Ok(user) => {
            let login = user["data"]["login"].as_str().unwrap_or("unknown").to_string();
            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                    message: Some("Yuque API is reachable".to_string()),
                    user: Some(login),
                    token_source: Some(source.as_str().to_string()),
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error".to_string(),
                    message: None,
                    user: None,
                    token_source: None,
                    error: Some(e.to_protocol_error().message),
                }),
            )
        }
    }
}

async fn current_user(state: &AppState, credential: &Credential) -> McpResult<serde_json::Value> {
    let request = UpstreamRequest::get(CURRENT_USER.render(&[])?);
    state.server.client().execute(credential, &request).await.into_result()
}

/// Static liveness endpoint, no upstream call
async fn test(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    let info = state.server.info();
    Json(TestResponse {
        server: info.name.clone(),
        version: info.version.clone(),
        status: "running".to_string(),
    })
}

/// uuid v4 request ids
#[derive(Debug, Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ])
        .max_age(Duration::from_secs(86400))
}

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>, cors_enabled: bool) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let mut router = Router::new()
        .route("/mcp", get(mcp::heartbeat).post(mcp::handle_message))
        .route("/health", get(health))
        .route("/test", get(test))
        .with_state(state);

    if cors_enabled {
        router = router.layer(cors_layer());
    }

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), UuidRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}
