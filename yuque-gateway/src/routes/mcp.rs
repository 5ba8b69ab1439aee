//! MCP transport endpoints

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream::{self, Stream};
use serde_json::json;
use tokio::time::{interval_at, Instant};

use crate::AppState;

/// POST /mcp - one JSON-RPC message per request
///
/// Every JSON-RPC answer, errors included, goes out as 200; a notification
/// gets 204 with no body.
pub async fn handle_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let credential = state.credential(&headers).map(|(credential, source)| {
        tracing::debug!(token_source = source.as_str(), "credential resolved");
        credential
    });

    match state.server.handle_bytes(&body, credential.as_ref()).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /mcp - keep-alive event stream
pub async fn heartbeat(State(state): State<Arc<AppState>>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let period = state.heartbeat;
    let ticker = interval_at(Instant::now() + period, period);

    tracing::info!(interval_secs = period.as_secs(), "SSE client connected");

    let events = stream::unfold(ticker, |mut ticker| async move {
        ticker.tick().await;
        let payload = json!({
            "type": "heartbeat",
            "timestamp": chrono::Utc::now().timestamp(),
        });
        Some((Ok(Event::default().data(payload.to_string())), ticker))
    });

    Sse::new(events)
}
