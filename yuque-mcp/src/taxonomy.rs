//! Error taxonomy mapper
//!
//! Pure functions from an upstream outcome (or a dispatch-local failure) to a
//! coded [`ProtocolError`]. Every mapped error carries `data.suggestion`; the
//! upstream status and body ride along where they exist.
//!
//! | Condition                          | Code   |
//! |------------------------------------|--------|
//! | upstream HTTP 401                  | -32001 |
//! | upstream HTTP 403                  | -32002 |
//! | upstream HTTP 404                  | -32003 |
//! | upstream HTTP 429                  | -32005 |
//! | upstream HTTP >= 500               | -32006 |
//! | any other non-2xx                  | -32000 |
//! | transport failure (timeout, reset) | -32000 |

use serde_json::{json, Value};

use crate::client::{TransportKind, UpstreamBody, UpstreamOutcome};
use crate::error::{ErrorCode, McpError, ProtocolError};

/// Classify an HTTP status from the upstream. Total over `u16`.
pub fn status_code(status: u16) -> ErrorCode {
    match status {
        401 => ErrorCode::AuthenticationFailed,
        403 => ErrorCode::PermissionDenied,
        404 => ErrorCode::ResourceNotFound,
        429 => ErrorCode::RateLimitExceeded,
        s if s >= 500 => ErrorCode::UpstreamServiceError,
        _ => ErrorCode::ToolExecutionFailed,
    }
}

/// Code an outcome would map to
pub fn outcome_code(outcome: &UpstreamOutcome) -> ErrorCode {
    match outcome {
        UpstreamOutcome::Success(_) => ErrorCode::InternalError,
        UpstreamOutcome::HttpFailure { status, .. } => status_code(*status),
        UpstreamOutcome::TransportFailure { .. } => ErrorCode::ToolExecutionFailed,
    }
}

/// Map an upstream outcome to a protocol error; `None` for success.
pub fn classify(outcome: &UpstreamOutcome) -> Option<ProtocolError> {
    match outcome {
        UpstreamOutcome::Success(_) => None,
        UpstreamOutcome::HttpFailure { status, body } => Some(http_failure(*status, body)),
        UpstreamOutcome::TransportFailure { kind, cause } => Some(transport_failure(*kind, cause)),
    }
}

fn http_failure(status: u16, body: &UpstreamBody) -> ProtocolError {
    let code = status_code(status);
    let (message, suggestion) = match code {
        ErrorCode::AuthenticationFailed => (
            "Authentication failed: the Yuque token is invalid or expired".to_string(),
            "Check that the token is correct and not expired, or generate a new one in Yuque settings.",
        ),
        ErrorCode::PermissionDenied => (
            "Permission denied: the token has no access to this resource".to_string(),
            "Check the visibility of the repository or document, or use a token with a broader scope.",
        ),
        ErrorCode::ResourceNotFound => (
            "Resource not found: check the namespace and document slug".to_string(),
            "Confirm the namespace and slug (list_repos, list_docs and search_docs return them); the resource may have been deleted.",
        ),
        ErrorCode::RateLimitExceeded => (
            "Rate limit exceeded: the Yuque API throttled this request".to_string(),
            "Retry after a backoff, or lower the request rate.",
        ),
        ErrorCode::UpstreamServiceError => (
            format!("Upstream service error: Yuque API returned {}", status),
            "Retry later; if the error persists the Yuque service may be degraded.",
        ),
        _ => (
            format!("Tool execution failed: HTTP error {}", status),
            "Check the request parameters and network connectivity.",
        ),
    };

    ProtocolError::new(code, message).with_data(json!({
        "status_code": status,
        "suggestion": suggestion,
        "upstream_error": upstream_error(body),
    }))
}

fn transport_failure(kind: TransportKind, cause: &str) -> ProtocolError {
    let suggestion = match kind {
        TransportKind::Timeout => "The Yuque API did not answer in time; retry after a backoff.",
        TransportKind::Connect => {
            "Could not reach the Yuque API; check network connectivity and the configured base URL."
        }
        TransportKind::Decode => "The Yuque API answered with a body that is not valid JSON; retry later.",
        TransportKind::Other => "Check the request parameters and network connectivity.",
    };

    ProtocolError::new(
        ErrorCode::ToolExecutionFailed,
        format!("{}: {}", ErrorCode::ToolExecutionFailed.category(), cause),
    )
    .with_data(json!({
        "suggestion": suggestion,
        "cause": cause,
        "timeout": kind == TransportKind::Timeout,
    }))
}

/// Upstream `message` field when the body is a JSON object carrying one,
/// otherwise the body itself.
fn upstream_error(body: &UpstreamBody) -> Value {
    match body {
        UpstreamBody::Json(value) => match value.get("message") {
            Some(Value::String(message)) => Value::String(message.clone()),
            _ => value.clone(),
        },
        UpstreamBody::Text(text) => Value::String(text.clone()),
        UpstreamBody::Empty => Value::Null,
    }
}

/// Map any dispatch fault to its protocol error
pub fn map_error(err: &McpError) -> ProtocolError {
    let code = err.error_code();
    match err {
        McpError::MissingCredential => ProtocolError::new(code, err.to_string()).with_data(json!({
            "suggestion": "Send the token in the X-Yuque-Token header, or start the server with YUQUE_TOKEN set.",
        })),
        McpError::MissingToolName | McpError::ArgumentsNotObject(_) => {
            ProtocolError::new(code, err.to_string()).with_data(json!({
                "suggestion": "Send params as {\"name\": <tool>, \"arguments\": {...}}.",
            }))
        }
        McpError::UnknownTool(_) => ProtocolError::new(code, err.to_string()).with_data(json!({
            "suggestion": "Call tools/list to see the available tools.",
        })),
        McpError::MissingArgument { tool, field } => {
            ProtocolError::new(code, err.to_string()).with_data(json!({
                "field": field,
                "suggestion": format!("Call tools/list to see the input schema of '{}'.", tool),
            }))
        }
        McpError::InvalidArgument { field, .. } => {
            ProtocolError::new(code, err.to_string()).with_data(json!({
                "field": field,
                "suggestion": "Call tools/list to see the accepted types and values.",
            }))
        }
        McpError::UnsupportedAddressing {
            tool,
            argument,
            value,
            alternative,
            suggestion,
        } => {
            let mut data = serde_json::Map::new();
            data.insert(argument.clone(), value.clone());
            data.insert("suggestion".to_string(), json!(suggestion));
            data.insert("alternative_method".to_string(), json!(alternative));
            ProtocolError::new(
                code,
                format!("{} cannot fetch a resource by {} {} directly", tool, argument, value),
            )
            .with_data(Value::Object(data))
        }
        McpError::Upstream(outcome) => classify(outcome)
            .unwrap_or_else(|| ProtocolError::internal("successful upstream outcome reported as failure")),
        McpError::UnexpectedResponse(detail) => ProtocolError::new(
            code,
            format!("{}: {}", code.category(), detail),
        )
        .with_data(json!({
            "suggestion": "The Yuque API answered in an unexpected shape; retry, or check the API version in the base URL.",
        })),
        McpError::Client(_) | McpError::Serialization(_) => ProtocolError::internal(err),
        McpError::Internal(detail) => ProtocolError::internal(detail),
    }
}
