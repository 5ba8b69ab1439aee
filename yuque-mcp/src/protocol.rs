//! JSON-RPC 2.0 envelope types
//!
//! Inbound messages are validated here before any routing happens:
//! 1. the message is an object whose `jsonrpc` is exactly `"2.0"`
//! 2. `method` is a string
//! 3. `id` is present (string or number) unless the method is the
//!    `notifications/initialized` notice
//!
//! A failed check yields a ready-to-send [`RpcResponse`] carrying the
//! best-effort `id`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

pub const JSONRPC_VERSION: &str = "2.0";

/// The methods this gateway understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    Ping,
    /// `notifications/initialized`, the one-way handshake completion notice
    Initialized,
    Unknown(String),
}

impl Method {
    pub fn parse(name: &str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            "ping" => Method::Ping,
            "notifications/initialized" => Method::Initialized,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Initialize => "initialize",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::Ping => "ping",
            Method::Initialized => "notifications/initialized",
            Method::Unknown(name) => name,
        }
    }

    /// Whether the method is answered with no response body
    pub fn is_notification(&self) -> bool {
        matches!(self, Method::Initialized)
    }
}

/// A validated inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// `None` only for notifications
    pub id: Option<Value>,
    pub method: Method,
    /// Always an object; absent params become `{}`
    pub params: Value,
}

impl RpcRequest {
    /// Check the envelope invariants, in order
    pub fn from_value(message: Value) -> Result<Self, RpcResponse> {
        let Value::Object(mut obj) = message else {
            return Err(RpcResponse::failure(
                Value::Null,
                ProtocolError::invalid_request("message must be a JSON object"),
            ));
        };

        let id = match obj.remove("id") {
            None | Some(Value::Null) => None,
            Some(id) => Some(id),
        };
        let echo = id.clone().unwrap_or(Value::Null);

        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(RpcResponse::failure(
                echo,
                ProtocolError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        let method = match obj.get("method").and_then(Value::as_str) {
            Some(name) => Method::parse(name),
            None => {
                return Err(RpcResponse::failure(
                    echo,
                    ProtocolError::invalid_request("missing method"),
                ))
            }
        };

        match &id {
            None if !method.is_notification() => {
                return Err(RpcResponse::failure(
                    Value::Null,
                    ProtocolError::invalid_request("missing id"),
                ));
            }
            Some(id) if !(id.is_string() || id.is_number()) => {
                return Err(RpcResponse::failure(
                    Value::Null,
                    ProtocolError::invalid_request("id must be a string or a number"),
                ));
            }
            _ => {}
        }

        let params = match obj.remove("params") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params) => params,
        };

        Ok(Self { id, method, params })
    }

    /// `id` to echo in the response
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// JSON-RPC response: exactly one of `result` / `error` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProtocolError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: ProtocolError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_request() {
        let req = RpcRequest::from_value(json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/list"
        }))
        .unwrap();
        assert_eq!(req.id, Some(json!(7)));
        assert_eq!(req.method, Method::ToolsList);
        assert_eq!(req.params, json!({}));
    }

    #[test]
    fn test_wrong_version_echoes_id() {
        let resp = RpcRequest::from_value(json!({
            "jsonrpc": "1.0", "id": "abc", "method": "ping"
        }))
        .unwrap_err();
        assert_eq!(resp.id, json!("abc"));
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[test]
    fn test_missing_id_has_null_id() {
        let resp = RpcRequest::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap_err();
        assert_eq!(resp.id, Value::Null);
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32600);
        assert!(err.message.contains("missing id"));
    }

    #[test]
    fn test_initialized_notice_needs_no_id() {
        let req = RpcRequest::from_value(json!({
            "jsonrpc": "2.0", "method": "notifications/initialized"
        }))
        .unwrap();
        assert!(req.id.is_none());
        assert!(req.method.is_notification());
    }

    #[test]
    fn test_non_object_message() {
        let resp = RpcRequest::from_value(json!([1, 2, 3])).unwrap_err();
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[test]
    fn test_response_serializes_null_id() {
        let resp = RpcResponse::failure(Value::Null, ProtocolError::parse_error("eof"));
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("id").unwrap().is_null());
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_method_roundtrip() {
        for name in ["initialize", "tools/list", "tools/call", "ping", "notifications/initialized", "resources/list"] {
            assert_eq!(Method::parse(name).as_str(), name);
        }
    }
}
