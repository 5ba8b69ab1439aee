//! Error types for the Yuque MCP core
//!
//! Two layers live here:
//! - [`McpError`]: internal faults raised while dispatching one message
//! - [`ProtocolError`]: the coded JSON-RPC `error` object returned to the caller
//!
//! [`McpError::to_protocol_error`] is the only bridge between the two; the
//! messages, suggestions and diagnostic data are produced by
//! [`crate::taxonomy`].
//!
//! # Error Codes
//!
//! | Code   | Category                    |
//! |--------|-----------------------------|
//! | -32700 | Parse error                 |
//! | -32600 | Invalid Request             |
//! | -32601 | Method not found            |
//! | -32602 | Invalid params              |
//! | -32603 | Internal error              |
//! | -32000 | Tool execution failed       |
//! | -32001 | Authentication failed       |
//! | -32002 | Permission denied           |
//! | -32003 | Resource not found          |
//! | -32005 | Rate limit exceeded         |
//! | -32006 | Upstream service error      |
//! | -32008 | Unsupported addressing mode |

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::client::UpstreamOutcome;
use crate::taxonomy;

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpError>;

/// The fixed enumeration of protocol error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ToolExecutionFailed,
    AuthenticationFailed,
    PermissionDenied,
    ResourceNotFound,
    RateLimitExceeded,
    UpstreamServiceError,
    UnsupportedAddressing,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::ToolExecutionFailed,
        ErrorCode::AuthenticationFailed,
        ErrorCode::PermissionDenied,
        ErrorCode::ResourceNotFound,
        ErrorCode::RateLimitExceeded,
        ErrorCode::UpstreamServiceError,
        ErrorCode::UnsupportedAddressing,
    ];

    /// Numeric code as sent on the wire
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ToolExecutionFailed => -32000,
            ErrorCode::AuthenticationFailed => -32001,
            ErrorCode::PermissionDenied => -32002,
            ErrorCode::ResourceNotFound => -32003,
            ErrorCode::RateLimitExceeded => -32005,
            ErrorCode::UpstreamServiceError => -32006,
            ErrorCode::UnsupportedAddressing => -32008,
        }
    }

    /// Short category name, used as the message prefix
    pub fn category(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid Request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ToolExecutionFailed => "Tool execution failed",
            ErrorCode::AuthenticationFailed => "Authentication failed",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::ResourceNotFound => "Resource not found",
            ErrorCode::RateLimitExceeded => "Rate limit exceeded",
            ErrorCode::UpstreamServiceError => "Upstream service error",
            ErrorCode::UnsupportedAddressing => "Unsupported addressing mode",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Hint attached to every internal fault
pub const INTERNAL_SUGGESTION: &str =
    "Retry the call; if the error persists, report it together with the request that triggered it.";

impl ProtocolError {
    pub(crate) fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub(crate) fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Body could not be decoded as JSON
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::ParseError, format!("Parse error: {}", detail))
    }

    /// Envelope is malformed (wrong version tag, missing id, no method)
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidRequest, format!("Invalid Request: {}", detail))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Method not found: {}", method))
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {}", detail)).with_data(json!({
            "suggestion": INTERNAL_SUGGESTION,
        }))
    }

    /// The enumerated kind, if the code is one of ours
    pub fn kind(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(self.code)
    }

    /// Remediation hint carried in `data.suggestion`
    pub fn suggestion(&self) -> Option<&str> {
        self.data.as_ref()?.get("suggestion")?.as_str()
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Errors that can occur while dispatching a message
#[derive(Error, Debug)]
pub enum McpError {
    /// No credential was supplied for a call that needs one
    #[error("Missing Yuque token. Provide it via the X-Yuque-Token header or the YUQUE_TOKEN environment variable.")]
    MissingCredential,

    /// `tools/call` without a usable tool name
    #[error("tools/call requires a string 'name' parameter")]
    MissingToolName,

    /// `params.arguments` is not a mapping
    #[error("Tool arguments must be an object, got {0}")]
    ArgumentsNotObject(String),

    /// Tool name not present in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A field listed in the tool's `required` set is absent
    #[error("Missing required argument '{field}' for tool '{tool}'")]
    MissingArgument { tool: String, field: String },

    /// A supplied argument violates the tool's contract
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    /// The tool is declared but the upstream has no matching endpoint
    #[error("Tool '{tool}' cannot address a resource by '{argument}' = {value}")]
    UnsupportedAddressing {
        tool: String,
        argument: String,
        value: Value,
        alternative: String,
        suggestion: String,
    },

    /// Upstream call did not succeed
    #[error("Upstream call failed: {0:?}")]
    Upstream(UpstreamOutcome),

    /// Upstream answered 2xx with a payload we cannot use
    #[error("Unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Get error code for MCP protocol
    pub fn error_code(&self) -> ErrorCode {
        match self {
            McpError::MissingCredential
            | McpError::MissingToolName
            | McpError::ArgumentsNotObject(_)
            | McpError::MissingArgument { .. }
            | McpError::InvalidArgument { .. } => ErrorCode::InvalidParams,
            McpError::UnknownTool(_) => ErrorCode::MethodNotFound,
            McpError::UnsupportedAddressing { .. } => ErrorCode::UnsupportedAddressing,
            McpError::Upstream(outcome) => taxonomy::outcome_code(outcome),
            McpError::UnexpectedResponse(_) => ErrorCode::ToolExecutionFailed,
            McpError::Client(_) | McpError::Serialization(_) | McpError::Internal(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Create the MCP-formatted error object
    pub fn to_protocol_error(&self) -> ProtocolError {
        taxonomy::map_error(self)
    }

    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        McpError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<i32> = ErrorCode::ALL.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_from_code_roundtrips_every_kind() {
        for kind in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_code(kind.code()), Some(kind));
        }
        assert_eq!(ErrorCode::from_code(-32004), None);
    }

    #[test]
    fn test_data_omitted_when_absent() {
        let err = ProtocolError::method_not_found("resources/list");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], -32601);
        assert_eq!(json["message"], "Method not found: resources/list");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_validation_errors_are_invalid_params() {
        let err = McpError::MissingArgument {
            tool: "get_repo".to_string(),
            field: "namespace".to_string(),
        };
        assert_eq!(err.error_code(), ErrorCode::InvalidParams);
        assert!(err.to_string().contains("namespace"));
        assert_eq!(McpError::MissingCredential.error_code(), ErrorCode::InvalidParams);
        assert_eq!(
            McpError::UnknownTool("nope".into()).error_code(),
            ErrorCode::MethodNotFound
        );
    }
}
