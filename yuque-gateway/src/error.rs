//! Gateway error types

use thiserror::Error;
use yuque_mcp::McpError;

/// Result type for gateway startup and serving
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that stop the gateway. Per-request faults never surface here; they
/// are JSON-RPC error responses.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    Core(#[from] McpError),
}
