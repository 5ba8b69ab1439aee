//! MCP JSON-RPC dispatcher
//!
//! One inbound message in, at most one response out. The dispatcher owns no
//! per-session state: every message is handled on its own, and the caller's
//! credential arrives alongside it. Transports (HTTP, stdio) live elsewhere
//! and only ever call [`McpServer::handle_bytes`] or
//! [`McpServer::handle_value`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};

use crate::client::{Credential, UpstreamClient};
use crate::config::ServerInfo;
use crate::error::{McpError, McpResult, ProtocolError};
use crate::protocol::{Method, RpcRequest, RpcResponse};
use crate::tools::ToolCatalog;

/// Shared, read-only dispatcher
#[derive(Clone)]
pub struct McpServer {
    catalog: Arc<ToolCatalog>,
    client: Arc<dyn UpstreamClient>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(catalog: Arc<ToolCatalog>, client: Arc<dyn UpstreamClient>, info: ServerInfo) -> Self {
        Self {
            catalog,
            client,
            info,
        }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn client(&self) -> &Arc<dyn UpstreamClient> {
        &self.client
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Decode and dispatch a raw message body. `None` means the message was a
    /// notification and nothing should be sent back.
    pub async fn handle_bytes(&self, body: &[u8], credential: Option<&Credential>) -> Option<RpcResponse> {
        match serde_json::from_slice::<Value>(body) {
            Ok(message) => self.handle_value(message, credential).await,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting undecodable message");
                Some(RpcResponse::failure(Value::Null, ProtocolError::parse_error(e)))
            }
        }
    }

    /// Validate the envelope and dispatch. A panic inside a handler is
    /// contained here and reported as an internal error.
    pub async fn handle_value(&self, message: Value, credential: Option<&Credential>) -> Option<RpcResponse> {
        let request = match RpcRequest::from_value(message) {
            Ok(request) => request,
            Err(response) => {
                tracing::warn!(id = %response.id, "invalid JSON-RPC envelope");
                return Some(response);
            }
        };

        let id = request.id.clone();
        let method = request.method.as_str().to_string();
        match AssertUnwindSafe(self.dispatch(request, credential)).catch_unwind().await {
            Ok(response) => response,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                tracing::error!(method = %method, panic = %detail, "handler panicked");
                id.map(|id| {
                    RpcResponse::failure(
                        id,
                        ProtocolError::internal(format!("handler for '{}' panicked: {}", method, detail)),
                    )
                })
            }
        }
    }

    async fn dispatch(&self, request: RpcRequest, credential: Option<&Credential>) -> Option<RpcResponse> {
        let id = request.response_id();
        tracing::debug!(method = request.method.as_str(), id = %id, "dispatching");

        let result = match request.method {
            Method::Initialize => Ok(self.initialize_result()),
            Method::ToolsList => Ok(self.catalog.listing().clone()),
            Method::ToolsCall => self
                .handle_tools_call(&request.params, credential)
                .await
                .map_err(|e| e.to_protocol_error()),
            Method::Ping => Ok(json!({})),
            Method::Initialized => {
                tracing::info!("client completed the initialize handshake");
                return None;
            }
            Method::Unknown(name) => Err(ProtocolError::method_not_found(&name)),
        };

        Some(match result {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse::failure(id, error),
        })
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": self.info.protocol_version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            }
        })
    }

    async fn handle_tools_call(&self, params: &Value, credential: Option<&Credential>) -> McpResult<Value> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .ok_or(McpError::MissingToolName)?;
        let credential = credential.ok_or(McpError::MissingCredential)?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        tracing::info!(tool = name, "tools/call");
        match self
            .catalog
            .call(self.client.as_ref(), credential, name, arguments)
            .await
        {
            Ok(text) => Ok(json!({
                "content": [{ "type": "text", "text": text }]
            })),
            Err(e) => {
                tracing::warn!(tool = name, code = e.error_code().code(), error = %e, "tool call failed");
                Err(e)
            }
        }
    }
}

/// Text of a panic payload raised with `panic!("..")` or `panic!("{}", ..)`
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer")
            .field("catalog", &self.catalog)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
