//! Yuque MCP Library
//!
//! This crate implements the Model Context Protocol (MCP) core for the Yuque
//! knowledge-base API: every `tools/call` becomes one (occasionally two)
//! authenticated REST calls, and every REST outcome becomes a JSON-RPC
//! result or a coded error.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  JSON-RPC 2.0
//!        ▼
//! ┌──────────────────────┐
//! │      McpServer       │  envelope checks, method routing
//! │                      │  initialize / tools/list / tools/call / ping
//! │  ┌────────────────┐  │
//! │  │  ToolCatalog   │  │  name → schema → upstream operation
//! │  └───────┬────────┘  │
//! │          ▼           │
//! │  ┌────────────────┐  │
//! │  │ UpstreamClient │  │  one-shot REST call → UpstreamOutcome
//! │  └───────┬────────┘  │
//! │          ▼           │
//! │  ┌────────────────┐  │
//! │  │   taxonomy     │  │  outcome → ProtocolError + suggestion
//! │  └────────────────┘  │
//! └──────────────────────┘
//!        │
//!        ▼
//!   Yuque REST API
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yuque_mcp::{Credential, HttpUpstream, McpServer, ServerInfo, ToolCatalog, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let catalog = Arc::new(ToolCatalog::new().unwrap());
//!     let client = Arc::new(HttpUpstream::new(UpstreamConfig::default()).unwrap());
//!     let server = McpServer::new(catalog, client, ServerInfo::default());
//!
//!     let token = Credential::new("my-token");
//!     let response = server
//!         .handle_bytes(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, token.as_ref())
//!         .await;
//!     println!("{}", serde_json::to_string(&response).unwrap());
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod protocol;
pub mod server;
pub mod stdio;
pub mod taxonomy;
pub mod tools;

pub use client::{
    Credential, HttpMethod, HttpUpstream, TransportKind, UpstreamBody, UpstreamClient,
    UpstreamOutcome, UpstreamRequest,
};
pub use config::{ServerInfo, UpstreamConfig};
pub use error::{ErrorCode, McpError, McpResult, ProtocolError};
pub use protocol::{Method, RpcRequest, RpcResponse};
pub use server::McpServer;
pub use tools::{Arguments, ToolCatalog, ToolDefinition};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "yuque-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
