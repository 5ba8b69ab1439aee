//! Yuque Gateway - HTTP transport for the Yuque MCP server
//!
//! Exposes [`yuque_mcp::McpServer`] over HTTP so remote agents can reach it:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    GatewayServer                      │
//! │  ┌────────────────────────────────────────────────┐   │
//! │  │            yuque-mcp::McpServer                │   │
//! │  │   (dispatch, catalog, upstream, error codes)   │   │
//! │  └────────────────────────────────────────────────┘   │
//! │                        │                              │
//! │       ┌────────────────┼────────────────┐             │
//! │       ▼                ▼                ▼             │
//! │  POST /mcp        GET /mcp (SSE)    /health, /test   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The gateway holds no protocol logic of its own. It resolves the caller's
//! credential, hands the raw body to the dispatcher and maps "no response"
//! to HTTP 204.

pub mod credentials;
pub mod routes;
mod config;
mod error;

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use credentials::TokenSource;
pub use error::{GatewayError, GatewayResult};

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum::Router;
use yuque_mcp::{Credential, HttpUpstream, McpServer, ToolCatalog, UpstreamClient};

/// Shared application state
pub struct AppState {
    /// The MCP dispatcher (wraps yuque-mcp)
    pub server: McpServer,
    /// Credential used when a request brings none
    pub default_credential: Option<Credential>,
    /// SSE heartbeat interval
    pub heartbeat: Duration,
}

impl AppState {
    pub fn new(server: McpServer, default_credential: Option<Credential>, heartbeat: Duration) -> Self {
        Self {
            server,
            default_credential,
            heartbeat,
        }
    }

    /// Credential for a request, header first
    pub fn credential(&self, headers: &HeaderMap) -> Option<(Credential, TokenSource)> {
        credentials::resolve(headers, self.default_credential.as_ref())
    }
}

/// Yuque MCP HTTP gateway
///
/// # Example
///
/// ```rust,ignore
/// use yuque_gateway::{GatewayConfig, GatewayServer};
///
/// #[tokio::main]
/// async fn main() {
///     let config = GatewayConfig::builder().port(3000).build();
///     let server = GatewayServer::new(config).unwrap();
///     server.run().await.unwrap();
/// }
/// ```
pub struct GatewayServer {
    state: Arc<AppState>,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a gateway talking to the live Yuque API
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = Arc::new(HttpUpstream::new(config.upstream.clone())?);
        Self::with_client(config, client)
    }

    /// Create a gateway over any upstream client
    pub fn with_client(config: GatewayConfig, client: Arc<dyn UpstreamClient>) -> GatewayResult<Self> {
        let catalog = Arc::new(ToolCatalog::new()?);
        let server = McpServer::new(catalog, client, config.server_info.clone());
        let state = AppState::new(server, config.default_credential.clone(), config.heartbeat);

        Ok(Self {
            state: Arc::new(state),
            config,
        })
    }

    /// Build the Axum router with all routes
    pub fn router(&self) -> Router {
        routes::create_router(Arc::clone(&self.state), self.config.cors_enabled)
    }

    /// Get the socket address for the server
    pub fn addr(&self) -> GatewayResult<SocketAddr> {
        let ip: IpAddr = self
            .config
            .host
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(self.config.host.clone()))?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// Run the server
    pub async fn run(&self) -> GatewayResult<()> {
        let app = self.router();
        let addr = self.addr()?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        tracing::info!("Yuque MCP gateway listening on http://{}", addr);
        tracing::info!("Endpoints:");
        tracing::info!("  POST /mcp     (JSON-RPC)");
        tracing::info!("  GET  /mcp     (SSE heartbeat)");
        tracing::info!("  GET  /health");
        tracing::info!("  GET  /test");
        tracing::info!(
            tools = self.state.server.catalog().len(),
            default_token = self.state.default_credential.is_some(),
            "Gateway ready"
        );

        axum::serve(listener, app).await.map_err(GatewayError::Serve)?;

        Ok(())
    }
}
