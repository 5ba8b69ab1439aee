//! Yuque MCP Server Binary (stdio)
//!
//! ## Usage
//!
//! ```bash
//! # Run as MCP server (stdio)
//! YUQUE_TOKEN=... yuque-mcp-stdio
//!
//! # Against a different API root
//! YUQUE_TOKEN=... YUQUE_BASE_URL=http://localhost:9000/api/v2 yuque-mcp-stdio
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yuque_mcp::{Credential, HttpUpstream, McpServer, ServerInfo, ToolCatalog, UpstreamConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (to stderr so it doesn't interfere with stdio MCP)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yuque_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Yuque MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let mut upstream = UpstreamConfig::default();
    if let Ok(base_url) = std::env::var("YUQUE_BASE_URL") {
        upstream = upstream.with_base_url(base_url);
    }
    if let Some(timeout_ms) = std::env::var("YUQUE_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()) {
        upstream = upstream.with_timeout_ms(timeout_ms);
    }

    let credential = std::env::var("YUQUE_TOKEN").ok().and_then(Credential::new);
    if credential.is_none() {
        tracing::warn!("YUQUE_TOKEN is not set; tools/call will be rejected");
    }

    let server = McpServer::new(
        Arc::new(ToolCatalog::new()?),
        Arc::new(HttpUpstream::new(upstream)?),
        ServerInfo::default(),
    );

    tracing::info!(tools = server.catalog().len(), "MCP server ready, listening on stdio");
    server.run_stdio(credential).await?;

    Ok(())
}
