//! Yuque MCP Gateway Binary
//!
//! HTTP server exposing the Yuque MCP tools to remote agents.
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (port 3000), clients send X-Yuque-Token
//! yuque-gateway
//!
//! # Shared fallback token, custom port
//! YUQUE_TOKEN=... PORT=8080 yuque-gateway
//!
//! # Same via flags
//! yuque-gateway --port 8080 --token ... --heartbeat-secs 15
//! ```

use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yuque_gateway::{GatewayConfig, GatewayServer};
use yuque_mcp::UpstreamConfig;

#[derive(Parser, Debug)]
#[command(name = "yuque-gateway")]
#[command(about = "Model Context Protocol gateway for the Yuque API")]
#[command(version)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Fallback Yuque token for requests without X-Yuque-Token
    #[arg(long, env = "YUQUE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Yuque API root
    #[arg(long, env = "YUQUE_BASE_URL")]
    base_url: Option<String>,

    /// Upstream request timeout in milliseconds
    #[arg(long, env = "YUQUE_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Protocol version announced by initialize
    #[arg(long, env = "MCP_PROTOCOL_VERSION")]
    protocol_version: Option<String>,

    /// Seconds between SSE heartbeats
    #[arg(long, env = "HEARTBEAT_SECS", default_value_t = 30)]
    heartbeat_secs: u64,

    /// Answer CORS preflights
    #[arg(long, env = "CORS_ENABLED", default_value_t = true, action = ArgAction::Set)]
    cors: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yuque_gateway=info,yuque_mcp=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut upstream = UpstreamConfig::default();
    if let Some(base_url) = args.base_url {
        upstream = upstream.with_base_url(base_url);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        upstream = upstream.with_timeout_ms(timeout_ms);
    }

    let mut builder = GatewayConfig::builder()
        .host(args.host)
        .port(args.port)
        .cors(args.cors)
        .heartbeat(Duration::from_secs(args.heartbeat_secs))
        .upstream(upstream);
    if let Some(token) = args.token {
        builder = builder.default_token(token);
    }
    if let Some(version) = args.protocol_version {
        builder = builder.protocol_version(version);
    }
    let config = builder.build();

    if config.default_credential.is_none() {
        tracing::warn!("YUQUE_TOKEN is not set; callers must send X-Yuque-Token");
    }

    tracing::info!("Starting Yuque MCP gateway v{}", env!("CARGO_PKG_VERSION"));

    let server = GatewayServer::new(config)?;
    server.run().await?;

    Ok(())
}
