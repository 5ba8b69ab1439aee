//! Gateway configuration

use std::time::Duration;

use yuque_mcp::{Credential, ServerInfo, UpstreamConfig};

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Interval between SSE heartbeat events
    pub heartbeat: Duration,
    /// Fallback credential when a request carries no `X-Yuque-Token`
    pub default_credential: Option<Credential>,
    /// Yuque API settings
    pub upstream: UpstreamConfig,
    /// Identity announced by `initialize`
    pub server_info: ServerInfo,
}

impl GatewayConfig {
    /// Create a new configuration builder
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfigBuilder::default().build()
    }
}

/// Builder for GatewayConfig
#[derive(Debug, Default)]
pub struct GatewayConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    cors_enabled: Option<bool>,
    heartbeat: Option<Duration>,
    default_credential: Option<Credential>,
    upstream: Option<UpstreamConfig>,
    protocol_version: Option<String>,
}

impl GatewayConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = Some(enabled);
        self
    }

    /// Zero is clamped to one second
    pub fn heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat = Some(interval.max(Duration::from_secs(1)));
        self
    }

    /// Blank tokens are ignored
    pub fn default_token(mut self, token: impl Into<String>) -> Self {
        self.default_credential = Credential::new(token);
        self
    }

    pub fn upstream(mut self, upstream: UpstreamConfig) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = Some(version.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatewayConfig {
        let mut server_info = ServerInfo::default();
        if let Some(version) = self.protocol_version {
            server_info.protocol_version = version;
        }

        GatewayConfig {
            host: self.host.unwrap_or_else(|| "0.0.0.0".to_string()),
            port: self.port.unwrap_or(3000),
            cors_enabled: self.cors_enabled.unwrap_or(true),
            heartbeat: self.heartbeat.unwrap_or(Duration::from_secs(30)),
            default_credential: self.default_credential,
            upstream: self.upstream.unwrap_or_default(),
            server_info,
        }
    }
}
