//! Configuration for the Yuque MCP core

use serde::{Deserialize, Serialize};

/// Upstream (Yuque REST API) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamConfig {
    /// API root, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// User-Agent sent on every call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Header carrying the credential
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
}

fn default_base_url() -> String {
    "https://www.yuque.com/api/v2".to_string()
}

fn default_timeout() -> u64 {
    30000
}

fn default_user_agent() -> String {
    format!("yuque-mcp/{}", crate::SERVER_VERSION)
}

fn default_auth_header() -> String {
    "X-Auth-Token".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout(),
            user_agent: default_user_agent(),
            auth_header: default_auth_header(),
        }
    }
}

impl UpstreamConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Identity announced by `initialize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

fn default_name() -> String {
    crate::SERVER_NAME.to_string()
}

fn default_version() -> String {
    crate::SERVER_VERSION.to_string()
}

fn default_protocol_version() -> String {
    crate::MCP_PROTOCOL_VERSION.to_string()
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            protocol_version: default_protocol_version(),
        }
    }
}
