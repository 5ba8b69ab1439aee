//! Upstream client for the Yuque REST API
//!
//! One authenticated call in, one [`UpstreamOutcome`] out. The client never
//! raises past its own boundary: non-2xx answers become
//! [`UpstreamOutcome::HttpFailure`], connection problems become
//! [`UpstreamOutcome::TransportFailure`]. No caching, retries or rate
//! limiting happen here; wrap the [`UpstreamClient`] trait for that.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::{McpError, McpResult};

/// Longest raw error text kept from a non-JSON upstream body
pub const MAX_ERROR_TEXT: usize = 500;

/// Opaque API token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// `None` for an empty or whitespace-only token
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully rendered outbound call. Paths come from
/// [`crate::endpoint::PathTemplate::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }
}

/// Body of a failed upstream answer
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    /// Raw text, truncated to [`MAX_ERROR_TEXT`] characters
    Text(String),
    Empty,
}

impl UpstreamBody {
    /// Best-effort decode: JSON first, then truncated text
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return UpstreamBody::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => UpstreamBody::Json(value),
            Err(_) => UpstreamBody::Text(truncate_chars(&String::from_utf8_lossy(bytes), MAX_ERROR_TEXT)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    /// 2xx answer whose body is not JSON
    Decode,
    Other,
}

/// Result of one upstream call
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Success(Value),
    HttpFailure { status: u16, body: UpstreamBody },
    TransportFailure { kind: TransportKind, cause: String },
}

impl UpstreamOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpstreamOutcome::Success(_))
    }

    pub fn into_result(self) -> McpResult<Value> {
        match self {
            UpstreamOutcome::Success(value) => Ok(value),
            failure => Err(McpError::Upstream(failure)),
        }
    }
}

/// Upstream client interface
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Issue one call. Must not panic or retry; every failure is an outcome.
    async fn execute(&self, credential: &Credential, request: &UpstreamRequest) -> UpstreamOutcome;
}

/// reqwest-backed client for the live Yuque API
pub struct HttpUpstream {
    http: reqwest::Client,
    base_url: String,
    auth_header: HeaderName,
    user_agent: HeaderValue,
}

impl HttpUpstream {
    pub fn new(config: UpstreamConfig) -> McpResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| McpError::Client(e.to_string()))?;
        Self::with_client(http, config)
    }

    /// Use a caller-built `reqwest::Client` (connection pool sharing, proxies)
    pub fn with_client(http: reqwest::Client, config: UpstreamConfig) -> McpResult<Self> {
        let auth_header = HeaderName::from_bytes(config.auth_header.as_bytes())
            .map_err(|e| McpError::Client(format!("invalid auth header name: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header,
            user_agent: HeaderValue::from_str(&config.user_agent)
                .map_err(|e| McpError::Client(format!("invalid user agent: {}", e)))?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, credential: &Credential, request: &UpstreamRequest) -> Result<reqwest::RequestBuilder, String> {
        let token = HeaderValue::from_str(credential.expose())
            .map_err(|_| "credential contains characters not allowed in a header".to_string())?;

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .header(self.auth_header.clone(), token)
            .header(USER_AGENT, self.user_agent.clone())
            .header(CONTENT_TYPE, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn execute(&self, credential: &Credential, request: &UpstreamRequest) -> UpstreamOutcome {
        tracing::debug!(method = request.method.as_str(), path = %request.path, "upstream request");

        let builder = match self.build(credential, request) {
            Ok(builder) => builder,
            Err(cause) => {
                return UpstreamOutcome::TransportFailure {
                    kind: TransportKind::Other,
                    cause,
                }
            }
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "upstream transport failure");
                return transport_failure(&e);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "failed to read upstream body");
                return transport_failure(&e);
            }
        };
        tracing::debug!(status = status.as_u16(), size = bytes.len(), "upstream response");

        if !status.is_success() {
            let body = UpstreamBody::from_bytes(&bytes);
            tracing::error!(status = status.as_u16(), path = %request.path, "upstream HTTP failure");
            return UpstreamOutcome::HttpFailure {
                status: status.as_u16(),
                body,
            };
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return UpstreamOutcome::Success(Value::Null);
        }
        match serde_json::from_slice(&bytes) {
            Ok(value) => UpstreamOutcome::Success(value),
            Err(e) => UpstreamOutcome::TransportFailure {
                kind: TransportKind::Decode,
                cause: format!("invalid JSON in upstream response: {}", e),
            },
        }
    }
}

fn transport_failure(err: &reqwest::Error) -> UpstreamOutcome {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else if err.is_decode() {
        TransportKind::Decode
    } else {
        TransportKind::Other
    };
    UpstreamOutcome::TransportFailure {
        kind,
        cause: err.to_string(),
    }
}

/// Cut `text` to at most `max` characters, on a char boundary
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
