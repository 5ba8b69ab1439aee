//! Per-request credential resolution
//!
//! A request's own `X-Yuque-Token` header wins; otherwise the gateway's
//! configured default applies. The default is captured at startup, never
//! re-read from the environment while serving.

use axum::http::HeaderMap;
use serde::Serialize;
use yuque_mcp::Credential;

/// Header a client uses to supply its own token
pub const TOKEN_HEADER: &str = "x-yuque-token";

/// Where a resolved credential came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Header,
    Environment,
}

impl TokenSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenSource::Header => "header",
            TokenSource::Environment => "environment",
        }
    }
}

/// Pick the credential for one request. Blank or non-UTF-8 header values are
/// treated as absent.
pub fn resolve(headers: &HeaderMap, default: Option<&Credential>) -> Option<(Credential, TokenSource)> {
    let from_header = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Credential::new);

    match from_header {
        Some(credential) => Some((credential, TokenSource::Header)),
        None => default.map(|credential| (credential.clone(), TokenSource::Environment)),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_header_wins_over_default() {
        let default = Credential::new("fallback");
        let (credential, source) = resolve(&headers("mine"), default.as_ref()).unwrap();
        assert_eq!(credential.expose(), "mine");
        assert_eq!(source, TokenSource::Header);
    }

    #[test]
    fn test_default_when_header_missing() {
        let default = Credential::new("fallback");
        let (credential, source) = resolve(&HeaderMap::new(), default.as_ref()).unwrap();
        assert_eq!(credential.expose(), "fallback");
        assert_eq!(source.as_str(), "environment");
    }

    #[test]
    fn test_blank_header_falls_back() {
        let default = Credential::new("fallback");
        let (_, source) = resolve(&headers("  "), default.as_ref()).unwrap();
        assert_eq!(source, TokenSource::Environment);
    }

    #[test]
    fn test_nothing_configured() {
        assert!(resolve(&HeaderMap::new(), None).is_none());
    }
}
