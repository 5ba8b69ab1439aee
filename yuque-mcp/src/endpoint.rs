//! Upstream path templates
//!
//! Every REST path the gateway calls is declared here once as a
//! [`PathTemplate`]; tools render them with typed [`Segment`] values instead
//! of formatting strings at each call site. Values are percent-encoded per
//! path segment. A [`Namespace`] (`owner/slug`) renders as two segments.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{McpError, McpResult};

static NAMESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^/\s]+)/([^/\s]+)$").expect("namespace pattern is valid")
});

/// Repository namespace, `owner/slug`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    owner: String,
    slug: String,
}

impl Namespace {
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = NAMESPACE_RE.captures(raw.trim())?;
        Some(Self {
            owner: caps[1].to_string(),
            slug: caps[2].to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

/// Value bound to a template placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    One(String),
    Namespace(Namespace),
}

impl Segment {
    fn render(&self, out: &mut String) {
        match self {
            Segment::One(value) => {
                out.push('/');
                out.push_str(&urlencoding::encode(value));
            }
            Segment::Namespace(ns) => {
                out.push('/');
                out.push_str(&urlencoding::encode(ns.owner()));
                out.push('/');
                out.push_str(&urlencoding::encode(ns.slug()));
            }
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Segment::One(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Segment::One(value)
    }
}

impl From<i64> for Segment {
    fn from(value: i64) -> Self {
        Segment::One(value.to_string())
    }
}

impl From<Namespace> for Segment {
    fn from(value: Namespace) -> Self {
        Segment::Namespace(value)
    }
}

/// A path such as `/repos/{namespace}/docs/{slug}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate(&'static str);

impl PathTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Placeholder names, in order
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.0.split('/').filter_map(placeholder)
    }

    /// Substitute every placeholder. A missing binding is a programming
    /// error in the tool table, reported as an internal fault.
    pub fn render(&self, bindings: &[(&str, Segment)]) -> McpResult<String> {
        let mut out = String::with_capacity(self.0.len() + 16);
        for part in self.0.split('/').filter(|p| !p.is_empty()) {
            match placeholder(part) {
                Some(name) => {
                    let value = bindings
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| value)
                        .ok_or_else(|| {
                            McpError::Internal(format!(
                                "path template '{}' has no binding for '{}'",
                                self.0, name
                            ))
                        })?;
                    value.render(&mut out);
                }
                None => {
                    out.push('/');
                    out.push_str(part);
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

fn placeholder(part: &str) -> Option<&str> {
    part.strip_prefix('{')?.strip_suffix('}')
}

// Users
pub const CURRENT_USER: PathTemplate = PathTemplate::new("/user");
pub const USER: PathTemplate = PathTemplate::new("/users/{login}");
pub const USER_REPOS: PathTemplate = PathTemplate::new("/users/{login}/repos");
pub const USER_GROUPS: PathTemplate = PathTemplate::new("/users/{login}/groups");

// Repositories
pub const REPO_BY_NAMESPACE: PathTemplate = PathTemplate::new("/repos/{namespace}");
pub const REPO_BY_ID: PathTemplate = PathTemplate::new("/repos/{repo_id}");
pub const REPO_TOC: PathTemplate = PathTemplate::new("/repos/{repo_id}/toc");

// Documents
pub const REPO_DOCS: PathTemplate = PathTemplate::new("/repos/{namespace}/docs");
pub const DOC_BY_SLUG: PathTemplate = PathTemplate::new("/repos/{namespace}/docs/{slug}");
pub const DOC_BY_ID: PathTemplate = PathTemplate::new("/repos/{namespace}/docs/{doc_id}");
pub const DOC_VERSIONS: PathTemplate = PathTemplate::new("/doc_versions");
pub const DOC_VERSION: PathTemplate = PathTemplate::new("/doc_versions/{version_id}");
pub const SEARCH: PathTemplate = PathTemplate::new("/search");

// Groups
pub const GROUP: PathTemplate = PathTemplate::new("/groups/{group_id}");
pub const GROUP_REPOS: PathTemplate = PathTemplate::new("/groups/{login}/repos");
pub const GROUP_USERS: PathTemplate = PathTemplate::new("/groups/{group_id}/users");
pub const GROUP_MEMBER: PathTemplate = PathTemplate::new("/groups/{group_login}/users/{user_identity}");
pub const GROUP_STATISTICS: PathTemplate = PathTemplate::new("/groups/{group_login}/statistics");
pub const GROUP_MEMBER_STATISTICS: PathTemplate =
    PathTemplate::new("/groups/{group_login}/statistics/members");
pub const GROUP_BOOK_STATISTICS: PathTemplate =
    PathTemplate::new("/groups/{group_login}/statistics/books");
pub const GROUP_DOC_STATISTICS: PathTemplate =
    PathTemplate::new("/groups/{group_login}/statistics/docs");
