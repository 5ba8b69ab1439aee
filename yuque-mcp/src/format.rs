//! Plain-text rendering of Yuque payloads
//!
//! Every function takes the raw upstream response (`{"data": ...}`) and
//! produces the text block returned inside a `tools/call` result. Missing
//! fields render as `unknown`; nothing here can fail.

use serde_json::Value;

use crate::client::truncate_chars;

const UNKNOWN: &str = "unknown";
const LIST_LIMIT: usize = 10;
const PREVIEW_CHARS: usize = 500;
const TOC_LINES: usize = 40;
const MAX_TOC_DEPTH: usize = 16;
const DOC_HOST: &str = "https://www.yuque.com";

fn data(payload: &Value) -> &Value {
    payload.get("data").unwrap_or(&Value::Null)
}

/// String or number field, else `fallback`
fn field(value: &Value, key: &str, fallback: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => fallback.to_string(),
    }
}

fn count(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Date part of an ISO timestamp
fn day(value: &Value, key: &str) -> String {
    truncate_chars(&field(value, key, UNKNOWN), 10)
}

/// Arrays as-is, objects by value
fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn nested(value: &Value, outer: &str, inner: &str) -> String {
    value
        .get(outer)
        .map(|v| field(v, inner, UNKNOWN))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn visibility(public: Option<i64>) -> &'static str {
    match public {
        Some(0) => "private",
        Some(1) => "team",
        Some(2) => "public",
        _ => UNKNOWN,
    }
}

pub fn user_info(payload: &Value) -> String {
    let user = data(payload);
    format!(
        "Yuque user\n\
         Name: {}\n\
         Login: {}\n\
         ID: {}\n\
         Repositories: {}\n\
         Following: {} | Followers: {}\n\
         Joined: {}",
        field(user, "name", UNKNOWN),
        field(user, "login", UNKNOWN),
        field(user, "id", UNKNOWN),
        count(user, "books_count"),
        count(user, "following_count"),
        count(user, "followers_count"),
        field(user, "created_at", UNKNOWN),
    )
}

/// Repositories, most documents first
pub fn repo_list(payload: &Value) -> String {
    let mut repos = items(data(payload));
    if repos.is_empty() {
        return "No repositories found.".to_string();
    }
    repos.sort_by_key(|repo| std::cmp::Reverse(count(repo, "items_count")));

    let mut lines = vec!["Repositories (by document count):".to_string()];
    for repo in repos {
        lines.push(format!("- {}", field(repo, "name", UNKNOWN)));
        lines.push(format!("  Namespace: {}", field(repo, "namespace", UNKNOWN)));
        lines.push(format!(
            "  Documents: {} | Updated: {}",
            count(repo, "items_count"),
            day(repo, "updated_at")
        ));
    }
    lines.join("\n")
}

pub fn repo_info(payload: &Value) -> String {
    let repo = data(payload);
    format!(
        "Repository\n\
         Name: {}\n\
         Namespace: {}\n\
         ID: {}\n\
         Documents: {}\n\
         Watchers: {}\n\
         Likes: {}\n\
         Visibility: {}\n\
         Description: {}\n\
         Created: {}\n\
         Updated: {}",
        field(repo, "name", UNKNOWN),
        field(repo, "namespace", UNKNOWN),
        field(repo, "id", UNKNOWN),
        count(repo, "items_count"),
        count(repo, "watches_count"),
        count(repo, "likes_count"),
        visibility(repo.get("public").and_then(Value::as_i64)),
        field(repo, "description", "(none)"),
        field(repo, "created_at", UNKNOWN),
        field(repo, "updated_at", UNKNOWN),
    )
}

pub fn repo_created(payload: &Value, owner: &str) -> String {
    let repo = data(payload);
    format!(
        "Repository created.\n\
         Name: {}\n\
         Owner: {}\n\
         Namespace: {}\n\
         Visibility: {}\n\
         Created: {}",
        field(repo, "name", UNKNOWN),
        owner,
        field(repo, "namespace", UNKNOWN),
        visibility(repo.get("public").and_then(Value::as_i64)),
        field(repo, "created_at", UNKNOWN),
    )
}

pub fn doc_list(payload: &Value, namespace: &str) -> String {
    let docs = items(data(payload));
    if docs.is_empty() {
        return format!("Repository '{}' has no documents.", namespace);
    }

    let mut lines = vec![format!("Documents in '{}':", namespace)];
    for (i, doc) in docs.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, field(doc, "title", "(untitled)")));
        lines.push(format!("   ID: {} | Slug: {}", field(doc, "id", UNKNOWN), field(doc, "slug", UNKNOWN)));
        lines.push(format!("   Updated: {}", day(doc, "updated_at")));
    }
    lines.join("\n")
}

/// Full document view. `repo` is the optional repository payload fetched
/// alongside the document.
pub fn doc_content(payload: &Value, repo: Option<&Value>, namespace: &str, slug: &str) -> String {
    let doc = data(payload);
    let body = doc.get("body").and_then(Value::as_str).unwrap_or_default();
    let length = body.chars().count();
    let tail: String = body.chars().skip(length.saturating_sub(50)).collect();
    let is_preview = !body.is_empty() && (length < PREVIEW_CHARS || tail.contains("..."));

    let mut out = vec![
        "Document".to_string(),
        format!("Title: {}", field(doc, "title", UNKNOWN)),
        format!("ID: {}", field(doc, "id", UNKNOWN)),
        format!("Format: {}", field(doc, "format", UNKNOWN)),
        format!("Created: {}", field(doc, "created_at", UNKNOWN)),
        format!("Updated: {}", field(doc, "updated_at", UNKNOWN)),
        format!("Author: {}", nested(doc, "creator", "name")),
        String::new(),
    ];

    match repo.map(data).filter(|r| r.is_object()) {
        Some(repo) => {
            out.push(format!("Repository: {}", field(repo, "name", UNKNOWN)));
            out.push(format!("Namespace: {}", field(repo, "namespace", namespace)));
            out.push(format!("Owner: {}", nested(repo, "user", "name")));
            out.push(format!(
                "Visibility: {}",
                visibility(repo.get("public").and_then(Value::as_i64))
            ));
            out.push(format!("Documents in repository: {}", count(repo, "items_count")));
        }
        None => {
            out.push(format!("Namespace: {}", namespace));
            out.push("Repository details unavailable (the token may lack access).".to_string());
        }
    }

    out.push(String::new());
    out.push(format!("Path: {}/{}", namespace, slug));
    out.push(format!("URL: {}/{}/{}", DOC_HOST, namespace, slug));
    out.push(String::new());
    out.push(format!("Length: {} characters", length));
    for (key, label) in [("read_count", "Reads"), ("like_count", "Likes"), ("comment_count", "Comments")] {
        if doc.get(key).is_some_and(|v| !v.is_null()) {
            out.push(format!("{}: {}", label, count(doc, key)));
        }
    }
    out.push(String::new());

    if is_preview {
        let mut preview = truncate_chars(body, PREVIEW_CHARS);
        if length > PREVIEW_CHARS {
            preview.push_str("...");
        }
        out.push("Content (preview):".to_string());
        out.push(preview);
        out.push(String::new());
        out.push(
            "This looks like preview content. For the full body check the document's \
             visibility and the token's access, or call get_doc with raw=true."
                .to_string(),
        );
    } else {
        out.push("Content:".to_string());
        out.push(body.to_string());
    }
    out.join("\n")
}

pub fn doc_created(payload: &Value, namespace: &str) -> String {
    let doc = data(payload);
    format!(
        "Document created.\n\
         Title: {}\n\
         ID: {}\n\
         URL: {}/{}/{}\n\
         Created: {}",
        field(doc, "title", UNKNOWN),
        field(doc, "id", UNKNOWN),
        DOC_HOST,
        namespace,
        field(doc, "slug", ""),
        field(doc, "created_at", UNKNOWN),
    )
}

pub fn doc_versions(payload: &Value, doc_id: i64) -> String {
    let versions = items(data(payload));
    if versions.is_empty() {
        return format!("Document {} has no version history.", doc_id);
    }

    let mut lines = vec![format!("Versions of document {} (latest {}):", doc_id, LIST_LIMIT)];
    for version in versions.iter().take(LIST_LIMIT) {
        let author = match version.get("creator") {
            Some(creator @ Value::Object(_)) => field(creator, "name", "anonymous"),
            Some(Value::String(name)) => name.clone(),
            _ => "anonymous".to_string(),
        };
        let number = version
            .get("version")
            .filter(|v| !v.is_null())
            .map(|_| field(version, "version", UNKNOWN))
            .unwrap_or_else(|| field(version, "id", UNKNOWN));
        lines.push(format!(
            "- {} | {} | {} @ {}",
            number,
            field(version, "title", "(untitled)"),
            author,
            field(version, "created_at", UNKNOWN)
        ));
    }
    if versions.len() > LIST_LIMIT {
        lines.push("More versions are available in Yuque.".to_string());
    }
    lines.join("\n")
}

pub fn doc_version_detail(payload: &Value) -> String {
    let version = data(payload);
    let author = version
        .get("creator")
        .map(|c| field(c, "name", &field(c, "login", UNKNOWN)))
        .unwrap_or_else(|| UNKNOWN.to_string());
    format!(
        "Document version\n\
         Version: {}\n\
         Title: {}\n\
         Author: {}\n\
         Created: {}\n\n\
         Changes:\n{}",
        field(version, "version", UNKNOWN),
        field(version, "title", "(untitled)"),
        author,
        field(version, "created_at", UNKNOWN),
        field(version, "description", "(none)"),
    )
}

/// Search hits, with the namespace and slug needed by `get_doc`
pub fn search_results(payload: &Value, query: &str) -> String {
    let hits = items(data(payload));
    if hits.is_empty() {
        return format!("No results for '{}'.", query);
    }

    let mut lines = vec![format!("Results for '{}' (top {}):", query, LIST_LIMIT)];
    for hit in hits.iter().take(LIST_LIMIT) {
        let target = hit.get("target").filter(|t| t.is_object()).unwrap_or(hit);
        let book = target.get("book").filter(|b| b.is_object());
        let namespace = book.and_then(|b| b.get("namespace")).and_then(Value::as_str);
        let slug = target.get("slug").and_then(Value::as_str);

        lines.push(format!("- {}", field(hit, "title", "(untitled)")));
        lines.push(format!("  ID: {}", field(hit, "id", UNKNOWN)));
        match (namespace, slug) {
            (Some(ns), Some(slug)) => {
                lines.push(format!("  Repository: {}", book.map(|b| field(b, "name", UNKNOWN)).unwrap_or_default()));
                lines.push(format!("  Path: {}/{}", ns, slug));
                lines.push(format!("  Fetch with: get_doc(namespace=\"{}\", slug=\"{}\")", ns, slug));
            }
            (Some(ns), None) => {
                lines.push(format!("  Namespace: {}", ns));
                lines.push("  Slug unknown; use list_docs to find it.".to_string());
            }
            _ => lines.push("  Location unknown; open the document in Yuque to read its namespace and slug.".to_string()),
        }
        if let Some(summary) = hit.get("summary").and_then(Value::as_str).filter(|s| !s.is_empty()) {
            lines.push(format!("  Summary: {}...", truncate_chars(summary, 100)));
        }
    }
    lines.join("\n")
}

pub fn group_list(payload: &Value) -> String {
    let groups = items(data(payload));
    if groups.is_empty() {
        return "You are not a member of any group.".to_string();
    }

    let mut lines = vec!["Groups:".to_string()];
    for group in groups {
        lines.push(format!(
            "- {} (ID: {}, login: {})",
            field(group, "name", UNKNOWN),
            field(group, "id", UNKNOWN),
            field(group, "login", UNKNOWN)
        ));
        lines.push(format!("  Description: {}", field(group, "description", "(none)")));
        lines.push(format!("  Members: {}", count(group, "members_count")));
    }
    lines.join("\n")
}

pub fn group_info(payload: &Value) -> String {
    let group = data(payload);
    format!(
        "Group\n\
         Name: {}\n\
         ID: {}\n\
         Login: {}\n\
         Description: {}\n\
         Members: {}\n\
         Created: {}\n\
         Updated: {}",
        field(group, "name", UNKNOWN),
        field(group, "id", UNKNOWN),
        field(group, "login", UNKNOWN),
        field(group, "description", "(none)"),
        count(group, "members_count"),
        field(group, "created_at", UNKNOWN),
        field(group, "updated_at", UNKNOWN),
    )
}

pub fn group_users(payload: &Value, group_id: i64) -> String {
    let members = items(data(payload));
    if members.is_empty() {
        return format!("Group {} has no members.", group_id);
    }

    let mut lines = vec![format!("Members of group {}:", group_id)];
    for member in members {
        // membership records nest the account under `user`
        let user = member.get("user").filter(|u| u.is_object()).unwrap_or(member);
        lines.push(format!(
            "- {} ({}) role: {}",
            field(user, "name", UNKNOWN),
            field(user, "login", UNKNOWN),
            role_name(member.get("role").and_then(Value::as_i64))
        ));
    }
    lines.join("\n")
}

pub fn role_name(role: Option<i64>) -> &'static str {
    match role {
        Some(0) => "admin",
        Some(1) => "member",
        Some(2) => "read-only",
        _ => "member",
    }
}

pub fn repo_toc(payload: &Value) -> String {
    let toc = match data(payload) {
        Value::String(text) => text.clone(),
        obj @ Value::Object(_) => ["toc_yml", "toc_yaml", "toc"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        Value::Array(nodes) if !nodes.is_empty() => nodes
            .iter()
            .map(|node| {
                let depth = node
                    .get("level")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .min(MAX_TOC_DEPTH as u64) as usize;
                format!("{}- {}", "  ".repeat(depth), field(node, "title", "(untitled)"))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };
    if toc.trim().is_empty() {
        return "The table of contents is empty.".to_string();
    }

    let lines: Vec<&str> = toc.lines().collect();
    let mut out = vec!["Table of contents:".to_string()];
    out.extend(lines.iter().take(TOC_LINES).map(|l| l.to_string()));
    if lines.len() > TOC_LINES {
        out.push("...".to_string());
    }
    out.join("\n")
}

pub fn group_statistics(payload: &Value) -> String {
    let stats = data(payload);
    if !stats.is_object() || stats.as_object().is_some_and(|m| m.is_empty()) {
        return "No statistics available for this group.".to_string();
    }
    [
        "Group statistics".to_string(),
        format!("Members: {}", field(stats, "member_count", UNKNOWN)),
        format!(
            "Repositories: {} (public {})",
            field(stats, "book_count", UNKNOWN),
            field(stats, "public_book_count", UNKNOWN)
        ),
        format!("Documents: {}", field(stats, "doc_count", UNKNOWN)),
        format!(
            "Last 30 days: {} reads, {} edits",
            field(stats, "read_count_30", UNKNOWN),
            field(stats, "write_count_30", UNKNOWN)
        ),
        format!(
            "Likes: {} | Comments: {}",
            field(stats, "like_count", UNKNOWN),
            field(stats, "comment_count", UNKNOWN)
        ),
        format!("Storage used: {}", field(stats, "data_usage", UNKNOWN)),
    ]
    .join("\n")
}

/// Rows of a statistics listing, found under the first present key
fn stat_rows<'a>(payload: &'a Value, keys: &[&str]) -> Vec<&'a Value> {
    let stats = data(payload);
    keys.iter()
        .filter_map(|key| stats.get(*key))
        .map(items)
        .find(|rows| !rows.is_empty())
        .unwrap_or_else(|| if stats.is_array() { items(stats) } else { Vec::new() })
}

fn stat_total(payload: &Value) -> Option<i64> {
    data(payload).get("total").and_then(Value::as_i64).filter(|t| *t > 0)
}

pub fn group_member_stats(payload: &Value) -> String {
    let rows = stat_rows(payload, &["members"]);
    if rows.is_empty() {
        return "No member statistics found.".to_string();
    }
    let mut lines = vec![format!("Member activity (top {}):", LIST_LIMIT)];
    for row in rows.iter().take(LIST_LIMIT) {
        lines.push(format!(
            "- {} | {} edits | {} reads | {} likes",
            nested(row, "user", "name"),
            count(row, "write_count"),
            count(row, "read_count"),
            count(row, "like_count")
        ));
    }
    if let Some(total) = stat_total(payload) {
        lines.push(format!("{} members in total", total));
    }
    lines.join("\n")
}

pub fn group_book_stats(payload: &Value) -> String {
    let rows = stat_rows(payload, &["books"]);
    if rows.is_empty() {
        return "No repository statistics found.".to_string();
    }
    let mut lines = vec![format!("Repository statistics (top {}):", LIST_LIMIT)];
    for row in rows.iter().take(LIST_LIMIT) {
        lines.push(format!(
            "- {} | {} reads | {} edits | {} likes",
            field(row, "name", "(unnamed)"),
            count(row, "read_count"),
            count(row, "write_count"),
            count(row, "like_count")
        ));
    }
    if let Some(total) = stat_total(payload) {
        lines.push(format!("{} repositories in total", total));
    }
    lines.join("\n")
}

pub fn group_doc_stats(payload: &Value) -> String {
    let rows = stat_rows(payload, &["docs", "documents"]);
    if rows.is_empty() {
        return "No document statistics found.".to_string();
    }
    let mut lines = vec![format!("Document statistics (top {}):", LIST_LIMIT)];
    for row in rows.iter().take(LIST_LIMIT) {
        lines.push(format!(
            "- {} | {} reads | {} comments | {} likes",
            field(row, "title", "(untitled)"),
            count(row, "read_count"),
            count(row, "comment_count"),
            count(row, "like_count")
        ));
    }
    if let Some(total) = stat_total(payload) {
        lines.push(format!("{} documents in total", total));
    }
    lines.join("\n")
}
