//! Group (team) tools

use serde_json::{json, Value};

use super::{Arguments, Operation, ToolOutput, ToolSpec};
use crate::client::UpstreamRequest;
use crate::endpoint::{self, PathTemplate};
use crate::error::McpResult;
use crate::format;

/// list_groups tool definition
pub fn list_groups_tool() -> ToolSpec {
    ToolSpec::new(
        "list_groups",
        "List the groups the current user belongs to.",
        json!({"type": "object", "properties": {}}),
        |_| Ok(Operation::ForCurrentUser(endpoint::USER_GROUPS)),
        |output, _| format::group_list(&output.data),
    )
}

/// get_group tool definition
pub fn get_group_tool() -> ToolSpec {
    ToolSpec::new(
        "get_group",
        "Get a group by ID.",
        json!({
            "type": "object",
            "properties": {
                "group_id": {"type": "integer", "description": "Group ID"}
            },
            "required": ["group_id"]
        }),
        |args| {
            let path = endpoint::GROUP.render(&[("group_id", args.int("group_id")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        |output, _| format::group_info(&output.data),
    )
}

/// list_group_users tool definition
pub fn list_group_users_tool() -> ToolSpec {
    ToolSpec::new(
        "list_group_users",
        "List the members of a group.",
        json!({
            "type": "object",
            "properties": {
                "group_id": {"type": "integer", "description": "Group ID"}
            },
            "required": ["group_id"]
        }),
        |args| {
            let path = endpoint::GROUP_USERS.render(&[("group_id", args.int("group_id")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        |output, args| format::group_users(&output.data, args.opt_int("group_id").unwrap_or_default()),
    )
}

fn member_path(args: &Arguments) -> McpResult<String> {
    endpoint::GROUP_MEMBER.render(&[
        ("group_login", args.str("group_login")?.into()),
        ("user_identity", args.str("user_identity")?.into()),
    ])
}

/// update_group_member tool definition
pub fn update_group_member_tool() -> ToolSpec {
    ToolSpec::new(
        "update_group_member",
        "Change the role of a group member.",
        json!({
            "type": "object",
            "properties": {
                "group_login": {"type": "string", "description": "Group login or ID"},
                "user_identity": {"type": "string", "description": "Member login or ID"},
                "role": {
                    "type": "integer",
                    "enum": [0, 1, 2],
                    "description": "Role: 0 admin, 1 member, 2 read-only"
                }
            },
            "required": ["group_login", "user_identity", "role"]
        }),
        |args| {
            let body = json!({ "role": args.int("role")? });
            Ok(Operation::Single(UpstreamRequest::put(member_path(args)?, body)))
        },
        |_, args| {
            format!(
                "{} is now {} in {}.",
                args.opt_str("user_identity").unwrap_or_default(),
                format::role_name(args.opt_int("role")),
                args.opt_str("group_login").unwrap_or_default()
            )
        },
    )
}

/// remove_group_member tool definition
pub fn remove_group_member_tool() -> ToolSpec {
    ToolSpec::new(
        "remove_group_member",
        "Remove a member from a group.",
        json!({
            "type": "object",
            "properties": {
                "group_login": {"type": "string", "description": "Group login or ID"},
                "user_identity": {"type": "string", "description": "Member login or ID"}
            },
            "required": ["group_login", "user_identity"]
        }),
        |args| Ok(Operation::Single(UpstreamRequest::delete(member_path(args)?))),
        |_, args| {
            format!(
                "{} removed from {}.",
                args.opt_str("user_identity").unwrap_or_default(),
                args.opt_str("group_login").unwrap_or_default()
            )
        },
    )
}

/// get_group_statistics tool definition
pub fn get_group_statistics_tool() -> ToolSpec {
    ToolSpec::new(
        "get_group_statistics",
        "Get summary statistics of a group.",
        json!({
            "type": "object",
            "properties": {
                "group_login": {"type": "string", "description": "Group login or ID"}
            },
            "required": ["group_login"]
        }),
        |args| stats_request(endpoint::GROUP_STATISTICS, args, &[]),
        |output, _| format::group_statistics(&output.data),
    )
}

const MEMBER_STAT_FILTERS: &[&str] = &["name", "range", "page", "limit", "sortField", "sortOrder"];
const BOOK_STAT_FILTERS: &[&str] = &["name", "range", "page", "limit"];
const DOC_STAT_FILTERS: &[&str] = &["title", "range", "page", "limit"];

/// get_group_member_stats tool definition
pub fn get_group_member_stats_tool() -> ToolSpec {
    ToolSpec::new(
        "get_group_member_stats",
        "Get per-member activity statistics of a group.",
        stats_schema(
            ("name", "Member name filter"),
            json!({
                "sortField": {
                    "type": "string",
                    "enum": ["write_doc_count", "write_count", "read_count", "like_count"],
                    "description": "Sort field"
                },
                "sortOrder": {"type": "string", "enum": ["asc", "desc"], "description": "Sort direction"}
            }),
        ),
        |args| stats_request(endpoint::GROUP_MEMBER_STATISTICS, args, MEMBER_STAT_FILTERS),
        render_member_stats,
    )
}

fn render_member_stats(output: &ToolOutput, _: &Arguments) -> String {
    format::group_member_stats(&output.data)
}

/// get_group_book_stats tool definition
pub fn get_group_book_stats_tool() -> ToolSpec {
    ToolSpec::new(
        "get_group_book_stats",
        "Get per-repository statistics of a group.",
        stats_schema(("name", "Repository name filter"), json!({})),
        |args| stats_request(endpoint::GROUP_BOOK_STATISTICS, args, BOOK_STAT_FILTERS),
        |output, _| format::group_book_stats(&output.data),
    )
}

/// get_group_doc_stats tool definition
pub fn get_group_doc_stats_tool() -> ToolSpec {
    ToolSpec::new(
        "get_group_doc_stats",
        "Get per-document statistics of a group.",
        stats_schema(("title", "Document title filter"), json!({})),
        |args| stats_request(endpoint::GROUP_DOC_STATISTICS, args, DOC_STAT_FILTERS),
        |output, _| format::group_doc_stats(&output.data),
    )
}

/// Shared shape of the statistics listings
fn stats_schema(filter: (&str, &str), extra: Value) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "group_login": {"type": "string", "description": "Group login or ID"},
            "range": {"type": "integer", "enum": [0, 30, 365], "description": "Time range in days (0 = all time)"},
            "page": {"type": "integer", "minimum": 1, "description": "Page number"},
            "limit": {"type": "integer", "minimum": 1, "description": "Page size"}
        },
        "required": ["group_login"]
    });
    if let Some(props) = schema["properties"].as_object_mut() {
        props.insert(filter.0.to_string(), json!({"type": "string", "description": filter.1}));
        if let Value::Object(extra) = extra {
            props.extend(extra);
        }
    }
    schema
}

fn stats_request(template: PathTemplate, args: &Arguments, filters: &[&str]) -> McpResult<Operation> {
    let path = template.render(&[("group_login", args.str("group_login")?.into())])?;
    let request = UpstreamRequest::get(path).with_query_pairs(args.query_pairs(filters));
    Ok(Operation::Single(request))
}
