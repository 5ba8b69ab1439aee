//! Repository (knowledge base) tools

use serde_json::{json, Value};

use super::{Arguments, Operation, ToolOutput, ToolSpec};
use crate::client::UpstreamRequest;
use crate::endpoint::{self, Segment};
use crate::error::{McpError, McpResult};
use crate::format;

const DEFAULT_PUBLIC: i64 = 0;
const DEFAULT_OWNER_TYPE: &str = "user";

/// list_repos tool definition
pub fn list_repos_tool() -> ToolSpec {
    ToolSpec::new(
        "list_repos",
        "List the repositories of the current user.",
        json!({"type": "object", "properties": {}}),
        |_| Ok(Operation::ForCurrentUser(endpoint::USER_REPOS)),
        render_repo_list,
    )
}

/// list_user_repos tool definition
pub fn list_user_repos_tool() -> ToolSpec {
    ToolSpec::new(
        "list_user_repos",
        "List the repositories of a user.",
        json!({
            "type": "object",
            "properties": {
                "login": {"type": "string", "description": "User login name"}
            },
            "required": ["login"]
        }),
        |args| {
            let path = endpoint::USER_REPOS.render(&[("login", args.str("login")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        render_repo_list,
    )
}

/// list_group_repos tool definition
pub fn list_group_repos_tool() -> ToolSpec {
    ToolSpec::new(
        "list_group_repos",
        "List the repositories of a group.",
        json!({
            "type": "object",
            "properties": {
                "login": {"type": "string", "description": "Group login name"}
            },
            "required": ["login"]
        }),
        |args| {
            let path = endpoint::GROUP_REPOS.render(&[("login", args.str("login")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        render_repo_list,
    )
}

fn render_repo_list(output: &ToolOutput, _: &Arguments) -> String {
    format::repo_list(&output.data)
}

/// get_repo tool definition
pub fn get_repo_tool() -> ToolSpec {
    ToolSpec::new(
        "get_repo",
        "Get repository details by namespace.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"}
            },
            "required": ["namespace"]
        }),
        |args| {
            let path = endpoint::REPO_BY_NAMESPACE.render(&[("namespace", args.namespace("namespace")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        render_repo_info,
    )
}

fn render_repo_info(output: &ToolOutput, _: &Arguments) -> String {
    format::repo_info(&output.data)
}

/// create_repo tool definition
pub fn create_repo_tool() -> ToolSpec {
    ToolSpec::new(
        "create_repo",
        "Create a repository owned by a user or a group.",
        json!({
            "type": "object",
            "properties": {
                "owner_login": {"type": "string", "description": "Login of the owning user or group"},
                "login": {"type": "string", "description": "Legacy alias of owner_login"},
                "owner_type": {
                    "type": "string",
                    "enum": ["user", "group"],
                    "default": DEFAULT_OWNER_TYPE,
                    "description": "Whether the owner is a user or a group"
                },
                "name": {"type": "string", "description": "Repository name"},
                "slug": {"type": "string", "description": "Repository path (optional)"},
                "description": {"type": "string", "description": "Repository description"},
                "public": {
                    "type": "integer",
                    "enum": [0, 1, 2],
                    "default": DEFAULT_PUBLIC,
                    "description": "Visibility: 0 private, 1 team, 2 public"
                }
            },
            "required": ["name"]
        }),
        plan_create_repo,
        |output, args| format::repo_created(&output.data, owner_login(args).unwrap_or_default()),
    )
}

fn owner_login(args: &Arguments) -> Option<&str> {
    args.opt_str("owner_login").or_else(|| args.opt_str("login"))
}

fn plan_create_repo(args: &Arguments) -> McpResult<Operation> {
    let owner = owner_login(args).ok_or_else(|| McpError::MissingArgument {
        tool: "create_repo".to_string(),
        field: "owner_login".to_string(),
    })?;
    let template = match args.opt_str("owner_type").unwrap_or(DEFAULT_OWNER_TYPE) {
        "group" => endpoint::GROUP_REPOS,
        _ => endpoint::USER_REPOS,
    };
    let path = template.render(&[("login", owner.into())])?;

    let mut body = args.pick(&["name", "slug", "description"]);
    body.insert(
        "public".to_string(),
        json!(args.opt_int("public").unwrap_or(DEFAULT_PUBLIC)),
    );
    Ok(Operation::Single(UpstreamRequest::post(path, Value::Object(body))))
}

/// `repo_id` wins over `namespace`; one of them is required
fn repo_target(tool: &str, args: &Arguments) -> McpResult<(String, String)> {
    if let Some(id) = args.opt_int("repo_id") {
        let path = endpoint::REPO_BY_ID.render(&[("repo_id", id.into())])?;
        return Ok((path, id.to_string()));
    }
    if args.is_present("namespace") {
        let namespace = args.namespace("namespace")?;
        let label = namespace.to_string();
        let path = endpoint::REPO_BY_NAMESPACE.render(&[("namespace", Segment::from(namespace))])?;
        return Ok((path, label));
    }
    Err(McpError::MissingArgument {
        tool: tool.to_string(),
        field: "repo_id or namespace".to_string(),
    })
}

/// update_repo tool definition
pub fn update_repo_tool() -> ToolSpec {
    ToolSpec::new(
        "update_repo",
        "Update a repository, addressed by repo_id or namespace.",
        json!({
            "type": "object",
            "properties": {
                "repo_id": {"type": "integer", "description": "Repository ID (or use namespace)"},
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"},
                "name": {"type": "string", "description": "New name"},
                "slug": {"type": "string", "description": "New path"},
                "description": {"type": "string", "description": "New description"},
                "public": {
                    "type": "integer",
                    "enum": [0, 1, 2],
                    "description": "Visibility: 0 private, 1 team, 2 public"
                },
                "toc": {"type": "string", "description": "Table of contents as Markdown"}
            },
            "required": []
        }),
        |args| {
            let (path, _) = repo_target("update_repo", args)?;
            let body = args.pick(&["name", "slug", "description", "public", "toc"]);
            Ok(Operation::Single(UpstreamRequest::put(path, Value::Object(body))))
        },
        render_repo_info,
    )
}

/// delete_repo tool definition
pub fn delete_repo_tool() -> ToolSpec {
    ToolSpec::new(
        "delete_repo",
        "Delete a repository, addressed by repo_id or namespace. This cannot be undone.",
        json!({
            "type": "object",
            "properties": {
                "repo_id": {"type": "integer", "description": "Repository ID (or use namespace)"},
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"}
            },
            "required": []
        }),
        |args| {
            let (path, _) = repo_target("delete_repo", args)?;
            Ok(Operation::Single(UpstreamRequest::delete(path)))
        },
        |_, args| match repo_target("delete_repo", args) {
            Ok((_, label)) => format!("Repository {} deleted.", label),
            Err(_) => "Repository deleted.".to_string(),
        },
    )
}

/// get_repo_toc tool definition
pub fn get_repo_toc_tool() -> ToolSpec {
    ToolSpec::new(
        "get_repo_toc",
        "Show the table of contents of a repository.",
        json!({
            "type": "object",
            "properties": {
                "repo_id": {"type": "integer", "description": "Repository ID"}
            },
            "required": ["repo_id"]
        }),
        |args| {
            let path = endpoint::REPO_TOC.render(&[("repo_id", args.int("repo_id")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        |output, _| format::repo_toc(&output.data),
    )
}

/// update_repo_toc tool definition
pub fn update_repo_toc_tool() -> ToolSpec {
    ToolSpec::new(
        "update_repo_toc",
        "Replace the table of contents of a repository (Markdown).",
        json!({
            "type": "object",
            "properties": {
                "repo_id": {"type": "integer", "description": "Repository ID"},
                "toc": {"type": "string", "description": "Table of contents as Markdown"}
            },
            "required": ["repo_id", "toc"]
        }),
        |args| {
            let path = endpoint::REPO_BY_ID.render(&[("repo_id", args.int("repo_id")?.into())])?;
            let body = json!({ "toc": args.str("toc")? });
            Ok(Operation::Single(UpstreamRequest::put(path, body)))
        },
        |_, args| match args.opt_int("repo_id") {
            Some(id) => format!("Table of contents of repository {} updated.", id),
            None => "Table of contents updated.".to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpMethod;

    fn plan(spec: ToolSpec, args: Value) -> McpResult<Operation> {
        (spec.plan)(&Arguments::from_value(args).unwrap())
    }

    fn single(op: Operation) -> UpstreamRequest {
        match op {
            Operation::Single(request) => request,
            other => panic!("expected a single call, got {:?}", other),
        }
    }

    #[test]
    fn test_create_repo_defaults() {
        let req = single(plan(create_repo_tool(), json!({"name": "KB", "login": "ada"})).unwrap());
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/users/ada/repos");
        assert_eq!(req.body, Some(json!({"name": "KB", "public": 0})));
    }

    #[test]
    fn test_create_repo_for_group() {
        let req = single(
            plan(
                create_repo_tool(),
                json!({"name": "KB", "owner_login": "team", "owner_type": "group", "public": 2, "slug": "kb"}),
            )
            .unwrap(),
        );
        assert_eq!(req.path, "/groups/team/repos");
        assert_eq!(req.body, Some(json!({"name": "KB", "slug": "kb", "public": 2})));
    }

    #[test]
    fn test_create_repo_needs_owner() {
        let err = plan(create_repo_tool(), json!({"name": "KB"})).unwrap_err();
        assert!(matches!(err, McpError::MissingArgument { ref field, .. } if field == "owner_login"));
    }

    #[test]
    fn test_update_repo_prefers_id() {
        let req = single(
            plan(update_repo_tool(), json!({"repo_id": 9, "namespace": "a/b", "name": "New"})).unwrap(),
        );
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/repos/9");
        assert_eq!(req.body, Some(json!({"name": "New"})));
    }

    #[test]
    fn test_delete_repo_by_namespace_or_nothing() {
        let req = single(plan(delete_repo_tool(), json!({"namespace": "a/b"})).unwrap());
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "/repos/a/b");

        let err = plan(delete_repo_tool(), json!({})).unwrap_err();
        assert!(err.to_string().contains("repo_id or namespace"));
    }

    #[test]
    fn test_list_repos_resolves_current_user() {
        let op = plan(list_repos_tool(), json!({})).unwrap();
        assert_eq!(op, Operation::ForCurrentUser(endpoint::USER_REPOS));
    }

    #[test]
    fn test_update_toc_body() {
        let req = single(plan(update_repo_toc_tool(), json!({"repo_id": 3, "toc": "- a"})).unwrap());
        assert_eq!(req.path, "/repos/3");
        assert_eq!(req.body, Some(json!({"toc": "- a"})));
    }
}
