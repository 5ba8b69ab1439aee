//! Document tools

use serde_json::{json, Map, Value};

use super::{Arguments, Operation, ToolSpec};
use crate::client::UpstreamRequest;
use crate::endpoint::{self, Segment};
use crate::error::{McpError, McpResult};
use crate::format;

const DEFAULT_FORMAT: &str = "markdown";
const DEFAULT_SEARCH_TYPE: &str = "doc";

const GET_DOC_ALTERNATIVE: &str = "get_doc(namespace, slug) with values taken from search_docs results";
const GET_DOC_SUGGESTION: &str = "The Yuque API cannot fetch a document by its numeric ID alone.\n\
1. Call search_docs and read the namespace (owner/repo) and slug of the document from the result.\n\
2. Call get_doc(namespace=\"owner/repo\", slug=\"doc-slug\").\n\
Alternatively call list_docs(namespace) to find the slug within a known repository.";

/// list_docs tool definition
pub fn list_docs_tool() -> ToolSpec {
    ToolSpec::new(
        "list_docs",
        "List the documents of a repository.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"}
            },
            "required": ["namespace"]
        }),
        |args| {
            let path = endpoint::REPO_DOCS.render(&[("namespace", args.namespace("namespace")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        |output, args| format::doc_list(&output.data, args.opt_str("namespace").unwrap_or_default()),
    )
}

/// get_doc tool definition
pub fn get_doc_tool() -> ToolSpec {
    ToolSpec::new(
        "get_doc",
        "Get a document with its full Markdown body. Take namespace and slug from search_docs or list_docs results.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace (from search results)"},
                "slug": {"type": "string", "description": "Document slug (from search results)"},
                "raw": {
                    "type": "boolean",
                    "default": false,
                    "description": "Ask for the raw Markdown source; try this when only a preview comes back"
                }
            },
            "required": ["namespace", "slug"]
        }),
        plan_get_doc,
        |output, args| {
            format::doc_content(
                &output.data,
                output.context.as_ref(),
                args.opt_str("namespace").unwrap_or_default(),
                args.opt_str("slug").unwrap_or_default(),
            )
        },
    )
}

fn plan_get_doc(args: &Arguments) -> McpResult<Operation> {
    let namespace = args.namespace("namespace")?;
    let slug = args.str("slug")?;

    let mut primary = UpstreamRequest::get(endpoint::DOC_BY_SLUG.render(&[
        ("namespace", Segment::from(namespace.clone())),
        ("slug", slug.into()),
    ])?);
    if args.opt_bool("raw").unwrap_or(false) {
        primary = primary.with_query("raw", "1");
    }
    let context = UpstreamRequest::get(endpoint::REPO_BY_NAMESPACE.render(&[("namespace", namespace.into())])?);
    Ok(Operation::WithContext { primary, context })
}

/// get_doc_by_id tool definition
pub fn get_doc_by_id_tool() -> ToolSpec {
    ToolSpec::new(
        "get_doc_by_id",
        "Get a document by numeric ID. The Yuque API has no such endpoint; this tool always answers with instructions for get_doc.",
        json!({
            "type": "object",
            "properties": {
                "doc_id": {"type": "integer", "description": "Document ID (from search results)"}
            },
            "required": ["doc_id"]
        }),
        |args| {
            Err(McpError::UnsupportedAddressing {
                tool: "get_doc_by_id".to_string(),
                argument: "doc_id".to_string(),
                value: args.get("doc_id").cloned().unwrap_or(Value::Null),
                alternative: GET_DOC_ALTERNATIVE.to_string(),
                suggestion: GET_DOC_SUGGESTION.to_string(),
            })
        },
        |_, _| String::new(),
    )
}

/// list_doc_versions tool definition
pub fn list_doc_versions_tool() -> ToolSpec {
    ToolSpec::new(
        "list_doc_versions",
        "List the version history of a document.",
        json!({
            "type": "object",
            "properties": {
                "doc_id": {"type": "integer", "description": "Document ID"}
            },
            "required": ["doc_id"]
        }),
        |args| {
            let request = UpstreamRequest::get(endpoint::DOC_VERSIONS.render(&[])?)
                .with_query("doc_id", args.int("doc_id")?.to_string());
            Ok(Operation::Single(request))
        },
        |output, args| format::doc_versions(&output.data, args.opt_int("doc_id").unwrap_or_default()),
    )
}

/// get_doc_version tool definition
pub fn get_doc_version_tool() -> ToolSpec {
    ToolSpec::new(
        "get_doc_version",
        "Get one version of a document.",
        json!({
            "type": "object",
            "properties": {
                "version_id": {"type": "integer", "description": "Version ID"}
            },
            "required": ["version_id"]
        }),
        |args| {
            let path = endpoint::DOC_VERSION.render(&[("version_id", args.int("version_id")?.into())])?;
            Ok(Operation::Single(UpstreamRequest::get(path)))
        },
        |output, _| format::doc_version_detail(&output.data),
    )
}

/// create_doc tool definition
pub fn create_doc_tool() -> ToolSpec {
    ToolSpec::new(
        "create_doc",
        "Create a document in a repository.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"},
                "title": {"type": "string", "description": "Document title"},
                "content": {"type": "string", "description": "Document body"},
                "format": {
                    "type": "string",
                    "enum": ["markdown", "lake"],
                    "default": DEFAULT_FORMAT,
                    "description": "Body format"
                }
            },
            "required": ["namespace", "title", "content"]
        }),
        |args| {
            let path = endpoint::REPO_DOCS.render(&[("namespace", args.namespace("namespace")?.into())])?;
            let body = json!({
                "title": args.str("title")?,
                "format": args.opt_str("format").unwrap_or(DEFAULT_FORMAT),
                "body": args.str("content")?,
            });
            Ok(Operation::Single(UpstreamRequest::post(path, body)))
        },
        |output, args| format::doc_created(&output.data, args.opt_str("namespace").unwrap_or_default()),
    )
}

/// update_doc tool definition
pub fn update_doc_tool() -> ToolSpec {
    ToolSpec::new(
        "update_doc",
        "Update the title and/or body of a document.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"},
                "doc_id": {"type": "integer", "description": "Document ID"},
                "title": {"type": "string", "description": "New title"},
                "content": {"type": "string", "description": "New body"},
                "format": {"type": "string", "enum": ["markdown", "lake"], "description": "Body format"}
            },
            "required": ["namespace", "doc_id"]
        }),
        plan_update_doc,
        |_, args| format!("Document {} updated.", args.opt_int("doc_id").unwrap_or_default()),
    )
}

fn plan_update_doc(args: &Arguments) -> McpResult<Operation> {
    let path = doc_path(args)?;
    if !args.is_present("title") && !args.is_present("content") {
        return Err(McpError::MissingArgument {
            tool: "update_doc".to_string(),
            field: "title or content".to_string(),
        });
    }

    let mut body = Map::new();
    if let Some(title) = args.opt_str("title") {
        body.insert("title".to_string(), json!(title));
    }
    if args.is_present("content") {
        body.insert("body".to_string(), json!(args.str("content")?));
        if let Some(format) = args.opt_str("format") {
            body.insert("format".to_string(), json!(format));
        }
    }
    Ok(Operation::Single(UpstreamRequest::put(path, Value::Object(body))))
}

/// delete_doc tool definition
pub fn delete_doc_tool() -> ToolSpec {
    ToolSpec::new(
        "delete_doc",
        "Delete a document.",
        json!({
            "type": "object",
            "properties": {
                "namespace": {"type": "string", "description": "Repository namespace, e.g. team/handbook"},
                "doc_id": {"type": "integer", "description": "Document ID"}
            },
            "required": ["namespace", "doc_id"]
        }),
        |args| Ok(Operation::Single(UpstreamRequest::delete(doc_path(args)?))),
        |_, args| format!("Document {} deleted.", args.opt_int("doc_id").unwrap_or_default()),
    )
}

fn doc_path(args: &Arguments) -> McpResult<String> {
    endpoint::DOC_BY_ID.render(&[
        ("namespace", args.namespace("namespace")?.into()),
        ("doc_id", args.int("doc_id")?.into()),
    ])
}

/// search_docs tool definition
pub fn search_docs_tool() -> ToolSpec {
    ToolSpec::new(
        "search_docs",
        "Search documents or repositories. Results carry the namespace and slug needed by get_doc.",
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search keywords"},
                "type": {
                    "type": "string",
                    "enum": ["doc", "repo"],
                    "default": DEFAULT_SEARCH_TYPE,
                    "description": "What to search for"
                }
            },
            "required": ["query"]
        }),
        |args| {
            let request = UpstreamRequest::get(endpoint::SEARCH.render(&[])?)
                .with_query("q", args.str("query")?)
                .with_query("type", args.opt_str("type").unwrap_or(DEFAULT_SEARCH_TYPE));
            Ok(Operation::Single(request))
        },
        |output, args| format::search_results(&output.data, args.opt_str("query").unwrap_or_default()),
    )
}
