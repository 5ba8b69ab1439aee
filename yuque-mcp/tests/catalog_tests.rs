//! ToolCatalog tests

use serde_json::{json, Value};
use yuque_mcp::tools::Operation;
use yuque_mcp::{Arguments, HttpMethod, McpError, ToolCatalog};

const EXPECTED_TOOLS: [&str; 29] = [
    "get_user_info",
    "get_user",
    "list_repos",
    "list_user_repos",
    "list_group_repos",
    "get_repo",
    "create_repo",
    "update_repo",
    "delete_repo",
    "list_docs",
    "get_doc",
    "get_doc_by_id",
    "list_doc_versions",
    "get_doc_version",
    "create_doc",
    "update_doc",
    "delete_doc",
    "search_docs",
    "list_groups",
    "get_group",
    "list_group_users",
    "update_group_member",
    "remove_group_member",
    "get_group_statistics",
    "get_group_member_stats",
    "get_group_book_stats",
    "get_group_doc_stats",
    "get_repo_toc",
    "update_repo_toc",
];

fn args(value: Value) -> Arguments {
    Arguments::from_value(value).unwrap()
}

#[test]
fn test_catalog_order() {
    let catalog = ToolCatalog::new().unwrap();
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names, EXPECTED_TOOLS);
}

#[test]
fn test_required_fields_are_declared_properties() {
    let catalog = ToolCatalog::new().unwrap();
    for name in EXPECTED_TOOLS {
        let tool = catalog.get(name).unwrap();
        let properties = tool.definition().input_schema["properties"].as_object().unwrap();
        for field in tool.required() {
            assert!(properties.contains_key(field), "{}.{} is not declared", name, field);
        }
    }
}

#[test]
fn test_listing_uses_input_schema_key() {
    let catalog = ToolCatalog::new().unwrap();
    let first = &catalog.listing()["tools"][0];
    assert_eq!(first["name"], "get_user_info");
    assert!(first.get("inputSchema").is_some());
    assert!(first.get("input_schema").is_none());
    assert!(first["description"].as_str().is_some_and(|d| !d.is_empty()));
}

#[test]
fn test_declared_defaults() {
    let catalog = ToolCatalog::new().unwrap();
    let schema = |tool: &str, field: &str| {
        catalog.get(tool).unwrap().definition().input_schema["properties"][field]["default"].clone()
    };
    assert_eq!(schema("create_doc", "format"), json!("markdown"));
    assert_eq!(schema("search_docs", "type"), json!("doc"));
    assert_eq!(schema("create_repo", "public"), json!(0));
    assert_eq!(schema("create_repo", "owner_type"), json!("user"));
}

#[test]
fn test_required_sets() {
    let catalog = ToolCatalog::new().unwrap();
    let required = |tool: &str| catalog.get(tool).unwrap().required().to_vec();
    assert_eq!(required("create_doc"), vec!["namespace", "title", "content"]);
    assert_eq!(required("update_group_member"), vec!["group_login", "user_identity", "role"]);
    assert_eq!(required("update_repo_toc"), vec!["repo_id", "toc"]);
    assert!(required("update_repo").is_empty());
    assert!(required("list_groups").is_empty());
}

#[test]
fn test_plan_rejects_blank_required_string() {
    let catalog = ToolCatalog::new().unwrap();
    let err = catalog
        .get("get_user")
        .unwrap()
        .plan(&args(json!({"login": "   "})))
        .unwrap_err();
    assert!(matches!(err, McpError::MissingArgument { ref field, .. } if field == "login"));
}

#[test]
fn test_plan_rejects_malformed_namespace_for_every_namespace_tool() {
    let catalog = ToolCatalog::new().unwrap();
    let cases = [
        ("get_repo", json!({"namespace": "handbook"})),
        ("list_docs", json!({"namespace": "a/b/c"})),
        ("get_doc", json!({"namespace": "handbook", "slug": "intro"})),
        ("create_doc", json!({"namespace": "handbook", "title": "t", "content": "c"})),
        ("update_doc", json!({"namespace": "handbook", "doc_id": 1, "title": "t"})),
        ("delete_doc", json!({"namespace": "handbook", "doc_id": 1})),
        ("update_repo", json!({"namespace": "handbook"})),
        ("delete_repo", json!({"namespace": "handbook"})),
    ];
    for (tool, arguments) in cases {
        let err = catalog.get(tool).unwrap().plan(&args(arguments)).unwrap_err();
        assert!(
            matches!(err, McpError::InvalidArgument { ref field, .. } if field == "namespace"),
            "{} accepted a malformed namespace",
            tool
        );
    }
}

#[test]
fn test_plan_document_update() {
    let catalog = ToolCatalog::new().unwrap();
    let op = catalog
        .get("update_doc")
        .unwrap()
        .plan(&args(json!({"namespace": "team/kb", "doc_id": 77, "title": "New", "content": "Body", "format": "lake"})))
        .unwrap();

    let Operation::Single(request) = op else {
        panic!("expected a single call");
    };
    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(request.path, "/repos/team/kb/docs/77");
    assert_eq!(request.body, Some(json!({"title": "New", "body": "Body", "format": "lake"})));
}

#[test]
fn test_plan_version_listing_uses_query() {
    let catalog = ToolCatalog::new().unwrap();
    let op = catalog
        .get("list_doc_versions")
        .unwrap()
        .plan(&args(json!({"doc_id": 9})))
        .unwrap();

    let Operation::Single(request) = op else {
        panic!("expected a single call");
    };
    assert_eq!(request.path, "/doc_versions");
    assert_eq!(request.query, vec![("doc_id".to_string(), "9".to_string())]);
}

#[test]
fn test_unknown_properties_are_ignored() {
    let catalog = ToolCatalog::new().unwrap();
    let op = catalog
        .get("get_user")
        .unwrap()
        .plan(&args(json!({"login": "ada", "verbose": true})));
    assert!(op.is_ok());
}
