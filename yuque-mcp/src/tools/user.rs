//! User tools

use serde_json::json;

use super::{Arguments, Operation, ToolOutput, ToolSpec};
use crate::client::UpstreamRequest;
use crate::endpoint;
use crate::error::McpResult;
use crate::format;

/// get_user_info tool definition
pub fn get_user_info_tool() -> ToolSpec {
    ToolSpec::new(
        "get_user_info",
        "Get the Yuque user that owns the current token.",
        json!({"type": "object", "properties": {}}),
        plan_get_user_info,
        render_user,
    )
}

fn plan_get_user_info(_: &Arguments) -> McpResult<Operation> {
    Ok(Operation::Single(UpstreamRequest::get(
        endpoint::CURRENT_USER.render(&[])?,
    )))
}

/// get_user tool definition
pub fn get_user_tool() -> ToolSpec {
    ToolSpec::new(
        "get_user",
        "Get a Yuque user by login name.",
        json!({
            "type": "object",
            "properties": {
                "login": {"type": "string", "description": "Yuque login name"}
            },
            "required": ["login"]
        }),
        plan_get_user,
        render_user,
    )
}

fn plan_get_user(args: &Arguments) -> McpResult<Operation> {
    let path = endpoint::USER.render(&[("login", args.str("login")?.into())])?;
    Ok(Operation::Single(UpstreamRequest::get(path)))
}

fn render_user(output: &ToolOutput, _: &Arguments) -> String {
    format::user_info(&output.data)
}
