//! MCP tool catalog
//!
//! These are the tools exposed to agents through the MCP protocol. Each tool
//! is a [`ToolSpec`]: a definition (name, description, JSON Schema), a plan
//! function turning validated [`Arguments`] into an upstream [`Operation`],
//! and a render function turning the upstream payload into the text block
//! returned to the agent.
//!
//! The catalog is built once, is immutable afterwards and is shared by every
//! request; schemas are compiled at construction.

pub mod args;
mod doc;
mod group;
mod repo;
mod user;

use std::collections::{HashMap, HashSet};
use std::fmt;

use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{Credential, UpstreamClient, UpstreamOutcome, UpstreamRequest};
use crate::endpoint::{self, PathTemplate};
use crate::error::{McpError, McpResult};

pub use args::Arguments;

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub type PlanFn = fn(&Arguments) -> McpResult<Operation>;
pub type RenderFn = fn(&ToolOutput, &Arguments) -> String;

/// Declarative description of one tool
#[derive(Clone)]
pub struct ToolSpec {
    pub definition: ToolDefinition,
    pub plan: PlanFn,
    pub render: RenderFn,
}

impl ToolSpec {
    pub fn new(
        name: &str,
        description: &str,
        input_schema: Value,
        plan: PlanFn,
        render: RenderFn,
    ) -> Self {
        Self {
            definition: ToolDefinition {
                name: name.to_string(),
                description: description.to_string(),
                input_schema,
            },
            plan,
            render,
        }
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

/// Upstream work for one tool call
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// One call
    Single(UpstreamRequest),
    /// `GET /user`, then GET the template with `{login}` bound to the
    /// current user's login
    ForCurrentUser(PathTemplate),
    /// A primary call plus a best-effort call for display context.
    /// Failure of the context call is logged and ignored.
    WithContext {
        primary: UpstreamRequest,
        context: UpstreamRequest,
    },
}

impl Operation {
    pub async fn execute(
        &self,
        client: &dyn UpstreamClient,
        credential: &Credential,
    ) -> McpResult<ToolOutput> {
        match self {
            Operation::Single(request) => {
                let data = client.execute(credential, request).await.into_result()?;
                Ok(ToolOutput::new(data))
            }
            Operation::ForCurrentUser(template) => {
                let me = UpstreamRequest::get(endpoint::CURRENT_USER.render(&[])?);
                let user = client.execute(credential, &me).await.into_result()?;
                let login = user
                    .pointer("/data/login")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        McpError::UnexpectedResponse("current user payload has no login".to_string())
                    })?;
                let request = UpstreamRequest::get(template.render(&[("login", login.into())])?);
                let data = client.execute(credential, &request).await.into_result()?;
                Ok(ToolOutput::new(data))
            }
            Operation::WithContext { primary, context } => {
                let data = client.execute(credential, primary).await.into_result()?;
                let context = match client.execute(credential, context).await {
                    UpstreamOutcome::Success(value) => Some(value),
                    failure => {
                        tracing::warn!(path = %context.path, outcome = ?failure, "context lookup failed");
                        None
                    }
                };
                Ok(ToolOutput { data, context })
            }
        }
    }
}

/// Upstream payloads handed to a render function
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub data: Value,
    pub context: Option<Value>,
}

impl ToolOutput {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            context: None,
        }
    }
}

/// A catalog entry with its compiled schema
pub struct Tool {
    spec: ToolSpec,
    validator: JSONSchema,
    required: Vec<String>,
}

impl Tool {
    fn compile(spec: ToolSpec) -> McpResult<Self> {
        let name = spec.definition.name.clone();
        let schema = &spec.definition.input_schema;

        let properties: HashSet<&str> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let required: Vec<String> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if let Some(field) = required.iter().find(|f| !properties.contains(f.as_str())) {
            return Err(McpError::Internal(format!(
                "tool '{}' requires undeclared property '{}'",
                name, field
            )));
        }

        let validator = JSONSchema::compile(schema).map_err(|e| {
            McpError::Internal(format!("tool '{}' has an invalid input schema: {}", name, e))
        })?;

        Ok(Self {
            spec,
            validator,
            required,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.spec.definition
    }

    /// Fields from the schema's `required` list
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Required fields first, then the schema (types, enums)
    pub fn validate(&self, args: &Arguments) -> McpResult<()> {
        if let Some(field) = self.required.iter().find(|f| !args.is_present(f)) {
            return Err(McpError::MissingArgument {
                tool: self.name().to_string(),
                field: field.clone(),
            });
        }

        let instance = args.as_value();
        if let Err(mut errors) = self.validator.validate(&instance) {
            if let Some(error) = errors.next() {
                let path = error.instance_path.to_string();
                let field = path
                    .trim_start_matches('/')
                    .split('/')
                    .next()
                    .filter(|f| !f.is_empty())
                    .unwrap_or("arguments")
                    .to_string();
                return Err(McpError::invalid_argument(field, error.to_string()));
            }
        }
        Ok(())
    }

    /// Validate and build the upstream operation; no I/O
    pub fn plan(&self, args: &Arguments) -> McpResult<Operation> {
        self.validate(args)?;
        (self.spec.plan)(args)
    }

    pub async fn call(
        &self,
        client: &dyn UpstreamClient,
        credential: &Credential,
        args: &Arguments,
    ) -> McpResult<String> {
        let operation = self.plan(args)?;
        let output = operation.execute(client, credential).await?;
        Ok((self.spec.render)(&output, args))
    }
}

/// Immutable set of tools, in declaration order
pub struct ToolCatalog {
    tools: Vec<Tool>,
    index: HashMap<String, usize>,
    listing: Value,
}

impl ToolCatalog {
    /// The Yuque tool set
    pub fn new() -> McpResult<Self> {
        Self::from_specs(builtin_specs())
    }

    pub fn from_specs(specs: Vec<ToolSpec>) -> McpResult<Self> {
        let mut tools = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            let tool = Tool::compile(spec)?;
            if index.insert(tool.name().to_string(), tools.len()).is_some() {
                return Err(McpError::Internal(format!("duplicate tool name '{}'", tool.name())));
            }
            tools.push(tool);
        }

        let definitions: Vec<&ToolDefinition> = tools.iter().map(Tool::definition).collect();
        let listing = json!({ "tools": definitions });

        Ok(Self {
            tools,
            index,
            listing,
        })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(Tool::name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(Tool::definition)
    }

    /// The `tools/list` result, computed once
    pub fn listing(&self) -> &Value {
        &self.listing
    }

    /// Look up, validate, execute and render one tool call
    pub async fn call(
        &self,
        client: &dyn UpstreamClient,
        credential: &Credential,
        name: &str,
        arguments: Value,
    ) -> McpResult<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;
        let args = Arguments::from_value(arguments)?;
        tool.call(client, credential, &args).await
    }
}

impl fmt::Debug for ToolCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCatalog")
            .field("tools", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// All Yuque tools, in listing order
fn builtin_specs() -> Vec<ToolSpec> {
    vec![
        user::get_user_info_tool(),
        user::get_user_tool(),
        repo::list_repos_tool(),
        repo::list_user_repos_tool(),
        repo::list_group_repos_tool(),
        repo::get_repo_tool(),
        repo::create_repo_tool(),
        repo::update_repo_tool(),
        repo::delete_repo_tool(),
        doc::list_docs_tool(),
        doc::get_doc_tool(),
        doc::get_doc_by_id_tool(),
        doc::list_doc_versions_tool(),
        doc::get_doc_version_tool(),
        doc::create_doc_tool(),
        doc::update_doc_tool(),
        doc::delete_doc_tool(),
        doc::search_docs_tool(),
        group::list_groups_tool(),
        group::get_group_tool(),
        group::list_group_users_tool(),
        group::update_group_member_tool(),
        group::remove_group_member_tool(),
        group::get_group_statistics_tool(),
        group::get_group_member_stats_tool(),
        group::get_group_book_stats_tool(),
        group::get_group_doc_stats_tool(),
        repo::get_repo_toc_tool(),
        repo::update_repo_toc_tool(),
    ]
}
