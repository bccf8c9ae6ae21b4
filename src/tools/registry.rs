use crate::types::{AppError, Result, ToolDefinition};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tool name the router uses when no capability fits. Never registrable.
pub const FALLBACK_TOOL: &str = "fallback";

/// Primitive type tag of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ArgType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Number => "number",
            ArgType::Integer => "integer",
            ArgType::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgType::String => value.is_string(),
            ArgType::Number => value.is_number(),
            ArgType::Integer => value.is_i64() || value.is_u64(),
            ArgType::Boolean => value.is_boolean(),
        }
    }
}

/// One declared argument of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgType,
}

impl ArgSpec {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: ArgType::String,
        }
    }
}

/// Why a tool invocation failed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("missing credentials: {0} is not set")]
    MissingCredentials(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("unexpected upstream response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ToolError::Upstream(format!("request timed out: {}", err))
        } else if err.is_decode() {
            ToolError::UnexpectedResponse(err.to_string())
        } else {
            ToolError::Upstream(err.to_string())
        }
    }
}

/// Arguments that passed schema validation.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn str(&self, name: &str) -> std::result::Result<&str, ToolError> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' must be a string", name)))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Check `arguments` against a tool's declared schema.
///
/// Every declared argument must be present with the declared type, and no
/// undeclared argument may appear.
pub fn validate_arguments(
    specs: &[ArgSpec],
    arguments: &Map<String, Value>,
) -> std::result::Result<ToolArgs, ToolError> {
    for spec in specs {
        match arguments.get(spec.name) {
            None | Some(Value::Null) => {
                return Err(ToolError::InvalidArguments(format!(
                    "missing argument '{}'",
                    spec.name
                )));
            }
            Some(value) if !spec.kind.accepts(value) => {
                return Err(ToolError::InvalidArguments(format!(
                    "argument '{}' must be a {}",
                    spec.name,
                    spec.kind.as_str()
                )));
            }
            Some(_) => {}
        }
    }

    if let Some(extra) = arguments
        .keys()
        .find(|key| !specs.iter().any(|spec| spec.name == key.as_str()))
    {
        return Err(ToolError::InvalidArguments(format!(
            "unexpected argument '{}'",
            extra
        )));
    }

    Ok(ToolArgs(arguments.clone()))
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn arguments(&self) -> &[ArgSpec];

    /// Argument schema as shown to the model: `{"<arg>": {"type": "<tag>"}}`.
    fn parameters_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .arguments()
            .iter()
            .map(|spec| (spec.name.to_string(), json!({ "type": spec.kind.as_str() })))
            .collect();
        Value::Object(properties)
    }

    async fn execute(&self, args: ToolArgs) -> std::result::Result<String, ToolError>;
}

/// Immutable name → tool mapping, built once at startup.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    /// Validate `arguments` and run the named tool.
    pub async fn execute(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let args = validate_arguments(tool.arguments(), arguments)?;
        tool.execute(args).await
    }

    /// Get a list of all registered tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Builder for creating ToolRegistry with fluent API
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Freeze the registry. Fails on duplicate names or the reserved
    /// fallback name.
    pub fn build(self) -> Result<ToolRegistry> {
        let mut tools: BTreeMap<String, Arc<dyn Tool>> = BTreeMap::new();
        for tool in self.tools {
            let name = tool.name().to_string();
            if name == FALLBACK_TOOL {
                return Err(AppError::InvalidInput(format!(
                    "'{}' is reserved and cannot be registered as a tool",
                    FALLBACK_TOOL
                )));
            }
            if tools.insert(name.clone(), tool).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Tool '{}' registered twice",
                    name
                )));
            }
        }
        Ok(ToolRegistry { tools })
    }
}

impl Default for ToolRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
