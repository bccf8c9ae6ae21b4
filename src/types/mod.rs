use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::llm::ProviderError;

// ============= API Request/Response Types =============

/// Body of `POST /orchestrate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrchestrationRequest {
    pub query: String,
    #[serde(default)]
    pub history: Vec<Message>,
}

/// The uniform output of every orchestration, success or failure.
///
/// `result` is always display-ready text; there is no separate error channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrchestrationResult {
    pub query: String,
    pub result: String,
}

impl OrchestrationResult {
    pub fn new(query: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            result: result.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub tools: Vec<String>,
}

// ============= Conversation Types =============

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

// ============= Tool Types =============

/// Catalog entry describing a tool to the model.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// The model's structured tool selection.
///
/// Nothing guarantees `tool_name` refers to a registered tool; callers check
/// it against the registry before invoking anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolChoice {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl ToolChoice {
    pub fn new(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
