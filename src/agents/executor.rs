use crate::{
    llm::{LLMClient, ProviderError},
    tools::{ToolError, ToolRegistry, FALLBACK_TOOL},
    types::{Message, Result, ToolChoice},
};
use std::sync::Arc;

const CONVERSATIONAL_PROMPT: &str = "You are a helpful and conversational assistant.";

/// Carries out the router's decision.
///
/// Tool failures are reported as text so the caller always gets an answer.
/// Only the fallback path can fail, and only with a provider error.
pub struct CapabilityExecutor {
    llm: Arc<dyn LLMClient>,
    registry: Arc<ToolRegistry>,
}

impl CapabilityExecutor {
    pub fn new(llm: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        Self { llm, registry }
    }

    pub async fn execute(
        &self,
        choice: &ToolChoice,
        query: &str,
        history: &[Message],
    ) -> Result<String> {
        let name = choice.tool_name.as_str();

        if self.registry.has_tool(name) {
            return Ok(match self.registry.execute(name, &choice.arguments).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::warn!(tool = name, error = %err, "Tool execution failed");
                    describe_failure(name, &err)
                }
            });
        }

        if name == FALLBACK_TOOL {
            tracing::info!("No suitable tool found. Falling back to direct LLM call.");
            return self.converse(query, history).await;
        }

        tracing::warn!(tool = name, "LLM chose an unregistered tool");
        Ok(format!(
            "Error: The LLM chose a tool ('{}') that does not exist.",
            name
        ))
    }

    /// Free-text reply with only the conversational instruction; the tool
    /// catalog is not sent.
    async fn converse(&self, query: &str, history: &[Message]) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(CONVERSATIONAL_PROMPT));
        messages.extend_from_slice(history);
        messages.push(Message::user(query));

        let reply = self.llm.generate_with_history(&messages).await?;
        if reply.trim().is_empty() {
            return Err(
                ProviderError::MalformedResponse("empty conversational reply".to_string()).into(),
            );
        }
        Ok(reply)
    }
}

fn describe_failure(tool: &str, err: &ToolError) -> String {
    match err {
        ToolError::InvalidArguments(detail) => format!(
            "Error: The LLM called '{}' with invalid arguments: {}",
            tool, detail
        ),
        ToolError::MissingCredentials(var) => format!(
            "Error: '{}' is not configured ({} is not set).",
            tool, var
        ),
        other => format!("Error: '{}' failed: {}", tool, other),
    }
}
