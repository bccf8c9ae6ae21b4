use crate::{
    llm::LLMClient,
    tools::{ToolRegistry, FALLBACK_TOOL},
    types::{AppError, Message, Result, ToolChoice},
};
use serde_json::{Map, Value};
use std::sync::Arc;

const ROUTING_POLICY: &str = r#"You are a smart, tool-using assistant. Your goal is to accurately determine the user's intent and select the appropriate tool.

Here is your thought process:
1.  First, analyze the entire conversation history to understand the context.
2.  Second, focus on the user's **latest query** to identify their primary, immediate intent.
3.  Compare this intent against the descriptions of the available tools.

Your Rules:
- If the user's latest query CLEARLY and DIRECTLY matches the description of a tool, you MUST choose that tool. For example, queries about 'weather', 'climate', or 'forecast' should always use the 'get_weather' tool.
- If the query is a conversational follow-up that does not explicitly ask for a tool (e.g., "why is that?", "tell me more", "how?"), or if no tool is a good fit, you MUST use the 'fallback' tool to continue the conversation.

You must respond ONLY with a valid JSON object with 'tool_name' and 'arguments' keys.

Here are the available tools:
"#;

/// Asks the model which capability should handle a query.
///
/// The model answers in JSON mode with `{"tool_name": ..., "arguments": {...}}`.
/// The answer is shape-checked here; whether the tool actually exists is the
/// executor's concern.
pub struct IntentRouter {
    llm: Arc<dyn LLMClient>,
    registry: Arc<ToolRegistry>,
}

impl IntentRouter {
    pub fn new(llm: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        Self { llm, registry }
    }

    /// Catalog of registered tools as pretty JSON, in name order:
    /// `[{"<name>": "<description>", "args": {...}}]`.
    pub fn build_catalog(&self) -> String {
        let entries: Vec<Value> = self
            .registry
            .get_tool_definitions()
            .into_iter()
            .map(|def| {
                let mut entry = Map::new();
                entry.insert(def.name, Value::String(def.description));
                entry.insert("args".to_string(), def.parameters);
                Value::Object(entry)
            })
            .collect();

        serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn system_prompt(&self) -> String {
        format!("{}{}\n", ROUTING_POLICY, self.build_catalog())
    }

    /// System prompt, then history, then the query as the final user turn.
    pub fn build_messages(&self, query: &str, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt()));
        messages.extend_from_slice(history);
        messages.push(Message::user(query));
        messages
    }

    /// Pick a tool for `query`.
    pub async fn route(&self, query: &str, history: &[Message]) -> Result<ToolChoice> {
        let messages = self.build_messages(query, history);
        let raw = self.llm.generate_structured(&messages).await?;
        let choice = parse_tool_choice(&raw)?;

        tracing::info!(
            tool = %choice.tool_name,
            arguments = ?choice.arguments,
            fallback = choice.tool_name == FALLBACK_TOOL,
            "LLM chose tool"
        );
        Ok(choice)
    }
}

/// Parse the model's JSON answer.
///
/// `tool_name` must be a string. `arguments` must be an object when present;
/// absent or `null` means no arguments.
pub fn parse_tool_choice(raw: &str) -> Result<ToolChoice> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        AppError::MalformedResponse(format!("Router output is not valid JSON ({}): {}", e, raw))
    })?;

    let Value::Object(mut object) = value else {
        return Err(AppError::MalformedResponse(format!(
            "Router output is not a JSON object: {}",
            raw
        )));
    };

    let tool_name = match object.remove("tool_name") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(AppError::MalformedResponse(format!(
                "'tool_name' must be a string, got {}",
                other
            )));
        }
        None => {
            return Err(AppError::MalformedResponse(
                "Router output has no 'tool_name'".to_string(),
            ));
        }
    };

    let arguments = match object.remove("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(other) => {
            return Err(AppError::MalformedResponse(format!(
                "'arguments' must be an object, got {}",
                other
            )));
        }
    };

    Ok(ToolChoice {
        tool_name,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ProviderError, ProviderResult};
    use crate::tools::calculator::Calculator;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    struct ScriptedLLM {
        reply: ProviderResult<String>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedLLM {
        fn new(reply: ProviderResult<String>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn generate_with_history(&self, _messages: &[Message]) -> ProviderResult<String> {
            panic!("router must use structured mode");
        }

        async fn generate_structured(&self, messages: &[Message]) -> ProviderResult<String> {
            self.seen.lock().push(messages.to_vec());
            self.reply.clone()
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::builder()
                .with_tool(Arc::new(Calculator))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_parse_valid_choice() {
        let choice =
            parse_tool_choice(r#"{"tool_name": "get_weather", "arguments": {"city": "Paris"}}"#)
                .unwrap();
        assert_eq!(choice, ToolChoice::new("get_weather", json!({"city": "Paris"})));
    }

    #[test]
    fn test_parse_missing_or_null_arguments() {
        for raw in [r#"{"tool_name": "fallback"}"#, r#"{"tool_name": "fallback", "arguments": null}"#] {
            let choice = parse_tool_choice(raw).unwrap();
            assert_eq!(choice.tool_name, "fallback");
            assert!(choice.arguments.is_empty());
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "not json",
            r#"["get_weather"]"#,
            r#"{"arguments": {}}"#,
            r#"{"tool_name": 42}"#,
            r#"{"tool_name": "get_weather", "arguments": "Paris"}"#,
        ] {
            assert!(
                matches!(parse_tool_choice(raw), Err(AppError::MalformedResponse(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_catalog_shape() {
        let router = IntentRouter::new(Arc::new(ScriptedLLM::new(Ok(String::new()))), registry());
        let catalog: Value = serde_json::from_str(&router.build_catalog()).unwrap();
        let entry = &catalog[0];
        assert!(entry["calculator"].as_str().unwrap().starts_with("Use ONLY"));
        assert_eq!(entry["args"], json!({"expression": {"type": "string"}}));
    }

    #[tokio::test]
    async fn test_route_message_order() {
        let llm = Arc::new(ScriptedLLM::new(Ok(
            r#"{"tool_name": "fallback", "arguments": {}}"#.to_string(),
        )));
        let router = IntentRouter::new(llm.clone(), registry());
        let history = vec![Message::user("hi"), Message::assistant("hello")];

        let choice = router.route("tell me more", &history).await.unwrap();
        assert_eq!(choice.tool_name, FALLBACK_TOOL);

        let seen = llm.seen.lock();
        let messages = &seen[0];
        assert_eq!(messages.len(), 4);
        assert!(messages[0].content.contains("\"calculator\""));
        assert_eq!(&messages[1..3], history.as_slice());
        assert_eq!(messages[3], Message::user("tell me more"));
    }

    #[tokio::test]
    async fn test_route_propagates_provider_error() {
        let err = ProviderError::RateLimited {
            status: 429,
            message: "slow down".to_string(),
        };
        let router = IntentRouter::new(Arc::new(ScriptedLLM::new(Err(err.clone()))), registry());
        let result = router.route("news about rust", &[]).await;
        assert!(matches!(result, Err(AppError::Provider(e)) if e == err));
    }
}
