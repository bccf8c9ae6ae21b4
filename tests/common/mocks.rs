//! Mock implementations for testing.
//!
//! Shared between the integration test files: a scripted LLM client that
//! records every call, and a tool that counts its invocations.

use async_trait::async_trait;
use parking_lot::Mutex;
use relay::llm::{LLMClient, ProviderError, ProviderResult};
use relay::tools::{ArgSpec, Tool, ToolArgs, ToolError};
use relay::types::Message;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// LLM client that replays scripted responses.
///
/// Structured (routing) and free-text (fallback) calls have separate queues.
/// An exhausted queue answers with `MalformedResponse`.
#[derive(Default)]
pub struct MockLLMClient {
    structured: Mutex<VecDeque<ProviderResult<String>>>,
    chat: Mutex<VecDeque<ProviderResult<String>>>,
    pub structured_calls: Mutex<Vec<Vec<Message>>>,
    pub chat_calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a routing decision.
    pub fn routing_to(self, tool_name: &str, arguments: Value) -> Self {
        let raw = json!({ "tool_name": tool_name, "arguments": arguments }).to_string();
        self.with_structured(Ok(raw))
    }

    pub fn with_structured(self, reply: ProviderResult<String>) -> Self {
        self.structured.lock().push_back(reply);
        self
    }

    pub fn with_chat(self, reply: ProviderResult<String>) -> Self {
        self.chat.lock().push_back(reply);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.structured_calls.lock().len() + self.chat_calls.lock().len()
    }

    fn exhausted() -> ProviderError {
        ProviderError::MalformedResponse("no scripted response left".to_string())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_history(&self, messages: &[Message]) -> ProviderResult<String> {
        self.chat_calls.lock().push(messages.to_vec());
        self.chat
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted()))
    }

    async fn generate_structured(&self, messages: &[Message]) -> ProviderResult<String> {
        self.structured_calls.lock().push(messages.to_vec());
        self.structured
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Tool that returns a fixed reply and counts its invocations.
pub struct CountingTool {
    name: &'static str,
    args: &'static [ArgSpec],
    reply: String,
    calls: AtomicUsize,
    last_args: Mutex<Option<Map<String, Value>>>,
}

impl CountingTool {
    pub fn new(name: &'static str, args: &'static [ArgSpec], reply: &str) -> Self {
        Self {
            name,
            args,
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(None),
        }
    }

    pub fn weather(reply: &str) -> Self {
        const ARGS: &[ArgSpec] = &[ArgSpec::string("city")];
        Self::new("get_weather", ARGS, reply)
    }

    pub fn news(reply: &str) -> Self {
        const ARGS: &[ArgSpec] = &[ArgSpec::string("topic")];
        Self::new("get_news", ARGS, reply)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_args(&self) -> Option<Map<String, Value>> {
        self.last_args.lock().clone()
    }
}

#[async_trait]
impl Tool for CountingTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Counting test tool."
    }

    fn arguments(&self) -> &[ArgSpec] {
        self.args
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock() = Some(args.into_inner());
        Ok(self.reply.clone())
    }
}
