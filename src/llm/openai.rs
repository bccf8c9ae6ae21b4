//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint that speaks the `/chat/completions` protocol
//! (Groq, OpenAI, OpenRouter, vLLM, ...). Errors are classified here, at the
//! HTTP boundary, into [`ProviderError`] variants.

use crate::llm::client::LLMClient;
use crate::llm::error::{ProviderError, ProviderResult};
use crate::types::{AppError, Message, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(api_key: String, api_base: String, model: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    async fn complete(&self, request: &ChatCompletionRequest<'_>) -> ProviderResult<String> {
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::from_transport)?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "HTTP error from LLM");
            return Err(ProviderError::from_response(status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Invalid completion body: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("No content in completion".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate_with_history(&self, messages: &[Message]) -> ProviderResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: None,
            response_format: None,
        };
        self.complete(&request).await
    }

    async fn generate_structured(&self, messages: &[Message]) -> ProviderResult<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: Some(0.0),
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        self.complete(&request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
