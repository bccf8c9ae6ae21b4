//! LLM client abstraction
//!
//! The orchestrator only needs two kinds of completion: a structured (JSON
//! mode, deterministic) one for tool selection and a free-text one for the
//! conversational fallback. Providers implement both behind [`LLMClient`].

use crate::llm::error::ProviderResult;
use crate::types::Message;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// Implementations must return already-classified [`ProviderError`]s so that
/// callers never have to inspect raw HTTP payloads.
///
/// [`ProviderError`]: crate::llm::ProviderError
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Free-text completion over a full message sequence.
    async fn generate_with_history(&self, messages: &[Message]) -> ProviderResult<String>;

    /// Completion constrained to a single JSON object, sampled at temperature 0.
    async fn generate_structured(&self, messages: &[Message]) -> ProviderResult<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
