//! LLM Provider Clients and Abstractions
//!
//! This module provides the interface the orchestrator uses to talk to a
//! language model, plus one concrete implementation for OpenAI-compatible
//! chat-completion endpoints (Groq by default).
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait the router and executor depend on
//! - [`OpenAIClient`] - `reqwest`-based client for `/chat/completions`
//! - [`ProviderError`] - Classified failure of a single model call
//!
//! # Example
//!
//! ```ignore
//! use relay::llm::{LLMClient, OpenAIClient};
//! use relay::types::Message;
//!
//! let client = OpenAIClient::new(api_key, api_base, model, timeout)?;
//! let reply = client
//!     .generate_with_history(&[Message::user("What is 2+2?")])
//!     .await?;
//! ```

/// Core LLM client trait.
pub mod client;
/// Classified provider errors.
pub mod error;
/// OpenAI-compatible HTTP client.
pub mod openai;

pub use client::LLMClient;
pub use error::{ProviderError, ProviderResult};
pub use openai::OpenAIClient;
