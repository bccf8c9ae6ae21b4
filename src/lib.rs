//! # Relay - intent routing for tool-using assistants
//!
//! Relay takes a natural-language query plus prior conversation turns and
//! produces one textual answer. An LLM, prompted with a catalog of tools,
//! picks exactly one tool and its arguments; Relay runs it and returns the
//! output. Pure arithmetic skips the model, conversational follow-ups go to a
//! plain chat completion, and every failure is rendered as readable text.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use relay::{LLMClient, OpenAIClient, Orchestrator, RelayConfig, ToolRegistry};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = RelayConfig::default();
//! let llm: Arc<dyn LLMClient> = Arc::new(OpenAIClient::new(
//!     std::env::var("GROQ_API_KEY")?,
//!     config.llm.api_base.clone(),
//!     config.llm.model.clone(),
//!     Duration::from_secs(config.llm.timeout_secs),
//! )?);
//! let registry = Arc::new(ToolRegistry::with_default_tools(&config.tools)?);
//!
//! let orchestrator = Orchestrator::new(llm, registry);
//! let answer = orchestrator.orchestrate("weather in Paris", &[]).await;
//! println!("{}", answer.result);
//! ```
//!
//! ## Modules
//!
//! - [`agents`] - Fast path, intent router, executor, failure messages
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line interface
//! - [`llm`] - LLM client trait and the OpenAI-compatible client
//! - [`tools`] - Tool trait, registry and built-in tools
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

/// Query orchestration (fast path, routing, execution, failure messages).
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Built-in tools and the tool registry.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::Orchestrator;
pub use llm::{LLMClient, OpenAIClient, ProviderError};
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Message, OrchestrationResult, Result};
pub use utils::toml_config::RelayConfig;

use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration (file, defaults and env overrides)
    pub config: Arc<RelayConfig>,
    /// The query pipeline
    pub orchestrator: Arc<Orchestrator>,
    /// Tools the router may choose from
    pub registry: Arc<ToolRegistry>,
    /// Model client shared by router and fallback
    pub llm: Arc<dyn LLMClient>,
}

impl AppState {
    /// Wire state from explicit parts.
    pub fn new(config: RelayConfig, llm: Arc<dyn LLMClient>, registry: Arc<ToolRegistry>) -> Self {
        let orchestrator = Arc::new(Orchestrator::new(llm.clone(), registry.clone()));
        Self {
            config: Arc::new(config),
            orchestrator,
            registry,
            llm,
        }
    }

    /// Build the production state: OpenAI-compatible client plus the default
    /// tools. Fails if the model API key is not set.
    pub fn from_config(config: RelayConfig) -> Result<Self> {
        let api_key = config.llm_api_key()?;
        let llm: Arc<dyn LLMClient> = Arc::new(OpenAIClient::new(
            api_key,
            config.llm.api_base.clone(),
            config.llm.model.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        )?);
        let registry = Arc::new(ToolRegistry::with_default_tools(&config.tools)?);
        Ok(Self::new(config, llm, registry))
    }
}
