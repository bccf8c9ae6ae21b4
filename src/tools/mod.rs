//! Built-in Tools (capabilities the router can pick)
//!
//! # Module Structure
//!
//! - [`calculator`](crate::tools::calculator) - Arithmetic expression evaluation
//! - [`news`](crate::tools::news) - Recent headlines via NewsAPI
//! - [`weather`](crate::tools::weather) - Current conditions via Open-Meteo
//! - [`stock`](crate::tools::stock) - Latest quote via Alpha Vantage
//! - [`wikipedia`](crate::tools::wikipedia) - Article summaries via the Wikipedia REST API
//! - [`registry`](crate::tools::registry) - Tool trait, argument schema and registry
//!
//! # Tool Registry
//!
//! ```ignore
//! let registry = ToolRegistry::with_default_tools(&config.tools)?;
//! let definitions = registry.get_tool_definitions();
//! let text = registry.execute("calculator", &args).await?;
//! ```
//!
//! Every tool returns display-ready text. Failures are [`ToolError`]s, which
//! the executor turns into a message naming the tool.
//!
//! [`ToolError`]: crate::tools::registry::ToolError

/// Calculator tool for arithmetic operations.
pub mod calculator;
/// News headlines tool.
pub mod news;
/// Tool registry for managing available tools.
pub mod registry;
/// Stock quote tool.
pub mod stock;
/// Weather tool with geocoding and a short-lived cache.
pub mod weather;
/// Wikipedia summary tool.
pub mod wikipedia;

pub use registry::{ArgSpec, ArgType, Tool, ToolArgs, ToolError, ToolRegistry, FALLBACK_TOOL};

use crate::types::{AppError, Result};
use crate::utils::toml_config::ToolsConfig;
use std::sync::Arc;
use std::time::Duration;

/// An API key looked up from a named environment variable.
///
/// A missing key is not a startup error; the tool reports it when called.
#[derive(Debug, Clone)]
pub struct ApiCredential {
    env_var: String,
    value: Option<String>,
}

impl ApiCredential {
    pub fn new(env_var: impl Into<String>, value: Option<String>) -> Self {
        Self {
            env_var: env_var.into(),
            value: value.filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn from_env(env_var: &str) -> Self {
        Self::new(env_var, std::env::var(env_var).ok())
    }

    pub fn require(&self) -> std::result::Result<&str, ToolError> {
        self.value
            .as_deref()
            .ok_or_else(|| ToolError::MissingCredentials(self.env_var.clone()))
    }
}

/// Shared outbound client for tools, with a bounded per-request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("relay-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

impl ToolRegistry {
    /// Create a registry with the default tools (news, weather, stock,
    /// Wikipedia, calculator).
    pub fn with_default_tools(config: &ToolsConfig) -> Result<Self> {
        let http = http_client(Duration::from_secs(config.timeout_secs))?;

        ToolRegistry::builder()
            .with_tool(Arc::new(news::NewsTool::new(
                http.clone(),
                &config.news.base_url,
                ApiCredential::from_env(&config.news.api_key_env),
            )))
            .with_tool(Arc::new(weather::WeatherTool::new(
                http.clone(),
                &config.weather,
            )))
            .with_tool(Arc::new(stock::StockTool::new(
                http.clone(),
                &config.stock.base_url,
                ApiCredential::from_env(&config.stock.api_key_env),
            )))
            .with_tool(Arc::new(wikipedia::WikipediaTool::new(
                http,
                &config.wikipedia.base_url,
                config.wikipedia.sentences,
            )))
            .with_tool(Arc::new(calculator::Calculator))
            .build()
    }
}
