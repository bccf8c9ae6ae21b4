//! TOML-based configuration for Relay
//!
//! Everything lives in one file (`relay.toml` by default) and every section
//! has defaults, so an absent file is a valid configuration. Secrets are never
//! written in the file: it names the environment variables that hold them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from relay.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,

    /// Environment variable containing the bearer token
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Environment variable that, when set, overrides `model`
    #[serde(default = "default_llm_model_env")]
    pub model_env: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_llm_model_env() -> Option<String> {
    Some("GROQ_MODEL_NAME".to_string())
}

fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            api_key_env: default_llm_api_key_env(),
            model: default_llm_model(),
            model_env: default_llm_model_env(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

// ============= Tool Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Per-request timeout for every outbound tool call
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub stock: StockConfig,

    #[serde(default)]
    pub wikipedia: WikipediaConfig,
}

fn default_tool_timeout() -> u64 {
    15
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tool_timeout(),
            news: NewsConfig::default(),
            weather: WeatherConfig::default(),
            stock: StockConfig::default(),
            wikipedia: WikipediaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_base")]
    pub base_url: String,

    #[serde(default = "default_news_key_env")]
    pub api_key_env: String,
}

fn default_news_base() -> String {
    "https://newsapi.org".to_string()
}

fn default_news_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_base(),
            api_key_env: default_news_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_weather_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_weather_capacity")]
    pub cache_capacity: usize,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_weather_ttl() -> u64 {
    3600
}

fn default_weather_capacity() -> usize {
    256
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            cache_ttl_secs: default_weather_ttl(),
            cache_capacity: default_weather_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    #[serde(default = "default_stock_base")]
    pub base_url: String,

    #[serde(default = "default_stock_key_env")]
    pub api_key_env: String,
}

fn default_stock_base() -> String {
    "https://www.alphavantage.co".to_string()
}

fn default_stock_key_env() -> String {
    "ALPHA_VANTAGE_API_KEY".to_string()
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            base_url: default_stock_base(),
            api_key_env: default_stock_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_wikipedia_base")]
    pub base_url: String,

    /// Number of leading sentences kept from the article extract
    #[serde(default = "default_wikipedia_sentences")]
    pub sentences: usize,
}

fn default_wikipedia_base() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}

fn default_wikipedia_sentences() -> usize {
    2
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_base(),
            sentences: default_wikipedia_sentences(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl RelayConfig {
    /// Load configuration from a TOML file that must exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: RelayConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if present, otherwise start from defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(missing)) => {
                tracing::info!(path = %missing.display(), "No config file found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment overrides (`llm.model_env`, `PORT`).
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = self
            .llm
            .model_env
            .as_deref()
            .and_then(&lookup)
            .filter(|m| !m.trim().is_empty())
        {
            self.llm.model = model;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationError(format!("PORT is not a valid port: {}", port)))?;
        }

        self.validate()
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("llm.model must not be empty".to_string()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.tools.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tools.timeout_secs must be greater than zero".to_string(),
            ));
        }

        for (field, url) in [
            ("llm.api_base", &self.llm.api_base),
            ("tools.news.base_url", &self.tools.news.base_url),
            ("tools.weather.geocoding_url", &self.tools.weather.geocoding_url),
            ("tools.weather.forecast_url", &self.tools.weather.forecast_url),
            ("tools.stock.base_url", &self.tools.stock.base_url),
            ("tools.wikipedia.base_url", &self.tools.wikipedia.base_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| {
                ConfigError::ValidationError(format!("{} is not a valid URL ({}): {}", field, e, url))
            })?;
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get the model provider's bearer token from the environment
    pub fn llm_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.llm.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.llm.api_key_env.clone()))
    }

    /// Listen address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
