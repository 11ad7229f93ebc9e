//! Configuration for the medical agents
//!
//! Values come from an [`EnvSource`] (env file plus process environment) and
//! can be overridden through [`MedicalConfigBuilder`]. The Groq API key is
//! only required once a provider is actually built.

use crate::agents::DEFAULT_MODEL;
use crate::error::Result;
use medagent_llm::providers::{GROQ_API_BASE, OpenAIConfig, OpenAIProvider};
use medagent_runtime::{AgentRuntime, RuntimeConfig};
use medagent_tools::{DuckDuckGo, SearchConfig, ToolRegistry};
use medagent_utils::{ConfigError, EnvSource, LogFormat};
use std::sync::Arc;
use tracing::debug;

/// Environment keys read by [`MedicalConfig::from_env_source`]
pub mod keys {
    /// Groq API key
    pub const API_KEY: &str = "GROQ_API_KEY";
    /// OpenAI-compatible API base URL
    pub const API_BASE: &str = "GROQ_API_BASE";
    /// Model identifier
    pub const MODEL: &str = "MEDAGENT_MODEL";
    /// Max tokens per completion
    pub const MAX_TOKENS: &str = "MEDAGENT_MAX_TOKENS";
    /// Sampling temperature
    pub const TEMPERATURE: &str = "MEDAGENT_TEMPERATURE";
    /// LLM rounds per prompt
    pub const MAX_ITERATIONS: &str = "MEDAGENT_MAX_ITERATIONS";
    /// HTTP timeout for model requests
    pub const REQUEST_TIMEOUT_SECS: &str = "MEDAGENT_REQUEST_TIMEOUT_SECS";
    /// DuckDuckGo Instant Answer API base URL
    pub const SEARCH_BASE: &str = "MEDAGENT_SEARCH_BASE";
    /// Base URL of the DuckDuckGo news endpoint
    pub const NEWS_BASE: &str = "MEDAGENT_NEWS_BASE";
    /// `text`, `pretty` or `json`
    pub const LOG_FORMAT: &str = "MEDAGENT_LOG_FORMAT";
}

/// Configuration for the medical agents
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalConfig {
    /// Model used by both agents
    pub model: String,

    /// Groq API key
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    pub api_base: String,

    /// HTTP timeout for model requests, in seconds
    pub request_timeout_secs: u64,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature; provider default when `None`
    pub temperature: Option<f32>,

    /// LLM rounds per prompt
    pub max_iterations: usize,

    /// Web search settings
    pub search: SearchConfig,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for MedicalConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: GROQ_API_BASE.to_string(),
            request_timeout_secs: 120,
            max_tokens: 4096,
            temperature: None,
            max_iterations: 10,
            search: SearchConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl MedicalConfig {
    /// Create a new configuration builder
    pub fn builder() -> MedicalConfigBuilder {
        MedicalConfigBuilder::default()
    }

    /// Read the configuration from environment values
    pub fn from_env_source(env: &EnvSource) -> std::result::Result<Self, ConfigError> {
        Self::builder().env_source(env)?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |key: &str, reason: &str| ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if self.model.trim().is_empty() {
            return Err(invalid(keys::MODEL, "model must not be empty"));
        }
        if self.api_base.trim().is_empty() {
            return Err(invalid(keys::API_BASE, "API base must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(invalid(keys::MAX_TOKENS, "must be greater than 0"));
        }
        if self.max_iterations == 0 {
            return Err(invalid(keys::MAX_ITERATIONS, "must be greater than 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid(keys::REQUEST_TIMEOUT_SECS, "must be greater than 0"));
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(invalid(keys::TEMPERATURE, "must be between 0.0 and 2.0"));
            }
        }
        Ok(())
    }

    /// Provider settings for Groq
    ///
    /// Fails with [`ConfigError::Missing`] when no API key is configured.
    pub fn provider_config(&self) -> std::result::Result<OpenAIConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(keys::API_KEY.to_string()))?;

        Ok(OpenAIConfig::groq(api_key)
            .with_api_base(&self.api_base)
            .with_timeout(self.request_timeout_secs))
    }

    /// Runtime limits derived from this configuration
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            max_iterations: self.max_iterations,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Build a runtime with the Groq provider and the DuckDuckGo tools registered
    pub fn build_runtime(&self) -> Result<AgentRuntime> {
        let provider = OpenAIProvider::with_config(self.provider_config()?)?;

        let tools = Arc::new(ToolRegistry::new());
        for tool in DuckDuckGo::tools(&self.search)? {
            tools.register(tool);
        }
        debug!(api_base = %self.api_base, tools = tools.len(), "Runtime dependencies ready");

        Ok(AgentRuntime::builder()
            .provider(Arc::new(provider))
            .tool_registry(tools)
            .config(self.runtime_config())
            .build()?)
    }
}

/// Builder for MedicalConfig
#[derive(Debug, Default)]
pub struct MedicalConfigBuilder {
    model: Option<String>,
    api_key: Option<String>,
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    max_iterations: Option<usize>,
    search_base: Option<String>,
    news_base: Option<String>,
    log_format: Option<LogFormat>,
}

impl MedicalConfigBuilder {
    /// Fill every setting present in `env`
    pub fn env_source(mut self, env: &EnvSource) -> std::result::Result<Self, ConfigError> {
        if let Some(model) = env.get(keys::MODEL) {
            self.model = Some(model.to_string());
        }
        if let Some(key) = env.get(keys::API_KEY) {
            self.api_key = Some(key.to_string());
        }
        if let Some(base) = env.get(keys::API_BASE) {
            self.api_base = Some(base.to_string());
        }
        if let Some(base) = env.get(keys::SEARCH_BASE) {
            self.search_base = Some(base.to_string());
        }
        if let Some(base) = env.get(keys::NEWS_BASE) {
            self.news_base = Some(base.to_string());
        }
        self.request_timeout_secs = env
            .get_parsed(keys::REQUEST_TIMEOUT_SECS)?
            .or(self.request_timeout_secs);
        self.max_tokens = env.get_parsed(keys::MAX_TOKENS)?.or(self.max_tokens);
        self.temperature = env.get_parsed(keys::TEMPERATURE)?.or(self.temperature);
        self.max_iterations = env.get_parsed(keys::MAX_ITERATIONS)?.or(self.max_iterations);
        self.log_format = env.get_parsed(keys::LOG_FORMAT)?.or(self.log_format);
        Ok(self)
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the Groq API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the model request timeout
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set LLM rounds per prompt
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set the DuckDuckGo Instant Answer API base URL
    pub fn search_base(mut self, base: impl Into<String>) -> Self {
        self.search_base = Some(base.into());
        self
    }

    /// Set the DuckDuckGo news base URL
    pub fn news_base(mut self, base: impl Into<String>) -> Self {
        self.news_base = Some(base.into());
        self
    }

    /// Set the log format
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> std::result::Result<MedicalConfig, ConfigError> {
        let defaults = MedicalConfig::default();

        let config = MedicalConfig {
            model: self.model.unwrap_or(defaults.model),
            api_key: self.api_key,
            api_base: self.api_base.unwrap_or(defaults.api_base),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            search: SearchConfig {
                base_url: self.search_base.unwrap_or(defaults.search.base_url),
                news_base_url: self.news_base.unwrap_or(defaults.search.news_base_url),
                ..defaults.search
            },
            log_format: self.log_format.unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MedicalError;

    #[test]
    fn test_default_config() {
        let config = MedicalConfig::default();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.api_base, "https://api.groq.com/openai/v1");
        assert_eq!(config.search.default_max_results, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_source() {
        let env = EnvSource::from_pairs([
            ("GROQ_API_KEY", "gsk_test"),
            ("MEDAGENT_MODEL", "llama-3.1-8b-instant"),
            ("MEDAGENT_MAX_TOKENS", "2048"),
            ("MEDAGENT_TEMPERATURE", "0.3"),
            ("MEDAGENT_MAX_ITERATIONS", "4"),
            ("MEDAGENT_SEARCH_BASE", "http://localhost:9000"),
            ("MEDAGENT_NEWS_BASE", "http://localhost:9001"),
            ("MEDAGENT_LOG_FORMAT", "json"),
        ]);
        let config = MedicalConfig::from_env_source(&env).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.search.base_url, "http://localhost:9000");
        assert_eq!(config.search.news_base_url, "http://localhost:9001");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "GROQ_API_KEY=gsk_file\nMEDAGENT_REQUEST_TIMEOUT_SECS=45\nMEDAGENT_TEMPERATURE=\n",
        )
        .unwrap();

        let overrides = [("MEDAGENT_MODEL".to_string(), "from-process".to_string())];
        let env = EnvSource::load_with_overrides(&path, overrides).unwrap();
        let config = MedicalConfig::from_env_source(&env).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("gsk_file"));
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.temperature, None);
        assert_eq!(config.model, "from-process");
    }

    #[test]
    fn test_builder_overrides_env() {
        let env = EnvSource::from_pairs([("MEDAGENT_MODEL", "from-env")]);
        let config = MedicalConfig::builder()
            .env_source(&env)
            .unwrap()
            .model("from-flag")
            .build()
            .unwrap();
        assert_eq!(config.model, "from-flag");
    }

    #[test]
    fn test_invalid_values() {
        let env = EnvSource::from_pairs([("MEDAGENT_MAX_ITERATIONS", "many")]);
        assert!(matches!(
            MedicalConfig::from_env_source(&env),
            Err(ConfigError::Invalid { ref key, .. }) if key == "MEDAGENT_MAX_ITERATIONS"
        ));

        let result = MedicalConfig::builder().max_iterations(0).build();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let result = MedicalConfig::builder().temperature(3.5).build();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { ref key, .. }) if key == "MEDAGENT_TEMPERATURE"
        ));
    }

    #[test]
    fn test_missing_api_key_fails_only_for_provider() {
        let config = MedicalConfig::from_env_source(&EnvSource::default()).unwrap();
        assert!(matches!(
            config.provider_config(),
            Err(ConfigError::Missing(ref key)) if key == "GROQ_API_KEY"
        ));
        assert!(matches!(
            config.build_runtime(),
            Err(MedicalError::Config(ConfigError::Missing(_)))
        ));
    }

    #[test]
    fn test_provider_config() {
        let config = MedicalConfig::builder()
            .api_key("gsk_test")
            .api_base("http://localhost:8080/v1/")
            .request_timeout_secs(30)
            .build()
            .unwrap();
        let provider = config.provider_config().unwrap();
        assert_eq!(provider.api_key, "gsk_test");
        assert_eq!(provider.api_base, "http://localhost:8080/v1");
        assert_eq!(provider.timeout_secs, 30);
        assert_eq!(provider.provider_name, "groq");
    }

    #[test]
    fn test_build_runtime_registers_search() {
        let config = MedicalConfig::builder().api_key("gsk_test").build().unwrap();
        let runtime = config.build_runtime().unwrap();
        assert_eq!(runtime.provider().name(), "groq");
        for handle in DuckDuckGo::handles() {
            assert!(runtime.tools().resolve(&handle).is_some(), "{handle:?}");
        }
        assert_eq!(runtime.config().max_iterations, 10);
    }
}
