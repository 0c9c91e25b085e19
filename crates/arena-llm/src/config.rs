//! Configuration management for Arena
//!
//! Handles provider settings, ledger location, and runtime configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::provider::LlmProvider;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL (default: http://localhost:11434)
    pub ollama_url: String,
    /// Default provider ("mock" or "ollama")
    pub default_provider: String,
    /// Default model
    pub default_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            default_provider: "mock".to_string(),
            default_model: "llama3".to_string(),
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            default_provider: env::var("ARENA_DEFAULT_PROVIDER")
                .unwrap_or(defaults.default_provider),
            default_model: env::var("ARENA_DEFAULT_MODEL").unwrap_or(defaults.default_model),
        }
    }

    /// Check if a provider name is known
    pub fn is_configured(&self, provider: &str) -> bool {
        matches!(provider.to_lowercase().as_str(), "mock" | "ollama")
    }

    /// Build a provider by name
    pub fn build_provider(&self, provider: &str) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        match provider.to_lowercase().as_str() {
            "mock" => Ok(Arc::new(MockProvider::echo())),
            "ollama" => Ok(Arc::new(OllamaProvider::with_url(
                &self.ollama_url,
                &self.default_model,
            ))),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    /// Build the default provider
    pub fn default_provider(&self) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        self.build_provider(&self.default_provider)
    }
}

/// Full Arena configuration
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Location of the persisted rating ledger
    pub ledger_path: PathBuf,
    /// Enable debug logging
    pub debug: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            ledger_path: PathBuf::from("arena-ledger.json"),
            debug: false,
        }
    }
}

impl ArenaConfig {
    /// Load from environment
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            ledger_path: env::var("ARENA_LEDGER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("arena-ledger.json")),
            debug: env::var("ARENA_DEBUG")
                .map(|v| v == "1" || v == "true")
                .unwrap_or(false),
        }
    }
}
