//! Provider interface shared by scored functions and judges

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";

/// Errors from LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    pub system: String,
    pub prompt: String,
    /// Model override; providers fall back to their own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmRequest {
    pub fn new(system: &str, prompt: &str) -> Self {
        Self {
            system: system.to_string(),
            prompt: prompt.to_string(),
            model: None,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    /// Request with the generic assistant system prompt
    pub fn simple(prompt: &str) -> Self {
        Self::new(DEFAULT_SYSTEM, prompt)
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Completion returned by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    /// Model that actually answered
    pub model: String,
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
}

/// A text-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Cheap reachability probe
    async fn is_available(&self) -> bool;

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Complete a bare prompt and return only the text
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(self.complete(LlmRequest::simple(prompt)).await?.content)
    }
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        (**self).complete(request).await
    }
}
