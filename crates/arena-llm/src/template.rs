//! Prompt templates as scored functions
//!
//! A [`PromptTemplate`] renders `{name}` placeholders from a configuration.
//! [`LlmScoredFunction`] pairs a template with a provider so every
//! configuration becomes one completion request.

use async_trait::async_trait;
use serde_json::Value;

use arena_core::{Configuration, ScoreError, ScoredFunction};

use crate::provider::{LlmProvider, LlmRequest};

/// Configuration keys that map onto request settings instead of the prompt
pub const MODEL_KEY: &str = "model";
pub const TEMPERATURE_KEY: &str = "temperature";
pub const MAX_TOKENS_KEY: &str = "max_tokens";
pub const SYSTEM_KEY: &str = "system";

/// A system + user prompt pair with `{name}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system: String,
    pub prompt: String,
    /// Used when the configuration does not set `max_tokens`
    pub max_tokens: u32,
    /// Used when the configuration does not set `temperature`
    pub temperature: f32,
}

impl PromptTemplate {
    pub fn new(prompt: &str) -> Self {
        Self {
            system: "You are a helpful assistant.".to_string(),
            prompt: prompt.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.system = system.to_string();
        self
    }

    /// Substitute every `{name}` whose name is a configuration key
    ///
    /// Unknown placeholders are left as written.
    pub fn render(text: &str, config: &Configuration) -> String {
        let mut out = text.to_string();
        for (name, value) in config.iter() {
            let placeholder = format!("{{{}}}", name);
            if out.contains(&placeholder) {
                out = out.replace(&placeholder, &display_value(value));
            }
        }
        out
    }

    /// Build the completion request for one configuration
    pub fn request_for(&self, config: &Configuration) -> LlmRequest {
        let system = match config.get(SYSTEM_KEY) {
            Some(value) => display_value(value),
            None => Self::render(&self.system, config),
        };
        let temperature = config
            .get(TEMPERATURE_KEY)
            .and_then(Value::as_f64)
            .map(|t| t as f32)
            .unwrap_or(self.temperature);
        let max_tokens = config
            .get(MAX_TOKENS_KEY)
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(self.max_tokens);

        LlmRequest::new(&system, &Self::render(&self.prompt, config))
            .with_model(config.get(MODEL_KEY).map(display_value))
            .with_temperature(temperature)
            .with_max_tokens(max_tokens)
    }
}

/// Strings render bare, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A provider driven by a prompt template
#[derive(Debug)]
pub struct LlmScoredFunction<P: LlmProvider> {
    provider: P,
    template: PromptTemplate,
}

impl<P: LlmProvider> LlmScoredFunction<P> {
    pub fn new(provider: P, template: PromptTemplate) -> Self {
        Self { provider, template }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

#[async_trait]
impl<P: LlmProvider> ScoredFunction for LlmScoredFunction<P> {
    async fn score(&self, configuration: &Configuration) -> Result<Value, ScoreError> {
        let request = self.template.request_for(configuration);
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ScoreError::new(e.to_string()))?;
        Ok(Value::String(response.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    #[test]
    fn test_render_placeholders() {
        let config = Configuration::new().with("tone", "formal").with("n", 3);
        let text = PromptTemplate::render("Write {n} lines in a {tone} tone about {topic}", &config);
        assert_eq!(text, "Write 3 lines in a formal tone about {topic}");
    }

    #[test]
    fn test_reserved_keys_map_to_request() {
        let config = Configuration::new()
            .with("model", "llama3")
            .with("temperature", 0.2)
            .with("max_tokens", 64);
        let request = PromptTemplate::new("Hi").request_for(&config);
        assert_eq!(request.model.as_deref(), Some("llama3"));
        assert!((request.temperature - 0.2).abs() < 1e-6);
        assert_eq!(request.max_tokens, 64);
    }

    #[test]
    fn test_defaults_when_keys_missing() {
        let template = PromptTemplate::new("Hi").with_system("Be {style}");
        let request = template.request_for(&Configuration::new().with("style", "brief"));
        assert_eq!(request.system, "Be brief");
        assert!(request.model.is_none());
        assert_eq!(request.max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_scored_function_returns_completion() {
        let f = LlmScoredFunction::new(MockProvider::echo(), PromptTemplate::new("Explain {topic}"));
        let value = f
            .score(&Configuration::new().with("topic", "Elo").with("model", "m"))
            .await
            .unwrap();
        let text = value.as_str().unwrap();
        assert!(text.contains("model=m"));
        assert!(text.ends_with("Explain Elo"));
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_score_error() {
        let f = LlmScoredFunction::new(MockProvider::failing("down"), PromptTemplate::new("x"));
        let err = f.score(&Configuration::new()).await.unwrap_err();
        assert!(err.0.contains("down"));
    }
}
