//! Ollama chat provider for local models
//!
//! Talks to `/api/chat` without streaming. A configuration's `model` value
//! arrives as `LlmRequest::model` and replaces the provider default, so one
//! provider serves every model in a spec.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

const DEFAULT_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    model: String,
    message: ReplyMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Provider for a local or remote Ollama server
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Provider on the default local endpoint
    pub fn new(model: &str) -> Self {
        Self::with_url(DEFAULT_URL, model)
    }

    pub fn with_url(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Default model for requests without an override
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_body<'a>(&'a self, request: &'a LlmRequest) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages,
            stream: false,
            options: ChatOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        let body = self.chat_body(&request);
        tracing::debug!(model = body.model, temperature = request.temperature, "Ollama chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed(format!("{}: {}", status, detail.trim())));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let tokens_used = match (reply.prompt_eval_count, reply.eval_count) {
            (None, None) => None,
            (prompt, completion) => Some(prompt.unwrap_or(0) + completion.unwrap_or(0)),
        };

        Ok(LlmResponse {
            content: reply.message.content,
            model: reply.model,
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let provider = OllamaProvider::with_url("http://gpu-box:11434/", "llama3");
        assert_eq!(provider.base_url, "http://gpu-box:11434");
        assert_eq!(provider.model(), "llama3");
    }

    #[test]
    fn test_chat_body_uses_request_model() {
        let provider = OllamaProvider::new("llama3");

        let request = LlmRequest::new("Be brief.", "Hi").with_model(Some("mistral".to_string()));
        let body = serde_json::to_value(provider.chat_body(&request)).unwrap();
        assert_eq!(body["model"], "mistral");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hi");
        assert_eq!(body["stream"], false);

        let request = LlmRequest::simple("Hi");
        let body = serde_json::to_value(provider.chat_body(&request)).unwrap();
        assert_eq!(body["model"], "llama3");
    }
}
