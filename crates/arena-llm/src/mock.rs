//! Mock LLM provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

#[derive(Debug)]
enum Behavior {
    /// Cycle through canned responses
    Canned(Vec<String>),
    /// Reply with the rendered prompt and request settings
    Echo,
    /// Always fail with the given message
    Failing(String),
}

/// A mock LLM provider that returns predefined responses
/// Perfect for testing without needing actual LLM access
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    behavior: Behavior,
    /// Current response index
    index: AtomicUsize,
    /// Number of completed calls
    calls: AtomicUsize,
    /// Simulated latency
    latency: Duration,
}

impl MockProvider {
    fn with_behavior(name: &str, behavior: Behavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            index: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            latency: Duration::from_millis(10),
        }
    }

    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self::with_behavior("mock", Behavior::Canned(responses))
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock whose reply reflects the request it received
    ///
    /// Handy for checking how a template rendered a configuration.
    pub fn echo() -> Self {
        Self::with_behavior("echo-mock", Behavior::Echo)
    }

    /// Create a mock that rejects every request
    pub fn failing(message: &str) -> Self {
        Self::with_behavior("failing-mock", Behavior::Failing(message.to_string()))
    }

    /// Override simulated latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of requests served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        !matches!(self.behavior, Behavior::Failing(_))
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();
        tokio::time::sleep(self.latency).await;
        self.calls.fetch_add(1, Ordering::Relaxed);

        let content = match &self.behavior {
            Behavior::Canned(responses) if responses.is_empty() => String::new(),
            Behavior::Canned(responses) => {
                let idx = self.index.fetch_add(1, Ordering::Relaxed);
                responses[idx % responses.len()].clone()
            }
            Behavior::Echo => format!(
                "[model={} temperature={:.2} max_tokens={}] {}",
                request.model.as_deref().unwrap_or("default"),
                request.temperature,
                request.max_tokens,
                request.prompt
            ),
            Behavior::Failing(message) => return Err(LlmError::RequestFailed(message.clone())),
        };

        Ok(LlmResponse {
            content,
            model: request.model.unwrap_or_else(|| self.name.clone()),
            tokens_used: Some((request.prompt.len() / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
