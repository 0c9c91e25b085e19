//! # Arena LLM
//!
//! LLM provider integrations used as scored functions and judges.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | Ollama | Local | None |
//! | Mock | Testing | None |
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_core::{Configuration, ScoredFunction};
//! use arena_llm::{LlmScoredFunction, MockProvider, PromptTemplate};
//!
//! #[tokio::main]
//! async fn main() {
//!     let template = PromptTemplate::new("Describe {topic} in one sentence");
//!     let scored = LlmScoredFunction::new(MockProvider::echo(), template);
//!
//!     let config = Configuration::new().with("topic", "Elo").with("temperature", 0.2);
//!     let value = scored.score(&config).await.unwrap();
//!     println!("{}", value);
//! }
//! ```

pub mod config;
pub mod mock;
pub mod ollama;
pub mod provider;
pub mod template;

pub use config::{ArenaConfig, ConfigError, LlmConfig};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};
pub use template::{LlmScoredFunction, PromptTemplate};
