//! The scored function under test
//!
//! Anything that turns a [`Configuration`] into a result value implements
//! [`ScoredFunction`]. Async closures returning `Result<Value, ScoreError>`
//! get the implementation for free.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

use crate::spec::Configuration;

/// Failure of a single scored-function invocation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ScoreError(pub String);

impl ScoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for ScoreError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ScoreError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// An asynchronous, possibly failing function of one configuration
#[async_trait]
pub trait ScoredFunction: Send + Sync {
    async fn score(&self, configuration: &Configuration) -> Result<Value, ScoreError>;
}

#[async_trait]
impl<F, Fut> ScoredFunction for F
where
    F: Fn(Configuration) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ScoreError>> + Send,
{
    async fn score(&self, configuration: &Configuration) -> Result<Value, ScoreError> {
        (self)(configuration.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_closure_is_scored_function() {
        let f = |config: Configuration| async move {
            match config.get("model") {
                Some(model) => Ok(json!(format!("hello from {}", model))),
                None => Err(ScoreError::new("no model")),
            }
        };

        let ok = f.score(&Configuration::new().with("model", "m1")).await;
        assert_eq!(ok, Ok(json!("hello from \"m1\"")));

        let err = f.score(&Configuration::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "no model");
    }
}
