//! Execution results and pairwise evaluation outcomes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::Configuration;

/// What a single scored-function invocation produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutput {
    /// The function returned a value
    Value(Value),
    /// The function failed; the message is kept for the experiment log
    Error(String),
}

/// A configuration paired with its invocation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub configuration: Configuration,
    pub output: ExecutionOutput,
}

impl ExecutionResult {
    pub fn success(configuration: Configuration, value: Value) -> Self {
        Self {
            configuration,
            output: ExecutionOutput::Value(value),
        }
    }

    pub fn failure(configuration: Configuration, message: impl Into<String>) -> Self {
        Self {
            configuration,
            output: ExecutionOutput::Error(message.into()),
        }
    }

    /// The produced value, if the invocation succeeded
    pub fn value(&self) -> Option<&Value> {
        match &self.output {
            ExecutionOutput::Value(v) => Some(v),
            ExecutionOutput::Error(_) => None,
        }
    }

    /// The failure message, if the invocation failed
    pub fn error(&self) -> Option<&str> {
        match &self.output {
            ExecutionOutput::Value(_) => None,
            ExecutionOutput::Error(e) => Some(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.output, ExecutionOutput::Value(_))
    }
}

/// Result of comparing two execution results by index
///
/// For a draw, `winner` and `loser` simply hold the two indices in
/// ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub winner: usize,
    pub loser: usize,
    #[serde(default)]
    pub draw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl EvaluationOutcome {
    pub fn win(winner: usize, loser: usize) -> Self {
        Self {
            winner,
            loser,
            draw: false,
            confidence: None,
            rationale: None,
        }
    }

    pub fn draw(a: usize, b: usize) -> Self {
        Self {
            winner: a.min(b),
            loser: a.max(b),
            draw: true,
            confidence: None,
            rationale: None,
        }
    }

    /// Attach a judge's confidence (clamped to 0..=1)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        });
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}
