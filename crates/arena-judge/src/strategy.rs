//! Evaluation strategies
//!
//! A closed set of ways to compare two results: a numeric metric, a caller
//! supplied comparison, or an external judge.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::evaluator::EvaluationError;
use crate::judge::Judge;

/// Scalar extracted from a result value; larger wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    /// Character count of strings, element count of arrays, and the length
    /// of the compact JSON text for anything else
    Length,
    /// A numeric field, addressed by top-level key or by JSON pointer (`/a/b`)
    Field(String),
}

impl Metric {
    pub fn extract(&self, value: &Value) -> Option<f64> {
        match self {
            Metric::Length => Some(match value {
                Value::String(s) => s.chars().count() as f64,
                Value::Array(items) => items.len() as f64,
                other => other.to_string().chars().count() as f64,
            }),
            Metric::Field(path) => {
                let field = if path.starts_with('/') {
                    value.pointer(path)
                } else {
                    value.get(path)
                };
                field.and_then(Value::as_f64)
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Length => f.write_str("length"),
            Metric::Field(path) => write!(f, "field:{}", path),
        }
    }
}

impl FromStr for Metric {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "length" | "len" => Ok(Metric::Length),
            other => match other.strip_prefix("field:") {
                Some(path) if !path.is_empty() => Ok(Metric::Field(path.to_string())),
                _ => Err(EvaluationError::UnknownStrategy(other.to_string())),
            },
        }
    }
}

/// Result of a custom comparison of `a` against `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    FirstWins,
    SecondWins,
    Draw,
}

/// Caller-supplied comparison function
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Comparison + Send + Sync>;

/// How pairs of results are compared
#[derive(Clone)]
pub enum EvaluationStrategy {
    Numeric(Metric),
    Custom(CompareFn),
    Judged(Arc<dyn Judge>),
}

impl EvaluationStrategy {
    pub fn length() -> Self {
        EvaluationStrategy::Numeric(Metric::Length)
    }

    pub fn field(path: &str) -> Self {
        EvaluationStrategy::Numeric(Metric::Field(path.to_string()))
    }

    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Comparison + Send + Sync + 'static,
    {
        EvaluationStrategy::Custom(Arc::new(compare))
    }

    pub fn judged<J: Judge + 'static>(judge: J) -> Self {
        EvaluationStrategy::Judged(Arc::new(judge))
    }

    /// Resolve a strategy by name (`length`, `field:<path>`, `judge`)
    ///
    /// `judge` needs a judge collaborator; any other name is rejected.
    pub fn from_name(name: &str, judge: Option<Arc<dyn Judge>>) -> Result<Self, EvaluationError> {
        match name.trim() {
            "judge" | "judged" => judge
                .map(EvaluationStrategy::Judged)
                .ok_or(EvaluationError::MissingJudge),
            other => other.parse().map(EvaluationStrategy::Numeric),
        }
    }

    /// Short label for logs and experiment records
    pub fn label(&self) -> String {
        match self {
            EvaluationStrategy::Numeric(metric) => metric.to_string(),
            EvaluationStrategy::Custom(_) => "custom".to_string(),
            EvaluationStrategy::Judged(_) => "judged".to_string(),
        }
    }
}

impl fmt::Debug for EvaluationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationStrategy::Numeric(metric) => f.debug_tuple("Numeric").field(metric).finish(),
            EvaluationStrategy::Custom(_) => f.write_str("Custom(..)"),
            EvaluationStrategy::Judged(_) => f.write_str("Judged(..)"),
        }
    }
}
