//! # Arena Judge
//!
//! Round-robin comparison of execution results.
//!
//! ## Key Types
//!
//! - [`PairwiseEvaluator`] - compares every pair of successful results once
//! - [`EvaluationStrategy`] - numeric metric, custom comparison, or judge
//! - [`Judge`] / [`LlmJudge`] - external verdicts with confidence and reasoning
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_core::{Configuration, ExecutionResult};
//! use arena_judge::{EvaluationStrategy, PairwiseEvaluator};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let results = vec![
//!         ExecutionResult::success(Configuration::new().with("model", "a"), json!("a long answer")),
//!         ExecutionResult::success(Configuration::new().with("model", "b"), json!("short")),
//!     ];
//!     let outcomes = PairwiseEvaluator::new()
//!         .evaluate(&results, &EvaluationStrategy::length(), "")
//!         .await
//!         .unwrap();
//!     assert_eq!(outcomes[0].winner, 0);
//! }
//! ```

pub mod evaluator;
pub mod judge;
pub mod strategy;

pub use evaluator::{EvaluationError, PairwiseEvaluator};
pub use judge::{parse_verdict, Choice, Judge, JudgeError, LlmJudge, Verdict};
pub use strategy::{CompareFn, Comparison, EvaluationStrategy, Metric};
