//! # Arena Runtime
//!
//! Tokio-based experiment pipeline.
//!
//! - [`ExperimentRunner`] invokes the scored function over a batch
//! - [`RatingLedger`] records outcomes with optimistic versioning
//! - [`Orchestrator`] wires runner, evaluator, ledger and evolution together

pub mod ledger;
pub mod orchestrator;
pub mod runner;

pub use ledger::{LedgerConfig, LedgerError, RatingLedger};
pub use orchestrator::{EvaluationPlan, ExperimentError, ExperimentReport, Orchestrator};
pub use runner::{ExperimentRunner, RunnerConfig};
