//! # Arena Core
//!
//! Core types for Arena:
//! - [`ParameterSpec`] / [`Configuration`] - parameter space and concrete points in it
//! - [`cartesian`] - full expansion of a spec
//! - [`EloRating`] - rating arithmetic shared by every ledger
//! - [`ExperimentHistory`] - the persisted rating ledger document
//! - [`EvolutionEngine`] - elite selection, crossover and mutation over ratings
//! - [`ScoredFunction`] - the function whose configurations are compared

pub mod combination;
pub mod evolution;
pub mod history;
pub mod outcome;
pub mod rating;
pub mod report;
pub mod scored;
pub mod spec;

pub use combination::cartesian;
pub use evolution::{
    optimal_configuration, EvolutionConfig, EvolutionEngine, GeneticOperator, StandardOperator,
};
pub use history::{
    CombinationRating, ExperimentHistory, ExperimentRecord, HistoryError, ParameterRating,
};
pub use outcome::{EvaluationOutcome, ExecutionOutput, ExecutionResult};
pub use rating::{EloRating, MatchResult, DEFAULT_RATING, K_FACTOR};
pub use report::{Leaderboard, ParameterTable, RankedEntry};
pub use scored::{ScoreError, ScoredFunction};
pub use spec::{Configuration, ParamValue, Parameter, ParameterSpec, SpecError};
