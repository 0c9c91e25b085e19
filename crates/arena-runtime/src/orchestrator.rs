//! Orchestrator - drives the run, evaluate, record, evolve pipeline

use rand::Rng;

use arena_core::{
    cartesian, optimal_configuration, Configuration, EvaluationOutcome, EvolutionEngine,
    ExecutionResult, ExperimentHistory, GeneticOperator, ParameterSpec, ScoredFunction,
};
use arena_judge::{EvaluationError, EvaluationStrategy, PairwiseEvaluator};
use arena_persist::LedgerStore;

use crate::ledger::{LedgerConfig, LedgerError, RatingLedger};
use crate::runner::{ExperimentRunner, RunnerConfig};

/// Errors from running an experiment
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("Parameter specification has no parameters")]
    EmptySpecification,
    /// Evaluation failed after the batch ran; the results are handed back
    #[error("Evaluation of {} results failed: {source}", .results.len())]
    Evaluation {
        results: Vec<ExecutionResult>,
        #[source]
        source: EvaluationError,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What to do with a batch once it has settled
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    /// Logged with the experiment and given to the judge as its criteria
    pub description: String,
    pub strategy: EvaluationStrategy,
}

impl EvaluationPlan {
    pub fn new(description: impl Into<String>, strategy: EvaluationStrategy) -> Self {
        Self {
            description: description.into(),
            strategy,
        }
    }
}

/// Result of one experiment run
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub results: Vec<ExecutionResult>,
    pub outcomes: Vec<EvaluationOutcome>,
    /// Ledger as saved, when the run was evaluated and recorded
    pub history: Option<ExperimentHistory>,
}

impl ExperimentReport {
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.results.len() - self.successes()
    }
}

/// Runs experiments against one ledger
#[derive(Debug)]
pub struct Orchestrator<S: LedgerStore> {
    runner: ExperimentRunner,
    evaluator: PairwiseEvaluator,
    ledger: RatingLedger<S>,
}

impl<S: LedgerStore> Orchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            runner: ExperimentRunner::default(),
            evaluator: PairwiseEvaluator::new(),
            ledger: RatingLedger::new(store),
        }
    }

    pub fn with_runner_config(mut self, config: RunnerConfig) -> Self {
        self.runner = ExperimentRunner::new(config);
        self
    }

    pub fn with_ledger_config(mut self, config: LedgerConfig) -> Self {
        self.ledger.config = config;
        self
    }

    pub fn ledger(&self) -> &RatingLedger<S> {
        &self.ledger
    }

    /// Expand `spec`, run every configuration, and optionally rate the results
    pub async fn run_experiment<F>(
        &self,
        spec: &ParameterSpec,
        function: &F,
        plan: Option<&EvaluationPlan>,
    ) -> Result<ExperimentReport, ExperimentError>
    where
        F: ScoredFunction + ?Sized,
    {
        spec.validate()
            .map_err(|_| ExperimentError::EmptySpecification)?;
        let configurations = cartesian(spec);
        if configurations.is_empty() {
            tracing::warn!("A parameter has no candidate values, nothing to run");
        }
        self.run_configurations(&configurations, function, plan).await
    }

    /// Run an explicit configuration list, e.g. an evolved population
    pub async fn run_configurations<F>(
        &self,
        configurations: &[Configuration],
        function: &F,
        plan: Option<&EvaluationPlan>,
    ) -> Result<ExperimentReport, ExperimentError>
    where
        F: ScoredFunction + ?Sized,
    {
        let results = self.runner.run(configurations, function).await;

        let Some(plan) = plan else {
            return Ok(ExperimentReport {
                results,
                outcomes: Vec::new(),
                history: None,
            });
        };

        let outcomes = match self
            .evaluator
            .evaluate(&results, &plan.strategy, &plan.description)
            .await
        {
            Ok(outcomes) => outcomes,
            Err(source) => {
                tracing::warn!(
                    results = results.len(),
                    error = %source,
                    "Evaluation failed, nothing recorded"
                );
                return Err(ExperimentError::Evaluation { results, source });
            }
        };
        let history = self
            .ledger
            .record(&plan.description, &results, &outcomes)
            .await?;

        Ok(ExperimentReport {
            results,
            outcomes,
            history: Some(history),
        })
    }

    /// Propose a new population from the current ledger
    pub async fn evolve<R, O>(
        &self,
        spec: &ParameterSpec,
        engine: &mut EvolutionEngine<R, O>,
    ) -> Result<Vec<Configuration>, ExperimentError>
    where
        R: Rng,
        O: GeneticOperator,
    {
        let history = self.ledger.history().await?;
        Ok(engine.evolve(spec, &history))
    }

    /// Alternate evolve, run and record for `generations` rounds
    ///
    /// The first generation is random when the ledger is empty.
    pub async fn evolve_generations<F, R, O>(
        &self,
        spec: &ParameterSpec,
        function: &F,
        plan: &EvaluationPlan,
        engine: &mut EvolutionEngine<R, O>,
        generations: usize,
    ) -> Result<Vec<ExperimentReport>, ExperimentError>
    where
        F: ScoredFunction + ?Sized,
        R: Rng,
        O: GeneticOperator,
    {
        spec.validate()
            .map_err(|_| ExperimentError::EmptySpecification)?;

        let mut reports = Vec::with_capacity(generations);
        for generation in 1..=generations {
            let population = self.evolve(spec, engine).await?;
            let step = EvaluationPlan {
                description: format!("{} (generation {})", plan.description, generation),
                strategy: plan.strategy.clone(),
            };
            let report = self
                .run_configurations(&population, function, Some(&step))
                .await?;
            tracing::info!(
                generation,
                population = population.len(),
                failures = report.failures(),
                "Generation complete"
            );
            reports.push(report);
        }
        Ok(reports)
    }

    /// Best-rated value for each requested parameter type
    pub async fn optimal<T: AsRef<str>>(&self, parameters: &[T]) -> Result<Configuration, ExperimentError> {
        let history = self.ledger.history().await?;
        Ok(optimal_configuration(&history, parameters))
    }
}
