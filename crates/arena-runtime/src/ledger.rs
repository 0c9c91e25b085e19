//! Rating ledger - read, apply, persist with conflict retry

use arena_core::{EvaluationOutcome, ExecutionResult, ExperimentHistory, HistoryError};
use arena_persist::{LedgerStore, StorageError};

/// Configuration for ledger updates
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Extra attempts after a version conflict
    pub max_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Errors from recording an experiment
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Ledger storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Invalid outcomes: {0}")]
    History(#[from] HistoryError),
    #[error("Ledger still contended after {attempts} attempts")]
    Contention { attempts: u32 },
}

/// Elo ledger over a [`LedgerStore`]
///
/// Each update loads the whole history, applies one experiment's outcomes
/// and saves it back as one unit. A concurrent writer makes the save fail
/// with a version conflict, in which case the update starts over from a
/// fresh load.
#[derive(Debug)]
pub struct RatingLedger<S: LedgerStore> {
    store: S,
    pub config: LedgerConfig,
}

impl<S: LedgerStore> RatingLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current persisted history
    pub async fn history(&self) -> Result<ExperimentHistory, LedgerError> {
        Ok(self.store.load().await?)
    }

    /// Apply one experiment and persist the result
    ///
    /// Returns the history as saved, including the new experiment record.
    pub async fn record(
        &self,
        description: &str,
        results: &[ExecutionResult],
        outcomes: &[EvaluationOutcome],
    ) -> Result<ExperimentHistory, LedgerError> {
        let attempts = self.config.max_retries + 1;

        for attempt in 1..=attempts {
            let mut history = self.store.load().await?;
            history.apply_experiment(description, results.to_vec(), outcomes.to_vec())?;

            match self.store.save(&history).await {
                Ok(version) => {
                    history.version = version;
                    metrics::counter!("arena_outcomes_recorded_total").increment(outcomes.len() as u64);
                    tracing::info!(
                        store = self.store.name(),
                        description,
                        outcomes = outcomes.len(),
                        version,
                        "Experiment recorded"
                    );
                    return Ok(history);
                }
                Err(e) if e.is_conflict() => {
                    metrics::counter!("arena_ledger_conflicts_total").increment(1);
                    tracing::warn!(attempt, attempts, error = %e, "Ledger conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LedgerError::Contention { attempts })
    }
}
