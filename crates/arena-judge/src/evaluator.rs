//! Pairwise tournament evaluation
//!
//! Every unordered pair of successful results is compared exactly once.
//! Pairs touching a failed result are skipped; they are not an error.

use futures::future::try_join_all;
use serde_json::Value;
use std::cmp::Ordering;

use arena_core::{EvaluationOutcome, ExecutionResult};

use crate::judge::{Choice, JudgeError};
use crate::strategy::{Comparison, EvaluationStrategy, Metric};

static NULL: Value = Value::Null;

/// Errors from pairwise evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Unknown evaluation strategy: {0}")]
    UnknownStrategy(String),
    #[error("Judged evaluation requested without a judge")]
    MissingJudge,
    #[error("Metric '{metric}' unavailable for result {index}")]
    MetricUnavailable { metric: String, index: usize },
    #[error("Judge failed on pair ({a}, {b}): {source}")]
    Judge {
        a: usize,
        b: usize,
        #[source]
        source: JudgeError,
    },
}

/// Runs round-robin comparisons over a result list
#[derive(Debug, Clone, Default)]
pub struct PairwiseEvaluator;

impl PairwiseEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Index pairs `(i, j)`, `i < j`, where both results succeeded
    pub fn valid_pairs(results: &[ExecutionResult]) -> Vec<(usize, usize)> {
        let valid: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_success())
            .map(|(i, _)| i)
            .collect();

        let mut pairs = Vec::with_capacity(valid.len() * valid.len().saturating_sub(1) / 2);
        for (n, &i) in valid.iter().enumerate() {
            for &j in &valid[n + 1..] {
                pairs.push((i, j));
            }
        }
        pairs
    }

    /// Compare every valid pair under `strategy`
    ///
    /// For `k` successful results this yields `k(k-1)/2` outcomes, ordered by
    /// `(i, j)`. Judge calls for different pairs run concurrently.
    pub async fn evaluate(
        &self,
        results: &[ExecutionResult],
        strategy: &EvaluationStrategy,
        criteria: &str,
    ) -> Result<Vec<EvaluationOutcome>, EvaluationError> {
        let pairs = Self::valid_pairs(results);
        let value = |i: usize| results[i].value().unwrap_or(&NULL);

        let outcomes = match strategy {
            EvaluationStrategy::Numeric(metric) => {
                let mut outcomes = Vec::with_capacity(pairs.len());
                for &(i, j) in &pairs {
                    let a = extract(metric, value(i), i)?;
                    let b = extract(metric, value(j), j)?;
                    outcomes.push(match a.partial_cmp(&b) {
                        Some(Ordering::Greater) => EvaluationOutcome::win(i, j),
                        Some(Ordering::Less) => EvaluationOutcome::win(j, i),
                        _ => EvaluationOutcome::draw(i, j),
                    });
                }
                outcomes
            }
            EvaluationStrategy::Custom(compare) => pairs
                .iter()
                .map(|&(i, j)| match compare(value(i), value(j)) {
                    Comparison::FirstWins => EvaluationOutcome::win(i, j),
                    Comparison::SecondWins => EvaluationOutcome::win(j, i),
                    Comparison::Draw => EvaluationOutcome::draw(i, j),
                })
                .collect(),
            EvaluationStrategy::Judged(judge) => {
                let calls = pairs.iter().map(|&(i, j)| {
                    let judge = judge.clone();
                    async move {
                        let verdict = judge
                            .judge(value(i), value(j), criteria)
                            .await
                            .map_err(|source| EvaluationError::Judge { a: i, b: j, source })?;
                        let outcome = match verdict.choice {
                            Choice::A => EvaluationOutcome::win(i, j),
                            Choice::B => EvaluationOutcome::win(j, i),
                            Choice::Draw => EvaluationOutcome::draw(i, j),
                        };
                        Ok::<_, EvaluationError>(
                            outcome
                                .with_confidence(verdict.confidence)
                                .with_rationale(verdict.reasoning),
                        )
                    }
                });
                try_join_all(calls).await?
            }
        };

        metrics::counter!("arena_outcomes_evaluated_total").increment(outcomes.len() as u64);
        tracing::info!(
            strategy = %strategy.label(),
            results = results.len(),
            pairs = outcomes.len(),
            draws = outcomes.iter().filter(|o| o.draw).count(),
            "Pairwise evaluation complete"
        );
        Ok(outcomes)
    }
}

fn extract(metric: &Metric, value: &Value, index: usize) -> Result<f64, EvaluationError> {
    metric
        .extract(value)
        .ok_or_else(|| EvaluationError::MetricUnavailable {
            metric: metric.to_string(),
            index,
        })
}
