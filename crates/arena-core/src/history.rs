//! Persistent rating ledger state
//!
//! [`ExperimentHistory`] is the whole document a ledger store reads and writes:
//! every parameter-value rating, every whole-configuration rating, and an
//! append-only log of experiment runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::outcome::{EvaluationOutcome, ExecutionResult};
use crate::rating::{apply_match, EloRating};
use crate::spec::{value_key, Configuration, ParamValue};

/// Rating of one value of one parameter type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRating {
    pub parameter: String,
    pub value: ParamValue,
    #[serde(flatten)]
    pub elo: EloRating,
}

impl ParameterRating {
    fn key(&self) -> (String, String) {
        (self.parameter.clone(), value_key(&self.value))
    }
}

/// Rating of a whole configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRating {
    /// Canonical serialization of `configuration`
    pub key: String,
    pub configuration: Configuration,
    #[serde(flatten)]
    pub elo: EloRating,
}

/// One logged experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub results: Vec<ExecutionResult>,
    pub outcomes: Vec<EvaluationOutcome>,
}

impl ExperimentRecord {
    pub fn new(
        description: &str,
        results: Vec<ExecutionResult>,
        outcomes: Vec<EvaluationOutcome>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            description: description.to_string(),
            results,
            outcomes,
        }
    }
}

/// Errors from applying outcomes to a history
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Outcome references result {index} but only {len} results exist")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Outcome references failed result {0}")]
    FailedResult(usize),
    #[error("Outcome compares result {0} with itself")]
    SelfMatch(usize),
}

/// Aggregate ledger document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentHistory {
    /// Bumped by the store on every successful save
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub parameter_ratings: Vec<ParameterRating>,
    #[serde(default)]
    pub combination_ratings: Vec<CombinationRating>,
    #[serde(default)]
    pub experiments: Vec<ExperimentRecord>,
}

impl ExperimentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has ever been rated
    pub fn is_unrated(&self) -> bool {
        self.combination_ratings.is_empty() && self.parameter_ratings.is_empty()
    }

    /// Rating of a whole configuration, if it has been observed
    pub fn rating_for(&self, configuration: &Configuration) -> Option<&CombinationRating> {
        let key = configuration.canonical_key();
        self.combination_ratings.iter().find(|c| c.key == key)
    }

    /// Rating of one parameter value, if it has been observed
    pub fn parameter_rating(&self, parameter: &str, value: &ParamValue) -> Option<&ParameterRating> {
        let key = value_key(value);
        self.parameter_ratings
            .iter()
            .find(|p| p.parameter == parameter && value_key(&p.value) == key)
    }

    /// Top `n` configurations by rating, highest first
    pub fn top_combinations(&self, n: usize) -> Vec<&CombinationRating> {
        let mut sorted: Vec<_> = self.combination_ratings.iter().collect();
        sorted.sort_by(|a, b| {
            b.elo
                .rating
                .partial_cmp(&a.elo.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        sorted.truncate(n);
        sorted
    }

    /// Every rated value of one parameter type, highest first
    pub fn parameter_rankings(&self, parameter: &str) -> Vec<&ParameterRating> {
        let mut ranked: Vec<_> = self
            .parameter_ratings
            .iter()
            .filter(|p| p.parameter == parameter)
            .collect();
        ranked.sort_by(|a, b| {
            b.elo
                .rating
                .partial_cmp(&a.elo.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| value_key(&a.value).cmp(&value_key(&b.value)))
        });
        ranked
    }

    /// Distinct parameter types in first-seen order
    pub fn parameter_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.parameter_ratings {
            if !seen.contains(&p.parameter.as_str()) {
                seen.push(&p.parameter);
            }
        }
        seen
    }

    /// Apply one experiment's outcomes and append it to the log
    ///
    /// Every successful result's configuration (and each of its parameter
    /// values) gets a rating row if it has none yet. Outcomes are then applied
    /// in order: once to the two whole configurations, and once per parameter
    /// whose value differs between them. Outcomes are validated up front so a
    /// bad index leaves the history untouched.
    pub fn apply_experiment(
        &mut self,
        description: &str,
        results: Vec<ExecutionResult>,
        outcomes: Vec<EvaluationOutcome>,
    ) -> Result<&ExperimentRecord, HistoryError> {
        for outcome in &outcomes {
            for index in [outcome.winner, outcome.loser] {
                let result = results.get(index).ok_or(HistoryError::IndexOutOfRange {
                    index,
                    len: results.len(),
                })?;
                if !result.is_success() {
                    return Err(HistoryError::FailedResult(index));
                }
            }
            if outcome.winner == outcome.loser {
                return Err(HistoryError::SelfMatch(outcome.winner));
            }
        }

        let mut index = RatingIndex::build(self);

        for result in results.iter().filter(|r| r.is_success()) {
            index.combination(self, &result.configuration);
            for (name, value) in result.configuration.iter() {
                index.parameter(self, name, value);
            }
        }

        for outcome in &outcomes {
            let winner = &results[outcome.winner].configuration;
            let loser = &results[outcome.loser].configuration;

            let w = index.combination(self, winner);
            let l = index.combination(self, loser);
            // Two runs of the same configuration carry no rating information
            if w == l {
                continue;
            }
            let (w_elo, l_elo) = pair_mut(&mut self.combination_ratings, w, l);
            apply_match(&mut w_elo.elo, &mut l_elo.elo, outcome.draw);

            for (name, w_value) in winner.iter() {
                let Some(l_value) = loser.get(name) else {
                    continue;
                };
                if w_value == l_value {
                    continue;
                }
                let w = index.parameter(self, name, w_value);
                let l = index.parameter(self, name, l_value);
                let (w_param, l_param) = pair_mut(&mut self.parameter_ratings, w, l);
                apply_match(&mut w_param.elo, &mut l_param.elo, outcome.draw);
            }

            tracing::debug!(
                winner = %winner,
                loser = %loser,
                draw = outcome.draw,
                "Applied outcome"
            );
        }

        self.experiments
            .push(ExperimentRecord::new(description, results, outcomes));
        Ok(&self.experiments[self.experiments.len() - 1])
    }
}

/// Lookup tables from rating keys to row positions
struct RatingIndex {
    combinations: HashMap<String, usize>,
    parameters: HashMap<(String, String), usize>,
}

impl RatingIndex {
    fn build(history: &ExperimentHistory) -> Self {
        Self {
            combinations: history
                .combination_ratings
                .iter()
                .enumerate()
                .map(|(i, c)| (c.key.clone(), i))
                .collect(),
            parameters: history
                .parameter_ratings
                .iter()
                .enumerate()
                .map(|(i, p)| (p.key(), i))
                .collect(),
        }
    }

    /// Row of a configuration, created with the default rating on first sight
    fn combination(&mut self, history: &mut ExperimentHistory, config: &Configuration) -> usize {
        let key = config.canonical_key();
        *self.combinations.entry(key.clone()).or_insert_with(|| {
            history.combination_ratings.push(CombinationRating {
                key,
                configuration: config.clone(),
                elo: EloRating::default(),
            });
            history.combination_ratings.len() - 1
        })
    }

    /// Row of a parameter value, created with the default rating on first sight
    fn parameter(&mut self, history: &mut ExperimentHistory, name: &str, value: &ParamValue) -> usize {
        let key = (name.to_string(), value_key(value));
        *self.parameters.entry(key).or_insert_with(|| {
            history.parameter_ratings.push(ParameterRating {
                parameter: name.to_string(),
                value: value.clone(),
                elo: EloRating::default(),
            });
            history.parameter_ratings.len() - 1
        })
    }
}

/// Two distinct mutable rows of one slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
