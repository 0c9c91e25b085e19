//! Ranked views over an [`ExperimentHistory`] for display and export

use serde::Serialize;

use crate::history::ExperimentHistory;
use crate::spec::{Configuration, ParamValue};

/// One row of a ranking table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<T> {
    pub rank: usize,
    pub item: T,
    pub rating: f64,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
}

/// Ranking of the values of one parameter type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterTable {
    pub parameter: String,
    pub entries: Vec<RankedEntry<ParamValue>>,
}

/// Ranked parameter and combination tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub experiments: usize,
    pub parameters: Vec<ParameterTable>,
    pub combinations: Vec<RankedEntry<Configuration>>,
}

impl Leaderboard {
    /// Build tables, keeping at most `top` rows per table
    pub fn from_history(history: &ExperimentHistory, top: usize) -> Self {
        let parameters = history
            .parameter_types()
            .into_iter()
            .map(|name| ParameterTable {
                parameter: name.to_string(),
                entries: history
                    .parameter_rankings(name)
                    .into_iter()
                    .take(top)
                    .enumerate()
                    .map(|(i, p)| entry(i, p.value.clone(), &p.elo))
                    .collect(),
            })
            .collect();

        let combinations = history
            .top_combinations(top)
            .into_iter()
            .enumerate()
            .map(|(i, c)| entry(i, c.configuration.clone(), &c.elo))
            .collect();

        Self {
            experiments: history.experiments.len(),
            parameters,
            combinations,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn entry<T>(index: usize, item: T, elo: &crate::rating::EloRating) -> RankedEntry<T> {
    RankedEntry {
        rank: index + 1,
        item,
        rating: elo.rating,
        matches: elo.matches,
        wins: elo.wins,
        losses: elo.losses,
        draws: elo.draws,
        win_rate: elo.win_rate(),
    }
}
