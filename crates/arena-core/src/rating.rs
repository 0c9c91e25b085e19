//! Elo rating model
//!
//! Ratings start at [`DEFAULT_RATING`] and move by at most [`K_FACTOR`] per match.

use serde::{Deserialize, Serialize};

/// Rating assigned to a newly observed parameter value or configuration
pub const DEFAULT_RATING: f64 = 1200.0;

/// Maximum rating swing per match
pub const K_FACTOR: f64 = 32.0;

/// Scale of the logistic curve used for expected scores
const ELO_SCALE: f64 = 400.0;

/// Result of a single match from one side's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    /// Actual score used by the Elo update
    pub fn score(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Loss => 0.0,
            MatchResult::Draw => 0.5,
        }
    }

    /// The same match seen from the other side
    pub fn inverse(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Loss => MatchResult::Win,
            MatchResult::Draw => MatchResult::Draw,
        }
    }
}

/// An Elo rating with cumulative match counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloRating {
    pub rating: f64,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Default for EloRating {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            matches: 0,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }
}

impl EloRating {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rating with a given starting value and no matches
    pub fn with_rating(rating: f64) -> Self {
        Self {
            rating,
            ..Self::default()
        }
    }

    /// Fraction of matches won (draws count as half)
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.draws as f64) / self.matches as f64
    }

    /// Apply one match result against an opponent's pre-match rating
    pub fn record(&mut self, opponent_rating: f64, result: MatchResult) {
        self.rating = updated_rating(self.rating, opponent_rating, result.score());
        self.matches += 1;
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Loss => self.losses += 1,
            MatchResult::Draw => self.draws += 1,
        }
    }
}

/// Expected score of a player rated `rating` against `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
}

/// `R' = R + K * (actual - expected)`
pub fn updated_rating(rating: f64, opponent: f64, actual: f64) -> f64 {
    rating + K_FACTOR * (actual - expected_score(rating, opponent))
}

/// Update two ratings for one match, using both pre-match values
///
/// `draw = false` means `first` beat `second`.
pub fn apply_match(first: &mut EloRating, second: &mut EloRating, draw: bool) {
    let (r1, r2) = (first.rating, second.rating);
    let result = if draw { MatchResult::Draw } else { MatchResult::Win };
    first.record(r2, result);
    second.record(r1, result.inverse());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_between_equals_is_symmetric() {
        let mut winner = EloRating::new();
        let mut loser = EloRating::new();
        apply_match(&mut winner, &mut loser, false);

        assert!(winner.rating > DEFAULT_RATING);
        assert!(loser.rating < DEFAULT_RATING);
        let gain = winner.rating - DEFAULT_RATING;
        let loss = DEFAULT_RATING - loser.rating;
        assert!((gain - loss).abs() < 1e-9);
        assert!((gain - K_FACTOR / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_draw_between_equals_is_neutral() {
        let mut a = EloRating::new();
        let mut b = EloRating::new();
        apply_match(&mut a, &mut b, true);

        assert!((a.rating - DEFAULT_RATING).abs() < 1e-9);
        assert!((b.rating - DEFAULT_RATING).abs() < 1e-9);
        assert_eq!(a.draws, 1);
        assert_eq!(b.draws, 1);
        assert_eq!(a.matches, 1);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let mut favourite = EloRating::with_rating(1400.0);
        let mut underdog = EloRating::with_rating(1200.0);
        apply_match(&mut underdog, &mut favourite, false);
        assert!(underdog.rating - 1200.0 > K_FACTOR / 2.0);
        assert_eq!(underdog.wins, 1);
        assert_eq!(favourite.losses, 1);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let e1 = expected_score(1350.0, 1210.0);
        let e2 = expected_score(1210.0, 1350.0);
        assert!((e1 + e2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_win_rate_counts_draws_as_half() {
        let rating = EloRating {
            rating: DEFAULT_RATING,
            matches: 4,
            wins: 1,
            losses: 1,
            draws: 2,
        };
        assert!((rating.win_rate() - 0.5).abs() < 1e-12);
    }
}
