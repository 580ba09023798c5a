//! Score statistics for batches of snake games.
//!
//! The evaluation series reports the mean score per checkpoint, so the summary
//! keeps the mean alongside the extremes and how often the snake ate at all.

use serde::{Deserialize, Serialize};

/// Aggregate over the final scores of a batch of games.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub games: usize,
    pub total: u64,
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    /// Games that ended with at least one food eaten.
    pub scoring_games: usize,
}

impl ScoreSummary {
    /// Summarizes `scores`. An empty batch yields zeros throughout.
    pub fn from_scores(scores: &[u32]) -> Self {
        let games = scores.len();
        let total: u64 = scores.iter().map(|&score| u64::from(score)).sum();
        let mean = if games == 0 {
            0.0
        } else {
            total as f64 / games as f64
        };
        Self {
            games,
            total,
            mean,
            min: scores.iter().copied().min().unwrap_or(0),
            max: scores.iter().copied().max().unwrap_or(0),
            scoring_games: scores.iter().filter(|&&score| score > 0).count(),
        }
    }
}
