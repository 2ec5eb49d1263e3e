//! High score leaderboard
//!
//! Tracks the top 10 runs. The caller supplies timestamps and owns storage.

use serde::{Deserialize, Serialize};

use crate::stats::SessionSummary;
use crate::tuning::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    /// Longest combo of the run
    #[serde(default)]
    pub max_combo: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a finished run. Returns the rank achieved (1-indexed)
    /// or None if it didn't qualify. Ties rank below earlier runs.
    pub fn add_score(&mut self, summary: &SessionSummary, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(summary.score)?;

        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score: summary.score,
                wave: summary.wave,
                max_combo: summary.max_combo,
                difficulty: summary.difficulty,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New high score #{}: {}", rank, summary.score);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a saved JSON blob; anything unreadable starts fresh
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScores>(json) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("Discarding unreadable high scores: {}", err);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> SessionSummary {
        SessionSummary {
            score,
            wave: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&run(500), 1.0), Some(1));
        assert_eq!(scores.add_score(&run(900), 2.0), Some(1));
        assert_eq!(scores.add_score(&run(700), 3.0), Some(2));
        // Tie goes below the existing entry
        assert_eq!(scores.add_score(&run(700), 4.0), Some(3));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![900, 700, 700, 500]);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_full_board_trims() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(&run(i * 100), i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_score(&run(50), 0.0), None);

        assert_eq!(scores.add_score(&run(150), 0.0), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(150));
    }

    #[test]
    fn test_json_round_trip_and_garbage() {
        let mut scores = HighScores::new();
        scores.add_score(&run(1234), 42.0);
        let back = HighScores::from_json(&scores.to_json());
        assert_eq!(back, scores);

        assert!(HighScores::from_json("not json").is_empty());
    }
}
