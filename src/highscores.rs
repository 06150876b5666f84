//! High score leaderboard
//!
//! Persisted as a JSON file, tracks the top 10 scores. Load and save
//! failures are logged and otherwise ignored; a missing or corrupt file
//! just means a fresh leaderboard.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Level reached
    pub level: u32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
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
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a score if it qualifies.
    /// Returns the rank achieved (1-indexed) or None.
    pub fn add_score(&mut self, score: u32, level: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, level };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top score, or 0 for an empty leaderboard
    pub fn top_score(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// Load the leaderboard from a JSON file, falling back to empty
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("high score file corrupt, starting fresh: {err}");
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high score file, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the leaderboard. Failure is cosmetic and only logged.
    pub fn save_to(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("failed to serialize high scores: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(path, json) {
            log::warn!("failed to save high scores: {err}");
        } else {
            log::info!("high scores saved ({} entries)", self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_insert_in_rank_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 1), Some(1));
        assert_eq!(scores.add_score(300, 2), Some(1));
        assert_eq!(scores.add_score(200, 1), Some(2));

        let values: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
    }

    #[test]
    fn zero_scores_never_qualify() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1), None);
    }

    #[test]
    fn leaderboard_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=15u32 {
            scores.add_score(i * 10, 1);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), 150);
        // The lowest surviving entry is 60; 50 no longer qualifies
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(65));
    }

    #[test]
    fn round_trips_through_json() {
        let mut scores = HighScores::new();
        scores.add_score(500, 3);
        scores.add_score(250, 2);

        let json = serde_json::to_string(&scores).unwrap();
        let back: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries.len(), 2);
        assert_eq!(back.top_score(), 500);
    }
}
