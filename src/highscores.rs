//! High score leaderboard
//!
//! Tracks the top 10 hack percentages. Storage goes through a
//! [`ScoreStore`](crate::persistence::ScoreStore).

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Hack completion, 0-100
    pub percent: f64,
    /// Boss cores beaten in the run
    pub bosses_defeated: u32,
    /// Run reached 100%
    pub won: bool,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Entry for a finished run
    pub fn from_state(state: &GameState, timestamp: f64) -> Self {
        Self {
            percent: state.hack_percent(),
            bosses_defeated: state.bosses_defeated,
            won: state.game_won,
            timestamp,
        }
    }
}

/// High score leaderboard, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a percentage qualifies for the leaderboard
    pub fn qualifies(&self, percent: f64) -> bool {
        if percent <= 0.0 || !percent.is_finite() {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| percent > e.percent)
    }

    /// Get the rank a percentage would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, percent: f64) -> Option<usize> {
        if !self.qualifies(percent) {
            return None;
        }
        let rank = self.entries.iter().position(|e| percent > e.percent);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry (if it qualifies) and return the rank achieved
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.percent) {
            return None;
        }

        // Find insertion point (sorted descending)
        let pos = self.entries.iter().position(|e| entry.percent > e.percent);
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

    /// Best percentage so far
    pub fn top(&self) -> Option<f64> {
        self.entries.first().map(|e| e.percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(percent: f64) -> HighScoreEntry {
        HighScoreEntry {
            percent,
            bosses_defeated: 0,
            won: false,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_add_keeps_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(entry(10.0)), Some(1));
        assert_eq!(scores.add(entry(30.0)), Some(1));
        assert_eq!(scores.add(entry(20.0)), Some(2));
        let order: Vec<f64> = scores.entries.iter().map(|e| e.percent).collect();
        assert_eq!(order, vec![30.0, 20.0, 10.0]);
        assert_eq!(scores.top(), Some(30.0));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0.0));
        assert!(!scores.qualifies(f64::NAN));
    }

    #[test]
    fn test_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES {
            scores.add(entry(i as f64));
        }
        assert!(!scores.qualifies(0.5));
        assert_eq!(scores.potential_rank(5.5), Some(6));
        assert_eq!(scores.add(entry(100.0)), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.percent), Some(2.0));
    }

    #[test]
    fn test_entry_from_state() {
        let mut state = GameState::new(800.0, 600.0);
        state.score = 12_345.0;
        state.bosses_defeated = 1;
        let entry = HighScoreEntry::from_state(&state, 1.0);
        assert!((entry.percent - 12.345).abs() < 1e-9);
        assert_eq!(entry.bosses_defeated, 1);
        assert!(!entry.won);
    }
}
