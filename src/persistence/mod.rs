//! Persistence for scores, attempts and achievements
//!
//! The game never reaches into storage directly. The host hands a store to
//! the [`Session`](crate::Session), which reports finished runs to it.
//!
//! - `MemoryStore`: in-process, used natively and in tests
//! - `LocalStorageStore`: browser LocalStorage as JSON (wasm32 only)

use std::fmt;

use crate::achievements::Achievement;
use crate::highscores::HighScores;

#[cfg(target_arch = "wasm32")]
mod local_storage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage cannot be reached
    Unavailable,
    Serialize(String),
    Deserialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Serialize(msg) => write!(f, "failed to serialize: {msg}"),
            Self::Deserialize(msg) => write!(f, "failed to deserialize: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Leaderboard storage
pub trait ScoreStore {
    fn load_scores(&self) -> Result<HighScores, StoreError>;
    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError>;
}

/// Count of runs started
pub trait AttemptStore {
    fn attempts(&self) -> Result<u32, StoreError>;
    /// Count one more attempt and return the new total
    fn record_attempt(&mut self) -> Result<u32, StoreError>;
}

/// Unlocked achievements
pub trait AchievementStore {
    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError>;
    fn save_achievements(&mut self, unlocked: &[Achievement]) -> Result<(), StoreError>;
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub scores: HighScores,
    pub attempts: u32,
    pub achievements: Vec<Achievement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_scores(&self) -> Result<HighScores, StoreError> {
        Ok(self.scores.clone())
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        self.scores = scores.clone();
        Ok(())
    }
}

impl AttemptStore for MemoryStore {
    fn attempts(&self) -> Result<u32, StoreError> {
        Ok(self.attempts)
    }

    fn record_attempt(&mut self) -> Result<u32, StoreError> {
        self.attempts = self.attempts.saturating_add(1);
        Ok(self.attempts)
    }
}

impl AchievementStore for MemoryStore {
    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        Ok(self.achievements.clone())
    }

    fn save_achievements(&mut self, unlocked: &[Achievement]) -> Result<(), StoreError> {
        self.achievements = unlocked.to_vec();
        Ok(())
    }
}

/// Everything a session reports to
pub trait GameStore: ScoreStore + AttemptStore + AchievementStore {}

impl<T: ScoreStore + AttemptStore + AchievementStore> GameStore for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreEntry;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add(HighScoreEntry {
            percent: 42.0,
            bosses_defeated: 1,
            won: false,
            timestamp: 0.0,
        });
        store.save_scores(&scores).unwrap();
        assert_eq!(store.load_scores().unwrap(), scores);

        assert_eq!(store.record_attempt().unwrap(), 1);
        assert_eq!(store.record_attempt().unwrap(), 2);
        assert_eq!(store.attempts().unwrap(), 2);

        store.save_achievements(&[Achievement::FirstKey]).unwrap();
        assert_eq!(store.load_achievements().unwrap(), vec![Achievement::FirstKey]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::Unavailable.to_string(), "storage unavailable");
        let err = StoreError::Deserialize("bad json".into());
        assert_eq!(err.to_string(), "failed to deserialize: bad json");
    }
}
