//! Browser LocalStorage backend

use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::Storage;

use super::{AchievementStore, AttemptStore, ScoreStore, StoreError};
use crate::achievements::Achievement;
use crate::highscores::HighScores;

const SCORES_KEY: &str = "hack_runner_highscores";
const ATTEMPTS_KEY: &str = "hack_runner_attempts";
const ACHIEVEMENTS_KEY: &str = "hack_runner_achievements";

/// JSON documents in `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    /// Read a key, falling back to the default when it was never written
    fn read<T: DeserializeOwned + Default>(key: &str) -> Result<T, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(key).map_err(|_| StoreError::Unavailable)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::Deserialize(e.to_string()))
            }
            None => Ok(T::default()),
        }
    }

    fn write<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        Self::storage()?
            .set_item(key, &json)
            .map_err(|_| StoreError::Unavailable)
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_scores(&self) -> Result<HighScores, StoreError> {
        let scores: HighScores = Self::read(SCORES_KEY)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        Self::write(SCORES_KEY, scores)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

impl AttemptStore for LocalStorageStore {
    fn attempts(&self) -> Result<u32, StoreError> {
        Self::read(ATTEMPTS_KEY)
    }

    fn record_attempt(&mut self) -> Result<u32, StoreError> {
        let attempts = self.attempts()?.saturating_add(1);
        Self::write(ATTEMPTS_KEY, &attempts)?;
        Ok(attempts)
    }
}

impl AchievementStore for LocalStorageStore {
    fn load_achievements(&self) -> Result<Vec<Achievement>, StoreError> {
        Self::read(ACHIEVEMENTS_KEY)
    }

    fn save_achievements(&mut self, unlocked: &[Achievement]) -> Result<(), StoreError> {
        Self::write(ACHIEVEMENTS_KEY, unlocked)
    }
}
