//! Achievements
//!
//! The simulation hands every new state to an [`AchievementObserver`]. The
//! tracker here turns those snapshots into unlocks; storing them is left to
//! an [`AchievementStore`](crate::persistence::AchievementStore).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Receives the game state after each step
pub trait AchievementObserver {
    fn observe(&mut self, state: &GameState);
}

/// No achievements
impl AchievementObserver for () {
    fn observe(&mut self, _state: &GameState) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstKey,
    KeyHoarder,
    Backdoor,
    FirstBoss,
    BossLevel2,
    BossLevel3,
    HalfHack,
    FullHack,
}

/// Safety keys needed in a single run for `KeyHoarder`
pub const KEY_HOARDER_COUNT: u32 = 5;

impl Achievement {
    pub const ALL: [Achievement; 8] = [
        Achievement::FirstKey,
        Achievement::KeyHoarder,
        Achievement::Backdoor,
        Achievement::FirstBoss,
        Achievement::BossLevel2,
        Achievement::BossLevel3,
        Achievement::HalfHack,
        Achievement::FullHack,
    ];

    /// Stable identifier used in storage and by the UI
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstKey => "first_key",
            Achievement::KeyHoarder => "key_hoarder",
            Achievement::Backdoor => "backdoor",
            Achievement::FirstBoss => "first_boss",
            Achievement::BossLevel2 => "boss_level_2",
            Achievement::BossLevel3 => "boss_level_3",
            Achievement::HalfHack => "half_hack",
            Achievement::FullHack => "full_hack",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    /// Whether this state satisfies the unlock rule
    pub fn is_met(&self, state: &GameState) -> bool {
        match self {
            Achievement::FirstKey => state.collected_safety_keys >= 1,
            Achievement::KeyHoarder => state.collected_safety_keys >= KEY_HOARDER_COUNT,
            Achievement::Backdoor => state.collected_backdoors >= 1,
            Achievement::FirstBoss => state.bosses_defeated >= 1,
            Achievement::BossLevel2 => state.highest_boss_level >= 2,
            Achievement::BossLevel3 => state.highest_boss_level >= 3,
            Achievement::HalfHack => state.hack_percent() >= 50.0,
            Achievement::FullHack => state.game_won,
        }
    }
}

/// Rule-based tracker that remembers what is already unlocked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementTracker {
    unlocked: BTreeSet<Achievement>,
    #[serde(skip)]
    fresh: Vec<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously stored set
    pub fn with_unlocked(unlocked: impl IntoIterator<Item = Achievement>) -> Self {
        Self {
            unlocked: unlocked.into_iter().collect(),
            fresh: Vec::new(),
        }
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> impl Iterator<Item = Achievement> + '_ {
        self.unlocked.iter().copied()
    }

    /// Unlocks since the last call, oldest first
    pub fn take_fresh(&mut self) -> Vec<Achievement> {
        std::mem::take(&mut self.fresh)
    }
}

impl AchievementObserver for AchievementTracker {
    fn observe(&mut self, state: &GameState) {
        for achievement in Achievement::ALL {
            if !self.unlocked.contains(&achievement) && achievement.is_met(state) {
                log::info!("Achievement unlocked: {}", achievement.id());
                self.unlocked.insert(achievement);
                self.fresh.push(achievement);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_once() {
        let mut tracker = AchievementTracker::new();
        let mut state = GameState::new(800.0, 600.0);
        state.collected_safety_keys = 1;

        tracker.observe(&state);
        tracker.observe(&state);
        assert_eq!(tracker.take_fresh(), vec![Achievement::FirstKey]);
        assert!(tracker.take_fresh().is_empty());
        assert!(tracker.is_unlocked(Achievement::FirstKey));
    }

    #[test]
    fn test_boss_levels() {
        let mut tracker = AchievementTracker::new();
        let mut state = GameState::new(800.0, 600.0);
        state.bosses_defeated = 2;
        state.highest_boss_level = 2;
        tracker.observe(&state);
        let fresh = tracker.take_fresh();
        assert!(fresh.contains(&Achievement::FirstBoss));
        assert!(fresh.contains(&Achievement::BossLevel2));
        assert!(!fresh.contains(&Achievement::BossLevel3));
    }

    #[test]
    fn test_half_and_full_hack() {
        let mut tracker = AchievementTracker::new();
        let mut state = GameState::new(800.0, 600.0);
        state.score = 50_000.0;
        tracker.observe(&state);
        assert!(tracker.is_unlocked(Achievement::HalfHack));
        assert!(!tracker.is_unlocked(Achievement::FullHack));

        state.game_won = true;
        tracker.observe(&state);
        assert!(tracker.is_unlocked(Achievement::FullHack));
    }

    #[test]
    fn test_restored_set_is_not_fresh() {
        let mut tracker = AchievementTracker::with_unlocked([Achievement::Backdoor]);
        let mut state = GameState::new(800.0, 600.0);
        state.collected_backdoors = 1;
        tracker.observe(&state);
        assert!(tracker.take_fresh().is_empty());
    }

    #[test]
    fn test_id_round_trip() {
        for achievement in Achievement::ALL {
            assert_eq!(Achievement::from_id(achievement.id()), Some(achievement));
        }
        assert_eq!(Achievement::from_id("nope"), None);
    }
}
