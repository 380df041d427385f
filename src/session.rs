//! Host loop
//!
//! A `Session` owns everything the simulation needs from the outside: the
//! seeded RNG, the frame clock, the achievement tracker and the stores. The
//! platform layer calls [`Session::frame`] once per animation frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::achievements::{Achievement, AchievementTracker};
use crate::consts::FRAME_MS;
use crate::highscores::HighScoreEntry;
use crate::persistence::GameStore;
use crate::settings::Settings;
use crate::sim::{
    GameState, TickInput, end_game, init_game_state, start_game, toggle_cursor_control,
    update_game_state,
};

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub won: bool,
    /// Final hack completion, 0-100
    pub percent: f64,
    /// Leaderboard rank if the run made it
    pub rank: Option<usize>,
}

pub struct Session<S: GameStore> {
    state: GameState,
    rng: Pcg32,
    settings: Settings,
    tracker: AchievementTracker,
    unlocked: Vec<Achievement>,
    store: S,
    last_timestamp: Option<f64>,
    running: bool,
}

impl<S: GameStore> Session<S> {
    pub fn new(width: f32, height: f32, seed: u64, settings: Settings, store: S) -> Self {
        let tracker = match store.load_achievements() {
            Ok(unlocked) => AchievementTracker::with_unlocked(unlocked),
            Err(err) => {
                log::warn!("Could not load achievements: {err}");
                AchievementTracker::new()
            }
        };
        let mut state = init_game_state(width, height);
        state.selected_skin = settings.selected_skin.clone();
        state.cursor_control = settings.cursor_control;

        Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            tracker,
            unlocked: Vec::new(),
            store,
            last_timestamp: None,
            running: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a new run and count the attempt
    pub fn start(&mut self) {
        self.state = start_game(&self.state);
        self.running = true;
        self.last_timestamp = None;
        if let Err(err) = self.store.record_attempt() {
            log::warn!("Could not record attempt: {err}");
        }
    }

    /// Stop ticking without reporting anything; safe to call repeatedly
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Session stopped by host");
        }
        self.running = false;
        self.last_timestamp = None;
    }

    pub fn toggle_cursor_control(&mut self) {
        self.state = toggle_cursor_control(&self.state);
        self.settings.cursor_control = self.state.cursor_control;
    }

    /// Replace all preferences, carrying control and skin into the game
    pub fn set_settings(&mut self, settings: Settings) {
        self.state.cursor_control = settings.cursor_control;
        self.state.selected_skin = settings.selected_skin.clone();
        self.settings = settings;
    }

    /// Change the skin for this and future runs
    pub fn set_skin(&mut self, skin: &str) {
        self.settings.selected_skin = skin.to_string();
        self.state.selected_skin = skin.to_string();
    }

    /// Achievements unlocked since the last call
    pub fn take_unlocked(&mut self) -> Vec<Achievement> {
        std::mem::take(&mut self.unlocked)
    }

    /// Frames elapsed since the previous call, capped by the settings
    fn delta_time(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp {
            Some(last) if timestamp_ms > last => ((timestamp_ms - last) / FRAME_MS) as f32,
            Some(_) => 0.0,
            None => 1.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.settings.cap_delta_time(dt)
    }

    /// Advance one animation frame
    ///
    /// Returns the outcome on the frame the run ends.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        width: f32,
        height: f32,
        input: &TickInput,
    ) -> Option<SessionOutcome> {
        if !self.running {
            return None;
        }
        let dt = self.delta_time(timestamp_ms);
        let result = update_game_state(
            &self.state,
            width,
            height,
            input,
            dt,
            &mut self.rng,
            &mut self.tracker,
        );
        self.state = result.state;

        let fresh = self.tracker.take_fresh();
        if !fresh.is_empty() {
            let all: Vec<Achievement> = self.tracker.unlocked().collect();
            if let Err(err) = self.store.save_achievements(&all) {
                log::warn!("Could not save achievements: {err}");
            }
            self.unlocked.extend(fresh);
        }

        if result.collision || result.game_won {
            Some(self.finish(timestamp_ms))
        } else {
            None
        }
    }

    /// End the run and report the score
    fn finish(&mut self, timestamp_ms: f64) -> SessionOutcome {
        self.state = end_game(&self.state);
        self.running = false;
        self.last_timestamp = None;

        let entry = HighScoreEntry::from_state(&self.state, timestamp_ms);
        let rank = match self.store.load_scores() {
            Ok(mut scores) => {
                let rank = scores.add(entry);
                if rank.is_some() {
                    if let Err(err) = self.store.save_scores(&scores) {
                        log::warn!("Could not save high scores: {err}");
                    }
                }
                rank
            }
            Err(err) => {
                log::warn!("Could not load high scores: {err}");
                None
            }
        };

        SessionOutcome {
            won: self.state.game_won,
            percent: self.state.hack_percent(),
            rank,
        }
    }
}
