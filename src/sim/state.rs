//! Game state and core simulation types
//!
//! `GameState` is the snapshot handed to the renderer between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player-controlled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Collision radius
    pub size: f32,
    pub vel: Vec2,
    pub invulnerable: bool,
    /// Frames of invulnerability remaining
    pub invulnerable_timer: f32,
}

impl Player {
    /// Fresh player at the spawn point for the given canvas
    pub fn spawn(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(width / 2.0, height * PLAYER_START_Y),
            size: PLAYER_SIZE,
            vel: Vec2::ZERO,
            invulnerable: false,
            invulnerable_timer: 0.0,
        }
    }

    /// Tick down invulnerability, clearing the flag once it runs out
    pub fn tick_invulnerability(&mut self, dt: f32) {
        if self.invulnerable {
            self.invulnerable_timer -= dt;
            if self.invulnerable_timer <= 0.0 {
                self.invulnerable_timer = 0.0;
                self.invulnerable = false;
            }
        }
    }
}

/// One axis-aligned wall cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl MazeBlock {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// True once the block is entirely below the visible area
    #[inline]
    pub fn is_below(&self, height: f32) -> bool {
        self.y > height
    }
}

/// Booster types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoosterKind {
    /// Temporary invulnerability
    SafetyKey,
    /// Clears every maze block
    Backdoor,
    /// Boss core centerpiece, only collectible through the boss encounter
    MemoryCard,
}

/// A collectible pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booster {
    pub pos: Vec2,
    /// Pickup radius
    pub size: f32,
    pub kind: BoosterKind,
    pub active: bool,
}

impl Booster {
    pub fn new(kind: BoosterKind, pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size,
            kind,
            active: true,
        }
    }
}

/// Which ring of the boss core a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ring {
    Outer,
    Inner,
}

/// One segment of a boss ring
///
/// `points` are unrotated and relative to the boss center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossCoreLine {
    /// Stable index into the owning ring
    pub id: u32,
    pub points: Vec<Vec2>,
    pub is_vulnerable: bool,
    pub destroyed: bool,
}

/// Lifecycle of the boss encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Dormant,
    Cooldown,
    Active,
}

/// The boss encounter aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossCore {
    pub center: Vec2,
    /// Difficulty tier, 1..=3
    pub level: u8,
    /// Outer ring angle in degrees
    pub outer_angle: f32,
    /// Inner ring angle in degrees (turns the other way)
    pub inner_angle: f32,
    pub outer_lines: Vec<BossCoreLine>,
    pub inner_lines: Vec<BossCoreLine>,
    pub memory_card: Booster,
    /// Frames until the vulnerable set is re-rolled
    pub vulnerable_lines_timer: f32,
    /// Frames of post-defeat grace remaining
    pub cooldown_timer: f32,
    pub active: bool,
}

impl BossCore {
    pub fn phase(&self) -> BossPhase {
        if self.active {
            BossPhase::Active
        } else if self.cooldown_timer > 0.0 {
            BossPhase::Cooldown
        } else {
            BossPhase::Dormant
        }
    }

    /// Every outer line is gone, so the inner ring is in play
    pub fn outer_cleared(&self) -> bool {
        self.outer_lines.iter().all(|l| l.destroyed)
    }

    pub fn inner_cleared(&self) -> bool {
        self.inner_lines.iter().all(|l| l.destroyed)
    }

    pub fn lines(&self, ring: Ring) -> &[BossCoreLine] {
        match ring {
            Ring::Outer => &self.outer_lines,
            Ring::Inner => &self.inner_lines,
        }
    }

    pub fn lines_mut(&mut self, ring: Ring) -> &mut [BossCoreLine] {
        match ring {
            Ring::Outer => &mut self.outer_lines,
            Ring::Inner => &mut self.inner_lines,
        }
    }

    pub fn angle(&self, ring: Ring) -> f32 {
        match ring {
            Ring::Outer => self.outer_angle,
            Ring::Inner => self.inner_angle,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    /// Wall blocks in spawn order
    pub maze: Vec<MazeBlock>,
    pub boosters: Vec<Booster>,
    /// Hack progress, 1000 units per percent
    pub score: f64,
    /// Scroll speed in pixels per frame
    pub game_speed: f32,
    pub game_active: bool,
    /// Follow the cursor instead of the keyboard on desktop
    pub cursor_control: bool,
    pub game_won: bool,
    pub collected_safety_keys: u32,
    pub collected_backdoors: u32,
    /// Opaque cosmetic variant from the skin provider
    pub selected_skin: String,
    pub boss_core: Option<BossCore>,
    pub bosses_defeated: u32,
    pub highest_boss_level: u8,
    /// Cosmetic hue cycle in degrees
    pub color_phase: f32,
    /// Canvas size seen on the last step
    pub canvas: Vec2,
    /// Open maze columns of the last emitted row
    pub maze_paths: Vec<usize>,
    /// Last score bucket a booster placement was attempted in
    pub booster_bucket: u64,
}

impl GameState {
    /// Fresh, inactive state for a canvas
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            player: Player::spawn(width, height),
            maze: Vec::new(),
            boosters: Vec::new(),
            score: 0.0,
            game_speed: BASE_GAME_SPEED,
            game_active: false,
            cursor_control: false,
            game_won: false,
            collected_safety_keys: 0,
            collected_backdoors: 0,
            selected_skin: String::from("default"),
            boss_core: None,
            bosses_defeated: 0,
            highest_boss_level: 0,
            color_phase: 0.0,
            canvas: Vec2::new(width, height),
            maze_paths: Vec::new(),
            booster_bucket: 0,
        }
    }

    /// Hack completion in percent, capped at 100
    pub fn hack_percent(&self) -> f64 {
        (self.score / (WIN_SCORE / 100.0)).clamp(0.0, 100.0)
    }

    pub fn boss_active(&self) -> bool {
        self.boss_core.as_ref().is_some_and(|b| b.active)
    }

    /// Current boss lifecycle phase
    pub fn boss_phase(&self) -> BossPhase {
        self.boss_core
            .as_ref()
            .map_or(BossPhase::Dormant, BossCore::phase)
    }
}

/// Create the initial state for a canvas
pub fn init_game_state(width: f32, height: f32) -> GameState {
    GameState::new(width, height)
}

/// Reset run data and activate the game
///
/// Skin, control mode and the cosmetic phase carry over.
pub fn start_game(state: &GameState) -> GameState {
    let mut fresh = GameState::new(state.canvas.x, state.canvas.y);
    fresh.selected_skin = state.selected_skin.clone();
    fresh.cursor_control = state.cursor_control;
    fresh.color_phase = state.color_phase;
    fresh.game_active = true;
    log::info!("Run started (skin: {})", fresh.selected_skin);
    fresh
}

pub fn toggle_cursor_control(state: &GameState) -> GameState {
    GameState {
        cursor_control: !state.cursor_control,
        ..state.clone()
    }
}

/// Finalize a run after a collision or a win
pub fn end_game(state: &GameState) -> GameState {
    let mut ended = state.clone();
    ended.game_active = false;
    ended.player.vel = Vec2::ZERO;
    log::info!(
        "Run ended at {:.3}% (won: {})",
        ended.hack_percent(),
        ended.game_won
    );
    ended
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_game_round_trip() {
        let state = start_game(&init_game_state(800.0, 600.0));
        assert!(state.game_active);
        assert_eq!(state.score, 0.0);
        assert!(state.boss_core.is_none());
        assert!(!state.game_won);
    }

    #[test]
    fn test_start_game_keeps_cosmetics() {
        let mut state = init_game_state(800.0, 600.0);
        state.selected_skin = "neon".into();
        state.cursor_control = true;
        state.color_phase = 42.0;
        state.score = 5_000.0;
        state.collected_safety_keys = 3;

        let started = start_game(&state);
        assert_eq!(started.selected_skin, "neon");
        assert!(started.cursor_control);
        assert_eq!(started.color_phase, 42.0);
        assert_eq!(started.score, 0.0);
        assert_eq!(started.collected_safety_keys, 0);
    }

    #[test]
    fn test_toggle_cursor_control() {
        let state = init_game_state(800.0, 600.0);
        let toggled = toggle_cursor_control(&state);
        assert!(toggled.cursor_control);
        assert!(!toggle_cursor_control(&toggled).cursor_control);
    }

    #[test]
    fn test_end_game_deactivates() {
        let state = start_game(&init_game_state(800.0, 600.0));
        let ended = end_game(&state);
        assert!(!ended.game_active);
        // Idempotent
        assert_eq!(end_game(&ended), ended);
    }

    #[test]
    fn test_invulnerability_expires() {
        let mut player = Player::spawn(800.0, 600.0);
        player.invulnerable = true;
        player.invulnerable_timer = 2.0;
        player.tick_invulnerability(1.0);
        assert!(player.invulnerable);
        player.tick_invulnerability(1.0);
        assert!(!player.invulnerable);
        assert_eq!(player.invulnerable_timer, 0.0);
    }

    #[test]
    fn test_hack_percent() {
        let mut state = init_game_state(800.0, 600.0);
        state.score = 33_000.0;
        assert!((state.hack_percent() - 33.0).abs() < 1e-9);
        state.score = 104_000.0;
        assert_eq!(state.hack_percent(), 100.0);
    }
}
