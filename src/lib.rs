//! Hack Runner - A scrolling maze arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, boosters, boss cores, collisions)
//! - `session`: Host loop driving the simulation from frame timestamps
//! - `achievements`: Unlock rules fed with every simulated frame
//! - `persistence`: Injected stores for scores, attempts and achievements
//! - `platform`: Browser bridge (wasm32 only)

pub mod achievements;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use achievements::{Achievement, AchievementObserver, AchievementTracker};
pub use highscores::HighScores;
pub use session::{Session, SessionOutcome};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Time-based values are in frames at the idealized 60 Hz rate that a
/// `delta_time` of 1.0 represents.
pub mod consts {
    /// Milliseconds in one idealized frame
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Score units for a full hack (100%)
    pub const WIN_SCORE: f64 = 100_000.0;
    /// Score gained per frame while the maze is running
    pub const SCORE_PER_FRAME: f64 = 1.33;
    /// Score bonus for defeating a boss core
    pub const BOSS_DEFEAT_BONUS: f64 = 5_000.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 12.0;
    pub const PLAYER_MOVE_SPEED: f32 = 5.0;
    /// Cursor-follow dead zone radius
    pub const CURSOR_DEAD_ZONE: f32 = 5.0;
    /// Player spawn height as a fraction of the canvas height
    pub const PLAYER_START_Y: f32 = 0.8;

    /// Scroll speed in pixels per frame
    pub const BASE_GAME_SPEED: f32 = 2.0;
    pub const MAX_GAME_SPEED: f32 = 4.5;

    /// Maze grid
    pub const SYMBOL_SIZE: f32 = 30.0;
    pub const CELL_SIZE: f32 = SYMBOL_SIZE * 1.5;
    /// Corner connector edge length
    pub const CONNECTOR_SIZE: f32 = CELL_SIZE / 4.0;
    /// Base per-frame chance of emitting a row once there is room
    pub const ROW_SPAWN_RATE: f64 = 0.08;
    /// Extra spawn chance gained at a full hack
    pub const ROW_SPAWN_SCORE_BONUS: f64 = 0.4;
    /// Path turn chance at zero score
    pub const TURN_BASE_CHANCE: f64 = 0.05;
    /// Path turn chance gained at a full hack (capped by `MAX_TURN_CHANCE`)
    pub const TURN_SCORE_FACTOR: f64 = 0.6;
    pub const MAX_TURN_CHANCE: f64 = 0.3;
    pub const CONNECTOR_CHANCE: f64 = 0.5;
    pub const ADD_PATH_CHANCE: f64 = 0.05;
    pub const REMOVE_PATH_CHANCE: f64 = 0.05;

    /// Boosters
    pub const BOOSTER_SIZE: f32 = 15.0;
    /// Score interval between booster placement attempts
    pub const BOOSTER_INTERVAL: f64 = 2_000.0;
    pub const SAFETY_KEY_MIN_SCORE: f64 = 1_000.0;
    pub const BACKDOOR_MIN_SCORE: f64 = 5_000.0;
    pub const SAFETY_KEY_CHANCE: f64 = 0.45;
    pub const BACKDOOR_CHANCE: f64 = 0.25;
    pub const BOOSTER_PLACEMENT_ATTEMPTS: u32 = 10;
    /// Minimum clearance between a new booster and any block
    pub const BOOSTER_MIN_GAP: f32 = 4.0;
    /// Safety key invulnerability (10s)
    pub const INVULNERABILITY_FRAMES: f32 = 600.0;

    /// Boss core encounter
    pub const BOSS_THRESHOLDS: [f64; 3] = [33_000.0, 66_000.0, 99_000.0];
    /// Rotation period per level, in seconds
    pub const BOSS_ROTATION_PERIODS: [f32; 3] = [15.0, 12.0, 10.0];
    pub const BOSS_INNER_SPEED_RATIO: f32 = 1.5;
    pub const BOSS_VULNERABLE_LINES: usize = 4;
    /// Vulnerable line re-roll interval (5s)
    pub const BOSS_VULNERABLE_FRAMES: f32 = 300.0;
    /// Post-defeat grace period (3s)
    pub const BOSS_COOLDOWN_FRAMES: f32 = 180.0;
    pub const BOSS_OUTER_HALF_SIZE: f32 = 140.0;
    /// Outer half size as a fraction of the smaller canvas dimension
    pub const BOSS_OUTER_FRACTION: f32 = 0.3;
    pub const BOSS_INNER_RATIO: f32 = 0.55;
    /// Extra clearance around the boss when wiping the maze on spawn
    pub const BOSS_ARENA_MARGIN: f32 = CELL_SIZE;
    /// Boss center height as a fraction of the canvas height
    pub const BOSS_CENTER_Y: f32 = 0.35;
    pub const MEMORY_CARD_SIZE: f32 = 15.0;

    /// Cosmetic color cycle, degrees per frame
    pub const COLOR_PHASE_SPEED: f32 = 1.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate `point` about `center` by `degrees` (screen space, y down)
#[inline]
pub fn rotate_about(point: Vec2, center: Vec2, degrees: f32) -> Vec2 {
    let rot = Vec2::from_angle(degrees.to_radians());
    center + rot.rotate(point - center)
}

/// Clamp that tolerates inverted bounds (degenerate canvases)
#[inline]
pub fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
