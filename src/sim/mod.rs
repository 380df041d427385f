//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Randomness only through the injected RNG
//! - Each step reads the previous state and returns a new one
//! - No rendering, storage or platform dependencies

pub mod booster;
pub mod boss;
pub mod collision;
pub mod maze;
pub mod movement;
pub mod state;
pub mod tick;

pub use collision::{LineHit, block_collision, circle_collision, line_collision};
pub use movement::{HeldKeys, Steering};
pub use state::{
    Booster, BoosterKind, BossCore, BossCoreLine, BossPhase, GameState, MazeBlock, Player, Ring,
    end_game, init_game_state, start_game, toggle_cursor_control,
};
pub use tick::{StepResult, TickInput, update_game_state};
