//! Player movement from keyboard, cursor or swipe input
//!
//! Velocity is applied once per call and is not scaled by `delta_time`,
//! unlike maze scrolling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::clamp_lenient;
use crate::consts::{CURSOR_DEAD_ZONE, PLAYER_MOVE_SPEED};

/// Directional keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    /// Build from browser `KeyboardEvent.key` values (arrows and WASD)
    ///
    /// Unknown keys are ignored.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut keys = Self::default();
        for code in codes {
            match code {
                "ArrowUp" | "w" | "W" => keys.up = true,
                "ArrowDown" | "s" | "S" => keys.down = true,
                "ArrowLeft" | "a" | "A" => keys.left = true,
                "ArrowRight" | "d" | "D" => keys.right = true,
                _ => {}
            }
        }
        keys
    }

    /// Unit-per-axis direction; opposite keys cancel
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// How the player is being steered this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// Touch devices: follow the active swipe, rest otherwise
    Swipe(Option<Vec2>),
    /// Desktop: chase the cursor
    Cursor(Option<Vec2>),
    /// Desktop: arrows / WASD
    Keyboard(HeldKeys),
}

/// Velocity for the given steering mode
pub fn steering_velocity(player: &Player, steering: Steering) -> Vec2 {
    match steering {
        Steering::Swipe(dir) => dir
            .filter(|d| d.is_finite())
            .map(|d| d.clamp_length_max(1.0) * PLAYER_MOVE_SPEED)
            .unwrap_or(Vec2::ZERO),
        Steering::Cursor(target) => {
            let Some(target) = target.filter(|t| t.is_finite()) else {
                return Vec2::ZERO;
            };
            let to_cursor = target - player.pos;
            if to_cursor.length() < CURSOR_DEAD_ZONE {
                Vec2::ZERO
            } else {
                to_cursor.normalize_or_zero() * PLAYER_MOVE_SPEED
            }
        }
        // Per-axis speed, so diagonals are faster
        Steering::Keyboard(keys) => keys.axis() * PLAYER_MOVE_SPEED,
    }
}

/// Update velocity and integrate one step, keeping the player on the canvas
pub fn move_player(player: &mut Player, steering: Steering, width: f32, height: f32) {
    player.vel = steering_velocity(player, steering);
    let next = player.pos + player.vel;
    player.pos = Vec2::new(
        clamp_lenient(next.x, player.size, width - player.size),
        clamp_lenient(next.y, player.size, height - player.size),
    );
}
