//! Booster pickups and their effects

use super::collision::circle_collision;
use super::state::{Booster, BoosterKind, GameState};
use crate::consts::INVULNERABILITY_FRAMES;

/// Move boosters down with the maze and drop collected or off-screen ones
pub fn scroll_boosters(boosters: &mut Vec<Booster>, distance: f32, height: f32) {
    for booster in boosters.iter_mut() {
        booster.pos.y += distance;
    }
    boosters.retain(|b| b.active && b.pos.y - b.size <= height);
}

/// Collect every booster the player touches and apply its effect
///
/// Returns the kinds collected this frame, in list order. Memory cards are
/// left alone; the boss encounter owns them.
pub fn apply_boosters(state: &mut GameState) -> Vec<BoosterKind> {
    let mut collected = Vec::new();
    for booster in state.boosters.iter_mut() {
        if !booster.active || booster.kind == BoosterKind::MemoryCard {
            continue;
        }
        if circle_collision(&state.player, booster.pos, booster.size) {
            booster.active = false;
            collected.push(booster.kind);
        }
    }

    for kind in &collected {
        match kind {
            BoosterKind::SafetyKey => {
                state.player.invulnerable = true;
                state.player.invulnerable_timer = INVULNERABILITY_FRAMES;
                state.collected_safety_keys += 1;
            }
            BoosterKind::Backdoor => {
                state.maze.clear();
                state.collected_backdoors += 1;
            }
            BoosterKind::MemoryCard => {}
        }
        log::info!("Collected {:?}", kind);
    }

    state.boosters.retain(|b| b.active);
    collected
}
