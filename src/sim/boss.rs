//! Boss core encounter
//!
//! A boss core is two concentric rings of line segments spinning in opposite
//! directions around a memory card. A few lines at a time are vulnerable and
//! break on contact; touching any other line is lethal. Once both rings are
//! gone the memory card can be picked up, which ends the encounter.
//!
//! Lifecycle: Dormant -> Active -> Cooldown -> Dormant.

use glam::Vec2;
use rand::Rng;

use super::collision::{circle_collision, point_block_distance, polyline_collision};
use super::state::{Booster, BoosterKind, BossCore, BossCoreLine, GameState, Player, Ring};
use crate::consts::*;
use crate::wrap_degrees;

/// Outcome of one boss frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossUpdate {
    /// Player touched a lethal line
    pub collision: bool,
    /// Lines broken this frame
    pub destroyed_lines: usize,
    /// Memory card collected
    pub defeated: bool,
}

/// Level (1-based) of the threshold crossed between `prev_score` and `score`
///
/// The previous score must sit below the threshold, so a threshold that was
/// already passed never fires again.
pub fn crossed_threshold(prev_score: f64, score: f64) -> Option<u8> {
    BOSS_THRESHOLDS
        .iter()
        .position(|&t| prev_score < t && score >= t)
        .map(|i| i as u8 + 1)
}

/// Rotation speed of the outer ring in degrees per frame
pub fn outer_speed(level: u8) -> f32 {
    let idx = (level.clamp(1, 3) - 1) as usize;
    360.0 / (BOSS_ROTATION_PERIODS[idx] * 60.0)
}

/// Corners of a square with the given half size, turned by `degrees`
fn square_corners(half: f32, degrees: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(degrees.to_radians());
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|c| rot.rotate(c))
}

/// Lines for two overlapping squares (one turned 45 degrees)
///
/// With `split_sides` each side becomes two lines meeting at its midpoint.
fn build_ring(half: f32, split_sides: bool) -> Vec<BossCoreLine> {
    let mut lines = Vec::new();
    for corners in [square_corners(half, 0.0), square_corners(half, 45.0)] {
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let segments = if split_sides {
                let mid = (a + b) / 2.0;
                vec![vec![a, mid], vec![mid, b]]
            } else {
                vec![vec![a, b]]
            };
            for points in segments {
                lines.push(BossCoreLine {
                    id: lines.len() as u32,
                    points,
                    is_vulnerable: false,
                    destroyed: false,
                });
            }
        }
    }
    lines
}

/// Canvas dimension usable for boss geometry; NaN and negatives become 0
fn sane_dimension(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Half size of the outer ring for a canvas, never negative
pub fn outer_half_size(width: f32, height: f32) -> f32 {
    if !width.is_finite() || !height.is_finite() {
        return 0.0;
    }
    (width.min(height) * BOSS_OUTER_FRACTION).clamp(0.0, BOSS_OUTER_HALF_SIZE)
}

/// Build a fresh, active boss core for a canvas
pub fn spawn_boss<R: Rng + ?Sized>(level: u8, width: f32, height: f32, rng: &mut R) -> BossCore {
    let half = outer_half_size(width, height);
    let center = Vec2::new(sane_dimension(width) / 2.0, sane_dimension(height) * BOSS_CENTER_Y);
    let mut boss = BossCore {
        center,
        level: level.clamp(1, 3),
        outer_angle: 0.0,
        inner_angle: 0.0,
        outer_lines: build_ring(half, true),
        inner_lines: build_ring(half * BOSS_INNER_RATIO, false),
        memory_card: Booster::new(BoosterKind::MemoryCard, center, MEMORY_CARD_SIZE),
        vulnerable_lines_timer: BOSS_VULNERABLE_FRAMES,
        cooldown_timer: 0.0,
        active: true,
    };
    reroll_vulnerable(&mut boss, rng);
    boss
}

/// Radius of the circle the outer ring sweeps while rotating
pub fn arena_radius(boss: &BossCore) -> f32 {
    boss.outer_lines
        .iter()
        .flat_map(|l| l.points.iter())
        .map(|p| p.length())
        .fold(0.0, f32::max)
}

/// Drop maze blocks and boosters inside the boss arena
pub fn clear_arena(state: &mut GameState) {
    let Some(boss) = state.boss_core.as_ref() else {
        return;
    };
    let center = boss.center;
    let reach = arena_radius(boss) + BOSS_ARENA_MARGIN;
    let before = state.maze.len();
    state
        .maze
        .retain(|b| point_block_distance(center, b) > reach);
    state.boosters.retain(|b| b.pos.distance(center) > reach + b.size);
    log::debug!("Boss arena cleared {} blocks", before - state.maze.len());
}

/// Pick up to `BOSS_VULNERABLE_LINES` intact lines across both rings
pub fn reroll_vulnerable<R: Rng + ?Sized>(boss: &mut BossCore, rng: &mut R) {
    let mut candidates = Vec::new();
    for ring in [Ring::Outer, Ring::Inner] {
        for (idx, line) in boss.lines_mut(ring).iter_mut().enumerate() {
            line.is_vulnerable = false;
            if !line.destroyed {
                candidates.push((ring, idx));
            }
        }
    }
    let amount = BOSS_VULNERABLE_LINES.min(candidates.len());
    for pick in rand::seq::index::sample(rng, candidates.len(), amount).into_iter() {
        let (ring, idx) = candidates[pick];
        boss.lines_mut(ring)[idx].is_vulnerable = true;
    }
}

/// World-space points of a line at the ring's current angle
pub fn world_points(boss: &BossCore, ring: Ring, line: &BossCoreLine) -> Vec<Vec2> {
    let rot = Vec2::from_angle(boss.angle(ring).to_radians());
    line.points
        .iter()
        .map(|&p| boss.center + rot.rotate(p))
        .collect()
}

/// Advance an active boss by one frame
pub fn update_boss<R: Rng + ?Sized>(
    boss: &mut BossCore,
    player: &Player,
    dt: f32,
    rng: &mut R,
) -> BossUpdate {
    let mut update = BossUpdate::default();
    if !boss.active {
        return update;
    }

    let speed = outer_speed(boss.level) * dt;
    boss.outer_angle = wrap_degrees(boss.outer_angle + speed);
    boss.inner_angle = wrap_degrees(boss.inner_angle - speed * BOSS_INNER_SPEED_RATIO);

    boss.vulnerable_lines_timer -= dt;
    if boss.vulnerable_lines_timer <= 0.0 {
        reroll_vulnerable(boss, rng);
        boss.vulnerable_lines_timer = BOSS_VULNERABLE_FRAMES;
    }

    for ring in [Ring::Outer, Ring::Inner] {
        for idx in 0..boss.lines(ring).len() {
            let line = &boss.lines(ring)[idx];
            if line.destroyed || !polyline_collision(player, &world_points(boss, ring, line)) {
                continue;
            }
            let line = &mut boss.lines_mut(ring)[idx];
            if line.is_vulnerable {
                line.destroyed = true;
                line.is_vulnerable = false;
                update.destroyed_lines += 1;
                log::debug!("Boss {:?} line {} destroyed", ring, line.id);
            } else {
                update.collision = true;
            }
        }
    }

    // The card only counts once both rings are down
    if boss.outer_cleared()
        && boss.inner_cleared()
        && boss.memory_card.active
        && circle_collision(player, boss.memory_card.pos, boss.memory_card.size)
    {
        boss.memory_card.active = false;
        boss.active = false;
        boss.cooldown_timer = BOSS_COOLDOWN_FRAMES;
        update.defeated = true;
        log::info!("Boss core level {} defeated", boss.level);
    }

    update
}

/// Count down the post-defeat grace period
///
/// Returns true once the boss has gone dormant.
pub fn tick_cooldown(boss: &mut BossCore, dt: f32) -> bool {
    if boss.active {
        return false;
    }
    if boss.cooldown_timer > 0.0 {
        boss.cooldown_timer = (boss.cooldown_timer - dt).max(0.0);
    }
    boss.cooldown_timer <= 0.0
}
