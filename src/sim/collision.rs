//! Collision detection between the player and the world's primitives
//!
//! The player is a circle. Blocks are tested against its bounding square,
//! boss lines against the true circle, pickups circle-to-circle.

use glam::Vec2;

use super::state::{BossCoreLine, MazeBlock, Player};

/// Result of a player/boss-line check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineHit {
    pub collision: bool,
    /// Touching a non-vulnerable line kills the player
    pub is_lethal: bool,
}

/// Player bounding square against an axis-aligned block
pub fn block_collision(player: &Player, block: &MazeBlock) -> bool {
    let r = player.size;
    player.pos.x + r > block.x
        && player.pos.x - r < block.x + block.width
        && player.pos.y + r > block.y
        && player.pos.y - r < block.y + block.height
}

/// Distance from `point` to the nearest point of a block (0 inside)
pub fn point_block_distance(point: Vec2, block: &MazeBlock) -> f32 {
    let nearest = Vec2::new(
        point.x.max(block.x).min(block.x + block.width),
        point.y.max(block.y).min(block.y + block.height),
    );
    point.distance(nearest)
}

/// Distance from `point` to the segment `a..b`
pub fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq <= f32::EPSILON {
        // Degenerate segment
        return point.distance(a);
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Player circle against a polyline given in world space
pub fn polyline_collision(player: &Player, points: &[Vec2]) -> bool {
    points
        .windows(2)
        .any(|pair| point_segment_distance(player.pos, pair[0], pair[1]) < player.size)
}

/// Player circle against a boss line whose points are already in world space
pub fn line_collision(player: &Player, line: &BossCoreLine) -> LineHit {
    let collision = polyline_collision(player, &line.points);
    LineHit {
        collision,
        is_lethal: collision && !line.is_vulnerable,
    }
}

/// Circle-to-circle overlap
#[inline]
pub fn circle_collision(player: &Player, center: Vec2, radius: f32) -> bool {
    player.pos.distance(center) < player.size + radius
}
