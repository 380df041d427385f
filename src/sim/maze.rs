//! Scrolling maze generation
//!
//! The play width is split into a column grid. Every emitted row keeps a set
//! of open columns ("paths") carried over from the row below it, so at least
//! one corridor always runs through the maze. Paths occasionally turn by one
//! column; the turn row opens both the old and the new column so the corridor
//! never narrows to a diagonal pinch. New paths split off sideways from an
//! existing one, so every path is reachable from the rows below.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::point_block_distance;
use super::state::{Booster, BoosterKind, GameState, MazeBlock};
use crate::consts::*;

/// Column layout for a canvas width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeGrid {
    /// Columns needed to cover the width (the last may be cut off)
    pub columns: usize,
    /// Columns fully on screen; only these may hold a path
    pub usable: usize,
}

impl MazeGrid {
    pub fn for_width(width: f32) -> Self {
        if !width.is_finite() || width <= 0.0 {
            return Self {
                columns: 0,
                usable: 0,
            };
        }
        Self {
            columns: (width / CELL_SIZE).ceil() as usize,
            usable: (width / CELL_SIZE).floor() as usize,
        }
    }

    /// Upper bound on simultaneous paths (a third of the columns, at least one)
    pub fn max_paths(&self) -> usize {
        (self.usable / 3).max(1)
    }

    #[inline]
    pub fn column_x(column: usize) -> f32 {
        column as f32 * CELL_SIZE
    }
}

/// One freshly generated row
#[derive(Debug, Clone, PartialEq)]
pub struct MazeRow {
    pub blocks: Vec<MazeBlock>,
    /// Columns left open in this row (sorted)
    pub open: Vec<usize>,
    /// Paths the next row continues from
    pub paths: Vec<usize>,
}

/// What a maze update added this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MazeUpdate {
    pub new_blocks: usize,
    pub booster: Option<BoosterKind>,
}

/// 2-3 random open columns for a maze with no previous row
pub fn initial_paths<R: Rng + ?Sized>(grid: &MazeGrid, rng: &mut R) -> Vec<usize> {
    if grid.usable == 0 {
        return Vec::new();
    }
    let count = rng.random_range(2..=3).min(grid.max_paths()).min(grid.usable);
    let mut paths: Vec<usize> = rand::seq::index::sample(rng, grid.usable, count).into_vec();
    paths.sort_unstable();
    paths
}

/// Chance that a path turns on the next row
pub fn turn_chance(score: f64) -> f64 {
    (TURN_BASE_CHANCE + score.max(0.0) / WIN_SCORE * TURN_SCORE_FACTOR).min(MAX_TURN_CHANCE)
}

/// Chance per frame of emitting a row once there is room for one
pub fn row_spawn_chance(score: f64) -> f64 {
    (ROW_SPAWN_RATE + score.max(0.0) / WIN_SCORE * ROW_SPAWN_SCORE_BONUS).clamp(0.0, 1.0)
}

/// Build one row at height `y` continuing from `previous` paths
///
/// The returned row always has at least one open column when the grid has a
/// usable column.
pub fn generate_row<R: Rng + ?Sized>(
    previous: &[usize],
    grid: &MazeGrid,
    y: f32,
    score: f64,
    rng: &mut R,
) -> MazeRow {
    let mut paths: Vec<usize> = previous
        .iter()
        .copied()
        .filter(|&c| c < grid.usable)
        .collect();
    paths.sort_unstable();
    paths.dedup();
    paths.truncate(grid.max_paths());
    if paths.is_empty() {
        paths = initial_paths(grid, rng);
    }
    if paths.is_empty() {
        return MazeRow {
            blocks: Vec::new(),
            open: Vec::new(),
            paths,
        };
    }

    let mut open = paths.clone();
    let mut blocks = Vec::new();

    // Turn: one path steps sideways, the turn row keeps both columns open
    if rng.random_bool(turn_chance(score)) {
        let idx = rng.random_range(0..paths.len());
        let from = paths[idx];
        let step_right = rng.random_bool(0.5);
        let to = if step_right {
            Some(from + 1).filter(|&c| c < grid.usable)
        } else {
            from.checked_sub(1)
        };
        if let Some(to) = to {
            open.push(to);
            paths[idx] = to;
            if rng.random_bool(CONNECTOR_CHANCE) {
                // Round the outer corner of the turn cell: top edge, away from the exit
                let cell_x = MazeGrid::column_x(from);
                let x = if step_right {
                    cell_x
                } else {
                    cell_x + CELL_SIZE - CONNECTOR_SIZE
                };
                blocks.push(MazeBlock::new(x, y, CONNECTOR_SIZE, CONNECTOR_SIZE));
            }
        }
    }

    // New paths branch off an open path so they join the corridor below
    if rng.random_bool(ADD_PATH_CHANCE) && paths.len() < grid.max_paths() {
        let branches: Vec<usize> = paths
            .iter()
            .flat_map(|&p| [p.checked_sub(1), Some(p + 1)])
            .flatten()
            .filter(|c| *c < grid.usable && !paths.contains(c))
            .collect();
        if let Some(&column) = branches.choose(rng) {
            paths.push(column);
            open.push(column);
        }
    }

    if rng.random_bool(REMOVE_PATH_CHANCE) && paths.len() > 1 {
        let idx = rng.random_range(0..paths.len());
        // Stays open in this row, closes from the next one on
        paths.remove(idx);
    }

    paths.sort_unstable();
    paths.dedup();
    open.sort_unstable();
    open.dedup();

    for column in (0..grid.columns).filter(|c| !open.contains(c)) {
        blocks.push(MazeBlock::new(
            MazeGrid::column_x(column),
            y,
            CELL_SIZE,
            CELL_SIZE,
        ));
    }

    MazeRow {
        blocks,
        open,
        paths,
    }
}

/// Move blocks down by `distance` and drop the ones past the bottom edge
pub fn scroll_blocks(blocks: &mut Vec<MazeBlock>, distance: f32, height: f32) {
    for block in blocks.iter_mut() {
        block.y += distance;
    }
    blocks.retain(|b| !b.is_below(height));
}

/// Top edge of the most recent row, if any block exists
pub fn top_row_y(blocks: &[MazeBlock]) -> Option<f32> {
    blocks.iter().map(|b| b.y).min_by(f32::total_cmp)
}

/// Pick which booster (if any) to place for the current score
///
/// Placement is attempted once each time the score enters a new
/// `BOOSTER_INTERVAL` bucket.
pub fn roll_booster<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<BoosterKind> {
    let bucket = (state.score.max(0.0) / BOOSTER_INTERVAL).floor() as u64;
    if bucket <= state.booster_bucket {
        return None;
    }
    state.booster_bucket = bucket;

    let roll: f64 = rng.random();
    if roll < SAFETY_KEY_CHANCE {
        (state.score >= SAFETY_KEY_MIN_SCORE).then_some(BoosterKind::SafetyKey)
    } else if roll < SAFETY_KEY_CHANCE + BACKDOOR_CHANCE {
        (state.score >= BACKDOOR_MIN_SCORE).then_some(BoosterKind::Backdoor)
    } else {
        None
    }
}

/// Find a spot for a booster clear of every block, retrying a few times
///
/// Candidates are drawn from the open cells of the newest row, or anywhere
/// above the screen when the maze is empty.
pub fn place_booster<R: Rng + ?Sized>(
    blocks: &[MazeBlock],
    boosters: &[Booster],
    paths: &[usize],
    width: f32,
    rng: &mut R,
) -> Option<Vec2> {
    let size = BOOSTER_SIZE;
    if !width.is_finite() || width < size * 2.0 {
        return None;
    }
    let top = top_row_y(blocks);
    let slack = (CELL_SIZE / 2.0 - size - BOOSTER_MIN_GAP).max(0.0);

    for _ in 0..BOOSTER_PLACEMENT_ATTEMPTS {
        let candidate = match (top, paths.choose(rng)) {
            (Some(top), Some(&column)) => Vec2::new(
                MazeGrid::column_x(column) + CELL_SIZE / 2.0 + rng.random_range(-slack..=slack),
                top + CELL_SIZE / 2.0 + rng.random_range(-slack..=slack),
            ),
            _ => Vec2::new(
                rng.random_range(size..=width - size),
                rng.random_range(-CELL_SIZE..=-size),
            ),
        };

        let clear_of_blocks = blocks
            .iter()
            .all(|b| point_block_distance(candidate, b) >= size + BOOSTER_MIN_GAP);
        let clear_of_boosters = boosters
            .iter()
            .filter(|b| b.active)
            .all(|b| b.pos.distance(candidate) >= b.size + size);
        if clear_of_blocks && clear_of_boosters {
            return Some(candidate);
        }
    }
    None
}

/// Run the maze generator for one frame
///
/// Emits at most one row above the screen, attempts one booster, then
/// scrolls and culls the blocks.
pub fn update_maze<R: Rng + ?Sized>(
    state: &mut GameState,
    width: f32,
    height: f32,
    dt: f32,
    rng: &mut R,
) -> MazeUpdate {
    let grid = MazeGrid::for_width(width);
    let mut update = MazeUpdate::default();

    if state.maze.is_empty() {
        // No previous row to continue from
        state.maze_paths.clear();
    }

    let has_room = top_row_y(&state.maze).is_none_or(|top| top >= 0.0);
    let emit = state.maze.is_empty() || rng.random_bool(row_spawn_chance(state.score));
    if has_room && emit && grid.usable > 0 {
        let row = generate_row(&state.maze_paths, &grid, -CELL_SIZE, state.score, rng);
        log::trace!("Maze row: open {:?}", row.open);
        update.new_blocks = row.blocks.len();
        state.maze.extend(row.blocks);
        state.maze_paths = row.paths;
    }

    if let Some(kind) = roll_booster(state, rng) {
        if let Some(pos) = place_booster(
            &state.maze,
            &state.boosters,
            &state.maze_paths,
            width,
            rng,
        ) {
            log::debug!("Placed {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
            state.boosters.push(Booster::new(kind, pos, BOOSTER_SIZE));
            update.booster = Some(kind);
        }
    }

    scroll_blocks(&mut state.maze, state.game_speed * dt, height);
    update
}
