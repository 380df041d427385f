//! Per-frame simulation step
//!
//! Core game loop that advances every subsystem in a fixed order.

use glam::Vec2;
use rand::Rng;

use super::booster::{apply_boosters, scroll_boosters};
use super::boss::{clear_arena, crossed_threshold, spawn_boss, tick_cooldown, update_boss};
use super::collision::block_collision;
use super::maze::update_maze;
use super::movement::{HeldKeys, Steering, move_player};
use super::state::{BoosterKind, BossPhase, GameState};
use crate::achievements::AchievementObserver;
use crate::consts::*;
use crate::wrap_degrees;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional keys held (desktop keyboard mode)
    pub keys: HeldKeys,
    /// Pointer position in canvas space
    pub cursor: Option<Vec2>,
    /// Normalized swipe direction (touch devices)
    pub swipe: Option<Vec2>,
    /// Touch device: steer by swipe only
    pub is_mobile: bool,
}

impl TickInput {
    fn steering(&self, cursor_control: bool) -> Steering {
        if self.is_mobile {
            Steering::Swipe(self.swipe)
        } else if cursor_control {
            Steering::Cursor(self.cursor)
        } else {
            Steering::Keyboard(self.keys)
        }
    }
}

/// Result of one step
#[derive(Debug, Clone)]
pub struct StepResult {
    pub state: GameState,
    /// The player hit a wall or a lethal boss line
    pub collision: bool,
    /// The hack reached 100% this frame
    pub game_won: bool,
    /// A boss core was beaten this frame
    pub boss_defeated: bool,
    /// Boosters picked up this frame
    pub collected: Vec<BoosterKind>,
}

impl StepResult {
    fn idle(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            collision: false,
            game_won: false,
            boss_defeated: false,
            collected: Vec::new(),
        }
    }
}

/// Scroll speed for a score
pub fn game_speed_for(score: f64) -> f32 {
    let progress = (score / WIN_SCORE).clamp(0.0, 1.0) as f32;
    BASE_GAME_SPEED + (MAX_GAME_SPEED - BASE_GAME_SPEED) * progress
}

/// Advance the game by one frame
///
/// `dt` is in frames (1.0 = 1/60 s) and is not clamped; non-finite or
/// negative values count as zero. The previous state is left untouched.
pub fn update_game_state<R: Rng + ?Sized>(
    prev: &GameState,
    width: f32,
    height: f32,
    input: &TickInput,
    dt: f32,
    rng: &mut R,
    achievements: &mut dyn AchievementObserver,
) -> StepResult {
    if !prev.game_active {
        return StepResult::idle(prev);
    }
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    let mut state = prev.clone();
    state.canvas = Vec2::new(width, height);
    let mut collision = false;
    let mut boss_defeated = false;

    // 1. Player
    let steering = input.steering(state.cursor_control);
    move_player(&mut state.player, steering, width, height);

    // 2. Maze and score, frozen while a boss is up
    let prev_score = state.score;
    if !state.boss_active() {
        state.game_speed = game_speed_for(state.score);
        update_maze(&mut state, width, height, dt, rng);
        state.score += SCORE_PER_FRAME * dt as f64;
    }

    // 3. Walls
    if !state.player.invulnerable {
        collision = state
            .maze
            .iter()
            .any(|block| block_collision(&state.player, block));
    }

    // 4. Boosters
    scroll_boosters(&mut state.boosters, state.game_speed * dt, height);
    let collected = apply_boosters(&mut state);

    // 5. Invulnerability (a key picked up this frame starts at full time)
    if !collected.contains(&BoosterKind::SafetyKey) {
        state.player.tick_invulnerability(dt);
    }

    // 6. Boss spawn
    if state.boss_phase() == BossPhase::Dormant {
        if let Some(level) = crossed_threshold(prev_score, state.score) {
            log::info!("Boss core level {} spawned at {:.0}", level, state.score);
            state.boss_core = Some(spawn_boss(level, width, height, rng));
            clear_arena(&mut state);
        }
    }

    // 7. Boss frame or cooldown
    let mut dormant = false;
    if let Some(boss) = state.boss_core.as_mut() {
        if boss.active {
            let update = update_boss(boss, &state.player, dt, rng);
            collision |= update.collision;
            if update.defeated {
                boss_defeated = true;
                state.score += BOSS_DEFEAT_BONUS;
                state.bosses_defeated += 1;
                state.highest_boss_level = state.highest_boss_level.max(boss.level);
            }
        } else {
            dormant = tick_cooldown(boss, dt);
        }
    }
    if dormant {
        state.boss_core = None;
    }

    // 8. Win
    let mut game_won = false;
    if state.score >= WIN_SCORE {
        game_won = true;
        state.game_won = true;
        state.game_active = false;
        log::info!("Full hack reached");
    }

    // 9. Cosmetics
    state.color_phase = wrap_degrees(state.color_phase + COLOR_PHASE_SPEED * dt);

    // 10. Achievements
    achievements.observe(&state);

    StepResult {
        state,
        collision,
        game_won,
        boss_defeated,
        collected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Booster, MazeBlock, init_game_state, start_game};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn running() -> GameState {
        start_game(&init_game_state(W, H))
    }

    fn step(state: &GameState, rng: &mut Pcg32) -> StepResult {
        update_game_state(state, W, H, &TickInput::default(), 1.0, rng, &mut ())
    }

    #[test]
    fn test_inactive_state_is_returned_unchanged() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = init_game_state(W, H);
        let result = step(&state, &mut rng);
        assert_eq!(result.state, state);
        assert!(!result.collision);
        assert!(!result.game_won);
    }

    #[test]
    fn test_score_advances() {
        let mut rng = Pcg32::seed_from_u64(1);
        let result = step(&running(), &mut rng);
        assert!((result.state.score - SCORE_PER_FRAME).abs() < 1e-9);
        assert!(!result.state.maze.is_empty());
    }

    #[test]
    fn test_prev_state_untouched() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = running();
        let snapshot = state.clone();
        let _ = step(&state, &mut rng);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_block_hit_collides() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        let p = state.player.pos;
        state.maze.push(MazeBlock::new(p.x - 5.0, p.y - 5.0, 10.0, 10.0));
        assert!(step(&state, &mut rng).collision);
    }

    #[test]
    fn test_invulnerable_ignores_blocks() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.player.invulnerable = true;
        state.player.invulnerable_timer = 100.0;
        let p = state.player.pos;
        state.maze.push(MazeBlock::new(p.x - 5.0, p.y - 5.0, 10.0, 10.0));
        let result = step(&state, &mut rng);
        assert!(!result.collision);
        assert_eq!(result.state.player.invulnerable_timer, 99.0);
    }

    #[test]
    fn test_safety_key_scenario() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        let p = state.player.pos;
        state.boosters.push(Booster::new(BoosterKind::SafetyKey, p, BOOSTER_SIZE));

        let result = step(&state, &mut rng);
        assert!(result.state.player.invulnerable);
        assert_eq!(result.state.player.invulnerable_timer, INVULNERABILITY_FRAMES);
        assert_eq!(result.state.collected_safety_keys, 1);
        assert!(result.state.boosters.iter().all(|b| b.kind != BoosterKind::SafetyKey));
        assert_eq!(result.collected, vec![BoosterKind::SafetyKey]);
    }

    #[test]
    fn test_backdoor_scenario() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.maze.push(MazeBlock::new(0.0, 100.0, 45.0, 45.0));
        let p = state.player.pos;
        state.boosters.push(Booster::new(BoosterKind::Backdoor, p, BOOSTER_SIZE));

        let result = step(&state, &mut rng);
        assert!(result.state.maze.is_empty());
        assert_eq!(result.state.collected_backdoors, 1);
    }

    #[test]
    fn test_win_at_full_hack() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.score = 99_995.0;
        let mut steps = 0;
        loop {
            let result = step(&state, &mut rng);
            steps += 1;
            state = result.state;
            if state.score >= WIN_SCORE {
                assert!(result.game_won);
                assert!(state.game_won);
                assert!(!state.game_active);
                break;
            }
            assert!(!result.game_won);
            assert!(steps < 10);
        }
        // Further steps are inert
        let after = step(&state, &mut rng);
        assert_eq!(after.state, state);
    }

    #[test]
    fn test_boss_spawns_on_threshold_and_freezes_score() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.score = BOSS_THRESHOLDS[0] - 1.0;

        let result = step(&state, &mut rng);
        let boss = result.state.boss_core.as_ref().expect("boss should spawn");
        assert!(boss.active);
        assert_eq!(boss.level, 1);

        let frozen = result.state.score;
        let mut state = result.state;
        for _ in 0..30 {
            state = step(&state, &mut rng).state;
            assert_eq!(state.score, frozen);
            assert!(state.boss_active());
        }
    }

    #[test]
    fn test_no_second_spawn_while_active_or_cooling_down() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.score = BOSS_THRESHOLDS[0] - 1.0;
        state = step(&state, &mut rng).state;
        let boss = state.boss_core.clone().unwrap();

        // Cooldown: score runs again but a crossing must not spawn
        let mut cooling = boss.clone();
        cooling.active = false;
        cooling.cooldown_timer = BOSS_COOLDOWN_FRAMES;
        state.boss_core = Some(cooling);
        state.score = BOSS_THRESHOLDS[1] - 0.5;
        let result = step(&state, &mut rng);
        let after = result.state.boss_core.as_ref().unwrap();
        assert!(!after.active);
        assert_eq!(after.phase(), BossPhase::Cooldown);
        assert!(result.state.score >= BOSS_THRESHOLDS[1]);

        // Past thresholds never re-trigger once dormant
        let mut state = result.state;
        state.boss_core.as_mut().unwrap().cooldown_timer = 0.5;
        let state = step(&state, &mut rng).state;
        assert!(state.boss_core.is_none());
        let state = step(&state, &mut rng).state;
        assert!(state.boss_core.is_none());
    }

    #[test]
    fn test_boss_defeat_awards_bonus() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.score = BOSS_THRESHOLDS[0] - 1.0;
        state = step(&state, &mut rng).state;
        let score = state.score;
        let boss = state.boss_core.as_mut().unwrap();
        for line in boss.outer_lines.iter_mut().chain(boss.inner_lines.iter_mut()) {
            line.destroyed = true;
        }
        state.player.pos = boss.center;

        let result = step(&state, &mut rng);
        assert!(result.boss_defeated);
        assert!(!result.collision);
        assert_eq!(result.state.score, score + BOSS_DEFEAT_BONUS);
        assert_eq!(result.state.bosses_defeated, 1);
        assert_eq!(result.state.highest_boss_level, 1);
        assert_eq!(result.state.boss_phase(), BossPhase::Cooldown);
    }

    #[test]
    fn test_steering_modes() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        let start = state.player.pos;

        let input = TickInput {
            keys: HeldKeys::from_codes(["ArrowUp"]),
            ..Default::default()
        };
        let moved = update_game_state(&state, W, H, &input, 1.0, &mut rng, &mut ()).state;
        assert_eq!(moved.player.pos, start - Vec2::new(0.0, PLAYER_MOVE_SPEED));

        // Keys are ignored in cursor mode
        state.cursor_control = true;
        let still = update_game_state(&state, W, H, &input, 1.0, &mut rng, &mut ()).state;
        assert_eq!(still.player.pos, start);

        // Mobile uses the swipe regardless of cursor mode
        let swipe = TickInput {
            swipe: Some(Vec2::new(1.0, 0.0)),
            cursor: Some(Vec2::ZERO),
            is_mobile: true,
            ..Default::default()
        };
        let swiped = update_game_state(&state, W, H, &swipe, 1.0, &mut rng, &mut ()).state;
        assert_eq!(swiped.player.pos, start + Vec2::new(PLAYER_MOVE_SPEED, 0.0));
    }

    #[test]
    fn test_player_move_ignores_delta_time() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = running();
        let input = TickInput {
            keys: HeldKeys::from_codes(["ArrowLeft"]),
            ..Default::default()
        };
        let fast = update_game_state(&state, W, H, &input, 3.0, &mut rng, &mut ()).state;
        assert_eq!(fast.player.pos.x, state.player.pos.x - PLAYER_MOVE_SPEED);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = start_game(&init_game_state(0.0, 0.0));
        let input = TickInput::default();
        let result = update_game_state(&state, 0.0, 0.0, &input, f32::NAN, &mut rng, &mut ());
        assert_eq!(result.state.score, 0.0);
        assert!(result.state.maze.is_empty());

        let result = update_game_state(&state, -10.0, -10.0, &input, 1.0, &mut rng, &mut ());
        assert!(result.state.maze.is_empty());
    }

    #[test]
    fn test_color_phase_wraps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running();
        state.color_phase = 359.5;
        let result = step(&state, &mut rng);
        assert!((result.state.color_phase - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut s1 = running();
        let mut s2 = running();
        for i in 0..300 {
            let input = TickInput {
                keys: HeldKeys {
                    left: i % 40 < 20,
                    right: i % 40 >= 20,
                    ..Default::default()
                },
                ..Default::default()
            };
            s1 = update_game_state(&s1, W, H, &input, 1.0, &mut rng1, &mut ()).state;
            s2 = update_game_state(&s2, W, H, &input, 1.0, &mut rng2, &mut ()).state;
        }
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_observer_sees_every_step() {
        struct Counter(u32);
        impl AchievementObserver for Counter {
            fn observe(&mut self, _state: &GameState) {
                self.0 += 1;
            }
        }
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counter = Counter(0);
        let mut state = running();
        for _ in 0..5 {
            let input = TickInput::default();
            state = update_game_state(&state, W, H, &input, 1.0, &mut rng, &mut counter).state;
        }
        assert_eq!(counter.0, 5);
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            moves in prop::collection::vec(0u8..16, 1..200),
            dt in 0.1f32..3.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = running();
            for bits in moves {
                let input = TickInput {
                    keys: HeldKeys {
                        up: bits & 1 != 0,
                        down: bits & 2 != 0,
                        left: bits & 4 != 0,
                        right: bits & 8 != 0,
                    },
                    ..Default::default()
                };
                let before = state.score;
                state = update_game_state(&state, W, H, &input, dt, &mut rng, &mut ()).state;
                prop_assert!(state.score >= before);
            }
        }

        #[test]
        fn prop_invulnerable_never_hits_blocks(
            seed in any::<u64>(),
            blocks in prop::collection::vec(
                (0.0f32..800.0, 0.0f32..600.0, 1.0f32..200.0, 1.0f32..200.0),
                0..40,
            ),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = running();
            state.player.invulnerable = true;
            state.player.invulnerable_timer = INVULNERABILITY_FRAMES;
            state.maze = blocks
                .into_iter()
                .map(|(x, y, w, h)| MazeBlock::new(x, y, w, h))
                .collect();
            let result = step(&state, &mut rng);
            prop_assert!(!result.collision);
        }
    }
}
