//! Hack Runner entry point
//!
//! The web build is driven from JS through `platform::WebSession`. Natively
//! this runs a headless autopilot session and logs how far it got.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use hack_runner::consts::{CELL_SIZE, FRAME_MS};
    use hack_runner::persistence::MemoryStore;
    use hack_runner::sim::{GameState, TickInput};
    use hack_runner::{Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5u32);
    let (width, height) = (800.0, 600.0);

    log::info!("Hack Runner (native) starting with seed: {seed}");

    let settings = Settings {
        cursor_control: true,
        ..Default::default()
    };
    let mut session = Session::new(width, height, seed, settings, MemoryStore::new());
    session.start();

    /// Column center with the fewest blocks just ahead of the player
    fn autopilot_target(state: &GameState, width: f32) -> Vec2 {
        let player = &state.player;
        let ahead = player.pos.y - CELL_SIZE * 3.0;
        let columns = (width / CELL_SIZE).floor() as usize;
        let blocked = |x: f32| {
            state
                .maze
                .iter()
                .filter(|b| b.y + b.height > ahead && b.y < player.pos.y + player.size)
                .filter(|b| x + player.size > b.x && x - player.size < b.x + b.width)
                .count()
        };
        let best = (0..columns)
            .map(|c| (c as f32 + 0.5) * CELL_SIZE)
            .min_by(|a, b| {
                let cost_a = blocked(*a) * 1000 + (a - player.pos.x).abs() as usize;
                let cost_b = blocked(*b) * 1000 + (b - player.pos.x).abs() as usize;
                cost_a.cmp(&cost_b)
            })
            .unwrap_or(player.pos.x);
        Vec2::new(best, player.pos.y)
    }

    let mut outcome = None;
    for frame in 0..max_frames {
        let input = TickInput {
            cursor: Some(autopilot_target(session.state(), width)),
            ..Default::default()
        };
        if let Some(done) = session.frame(frame as f64 * FRAME_MS, width, height, &input) {
            outcome = Some(done);
            break;
        }
    }

    match outcome {
        Some(done) => {
            let state = session.state();
            log::info!(
                "Run ended: {:.1}% hacked (won: {}, bosses: {}, keys: {}, backdoors: {})",
                done.percent,
                done.won,
                state.bosses_defeated,
                state.collected_safety_keys,
                state.collected_backdoors
            );
        }
        None => {
            session.stop();
            log::info!(
                "Frame limit reached at {:.1}% hacked",
                session.state().hack_percent()
            );
        }
    }
    for achievement in session.take_unlocked() {
        log::info!("Unlocked: {}", achievement.id());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init
}
