//! Browser bridge
//!
//! The page owns the canvas, the renderer and the input listeners. It
//! forwards raw events here and calls `frame` from `requestAnimationFrame`.
//! State crosses the boundary as JSON.

use std::collections::BTreeSet;

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::persistence::{LocalStorageStore, ScoreStore};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{HeldKeys, TickInput};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Hack Runner core loaded");
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session<LocalStorageStore>,
    held: BTreeSet<String>,
    cursor: Option<Vec2>,
    swipe: Option<Vec2>,
    is_mobile: bool,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, is_mobile: bool) -> WebSession {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        log::info!("Session created with seed: {seed}");
        WebSession {
            session: Session::new(width, height, seed, Settings::load(), LocalStorageStore::new()),
            held: BTreeSet::new(),
            cursor: None,
            swipe: None,
            is_mobile,
        }
    }

    pub fn start(&mut self) {
        self.held.clear();
        self.swipe = None;
        self.session.start();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Advance one frame; returns the outcome JSON when the run ends
    pub fn frame(&mut self, timestamp_ms: f64, width: f32, height: f32) -> Option<String> {
        let input = TickInput {
            keys: HeldKeys::from_codes(self.held.iter().map(String::as_str)),
            cursor: self.cursor,
            swipe: self.swipe,
            is_mobile: self.is_mobile,
        };
        let outcome = self.session.frame(timestamp_ms, width, height, &input)?;
        log::info!(
            "Run over: {:.1}% (won: {}, rank: {:?})",
            outcome.percent,
            outcome.won,
            outcome.rank
        );
        serde_json::to_string(&serde_json::json!({
            "won": outcome.won,
            "percent": outcome.percent,
            "rank": outcome.rank,
        }))
        .ok()
    }

    /// Current game state as JSON for the renderer and HUD
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self.session.state()).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, code: &str) {
        self.held.insert(code.to_string());
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.cursor = Some(Vec2::new(x, y));
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.cursor = None;
    }

    /// Swipe direction; the simulation normalizes it
    pub fn swipe(&mut self, dx: f32, dy: f32) {
        self.swipe = Some(Vec2::new(dx, dy));
    }

    #[wasm_bindgen(js_name = swipeEnd)]
    pub fn swipe_end(&mut self) {
        self.swipe = None;
    }

    #[wasm_bindgen(js_name = toggleCursorControl)]
    pub fn toggle_cursor_control(&mut self) -> bool {
        self.session.toggle_cursor_control();
        self.session.settings().save();
        self.session.state().cursor_control
    }

    #[wasm_bindgen(js_name = setSkin)]
    pub fn set_skin(&mut self, skin: &str) {
        self.session.set_skin(skin);
        self.session.settings().save();
    }

    /// Preferences as JSON, including HUD and accessibility flags
    pub fn settings(&self) -> String {
        self.session.settings().to_json()
    }

    /// Apply and persist preferences JSON from the settings menu
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, json: &str) {
        self.session.set_settings(Settings::from_json(json));
        self.session.settings().save();
    }

    /// Ids of achievements unlocked since the last call
    #[wasm_bindgen(js_name = takeUnlocked)]
    pub fn take_unlocked(&mut self) -> Vec<String> {
        self.session
            .take_unlocked()
            .into_iter()
            .map(|a| a.id().to_string())
            .collect()
    }

    #[wasm_bindgen(js_name = highScores)]
    pub fn high_scores(&self) -> String {
        match self.session.store().load_scores() {
            Ok(scores) => serde_json::to_string(&scores).unwrap_or_default(),
            Err(err) => {
                log::warn!("Could not load high scores: {err}");
                String::from("{\"entries\":[]}")
            }
        }
    }
}
