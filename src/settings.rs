//! Game settings and preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Start runs in cursor-follow mode on desktop
    pub cursor_control: bool,

    // === Cosmetics ===
    /// Skin chosen in the skin picker (opaque to the simulation)
    pub selected_skin: String,

    // === Timing ===
    /// Largest `delta_time` (in frames) the session feeds the simulation.
    /// Longer gaps, e.g. after a backgrounded tab, are cut down to this.
    pub max_delta_time: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (renderer skips the color cycle)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cursor_control: false,
            selected_skin: String::from("default"),
            max_delta_time: 3.0,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Delta time after applying the spike cap
    ///
    /// A non-positive or non-finite cap disables capping.
    pub fn cap_delta_time(&self, dt: f32) -> f32 {
        if self.max_delta_time.is_finite() && self.max_delta_time > 0.0 {
            dt.min(self.max_delta_time)
        } else {
            dt
        }
    }

    /// Parse settings JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("Ignoring invalid settings: {err}");
            Self::default()
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hack_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
