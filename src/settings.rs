//! Widget settings and preferences
//!
//! Persisted in LocalStorage so a reload keeps the user's choices.

use serde::{Deserialize, Serialize};

use crate::scene::DiceStyle;

/// Widget settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// How dice are presented while rolling
    pub style: DiceStyle,
    /// Print results on settled dice
    pub show_labels: bool,
    /// Skip the spin animation entirely
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            style: DiceStyle::Spinning,
            show_labels: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Style after accessibility overrides
    pub fn effective_style(&self) -> DiceStyle {
        if self.reduced_motion {
            DiceStyle::Flat
        } else {
            self.style
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "dice_tray_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
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
