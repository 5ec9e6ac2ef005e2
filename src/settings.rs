//! Player preferences and profile
//!
//! Both are persisted to LocalStorage under their own keys; native builds
//! always start from defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::storage;

pub const MAX_NICK_LEN: usize = 20;
pub const MAX_EMAIL_LEN: usize = 40;

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Weapon heat bar under the score
    pub show_heat_bar: bool,
    /// Health bars over bosses and damaged comets
    pub show_health_bars: bool,

    // === Developer ===
    /// Outline every collider
    pub show_hitboxes: bool,

    // === Accessibility ===
    /// Static shield ring instead of a pulsing one
    pub reduced_motion: bool,
    /// Primitives drawn in high-contrast colors
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: false,
            show_heat_bar: true,
            show_health_bars: true,
            show_hitboxes: false,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    const STORAGE_KEY: &'static str = "space_invaders_settings";

    pub fn load() -> Self {
        storage::load_or_default(Self::STORAGE_KEY, "settings")
    }

    pub fn save(&self) {
        storage::save_or_warn(Self::STORAGE_KEY, self, "Settings");
    }
}

/// Who is playing (attached to submitted scores)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub nick: String,
    #[serde(default)]
    pub email: String,
}

impl PlayerProfile {
    const STORAGE_KEY: &'static str = "space_invaders_profile";

    /// Trimmed and clipped to the input field limits
    pub fn new(nick: &str, email: &str) -> Self {
        Self {
            nick: nick.trim().chars().take(MAX_NICK_LEN).collect(),
            email: email.trim().chars().take(MAX_EMAIL_LEN).collect(),
        }
    }

    /// A nick is required to submit scores; email is optional
    pub fn is_valid(&self) -> bool {
        !self.nick.is_empty()
    }

    pub fn load() -> Self {
        storage::load_or_default(Self::STORAGE_KEY, "player profile")
    }

    pub fn save(&self) {
        storage::save_or_warn(Self::STORAGE_KEY, self, "Player profile");
    }
}
