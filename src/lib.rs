//! Space Invaders - A formation shooter arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, waves, pools, collisions)
//! - `renderer`: Backend-agnostic draw surface and frame composition
//! - `platform`: Browser/native platform abstraction (input, canvas)
//! - `persistence`: Score store backends and leaderboard cache
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreEntry};
pub use settings::{PlayerProfile, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Safe zone - identical play area for every player regardless of screen
    pub const SAFE_ZONE_WIDTH: f32 = 1200.0;
    pub const SAFE_ZONE_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Distance from the safe zone bottom to the ship's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 70.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 50.0;
    pub const BOSS_SIZE: f32 = 80.0;
    pub const ENEMY_BASE_SPEED: f32 = 60.0;
    pub const ENEMY_FLY_SPEED: f32 = 300.0;
    pub const ENEMY_COLUMN_SPACING: f32 = 60.0;
    pub const ENEMY_ROW_SPACING: f32 = 50.0;
    pub const ENEMY_FIRST_ROW_Y: f32 = 80.0;
    /// Enemies start this far above the safe zone, plus a per-row stagger
    pub const ENEMY_SPAWN_OFFSET: f32 = 200.0;
    pub const ENEMY_SPAWN_ROW_STAGGER: f32 = 55.0;
    pub const DEATH_FRAMES: u32 = 8;
    pub const DEATH_FRAME_DURATION: f32 = 0.025;

    /// Formation
    pub const FORMATION_DESCENT: f32 = 20.0;
    pub const MAX_SPEED_MULTIPLIER: f32 = 2.5;
    pub const SPEED_STEP_PER_WAVE: f32 = 0.08;

    /// Lasers
    pub const PROJECTILE_WIDTH: f32 = 3.0;
    pub const PROJECTILE_HEIGHT: f32 = 12.0;
    pub const PROJECTILE_SPEED: f32 = 450.0;
    pub const PROJECTILE_BOUNDS_MARGIN: f32 = 20.0;
    pub const PLAYER_PROJECTILE_POOL: usize = 10;
    pub const ENEMY_PROJECTILE_POOL: usize = 20;
    /// Horizontal offset of the side lasers in triple-shot mode
    pub const TRIPLE_SHOT_OFFSET: f32 = 15.0;
    /// Boss triple-shot spread (radians)
    pub const BOSS_SPREAD_ANGLE: f32 = 0.3;

    /// Rockets
    pub const ROCKET_WIDTH: f32 = 8.0;
    pub const ROCKET_HEIGHT: f32 = 20.0;
    pub const ROCKET_SPEED: f32 = 300.0;
    pub const ROCKET_EXPLOSION_RADIUS: f32 = 120.0;
    pub const ROCKET_BOUNDS_MARGIN: f32 = 50.0;
    pub const ROCKET_POOL: usize = 5;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const POWERUP_FALL_SPEED: f32 = 80.0;
    /// Autofire lasers leave from the wings, this far in from each edge
    pub const AUTOFIRE_WING_INSET: f32 = 10.0;

    /// Comets
    pub const COMET_SPAWN_HEIGHT: f32 = 60.0;
    pub const COMET_DESPAWN_MARGIN: f32 = 50.0;
    /// Comets spawn with their left edge in [0, width - this]
    pub const COMET_SPAWN_X_MARGIN: f32 = 50.0;

    /// Broad-phase grid cell size
    pub const GRID_CELL_SIZE: f32 = 100.0;

    /// Frame rate that per-frame probabilities are expressed against
    pub const REFERENCE_FPS: f32 = 60.0;
}

/// Axis-aligned rectangle for the play area handed to us by the viewport layer
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SafeZone {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Default for SafeZone {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::new(consts::SAFE_ZONE_WIDTH, consts::SAFE_ZONE_HEIGHT),
        }
    }
}

impl SafeZone {
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.origin.x + self.size.x / 2.0
    }
}

/// Rotate a direction vector by `angle` radians
#[inline]
pub fn rotate(dir: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(dir)
}
