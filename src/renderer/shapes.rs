//! Primitive shapes and colors for HUD overlays

use glam::Vec2;

use super::SpriteId;
use crate::settings::Settings;
use crate::sim::{CometSize, PowerUpKind};

/// Linear RGBA, each channel in 0..=1
pub type Color = [f32; 4];

/// Geometry of a primitive draw call (y grows downward)
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Top-left corner + size
    Rect { pos: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
    /// Text anchored at its baseline center
    Text { pos: Vec2, text: String, size: f32 },
}

/// How a primitive is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    /// Outline width; `None` fills the shape
    pub stroke: Option<f32>,
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Self { color, stroke: None }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            color,
            stroke: Some(width),
        }
    }
}

/// Replace the alpha channel
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for canvas backends
pub fn to_css(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Heat bar color: green while cool, through yellow, to red near the limit
pub fn heat_color(fraction: f32, alpha: f32) -> Color {
    let t = fraction.clamp(0.0, 1.0);

    let (r, g, b) = if t < 0.5 {
        // Green to yellow
        let u = t / 0.5;
        (0.2 + 0.8 * u, 0.85, 0.25)
    } else {
        // Yellow to red
        let u = (t - 0.5) / 0.5;
        (1.0, 0.85 - 0.65 * u, 0.25 - 0.1 * u)
    };

    [r, g, b, alpha]
}

/// Remaining-health color, red when nearly dead
pub fn health_color(fraction: f32) -> Color {
    if fraction > 0.6 {
        [0.3, 0.9, 0.3, 1.0]
    } else if fraction > 0.3 {
        [1.0, 0.8, 0.2, 1.0]
    } else {
        [1.0, 0.25, 0.2, 1.0]
    }
}

/// Flat fill for backends without sprite images
pub fn sprite_color(sprite: SpriteId) -> Color {
    match sprite {
        SpriteId::Player => [0.3, 0.8, 1.0, 1.0],
        SpriteId::Enemy => [0.5, 1.0, 0.4, 1.0],
        SpriteId::Boss => [0.9, 0.3, 0.9, 1.0],
        SpriteId::Explosion(frame) => {
            // Fades out over the death animation
            let t = frame as f32 / crate::consts::DEATH_FRAMES as f32;
            [1.0, 0.6 - 0.4 * t, 0.1, 1.0 - t]
        }
        SpriteId::Comet(CometSize::Small) => [0.7, 0.6, 0.5, 1.0],
        SpriteId::Comet(CometSize::Medium) => [0.6, 0.5, 0.4, 1.0],
        SpriteId::Comet(CometSize::Large) => [0.5, 0.4, 0.3, 1.0],
        SpriteId::PowerUp(PowerUpKind::Life) => [1.0, 0.3, 0.4, 1.0],
        SpriteId::PowerUp(PowerUpKind::Shield) => [0.3, 0.6, 1.0, 1.0],
        SpriteId::PowerUp(PowerUpKind::AutoFire) => [1.0, 0.8, 0.2, 1.0],
        SpriteId::PowerUp(PowerUpKind::TripleShot) => [0.4, 1.0, 0.8, 1.0],
        SpriteId::PowerUp(PowerUpKind::Rocket) => [1.0, 0.5, 0.1, 1.0],
        SpriteId::Laser => [0.6, 1.0, 1.0, 1.0],
        SpriteId::EnemyLaser => [1.0, 0.3, 0.3, 1.0],
        SpriteId::Rocket => [1.0, 0.6, 0.2, 1.0],
    }
}

/// Colors used by `draw_frame`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub bar_back: Color,
    pub overheated: Color,
    pub shield: Color,
    pub hitbox: Color,
    pub banner: Color,
}

impl Palette {
    pub const STANDARD: Palette = Palette {
        background: [0.02, 0.02, 0.08, 1.0],
        text: [0.9, 0.9, 0.95, 1.0],
        bar_back: [0.2, 0.2, 0.25, 0.8],
        overheated: [1.0, 0.1, 0.1, 1.0],
        shield: [0.3, 0.7, 1.0, 0.6],
        hitbox: [0.0, 1.0, 0.0, 0.8],
        banner: [1.0, 0.85, 0.2, 1.0],
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        background: [0.0, 0.0, 0.0, 1.0],
        text: [1.0, 1.0, 1.0, 1.0],
        bar_back: [0.4, 0.4, 0.4, 1.0],
        overheated: [1.0, 0.0, 0.0, 1.0],
        shield: [0.0, 1.0, 1.0, 1.0],
        hitbox: [0.0, 1.0, 0.0, 1.0],
        banner: [1.0, 1.0, 0.0, 1.0],
    };

    pub fn for_settings(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::STANDARD
        }
    }
}
