//! Rendering surface
//!
//! The simulation never draws. `draw_frame` walks a `GameState` and describes
//! the frame as sprite and primitive calls on a `RenderSurface`; the backend
//! (canvas 2D on the web, `RecordingSurface` in tests) decides what a call
//! looks like. All positions are in safe-zone coordinates.

pub mod recording;
pub mod shapes;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::collision::{Aabb, Collider};
use crate::sim::enemy::AnimationState;
use crate::sim::{CometSize, GamePhase, GameState, PowerUpKind};

pub use recording::{DrawCall, RecordingSurface};
pub use shapes::{Color, Palette, Shape, Style};

const HUD_TEXT_SIZE: f32 = 18.0;
const BANNER_TEXT_SIZE: f32 = 40.0;
const HEAT_BAR_SIZE: Vec2 = Vec2::new(160.0, 8.0);
const HEALTH_BAR_HEIGHT: f32 = 5.0;
const HEALTH_BAR_GAP: f32 = 4.0;
const SHIELD_PULSE_RATE: f32 = 6.0;

/// Everything that is drawn as an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Enemy,
    Boss,
    /// Enemy death animation frame
    Explosion(u32),
    Comet(CometSize),
    PowerUp(PowerUpKind),
    Laser,
    EnemyLaser,
    Rocket,
}

/// Drawing backend
pub trait RenderSurface {
    /// Draw `sprite` stretched over the box at `pos` (top-left) with `size`
    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, size: Vec2);

    fn draw_primitive(&mut self, shape: Shape, style: Style);
}

fn sprite_at<S: RenderSurface + ?Sized>(surface: &mut S, sprite: SpriteId, bounds: Aabb) {
    surface.draw_sprite(sprite, bounds.min, bounds.size);
}

fn text<S: RenderSurface + ?Sized>(
    surface: &mut S,
    pos: Vec2,
    text: String,
    size: f32,
    color: Color,
) {
    surface.draw_primitive(Shape::Text { pos, text, size }, Style::fill(color));
}

/// Background track plus a filled portion of `fraction`
fn bar<S: RenderSurface + ?Sized>(
    surface: &mut S,
    pos: Vec2,
    size: Vec2,
    fraction: f32,
    back: Color,
    front: Color,
) {
    surface.draw_primitive(Shape::Rect { pos, size }, Style::fill(back));
    let filled = Vec2::new(size.x * fraction.clamp(0.0, 1.0), size.y);
    if filled.x > 0.0 {
        surface.draw_primitive(Shape::Rect { pos, size: filled }, Style::fill(front));
    }
}

fn health_bar<S: RenderSurface + ?Sized>(
    surface: &mut S,
    bounds: Aabb,
    hp: u32,
    max_hp: u32,
    palette: &Palette,
) {
    if max_hp == 0 {
        return;
    }
    let fraction = hp as f32 / max_hp as f32;
    bar(
        surface,
        Vec2::new(bounds.min.x, bounds.min.y - HEALTH_BAR_GAP - HEALTH_BAR_HEIGHT),
        Vec2::new(bounds.size.x, HEALTH_BAR_HEIGHT),
        fraction,
        palette.bar_back,
        shapes::health_color(fraction),
    );
}

/// Describe one frame of `state` on `surface`
pub fn draw_frame<S: RenderSurface + ?Sized>(
    state: &GameState,
    settings: &Settings,
    surface: &mut S,
) {
    let palette = Palette::for_settings(settings);
    let zone = state.safe_zone;

    surface.draw_primitive(
        Shape::Rect {
            pos: zone.origin,
            size: zone.size,
        },
        Style::fill(palette.background),
    );

    // === Enemies ===
    for enemy in state.enemies.iter().filter(|e| e.active) {
        let bounds = enemy.bounds();
        let sprite = match enemy.animation {
            AnimationState::Dying { frame, .. } => SpriteId::Explosion(frame),
            AnimationState::Dead => continue,
            AnimationState::Idle if enemy.is_boss() => SpriteId::Boss,
            AnimationState::Idle => SpriteId::Enemy,
        };
        sprite_at(surface, sprite, bounds);

        if settings.show_health_bars && enemy.is_boss() && enemy.is_hittable() {
            health_bar(surface, bounds, enemy.health, enemy.max_health, &palette);
        }
    }

    // === Hazards and pickups ===
    for comet in state.comets.iter().filter(|c| c.active) {
        let bounds = comet.bounds();
        sprite_at(surface, SpriteId::Comet(comet.kind), bounds);
        if settings.show_health_bars && comet.hp < comet.max_hp {
            health_bar(surface, bounds, comet.hp, comet.max_hp, &palette);
        }
    }

    for powerup in state.powerups.iter().filter(|p| p.active) {
        sprite_at(surface, SpriteId::PowerUp(powerup.kind), powerup.bounds());
    }

    // === Shots ===
    for (_, shot) in state.player_projectiles.iter_active() {
        sprite_at(surface, SpriteId::Laser, shot.bounds());
    }
    for (_, shot) in state.enemy_projectiles.iter_active() {
        sprite_at(surface, SpriteId::EnemyLaser, shot.bounds());
    }
    for (_, rocket) in state.rockets.iter_active() {
        sprite_at(surface, SpriteId::Rocket, rocket.bounds());
    }

    // === Player ===
    let player = &state.player;
    sprite_at(surface, SpriteId::Player, player.bounds());
    if player.shield_active {
        let alpha = if settings.reduced_motion {
            palette.shield[3]
        } else {
            0.4 + 0.3 * (state.time as f32 * SHIELD_PULSE_RATE).sin().abs()
        };
        surface.draw_primitive(
            Shape::Circle {
                center: player.center(),
                radius: player.size.x * 0.75,
            },
            Style::stroke(shapes::with_alpha(palette.shield, alpha), 3.0),
        );
    }

    if settings.show_hitboxes {
        draw_hitboxes(state, &palette, surface);
    }

    draw_hud(state, settings, &palette, surface);
}

fn draw_hitboxes<S: RenderSurface + ?Sized>(state: &GameState, palette: &Palette, surface: &mut S) {
    let style = Style::stroke(palette.hitbox, 1.0);
    let mut outline = |bounds: Aabb| {
        surface.draw_primitive(
            Shape::Rect {
                pos: bounds.min,
                size: bounds.size,
            },
            style,
        );
    };

    outline(state.player.bounds());
    state
        .enemies
        .iter()
        .filter(|e| e.is_hittable())
        .for_each(|e| outline(e.bounds()));
    state
        .comets
        .iter()
        .filter(|c| c.active)
        .for_each(|c| outline(c.bounds()));
    state
        .powerups
        .iter()
        .filter(|p| p.active)
        .for_each(|p| outline(p.bounds()));
    for (_, shot) in state
        .player_projectiles
        .iter_active()
        .chain(state.enemy_projectiles.iter_active())
    {
        outline(shot.bounds());
    }
    for (_, rocket) in state.rockets.iter_active() {
        outline(rocket.bounds());
    }
}

fn draw_hud<S: RenderSurface + ?Sized>(
    state: &GameState,
    settings: &Settings,
    palette: &Palette,
    surface: &mut S,
) {
    let zone = state.safe_zone;
    let left = zone.left() + 90.0;
    let right = zone.right() - 90.0;
    let line = zone.top() + 24.0;

    let hud = [
        (left, format!("SCORE {}", state.score)),
        (zone.center_x(), format!("WAVE {}", state.wave)),
        (right, format!("LIVES {}", state.lives)),
    ];
    for (x, label) in hud {
        text(surface, Vec2::new(x, line), label, HUD_TEXT_SIZE, palette.text);
    }

    let mut status = Vec::new();
    if state.rocket_ammo > 0 {
        status.push(format!("ROCKETS {}", state.rocket_ammo));
    }
    if state.effects.triple_shot_active() {
        status.push(format!("TRIPLE {:.0}s", state.effects.triple_shot.ceil()));
    }
    if state.effects.autofire_active() {
        status.push(format!("AUTO {:.0}s", state.effects.autofire.ceil()));
    }
    if state.god_mode {
        status.push("GOD".to_string());
    }
    if !status.is_empty() {
        let pos = Vec2::new(right, line + 22.0);
        text(surface, pos, status.join("  "), HUD_TEXT_SIZE * 0.8, palette.text);
    }

    if settings.show_heat_bar {
        let heat = &state.player.heat;
        let color = if heat.overheated {
            palette.overheated
        } else {
            shapes::heat_color(heat.fraction(), 1.0)
        };
        bar(
            surface,
            Vec2::new(left - HEAT_BAR_SIZE.x / 2.0, line + 10.0),
            HEAT_BAR_SIZE,
            heat.fraction(),
            palette.bar_back,
            color,
        );
    }

    let middle = Vec2::new(zone.center_x(), zone.origin.y + zone.size.y / 2.0);
    if let Some(banner) = state.wave_banner {
        text(
            surface,
            middle,
            format!("WAVE {} CLEARED  +{}", banner.wave, banner.bonus),
            BANNER_TEXT_SIZE,
            palette.banner,
        );
    }
    match state.phase {
        GamePhase::Paused => {
            text(surface, middle, "PAUSED".into(), BANNER_TEXT_SIZE, palette.text)
        }
        GamePhase::GameOver => {
            text(surface, middle, "GAME OVER".into(), BANNER_TEXT_SIZE, palette.banner)
        }
        GamePhase::Playing => {}
    }
}

/// Frame-rate readout in the bottom-left corner (host-measured)
pub fn draw_fps<S: RenderSurface + ?Sized>(
    fps: u32,
    state: &GameState,
    settings: &Settings,
    surface: &mut S,
) {
    if !settings.show_fps {
        return;
    }
    let zone = state.safe_zone;
    text(
        surface,
        Vec2::new(zone.left() + 40.0, zone.bottom() - 10.0),
        format!("{fps} FPS"),
        HUD_TEXT_SIZE * 0.7,
        Palette::for_settings(settings).text,
    );
}
