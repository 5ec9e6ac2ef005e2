//! The player's ship

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collider};
use super::heat::WeaponHeat;
use crate::SafeZone;
use crate::consts::*;
use crate::tuning::HeatTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub shield_active: bool,
    /// Seconds of invulnerability left
    pub shield_timer: f32,
    pub heat: WeaponHeat,
}

impl Player {
    /// Spawn at the bottom center of the safe zone
    pub fn new(zone: &SafeZone, heat: &HeatTuning) -> Self {
        Self {
            pos: Vec2::new(
                zone.center_x() - PLAYER_SIZE / 2.0,
                zone.bottom() - PLAYER_BOTTOM_OFFSET,
            ),
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            shield_active: false,
            shield_timer: 0.0,
            heat: WeaponHeat::new(heat),
        }
    }

    pub fn activate_shield(&mut self, duration: f32) {
        self.shield_active = true;
        self.shield_timer = duration;
    }

    fn update_shield(&mut self, dt: f32) {
        if self.shield_active {
            self.shield_timer -= dt;
            if self.shield_timer <= 0.0 {
                self.shield_active = false;
                self.shield_timer = 0.0;
            }
        }
    }

    /// Advance timers and steer inside the safe zone
    pub fn update(&mut self, dt: f32, moving_left: bool, moving_right: bool, zone: &SafeZone) {
        self.update_shield(dt);
        self.heat.tick(dt);

        let left_bound = zone.left();
        let right_bound = zone.right() - self.size.x;
        if moving_left && self.pos.x > left_bound {
            self.pos.x -= self.speed * dt;
        }
        if moving_right && self.pos.x < right_bound {
            self.pos.x += self.speed * dt;
        }
        self.pos.x = self.pos.x.clamp(left_bound, right_bound);
    }

    pub fn is_invulnerable(&self, god_mode: bool) -> bool {
        self.shield_active || god_mode
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Where lasers leave the ship
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Respawned ship: same position, fresh weapon, shield up
    pub fn respawned(&self, zone: &SafeZone, heat: &HeatTuning, shield: f32) -> Self {
        let mut next = Self::new(zone, heat);
        next.pos = self.pos;
        next.activate_shield(shield);
        next
    }
}

impl Collider for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}
