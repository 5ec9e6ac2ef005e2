//! Lasers and rockets
//!
//! Both live in pools owned by the game state. A laser flies straight up or
//! down, or along an aimed direction for boss shots. Rockets only fly
//! straight and carry a splash radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collider};
use super::pool::Poolable;
use crate::SafeZone;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// How a laser travels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Heading {
    /// Straight along y: -1 up, +1 down
    Vertical(f32),
    /// Unit direction (aimed boss shots)
    Aimed(Vec2),
}

impl Heading {
    fn velocity(&self, speed: f32) -> Vec2 {
        match *self {
            Heading::Vertical(dir) => Vec2::new(0.0, speed * dir),
            Heading::Aimed(dir) => dir * speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Center point
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub heading: Heading,
    pub owner: Owner,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileInit {
    pub pos: Vec2,
    pub heading: Heading,
    pub owner: Owner,
}

impl ProjectileInit {
    pub fn up(pos: Vec2) -> Self {
        Self {
            pos,
            heading: Heading::Vertical(-1.0),
            owner: Owner::Player,
        }
    }

    pub fn down(pos: Vec2) -> Self {
        Self {
            pos,
            heading: Heading::Vertical(1.0),
            owner: Owner::Enemy,
        }
    }

    pub fn aimed(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            heading: Heading::Aimed(dir),
            owner: Owner::Enemy,
        }
    }
}

impl Poolable for Projectile {
    type Init = ProjectileInit;

    fn idle() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
            heading: Heading::Vertical(1.0),
            owner: Owner::Player,
            active: false,
        }
    }

    fn reinit(&mut self, init: ProjectileInit) {
        self.pos = init.pos;
        self.heading = init.heading;
        self.owner = init.owner;
        self.active = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Projectile {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.heading.velocity(self.speed) * dt;
    }

    pub fn is_out_of_bounds(&self, zone: &SafeZone) -> bool {
        self.pos.y < zone.top() - PROJECTILE_BOUNDS_MARGIN
            || self.pos.y > zone.bottom() + PROJECTILE_BOUNDS_MARGIN
    }
}

impl Collider for Projectile {
    fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    /// Center point
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// -1 up, +1 down
    pub direction: f32,
    pub explosion_radius: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RocketInit {
    pub pos: Vec2,
    pub direction: f32,
}

impl Poolable for Rocket {
    type Init = RocketInit;

    fn idle() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(ROCKET_WIDTH, ROCKET_HEIGHT),
            speed: ROCKET_SPEED,
            direction: -1.0,
            explosion_radius: ROCKET_EXPLOSION_RADIUS,
            active: false,
        }
    }

    fn reinit(&mut self, init: RocketInit) {
        self.pos = init.pos;
        self.direction = init.direction;
        self.active = true;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Rocket {
    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.speed * self.direction * dt;
    }

    pub fn is_out_of_bounds(&self, zone: &SafeZone) -> bool {
        self.pos.y < zone.top() - ROCKET_BOUNDS_MARGIN
            || self.pos.y > zone.bottom() + ROCKET_BOUNDS_MARGIN
    }
}

impl Collider for Rocket {
    fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, self.size)
    }
}
