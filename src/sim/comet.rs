//! Comets - neutral hazards falling through the play area

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collider};
use crate::SafeZone;
use crate::consts::*;
use crate::tuning::CometTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CometSize {
    Small,
    Medium,
    Large,
}

/// Per-size stats: (width, height, hp, fall speed, points)
struct SizeStats(f32, f32, u32, f32, u64);

impl CometSize {
    pub const ALL: [CometSize; 3] = [CometSize::Small, CometSize::Medium, CometSize::Large];

    fn stats(self) -> SizeStats {
        match self {
            CometSize::Small => SizeStats(30.0, 45.0, 1, 220.0, 10),
            CometSize::Medium => SizeStats(40.0, 60.0, 2, 190.0, 20),
            CometSize::Large => SizeStats(50.0, 75.0, 3, 180.0, 30),
        }
    }

    fn index(self) -> usize {
        match self {
            CometSize::Small => 0,
            CometSize::Medium => 1,
            CometSize::Large => 2,
        }
    }

    /// Chance that destroying this comet yields a rocket
    pub fn rocket_drop_chance(self, tuning: &CometTuning) -> f32 {
        tuning.rocket_drop_chances[self.index()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comet {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: CometSize,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub points: u64,
    pub active: bool,
}

impl Comet {
    pub fn new(pos: Vec2, kind: CometSize) -> Self {
        let SizeStats(w, h, hp, speed, points) = kind.stats();
        Self {
            pos,
            size: Vec2::new(w, h),
            kind,
            hp,
            max_hp: hp,
            speed,
            points,
            active: true,
        }
    }

    /// Fall, deactivating once well below the zone
    pub fn update(&mut self, dt: f32, zone: &SafeZone) {
        if !self.active {
            return;
        }
        self.pos.y += self.speed * dt;
        if self.pos.y > zone.bottom() + COMET_DESPAWN_MARGIN {
            self.active = false;
        }
    }

    /// Returns true when this hit destroys the comet
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

impl Collider for Comet {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Pick an index with probability proportional to its weight
pub fn weighted_pick<R: Rng>(rng: &mut R, weights: &[u32]) -> usize {
    // u64 total cannot overflow on u32 weights
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return 0;
    }
    let mut roll = rng.random_range(0..total);
    for (i, &w) in weights.iter().enumerate() {
        let w = u64::from(w);
        if roll < w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

/// Independent comet timer: one comet per randomized interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CometSpawner {
    pub timer: f32,
    pub next_spawn: f32,
}

impl CometSpawner {
    pub fn new<R: Rng>(rng: &mut R, tuning: &CometTuning) -> Self {
        Self {
            timer: 0.0,
            next_spawn: Self::roll_interval(rng, tuning),
        }
    }

    fn roll_interval<R: Rng>(rng: &mut R, tuning: &CometTuning) -> f32 {
        let span = (tuning.max_interval - tuning.min_interval).max(0.0);
        tuning.min_interval + rng.random::<f32>() * span
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R, tuning: &CometTuning) {
        *self = Self::new(rng, tuning);
    }

    /// Advance the timer; returns a fresh comet when it fires
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        tuning: &CometTuning,
        zone: &SafeZone,
    ) -> Option<Comet> {
        self.timer += dt;
        if self.timer < self.next_spawn {
            return None;
        }
        self.timer = 0.0;
        self.next_spawn = Self::roll_interval(rng, tuning);

        let kind = CometSize::ALL[weighted_pick(rng, &tuning.weights)];
        let x = zone.left() + rng.random::<f32>() * (zone.size.x - COMET_SPAWN_X_MARGIN);
        let y = zone.top() - COMET_SPAWN_HEIGHT;
        Some(Comet::new(Vec2::new(x, y), kind))
    }
}
