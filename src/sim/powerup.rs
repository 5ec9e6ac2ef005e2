//! Power-ups dropped by defeated enemies
//!
//! A power-up is plain data tagged with its kind; the effect applied on
//! pickup is looked up from a table keyed by that kind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collider};
use super::comet::weighted_pick;
use crate::SafeZone;
use crate::consts::*;
use crate::tuning::PowerUpTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Life,
    Shield,
    AutoFire,
    TripleShot,
    Rocket,
}

impl PowerUpKind {
    /// Same order as `PowerUpTuning::weights`
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Life,
        PowerUpKind::Shield,
        PowerUpKind::AutoFire,
        PowerUpKind::TripleShot,
        PowerUpKind::Rocket,
    ];

    pub fn index(self) -> usize {
        match self {
            PowerUpKind::Life => 0,
            PowerUpKind::Shield => 1,
            PowerUpKind::AutoFire => 2,
            PowerUpKind::TripleShot => 3,
            PowerUpKind::Rocket => 4,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PowerUpKind::Life => '+',
            PowerUpKind::Shield => 'S',
            PowerUpKind::AutoFire => 'A',
            PowerUpKind::TripleShot => '3',
            PowerUpKind::Rocket => 'R',
        }
    }
}

/// Timed weapon modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedEffect {
    AutoFire,
    TripleShot,
}

/// What a pickup does to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// +1 life, up to the cap
    ExtraLife { cap: u8 },
    Shield { duration: f32 },
    Timed { effect: TimedEffect, duration: f32 },
    RocketAmmo,
}

/// Effect lookup keyed by kind
pub fn effect_for(kind: PowerUpKind, tuning: &PowerUpTuning) -> Effect {
    match kind {
        PowerUpKind::Life => Effect::ExtraLife {
            cap: tuning.max_lives,
        },
        PowerUpKind::Shield => Effect::Shield {
            duration: tuning.shield_duration,
        },
        PowerUpKind::AutoFire => Effect::Timed {
            effect: TimedEffect::AutoFire,
            duration: tuning.autofire_duration,
        },
        PowerUpKind::TripleShot => Effect::Timed {
            effect: TimedEffect::TripleShot,
            duration: tuning.triple_shot_duration,
        },
        PowerUpKind::Rocket => Effect::RocketAmmo,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
    pub active: bool,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            size: Vec2::splat(POWERUP_SIZE),
            kind,
            speed: POWERUP_FALL_SPEED,
            active: true,
            collected: false,
        }
    }

    pub fn update(&mut self, dt: f32, zone: &SafeZone) {
        if !self.active {
            return;
        }
        self.pos.y += self.speed * dt;
        if self.pos.y > zone.bottom() {
            self.active = false;
        }
    }

    /// Mark picked up and hand back the effect to apply (once)
    pub fn collect(&mut self, tuning: &PowerUpTuning) -> Option<Effect> {
        if !self.active || self.collected {
            return None;
        }
        self.collected = true;
        self.active = false;
        Some(effect_for(self.kind, tuning))
    }
}

impl Collider for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Drop chance after a kill at this tier
pub fn drop_chance(tier: u32, tuning: &PowerUpTuning) -> f32 {
    tuning.base_drop_chance + tier as f32 * tuning.drop_chance_per_tier
}

/// Roll for a drop after a kill at `at`
pub fn roll_drop<R: Rng>(
    rng: &mut R,
    at: Vec2,
    tier: u32,
    tuning: &PowerUpTuning,
) -> Option<PowerUp> {
    if rng.random::<f32>() >= drop_chance(tier, tuning) {
        return None;
    }
    let kind = PowerUpKind::ALL[weighted_pick(rng, &tuning.weights)];
    Some(PowerUp::new(at, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_effect_table() {
        let tuning = PowerUpTuning::default();
        assert_eq!(
            effect_for(PowerUpKind::Life, &tuning),
            Effect::ExtraLife { cap: 3 }
        );
        assert_eq!(
            effect_for(PowerUpKind::AutoFire, &tuning),
            Effect::Timed {
                effect: TimedEffect::AutoFire,
                duration: 4.0
            }
        );
        assert_eq!(effect_for(PowerUpKind::Rocket, &tuning), Effect::RocketAmmo);
    }

    #[test]
    fn test_collect_is_one_shot() {
        let tuning = PowerUpTuning::default();
        let mut p = PowerUp::new(Vec2::ZERO, PowerUpKind::Shield);
        assert!(p.collect(&tuning).is_some());
        assert!(p.collect(&tuning).is_none());
        assert!(!p.active);
    }

    #[test]
    fn test_drop_chance_scales_with_tier() {
        let tuning = PowerUpTuning::default();
        assert!((drop_chance(0, &tuning) - 0.08).abs() < 1e-6);
        assert!((drop_chance(2, &tuning) - 0.14).abs() < 1e-6);
    }

    #[test]
    fn test_guaranteed_drop() {
        let mut tuning = PowerUpTuning::default();
        tuning.base_drop_chance = 1.0;
        tuning.weights = [0, 0, 0, 0, 1];
        let mut rng = Pcg32::seed_from_u64(11);
        let drop = roll_drop(&mut rng, Vec2::new(10.0, 20.0), 0, &tuning);
        assert_eq!(drop.map(|p| p.kind), Some(PowerUpKind::Rocket));
    }

    #[test]
    fn test_falls_off_screen() {
        let zone = SafeZone::default();
        let mut p = PowerUp::new(Vec2::new(0.0, 590.0), PowerUpKind::Life);
        p.update(0.2, &zone);
        assert!(!p.active);
        assert!(!p.collected);
    }
}
