//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked from
//! JSON without touching simulation code. Missing fields fall back to the
//! shipped defaults.

use serde::{Deserialize, Serialize};

/// How the per-frame enemy fire chance is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireRateModel {
    /// One Bernoulli trial per tick with the raw chance (frame-rate dependent)
    PerTick,
    /// Chance rescaled by `1 - (1 - p)^(dt * REFERENCE_FPS)`
    #[default]
    TimeScaled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatTuning {
    pub max_heat: f32,
    pub heat_per_shot: f32,
    pub cooling_rate: f32,
    pub cooldown_threshold: f32,
}

impl Default for HeatTuning {
    fn default() -> Self {
        Self {
            max_heat: 100.0,
            heat_per_shot: 5.0,
            cooling_rate: 20.0,
            cooldown_threshold: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyFireTuning {
    /// Per reference frame
    pub regular_chance: f32,
    pub boss_chance: f32,
    /// Extra aggression on the very first wave
    pub first_wave_multiplier: f32,
    /// Added per wave after the first
    pub per_wave_increase: f32,
    pub model: FireRateModel,
}

impl Default for EnemyFireTuning {
    fn default() -> Self {
        Self {
            regular_chance: 0.0012,
            boss_chance: 0.003,
            first_wave_multiplier: 1.5,
            per_wave_increase: 0.15,
            model: FireRateModel::TimeScaled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub base_drop_chance: f32,
    pub drop_chance_per_tier: f32,
    /// Weights for life, shield, autofire, tripleshot, rocket
    pub weights: [u32; 5],
    pub autofire_duration: f32,
    pub autofire_interval: f32,
    pub triple_shot_duration: f32,
    pub shield_duration: f32,
    pub max_lives: u8,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            base_drop_chance: 0.08,
            drop_chance_per_tier: 0.03,
            weights: [5, 20, 15, 12, 3],
            autofire_duration: 4.0,
            autofire_interval: 0.15,
            triple_shot_duration: 5.0,
            shield_duration: 5.0,
            max_lives: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CometTuning {
    pub min_interval: f32,
    pub max_interval: f32,
    /// Weights for small, medium, large
    pub weights: [u32; 3],
    /// Rocket-ammo drop chance for small, medium, large
    pub rocket_drop_chances: [f32; 3],
}

impl Default for CometTuning {
    fn default() -> Self {
        Self {
            min_interval: 3.0,
            max_interval: 6.0,
            weights: [50, 35, 15],
            rocket_drop_chances: [0.05, 0.075, 0.10],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// How long the "wave complete" banner stays up
    pub bonus_display: f32,
    /// Delay between a wave clear and the next formation spawning
    pub spawn_delay: f32,
    pub bonus_per_wave: u64,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            bonus_display: 2.0,
            spawn_delay: 1.0,
            bonus_per_wave: 50,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub heat: HeatTuning,
    pub enemy_fire: EnemyFireTuning,
    pub powerups: PowerUpTuning,
    pub comets: CometTuning,
    pub waves: WaveTuning,
}

impl Tuning {
    /// Parse tuning overrides, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Tuning with every random source switched off (scripted sessions, tests)
    pub fn quiet() -> Self {
        let mut tuning = Self::default();
        tuning.enemy_fire.regular_chance = 0.0;
        tuning.enemy_fire.boss_chance = 0.0;
        tuning.powerups.base_drop_chance = 0.0;
        tuning.powerups.drop_chance_per_tier = 0.0;
        tuning.comets.min_interval = f32::MAX;
        tuning.comets.max_interval = f32::MAX;
        tuning.comets.rocket_drop_chances = [0.0; 3];
        tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "heat": { "max_heat": 60.0 } }"#);
        assert_eq!(tuning.heat.max_heat, 60.0);
        assert_eq!(tuning.heat.heat_per_shot, 5.0);
        assert_eq!(tuning.powerups.weights, [5, 20, 15, 12, 3]);
    }

    #[test]
    fn test_fire_model_parses_snake_case() {
        let tuning = Tuning::from_json(r#"{ "enemy_fire": { "model": "per_tick" } }"#);
        assert_eq!(tuning.enemy_fire.model, FireRateModel::PerTick);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let tuning = Tuning::from_json("{ not json");
        assert_eq!(tuning.comets.weights, [50, 35, 15]);
    }
}
