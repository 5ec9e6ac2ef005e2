//! Weapon heat limiter
//!
//! Each shot adds heat; heat bleeds off over time. Hitting the cap locks
//! the weapon until heat falls back to the cooldown threshold, which sits
//! below the cap so the lock can't flicker on and off at the boundary.

use serde::{Deserialize, Serialize};

use crate::tuning::HeatTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponHeat {
    pub current: f32,
    pub overheated: bool,
    pub max: f32,
    pub per_shot: f32,
    /// Heat removed per second
    pub cooling_rate: f32,
    /// Overheat clears once heat is at or below this
    pub cooldown_threshold: f32,
}

impl Default for WeaponHeat {
    fn default() -> Self {
        Self::new(&HeatTuning::default())
    }
}

impl WeaponHeat {
    pub fn new(tuning: &HeatTuning) -> Self {
        Self {
            current: 0.0,
            overheated: false,
            max: tuning.max_heat,
            per_shot: tuning.heat_per_shot,
            cooling_rate: tuning.cooling_rate,
            cooldown_threshold: tuning.cooldown_threshold,
        }
    }

    pub fn can_fire(&self) -> bool {
        !self.overheated
    }

    /// Register a shot. Returns false (and adds nothing) while locked out.
    /// The shot that pushes heat over the cap still fires.
    pub fn fire(&mut self) -> bool {
        if self.overheated {
            return false;
        }
        self.current += self.per_shot;
        if self.current >= self.max {
            self.current = self.max;
            self.overheated = true;
        }
        true
    }

    pub fn tick(&mut self, dt: f32) {
        self.current = (self.current - self.cooling_rate * dt).max(0.0);
        if self.overheated && self.current <= self.cooldown_threshold {
            self.overheated = false;
        }
    }

    /// Heat as a 0..=1 fraction (for the HUD bar)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.overheated = false;
    }
}
