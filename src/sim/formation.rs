//! Shared formation movement
//!
//! The whole formation drifts sideways together. When its outer edge touches
//! a zone wall, the direction flips and every landed enemy steps down once,
//! all in the same tick.

use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use crate::SafeZone;
use crate::consts::{ENEMY_COLUMN_SPACING, FORMATION_DESCENT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// +1 right, -1 left
    pub direction: f32,
    /// All enemies have landed; drift and fire are enabled
    pub ready: bool,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            direction: 1.0,
            ready: false,
        }
    }
}

/// What a formation step did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormationOutcome {
    pub became_ready: bool,
    pub flipped: bool,
    /// An active landed enemy, dying or not, touched the zone bottom
    pub reached_bottom: bool,
}

impl Formation {
    /// Fresh formation for a new wave
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run after enemies have moved for this tick
    pub fn update(&mut self, enemies: &mut [Enemy], zone: &SafeZone) -> FormationOutcome {
        let mut outcome = FormationOutcome::default();

        if !self.ready {
            let any_active = enemies.iter().any(|e| e.active);
            let any_flying = enemies.iter().any(|e| e.active && e.is_flying);
            if any_active && !any_flying {
                self.ready = true;
                outcome.became_ready = true;
                log::debug!("Formation ready ({} enemies)", enemies.len());
            }
            // Drift starts next tick
            return outcome;
        }

        let mut left = f32::INFINITY;
        let mut right = f32::NEG_INFINITY;
        for e in enemies.iter().filter(|e| e.in_formation() && !e.is_flying) {
            left = left.min(e.pos.x);
            right = right.max(e.pos.x + e.size.x);
        }
        if !left.is_finite() {
            return outcome;
        }

        let hit_wall = (self.direction > 0.0 && right >= zone.right())
            || (self.direction < 0.0 && left <= zone.left());
        if hit_wall {
            self.direction = -self.direction;
            for e in enemies.iter_mut().filter(|e| e.active && !e.is_flying) {
                e.pos.y += FORMATION_DESCENT;
            }
            outcome.flipped = true;
        }

        outcome.reached_bottom = enemies
            .iter()
            .any(|e| e.active && !e.is_flying && e.pos.y + e.size.y >= zone.bottom());
        outcome
    }
}

/// True when no living enemy sits below `index` in roughly the same column
pub fn column_clear(enemies: &[Enemy], index: usize) -> bool {
    let Some(shooter) = enemies.get(index) else {
        return false;
    };
    !enemies.iter().enumerate().any(|(i, other)| {
        i != index
            && other.in_formation()
            && other.pos.y > shooter.pos.y
            && (other.pos.x - shooter.pos.x).abs() < ENEMY_COLUMN_SPACING
    })
}
