//! Wave templates and difficulty curves
//!
//! Pattern selection is a pure function of the wave number: a fixed
//! ten-entry rotation of named formations, two of them with a boss.

use serde::{Deserialize, Serialize};

use super::enemy::{EnemyKind, WeaponType};
use crate::consts::{MAX_SPEED_MULTIPLIER, SPEED_STEP_PER_WAVE};

/// One row of a formation template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowTemplate {
    pub kind: EnemyKind,
    pub count: usize,
    /// Left edge of the first column, relative to the safe zone
    pub start_x: f32,
    /// Boss weapon (regular enemies ignore it)
    pub weapon: Option<WeaponType>,
    pub fire_rate_multiplier: f32,
}

impl RowTemplate {
    pub const fn basic(count: usize, start_x: f32) -> Self {
        Self {
            kind: EnemyKind::Basic,
            count,
            start_x,
            weapon: None,
            fire_rate_multiplier: 1.0,
        }
    }

    pub const fn boss(start_x: f32, weapon: WeaponType, fire_rate_multiplier: f32) -> Self {
        Self {
            kind: EnemyKind::Boss,
            count: 1,
            start_x,
            weapon: Some(weapon),
            fire_rate_multiplier,
        }
    }
}

/// Named formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Basic,
    VFormation,
    Arrow,
    Walls,
    Cross,
    DiamondBoss,
    Fortress,
}

impl Pattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Basic => "basic",
            Pattern::VFormation => "vformation",
            Pattern::Arrow => "arrow",
            Pattern::Walls => "walls",
            Pattern::Cross => "cross",
            Pattern::DiamondBoss => "diamondBoss",
            Pattern::Fortress => "fortress",
        }
    }

    pub fn rows(&self) -> Vec<RowTemplate> {
        use RowTemplate as R;
        match self {
            Pattern::Basic => vec![R::basic(10, 60.0); 4],
            Pattern::VFormation => vec![
                R::basic(2, 60.0),
                R::basic(4, 120.0),
                R::basic(6, 180.0),
                R::basic(8, 120.0),
                R::basic(10, 60.0),
            ],
            Pattern::Arrow => vec![
                R::basic(10, 60.0),
                R::basic(8, 120.0),
                R::basic(6, 180.0),
                R::basic(4, 240.0),
                R::basic(2, 300.0),
            ],
            Pattern::Walls => (0..6)
                .map(|i| R::basic(4, if i % 2 == 0 { 60.0 } else { 660.0 }))
                .collect(),
            Pattern::Cross => vec![
                R::basic(2, 300.0),
                R::basic(2, 300.0),
                R::basic(10, 60.0),
                R::basic(2, 300.0),
                R::basic(2, 300.0),
            ],
            Pattern::DiamondBoss => vec![
                R::boss(560.0, WeaponType::Triple, 1.2),
                R::basic(3, 360.0),
                R::basic(6, 240.0),
                R::basic(10, 60.0),
                R::basic(8, 120.0),
                R::basic(4, 300.0),
            ],
            Pattern::Fortress => {
                let mut rows = vec![R::boss(560.0, WeaponType::Rapid, 2.5)];
                rows.extend(std::iter::repeat_n(R::basic(10, 60.0), 5));
                rows
            }
        }
    }
}

/// Rotation of formations, one per wave
pub const PATTERN_SEQUENCE: [Pattern; 10] = [
    Pattern::Basic,
    Pattern::VFormation,
    Pattern::Arrow,
    Pattern::Walls,
    Pattern::DiamondBoss,
    Pattern::Cross,
    Pattern::Basic,
    Pattern::VFormation,
    Pattern::Arrow,
    Pattern::Fortress,
];

/// Formation for a 1-based wave number
pub fn pattern_for_wave(wave: u32) -> Pattern {
    let index = (wave.max(1) - 1) as usize % PATTERN_SEQUENCE.len();
    PATTERN_SEQUENCE[index]
}

/// Difficulty bracket: every ten waves
#[inline]
pub fn tier(wave: u32) -> u32 {
    wave / 10
}

/// Formation speed multiplier, capped
pub fn speed_multiplier(wave: u32) -> f32 {
    (1.0 + wave.saturating_sub(1) as f32 * SPEED_STEP_PER_WAVE).min(MAX_SPEED_MULTIPLIER)
}

pub fn enemy_health(kind: EnemyKind, wave: u32) -> u32 {
    let base = tier(wave) + 1;
    match kind {
        EnemyKind::Basic => base,
        EnemyKind::Boss => 5 * base,
    }
}

pub fn kill_score(kind: EnemyKind, wave: u32) -> u64 {
    let base = 1 + (wave / 2) as u64;
    match kind {
        EnemyKind::Basic => base,
        EnemyKind::Boss => base * 10,
    }
}

pub fn wave_bonus(wave: u32, per_wave: u64) -> u64 {
    wave as u64 * per_wave
}
