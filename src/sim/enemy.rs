//! Formation enemies and bosses
//!
//! Lifecycle: fly in from above the safe zone to a landing row, drift with
//! the shared formation, and on lethal damage play a fixed-length death
//! animation before going inactive. Bosses skip the animation.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collider};
use super::projectile::ProjectileInit;
use super::waves::{self, RowTemplate};
use crate::consts::*;
use crate::tuning::{EnemyFireTuning, FireRateModel};
use crate::{SafeZone, rotate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
    Boss,
}

/// Boss firing patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponType {
    /// One shot at the player's center
    #[default]
    Aimed,
    /// Aimed shot plus one on each side of it
    Triple,
    /// Single aimed shot; fires more often via the fire-rate multiplier
    Rapid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationState {
    Idle,
    Dying { frame: u32, frame_time: f32 },
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Landing row (y of the top edge)
    pub target_y: f32,
    pub kind: EnemyKind,
    pub row_index: usize,
    pub health: u32,
    pub max_health: u32,
    pub animation: AnimationState,
    pub is_flying: bool,
    pub fly_speed: f32,
    /// Horizontal formation speed
    pub speed: f32,
    pub weapon: WeaponType,
    pub fire_rate_multiplier: f32,
    pub active: bool,
}

impl Enemy {
    /// Place an enemy in its final column, above the zone, ready to fly in
    pub fn spawn(
        zone: &SafeZone,
        row: &RowTemplate,
        row_index: usize,
        column: usize,
        wave: u32,
    ) -> Self {
        let x = column as f32 * ENEMY_COLUMN_SPACING + row.start_x;
        let y = row_index as f32 * ENEMY_ROW_SPACING + ENEMY_FIRST_ROW_Y;
        let side = match row.kind {
            EnemyKind::Boss => BOSS_SIZE,
            EnemyKind::Basic => ENEMY_SIZE,
        };
        let health = waves::enemy_health(row.kind, wave);

        Self {
            pos: Vec2::new(
                zone.left() + x,
                zone.top() - ENEMY_SPAWN_OFFSET - row_index as f32 * ENEMY_SPAWN_ROW_STAGGER,
            ),
            size: Vec2::splat(side),
            target_y: zone.top() + y,
            kind: row.kind,
            row_index,
            health,
            max_health: health,
            animation: AnimationState::Idle,
            is_flying: true,
            fly_speed: ENEMY_FLY_SPEED,
            speed: ENEMY_BASE_SPEED * waves::speed_multiplier(wave),
            weapon: row.weapon.unwrap_or_default(),
            fire_rate_multiplier: row.fire_rate_multiplier,
            active: true,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.animation, AnimationState::Dying { .. })
    }

    pub fn is_dead(&self) -> bool {
        !self.active || self.animation == AnimationState::Dead
    }

    /// Alive, landed, and not in its death animation
    pub fn is_hittable(&self) -> bool {
        self.active && !self.is_flying && !self.is_dying()
    }

    /// Member of the formation for boundary checks
    pub fn in_formation(&self) -> bool {
        self.active && !self.is_dying()
    }

    /// Advance the death animation, fly-in, or formation drift
    pub fn update(&mut self, dt: f32, formation_ready: bool, direction: f32) {
        if !self.active {
            return;
        }

        if let AnimationState::Dying { frame, frame_time } = self.animation {
            let mut frame = frame;
            let mut frame_time = frame_time + dt;
            if frame_time >= DEATH_FRAME_DURATION {
                frame_time = 0.0;
                frame += 1;
            }
            if frame >= DEATH_FRAMES {
                self.animation = AnimationState::Dead;
                self.active = false;
            } else {
                self.animation = AnimationState::Dying { frame, frame_time };
            }

            // Keep drifting with the formation while the animation plays
            if formation_ready {
                self.pos.x += self.speed * direction * dt;
            }
            return;
        }

        if self.is_flying {
            let remaining = self.target_y - self.pos.y;
            if remaining > 0.0 {
                let step = self.fly_speed * dt;
                if step >= remaining {
                    self.pos.y = self.target_y;
                } else {
                    self.pos.y += step;
                }
            } else {
                self.is_flying = false;
            }
            return;
        }

        if formation_ready {
            self.pos.x += self.speed * direction * dt;
        }
    }

    /// Per-tick probability of this enemy firing
    pub fn fire_chance(&self, wave: u32, tuning: &EnemyFireTuning, dt: f32) -> f32 {
        let mut base = if self.is_boss() {
            tuning.boss_chance
        } else {
            tuning.regular_chance
        };
        if wave == 1 {
            base *= tuning.first_wave_multiplier;
        }
        let wave_multiplier = 1.0 + wave.saturating_sub(1) as f32 * tuning.per_wave_increase;
        let p = (base * wave_multiplier * self.fire_rate_multiplier).clamp(0.0, 1.0);

        match tuning.model {
            FireRateModel::PerTick => p,
            FireRateModel::TimeScaled => 1.0 - (1.0 - p).powf(dt * REFERENCE_FPS),
        }
    }

    /// Roll the fire trial. Only landed, living enemies in a ready formation fire.
    pub fn roll_fire<R: Rng>(
        &self,
        rng: &mut R,
        formation_ready: bool,
        wave: u32,
        tuning: &EnemyFireTuning,
        dt: f32,
    ) -> bool {
        if !self.active || self.is_flying || self.is_dying() || !formation_ready {
            return false;
        }
        let chance = self.fire_chance(wave, tuning, dt);
        chance > 0.0 && rng.random::<f32>() < chance
    }

    /// Shots produced by one trigger pull
    pub fn shots(&self, player_center: Vec2) -> Vec<ProjectileInit> {
        let muzzle = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y);
        if !self.is_boss() {
            return vec![ProjectileInit::down(muzzle)];
        }

        let to_player = player_center - muzzle;
        if to_player.length_squared() == 0.0 {
            return Vec::new();
        }
        let dir = to_player.normalize();

        match self.weapon {
            WeaponType::Triple => vec![
                ProjectileInit::aimed(muzzle, dir),
                ProjectileInit::aimed(muzzle, rotate(dir, -BOSS_SPREAD_ANGLE)),
                ProjectileInit::aimed(muzzle, rotate(dir, BOSS_SPREAD_ANGLE)),
            ],
            WeaponType::Rapid | WeaponType::Aimed => vec![ProjectileInit::aimed(muzzle, dir)],
        }
    }

    /// Take one point of damage. Returns true if this hit was lethal.
    pub fn take_damage(&mut self) -> bool {
        if !self.active || self.health == 0 {
            return false;
        }
        self.health -= 1;
        if self.health > 0 {
            return false;
        }
        match self.kind {
            EnemyKind::Boss => {
                self.active = false;
                self.animation = AnimationState::Dead;
            }
            EnemyKind::Basic => {
                self.animation = AnimationState::Dying {
                    frame: 0,
                    frame_time: 0.0,
                };
            }
        }
        true
    }

    /// Drop health to zero in one go (rocket blast)
    pub fn kill(&mut self) -> bool {
        if !self.active || self.is_dying() {
            return false;
        }
        self.health = 1;
        self.take_damage()
    }
}

impl Collider for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::waves::RowTemplate;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn basic_row() -> RowTemplate {
        RowTemplate::basic(3, 60.0)
    }

    fn landed(wave: u32) -> Enemy {
        let mut enemy = Enemy::spawn(&SafeZone::default(), &basic_row(), 0, 0, wave);
        enemy.pos.y = enemy.target_y;
        enemy.is_flying = false;
        enemy
    }

    #[test]
    fn test_spawn_above_zone_in_final_column() {
        let enemy = Enemy::spawn(&SafeZone::default(), &basic_row(), 2, 1, 1);
        assert_eq!(enemy.pos.x, 120.0);
        assert_eq!(enemy.pos.y, -200.0 - 110.0);
        assert_eq!(enemy.target_y, 180.0);
        assert!(enemy.is_flying);
        assert!(!enemy.is_hittable());
    }

    #[test]
    fn test_fly_in_lands_on_target() {
        let mut enemy = Enemy::spawn(&SafeZone::default(), &basic_row(), 0, 0, 1);
        for _ in 0..200 {
            enemy.update(1.0 / 60.0, false, 1.0);
        }
        assert_eq!(enemy.pos.y, enemy.target_y);
        assert!(!enemy.is_flying);
    }

    #[test]
    fn test_waits_for_formation() {
        let mut enemy = landed(1);
        let x = enemy.pos.x;
        enemy.update(0.5, false, 1.0);
        assert_eq!(enemy.pos.x, x);
        enemy.update(0.5, true, 1.0);
        assert_eq!(enemy.pos.x, x + 30.0);
    }

    #[test]
    fn test_death_animation_runs_eight_frames() {
        let mut enemy = landed(1);
        assert!(enemy.take_damage());
        assert!(enemy.is_dying());
        assert!(!enemy.is_hittable());

        let mut ticks = 0;
        while enemy.active {
            enemy.update(DEATH_FRAME_DURATION, true, 1.0);
            ticks += 1;
            assert!(ticks <= DEATH_FRAMES);
        }
        assert_eq!(ticks, DEATH_FRAMES);
        assert_eq!(enemy.animation, AnimationState::Dead);
        assert!(enemy.is_dead());
    }

    #[test]
    fn test_boss_skips_death_animation() {
        let row = RowTemplate::boss(560.0, WeaponType::Triple, 1.2);
        let mut boss = Enemy::spawn(&SafeZone::default(), &row, 0, 0, 1);
        assert_eq!(boss.health, 5);
        for _ in 0..4 {
            assert!(!boss.take_damage());
        }
        assert!(boss.take_damage());
        assert!(!boss.active);
        assert!(!boss.is_dying());
    }

    #[test]
    fn test_health_never_underflows() {
        let mut enemy = landed(1);
        assert!(enemy.take_damage());
        assert!(!enemy.take_damage());
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_triple_shot_spread() {
        let row = RowTemplate::boss(560.0, WeaponType::Triple, 1.2);
        let mut boss = Enemy::spawn(&SafeZone::default(), &row, 0, 0, 1);
        boss.pos = Vec2::new(560.0, 80.0);
        let shots = boss.shots(Vec2::new(600.0, 555.0));
        assert_eq!(shots.len(), 3);
        let center = match shots[0].heading {
            crate::sim::projectile::Heading::Aimed(d) => d,
            _ => Vec2::ZERO,
        };
        assert!((center - Vec2::Y).length() < 1e-5);
        for side in &shots[1..] {
            if let crate::sim::projectile::Heading::Aimed(d) = side.heading {
                assert!((d.angle_to(center).abs() - BOSS_SPREAD_ANGLE).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_regular_shot_goes_straight_down() {
        let enemy = landed(1);
        let shots = enemy.shots(Vec2::new(0.0, 0.0));
        assert_eq!(shots.len(), 1);
        assert_eq!(
            shots[0].heading,
            crate::sim::projectile::Heading::Vertical(1.0)
        );
        assert_eq!(shots[0].pos, Vec2::new(85.0, enemy.target_y + ENEMY_SIZE));
    }

    #[test]
    fn test_fire_chance_scaling() {
        let mut tuning = EnemyFireTuning::default();
        tuning.model = FireRateModel::PerTick;
        let enemy = landed(1);
        // Wave 1: 0.0012 * 1.5
        assert!((enemy.fire_chance(1, &tuning, 1.0 / 60.0) - 0.0018).abs() < 1e-7);
        // Wave 5: 0.0012 * (1 + 4 * 0.15)
        assert!((enemy.fire_chance(5, &tuning, 1.0 / 60.0) - 0.00192).abs() < 1e-7);

        tuning.model = FireRateModel::TimeScaled;
        let at_reference = enemy.fire_chance(5, &tuning, 1.0 / REFERENCE_FPS);
        assert!((at_reference - 0.00192).abs() < 1e-6);
        assert!(enemy.fire_chance(5, &tuning, 2.0 / REFERENCE_FPS) > at_reference);
    }

    #[test]
    fn test_flying_enemy_never_fires() {
        let mut tuning = EnemyFireTuning::default();
        tuning.regular_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(1);
        let enemy = Enemy::spawn(&SafeZone::default(), &basic_row(), 0, 0, 1);
        assert!(!enemy.roll_fire(&mut rng, true, 1, &tuning, 1.0 / 60.0));
        let landed = landed(1);
        assert!(landed.roll_fire(&mut rng, true, 1, &tuning, 1.0 / 60.0));
        assert!(!landed.roll_fire(&mut rng, false, 1, &tuning, 1.0 / 60.0));
    }
}
