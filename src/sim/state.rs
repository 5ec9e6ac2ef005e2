//! Game state and session bookkeeping
//!
//! `GameState` is the simulation context: it owns every entity collection,
//! the pools, the RNG and the cross-cutting counters (score, wave, lives).
//! Subsystems receive what they need from it by reference; nothing else
//! writes to score, wave or lives.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::comet::{Comet, CometSize, CometSpawner};
use super::enemy::{Enemy, EnemyKind};
use super::formation::Formation;
use super::grid::SpatialGrid;
use super::player::Player;
use super::pool::Pool;
use super::powerup::{self, Effect, PowerUp, PowerUpKind, TimedEffect};
use super::projectile::{Projectile, ProjectileInit, Rocket, RocketInit};
use super::schedule::{Schedule, ScheduledEvent};
use super::waves::{self, RowTemplate};
use crate::SafeZone;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    OutOfLives,
    /// A formation member reached the bottom of the safe zone
    FormationLanded,
}

/// Something that happened during a tick (drained by the host for audio/HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled {
        kind: EnemyKind,
        pos: Vec2,
        points: u64,
    },
    CometDestroyed {
        size: CometSize,
        pos: Vec2,
        points: u64,
        rocket_dropped: bool,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    PlayerHit {
        lives_left: u8,
    },
    RocketDetonated {
        pos: Vec2,
        enemies: usize,
        comets: usize,
    },
    WaveCleared {
        wave: u32,
        bonus: u64,
    },
    WaveSpawned {
        wave: u32,
        enemies: usize,
    },
    GameOver {
        reason: GameOverReason,
        score: u64,
        wave: u32,
    },
}

/// Weapon used for a trigger pull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Basic,
    Triple,
    AutoFire,
    Rocket,
}

/// Trigger pulls per weapon (a triple volley counts once)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotStats {
    pub basic: u64,
    pub triple: u64,
    pub autofire: u64,
    pub rocket: u64,
}

impl ShotStats {
    pub fn total(&self) -> u64 {
        self.basic + self.triple + self.autofire + self.rocket
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots: ShotStats,
    /// Indexed by `PowerUpKind::index`
    pub powerups_collected: [u32; 5],
    pub enemies_killed: u32,
    pub comets_destroyed: u32,
    /// Seconds of unpaused play
    pub elapsed: f64,
    pub used_god_mode: bool,
    pub used_wave_jump: bool,
}

impl SessionStats {
    pub fn record_shot(&mut self, weapon: Weapon) {
        match weapon {
            Weapon::Basic => self.shots.basic += 1,
            Weapon::Triple => self.shots.triple += 1,
            Weapon::AutoFire => self.shots.autofire += 1,
            Weapon::Rocket => self.shots.rocket += 1,
        }
    }

    pub fn used_cheats(&self) -> bool {
        self.used_god_mode || self.used_wave_jump
    }
}

/// End-of-session report handed to persistence/analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub wave: u32,
    pub enemies_killed: u32,
    pub comets_destroyed: u32,
    pub elapsed_secs: f64,
    pub total_shots: u64,
    pub shots_per_second: f64,
    pub shots: ShotStats,
    pub powerups_collected: [u32; 5],
    pub used_cheats: bool,
    pub reason: Option<GameOverReason>,
}

/// Remaining time on timed weapon modifiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub autofire: f32,
    pub triple_shot: f32,
    /// Countdown to the next autofire volley; zero fires on the next update
    pub autofire_timer: f32,
}

impl ActiveEffects {
    /// Picking up an effect that is already running restarts its timer
    pub fn start(&mut self, effect: TimedEffect, duration: f32) {
        match effect {
            TimedEffect::AutoFire => {
                self.autofire = duration;
                self.autofire_timer = 0.0;
            }
            TimedEffect::TripleShot => self.triple_shot = duration,
        }
    }

    pub fn autofire_active(&self) -> bool {
        self.autofire > 0.0
    }

    pub fn triple_shot_active(&self) -> bool {
        self.triple_shot > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.autofire = (self.autofire - dt).max(0.0);
        self.triple_shot = (self.triple_shot - dt).max(0.0);
    }
}

/// "Wave complete" banner contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveBanner {
    pub wave: u32,
    pub bonus: u64,
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Every random decision draws from this
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub safe_zone: SafeZone,
    pub phase: GamePhase,
    /// 1-based wave number
    pub wave: u32,
    pub lives: u8,
    pub score: u64,
    /// Simulation clock (seconds, advances only while playing)
    pub time: f64,
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub formation: Formation,
    pub player_projectiles: Pool<Projectile>,
    pub enemy_projectiles: Pool<Projectile>,
    pub rockets: Pool<Rocket>,
    pub comets: Vec<Comet>,
    pub comet_spawner: CometSpawner,
    pub powerups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub rocket_ammo: u32,
    pub god_mode: bool,
    pub wave_banner: Option<WaveBanner>,
    pub schedule: Schedule,
    pub stats: SessionStats,
    pub game_over_reason: Option<GameOverReason>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    /// Broad phase, rebuilt every tick
    pub(crate) grid: SpatialGrid,
}

impl GameState {
    /// Start a session at wave 1
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let safe_zone = SafeZone::default();
        let comet_spawner = CometSpawner::new(&mut rng, &tuning.comets);

        let mut state = Self {
            seed,
            rng,
            safe_zone,
            phase: GamePhase::Playing,
            wave: 1,
            lives: STARTING_LIVES,
            score: 0,
            time: 0.0,
            time_ticks: 0,
            player: Player::new(&safe_zone, &tuning.heat),
            enemies: Vec::new(),
            formation: Formation::default(),
            player_projectiles: Pool::new(PLAYER_PROJECTILE_POOL),
            enemy_projectiles: Pool::new(ENEMY_PROJECTILE_POOL),
            rockets: Pool::new(ROCKET_POOL),
            comets: Vec::new(),
            comet_spawner,
            powerups: Vec::new(),
            effects: ActiveEffects::default(),
            rocket_ammo: 0,
            god_mode: false,
            wave_banner: None,
            schedule: Schedule::new(),
            stats: SessionStats::default(),
            game_over_reason: None,
            events: Vec::new(),
            grid: SpatialGrid::new(GRID_CELL_SIZE),
            tuning,
        };

        log::info!("New session (seed {})", seed);
        state.spawn_wave();
        state
    }

    pub fn with_defaults(seed: u64) -> Self {
        Self::new(seed, Tuning::default())
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn tier(&self) -> u32 {
        waves::tier(self.wave)
    }

    /// Spawn the formation for the current wave
    pub fn spawn_wave(&mut self) {
        let pattern = waves::pattern_for_wave(self.wave);
        let rows = pattern.rows();
        self.spawn_rows(&rows);
        log::info!(
            "Wave {} spawned: {} ({} enemies)",
            self.wave,
            pattern.as_str(),
            self.enemies.len()
        );
    }

    /// Replace the formation with the given rows, scaled for the current wave
    pub fn spawn_rows(&mut self, rows: &[RowTemplate]) {
        self.enemies.clear();
        self.formation.reset();
        for (row_index, row) in rows.iter().enumerate() {
            for column in 0..row.count {
                self.enemies.push(Enemy::spawn(
                    &self.safe_zone,
                    row,
                    row_index,
                    column,
                    self.wave,
                ));
            }
        }
        self.events.push(GameEvent::WaveSpawned {
            wave: self.wave,
            enemies: self.enemies.len(),
        });
    }

    /// Fresh session: counters, timers and entities reset, pools emptied in place
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.wave = 1;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.time = 0.0;
        self.time_ticks = 0;
        self.player = Player::new(&self.safe_zone, &self.tuning.heat);
        self.enemies.clear();
        self.player_projectiles.release_all();
        self.enemy_projectiles.release_all();
        self.rockets.release_all();
        self.comets.clear();
        self.comet_spawner.reset(&mut self.rng, &self.tuning.comets);
        self.powerups.clear();
        self.effects = ActiveEffects::default();
        self.rocket_ammo = 0;
        self.god_mode = false;
        self.wave_banner = None;
        self.schedule.clear();
        self.stats = SessionStats::default();
        self.game_over_reason = None;
        self.events.clear();
        self.grid.clear();

        log::info!("Session restarted");
        self.spawn_wave();
    }

    /// Enter the terminal state (first call wins)
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score,
            wave: self.wave,
        });
        log::info!(
            "Game over ({:?}) - score {}, wave {}",
            reason,
            self.score,
            self.wave
        );
    }

    /// A lethal hit on a vulnerable player: lose a life, then respawn or end
    pub fn hit_player(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerHit {
            lives_left: self.lives,
        });
        log::debug!("Player hit, {} lives left", self.lives);

        if self.lives == 0 {
            self.end_game(GameOverReason::OutOfLives);
            return;
        }
        self.player = self.player.respawned(
            &self.safe_zone,
            &self.tuning.heat,
            self.tuning.powerups.shield_duration,
        );
        self.enemy_projectiles.release_all();
    }

    /// Pull the trigger once. Returns false if nothing was fired.
    pub fn fire_player_weapon(&mut self) -> bool {
        let muzzle = self.player.muzzle();

        if self.rocket_ammo > 0 {
            self.rockets.acquire(RocketInit {
                pos: muzzle,
                direction: -1.0,
            });
            self.rocket_ammo -= 1;
            self.stats.record_shot(Weapon::Rocket);
            return true;
        }

        if !self.player.heat.fire() {
            return false;
        }
        if self.effects.triple_shot_active() {
            for dx in [-TRIPLE_SHOT_OFFSET, 0.0, TRIPLE_SHOT_OFFSET] {
                self.player_projectiles
                    .acquire(ProjectileInit::up(muzzle + Vec2::new(dx, 0.0)));
            }
            self.stats.record_shot(Weapon::Triple);
        } else {
            self.player_projectiles.acquire(ProjectileInit::up(muzzle));
            self.stats.record_shot(Weapon::Basic);
        }
        true
    }

    /// Advance power-up timers and fire any due autofire volley
    pub(crate) fn update_effects(&mut self, dt: f32) {
        if self.effects.autofire_active() {
            self.effects.autofire_timer -= dt;
            if self.effects.autofire_timer <= 0.0 {
                self.effects.autofire_timer = self.tuning.powerups.autofire_interval;
                let p = &self.player;
                let y = p.pos.y;
                for x in [
                    p.pos.x + AUTOFIRE_WING_INSET,
                    p.pos.x + p.size.x - AUTOFIRE_WING_INSET,
                ] {
                    self.player_projectiles
                        .acquire(ProjectileInit::up(Vec2::new(x, y)));
                }
                self.stats.record_shot(Weapon::AutoFire);
            }
        }
        self.effects.tick(dt);
    }

    pub fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ExtraLife { cap } => {
                if self.lives < cap {
                    self.lives += 1;
                }
            }
            Effect::Shield { duration } => self.player.activate_shield(duration),
            Effect::Timed { effect, duration } => self.effects.start(effect, duration),
            Effect::RocketAmmo => self.rocket_ammo += 1,
        }
    }

    /// Collect a power-up by index and apply its effect
    pub(crate) fn collect_powerup(&mut self, index: usize) {
        let Some(powerup) = self.powerups.get_mut(index) else {
            return;
        };
        let kind = powerup.kind;
        let Some(effect) = powerup.collect(&self.tuning.powerups) else {
            return;
        };
        self.apply_effect(effect);
        self.stats.powerups_collected[kind.index()] += 1;
        self.events.push(GameEvent::PowerUpCollected { kind });
        log::debug!("Collected {:?}", kind);
    }

    /// Score and loot for an enemy that just took its lethal hit
    pub(crate) fn on_enemy_killed(&mut self, index: usize) {
        let Some(enemy) = self.enemies.get(index) else {
            return;
        };
        let kind = enemy.kind;
        let pos = enemy.pos;
        let drop_at = Vec2::new(enemy.pos.x + enemy.size.x / 2.0, enemy.pos.y);
        let points = waves::kill_score(kind, self.wave);

        self.score += points;
        self.stats.enemies_killed += 1;
        self.events.push(GameEvent::EnemyKilled { kind, pos, points });

        let tier = self.tier();
        if let Some(drop) = powerup::roll_drop(&mut self.rng, drop_at, tier, &self.tuning.powerups)
        {
            log::debug!("{:?} dropped at {:?}", drop.kind, drop_at);
            self.powerups.push(drop);
        }
    }

    /// Score and the rocket-ammo roll for a comet that was just destroyed
    pub(crate) fn on_comet_destroyed(&mut self, index: usize) {
        let Some(comet) = self.comets.get(index) else {
            return;
        };
        let size = comet.kind;
        let pos = comet.pos;
        let points = comet.points;

        self.score += points;
        self.stats.comets_destroyed += 1;

        let chance = size.rocket_drop_chance(&self.tuning.comets);
        let rocket_dropped = chance > 0.0 && self.rng.random::<f32>() < chance;
        if rocket_dropped {
            self.rocket_ammo += 1;
        }
        self.events.push(GameEvent::CometDestroyed {
            size,
            pos,
            points,
            rocket_dropped,
        });
    }

    /// Rocket detonation: every living enemy and every comet on screen dies
    pub fn destroy_all(&mut self, at: Vec2) {
        let mut enemies = 0;
        for i in 0..self.enemies.len() {
            if self.enemies[i].kill() {
                self.on_enemy_killed(i);
                enemies += 1;
            }
        }

        let mut comets = 0;
        for i in 0..self.comets.len() {
            let hp = self.comets[i].hp;
            if self.comets[i].take_damage(hp) {
                self.on_comet_destroyed(i);
                comets += 1;
            }
        }

        self.events.push(GameEvent::RocketDetonated {
            pos: at,
            enemies,
            comets,
        });
        log::info!(
            "Rocket detonated: {} enemies, {} comets destroyed",
            enemies,
            comets
        );
    }

    pub fn toggle_god_mode(&mut self) {
        self.god_mode = !self.god_mode;
        self.stats.used_god_mode = true;
        log::info!("God mode {}", if self.god_mode { "on" } else { "off" });
    }

    /// Developer jump. Targets below 1 are ignored.
    pub fn jump_to_wave(&mut self, target: i32) {
        if target < 1 {
            return;
        }
        self.wave = target as u32;
        self.schedule.cancel(ScheduledEvent::SpawnWave);
        self.schedule.cancel(ScheduledEvent::ClearWaveBanner);
        self.wave_banner = None;
        self.enemy_projectiles.release_all();
        self.player.pos.x = self.safe_zone.center_x() - self.player.size.x / 2.0;
        self.stats.used_wave_jump = true;
        log::info!("Jumped to wave {}", self.wave);
        self.spawn_wave();
    }

    /// Award the clear bonus and queue the next wave
    pub(crate) fn clear_wave(&mut self) {
        let cleared = self.wave;
        let bonus = waves::wave_bonus(cleared, self.tuning.waves.bonus_per_wave);
        self.score += bonus;
        self.wave += 1;
        self.wave_banner = Some(WaveBanner {
            wave: cleared,
            bonus,
        });
        self.schedule.schedule(
            self.time + self.tuning.waves.spawn_delay as f64,
            ScheduledEvent::SpawnWave,
        );
        self.schedule.schedule(
            self.time + self.tuning.waves.bonus_display as f64,
            ScheduledEvent::ClearWaveBanner,
        );
        self.events.push(GameEvent::WaveCleared {
            wave: cleared,
            bonus,
        });
        log::info!("Wave {} cleared, bonus {}", cleared, bonus);
    }

    pub(crate) fn run_scheduled(&mut self) {
        for event in self.schedule.drain_due(self.time) {
            match event {
                ScheduledEvent::SpawnWave => self.spawn_wave(),
                ScheduledEvent::ClearWaveBanner => self.wave_banner = None,
            }
        }
    }

    pub fn wave_spawn_pending(&self) -> bool {
        self.schedule.is_pending(ScheduledEvent::SpawnWave)
    }

    pub fn summary(&self) -> SessionSummary {
        let total_shots = self.stats.shots.total();
        let shots_per_second = if self.stats.elapsed > 0.0 {
            total_shots as f64 / self.stats.elapsed
        } else {
            0.0
        };
        SessionSummary {
            score: self.score,
            wave: self.wave,
            enemies_killed: self.stats.enemies_killed,
            comets_destroyed: self.stats.comets_destroyed,
            elapsed_secs: self.stats.elapsed,
            total_shots,
            shots_per_second,
            shots: self.stats.shots,
            powerups_collected: self.stats.powerups_collected,
            used_cheats: self.stats.used_cheats(),
            reason: self.game_over_reason,
        }
    }
}
