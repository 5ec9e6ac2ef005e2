//! Per-frame simulation step
//!
//! `tick` advances the whole session by one host frame of length `dt`
//! (wall-clock, not sub-stepped): move, rebuild the grid, resolve
//! collisions, clean up, then start the next wave if this one is done.

use super::collision::{Aabb, Collider, EntityKind, EntityRef};
use super::formation::column_clear;
use super::state::{GameOverReason, GamePhase, GameState};
use crate::SafeZone;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub moving_left: bool,
    pub moving_right: bool,
    /// Trigger pressed this frame (edge, not level)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Developer: invulnerability toggle
    pub toggle_god_mode: bool,
    /// Developer: jump straight to a wave (values below 1 are ignored)
    pub jump_to_wave: Option<i32>,
    /// Play area from the viewport layer, when it changed
    pub safe_zone: Option<SafeZone>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(zone) = input.safe_zone {
        state.safe_zone = zone;
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if input.toggle_god_mode {
        state.toggle_god_mode();
    }
    if let Some(target) = input.jump_to_wave {
        state.jump_to_wave(target);
    }

    state.time += dt as f64;
    state.time_ticks += 1;
    state.stats.elapsed += dt as f64;
    state.run_scheduled();

    update_player(state, input, dt);
    update_enemies(state, dt);

    let outcome = state.formation.update(&mut state.enemies, &state.safe_zone);
    if outcome.reached_bottom {
        state.end_game(GameOverReason::FormationLanded);
        return;
    }

    move_projectiles(state, dt);
    update_hazards(state, dt);

    rebuild_grid(state);
    resolve_player_shots(state);
    resolve_enemy_shots(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_rockets(state);
    resolve_player_contacts(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    state.enemies.retain(|e| !e.is_dead());
    state.comets.retain(|c| c.active);
    state.powerups.retain(|p| p.active);

    if state.enemies.is_empty() && !state.wave_spawn_pending() {
        state.clear_wave();
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    state
        .player
        .update(dt, input.moving_left, input.moving_right, &state.safe_zone);
    if input.fire {
        state.fire_player_weapon();
    }
    state.update_effects(dt);
}

/// Fly-in, drift and death animation, then fire rolls
fn update_enemies(state: &mut GameState, dt: f32) {
    let ready = state.formation.ready;
    let direction = state.formation.direction;
    for enemy in &mut state.enemies {
        enemy.update(dt, ready, direction);
    }

    let player_center = state.player.center();
    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.is_boss() && !column_clear(&state.enemies, i) {
            continue;
        }
        if !enemy.roll_fire(
            &mut state.rng,
            ready,
            state.wave,
            &state.tuning.enemy_fire,
            dt,
        ) {
            continue;
        }
        for shot in enemy.shots(player_center) {
            state.enemy_projectiles.acquire(shot);
        }
    }
}

/// Move lasers and rockets, releasing anything that left the zone
fn move_projectiles(state: &mut GameState, dt: f32) {
    let zone = state.safe_zone;

    let mut gone = Vec::new();
    for (handle, p) in state.player_projectiles.iter_active_mut() {
        p.advance(dt);
        if p.is_out_of_bounds(&zone) {
            gone.push(handle);
        }
    }
    for handle in gone.drain(..) {
        state.player_projectiles.release(handle);
    }

    for (handle, p) in state.enemy_projectiles.iter_active_mut() {
        p.advance(dt);
        if p.is_out_of_bounds(&zone) {
            gone.push(handle);
        }
    }
    for handle in gone.drain(..) {
        state.enemy_projectiles.release(handle);
    }

    for (handle, r) in state.rockets.iter_active_mut() {
        r.advance(dt);
        if r.is_out_of_bounds(&zone) {
            gone.push(handle);
        }
    }
    for handle in gone.drain(..) {
        state.rockets.release(handle);
    }
}

/// Comets and power-ups fall; the comet timer may add one
fn update_hazards(state: &mut GameState, dt: f32) {
    let zone = state.safe_zone;
    for comet in &mut state.comets {
        comet.update(dt, &zone);
    }
    for powerup in &mut state.powerups {
        powerup.update(dt, &zone);
    }
    if let Some(comet) =
        state
            .comet_spawner
            .update(dt, &mut state.rng, &state.tuning.comets, &zone)
    {
        log::debug!("Comet spawned: {:?}", comet.kind);
        state.comets.push(comet);
    }
}

fn rebuild_grid(state: &mut GameState) {
    state.grid.clear();
    for (i, enemy) in state.enemies.iter().enumerate() {
        if enemy.is_hittable() {
            state
                .grid
                .insert(EntityRef::new(EntityKind::Enemy, i), enemy.bounds());
        }
    }
    for (i, comet) in state.comets.iter().enumerate() {
        if comet.active {
            state
                .grid
                .insert(EntityRef::new(EntityKind::Comet, i), comet.bounds());
        }
    }
}

/// First live target overlapping `bounds`, in grid order
fn first_hit(state: &GameState, bounds: &Aabb, comets: bool) -> Option<EntityRef> {
    state
        .grid
        .query_near(bounds)
        .into_iter()
        .find(|target| match target.kind {
            EntityKind::Enemy => state
                .enemies
                .get(target.index)
                .is_some_and(|e| e.is_hittable() && e.bounds().overlaps(bounds)),
            EntityKind::Comet => {
                comets
                    && state
                        .comets
                        .get(target.index)
                        .is_some_and(|c| c.active && c.bounds().overlaps(bounds))
            }
        })
}

fn resolve_player_shots(state: &mut GameState) {
    for handle in state.player_projectiles.active_handles() {
        let Some(bounds) = state.player_projectiles.get(handle).map(|p| p.bounds()) else {
            continue;
        };
        let Some(target) = first_hit(state, &bounds, true) else {
            continue;
        };
        state.player_projectiles.release(handle);

        match target.kind {
            EntityKind::Enemy => {
                let lethal = state
                    .enemies
                    .get_mut(target.index)
                    .is_some_and(|e| e.take_damage());
                if lethal {
                    state.on_enemy_killed(target.index);
                }
            }
            EntityKind::Comet => {
                let destroyed = state
                    .comets
                    .get_mut(target.index)
                    .is_some_and(|c| c.take_damage(1));
                if destroyed {
                    state.on_comet_destroyed(target.index);
                }
            }
        }
    }
}

fn resolve_enemy_shots(state: &mut GameState) {
    let player = state.player.bounds();
    for handle in state.enemy_projectiles.active_handles() {
        let hit = state
            .enemy_projectiles
            .get(handle)
            .is_some_and(|p| p.bounds().overlaps(&player));
        if !hit {
            continue;
        }
        state.enemy_projectiles.release(handle);
        if !state.player.is_invulnerable(state.god_mode) {
            // Respawn clears the remaining enemy fire
            state.hit_player();
            return;
        }
    }
}

fn resolve_rockets(state: &mut GameState) {
    for handle in state.rockets.active_handles() {
        let Some(bounds) = state.rockets.get(handle).map(|r| r.bounds()) else {
            continue;
        };
        if first_hit(state, &bounds, false).is_none() {
            continue;
        }
        state.rockets.release(handle);
        state.destroy_all(bounds.center());
    }
}

/// Comets and power-ups touching the ship
fn resolve_player_contacts(state: &mut GameState) {
    let player = state.player.bounds();

    for i in 0..state.comets.len() {
        let comet = &mut state.comets[i];
        if !comet.active || !comet.bounds().overlaps(&player) {
            continue;
        }
        comet.active = false;
        if !state.player.is_invulnerable(state.god_mode) {
            state.hit_player();
            if state.phase != GamePhase::Playing {
                return;
            }
        }
    }

    let player = state.player.bounds();
    for i in 0..state.powerups.len() {
        let touching = state.powerups[i].active && state.powerups[i].bounds().overlaps(&player);
        if touching {
            state.collect_powerup(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::comet::{Comet, CometSize};
    use crate::sim::enemy::WeaponType;
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use crate::sim::projectile::{ProjectileInit, RocketInit};
    use crate::sim::state::GameEvent;
    use crate::sim::waves::RowTemplate;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_state() -> GameState {
        GameState::new(7, Tuning::quiet())
    }

    /// Tick until every enemy has landed and the formation is moving
    fn settle(state: &mut GameState) {
        for _ in 0..600 {
            if state.formation.ready {
                return;
            }
            tick(state, &TickInput::default(), DT);
        }
        panic!("formation never became ready");
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut state = quiet_state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let y = state.enemies[0].pos.y;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, 0.0);
        assert_eq!(state.enemies[0].pos.y, y);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.time > 0.0);
    }

    #[test]
    fn test_formation_settles_then_drifts() {
        let mut state = quiet_state();
        settle(&mut state);
        assert!(state.enemies.iter().all(|e| !e.is_flying));
        let x = state.enemies[0].pos.x;
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemies[0].pos.x > x);
    }

    #[test]
    fn test_player_shot_kills_enemy() {
        let mut state = quiet_state();
        settle(&mut state);
        let target = state
            .enemies
            .iter()
            .position(|e| e.row_index == 3)
            .unwrap_or(0);
        let center = state.enemies[target].bounds().center();
        state
            .player_projectiles
            .acquire(ProjectileInit::up(center));

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player_projectiles.active_count(), 0);
        assert!(state.enemies[target].is_dying());
        assert_eq!(state.score, 1);
        assert_eq!(state.stats.enemies_killed, 1);
    }

    #[test]
    fn test_flying_enemies_cannot_be_hit() {
        let mut state = quiet_state();
        let enemy = &state.enemies[0];
        let center = enemy.bounds().center() + Vec2::new(0.0, 5.0);
        state
            .player_projectiles
            .acquire(ProjectileInit::up(center));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 0);
        assert!(state.enemies.iter().all(|e| e.health == 1));
    }

    #[test]
    fn test_enemy_shot_costs_life() {
        let mut state = quiet_state();
        let center = state.player.center();
        state
            .enemy_projectiles
            .acquire(ProjectileInit::down(center));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, 2);
        assert!(state.player.shield_active);

        // Shielded: the next shot is absorbed
        let center = state.player.center();
        state
            .enemy_projectiles
            .acquire(ProjectileInit::down(center));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, 2);
        assert_eq!(state.enemy_projectiles.active_count(), 0);
    }

    #[test]
    fn test_god_mode_blocks_damage() {
        let mut state = quiet_state();
        let god = TickInput {
            toggle_god_mode: true,
            ..Default::default()
        };
        tick(&mut state, &god, DT);
        assert!(state.god_mode);

        let pos = state.player.pos;
        state.comets.push(Comet::new(pos, CometSize::Small));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.lives, 3);
        assert!(state.comets.is_empty());
        assert!(state.summary().used_cheats);
    }

    #[test]
    fn test_comet_hit_without_lives_ends_game() {
        let mut state = quiet_state();
        state.lives = 1;
        let pos = state.player.pos;
        state.comets.push(Comet::new(pos, CometSize::Medium));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason, Some(GameOverReason::OutOfLives));

        // Terminal: further ticks change nothing
        let time = state.time;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, time);
    }

    #[test]
    fn test_comet_takes_player_shots() {
        let mut state = quiet_state();
        state.comets.push(Comet::new(Vec2::new(900.0, 300.0), CometSize::Medium));
        let center = state.comets[0].bounds().center();
        state
            .player_projectiles
            .acquire(ProjectileInit::up(center));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.comets[0].hp, 1);

        let center = state.comets[0].bounds().center();
        state
            .player_projectiles
            .acquire(ProjectileInit::up(center));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.comets.is_empty());
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_comet_kill_can_drop_rocket() {
        let mut tuning = Tuning::quiet();
        tuning.comets.rocket_drop_chances = [1.0; 3];
        let mut state = GameState::new(7, tuning);
        state.comets.push(Comet::new(Vec2::new(900.0, 300.0), CometSize::Small));
        let center = state.comets[0].bounds().center();
        state
            .player_projectiles
            .acquire(ProjectileInit::up(center));
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.comets.is_empty());
        assert_eq!(state.rocket_ammo, 1);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::CometDestroyed {
                size: CometSize::Small,
                rocket_dropped: true,
                ..
            }
        )));
    }

    #[test]
    fn test_boss_fires_over_escorts() {
        let mut tuning = Tuning::quiet();
        tuning.enemy_fire.boss_chance = 1.0;
        let mut state = GameState::new(7, tuning);
        state.spawn_rows(&[
            RowTemplate::boss(560.0, WeaponType::Aimed, 1.0),
            RowTemplate::basic(10, 60.0),
        ]);
        settle(&mut state);

        let boss = state
            .enemies
            .iter()
            .position(|e| e.is_boss())
            .unwrap_or(0);
        assert!(state.enemies[boss].is_boss());
        assert!(!column_clear(&state.enemies, boss));

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.enemy_projectiles.active_count() >= 1);
    }

    #[test]
    fn test_rocket_clears_screen() {
        let mut state = quiet_state();
        settle(&mut state);
        state.comets.push(Comet::new(Vec2::new(1000.0, 300.0), CometSize::Small));
        let center = state.enemies[0].bounds().center();
        state.rockets.acquire(RocketInit {
            pos: center,
            direction: -1.0,
        });
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.rockets.active_count(), 0);
        assert!(state.enemies.iter().all(|e| e.is_dying() || !e.active));
        assert!(state.comets.is_empty());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::RocketDetonated { enemies: 40, .. }))
        );
    }

    #[test]
    fn test_powerup_pickup() {
        let mut state = quiet_state();
        let pos = state.player.pos;
        state.powerups.push(PowerUp::new(pos, PowerUpKind::Rocket));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.rocket_ammo, 1);
        assert!(state.powerups.is_empty());
        assert_eq!(state.stats.powerups_collected[PowerUpKind::Rocket.index()], 1);
    }

    #[test]
    fn test_fire_is_edge_triggered_by_input() {
        let mut state = quiet_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player_projectiles.active_count(), 1);
        assert_eq!(state.stats.shots.basic, 1);
    }

    #[test]
    fn test_wave_clear_then_delayed_spawn() {
        let mut state = quiet_state();
        state.enemies.clear();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.wave, 2);
        assert_eq!(state.score, 50);
        assert!(state.enemies.is_empty());
        assert!(state.wave_banner.is_some());

        // No double award while the spawn is pending
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 50);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.enemies.len(), 30);
        assert!(state.wave_banner.is_some());

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.wave_banner.is_none());
    }

    #[test]
    fn test_formation_landing_ends_game() {
        let mut state = quiet_state();
        settle(&mut state);
        let bottom = state.safe_zone.bottom();
        for e in &mut state.enemies {
            e.pos.y = bottom - ENEMY_SIZE - 5.0;
            e.pos.x += 600.0;
        }
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), DT);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(state.game_over_reason, Some(GameOverReason::FormationLanded));
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = GameState::with_defaults(1234);
        let mut b = GameState::with_defaults(1234);
        for i in 0..900 {
            let input = TickInput {
                moving_left: i % 90 < 45,
                moving_right: i % 90 >= 45,
                fire: i % 7 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.comets.len(), b.comets.len());
        assert_eq!(a.player.pos, b.player.pos);
    }
}
