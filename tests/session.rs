//! Whole-session scenarios through the public API

use glam::Vec2;

use space_invaders::consts::{DEATH_FRAME_DURATION, DEATH_FRAMES, PLAYER_PROJECTILE_POOL};
use space_invaders::persistence::{LeaderboardCache, MemoryStore, ScoreStore};
use space_invaders::renderer::{RecordingSurface, SpriteId, draw_frame};
use space_invaders::sim::projectile::ProjectileInit;
use space_invaders::sim::{
    Comet, CometSize, GameEvent, GameOverReason, GamePhase, GameState, RowTemplate, TickInput, tick,
};
use space_invaders::{PlayerProfile, ScoreEntry, Settings, Tuning};

const DT: f32 = 1.0 / 60.0;

fn quiet_state() -> GameState {
    GameState::new(42, Tuning::quiet())
}

fn idle(state: &mut GameState, ticks: usize) {
    for _ in 0..ticks {
        tick(state, &TickInput::default(), DT);
    }
}

fn settle(state: &mut GameState) {
    for _ in 0..600 {
        if state.formation.ready {
            return;
        }
        tick(state, &TickInput::default(), DT);
    }
    panic!("formation never became ready");
}

/// Index of the lowest idle enemy
fn frontmost(state: &GameState) -> usize {
    state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_hittable())
        .max_by(|(_, a), (_, b)| a.pos.y.total_cmp(&b.pos.y))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[test]
fn test_custom_formation_damage_and_death() {
    let mut state = quiet_state();
    // Tier 1: two hits per regular enemy
    state.wave = 10;
    state.spawn_rows(&[RowTemplate::basic(3, 60.0), RowTemplate::basic(3, 60.0)]);
    assert_eq!(state.enemies.len(), 6);
    assert!(state.enemies.iter().all(|e| e.health == 2 && e.is_flying));

    settle(&mut state);
    let target = frontmost(&state);
    assert_eq!(state.enemies[target].row_index, 1);

    // First hit only wounds
    let center = state.enemies[target].pos + state.enemies[target].size / 2.0;
    state.player_projectiles.acquire(ProjectileInit::up(center));
    tick(&mut state, &TickInput::default(), DT);
    assert_eq!(state.enemies[target].health, 1);
    assert!(state.enemies[target].is_hittable());
    assert_eq!(state.player_projectiles.active_count(), 0);
    assert_eq!(state.score, 0);

    // Second hit starts the death animation
    let center = state.enemies[target].pos + state.enemies[target].size / 2.0;
    state.player_projectiles.acquire(ProjectileInit::up(center));
    tick(&mut state, &TickInput::default(), DT);
    assert!(state.enemies[target].is_dying());
    assert!(!state.enemies[target].in_formation());
    assert!(state.score > 0);
    let killed = state
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
        .count();
    assert_eq!(killed, 1);

    // One frame per step, removed once the last frame ends
    for _ in 0..DEATH_FRAMES - 1 {
        tick(&mut state, &TickInput::default(), DEATH_FRAME_DURATION);
    }
    assert_eq!(state.enemies.len(), 6);
    assert!(state.enemies[target].is_dying());

    tick(&mut state, &TickInput::default(), DEATH_FRAME_DURATION);
    assert_eq!(state.enemies.len(), 5);
    assert!(state.enemies.iter().all(|e| e.is_hittable()));
}

#[test]
fn test_formation_moves_as_one() {
    let mut state = quiet_state();
    state.spawn_rows(&[RowTemplate::basic(4, 60.0), RowTemplate::basic(2, 120.0)]);
    settle(&mut state);

    for _ in 0..1200 {
        let before: Vec<f32> = state.enemies.iter().map(|e| e.pos.y).collect();
        tick(&mut state, &TickInput::default(), DT);
        if state.is_over() {
            break;
        }
        let drops: Vec<f32> = state
            .enemies
            .iter()
            .zip(&before)
            .map(|(e, y)| e.pos.y - y)
            .collect();
        // Either nobody descended or everybody did by the same amount
        assert!(drops.windows(2).all(|w| w[0] == w[1]), "split descent: {drops:?}");
    }
}

#[test]
fn test_projectile_pool_is_reused() {
    let mut state = quiet_state();
    let fire = TickInput {
        fire: true,
        ..TickInput::default()
    };

    for i in 0..1200 {
        // One shot every third of a second keeps a handful in flight
        let input = if i % 20 == 0 { &fire } else { &TickInput::default() };
        tick(&mut state, input, DT);
    }

    assert_eq!(state.stats.shots.basic, 60);
    assert!(state.player_projectiles.active_count() <= 4);
    assert_eq!(state.player_projectiles.capacity(), PLAYER_PROJECTILE_POOL);
}

#[test]
fn test_restart_keeps_pools_and_resets_session() {
    let mut state = quiet_state();
    for _ in 0..5 {
        state
            .player_projectiles
            .acquire(ProjectileInit::up(Vec2::new(600.0, 300.0)));
    }
    state.score = 500;
    state.lives = 1;
    state.rocket_ammo = 2;
    idle(&mut state, 10);

    state.restart();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!((state.score, state.lives, state.wave), (0, 3, 1));
    assert_eq!(state.rocket_ammo, 0);
    assert_eq!(state.player_projectiles.active_count(), 0);
    assert_eq!(state.player_projectiles.capacity(), PLAYER_PROJECTILE_POOL);
    assert!(!state.enemies.is_empty());
    assert!(state.enemies.iter().all(|e| e.is_flying));
}

#[test]
fn test_game_over_score_reaches_leaderboard() {
    let mut state = quiet_state();
    state.score = 250;
    state.lives = 1;
    let pos = state.player.pos;
    state.comets.push(Comet::new(pos, CometSize::Large));
    tick(&mut state, &TickInput::default(), DT);

    assert!(state.is_over());
    let over = state.drain_events().into_iter().find_map(|e| match e {
        GameEvent::GameOver { reason, score, .. } => Some((reason, score)),
        _ => None,
    });
    assert_eq!(over, Some((GameOverReason::OutOfLives, 250)));

    // Frozen after game over
    let time = state.time;
    idle(&mut state, 10);
    assert_eq!(state.time, time);

    let profile = PlayerProfile::new("ace", "ace@example.com");
    let summary = state.summary();
    assert_eq!(summary.reason, Some(GameOverReason::OutOfLives));

    let mut store = MemoryStore::new();
    let rank = store.save_score(ScoreEntry::from_session(&profile, &summary, 0.0));
    assert_eq!(rank, Ok(Some(1)));

    let mut cache = LeaderboardCache::new();
    cache.refresh_from(&store, 10);
    assert!(cache.find_rank("ace").is_none());
    cache.poll();
    let (rank, entry) = cache.find_rank("ace").expect("ranked");
    assert_eq!(rank, 1);
    assert_eq!(entry.score, 250);
}

#[test]
fn test_same_seed_same_session() {
    let play = |seed: u64| {
        let mut state = GameState::with_defaults(seed);
        for i in 0..1800u32 {
            let input = TickInput {
                fire: i % 10 == 0,
                moving_left: (i / 120) % 2 == 0,
                moving_right: (i / 120) % 2 == 1,
                ..TickInput::default()
            };
            tick(&mut state, &input, DT);
        }
        (state.score, state.lives, state.wave, state.stats.shots.total(), state.comets.len())
    };
    assert_eq!(play(9), play(9));
}

#[test]
fn test_frame_draws_every_entity() {
    let mut state = quiet_state();
    settle(&mut state);
    state
        .enemy_projectiles
        .acquire(ProjectileInit::down(Vec2::new(300.0, 200.0)));

    let mut surface = RecordingSurface::new();
    draw_frame(&state, &Settings::default(), &mut surface);
    assert_eq!(
        surface.count_sprites(|s| matches!(s, SpriteId::Enemy | SpriteId::Boss)),
        state.enemies.len()
    );
    assert_eq!(surface.count_sprites(|s| s == SpriteId::EnemyLaser), 1);
}
