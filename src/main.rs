//! Space Invaders entry point
//!
//! In the browser this runs the requestAnimationFrame loop. Natively it plays
//! a headless session with a simple autopilot and logs the summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use space_invaders::persistence::{LeaderboardCache, LocalStore, ScoreStore};
    use space_invaders::platform::KeyTracker;
    use space_invaders::platform::web::{self, CanvasSurface};
    use space_invaders::renderer::{draw_fps, draw_frame};
    use space_invaders::sim::{GameEvent, GameState, tick};
    use space_invaders::{PlayerProfile, ScoreEntry, Settings};

    /// Longest frame step handed to the sim
    const MAX_FRAME_DT: f32 = 0.1;
    const LEADERBOARD_SIZE: usize = 10;

    struct Game {
        state: GameState,
        keys: KeyTracker,
        surface: CanvasSurface,
        settings: Settings,
        profile: PlayerProfile,
        store: LocalStore,
        leaderboard: LeaderboardCache,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, surface: CanvasSurface) -> Self {
            let store = LocalStore::default();
            let mut leaderboard = LeaderboardCache::new();
            leaderboard.refresh_from(&store, LEADERBOARD_SIZE);
            Self {
                state: GameState::with_defaults(seed),
                keys: KeyTracker::new().with_dev_keys(cfg!(debug_assertions)),
                surface,
                settings: Settings::load(),
                profile: PlayerProfile::load(),
                store,
                leaderboard,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn update(&mut self, dt: f32, time: f64) {
            let input = self.keys.snapshot();
            // Host policy: `tick` itself takes dt uncapped
            tick(&mut self.state, &input, dt.min(MAX_FRAME_DT));

            for event in self.state.drain_events() {
                if let GameEvent::GameOver { score, wave, .. } = event {
                    log::info!("Game over: {} points on wave {}", score, wave);
                    self.save_score();
                }
            }

            if self.leaderboard.poll() {
                if let Some((rank, entry)) = self.leaderboard.find_rank(&self.profile.nick) {
                    log::info!("{} is #{} with {}", entry.nick, rank, entry.score);
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }
        }

        fn save_score(&mut self) {
            if !self.profile.is_valid() {
                log::info!("No player nick set, score not saved");
                return;
            }
            let summary = self.state.summary();
            let entry = ScoreEntry::from_session(&self.profile, &summary, web::timestamp_ms());
            match self.store.save_score(entry) {
                Ok(Some(rank)) => log::info!("New local high score, rank {}", rank),
                Ok(None) => {}
                Err(e) => log::warn!("Could not save score: {}", e),
            }
            self.leaderboard.invalidate();
            self.leaderboard.refresh_from(&self.store, LEADERBOARD_SIZE);
        }

        fn render(&mut self) {
            self.surface.fit(&self.state.safe_zone);
            self.surface.begin_frame();
            draw_frame(&self.state, &self.settings, &mut self.surface);
            draw_fps(self.fps, &self.state, &self.settings, &mut self.surface);
        }

        fn restart(&mut self) {
            self.state.restart();
            self.keys.release_all();
            log::info!("Game restarted");
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {e}").into());
        }

        log::info!("Space Invaders starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let surface = CanvasSurface::new(canvas)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, surface)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone())?;
        setup_auto_pause(game.clone())?;
        request_animation_frame(game);

        log::info!("Space Invaders running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.state.is_over() && (key == "Enter" || key == "r" || key == "R") {
                    g.restart();
                    event.prevent_default();
                    return;
                }
                if g.keys.key_down(&key, event.repeat()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        use space_invaders::sim::GamePhase;

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if web::page_hidden() {
                    let mut g = game.borrow_mut();
                    g.keys.release_all();
                    if g.state.phase == GamePhase::Playing {
                        g.keys.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.release_all();
                if g.state.phase == GamePhase::Playing {
                    g.keys.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use space_invaders::persistence::{LeaderboardCache, MemoryStore, ScoreStore};
    use space_invaders::renderer::{RecordingSurface, draw_frame};
    use space_invaders::sim::{GameEvent, GameState, TickInput, tick};
    use space_invaders::{PlayerProfile, ScoreEntry, Settings, Tuning};

    const DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// Pixels of slack before the autopilot steers
    const AIM_SLACK: f32 = 8.0;

    /// Steers under the lowest landed enemy and taps fire every other tick
    fn autopilot(state: &GameState) -> TickInput {
        let player_x = state.player.center().x;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.is_hittable())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x + e.size.x / 2.0);

        let mut input = TickInput {
            fire: state.time_ticks % 2 == 0,
            ..TickInput::default()
        };
        if let Some(x) = target {
            input.moving_left = x < player_x - AIM_SLACK;
            input.moving_right = x > player_x + AIM_SLACK;
        }
        input
    }

    pub fn run(seed: u64, tuning: Tuning) {
        let mut state = GameState::new(seed, tuning);
        log::info!("Headless session with seed {}", seed);

        let mut waves_cleared = 0;
        while !state.is_over() && state.time_ticks < MAX_TICKS {
            let input = autopilot(&state);
            tick(&mut state, &input, DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::WaveCleared { .. } => waves_cleared += 1,
                    GameEvent::PlayerHit { lives_left } => {
                        log::debug!("Hit, {} lives left", lives_left)
                    }
                    _ => {}
                }
            }
        }

        let mut surface = RecordingSurface::new();
        draw_frame(&state, &Settings::default(), &mut surface);
        log::debug!("Final frame: {} draw calls", surface.calls().len());

        let summary = state.summary();
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => log::info!("Session summary:\n{}", json),
            Err(e) => log::warn!("Could not encode summary: {}", e),
        }
        log::info!("Waves cleared: {}", waves_cleared);

        let mut store = MemoryStore::new();
        let profile = PlayerProfile::new("autopilot", "");
        let entry = ScoreEntry::from_session(&profile, &summary, 0.0);
        if let Err(e) = store.save_score(entry) {
            log::warn!("Could not save score: {}", e);
        }

        let mut leaderboard = LeaderboardCache::new();
        leaderboard.refresh_from(&store, 10);
        leaderboard.poll();
        match leaderboard.find_rank(&profile.nick) {
            Some((rank, entry)) => {
                log::info!("Leaderboard: #{} {} ({})", rank, entry.nick, entry.score)
            }
            None => log::info!("No score recorded"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Invaders (native) starting...");

    // Usage: space-invaders [seed] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => space_invaders::Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using default tuning", path, e);
                space_invaders::Tuning::default()
            }
        },
        None => space_invaders::Tuning::default(),
    };

    headless::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is wasm_main
}
