//! Simulation module
//!
//! All gameplay logic lives here. Everything is driven by `tick` with the
//! host's frame `dt`; every random decision comes from the seeded RNG in
//! `GameState`, so a seed plus an input sequence replays exactly. Nothing in
//! here touches rendering or the platform.

pub mod collision;
pub mod comet;
pub mod enemy;
pub mod formation;
pub mod grid;
pub mod heat;
pub mod player;
pub mod pool;
pub mod powerup;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod waves;

pub use collision::{Aabb, Collider, EntityKind, EntityRef};
pub use comet::{Comet, CometSize};
pub use enemy::{AnimationState, Enemy, EnemyKind, WeaponType};
pub use formation::Formation;
pub use grid::SpatialGrid;
pub use heat::WeaponHeat;
pub use player::Player;
pub use pool::{Pool, PoolHandle, Poolable};
pub use powerup::{PowerUp, PowerUpKind};
pub use projectile::{Owner, Projectile, Rocket};
pub use state::{GameEvent, GameOverReason, GamePhase, GameState, SessionSummary};
pub use tick::{TickInput, tick};
pub use waves::{Pattern, RowTemplate};
