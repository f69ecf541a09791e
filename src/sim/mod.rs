//! Simulation module
//!
//! All gameplay logic lives here, with no rendering, audio or input code:
//! - One `GameState` per run, mutated only by `step` and the spawner
//! - One seeded RNG per run
//! - Wall-clock millisecond timestamps for every cooldown

pub mod actors;
pub mod ai;
pub mod bullets;
pub mod geometry;
pub mod map;
pub mod names;
pub mod player;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actors::{Actor, AttackPattern, Behavior, BossTraits, Bullet, Enemy, EnemyKind, Owner, Player};
pub use geometry::{Rect, has_line_of_sight, segment_intersects};
pub use map::{Tile, TileMap, generate_map};
pub use names::NameAllocator;
pub use session::{Session, SessionPhase, start_session};
pub use spawn::{find_spawn_point, spawn_wave};
pub use state::{FrameEvents, GameEvent, GamePhase, GameState, RenderState, WaveState};
pub use tick::{StepInput, step};
