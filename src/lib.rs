//! Arena Brawl - simulation core for a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Map generation, spawning, combat and the per-frame step
//! - `tuning`: Data-driven session configuration
//! - `brawlers`: Playable brawler roster
//! - `error`: Errors surfaced at the collaborator boundary

pub mod brawlers;
pub mod error;
pub mod sim;
pub mod tuning;

pub use brawlers::BrawlerStats;
pub use error::BrawlError;
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed gameplay constants
pub mod consts {
    /// Player box size
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Regular enemy box size
    pub const ENEMY_SIZE: f32 = 30.0;
    /// Boss collision box as a fraction of the tile size
    pub const BOSS_HITBOX_SCALE: f32 = 0.75;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 10.0;
    /// Bullets appear this far from the shooter's center
    pub const MUZZLE_OFFSET: f32 = 30.0;

    /// Player burst fire
    pub const BURST_SIZE: u32 = 3;
    pub const BURST_INTERVAL_MS: u64 = 100;
    pub const BURST_SPREAD_DEG: f32 = 10.0;

    /// Player regeneration: 5% of max every second, once idle for a second
    pub const PLAYER_REGEN_IDLE_MS: u64 = 1000;
    pub const PLAYER_REGEN_PERIOD_MS: u64 = 1000;
    pub const PLAYER_REGEN_FRACTION: f32 = 0.05;

    /// Enemy regeneration kicks in after this long without attacking
    pub const ENEMY_REGEN_IDLE_MS: u64 = 2000;

    /// Enemy AI
    pub const TURN_RATE_DEG: f32 = 5.0;
    pub const RETREAT_RATIO: f32 = 0.5;
    pub const BOSS_RETREAT_RATIO: f32 = 0.3;
    pub const OPTIMAL_RANGE_FRACTION: f32 = 0.7;
    pub const BOSS_OPTIMAL_RANGE_FRACTION: f32 = 0.8;
    pub const STANDOFF_SLACK: f32 = 20.0;
    pub const BACKOFF_SPEED_FACTOR: f32 = 0.7;
    pub const STRAFE_SPEED_FACTOR: f32 = 0.5;
    pub const HOLD_CHANCE: f64 = 0.1;
    pub const RETREAT_SPEED_FACTOR: f32 = 1.2;
    pub const RETREAT_FIRE_CHANCE: f64 = 0.1;
    pub const RETREAT_DAMAGE_FACTOR: f32 = 0.7;
    pub const RETREAT_INTERVAL_FACTOR: f32 = 1.5;
    /// Cover must be at least this far from the player...
    pub const COVER_MIN_PLAYER_DIST: f32 = 200.0;
    /// ...and at most this far from the enemy
    pub const COVER_MAX_ENEMY_DIST: f32 = 300.0;

    /// Separation pass
    pub const SEPARATION_STRENGTH: f32 = 0.5;
    pub const BOSS_SEPARATION_FACTOR: f32 = 1.5;

    /// Spawning
    pub const ENEMY_MIN_PLAYER_DIST: f32 = 200.0;
    pub const BOSS_MIN_PLAYER_DIST: f32 = 300.0;
    /// Wall inflation used when validating the player spawn point
    pub const SPAWN_WALL_BUFFER: f32 = 5.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit vector for a heading in degrees (0 = east, 90 = south)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Heading in degrees from `from` toward `to`
#[inline]
pub fn degrees_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

/// Signed shortest rotation from `current` to `target`, in (-180, 180]
#[inline]
pub fn shortest_turn(current: f32, target: f32) -> f32 {
    let diff = (target - current + 180.0).rem_euclid(360.0) - 180.0;
    if diff <= -180.0 { diff + 360.0 } else { diff }
}
