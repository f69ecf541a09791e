//! Player, enemy and bullet records

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::brawlers::BrawlerStats;
use crate::consts::*;
use crate::heading;

/// Packed 0xRRGGBB colors for bullets the renderer should tint
pub const PLAYER_BULLET_COLOR: u32 = 0x0000FF;
pub const SNIPER_BULLET_COLOR: u32 = 0xFFFF00;

/// Shared view of anything with a box and a health pool
pub trait Actor {
    /// Top-left corner of the visual box
    fn pos(&self) -> Vec2;
    /// Visual box size
    fn size(&self) -> Vec2;
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;

    /// Box used for bullet and wall collision when standing at `pos`
    fn hitbox_at(&self, pos: Vec2) -> Rect {
        Rect::at(pos, self.size())
    }

    fn hitbox(&self) -> Rect {
        self.hitbox_at(self.pos())
    }

    fn center(&self) -> Vec2 {
        self.pos() + self.size() / 2.0
    }

    fn health_ratio(&self) -> f32 {
        if self.max_health() > 0.0 {
            self.health() / self.max_health()
        } else {
            0.0
        }
    }

    fn is_alive(&self) -> bool {
        self.health() > 0.0
    }
}

/// Burst-fire bookkeeping for the player's weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Shots left in the current burst
    pub remaining: u32,
    /// Timestamp the next burst shot is due
    pub next_shot_ms: u64,
    /// Shots per burst
    pub size: u32,
    /// Delay between shots within a burst
    pub interval_ms: u64,
}

impl Default for Burst {
    fn default() -> Self {
        Self {
            remaining: 0,
            next_shot_ms: 0,
            size: BURST_SIZE,
            interval_ms: BURST_INTERVAL_MS,
        }
    }
}

/// The player's brawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub brawler: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Bursts per second
    pub attack_speed: f32,
    pub range: f32,
    /// Degrees, 0 = east, clockwise
    pub facing: f32,
    /// Start of the most recent burst
    pub last_attack_ms: Option<u64>,
    /// Most recent individual shot (burst follow-ups included)
    pub last_shot_ms: Option<u64>,
    pub burst: Burst,
    pub last_regen_ms: Option<u64>,
}

impl Player {
    pub fn new(stats: &BrawlerStats, pos: Vec2) -> Self {
        Self {
            brawler: stats.name.clone(),
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            attack_speed: stats.attack_speed,
            range: stats.range,
            facing: 0.0,
            last_attack_ms: None,
            last_shot_ms: None,
            burst: Burst::default(),
            last_regen_ms: None,
        }
    }

    /// Minimum time between burst starts
    pub fn attack_interval_ms(&self) -> f32 {
        1000.0 / self.attack_speed
    }
}

impl Actor for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        self.size
    }
    fn health(&self) -> f32 {
        self.health
    }
    fn max_health(&self) -> f32 {
        self.max_health
    }
}

/// Boss special-attack volley shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Five bullets fanned across ±30°
    Spread,
    /// Three bullets with a little jitter
    Burst,
    /// One bullet at double damage
    Sniper,
}

impl AttackPattern {
    pub const ALL: [AttackPattern; 3] = [Self::Spread, Self::Burst, Self::Sniper];
}

/// Boss-only traits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTraits {
    pub pattern: AttackPattern,
    pub special_cooldown_ms: u64,
    pub last_special_ms: Option<u64>,
    /// Collision box offset from the visual box's top-left
    pub hitbox_offset: Vec2,
    pub hitbox_size: Vec2,
}

/// Regular enemy or boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    Regular,
    Boss(BossTraits),
}

/// Whether an enemy is pressing the attack or looking for cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Aggressive,
    Retreat,
}

/// A hostile brawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Shots per second
    pub attack_speed: f32,
    pub range: f32,
    /// Degrees, 0 = east, clockwise
    pub facing: f32,
    pub last_attack_ms: Option<u64>,
    /// Start of the current regen window; cleared on every frame the enemy
    /// is not eligible to heal, so idle time before eligibility never pays out
    pub last_regen_ms: Option<u64>,
    /// Health per second while idle and hidden (halved in the open)
    pub regen_rate: f32,
    pub color: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossTraits> {
        match &self.kind {
            EnemyKind::Boss(traits) => Some(traits),
            EnemyKind::Regular => None,
        }
    }

    /// Aggressive at or above the retreat threshold, otherwise retreating
    pub fn behavior(&self) -> Behavior {
        let threshold = if self.is_boss() {
            BOSS_RETREAT_RATIO
        } else {
            RETREAT_RATIO
        };
        if self.health_ratio() >= threshold {
            Behavior::Aggressive
        } else {
            Behavior::Retreat
        }
    }

    /// Standoff distance an aggressive enemy tries to hold
    pub fn optimal_distance(&self) -> f32 {
        let fraction = if self.is_boss() {
            BOSS_OPTIMAL_RANGE_FRACTION
        } else {
            OPTIMAL_RANGE_FRACTION
        };
        self.range * fraction
    }

    pub fn attack_interval_ms(&self) -> f32 {
        1000.0 / self.attack_speed
    }

    /// Width used for separation (collision width when it differs)
    pub fn body_width(&self) -> f32 {
        self.hitbox().w
    }
}

impl Actor for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> Vec2 {
        self.size
    }
    fn health(&self) -> f32 {
        self.health
    }
    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn hitbox_at(&self, pos: Vec2) -> Rect {
        match &self.kind {
            EnemyKind::Boss(traits) => Rect::at(pos + traits.hitbox_offset, traits.hitbox_size),
            EnemyKind::Regular => Rect::at(pos, self.size),
        }
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub damage: f32,
    /// Degrees, 0 = east, clockwise
    pub direction: f32,
    pub owner: Owner,
    pub color: u32,
}

impl Bullet {
    /// Spawn a bullet at the muzzle point in front of `shooter_center`
    pub fn fired_from(shooter_center: Vec2, direction: f32, damage: f32, owner: Owner, color: u32) -> Self {
        Self {
            pos: shooter_center + heading(direction) * MUZZLE_OFFSET,
            radius: BULLET_RADIUS,
            speed: BULLET_SPEED,
            damage,
            direction,
            owner,
            color,
        }
    }

    /// Move one step along the heading
    pub fn advance(&mut self) {
        self.pos += heading(self.direction) * self.speed;
    }

    /// Square bounding box used for every bullet collision
    pub fn bounds(&self) -> Rect {
        Rect::around(self.pos, self.radius)
    }

    /// True once the center has left [0, width] x [0, height]
    pub fn out_of_bounds(&self, world: Vec2) -> bool {
        self.pos.x < 0.0 || self.pos.x > world.x || self.pos.y < 0.0 || self.pos.y > world.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular(health: f32, max_health: f32) -> Enemy {
        Enemy {
            id: 1,
            name: "Grim Badger".into(),
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::splat(ENEMY_SIZE),
            health,
            max_health,
            speed: 2.0,
            damage: 10.0,
            attack_speed: 1.0,
            range: 150.0,
            facing: 0.0,
            last_attack_ms: None,
            last_regen_ms: None,
            regen_rate: 0.5,
            color: 0x808080,
            kind: EnemyKind::Regular,
        }
    }

    fn as_boss(mut enemy: Enemy) -> Enemy {
        enemy.size = Vec2::splat(40.0);
        enemy.kind = EnemyKind::Boss(BossTraits {
            pattern: AttackPattern::Spread,
            special_cooldown_ms: 5000,
            last_special_ms: None,
            hitbox_offset: Vec2::splat(5.0),
            hitbox_size: Vec2::splat(30.0),
        });
        enemy
    }

    #[test]
    fn test_behavior_thresholds() {
        assert_eq!(regular(30.0, 60.0).behavior(), Behavior::Aggressive);
        assert_eq!(regular(29.0, 60.0).behavior(), Behavior::Retreat);

        // Bosses hold on until 30%
        assert_eq!(as_boss(regular(40.0, 100.0)).behavior(), Behavior::Aggressive);
        assert_eq!(as_boss(regular(29.0, 100.0)).behavior(), Behavior::Retreat);
    }

    #[test]
    fn test_boss_hitbox_is_inset() {
        let boss = as_boss(regular(150.0, 150.0));
        let hb = boss.hitbox();
        assert_eq!(hb, Rect::new(105.0, 105.0, 30.0, 30.0));
        // Same center as the visual box
        assert_eq!(hb.center(), boss.center());
        assert_eq!(boss.body_width(), 30.0);
    }

    #[test]
    fn test_optimal_distance() {
        let enemy = regular(50.0, 50.0);
        assert!((enemy.optimal_distance() - 105.0).abs() < 1e-4);
        let mut boss = as_boss(regular(150.0, 150.0));
        boss.range = 250.0;
        assert!((boss.optimal_distance() - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_bullet_muzzle_and_advance() {
        let mut bullet = Bullet::fired_from(Vec2::new(100.0, 100.0), 0.0, 20.0, Owner::Player, 0);
        assert!((bullet.pos.x - 130.0).abs() < 1e-4);
        bullet.advance();
        assert!((bullet.pos.x - 140.0).abs() < 1e-4);
        assert!((bullet.pos.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_bullet_bounds() {
        let world = Vec2::new(800.0, 600.0);
        let mut bullet = Bullet::fired_from(Vec2::new(795.0, 300.0), 0.0, 1.0, Owner::Enemy, 0);
        bullet.pos.x = 800.0;
        assert!(!bullet.out_of_bounds(world));
        bullet.pos.x = 800.5;
        assert!(bullet.out_of_bounds(world));
    }
}
