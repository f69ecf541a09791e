//! Wave spawning
//!
//! Every wave holds exactly one boss plus regular enemies. Spawn points are
//! interior tiles clear of walls and far enough from the player; random
//! search is capped and falls back to a raster scan of the grid.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::actors::{AttackPattern, BossTraits, Enemy, EnemyKind};
use super::geometry::{Rect, overlaps_any};
use super::map::TileMap;
use super::names::NameAllocator;
use crate::consts::*;

/// Boss tints
const BOSS_COLORS: [u32; 3] = [0xFF0000, 0xFF3200, 0xC80032];

/// Inputs shared by every spawn in a wave
pub struct SpawnContext<'a> {
    pub map: &'a TileMap,
    /// Player top-left position at spawn time
    pub player_pos: Vec2,
    pub names: &'a mut NameAllocator,
    /// Next free enemy id; bumped for each spawn
    pub next_id: &'a mut u32,
    /// Random candidates tried before the raster scan
    pub max_attempts: u32,
}

impl SpawnContext<'_> {
    fn allocate_id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }
}

/// Regular enemy count for a requested wave size (one slot always goes to the boss)
pub fn regular_count(count: u32) -> u32 {
    count.saturating_sub(1).max(1)
}

/// Spawn a wave: `max(1, count - 1)` regular enemies followed by one boss
pub fn spawn_wave<R: Rng>(rng: &mut R, count: u32, ctx: &mut SpawnContext<'_>) -> Vec<Enemy> {
    let regulars = regular_count(count);
    let mut enemies = Vec::with_capacity(regulars as usize + 1);
    for _ in 0..regulars {
        enemies.push(spawn_regular(rng, ctx));
    }
    enemies.push(spawn_boss(rng, ctx));
    log::info!(
        "Spawned {} enemies (boss: {})",
        enemies.len(),
        enemies.last().map(|e| e.name.as_str()).unwrap_or("-")
    );
    enemies
}

/// True if a tile-sized footprint at `pos` is clear of walls and farther than
/// `min_dist` from the player
fn spawn_point_valid(map: &TileMap, pos: Vec2, player_pos: Vec2, min_dist: f32) -> bool {
    let footprint = Rect::at(pos, Vec2::splat(map.cell_size));
    !overlaps_any(&footprint, &map.walls) && pos.distance(player_pos) > min_dist
}

/// Search for a spawn point, random first then raster order
///
/// `jitter` nudges each candidate by up to one tile on each axis (clamped
/// to the interior).
pub fn find_spawn_point<R: Rng>(
    rng: &mut R,
    map: &TileMap,
    player_pos: Vec2,
    min_dist: f32,
    jitter: bool,
    max_attempts: u32,
) -> Vec2 {
    let (w, h) = (map.width as i32, map.height as i32);
    let cell = map.cell_size;

    for _ in 0..max_attempts {
        let mut cx = rng.random_range(1..=w - 2);
        let mut cy = rng.random_range(1..=h - 2);
        if jitter {
            cx = (cx + rng.random_range(-1..=1)).clamp(1, w - 2);
            cy = (cy + rng.random_range(-1..=1)).clamp(1, h - 2);
        }
        let pos = Vec2::new(cx as f32, cy as f32) * cell;
        if spawn_point_valid(map, pos, player_pos, min_dist) {
            return pos;
        }
    }

    log::warn!(
        "Spawn search exhausted {} attempts, scanning grid",
        max_attempts
    );
    let interior = (1..h - 1)
        .flat_map(move |y| (1..w - 1).map(move |x| Vec2::new(x as f32, y as f32) * cell));

    if let Some(pos) = interior
        .clone()
        .find(|p| spawn_point_valid(map, *p, player_pos, min_dist))
    {
        return pos;
    }

    // Nothing far enough away: take the wall-free tile farthest from the player
    interior
        .filter(|p| !overlaps_any(&Rect::at(*p, Vec2::splat(cell)), &map.walls))
        .max_by(|a, b| a.distance(player_pos).total_cmp(&b.distance(player_pos)))
        .unwrap_or_else(|| {
            log::warn!("No wall-free tile for spawning, using arena center");
            map.world_size() / 2.0
        })
}

fn spawn_regular<R: Rng>(rng: &mut R, ctx: &mut SpawnContext<'_>) -> Enemy {
    let pos = find_spawn_point(
        rng,
        ctx.map,
        ctx.player_pos,
        ENEMY_MIN_PLAYER_DIST,
        false,
        ctx.max_attempts,
    );
    let health = rng.random_range(40..=60) as f32;
    let name = ctx.names.regular(rng);
    let color = {
        let mut channel = || rng.random_range(100u32..=200);
        (channel() << 16) | (channel() << 8) | channel()
    };

    Enemy {
        id: ctx.allocate_id(),
        name,
        pos,
        size: Vec2::splat(ENEMY_SIZE),
        health,
        max_health: health,
        speed: rng.random_range(1.0..=3.0),
        damage: 10.0,
        attack_speed: rng.random_range(0.5..=1.5),
        range: 150.0,
        facing: rng.random_range(0.0..360.0),
        last_attack_ms: None,
        last_regen_ms: None,
        regen_rate: rng.random_range(0.5..=1.0),
        color,
        kind: EnemyKind::Regular,
    }
}

fn spawn_boss<R: Rng>(rng: &mut R, ctx: &mut SpawnContext<'_>) -> Enemy {
    let pos = find_spawn_point(
        rng,
        ctx.map,
        ctx.player_pos,
        BOSS_MIN_PLAYER_DIST,
        true,
        ctx.max_attempts,
    );
    let health = rng.random_range(150..=200) as f32;
    let name = ctx.names.boss(rng);
    let pattern = *AttackPattern::ALL.choose(rng).unwrap_or(&AttackPattern::Spread);
    let color = *BOSS_COLORS.choose(rng).unwrap_or(&BOSS_COLORS[0]);

    let size = Vec2::splat(ctx.map.cell_size);
    let hitbox_size = size * BOSS_HITBOX_SCALE;

    Enemy {
        id: ctx.allocate_id(),
        name,
        pos,
        size,
        health,
        max_health: health,
        speed: 3.0,
        damage: 20.0,
        attack_speed: 2.0,
        range: 250.0,
        facing: rng.random_range(0.0..360.0),
        last_attack_ms: None,
        last_regen_ms: None,
        regen_rate: 2.0,
        color,
        kind: EnemyKind::Boss(BossTraits {
            pattern,
            special_cooldown_ms: 5000,
            last_special_ms: None,
            hitbox_offset: (size - hitbox_size) / 2.0,
            hitbox_size,
        }),
    }
}
