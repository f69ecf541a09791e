//! Enemy AI
//!
//! Each live enemy runs a two-state machine picked from its health ratio:
//! aggressive enemies turn toward the player, fire on cadence and hold a
//! standoff distance; retreating enemies look for cover and only return
//! fire occasionally. A second pass pushes overlapping enemies apart.

use glam::Vec2;
use rand::Rng;

use super::actors::{Actor, AttackPattern, Behavior, Bullet, Enemy, EnemyKind, Owner, SNIPER_BULLET_COLOR};
use super::geometry::{Rect, has_line_of_sight, overlaps_any};
use super::state::{FrameEvents, GameEvent, GameState};
use crate::consts::*;
use crate::{degrees_toward, heading, normalize_degrees, shortest_turn};

/// Spread volley offsets from the current facing
const SPREAD_OFFSETS: [f32; 5] = [-30.0, -15.0, 0.0, 15.0, 30.0];
/// Burst volley size and jitter
const BOSS_BURST_SHOTS: usize = 3;
const BOSS_BURST_JITTER_DEG: f32 = 5.0;
const SNIPER_DAMAGE_FACTOR: f32 = 2.0;

/// What an enemy sees this frame
#[derive(Debug, Clone, Copy)]
struct Perception {
    center: Vec2,
    player_center: Vec2,
    distance: f32,
    sight: bool,
}

/// Run regeneration, behavior and movement for every enemy
pub fn update_enemies(state: &mut GameState, now_ms: u64, events: &mut FrameEvents) {
    let GameState {
        enemies,
        bullets,
        rng,
        map,
        player,
        ..
    } = state;
    let player_center = player.center();
    let mut shots = 0;

    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        let center = enemy.center();
        let view = Perception {
            center,
            player_center,
            distance: center.distance(player_center),
            sight: has_line_of_sight(center, player_center, &map.walls),
        };

        regenerate(enemy, now_ms, view.sight);

        let target = match enemy.behavior() {
            Behavior::Aggressive => {
                shots += aggressive_attack(enemy, &view, now_ms, rng, bullets);
                aggressive_move(enemy, &view, rng)
            }
            Behavior::Retreat => {
                let (target, fired) = retreat(enemy, &view, &map.walls, now_ms, rng, bullets);
                shots += fired;
                target
            }
        };

        if !overlaps_any(&enemy.hitbox_at(target), &map.walls) {
            enemy.pos = target;
        }
    }

    if shots > 0 {
        events.push(GameEvent::ShotFired {
            owner: Owner::Enemy,
            count: shots,
        });
    }
}

/// Passive healing after two seconds without attacking
///
/// The regen clock only runs while the enemy is eligible, so the first
/// eligible frame starts it instead of paying out the whole idle period.
fn regenerate(enemy: &mut Enemy, now_ms: u64, sight: bool) {
    let idle = enemy
        .last_attack_ms
        .map_or(true, |t| now_ms.saturating_sub(t) > ENEMY_REGEN_IDLE_MS);
    if !idle || enemy.health >= enemy.max_health {
        enemy.last_regen_ms = None;
        return;
    }

    let Some(last) = enemy.last_regen_ms else {
        enemy.last_regen_ms = Some(now_ms);
        return;
    };

    let secs = now_ms.saturating_sub(last) as f32 / 1000.0;
    let exposure = if sight { 0.5 } else { 1.0 };
    let amount = enemy.regen_rate * secs * exposure;
    if amount > 0.0 {
        enemy.health = (enemy.health + amount).min(enemy.max_health);
        enemy.last_regen_ms = Some(now_ms);
    }
}

fn cooldown_ready(last_ms: Option<u64>, now_ms: u64, interval_ms: f32) -> bool {
    last_ms.map_or(true, |t| now_ms.saturating_sub(t) as f32 > interval_ms)
}

/// Turn toward the player and fire when in range, in sight and off cooldown
///
/// Returns the number of bullets fired.
fn aggressive_attack<R: Rng>(
    enemy: &mut Enemy,
    view: &Perception,
    now_ms: u64,
    rng: &mut R,
    bullets: &mut Vec<Bullet>,
) -> u32 {
    let target = normalize_degrees(degrees_toward(view.center, view.player_center));
    let turn = shortest_turn(enemy.facing, target);
    enemy.facing = if turn.abs() <= TURN_RATE_DEG {
        target
    } else {
        normalize_degrees(enemy.facing + TURN_RATE_DEG * turn.signum())
    };

    if view.distance > enemy.range
        || !view.sight
        || !cooldown_ready(enemy.last_attack_ms, now_ms, enemy.attack_interval_ms())
    {
        return 0;
    }

    enemy.last_attack_ms = Some(now_ms);
    fire_volley(enemy, view.center, now_ms, rng, bullets)
}

/// Single shot along the facing, or the boss special volley when it is due
fn fire_volley<R: Rng>(
    enemy: &mut Enemy,
    center: Vec2,
    now_ms: u64,
    rng: &mut R,
    bullets: &mut Vec<Bullet>,
) -> u32 {
    let (facing, damage, color) = (enemy.facing, enemy.damage, enemy.color);

    if let EnemyKind::Boss(traits) = &mut enemy.kind {
        let due = traits
            .last_special_ms
            .map_or(true, |t| now_ms.saturating_sub(t) > traits.special_cooldown_ms);
        if due {
            traits.last_special_ms = Some(now_ms);
            let before = bullets.len();
            match traits.pattern {
                AttackPattern::Spread => {
                    for offset in SPREAD_OFFSETS {
                        bullets.push(Bullet::fired_from(center, facing + offset, damage, Owner::Enemy, color));
                    }
                }
                AttackPattern::Burst => {
                    for _ in 0..BOSS_BURST_SHOTS {
                        let jitter = rng.random_range(-BOSS_BURST_JITTER_DEG..=BOSS_BURST_JITTER_DEG);
                        bullets.push(Bullet::fired_from(center, facing + jitter, damage, Owner::Enemy, color));
                    }
                }
                AttackPattern::Sniper => {
                    bullets.push(Bullet::fired_from(
                        center,
                        facing,
                        damage * SNIPER_DAMAGE_FACTOR,
                        Owner::Enemy,
                        SNIPER_BULLET_COLOR,
                    ));
                }
            }
            log::debug!("Boss special {:?} fired", traits.pattern);
            return (bullets.len() - before) as u32;
        }
    }

    bullets.push(Bullet::fired_from(center, facing, damage, Owner::Enemy, color));
    1
}

/// Close in, back off or strafe to hold the optimal distance
fn aggressive_move<R: Rng>(enemy: &Enemy, view: &Perception, rng: &mut R) -> Vec2 {
    let optimal = enemy.optimal_distance();

    if view.distance > optimal + STANDOFF_SLACK {
        enemy.pos + heading(enemy.facing) * enemy.speed
    } else if view.distance < optimal - STANDOFF_SLACK {
        enemy.pos + heading(enemy.facing + 180.0) * enemy.speed * BACKOFF_SPEED_FACTOR
    } else if rng.random_bool(HOLD_CHANCE) {
        enemy.pos
    } else {
        // Odd and even ids circle in opposite directions
        let side = if enemy.id % 2 == 0 { 90.0 } else { -90.0 };
        enemy.pos + heading(enemy.facing + side) * enemy.speed * STRAFE_SPEED_FACTOR
    }
}

/// Nearest wall far from the player and close to the enemy
///
/// Only considered while the enemy is already out of the player's sight.
fn find_cover(view: &Perception, walls: &[Rect]) -> Option<Vec2> {
    if view.sight {
        return None;
    }
    walls
        .iter()
        .map(Rect::center)
        .filter(|c| {
            c.distance(view.player_center) > COVER_MIN_PLAYER_DIST
                && c.distance(view.center) < COVER_MAX_ENEMY_DIST
        })
        .min_by(|a, b| a.distance(view.center).total_cmp(&b.distance(view.center)))
}

/// Head for cover (or straight away from the player), returning fire now and then
///
/// Returns the desired position and the number of bullets fired.
fn retreat<R: Rng>(
    enemy: &mut Enemy,
    view: &Perception,
    walls: &[Rect],
    now_ms: u64,
    rng: &mut R,
    bullets: &mut Vec<Bullet>,
) -> (Vec2, u32) {
    let escape = match find_cover(view, walls) {
        Some(cover) => degrees_toward(view.center, cover),
        None => degrees_toward(view.center, view.player_center) + 180.0,
    };
    enemy.facing = normalize_degrees(escape);
    let target = enemy.pos + heading(enemy.facing) * enemy.speed * RETREAT_SPEED_FACTOR;

    let mut fired = 0;
    if view.sight
        && rng.random_bool(RETREAT_FIRE_CHANCE)
        && view.distance <= enemy.range
        && cooldown_ready(
            enemy.last_attack_ms,
            now_ms,
            enemy.attack_interval_ms() * RETREAT_INTERVAL_FACTOR,
        )
    {
        let aim = degrees_toward(view.center, view.player_center);
        bullets.push(Bullet::fired_from(
            view.center,
            aim,
            enemy.damage * RETREAT_DAMAGE_FACTOR,
            Owner::Enemy,
            enemy.color,
        ));
        enemy.last_attack_ms = Some(now_ms);
        fired = 1;
    }

    (target, fired)
}

/// Push overlapping enemies apart
///
/// Repulsions are computed from a snapshot of all centers and applied
/// afterwards; moves into walls are dropped.
pub fn separate_enemies(state: &mut GameState) {
    let GameState {
        enemies, rng, map, ..
    } = state;

    let bodies: Vec<(Vec2, f32)> = enemies.iter().map(|e| (e.center(), e.body_width())).collect();
    let mut pushes = vec![Vec2::ZERO; bodies.len()];

    for (i, &(center, width)) in bodies.iter().enumerate() {
        for (j, &(other, other_width)) in bodies.iter().enumerate() {
            if i == j {
                continue;
            }
            let min_dist = (width + other_width) / 2.0;
            let delta = center - other;
            let dist = delta.length();
            if dist >= min_dist {
                continue;
            }
            let dir = if dist > 0.0 {
                delta / dist
            } else {
                Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
            };
            pushes[i] += dir * (min_dist - dist) * SEPARATION_STRENGTH;
        }
    }

    for (enemy, push) in enemies.iter_mut().zip(pushes) {
        if push == Vec2::ZERO {
            continue;
        }
        let factor = if enemy.is_boss() { BOSS_SEPARATION_FACTOR } else { 1.0 };
        let target = enemy.pos + push * factor;
        if !overlaps_any(&enemy.hitbox_at(target), &map.walls) {
            enemy.pos = target;
        }
    }
}
