//! Bullet phase
//!
//! Moves every bullet one step and resolves what it ran into. Kills are
//! removed from the enemy list right here, so the AI phase that follows
//! only ever sees live enemies.

use super::actors::{Actor, Owner};
use super::geometry::overlaps_any;
use super::state::{FrameEvents, GameEvent, GamePhase, GameState};

/// Advance and resolve all bullets
///
/// Stops early (leaving the remaining bullets untouched) once the player dies.
pub fn update_bullets(state: &mut GameState, now_ms: u64, events: &mut FrameEvents) {
    let world = state.map.world_size();
    let mut pending = std::mem::take(&mut state.bullets).into_iter();
    let mut kept = Vec::with_capacity(pending.len());

    while let Some(mut bullet) = pending.next() {
        bullet.advance();

        if bullet.out_of_bounds(world) {
            continue;
        }

        let bounds = bullet.bounds();
        if overlaps_any(&bounds, &state.map.walls) {
            continue;
        }

        match bullet.owner {
            Owner::Player => {
                let hit = state
                    .enemies
                    .iter()
                    .position(|e| e.hitbox().overlaps(&bounds));
                if let Some(idx) = hit {
                    let enemy = &mut state.enemies[idx];
                    enemy.health -= bullet.damage;
                    if enemy.is_alive() {
                        events.push(GameEvent::EnemyHit {
                            id: enemy.id,
                            damage: bullet.damage,
                        });
                    } else {
                        let dead = state.enemies.remove(idx);
                        state.score += state.tuning.kill_score;
                        log::debug!("{} defeated (score {})", dead.name, state.score);
                        events.push(GameEvent::EnemyKilled {
                            id: dead.id,
                            boss: dead.is_boss(),
                            name: dead.name,
                            at_ms: now_ms,
                        });
                    }
                    continue;
                }
            }
            Owner::Enemy => {
                if state.player.hitbox().overlaps(&bounds) {
                    let player = &mut state.player;
                    player.health = (player.health - bullet.damage).max(0.0);
                    events.push(GameEvent::PlayerDamaged {
                        amount: bullet.damage,
                        health: player.health,
                    });
                    if !player.is_alive() {
                        log::info!("Player defeated on wave {}", state.wave.current);
                        state.phase = GamePhase::Defeat;
                        events.push(GameEvent::Defeat);
                        kept.extend(pending.by_ref());
                        break;
                    }
                    continue;
                }
            }
        }

        kept.push(bullet);
    }

    state.bullets = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brawlers;
    use crate::sim::actors::{Bullet, EnemyKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        let stats = brawlers::lookup("Shelly").unwrap();
        let mut state = GameState::new(&stats, Tuning::default(), 4242);
        state.map = crate::sim::map::TileMap::bordered(20, 15, 40.0);
        state.player.pos = Vec2::new(100.0, 100.0);
        state
    }

    /// Bullet that will sit at `target` after one advance along +x
    fn bullet_hitting(target: Vec2, damage: f32, owner: Owner) -> Bullet {
        let mut b = Bullet::fired_from(Vec2::ZERO, 0.0, damage, owner, 0);
        b.pos = target - Vec2::new(b.speed, 0.0);
        b
    }

    #[test]
    fn test_kill_awards_score_and_event() {
        let mut state = state();
        state.enemies.truncate(1);
        let enemy = &mut state.enemies[0];
        enemy.kind = EnemyKind::Regular;
        enemy.size = Vec2::splat(30.0);
        enemy.pos = Vec2::new(400.0, 300.0);
        enemy.health = 15.0;
        let name = enemy.name.clone();

        state.bullets = vec![bullet_hitting(Vec2::new(415.0, 315.0), 20.0, Owner::Player)];
        let mut events = FrameEvents::default();
        update_bullets(&mut state, 5000, &mut events);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 100);
        assert_eq!(events.kills().collect::<Vec<_>>(), vec![name.as_str()]);
        assert_eq!(events.events.len(), 1);
    }

    #[test]
    fn test_non_lethal_hit() {
        let mut state = state();
        state.enemies.truncate(1);
        state.enemies[0].kind = EnemyKind::Regular;
        state.enemies[0].pos = Vec2::new(400.0, 300.0);
        state.enemies[0].health = 50.0;
        state.bullets = vec![bullet_hitting(Vec2::new(410.0, 310.0), 20.0, Owner::Player)];

        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 30.0);
        assert_eq!(state.score, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_bullets_pass_through_enemies() {
        let mut state = state();
        state.enemies.truncate(1);
        state.enemies[0].kind = EnemyKind::Regular;
        state.enemies[0].pos = Vec2::new(400.0, 300.0);
        state.bullets = vec![bullet_hitting(Vec2::new(410.0, 310.0), 20.0, Owner::Enemy)];

        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.enemies[0].health, state.enemies[0].max_health);
    }

    #[test]
    fn test_player_hit_and_defeat_stops_processing() {
        let mut state = state();
        state.player.health = 15.0;
        let lethal = bullet_hitting(Vec2::new(110.0, 110.0), 20.0, Owner::Enemy);
        let mut untouched = bullet_hitting(Vec2::new(300.0, 300.0), 1.0, Owner::Enemy);
        untouched.pos = Vec2::new(300.0, 300.0);
        state.bullets = vec![lethal, untouched];

        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert_eq!(state.phase, GamePhase::Defeat);
        assert_eq!(state.player.health, 0.0);
        assert!(events.contains(&GameEvent::Defeat));
        // Second bullet was never advanced
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_out_of_bounds_removed_within_one_step() {
        let mut state = state();
        let mut b = Bullet::fired_from(Vec2::ZERO, 180.0, 1.0, Owner::Player, 0);
        b.pos = Vec2::new(5.0, 300.0);
        state.bullets = vec![b];
        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_wall_stops_bullet() {
        let mut state = state();
        // Heading into the left border wall from just inside it
        let mut b = Bullet::fired_from(Vec2::ZERO, 180.0, 1.0, Owner::Player, 0);
        b.pos = Vec2::new(48.0, 300.0);
        state.bullets = vec![b];
        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert!(state.bullets.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_boss_hit_uses_collision_box() {
        let mut state = state();
        state.enemies.retain(|e| e.is_boss());
        state.enemies[0].pos = Vec2::new(400.0, 300.0);
        let health = state.enemies[0].health;
        // Inside the 40x40 visual box but outside the inset 30x30 collision box
        let mut b = Bullet::fired_from(Vec2::ZERO, 90.0, 20.0, Owner::Player, 0);
        b.radius = 1.0;
        b.pos = Vec2::new(402.0, 290.0);
        state.bullets = vec![b];
        let mut events = FrameEvents::default();
        update_bullets(&mut state, 0, &mut events);
        assert_eq!(state.enemies[0].health, health);
        assert_eq!(state.bullets.len(), 1);
    }
}
