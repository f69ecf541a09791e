//! Player movement, burst fire, auto-aim and regeneration

use glam::Vec2;
use rand::Rng;

use super::actors::{Actor, Bullet, Owner, PLAYER_BULLET_COLOR};
use super::state::{FrameEvents, GameEvent, GameState};
use crate::consts::*;
use crate::{degrees_toward, normalize_degrees};

/// Apply a movement intent; the move is dropped if the new box touches a wall
///
/// `movement` is a direction; anything longer than a unit vector is normalized.
pub fn move_player(state: &mut GameState, movement: Vec2, facing: Option<f32>) {
    let player = &mut state.player;

    if let Some(angle) = facing {
        player.facing = normalize_degrees(angle);
    }

    let dir = if movement.length_squared() > 1.0 {
        movement.normalize()
    } else {
        movement
    };
    if dir == Vec2::ZERO {
        return;
    }

    let target = player.pos + dir * player.speed;
    if !state.map.collides(target, player.size) {
        player.pos = target;
    }
}

/// Drive the burst weapon
///
/// Pending burst shots go out first; a new burst starts when `fire` is held,
/// no burst is in progress and the attack interval has passed.
pub fn update_weapon(state: &mut GameState, fire: bool, now_ms: u64, events: &mut FrameEvents) {
    let mut shots = 0;

    if state.player.burst.remaining > 0 && now_ms >= state.player.burst.next_shot_ms {
        fire_shot(state, now_ms);
        shots += 1;
    }

    let player = &state.player;
    let ready = player
        .last_attack_ms
        .map_or(true, |t| now_ms.saturating_sub(t) as f32 > player.attack_interval_ms());
    if fire && player.burst.remaining == 0 && ready {
        state.player.last_attack_ms = Some(now_ms);
        state.player.burst.remaining = state.player.burst.size;
        fire_shot(state, now_ms);
        shots += 1;
    }

    if shots > 0 {
        events.push(GameEvent::ShotFired {
            owner: Owner::Player,
            count: shots,
        });
    }
}

/// One bullet along the current facing with a little random spread
fn fire_shot(state: &mut GameState, now_ms: u64) {
    let spread = state
        .rng
        .random_range(-BURST_SPREAD_DEG..=BURST_SPREAD_DEG);
    let player = &mut state.player;
    state.bullets.push(Bullet::fired_from(
        player.center(),
        player.facing + spread,
        player.damage,
        Owner::Player,
        PLAYER_BULLET_COLOR,
    ));
    player.burst.remaining = player.burst.remaining.saturating_sub(1);
    player.burst.next_shot_ms = now_ms + player.burst.interval_ms;
    player.last_shot_ms = Some(now_ms);
}

/// Turn the player toward the nearest enemy, if any
pub fn auto_aim(state: &mut GameState) {
    let center = state.player.center();
    let nearest = state
        .enemies
        .iter()
        .map(|e| e.center())
        .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));
    if let Some(target) = nearest {
        state.player.facing = normalize_degrees(degrees_toward(center, target));
    }
}

/// Heal 5% of max health once per second after a second without shooting
pub fn regenerate(state: &mut GameState, now_ms: u64) {
    let player = &mut state.player;
    let idle = player
        .last_shot_ms
        .map_or(true, |t| now_ms.saturating_sub(t) >= PLAYER_REGEN_IDLE_MS);
    if !idle {
        return;
    }

    let Some(last) = player.last_regen_ms else {
        player.last_regen_ms = Some(now_ms);
        return;
    };
    if now_ms.saturating_sub(last) < PLAYER_REGEN_PERIOD_MS {
        return;
    }

    player.last_regen_ms = Some(now_ms);
    if player.health < player.max_health {
        let amount = (player.max_health * PLAYER_REGEN_FRACTION).floor().max(1.0);
        player.health = (player.health + amount).min(player.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brawlers;
    use crate::sim::map::TileMap;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn state(brawler: &str) -> GameState {
        let stats = brawlers::lookup(brawler).unwrap();
        let mut state = GameState::new(&stats, Tuning::default(), 77);
        state.map = TileMap::bordered(20, 15, 40.0);
        state.player.pos = Vec2::new(200.0, 200.0);
        state
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut state = state("Shelly");
        state.player.pos = Vec2::new(41.0, 200.0);
        move_player(&mut state, Vec2::new(-1.0, 0.0), None);
        assert_eq!(state.player.pos, Vec2::new(41.0, 200.0));

        move_player(&mut state, Vec2::new(1.0, 0.0), None);
        assert_eq!(state.player.pos, Vec2::new(46.0, 200.0));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut state = state("Colt");
        move_player(&mut state, Vec2::new(1.0, 1.0), Some(45.0));
        let moved = state.player.pos - Vec2::new(200.0, 200.0);
        assert!((moved.length() - 6.0).abs() < 1e-4);
        assert_eq!(state.player.facing, 45.0);
    }

    #[test]
    fn test_burst_fires_three_shots() {
        let mut state = state("Shelly");
        state.bullets.clear();
        let mut events = FrameEvents::default();

        update_weapon(&mut state, true, 1000, &mut events);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.player.burst.remaining, 2);

        // Too early for the next burst shot
        update_weapon(&mut state, true, 1050, &mut events);
        assert_eq!(state.bullets.len(), 1);

        update_weapon(&mut state, true, 1100, &mut events);
        update_weapon(&mut state, true, 1200, &mut events);
        assert_eq!(state.bullets.len(), 3);
        assert_eq!(state.player.burst.remaining, 0);

        // Burst interval for Shelly is 1000ms from burst start
        update_weapon(&mut state, true, 1900, &mut events);
        assert_eq!(state.bullets.len(), 3);
        update_weapon(&mut state, true, 2001, &mut events);
        assert_eq!(state.bullets.len(), 4);

        assert_eq!(events.shots(Owner::Player), 4);
    }

    #[test]
    fn test_burst_continues_without_trigger() {
        let mut state = state("Shelly");
        let mut events = FrameEvents::default();
        update_weapon(&mut state, true, 0, &mut events);
        update_weapon(&mut state, false, 100, &mut events);
        update_weapon(&mut state, false, 200, &mut events);
        assert_eq!(state.bullets.len(), 3);
    }

    #[test]
    fn test_shots_spread_around_facing() {
        let mut state = state("Colt");
        state.player.facing = 90.0;
        let mut events = FrameEvents::default();
        update_weapon(&mut state, true, 0, &mut events);
        let b = &state.bullets[0];
        assert!((b.direction - 90.0).abs() <= BURST_SPREAD_DEG);
        assert_eq!(b.owner, Owner::Player);
        assert_eq!(b.damage, 15.0);
    }

    #[test]
    fn test_auto_aim_picks_nearest() {
        let mut state = state("Shelly");
        state.enemies.truncate(2);
        state.enemies[0].pos = Vec2::new(600.0, 200.0);
        state.enemies[1].pos = Vec2::new(200.0, 300.0);
        state.enemies[1].size = Vec2::splat(30.0);
        state.enemies[1].kind = crate::sim::actors::EnemyKind::Regular;
        auto_aim(&mut state);
        // Straight down the screen
        assert!((state.player.facing - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_regen_waits_then_heals() {
        let mut state = state("El Primo");
        state.player.health = 100.0;
        regenerate(&mut state, 0);
        assert_eq!(state.player.health, 100.0);
        regenerate(&mut state, 999);
        assert_eq!(state.player.health, 100.0);
        regenerate(&mut state, 1000);
        // 5% of 150
        assert_eq!(state.player.health, 107.0);
    }

    #[test]
    fn test_regen_minimum_one_point() {
        let mut state = state("Shelly");
        state.player.max_health = 10.0;
        state.player.health = 5.0;
        regenerate(&mut state, 0);
        regenerate(&mut state, 1000);
        assert_eq!(state.player.health, 6.0);
    }

    proptest! {
        #[test]
        fn regen_respects_cap_and_shot_cooldown(
            health in 1.0f32..100.0,
            shot_at in 0u64..5000,
            offsets in prop::collection::vec(0u64..3000, 1..20),
        ) {
            let mut state = state("Shelly");
            state.player.health = health;
            state.player.last_shot_ms = Some(shot_at);
            state.player.last_regen_ms = Some(0);

            let mut now = shot_at;
            for offset in offsets {
                now += offset;
                let before = state.player.health;
                regenerate(&mut state, now);
                prop_assert!(state.player.health <= state.player.max_health);
                if now - shot_at < PLAYER_REGEN_IDLE_MS {
                    prop_assert_eq!(state.player.health, before);
                }
            }
        }
    }
}
