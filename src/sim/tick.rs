//! Per-frame simulation step
//!
//! Called once per rendered frame with a wall-clock timestamp. Cooldowns and
//! regeneration are time based; movement is a fixed distance per call.

use glam::Vec2;

use super::state::{FrameEvents, GameEvent, GamePhase, GameState};
use super::{ai, bullets, player};

/// Player intent for a single step
#[derive(Debug, Clone, Default)]
pub struct StepInput {
    /// Movement direction; longer-than-unit vectors are normalized
    pub movement: Vec2,
    /// Manual facing override in degrees (auto-aim still wins when enemies exist)
    pub facing: Option<f32>,
    /// Fire held
    pub fire: bool,
}

/// Advance the game by one frame
///
/// Order: player movement, weapon, bullets, auto-aim, enemy AI, separation,
/// player regen, wave progression. A finished run is left untouched.
pub fn step(state: &mut GameState, input: &StepInput, now_ms: u64) -> FrameEvents {
    let mut events = FrameEvents::default();
    if state.is_over() {
        return events;
    }

    player::move_player(state, input.movement, input.facing);
    player::update_weapon(state, input.fire, now_ms, &mut events);

    bullets::update_bullets(state, now_ms, &mut events);
    if state.is_over() {
        return events;
    }

    player::auto_aim(state);
    ai::update_enemies(state, now_ms, &mut events);
    ai::separate_enemies(state);
    player::regenerate(state, now_ms);

    advance_wave(state, &mut events);
    events
}

/// Spawn the next wave once the arena is clear, or end the run after the last one
fn advance_wave(state: &mut GameState, events: &mut FrameEvents) {
    if !state.enemies.is_empty() {
        return;
    }

    if state.wave.has_next() {
        state.wave.current += 1;
        // Bullets from the cleared wave keep flying
        state.spawn_current_wave();
        log::info!("Wave {}/{} started", state.wave.current, state.wave.max);
        events.push(GameEvent::WaveAdvanced {
            wave: state.wave.current,
        });
    } else {
        log::info!("All {} waves cleared, score {}", state.wave.max, state.score);
        state.phase = GamePhase::Victory;
        events.push(GameEvent::Victory);
    }
}
