//! Arena Brawl headless driver
//!
//! Plays a run with a simple bot and prints the final snapshot as JSON.
//!
//! Usage: `arena-brawl [BRAWLER] [TUNING_JSON]`

use std::process::ExitCode;

use arena_brawl::sim::{Actor, GameEvent, GameState, Session, SessionPhase, StepInput};
use arena_brawl::{BrawlError, Tuning};
use glam::Vec2;

/// Simulated frame length
const FRAME_MS: u64 = 16;
/// Give up after this many frames (about five minutes of play)
const MAX_FRAMES: u64 = 20_000;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), BrawlError> {
    let mut args = std::env::args().skip(1);
    let brawler = args.next().unwrap_or_else(|| "Shelly".to_string());
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json)?,
            Err(e) => {
                log::warn!("Could not read {path}: {e}, using default tuning");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut session = Session::new(tuning)?;
    session.open_character_select();
    session.select_brawler(&brawler)?;
    log::info!("Arena Brawl (headless) starting with {brawler}");

    let mut now = 0;
    for _ in 0..MAX_FRAMES {
        if session.phase() != SessionPhase::Playing {
            break;
        }
        let input = session.game().map(bot_input).unwrap_or_default();
        let events = session.step(&input, now);
        for event in &events.events {
            match event {
                GameEvent::EnemyKilled { name, boss, .. } => {
                    log::info!("{} {name} defeated", if *boss { "Boss" } else { "Enemy" });
                }
                GameEvent::WaveAdvanced { wave } => log::info!("Wave {wave}"),
                GameEvent::Defeat => log::info!("Defeated"),
                GameEvent::Victory => log::info!("Victory"),
                _ => {}
            }
        }
        now += FRAME_MS;
    }

    if session.phase() == SessionPhase::Playing {
        log::warn!("Stopped after {MAX_FRAMES} frames without a result");
    }

    if let Some(snapshot) = session.render_state() {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

/// Keep the nearest enemy at roughly half weapon range and never stop shooting
fn bot_input(game: &GameState) -> StepInput {
    let center = game.player.center();
    let nearest = game
        .enemies
        .iter()
        .map(|e| e.center())
        .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));

    let movement = match nearest {
        Some(target) => {
            let to_target = target - center;
            let preferred = game.player.range * 0.5;
            if to_target.length() > preferred {
                to_target.normalize_or_zero()
            } else {
                -to_target.normalize_or_zero()
            }
        }
        None => Vec2::ZERO,
    };

    StepInput {
        movement,
        facing: None,
        fire: true,
    }
}
