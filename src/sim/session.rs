//! Session controller
//!
//! Owns the screen-level state machine around a run:
//!
//! ```text
//! Title -> CharacterSelect -> Playing -> GameOver -> Title
//!                                     -> Victory  -> Title | Playing (same brawler)
//! Playing -> Title (quit)
//! ```
//!
//! The host drives it with `step` once per frame and reads `render_state`.

use serde::{Deserialize, Serialize};

use super::state::{FrameEvents, GamePhase, GameState, RenderState};
use super::tick::{StepInput, step};
use crate::brawlers::{self, BrawlerStats};
use crate::error::BrawlError;
use crate::tuning::Tuning;

/// Multiplier used to derive per-run seeds from a fixed base seed
const RUN_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Title,
    CharacterSelect,
    Playing,
    GameOver,
    Victory,
}

/// A play session: tuning, chosen brawler and the active run, if any
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    tuning: Tuning,
    brawler: Option<BrawlerStats>,
    game: Option<GameState>,
    /// Runs started so far, used to vary fixed seeds between runs
    runs: u64,
}

impl Session {
    /// New session on the title screen
    pub fn new(tuning: Tuning) -> Result<Self, BrawlError> {
        tuning.validate()?;
        Ok(Self {
            phase: SessionPhase::Title,
            tuning,
            brawler: None,
            game: None,
            runs: 0,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Brawler picked for the current or last run
    pub fn brawler(&self) -> Option<&BrawlerStats> {
        self.brawler.as_ref()
    }

    /// Active run, if any
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    /// Title -> CharacterSelect; ignored on any other screen
    pub fn open_character_select(&mut self) {
        if self.phase == SessionPhase::Title {
            self.phase = SessionPhase::CharacterSelect;
        }
    }

    /// Pick a brawler by id and start a run
    ///
    /// Only valid from the character select screen. An unknown id leaves
    /// the session where it was.
    pub fn select_brawler(&mut self, id: &str) -> Result<(), BrawlError> {
        let stats = brawlers::lookup(id)?;
        if self.phase != SessionPhase::CharacterSelect {
            log::warn!("Ignoring brawler selection outside character select");
            return Ok(());
        }
        self.start_session(stats);
        Ok(())
    }

    /// Start a fresh run with `stats`: new map, safe spawn, wave 1, score 0
    pub fn start_session(&mut self, stats: BrawlerStats) {
        let seed = self.next_seed();
        self.game = Some(GameState::new(&stats, self.tuning.clone(), seed));
        self.brawler = Some(stats);
        self.phase = SessionPhase::Playing;
    }

    /// Replay with the same brawler after a win
    ///
    /// Returns false if there is nothing to restart.
    pub fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::Victory {
            return false;
        }
        match self.brawler.clone() {
            Some(stats) => {
                self.start_session(stats);
                true
            }
            None => false,
        }
    }

    /// Back to the title screen, dropping any active run
    pub fn return_to_title(&mut self) {
        if self.phase != SessionPhase::Title {
            log::info!("Returning to title from {:?}", self.phase);
        }
        self.game = None;
        self.phase = SessionPhase::Title;
    }

    /// Advance the active run by one frame
    ///
    /// A no-op (empty events) unless a run is being played.
    pub fn step(&mut self, input: &StepInput, now_ms: u64) -> FrameEvents {
        if self.phase != SessionPhase::Playing {
            return FrameEvents::default();
        }
        let Some(game) = self.game.as_mut() else {
            return FrameEvents::default();
        };

        let events = step(game, input, now_ms);
        match game.phase {
            GamePhase::Playing => {}
            GamePhase::Defeat => self.phase = SessionPhase::GameOver,
            GamePhase::Victory => self.phase = SessionPhase::Victory,
        }
        events
    }

    /// Snapshot of the active run for the renderer
    pub fn render_state(&self) -> Option<RenderState> {
        self.game.as_ref().map(GameState::snapshot)
    }

    fn next_seed(&mut self) -> u64 {
        let run = self.runs;
        self.runs += 1;
        match self.tuning.seed {
            Some(base) => base.wrapping_add(run.wrapping_mul(RUN_SEED_STRIDE)),
            None => rand::random(),
        }
    }
}

/// Open a session and start playing `stats` straight away
pub fn start_session(stats: BrawlerStats, tuning: Tuning) -> Result<Session, BrawlError> {
    let mut session = Session::new(tuning)?;
    session.start_session(stats);
    Ok(session)
}
