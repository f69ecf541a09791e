//! Game state and core simulation types
//!
//! One `GameState` owns everything a play session mutates: the arena, the
//! actors, wave counters and the RNG. The step function is the only writer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actors::{AttackPattern, Behavior, Bullet, Enemy, Owner, Player};
use super::geometry::Rect;
use super::map::{TileMap, generate_map};
use super::names::NameAllocator;
use super::spawn::{SpawnContext, spawn_wave};
use crate::brawlers::BrawlerStats;
use crate::tuning::Tuning;

/// Outcome of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player health reached zero
    Defeat,
    /// Final wave cleared
    Victory,
}

/// Wave progression counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    /// 1-based index of the active wave
    pub current: u32,
    pub max: u32,
    /// Requested enemies per wave (boss included)
    pub size: u32,
}

impl WaveState {
    pub fn has_next(&self) -> bool {
        self.current < self.max
    }
}

/// Something the host application may want to react to (audio, HUD, notifications)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Bullets left a weapon this step
    ShotFired { owner: Owner, count: u32 },
    /// A player bullet hit an enemy that survived
    EnemyHit { id: u32, damage: f32 },
    /// An enemy died; `at_ms` stamps the kill notification
    EnemyKilled { id: u32, name: String, boss: bool, at_ms: u64 },
    PlayerDamaged { amount: f32, health: f32 },
    /// The next wave has spawned
    WaveAdvanced { wave: u32 },
    Defeat,
    Victory,
}

/// Events produced by one step, in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameEvents {
    pub events: Vec<GameEvent>,
}

impl FrameEvents {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Names of enemies killed this step
    pub fn kills(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            GameEvent::EnemyKilled { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Total bullets fired by `owner` this step
    pub fn shots(&self, owner: Owner) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::ShotFired { owner: o, count } if *o == owner => *count,
                _ => 0,
            })
            .sum()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub map: TileMap,
    pub player: Player,
    /// Live enemies (dead ones are removed immediately)
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub score: u64,
    pub wave: WaveState,
    pub phase: GamePhase,
    /// Name usage for the whole run
    pub names: NameAllocator,
    /// Next enemy ID
    next_id: u32,
}

impl GameState {
    /// Generate an arena, place the player and spawn wave 1
    pub fn new(stats: &BrawlerStats, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let map = generate_map(&mut rng, &tuning);
        let player_pos = map.find_safe_spawn(Vec2::splat(crate::consts::PLAYER_SIZE));
        let player = Player::new(stats, player_pos);
        let wave = WaveState {
            current: 1,
            max: tuning.max_waves,
            size: tuning.wave_size,
        };

        let mut state = Self {
            seed,
            rng,
            tuning,
            map,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            wave,
            phase: GamePhase::Playing,
            names: NameAllocator::new(),
            next_id: 1,
        };
        state.spawn_current_wave();
        log::info!(
            "Run started with {} (seed {}), player at ({}, {})",
            stats.name,
            seed,
            player_pos.x,
            player_pos.y
        );
        state
    }

    /// Spawn the enemies for `wave.current` against the player's current position
    pub fn spawn_current_wave(&mut self) {
        let mut ctx = SpawnContext {
            map: &self.map,
            player_pos: self.player.pos,
            names: &mut self.names,
            next_id: &mut self.next_id,
            max_attempts: self.tuning.spawn_attempts,
        };
        let spawned = spawn_wave(&mut self.rng, self.wave.size, &mut ctx);
        self.enemies.extend(spawned);
    }

    /// True once the run has been won or lost
    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Read-only snapshot for the renderer
    pub fn snapshot(&self) -> RenderState {
        RenderState {
            player: PlayerView {
                brawler: self.player.brawler.clone(),
                pos: self.player.pos,
                size: self.player.size,
                health: self.player.health,
                max_health: self.player.max_health,
                facing: self.player.facing,
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    name: e.name.clone(),
                    pos: e.pos,
                    size: e.size,
                    health: e.health,
                    max_health: e.max_health,
                    facing: e.facing,
                    color: e.color,
                    boss: e.boss().map(|b| b.pattern),
                    retreating: e.behavior() == Behavior::Retreat,
                })
                .collect(),
            bullets: self
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    radius: b.radius,
                    owner: b.owner,
                    color: b.color,
                })
                .collect(),
            walls: self.map.walls.clone(),
            bushes: self.map.bushes.clone(),
            wave: WaveInfo {
                current: self.wave.current,
                max: self.wave.max,
                enemies_remaining: self.enemies.len(),
            },
            score: self.score,
            phase: self.phase,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub brawler: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub facing: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub name: String,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub facing: f32,
    pub color: u32,
    /// Attack pattern when the enemy is a boss
    pub boss: Option<AttackPattern>,
    pub retreating: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    pub owner: Owner,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct WaveInfo {
    pub current: u32,
    pub max: u32,
    pub enemies_remaining: usize,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderState {
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub walls: Vec<Rect>,
    pub bushes: Vec<Rect>,
    pub wave: WaveInfo,
    pub score: u64,
    pub phase: GamePhase,
}
