//! Session state and the presentation snapshot
//!
//! `GameState` is the single owned aggregate every pipeline step mutates.
//! Presentation reads `Snapshot` (plain scalar copies) and never touches the
//! state directly.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::ChainBlast;
use super::effects::{CameraShake, ParticlePool, Starfield};
use super::entity::EntityId;
use super::hazards::Hazard;
use super::obstacle::Obstacle;
use super::pickup::Pickup;
use super::player::Player;
use super::progression::{Combo, Progression};
use super::projectile::Projectile;
use super::spawn::WaveState;
use super::weapons::ActiveWeapon;
use crate::rng::RandomSource;
use crate::tuning::{ControlScheme, Tuning};

/// Default particle arena size (settings may lower it)
pub const DEFAULT_MAX_PARTICLES: usize = 1000;

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first run
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen; all entity state kept
    Paused,
    /// Run ended; the last state stays readable until the next start
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Seconds of `Playing` time this run
    pub elapsed: f32,
    pub score: u64,
    /// Current wave (1-based)
    pub wave: u32,
    pub kills: u32,
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
    /// Pending chain-reaction blasts, oldest first
    pub chain_queue: VecDeque<ChainBlast>,
    pub combo: Combo,
    pub weapon: ActiveWeapon,
    pub progression: Progression,
    pub waves: WaveState,
    pub shake: CameraShake,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: ParticlePool,
    #[serde(skip)]
    pub starfield: Starfield,
    next_id: EntityId,
}

impl GameState {
    /// Fresh state in the `Menu` phase
    pub fn new(tuning: &Tuning, rng: &mut dyn RandomSource) -> Self {
        let (width, height) = (tuning.playfield.width, tuning.playfield.height);
        let fx = &tuning.effects;
        Self {
            phase: GamePhase::Menu,
            elapsed: 0.0,
            score: 0,
            wave: 1,
            kills: 0,
            width,
            height,
            player: Player::new(Self::player_start(width, height, tuning), &tuning.player),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            hazards: Vec::new(),
            chain_queue: VecDeque::new(),
            combo: Combo::default(),
            weapon: ActiveWeapon::default(),
            progression: Progression::new(&tuning.progression),
            waves: WaveState::new(&tuning.spawn, &tuning.hazards),
            shake: CameraShake::default(),
            particles: ParticlePool::new(DEFAULT_MAX_PARTICLES),
            starfield: Starfield::new(
                fx.star_layers,
                fx.stars_per_layer,
                fx.star_speed,
                width,
                height,
                rng,
            ),
            next_id: 1,
        }
    }

    /// Reset every run field for a new run, keeping the playfield size and
    /// cosmetic configuration
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.elapsed = 0.0;
        self.score = 0;
        self.wave = 1;
        self.kills = 0;
        self.player = Player::new(Self::player_start(self.width, self.height, tuning), &tuning.player);
        self.obstacles.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.hazards.clear();
        self.chain_queue.clear();
        self.combo = Combo::default();
        self.weapon = ActiveWeapon::default();
        self.progression = Progression::new(&tuning.progression);
        self.waves = WaveState::new(&tuning.spawn, &tuning.hazards);
        self.shake = CameraShake::default();
        self.particles.clear();
        self.next_id = 1;
    }

    /// Where the craft starts: lane mode sits near the bottom, free flight
    /// starts at the center
    fn player_start(width: f32, height: f32, tuning: &Tuning) -> Vec2 {
        match tuning.player.control {
            ControlScheme::Lane => Vec2::new(width * 0.5, height - tuning.player.lane_height),
            ControlScheme::FreeFlight => Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whether a boss is on the field
    pub fn boss_alive(&self) -> bool {
        self.obstacles.iter().any(|o| o.boss && !o.is_destroyed())
    }

    /// Change the playfield size; keeps the player inside and rescales
    /// the starfield
    pub fn resize(&mut self, width: f32, height: f32, tuning: &Tuning) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.starfield.resize(width, height);

        let body = &mut self.player.body;
        match tuning.player.control {
            ControlScheme::Lane => {
                let margin = tuning.player.lane_margin.min(width * 0.5);
                body.position.x = body.position.x.clamp(margin, width - margin);
                body.position.y = height - tuning.player.lane_height;
            }
            ControlScheme::FreeFlight => {
                body.position = body.position.clamp(Vec2::ZERO, Vec2::new(width, height));
            }
        }
    }

    /// Read-only summary for presentation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            wave: self.wave,
            kills: self.kills,
            elapsed: self.elapsed,
            health: self.player.health,
            max_health: self.player.max_health,
            shield: self.player.shield.strength,
            max_shield: self.player.shield.max_strength,
            shield_active: self.player.shield.active,
            weapon: self.weapon.mode.as_str().to_string(),
            weapon_remaining: self.weapon.remaining,
            level: self.progression.level,
            xp: self.progression.xp,
            xp_to_next: self.progression.xp_to_next,
            combo: self.combo.count,
            multiplier: self.combo.multiplier,
            boss_active: self.boss_alive(),
            obstacles: self.obstacles.len(),
            hazards: self.hazards.len(),
            shake: self.shake.intensity,
        }
    }
}

/// Plain copy of the fields presentation layers display each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub wave: u32,
    pub kills: u32,
    pub elapsed: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub shield_active: bool,
    /// Active weapon name
    pub weapon: String,
    /// Seconds until a timed weapon reverts (0 for the default weapon)
    pub weapon_remaining: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub combo: u32,
    pub multiplier: f32,
    pub boss_active: bool,
    pub obstacles: usize,
    pub hazards: usize,
    pub shake: f32,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
