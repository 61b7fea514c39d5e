//! Void Drift - A single-player arcade asteroid-combat engine
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, entities, game state, per-step pipeline)
//! - `engine`: Command/snapshot facade that presentation layers talk to
//! - `math`: 2D vector helpers on top of `glam::Vec2`
//! - `rng`: Injectable random source
//! - `tuning`: Data-driven game balance
//! - `highscores`: Run ranking (the storage collaborator)
//! - `platform`: Host key mapping and browser bindings

pub mod engine;
pub mod error;
pub mod highscores;
pub mod math;
pub mod platform;
pub mod rng;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Command, Engine, RunSummary};
pub use error::ConfigError;
pub use highscores::{HighScores, ScoreRecord, ScoreSink};
pub use rng::{FixedRandom, PcgRandom, RandomSource};
pub use settings::{QualityPreset, Settings};
pub use sim::{GamePhase, GameState, Snapshot, TickInput};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Largest step the simulation will integrate (seconds)
    pub const MAX_DT: f32 = 0.1;
    /// Nominal display refresh used by the headless runner
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Damping coefficients are expressed per 1/60 s
    pub const DAMPING_REFERENCE_HZ: f32 = 60.0;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Facing angle of "up" in screen space (y grows downward)
    pub const FACING_UP: f32 = -std::f32::consts::FRAC_PI_2;
}
