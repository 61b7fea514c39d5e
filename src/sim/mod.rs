//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same tuning, the same random
//! source and the same sequence of inputs and step durations, a run always
//! plays out identically:
//! - Randomness only through the injected `RandomSource`
//! - Stable iteration order (entity vectors, FIFO chain queue)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod entity;
pub mod hazards;
pub mod obstacle;
pub mod pickup;
pub mod player;
pub mod progression;
pub mod projectile;
pub mod spatial;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapons;

pub use body::PhysicsBody;
pub use combat::ChainBlast;
pub use effects::{CameraShake, Particle, ParticleKind, ParticlePool, Starfield};
pub use entity::{EntityId, EntityKey, EntityKind};
pub use hazards::{Hazard, HazardKind};
pub use obstacle::{Obstacle, SizeClass};
pub use pickup::{Pickup, PickupKind};
pub use player::{Player, Shield};
pub use progression::{Combo, Progression, StatUpgrade};
pub use projectile::Projectile;
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
pub use weapons::{ActiveWeapon, WeaponMode};
