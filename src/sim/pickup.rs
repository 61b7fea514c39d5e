//! Power-up pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::entity::EntityId;
use crate::rng::{RandomSource, weighted_index};
use crate::tuning::PickupTuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Shield,
    Weapon,
    Speed,
}

impl PickupKind {
    /// Fixed category order used by weighted selection
    pub const ALL: [PickupKind; 4] = [
        PickupKind::Health,
        PickupKind::Shield,
        PickupKind::Weapon,
        PickupKind::Speed,
    ];

    pub fn roll(rng: &mut dyn RandomSource, weights: &[f32; 4]) -> Self {
        Self::ALL[weighted_index(rng, weights)]
    }
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub body: PhysicsBody,
    pub radius: f32,
    /// Seconds remaining before expiry
    pub lifetime: f32,
    /// Set on first collection so the effect never applies twice
    pub collected: bool,
}

impl Pickup {
    pub fn new(id: EntityId, kind: PickupKind, position: Vec2, velocity: Vec2, cfg: &PickupTuning) -> Self {
        Self {
            id,
            kind,
            body: PhysicsBody::new(position, 1.0)
                .with_velocity(velocity)
                .with_restitution(cfg.restitution),
            radius: cfg.radius,
            lifetime: cfg.lifetime,
            collected: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Integrate and count down; returns false once expired or collected
    pub fn update(&mut self, dt: f32) -> bool {
        self.body.integrate(dt);
        self.lifetime -= dt;
        self.lifetime > 0.0 && !self.collected
    }

    /// Claim this pickup; returns false if it was already collected
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}
