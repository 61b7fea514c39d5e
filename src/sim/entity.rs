//! Entity identity shared across the typed collections
//!
//! Each entity type lives in its own `Vec` on `GameState` and embeds a
//! `PhysicsBody`. `EntityKey` tags an id with its kind so mixed sets (broad
//! phase buckets, raycast candidates) can refer to any of them.

use serde::{Deserialize, Serialize};

/// Unique id handed out by `GameState::next_entity_id`
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Obstacle,
    Projectile,
    Pickup,
}

/// Kind-tagged entity id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityKey {
    pub const fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub const fn obstacle(id: EntityId) -> Self {
        Self::new(EntityKind::Obstacle, id)
    }
}
