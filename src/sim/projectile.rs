//! Projectiles fired by the player

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::entity::EntityId;
use super::obstacle::Obstacle;
use crate::math::VecExt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub body: PhysicsBody,
    pub radius: f32,
    pub damage: f32,
    /// Seconds remaining before expiry
    pub lifetime: f32,
    /// Steering strength (1/s) when homing
    pub homing: Option<f32>,
    /// Cleared on hit; dead projectiles are removed at the end of the step
    pub alive: bool,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        damage: f32,
        lifetime: f32,
    ) -> Self {
        let body = PhysicsBody::new(position, 0.1)
            .with_velocity(velocity)
            .with_angle(velocity.heading());
        Self {
            id,
            body,
            radius,
            damage,
            lifetime,
            homing: None,
            alive: true,
        }
    }

    pub fn with_homing(mut self, strength: f32) -> Self {
        self.homing = Some(strength);
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Steer toward the nearest live obstacle at the current speed
    ///
    /// Velocity moves toward the desired velocity by `strength * dt` of the
    /// difference each step, never snapping outright.
    pub fn steer(&mut self, obstacles: &[Obstacle], dt: f32) {
        let Some(strength) = self.homing else {
            return;
        };
        let pos = self.body.position;
        let nearest = obstacles
            .iter()
            .filter(|o| !o.is_destroyed())
            .min_by(|a, b| {
                a.position()
                    .distance_squared(pos)
                    .partial_cmp(&b.position().distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let Some(target) = nearest else {
            return;
        };

        let speed = self.body.speed();
        let desired = (target.position() - pos).normalized_or_self() * speed;
        let blend = (strength * dt).min(1.0);
        self.body.velocity += (desired - self.body.velocity) * blend;
        if self.body.velocity.length_squared() > 0.0 {
            self.body.angle = self.body.velocity.heading();
        }
    }

    /// Integrate and count down; returns false once expired
    pub fn update(&mut self, dt: f32) -> bool {
        self.body.integrate(dt);
        self.lifetime -= dt;
        self.lifetime > 0.0
    }

    /// Outside the playfield by more than its radius
    pub fn is_off_playfield(&self, width: f32, height: f32) -> bool {
        let p = self.body.position;
        p.x < -self.radius || p.x > width + self.radius || p.y < -self.radius || p.y > height + self.radius
    }
}
