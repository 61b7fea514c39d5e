//! Physics body shared by every simulated entity
//!
//! Semi-implicit Euler integration with force/torque accumulators. Damping
//! coefficients are "velocity retained per 1/60 s" and are raised to
//! `dt * 60` so the decay does not depend on the frame rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DAMPING_REFERENCE_HZ;
use crate::math::{VecExt, angle_delta, normalize_angle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Acceleration from the last integration step (derived, read-only)
    pub acceleration: Vec2,
    /// Accumulated force, cleared every step
    pub force: Vec2,
    pub mass: f32,
    /// 0 for static or massless bodies
    pub inverse_mass: f32,
    /// Orientation in radians
    pub angle: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    /// Accumulated torque, cleared every step
    pub torque: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub is_static: bool,
}

impl PhysicsBody {
    /// A dynamic body at rest
    pub fn new(position: Vec2, mass: f32) -> Self {
        let inverse_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            inverse_mass,
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            torque: 0.0,
            linear_damping: 1.0,
            angular_damping: 1.0,
            restitution: 0.5,
            is_static: false,
        }
    }

    /// An immovable body (infinite mass)
    pub fn fixed(position: Vec2) -> Self {
        Self {
            inverse_mass: 0.0,
            is_static: true,
            ..Self::new(position, 0.0)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// True when forces and impulses cannot move this body
    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.is_static || self.inverse_mass == 0.0
    }

    /// Accumulate a force for the next integration step
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
    }

    /// Instantly change velocity by `impulse / mass`
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if self.is_immovable() {
            return;
        }
        self.velocity += impulse * self.inverse_mass;
    }

    /// Apply a force at a world-space point, producing torque about the center
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        if self.is_static {
            return;
        }
        self.force += force;
        self.torque += (point - self.position).cross(force);
    }

    pub fn apply_torque(&mut self, torque: f32) {
        if self.is_static {
            return;
        }
        self.torque += torque;
    }

    /// Advance one step (semi-implicit Euler)
    pub fn integrate(&mut self, dt: f32) {
        if self.is_static {
            self.clear_accumulators();
            return;
        }

        let frames = dt * DAMPING_REFERENCE_HZ;

        self.acceleration = self.force * self.inverse_mass;
        self.velocity += self.acceleration * dt;
        self.velocity *= self.linear_damping.powf(frames);
        self.position += self.velocity * dt;

        // Torque uses the same inverse-mass scaling as linear force
        self.angular_acceleration = self.torque * self.inverse_mass;
        self.angular_velocity += self.angular_acceleration * dt;
        self.angular_velocity *= self.angular_damping.powf(frames);
        self.angle = normalize_angle(self.angle + self.angular_velocity * dt);

        self.clear_accumulators();
    }

    fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Unit vector the body faces
    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_heading(self.angle, 1.0)
    }

    /// Unit vector 90° clockwise on screen (y down) from `forward`
    #[inline]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(-f.y, f.x)
    }

    /// Snap orientation to face `target`
    pub fn look_at(&mut self, target: Vec2) {
        let to_target = target - self.position;
        if to_target.length_squared() > 0.0 {
            self.angle = to_target.heading();
        }
    }

    /// Turn toward `target_angle` by at most `max_rate * dt`
    pub fn rotate_towards(&mut self, target_angle: f32, max_rate: f32, dt: f32) {
        let max_delta = max_rate * dt;
        let delta = angle_delta(self.angle, target_angle).clamp(-max_delta, max_delta);
        self.angle = normalize_angle(self.angle + delta);
    }
}
