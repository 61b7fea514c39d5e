//! Cosmetic effect state: particles, starfield and camera shake
//!
//! Nothing here feeds back into gameplay. The simulation pushes events in
//! ("explosion at X") and advances the state with the same clock.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DAMPING_REFERENCE_HZ;
use crate::math::{VecExt, lerp};
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Debris,
    Thrust,
    ShieldHit,
    Trail,
    Collect,
    ChainSpark,
    GravitySwirl,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    /// Point the particle orbits or is drawn toward (swirl, collect)
    pub anchor: Vec2,
    pub alive: bool,
}

impl Particle {
    /// Remaining life in [0, 1] (drives fade-out)
    #[inline]
    pub fn fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn update(&mut self, dt: f32) {
        let frames = dt * DAMPING_REFERENCE_HZ;
        match self.kind {
            ParticleKind::Explosion | ParticleKind::ShieldHit | ParticleKind::ChainSpark => {
                self.vel *= 0.92f32.powf(frames);
            }
            ParticleKind::Debris => {
                self.vel *= 0.98f32.powf(frames);
            }
            ParticleKind::Thrust | ParticleKind::Trail => {
                self.vel *= 0.9f32.powf(frames);
                self.size *= 0.97f32.powf(frames);
            }
            ParticleKind::Collect => {
                // Burst outward, then get drawn back to the anchor
                let to_anchor = self.anchor - self.pos;
                self.vel += to_anchor * 6.0 * dt;
                self.vel *= 0.9f32.powf(frames);
            }
            ParticleKind::GravitySwirl => {
                // Orbit inward around the anchor
                let offset = self.pos - self.anchor;
                let tangent = Vec2::new(-offset.y, offset.x).normalized_or_self();
                self.vel = tangent * 120.0 - offset * 1.5;
            }
        }
        self.pos += self.vel * dt;
        self.life -= dt;
        if self.life <= 0.0 {
            self.alive = false;
        }
    }
}

/// Fixed-capacity particle arena
///
/// Dead slots are reused first; once full, the particle closest to expiry
/// is replaced. Capacity never grows past the configured ceiling.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|p| p.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.alive)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Change the ceiling; particles beyond it are dropped
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.slots.truncate(capacity);
    }

    pub fn spawn(&mut self, particle: Particle) {
        if self.capacity == 0 {
            return;
        }
        if let Some(slot) = self.slots.iter_mut().find(|p| !p.alive) {
            *slot = particle;
        } else if self.slots.len() < self.capacity {
            self.slots.push(particle);
        } else if let Some(oldest) = self
            .slots
            .iter_mut()
            .min_by(|a, b| a.life.partial_cmp(&b.life).unwrap_or(std::cmp::Ordering::Equal))
        {
            *oldest = particle;
        }
    }

    fn emit(
        &mut self,
        kind: ParticleKind,
        pos: Vec2,
        vel: Vec2,
        life: f32,
        size: f32,
        anchor: Vec2,
    ) {
        self.spawn(Particle {
            kind,
            pos,
            vel,
            life,
            max_life: life,
            size,
            anchor,
            alive: true,
        });
    }

    /// Radial burst; `scale` grows count, speed and size together
    pub fn explosion(&mut self, pos: Vec2, scale: f32, rng: &mut dyn RandomSource) {
        let count = (12.0 * scale).round().clamp(4.0, 96.0) as usize;
        for _ in 0..count {
            let vel = Vec2::from_heading(rng.range(0.0, TAU), rng.range(40.0, 220.0) * scale.sqrt());
            self.emit(
                ParticleKind::Explosion,
                pos,
                vel,
                rng.range(0.4, 0.9),
                rng.range(2.0, 5.0) * scale.sqrt(),
                pos,
            );
        }
    }

    /// Slow tumbling chunks
    pub fn debris(&mut self, pos: Vec2, radius: f32, rng: &mut dyn RandomSource) {
        let count = ((radius / 4.0) as usize).clamp(3, 24);
        for _ in 0..count {
            let dir = rng.range(0.0, TAU);
            self.emit(
                ParticleKind::Debris,
                pos + Vec2::from_heading(dir, radius * rng.range(0.2, 0.8)),
                Vec2::from_heading(dir, rng.range(20.0, 90.0)),
                rng.range(0.8, 1.6),
                rng.range(1.5, 3.5),
                pos,
            );
        }
    }

    /// Exhaust puff opposite to `facing`
    pub fn thrust(&mut self, pos: Vec2, facing: Vec2, rng: &mut dyn RandomSource) {
        let back = -facing.normalized_or_self();
        let vel = back.rotated_by(rng.range(-0.3, 0.3)) * rng.range(80.0, 160.0);
        self.emit(ParticleKind::Thrust, pos, vel, rng.range(0.2, 0.4), rng.range(2.0, 4.0), pos);
    }

    /// Sparks scattered along the shield surface at the impact point
    pub fn shield_hit(&mut self, center: Vec2, impact: Vec2, radius: f32, rng: &mut dyn RandomSource) {
        let normal = (impact - center).normalized_or_self();
        let contact = center + normal * radius;
        for _ in 0..10 {
            let vel = normal.rotated_by(rng.range(-1.2, 1.2)) * rng.range(60.0, 140.0);
            self.emit(ParticleKind::ShieldHit, contact, vel, rng.range(0.2, 0.45), 2.5, center);
        }
    }

    /// Stationary fading dot (beams, missile smoke)
    pub fn trail(&mut self, pos: Vec2, life: f32) {
        self.emit(ParticleKind::Trail, pos, Vec2::ZERO, life, 3.0, pos);
    }

    /// Dots along a segment (laser beams)
    pub fn beam(&mut self, from: Vec2, to: Vec2, life: f32) {
        let steps = ((to - from).length() / 12.0).ceil().clamp(1.0, 80.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.trail(from.lerp(to, t), life);
        }
    }

    /// Burst that collapses back onto the collection point
    pub fn collect(&mut self, pos: Vec2, rng: &mut dyn RandomSource) {
        for i in 0..14 {
            let angle = TAU * i as f32 / 14.0;
            self.emit(
                ParticleKind::Collect,
                pos,
                Vec2::from_heading(angle, rng.range(90.0, 150.0)),
                0.5,
                2.0,
                pos,
            );
        }
    }

    /// Sparks jumping from one blast to the next
    pub fn chain_spark(&mut self, from: Vec2, to: Vec2, rng: &mut dyn RandomSource) {
        for _ in 0..6 {
            let t = rng.next_f32();
            let pos = Vec2::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t));
            let vel = Vec2::from_heading(rng.range(0.0, TAU), rng.range(30.0, 90.0));
            self.emit(ParticleKind::ChainSpark, pos, vel, 0.3, 2.0, from);
        }
    }

    /// Particles orbiting into a gravity well
    pub fn gravity_swirl(&mut self, center: Vec2, radius: f32, rng: &mut dyn RandomSource) {
        let pos = center + Vec2::from_heading(rng.range(0.0, TAU), radius * rng.range(0.5, 1.0));
        self.emit(ParticleKind::GravitySwirl, pos, Vec2::ZERO, 0.8, 2.0, center);
    }

    pub fn update(&mut self, dt: f32) {
        for particle in self.slots.iter_mut().filter(|p| p.alive) {
            particle.update(dt);
        }
    }
}

/// A background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub brightness: f32,
    pub twinkle_phase: f32,
}

/// One parallax layer; nearer layers scroll faster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarLayer {
    pub speed: f32,
    pub stars: Vec<Star>,
}

/// Layered scrolling starfield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    pub layers: Vec<StarLayer>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(
        layers: usize,
        per_layer: usize,
        base_speed: f32,
        width: f32,
        height: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let layers = (0..layers)
            .map(|depth| {
                let near = depth as f32 + 1.0;
                StarLayer {
                    speed: base_speed * near,
                    stars: (0..per_layer)
                        .map(|_| Star {
                            pos: Vec2::new(rng.range(0.0, width), rng.range(0.0, height)),
                            size: 0.5 * near + rng.range(0.0, 0.5),
                            brightness: rng.range(0.3, 0.6) + 0.15 * depth as f32,
                            twinkle_phase: rng.range(0.0, TAU),
                        })
                        .collect(),
                }
            })
            .collect();
        Self {
            layers,
            width,
            height,
        }
    }

    /// Scroll downward; stars leaving the bottom re-enter at the top
    pub fn update(&mut self, dt: f32, rng: &mut dyn RandomSource) {
        for layer in &mut self.layers {
            for star in &mut layer.stars {
                star.pos.y += layer.speed * dt;
                star.twinkle_phase = (star.twinkle_phase + dt * 3.0) % TAU;
                if star.pos.y > self.height {
                    star.pos.y -= self.height;
                    star.pos.x = rng.range(0.0, self.width);
                }
            }
        }
    }

    /// Rescale star positions to new playfield dimensions
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.width > 0.0 && self.height > 0.0 {
            let scale = Vec2::new(width / self.width, height / self.height);
            for star in self.layers.iter_mut().flat_map(|l| l.stars.iter_mut()) {
                star.pos *= scale;
            }
        }
        self.width = width;
        self.height = height;
    }
}

/// Screen shake parameters read by the presentation layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraShake {
    pub intensity: f32,
    /// Seconds remaining
    pub remaining: f32,
}

impl CameraShake {
    /// Start or strengthen a shake; never weakens an ongoing one
    pub fn trigger(&mut self, intensity: f32, duration: f32) {
        self.intensity = self.intensity.max(intensity);
        self.remaining = self.remaining.max(duration);
    }

    /// Exponential decay, cut to zero when the time runs out
    pub fn update(&mut self, dt: f32, decay: f32) {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.intensity = 0.0;
            return;
        }
        self.intensity *= decay.powf(dt * DAMPING_REFERENCE_HZ);
        if self.intensity < 0.01 {
            self.intensity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRandom;

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut rng = PcgRandom::new(1);
        let mut pool = ParticlePool::new(32);
        for _ in 0..10 {
            pool.explosion(Vec2::ZERO, 2.0, &mut rng);
        }
        assert_eq!(pool.len(), 32);
        assert!(pool.slots.len() <= 32);
    }

    #[test]
    fn test_pool_replaces_closest_to_expiry() {
        let mut pool = ParticlePool::new(2);
        pool.trail(Vec2::ZERO, 1.0);
        pool.trail(Vec2::ONE, 0.2);
        pool.trail(Vec2::new(5.0, 5.0), 2.0);
        let lives: Vec<f32> = pool.iter().map(|p| p.life).collect();
        assert_eq!(lives.len(), 2);
        assert!(lives.contains(&1.0));
        assert!(lives.contains(&2.0));
    }

    #[test]
    fn test_dead_slots_are_reused() {
        let mut pool = ParticlePool::new(4);
        pool.trail(Vec2::ZERO, 0.1);
        pool.update(0.2);
        assert!(pool.is_empty());
        pool.trail(Vec2::ZERO, 1.0);
        assert_eq!(pool.slots.len(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_zero_capacity_is_silent() {
        let mut rng = PcgRandom::new(1);
        let mut pool = ParticlePool::new(0);
        pool.explosion(Vec2::ZERO, 1.0, &mut rng);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_starfield_wraps_and_resizes() {
        let mut rng = PcgRandom::new(4);
        let mut field = Starfield::new(3, 10, 20.0, 800.0, 600.0, &mut rng);
        assert_eq!(field.layers.len(), 3);
        assert!(field.layers[2].speed > field.layers[0].speed);
        for _ in 0..600 {
            field.update(0.1, &mut rng);
        }
        for star in field.layers.iter().flat_map(|l| &l.stars) {
            assert!(star.pos.y >= 0.0 && star.pos.y <= 600.0);
        }
        field.resize(400.0, 300.0);
        for star in field.layers.iter().flat_map(|l| &l.stars) {
            assert!(star.pos.x <= 400.0 && star.pos.y <= 300.0);
        }
    }

    #[test]
    fn test_camera_shake_decays_to_zero() {
        let mut shake = CameraShake::default();
        shake.trigger(1.0, 0.5);
        shake.trigger(0.3, 0.1);
        assert_eq!(shake.intensity, 1.0);
        shake.update(0.1, 0.9);
        assert!(shake.intensity < 1.0 && shake.intensity > 0.0);
        shake.update(0.5, 0.9);
        assert_eq!(shake.intensity, 0.0);
    }
}
