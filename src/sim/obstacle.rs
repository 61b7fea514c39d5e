//! Obstacles (asteroids) and the boss
//!
//! Collision uses the circle `radius`; the silhouette and crack list are
//! render-only. Radius and mass are fixed at spawn: splitting creates new
//! obstacles of the next-smaller class.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::entity::EntityId;
use crate::math::VecExt;
use crate::rng::RandomSource;
use crate::tuning::{SizeStats, Tuning};

/// Discrete obstacle size, ordered smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeClass {
    /// Fixed category order used by weighted selection
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Large,
        SizeClass::Huge,
    ];

    /// Class fragments split into; `None` for the smallest
    pub fn smaller(self) -> Option<SizeClass> {
        match self {
            SizeClass::Small => None,
            SizeClass::Medium => Some(SizeClass::Small),
            SizeClass::Large => Some(SizeClass::Medium),
            SizeClass::Huge => Some(SizeClass::Large),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
            SizeClass::Huge => "huge",
        }
    }
}

/// A surface crack drawn after a non-lethal hit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Crack {
    /// Direction from the center (local space)
    pub angle: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub body: PhysicsBody,
    pub size: SizeClass,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Damage dealt to the player on contact
    pub damage: f32,
    /// Score before the combo multiplier
    pub score: u64,
    pub xp: u32,
    pub boss: bool,
    /// Local-space outline (render only)
    pub silhouette: Vec<Vec2>,
    pub cracks: Vec<Crack>,
    /// Seconds since spawn
    pub age: f32,
    /// 1.0 right after a hit, decays to 0 (render only)
    pub hit_flash: f32,
    /// Seconds during which this fragment of a ram cannot hit the player
    #[serde(default)]
    pub ram_grace: f32,
}

impl Obstacle {
    #[allow(clippy::too_many_arguments)]
    fn from_stats(
        id: EntityId,
        size: SizeClass,
        stats: &SizeStats,
        position: Vec2,
        velocity: Vec2,
        tuning: &Tuning,
        difficulty: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let spin = tuning.obstacles.max_spin;
        let body = PhysicsBody::new(position, stats.mass)
            .with_velocity(velocity)
            .with_restitution(tuning.obstacles.restitution)
            .with_angle(rng.range(0.0, TAU));
        let mut obstacle = Self {
            id,
            body,
            size,
            radius: stats.radius,
            health: stats.health * difficulty.max(1.0),
            max_health: stats.health * difficulty.max(1.0),
            damage: stats.damage,
            score: stats.score,
            xp: stats.xp,
            boss: false,
            silhouette: generate_silhouette(stats.radius, tuning.obstacles.vertices, rng),
            cracks: Vec::new(),
            age: 0.0,
            hit_flash: 0.0,
            ram_grace: 0.0,
        };
        obstacle.body.angular_velocity = rng.range(-spin, spin);
        obstacle
    }

    /// A regular obstacle of the given size class
    pub fn new(
        id: EntityId,
        size: SizeClass,
        position: Vec2,
        velocity: Vec2,
        tuning: &Tuning,
        difficulty: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let stats = *tuning.size_stats(size);
        Self::from_stats(id, size, &stats, position, velocity, tuning, difficulty, rng)
    }

    /// The boss: a huge-class obstacle with its own stat overrides
    pub fn boss(
        id: EntityId,
        position: Vec2,
        tuning: &Tuning,
        difficulty: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let stats = tuning.obstacles.boss;
        let velocity = Vec2::new(0.0, tuning.obstacles.boss_fall_speed);
        let mut boss = Self::from_stats(
            id,
            SizeClass::Huge,
            &stats,
            position,
            velocity,
            tuning,
            difficulty,
            rng,
        );
        boss.boss = true;
        boss.body.angular_velocity *= 0.25;
        boss
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Apply damage; returns true if this hit destroyed the obstacle
    pub fn take_damage(&mut self, amount: f32, max_cracks: usize, rng: &mut dyn RandomSource) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health -= amount.max(0.0);
        self.hit_flash = 1.0;

        if self.is_destroyed() {
            return true;
        }
        if self.cracks.len() < max_cracks {
            self.cracks.push(Crack {
                angle: rng.range(0.0, TAU),
                length: self.radius * rng.range(0.3, 0.9),
            });
        }
        false
    }

    /// Mark destroyed regardless of remaining health (player ram)
    pub fn shatter(&mut self) {
        self.health = 0.0;
    }

    /// Advance motion, boss sway and cosmetic timers
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.age += dt;
        if self.boss {
            let phase = self.age * tuning.obstacles.boss_sway_frequency * TAU;
            self.body.velocity = Vec2::new(
                tuning.obstacles.boss_sway * phase.cos(),
                tuning.obstacles.boss_fall_speed,
            );
        }
        self.body.integrate(dt);
        self.hit_flash = (self.hit_flash - dt * 4.0).max(0.0);
        self.ram_grace = (self.ram_grace - dt).max(0.0);
    }

    /// Left the playfield through the bottom, or drifted far above the top
    pub fn has_left_playfield(&self, height: f32, top_margin: f32) -> bool {
        let y = self.body.position.y;
        y - self.radius > height || y + self.radius < -top_margin
    }

    /// Fragments produced when this obstacle is destroyed
    ///
    /// Bosses and the smallest class produce none. Otherwise 2–3 fragments
    /// of the next class fan out around a full circle with jitter, each
    /// inheriting part of the parent velocity plus a radial kick.
    pub fn split(
        &self,
        tuning: &Tuning,
        difficulty: f32,
        rng: &mut dyn RandomSource,
        mut next_id: impl FnMut() -> EntityId,
    ) -> Vec<Obstacle> {
        if self.boss {
            return Vec::new();
        }
        let Some(child) = self.size.smaller() else {
            return Vec::new();
        };

        let count = if rng.chance(0.5) { 3 } else { 2 };
        let step = TAU / count as f32;
        let base = rng.range(0.0, TAU);
        let cfg = &tuning.obstacles;

        (0..count)
            .map(|i| {
                let angle = base + step * i as f32 + rng.range(-cfg.split_jitter, cfg.split_jitter);
                let kick = rng.range(cfg.split_kick_min, cfg.split_kick_max);
                let velocity =
                    self.body.velocity * cfg.split_inherit + Vec2::from_heading(angle, kick);
                let position = self.body.position + Vec2::from_heading(angle, self.radius * 0.5);
                Obstacle::new(next_id(), child, position, velocity, tuning, difficulty, rng)
            })
            .collect()
    }
}

/// Jagged outline: evenly spaced vertices with radial jitter
fn generate_silhouette(radius: f32, vertices: usize, rng: &mut dyn RandomSource) -> Vec<Vec2> {
    let step = TAU / vertices.max(3) as f32;
    (0..vertices.max(3))
        .map(|i| Vec2::from_heading(step * i as f32, radius * rng.range(0.75, 1.15)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRandom, PcgRandom};

    fn obstacle(size: SizeClass) -> Obstacle {
        let tuning = Tuning::default();
        let mut rng = PcgRandom::new(1);
        Obstacle::new(1, size, Vec2::new(100.0, 100.0), Vec2::new(0.0, 50.0), &tuning, 1.0, &mut rng)
    }

    #[test]
    fn test_size_order() {
        assert!(SizeClass::Small < SizeClass::Medium);
        assert!(SizeClass::Large < SizeClass::Huge);
        assert_eq!(SizeClass::Huge.smaller(), Some(SizeClass::Large));
        assert_eq!(SizeClass::Small.smaller(), None);
    }

    #[test]
    fn test_medium_splits_into_small() {
        let tuning = Tuning::default();
        let parent = obstacle(SizeClass::Medium);
        for seed in 0..20 {
            let mut rng = PcgRandom::new(seed);
            let mut id = 10;
            let fragments = parent.split(&tuning, 1.0, &mut rng, || {
                id += 1;
                id
            });
            assert!((2..=3).contains(&fragments.len()));
            assert!(fragments.iter().all(|f| f.size == SizeClass::Small));
            assert!(fragments.iter().all(|f| f.radius == tuning.obstacles.small.radius));
        }
    }

    #[test]
    fn test_small_and_boss_do_not_split() {
        let tuning = Tuning::default();
        let mut rng = PcgRandom::new(3);
        assert!(obstacle(SizeClass::Small).split(&tuning, 1.0, &mut rng, || 0).is_empty());

        let boss = Obstacle::boss(2, Vec2::ZERO, &tuning, 1.0, &mut rng);
        assert!(boss.split(&tuning, 1.0, &mut rng, || 0).is_empty());
    }

    #[test]
    fn test_fragments_fan_out() {
        let tuning = Tuning::default();
        let parent = obstacle(SizeClass::Large);
        // Midpoint samples: two fragments, zero jitter
        let mut rng = FixedRandom::constant(0.5);
        let fragments = parent.split(&tuning, 1.0, &mut rng, || 5);
        assert_eq!(fragments.len(), 2);
        let offsets: Vec<Vec2> = fragments
            .iter()
            .map(|f| f.position() - parent.position())
            .collect();
        for pair in offsets.windows(2) {
            let gap = crate::math::angle_delta(pair[0].heading(), pair[1].heading()).abs();
            assert!((gap - TAU / 2.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_damage_grows_cracks_and_destroys() {
        let mut rng = PcgRandom::new(9);
        let mut rock = obstacle(SizeClass::Medium);
        let start = rock.health;
        assert!(!rock.take_damage(5.0, 8, &mut rng));
        assert_eq!(rock.cracks.len(), 1);
        assert!(rock.health < start);
        // Negative damage never heals
        rock.take_damage(-50.0, 8, &mut rng);
        assert_eq!(rock.health, start - 5.0);
        assert!(rock.take_damage(1000.0, 8, &mut rng));
        assert!(rock.is_destroyed());
        // Already destroyed: no second kill
        assert!(!rock.take_damage(10.0, 8, &mut rng));
    }

    #[test]
    fn test_radius_fixed_after_damage() {
        let mut rng = PcgRandom::new(2);
        let mut rock = obstacle(SizeClass::Huge);
        let (radius, mass) = (rock.radius, rock.body.mass);
        rock.take_damage(10.0, 8, &mut rng);
        assert_eq!(rock.radius, radius);
        assert_eq!(rock.body.mass, mass);
    }

    #[test]
    fn test_left_playfield() {
        let mut rock = obstacle(SizeClass::Small);
        assert!(!rock.has_left_playfield(600.0, 200.0));
        rock.body.position.y = 700.0;
        assert!(rock.has_left_playfield(600.0, 200.0));
        rock.body.position.y = -300.0;
        assert!(rock.has_left_playfield(600.0, 200.0));
    }
}
