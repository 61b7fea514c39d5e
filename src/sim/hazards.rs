//! Environmental hazards
//!
//! Hazards are areas rather than entities: they drift slowly downward and
//! act on whatever is inside them until their time runs out.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::obstacle::{Obstacle, SizeClass};
use super::state::GameState;
use crate::rng::{RandomSource, weighted_index};
use crate::tuning::{HazardTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Pulls obstacles and projectiles toward its center after a warm-up
    GravityWell,
    /// Drags everything inside toward rest
    SlowField,
    /// Spawns small meteors at a fixed cadence
    MeteorBurst,
}

impl HazardKind {
    pub const ALL: [HazardKind; 3] = [
        HazardKind::GravityWell,
        HazardKind::SlowField,
        HazardKind::MeteorBurst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardKind::GravityWell => "gravity well",
            HazardKind::SlowField => "slow field",
            HazardKind::MeteorBurst => "meteor burst",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: EntityId,
    pub kind: HazardKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Seconds since spawn
    pub age: f32,
    /// Telegraph time before the hazard acts
    pub warmup: f32,
    /// Active time after the warm-up
    pub duration: f32,
    /// Meteor burst: seconds until the next meteor
    pub burst_timer: f32,
    /// Meteor burst: meteors left to spawn
    pub burst_remaining: u32,
}

impl Hazard {
    pub fn new(id: EntityId, kind: HazardKind, position: Vec2, cfg: &HazardTuning) -> Self {
        let (radius, warmup, duration) = match kind {
            HazardKind::GravityWell => (cfg.gravity_radius, cfg.gravity_warmup, cfg.gravity_duration),
            HazardKind::SlowField => (cfg.slow_radius, 0.0, cfg.slow_duration),
            HazardKind::MeteorBurst => (cfg.burst_radius, 0.0, cfg.burst_duration),
        };
        Self {
            id,
            kind,
            position,
            velocity: Vec2::new(0.0, cfg.drift_speed),
            radius,
            age: 0.0,
            warmup,
            duration,
            burst_timer: 0.0,
            burst_remaining: if kind == HazardKind::MeteorBurst { cfg.burst_count } else { 0 },
        }
    }

    /// Past the warm-up and not yet expired
    #[inline]
    pub fn is_active(&self) -> bool {
        self.age >= self.warmup && !self.is_expired()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.warmup + self.duration
    }

    /// Fully below the bottom edge
    pub fn has_left_playfield(&self, height: f32) -> bool {
        self.position.y - self.radius > height
    }

    /// Force a gravity well exerts on a body of `mass` at `pos`
    ///
    /// Acceleration falls off with distance and is capped near the center so
    /// nothing is flung out at infinite speed.
    pub fn gravity_force(&self, pos: Vec2, mass: f32, strength: f32) -> Vec2 {
        let offset = self.position - pos;
        let dist = offset.length();
        if dist == 0.0 || dist > self.radius {
            return Vec2::ZERO;
        }
        let accel = strength / dist.max(self.radius * 0.1);
        offset / dist * accel * mass
    }
}

/// Spawn timer, per-hazard forces, meteor spawning and expiry
pub fn update_hazards(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, dt: f32) {
    let cfg = &tuning.hazards;

    if state.wave >= cfg.start_wave {
        state.waves.hazard_timer -= dt;
        if state.waves.hazard_timer <= 0.0 {
            state.waves.hazard_timer += cfg.interval;
            if state.hazards.len() < cfg.max_active {
                spawn_hazard(state, cfg, rng);
            }
        }
    }

    let mut meteors = Vec::new();
    for hazard in &mut state.hazards {
        hazard.age += dt;
        hazard.position += hazard.velocity * dt;
        if !hazard.is_active() {
            continue;
        }
        match hazard.kind {
            HazardKind::GravityWell => {
                for obstacle in state.obstacles.iter_mut().filter(|o| !o.boss) {
                    let mass = obstacle.body.mass;
                    let force = hazard.gravity_force(obstacle.position(), mass, cfg.gravity_strength);
                    obstacle.body.apply_force(force);
                }
                for projectile in &mut state.projectiles {
                    let mass = projectile.body.mass;
                    let force = hazard.gravity_force(projectile.position(), mass, cfg.gravity_strength);
                    projectile.body.apply_force(force);
                }
                state.particles.gravity_swirl(hazard.position, hazard.radius, rng);
            }
            HazardKind::SlowField => {
                let inside = |pos: Vec2| pos.distance_squared(hazard.position) < hazard.radius * hazard.radius;
                for body in state
                    .obstacles
                    .iter_mut()
                    .filter(|o| !o.boss)
                    .map(|o| &mut o.body)
                    .chain(state.projectiles.iter_mut().map(|p| &mut p.body))
                    .filter(|b| inside(b.position))
                {
                    let drag = -body.velocity * cfg.slow_drag * body.mass;
                    body.apply_force(drag);
                }
            }
            HazardKind::MeteorBurst => {
                hazard.burst_timer -= dt;
                if hazard.burst_timer <= 0.0 && hazard.burst_remaining > 0 {
                    hazard.burst_timer += cfg.burst_interval;
                    hazard.burst_remaining -= 1;
                    let offset = Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0)) * hazard.radius;
                    meteors.push(hazard.position + offset);
                }
            }
        }
    }

    let difficulty = state.waves.difficulty;
    for position in meteors {
        let velocity = Vec2::new(
            rng.range(-tuning.obstacles.drift, tuning.obstacles.drift),
            tuning.obstacles.max_fall_speed * 1.5,
        );
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            SizeClass::Small,
            position,
            velocity,
            tuning,
            difficulty,
            rng,
        ));
    }

    let height = state.height;
    state.hazards.retain(|h| {
        let keep = !h.is_expired() && !h.has_left_playfield(height);
        if !keep {
            log::debug!("Hazard {} ({}) expired", h.id, h.kind.as_str());
        }
        keep
    });
}

fn spawn_hazard(state: &mut GameState, cfg: &HazardTuning, rng: &mut dyn RandomSource) {
    let kind = HazardKind::ALL[weighted_index(rng, &cfg.kind_weights)];
    let margin = (state.width * 0.2).min(150.0);
    let position = Vec2::new(
        rng.range(margin, state.width - margin),
        rng.range(state.height * 0.15, state.height * 0.45),
    );
    let id = state.next_entity_id();
    log::debug!(
        "Hazard {} ({}) at ({:.0}, {:.0}) on wave {}",
        id,
        kind.as_str(),
        position.x,
        position.y,
        state.wave
    );
    state.hazards.push(Hazard::new(id, kind, position, cfg));
}
