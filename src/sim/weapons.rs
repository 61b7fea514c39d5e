//! Weapon modes and firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::raycast;
use super::projectile::Projectile;
use super::state::GameState;
use crate::math::VecExt;
use crate::rng::RandomSource;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    /// Single bolt (the default weapon)
    #[default]
    Blaster,
    /// Instant hit-scan beam
    Laser,
    /// Homing rockets
    Missile,
    /// Fan of short-lived pellets
    Shotgun,
}

impl WeaponMode {
    /// Modes a weapon pickup can grant
    pub const TIMED: [WeaponMode; 3] = [WeaponMode::Laser, WeaponMode::Missile, WeaponMode::Shotgun];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponMode::Blaster => "blaster",
            WeaponMode::Laser => "laser",
            WeaponMode::Missile => "missile",
            WeaponMode::Shotgun => "shotgun",
        }
    }
}

/// Current weapon and how long a timed swap has left
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveWeapon {
    pub mode: WeaponMode,
    /// Seconds until reverting to the blaster (0 for the blaster)
    pub remaining: f32,
}

impl ActiveWeapon {
    pub fn equip(&mut self, mode: WeaponMode, duration: f32) {
        self.mode = mode;
        self.remaining = if mode == WeaponMode::Blaster { 0.0 } else { duration };
    }

    /// Count down a timed weapon; returns true when it reverts
    pub fn update(&mut self, dt: f32) -> bool {
        if self.mode == WeaponMode::Blaster {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.mode = WeaponMode::Blaster;
            self.remaining = 0.0;
            return true;
        }
        false
    }
}

/// Fire the active weapon if the cooldown allows; returns true if it fired
///
/// Projectiles leave the nose of the craft along its facing. The laser
/// resolves immediately: the closest obstacle along the beam takes the hit,
/// and anything it destroys is reaped with the other kills this step.
pub fn fire(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) -> bool {
    if state.player.fire_cooldown > 0.0 || !state.player.is_alive() {
        return false;
    }
    let mode = state.weapon.mode;
    let stats = *tuning.weapon_stats(mode);
    let player = &state.player;
    let facing = player.body.forward();
    let muzzle = player.position() + facing * (player.radius + stats.radius);
    let damage = stats.damage * player.stats.damage;
    state.player.fire_cooldown = stats.cooldown / state.player.stats.fire_rate.max(0.01);

    match mode {
        WeaponMode::Blaster => {
            let id = state.next_entity_id();
            state.projectiles.push(Projectile::new(
                id,
                muzzle,
                facing * stats.speed,
                stats.radius,
                damage,
                stats.lifetime,
            ));
        }
        WeaponMode::Missile => {
            let id = state.next_entity_id();
            let missile = Projectile::new(
                id,
                muzzle,
                facing * stats.speed,
                stats.radius,
                damage,
                stats.lifetime,
            )
            .with_homing(tuning.weapons.homing_strength);
            state.projectiles.push(missile);
        }
        WeaponMode::Shotgun => {
            let pellets = tuning.weapons.shotgun_pellets.max(1);
            let spread = tuning.weapons.shotgun_spread;
            for i in 0..pellets {
                let offset = if pellets == 1 {
                    0.0
                } else {
                    -spread * 0.5 + spread * i as f32 / (pellets - 1) as f32
                };
                let velocity = facing.rotated_by(offset) * stats.speed;
                let id = state.next_entity_id();
                state.projectiles.push(Projectile::new(
                    id,
                    muzzle,
                    velocity,
                    stats.radius,
                    damage,
                    stats.lifetime,
                ));
            }
        }
        WeaponMode::Laser => fire_laser(state, muzzle, facing, damage, tuning, rng),
    }
    true
}

fn fire_laser(
    state: &mut GameState,
    origin: Vec2,
    direction: Vec2,
    damage: f32,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) {
    let range = tuning.weapons.laser_range;
    let candidates = state
        .obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.is_destroyed())
        .map(|(i, o)| (i, o.position(), o.radius));
    let hit = raycast(origin, direction, range, candidates);

    let end = hit.map_or(origin + direction * range, |h| h.point);
    let beam_life = tuning.weapon_stats(WeaponMode::Laser).lifetime.max(0.05);
    state.particles.beam(origin, end, beam_life);

    if let Some(hit) = hit {
        let obstacle = &mut state.obstacles[hit.key];
        obstacle.take_damage(damage, tuning.obstacles.max_cracks, rng);
        state.particles.explosion(hit.point, 0.4, rng);
    }
}
