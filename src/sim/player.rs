//! The player's craft

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use crate::consts::FACING_UP;
use crate::tuning::PlayerTuning;

/// Trail point for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// 1.0 when recorded, fades to 0
    pub opacity: f32,
}

/// Energy shield
///
/// While up with strength left it absorbs every hit in full. It drains while
/// up and regenerates while down. A pickup can "charge" it: for the charge
/// duration it stays up, costs nothing and absorbs everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub strength: f32,
    pub max_strength: f32,
    pub regen_rate: f32,
    pub depletion_rate: f32,
    pub active: bool,
    /// Seconds of charged override remaining
    pub charge_timer: f32,
}

impl Shield {
    pub fn new(cfg: &PlayerTuning) -> Self {
        Self {
            strength: cfg.shield_max,
            max_strength: cfg.shield_max,
            regen_rate: cfg.shield_regen,
            depletion_rate: cfg.shield_depletion,
            active: false,
            charge_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_charged(&self) -> bool {
        self.charge_timer > 0.0
    }

    /// Up and able to absorb a hit
    #[inline]
    pub fn is_absorbing(&self) -> bool {
        self.active && (self.strength > 0.0 || self.is_charged())
    }

    /// Flip the shield; raising it needs some strength left
    pub fn toggle(&mut self) {
        if self.active {
            self.active = false;
            self.charge_timer = 0.0;
        } else if self.strength > 0.0 {
            self.active = true;
        }
    }

    /// Start a charged override, refilling strength
    pub fn charge(&mut self, duration: f32) {
        self.strength = self.max_strength;
        self.charge_timer = duration;
        self.active = true;
    }

    /// Absorb `amount`; the shield drops when strength runs out
    fn absorb(&mut self, amount: f32) {
        if self.is_charged() {
            return;
        }
        self.strength = (self.strength - amount).max(0.0);
        if self.strength <= 0.0 {
            self.active = false;
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_charged() {
            self.charge_timer -= dt;
            if self.charge_timer <= 0.0 {
                self.charge_timer = 0.0;
                self.active = false;
            }
            return;
        }
        if self.active {
            self.strength -= self.depletion_rate * dt;
            if self.strength <= 0.0 {
                self.strength = 0.0;
                self.active = false;
            }
        } else {
            self.strength = (self.strength + self.regen_rate * dt).min(self.max_strength);
        }
    }
}

/// Multipliers granted by level-up upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub damage: f32,
    pub fire_rate: f32,
    pub speed: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            damage: 1.0,
            fire_rate: 1.0,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: PhysicsBody,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Seconds of damage immunity remaining
    pub invulnerable: f32,
    /// Immunity granted per health hit
    pub invulnerability: f32,
    pub shield: Shield,
    /// Seconds until the weapon can fire again
    pub fire_cooldown: f32,
    /// Base speed cap (pickups raise it permanently)
    pub max_speed: f32,
    pub stats: PlayerStats,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
    trail_length: usize,
}

impl Player {
    pub fn new(position: Vec2, cfg: &PlayerTuning) -> Self {
        Self {
            body: PhysicsBody::new(position, cfg.mass)
                .with_damping(cfg.linear_damping, cfg.angular_damping)
                .with_restitution(cfg.restitution)
                .with_angle(FACING_UP),
            radius: cfg.radius,
            health: cfg.max_health,
            max_health: cfg.max_health,
            invulnerable: 0.0,
            invulnerability: cfg.invulnerability,
            shield: Shield::new(cfg),
            fire_cooldown: 0.0,
            max_speed: cfg.max_speed,
            stats: PlayerStats::default(),
            trail: Vec::with_capacity(cfg.trail_length),
            trail_length: cfg.trail_length,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Speed cap after upgrades
    #[inline]
    pub fn speed_cap(&self) -> f32 {
        self.max_speed * self.stats.speed
    }

    /// Apply incoming damage; returns true if this hit destroyed the craft
    ///
    /// An absorbing shield takes the whole hit. Otherwise health drops and
    /// a short immunity window starts.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || !self.is_alive() {
            return false;
        }
        if self.shield.is_absorbing() {
            self.shield.absorb(amount);
            return false;
        }
        if self.invulnerable > 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.invulnerable = self.invulnerability;
        !self.is_alive()
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Count down immunity, weapon cooldown and shield state
    pub fn update_timers(&mut self, dt: f32) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.shield.update(dt);
    }

    /// Record current position to trail and fade older samples
    pub fn record_trail(&mut self, fade_per_sec: f32, dt: f32) {
        for point in &mut self.trail {
            point.opacity = (point.opacity - fade_per_sec * dt).max(0.0);
        }
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.body.position,
                opacity: 1.0,
            },
        );
        self.trail.truncate(self.trail_length);
    }

    /// Change how many trail samples are kept (0 disables the trail)
    pub fn set_trail_length(&mut self, length: usize) {
        self.trail_length = length;
        self.trail.truncate(length);
    }

    /// Clear trail (on wrap-around teleport)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(400.0, 540.0), &PlayerTuning::default())
    }

    #[test]
    fn test_shield_absorbs_until_depleted() {
        let mut p = player();
        p.shield.toggle();
        assert!(p.shield.active);

        assert!(!p.take_damage(60.0));
        assert_eq!(p.health, 100.0);
        assert_eq!(p.shield.strength, 40.0);

        // Overkill on the shield still costs no health
        assert!(!p.take_damage(60.0));
        assert_eq!(p.health, 100.0);
        assert_eq!(p.shield.strength, 0.0);
        assert!(!p.shield.active);

        assert!(!p.take_damage(30.0));
        assert_eq!(p.health, 70.0);
    }

    #[test]
    fn test_invulnerability_window() {
        let mut p = player();
        p.take_damage(10.0);
        assert_eq!(p.health, 90.0);
        p.take_damage(10.0);
        assert_eq!(p.health, 90.0);
        p.update_timers(p.invulnerability + 0.01);
        p.take_damage(10.0);
        assert_eq!(p.health, 80.0);
    }

    #[test]
    fn test_lethal_hit() {
        let mut p = player();
        assert!(p.take_damage(150.0));
        assert_eq!(p.health, 0.0);
        assert!(!p.take_damage(10.0));
    }

    #[test]
    fn test_shield_drains_and_regenerates() {
        let mut p = player();
        p.shield.toggle();
        p.update_timers(1.0);
        assert_eq!(p.shield.strength, 75.0);
        p.shield.toggle();
        p.update_timers(1.0);
        assert_eq!(p.shield.strength, 83.0);
    }

    #[test]
    fn test_charged_shield_is_free_then_expires() {
        let mut p = player();
        p.shield.strength = 10.0;
        p.shield.charge(2.0);
        assert_eq!(p.shield.strength, 100.0);
        p.take_damage(500.0);
        p.update_timers(1.0);
        assert_eq!(p.shield.strength, 100.0);
        assert_eq!(p.health, 100.0);
        p.update_timers(1.5);
        assert!(!p.shield.active);
    }

    #[test]
    fn test_cannot_raise_empty_shield() {
        let mut p = player();
        p.shield.strength = 0.0;
        p.shield.toggle();
        assert!(!p.shield.active);
    }

    #[test]
    fn test_trail_is_bounded_and_fades() {
        let mut p = player();
        for _ in 0..50 {
            p.record_trail(2.0, 0.1);
        }
        assert_eq!(p.trail.len(), PlayerTuning::default().trail_length);
        assert_eq!(p.trail[0].opacity, 1.0);
        assert!(p.trail[5].opacity < p.trail[1].opacity);
    }
}
