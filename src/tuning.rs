//! Data-driven game balance
//!
//! Every gameplay number lives here rather than in the simulation code.
//! `Tuning::default()` is the shipped balance; a JSON file can override any
//! subset of it (missing keys keep their defaults).

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::error::{ConfigResult, require_positive, require_range};

/// How player input maps onto movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlScheme {
    /// Horizontal-only movement along the bottom of the playfield
    #[default]
    Lane,
    /// Rotate, thrust and strafe anywhere; edges wrap
    FreeFlight,
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: PlayfieldTuning,
    pub player: PlayerTuning,
    pub weapons: WeaponTuning,
    pub obstacles: ObstacleTuning,
    pub spawn: SpawnTuning,
    pub combo: ComboTuning,
    pub progression: ProgressionTuning,
    pub pickups: PickupTuning,
    pub hazards: HazardTuning,
    pub chain: ChainTuning,
    pub effects: EffectsTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    pub width: f32,
    pub height: f32,
    /// Broad-phase grid cell size
    pub cell_size: f32,
    /// Obstacles bounce off one another
    pub obstacle_contacts: bool,
    /// Restitution override applied to obstacle contacts
    pub contact_restitution: f32,
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            cell_size: 128.0,
            obstacle_contacts: true,
            contact_restitution: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub control: ControlScheme,
    pub radius: f32,
    pub mass: f32,
    pub max_health: f32,
    /// Damage immunity after a health hit (seconds)
    pub invulnerability: f32,
    pub shield_max: f32,
    /// Passive regeneration while the shield is down (per second)
    pub shield_regen: f32,
    /// Drain while the shield is up (per second)
    pub shield_depletion: f32,
    /// Length of the pickup-granted charged shield (seconds)
    pub shield_charge_duration: f32,
    pub max_speed: f32,
    /// Lane mode: distance kept from the side walls
    pub lane_margin: f32,
    /// Lane mode: distance of the craft above the bottom edge
    pub lane_height: f32,
    /// Lane mode: rate the velocity eases toward the target speed (1/s)
    pub lane_easing: f32,
    /// Number of lanes the spawner aligns obstacles to
    pub lanes: u32,
    pub thrust: f32,
    pub strafe: f32,
    /// Keyboard turn rate (rad/s)
    pub turn_rate: f32,
    /// Pointer-aim smoothing rate (rad/s)
    pub aim_turn_rate: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub trail_length: usize,
    /// Opacity lost per second by trail samples
    pub trail_fade: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            control: ControlScheme::Lane,
            radius: 16.0,
            mass: 1.0,
            max_health: 100.0,
            invulnerability: 1.0,
            shield_max: 100.0,
            shield_regen: 8.0,
            shield_depletion: 25.0,
            shield_charge_duration: 8.0,
            max_speed: 320.0,
            lane_margin: 40.0,
            lane_height: 60.0,
            lane_easing: 10.0,
            lanes: 5,
            thrust: 900.0,
            strafe: 600.0,
            turn_rate: 4.0,
            aim_turn_rate: 8.0,
            linear_damping: 0.96,
            angular_damping: 0.9,
            restitution: 0.5,
            trail_length: 20,
            trail_fade: 2.0,
        }
    }
}

/// Per-weapon numbers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Seconds between shots
    pub cooldown: f32,
    pub damage: f32,
    pub speed: f32,
    /// Projectile lifetime (seconds)
    pub lifetime: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub blaster: WeaponStats,
    pub laser: WeaponStats,
    pub missile: WeaponStats,
    pub shotgun: WeaponStats,
    /// Missile steering strength (1/s)
    pub homing_strength: f32,
    pub shotgun_pellets: u32,
    /// Total fan angle of a shotgun blast (radians)
    pub shotgun_spread: f32,
    pub laser_range: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            blaster: WeaponStats {
                cooldown: 0.25,
                damage: 10.0,
                speed: 600.0,
                lifetime: 2.0,
                radius: 4.0,
            },
            laser: WeaponStats {
                cooldown: 0.12,
                damage: 12.0,
                speed: 0.0,
                lifetime: 0.08,
                radius: 2.0,
            },
            missile: WeaponStats {
                cooldown: 0.5,
                damage: 25.0,
                speed: 380.0,
                lifetime: 3.0,
                radius: 6.0,
            },
            shotgun: WeaponStats {
                cooldown: 0.6,
                damage: 7.0,
                speed: 520.0,
                lifetime: 0.6,
                radius: 3.0,
            },
            homing_strength: 4.0,
            shotgun_pellets: 5,
            shotgun_spread: 0.6,
            laser_range: 900.0,
        }
    }
}

/// Fixed stats of one obstacle size class
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeStats {
    pub radius: f32,
    pub mass: f32,
    pub health: f32,
    /// Damage dealt to the player on contact
    pub damage: f32,
    /// Score before the combo multiplier
    pub score: u64,
    pub xp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub small: SizeStats,
    pub medium: SizeStats,
    pub large: SizeStats,
    pub huge: SizeStats,
    pub boss: SizeStats,
    /// Silhouette vertex count
    pub vertices: usize,
    pub max_cracks: usize,
    /// Share of the parent velocity inherited by fragments
    pub split_inherit: f32,
    pub split_kick_min: f32,
    pub split_kick_max: f32,
    /// Random angular jitter applied to each fragment heading (radians)
    pub split_jitter: f32,
    /// Seconds a ram fragment ignores the player that broke it
    pub ram_grace: f32,
    pub restitution: f32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    /// Maximum sideways drift at spawn
    pub drift: f32,
    pub max_spin: f32,
    pub boss_fall_speed: f32,
    pub boss_sway: f32,
    pub boss_sway_frequency: f32,
    /// How far above the top edge an obstacle may travel before it is culled
    pub exit_margin: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            small: SizeStats {
                radius: 12.0,
                mass: 1.0,
                health: 10.0,
                damage: 10.0,
                score: 50,
                xp: 5,
            },
            medium: SizeStats {
                radius: 22.0,
                mass: 3.0,
                health: 25.0,
                damage: 15.0,
                score: 100,
                xp: 10,
            },
            large: SizeStats {
                radius: 36.0,
                mass: 8.0,
                health: 50.0,
                damage: 25.0,
                score: 200,
                xp: 20,
            },
            huge: SizeStats {
                radius: 55.0,
                mass: 20.0,
                health: 100.0,
                damage: 40.0,
                score: 400,
                xp: 40,
            },
            boss: SizeStats {
                radius: 90.0,
                mass: 60.0,
                health: 800.0,
                damage: 50.0,
                score: 2500,
                xp: 200,
            },
            vertices: 12,
            max_cracks: 8,
            split_inherit: 0.5,
            split_kick_min: 60.0,
            split_kick_max: 120.0,
            split_jitter: 0.3,
            ram_grace: 0.5,
            restitution: 0.8,
            min_fall_speed: 40.0,
            max_fall_speed: 90.0,
            drift: 30.0,
            max_spin: 1.2,
            boss_fall_speed: 15.0,
            boss_sway: 60.0,
            boss_sway_frequency: 0.6,
            exit_margin: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Seconds between obstacle spawns at wave 1
    pub interval: f32,
    pub min_interval: f32,
    pub max_obstacles: usize,
    pub wave_duration: f32,
    /// Spawn interval multiplier applied per wave
    pub interval_factor: f32,
    /// Capacity added per wave
    pub capacity_step: usize,
    /// Global difficulty added per wave
    pub difficulty_step: f32,
    /// A boss arrives every N waves
    pub boss_interval: u32,
    /// Extra weight for the lane the player occupies
    pub lane_bias: f32,
    /// Weights for small, medium, large, huge at wave 1
    pub size_weights: [f32; 4],
    /// Weight moved from small toward large/huge per wave
    pub size_shift: f32,
    pub min_small_weight: f32,
    pub max_huge_weight: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval: 2.0,
            min_interval: 0.25,
            max_obstacles: 20,
            wave_duration: 30.0,
            interval_factor: 0.85,
            capacity_step: 2,
            difficulty_step: 0.1,
            boss_interval: 5,
            lane_bias: 2.0,
            size_weights: [0.45, 0.35, 0.15, 0.05],
            size_shift: 0.03,
            min_small_weight: 0.1,
            max_huge_weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Seconds without a kill before the combo resets
    pub window: f32,
    pub max_multiplier: f32,
    /// Multiplier gained per combo step
    pub step: f32,
    /// Combo count at which a reset banks a bonus
    pub bank_threshold: u32,
    pub bank_bonus_per_kill: u64,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self {
            window: 3.0,
            max_multiplier: 5.0,
            step: 0.1,
            bank_threshold: 10,
            bank_bonus_per_kill: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub first_level_xp: u32,
    /// Multiplicative growth of the XP requirement per level
    pub growth: f32,
    pub damage_bonus: f32,
    pub fire_rate_bonus: f32,
    pub health_bonus: f32,
    pub speed_bonus: f32,
    pub shield_bonus: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            first_level_xp: 100,
            growth: 1.5,
            damage_bonus: 0.15,
            fire_rate_bonus: 0.1,
            health_bonus: 20.0,
            speed_bonus: 0.1,
            shield_bonus: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub lifetime: f32,
    pub radius: f32,
    pub base_chance: f32,
    /// Drop chance added per combo step
    pub combo_chance: f32,
    pub max_chance: f32,
    pub magnet_range: f32,
    pub magnet_strength: f32,
    pub score_bonus: u64,
    pub heal: f32,
    pub weapon_duration: f32,
    pub speed_bonus: f32,
    pub boss_drops: u32,
    /// Weights for health, shield, weapon, speed
    pub kind_weights: [f32; 4],
    pub fall_speed: f32,
    pub restitution: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            lifetime: 8.0,
            radius: 10.0,
            base_chance: 0.12,
            combo_chance: 0.02,
            max_chance: 0.5,
            magnet_range: 150.0,
            magnet_strength: 600.0,
            score_bonus: 50,
            heal: 30.0,
            weapon_duration: 10.0,
            speed_bonus: 40.0,
            boss_drops: 3,
            kind_weights: [0.3, 0.25, 0.3, 0.15],
            fall_speed: 40.0,
            restitution: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub start_wave: u32,
    pub interval: f32,
    pub max_active: usize,
    /// Weights for gravity well, slow field, meteor burst
    pub kind_weights: [f32; 3],
    /// Downward drift of every hazard
    pub drift_speed: f32,
    pub gravity_radius: f32,
    pub gravity_strength: f32,
    /// Telegraphed warm-up before the well pulls (seconds)
    pub gravity_warmup: f32,
    pub gravity_duration: f32,
    pub slow_radius: f32,
    /// Drag coefficient inside the slow field (1/s)
    pub slow_drag: f32,
    pub slow_duration: f32,
    pub burst_radius: f32,
    pub burst_interval: f32,
    pub burst_count: u32,
    pub burst_duration: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            start_wave: 2,
            interval: 20.0,
            max_active: 2,
            kind_weights: [0.4, 0.35, 0.25],
            drift_speed: 12.0,
            gravity_radius: 260.0,
            gravity_strength: 90_000.0,
            gravity_warmup: 1.5,
            gravity_duration: 10.0,
            slow_radius: 200.0,
            slow_drag: 2.5,
            slow_duration: 8.0,
            burst_radius: 40.0,
            burst_interval: 0.35,
            burst_count: 10,
            burst_duration: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainTuning {
    pub radius: f32,
    pub damage: f32,
    /// Radius multiplier per generation
    pub shrink: f32,
    pub max_depth: u32,
    /// Delay before a queued blast detonates (0 = same step)
    pub delay: f32,
    pub min_radius: f32,
}

impl Default for ChainTuning {
    fn default() -> Self {
        Self {
            radius: 110.0,
            damage: 15.0,
            shrink: 0.7,
            max_depth: 3,
            delay: 0.1,
            min_radius: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub hit_shake: f32,
    pub kill_shake: f32,
    pub boss_shake: f32,
    pub shake_duration: f32,
    /// Shake intensity retained per 1/60 s
    pub shake_decay: f32,
    pub star_layers: usize,
    pub stars_per_layer: usize,
    /// Scroll speed of the farthest star layer
    pub star_speed: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            hit_shake: 0.5,
            kill_shake: 0.15,
            boss_shake: 1.0,
            shake_duration: 0.35,
            shake_decay: 0.9,
            star_layers: 3,
            stars_per_layer: 60,
            star_speed: 20.0,
        }
    }
}

impl Tuning {
    /// Parse (possibly partial) tuning JSON and validate it
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file
    pub fn load(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check every value the simulation divides by or scales with
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("playfield.width", self.playfield.width)?;
        require_positive("playfield.height", self.playfield.height)?;
        require_positive("playfield.cell_size", self.playfield.cell_size)?;
        require_positive("player.radius", self.player.radius)?;
        require_positive("player.mass", self.player.mass)?;
        require_positive("player.max_health", self.player.max_health)?;
        require_positive("player.max_speed", self.player.max_speed)?;
        require_range("player.lanes", self.player.lanes as f32, 1.0, 64.0, "[1, 64]")?;
        require_range(
            "player.linear_damping",
            self.player.linear_damping,
            0.0,
            1.0,
            "[0, 1]",
        )?;
        for (field, stats) in [
            ("weapons.blaster.cooldown", &self.weapons.blaster),
            ("weapons.laser.cooldown", &self.weapons.laser),
            ("weapons.missile.cooldown", &self.weapons.missile),
            ("weapons.shotgun.cooldown", &self.weapons.shotgun),
        ] {
            require_positive(field, stats.cooldown)?;
        }
        for (field, stats) in [
            ("obstacles.small.radius", &self.obstacles.small),
            ("obstacles.medium.radius", &self.obstacles.medium),
            ("obstacles.large.radius", &self.obstacles.large),
            ("obstacles.huge.radius", &self.obstacles.huge),
            ("obstacles.boss.radius", &self.obstacles.boss),
        ] {
            require_positive(field, stats.radius)?;
            require_positive(field, stats.mass)?;
        }
        require_range("obstacles.vertices", self.obstacles.vertices as f32, 3.0, 64.0, "[3, 64]")?;
        require_positive("spawn.interval", self.spawn.interval)?;
        require_positive("spawn.min_interval", self.spawn.min_interval)?;
        require_positive("spawn.wave_duration", self.spawn.wave_duration)?;
        require_range(
            "spawn.interval_factor",
            self.spawn.interval_factor,
            0.01,
            1.0,
            "(0, 1]",
        )?;
        require_range("spawn.boss_interval", self.spawn.boss_interval as f32, 1.0, 1000.0, "[1, 1000]")?;
        require_positive("combo.window", self.combo.window)?;
        require_range(
            "combo.max_multiplier",
            self.combo.max_multiplier,
            1.0,
            100.0,
            "[1, 100]",
        )?;
        require_range("progression.growth", self.progression.growth, 1.0, 10.0, "[1, 10]")?;
        require_positive("progression.first_level_xp", self.progression.first_level_xp as f32)?;
        require_positive("pickups.lifetime", self.pickups.lifetime)?;
        require_positive("hazards.interval", self.hazards.interval)?;
        require_positive("hazards.burst_interval", self.hazards.burst_interval)?;
        require_range("chain.shrink", self.chain.shrink, 0.0, 0.99, "[0, 0.99]")?;
        require_range("chain.delay", self.chain.delay, 0.0, 10.0, "[0, 10]")?;
        Ok(())
    }

    /// Numbers for a weapon mode
    pub fn weapon_stats(&self, mode: crate::sim::WeaponMode) -> &WeaponStats {
        use crate::sim::WeaponMode;
        match mode {
            WeaponMode::Blaster => &self.weapons.blaster,
            WeaponMode::Laser => &self.weapons.laser,
            WeaponMode::Missile => &self.weapons.missile,
            WeaponMode::Shotgun => &self.weapons.shotgun,
        }
    }

    /// Fixed stats of a size class
    pub fn size_stats(&self, size: crate::sim::SizeClass) -> &SizeStats {
        use crate::sim::SizeClass;
        match size {
            SizeClass::Small => &self.obstacles.small,
            SizeClass::Medium => &self.obstacles.medium,
            SizeClass::Large => &self.obstacles.large,
            SizeClass::Huge => &self.obstacles.huge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn": { "interval": 1.5 } }"#).unwrap();
        assert_eq!(tuning.spawn.interval, 1.5);
        assert_eq!(tuning.spawn.max_obstacles, 20);
        assert_eq!(tuning.player.max_health, 100.0);
    }

    #[test]
    fn test_control_scheme_from_json() {
        let tuning = Tuning::from_json(r#"{ "player": { "control": "FreeFlight" } }"#).unwrap();
        assert_eq!(tuning.player.control, ControlScheme::FreeFlight);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "spawn": { "interval": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, crate::ConfigError::OutOfRange { field: "spawn.interval", .. }));

        let err = Tuning::from_json(r#"{ "combo": { "max_multiplier": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, crate::ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::ConfigError::Parse(_)));
    }
}
