//! Combo streaks, experience and level-up upgrades

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::rng::RandomSource;
use crate::tuning::{ComboTuning, ProgressionTuning};

const MULTIPLIER_SCALE: u64 = 10_000;

/// Kill streak within a rolling window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Seconds left before the streak resets
    pub timer: f32,
    pub multiplier: f32,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            count: 0,
            timer: 0.0,
            multiplier: 1.0,
        }
    }
}

impl Combo {
    /// `min(1 + step * count, max)`
    pub fn multiplier_for(count: u32, cfg: &ComboTuning) -> f32 {
        (1.0 + cfg.step * count as f32).min(cfg.max_multiplier)
    }

    /// Score for a kill at the current multiplier, floored
    ///
    /// The multiplier is snapped to ten-thousandths and the product taken in
    /// integers, so `1.3` scores as 1.3 and not as the f32 just below it.
    pub fn apply(&self, base: u64) -> u64 {
        let scaled = (self.multiplier as f64 * MULTIPLIER_SCALE as f64).round() as u64;
        base * scaled / MULTIPLIER_SCALE
    }

    /// Extend the streak and restart the window
    pub fn register_kill(&mut self, cfg: &ComboTuning) {
        self.count += 1;
        self.timer = cfg.window;
        self.multiplier = Self::multiplier_for(self.count, cfg);
    }

    /// Count down the window; returns the banked bonus when a streak at or
    /// above the threshold resets
    pub fn update(&mut self, dt: f32, cfg: &ComboTuning) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        let count = self.count;
        *self = Self::default();
        (count >= cfg.bank_threshold).then(|| count as u64 * cfg.bank_bonus_per_kill)
    }
}

/// Stat boost granted on level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatUpgrade {
    Damage,
    FireRate,
    Health,
    Speed,
    Shield,
}

impl StatUpgrade {
    pub const ALL: [StatUpgrade; 5] = [
        StatUpgrade::Damage,
        StatUpgrade::FireRate,
        StatUpgrade::Health,
        StatUpgrade::Speed,
        StatUpgrade::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatUpgrade::Damage => "damage",
            StatUpgrade::FireRate => "fire rate",
            StatUpgrade::Health => "health",
            StatUpgrade::Speed => "speed",
            StatUpgrade::Shield => "shield",
        }
    }

    pub fn apply(self, player: &mut Player, cfg: &ProgressionTuning) {
        match self {
            StatUpgrade::Damage => player.stats.damage += cfg.damage_bonus,
            StatUpgrade::FireRate => player.stats.fire_rate += cfg.fire_rate_bonus,
            StatUpgrade::Health => {
                player.max_health += cfg.health_bonus;
                player.heal(cfg.health_bonus);
            }
            StatUpgrade::Speed => player.stats.speed += cfg.speed_bonus,
            StatUpgrade::Shield => {
                player.shield.max_strength += cfg.shield_bonus;
                player.shield.strength += cfg.shield_bonus;
            }
        }
    }
}

/// Level, experience and skill points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    /// Points earned but not yet spent
    pub skill_points: u32,
    /// Upgrades taken so far, oldest first
    pub upgrades: Vec<StatUpgrade>,
}

impl Progression {
    pub fn new(cfg: &ProgressionTuning) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: cfg.first_level_xp.max(1),
            skill_points: 0,
            upgrades: Vec::new(),
        }
    }

    /// Add experience; returns the number of levels gained
    pub fn add_xp(&mut self, amount: u32, cfg: &ProgressionTuning) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.skill_points += 1;
            self.xp_to_next = ((self.xp_to_next as f32 * cfg.growth).round() as u32).max(1);
            gained += 1;
        }
        gained
    }

    /// Spend every pending point on a random upgrade, applied immediately
    pub fn spend_skill_points(
        &mut self,
        player: &mut Player,
        cfg: &ProgressionTuning,
        rng: &mut dyn RandomSource,
    ) -> Vec<StatUpgrade> {
        let mut taken = Vec::new();
        while self.skill_points > 0 {
            self.skill_points -= 1;
            let upgrade = StatUpgrade::ALL[rng.index(StatUpgrade::ALL.len())];
            upgrade.apply(player, cfg);
            self.upgrades.push(upgrade);
            taken.push(upgrade);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRandom;
    use crate::tuning::PlayerTuning;
    use glam::Vec2;

    #[test]
    fn test_multiplier_caps() {
        let cfg = ComboTuning::default();
        assert_eq!(Combo::multiplier_for(0, &cfg), 1.0);
        assert!((Combo::multiplier_for(5, &cfg) - 1.5).abs() < 1e-6);
        assert_eq!(Combo::multiplier_for(100, &cfg), 5.0);
    }

    #[test]
    fn test_combo_decays_without_kills() {
        let cfg = ComboTuning::default();
        let mut combo = Combo::default();
        combo.register_kill(&cfg);
        combo.register_kill(&cfg);
        assert_eq!(combo.count, 2);
        assert_eq!(combo.update(2.0, &cfg), None);
        assert_eq!(combo.count, 2);
        // Below the threshold nothing is banked
        assert_eq!(combo.update(1.5, &cfg), None);
        assert_eq!(combo.count, 0);
        assert_eq!(combo.multiplier, 1.0);
    }

    #[test]
    fn test_long_combo_banks_bonus() {
        let cfg = ComboTuning::default();
        let mut combo = Combo::default();
        for _ in 0..12 {
            combo.register_kill(&cfg);
        }
        assert_eq!(combo.update(cfg.window + 0.1, &cfg), Some(1200));
        assert_eq!(combo.count, 0);
    }

    #[test]
    fn test_score_is_floored() {
        let combo = Combo {
            count: 5,
            timer: 1.0,
            multiplier: 1.5,
        };
        assert_eq!(combo.apply(50), 75);
        assert_eq!(combo.apply(3), 4);
        assert_eq!(combo.apply(1), 1);
    }

    #[test]
    fn test_score_uses_decimal_multiplier() {
        let cfg = ComboTuning::default();
        let at = |count: u32| Combo {
            count,
            timer: 1.0,
            multiplier: Combo::multiplier_for(count, &cfg),
        };
        assert_eq!(at(3).apply(50), 65);
        assert_eq!(at(4).apply(100), 140);
        assert_eq!(at(8).apply(2500), 4500);
        assert_eq!(at(11).apply(200), 420);
        assert_eq!(at(60).apply(400), 2000);
    }

    #[test]
    fn test_xp_levels_with_growth() {
        let cfg = ProgressionTuning::default();
        let mut p = Progression::new(&cfg);
        assert_eq!(p.add_xp(90, &cfg), 0);
        assert_eq!(p.add_xp(20, &cfg), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp, 10);
        assert_eq!(p.xp_to_next, 150);
        // Enough for two levels at once
        assert_eq!(p.add_xp(140 + 225, &cfg), 2);
        assert_eq!(p.level, 4);
        assert_eq!(p.skill_points, 3);
    }

    #[test]
    fn test_spend_applies_upgrades() {
        let cfg = ProgressionTuning::default();
        let mut player = Player::new(Vec2::ZERO, &PlayerTuning::default());
        let mut p = Progression::new(&cfg);
        p.skill_points = 2;
        // index(5) with 0.5 -> Health
        let taken = p.spend_skill_points(&mut player, &cfg, &mut FixedRandom::constant(0.5));
        assert_eq!(taken, vec![StatUpgrade::Health, StatUpgrade::Health]);
        assert_eq!(player.max_health, 140.0);
        assert_eq!(p.skill_points, 0);
        assert_eq!(p.upgrades.len(), 2);
    }
}
