//! Spawn policy, wave escalation and boss gating

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, SizeClass};
use super::state::GameState;
use crate::rng::{RandomSource, weighted_index};
use crate::tuning::{ControlScheme, HazardTuning, SpawnTuning, Tuning};

/// Spawn and wave timers plus the values each wave escalates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Seconds until the next obstacle spawn
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_obstacles: usize,
    /// Global difficulty scalar (obstacle health and fall speed)
    pub difficulty: f32,
    /// Seconds into the current wave
    pub wave_timer: f32,
    /// Seconds until the next hazard
    pub hazard_timer: f32,
}

impl WaveState {
    pub fn new(spawn: &SpawnTuning, hazards: &HazardTuning) -> Self {
        Self {
            spawn_timer: spawn.interval,
            spawn_interval: spawn.interval,
            max_obstacles: spawn.max_obstacles,
            difficulty: 1.0,
            wave_timer: 0.0,
            hazard_timer: hazards.interval,
        }
    }
}

/// Size weights for a wave: weight drains from small into large and huge
/// as waves go by, within the configured floor and cap
pub fn size_weights(wave: u32, cfg: &SpawnTuning) -> [f32; 4] {
    let [small, medium, large, huge] = cfg.size_weights;
    let shift = cfg.size_shift * wave.saturating_sub(1) as f32;
    let new_small = (small - shift).max(cfg.min_small_weight.min(small));
    let moved = small - new_small;
    let new_huge = (huge + moved * 0.5).min(cfg.max_huge_weight.max(huge));
    let new_large = large + (moved - (new_huge - huge));
    [new_small, medium, new_large, new_huge]
}

/// Centers of the spawn lanes between the side margins
pub fn lane_centers(width: f32, lanes: u32, margin: f32) -> Vec<f32> {
    let lanes = lanes.max(1);
    let margin = margin.min(width * 0.5);
    let lane_width = (width - 2.0 * margin) / lanes as f32;
    (0..lanes)
        .map(|i| margin + lane_width * (i as f32 + 0.5))
        .collect()
}

/// Pick a lane index, favoring the one the player occupies
pub fn pick_lane(player_x: f32, centers: &[f32], bias: f32, rng: &mut dyn RandomSource) -> usize {
    let player_lane = centers
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (*a - player_x)
                .abs()
                .partial_cmp(&(*b - player_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map_or(0, |(i, _)| i);
    let weights: Vec<f32> = (0..centers.len())
        .map(|i| if i == player_lane { 1.0 + bias } else { 1.0 })
        .collect();
    weighted_index(rng, &weights)
}

/// Spawn one regular obstacle just above the top edge
pub fn spawn_obstacle(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let size = SizeClass::ALL[weighted_index(rng, &size_weights(state.wave, &tuning.spawn))];
    let radius = tuning.size_stats(size).radius;
    let width = state.width;

    let x = match tuning.player.control {
        ControlScheme::Lane => {
            let centers = lane_centers(width, tuning.player.lanes, tuning.player.lane_margin);
            let lane = pick_lane(state.player.position().x, &centers, tuning.spawn.lane_bias, rng);
            let lane_width = (width - 2.0 * tuning.player.lane_margin.min(width * 0.5)) / centers.len() as f32;
            let jitter = rng.range(-0.25, 0.25) * lane_width;
            centers[lane] + jitter
        }
        ControlScheme::FreeFlight => rng.range(radius, width - radius),
    };
    let x = if width > 2.0 * radius { x.clamp(radius, width - radius) } else { width * 0.5 };

    let cfg = &tuning.obstacles;
    let difficulty = state.waves.difficulty;
    let velocity = Vec2::new(
        rng.range(-cfg.drift, cfg.drift),
        rng.range(cfg.min_fall_speed, cfg.max_fall_speed) * difficulty,
    );
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle::new(
        id,
        size,
        Vec2::new(x, -radius),
        velocity,
        tuning,
        difficulty,
        rng,
    ));
}

/// Spawn the boss centered above the playfield
pub fn spawn_boss(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let id = state.next_entity_id();
    let position = Vec2::new(state.width * 0.5, -tuning.obstacles.boss.radius);
    let boss = Obstacle::boss(id, position, tuning, state.waves.difficulty, rng);
    log::info!("Boss {} spawned on wave {} (health {:.0})", id, state.wave, boss.health);
    state.obstacles.push(boss);
}

/// Move to the next wave: faster spawns, more capacity, higher difficulty,
/// and a boss on every Nth wave
pub fn advance_wave(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let cfg = &tuning.spawn;
    state.wave += 1;
    let waves = &mut state.waves;
    waves.spawn_interval = (waves.spawn_interval * cfg.interval_factor).max(cfg.min_interval);
    waves.max_obstacles += cfg.capacity_step;
    waves.difficulty += cfg.difficulty_step;
    log::info!(
        "Wave {} (interval {:.2}s, cap {}, difficulty {:.1})",
        state.wave,
        waves.spawn_interval,
        waves.max_obstacles,
        waves.difficulty
    );

    if cfg.boss_interval > 0 && state.wave % cfg.boss_interval == 0 && !state.boss_alive() {
        spawn_boss(state, tuning, rng);
    }
}

/// Wave timer and the periodic spawn timer
///
/// Regular spawning is suspended while a boss is on the field.
pub fn update_spawning(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, dt: f32) {
    state.waves.wave_timer += dt;
    if state.waves.wave_timer >= tuning.spawn.wave_duration {
        state.waves.wave_timer -= tuning.spawn.wave_duration;
        advance_wave(state, tuning, rng);
    }

    if state.boss_alive() {
        return;
    }
    state.waves.spawn_timer -= dt;
    if state.waves.spawn_timer <= 0.0 {
        state.waves.spawn_timer += state.waves.spawn_interval;
        if state.obstacles.len() < state.waves.max_obstacles {
            spawn_obstacle(state, tuning, rng);
        }
    }
}

/// Drop obstacles, projectiles and pickups that left the playfield
pub fn cull_entities(state: &mut GameState, tuning: &Tuning) {
    let (width, height) = (state.width, state.height);
    let margin = tuning.obstacles.exit_margin;
    state.obstacles.retain(|o| {
        let gone = o.has_left_playfield(height, margin);
        if gone && o.boss {
            log::info!("Boss {} left the field", o.id);
        }
        !gone
    });
    state.projectiles.retain(|p| !p.is_off_playfield(width, height));
    state
        .pickups
        .retain(|p| p.position().y - p.radius <= height);
}
