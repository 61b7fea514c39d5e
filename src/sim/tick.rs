//! Per-step simulation pipeline
//!
//! One call to `tick` advances a `Playing` run by one frame. Subsystems run
//! in a fixed order so anything that happens earlier in a step (a kill, a
//! pickup) is visible to every later subsystem in the same step:
//!
//! 1. input  2. integration  3. player hits  4. projectile hits and chain
//! reactions  5. pickups  6. progression timers  7. hazards  8. spawning
//! and culling  9. cosmetics

use glam::Vec2;

use super::collision::{Bounds, wrap_around};
use super::state::{GamePhase, GameState};
use super::{combat, hazards, spawn, weapons};
use crate::consts::{FACING_UP, MAX_DT};
use crate::math::VecExt;
use crate::rng::RandomSource;
use crate::tuning::{ControlScheme, Tuning};

/// Input intents for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement axis in [-1, 1]: x is left/right, y is up (-1) / down (+1).
    /// Free flight turns with x and thrusts with -y.
    pub axis: Vec2,
    /// Free flight: sideways thrust in [-1, 1]
    pub strafe: f32,
    /// Fire held
    pub fire: bool,
    /// Toggle the shield (one-shot)
    pub shield_toggle: bool,
    /// Pointer position to aim at (free flight)
    pub aim: Option<Vec2>,
}

impl TickInput {
    /// Demo pilot used by the headless runner: always fires, dodges the
    /// closest threat, otherwise lines up under the lowest obstacle
    pub fn autopilot(state: &GameState, tuning: &Tuning) -> Self {
        let player = &state.player;
        let pos = player.position();
        let mut input = TickInput {
            fire: true,
            ..Default::default()
        };

        let threat = state
            .obstacles
            .iter()
            .filter(|o| {
                let dy = pos.y - o.position().y;
                dy > -o.radius && dy < 180.0 && (o.position().x - pos.x).abs() < o.radius + player.radius + 24.0
            })
            .min_by(|a, b| {
                a.position()
                    .distance_squared(pos)
                    .partial_cmp(&b.position().distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let target = state
            .obstacles
            .iter()
            .filter(|o| o.position().y < pos.y)
            .max_by(|a, b| {
                a.position()
                    .y
                    .partial_cmp(&b.position().y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        match tuning.player.control {
            ControlScheme::Lane => {
                if let Some(threat) = threat {
                    let away = pos.x - threat.position().x;
                    // Pinned against a wall: cut across instead
                    let margin = tuning.player.lane_margin + player.radius;
                    let dir = if pos.x < margin {
                        1.0
                    } else if pos.x > state.width - margin {
                        -1.0
                    } else if away >= 0.0 {
                        1.0
                    } else {
                        -1.0
                    };
                    input.axis.x = dir;
                } else if let Some(target) = target {
                    input.axis.x = ((target.position().x - pos.x) / 40.0).clamp(-1.0, 1.0);
                }
            }
            ControlScheme::FreeFlight => {
                input.aim = target.or(threat).map(|o| o.position());
                if let Some(threat) = threat {
                    input.strafe = if threat.position().x > pos.x { -1.0 } else { 1.0 };
                }
            }
        }

        let shield = &player.shield;
        let close = threat.is_some_and(|o| o.position().distance(pos) < o.radius + player.radius + 60.0);
        if close != shield.active && (!close || shield.strength > 20.0) {
            input.shield_toggle = true;
        }
        input
    }
}

/// Advance the run by one step
///
/// Does nothing outside `Playing`. `dt` is clamped to `MAX_DT` so a stalled
/// host cannot produce large, non-physical jumps.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, tuning: &Tuning, rng: &mut dyn RandomSource) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if dt.is_nan() || dt <= 0.0 {
        return;
    }
    let dt = dt.min(MAX_DT);

    // 1. Input
    apply_input(state, input, tuning, dt, rng);
    if input.fire {
        weapons::fire(state, tuning, rng);
    }

    // 2. Integration
    integrate(state, tuning, dt);

    // 3. Player against obstacles
    combat::resolve_player_hits(state, tuning, rng);
    if state.phase != GamePhase::Playing {
        update_effects(state, tuning, rng, dt);
        state.elapsed += dt;
        return;
    }

    // 4. Projectiles against obstacles, kills, chain reactions
    combat::resolve_projectile_hits(state, tuning, rng);
    combat::reap_destroyed(state, tuning, rng, 0);
    combat::process_chain_queue(state, tuning, rng, dt);

    // 5. Pickups
    combat::update_pickups(state, tuning, rng);

    // 6. Progression timers
    update_progression(state, tuning, rng, dt);

    // 7. Hazards
    hazards::update_hazards(state, tuning, rng, dt);

    // 8. Spawning and despawning
    spawn::update_spawning(state, tuning, rng, dt);
    spawn::cull_entities(state, tuning);

    // 9. Cosmetics
    update_effects(state, tuning, rng, dt);

    state.elapsed += dt;
}

fn apply_input(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32, rng: &mut dyn RandomSource) {
    let cfg = &tuning.player;
    if input.shield_toggle {
        state.player.shield.toggle();
    }

    let speed_cap = state.player.speed_cap();
    let player = &mut state.player;
    match cfg.control {
        ControlScheme::Lane => {
            let body = &mut player.body;
            let target = input.axis.x.clamp(-1.0, 1.0) * speed_cap;
            let blend = (cfg.lane_easing * dt).min(1.0);
            body.velocity.x += (target - body.velocity.x) * blend;
            body.velocity.y = 0.0;
            body.angle = FACING_UP;
            body.angular_velocity = 0.0;
            clamp_to_lane(state, tuning);
        }
        ControlScheme::FreeFlight => {
            let body = &mut player.body;
            if let Some(aim) = input.aim {
                let to_aim = aim - body.position;
                if to_aim.length_squared() > 0.0 {
                    body.rotate_towards(to_aim.heading(), cfg.aim_turn_rate, dt);
                }
                body.angular_velocity = 0.0;
            } else {
                body.angular_velocity = input.axis.x.clamp(-1.0, 1.0) * cfg.turn_rate;
            }

            let thrust = (-input.axis.y).clamp(-1.0, 1.0);
            if thrust != 0.0 {
                let force = body.forward() * thrust * cfg.thrust * body.mass;
                body.apply_force(force);
            }
            let strafe = input.strafe.clamp(-1.0, 1.0);
            if strafe != 0.0 {
                let force = body.right() * strafe * cfg.strafe * body.mass;
                body.apply_force(force);
            }
            if thrust > 0.0 {
                let exhaust = body.position - body.forward() * player.radius;
                let facing = body.forward();
                state.particles.thrust(exhaust, facing, rng);
            }
        }
    }
}

/// Keep a lane-mode craft on its line and inside the side margins
fn clamp_to_lane(state: &mut GameState, tuning: &Tuning) {
    let cfg = &tuning.player;
    let margin = cfg.lane_margin.min(state.width * 0.5);
    let body = &mut state.player.body;
    let (min_x, max_x) = (margin, state.width - margin);
    if body.position.x <= min_x {
        body.position.x = min_x;
        body.velocity.x = body.velocity.x.max(0.0);
    } else if body.position.x >= max_x {
        body.position.x = max_x;
        body.velocity.x = body.velocity.x.min(0.0);
    }
    body.position.y = state.height - cfg.lane_height;
}

fn integrate(state: &mut GameState, tuning: &Tuning, dt: f32) {
    state.player.body.integrate(dt);
    match tuning.player.control {
        ControlScheme::Lane => clamp_to_lane(state, tuning),
        ControlScheme::FreeFlight => {
            let cap = state.player.speed_cap();
            let body = &mut state.player.body;
            body.velocity = body.velocity.clamped_length(cap);
            let bounds = Bounds::new(state.width, state.height);
            if wrap_around(body, state.player.radius, &bounds) {
                state.player.clear_trail();
            }
        }
    }
    state.player.update_timers(dt);
    state.player.record_trail(tuning.player.trail_fade, dt);

    for obstacle in &mut state.obstacles {
        obstacle.update(dt, tuning);
    }
    combat::resolve_obstacle_contacts(state, tuning);

    let obstacles = &state.obstacles;
    state.projectiles.retain_mut(|p| {
        p.steer(obstacles, dt);
        p.update(dt)
    });
    state.pickups.retain_mut(|p| p.update(dt));
}

fn update_progression(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, dt: f32) {
    if let Some(bonus) = state.combo.update(dt, &tuning.combo) {
        state.score += bonus;
        log::info!("Combo ended, banked {} bonus points", bonus);
    }
    if state.weapon.update(dt) {
        log::debug!("Weapon reverted to {}", state.weapon.mode.as_str());
    }
    if state.progression.skill_points > 0 {
        let taken = state
            .progression
            .spend_skill_points(&mut state.player, &tuning.progression, rng);
        for upgrade in taken {
            log::info!(
                "Level {} reached, upgraded {}",
                state.progression.level,
                upgrade.as_str()
            );
        }
    }
}

fn update_effects(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, dt: f32) {
    state.particles.update(dt);
    state.starfield.update(dt, rng);
    state.shake.update(dt, tuning.effects.shake_decay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRandom;
    use crate::sim::{Obstacle, SizeClass};

    fn playing(tuning: &Tuning) -> (GameState, PcgRandom) {
        let mut rng = PcgRandom::new(99);
        let mut state = GameState::new(tuning, &mut rng);
        state.phase = GamePhase::Playing;
        (state, rng)
    }

    #[test]
    fn test_tick_only_while_playing() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        state.phase = GamePhase::Paused;
        tick(&mut state, &TickInput::default(), 0.016, &tuning, &mut rng);
        assert_eq!(state.elapsed, 0.0);
        state.phase = GamePhase::Playing;
        tick(&mut state, &TickInput::default(), 0.016, &tuning, &mut rng);
        assert!(state.elapsed > 0.0);
    }

    #[test]
    fn test_dt_is_clamped() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        tick(&mut state, &TickInput::default(), 5.0, &tuning, &mut rng);
        assert_eq!(state.elapsed, MAX_DT);
        tick(&mut state, &TickInput::default(), -1.0, &tuning, &mut rng);
        assert_eq!(state.elapsed, MAX_DT);
    }

    #[test]
    fn test_nan_step_is_ignored() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        let before = state.player.position();
        tick(&mut state, &TickInput::default(), f32::NAN, &tuning, &mut rng);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.player.position(), before);
    }

    #[test]
    fn test_fatal_step_still_counts() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        let pos = state.player.position();
        let id = state.next_entity_id();
        let rock = Obstacle::new(id, SizeClass::Huge, pos, Vec2::ZERO, &tuning, 1.0, &mut rng);
        state.obstacles.push(rock);
        state.player.health = 1.0;
        tick(&mut state, &TickInput::default(), 0.016, &tuning, &mut rng);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.elapsed, 0.016);
    }

    #[test]
    fn test_lane_movement_eases_and_clamps() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        let right = TickInput {
            axis: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &right, 1.0 / 60.0, &tuning, &mut rng);
        let v1 = state.player.body.velocity.x;
        assert!(v1 > 0.0 && v1 < tuning.player.max_speed);
        for _ in 0..600 {
            tick(&mut state, &right, 1.0 / 60.0, &tuning, &mut rng);
            state.obstacles.clear();
        }
        assert_eq!(state.player.position().x, state.width - tuning.player.lane_margin);
        assert_eq!(state.player.position().y, state.height - tuning.player.lane_height);
    }

    #[test]
    fn test_free_flight_thrust_and_wrap() {
        let mut tuning = Tuning::default();
        tuning.player.control = ControlScheme::FreeFlight;
        let (mut state, mut rng) = playing(&tuning);
        state.player.body.position = Vec2::new(400.0, 300.0);
        let forward = TickInput {
            axis: Vec2::new(0.0, -1.0),
            ..Default::default()
        };
        for _ in 0..240 {
            tick(&mut state, &forward, 1.0 / 60.0, &tuning, &mut rng);
            state.obstacles.clear();
            assert!(state.player.body.speed() <= state.player.speed_cap() + 1e-3);
            let p = state.player.position();
            assert!(p.y >= -state.player.radius - 1.0 && p.y <= state.height + state.player.radius + 1.0);
        }
    }

    #[test]
    fn test_free_flight_aims_at_pointer() {
        let mut tuning = Tuning::default();
        tuning.player.control = ControlScheme::FreeFlight;
        let (mut state, mut rng) = playing(&tuning);
        state.player.body.position = Vec2::new(400.0, 300.0);
        let aim = TickInput {
            aim: Some(Vec2::new(600.0, 300.0)),
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &aim, 1.0 / 60.0, &tuning, &mut rng);
        }
        assert!(state.player.body.angle.abs() < 0.01);
    }

    #[test]
    fn test_kill_in_step_feeds_progression() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = playing(&tuning);
        let x = state.player.position().x;
        let id = state.next_entity_id();
        let rock = Obstacle::new(id, SizeClass::Small, Vec2::new(x, 480.0), Vec2::ZERO, &tuning, 1.0, &mut rng);
        state.obstacles.push(rock);
        state.progression.xp = tuning.progression.first_level_xp - 1;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &fire, 1.0 / 60.0, &tuning, &mut rng);
            if state.kills > 0 {
                break;
            }
        }
        assert_eq!(state.kills, 1);
        assert_eq!(state.progression.level, 2);
        assert_eq!(state.progression.upgrades.len(), 1);
        assert!(state.score >= tuning.obstacles.small.score);
    }

    #[test]
    fn test_autopilot_keeps_the_run_going() {
        let mut tuning = Tuning::default();
        tuning.player.max_health = 1.0e6;
        let (mut state, mut rng) = playing(&tuning);
        for _ in 0..600 {
            let input = TickInput::autopilot(&state, &tuning);
            tick(&mut state, &input, 1.0 / 60.0, &tuning, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.elapsed > 9.0);
        assert!(state.player.trail.len() <= tuning.player.trail_length);
    }
}
