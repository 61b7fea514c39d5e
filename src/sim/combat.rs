//! Collision-driven gameplay: hits, kills, chain reactions and pickups
//!
//! Kills are reaped in one place (`reap_destroyed`) so every source of damage
//! (projectiles, the laser, chain blasts) scores, splits and drops the same
//! way. Chain reactions run off an explicit FIFO queue rather than recursion.

use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, bounce_off_bounds, circle_collision, resolve_collision, separate_objects};
use super::entity::{EntityId, EntityKey};
use super::obstacle::Obstacle;
use super::pickup::{Pickup, PickupKind};
use super::spatial::SpatialHash;
use super::state::{GamePhase, GameState};
use super::weapons::WeaponMode;
use crate::math::VecExt;
use crate::rng::RandomSource;
use crate::tuning::Tuning;

/// A pending splash-damage blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainBlast {
    pub position: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Generation: 0 for a blast caused by a direct kill
    pub depth: u32,
    /// Seconds until detonation
    pub delay: f32,
    /// Fragments of the kill that caused this blast; never caught by it
    pub spared: Vec<EntityId>,
}

/// Obstacles bounce off the side walls and, when enabled, off each other
pub fn resolve_obstacle_contacts(state: &mut GameState, tuning: &Tuning) {
    let walls = Bounds::columns(0.0, state.width);
    for obstacle in &mut state.obstacles {
        let restitution = obstacle.body.restitution;
        bounce_off_bounds(&mut obstacle.body, obstacle.radius, &walls, restitution);
    }
    if !tuning.playfield.obstacle_contacts || state.obstacles.len() < 2 {
        return;
    }

    let grid = SpatialHash::build(
        tuning.playfield.cell_size,
        state
            .obstacles
            .iter()
            .map(|o| (EntityKey::obstacle(o.id), o.position(), o.radius)),
    );
    let index = index_by_id(&state.obstacles);
    for (a, b) in grid.potential_collisions() {
        let (Some(&i), Some(&j)) = (index.get(&a.id), index.get(&b.id)) else {
            continue;
        };
        let Ok([first, second]) = state.obstacles.get_disjoint_mut([i, j]) else {
            continue;
        };
        if circle_collision(first.position(), second.position(), first.radius, second.radius) {
            resolve_collision(&mut first.body, &mut second.body, tuning.playfield.contact_restitution);
            separate_objects(&mut first.body, &mut second.body, first.radius, second.radius);
        }
    }
}

/// Player against every live obstacle
///
/// Regular obstacles shatter on contact (no score) and hurt the player. The
/// boss knocks the player back instead. A lethal hit ends the run.
pub fn resolve_player_hits(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let mut rammed = HashSet::new();
    for obstacle in &mut state.obstacles {
        if obstacle.is_destroyed() || obstacle.ram_grace > 0.0 {
            continue;
        }
        let player = &mut state.player;
        if !circle_collision(player.position(), obstacle.position(), player.radius, obstacle.radius) {
            continue;
        }

        let shielded = player.shield.is_absorbing();
        let lethal = player.take_damage(obstacle.damage);
        if shielded {
            state
                .particles
                .shield_hit(player.position(), obstacle.position(), player.radius, rng);
        } else {
            state.particles.explosion(player.position(), 0.6, rng);
        }
        state
            .shake
            .trigger(tuning.effects.hit_shake, tuning.effects.shake_duration);

        if obstacle.boss {
            resolve_collision(&mut player.body, &mut obstacle.body, 1.0);
            separate_objects(&mut player.body, &mut obstacle.body, player.radius, obstacle.radius);
        } else {
            obstacle.shatter();
            rammed.insert(obstacle.id);
        }

        if lethal {
            log::info!(
                "Player destroyed at {:.1}s (score {}, wave {})",
                state.elapsed,
                state.score,
                state.wave
            );
            state.phase = GamePhase::GameOver;
            state.particles.explosion(player.position(), 3.0, rng);
            break;
        }
    }

    if rammed.is_empty() {
        return;
    }
    let difficulty = state.waves.difficulty;
    let center = state.player.position();
    let reach = state.player.radius;
    let (wrecks, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.obstacles)
        .into_iter()
        .partition(|o| rammed.contains(&o.id));
    state.obstacles = kept;
    for wreck in wrecks {
        state.particles.debris(wreck.position(), wreck.radius, rng);
        let mut fragments = wreck.split(tuning, difficulty, rng, || state.next_entity_id());
        // Fragments start clear of the craft and cannot re-hit it right away
        for fragment in &mut fragments {
            let offset = fragment.position() - center;
            let clearance = reach + fragment.radius;
            if offset.length() < clearance {
                fragment.body.position = center + offset.normalize_or(Vec2::NEG_Y) * clearance;
            }
            fragment.ram_grace = tuning.obstacles.ram_grace;
        }
        state.obstacles.extend(fragments);
    }
}

/// Projectiles against obstacles via the broad phase; one hit per projectile
pub fn resolve_projectile_hits(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    if state.projectiles.is_empty() || state.obstacles.is_empty() {
        return;
    }
    let grid = SpatialHash::build(
        tuning.playfield.cell_size,
        state
            .obstacles
            .iter()
            .filter(|o| !o.is_destroyed())
            .map(|o| (EntityKey::obstacle(o.id), o.position(), o.radius)),
    );
    let index = index_by_id(&state.obstacles);
    let max_cracks = tuning.obstacles.max_cracks;

    for projectile in state.projectiles.iter_mut().filter(|p| p.alive) {
        for key in grid.query(projectile.position(), projectile.radius) {
            let Some(&i) = index.get(&key.id) else {
                continue;
            };
            let obstacle = &mut state.obstacles[i];
            if obstacle.is_destroyed()
                || !circle_collision(
                    projectile.position(),
                    obstacle.position(),
                    projectile.radius,
                    obstacle.radius,
                )
            {
                continue;
            }
            obstacle.take_damage(projectile.damage, max_cracks, rng);
            projectile.alive = false;
            state.particles.explosion(projectile.position(), 0.3, rng);
            break;
        }
    }
    state.projectiles.retain(|p| p.alive);
}

/// Remove destroyed obstacles and run kill handling for each
///
/// `depth` is the chain generation of whatever dealt the killing damage.
pub fn reap_destroyed(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, depth: u32) {
    if !state.obstacles.iter().any(Obstacle::is_destroyed) {
        return;
    }
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.obstacles)
        .into_iter()
        .partition(Obstacle::is_destroyed);
    state.obstacles = alive;
    for obstacle in dead {
        on_kill(state, obstacle, tuning, rng, depth);
    }
}

fn on_kill(state: &mut GameState, obstacle: Obstacle, tuning: &Tuning, rng: &mut dyn RandomSource, depth: u32) {
    let position = obstacle.position();
    state.score += state.combo.apply(obstacle.score);
    state.combo.register_kill(&tuning.combo);
    state.kills += 1;
    state.progression.add_xp(obstacle.xp, &tuning.progression);

    state.particles.explosion(position, obstacle.radius / 20.0, rng);
    state.particles.debris(position, obstacle.radius, rng);

    let mut spared = Vec::new();
    if obstacle.boss {
        log::info!("Boss defeated on wave {} (score {})", state.wave, state.score);
        state
            .shake
            .trigger(tuning.effects.boss_shake, tuning.effects.shake_duration * 2.0);
        let drops = tuning.pickups.boss_drops.max(1);
        for i in 0..drops {
            let angle = TAU * i as f32 / drops as f32;
            let kind = PickupKind::roll(rng, &tuning.pickups.kind_weights);
            let pos = position + Vec2::from_heading(angle, obstacle.radius * 0.5);
            let vel = Vec2::from_heading(angle, 60.0) + Vec2::new(0.0, tuning.pickups.fall_speed);
            spawn_pickup(state, kind, pos, vel, tuning);
        }
    } else {
        state
            .shake
            .trigger(tuning.effects.kill_shake, tuning.effects.shake_duration);
        let difficulty = state.waves.difficulty;
        let fragments = obstacle.split(tuning, difficulty, rng, || state.next_entity_id());
        spared.extend(fragments.iter().map(|f| f.id));
        state.obstacles.extend(fragments);

        let cfg = &tuning.pickups;
        let chance = (cfg.base_chance + cfg.combo_chance * state.combo.count as f32).min(cfg.max_chance);
        if rng.chance(chance) {
            let kind = PickupKind::roll(rng, &cfg.kind_weights);
            spawn_pickup(state, kind, position, Vec2::new(0.0, cfg.fall_speed), tuning);
        }
    }

    let chain = &tuning.chain;
    if depth < chain.max_depth {
        let radius = chain.radius * chain.shrink.powi(depth as i32);
        if radius >= chain.min_radius {
            state.chain_queue.push_back(ChainBlast {
                position,
                radius,
                damage: chain.damage,
                depth,
                delay: chain.delay,
                spared,
            });
        }
    }
}

/// Count down queued blasts and detonate every one that is due, oldest
/// first. With a zero delay a whole cascade resolves within this call.
pub fn process_chain_queue(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource, dt: f32) {
    for blast in &mut state.chain_queue {
        blast.delay -= dt;
    }
    while state.chain_queue.front().is_some_and(|b| b.delay <= 0.0) {
        let Some(blast) = state.chain_queue.pop_front() else {
            break;
        };
        detonate(state, &blast, tuning, rng);
        reap_destroyed(state, tuning, rng, blast.depth + 1);
    }
}

fn detonate(state: &mut GameState, blast: &ChainBlast, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let mut caught = 0;
    for obstacle in &mut state.obstacles {
        if obstacle.is_destroyed()
            || blast.spared.contains(&obstacle.id)
            || !circle_collision(blast.position, obstacle.position(), blast.radius, obstacle.radius)
        {
            continue;
        }
        obstacle.take_damage(blast.damage, tuning.obstacles.max_cracks, rng);
        state.particles.chain_spark(blast.position, obstacle.position(), rng);
        caught += 1;
    }
    if caught > 0 {
        log::debug!(
            "Chain blast depth {} (r={:.0}) caught {} obstacles",
            blast.depth,
            blast.radius,
            caught
        );
    }
}

/// Magnet pull toward the player and collection
pub fn update_pickups(state: &mut GameState, tuning: &Tuning, rng: &mut dyn RandomSource) {
    let cfg = &tuning.pickups;
    let player_pos = state.player.position();
    let player_radius = state.player.radius;
    let mut collected = Vec::new();

    for pickup in &mut state.pickups {
        let offset = player_pos - pickup.position();
        let dist = offset.length();
        if dist > 0.0 && dist < cfg.magnet_range {
            // Stronger the closer it gets
            let pull = cfg.magnet_strength * (1.0 - dist / cfg.magnet_range);
            let mass = pickup.body.mass;
            pickup.body.apply_force(offset / dist * pull * mass);
        }
        if circle_collision(player_pos, pickup.position(), player_radius, pickup.radius) && pickup.collect() {
            collected.push((pickup.kind, pickup.position()));
        }
    }
    state.pickups.retain(|p| !p.collected);

    for (kind, position) in collected {
        apply_pickup(state, kind, position, tuning, rng);
    }
}

fn apply_pickup(
    state: &mut GameState,
    kind: PickupKind,
    position: Vec2,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) {
    let cfg = &tuning.pickups;
    match kind {
        PickupKind::Health => state.player.heal(cfg.heal),
        PickupKind::Shield => state.player.shield.charge(tuning.player.shield_charge_duration),
        PickupKind::Weapon => {
            let mode = WeaponMode::TIMED[rng.index(WeaponMode::TIMED.len())];
            state.weapon.equip(mode, cfg.weapon_duration);
        }
        PickupKind::Speed => state.player.max_speed += cfg.speed_bonus,
    }
    state.score += state.combo.apply(cfg.score_bonus);
    state.particles.collect(position, rng);
    log::debug!("Collected {:?} pickup (weapon: {})", kind, state.weapon.mode.as_str());
}

fn spawn_pickup(state: &mut GameState, kind: PickupKind, position: Vec2, velocity: Vec2, tuning: &Tuning) {
    let id = state.next_entity_id();
    state
        .pickups
        .push(Pickup::new(id, kind, position, velocity, &tuning.pickups));
}

fn index_by_id(obstacles: &[Obstacle]) -> HashMap<EntityId, usize> {
    obstacles.iter().enumerate().map(|(i, o)| (o.id, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRandom, PcgRandom};
    use crate::sim::{Projectile, SizeClass};

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let mut state = GameState::new(&tuning, &mut PcgRandom::new(3));
        state.phase = GamePhase::Playing;
        (state, tuning)
    }

    fn add_rock(state: &mut GameState, tuning: &Tuning, size: SizeClass, pos: Vec2) -> EntityId {
        let id = state.next_entity_id();
        let rock = Obstacle::new(id, size, pos, Vec2::ZERO, tuning, 1.0, &mut PcgRandom::new(id as u64));
        state.obstacles.push(rock);
        id
    }

    fn add_bolt(state: &mut GameState, pos: Vec2, damage: f32) {
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, pos, Vec2::new(0.0, -600.0), 4.0, damage, 2.0));
    }

    #[test]
    fn test_projectile_kill_scores_with_multiplier() {
        let (mut state, tuning) = setup();
        // No drops, two fragments
        let mut rng = FixedRandom::constant(0.99);
        add_rock(&mut state, &tuning, SizeClass::Small, Vec2::new(100.0, 100.0));
        state.combo.count = 10;
        state.combo.multiplier = 2.0;
        add_bolt(&mut state, Vec2::new(100.0, 105.0), 50.0);

        resolve_projectile_hits(&mut state, &tuning, &mut rng);
        assert!(state.projectiles.is_empty());
        reap_destroyed(&mut state, &tuning, &mut rng, 0);

        assert_eq!(state.score, 100);
        assert_eq!(state.kills, 1);
        assert_eq!(state.combo.count, 11);
        assert_eq!(state.progression.xp, tuning.obstacles.small.xp);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.chain_queue.len(), 1);
    }

    #[test]
    fn test_kill_splits_and_spares_fragments() {
        let (mut state, tuning) = setup();
        let mut rng = FixedRandom::constant(0.99);
        add_rock(&mut state, &tuning, SizeClass::Large, Vec2::new(300.0, 200.0));
        state.obstacles[0].shatter();
        reap_destroyed(&mut state, &tuning, &mut rng, 0);

        assert_eq!(state.obstacles.len(), 2);
        assert!(state.obstacles.iter().all(|o| o.size == SizeClass::Medium));
        let blast = &state.chain_queue[0];
        assert_eq!(blast.spared.len(), 2);

        // The cascade never touches the fragments it spawned
        let healths: Vec<f32> = state.obstacles.iter().map(|o| o.health).collect();
        process_chain_queue(&mut state, &tuning, &mut rng, 1.0);
        assert_eq!(state.obstacles.iter().map(|o| o.health).collect::<Vec<_>>(), healths);
    }

    #[test]
    fn test_chain_cascade_is_bounded() {
        let (mut state, mut tuning) = setup();
        tuning.chain.delay = 0.0;
        tuning.chain.damage = 100.0;
        let mut rng = FixedRandom::constant(0.99);
        // A line of small rocks, each within reach of the next
        for i in 0..8 {
            add_rock(&mut state, &tuning, SizeClass::Small, Vec2::new(100.0 + 65.0 * i as f32, 300.0));
        }
        state.obstacles[0].shatter();
        reap_destroyed(&mut state, &tuning, &mut rng, 0);
        process_chain_queue(&mut state, &tuning, &mut rng, 0.0);

        // Direct kill plus at most max_depth generations down the line
        assert!(state.chain_queue.is_empty());
        assert_eq!(state.kills, 1 + tuning.chain.max_depth);
        assert_eq!(state.obstacles.len(), 8 - 1 - tuning.chain.max_depth as usize);
    }

    #[test]
    fn test_chain_delay_defers_detonation() {
        let (mut state, tuning) = setup();
        let mut rng = FixedRandom::constant(0.99);
        add_rock(&mut state, &tuning, SizeClass::Small, Vec2::new(100.0, 300.0));
        add_rock(&mut state, &tuning, SizeClass::Small, Vec2::new(150.0, 300.0));
        state.obstacles[0].shatter();
        reap_destroyed(&mut state, &tuning, &mut rng, 0);

        process_chain_queue(&mut state, &tuning, &mut rng, tuning.chain.delay * 0.5);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].health, state.obstacles[0].max_health);
        process_chain_queue(&mut state, &tuning, &mut rng, tuning.chain.delay);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.kills, 2);
    }

    #[test]
    fn test_ram_shatters_without_score() {
        let (mut state, tuning) = setup();
        let mut rng = FixedRandom::constant(0.99);
        let pos = state.player.position();
        add_rock(&mut state, &tuning, SizeClass::Medium, pos + Vec2::new(10.0, 0.0));
        resolve_player_hits(&mut state, &tuning, &mut rng);

        assert_eq!(state.player.health, 100.0 - tuning.obstacles.medium.damage);
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles.len(), 2);
        assert!(state.obstacles.iter().all(|o| o.size == SizeClass::Small));
        assert!(state.shake.intensity > 0.0);
    }

    #[test]
    fn test_shield_absorbs_ram() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        state.player.shield.toggle();
        let pos = state.player.position();
        add_rock(&mut state, &tuning, SizeClass::Huge, pos);
        resolve_player_hits(&mut state, &tuning, &mut rng);
        assert_eq!(state.player.health, 100.0);
        assert!(state.player.shield.strength < 100.0);
    }

    #[test]
    fn test_one_ram_costs_one_hit() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        state.player.shield.toggle();
        let pos = state.player.position();
        add_rock(&mut state, &tuning, SizeClass::Huge, pos + Vec2::new(20.0, 0.0));
        let before = state.player.health + state.player.shield.strength;
        for _ in 0..10 {
            resolve_player_hits(&mut state, &tuning, &mut rng);
        }
        let after = state.player.health + state.player.shield.strength;
        assert!((before - after - tuning.obstacles.huge.damage).abs() < 1e-4);
        assert_eq!(state.player.health, 100.0);
        assert!(state.obstacles.iter().all(|o| o.size == SizeClass::Large));
    }

    #[test]
    fn test_ram_fragments_start_clear_of_player() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(9);
        let pos = state.player.position();
        add_rock(&mut state, &tuning, SizeClass::Large, pos);
        resolve_player_hits(&mut state, &tuning, &mut rng);
        assert!(!state.obstacles.is_empty());
        for fragment in &mut state.obstacles {
            let gap = fragment.position().distance(pos) - state.player.radius - fragment.radius;
            assert!(gap > -1e-3);
            assert_eq!(fragment.ram_grace, tuning.obstacles.ram_grace);
            fragment.update(tuning.obstacles.ram_grace + 0.1, &tuning);
            assert_eq!(fragment.ram_grace, 0.0);
        }
    }

    #[test]
    fn test_lethal_hit_ends_run() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        state.player.health = 5.0;
        let pos = state.player.position();
        add_rock(&mut state, &tuning, SizeClass::Small, pos);
        resolve_player_hits(&mut state, &tuning, &mut rng);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_boss_knocks_player_back() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        let pos = state.player.position();
        let id = state.next_entity_id();
        let mut boss = Obstacle::boss(id, pos - Vec2::new(0.0, 100.0), &tuning, 1.0, &mut rng);
        boss.body.velocity = Vec2::new(0.0, 50.0);
        state.obstacles.push(boss);
        resolve_player_hits(&mut state, &tuning, &mut rng);

        assert_eq!(state.obstacles.len(), 1);
        assert!(!state.obstacles[0].is_destroyed());
        assert!(state.player.body.velocity.y > 0.0);
        assert_eq!(state.player.health, 100.0 - tuning.obstacles.boss.damage);
    }

    #[test]
    fn test_boss_defeat_drops_pickups() {
        let (mut state, tuning) = setup();
        let mut rng = FixedRandom::constant(0.99);
        let id = state.next_entity_id();
        let mut boss = Obstacle::boss(id, Vec2::new(400.0, 100.0), &tuning, 1.0, &mut rng);
        boss.shatter();
        state.obstacles.push(boss);
        reap_destroyed(&mut state, &tuning, &mut rng, 0);

        assert_eq!(state.score, tuning.obstacles.boss.score);
        assert_eq!(state.pickups.len(), tuning.pickups.boss_drops as usize);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.shake.intensity, tuning.effects.boss_shake);
    }

    #[test]
    fn test_pickup_effects_apply_once() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        state.player.health = 50.0;
        let pos = state.player.position();
        spawn_pickup(&mut state, PickupKind::Health, pos, Vec2::ZERO, &tuning);
        spawn_pickup(&mut state, PickupKind::Speed, pos, Vec2::ZERO, &tuning);
        update_pickups(&mut state, &tuning, &mut rng);

        assert!(state.pickups.is_empty());
        assert_eq!(state.player.health, 50.0 + tuning.pickups.heal);
        assert_eq!(state.player.max_speed, tuning.player.max_speed + tuning.pickups.speed_bonus);
        assert_eq!(state.score, 2 * tuning.pickups.score_bonus);
    }

    #[test]
    fn test_weapon_and_shield_pickups() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        let pos = state.player.position();
        spawn_pickup(&mut state, PickupKind::Weapon, pos, Vec2::ZERO, &tuning);
        spawn_pickup(&mut state, PickupKind::Shield, pos, Vec2::ZERO, &tuning);
        update_pickups(&mut state, &tuning, &mut rng);

        assert_ne!(state.weapon.mode, WeaponMode::Blaster);
        assert_eq!(state.weapon.remaining, tuning.pickups.weapon_duration);
        assert!(state.player.shield.is_charged());
    }

    #[test]
    fn test_magnet_pulls_nearby_pickups() {
        let (mut state, tuning) = setup();
        let mut rng = PcgRandom::new(5);
        let pos = state.player.position() - Vec2::new(100.0, 0.0);
        spawn_pickup(&mut state, PickupKind::Health, pos, Vec2::ZERO, &tuning);
        update_pickups(&mut state, &tuning, &mut rng);
        state.pickups[0].update(0.1);
        assert!(state.pickups[0].body.velocity.x > 0.0);
    }

    #[test]
    fn test_obstacles_bounce_apart() {
        let (mut state, tuning) = setup();
        add_rock(&mut state, &tuning, SizeClass::Medium, Vec2::new(200.0, 200.0));
        add_rock(&mut state, &tuning, SizeClass::Medium, Vec2::new(230.0, 200.0));
        state.obstacles[0].body.velocity = Vec2::new(50.0, 0.0);
        state.obstacles[1].body.velocity = Vec2::new(-50.0, 0.0);
        resolve_obstacle_contacts(&mut state, &tuning);

        assert!(state.obstacles[0].body.velocity.x < 0.0);
        assert!(state.obstacles[1].body.velocity.x > 0.0);
        let gap = state.obstacles[1].position().x - state.obstacles[0].position().x;
        assert!(gap >= 44.0 - 1e-3);
    }

    #[test]
    fn test_obstacles_bounce_off_side_walls() {
        let (mut state, tuning) = setup();
        add_rock(&mut state, &tuning, SizeClass::Small, Vec2::new(5.0, 200.0));
        state.obstacles[0].body.velocity = Vec2::new(-40.0, 30.0);
        resolve_obstacle_contacts(&mut state, &tuning);
        assert_eq!(state.obstacles[0].position().x, tuning.obstacles.small.radius);
        assert!(state.obstacles[0].body.velocity.x > 0.0);
    }
}
