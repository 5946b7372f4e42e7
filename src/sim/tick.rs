//! One simulation step per animation frame
//!
//! Entities move a fixed amount per tick (no delta-time scaling); only the
//! spawn timer uses elapsed wall time. Removals are collected during a pass
//! and compacted once at the end of it.

use glam::Vec2;

use super::collision::{circles_overlap, within_radius};
use super::spawn::spawn_asteroid;
use super::state::{GameEvent, GamePhase, GameState, ParticleKind, Rocket};
use crate::angle_between;

/// Input for a single tick, captured between frames
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in playfield pixels (None keeps the last aim)
    pub aim: Option<Vec2>,
    /// Fire request (click/space). Edge-triggered: dropped if the turret is
    /// still cooling down.
    pub fire: bool,
    /// Idle/demo mode - autopilot aims and fires
    pub idle_mode: bool,
}

/// Advance the game by one frame
///
/// Does nothing unless the match is running. A frame with no elapsed time
/// (or a nonsense one) is a no-op, so repeated `advance(.., 0.0)` calls never
/// change the state.
pub fn advance(state: &mut GameState, input: &TickInput, elapsed_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }
    if !(elapsed_ms.is_finite() && elapsed_ms > 0.0) {
        return events;
    }

    let mut input = input.clone();
    if input.idle_mode {
        apply_autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    let degenerate = state.playfield.is_degenerate();

    // Spawn
    if !degenerate && state.spawner.accumulate(elapsed_ms, &state.config) {
        if let Some(id) = spawn_asteroid(state) {
            events.push(GameEvent::AsteroidSpawned { id });
        }
    }

    // Turret follows the playfield and the pointer
    state.turret.pos = state.turret_base();
    if let Some(aim) = input.aim {
        state.turret.aim_target = aim;
    }
    state.turret.angle = angle_between(state.turret.pos, state.turret.aim_target);
    state.turret.cooldown = state.turret.cooldown.saturating_sub(1);

    // Fire (cooldown is in ticks, so fire rate follows frame rate)
    if input.fire && state.turret.ready() && !degenerate {
        let id = state.next_entity_id();
        let pos = state.turret.muzzle(state.config.muzzle_offset);
        let vel = crate::direction(state.turret.angle) * state.config.rocket_speed;
        state.rockets.push(Rocket {
            id,
            pos,
            vel,
            radius: state.config.rocket_radius,
        });
        state.turret.cooldown = state.config.rocket_cooldown_ticks;
        events.push(GameEvent::RocketFired { id });
    }

    integrate(state);
    resolve_rocket_hits(state, &mut events);
    resolve_planet_impacts(state, &mut events);

    // Terminal check
    if state.health <= 0.0 {
        state.health = 0.0;
        state.phase = GamePhase::GameOver;
        if !state.game_over_signaled {
            state.game_over_signaled = true;
            log::info!(
                "Game over: score {} after {} ticks",
                state.score,
                state.time_ticks
            );
            events.push(GameEvent::GameOver {
                final_score: state.score,
            });
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
    events
}

/// Euler step for everything, then prune what left the field or burned out
fn integrate(state: &mut GameState) {
    let playfield = state.playfield;
    let rocket_margin = state.config.rocket_bounds_margin;
    let asteroid_margin = state.config.asteroid_cull_margin;

    for rocket in &mut state.rockets {
        rocket.pos += rocket.vel;
    }
    state
        .rockets
        .retain(|r| playfield.contains(r.pos, rocket_margin));

    for asteroid in &mut state.asteroids {
        asteroid.pos += asteroid.vel;
    }
    state
        .asteroids
        .retain(|a| playfield.contains(a.pos, asteroid_margin));

    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

/// Rockets vs. asteroids
///
/// Each asteroid takes at most one rocket per tick (the first live one in id
/// order), and a rocket is spent on the first asteroid it hits.
fn resolve_rocket_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.rockets.is_empty() || state.asteroids.is_empty() {
        return;
    }

    let hit_burst = state.config.hit_burst;
    let destroy_burst = state.config.destroy_burst;
    let mut spent = vec![false; state.rockets.len()];
    let mut bursts: Vec<(Vec2, ParticleKind, u32)> = Vec::new();

    for asteroid in &mut state.asteroids {
        let hit = state
            .rockets
            .iter()
            .enumerate()
            .find(|(j, r)| {
                !spent[*j] && circles_overlap(asteroid.pos, asteroid.radius(), r.pos, r.radius)
            })
            .map(|(j, r)| (j, r.pos));
        let Some((j, rocket_pos)) = hit else {
            continue;
        };

        spent[j] = true;
        bursts.push((rocket_pos, ParticleKind::Spark, hit_burst));
        let destroyed = asteroid.take_hit();
        events.push(GameEvent::AsteroidHit {
            id: asteroid.id,
            hp_left: asteroid.hp,
        });

        if destroyed {
            let points = asteroid.points();
            state.score += points;
            bursts.push((asteroid.pos, ParticleKind::Debris, destroy_burst));
            events.push(GameEvent::AsteroidDestroyed {
                id: asteroid.id,
                points,
            });
            log::debug!("Asteroid {} destroyed (+{})", asteroid.id, points);
        }
    }

    let mut idx = 0;
    state.rockets.retain(|_| {
        let keep = !spent[idx];
        idx += 1;
        keep
    });
    state.asteroids.retain(|a| a.hp > 0);

    for (pos, kind, count) in bursts {
        state.spawn_particles(pos, kind, count);
    }
}

/// Asteroids vs. planet. Runs after rocket hits, so anything destroyed this
/// tick is already gone and can't also damage the planet.
fn resolve_planet_impacts(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.asteroids.is_empty() {
        return;
    }

    let center = state.planet_center();
    let planet_radius = state.planet_radius();
    let inset = state.config.planet_impact_inset;

    let mut impacts: Vec<(u32, Vec2, f32)> = Vec::new();
    state.asteroids.retain(|a| {
        let impact_radius = planet_radius - inset + a.radius();
        if within_radius(a.pos, center, impact_radius) {
            impacts.push((a.id, a.pos, a.size));
            false
        } else {
            true
        }
    });

    let impact_burst = state.config.impact_burst;
    for (id, pos, size) in impacts {
        let damage = state.impact_damage(size);
        state.health = (state.health - damage).max(0.0);
        state.spawn_particles(pos, ParticleKind::Impact, impact_burst);
        events.push(GameEvent::PlanetImpact { id, damage });
        log::debug!("Asteroid {} hit the planet (-{}, health {})", id, damage, state.health);
    }
}

/// Demo mode: aim at the asteroid closest to the planet, leading it by its
/// velocity, and keep the trigger held
fn apply_autopilot(state: &GameState, input: &mut TickInput) {
    let center = state.planet_center();
    let threat = state.asteroids.iter().min_by(|a, b| {
        a.pos
            .distance_squared(center)
            .partial_cmp(&b.pos.distance_squared(center))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(threat) = threat else {
        return;
    };

    let turret = state.turret_base();
    // Ticks until a rocket covers the current distance
    let lead_ticks = turret.distance(threat.pos) / state.config.rocket_speed;
    input.aim = Some(threat.pos + threat.vel * lead_ticks);
    input.fire = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::sim::state::Asteroid;
    use proptest::prelude::*;

    const FRAME_MS: f32 = 16.0;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, ArenaConfig::default());
        state.resize(800.0, 600.0);
        state.start();
        state
    }

    fn place_asteroid(state: &mut GameState, pos: Vec2, size: f32) -> u32 {
        let id = state.next_entity_id();
        let divisor = state.config.asteroid_hp_divisor;
        state
            .asteroids
            .push(Asteroid::new(id, pos, Vec2::ZERO, size, divisor));
        id
    }

    fn place_rocket(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let radius = state.config.rocket_radius;
        state.rockets.push(Rocket {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
        });
        id
    }

    /// Everything gameplay-relevant, for "did anything change" checks
    fn fingerprint(state: &GameState) -> String {
        format!(
            "{:?}|{}|{}|{:?}|{:?}|{:?}|{:?}|{:?}|{}",
            state.phase,
            state.score,
            state.health,
            state.turret,
            state.asteroids,
            state.rockets,
            state.particles,
            state.spawner,
            state.time_ticks
        )
    }

    #[test]
    fn test_idle_state_does_not_advance() {
        let mut state = GameState::new(1, ArenaConfig::default());
        state.resize(800.0, 600.0);
        let events = advance(&mut state, &TickInput::default(), 5000.0);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert!(state.asteroids.is_empty());
    }

    #[test]
    fn test_paused_state_does_not_decay() {
        let mut state = running_state(2);
        place_asteroid(&mut state, Vec2::new(100.0, 100.0), 30.0);
        state.asteroids[0].vel = Vec2::new(1.0, 1.0);
        state.toggle_pause();
        let before = fingerprint(&state);
        for _ in 0..10 {
            advance(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(before, fingerprint(&state));
    }

    #[test]
    fn test_spawn_interval_progression() {
        let mut state = running_state(3);
        for _ in 0..10 {
            let due = state.spawner.interval_ms + 1.0;
            let events = advance(&mut state, &TickInput::default(), due);
            assert!(
                events
                    .iter()
                    .any(|e| matches!(e, GameEvent::AsteroidSpawned { .. }))
            );
        }
        assert_eq!(state.spawner.interval_ms, 1400.0 - 120.0);
        assert_eq!(state.asteroids.len(), 10);
    }

    #[test]
    fn test_big_asteroid_takes_five_hits() {
        let mut state = running_state(4);
        let pos = Vec2::new(400.0, 100.0);
        let id = place_asteroid(&mut state, pos, 60.0);
        assert_eq!(state.asteroids[0].max_hp, 5);

        for hit in 1..=4 {
            place_rocket(&mut state, pos);
            let events = advance(&mut state, &TickInput::default(), 1.0);
            assert!(events.contains(&GameEvent::AsteroidHit {
                id,
                hp_left: 5 - hit
            }));
            assert_eq!(state.asteroids.len(), 1);
            assert_eq!(state.score, 0);
            assert!(state.rockets.is_empty());
        }

        place_rocket(&mut state, pos);
        let events = advance(&mut state, &TickInput::default(), 1.0);
        assert!(events.contains(&GameEvent::AsteroidDestroyed { id, points: 60 }));
        assert!(state.asteroids.is_empty());
        assert_eq!(state.score, 60);
        // Five spark bursts (none burned out yet) plus debris for the kill
        assert_eq!(state.particles.len(), 5 * 8 + 24);
    }

    #[test]
    fn test_one_rocket_per_asteroid_per_tick() {
        let mut state = running_state(5);
        let pos = Vec2::new(300.0, 150.0);
        place_asteroid(&mut state, pos, 36.0);
        let first = place_rocket(&mut state, pos);
        let second = place_rocket(&mut state, pos + Vec2::new(2.0, 0.0));

        advance(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.asteroids[0].hp, 2);
        assert_eq!(state.rockets.len(), 1);
        assert_eq!(state.rockets[0].id, second);
        assert_ne!(state.rockets[0].id, first);
    }

    #[test]
    fn test_fire_cooldown_in_ticks() {
        let mut state = running_state(6);
        let input = TickInput {
            aim: Some(Vec2::new(400.0, 0.0)),
            fire: true,
            ..Default::default()
        };

        let mut fired_at = Vec::new();
        for tick in 0..30 {
            let events = advance(&mut state, &input, FRAME_MS);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::RocketFired { .. }))
            {
                fired_at.push(tick);
            }
        }
        assert_eq!(fired_at, vec![0, 12, 24]);
    }

    #[test]
    fn test_rocket_leaves_muzzle_along_aim() {
        let mut state = running_state(7);
        let input = TickInput {
            aim: Some(Vec2::new(400.0, 0.0)),
            fire: true,
            ..Default::default()
        };
        advance(&mut state, &input, FRAME_MS);
        let rocket = &state.rockets[0];
        // Straight up from the turret base at (400, 432): muzzle 24 up, then one step of 8
        assert!((rocket.pos.x - 400.0).abs() < 1e-3);
        assert!((rocket.pos.y - (432.0 - 24.0 - 8.0)).abs() < 1e-2);
        assert!(rocket.vel.abs_diff_eq(Vec2::new(0.0, -8.0), 1e-4));
    }

    #[test]
    fn test_rockets_pruned_outside_bounds() {
        let mut state = running_state(8);
        let id = place_rocket(&mut state, Vec2::new(795.0, 300.0));
        state.rockets[0].vel = Vec2::new(8.0, 0.0);
        for _ in 0..3 {
            advance(&mut state, &TickInput::default(), 1.0);
        }
        // 795 -> 819 is inside the 20px margin
        assert!(state.rockets.iter().any(|r| r.id == id));
        advance(&mut state, &TickInput::default(), 1.0);
        assert!(state.rockets.is_empty());
    }

    #[test]
    fn test_asteroids_culled_after_shrink() {
        let mut state = running_state(12);
        let gone = place_asteroid(&mut state, Vec2::new(700.0, 50.0), 30.0);
        let kept = place_asteroid(&mut state, Vec2::new(499.0, 50.0), 30.0);

        state.resize(300.0, 600.0);
        let events = advance(&mut state, &TickInput::default(), 1.0);

        // 700 is 400px past the right edge, 499 only 199px
        assert!(!state.asteroids.iter().any(|a| a.id == gone));
        assert!(state.asteroids.iter().any(|a| a.id == kept));
        assert_eq!(state.score, 0);
        assert_eq!(state.health, 100.0);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::PlanetImpact { .. }))
        );
    }

    #[test]
    fn test_planet_impact() {
        let mut state = running_state(9);
        let center = state.planet_center();
        // Threshold for size 40: 108 - 6 + 20 = 122
        let inside = place_asteroid(&mut state, center - Vec2::new(0.0, 121.0), 40.0);
        let outside = place_asteroid(&mut state, center - Vec2::new(0.0, 123.0), 40.0);

        let events = advance(&mut state, &TickInput::default(), 1.0);
        assert!(events.contains(&GameEvent::PlanetImpact {
            id: inside,
            damage: 5.0
        }));
        assert_eq!(state.health, 95.0);
        assert_eq!(state.asteroids.len(), 1);
        assert_eq!(state.asteroids[0].id, outside);
        assert_eq!(state.particles.len(), 30);
    }

    #[test]
    fn test_destroyed_asteroid_cannot_hit_planet() {
        let mut state = running_state(10);
        let pos = state.planet_center() - Vec2::new(0.0, 50.0);
        let id = place_asteroid(&mut state, pos, 10.0);
        place_rocket(&mut state, pos);

        let events = advance(&mut state, &TickInput::default(), 1.0);
        assert!(events.contains(&GameEvent::AsteroidDestroyed { id, points: 10 }));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::PlanetImpact { .. }))
        );
        assert_eq!(state.health, 100.0);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = running_state(11);
        state.health = 3.0;
        let center = state.planet_center();
        place_asteroid(&mut state, center, 20.0);
        place_asteroid(&mut state, center, 20.0);

        let events = advance(&mut state, &TickInput::default(), FRAME_MS);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert_eq!(state.health, 0.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Frozen until reset
        let frozen = fingerprint(&state);
        for _ in 0..100 {
            let events = advance(&mut state, &TickInput::default(), 5000.0);
            assert!(events.is_empty());
        }
        assert_eq!(frozen, fingerprint(&state));
    }

    #[test]
    fn test_degenerate_playfield_stays_empty() {
        let mut state = GameState::new(12, ArenaConfig::default());
        state.resize(0.0, 0.0);
        state.start();
        let input = TickInput {
            aim: Some(Vec2::new(10.0, 10.0)),
            fire: true,
            ..Default::default()
        };
        for _ in 0..50 {
            advance(&mut state, &input, 5000.0);
        }
        assert!(state.asteroids.is_empty());
        assert!(state.rockets.is_empty());
        assert!(state.turret.angle.is_finite());
        assert!(state.turret.pos.is_finite());
    }

    #[test]
    fn test_autopilot_engages_nearest_threat() {
        let mut state = running_state(13);
        place_asteroid(&mut state, Vec2::new(50.0, 50.0), 30.0);
        let near = place_asteroid(&mut state, Vec2::new(600.0, 300.0), 30.0);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let events = advance(&mut state, &input, FRAME_MS);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::RocketFired { .. }))
        );
        let near_pos = state.asteroids.iter().find(|a| a.id == near).unwrap().pos;
        let expected = angle_between(state.turret.pos, near_pos);
        assert!((state.turret.angle - expected).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running_state(99999);
        let mut state2 = running_state(99999);

        let inputs = [
            TickInput {
                aim: Some(Vec2::new(100.0, 50.0)),
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
        ];

        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            let e1 = advance(&mut state1, input, 120.0);
            let e2 = advance(&mut state2, input, 120.0);
            assert_eq!(e1, e2);
        }
        assert_eq!(fingerprint(&state1), fingerprint(&state2));
    }

    fn frame_strategy() -> impl Strategy<Value = Vec<(f32, bool, f32, f32)>> {
        prop::collection::vec(
            (0.0f32..2000.0, any::<bool>(), 0.0f32..800.0, 0.0f32..600.0),
            1..250,
        )
    }

    fn play(state: &mut GameState, frames: &[(f32, bool, f32, f32)]) {
        for &(dt, fire, x, y) in frames {
            let input = TickInput {
                aim: Some(Vec2::new(x, y)),
                fire,
                idle_mode: false,
            };
            advance(state, &input, dt);
        }
    }

    proptest! {
        #[test]
        fn prop_counters_stay_in_range(seed in any::<u64>(), frames in frame_strategy()) {
            let mut state = running_state(seed);
            let mut last_score = 0;
            for &(dt, fire, x, y) in &frames {
                let input = TickInput { aim: Some(Vec2::new(x, y)), fire, idle_mode: false };
                advance(&mut state, &input, dt);

                prop_assert!((0.0..=100.0).contains(&state.health));
                prop_assert!(state.score >= last_score);
                last_score = state.score;
                for a in &state.asteroids {
                    prop_assert!(a.hp >= 1 && a.hp <= a.max_hp);
                }
                for p in &state.particles {
                    prop_assert!(p.life > 0 && p.life <= p.max_life);
                }
                prop_assert!(state.spawner.interval_ms >= 450.0);
            }
        }

        #[test]
        fn prop_zero_elapsed_is_noop(seed in any::<u64>(), frames in frame_strategy(), repeats in 1usize..20) {
            let mut state = running_state(seed);
            play(&mut state, &frames);

            let before = fingerprint(&state);
            let input = TickInput { aim: Some(Vec2::new(1.0, 2.0)), fire: true, idle_mode: true };
            for _ in 0..repeats {
                prop_assert!(advance(&mut state, &input, 0.0).is_empty());
            }
            prop_assert_eq!(before, fingerprint(&state));
        }

        #[test]
        fn prop_reset_restores_initial_state(seed in any::<u64>(), frames in frame_strategy()) {
            let mut state = running_state(seed);
            play(&mut state, &frames);

            state.reset();
            prop_assert_eq!(state.phase, GamePhase::Idle);
            prop_assert_eq!(state.score, 0);
            prop_assert_eq!(state.health, 100.0);
            prop_assert!(state.asteroids.is_empty());
            prop_assert!(state.rockets.is_empty());
            prop_assert!(state.particles.is_empty());
            prop_assert_eq!(state.spawner.interval_ms, 1400.0);
            prop_assert_eq!(state.spawner.timer_ms, 0.0);
        }
    }
}
