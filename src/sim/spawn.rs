//! Asteroid spawning and difficulty progression
//!
//! The only difficulty rule: every spawn shortens the spawn interval by a
//! fixed step, down to a floor. Asteroid speed also creeps up with score.

use glam::Vec2;
use rand::Rng;

use super::state::{Asteroid, GameState, uniform};
use crate::config::ArenaConfig;
use crate::{angle_between, direction};

/// Spawn timer state
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    /// Milliseconds accumulated since the last spawn
    pub timer_ms: f32,
    /// Current gap between spawns
    pub interval_ms: f32,
    /// Asteroids spawned this match
    pub spawned: u32,
}

impl Spawner {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms: config.initial_spawn_interval_ms,
            spawned: 0,
        }
    }

    /// Add elapsed wall time. Returns true when a spawn is due; the timer is
    /// then cleared and the interval shrinks by one step.
    ///
    /// At most one spawn per call, however long the frame was.
    pub fn accumulate(&mut self, elapsed_ms: f32, config: &ArenaConfig) -> bool {
        self.timer_ms += elapsed_ms;
        if self.timer_ms <= self.interval_ms {
            return false;
        }
        self.timer_ms = 0.0;
        self.spawned += 1;
        self.interval_ms =
            (self.interval_ms - config.spawn_interval_step_ms).max(config.min_spawn_interval_ms);
        true
    }
}

/// Which playfield edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Left,
    Right,
}

impl SpawnEdge {
    /// Map a roll in [0, 1) onto an edge using the configured odds
    pub fn from_roll(roll: f32, config: &ArenaConfig) -> Self {
        if roll < config.top_edge_chance {
            SpawnEdge::Top
        } else if roll < config.top_edge_chance + config.left_edge_chance {
            SpawnEdge::Left
        } else {
            SpawnEdge::Right
        }
    }
}

/// Create one asteroid just outside a random edge, heading for the planet
///
/// Returns the new asteroid's id, or None if the playfield can't host one.
pub fn spawn_asteroid(state: &mut GameState) -> Option<u32> {
    if state.playfield.is_degenerate() {
        return None;
    }

    let target = state.planet_center();
    let (width, height) = (state.playfield.width, state.playfield.height);
    let score = state.score as f32;
    let cfg = &state.config;
    let rng = &mut state.rng;

    let size = uniform(rng, cfg.asteroid_min_size, cfg.asteroid_max_size).floor();
    let edge = SpawnEdge::from_roll(rng.random::<f32>(), cfg);
    let side_band = height * cfg.side_spawn_height_fraction;
    let pos = match edge {
        SpawnEdge::Top => Vec2::new(uniform(rng, 0.0, width), -cfg.spawn_edge_offset),
        SpawnEdge::Left => Vec2::new(-cfg.spawn_edge_offset, uniform(rng, 0.0, side_band)),
        SpawnEdge::Right => Vec2::new(
            width + cfg.spawn_edge_offset,
            uniform(rng, 0.0, side_band),
        ),
    };

    let speed = uniform(rng, cfg.asteroid_base_speed_min, cfg.asteroid_base_speed_max)
        + (score / cfg.score_speed_divisor).min(cfg.max_score_speed_bonus);
    let vel = direction(angle_between(pos, target)) * speed;
    let hp_divisor = cfg.asteroid_hp_divisor;

    let id = state.next_entity_id();
    let asteroid = Asteroid::new(id, pos, vel, size, hp_divisor);
    log::debug!(
        "Spawned asteroid {} ({:?} edge, size {}, hp {}, speed {:.2})",
        id,
        edge,
        size,
        asteroid.max_hp,
        speed
    );
    state.asteroids.push(asteroid);
    Some(id)
}
