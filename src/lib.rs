//! Planet Defense - a turret vs. asteroids arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, collisions, game state)
//! - `config`: Data-driven game balance
//! - `renderer`: Canvas 2D drawing of the current state

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::ArenaConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Game configuration constants
///
/// These are the defaults for [`ArenaConfig`]; the simulation itself only
/// reads the config.
pub mod consts {
    /// Spawn timer starts here (ms between asteroids)
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 1400.0;
    /// Interval shrinks by this much on every spawn
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 12.0;
    /// Difficulty floor
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 450.0;

    /// Asteroid visual size range (pixels, diameter-ish)
    pub const ASTEROID_MIN_SIZE: f32 = 10.0;
    pub const ASTEROID_MAX_SIZE: f32 = 60.0;
    /// One hit point per this many pixels of size
    pub const ASTEROID_HP_DIVISOR: f32 = 12.0;
    /// Base speed range (pixels/tick)
    pub const ASTEROID_BASE_SPEED_MIN: f32 = 0.6;
    pub const ASTEROID_BASE_SPEED_MAX: f32 = 2.4;
    /// Extra speed = min(MAX_SCORE_SPEED_BONUS, score / SCORE_SPEED_DIVISOR)
    pub const SCORE_SPEED_DIVISOR: f32 = 50.0;
    pub const MAX_SCORE_SPEED_BONUS: f32 = 3.5;

    /// Asteroids appear this far outside the playfield edge
    pub const SPAWN_EDGE_OFFSET: f32 = 50.0;
    /// Side spawns stay in the upper part of the playfield
    pub const SIDE_SPAWN_HEIGHT_FRACTION: f32 = 1.0 / 1.4;
    pub const TOP_EDGE_CHANCE: f32 = 0.6;
    pub const LEFT_EDGE_CHANCE: f32 = 0.2;

    /// Rockets
    pub const ROCKET_SPEED: f32 = 8.0;
    pub const ROCKET_RADIUS: f32 = 4.0;
    /// Cooldown counts ticks, not milliseconds
    pub const ROCKET_COOLDOWN_TICKS: u32 = 12;
    /// Rockets leave the barrel this far from the turret base
    pub const MUZZLE_OFFSET: f32 = 24.0;
    pub const ROCKET_BOUNDS_MARGIN: f32 = 20.0;
    pub const ASTEROID_CULL_MARGIN: f32 = 200.0;

    /// Particles
    pub const PARTICLE_LIFETIME_TICKS: u32 = 60;
    pub const PARTICLE_SPEED_MIN: f32 = 1.0;
    pub const PARTICLE_SPEED_MAX: f32 = 5.0;
    pub const HIT_BURST: u32 = 8;
    pub const DESTROY_BURST: u32 = 24;
    pub const IMPACT_BURST: u32 = 30;
    pub const MAX_PARTICLES: usize = 1024;

    /// Planet sits low and centered; radius scales with the short side
    pub const PLANET_CENTER_Y_FRACTION: f32 = 0.78;
    pub const PLANET_RADIUS_FRACTION: f32 = 0.18;
    /// Impact triggers slightly inside the planet's edge
    pub const PLANET_IMPACT_INSET: f32 = 6.0;
    pub const TURRET_Y_FRACTION: f32 = 0.72;

    /// Impact damage = max(MIN_IMPACT_DAMAGE, round(size / IMPACT_DAMAGE_DIVISOR))
    pub const MIN_IMPACT_DAMAGE: f32 = 4.0;
    pub const IMPACT_DAMAGE_DIVISOR: f32 = 8.0;
    pub const MAX_PLANET_HEALTH: f32 = 100.0;
}

/// Unit direction vector for an angle (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
