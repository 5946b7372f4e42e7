//! Game balance and arena layout
//!
//! Every number the simulation uses lives here so that the different
//! "asteroid defense" variants are one sim with different configs. Fields
//! default to the constants in [`crate::consts`]; a JSON document only needs
//! to name the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable parameters for one arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === Spawning / difficulty ===
    pub initial_spawn_interval_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub min_spawn_interval_ms: f32,
    pub spawn_edge_offset: f32,
    /// Fraction of playfield height used for left/right spawns
    pub side_spawn_height_fraction: f32,
    pub top_edge_chance: f32,
    pub left_edge_chance: f32,

    // === Asteroids ===
    pub asteroid_min_size: f32,
    pub asteroid_max_size: f32,
    pub asteroid_hp_divisor: f32,
    pub asteroid_base_speed_min: f32,
    pub asteroid_base_speed_max: f32,
    pub score_speed_divisor: f32,
    pub max_score_speed_bonus: f32,
    pub asteroid_cull_margin: f32,

    // === Turret / rockets ===
    pub rocket_speed: f32,
    pub rocket_radius: f32,
    pub rocket_cooldown_ticks: u32,
    pub muzzle_offset: f32,
    pub rocket_bounds_margin: f32,
    pub turret_y_fraction: f32,

    // === Particles (cosmetic) ===
    pub particle_lifetime_ticks: u32,
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    pub hit_burst: u32,
    pub destroy_burst: u32,
    pub impact_burst: u32,
    pub max_particles: usize,

    // === Planet ===
    pub planet_center_y_fraction: f32,
    pub planet_radius_fraction: f32,
    pub planet_impact_inset: f32,
    pub min_impact_damage: f32,
    pub impact_damage_divisor: f32,
    pub max_planet_health: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_edge_offset: SPAWN_EDGE_OFFSET,
            side_spawn_height_fraction: SIDE_SPAWN_HEIGHT_FRACTION,
            top_edge_chance: TOP_EDGE_CHANCE,
            left_edge_chance: LEFT_EDGE_CHANCE,

            asteroid_min_size: ASTEROID_MIN_SIZE,
            asteroid_max_size: ASTEROID_MAX_SIZE,
            asteroid_hp_divisor: ASTEROID_HP_DIVISOR,
            asteroid_base_speed_min: ASTEROID_BASE_SPEED_MIN,
            asteroid_base_speed_max: ASTEROID_BASE_SPEED_MAX,
            score_speed_divisor: SCORE_SPEED_DIVISOR,
            max_score_speed_bonus: MAX_SCORE_SPEED_BONUS,
            asteroid_cull_margin: ASTEROID_CULL_MARGIN,

            rocket_speed: ROCKET_SPEED,
            rocket_radius: ROCKET_RADIUS,
            rocket_cooldown_ticks: ROCKET_COOLDOWN_TICKS,
            muzzle_offset: MUZZLE_OFFSET,
            rocket_bounds_margin: ROCKET_BOUNDS_MARGIN,
            turret_y_fraction: TURRET_Y_FRACTION,

            particle_lifetime_ticks: PARTICLE_LIFETIME_TICKS,
            particle_speed_min: PARTICLE_SPEED_MIN,
            particle_speed_max: PARTICLE_SPEED_MAX,
            hit_burst: HIT_BURST,
            destroy_burst: DESTROY_BURST,
            impact_burst: IMPACT_BURST,
            max_particles: MAX_PARTICLES,

            planet_center_y_fraction: PLANET_CENTER_Y_FRACTION,
            planet_radius_fraction: PLANET_RADIUS_FRACTION,
            planet_impact_inset: PLANET_IMPACT_INSET,
            min_impact_damage: MIN_IMPACT_DAMAGE,
            impact_damage_divisor: IMPACT_DAMAGE_DIVISOR,
            max_planet_health: MAX_PLANET_HEALTH,
        }
    }
}

impl ArenaConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the sim divide by zero, spin forever,
    /// or produce NaN positions
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("initial_spawn_interval_ms", self.initial_spawn_interval_ms)?;
        positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        non_negative("spawn_interval_step_ms", self.spawn_interval_step_ms)?;
        if self.min_spawn_interval_ms > self.initial_spawn_interval_ms {
            return Err(ConfigError::invalid(
                "min_spawn_interval_ms",
                "must not exceed initial_spawn_interval_ms",
            ));
        }
        non_negative("spawn_edge_offset", self.spawn_edge_offset)?;
        fraction("side_spawn_height_fraction", self.side_spawn_height_fraction)?;
        fraction("top_edge_chance", self.top_edge_chance)?;
        fraction("left_edge_chance", self.left_edge_chance)?;
        if self.top_edge_chance + self.left_edge_chance > 1.0 {
            return Err(ConfigError::invalid(
                "left_edge_chance",
                "top_edge_chance + left_edge_chance must not exceed 1",
            ));
        }

        positive("asteroid_min_size", self.asteroid_min_size)?;
        positive("asteroid_max_size", self.asteroid_max_size)?;
        if self.asteroid_min_size > self.asteroid_max_size {
            return Err(ConfigError::invalid(
                "asteroid_min_size",
                "must not exceed asteroid_max_size",
            ));
        }
        positive("asteroid_hp_divisor", self.asteroid_hp_divisor)?;
        non_negative("asteroid_base_speed_min", self.asteroid_base_speed_min)?;
        if self.asteroid_base_speed_min > self.asteroid_base_speed_max {
            return Err(ConfigError::invalid(
                "asteroid_base_speed_min",
                "must not exceed asteroid_base_speed_max",
            ));
        }
        positive("score_speed_divisor", self.score_speed_divisor)?;
        non_negative("max_score_speed_bonus", self.max_score_speed_bonus)?;
        non_negative("asteroid_cull_margin", self.asteroid_cull_margin)?;

        positive("rocket_speed", self.rocket_speed)?;
        positive("rocket_radius", self.rocket_radius)?;
        non_negative("muzzle_offset", self.muzzle_offset)?;
        non_negative("rocket_bounds_margin", self.rocket_bounds_margin)?;
        fraction("turret_y_fraction", self.turret_y_fraction)?;

        non_negative("particle_speed_min", self.particle_speed_min)?;
        if self.particle_speed_min > self.particle_speed_max {
            return Err(ConfigError::invalid(
                "particle_speed_min",
                "must not exceed particle_speed_max",
            ));
        }

        fraction("planet_center_y_fraction", self.planet_center_y_fraction)?;
        fraction("planet_radius_fraction", self.planet_radius_fraction)?;
        non_negative("planet_impact_inset", self.planet_impact_inset)?;
        non_negative("min_impact_damage", self.min_impact_damage)?;
        positive("impact_damage_divisor", self.impact_damage_divisor)?;
        positive("max_planet_health", self.max_planet_health)?;

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite number > 0"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite number >= 0"))
    }
}

fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be within [0, 1]"))
    }
}
