//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, within_radius};
pub use spawn::{SpawnEdge, Spawner, spawn_asteroid};
pub use state::{
    Asteroid, GameEvent, GamePhase, GameState, Particle, ParticleKind, Playfield, Rocket, Turret,
    max_hp_for_size,
};
pub use tick::{TickInput, advance};
