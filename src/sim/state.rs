//! Game state and core simulation types
//!
//! The whole match lives in one [`GameState`] owned by the caller; nothing is
//! global. Renderers read the public fields directly after each tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::spawn::Spawner;
use crate::config::ArenaConfig;
use crate::direction;

/// Match lifecycle
///
/// `Idle -> Running -> (Paused <-> Running) -> GameOver -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Fresh or reset state, waiting for start
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused; nothing advances
    Paused,
    /// Planet destroyed; waiting for reset
    GameOver,
}

/// Playfield size in pixels (canvas client size)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite sizes can't host anything
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Whether `pos` lies inside the playfield grown by `margin` on every side
    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// An incoming asteroid
#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Visual size; collision radius is half of it
    pub size: f32,
    pub hp: u32,
    pub max_hp: u32,
}

impl Asteroid {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32, hp_divisor: f32) -> Self {
        let max_hp = max_hp_for_size(size, hp_divisor);
        Self {
            id,
            pos,
            vel,
            size,
            hp: max_hp,
            max_hp,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Remaining health in [0, 1] (for the damage overlay)
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// Take one rocket hit. Returns true if this destroyed the asteroid.
    pub fn take_hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }

    /// Points awarded for destroying this asteroid
    pub fn points(&self) -> u64 {
        self.size.round().max(0.0) as u64
    }
}

/// Hit points for an asteroid of the given size (always at least 1)
pub fn max_hp_for_size(size: f32, hp_divisor: f32) -> u32 {
    (size / hp_divisor).round().max(1.0) as u32
}

/// A rocket fired by the turret
#[derive(Debug, Clone)]
pub struct Rocket {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per tick (renderer draws the trail behind it)
    pub vel: Vec2,
    pub radius: f32,
}

/// What spawned a particle (renderer picks the color)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Rocket struck an asteroid
    Spark,
    /// Asteroid destroyed
    Debris,
    /// Asteroid hit the planet
    Impact,
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    pub max_life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Remaining life in [0, 1] (for the fade)
    pub fn life_ratio(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// The player's turret
#[derive(Debug, Clone, Default)]
pub struct Turret {
    /// Base position, recomputed from the playfield every tick
    pub pos: Vec2,
    /// Aim angle (radians, canvas coordinates: +y is down)
    pub angle: f32,
    /// Last known pointer position
    pub aim_target: Vec2,
    /// Ticks until the next rocket may fire
    pub cooldown: u32,
}

impl Turret {
    /// Where new rockets appear
    pub fn muzzle(&self, offset: f32) -> Vec2 {
        self.pos + direction(self.angle) * offset
    }

    pub fn ready(&self) -> bool {
        self.cooldown == 0
    }
}

/// Things that happened during a tick, for audio/HUD/overlay collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    AsteroidSpawned { id: u32 },
    RocketFired { id: u32 },
    AsteroidHit { id: u32, hp_left: u32 },
    AsteroidDestroyed { id: u32, points: u64 },
    PlanetImpact { id: u32, damage: f32 },
    /// Emitted exactly once per match
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: ArenaConfig,
    pub phase: GamePhase,
    pub playfield: Playfield,
    pub score: u64,
    /// Planet health in [0, max_planet_health]
    pub health: f32,
    pub turret: Turret,
    /// Active asteroids (sorted by id for determinism)
    pub asteroids: Vec<Asteroid>,
    /// Active rockets (sorted by id for determinism)
    pub rockets: Vec<Rocket>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub spawner: Spawner,
    /// Simulation tick counter (since last reset)
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) game_over_signaled: bool,
    next_id: u32,
}

impl GameState {
    /// Create an idle game with the given seed
    pub fn new(seed: u64, config: ArenaConfig) -> Self {
        let spawner = Spawner::new(&config);
        let health = config.max_planet_health;
        Self {
            seed,
            config,
            phase: GamePhase::Idle,
            playfield: Playfield::default(),
            score: 0,
            health,
            turret: Turret::default(),
            asteroids: Vec::new(),
            rockets: Vec::new(),
            particles: Vec::new(),
            spawner,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            game_over_signaled: false,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a match. Starting from GameOver resets first.
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Idle => {}
            GamePhase::GameOver => self.reset(),
            GamePhase::Running | GamePhase::Paused => return,
        }
        self.phase = GamePhase::Running;
        log::info!("Match started (seed {})", self.seed);
    }

    /// Running <-> Paused. Ignored in other phases.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Idle | GamePhase::GameOver => {
                log::debug!("Pause ignored in {:?}", self.phase);
                return;
            }
        };
        log::info!("Phase -> {:?}", self.phase);
    }

    /// Discard the match and return to Idle
    ///
    /// The RNG stream keeps going, so a reset is not a replay.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.health = self.config.max_planet_health;
        self.asteroids.clear();
        self.rockets.clear();
        self.particles.clear();
        self.spawner = Spawner::new(&self.config);
        self.turret.cooldown = 0;
        self.time_ticks = 0;
        self.game_over_signaled = false;
        log::info!("Match reset");
    }

    /// Update the playfield size (canvas resize)
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        if self.playfield.is_degenerate() {
            log::warn!(
                "Degenerate playfield {}x{}: spawning disabled until resized",
                width,
                height
            );
        }
    }

    pub fn planet_center(&self) -> Vec2 {
        Vec2::new(
            self.playfield.width / 2.0,
            self.playfield.height * self.config.planet_center_y_fraction,
        )
    }

    pub fn planet_radius(&self) -> f32 {
        self.playfield.width.min(self.playfield.height) * self.config.planet_radius_fraction
    }

    /// Turret base position for the current playfield
    pub fn turret_base(&self) -> Vec2 {
        Vec2::new(
            self.playfield.width / 2.0,
            self.playfield.height * self.config.turret_y_fraction,
        )
    }

    /// Planet health damage dealt by an asteroid of this size
    pub fn impact_damage(&self, size: f32) -> f32 {
        (size / self.config.impact_damage_divisor)
            .round()
            .max(self.config.min_impact_damage)
    }

    /// Spawn a burst of particles flying out in random directions
    pub fn spawn_particles(&mut self, pos: Vec2, kind: ParticleKind, count: u32) {
        let life = self.config.particle_lifetime_ticks;
        if life == 0 || count == 0 {
            return;
        }
        let (speed_min, speed_max) = (self.config.particle_speed_min, self.config.particle_speed_max);
        for _ in 0..count {
            let angle = uniform(&mut self.rng, 0.0, std::f32::consts::TAU);
            let speed = uniform(&mut self.rng, speed_min, speed_max);
            self.particles.push(Particle {
                pos,
                vel: direction(angle) * speed,
                life,
                max_life: life,
                kind,
            });
        }

        // Over the cap: drop the oldest
        let cap = self.config.max_particles;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.asteroids.sort_by_key(|a| a.id);
        self.rockets.sort_by_key(|r| r.id);
    }
}

/// Uniform sample from `[lo, hi)`; collapses to `lo` for an empty range
pub(crate) fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
