//! Shape generation for 2D primitives
//!
//! Turns a [`GameState`] into a flat list of shapes in playfield pixels.
//! Nothing here touches the browser, so the layout can be tested natively;
//! [`super::canvas`] just replays the list.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameState, ParticleKind};

/// RGBA color (alpha in [0, 1])
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Scene colors
pub mod palette {
    use super::Color;

    pub const SPACE: Color = Color::rgb(0, 0, 0);
    pub const STAR: Color = Color::rgb(255, 255, 255);
    pub const PLANET: Color = Color::rgb(11, 125, 208);
    pub const PLANET_GLOW: Color = Color::rgba(30, 160, 250, 0.25);
    pub const PLANET_SHINE: Color = Color::rgba(255, 255, 255, 0.06);
    pub const TURRET_BARREL: Color = Color::rgb(17, 17, 17);
    pub const TURRET_ACCENT: Color = Color::rgb(42, 169, 255);
    pub const TURRET_BASE: Color = Color::rgb(28, 39, 51);
    pub const ROCKET: Color = Color::rgb(255, 213, 139);
    pub const ROCKET_TRAIL: Color = Color::rgba(255, 180, 80, 0.3);
    pub const ASTEROID: Color = Color::rgb(200, 150, 120);
    pub const ASTEROID_DAMAGE: Color = Color::rgb(255, 120, 120);
    pub const SPARK: Color = Color::rgb(255, 203, 107);
    pub const DEBRIS: Color = Color::rgb(255, 107, 107);
    pub const IMPACT: Color = Color::rgb(255, 79, 79);
    pub const AIM_LINE: Color = Color::rgba(255, 255, 255, 0.08);
}

/// Particle color by what spawned it
pub fn particle_color(kind: ParticleKind) -> Color {
    match kind {
        ParticleKind::Spark => palette::SPARK,
        ParticleKind::Debris => palette::DEBRIS,
        ParticleKind::Impact => palette::IMPACT,
    }
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Rectangle given in a local frame translated to `origin` and rotated by `angle`
    RotatedRect {
        origin: Vec2,
        angle: f32,
        offset: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: Color,
    },
    /// Radial gradient disc fading from `inner_color` at `inner` to `outer_color` at `outer`
    Glow {
        center: Vec2,
        inner: f32,
        outer: f32,
        inner_color: Color,
        outer_color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        dashed: bool,
    },
}

/// Background stars in normalized [0, 1) coordinates
#[derive(Debug, Clone)]
pub struct Starfield {
    /// (x, y, size)
    pub stars: Vec<(f32, f32, f32)>,
}

/// Stars in the default background
pub const STAR_COUNT: usize = 120;

impl Starfield {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| {
                (
                    rng.random::<f32>(),
                    rng.random::<f32>(),
                    rng.random::<f32>() * 1.6,
                )
            })
            .collect();
        Self { stars }
    }
}

/// Build the full frame, back to front
///
/// `time_ms` only drives the cosmetic asteroid spin.
pub fn frame_shapes(state: &GameState, stars: &Starfield, time_ms: f64) -> Vec<Shape> {
    let field = state.playfield;
    if field.is_degenerate() {
        return Vec::new();
    }

    let mut shapes = Vec::with_capacity(
        stars.stars.len() + state.asteroids.len() * 2 + state.rockets.len() * 2
            + state.particles.len()
            + 16,
    );

    // Starfield
    shapes.push(Shape::Rect {
        pos: Vec2::ZERO,
        size: Vec2::new(field.width, field.height),
        color: palette::SPACE,
    });
    for &(x, y, s) in &stars.stars {
        shapes.push(Shape::Circle {
            center: Vec2::new(x * field.width, y * field.height),
            radius: s,
            color: palette::STAR.with_alpha(0.6 * s),
        });
    }

    // Planet
    let center = state.planet_center();
    let radius = state.planet_radius();
    shapes.push(Shape::Glow {
        center,
        inner: radius * 0.2,
        outer: radius * 1.8,
        inner_color: palette::PLANET_GLOW,
        outer_color: palette::SPACE.with_alpha(0.0),
    });
    shapes.push(Shape::Circle {
        center,
        radius,
        color: palette::PLANET,
    });
    shapes.push(Shape::Circle {
        center: center - Vec2::splat(radius * 0.4),
        radius: radius * 0.5,
        color: palette::PLANET_SHINE,
    });

    // Turret
    let turret = &state.turret;
    shapes.push(Shape::RotatedRect {
        origin: turret.pos,
        angle: turret.angle,
        offset: Vec2::new(0.0, -8.0),
        size: Vec2::new(40.0, 16.0),
        color: palette::TURRET_BARREL,
    });
    shapes.push(Shape::RotatedRect {
        origin: turret.pos,
        angle: turret.angle,
        offset: Vec2::new(-6.0, -12.0),
        size: Vec2::new(12.0, 8.0),
        color: palette::TURRET_ACCENT,
    });
    shapes.push(Shape::Circle {
        center: turret.pos,
        radius: 20.0,
        color: palette::TURRET_BASE,
    });

    // Rockets with a trail ellipse behind them
    for rocket in &state.rockets {
        shapes.push(Shape::Circle {
            center: rocket.pos,
            radius: rocket.radius,
            color: palette::ROCKET,
        });
        shapes.push(Shape::Ellipse {
            center: rocket.pos - rocket.vel * 2.0,
            radii: Vec2::new(rocket.radius * 2.3, rocket.radius),
            rotation: 0.0,
            color: palette::ROCKET_TRAIL,
        });
    }

    // Asteroids, tinted as they take damage
    let time_secs = (time_ms / 1000.0) as f32;
    for asteroid in &state.asteroids {
        let spin = time_secs * (0.2 + (asteroid.size % 7.0) * 0.02);
        shapes.push(Shape::Ellipse {
            center: asteroid.pos,
            radii: Vec2::new(asteroid.size * 0.6, asteroid.size * 0.45),
            rotation: spin,
            color: palette::ASTEROID,
        });
        let health = asteroid.hp_ratio();
        if health < 1.0 {
            let local = Vec2::new(-asteroid.size * 0.15, -asteroid.size * 0.05);
            shapes.push(Shape::Circle {
                center: asteroid.pos + Vec2::from_angle(spin).rotate(local),
                radius: asteroid.size * 0.22,
                color: palette::ASTEROID_DAMAGE.with_alpha(1.0 - health),
            });
        }
    }

    // Particles fade out over their lifetime
    for particle in &state.particles {
        shapes.push(Shape::Circle {
            center: particle.pos,
            radius: 2.5,
            color: particle_color(particle.kind).with_alpha(particle.life_ratio()),
        });
    }

    // Aim line
    shapes.push(Shape::Line {
        from: turret.pos,
        to: turret.aim_target,
        color: palette::AIM_LINE,
        dashed: true,
    });

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArenaConfig;
    use crate::sim::{Asteroid, Particle};

    #[test]
    fn test_css_color() {
        assert_eq!(palette::ROCKET.css(), "rgba(255,213,139,1)");
        assert_eq!(palette::SPARK.with_alpha(2.0).a, 1.0);
    }

    #[test]
    fn test_starfield_is_seeded() {
        let a = Starfield::new(3, STAR_COUNT);
        let b = Starfield::new(3, STAR_COUNT);
        assert_eq!(a.stars, b.stars);
        assert_eq!(a.stars.len(), 120);
        assert!(a.stars.iter().all(|&(x, y, s)| {
            (0.0..1.0).contains(&x) && (0.0..1.0).contains(&y) && (0.0..1.6).contains(&s)
        }));
    }

    #[test]
    fn test_empty_frame_for_degenerate_playfield() {
        let state = GameState::new(1, ArenaConfig::default());
        let shapes = frame_shapes(&state, &Starfield::new(1, STAR_COUNT), 0.0);
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_damaged_asteroid_gets_overlay() {
        let mut state = GameState::new(1, ArenaConfig::default());
        state.resize(800.0, 600.0);
        let mut asteroid = Asteroid::new(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 48.0, 12.0);
        let stars = Starfield::new(1, 0);

        state.asteroids.push(asteroid.clone());
        let whole = frame_shapes(&state, &stars, 0.0).len();

        asteroid.take_hit();
        state.asteroids[0] = asteroid;
        let damaged = frame_shapes(&state, &stars, 0.0);
        assert_eq!(damaged.len(), whole + 1);
        let overlay_alpha = damaged.iter().find_map(|s| match s {
            Shape::Circle { color, .. } if color.r == 255 && color.g == 120 => Some(color.a),
            _ => None,
        });
        assert_eq!(overlay_alpha, Some(0.25));
    }

    #[test]
    fn test_particles_fade_with_life() {
        let mut state = GameState::new(1, ArenaConfig::default());
        state.resize(800.0, 600.0);
        state.particles.push(Particle {
            pos: Vec2::new(5.0, 5.0),
            vel: Vec2::ZERO,
            life: 15,
            max_life: 60,
            kind: ParticleKind::Impact,
        });
        let shapes = frame_shapes(&state, &Starfield::new(1, 0), 0.0);
        assert!(shapes.contains(&Shape::Circle {
            center: Vec2::new(5.0, 5.0),
            radius: 2.5,
            color: palette::IMPACT.with_alpha(0.25),
        }));
    }
}
