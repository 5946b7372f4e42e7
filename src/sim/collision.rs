//! Circle collision tests
//!
//! Everything in the arena is a circle, so all tests compare squared
//! distances against squared radius sums (no square roots).

use glam::Vec2;

/// True if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// True if `point` is strictly closer than `radius` to `center`
///
/// A negative radius never matches.
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    radius > 0.0 && point.distance_squared(center) < radius * radius
}
