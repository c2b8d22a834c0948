//! Collision detection and response for circular bodies
//!
//! Body-body contacts are resolved as equal-mass elastic collisions along the
//! contact normal. Walls reflect one velocity axis at a time.

use glam::Vec2;

use super::body::Body;
use crate::WallPolicy;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the two circles overlap
    pub hit: bool,
    /// Unit normal pointing from the second body toward the first
    pub normal: Vec2,
    /// Overlap depth (sum of radii minus center distance)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check two circles for overlap.
///
/// Coincident centers have no defined normal; `+X` is used so the pair still
/// separates instead of dividing by zero.
pub fn circle_collision(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let d = pos_a - pos_b;
    let dist = d.length();
    let radius_sum = radius_a + radius_b;

    if dist >= radius_sum {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        normal: crate::unit_normal(d, Vec2::X),
        penetration: radius_sum - dist,
    }
}

/// Whether two bodies touch (center distance below the sum of radii)
#[inline]
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    crate::distance(a.pos, b.pos) < a.radius() + b.radius()
}

/// Resolve an elastic collision between two equal-mass bodies.
///
/// Exchanges the normal velocity components, leaves the tangential ones
/// untouched, then pushes each body half the overlap apart along the normal.
/// Returns true if the bodies were in contact.
pub fn resolve_elastic(a: &mut Body, b: &mut Body) -> bool {
    let result = circle_collision(a.pos, a.radius(), b.pos, b.radius());
    if !result.hit {
        return false;
    }

    let n = result.normal;
    let p = a.vel.dot(n) - b.vel.dot(n);
    a.vel -= p * n;
    b.vel += p * n;

    let correction = n * (result.penetration * 0.5);
    a.pos += correction;
    b.pos -= correction;

    true
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Which axes bounced this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    pub x: bool,
    pub y: bool,
}

/// Flip each velocity axis whose coordinate sits at or past `[radius, extent - radius]`.
pub fn bounce_off_walls(body: &mut Body, width: f32, height: f32, policy: WallPolicy) -> WallHit {
    let r = body.radius();
    let mut hit = WallHit::default();

    if body.pos.x <= r || body.pos.x >= width - r {
        body.vel = reflect_velocity(body.vel, Vec2::X);
        hit.x = true;
        if policy == WallPolicy::ReflectAndClamp {
            body.pos.x = clamp_axis(body.pos.x, r, width);
        }
    }
    if body.pos.y <= r || body.pos.y >= height - r {
        body.vel = reflect_velocity(body.vel, Vec2::Y);
        hit.y = true;
        if policy == WallPolicy::ReflectAndClamp {
            body.pos.y = clamp_axis(body.pos.y, r, height);
        }
    }

    hit
}

/// Pull a body back inside `[radius, extent - radius]` on both axes.
/// Velocity is left alone. Returns true if the position changed.
pub fn contain(body: &mut Body, width: f32, height: f32) -> bool {
    let r = body.radius();
    let before = body.pos;
    body.pos.x = clamp_axis(body.pos.x, r, width);
    body.pos.y = clamp_axis(body.pos.y, r, height);
    body.pos != before
}

/// Clamp into `[radius, extent - radius]`; a body wider than the arena is centered
fn clamp_axis(coord: f32, radius: f32, extent: f32) -> f32 {
    if 2.0 * radius >= extent {
        extent * 0.5
    } else {
        coord.clamp(radius, extent - radius)
    }
}
