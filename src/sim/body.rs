//! Body entity and its display color

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_BODY_RADIUS;

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    /// Color given to the selected body
    pub const HIGHLIGHT: Color = Color::WHITE;

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b])
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color([rng.random(), rng.random(), rng.random()])
    }
}

/// Stable body identifier, never reused within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// A circular body
#[derive(Debug, Clone, Serialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    /// Distance per frame
    pub vel: Vec2,
    pub color: Color,
    radius: f32,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, vel: Vec2, color: Color, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            color,
            radius: sanitize_radius(radius),
        }
    }

    /// Always positive
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether `point` lies strictly inside the body
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        crate::distance(self.pos, point) < self.radius
    }

    /// Stop the body and paint it with the highlight color
    pub fn arm(&mut self) {
        self.vel = Vec2::ZERO;
        self.color = Color::HIGHLIGHT;
    }
}

fn sanitize_radius(radius: f32) -> f32 {
    // `max` maps NaN to the minimum too
    radius.max(MIN_BODY_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_stays_positive() {
        let body = Body::new(BodyId(1), Vec2::ZERO, Vec2::ZERO, Color::WHITE, -3.0);
        assert_eq!(body.radius(), MIN_BODY_RADIUS);
        let body = Body::new(BodyId(1), Vec2::ZERO, Vec2::ZERO, Color::WHITE, f32::NAN);
        assert_eq!(body.radius(), MIN_BODY_RADIUS);
    }

    #[test]
    fn test_contains() {
        let body = Body::new(BodyId(1), Vec2::new(100.0, 100.0), Vec2::ZERO, Color::WHITE, 20.0);
        assert!(body.contains(Vec2::new(110.0, 110.0)));
        assert!(!body.contains(Vec2::new(120.0, 100.0)));
    }

    #[test]
    fn test_arm() {
        let mut body = Body::new(
            BodyId(1),
            Vec2::ZERO,
            Vec2::new(3.0, -2.0),
            Color::rgb(1, 2, 3),
            20.0,
        );
        body.arm();
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.color, Color::HIGHLIGHT);
    }
}
