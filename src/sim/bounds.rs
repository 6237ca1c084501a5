//! Play area and toroidal wrap
//!
//! The play area is what an orthographic camera looking straight down the
//! y axis sees. World x maps to NDC x; world z maps to NDC -y (screen up is
//! world -z). A body leaving one edge reappears at the opposite edge.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::body::Body;

/// NDC offsets of the nine tiles a wrapped body may be drawn in
pub const GHOST_OFFSETS: [Vec2; 9] = [
    Vec2::new(-2.0, 2.0),
    Vec2::new(0.0, 2.0),
    Vec2::new(2.0, 2.0),
    Vec2::new(-2.0, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(2.0, 0.0),
    Vec2::new(-2.0, -2.0),
    Vec2::new(0.0, -2.0),
    Vec2::new(2.0, -2.0),
];

/// The playable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Half-height (world z extent)
    range: f32,
    /// Width / height
    aspect: f32,
}

impl WorldBounds {
    pub fn new(range: f32, aspect: f32) -> Self {
        debug_assert!(range > 0.0 && aspect > 0.0, "bounds must be positive");
        Self { range, aspect }
    }

    /// Resize for a new viewport aspect; height is kept
    pub fn set_aspect(&mut self, aspect: f32) {
        debug_assert!(aspect > 0.0, "aspect must be positive");
        self.aspect = aspect;
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.range * self.aspect
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.range
    }

    pub fn width(&self) -> f32 {
        2.0 * self.half_width()
    }

    pub fn height(&self) -> f32 {
        2.0 * self.half_height()
    }

    /// World position to normalized device position
    #[inline]
    pub fn to_ndc(&self, position: Vec3) -> Vec2 {
        Vec2::new(position.x / self.half_width(), -position.z / self.half_height())
    }

    /// Normalized device position back to the world plane (y = 0)
    #[inline]
    pub fn from_ndc(&self, ndc: Vec2) -> Vec3 {
        Vec3::new(ndc.x * self.half_width(), 0.0, -ndc.y * self.half_height())
    }

    /// Whether a world position lies inside the rectangle (edges included)
    pub fn contains(&self, position: Vec3) -> bool {
        let ndc = self.to_ndc(position);
        ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0
    }

    /// Wrap a position across the rectangle's edges
    ///
    /// Each axis is shifted by one full span at most, so a body moving less
    /// than a span per tick always lands inside.
    pub fn wrap_position(&self, position: Vec3) -> Vec3 {
        if self.contains(position) {
            return position;
        }

        let mut ndc = self.to_ndc(position);
        if ndc.x > 1.0 {
            ndc.x -= 2.0;
        } else if ndc.x < -1.0 {
            ndc.x += 2.0;
        }
        if ndc.y > 1.0 {
            ndc.y -= 2.0;
        } else if ndc.y < -1.0 {
            ndc.y += 2.0;
        }

        let wrapped = self.from_ndc(ndc);
        Vec3::new(wrapped.x, position.y, wrapped.z)
    }

    /// Wrap a body in place; velocity and rotation are untouched
    pub fn wrap(&self, body: &mut Body) {
        body.position = self.wrap_position(body.position);
    }

    /// NDC offsets for drawing wrapped copies of a body
    pub fn ghost_offsets(&self) -> &'static [Vec2; 9] {
        &GHOST_OFFSETS
    }

    /// World-space translation matching a ghost offset
    pub fn ghost_translation(&self, offset: Vec2) -> Vec3 {
        self.from_ndc(offset)
    }
}
