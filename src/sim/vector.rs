//! 2D vector helpers
//!
//! Positions and velocities are plain `glam::Vec2`. Addition, subtraction and
//! scaling use the operators; the few game-specific operations live on
//! [`VectorExt`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space vector (x grows right, y grows down)
pub type Vector = Vec2;

/// Cartesian axis, used to pick which component a reflection negates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

pub trait VectorExt {
    /// Negate the component along `axis`
    fn reflect_across(self, axis: Axis) -> Self;
    /// Component-wise clamp into `[lower, upper]`
    fn clamp_between(self, lower: Self, upper: Self) -> Self;
    /// Euclidean norm
    fn magnitude(self) -> f32;
}

impl VectorExt for Vec2 {
    #[inline]
    fn reflect_across(self, axis: Axis) -> Self {
        match axis {
            Axis::X => Vec2::new(-self.x, self.y),
            Axis::Y => Vec2::new(self.x, -self.y),
        }
    }

    #[inline]
    fn clamp_between(self, lower: Self, upper: Self) -> Self {
        // Upper first, then lower, so lower wins if the bounds ever cross
        self.min(upper).max(lower)
    }

    #[inline]
    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).magnitude()
}

/// Straight up the screen
pub const UP: Vec2 = Vec2::new(0.0, -1.0);
