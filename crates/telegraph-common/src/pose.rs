//! World pose and angle helpers for the top-down plane.
//!
//! Angles are radians, counter-clockwise from +X. Rotation is applied
//! before translation when mapping model space to world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Position and facing of an entity in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// X coordinate in world space
    pub x: f32,
    /// Y coordinate in world space
    pub y: f32,
    /// Facing angle in radians (0 = +X)
    pub angle: f32,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(x: f32, y: f32, angle: f32) -> Self {
        Self { x, y, angle }
    }

    /// Position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Unit vector along the facing angle.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Maps a model-space point into world space.
    #[must_use]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.forward().rotate(local) + self.position()
    }
}

/// Converts degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Wraps an angle into `(-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Absolute smallest difference between two angles, in `[0, PI]`.
#[must_use]
pub fn angle_between(a: f32, b: f32) -> f32 {
    wrap_angle(a - b).abs()
}
