//! Hit shape primitives.
//!
//! Two shapes cover every hurtbox and strike in the encounter:
//! - Circles, for heads, bodies, and blobs
//! - Capsules (a segment swept by a radius), for limbs, tails, and blades
//!
//! Shapes are `Copy` values. Anything that stores one owns its own copy,
//! so a rig frame, a registry entry, and a query result never alias.
//!
//! # Example
//!
//! ```
//! use telegraph_kernel::shape::Shape;
//!
//! let a = Shape::circle(0.0, 0.0, 10.0);
//! let b = Shape::circle(10.0, 0.0, 20.0);
//! let mid = a.lerp(&b, 0.5);
//! assert_eq!(mid, Shape::circle(5.0, 0.0, 15.0));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use telegraph_common::Pose;

/// Shape of a hurtbox or strike area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Circle centred on `(x, y)`.
    Circle {
        /// Centre X.
        x: f32,
        /// Centre Y.
        y: f32,
        /// Radius.
        r: f32,
    },
    /// Segment `(ax, ay)`-`(bx, by)` with rounded radius `r`.
    Capsule {
        /// Segment start X.
        ax: f32,
        /// Segment start Y.
        ay: f32,
        /// Segment end X.
        bx: f32,
        /// Segment end Y.
        by: f32,
        /// Radius around the segment.
        r: f32,
    },
}

impl Shape {
    /// Create a circle.
    #[must_use]
    pub const fn circle(x: f32, y: f32, r: f32) -> Self {
        Self::Circle { x, y, r }
    }

    /// Create a capsule.
    #[must_use]
    pub const fn capsule(ax: f32, ay: f32, bx: f32, by: f32, r: f32) -> Self {
        Self::Capsule { ax, ay, bx, by, r }
    }

    /// Radius of the shape.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        match self {
            Self::Circle { r, .. } | Self::Capsule { r, .. } => *r,
        }
    }

    /// Circle centre, or capsule segment midpoint.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        match *self {
            Self::Circle { x, y, .. } => Vec2::new(x, y),
            Self::Capsule { ax, ay, bx, by, .. } => Vec2::new((ax + bx) * 0.5, (ay + by) * 0.5),
        }
    }

    /// Core segment of the shape. A circle is a zero-length segment.
    #[must_use]
    pub fn segment(&self) -> (Vec2, Vec2) {
        match *self {
            Self::Circle { x, y, .. } => (Vec2::new(x, y), Vec2::new(x, y)),
            Self::Capsule { ax, ay, bx, by, .. } => (Vec2::new(ax, ay), Vec2::new(bx, by)),
        }
    }

    /// True for a capsule whose segment has (near) zero length.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Circle { .. } => false,
            Self::Capsule { .. } => {
                let (a, b) = self.segment();
                a.distance_squared(b) <= crate::overlap::SEGMENT_EPSILON
            },
        }
    }

    /// Radius of a circle around [`Shape::center`] that encloses the shape.
    #[must_use]
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Circle { r, .. } => *r,
            Self::Capsule { r, .. } => {
                let (a, b) = self.segment();
                a.distance(b) * 0.5 + r
            },
        }
    }

    /// Interpolate towards `other`.
    ///
    /// `t` is clamped to `[0, 1]`. Same-kind shapes blend every field;
    /// mixed kinds snap to `self` below 0.5 and to `other` from 0.5 on.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: f32, b: f32| a + (b - a) * t;
        match (*self, *other) {
            (
                Self::Circle { x, y, r },
                Self::Circle {
                    x: x2,
                    y: y2,
                    r: r2,
                },
            ) => Self::Circle {
                x: mix(x, x2),
                y: mix(y, y2),
                r: mix(r, r2),
            },
            (
                Self::Capsule { ax, ay, bx, by, r },
                Self::Capsule {
                    ax: ax2,
                    ay: ay2,
                    bx: bx2,
                    by: by2,
                    r: r2,
                },
            ) => Self::Capsule {
                ax: mix(ax, ax2),
                ay: mix(ay, ay2),
                bx: mix(bx, bx2),
                by: mix(by, by2),
                r: mix(r, r2),
            },
            _ if t < 0.5 => *self,
            _ => *other,
        }
    }

    /// Shift the shape by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        match *self {
            Self::Circle { x, y, r } => Self::Circle {
                x: x + dx,
                y: y + dy,
                r,
            },
            Self::Capsule { ax, ay, bx, by, r } => Self::Capsule {
                ax: ax + dx,
                ay: ay + dy,
                bx: bx + dx,
                by: by + dy,
                r,
            },
        }
    }

    /// Map a model-space shape into world space (rotate, then translate).
    #[must_use]
    pub fn transformed(&self, pose: &Pose) -> Self {
        match *self {
            Self::Circle { x, y, r } => {
                let c = pose.to_world(Vec2::new(x, y));
                Self::Circle { x: c.x, y: c.y, r }
            },
            Self::Capsule { ax, ay, bx, by, r } => {
                let a = pose.to_world(Vec2::new(ax, ay));
                let b = pose.to_world(Vec2::new(bx, by));
                Self::Capsule {
                    ax: a.x,
                    ay: a.y,
                    bx: b.x,
                    by: b.y,
                    r,
                }
            },
        }
    }
}
