//! Overlap and distance queries between hit shapes.
//!
//! All overlap tests use a closed boundary: shapes that exactly touch
//! count as overlapping. [`OVERLAP_EPSILON`] is added to every squared
//! threshold so rounding at tangency never turns a touch into a miss.
//!
//! # Example
//!
//! ```
//! use telegraph_kernel::overlap::{shapes_overlap, distance_to_shape};
//! use telegraph_kernel::shape::Shape;
//! use glam::Vec2;
//!
//! let body = Shape::circle(0.0, 0.0, 10.0);
//! let tail = Shape::capsule(20.0, -5.0, 20.0, 5.0, 10.0);
//! assert!(shapes_overlap(&body, &tail));
//! assert_eq!(distance_to_shape(Vec2::new(30.0, 0.0), &body), 20.0);
//! ```

use glam::Vec2;

use crate::shape::Shape;

/// Tolerance added to squared overlap thresholds.
pub const OVERLAP_EPSILON: f32 = 1e-6;

/// Squared length below which a segment is treated as a point.
pub const SEGMENT_EPSILON: f32 = 1e-8;

/// Closest point to `p` on segment `a`-`b`.
#[must_use]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= SEGMENT_EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Squared distance from `p` to segment `a`-`b`.
#[must_use]
pub fn segment_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance_squared(closest_point_on_segment(p, a, b))
}

/// Squared minimum distance between segments `p1`-`q1` and `p2`-`q2`.
///
/// Both parameters are clamped to `[0, 1]`. Zero-length segments are
/// treated as points and parallel segments fall back to `s = 0`.
#[must_use]
pub fn segments_distance_sq(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> f32 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= SEGMENT_EPSILON && e <= SEGMENT_EPSILON {
        return r.length_squared();
    }

    let (s, t) = if a <= SEGMENT_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= SEGMENT_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom.abs() > SEGMENT_EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    c1.distance_squared(c2)
}

/// Whether two shapes touch or overlap. Symmetric.
#[must_use]
pub fn shapes_overlap(a: &Shape, b: &Shape) -> bool {
    let reach = a.radius() + b.radius();
    let threshold = reach * reach + OVERLAP_EPSILON;
    match (*a, *b) {
        (Shape::Circle { x, y, .. }, Shape::Circle { x: x2, y: y2, .. }) => {
            Vec2::new(x, y).distance_squared(Vec2::new(x2, y2)) <= threshold
        },
        (Shape::Circle { x, y, .. }, Shape::Capsule { .. }) => {
            let (sa, sb) = b.segment();
            segment_distance_sq(Vec2::new(x, y), sa, sb) <= threshold
        },
        (Shape::Capsule { .. }, Shape::Circle { x, y, .. }) => {
            let (sa, sb) = a.segment();
            segment_distance_sq(Vec2::new(x, y), sa, sb) <= threshold
        },
        (Shape::Capsule { .. }, Shape::Capsule { .. }) => {
            let (p1, q1) = a.segment();
            let (p2, q2) = b.segment();
            segments_distance_sq(p1, q1, p2, q2) <= threshold
        },
    }
}

/// Distance from `point` to the surface of `shape`; 0 when inside.
#[must_use]
pub fn distance_to_shape(point: Vec2, shape: &Shape) -> f32 {
    match *shape {
        Shape::Circle { x, y, r } => (point.distance(Vec2::new(x, y)) - r).max(0.0),
        Shape::Capsule { r, .. } => {
            let (a, b) = shape.segment();
            (segment_distance_sq(point, a, b).sqrt() - r).max(0.0)
        },
    }
}

/// Whether any shape in `a` overlaps any shape in `b`. Stops at the first hit.
#[must_use]
pub fn shapes_intersect(a: &[Shape], b: &[Shape]) -> bool {
    a.iter()
        .any(|sa| b.iter().any(|sb| shapes_overlap(sa, sb)))
}
