//! Area-of-effect queries over the hitbox registry.
//!
//! Answers "which registered hurtboxes fall inside this attack" for four
//! areas, each anchored at an origin pose (position plus aim angle):
//! - **Sector**: a pie slice of `range` and `half_angle` around the aim
//! - **Ring**: an annulus between `inner` and `outer` radii
//! - **Lane**: a rectangle `length` long and `2 * half_width` wide along the aim
//! - **Stab**: a lane, optionally also required to lie inside a sector
//!
//! Capsules are tested approximately. Sector and lane tests sample points
//! along the capsule's segment (see [`capsule_sample_count`]) and test each
//! as a circle. The ring test bounds the capsule by its endpoint distances,
//! which can over-include a capsule whose midpoint dips inside `inner`.
//!
//! Queries never mutate the registry or apply damage.
//!
//! # Example
//!
//! ```
//! use telegraph_common::{deg_to_rad, OwnerId, Pose, TeamId, HurtboxId};
//! use telegraph_gameplay::query::HurtboxQuery;
//! use telegraph_gameplay::registry::{HitboxRegistry, HurtboxEntry};
//! use telegraph_kernel::Shape;
//!
//! let mut registry: HitboxRegistry = HitboxRegistry::new();
//! registry.register_hurtboxes(
//!     TeamId::Monsters,
//!     OwnerId::new(),
//!     vec![HurtboxEntry::new(HurtboxId::new(0), Shape::circle(60.0, 0.0, 10.0))],
//! );
//!
//! let hits = HurtboxQuery::new(&registry, Pose::new(0.0, 0.0, 0.0))
//!     .with_team(TeamId::Monsters)
//!     .within_arc(64.0, deg_to_rad(45.0));
//! assert_eq!(hits.len(), 1);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use telegraph_common::{angle_between, Pose, TeamId};
use telegraph_kernel::{Shape, OVERLAP_EPSILON};

use crate::registry::{HitboxRegistry, HurtboxData, RegisteredHurtbox};
use crate::team::TeamTable;

/// Minimum number of samples taken along a capsule.
pub const MIN_CAPSULE_SAMPLES: usize = 3;

/// Sample spacing along a capsule, as a fraction of its radius.
pub const CAPSULE_SAMPLE_SPACING: f32 = 0.75;

/// Upper bound on samples taken along one capsule.
///
/// Reached only by capsules several hundred times longer than their radius.
pub const MAX_CAPSULE_SAMPLES: usize = 1024;

/// Smallest capsule radius content may declare.
pub const MIN_CAPSULE_RADIUS: f32 = 0.5;

// ============================================================================
// Shape-in-area tests
// ============================================================================

/// Number of points sampled along a capsule of segment `length` and `radius`.
///
/// `max(3, ceil(length / (0.75 * radius)))`, capped at
/// [`MAX_CAPSULE_SAMPLES`]; a non-positive radius yields 3.
#[must_use]
pub fn capsule_sample_count(length: f32, radius: f32) -> usize {
    if radius <= 0.0 || !length.is_finite() {
        return MIN_CAPSULE_SAMPLES;
    }
    let count = (length / (CAPSULE_SAMPLE_SPACING * radius)).ceil() as usize;
    count.clamp(MIN_CAPSULE_SAMPLES, MAX_CAPSULE_SAMPLES)
}

/// Evenly spaced points from `a` to `b`, both endpoints included.
fn capsule_samples(a: Vec2, b: Vec2, r: f32) -> impl Iterator<Item = Vec2> {
    let count = capsule_sample_count(a.distance(b), r);
    let last = (count - 1) as f32;
    (0..count).map(move |i| a.lerp(b, i as f32 / last))
}

/// Runs `test` on a circle directly, or on every sample of a capsule.
fn any_sample(shape: &Shape, mut test: impl FnMut(Vec2, f32) -> bool) -> bool {
    match *shape {
        Shape::Circle { x, y, r } => test(Vec2::new(x, y), r),
        Shape::Capsule { r, .. } => {
            let (a, b) = shape.segment();
            capsule_samples(a, b, r).any(|p| test(p, r))
        },
    }
}

fn circle_in_sector(center: Vec2, r: f32, origin: Vec2, aim: f32, range: f32, half_angle: f32) -> bool {
    let to = center - origin;
    let dist = to.length();

    // Origin inside the circle
    if dist <= r {
        return true;
    }
    if dist - r > range {
        return false;
    }
    if angle_between(to.y.atan2(to.x), aim) <= half_angle {
        return true;
    }

    // Circle may still clip one of the edge rays
    let threshold = r * r + OVERLAP_EPSILON;
    [aim - half_angle, aim + half_angle].into_iter().any(|edge| {
        let dir = Vec2::from_angle(edge);
        let along = to.dot(dir).clamp(0.0, range);
        to.distance_squared(dir * along) <= threshold
    })
}

fn circle_in_lane(center: Vec2, r: f32, origin: Vec2, aim: f32, length: f32, half_width: f32) -> bool {
    let local = Vec2::from_angle(-aim).rotate(center - origin);
    let clamped = Vec2::new(
        local.x.clamp(0.0, length.max(0.0)),
        local.y.clamp(-half_width.abs(), half_width.abs()),
    );
    local.distance_squared(clamped) <= r * r + OVERLAP_EPSILON
}

/// Whether `shape` reaches into the sector at `origin`.
#[must_use]
pub fn shape_in_sector(shape: &Shape, origin: &Pose, range: f32, half_angle: f32) -> bool {
    let at = origin.position();
    any_sample(shape, |p, r| circle_in_sector(p, r, at, origin.angle, range, half_angle))
}

/// Whether `shape` reaches into the annulus `[inner, outer]` around `origin`.
#[must_use]
pub fn shape_in_ring(shape: &Shape, origin: Vec2, inner: f32, outer: f32) -> bool {
    let (near, far) = match *shape {
        Shape::Circle { x, y, r } => {
            let dist = origin.distance(Vec2::new(x, y));
            (dist - r, dist + r)
        },
        Shape::Capsule { r, .. } => {
            let (a, b) = shape.segment();
            let da = origin.distance(a);
            let db = origin.distance(b);
            (da.min(db) - r, da.max(db) + r)
        },
    };
    near <= outer && far >= inner
}

/// Whether `shape` reaches into the lane running `length` along the aim of `origin`.
#[must_use]
pub fn shape_in_lane(shape: &Shape, origin: &Pose, length: f32, half_width: f32) -> bool {
    let at = origin.position();
    any_sample(shape, |p, r| circle_in_lane(p, r, at, origin.angle, length, half_width))
}

/// Lane test, and when `half_angle` is given, the sector test with `range = length`.
#[must_use]
pub fn shape_in_stab(
    shape: &Shape,
    origin: &Pose,
    length: f32,
    half_width: f32,
    half_angle: Option<f32>,
) -> bool {
    shape_in_lane(shape, origin, length, half_width)
        && half_angle.map_or(true, |half| shape_in_sector(shape, origin, length, half))
}

// ============================================================================
// Area descriptions
// ============================================================================

/// An attack area as plain data. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AreaQuery {
    /// Pie slice around the aim.
    Sector {
        /// Radius
        range: f32,
        /// Half of the opening angle
        half_angle: f32,
    },
    /// Annulus around the origin.
    Ring {
        /// Inner radius
        inner: f32,
        /// Outer radius
        outer: f32,
    },
    /// Rectangle starting at the origin, extending along the aim.
    Lane {
        /// Extent along the aim
        length: f32,
        /// Half of the extent across the aim
        half_width: f32,
    },
    /// Lane, optionally narrowed by a sector.
    Stab {
        /// Extent along the aim
        length: f32,
        /// Half of the extent across the aim
        half_width: f32,
        /// Optional sector half-angle
        #[serde(default)]
        half_angle: Option<f32>,
    },
}

impl AreaQuery {
    /// Whether `shape` falls inside this area anchored at `origin`.
    #[must_use]
    pub fn contains(&self, origin: &Pose, shape: &Shape) -> bool {
        match *self {
            Self::Sector { range, half_angle } => shape_in_sector(shape, origin, range, half_angle),
            Self::Ring { inner, outer } => shape_in_ring(shape, origin.position(), inner, outer),
            Self::Lane { length, half_width } => shape_in_lane(shape, origin, length, half_width),
            Self::Stab {
                length,
                half_width,
                half_angle,
            } => shape_in_stab(shape, origin, length, half_width, half_angle),
        }
    }

    /// Furthest distance from the origin this area can reach.
    #[must_use]
    pub fn reach(&self) -> f32 {
        match *self {
            Self::Sector { range, .. } => range,
            Self::Ring { outer, .. } => outer,
            Self::Lane { length, half_width } | Self::Stab { length, half_width, .. } => {
                length.hypot(half_width)
            },
        }
    }
}

// ============================================================================
// Registry queries
// ============================================================================

/// A query over one registry from one origin pose.
#[derive(Debug, Clone)]
pub struct HurtboxQuery<'a, D = HurtboxData> {
    registry: &'a HitboxRegistry<D>,
    origin: Pose,
    teams: Option<Vec<TeamId>>,
}

impl<'a, D> HurtboxQuery<'a, D> {
    /// Query every team from `origin`.
    #[must_use]
    pub fn new(registry: &'a HitboxRegistry<D>, origin: Pose) -> Self {
        Self {
            registry,
            origin,
            teams: None,
        }
    }

    /// Restrict to one team.
    #[must_use]
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.teams = Some(vec![team]);
        self
    }

    /// Restrict to teams `attacker` is hostile to.
    #[must_use]
    pub fn hostile_to(mut self, table: &TeamTable, attacker: TeamId) -> Self {
        self.teams = Some(table.hostile_teams(attacker));
        self
    }

    /// Origin pose of this query.
    #[must_use]
    pub fn origin(&self) -> &Pose {
        &self.origin
    }

    /// Entries inside `area`, in registry order.
    #[must_use]
    pub fn within(&self, area: &AreaQuery) -> Vec<&'a RegisteredHurtbox<D>> {
        let registry = self.registry;
        registry
            .iter(None)
            .filter(|entry| {
                self.teams
                    .as_ref()
                    .map_or(true, |teams| teams.contains(&entry.team))
            })
            .filter(|entry| area.contains(&self.origin, &entry.shape))
            .collect()
    }

    /// Entries inside a sector around the aim.
    #[must_use]
    pub fn within_arc(&self, range: f32, half_angle: f32) -> Vec<&'a RegisteredHurtbox<D>> {
        self.within(&AreaQuery::Sector { range, half_angle })
    }

    /// Entries inside an annulus.
    #[must_use]
    pub fn within_ring(&self, inner: f32, outer: f32) -> Vec<&'a RegisteredHurtbox<D>> {
        self.within(&AreaQuery::Ring { inner, outer })
    }

    /// Entries inside a lane along the aim.
    #[must_use]
    pub fn within_lane(&self, length: f32, half_width: f32) -> Vec<&'a RegisteredHurtbox<D>> {
        self.within(&AreaQuery::Lane { length, half_width })
    }

    /// Entries inside a stab strip.
    #[must_use]
    pub fn within_stab(
        &self,
        length: f32,
        half_width: f32,
        half_angle: Option<f32>,
    ) -> Vec<&'a RegisteredHurtbox<D>> {
        self.within(&AreaQuery::Stab {
            length,
            half_width,
            half_angle,
        })
    }
}

/// Monster hurtboxes inside a sector aimed from `origin`.
#[must_use]
pub fn monster_hurtboxes_within_arc<'a, D>(
    registry: &'a HitboxRegistry<D>,
    origin: &Pose,
    range: f32,
    half_angle: f32,
) -> Vec<&'a RegisteredHurtbox<D>> {
    HurtboxQuery::new(registry, *origin)
        .with_team(TeamId::Monsters)
        .within_arc(range, half_angle)
}

/// Monster hurtboxes inside the annulus `[inner, outer]` around `origin`.
#[must_use]
pub fn monster_hurtboxes_within_ring<'a, D>(
    registry: &'a HitboxRegistry<D>,
    origin: &Pose,
    inner: f32,
    outer: f32,
) -> Vec<&'a RegisteredHurtbox<D>> {
    HurtboxQuery::new(registry, *origin)
        .with_team(TeamId::Monsters)
        .within_ring(inner, outer)
}
