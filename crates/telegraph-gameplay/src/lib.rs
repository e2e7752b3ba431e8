//! # Telegraph Gameplay
//!
//! Combat rules for Project Telegraph.
//!
//! This crate contains:
//! - Commitment timelines (windup, active, recover)
//! - The per-session hitbox registry
//! - Team hostility
//! - Area queries (sector, ring, lane, stab) over registered hurtboxes
//! - Weighted move selection
//! - The encounter session tying rig sampling, registry updates and strikes together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod encounter;
pub mod pick;
pub mod query;
pub mod registry;
pub mod team;
pub mod timeline;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::encounter::*;
    pub use crate::pick::*;
    pub use crate::query::*;
    pub use crate::registry::*;
    pub use crate::team::*;
    pub use crate::timeline::*;
}

pub use prelude::*;
