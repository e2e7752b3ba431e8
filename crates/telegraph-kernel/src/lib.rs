//! # Telegraph Kernel
//!
//! Hit geometry for Project Telegraph.
//!
//! This crate is pure data and math, with no gameplay state:
//! - Shape primitives (circle, capsule) with interpolation and transforms
//! - Overlap and distance queries between shapes
//! - Hurtbox rig sampling (keyframed shapes per animation state)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod overlap;
pub mod rig;
pub mod shape;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::overlap::*;
    pub use crate::rig::*;
    pub use crate::shape::*;
}

pub use prelude::*;
