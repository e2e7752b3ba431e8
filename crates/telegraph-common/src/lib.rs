//! # Telegraph Common
//!
//! Common types, utilities, and shared abstractions for Project Telegraph.
//!
//! This crate provides foundational types used across all Telegraph subsystems:
//! - Pose and angle helpers for the top-down world
//! - ID types (OwnerId, HurtboxId, TeamId)
//! - Version information for content schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod pose;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::pose::*;
    pub use crate::version::*;
}

pub use prelude::*;
