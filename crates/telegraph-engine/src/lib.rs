//! # Telegraph Engine
//!
//! Headless harness for Project Telegraph encounters.
//!
//! This crate ties the core together:
//! - Harness configuration (TOML, defaults on failure)
//! - Encounter content loading and validation
//! - A fixed-step driver standing in for the presentation layer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod content;
pub mod harness;

pub use config::HarnessConfig;
pub use content::{ContentError, ContentResult, EncounterContent};
pub use harness::{run, Harness, RunSummary};
