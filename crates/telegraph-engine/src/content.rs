//! Encounter content loading.
//!
//! This module provides:
//! - The TOML file format for one monster: stats, hurtbox rig, move table
//! - Validation on load
//! - A built-in encounter used when no content file is configured
//!
//! # File format
//!
//! ```toml
//! version = "1.0.0"
//!
//! [monster]
//! name = "Brute"
//! max_health = 120.0
//! rest_ms = 400.0
//! parts = [{ part = "body" }, { part = "head", damage_multiplier = 2.0 }]
//!
//! [rig.states.idle]
//! loop = true
//! [[rig.states.idle.frames]]
//! time = 0.0
//! shapes = [{ kind = "circle", x = 0.0, y = 0.0, r = 24.0 }]
//!
//! [[moves]]
//! name = "slam"
//! animation = "slam"
//! window = { windup_ms = 300.0, active_ms = 100.0, recover_ms = 300.0 }
//! damage = 20.0
//! strike = [{ kind = "circle", x = 40.0, y = 0.0, r = 20.0 }]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use telegraph_common::{SchemaVersion, TelegraphError};
use telegraph_gameplay::{
    CommitWindow, HurtboxData, MonsterMove, MonsterProfile, IDLE_STATE, MIN_CAPSULE_RADIUS,
};
use telegraph_kernel::{HurtboxRig, Keyframe, Shape, Track};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during content loading.
#[derive(Debug, Error)]
pub enum ContentError {
    /// File not found.
    #[error("Content file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read content file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse content TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error.
    #[error("Content validation error: {0}")]
    ValidationError(String),

    /// Unsupported schema version.
    #[error("Unsupported content version {actual} (reader is {expected})")]
    VersionMismatch {
        /// Version this build reads
        expected: String,
        /// Version found in the file
        actual: String,
    },
}

/// Result type for content loading.
pub type ContentResult<T> = Result<T, ContentError>;

impl From<ContentError> for TelegraphError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::ReadError(e) => Self::Io(e),
            ContentError::VersionMismatch { expected, actual } => {
                Self::VersionMismatch { expected, actual }
            },
            other => Self::Content(other.to_string()),
        }
    }
}

fn default_version() -> String {
    SchemaVersion::CONTENT.to_string()
}

const fn default_one() -> f32 {
    1.0
}

/// Monster stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpec {
    /// Display name
    pub name: String,
    /// Starting health
    pub max_health: f32,
    /// Pause between moves (ms)
    #[serde(default)]
    pub rest_ms: f32,
    /// Payload per rig shape index
    #[serde(default)]
    pub parts: Vec<HurtboxData>,
}

/// One move as written in content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    /// Move name, unique within the file
    pub name: String,
    /// Rig state played during the move
    pub animation: String,
    /// Timing at speed 1.0
    pub window: CommitWindow,
    /// Selection weight
    #[serde(default = "default_one")]
    pub weight: f32,
    /// Playback speed multiplier applied to the window
    #[serde(default = "default_one")]
    pub speed: f32,
    /// Strike shapes in model space
    #[serde(default)]
    pub strike: Vec<Shape>,
    /// Damage on a landed strike
    #[serde(default)]
    pub damage: f32,
}

/// One encounter content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterContent {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Monster stats
    pub monster: MonsterSpec,
    /// Monster hurtbox rig
    #[serde(default)]
    pub rig: HurtboxRig,
    /// Move table
    #[serde(default)]
    pub moves: Vec<MoveSpec>,
}

impl EncounterContent {
    /// Parses content from TOML text and validates it.
    pub fn from_toml(text: &str) -> ContentResult<Self> {
        let content: Self = toml::from_str(text)?;
        content.validate()?;
        Ok(content)
    }

    /// Loads and validates a content file.
    pub fn load(path: &Path) -> ContentResult<Self> {
        if !path.exists() {
            return Err(ContentError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let content = Self::from_toml(&text)?;
        info!(
            "Loaded encounter '{}' from {} ({} moves, {} rig states)",
            content.monster.name,
            path.display(),
            content.moves.len(),
            content.rig.states.len()
        );
        Ok(content)
    }

    /// Loads `path` when given, otherwise returns the built-in encounter.
    pub fn load_or_builtin(path: Option<&Path>) -> ContentResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                info!("No content file configured, using built-in encounter");
                Ok(Self::builtin())
            },
        }
    }

    /// Checks the version, stats, rig and move table.
    pub fn validate(&self) -> ContentResult<()> {
        let reader = SchemaVersion::CONTENT;
        let compatible = SchemaVersion::parse(&self.version)
            .is_some_and(|found| reader.is_compatible_with(&found));
        if !compatible {
            return Err(ContentError::VersionMismatch {
                expected: reader.to_string(),
                actual: self.version.clone(),
            });
        }

        if self.monster.name.is_empty() {
            return Err(ContentError::ValidationError("Monster has empty name".to_string()));
        }
        if self.monster.max_health <= 0.0 {
            return Err(ContentError::ValidationError(format!(
                "Monster {} has invalid max_health: {}",
                self.monster.name, self.monster.max_health
            )));
        }
        if self.monster.rest_ms < 0.0 {
            return Err(ContentError::ValidationError(format!(
                "Monster {} has negative rest_ms: {}",
                self.monster.name, self.monster.rest_ms
            )));
        }

        for (state, track) in &self.rig.states {
            if !track.is_sorted() {
                return Err(ContentError::ValidationError(format!(
                    "Rig state '{state}' has decreasing keyframe times"
                )));
            }
            for frame in &track.frames {
                check_shapes(&frame.shapes, &format!("rig state '{state}' at {}ms", frame.time))?;
            }
            if !track.is_consistent() {
                warn!("Rig state '{}' has keyframes with different shape counts", state);
            }
        }
        if self.rig.track(IDLE_STATE).is_none() {
            warn!("Rig has no '{}' state; monster has no hurtboxes between moves", IDLE_STATE);
        }

        if self.moves.is_empty() {
            return Err(ContentError::ValidationError("Move table is empty".to_string()));
        }
        let mut names = HashSet::new();
        for mv in &self.moves {
            if !names.insert(mv.name.as_str()) {
                return Err(ContentError::ValidationError(format!(
                    "Duplicate move name: {}",
                    mv.name
                )));
            }
            if self.rig.track(&mv.animation).is_none() {
                return Err(ContentError::ValidationError(format!(
                    "Move {} uses unknown animation '{}'",
                    mv.name, mv.animation
                )));
            }
            let w = mv.window;
            if w.windup_ms < 0.0 || w.active_ms < 0.0 || w.recover_ms < 0.0 {
                return Err(ContentError::ValidationError(format!(
                    "Move {} has a negative window duration",
                    mv.name
                )));
            }
            if !mv.weight.is_finite() || mv.weight < 0.0 {
                return Err(ContentError::ValidationError(format!(
                    "Move {} has invalid weight: {}",
                    mv.name, mv.weight
                )));
            }
            if mv.speed <= 0.0 {
                return Err(ContentError::ValidationError(format!(
                    "Move {} has invalid speed: {}",
                    mv.name, mv.speed
                )));
            }
            if mv.damage < 0.0 {
                return Err(ContentError::ValidationError(format!(
                    "Move {} has negative damage: {}",
                    mv.name, mv.damage
                )));
            }
            check_shapes(&mv.strike, &format!("move {} strike", mv.name))?;
        }

        Ok(())
    }

    /// Converts to a gameplay profile, applying move speeds.
    #[must_use]
    pub fn to_profile(&self) -> MonsterProfile {
        MonsterProfile {
            name: self.monster.name.clone(),
            max_health: self.monster.max_health,
            rig: self.rig.clone(),
            parts: self.monster.parts.clone(),
            moves: self
                .moves
                .iter()
                .map(|mv| MonsterMove {
                    name: mv.name.clone(),
                    animation: mv.animation.clone(),
                    window: mv.window.scaled(mv.speed),
                    weight: mv.weight,
                    strike: mv.strike.clone(),
                    damage: mv.damage,
                })
                .collect(),
            rest_ms: self.monster.rest_ms,
        }
    }

    /// The built-in encounter: a brute with a slam and a tail sweep.
    #[must_use]
    pub fn builtin() -> Self {
        let body = Shape::circle(0.0, 0.0, 24.0);
        let head = Shape::circle(28.0, 0.0, 10.0);
        let tail_rest = Shape::capsule(-20.0, 0.0, -60.0, 0.0, 8.0);
        let tail_swung = Shape::capsule(-20.0, 0.0, -40.0, 40.0, 8.0);

        let rig = HurtboxRig::new()
            .with_track(
                IDLE_STATE,
                Track::looping(vec![
                    Keyframe::new(0.0, vec![body, head, tail_rest]),
                    Keyframe::new(600.0, vec![body, head.translated(2.0, 0.0), tail_rest]),
                ]),
            )
            .with_track(
                "slam",
                Track::once(vec![
                    Keyframe::new(0.0, vec![body, head, tail_rest]),
                    Keyframe::new(350.0, vec![body, head.translated(-8.0, 0.0), tail_rest]),
                    Keyframe::new(450.0, vec![body, head.translated(22.0, 0.0), tail_rest]),
                ]),
            )
            .with_track(
                "sweep",
                Track::once(vec![
                    Keyframe::new(0.0, vec![body, head, tail_rest]),
                    Keyframe::new(300.0, vec![body, head, tail_swung]),
                ]),
            );

        Self {
            version: SchemaVersion::CONTENT.to_string(),
            monster: MonsterSpec {
                name: "Brute".to_string(),
                max_health: 150.0,
                rest_ms: 400.0,
                parts: vec![
                    HurtboxData::part("body", 1.0),
                    HurtboxData::part("head", 2.0),
                    HurtboxData::part("tail", 0.5),
                ],
            },
            rig,
            moves: vec![
                MoveSpec {
                    name: "slam".to_string(),
                    animation: "slam".to_string(),
                    window: CommitWindow::new(350.0, 100.0, 300.0),
                    weight: 2.0,
                    speed: 1.0,
                    strike: vec![Shape::circle(50.0, 0.0, 22.0)],
                    damage: 20.0,
                },
                MoveSpec {
                    name: "sweep".to_string(),
                    animation: "sweep".to_string(),
                    window: CommitWindow::new(250.0, 120.0, 250.0),
                    weight: 1.0,
                    speed: 1.0,
                    strike: vec![Shape::capsule(0.0, 0.0, 0.0, 70.0, 12.0)],
                    damage: 12.0,
                },
            ],
        }
    }
}

/// Radii must be non-negative; capsules need at least [`MIN_CAPSULE_RADIUS`]
/// so area queries keep a bounded sample count.
fn check_shapes(shapes: &[Shape], context: &str) -> ContentResult<()> {
    for shape in shapes {
        let r = shape.radius();
        if r < 0.0 || r.is_nan() {
            return Err(ContentError::ValidationError(format!(
                "Negative radius {r} in {context}"
            )));
        }
        if matches!(shape, Shape::Capsule { .. }) && r < MIN_CAPSULE_RADIUS {
            return Err(ContentError::ValidationError(format!(
                "Capsule radius {r} in {context} is below {MIN_CAPSULE_RADIUS}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BRUTE: &str = r#"
version = "1.0.0"

[monster]
name = "Brute"
max_health = 120.0
rest_ms = 400.0
parts = [{ part = "body" }, { part = "head", damage_multiplier = 2.0 }]

[rig.states.idle]
loop = true
[[rig.states.idle.frames]]
time = 0.0
shapes = [
    { kind = "circle", x = 0.0, y = 0.0, r = 24.0 },
    { kind = "circle", x = 28.0, y = 0.0, r = 10.0 },
]

[rig.states.slam]
[[rig.states.slam.frames]]
time = 0.0
shapes = [{ kind = "circle", x = 0.0, y = 0.0, r = 24.0 }]
[[rig.states.slam.frames]]
time = 300.0
shapes = [{ kind = "capsule", ax = 0.0, ay = 0.0, bx = 30.0, by = 0.0, r = 24.0 }]

[[moves]]
name = "slam"
animation = "slam"
window = { windup_ms = 300.0, active_ms = 100.0, recover_ms = 300.0 }
speed = 2.0
damage = 20.0
strike = [{ kind = "circle", x = 40.0, y = 0.0, r = 20.0 }]
"#;

    #[test]
    fn test_parse_content() {
        let content = EncounterContent::from_toml(BRUTE).expect("valid content");
        assert_eq!(content.monster.name, "Brute");
        assert_eq!(content.monster.parts[0].damage_multiplier, 1.0);
        assert_eq!(content.monster.parts[1].part.as_deref(), Some("head"));
        assert!(content.rig.track("idle").is_some_and(|t| t.looping));
        assert!(content.rig.track("slam").is_some_and(|t| !t.looping));
        assert_eq!(content.moves[0].weight, 1.0);
        assert_eq!(content.moves[0].strike, vec![Shape::circle(40.0, 0.0, 20.0)]);
    }

    #[test]
    fn test_profile_applies_speed() {
        let content = EncounterContent::from_toml(BRUTE).expect("valid content");
        let profile = content.to_profile();
        assert_eq!(profile.moves[0].window, CommitWindow::new(150.0, 50.0, 150.0));
        assert_eq!(profile.parts.len(), 2);
    }

    #[test]
    fn test_builtin_is_valid() {
        let content = EncounterContent::builtin();
        assert!(content.validate().is_ok());
        assert!(content.rig.track(IDLE_STATE).is_some());
        assert_eq!(content.moves.len(), 2);
    }

    #[test]
    fn test_builtin_round_trips_through_toml() {
        let content = EncounterContent::builtin();
        let text = toml::to_string_pretty(&content).expect("Failed to serialize");
        let parsed = EncounterContent::from_toml(&text).expect("valid content");
        assert_eq!(parsed, content);
    }

    #[test]
    fn test_rejects_unknown_animation() {
        let text = BRUTE.replace("animation = \"slam\"", "animation = \"roar\"");
        assert!(matches!(
            EncounterContent::from_toml(&text),
            Err(ContentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_negative_window() {
        let text = BRUTE.replace("active_ms = 100.0", "active_ms = -1.0");
        assert!(matches!(
            EncounterContent::from_toml(&text),
            Err(ContentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let text = BRUTE.replace("x = 40.0, y = 0.0, r = 20.0", "x = 40.0, y = 0.0, r = -20.0");
        assert!(matches!(
            EncounterContent::from_toml(&text),
            Err(ContentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_hair_thin_capsule() {
        let text = BRUTE.replace("bx = 30.0, by = 0.0, r = 24.0", "bx = 30.0, by = 0.0, r = 0.001");
        let err = EncounterContent::from_toml(&text).expect_err("thin capsule should be rejected");
        assert!(err.to_string().contains("Capsule radius"), "{err}");

        // Circles have no sampling cost and may be tiny
        let text = BRUTE.replace("x = 40.0, y = 0.0, r = 20.0", "x = 40.0, y = 0.0, r = 0.001");
        assert!(EncounterContent::from_toml(&text).is_ok());
    }

    #[test]
    fn test_rejects_decreasing_keyframes() {
        let text = BRUTE.replace("time = 300.0", "time = -5.0");
        assert!(matches!(
            EncounterContent::from_toml(&text),
            Err(ContentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_moves() {
        let mut content = EncounterContent::from_toml(BRUTE).expect("valid content");
        content.moves.push(content.moves[0].clone());
        assert!(matches!(content.validate(), Err(ContentError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_future_major_version() {
        let text = BRUTE.replace("version = \"1.0.0\"", "version = \"2.0.0\"");
        let err = EncounterContent::from_toml(&text).expect_err("version should be rejected");
        assert!(matches!(err, ContentError::VersionMismatch { .. }));
        assert!(matches!(
            TelegraphError::from(err),
            TelegraphError::VersionMismatch { .. }
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            EncounterContent::from_toml("monster = 3"),
            Err(ContentError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("brute.toml");
        fs::write(&path, BRUTE).expect("Failed to write content");

        let content = EncounterContent::load_or_builtin(Some(&path)).expect("valid content");
        assert_eq!(content.monster.max_health, 120.0);

        let missing = EncounterContent::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_load_or_builtin_without_path() {
        let content = EncounterContent::load_or_builtin(None).expect("builtin content");
        assert_eq!(content, EncounterContent::builtin());
    }
}
