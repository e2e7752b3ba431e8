//! Hurtbox rig sampling.
//!
//! A rig maps animation-state names to tracks of keyframed shapes.
//! Sampling a state at a time interpolates the bracketing keyframes
//! shape by shape. Output stays in the rig's model space; callers move it
//! to world space with [`Shape::transformed`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │ HurtboxRig   │────▶│ Track       │────▶│ Keyframe         │
//! │ state → track│     │ loop, frames│     │ time, shapes     │
//! └──────────────┘     └─────────────┘     └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use telegraph_kernel::rig::{HurtboxRig, Keyframe, Track, sample_hurtbox_rig};
//! use telegraph_kernel::shape::Shape;
//!
//! let mut rig = HurtboxRig::new();
//! rig.insert("walk", Track::looping(vec![
//!     Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 10.0)]),
//!     Keyframe::new(100.0, vec![Shape::circle(10.0, 0.0, 10.0)]),
//! ]));
//!
//! let shapes = sample_hurtbox_rig(&rig, "walk", 150.0);
//! assert_eq!(shapes, vec![Shape::circle(5.0, 0.0, 10.0)]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::shape::Shape;

/// Spans shorter than this (ms) interpolate with `t = 0`.
pub const SPAN_EPSILON: f32 = 1e-6;

/// Shapes of one pose at one point of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time of this pose (ms from track start).
    pub time: f32,
    /// Shapes in model space, paired by index with neighbouring frames.
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Keyframe {
    /// Create a keyframe.
    #[must_use]
    pub fn new(time: f32, shapes: Vec<Shape>) -> Self {
        Self { time, shapes }
    }
}

/// Keyframes for one animation state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Wrap time around the track instead of holding the last pose.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Keyframes ordered by non-decreasing time.
    #[serde(default)]
    pub frames: Vec<Keyframe>,
}

impl Track {
    /// Create a one-shot track that holds its last pose.
    #[must_use]
    pub fn once(frames: Vec<Keyframe>) -> Self {
        Self {
            looping: false,
            frames,
        }
    }

    /// Create a looping track.
    #[must_use]
    pub fn looping(frames: Vec<Keyframe>) -> Self {
        Self {
            looping: true,
            frames,
        }
    }

    /// Track length: the last keyframe's time.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.last().map_or(0.0, |f| f.time)
    }

    /// Whether keyframe times never decrease.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.frames.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Whether every keyframe carries the same number of shapes.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.frames
            .windows(2)
            .all(|w| w[0].shapes.len() == w[1].shapes.len())
    }

    /// Map an arbitrary time onto the track: clamp one-shots, wrap loops.
    #[must_use]
    pub fn normalize_time(&self, time_ms: f32) -> f32 {
        let duration = self.duration();
        if duration <= SPAN_EPSILON || time_ms.is_nan() {
            return 0.0;
        }
        if self.looping {
            time_ms.rem_euclid(duration)
        } else {
            time_ms.clamp(0.0, duration)
        }
    }

    /// Sample the track's shapes at `time_ms`.
    #[must_use]
    pub fn sample(&self, time_ms: f32) -> Vec<Shape> {
        let frames = match self.frames.as_slice() {
            [] => return Vec::new(),
            [only] => return only.shapes.clone(),
            frames => frames,
        };
        let (first, last) = (&frames[0], &frames[frames.len() - 1]);
        let time = self.normalize_time(time_ms);

        if time >= last.time {
            if !self.looping {
                return last.shapes.clone();
            }
            let duration = self.duration();
            let t = if duration > SPAN_EPSILON {
                (time - last.time) / duration
            } else {
                0.0
            };
            return blend(&last.shapes, &first.shapes, t);
        }

        // Before the first keyframe (first.time > 0): hold the first pose.
        let Some(next_index) = frames.iter().position(|f| f.time > time) else {
            return last.shapes.clone();
        };
        if next_index == 0 {
            return first.shapes.clone();
        }

        let prev = &frames[next_index - 1];
        let next = &frames[next_index];
        let span = next.time - prev.time;
        let t = if span > SPAN_EPSILON {
            (time - prev.time) / span
        } else {
            0.0
        };
        blend(&prev.shapes, &next.shapes, t)
    }
}

/// Pairwise interpolation; unmatched trailing shapes pass through as-is.
fn blend(from: &[Shape], to: &[Shape], t: f32) -> Vec<Shape> {
    from.iter()
        .zip(to)
        .map(|(a, b)| a.lerp(b, t))
        .chain(from.iter().skip(to.len()).copied())
        .chain(to.iter().skip(from.len()).copied())
        .collect()
}

/// Animation-state name to hurtbox track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HurtboxRig {
    /// Tracks by animation state.
    #[serde(default)]
    pub states: BTreeMap<String, Track>,
}

impl HurtboxRig {
    /// Create an empty rig.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the track for a state.
    pub fn insert(&mut self, state: impl Into<String>, track: Track) {
        self.states.insert(state.into(), track);
    }

    /// Builder form of [`HurtboxRig::insert`].
    #[must_use]
    pub fn with_track(mut self, state: impl Into<String>, track: Track) -> Self {
        self.insert(state, track);
        self
    }

    /// Track for a state.
    #[must_use]
    pub fn track(&self, state: &str) -> Option<&Track> {
        self.states.get(state)
    }

    /// State names in sorted order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Sample a state. Unknown states yield no shapes.
    #[must_use]
    pub fn sample(&self, state: &str, time_ms: f32) -> Vec<Shape> {
        match self.track(state) {
            Some(track) => track.sample(time_ms),
            None => {
                trace!("No hurtbox track for state '{}'", state);
                Vec::new()
            },
        }
    }
}

/// Sample `rig` for `state` at `time_ms`.
///
/// Returns an empty list for unknown or empty states: no shapes means no
/// hurtbox this tick, not a fault.
#[must_use]
pub fn sample_hurtbox_rig(rig: &HurtboxRig, state: &str, time_ms: f32) -> Vec<Shape> {
    rig.sample(state, time_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_frame(looping: bool) -> Track {
        let frames = vec![
            Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 10.0)]),
            Keyframe::new(100.0, vec![Shape::circle(100.0, 0.0, 20.0)]),
        ];
        Track { looping, frames }
    }

    fn rig_with(state: &str, track: Track) -> HurtboxRig {
        HurtboxRig::new().with_track(state, track)
    }

    #[test]
    fn test_unknown_state_is_empty() {
        let rig = rig_with("idle", two_frame(true));
        assert!(sample_hurtbox_rig(&rig, "roar", 10.0).is_empty());
    }

    #[test]
    fn test_empty_track_is_empty() {
        let rig = rig_with("idle", Track::looping(Vec::new()));
        assert!(sample_hurtbox_rig(&rig, "idle", 10.0).is_empty());
    }

    #[test]
    fn test_single_frame_is_static() {
        let shapes = vec![Shape::circle(1.0, 2.0, 3.0), Shape::capsule(0.0, 0.0, 5.0, 0.0, 1.0)];
        let rig = rig_with("idle", Track::once(vec![Keyframe::new(40.0, shapes.clone())]));

        for time in [-1e9, -5.0, 0.0, 40.0, 1e9] {
            assert_eq!(sample_hurtbox_rig(&rig, "idle", time), shapes);
        }
    }

    #[test]
    fn test_looping_wraps_to_midpoint() {
        let rig = rig_with(
            "walk",
            Track::looping(vec![
                Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 10.0)]),
                Keyframe::new(100.0, vec![Shape::circle(10.0, 20.0, 30.0)]),
            ]),
        );
        let c0 = Shape::circle(0.0, 0.0, 10.0);
        let c1 = Shape::circle(10.0, 20.0, 30.0);
        assert_eq!(sample_hurtbox_rig(&rig, "walk", 150.0), vec![c0.lerp(&c1, 0.5)]);
    }

    #[test]
    fn test_looping_negative_time_wraps() {
        let rig = rig_with("walk", two_frame(true));
        // -25 wraps to 75
        assert_eq!(
            sample_hurtbox_rig(&rig, "walk", -25.0),
            vec![Shape::circle(75.0, 0.0, 17.5)]
        );
    }

    #[test]
    fn test_one_shot_clamps_and_holds() {
        let rig = rig_with("slam", two_frame(false));
        assert_eq!(
            sample_hurtbox_rig(&rig, "slam", -50.0),
            vec![Shape::circle(0.0, 0.0, 10.0)]
        );
        assert_eq!(
            sample_hurtbox_rig(&rig, "slam", 100.0),
            vec![Shape::circle(100.0, 0.0, 20.0)]
        );
        assert_eq!(
            sample_hurtbox_rig(&rig, "slam", 5000.0),
            vec![Shape::circle(100.0, 0.0, 20.0)]
        );
    }

    #[test]
    fn test_three_frames_brackets() {
        let track = Track::once(vec![
            Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 1.0)]),
            Keyframe::new(100.0, vec![Shape::circle(100.0, 0.0, 1.0)]),
            Keyframe::new(300.0, vec![Shape::circle(100.0, 200.0, 1.0)]),
        ]);
        assert_eq!(track.sample(50.0), vec![Shape::circle(50.0, 0.0, 1.0)]);
        assert_eq!(track.sample(100.0), vec![Shape::circle(100.0, 0.0, 1.0)]);
        assert_eq!(track.sample(200.0), vec![Shape::circle(100.0, 100.0, 1.0)]);
    }

    #[test]
    fn test_zero_length_span_uses_prev() {
        let track = Track::once(vec![
            Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 1.0)]),
            Keyframe::new(50.0, vec![Shape::circle(50.0, 0.0, 1.0)]),
            Keyframe::new(50.0, vec![Shape::circle(-50.0, 0.0, 1.0)]),
            Keyframe::new(100.0, vec![Shape::circle(0.0, 0.0, 1.0)]),
        ]);
        assert_eq!(track.sample(75.0), vec![Shape::circle(-25.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_late_first_frame_holds_first_pose() {
        let track = Track::once(vec![
            Keyframe::new(20.0, vec![Shape::circle(0.0, 0.0, 1.0)]),
            Keyframe::new(120.0, vec![Shape::circle(100.0, 0.0, 1.0)]),
        ]);
        assert_eq!(track.sample(5.0), vec![Shape::circle(0.0, 0.0, 1.0)]);
        assert_eq!(track.sample(70.0), vec![Shape::circle(50.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_mismatched_lengths_pass_through() {
        let extra = Shape::capsule(0.0, 0.0, 10.0, 0.0, 2.0);
        let track = Track::once(vec![
            Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 4.0), extra]),
            Keyframe::new(10.0, vec![Shape::circle(10.0, 0.0, 4.0)]),
        ]);
        assert!(!track.is_consistent());
        assert_eq!(track.sample(5.0), vec![Shape::circle(5.0, 0.0, 4.0), extra]);

        let extra_next = Shape::circle(99.0, 99.0, 1.0);
        let track = Track::once(vec![
            Keyframe::new(0.0, vec![]),
            Keyframe::new(10.0, vec![extra_next]),
        ]);
        assert_eq!(track.sample(5.0), vec![extra_next]);
    }

    #[test]
    fn test_all_frames_at_zero() {
        let track = Track::looping(vec![
            Keyframe::new(0.0, vec![Shape::circle(0.0, 0.0, 1.0)]),
            Keyframe::new(0.0, vec![Shape::circle(9.0, 0.0, 1.0)]),
        ]);
        assert_eq!(track.sample(33.0), vec![Shape::circle(9.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_is_sorted() {
        assert!(two_frame(true).is_sorted());
        let track = Track::once(vec![Keyframe::new(10.0, vec![]), Keyframe::new(5.0, vec![])]);
        assert!(!track.is_sorted());
    }

    #[test]
    fn test_state_names_sorted() {
        let rig = HurtboxRig::new()
            .with_track("walk", two_frame(true))
            .with_track("idle", two_frame(true));
        assert_eq!(rig.state_names().collect::<Vec<_>>(), vec!["idle", "walk"]);
    }

    proptest! {
        #[test]
        fn prop_looping_sample_stays_on_path(time in -10_000.0f32..10_000.0) {
            let shapes = two_frame(true).sample(time);
            prop_assert_eq!(shapes.len(), 1);
            let x = shapes[0].center().x;
            prop_assert!((-1e-3..=100.0 + 1e-3).contains(&x));
        }
    }
}
