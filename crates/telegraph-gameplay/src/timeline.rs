//! Attack commitment timelines.
//!
//! This module provides:
//! - Commit windows (windup, active, recover durations in ms)
//! - Phase lookup as a pure function of elapsed time
//! - A running timeline with one-shot and looping playback

use serde::{Deserialize, Serialize};
use tracing::trace;

// ============================================================================
// Commit Phases
// ============================================================================

/// Phase of an attack's commitment timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommitPhase {
    /// Before the timeline starts (negative time).
    Idle,
    /// Telegraphing the strike.
    Windup,
    /// Strike can land.
    Active,
    /// Committed follow-through.
    Recover,
    /// One-shot timeline finished and stopped.
    Done,
}

impl CommitPhase {
    /// Check if the phase can deal damage.
    #[must_use]
    pub fn can_damage(&self) -> bool {
        *self == Self::Active
    }

    /// Check if the timeline has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self == Self::Done
    }
}

// ============================================================================
// Commit Window
// ============================================================================

/// Timing contract for one attack, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitWindow {
    /// Duration of the windup (telegraph) phase.
    pub windup_ms: f32,
    /// Duration of the active (damage) phase.
    pub active_ms: f32,
    /// Duration of the recover phase.
    pub recover_ms: f32,
}

impl Default for CommitWindow {
    fn default() -> Self {
        Self {
            windup_ms: 150.0,
            active_ms: 100.0,
            recover_ms: 200.0,
        }
    }
}

impl CommitWindow {
    /// Create a window. Negative durations are clamped to zero.
    #[must_use]
    pub fn new(windup_ms: f32, active_ms: f32, recover_ms: f32) -> Self {
        Self {
            windup_ms: windup_ms.max(0.0),
            active_ms: active_ms.max(0.0),
            recover_ms: recover_ms.max(0.0),
        }
    }

    /// Total duration of all three phases.
    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.windup_ms + self.active_ms + self.recover_ms
    }

    /// Time the active phase begins.
    #[must_use]
    pub fn active_start(&self) -> f32 {
        self.windup_ms
    }

    /// Time the active phase ends (exclusive).
    #[must_use]
    pub fn active_end(&self) -> f32 {
        self.windup_ms + self.active_ms
    }

    /// Whether the elapsed span `[from, to]` touches the active window.
    ///
    /// A step longer than the active phase still counts as active when
    /// it crosses it. A zero-length active phase is never touched.
    #[must_use]
    pub fn active_overlaps(&self, from: f32, to: f32) -> bool {
        self.active_ms > 0.0 && from < self.active_end() && to >= self.active_start()
    }

    /// Scale timing by speed multiplier.
    #[must_use]
    pub fn scaled(&self, speed: f32) -> Self {
        let multiplier = 1.0 / speed.max(0.1);
        Self {
            windup_ms: self.windup_ms * multiplier,
            active_ms: self.active_ms * multiplier,
            recover_ms: self.recover_ms * multiplier,
        }
    }
}

/// Phase of `window` at `elapsed` ms.
///
/// At or past the end a stopped timeline reports `Done`; a running one
/// still reports `Recover`.
#[must_use]
pub fn phase_at_time(window: &CommitWindow, elapsed: f32, running: bool) -> CommitPhase {
    if elapsed < 0.0 {
        CommitPhase::Idle
    } else if elapsed < window.active_start() {
        CommitPhase::Windup
    } else if elapsed < window.active_end() {
        CommitPhase::Active
    } else if elapsed < window.total_duration() || running {
        CommitPhase::Recover
    } else {
        CommitPhase::Done
    }
}

/// Project `elapsed` into `[active_start, active_end]`.
#[must_use]
pub fn clamp_to_active(window: &CommitWindow, elapsed: f32) -> f32 {
    elapsed.clamp(window.active_start(), window.active_end())
}

// ============================================================================
// Hitbox Timeline
// ============================================================================

/// A commit window being played back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitboxTimeline {
    window: CommitWindow,
    elapsed: f32,
    running: bool,
    looping: bool,
}

impl HitboxTimeline {
    /// Create a stopped timeline bound to `window`.
    #[must_use]
    pub fn new(window: CommitWindow) -> Self {
        Self {
            window,
            elapsed: 0.0,
            running: false,
            looping: false,
        }
    }

    /// Restart from zero.
    pub fn start(&mut self, looping: bool) {
        self.elapsed = 0.0;
        self.running = true;
        self.looping = looping;
        trace!("Timeline started, duration: {}ms", self.duration());
    }

    /// Halt and rewind to zero.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Advance by `delta_ms`. No-op when stopped.
    pub fn advance(&mut self, delta_ms: f32) {
        if !self.running {
            return;
        }
        let before = self.phase();
        let total = self.duration();
        self.elapsed += delta_ms;

        if self.looping {
            self.elapsed = if total > 0.0 {
                self.elapsed.rem_euclid(total)
            } else {
                0.0
            };
        } else if self.elapsed >= total {
            self.elapsed = total;
            self.running = false;
        } else {
            self.elapsed = self.elapsed.max(0.0);
        }

        let after = self.phase();
        if before != after {
            trace!("Timeline {:?} -> {:?} at {}ms", before, after, self.elapsed);
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CommitPhase {
        phase_at_time(&self.window, self.elapsed, self.running)
    }

    /// Whether elapsed time sits in the active window.
    ///
    /// Reads raw elapsed time only; it does not consult `running`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.elapsed >= self.window.active_start() && self.elapsed < self.window.active_end()
    }

    /// Elapsed time (ms).
    #[must_use]
    pub fn time(&self) -> f32 {
        self.elapsed
    }

    /// Total duration (ms).
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.window.total_duration()
    }

    /// Progress through the whole window (0.0-1.0).
    #[must_use]
    pub fn progress(&self) -> f32 {
        let total = self.duration();
        if total <= 0.0 {
            0.0
        } else {
            (self.elapsed / total).clamp(0.0, 1.0)
        }
    }

    /// Progress through the current phase (0.0-1.0).
    #[must_use]
    pub fn phase_progress(&self) -> f32 {
        let (start, duration) = match self.phase() {
            CommitPhase::Windup => (0.0, self.window.windup_ms),
            CommitPhase::Active => (self.window.active_start(), self.window.active_ms),
            CommitPhase::Recover => (self.window.active_end(), self.window.recover_ms),
            CommitPhase::Idle => return 0.0,
            CommitPhase::Done => return 1.0,
        };
        if duration <= 0.0 {
            1.0
        } else {
            ((self.elapsed - start) / duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the timeline is playing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether playback wraps.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// The bound window.
    #[must_use]
    pub fn window(&self) -> &CommitWindow {
        &self.window
    }
}

// ============================================================================
// Tests
// ============================================================================
