//! Fixed-step encounter driver.
//!
//! Stands in for the presentation layer: it owns the clock, moves the
//! monster on a circle around the player, and swings the player's knife
//! at a fixed interval.

use std::f32::consts::{PI, TAU};

use telegraph_common::{deg_to_rad, Pose, TelegraphError, TelegraphResult};
use telegraph_gameplay::{AreaQuery, CommitPhase, Encounter, PlayerProfile};
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::content::EncounterContent;

/// Distance the monster keeps from the player.
pub const ORBIT_RADIUS: f32 = 60.0;

/// Monster orbit speed (radians per second).
pub const ORBIT_SPEED: f32 = 0.6;

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated time (ms)
    pub elapsed_ms: f32,
    /// Player swings
    pub swings: u32,
    /// Swings that hit the monster
    pub player_hits: u32,
    /// Monster moves started
    pub moves_started: u32,
    /// Monster strikes that landed
    pub monster_strikes: u32,
    /// Monster health at the end
    pub monster_health: f32,
    /// Player health at the end
    pub player_health: f32,
}

impl RunSummary {
    /// Whether the run ended with someone at zero health.
    #[must_use]
    pub fn decided(&self) -> bool {
        self.monster_health <= 0.0 || self.player_health <= 0.0
    }
}

/// Drives one encounter with a fixed step.
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    encounter: Encounter,
    swing: AreaQuery,
    clock_ms: f32,
    next_swing_ms: f32,
    summary: RunSummary,
}

impl Harness {
    /// Builds the encounter from config and content.
    pub fn new(config: HarnessConfig, content: &EncounterContent) -> TelegraphResult<Self> {
        let player = PlayerProfile {
            radius: config.player_radius,
            max_health: config.player_max_health,
        };
        let encounter = Encounter::new(content.to_profile(), player, config.seed)
            .map_err(|e| TelegraphError::InvalidSetup(e.to_string()))?;
        let swing = AreaQuery::Sector {
            range: config.range,
            half_angle: deg_to_rad(config.half_angle_deg),
        };

        Ok(Self {
            next_swing_ms: config.swing_every_ms,
            config,
            encounter,
            swing,
            clock_ms: 0.0,
            summary: RunSummary::default(),
        })
    }

    /// Monster pose at `time_ms`: on the orbit, facing the player.
    #[must_use]
    pub fn monster_pose(time_ms: f32) -> Pose {
        let theta = (ORBIT_SPEED * time_ms / 1000.0).rem_euclid(TAU);
        Pose::new(
            ORBIT_RADIUS * theta.cos(),
            ORBIT_RADIUS * theta.sin(),
            theta + PI,
        )
    }

    /// Player pose at `time_ms`: at the origin, facing the monster.
    #[must_use]
    pub fn player_pose(time_ms: f32) -> Pose {
        let theta = (ORBIT_SPEED * time_ms / 1000.0).rem_euclid(TAU);
        Pose::new(0.0, 0.0, theta)
    }

    /// Advances one fixed step.
    pub fn step(&mut self) {
        let dt = self.config.tick_ms;
        self.clock_ms += dt;

        let report = self.encounter.tick(
            dt,
            Self::monster_pose(self.clock_ms),
            Self::player_pose(self.clock_ms),
        );
        if report.move_started {
            self.summary.moves_started += 1;
        }
        if report.strike_damage.is_some() {
            self.summary.monster_strikes += 1;
        }

        if self.clock_ms >= self.next_swing_ms {
            self.next_swing_ms += self.config.swing_every_ms;
            self.summary.swings += 1;
            let hits = self.encounter.player_attack(&self.swing, self.config.damage);
            if !hits.is_empty() {
                self.summary.player_hits += 1;
            }
            debug!(
                "Swing at {}ms during {:?}: {} hits",
                self.clock_ms,
                report.phase,
                hits.len()
            );
        }

        self.summary.ticks += 1;
    }

    /// Runs until the configured duration passes or someone falls.
    pub fn run(&mut self) -> RunSummary {
        let ticks = self.config.tick_count();
        info!(
            "Running encounter for {}ms ({} ticks of {}ms)",
            self.config.duration_ms, ticks, self.config.tick_ms
        );

        for _ in 0..ticks {
            if self.encounter.is_over() {
                break;
            }
            self.step();
        }
        self.summary()
    }

    /// Summary so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            elapsed_ms: self.clock_ms,
            monster_health: self.encounter.monster_health(),
            player_health: self.encounter.player_health(),
            ..self.summary.clone()
        }
    }

    /// The running encounter.
    #[must_use]
    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    /// Phase of the monster's running move.
    #[must_use]
    pub fn phase(&self) -> CommitPhase {
        self.encounter
            .current_timeline()
            .map_or(CommitPhase::Idle, |t| t.phase())
    }
}

/// Loads content per `config` and runs one encounter.
pub fn run(config: &HarnessConfig) -> TelegraphResult<RunSummary> {
    let content = EncounterContent::load_or_builtin(config.content_path.as_deref())?;
    let mut harness = Harness::new(config.clone(), &content)?;
    Ok(harness.run())
}
