//! Encounter session: one player against one rigged monster.
//!
//! Each [`Encounter::tick`]:
//! 1. Advances the running move's timeline, or the rest timer between moves
//! 2. Picks and starts the next move once the rest timer runs out
//! 3. Samples the monster rig, moves the shapes to world space and replaces
//!    the monster's registry entries
//! 4. Registers the player's hurtbox
//! 5. Lands the move's strike on the player at most once, when the step
//!    crossed the move's active phase
//!
//! Player attacks go through [`Encounter::player_attack`], which runs an
//! area query against every team hostile to the player.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use telegraph_common::{HurtboxId, OwnerId, Pose, TeamId};
use telegraph_kernel::{shapes_intersect, HurtboxRig, Shape};
use thiserror::Error;
use tracing::{debug, trace};

use crate::pick::{PickError, WeightedPool};
use crate::query::{AreaQuery, HurtboxQuery};
use crate::registry::{HitboxRegistry, HurtboxData, HurtboxEntry};
use crate::team::TeamTable;
use crate::timeline::{CommitPhase, CommitWindow, HitboxTimeline};

/// Rig state sampled while no move runs.
pub const IDLE_STATE: &str = "idle";

/// Encounter setup errors.
#[derive(Debug, Error)]
pub enum EncounterError {
    /// Move table could not form a pool
    #[error("Invalid move table: {0}")]
    Pool(#[from] PickError),
    /// A move plays an animation the rig does not have
    #[error("Move '{name}' uses unknown animation '{animation}'")]
    UnknownAnimation {
        /// Move name
        name: String,
        /// Missing rig state
        animation: String,
    },
}

/// Result type for encounter setup.
pub type EncounterResult<T> = Result<T, EncounterError>;

// ============================================================================
// Profiles
// ============================================================================

/// One attack in the monster's move table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterMove {
    /// Move name
    pub name: String,
    /// Rig state played while the move runs
    pub animation: String,
    /// Commitment timing
    pub window: CommitWindow,
    /// Selection weight
    pub weight: f32,
    /// Strike shapes in model space
    pub strike: Vec<Shape>,
    /// Damage dealt to the player on a landed strike
    pub damage: f32,
}

impl MonsterMove {
    /// Creates a move with weight 1 and no strike shapes.
    #[must_use]
    pub fn new(name: impl Into<String>, animation: impl Into<String>, window: CommitWindow) -> Self {
        Self {
            name: name.into(),
            animation: animation.into(),
            window,
            weight: 1.0,
            strike: Vec::new(),
            damage: 0.0,
        }
    }

    /// Sets the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Adds a strike shape.
    #[must_use]
    pub fn with_strike(mut self, shape: Shape) -> Self {
        self.strike.push(shape);
        self
    }

    /// Sets the damage.
    #[must_use]
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }
}

/// Monster definition.
#[derive(Debug, Clone)]
pub struct MonsterProfile {
    /// Display name
    pub name: String,
    /// Starting health
    pub max_health: f32,
    /// Hurtbox rig
    pub rig: HurtboxRig,
    /// Payload per rig shape index; missing indices get the default payload
    pub parts: Vec<HurtboxData>,
    /// Move table
    pub moves: Vec<MonsterMove>,
    /// Pause between moves (ms)
    pub rest_ms: f32,
}

/// Player definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerProfile {
    /// Hurtbox circle radius
    pub radius: f32,
    /// Starting health
    pub max_health: f32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            radius: 12.0,
            max_health: 100.0,
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Phase of the running move, `Idle` between moves
    pub phase: CommitPhase,
    /// Name of the running move
    pub current_move: Option<String>,
    /// A move started this tick
    pub move_started: bool,
    /// Damage the monster dealt this tick, if its strike landed
    pub strike_damage: Option<f32>,
    /// Monster hurtboxes registered this tick
    pub monster_hurtboxes: usize,
}

/// One hurtbox hit by a player attack.
#[derive(Debug, Clone, PartialEq)]
pub struct HitCandidate {
    /// Owner of the hurtbox
    pub owner: OwnerId,
    /// Team of the owner
    pub team: TeamId,
    /// Hurtbox ID within the owner's set
    pub id: HurtboxId,
    /// Body part label
    pub part: Option<String>,
    /// Damage multiplier of the hurtbox
    pub multiplier: f32,
    /// Damage applied
    pub damage: f32,
}

// ============================================================================
// Encounter
// ============================================================================

/// A running encounter between the player and one monster.
#[derive(Debug)]
pub struct Encounter {
    registry: HitboxRegistry,
    teams: TeamTable,
    rig: HurtboxRig,
    parts: Vec<HurtboxData>,
    moves: Vec<MonsterMove>,
    timelines: Vec<HitboxTimeline>,
    pool: WeightedPool<usize>,
    rng: fastrand::Rng,
    seed: u64,

    monster_name: String,
    monster_owner: OwnerId,
    monster_pose: Pose,
    monster_max_health: f32,
    monster_health: f32,
    rest_ms: f32,

    player: PlayerProfile,
    player_owner: OwnerId,
    player_pose: Pose,
    player_health: f32,

    current: Option<usize>,
    anim_time: f32,
    rest_remaining: f32,
    strike_spent: bool,
}

impl Encounter {
    /// Sets up an encounter. Fails if the move table is unusable.
    pub fn new(monster: MonsterProfile, player: PlayerProfile, seed: u64) -> EncounterResult<Self> {
        for mv in &monster.moves {
            if monster.rig.track(&mv.animation).is_none() {
                return Err(EncounterError::UnknownAnimation {
                    name: mv.name.clone(),
                    animation: mv.animation.clone(),
                });
            }
        }
        let pool = WeightedPool::new(
            monster
                .moves
                .iter()
                .enumerate()
                .map(|(i, mv)| (i, mv.weight))
                .collect(),
        )?;
        let timelines = monster
            .moves
            .iter()
            .map(|mv| HitboxTimeline::new(mv.window))
            .collect();
        let rest_ms = monster.rest_ms.max(0.0);

        debug!(
            "Encounter set up: {} with {} moves, seed {}",
            monster.name,
            monster.moves.len(),
            seed
        );

        Ok(Self {
            registry: HitboxRegistry::new(),
            teams: TeamTable::default(),
            rig: monster.rig,
            parts: monster.parts,
            moves: monster.moves,
            timelines,
            pool,
            rng: fastrand::Rng::with_seed(seed),
            seed,
            monster_name: monster.name,
            monster_owner: OwnerId::new(),
            monster_pose: Pose::default(),
            monster_max_health: monster.max_health,
            monster_health: monster.max_health,
            rest_ms,
            player,
            player_owner: OwnerId::new(),
            player_pose: Pose::default(),
            player_health: player.max_health,
            current: None,
            anim_time: 0.0,
            rest_remaining: rest_ms,
            strike_spent: false,
        })
    }

    /// Replaces the hostility table.
    #[must_use]
    pub fn with_teams(mut self, teams: TeamTable) -> Self {
        self.teams = teams;
        self
    }

    /// Runs one simulation step.
    pub fn tick(&mut self, dt_ms: f32, monster_pose: Pose, player_pose: Pose) -> TickReport {
        self.monster_pose = monster_pose;
        self.player_pose = player_pose;
        let dt = dt_ms.max(0.0);
        self.anim_time += dt;

        let mut move_started = false;
        let mut swept_from = 0.0;
        match self.current {
            Some(index) => {
                swept_from = self.timelines[index].time();
                self.timelines[index].advance(dt);
            },
            None => {
                self.rest_remaining -= dt;
                if self.rest_remaining <= 0.0 {
                    self.start_next_move();
                    move_started = true;
                }
            },
        }

        let monster_hurtboxes = self.register_monster();
        self.register_player();

        let mut strike_damage = None;
        let mut phase = CommitPhase::Idle;
        let mut current_move = None;
        if let Some(index) = self.current {
            let timeline = &self.timelines[index];
            phase = timeline.phase();
            current_move = Some(self.moves[index].name.clone());

            // Checked over the whole step so a short active phase is never skipped
            let live = timeline.window().active_overlaps(swept_from, timeline.time());
            if live && !self.strike_spent && self.strike_lands(index) {
                let damage = self.moves[index].damage;
                self.player_health = (self.player_health - damage).max(0.0);
                self.strike_spent = true;
                strike_damage = Some(damage);
                debug!(
                    "{} landed {} for {} damage, player at {}",
                    self.monster_name, self.moves[index].name, damage, self.player_health
                );
            }

            if !timeline.is_running() {
                self.finish_move();
            }
        }

        trace!(
            "Tick dt={}ms phase={:?} hurtboxes={}",
            dt,
            phase,
            monster_hurtboxes
        );

        TickReport {
            phase,
            current_move,
            move_started,
            strike_damage,
            monster_hurtboxes,
        }
    }

    /// Player attack against every hostile hurtbox inside `area`.
    ///
    /// Each owner is hit at most once, on its highest-multiplier hurtbox.
    pub fn player_attack(&mut self, area: &AreaQuery, base_damage: f32) -> Vec<HitCandidate> {
        let mut best: AHashMap<OwnerId, HitCandidate> = AHashMap::new();
        let hits = HurtboxQuery::new(&self.registry, self.player_pose)
            .hostile_to(&self.teams, TeamId::Player)
            .within(area);

        for entry in hits {
            let data = entry.data.clone().unwrap_or_default();
            let candidate = HitCandidate {
                owner: entry.owner,
                team: entry.team,
                id: entry.id,
                part: data.part,
                multiplier: data.damage_multiplier,
                damage: base_damage * data.damage_multiplier,
            };
            let better = best
                .get(&entry.owner)
                .map_or(true, |existing| candidate.multiplier > existing.multiplier);
            if better {
                best.insert(entry.owner, candidate);
            }
        }

        let mut resolved: Vec<HitCandidate> = best.into_values().collect();
        resolved.sort_by_key(|hit| hit.owner);

        for hit in &resolved {
            if hit.owner == self.monster_owner {
                self.monster_health = (self.monster_health - hit.damage).max(0.0);
                debug!(
                    "Player hit {} ({:?}) for {}, monster at {}",
                    self.monster_name, hit.part, hit.damage, self.monster_health
                );
            }
        }
        resolved
    }

    /// Tears down registry state and timelines and restores health.
    pub fn reset(&mut self) {
        self.registry.clear(None);
        for timeline in &mut self.timelines {
            timeline.stop();
        }
        self.rng = fastrand::Rng::with_seed(self.seed);
        self.current = None;
        self.anim_time = 0.0;
        self.rest_remaining = self.rest_ms;
        self.strike_spent = false;
        self.monster_health = self.monster_max_health;
        self.player_health = self.player.max_health;
        debug!("Encounter reset");
    }

    fn start_next_move(&mut self) {
        let index = *self.pool.pick(&mut self.rng);
        self.timelines[index].start(false);
        self.current = Some(index);
        self.anim_time = 0.0;
        self.strike_spent = false;
        debug!("{} starts {}", self.monster_name, self.moves[index].name);
    }

    fn finish_move(&mut self) {
        self.current = None;
        self.anim_time = 0.0;
        self.rest_remaining = self.rest_ms;
    }

    fn animation_state(&self) -> &str {
        self.current
            .map_or(IDLE_STATE, |index| self.moves[index].animation.as_str())
    }

    fn register_monster(&mut self) -> usize {
        let pose = self.monster_pose;
        let shapes = self.rig.sample(self.animation_state(), self.anim_time);
        let entries: Vec<HurtboxEntry> = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                HurtboxEntry::new(HurtboxId::new(i as u32), shape.transformed(&pose))
                    .with_data(self.parts.get(i).cloned().unwrap_or_default())
            })
            .collect();
        let count = entries.len();
        self.registry
            .register_hurtboxes(TeamId::Monsters, self.monster_owner, entries);
        count
    }

    fn register_player(&mut self) {
        let at = self.player_pose;
        self.registry.register_hurtboxes(
            TeamId::Player,
            self.player_owner,
            vec![HurtboxEntry::new(
                HurtboxId::new(0),
                Shape::circle(at.x, at.y, self.player.radius),
            )],
        );
    }

    fn strike_lands(&self, index: usize) -> bool {
        let pose = self.monster_pose;
        let strike: Vec<Shape> = self.moves[index]
            .strike
            .iter()
            .map(|shape| shape.transformed(&pose))
            .collect();
        self.teams
            .hostile_teams(TeamId::Monsters)
            .into_iter()
            .any(|team| {
                let targets: Vec<Shape> = self.registry.iter(Some(team)).map(|b| b.shape).collect();
                shapes_intersect(&strike, &targets)
            })
    }

    /// Hitbox registry for this session.
    #[must_use]
    pub fn registry(&self) -> &HitboxRegistry {
        &self.registry
    }

    /// Hostility table.
    #[must_use]
    pub fn teams(&self) -> &TeamTable {
        &self.teams
    }

    /// Owner ID of the monster's hurtbox set.
    #[must_use]
    pub fn monster_owner(&self) -> OwnerId {
        self.monster_owner
    }

    /// Owner ID of the player's hurtbox set.
    #[must_use]
    pub fn player_owner(&self) -> OwnerId {
        self.player_owner
    }

    /// Monster health.
    #[must_use]
    pub fn monster_health(&self) -> f32 {
        self.monster_health
    }

    /// Player health.
    #[must_use]
    pub fn player_health(&self) -> f32 {
        self.player_health
    }

    /// Whether either side is out of health.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.monster_health <= 0.0 || self.player_health <= 0.0
    }

    /// Name of the running move.
    #[must_use]
    pub fn current_move(&self) -> Option<&MonsterMove> {
        self.current.map(|index| &self.moves[index])
    }

    /// Timeline of the running move.
    #[must_use]
    pub fn current_timeline(&self) -> Option<&HitboxTimeline> {
        self.current.map(|index| &self.timelines[index])
    }

    /// The move table.
    #[must_use]
    pub fn moves(&self) -> &[MonsterMove] {
        &self.moves
    }
}
