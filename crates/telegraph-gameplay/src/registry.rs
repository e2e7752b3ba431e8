//! Hitbox registry: current hurtboxes per team and owner.
//!
//! Each owner replaces its whole set once per tick. Replacement is a
//! single map write, so readers see either the previous set or the new
//! one, never a mix.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use telegraph_common::{HurtboxId, OwnerId, TeamId};
use telegraph_kernel::Shape;
use tracing::debug;

/// Default payload attached to a hurtbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HurtboxData {
    /// Damage multiplier for hits on this hurtbox.
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f32,
    /// Body-part label, if any.
    #[serde(default)]
    pub part: Option<String>,
}

const fn default_multiplier() -> f32 {
    1.0
}

impl Default for HurtboxData {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            part: None,
        }
    }
}

impl HurtboxData {
    /// Create a payload for a named part.
    #[must_use]
    pub fn part(label: impl Into<String>, damage_multiplier: f32) -> Self {
        Self {
            damage_multiplier,
            part: Some(label.into()),
        }
    }
}

/// One hurtbox as handed to [`HitboxRegistry::register_hurtboxes`].
#[derive(Debug, Clone, PartialEq)]
pub struct HurtboxEntry<D = HurtboxData> {
    /// ID, unique within the owner's set.
    pub id: HurtboxId,
    /// Shape in world space.
    pub shape: Shape,
    /// Optional payload.
    pub data: Option<D>,
}

impl<D> HurtboxEntry<D> {
    /// Create an entry without payload.
    #[must_use]
    pub fn new(id: HurtboxId, shape: Shape) -> Self {
        Self {
            id,
            shape,
            data: None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }
}

/// A hurtbox held by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredHurtbox<D = HurtboxData> {
    /// ID, unique within the owner's set.
    pub id: HurtboxId,
    /// Owning entity.
    pub owner: OwnerId,
    /// Team of the owner.
    pub team: TeamId,
    /// Shape in world space.
    pub shape: Shape,
    /// Optional payload.
    pub data: Option<D>,
}

/// Per-team, per-owner store of current hurtboxes.
///
/// One instance per encounter session.
#[derive(Debug, Clone)]
pub struct HitboxRegistry<D = HurtboxData> {
    groups: AHashMap<(TeamId, OwnerId), Vec<RegisteredHurtbox<D>>>,
}

impl<D> Default for HitboxRegistry<D> {
    fn default() -> Self {
        Self {
            groups: AHashMap::new(),
        }
    }
}

impl<D> HitboxRegistry<D> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything `owner` has registered under `team`.
    ///
    /// An empty `entries` removes the owner's set.
    pub fn register_hurtboxes(
        &mut self,
        team: TeamId,
        owner: OwnerId,
        entries: impl IntoIterator<Item = HurtboxEntry<D>>,
    ) {
        let boxes: Vec<RegisteredHurtbox<D>> = entries
            .into_iter()
            .map(|entry| RegisteredHurtbox {
                id: entry.id,
                owner,
                team,
                shape: entry.shape,
                data: entry.data,
            })
            .collect();

        debug_assert!(
            boxes.iter().all(|b| b.shape.radius() >= 0.0),
            "hurtbox radius must be non-negative"
        );
        debug_assert!(
            boxes
                .iter()
                .enumerate()
                .all(|(i, b)| boxes[..i].iter().all(|other| other.id != b.id)),
            "hurtbox ids must be unique within an owner"
        );

        debug!("Registered {} hurtboxes for {} on {}", boxes.len(), owner, team);
        if boxes.is_empty() {
            self.groups.remove(&(team, owner));
        } else {
            self.groups.insert((team, owner), boxes);
        }
    }

    /// Iterate current hurtboxes, optionally for one team.
    ///
    /// Ordered by team, then owner, then registration order.
    pub fn iter(&self, team: Option<TeamId>) -> impl Iterator<Item = &RegisteredHurtbox<D>> + '_ {
        let mut keys: Vec<&(TeamId, OwnerId)> = self
            .groups
            .keys()
            .filter(|(t, _)| team.map_or(true, |wanted| *t == wanted))
            .collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|key| self.groups.get(key))
            .flatten()
    }

    /// Number of hurtboxes registered for `team` across all owners.
    #[must_use]
    pub fn team_size(&self, team: TeamId) -> usize {
        self.groups
            .iter()
            .filter(|((t, _), _)| *t == team)
            .map(|(_, boxes)| boxes.len())
            .sum()
    }

    /// One owner's current set.
    #[must_use]
    pub fn owner_hurtboxes(&self, team: TeamId, owner: OwnerId) -> &[RegisteredHurtbox<D>] {
        self.groups
            .get(&(team, owner))
            .map_or(&[], Vec::as_slice)
    }

    /// Drop one owner's set.
    pub fn remove_owner(&mut self, team: TeamId, owner: OwnerId) {
        self.groups.remove(&(team, owner));
    }

    /// Remove everything, or only one team's entries.
    pub fn clear(&mut self, team: Option<TeamId>) {
        match team {
            Some(team) => self.groups.retain(|(t, _), _| *t != team),
            None => self.groups.clear(),
        }
    }

    /// Number of owners with at least one hurtbox.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of hurtboxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<D: Clone> HitboxRegistry<D> {
    /// Copies of current hurtboxes, optionally for one team.
    #[must_use]
    pub fn get_hurtboxes(&self, team: Option<TeamId>) -> Vec<RegisteredHurtbox<D>> {
        self.iter(team).cloned().collect()
    }
}
