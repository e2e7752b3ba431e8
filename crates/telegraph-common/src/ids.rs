//! ID types for owners, hurtboxes, and teams.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for owner IDs.
static OWNER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies the entity (player, monster instance) whose hurtboxes are
/// registered as one atomic group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Creates a new unique owner ID.
    #[must_use]
    pub fn new() -> Self {
        Self(OWNER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates an owner ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid owner ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) owner ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// Identifies one hurtbox within its owner's current set.
///
/// Not globally unique: two owners may both register a `HurtboxId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HurtboxId(u32);

impl HurtboxId {
    /// Creates a hurtbox ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Coarse hostility grouping used to filter which hurtboxes an attack may affect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TeamId {
    /// The player character.
    Player,
    /// Monsters (the boss and anything it summons).
    Monsters,
    /// Environment, props, anything nobody fights over.
    #[default]
    Neutral,
}

impl TeamId {
    /// All teams, in a stable order.
    pub const ALL: [Self; 3] = [Self::Player, Self::Monsters, Self::Neutral];

    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Monsters => "monsters",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
