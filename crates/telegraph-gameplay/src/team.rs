//! Team hostility: who may damage whom.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use telegraph_common::TeamId;

/// Team definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team ID
    pub id: TeamId,
    /// Display name
    pub name: String,
    /// Teams this one may damage
    pub hostile_to: Vec<TeamId>,
}

impl Team {
    /// Creates a team with no hostilities.
    #[must_use]
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hostile_to: Vec::new(),
        }
    }

    /// Adds a hostile team.
    #[must_use]
    pub fn with_hostile(mut self, other: TeamId) -> Self {
        if other != self.id && !self.hostile_to.contains(&other) {
            self.hostile_to.push(other);
        }
        self
    }
}

/// Symmetric-by-default hostility table.
#[derive(Debug, Clone)]
pub struct TeamTable {
    hostile: AHashMap<TeamId, AHashSet<TeamId>>,
}

impl Default for TeamTable {
    /// Player and monsters are mutually hostile; neutral fights nobody.
    fn default() -> Self {
        let mut table = Self::empty();
        table.set_hostile(TeamId::Player, TeamId::Monsters, true);
        table
    }
}

impl TeamTable {
    /// A table where nobody is hostile.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            hostile: AHashMap::new(),
        }
    }

    /// Builds a table from team definitions. Hostility is taken as declared
    /// (one-directional).
    #[must_use]
    pub fn from_teams(teams: &[Team]) -> Self {
        let mut table = Self::empty();
        for team in teams {
            for &other in &team.hostile_to {
                if other != team.id {
                    table.hostile.entry(team.id).or_default().insert(other);
                }
            }
        }
        table
    }

    /// Sets hostility in both directions. A team is never hostile to itself.
    pub fn set_hostile(&mut self, a: TeamId, b: TeamId, hostile: bool) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            if hostile {
                self.hostile.entry(from).or_default().insert(to);
            } else if let Some(set) = self.hostile.get_mut(&from) {
                set.remove(&to);
            }
        }
    }

    /// Whether `attacker` may damage `target`.
    #[must_use]
    pub fn is_hostile(&self, attacker: TeamId, target: TeamId) -> bool {
        self.hostile
            .get(&attacker)
            .is_some_and(|set| set.contains(&target))
    }

    /// Teams `attacker` may damage, in [`TeamId::ALL`] order.
    #[must_use]
    pub fn hostile_teams(&self, attacker: TeamId) -> Vec<TeamId> {
        TeamId::ALL
            .into_iter()
            .filter(|&target| self.is_hostile(attacker, target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = TeamTable::default();
        assert!(table.is_hostile(TeamId::Player, TeamId::Monsters));
        assert!(table.is_hostile(TeamId::Monsters, TeamId::Player));
        assert!(!table.is_hostile(TeamId::Neutral, TeamId::Player));
        assert!(!table.is_hostile(TeamId::Player, TeamId::Neutral));
        assert!(!table.is_hostile(TeamId::Player, TeamId::Player));
        assert_eq!(table.hostile_teams(TeamId::Player), vec![TeamId::Monsters]);
        assert!(table.hostile_teams(TeamId::Neutral).is_empty());
    }

    #[test]
    fn test_set_hostile_toggle() {
        let mut table = TeamTable::default();
        table.set_hostile(TeamId::Monsters, TeamId::Neutral, true);
        assert_eq!(
            table.hostile_teams(TeamId::Monsters),
            vec![TeamId::Player, TeamId::Neutral]
        );

        table.set_hostile(TeamId::Player, TeamId::Monsters, false);
        assert!(!table.is_hostile(TeamId::Player, TeamId::Monsters));
        assert!(!table.is_hostile(TeamId::Monsters, TeamId::Player));
    }

    #[test]
    fn test_self_hostility_ignored() {
        let mut table = TeamTable::empty();
        table.set_hostile(TeamId::Player, TeamId::Player, true);
        assert!(!table.is_hostile(TeamId::Player, TeamId::Player));

        let team = Team::new(TeamId::Player, "Player").with_hostile(TeamId::Player);
        assert!(team.hostile_to.is_empty());
    }

    #[test]
    fn test_from_teams_is_directional() {
        let teams = [
            Team::new(TeamId::Player, "Player").with_hostile(TeamId::Monsters),
            Team::new(TeamId::Monsters, "Monsters"),
        ];
        let table = TeamTable::from_teams(&teams);
        assert!(table.is_hostile(TeamId::Player, TeamId::Monsters));
        assert!(!table.is_hostile(TeamId::Monsters, TeamId::Player));
    }
}
