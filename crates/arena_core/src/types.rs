use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ArenaError;

/// Stable key for a competitor: character name qualified by realm.
///
/// Never duplicated within one snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub name: String,
    pub realm: String,
}

impl PlayerIdentity {
    pub fn new(name: &str, realm: &str) -> Self {
        Self {
            name: name.to_string(),
            realm: realm.to_string(),
        }
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.realm)
    }
}

/// A competitive category with a fixed team size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bracket {
    Twos,
    Threes,
    Fives,
}

impl Bracket {
    /// Team size `k` for this bracket.
    pub fn team_size(self) -> usize {
        match self {
            Bracket::Twos => 2,
            Bracket::Threes => 3,
            Bracket::Fives => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bracket::Twos => "2v2",
            Bracket::Threes => "3v3",
            Bracket::Fives => "5v5",
        }
    }

    /// Parse a bracket from its display label ("2v2", "3v3", "5v5").
    pub fn from_label(label: &str) -> Option<Bracket> {
        match label {
            "2v2" => Some(Bracket::Twos),
            "3v3" => Some(Bracket::Threes),
            "5v5" => Some(Bracket::Fives),
            _ => None,
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unordered set of player identities.
///
/// Two teams are equal iff their member sets are equal. Members are kept in
/// a `BTreeSet` so iteration order and hashing are canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Team {
    members: BTreeSet<PlayerIdentity>,
}

impl Team {
    pub fn new(members: impl IntoIterator<Item = PlayerIdentity>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Build a team, rejecting member sets of the wrong size for a bracket.
    pub fn with_size(
        members: impl IntoIterator<Item = PlayerIdentity>,
        expected: usize,
    ) -> Result<Self, ArenaError> {
        let team = Self::new(members);
        if team.len() != expected {
            return Err(ArenaError::TeamSize {
                expected,
                found: team.len(),
            });
        }
        Ok(team)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, identity: &PlayerIdentity) -> bool {
        self.members.contains(identity)
    }

    pub fn members(&self) -> impl Iterator<Item = &PlayerIdentity> {
        self.members.iter()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.members.iter().map(|m| m.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// (spec id, class id) pairs that fill the support role.
///
/// Used by the simulator's team-formation rule: every generated team gets at
/// least one member forced into one of these specs.
pub const SUPPORT_SPECS: &[(u16, u8)] = &[
    (65, 2),   // support line of class 2
    (105, 11), // support line of class 11
    (256, 5),  // first support line of class 5
    (257, 5),  // second support line of class 5
    (264, 7),  // support line of class 7
    (270, 10), // support line of class 10
];

/// Whether a spec id fills the support role.
pub fn is_support_spec(spec_id: u16) -> bool {
    SUPPORT_SPECS.iter().any(|&(spec, _)| spec == spec_id)
}
