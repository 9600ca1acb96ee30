//! Character and lifecycle status

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

pub type CharacterId = u64;
pub type PlayerId = u64;

/// Lifecycle status of a character
///
/// `Created` only exists between record creation and a successful bootstrap.
/// `Deceased` and `Ended` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeStatus {
    Created,
    Alive,
    Deceased,
    Ended,
}

impl LifeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LifeStatus::Created => "created",
            LifeStatus::Alive => "alive",
            LifeStatus::Deceased => "deceased",
            LifeStatus::Ended => "ended",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, LifeStatus::Deceased | LifeStatus::Ended)
    }
}

impl fmt::Display for LifeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Perks chosen at creation - six is the usual pick, so keep them inline
pub type PerkList = SmallVec<[String; 6]>;

/// Build a perk set: blank names and duplicates are dropped, order is kept
pub fn perk_set<I, S>(perks: I) -> PerkList
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set = PerkList::new();
    for perk in perks {
        let perk: String = perk.into();
        let perk = perk.trim();
        if perk.is_empty() || set.iter().any(|p| p == perk) {
            continue;
        }
        set.push(perk.to_string());
    }
    set
}

/// Fields supplied when a character record is first created
#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub player_id: PlayerId,
    pub name: String,
    pub gender: String,
    pub perks: PerkList,
}

impl NewCharacter {
    pub fn new<I, S>(player_id: PlayerId, name: &str, gender: &str, perks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            player_id,
            name: name.to_string(),
            gender: gender.to_string(),
            perks: perk_set(perks),
        }
    }
}

/// A simulated character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: CharacterId,
    pub player_id: PlayerId,
    pub name: String,
    pub gender: String,
    /// Years lived; equals the year of the latest life event once bootstrapped
    pub age: u32,
    /// Accumulated life score, never decreases
    pub score: i64,
    pub status: LifeStatus,
    pub perks: PerkList,
}

impl Character {
    pub fn from_new(id: CharacterId, new: NewCharacter) -> Self {
        Self {
            id,
            player_id: new.player_id,
            name: new.name,
            gender: new.gender,
            age: 0,
            score: 0,
            status: LifeStatus::Created,
            perks: new.perks,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Add a turn's score delta. Negative deltas are floored at zero so the
    /// score never goes down; returns the delta actually applied.
    pub fn add_score(&mut self, delta: i64) -> i64 {
        let applied = delta.max(0);
        self.score = self.score.saturating_add(applied);
        applied
    }
}
