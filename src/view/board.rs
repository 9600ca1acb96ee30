//! Dashboard and leaderboard listings

use crate::model::{Character, CharacterId, PlayerId};
use crate::store::LifeStore;

/// A player's characters split by whether their story is still going
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub active: Vec<Character>,
    pub completed: Vec<Character>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub character_id: CharacterId,
    pub name: String,
    pub age: u32,
    pub score: i64,
}

/// Newest characters first
pub fn dashboard(store: &dyn LifeStore, player_id: PlayerId) -> Dashboard {
    let mut board = Dashboard::default();
    for character in store.characters().into_iter().rev() {
        if character.player_id != player_id {
            continue;
        }
        if character.is_alive() {
            board.active.push(character);
        } else {
            board.completed.push(character);
        }
    }
    board
}

/// Finished lives of every player, best score first
pub fn leaderboard(store: &dyn LifeStore) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = store
        .characters()
        .into_iter()
        .filter(|c| c.status.is_terminal())
        .map(|c| LeaderboardEntry {
            player_id: c.player_id,
            character_id: c.id,
            name: c.name,
            age: c.age,
            score: c.score,
        })
        .collect();
    // Stable, so equal scores stay in id order
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
