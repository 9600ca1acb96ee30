//! In-memory record store

use ahash::AHashMap;
use parking_lot::RwLock;

use super::{ChangeSet, LifeStore};
use crate::error::{LifeSimError, Result};
use crate::model::{AttributeSnapshot, Character, CharacterId, LifeEvent, NewCharacter, OfferSet};

/// Everything kept for one character
#[derive(Debug, Clone)]
struct CharacterRecord {
    character: Character,
    events: Vec<LifeEvent>,
    snapshots: Vec<AttributeSnapshot>,
    offers: OfferSet,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: CharacterId,
    records: AHashMap<CharacterId, CharacterRecord>,
}

/// Store backed by a single lock-protected table
///
/// Every trait call takes the lock once, so a commit is observed either
/// entirely or not at all.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<T>(&self, id: CharacterId, f: impl FnOnce(&CharacterRecord) -> T) -> Result<T> {
        let tables = self.tables.read();
        tables
            .records
            .get(&id)
            .map(f)
            .ok_or(LifeSimError::CharacterNotFound(id))
    }
}

impl LifeStore for MemoryStore {
    fn create_character(&self, new: NewCharacter) -> Result<Character> {
        let mut tables = self.tables.write();
        tables.next_id += 1;
        let id = tables.next_id;
        let character = Character::from_new(id, new);
        tables.records.insert(
            id,
            CharacterRecord {
                character: character.clone(),
                events: Vec::new(),
                snapshots: Vec::new(),
                offers: OfferSet::default(),
            },
        );
        Ok(character)
    }

    fn character(&self, id: CharacterId) -> Result<Character> {
        self.read(id, |r| r.character.clone())
    }

    fn delete_character(&self, id: CharacterId) -> Result<()> {
        self.tables
            .write()
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(LifeSimError::CharacterNotFound(id))
    }

    fn commit(&self, id: CharacterId, changes: ChangeSet) -> Result<()> {
        let mut tables = self.tables.write();
        let record = tables
            .records
            .get_mut(&id)
            .ok_or(LifeSimError::CharacterNotFound(id))?;

        if let Some(ref character) = changes.character {
            if character.id != id {
                return Err(LifeSimError::Store(format!(
                    "change set for character {} carries row for {}",
                    id, character.id
                )));
            }
        }

        // Zero before appending so the flag targets the snapshot that was
        // current when the step started.
        if changes.zero_current_health {
            if let Some(current) = record.snapshots.iter_mut().max_by_key(|s| s.year) {
                current.health = 0;
            }
        }
        if let Some(character) = changes.character {
            record.character = character;
        }
        record.events.extend(changes.events);
        if let Some(snapshot) = changes.snapshot {
            record.snapshots.push(snapshot);
        }
        Ok(())
    }

    fn events(&self, id: CharacterId) -> Result<Vec<LifeEvent>> {
        self.read(id, |r| {
            let mut events = r.events.clone();
            // Stable sort keeps insertion order for events in the same year
            events.sort_by_key(|e| e.year);
            events
        })
    }

    fn latest_snapshot(&self, id: CharacterId) -> Result<Option<AttributeSnapshot>> {
        // max_by_key returns the last maximum, i.e. the newest of equal years
        self.read(id, |r| r.snapshots.iter().max_by_key(|s| s.year).copied())
    }

    fn snapshots(&self, id: CharacterId) -> Result<Vec<AttributeSnapshot>> {
        self.read(id, |r| {
            let mut snapshots = r.snapshots.clone();
            snapshots.sort_by_key(|s| s.year);
            snapshots
        })
    }

    fn offers(&self, id: CharacterId) -> Result<OfferSet> {
        self.read(id, |r| r.offers.clone())
    }

    fn replace_offers(
        &self,
        id: CharacterId,
        choices: Vec<String>,
        achievements: Vec<String>,
    ) -> Result<OfferSet> {
        let mut tables = self.tables.write();
        let record = tables
            .records
            .get_mut(&id)
            .ok_or(LifeSimError::CharacterNotFound(id))?;
        record.offers = record.offers.next(choices, achievements);
        Ok(record.offers.clone())
    }

    fn characters(&self) -> Vec<Character> {
        let tables = self.tables.read();
        let mut characters: Vec<Character> =
            tables.records.values().map(|r| r.character.clone()).collect();
        characters.sort_by_key(|c| c.id);
        characters
    }
}
