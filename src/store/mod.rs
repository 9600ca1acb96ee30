//! Record store abstraction
//!
//! The turn engine only needs create/read/delete per character, ordered
//! history queries, a replaceable offer slot, and an atomic commit of the
//! rows a pipeline step produces. How the records are kept is up to the
//! implementation; `MemoryStore` is the bundled one.

mod memory;

pub use memory::*;

use crate::error::Result;
use crate::model::{AttributeSnapshot, Character, CharacterId, LifeEvent, NewCharacter, OfferSet};

/// Rows written by one pipeline step, applied all-or-nothing
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Replacement for the character row
    pub character: Option<Character>,
    /// Events appended after the existing history
    pub events: Vec<LifeEvent>,
    /// Snapshot appended to the attribute history
    pub snapshot: Option<AttributeSnapshot>,
    /// Force the current snapshot's health to zero (narrative death)
    pub zero_current_health: bool,
}

impl ChangeSet {
    pub fn character(character: &Character) -> Self {
        Self {
            character: Some(character.clone()),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: LifeEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = LifeEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_snapshot(mut self, snapshot: AttributeSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn zeroing_health(mut self) -> Self {
        self.zero_current_health = true;
        self
    }
}

/// Persistence collaborator for the turn engine
pub trait LifeStore: Send + Sync {
    /// Create a character record in the `Created` state
    fn create_character(&self, new: NewCharacter) -> Result<Character>;

    fn character(&self, id: CharacterId) -> Result<Character>;

    /// Delete a character along with its history and offers
    fn delete_character(&self, id: CharacterId) -> Result<()>;

    /// Apply a change set atomically
    fn commit(&self, id: CharacterId, changes: ChangeSet) -> Result<()>;

    /// All life events, ordered by year ascending (insertion order within a year)
    fn events(&self, id: CharacterId) -> Result<Vec<LifeEvent>>;

    /// The snapshot with the greatest year
    fn latest_snapshot(&self, id: CharacterId) -> Result<Option<AttributeSnapshot>>;

    /// All snapshots ordered by year ascending
    fn snapshots(&self, id: CharacterId) -> Result<Vec<AttributeSnapshot>>;

    fn offers(&self, id: CharacterId) -> Result<OfferSet>;

    /// Replace the whole offer slot, returning the new one
    fn replace_offers(
        &self,
        id: CharacterId,
        choices: Vec<String>,
        achievements: Vec<String>,
    ) -> Result<OfferSet>;

    /// Every character record, in id order
    fn characters(&self) -> Vec<Character>;
}
