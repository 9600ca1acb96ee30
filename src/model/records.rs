//! Append-only history records and the offer slot

use serde::Serialize;

pub const DEFAULT_HEALTH: i32 = 100;
pub const DEFAULT_WEALTH: i64 = 500;
pub const DEFAULT_HAPPINESS: i32 = 75;
pub const DEFAULT_KARMA: i32 = 0;
pub const DEFAULT_IQ: i32 = 100;

/// Point-in-time attribute values, appended once per successful evaluation
///
/// Intended ranges: health and happiness 0-100, karma -100..100, iq 0-300.
/// None of them are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeSnapshot {
    pub year: u32,
    pub health: i32,
    pub wealth: i64,
    pub happiness: i32,
    pub karma: i32,
    pub iq: i32,
}

impl AttributeSnapshot {
    /// Snapshot holding the default value for every attribute
    pub fn defaults(year: u32) -> Self {
        Self {
            year,
            health: DEFAULT_HEALTH,
            wealth: DEFAULT_WEALTH,
            happiness: DEFAULT_HAPPINESS,
            karma: DEFAULT_KARMA,
            iq: DEFAULT_IQ,
        }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.health <= 0
    }
}

/// One year of narrative history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifeEvent {
    pub year: u32,
    pub summary: String,
}

impl LifeEvent {
    pub fn new(year: u32, summary: impl Into<String>) -> Self {
        Self {
            year,
            summary: summary.into(),
        }
    }
}

/// Choices and achievements offered for the next turn
///
/// The slot is replaced as a whole on every successful refresh; `version`
/// counts replacements so callers can tell two offer sets apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferSet {
    pub version: u64,
    pub choices: Vec<String>,
    pub achievements: Vec<String>,
}

impl OfferSet {
    /// The slot that replaces `self`
    pub fn next(&self, choices: Vec<String>, achievements: Vec<String>) -> Self {
        Self {
            version: self.version + 1,
            choices,
            achievements,
        }
    }
}
