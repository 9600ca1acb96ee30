//! Results reported to callers of the turn engine

use crate::model::{Character, CharacterId};

/// Bootstrap steps that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    Narrative,
    Evaluation,
    Refresh,
}

impl BootstrapStep {
    pub fn as_str(self) -> &'static str {
        match self {
            BootstrapStep::Narrative => "narrative",
            BootstrapStep::Evaluation => "evaluation",
            BootstrapStep::Refresh => "refresh",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            BootstrapStep::Narrative => "Failed to generate life story.",
            BootstrapStep::Evaluation => "Failed to evaluate attributes.",
            BootstrapStep::Refresh => "Failed to generate initial choices and achievements.",
        }
    }
}

/// Result of the five-year bootstrap
///
/// Steps that succeeded before a failure stay committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub character_id: CharacterId,
    pub failed_step: Option<BootstrapStep>,
    pub age: u32,
    pub score: i64,
}

impl BootstrapOutcome {
    pub(crate) fn succeeded(character: &Character) -> Self {
        Self {
            character_id: character.id,
            failed_step: None,
            age: character.age,
            score: character.score,
        }
    }

    pub(crate) fn failed(character: &Character, step: BootstrapStep) -> Self {
        Self {
            failed_step: Some(step),
            ..Self::succeeded(character)
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed_step.is_none()
    }

    pub fn message(&self) -> &'static str {
        self.failed_step.map_or("Success", BootstrapStep::failure_message)
    }
}

/// Result of creating a character and bootstrapping it in one go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub bootstrap: BootstrapOutcome,
    /// The record was deleted because bootstrap failed
    pub discarded: bool,
}

impl StartOutcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        self.bootstrap.is_success()
    }

    pub fn character_id(&self) -> Option<CharacterId> {
        (!self.discarded).then_some(self.bootstrap.character_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// The year's narrative reported the character's death
    Narrative,
    /// The evaluated health dropped to zero or below
    PoorHealth,
}

impl DeathCause {
    pub fn as_str(self) -> &'static str {
        match self {
            DeathCause::Narrative => "narrative",
            DeathCause::PoorHealth => "poor_health",
        }
    }
}

pub const NARRATIVE_FAILURE_MESSAGE: &str = "The story could not continue. Please try again.";

/// What one advance-year call committed
///
/// `narrative_committed && !attributes_committed` with no death is the
/// partial commit: the year stands but attributes did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub character_id: CharacterId,
    pub narrative_committed: bool,
    pub attributes_committed: bool,
    pub refresh_committed: bool,
    pub death: Option<DeathCause>,
    /// Age after the call
    pub age: u32,
    /// Score added this turn
    pub score_delta: i64,
    /// Score after the call
    pub score: i64,
}

impl TurnOutcome {
    pub(crate) fn unchanged(character: &Character) -> Self {
        Self {
            character_id: character.id,
            narrative_committed: false,
            attributes_committed: false,
            refresh_committed: false,
            death: None,
            age: character.age,
            score_delta: 0,
            score: character.score,
        }
    }

    /// The turn counts as taken once the narrative is committed
    #[inline]
    pub fn advanced(&self) -> bool {
        self.narrative_committed
    }

    #[inline]
    pub fn is_partial(&self) -> bool {
        self.narrative_committed && !self.attributes_committed && self.death.is_none()
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        (!self.narrative_committed).then_some(NARRATIVE_FAILURE_MESSAGE)
    }
}
