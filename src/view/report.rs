//! Python-facing results of engine actions

use pyo3::prelude::*;

use crate::model::CharacterId;
use crate::turn::{StartOutcome, TurnOutcome};

/// Result of `create_character`
#[pyclass]
pub struct StartReport {
    outcome: StartOutcome,
}

impl StartReport {
    pub fn new(outcome: StartOutcome) -> Self {
        Self { outcome }
    }
}

#[pymethods]
impl StartReport {
    #[getter]
    fn success(&self) -> bool {
        self.outcome.is_success()
    }

    /// "Success" or the failed step's message
    #[getter]
    fn message(&self) -> &'static str {
        self.outcome.bootstrap.message()
    }

    /// None when the character was discarded
    #[getter]
    fn character_id(&self) -> Option<CharacterId> {
        self.outcome.character_id()
    }

    #[getter]
    fn failed_step(&self) -> Option<&'static str> {
        self.outcome.bootstrap.failed_step.map(|s| s.as_str())
    }

    #[getter]
    fn score(&self) -> i64 {
        self.outcome.bootstrap.score
    }

    fn __repr__(&self) -> String {
        format!(
            "StartReport(success={}, character_id={:?})",
            self.outcome.is_success(),
            self.outcome.character_id()
        )
    }
}

/// Result of `advance_year`
#[pyclass]
pub struct TurnReport {
    outcome: TurnOutcome,
}

impl TurnReport {
    pub fn new(outcome: TurnOutcome) -> Self {
        Self { outcome }
    }
}

#[pymethods]
impl TurnReport {
    /// The year was taken, even if attributes did not change
    #[getter]
    fn success(&self) -> bool {
        self.outcome.advanced()
    }

    #[getter]
    fn message(&self) -> Option<&'static str> {
        self.outcome.failure_message()
    }

    #[getter]
    fn partial(&self) -> bool {
        self.outcome.is_partial()
    }

    #[getter]
    fn attributes_updated(&self) -> bool {
        self.outcome.attributes_committed
    }

    #[getter]
    fn offers_updated(&self) -> bool {
        self.outcome.refresh_committed
    }

    #[getter]
    fn is_deceased(&self) -> bool {
        self.outcome.death.is_some()
    }

    /// "narrative" or "poor_health" when the character died this turn
    #[getter]
    fn death_cause(&self) -> Option<&'static str> {
        self.outcome.death.map(|d| d.as_str())
    }

    #[getter]
    fn age(&self) -> u32 {
        self.outcome.age
    }

    #[getter]
    fn score_delta(&self) -> i64 {
        self.outcome.score_delta
    }

    #[getter]
    fn score(&self) -> i64 {
        self.outcome.score
    }

    fn __repr__(&self) -> String {
        format!(
            "TurnReport(success={}, age={}, score_delta={})",
            self.outcome.advanced(),
            self.outcome.age,
            self.outcome.score_delta
        )
    }
}
