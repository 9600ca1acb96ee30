//! Error types for the life simulator core

use pyo3::exceptions::{PyKeyError, PyPermissionError, PyRuntimeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

use crate::model::{CharacterId, LifeStatus, PlayerId};

/// Main error type for the life simulator core
///
/// Provider and validation failures never show up here: the pipeline folds
/// them into a step outcome with a fixed message. This type covers the
/// failures a caller has to act on.
#[derive(Error, Debug)]
pub enum LifeSimError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Character {character_id} does not belong to player {player_id}")]
    NotOwner {
        character_id: CharacterId,
        player_id: PlayerId,
    },

    #[error("Cannot {action} a character whose status is {status}")]
    InvalidTransition {
        status: LifeStatus,
        action: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Engine not initialized. Call init_engine() first.")]
    EngineNotInitialized,
}

impl From<LifeSimError> for PyErr {
    fn from(err: LifeSimError) -> PyErr {
        let msg = err.to_string();
        match err {
            LifeSimError::CharacterNotFound(_) => PyKeyError::new_err(msg),
            LifeSimError::NotOwner { .. } => PyPermissionError::new_err(msg),
            LifeSimError::InvalidTransition { .. } | LifeSimError::Config(_) => {
                PyValueError::new_err(msg)
            }
            LifeSimError::Store(_) | LifeSimError::EngineNotInitialized => {
                PyRuntimeError::new_err(msg)
            }
        }
    }
}

/// Result type alias for the life simulator core
pub type Result<T> = std::result::Result<T, LifeSimError>;
