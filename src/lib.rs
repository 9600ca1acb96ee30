//! Life Sim Core - turn engine for a provider-driven life simulator
//!
//! Characters live one year per turn. Each turn asks a content provider for
//! narrative text and attribute evaluations, validates the replies, and
//! commits the result to a record store. Python bindings via PyO3.

use pyo3::prelude::*;

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod turn;
pub mod validate;
pub mod view;

use crate::config::{deserialize_engine_config, EngineConfig, ALL_PERKS, DEFAULT_PERK_OFFER};
use crate::error::LifeSimError;
use crate::model::{Character, CharacterId, NewCharacter, PlayerId};
use crate::provider::{GeminiTransport, ProviderClient, PyCallableTransport, Transport};
use crate::store::{LifeStore, MemoryStore};
use crate::turn::TurnEngine;
use crate::view::{LifeRecord, LifeView, StartReport, TurnReport};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::types::{PyDict, PyList};
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// Cached Engine
// ============================================================================

/// Engine together with the settings it was built from
struct CachedEngine {
    engine: Arc<TurnEngine>,
    config: EngineConfig,
}

/// Global cached engine
static CACHED_ENGINE: OnceCell<Arc<RwLock<CachedEngine>>> = OnceCell::new();

/// Current engine, without holding the cache lock during the call
fn cached_engine() -> Result<Arc<TurnEngine>, LifeSimError> {
    CACHED_ENGINE
        .get()
        .map(|cached| cached.read().engine.clone())
        .ok_or(LifeSimError::EngineNotInitialized)
}

fn build_engine(
    config: &EngineConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn LifeStore>,
) -> TurnEngine {
    let provider = ProviderClient::new(&config.api_keys, transport)
        .with_start_index(config.credential_start);
    if provider.credential_count() == 0 {
        tracing::warn!("engine configured without credentials; every provider call will fail");
    }
    TurnEngine::new(store, provider)
}

fn join_error(err: tokio::task::JoinError) -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err(format!("Engine task panicked: {}", err))
}

fn character_to_dict<'py>(py: Python<'py>, character: &Character) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", character.id)?;
    dict.set_item("name", &character.name)?;
    dict.set_item("gender", &character.gender)?;
    dict.set_item("age", character.age)?;
    dict.set_item("score", character.score)?;
    dict.set_item("status", character.status.as_str())?;
    Ok(dict)
}

// ============================================================================
// Python Functions
// ============================================================================

/// Install the log subscriber
///
/// `filter` takes `RUST_LOG` syntax; without it `RUST_LOG` is read, then
/// "info". Returns False if a subscriber was already installed.
#[pyfunction]
#[pyo3(signature = (filter=None))]
fn init_logging(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

/// Initialize the engine (call once at startup)
///
/// # Arguments
/// * `config` - Dict or settings object with `api_keys`, `model`, `base_url`,
///   `timeout_secs`, `credential_start`. Read from the environment when None.
/// * `transport` - Optional callable `(api_key, prompt) -> str` used instead
///   of the built-in Gemini client
///
/// Calling it again swaps the provider settings; existing characters are kept.
#[pyfunction]
#[pyo3(signature = (config=None, transport=None))]
fn init_engine(config: Option<&Bound<'_, PyAny>>, transport: Option<Py<PyAny>>) -> PyResult<()> {
    let config = match config {
        Some(obj) => deserialize_engine_config(obj)?,
        None => EngineConfig::from_env()?,
    };

    let transport: Arc<dyn Transport> = match transport {
        Some(callable) => Arc::new(PyCallableTransport::new(callable)),
        None => Arc::new(GeminiTransport::new(
            &config.base_url,
            &config.model,
            config.timeout_secs,
        )),
    };

    // If already initialized, keep the store and replace the rest
    if let Some(existing) = CACHED_ENGINE.get() {
        let mut guard = existing.write();
        let store = guard.engine.store().clone();
        guard.engine = Arc::new(build_engine(&config, transport, store));
        guard.config = config;
    } else {
        let store: Arc<dyn LifeStore> = Arc::new(MemoryStore::new());
        let engine = Arc::new(build_engine(&config, transport, store));
        let _ = CACHED_ENGINE.set(Arc::new(RwLock::new(CachedEngine { engine, config })));
    }

    tracing::info!("engine initialized");
    Ok(())
}

/// Check if the engine is initialized
#[pyfunction]
fn is_engine_initialized() -> bool {
    CACHED_ENGINE.get().is_some()
}

/// Model name of the cached engine
#[pyfunction]
fn engine_model() -> PyResult<String> {
    let cached = CACHED_ENGINE.get().ok_or(LifeSimError::EngineNotInitialized)?;
    let model = cached.read().config.model.clone();
    Ok(model)
}

/// Every perk a character can be given
#[pyfunction]
fn all_perks() -> Vec<&'static str> {
    ALL_PERKS.to_vec()
}

/// Distinct perks to offer on the creation screen
#[pyfunction]
#[pyo3(signature = (count=DEFAULT_PERK_OFFER))]
fn sample_perks(count: usize) -> Vec<String> {
    config::sample_perks(&mut rand::thread_rng(), count)
}

/// Create a character and generate its first five years
///
/// The character is deleted again if any bootstrap step fails; the report
/// carries the failure message.
///
/// # Raises
/// RuntimeError if `init_engine` was not called first
#[pyfunction]
fn create_character(
    py: Python<'_>,
    player_id: PlayerId,
    name: String,
    gender: String,
    perks: Vec<String>,
) -> PyResult<StartReport> {
    let engine = cached_engine()?;
    let new = NewCharacter::new(player_id, &name, &gender, perks);
    let outcome = py.detach(move || engine.start_life(new))?;
    Ok(StartReport::new(outcome))
}

/// Async `create_character`; provider calls run on a blocking thread
///
/// # Example (Python)
/// ```python
/// report = await create_character_async(1, "Ada", "female", ["Quick Wit"])
/// print(report.success, report.message)
/// ```
#[pyfunction]
fn create_character_async<'py>(
    py: Python<'py>,
    player_id: PlayerId,
    name: String,
    gender: String,
    perks: Vec<String>,
) -> PyResult<Bound<'py, PyAny>> {
    // Get cached engine before entering async context
    let engine = cached_engine()?;
    let new = NewCharacter::new(player_id, &name, &gender, perks);

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let outcome = tokio::task::spawn_blocking(move || engine.start_life(new))
            .await
            .map_err(join_error)??;
        Ok(StartReport::new(outcome))
    })
}

/// Advance one of the player's characters by a year
///
/// # Arguments
/// * `choices` - Options the player picked, passed to the provider as given
///
/// # Raises
/// PermissionError if the character belongs to another player, KeyError if it
/// does not exist, ValueError if it is no longer alive
#[pyfunction]
fn advance_year(
    py: Python<'_>,
    player_id: PlayerId,
    character_id: CharacterId,
    choices: Vec<String>,
) -> PyResult<TurnReport> {
    let engine = cached_engine()?;
    let outcome = py.detach(move || {
        engine.owned_character(player_id, character_id)?;
        engine.advance_year(character_id, &choices)
    })?;
    Ok(TurnReport::new(outcome))
}

/// Async `advance_year`
#[pyfunction]
fn advance_year_async<'py>(
    py: Python<'py>,
    player_id: PlayerId,
    character_id: CharacterId,
    choices: Vec<String>,
) -> PyResult<Bound<'py, PyAny>> {
    let engine = cached_engine()?;

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let outcome = tokio::task::spawn_blocking(move || {
            engine.owned_character(player_id, character_id)?;
            engine.advance_year(character_id, &choices)
        })
        .await
        .map_err(join_error)??;
        Ok(TurnReport::new(outcome))
    })
}

/// End a living character's story by the player's choice
#[pyfunction]
fn end_life(py: Python<'_>, player_id: PlayerId, character_id: CharacterId) -> PyResult<LifeView> {
    let engine = cached_engine()?;
    let record = py.detach(move || {
        engine.owned_character(player_id, character_id)?;
        engine.end_life(character_id)?;
        LifeRecord::load(engine.store().as_ref(), character_id)
    })?;
    Ok(LifeView::new(record))
}

/// Read one of the player's characters
#[pyfunction]
fn get_life(player_id: PlayerId, character_id: CharacterId) -> PyResult<LifeView> {
    let engine = cached_engine()?;
    engine.owned_character(player_id, character_id)?;
    let record = LifeRecord::load(engine.store().as_ref(), character_id)?;
    Ok(LifeView::new(record))
}

/// The player's characters as `{"active": [...], "completed": [...]}`
#[pyfunction]
fn dashboard(py: Python<'_>, player_id: PlayerId) -> PyResult<Py<PyAny>> {
    let engine = cached_engine()?;
    let board = view::dashboard(engine.store().as_ref(), player_id);

    let active = PyList::empty(py);
    for character in &board.active {
        active.append(character_to_dict(py, character)?)?;
    }
    let completed = PyList::empty(py);
    for character in &board.completed {
        completed.append(character_to_dict(py, character)?)?;
    }

    let dict = PyDict::new(py);
    dict.set_item("active", active)?;
    dict.set_item("completed", completed)?;
    Ok(dict.into_any().unbind())
}

/// Finished lives of all players, best score first
#[pyfunction]
fn leaderboard(py: Python<'_>) -> PyResult<Py<PyAny>> {
    let engine = cached_engine()?;
    let list = PyList::empty(py);
    for entry in view::leaderboard(engine.store().as_ref()) {
        let dict = PyDict::new(py);
        dict.set_item("player_id", entry.player_id)?;
        dict.set_item("character_id", entry.character_id)?;
        dict.set_item("character_name", &entry.name)?;
        dict.set_item("age", entry.age)?;
        dict.set_item("score", entry.score)?;
        list.append(dict)?;
    }
    Ok(list.into_any().unbind())
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn life_sim_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_function(wrap_pyfunction!(init_engine, m)?)?;
    m.add_function(wrap_pyfunction!(is_engine_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(engine_model, m)?)?;
    m.add_function(wrap_pyfunction!(all_perks, m)?)?;
    m.add_function(wrap_pyfunction!(sample_perks, m)?)?;
    m.add_function(wrap_pyfunction!(create_character, m)?)?;
    m.add_function(wrap_pyfunction!(create_character_async, m)?)?;
    m.add_function(wrap_pyfunction!(advance_year, m)?)?;
    m.add_function(wrap_pyfunction!(advance_year_async, m)?)?;
    m.add_function(wrap_pyfunction!(end_life, m)?)?;
    m.add_function(wrap_pyfunction!(get_life, m)?)?;
    m.add_function(wrap_pyfunction!(dashboard, m)?)?;
    m.add_function(wrap_pyfunction!(leaderboard, m)?)?;
    m.add_class::<LifeView>()?;
    m.add_class::<StartReport>()?;
    m.add_class::<TurnReport>()?;
    Ok(())
}
