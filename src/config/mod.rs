//! Engine configuration
//!
//! Settings come from a Python dict (or any object exposing the same
//! attributes) handed to `init_engine`, or from environment variables when no
//! dict is given.

mod perks;

pub use perks::*;

use crate::error::{LifeSimError, Result};
use crate::provider::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT_SECS};
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods};
use pyo3::Bound;
use serde::Deserialize;

pub const ENV_API_KEYS: &str = "GEMINI_API_KEYS";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "GEMINI_TIMEOUT_SECS";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Provider credentials, used in rotation
    #[serde(default)]
    pub api_keys: Vec<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound on a single provider call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Rotation position of the first call
    #[serde(default)]
    pub credential_start: usize,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            credential_start: 0,
        }
    }
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

impl EngineConfig {
    /// Build from a variable lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_API_KEYS) {
            config.api_keys = parse_key_list(&raw);
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                LifeSimError::Config(format!("{} must be a whole number of seconds: {}", ENV_TIMEOUT_SECS, raw))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| LifeSimError::Config(format!("invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(LifeSimError::Config("timeout_secs must be positive".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LifeSimError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }

    /// True when at least one usable credential is configured
    pub fn has_credentials(&self) -> bool {
        self.api_keys.iter().any(|k| !k.trim().is_empty())
    }
}

/// Helper to get optional attribute from either dict or object
fn get_attr_opt<'py>(obj: &Bound<'py, pyo3::PyAny>, name: &str) -> Option<Bound<'py, pyo3::PyAny>> {
    let value = if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    };
    value.filter(|v| !v.is_none())
}

/// Deserialize engine config from a Python dict or settings object
///
/// `api_keys` may be a list of strings or a single comma-separated string.
pub fn deserialize_engine_config(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<EngineConfig> {
    let mut config = EngineConfig::default();

    if let Some(keys) = get_attr_opt(obj, "api_keys") {
        config.api_keys = if let Ok(raw) = keys.extract::<String>() {
            parse_key_list(&raw)
        } else {
            keys.extract::<Vec<String>>()?
        };
    }
    if let Some(model) = get_attr_opt(obj, "model") {
        config.model = model.extract()?;
    }
    if let Some(url) = get_attr_opt(obj, "base_url") {
        config.base_url = url.extract()?;
    }
    if let Some(timeout) = get_attr_opt(obj, "timeout_secs") {
        config.timeout_secs = timeout.extract()?;
    }
    if let Some(start) = get_attr_opt(obj, "credential_start") {
        config.credential_start = start.extract()?;
    }

    config.validate()?;
    Ok(config)
}
