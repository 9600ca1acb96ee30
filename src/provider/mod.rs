//! Content provider client
//!
//! The client owns the credential pool and the rotation counter; a
//! [`Transport`] owns the wire. One `generate` call is exactly one transport
//! attempt: no retry, no backoff. Every failure collapses into
//! [`ProviderError`], which the pipeline treats as "no result".

mod gemini;
mod python;
mod request;
mod scripted;

pub use gemini::*;
pub use python::*;
pub use request::*;
pub use scripted::*;

use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Why a provider call produced no result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no provider credentials configured")]
    NoCredentials,

    #[error("provider transport failed: {0}")]
    Transport(String),

    #[error("provider returned malformed content: {0}")]
    Malformed(String),
}

/// Sends one serialized request with one credential
pub trait Transport: Send + Sync {
    /// Returns the provider's raw reply text
    fn send(&self, credential: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Client that rotates credentials across calls
///
/// Call `n` (counting from zero) uses `credentials[(start + n) % len]`. The
/// counter advances for every call that selects a credential, whether or not
/// the call then succeeds.
pub struct ProviderClient {
    credentials: Vec<String>,
    counter: AtomicUsize,
    transport: Arc<dyn Transport>,
}

impl ProviderClient {
    /// Blank credentials are dropped; an empty pool fails every call.
    pub fn new<I, S>(credentials: I, transport: Arc<dyn Transport>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials = credentials
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self {
            credentials,
            counter: AtomicUsize::new(0),
            transport,
        }
    }

    /// Start the rotation at a given position instead of zero
    pub fn with_start_index(self, start: usize) -> Self {
        self.counter.store(start, Ordering::Relaxed);
        self
    }

    #[inline]
    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Rotation counter value (start index plus calls that selected a credential)
    #[inline]
    pub fn rotation_counter(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }

    fn next_credential(&self) -> Option<(usize, &str)> {
        if self.credentials.is_empty() {
            return None;
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let index = n % self.credentials.len();
        Some((index, self.credentials[index].as_str()))
    }

    /// Send a request and parse the reply as JSON
    pub fn generate(&self, request: &RequestSpec) -> Result<Value, ProviderError> {
        let (index, credential) = self.next_credential().ok_or(ProviderError::NoCredentials)?;

        let prompt = serde_json::to_string(request)
            .map_err(|e| ProviderError::Malformed(format!("request encoding: {}", e)))?;

        tracing::debug!(
            task = request.task.as_str(),
            credential_index = index,
            prompt_bytes = prompt.len(),
            "provider request"
        );

        let text = self.transport.send(credential, &prompt)?;
        let value = parse_reply(&text)?;

        tracing::debug!(
            task = request.task.as_str(),
            credential_index = index,
            "provider reply parsed"
        );
        Ok(value)
    }
}

/// Parse reply text, treating empty documents (`{}`, `[]`, `null`, `false`,
/// `0`, `""`) as no result
fn parse_reply(text: &str) -> Result<Value, ProviderError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    if is_empty_document(&value) {
        return Err(ProviderError::Malformed("empty result".to_string()));
    }
    Ok(value)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
