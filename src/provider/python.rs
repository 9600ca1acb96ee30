//! Transport that hands requests to a Python callable
//!
//! Lets the host keep its own provider SDK: the callable receives
//! `(api_key, prompt)` and returns the reply text.

use pyo3::prelude::*;

use super::{ProviderError, Transport};

pub struct PyCallableTransport {
    callable: Py<PyAny>,
}

impl PyCallableTransport {
    pub fn new(callable: Py<PyAny>) -> Self {
        Self { callable }
    }
}

impl Transport for PyCallableTransport {
    fn send(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        Python::attach(|py| {
            let reply = self
                .callable
                .bind(py)
                .call1((credential, prompt))
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
            reply
                .extract::<String>()
                .map_err(|e| ProviderError::Malformed(format!("callable did not return str: {}", e)))
        })
    }
}
