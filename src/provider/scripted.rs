//! Scripted transport for tests, benchmarks, and offline hosts

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

use super::{ProviderError, Transport};

/// What the scripted transport answers with next
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Failure(String),
}

/// A call the scripted transport received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub credential: String,
    pub prompt: String,
}

/// Transport that replays queued replies in order and records every call
///
/// Once the queue is empty every call fails, like an unreachable provider.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.replies.lock().push_back(ScriptedReply::Text(text.into()));
    }

    pub fn push_json(&self, value: Value) {
        self.push_text(value.to_string());
    }

    pub fn push_failure(&self) {
        self.replies
            .lock()
            .push_back(ScriptedReply::Failure("scripted failure".to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Replies still queued
    pub fn pending(&self) -> usize {
        self.replies.lock().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        self.calls.lock().push(RecordedCall {
            credential: credential.to_string(),
            prompt: prompt.to_string(),
        });
        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Failure(msg)) => Err(ProviderError::Transport(msg)),
            None => Err(ProviderError::Transport("script exhausted".to_string())),
        }
    }
}
