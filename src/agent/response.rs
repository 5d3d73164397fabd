//! Assistant response and error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for assistant invocations
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Failed to start assistant '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Assistant exited with code {code}: {stderr}")]
    Exit { code: i32, stderr: String },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Assistant call was cancelled")]
    Cancelled,

    #[error("Failed to decode assistant output: {0}")]
    Decode(String),

    #[error("Malformed assistant output: {0}")]
    MalformedOutput(String),
}

/// Output of a completed assistant call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Captured stdout
    pub content: String,

    /// Wall-clock time of the call in milliseconds
    pub elapsed_ms: u64,
}

impl AgentResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            elapsed_ms: 0,
        }
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
