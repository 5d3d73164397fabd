//! External assistant client for executing prompts

pub mod client;
pub mod json;
pub mod response;
pub mod subprocess_client;


use crate::core::CancelSignal;
use async_trait::async_trait;
use std::time::Instant;

pub use client::AgentClientConfig;
pub use json::{extract_json, parse_json_envelope};
pub use response::{AgentError, AgentResponse};
pub use subprocess_client::SubprocessClient;

/// Trait for assistant execution - allows for different implementations
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Send a prompt and wait for the complete response
    async fn execute(&self, prompt: &str, cancel: &CancelSignal) -> Result<AgentResponse, AgentError>;
}

/// Assistant client that runs the configured CLI as a subprocess
#[derive(Debug, Clone)]
pub struct AssistantClient {
    subprocess_client: SubprocessClient,
}

impl AssistantClient {
    pub fn new(config: AgentClientConfig) -> Self {
        Self {
            subprocess_client: SubprocessClient::new(config),
        }
    }

    pub fn program(&self) -> &str {
        &self.subprocess_client.config().program
    }
}

#[async_trait]
impl AgentExecutor for AssistantClient {
    async fn execute(&self, prompt: &str, cancel: &CancelSignal) -> Result<AgentResponse, AgentError> {
        let started = Instant::now();
        let content = self.subprocess_client.execute(prompt, cancel).await?;

        Ok(AgentResponse::new(content).with_elapsed_ms(started.elapsed().as_millis() as u64))
    }
}
