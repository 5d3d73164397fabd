//! Assistant subprocess client - runs the assistant CLI in print mode

use crate::agent::{AgentClientConfig, AgentError};
use crate::core::CancelSignal;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Spawns the assistant once per prompt and captures its stdout
#[derive(Debug, Clone)]
pub struct SubprocessClient {
    config: AgentClientConfig,
}

impl SubprocessClient {
    pub fn new(config: AgentClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgentClientConfig {
        &self.config
    }

    /// Run `<program> <args..> <prompt>` and return its stdout
    ///
    /// # Errors
    /// Returns `AgentError` if:
    /// - the program cannot be spawned
    /// - it exits with a non-zero status
    /// - stdout is not valid UTF-8
    /// - the configured timeout elapses
    /// - `cancel` fires first
    ///
    /// The child is killed whenever the call does not run to completion.
    pub async fn execute(&self, prompt: &str, cancel: &CancelSignal) -> Result<String, AgentError> {
        debug!(
            "Spawning {} with prompt length: {}",
            self.config.program,
            prompt.len()
        );

        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let mut command = Command::new(&self.config.program);
        command.args(&self.config.args).arg(prompt).kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let run = command.output();
        let limit = self.config.timeout_secs;

        let result = tokio::select! {
            result = run_with_timeout(run, limit) => result?,
            _ = cancel.cancelled() => {
                warn!("Cancelled {} while it was running", self.config.program);
                return Err(AgentError::Cancelled);
            }
        };

        let output = result.map_err(|source| AgentError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", self.config.program, code, stderr);
            return Err(AgentError::Exit { code, stderr });
        }

        let content = String::from_utf8(output.stdout)
            .map_err(|e| AgentError::Decode(e.to_string()))?;

        debug!("{} returned {} bytes of output", self.config.program, content.len());
        Ok(content)
    }
}

async fn run_with_timeout<F, T>(future: F, limit_secs: u64) -> Result<T, AgentError>
where
    F: std::future::Future<Output = T>,
{
    if limit_secs == 0 {
        return Ok(future.await);
    }
    tokio::time::timeout(Duration::from_secs(limit_secs), future)
        .await
        .map_err(|_| AgentError::Timeout(limit_secs))
}
