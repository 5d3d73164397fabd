//! Validation step - starts the application and asks the assistant to check it

use crate::{
    agent::{parse_json_envelope, AgentError, AgentExecutor},
    core::{config::ValidateConfig, CancelSignal, ExecutableStep, LayerScope, StepContext, StepResult},
    steps::{output_key, prompts},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Report the assistant returns after validating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `success`, `failed` or `skipped`
    #[serde(default = "unknown_status")]
    pub status: String,

    /// Whether the expected changes were visible; absent when not checked
    #[serde(default)]
    pub changes_visible: Option<bool>,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub summary: String,
}

fn unknown_status() -> String {
    "unknown".to_string()
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Brings the application up when a start command is configured, waits for
/// it to report ready, then asks for a validation report
pub struct ValidateStep {
    agent: Arc<dyn AgentExecutor>,
    config: ValidateConfig,
}

impl ValidateStep {
    pub const ID: &'static str = "validate";
    const NAME: &'static str = "Validation";

    pub fn new(agent: Arc<dyn AgentExecutor>) -> Self {
        Self::with_config(agent, ValidateConfig::default())
    }

    pub fn with_config(agent: Arc<dyn AgentExecutor>, config: ValidateConfig) -> Self {
        Self { agent, config }
    }

    /// Run the start command to completion; it must return once the
    /// application is launching
    async fn start_app(&self, command: &str, cancel: &CancelSignal) -> Result<(), String> {
        info!("Starting application: {}", command);

        let mut start = shell_command(command);
        let output = tokio::select! {
            output = start.output() => {
                output.map_err(|e| format!("Failed to run start command '{}': {}", command, e))?
            }
            _ = cancel.cancelled() => return Err(AgentError::Cancelled.to_string()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(format!(
                "App could not be started (exit code {}): {}",
                output.status.code().unwrap_or(-1),
                stderr
            ));
        }
        Ok(())
    }

    async fn wait_until_ready(&self, cancel: &CancelSignal) -> Result<(), String> {
        let attempts = self.config.readiness_attempts.max(1);
        let interval = Duration::from_secs(self.config.readiness_interval_secs);

        for attempt in 1..=attempts {
            info!("Checking application status (attempt {}/{})", attempt, attempts);
            match self.agent.execute(&prompts::readiness_check(), cancel).await {
                Ok(response) if response.content.to_uppercase().contains("RUNNING") => {
                    info!("Application is ready");
                    return Ok(());
                }
                Ok(response) => debug!("Application not ready: {}", response.content.trim()),
                Err(AgentError::Cancelled) => return Err(AgentError::Cancelled.to_string()),
                Err(e) => warn!("Readiness check failed: {}", e),
            }

            if attempt < attempts {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel.cancelled() => return Err(AgentError::Cancelled.to_string()),
                }
            }
        }

        Err(format!("App not ready after {} attempts", attempts))
    }
}

fn shell_command(script: &str) -> Command {
    let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
    let mut command = Command::new(shell);
    command.arg(flag).arg(script).kill_on_drop(true);
    command
}

#[async_trait]
impl ExecutableStep for ValidateStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        Self::NAME
    }

    fn affected_layers(&self) -> LayerScope {
        LayerScope::FRONTEND
    }

    async fn execute(&self, ctx: &mut StepContext, cancel: &CancelSignal) -> anyhow::Result<StepResult> {
        if let Some(command) = &self.config.start_command {
            let started = match self.start_app(command, cancel).await {
                Ok(()) => self.wait_until_ready(cancel).await,
                Err(e) => Err(e),
            };
            if let Err(e) = started {
                warn!("{}", e);
                return Ok(StepResult::failed(Self::ID, Self::NAME, e));
            }
        }

        let output = match self.agent.execute(&prompts::validate(ctx), cancel).await {
            Ok(response) => response.content,
            Err(e) => return Ok(StepResult::failed(Self::ID, Self::NAME, e.to_string())),
        };

        let report: ValidationReport = match parse_json_envelope(&output) {
            Ok(report) => report,
            Err(e) => {
                warn!("Could not parse validation report: {}", e);
                ctx.set_metadata(output_key(Self::ID), output.clone());
                return Ok(StepResult::failed(Self::ID, Self::NAME, output));
            }
        };

        info!("Validation status: {}", report.status);
        for issue in &report.issues {
            warn!("Validation issue: {}", issue);
        }
        ctx.set_metadata(output_key(Self::ID), serde_json::to_value(&report)?);

        if report.is_success() {
            Ok(StepResult::ok(Self::ID, Self::NAME))
        } else {
            Ok(StepResult::failed(Self::ID, Self::NAME, report.summary))
        }
    }
}
