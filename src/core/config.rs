//! Application configuration from YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// How to reach the external assistant
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// How the `validate` step brings the application up
    #[serde(default)]
    pub validate: ValidateConfig,
}

/// External assistant process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Executable to spawn
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the prompt
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Per-invocation timeout in seconds; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Working directory for the assistant (defaults to the current one)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_program() -> String {
    "claude".to_string()
}

fn default_args() -> Vec<String> {
    vec!["--print".to_string()]
}

fn default_timeout_secs() -> u64 {
    // 3h
    10_800
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
            working_dir: None,
        }
    }
}

/// Application start-up for the validation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateConfig {
    /// Shell command that launches the application in the background.
    /// Without one the application is expected to be running already.
    #[serde(default)]
    pub start_command: Option<String>,

    /// How often to ask the assistant whether the application is up
    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,

    /// Pause between readiness checks, in seconds
    #[serde(default = "default_readiness_interval_secs")]
    pub readiness_interval_secs: u64,
}

fn default_readiness_attempts() -> u32 {
    6
}

fn default_readiness_interval_secs() -> u64 {
    3
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            start_command: None,
            readiness_attempts: default_readiness_attempts(),
            readiness_interval_secs: default_readiness_interval_secs(),
        }
    }
}

impl ValidateConfig {
    pub fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.start_command = Some(command.into());
        self
    }

    pub fn with_readiness(mut self, attempts: u32, interval_secs: u64) -> Self {
        self.readiness_attempts = attempts;
        self.readiness_interval_secs = interval_secs;
        self
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one the user config file is used
    /// when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/ticket-pipeline/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ticket-pipeline").join("config.yaml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.assistant.program.trim().is_empty() {
            anyhow::bail!("assistant.program must not be empty");
        }
        if let Some(dir) = &self.assistant.working_dir {
            if !dir.is_dir() {
                anyhow::bail!("assistant.working_dir '{}' is not a directory", dir.display());
            }
        }
        if let Some(command) = &self.validate.start_command {
            if command.trim().is_empty() {
                anyhow::bail!("validate.start_command must not be empty when set");
            }
        }
        if self.validate.readiness_attempts == 0 {
            anyhow::bail!("validate.readiness_attempts must be at least 1");
        }
        Ok(())
    }
}
