//! Assistant client configuration

use crate::core::config::AssistantConfig;
use std::path::PathBuf;

/// How to launch the assistant process
#[derive(Debug, Clone, PartialEq)]
pub struct AgentClientConfig {
    /// Executable to spawn, looked up on PATH when not absolute
    pub program: String,

    /// Arguments placed before the prompt
    pub args: Vec<String>,

    /// Timeout per call in seconds; 0 means no timeout
    pub timeout_secs: u64,

    /// Working directory for the child process
    pub working_dir: Option<PathBuf>,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        AssistantConfig::default().into()
    }
}

impl From<AssistantConfig> for AgentClientConfig {
    fn from(config: AssistantConfig) -> Self {
        Self {
            program: config.program,
            args: config.args,
            timeout_secs: config.timeout_secs,
            working_dir: config.working_dir,
        }
    }
}

impl AgentClientConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}
