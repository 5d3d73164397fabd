//! Step and pipeline results

use crate::core::classification::Classification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a single step invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step identifier
    pub step_id: String,

    /// Display name of the step
    pub step_name: String,

    /// Whether the step completed its work
    pub success: bool,

    /// Failure reason, if any
    pub error: Option<String>,

    /// Task identifiers produced by the step
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl StepResult {
    pub fn ok(step_id: impl Into<String>, step_name: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            step_name: step_name.into(),
            success: true,
            error: None,
            tasks: Vec::new(),
        }
    }

    pub fn failed(
        step_id: impl Into<String>,
        step_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            step_name: step_name.into(),
            success: false,
            error: Some(error.into()),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<String>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Terminal state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Dry run: order resolved, nothing executed
    Planned,
    /// Every executed step succeeded
    Succeeded,
    /// A step failed or faulted
    Failed,
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Planned => write!(f, "Planned"),
            PipelineStatus::Succeeded => write!(f, "Succeeded"),
            PipelineStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Aggregated outcome of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Unique id of this run
    pub run_id: Uuid,

    /// False as soon as any executed step failed
    pub success: bool,

    pub status: PipelineStatus,

    /// Results in execution order, up to and including the first failure
    pub step_results: Vec<StepResult>,

    /// Classification the run was planned from
    pub classification: Classification,

    /// Resolved, dependency-ordered step ids
    pub execution_order: Vec<String>,

    /// Registered steps that were not requested
    pub skipped_steps: Vec<String>,

    /// Top-level failure reason
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl PipelineResult {
    fn new(status: PipelineStatus, classification: Classification, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            success: status != PipelineStatus::Failed,
            status,
            step_results: Vec::new(),
            classification,
            execution_order: Vec::new(),
            skipped_steps: Vec::new(),
            error: None,
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// Every executed step succeeded
    pub fn ok(
        step_results: Vec<StepResult>,
        classification: Classification,
        skipped_steps: Vec<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step_results,
            skipped_steps,
            ..Self::new(PipelineStatus::Succeeded, classification, started_at)
        }
    }

    /// Stopped at the first failing step
    pub fn failed(
        error: impl Into<String>,
        step_results: Vec<StepResult>,
        classification: Classification,
        skipped_steps: Vec<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step_results,
            skipped_steps,
            error: Some(error.into()),
            ..Self::new(PipelineStatus::Failed, classification, started_at)
        }
    }

    /// Dry-run outcome; never carries step results
    pub fn planned(
        classification: Classification,
        skipped_steps: Vec<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            skipped_steps,
            ..Self::new(PipelineStatus::Planned, classification, started_at)
        }
    }

    pub fn with_execution_order(mut self, order: Vec<String>) -> Self {
        self.execution_order = order;
        self
    }

    /// The step that stopped the run, if any
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.step_results.iter().find(|r| !r.success)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}
