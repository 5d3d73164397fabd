//! Observer interface for pipeline progress
//!
//! The executor reports what it does through [`PipelineObserver`] instead of
//! printing; rendering is left to whoever registers an observer.

use crate::core::{normalize_step_id, ExecutableStep, PipelineResult, StepResult};
use std::collections::HashSet;

/// Resolved plan of a run, reported before any step executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Step ids requested by the classification, in declared order
    pub requested: Vec<String>,

    /// Dependency-ordered step ids that will run
    pub steps: Vec<String>,

    /// Registered step ids that were not requested
    pub skipped: Vec<String>,
}

impl ExecutionPlan {
    /// Steps that run only because something requested depends on them
    pub fn pulled_in(&self) -> Vec<&str> {
        let requested: HashSet<String> = self.requested.iter().map(|r| normalize_step_id(r)).collect();

        self.steps
            .iter()
            .filter(|id| !requested.contains(&normalize_step_id(id)))
            .map(String::as_str)
            .collect()
    }
}

/// Receives pipeline events synchronously, in the order they happen
///
/// Every method has a no-op default so observers implement only what they
/// render.
#[allow(unused_variables)]
pub trait PipelineObserver: Send + Sync {
    fn on_plan_computed(&self, plan: &ExecutionPlan) {}

    /// `index` is 1-based
    fn on_step_started(&self, step: &dyn ExecutableStep, index: usize, total: usize) {}

    fn on_step_succeeded(&self, step: &dyn ExecutableStep, result: &StepResult) {}

    fn on_step_failed(&self, step: &dyn ExecutableStep, result: &StepResult) {}

    fn on_pipeline_finished(&self, result: &PipelineResult) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
