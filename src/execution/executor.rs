//! Pipeline executor - runs the planned steps in dependency order

use crate::{
    core::{
        CancelSignal, Classification, ExecutableStep, PipelineResult, StepContext, StepResult,
    },
    execution::{
        events::{ExecutionPlan, PipelineObserver},
        registry::{RegistryError, StepRegistry},
    },
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Plans and runs steps from a classification
///
/// Steps run strictly one after another and the first failure stops the run.
/// The executor never cancels or times out on its own; callers that need a
/// deadline put one on the [`CancelSignal`].
pub struct PipelineExecutor {
    registry: Arc<StepRegistry>,
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl PipelineExecutor {
    pub fn new(registry: Arc<StepRegistry>) -> Self {
        Self {
            registry,
            observers: Vec::new(),
        }
    }

    /// Add an observer; observers are notified in the order they were added
    pub fn add_observer(&mut self, observer: Arc<dyn PipelineObserver>) {
        self.observers.push(observer);
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn notify(&self, event: impl Fn(&dyn PipelineObserver)) {
        for observer in &self.observers {
            event(observer.as_ref());
        }
    }

    /// Resolve the plan for a classification without running anything
    pub fn plan(
        &self,
        classification: &Classification,
    ) -> Result<(ExecutionPlan, Vec<Arc<dyn ExecutableStep>>), RegistryError> {
        let requested = classification.ordered_step_ids();
        let steps = self.registry.build_execution_order(&requested)?;
        let skipped = self.registry.unrequested_step_ids(&requested);

        let plan = ExecutionPlan {
            requested,
            steps: steps.iter().map(|s| s.id().to_string()).collect(),
            skipped,
        };
        Ok((plan, steps))
    }

    /// Run the classification's steps against `ctx`
    ///
    /// Only a dependency cycle is returned as `Err`; every step failure ends
    /// up in a failed [`PipelineResult`] carrying the results gathered so far.
    pub async fn execute(
        &self,
        classification: &Classification,
        ctx: &mut StepContext,
        cancel: &CancelSignal,
    ) -> Result<PipelineResult, RegistryError> {
        let started_at = Utc::now();
        let (plan, steps) = self.plan(classification)?;

        info!("Execution order: {}", plan.steps.join(" -> "));
        if !plan.skipped.is_empty() {
            info!("Skipped steps: {}", plan.skipped.join(", "));
        }
        self.notify(|o| o.on_plan_computed(&plan));

        if ctx.classification.is_none() {
            ctx.classification = Some(classification.clone());
        }
        ctx.skipped_steps.extend(plan.skipped.iter().cloned());

        let total = steps.len();
        let mut results: Vec<StepResult> = Vec::with_capacity(total);

        for (i, step) in steps.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Pipeline cancelled before step '{}'", step.id());
                let result = PipelineResult::failed(
                    format!("Pipeline cancelled before step '{}'", step.id()),
                    results,
                    classification.clone(),
                    plan.skipped,
                    started_at,
                )
                .with_execution_order(plan.steps);
                self.notify(|o| o.on_pipeline_finished(&result));
                return Ok(result);
            }

            ctx.current_step_index = i + 1;
            info!("[{}/{}] {}", i + 1, total, step.display_name());
            self.notify(|o| o.on_step_started(step.as_ref(), i + 1, total));

            let (result, error) = self.invoke(step.as_ref(), ctx, cancel).await;
            results.push(result);

            if let Some(error) = error {
                let result = PipelineResult::failed(
                    error,
                    results,
                    classification.clone(),
                    plan.skipped,
                    started_at,
                )
                .with_execution_order(plan.steps);
                self.notify(|o| o.on_pipeline_finished(&result));
                return Ok(result);
            }
        }

        info!("Pipeline completed: {} step(s) succeeded", results.len());
        let result = PipelineResult::ok(results, classification.clone(), plan.skipped, started_at)
            .with_execution_order(plan.steps);
        self.notify(|o| o.on_pipeline_finished(&result));
        Ok(result)
    }

    /// Resolve the order and skip list without invoking any step
    pub fn dry_run(&self, classification: &Classification) -> Result<PipelineResult, RegistryError> {
        let started_at = Utc::now();
        let (plan, _) = self.plan(classification)?;

        debug!("Dry run plan: {}", plan.steps.join(" -> "));
        self.notify(|o| o.on_plan_computed(&plan));

        let result = PipelineResult::planned(classification.clone(), plan.skipped, started_at)
            .with_execution_order(plan.steps);
        self.notify(|o| o.on_pipeline_finished(&result));
        Ok(result)
    }

    /// Run one registered step directly, outside any plan
    ///
    /// Returns `None` when no step is registered under `step_id`.
    pub async fn execute_step(
        &self,
        step_id: &str,
        ctx: &mut StepContext,
        cancel: &CancelSignal,
    ) -> Option<StepResult> {
        let step = self.registry.get_step(step_id)?;

        ctx.current_step_index = 1;
        self.notify(|o| o.on_step_started(step.as_ref(), 1, 1));
        let (result, _) = self.invoke(step.as_ref(), ctx, cancel).await;
        Some(result)
    }

    /// Invoke a step and map both failure channels to a failed result plus
    /// the top-level error message
    async fn invoke(
        &self,
        step: &dyn ExecutableStep,
        ctx: &mut StepContext,
        cancel: &CancelSignal,
    ) -> (StepResult, Option<String>) {
        match step.execute(ctx, cancel).await {
            Ok(result) if result.success => {
                self.notify(|o| o.on_step_succeeded(step, &result));
                (result, None)
            }
            Ok(result) => {
                let reason = result
                    .error
                    .as_deref()
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or("no error message");
                let message = format!("Step '{}' failed: {}", step.id(), reason);
                warn!("{}", message);
                self.notify(|o| o.on_step_failed(step, &result));
                (result, Some(message))
            }
            Err(fault) => {
                let mut message = format!("{:#}", fault);
                if message.trim().is_empty() {
                    message = format!("Step '{}' raised an error", step.id());
                }
                error!("Step '{}' raised an error: {}", step.id(), message);
                let result = StepResult::failed(step.id(), step.display_name(), message.clone());
                self.notify(|o| o.on_step_failed(step, &result));
                (result, Some(message))
            }
        }
    }
}
