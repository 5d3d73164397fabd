//! Step capability contract

use crate::core::{
    cancel::CancelSignal,
    context::StepContext,
    result::StepResult,
    scope::LayerScope,
};
use async_trait::async_trait;

/// A named unit of work the pipeline can run
///
/// Implementations are registered once at startup and never mutated. The
/// executor hands every step the shared [`StepContext`] of the run so earlier
/// steps can leave data for later ones.
#[async_trait]
pub trait ExecutableStep: Send + Sync {
    /// Case-insensitive unique identifier (e.g. "api-analysis")
    fn id(&self) -> &str;

    /// Label used for reporting only
    fn display_name(&self) -> &str;

    /// Layers this step touches; informational
    fn affected_layers(&self) -> LayerScope;

    /// Ids of steps that must run, and succeed, before this one
    fn dependencies(&self) -> &[String] {
        &[]
    }

    /// Run the step
    ///
    /// An `Ok` result with `success == false` is an explicit failure. An
    /// `Err` is an unexpected fault; the executor turns it into a failed
    /// result. Either one stops the pipeline.
    async fn execute(
        &self,
        ctx: &mut StepContext,
        cancel: &CancelSignal,
    ) -> anyhow::Result<StepResult>;
}

/// Compare step ids the way the registry does
pub fn normalize_step_id(id: &str) -> String {
    id.trim().to_lowercase()
}
