//! Implementation steps

use crate::{
    agent::AgentExecutor,
    core::{CancelSignal, ExecutableStep, LayerScope, StepContext, StepResult},
    steps::{output_key, prompts},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Implements every task of the ticket in one assistant call, then seeds
/// data when a task touches the data layer
pub struct ImplementStep {
    agent: Arc<dyn AgentExecutor>,
}

impl ImplementStep {
    pub const ID: &'static str = "implement";
    const NAME: &'static str = "Implementation";

    pub fn new(agent: Arc<dyn AgentExecutor>) -> Self {
        Self { agent }
    }

    async fn seed(&self, ctx: &StepContext, cancel: &CancelSignal) {
        let data_tasks = ctx.tasks.iter().filter(|t| prompts::is_data_task(t)).count();
        if data_tasks == 0 {
            return;
        }

        info!("Creating seed data for {} data task(s)", data_tasks);
        if let Err(e) = self.agent.execute(&prompts::seeding(ctx), cancel).await {
            warn!("Seeding follow-up failed: {}", e);
        }
    }
}

#[async_trait]
impl ExecutableStep for ImplementStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        Self::NAME
    }

    fn affected_layers(&self) -> LayerScope {
        LayerScope::all()
    }

    async fn execute(&self, ctx: &mut StepContext, cancel: &CancelSignal) -> anyhow::Result<StepResult> {
        if ctx.tasks.is_empty() {
            warn!("No tasks to implement");
            return Ok(StepResult::ok(Self::ID, Self::NAME));
        }

        info!("Implementing {} task(s)", ctx.tasks.len());
        let prompt = prompts::implement_all(ctx);
        debug!("Implement prompt: {}", prompt);

        let response = match self.agent.execute(&prompt, cancel).await {
            Ok(response) => response,
            Err(e) => return Ok(StepResult::failed(Self::ID, Self::NAME, e.to_string())),
        };
        ctx.set_metadata(output_key(Self::ID), response.content);

        self.seed(ctx, cancel).await;

        Ok(StepResult::ok(Self::ID, Self::NAME).with_tasks(ctx.tasks.clone()))
    }
}

/// Implements the whole ticket in a single assistant session
pub struct FastImplementStep {
    agent: Arc<dyn AgentExecutor>,
}

impl FastImplementStep {
    pub const ID: &'static str = "fast-implement";
    const NAME: &'static str = "Fast implementation";

    pub fn new(agent: Arc<dyn AgentExecutor>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl ExecutableStep for FastImplementStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn display_name(&self) -> &str {
        Self::NAME
    }

    fn affected_layers(&self) -> LayerScope {
        LayerScope::all()
    }

    async fn execute(&self, ctx: &mut StepContext, cancel: &CancelSignal) -> anyhow::Result<StepResult> {
        if ctx.tasks.is_empty() {
            warn!("No tasks to implement");
            return Ok(StepResult::ok(Self::ID, Self::NAME));
        }

        info!("Implementing {} task(s) in one pass", ctx.tasks.len());
        let response = match self.agent.execute(&prompts::fast_implement(ctx), cancel).await {
            Ok(response) => response,
            Err(e) => return Ok(StepResult::failed(Self::ID, Self::NAME, e.to_string())),
        };
        ctx.set_metadata(output_key(Self::ID), response.content);

        let scope = ctx
            .classification
            .as_ref()
            .map(|c| c.scope)
            .unwrap_or_else(LayerScope::all);
        if scope.affects(LayerScope::FRONTEND) {
            info!("Frontend changes are not validated automatically; start the app and check them manually");
        }

        Ok(StepResult::ok(Self::ID, Self::NAME).with_tasks(ctx.tasks.clone()))
    }
}
