//! Built-in steps
//!
//! Every built-in step hands a prompt to the assistant. An assistant error is
//! reported as an explicit failed [`StepResult`], never as a fault.

pub mod implement;
pub mod prompts;
pub mod validate;

use crate::{
    agent::AgentExecutor,
    core::{config::ValidateConfig, CancelSignal, ExecutableStep, LayerScope, StepContext, StepResult},
    execution::StepRegistry,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use implement::{FastImplementStep, ImplementStep};
pub use validate::{ValidateStep, ValidationReport};

/// Metadata key under which a step stores the assistant's raw output
pub fn output_key(step_id: &str) -> String {
    format!("{}.output", step_id)
}

/// A step that sends one prompt to the assistant and keeps the answer
pub struct AgentStep {
    id: String,
    name: String,
    layers: LayerScope,
    dependencies: Vec<String>,
    prompt: fn(&StepContext) -> String,
    agent: Arc<dyn AgentExecutor>,
}

impl AgentStep {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        layers: LayerScope,
        prompt: fn(&StepContext) -> String,
        agent: Arc<dyn AgentExecutor>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layers,
            dependencies: Vec::new(),
            prompt,
            agent,
        }
    }

    pub fn depends_on(mut self, step_id: impl Into<String>) -> Self {
        self.dependencies.push(step_id.into());
        self
    }
}

#[async_trait]
impl ExecutableStep for AgentStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn affected_layers(&self) -> LayerScope {
        self.layers
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    async fn execute(&self, ctx: &mut StepContext, cancel: &CancelSignal) -> anyhow::Result<StepResult> {
        let prompt = (self.prompt)(ctx);
        debug!("Prompt for step {}: {}", self.id, prompt);

        match self.agent.execute(&prompt, cancel).await {
            Ok(response) => {
                info!("Step {} finished in {} ms", self.id, response.elapsed_ms);
                ctx.set_metadata(output_key(&self.id), response.content);
                Ok(StepResult::ok(&self.id, &self.name))
            }
            Err(e) => {
                warn!("Assistant failed in step {}: {}", self.id, e);
                Ok(StepResult::failed(&self.id, &self.name, e.to_string()))
            }
        }
    }
}

pub fn data_analysis(agent: Arc<dyn AgentExecutor>) -> AgentStep {
    AgentStep::new(
        "data-analysis",
        "Data/Entities analysis",
        LayerScope::DATA,
        prompts::data_analysis,
        agent,
    )
}

pub fn api_analysis(agent: Arc<dyn AgentExecutor>) -> AgentStep {
    AgentStep::new(
        "api-analysis",
        "API/Endpoints analysis",
        LayerScope::API,
        prompts::api_analysis,
        agent,
    )
    .depends_on("data-analysis")
}

pub fn frontend_analysis(agent: Arc<dyn AgentExecutor>) -> AgentStep {
    AgentStep::new(
        "frontend-analysis",
        "Frontend analysis",
        LayerScope::FRONTEND,
        prompts::frontend_analysis,
        agent,
    )
    .depends_on("api-analysis")
}

pub fn project_structure(agent: Arc<dyn AgentExecutor>) -> AgentStep {
    AgentStep::new(
        "project-structure",
        "Project structure analysis",
        LayerScope::INFRASTRUCTURE,
        prompts::project_structure,
        agent,
    )
}

pub fn skill_mapping(agent: Arc<dyn AgentExecutor>) -> AgentStep {
    AgentStep::new(
        "skill-mapping",
        "Skill mapping",
        LayerScope::all(),
        prompts::skill_mapping,
        agent,
    )
}

/// Registry holding every built-in step, all sharing one assistant
pub fn builtin_registry(agent: Arc<dyn AgentExecutor>) -> StepRegistry {
    builtin_registry_with(agent, ValidateConfig::default())
}

/// Like [`builtin_registry`], with application start-up settings for `validate`
pub fn builtin_registry_with(agent: Arc<dyn AgentExecutor>, validate: ValidateConfig) -> StepRegistry {
    StepRegistry::new()
        .with_step(Arc::new(data_analysis(agent.clone())))
        .with_step(Arc::new(api_analysis(agent.clone())))
        .with_step(Arc::new(frontend_analysis(agent.clone())))
        .with_step(Arc::new(project_structure(agent.clone())))
        .with_step(Arc::new(skill_mapping(agent.clone())))
        .with_step(Arc::new(ImplementStep::new(agent.clone())))
        .with_step(Arc::new(FastImplementStep::new(agent.clone())))
        .with_step(Arc::new(ValidateStep::with_config(agent, validate)))
}
