//! Ticket classification
//!
//! Turns a ticket into a [`Classification`] by asking the assistant. Callers
//! that must always end up with a plan use [`classify_or_fallback`].

pub mod parse;

use crate::{
    agent::{AgentError, AgentExecutor},
    core::{CancelSignal, Classification, StepContext},
    execution::StepRegistry,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use parse::parse_classification;

/// Errors raised while classifying a ticket
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Assistant call failed: {0}")]
    Agent(#[from] AgentError),

    #[error("Could not parse classification: {0}")]
    Parse(String),
}

/// Produces a classification for the ticket in a context
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        ctx: &StepContext,
        cancel: &CancelSignal,
    ) -> Result<Classification, ClassifyError>;
}

/// Classifier backed by the external assistant
pub struct AgentClassifier {
    agent: Arc<dyn AgentExecutor>,
    /// (id, display name) of every step the assistant may pick from
    catalog: Vec<(String, String)>,
}

impl AgentClassifier {
    pub fn new(agent: Arc<dyn AgentExecutor>, registry: &StepRegistry) -> Self {
        let catalog = registry
            .all_steps()
            .iter()
            .map(|s| (s.id().to_string(), s.display_name().to_string()))
            .collect();
        Self { agent, catalog }
    }

    fn prompt(&self, ctx: &StepContext) -> String {
        let steps: String = self
            .catalog
            .iter()
            .map(|(id, name)| format!("- {}: {}\n", id, name))
            .collect();

        format!(
            "Analyse and classify the following ticket.\n\n{}\n\
             Load the full ticket first, read every sub-task and comment, then \
             decide which layers are affected.\n\n\
             Answer ONLY with this JSON, nothing before or after it:\n\n\
             ```json\n\
             {{\n  \
               \"type\": \"NewFeature|Enhancement|BugFix|Refactoring|Documentation|Configuration|DataMigration\",\n  \
               \"scope\": [\"Data\", \"Api\", \"Frontend\", \"Shared\", \"Infrastructure\"],\n  \
               \"complexity\": \"Trivial|Simple|Medium|Complex|Epic\",\n  \
               \"steps\": [{{\"stepId\": \"step-id\", \"order\": 1, \"required\": true, \"reason\": \"why\"}}],\n  \
               \"tasks\": [\"task from the ticket\"],\n  \
               \"summary\": \"one sentence\"\n\
             }}\n\
             ```\n\n\
             AVAILABLE STEPS (pick only the relevant ones):\n{}\n\
             RULES:\n\
             - A pure frontend bug needs no data-analysis step\n\
             - A pure API fix needs no frontend-analysis step\n\
             - \"implement\" is always the last step\n\
             - Put every task and sub-task of the ticket into \"tasks\"\n",
            ctx.shared_prompt_context(),
            steps
        )
    }
}

#[async_trait]
impl Classifier for AgentClassifier {
    async fn classify(
        &self,
        ctx: &StepContext,
        cancel: &CancelSignal,
    ) -> Result<Classification, ClassifyError> {
        let prompt = self.prompt(ctx);
        debug!("Classifier prompt: {}", prompt);

        let response = self.agent.execute(&prompt, cancel).await?;
        debug!("Classifier output: {}", response.content);

        parse_classification(&response.content)
    }
}

/// Classify the ticket, substituting the fallback plan on any error
///
/// The result is attached to `ctx` either way.
pub async fn classify_or_fallback(
    classifier: &dyn Classifier,
    ctx: &mut StepContext,
    cancel: &CancelSignal,
) -> Classification {
    let classification = match classifier.classify(ctx, cancel).await {
        Ok(classification) => {
            info!(
                "Classified as {} ({}, {}): {}",
                classification.ticket_type,
                classification.scope,
                classification.complexity,
                classification.summary
            );
            classification
        }
        Err(e) => {
            warn!("Classification failed, using fallback plan: {}", e);
            Classification::fallback(format!("Fallback: {}", e))
        }
    };

    ctx.apply_classification(classification.clone());
    classification
}
