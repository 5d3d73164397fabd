//! ticket-pipeline - classifies tickets and runs dependency-ordered steps through a coding assistant

pub mod agent;
pub mod classifier;
pub mod cli;
pub mod core;
pub mod execution;
pub mod steps;

// Re-export commonly used types
pub use agent::{AgentClientConfig, AgentError, AgentExecutor, AgentResponse, AssistantClient};
pub use classifier::{classify_or_fallback, AgentClassifier, Classifier, ClassifyError};
pub use core::{
    CancelSignal, Classification, ExecutableStep, LayerScope, PipelineResult, PipelineStatus,
    PlannedStep, StepContext, StepResult,
};
pub use execution::{ExecutionPlan, PipelineExecutor, PipelineObserver, RegistryError, StepRegistry};
pub use steps::{builtin_registry, builtin_registry_with};
