//! Step registry, dependency ordering and pipeline execution

pub mod events;
pub mod executor;
pub mod registry;

pub use events::{ExecutionPlan, NoopObserver, PipelineObserver};
pub use executor::PipelineExecutor;
pub use registry::{RegistryError, StepRegistry};
