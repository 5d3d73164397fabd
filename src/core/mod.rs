//! Core domain models for the ticket pipeline
//!
//! Data contracts shared by the registry, the executor, the classifier and
//! the built-in steps.

pub mod cancel;
pub mod classification;
pub mod config;
pub mod context;
pub mod result;
pub mod scope;
pub mod step;

pub use cancel::CancelSignal;
pub use classification::{Classification, PlannedStep, FALLBACK_STEP_IDS};
pub use context::StepContext;
pub use result::{PipelineResult, PipelineStatus, StepResult};
pub use scope::{Complexity, LayerScope, TicketType};
pub use step::{normalize_step_id, ExecutableStep};
