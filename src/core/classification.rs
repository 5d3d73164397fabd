//! Classification - the plan produced for a ticket

use crate::core::scope::{Complexity, LayerScope, TicketType};
use serde::{Deserialize, Serialize};

/// Step ids listed by the fallback plan, in canonical order
pub const FALLBACK_STEP_IDS: [&str; 6] = [
    "data-analysis",
    "api-analysis",
    "frontend-analysis",
    "project-structure",
    "skill-mapping",
    "implement",
];

/// A step the classification asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStep {
    /// Step identifier (e.g. "data-analysis")
    pub step_id: String,

    /// Declared position, 1-based; advisory only
    pub order: i32,

    /// Whether the classifier marked the step as required
    #[serde(rename = "required", default = "default_required")]
    pub is_required: bool,

    /// Why the step is needed
    #[serde(default)]
    pub reason: Option<String>,
}

fn default_required() -> bool {
    true
}

impl PlannedStep {
    pub fn new(step_id: impl Into<String>, order: i32) -> Self {
        Self {
            step_id: step_id.into(),
            order,
            is_required: true,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Structured plan for a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Kind of ticket
    #[serde(rename = "type")]
    pub ticket_type: TicketType,

    /// Affected layers
    pub scope: LayerScope,

    /// Estimated complexity
    pub complexity: Complexity,

    /// Requested steps; may be empty for ad hoc runs
    pub steps: Vec<PlannedStep>,

    /// Short human readable summary
    pub summary: String,

    /// Tasks extracted from the ticket
    #[serde(default)]
    pub tasks: Vec<String>,
}

impl Classification {
    /// Plan used when classification fails: every analysis step, medium complexity, all layers
    pub fn fallback(summary: impl Into<String>) -> Self {
        let steps = FALLBACK_STEP_IDS
            .iter()
            .zip(1..)
            .map(|(id, order)| PlannedStep::new(*id, order).with_reason("Fallback: all steps"))
            .collect();

        Self {
            ticket_type: TicketType::NewFeature,
            scope: LayerScope::all(),
            complexity: Complexity::Medium,
            steps,
            summary: summary.into(),
            tasks: Vec::new(),
        }
    }

    /// Check whether the given layer is in scope
    pub fn affects_layer(&self, layer: LayerScope) -> bool {
        self.scope.affects(layer)
    }

    /// Requested step ids sorted by their declared order (stable for equal orders)
    pub fn ordered_step_ids(&self) -> Vec<String> {
        let mut steps: Vec<&PlannedStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps.into_iter().map(|s| s.step_id.clone()).collect()
    }
}
