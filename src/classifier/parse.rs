//! Lenient mapping from the assistant's classification JSON

use crate::agent::parse_json_envelope;
use crate::classifier::ClassifyError;
use crate::core::{Classification, Complexity, LayerScope, PlannedStep, TicketType};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ClassificationDto {
    #[serde(rename = "type")]
    ticket_type: Option<String>,
    scope: Option<Vec<String>>,
    complexity: Option<String>,
    #[serde(default)]
    steps: Vec<StepDto>,
    tasks: Option<Vec<String>>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepDto {
    #[serde(default)]
    step_id: String,
    #[serde(default)]
    order: i32,
    #[serde(default = "default_required")]
    required: bool,
    reason: Option<String>,
}

fn default_required() -> bool {
    true
}

/// Parse assistant output into a classification
///
/// Unknown enum values fall back to defaults instead of failing; only a
/// missing or structurally broken JSON envelope is an error.
pub fn parse_classification(output: &str) -> Result<Classification, ClassifyError> {
    let dto: ClassificationDto =
        parse_json_envelope(output).map_err(|e| ClassifyError::Parse(e.to_string()))?;

    let steps = dto
        .steps
        .into_iter()
        .filter(|s| !s.step_id.trim().is_empty())
        .map(|s| PlannedStep {
            step_id: s.step_id,
            order: s.order,
            is_required: s.required,
            reason: s.reason,
        })
        .collect();

    Ok(Classification {
        ticket_type: TicketType::parse_lenient(dto.ticket_type.as_deref()),
        scope: parse_scope(dto.scope.as_deref()),
        complexity: Complexity::parse_lenient(dto.complexity.as_deref()),
        steps,
        summary: dto.summary.unwrap_or_else(|| "No summary".to_string()),
        tasks: dto.tasks.unwrap_or_default(),
    })
}

/// Union of the named layers; nothing recognisable means all layers
fn parse_scope(names: Option<&[String]>) -> LayerScope {
    let scope = names
        .unwrap_or_default()
        .iter()
        .filter_map(|name| LayerScope::from_alias(name))
        .fold(LayerScope::empty(), |acc, layer| acc | layer);

    if scope.is_empty() {
        LayerScope::all()
    } else {
        scope
    }
}
