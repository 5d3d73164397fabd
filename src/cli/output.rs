//! CLI output formatting

use crate::{
    core::{Classification, ExecutableStep, PipelineResult, PipelineStatus, StepResult},
    execution::{ExecutionPlan, PipelineObserver, StepRegistry},
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner for a running step
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format a pipeline status for display
pub fn format_status(status: PipelineStatus) -> String {
    match status {
        PipelineStatus::Planned => style("PLANNED").yellow().to_string(),
        PipelineStatus::Succeeded => style("SUCCEEDED").green().to_string(),
        PipelineStatus::Failed => style("FAILED").red().to_string(),
    }
}

pub fn format_step_result(result: &StepResult) -> String {
    match (&result.error, result.success) {
        (_, true) => format!("{} {}", CHECK, style(&result.step_name).green()),
        (Some(error), false) => format!(
            "{} {}: {}",
            CROSS,
            style(&result.step_name).red(),
            style(error).dim()
        ),
        (None, false) => format!("{} {}", CROSS, style(&result.step_name).red()),
    }
}

pub fn format_classification(classification: &Classification) -> String {
    let mut lines = vec![
        format!("{} {}", INFO, style("Classification").bold()),
        format!("  Type:       {}", style(classification.ticket_type).cyan()),
        format!("  Scope:      {}", style(classification.scope).cyan()),
        format!("  Complexity: {}", style(classification.complexity).cyan()),
        format!("  Summary:    {}", classification.summary),
    ];

    let mut steps: Vec<_> = classification.steps.iter().collect();
    steps.sort_by_key(|s| s.order);
    if !steps.is_empty() {
        lines.push("  Planned steps:".to_string());
    }
    for step in steps {
        let optional = if step.is_required { "" } else { " (optional)" };
        lines.push(format!("    {}. {}{}", step.order, step.step_id, style(optional).dim()));
        if let Some(reason) = &step.reason {
            lines.push(format!("       {}", style(reason).dim()));
        }
    }

    if !classification.tasks.is_empty() {
        lines.push("  Tasks:".to_string());
        lines.extend(classification.tasks.iter().map(|t| format!("    - {}", t)));
    }

    lines.join("\n")
}

pub fn format_plan(plan: &ExecutionPlan, registry: &StepRegistry) -> String {
    let mut lines = vec![format!("{} {}", ROCKET, style("Execution plan").bold())];
    let pulled_in = plan.pulled_in();

    for (i, id) in plan.steps.iter().enumerate() {
        let Some(step) = registry.get_step(id) else { continue };
        let note = if pulled_in.contains(&id.as_str()) {
            style(" (dependency)").dim().to_string()
        } else {
            String::new()
        };
        lines.push(format!("  {}. {} ({}){}", i + 1, step.display_name(), style(id).cyan(), note));
        lines.push(format!("     Layers: {}", step.affected_layers()));
        if !step.dependencies().is_empty() {
            lines.push(format!("     Depends on: {}", step.dependencies().join(", ")));
        }
    }

    if !plan.skipped.is_empty() {
        lines.push(format!("  {}", style(format!("Skipped: {}", plan.skipped.join(", "))).dim()));
    }

    lines.join("\n")
}

pub fn format_pipeline_result(result: &PipelineResult) -> String {
    let mut lines = vec![format!(
        "{} Pipeline {} ({}) in {}s",
        INFO,
        format_status(result.status),
        style(&result.run_id.to_string()[..8]).dim(),
        result.duration().num_seconds()
    )];

    if result.status != PipelineStatus::Planned {
        lines.push(format!("  Executed steps: {}", result.step_results.len()));
        lines.extend(result.step_results.iter().map(|r| format!("  {}", format_step_result(r))));
    }
    if !result.skipped_steps.is_empty() {
        lines.push(format!("  Skipped: {}", style(result.skipped_steps.join(", ")).dim()));
    }
    if let Some(error) = &result.error {
        lines.push(format!("  {} {}", WARN, style(error).red()));
    }

    lines.join("\n")
}

pub fn format_step_list(registry: &StepRegistry) -> String {
    let mut steps: Vec<_> = registry.all_steps().iter().collect();
    steps.sort_by(|a, b| a.id().cmp(b.id()));

    let mut lines = vec![format!("{} {}", INFO, style("Available steps").bold())];
    for step in steps {
        lines.push(format!("  {:<20} - {}", step.id(), step.display_name()));
        if !step.dependencies().is_empty() {
            lines.push(format!("    Depends on: {}", step.dependencies().join(", ")));
        }
    }
    lines.join("\n")
}

/// Renders executor events to the terminal
pub struct ConsoleObserver {
    registry: std::sync::Arc<StepRegistry>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new(registry: std::sync::Arc<StepRegistry>) -> Self {
        Self {
            registry,
            spinner: Mutex::new(None),
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(spinner) = spinner.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_plan_computed(&self, plan: &ExecutionPlan) {
        println!("\n{}\n", format_plan(plan, &self.registry));
    }

    fn on_step_started(&self, step: &dyn ExecutableStep, index: usize, total: usize) {
        self.finish_spinner();
        let spinner = create_spinner(format!(
            "[{}/{}] {}",
            index,
            total,
            style(step.display_name()).cyan()
        ));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn on_step_succeeded(&self, _step: &dyn ExecutableStep, result: &StepResult) {
        self.finish_spinner();
        println!("{}", format_step_result(result));
    }

    fn on_step_failed(&self, _step: &dyn ExecutableStep, result: &StepResult) {
        self.finish_spinner();
        println!("{}", format_step_result(result));
    }

    fn on_pipeline_finished(&self, result: &PipelineResult) {
        self.finish_spinner();
        println!("\n{}", format_pipeline_result(result));
    }
}
