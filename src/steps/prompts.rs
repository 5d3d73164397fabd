//! Prompt templates for the built-in steps

use crate::core::StepContext;

const DATA_KEYWORDS: [&str; 7] = [
    "data",
    "entity",
    "entities",
    "database",
    "table",
    "migration",
    "seed",
];

pub fn data_analysis(ctx: &StepContext) -> String {
    format!(
        "{}\n=== STEP: DATA ANALYSIS ===\n\n\
         Analyse and implement the data/entity changes for this ticket.\n\n\
         1. Which entities must be created?\n\
         2. Which entities must be changed or removed?\n\
         3. Are migrations needed?\n\n\
         ACTION: Implement the entity changes now with your file tools. \
         Add seed data with realistic values for new entities.\n",
        ctx.classified_prompt_context()
    )
}

pub fn api_analysis(ctx: &StepContext) -> String {
    format!(
        "{}\n=== STEP: API ANALYSIS ===\n\n\
         Analyse and implement the API changes for this ticket.\n\n\
         1. Which endpoints must be created, changed or removed?\n\
         2. Which handlers and services are affected?\n\n\
         ACTION: Implement the API changes now with your file tools.\n",
        ctx.classified_prompt_context()
    )
}

pub fn frontend_analysis(ctx: &StepContext) -> String {
    format!(
        "{}\n=== STEP: FRONTEND ANALYSIS ===\n\n\
         Analyse and implement the frontend changes for this ticket.\n\n\
         1. Which pages or views must be created or changed?\n\
         2. Which view models are affected?\n\n\
         ACTION: Implement the frontend changes now with your file tools.\n",
        ctx.classified_prompt_context()
    )
}

pub fn project_structure(ctx: &StepContext) -> String {
    format!(
        "{}\n=== STEP: PROJECT STRUCTURE ===\n\n\
         Decide whether new projects or modules are needed.\n\n\
         1. Does the feature need a project of its own?\n\
         2. Which existing projects are affected?\n\
         3. Do project references have to change?\n\n\
         ACTION: Create new projects only if they are needed.\n",
        ctx.classified_prompt_context()
    )
}

pub fn skill_mapping(ctx: &StepContext) -> String {
    format!(
        "{}\n=== STEP: SKILL MAPPING ===\n\n\
         Map each task to the assistant skills best suited to it and \
         document the mapping for the implementation step.\n\n\
         Tasks:\n{}",
        ctx.classified_prompt_context(),
        numbered(&ctx.tasks)
    )
}

pub fn implement_all(ctx: &StepContext) -> String {
    format!(
        "{}\n=== IMPLEMENT ALL TASKS ===\n\n\
         Implement ALL of the following tasks:\n\n{}\n\
         1. Read CLAUDE.md for project structure and conventions\n\
         2. Work through the tasks in order\n\
         3. Create seed data for new entities\n\
         4. Build the project at the end and fix any errors\n",
        ctx.classified_prompt_context(),
        numbered(&ctx.tasks)
    )
}

pub fn seeding(ctx: &StepContext) -> String {
    format!(
        "{}\n\
         ACTION: Create a seeder for the data/entity feature that was just implemented. \
         Follow the seeding conventions from CLAUDE.md and add 5-10 realistic records.\n",
        ctx.shared_prompt_context()
    )
}

pub fn fast_implement(ctx: &StepContext) -> String {
    format!(
        "{}\n=== FAST IMPLEMENTATION ===\n\n\
         Implement the whole ticket in this single session, without separate \
         analysis passes.\n\n\
         Tasks:\n{}\n\
         Build the project when done and fix any errors.\n",
        ctx.classified_prompt_context(),
        numbered(&ctx.tasks)
    )
}

pub fn validate(ctx: &StepContext) -> String {
    format!(
        "{}\n=== VALIDATION ===\n\n\
         Start the application, check that the changes described by the ticket \
         are visible and behave correctly, then answer ONLY with this JSON:\n\n\
         ```json\n\
         {{\"status\": \"success|failed|skipped\", \"changesVisible\": true, \
         \"issues\": [\"...\"], \"summary\": \"...\"}}\n\
         ```\n",
        ctx.shared_prompt_context()
    )
}

/// One-word readiness check asked while the application starts
pub fn readiness_check() -> String {
    "Check whether the application is running and reachable.\n\
     Answer with ONE word only: \"RUNNING\" if it is up, \"WAITING\" if it is not.\n"
        .to_string()
}

/// Whether a task mentions data-layer work that needs seeding afterwards
pub fn is_data_task(task: &str) -> bool {
    let task = task.to_lowercase();
    DATA_KEYWORDS.iter().any(|keyword| task.contains(keyword))
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}\n", i + 1, item))
        .collect()
}
