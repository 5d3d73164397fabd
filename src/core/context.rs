//! Step context - per-run shared state handed to every step

use crate::core::classification::Classification;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

const GITHUB_ISSUE_PATTERN: &str = r"github\.com/([^/]+/[^/]+)/issues/(\d+)";

/// Mutable state owned by a single pipeline run
///
/// Never shared between runs. Steps read the classification from here and
/// leave outputs in `metadata` for the steps that follow.
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Ticket text or issue URL as given by the user
    pub ticket: String,

    /// `owner/repo`, when the ticket is a GitHub issue URL
    pub repository: Option<String>,

    /// Issue number, when the ticket is a GitHub issue URL
    pub issue_number: Option<u64>,

    /// Classification of the ticket, once known
    pub classification: Option<Classification>,

    /// 1-based index of the step currently running (0 before the first one)
    pub current_step_index: usize,

    /// Registered steps that the run did not request
    pub skipped_steps: Vec<String>,

    /// Tasks loaded from the ticket
    pub tasks: Vec<String>,

    /// Free-form data steps pass to each other
    pub metadata: HashMap<String, Value>,
}

impl StepContext {
    /// Create a context for a ticket, picking up GitHub issue coordinates if present
    pub fn new(ticket: impl Into<String>) -> Self {
        let ticket = ticket.into();
        let (repository, issue_number) = parse_github_issue(&ticket)
            .map(|(repo, number)| (Some(repo), Some(number)))
            .unwrap_or((None, None));

        Self {
            ticket,
            repository,
            issue_number,
            classification: None,
            current_step_index: 0,
            skipped_steps: Vec::new(),
            tasks: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn is_github_issue(&self) -> bool {
        self.repository.is_some() && self.issue_number.is_some()
    }

    pub fn is_classified(&self) -> bool {
        self.classification.is_some()
    }

    /// Attach a classification; its tasks replace the context's when it has any
    pub fn apply_classification(&mut self, classification: Classification) {
        if !classification.tasks.is_empty() {
            self.tasks = classification.tasks.clone();
        }
        self.classification = Some(classification);
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Metadata value as a string slice, if it is one
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Prompt preamble every assistant call starts with
    pub fn shared_prompt_context(&self) -> String {
        let mut prompt = format!(
            "Ticket: {}\n\n\
             You are running non-interactively. Use your file tools (Write, Edit, Bash, Glob, Grep, Read) \
             to make changes directly instead of describing them. Read CLAUDE.md for project guidelines.\n",
            self.ticket
        );

        if let (Some(repo), Some(number)) = (&self.repository, self.issue_number) {
            prompt.push_str(&format!(
                "\nThe ticket is GitHub issue #{number} in {repo}. Load the full issue with:\n  \
                 gh issue view {number} --repo {repo} --comments\n\
                 Read all details and sub-tasks before you start.\n"
            ));
        }

        prompt
    }

    /// Shared preamble plus the classification, when there is one
    pub fn classified_prompt_context(&self) -> String {
        let shared = self.shared_prompt_context();
        let Some(classification) = &self.classification else {
            return shared;
        };

        format!(
            "{shared}\n=== CLASSIFICATION ===\n\
             Type: {}\n\
             Scope: {}\n\
             Complexity: {}\n\
             Summary: {}\n\n\
             Planned steps: {}\n",
            classification.ticket_type,
            classification.scope,
            classification.complexity,
            classification.summary,
            classification.ordered_step_ids().join(" -> "),
        )
    }
}

fn parse_github_issue(ticket: &str) -> Option<(String, u64)> {
    let regex = Regex::new(GITHUB_ISSUE_PATTERN).ok()?;
    let captures = regex.captures(ticket)?;
    let repo = captures.get(1)?.as_str().to_string();
    let number = captures.get(2)?.as_str().parse().ok()?;
    Some((repo, number))
}
