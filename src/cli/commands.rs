//! CLI command definitions

use clap::Args;

/// Classify a ticket, then run only the steps it needs
#[derive(Debug, Args, Clone)]
pub struct SmartCommand {
    /// Ticket description or GitHub issue URL
    pub ticket: String,

    /// Show the plan without running any step
    #[arg(long)]
    pub dry_run: bool,

    /// Print the pipeline result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Classify a ticket and show the resulting plan
#[derive(Debug, Args, Clone)]
pub struct ClassifyCommand {
    /// Ticket description or GitHub issue URL
    pub ticket: String,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Implement a ticket in a single assistant session
#[derive(Debug, Args, Clone)]
pub struct FastCommand {
    /// Ticket description or GitHub issue URL
    pub ticket: String,
}

/// Validate the running application
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// What to look for; defaults to a general check
    pub description: Option<String>,
}

/// Run a single registered step
#[derive(Debug, Args, Clone)]
pub struct StepCommand {
    /// Step id (see list-steps)
    pub name: String,

    /// Ticket description or GitHub issue URL
    pub ticket: String,
}
