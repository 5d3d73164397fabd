//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ClassifyCommand, FastCommand, SmartCommand, StepCommand, ValidateCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Ticket automation driven by an external coding assistant
#[derive(Debug, Parser, Clone)]
#[command(name = "ticket-pipeline")]
#[command(version)]
#[command(about = "Classifies a ticket and runs the matching analysis and implementation steps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Classify the ticket and run only the relevant steps
    Smart(SmartCommand),

    /// Classify the ticket and show the plan
    Classify(ClassifyCommand),

    /// Implement the ticket in one pass
    Fast(FastCommand),

    /// Check the running application
    Validate(ValidateCommand),

    /// Run a single step
    Step(StepCommand),

    /// List registered steps
    ListSteps,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
