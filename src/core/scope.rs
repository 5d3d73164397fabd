//! Ticket metadata enums shared by steps and classifications

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Architectural layers touched by a ticket or a step
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LayerScope: u8 {
        /// Entities, database context, migrations, seeding
        const DATA = 1;
        /// Endpoints, handlers, services
        const API = 1 << 1;
        /// Pages, view models, markup
        const FRONTEND = 1 << 2;
        /// Contracts, DTOs, interfaces
        const SHARED = 1 << 3;
        /// Build, CI/CD, configuration
        const INFRASTRUCTURE = 1 << 4;
    }
}

impl LayerScope {
    /// Check whether every layer in `layer` is part of this scope
    pub fn affects(&self, layer: LayerScope) -> bool {
        self.contains(layer)
    }

    /// Map a free-form layer name to its flag
    pub fn from_alias(name: &str) -> Option<LayerScope> {
        match name.trim().to_lowercase().as_str() {
            "data" => Some(LayerScope::DATA),
            "api" => Some(LayerScope::API),
            "frontend" | "ui" => Some(LayerScope::FRONTEND),
            "shared" | "contracts" => Some(LayerScope::SHARED),
            "infrastructure" | "infra" => Some(LayerScope::INFRASTRUCTURE),
            "all" => Some(LayerScope::all()),
            _ => None,
        }
    }

    fn label(flag: LayerScope) -> &'static str {
        match flag {
            LayerScope::DATA => "Data",
            LayerScope::API => "Api",
            LayerScope::FRONTEND => "Frontend",
            LayerScope::SHARED => "Shared",
            LayerScope::INFRASTRUCTURE => "Infrastructure",
            _ => "?",
        }
    }
}

impl fmt::Display for LayerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return write!(f, "All");
        }
        if self.is_empty() {
            return write!(f, "None");
        }
        let labels: Vec<&str> = self.iter().map(LayerScope::label).collect();
        write!(f, "{}", labels.join(", "))
    }
}

/// Kind of work a ticket asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketType {
    NewFeature,
    Enhancement,
    BugFix,
    Refactoring,
    Documentation,
    Configuration,
    DataMigration,
}

impl TicketType {
    /// Lenient parse used for assistant output; unknown values fall back to `NewFeature`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        let normalized = value.map(|v| v.trim().to_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "enhancement" => TicketType::Enhancement,
            "bugfix" | "bug_fix" | "bug" | "fix" => TicketType::BugFix,
            "refactoring" | "refactor" => TicketType::Refactoring,
            "documentation" | "docs" => TicketType::Documentation,
            "configuration" | "config" => TicketType::Configuration,
            "datamigration" | "data_migration" | "migration" => TicketType::DataMigration,
            _ => TicketType::NewFeature,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Estimated size of a ticket, ordered from smallest to largest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Complexity {
    /// A few lines in one file
    Trivial,
    /// A few files with obvious changes
    Simple,
    /// Several files, feature sized
    Medium,
    /// Many files, cross-cutting
    Complex,
    /// Should be split up
    Epic,
}

impl Complexity {
    /// Lenient parse used for assistant output; unknown values fall back to `Medium`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        let normalized = value.map(|v| v.trim().to_lowercase()).unwrap_or_default();
        match normalized.as_str() {
            "trivial" => Complexity::Trivial,
            "simple" => Complexity::Simple,
            "complex" => Complexity::Complex,
            "epic" => Complexity::Epic,
            _ => Complexity::Medium,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
