//! Engine-specific text-search lookups.
//!
//! # Data Flow
//! ```text
//! Startup initialization:
//!     → resolve DatabaseEngine from configuration
//!     → register that engine's lookups into LookupRegistry
//!
//! Query building (callers):
//!     → LookupRegistry::get(field, "search" | "substring" | "string")
//!     → Lookup::expression(column) → SQL predicate
//! ```
//!
//! # Design Decisions
//! - Engines form a closed enum; dispatch is exhaustive matching
//! - Lookup names are engine-independent so call sites never branch
//! - Re-registering a (field, name) pair replaces the previous lookup

pub mod mysql;
pub mod postgres;

use std::collections::HashMap;
use std::sync::Arc;

/// Relational engines the service can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseEngine {
    PostgreSql,
    MySql,
}

impl DatabaseEngine {
    /// Resolve a configured engine identifier. Identifiers are exact;
    /// anything unrecognized is a fatal configuration problem for the
    /// caller to surface.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "postgresql" => Some(DatabaseEngine::PostgreSql),
            "mysql" => Some(DatabaseEngine::MySql),
            _ => None,
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            DatabaseEngine::PostgreSql => "postgresql",
            DatabaseEngine::MySql => "mysql",
        }
    }
}

/// Textual field kinds lookups attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Bounded varchar columns.
    ShortText,
    /// Unbounded text columns.
    LongText,
}

/// A named query operator producing an engine-specific SQL predicate.
pub trait Lookup: Send + Sync {
    /// Engine-independent operator name ("search", "substring", "string").
    fn name(&self) -> &'static str;

    /// SQL predicate matching `column` against the engine's first bind
    /// parameter.
    fn expression(&self, column: &str) -> String;
}

/// Registry mapping (field kind, lookup name) to a lookup implementation.
#[derive(Default)]
pub struct LookupRegistry {
    entries: HashMap<(TextField, &'static str), Arc<dyn Lookup>>,
}

impl LookupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup for a field kind under the lookup's own name,
    /// replacing any previous registration for that pair.
    pub fn register(&mut self, field: TextField, lookup: Arc<dyn Lookup>) {
        self.entries.insert((field, lookup.name()), lookup);
    }

    pub fn get<'a>(&'a self, field: TextField, name: &'a str) -> Option<&'a Arc<dyn Lookup>> {
        self.entries.get(&(field, name))
    }

    /// Lookup names registered for a field kind, sorted for stable output.
    pub fn names_for(&self, field: TextField) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .entries
            .keys()
            .filter(|(f, _)| *f == field)
            .map(|(_, name)| *name)
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
