//! PostgreSQL text-search lookups.
//!
//! Full-text search uses the built-in tsvector machinery; the string
//! lookup relies on the pg_trgm extension being installed.

use crate::search::Lookup;

/// Full-text search via tsvector/tsquery.
pub struct FullTextLookup;

impl Lookup for FullTextLookup {
    fn name(&self) -> &'static str {
        "search"
    }

    fn expression(&self, column: &str) -> String {
        format!("to_tsvector('english', {column}) @@ plainto_tsquery('english', $1)")
    }
}

/// Case-insensitive substring match.
pub struct SubstringLookup;

impl Lookup for SubstringLookup {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn expression(&self, column: &str) -> String {
        format!("{column} ILIKE '%' || $1 || '%'")
    }
}

/// Fuzzy string match via the pg_trgm similarity operator.
pub struct TrigramLookup;

impl Lookup for TrigramLookup {
    fn name(&self) -> &'static str {
        "string"
    }

    fn expression(&self, column: &str) -> String {
        format!("{column} % $1")
    }
}
