//! MySQL text-search lookups.
//!
//! Full-text search requires a FULLTEXT index on the matched column.

use crate::search::Lookup;

/// Natural-language full-text search.
pub struct FullTextLookup;

impl Lookup for FullTextLookup {
    fn name(&self) -> &'static str {
        "search"
    }

    fn expression(&self, column: &str) -> String {
        format!("MATCH ({column}) AGAINST (? IN NATURAL LANGUAGE MODE)")
    }
}

/// Substring match. MySQL collations make LIKE case-insensitive on the
/// usual *_ci collations.
pub struct SubstringLookup;

impl Lookup for SubstringLookup {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn expression(&self, column: &str) -> String {
        format!("{column} LIKE CONCAT('%', ?, '%')")
    }
}

/// Phonetic string match via SOUNDEX.
pub struct SoundsLikeLookup;

impl Lookup for SoundsLikeLookup {
    fn name(&self) -> &'static str {
        "string"
    }

    fn expression(&self, column: &str) -> String {
        format!("SOUNDEX({column}) = SOUNDEX(?)")
    }
}
