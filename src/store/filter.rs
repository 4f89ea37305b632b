//! Name filter for product searches
//!
//! The filter is a case-insensitive regular expression over `name`.
//! Patterns that do not compile are searched for literally.

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Compiled name filter
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: String,
    regex: Regex,
}

impl NameFilter {
    /// Build a filter, or `None` for a missing or empty query
    pub fn from_query(query: Option<&str>) -> Result<Option<Self>> {
        match query {
            Some(q) if !q.is_empty() => Self::new(q).map(Some),
            _ => Ok(None),
        }
    }

    /// Build a filter from a raw query string
    pub fn new(query: &str) -> Result<Self> {
        if let Ok(regex) = build(query) {
            return Ok(Self {
                pattern: query.to_string(),
                regex,
            });
        }

        debug!("Query '{}' is not a valid pattern, matching literally", query);
        let pattern = regex::escape(query);
        // Only the regex size limit can reject an escaped literal
        let regex = build(&pattern).map_err(|e| Error::store(format!("Unusable filter: {e}")))?;
        Ok(Self { pattern, regex })
    }

    /// The compiled pattern, escaped if the query was not a valid regex
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check a name against the filter
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

fn build(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
