//! Query normalization.
//!
//! A [`Query`] is the unit of work for the input pipeline and the cache
//! key: trimmed, non-empty input text. Identity is exact string equality.

use std::fmt;

/// Trimmed, non-empty user input submitted for resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Normalize raw input. Whitespace-only input is not a query;
    /// callers treat `None` as a request to clear the output.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
