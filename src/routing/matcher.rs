//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix at a segment boundary (case-sensitive)
//! - Strip the matched prefix to produce the upstream path
//!
//! # Design Decisions
//! - `/gateway/color` matches `/gateway/color` and `/gateway/color/...`,
//!   never `/gateway/colorful`
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

/// Matches an inbound path against a gateway path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. The prefix carries no trailing slash.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` is the prefix itself or lies beneath it.
    pub fn matches(&self, path: &str) -> bool {
        self.remainder(path).is_some()
    }

    /// Strip the prefix from `path`, returning the upstream path.
    ///
    /// The bare prefix maps to `/`; `None` when the path does not match.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.remainder(path)
            .map(|rest| if rest.is_empty() { "/" } else { rest })
    }

    fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }
}
