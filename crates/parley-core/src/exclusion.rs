//! Group-reference filtering for character names.
//!
//! Transcripts attribute some lines to groups rather than individuals
//! ("all", "mane six and spike", "other ponies"). A name is a valid graph
//! participant only if none of its whitespace-separated tokens is in the
//! exclusion set.

use std::collections::HashSet;

/// Tokens that mark a speaker label as a group reference.
pub const DEFAULT_EXCLUDED_WORDS: [&str; 4] = ["others", "ponies", "and", "all"];

/// A fixed set of excluded name tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    /// Build an exclusion set from arbitrary words.
    ///
    /// Words are normalized the same way as character names so that
    /// configuration casing does not matter.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| crate::turn::normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Returns `true` if `name` may become a graph node.
    #[must_use]
    pub fn is_valid(&self, name: &str) -> bool {
        !name
            .split_whitespace()
            .any(|token| self.words.contains(token))
    }

    /// Number of excluded tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_WORDS)
    }
}
