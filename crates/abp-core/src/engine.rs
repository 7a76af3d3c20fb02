//! Combined matcher for option-free rules.
//!
//! Thousands of basic rules are answered by a single automaton instead of one
//! regex per rule.

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

use crate::config::MatcherEngine;
use crate::error::FilterError;

/// OR-joined matcher over many rule patterns.
#[derive(Debug, Clone)]
pub enum CombinedMatcher {
    Single(Regex),
    Set(RegexSet),
}

impl CombinedMatcher {
    /// Compile `patterns` with the chosen engine.
    ///
    /// Returns `Ok(None)` when there is nothing to combine. Both compiled
    /// program size and lazy DFA cache are bounded by `memory_limit`.
    pub fn build<S: AsRef<str>>(
        patterns: &[S],
        engine: MatcherEngine,
        memory_limit: usize,
    ) -> Result<Option<Self>, FilterError> {
        let patterns: Vec<&str> = patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .collect();
        if patterns.is_empty() {
            return Ok(None);
        }

        let matcher = match engine {
            MatcherEngine::Regex => {
                // Each branch is grouped so inline flags stay inside their own rule.
                let joined = patterns
                    .iter()
                    .map(|p| format!("(?:{p})"))
                    .collect::<Vec<_>>()
                    .join("|");
                let regex = RegexBuilder::new(&joined)
                    .case_insensitive(true)
                    .size_limit(memory_limit)
                    .dfa_size_limit(memory_limit)
                    .build()?;
                Self::Single(regex)
            }
            MatcherEngine::RegexSet => {
                let set = RegexSetBuilder::new(&patterns)
                    .case_insensitive(true)
                    .size_limit(memory_limit)
                    .dfa_size_limit(memory_limit)
                    .build()?;
                Self::Set(set)
            }
        };

        Ok(Some(matcher))
    }

    #[inline]
    pub fn is_match(&self, url: &str) -> bool {
        match self {
            Self::Single(regex) => regex.is_match(url),
            Self::Set(set) => set.is_match(url),
        }
    }

    pub fn engine(&self) -> MatcherEngine {
        match self {
            Self::Single(_) => MatcherEngine::Regex,
            Self::Set(_) => MatcherEngine::RegexSet,
        }
    }
}
