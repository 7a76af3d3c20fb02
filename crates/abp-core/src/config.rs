//! Build configuration for a [`RuleSet`](crate::RuleSet).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{BINARY_OPTIONS, DOMAIN_OPTION};

/// Default ceiling handed to the regex engine (256 MiB).
pub const DEFAULT_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// Strategy used to evaluate the combined option-free rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherEngine {
    /// One alternation compiled into a single `regex::Regex`
    #[default]
    Regex,
    /// All patterns compiled into a `regex::RegexSet`
    RegexSet,
}

/// What the builder does with a line that fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidRulePolicy {
    /// Abort the whole build
    #[default]
    Fail,
    /// Log and drop the line
    Skip,
}

/// Options accepted when building a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Option names the caller can supply at query time.
    /// `None` means every binary option plus `domain`.
    pub supported_options: Option<Vec<String>>,
    /// Treat advanced rules the query context cannot satisfy as non-matching.
    pub skip_unsupported_rules: bool,
    pub engine: MatcherEngine,
    /// Size limit in bytes for compiled matchers.
    pub memory_limit: usize,
    pub invalid_rules: InvalidRulePolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            supported_options: None,
            skip_unsupported_rules: true,
            engine: MatcherEngine::default(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
            invalid_rules: InvalidRulePolicy::default(),
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supported_options<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_options = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_skip_unsupported_rules(mut self, skip: bool) -> Self {
        self.skip_unsupported_rules = skip;
        self
    }

    pub fn with_engine(mut self, engine: MatcherEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    pub fn with_invalid_rules(mut self, policy: InvalidRulePolicy) -> Self {
        self.invalid_rules = policy;
        self
    }

    /// Resolve the declared supported options into a lookup set.
    pub fn supported_option_set(&self) -> HashSet<String> {
        match &self.supported_options {
            Some(names) => names.iter().cloned().collect(),
            None => default_supported_options().into_iter().collect(),
        }
    }
}

/// Every binary option plus `domain`.
pub fn default_supported_options() -> Vec<String> {
    BINARY_OPTIONS
        .iter()
        .copied()
        .chain(std::iter::once(DOMAIN_OPTION))
        .map(str::to_string)
        .collect()
}
