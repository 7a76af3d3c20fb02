//! Partitioned rule collection and the blocking decision.
//!
//! Rules are split four ways: option-free ("basic") rules go into one
//! combined matcher per action, rules with options ("advanced") are kept
//! in lists and evaluated individually. Exceptions are consulted before
//! blocking rules at every step.

use std::collections::HashSet;

use log::{debug, info};

use crate::config::{BuildOptions, MatcherEngine};
use crate::engine::CombinedMatcher;
use crate::error::FilterError;
use crate::rule::Rule;
use crate::types::RequestContext;

/// Compiled, immutable collection of network rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    blacklist: Vec<Rule>,
    whitelist: Vec<Rule>,
    blacklist_advanced: Vec<Rule>,
    whitelist_advanced: Vec<Rule>,
    blacklist_matcher: Option<CombinedMatcher>,
    whitelist_matcher: Option<CombinedMatcher>,
    supported_options: HashSet<String>,
    skip_unsupported_rules: bool,
    engine: MatcherEngine,
}

/// Partition sizes of a [`RuleSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleSetStats {
    pub basic_blacklist: usize,
    pub basic_whitelist: usize,
    pub advanced_blacklist: usize,
    pub advanced_whitelist: usize,
}

impl RuleSetStats {
    pub fn total(&self) -> usize {
        self.basic_blacklist + self.basic_whitelist + self.advanced_blacklist + self.advanced_whitelist
    }
}

impl RuleSet {
    /// Partition parsed rules and compile their matchers.
    ///
    /// Comments, cosmetic rules and rules requiring options outside
    /// `options.supported_options` are dropped.
    pub fn from_rules<I>(rules: I, options: &BuildOptions) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let supported_options = options.supported_option_set();

        let mut blacklist = Vec::new();
        let mut whitelist = Vec::new();
        let mut blacklist_advanced = Vec::new();
        let mut whitelist_advanced = Vec::new();
        let mut dropped = 0usize;

        for rule in rules {
            if rule.pattern().is_none()
                || !rule.matching_supported_by(|name| supported_options.contains(name))
            {
                debug!("Skipping unmatchable rule {:?}", rule.raw_text());
                dropped += 1;
                continue;
            }

            let target = match (rule.options().is_empty(), rule.is_exception()) {
                (true, false) => &mut blacklist,
                (true, true) => &mut whitelist,
                (false, false) => &mut blacklist_advanced,
                (false, true) => &mut whitelist_advanced,
            };
            target.push(rule);
        }

        // Queries must never compile, so advanced matchers are built now.
        for rule in blacklist_advanced.iter().chain(whitelist_advanced.iter()) {
            if let Some(pattern) = rule.pattern() {
                pattern.compiled()?;
            }
        }

        let blacklist_matcher = combine(&blacklist, options)?;
        let whitelist_matcher = combine(&whitelist, options)?;

        let rule_set = Self {
            blacklist,
            whitelist,
            blacklist_advanced,
            whitelist_advanced,
            blacklist_matcher,
            whitelist_matcher,
            supported_options,
            skip_unsupported_rules: options.skip_unsupported_rules,
            engine: options.engine,
        };

        let stats = rule_set.stats();
        info!(
            "Built rule set: {} rules ({} basic block, {} basic allow, {} advanced block, {} advanced allow), {} dropped",
            stats.total(),
            stats.basic_blacklist,
            stats.basic_whitelist,
            stats.advanced_blacklist,
            stats.advanced_whitelist,
            dropped,
        );

        Ok(rule_set)
    }

    /// Decide whether `url` should be blocked in `ctx`.
    ///
    /// Errors only when unsupported-rule skipping is disabled and an advanced
    /// rule needs an option `ctx` does not supply.
    pub fn should_block(&self, url: &str, ctx: &RequestContext) -> Result<bool, FilterError> {
        if let Some(matcher) = &self.whitelist_matcher {
            if matcher.is_match(url) {
                return Ok(false);
            }
        }

        if self.any_matches(&self.whitelist_advanced, url, ctx)? {
            return Ok(false);
        }

        if let Some(matcher) = &self.blacklist_matcher {
            if matcher.is_match(url) {
                return Ok(true);
            }
        }

        self.any_matches(&self.blacklist_advanced, url, ctx)
    }

    fn any_matches(&self, rules: &[Rule], url: &str, ctx: &RequestContext) -> Result<bool, FilterError> {
        for rule in rules {
            if self.skip_unsupported_rules && !rule.matching_supported(ctx) {
                continue;
            }
            if rule.matches(url, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn stats(&self) -> RuleSetStats {
        RuleSetStats {
            basic_blacklist: self.blacklist.len(),
            basic_whitelist: self.whitelist.len(),
            advanced_blacklist: self.blacklist_advanced.len(),
            advanced_whitelist: self.whitelist_advanced.len(),
        }
    }

    /// All matchable rules, blocking rules first.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.blacklist
            .iter()
            .chain(&self.blacklist_advanced)
            .chain(&self.whitelist)
            .chain(&self.whitelist_advanced)
    }

    pub fn len(&self) -> usize {
        self.stats().total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn supported_options(&self) -> &HashSet<String> {
        &self.supported_options
    }

    pub fn engine(&self) -> MatcherEngine {
        self.engine
    }
}

fn combine(rules: &[Rule], options: &BuildOptions) -> Result<Option<CombinedMatcher>, FilterError> {
    let patterns: Vec<&str> = rules.iter().filter_map(Rule::regex).collect();
    CombinedMatcher::build(&patterns, options.engine, options.memory_limit)
}
