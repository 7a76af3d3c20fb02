use std::collections::HashSet;

use abp_core::{Rule, RuleKind, RuleOptions};

#[derive(Debug, Clone, Copy)]
pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
}

/// Drop rules that behave identically to an earlier rule.
pub fn optimize_rules(rules: &mut Vec<Rule>) -> OptimizeStats {
    let before = rules.len();

    let mut seen: HashSet<RuleKey> = HashSet::new();
    let mut deduped = 0usize;
    rules.retain(|rule| {
        if rule.kind() != RuleKind::Network {
            return true;
        }
        if seen.insert(RuleKey::from(rule)) {
            true
        } else {
            deduped += 1;
            false
        }
    });

    OptimizeStats {
        before,
        after: rules.len(),
        deduped,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RuleKey {
    is_exception: bool,
    regex: Option<String>,
    options: RuleOptions,
}

impl From<&Rule> for RuleKey {
    fn from(rule: &Rule) -> Self {
        Self {
            is_exception: rule.is_exception(),
            regex: rule.regex().map(str::to_string),
            options: rule.options().clone(),
        }
    }
}
