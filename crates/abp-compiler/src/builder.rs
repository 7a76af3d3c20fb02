use std::borrow::Cow;

use log::debug;

use abp_core::{BuildOptions, FilterError, Rule, RuleSet};

use crate::optimizer::{optimize_rules, OptimizeStats};
use crate::parser::parse_line;

/// One entry of a build input: filter text or an already parsed rule.
#[derive(Debug, Clone)]
pub enum RuleInput<'a> {
    Text(Cow<'a, str>),
    Parsed(Rule),
}

impl<'a> From<&'a str> for RuleInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for RuleInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for RuleInput<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl From<Rule> for RuleInput<'_> {
    fn from(rule: Rule) -> Self {
        Self::Parsed(rule)
    }
}

/// Parse, de-duplicate and partition `inputs` into a queryable rule set.
///
/// Blank lines are ignored. Invalid lines abort the build or are skipped
/// according to `options.invalid_rules`.
pub fn build_rule_set<'a, I, T>(inputs: I, options: &BuildOptions) -> Result<RuleSet, FilterError>
where
    I: IntoIterator<Item = T>,
    T: Into<RuleInput<'a>>,
{
    build_rule_set_with_stats(inputs, options).map(|(rule_set, _)| rule_set)
}

/// Like [`build_rule_set`], also reporting how many rules dedupe removed.
pub fn build_rule_set_with_stats<'a, I, T>(
    inputs: I,
    options: &BuildOptions,
) -> Result<(RuleSet, OptimizeStats), FilterError>
where
    I: IntoIterator<Item = T>,
    T: Into<RuleInput<'a>>,
{
    let mut rules = Vec::new();

    for input in inputs {
        let input: RuleInput<'a> = input.into();
        match input {
            RuleInput::Text(text) => {
                if let Some(rule) = parse_line(&text, options.invalid_rules)? {
                    rules.push(rule);
                }
            }
            RuleInput::Parsed(rule) => rules.push(rule),
        }
    }

    let stats = optimize_rules(&mut rules);
    debug!(
        "Parsed {} rules, {} after dedupe",
        stats.before, stats.after
    );

    let rule_set = RuleSet::from_rules(rules, options)?;
    Ok((rule_set, stats))
}

/// Build a rule set from a newline separated filter list.
pub fn build_rule_set_from_text(text: &str, options: &BuildOptions) -> Result<RuleSet, FilterError> {
    build_rule_set(text.lines(), options)
}

#[cfg(test)]
mod tests {
    use abp_core::{InvalidRulePolicy, RequestContext};

    use crate::parser::parse_rule;

    use super::*;

    #[test]
    fn accepts_mixed_inputs() {
        let parsed = parse_rule("@@advice.").unwrap();
        let inputs: Vec<RuleInput> = vec![
            "adv".into(),
            "".into(),
            "   ".into(),
            parsed.into(),
            parse_rule("! comment").unwrap().into(),
            String::from("##.banner").into(),
        ];

        let rules = build_rule_set(inputs, &BuildOptions::default()).unwrap();
        let ctx = RequestContext::new();

        assert_eq!(rules.len(), 2);
        assert!(rules.should_block("http://example.com/advert.html", &ctx).unwrap());
        assert!(!rules.should_block("http://example.com/advice.html", &ctx).unwrap());
    }

    #[test]
    fn fails_on_invalid_line_by_default() {
        let result = build_rule_set(["||ads.example.com^", "@@"], &BuildOptions::default());
        assert!(matches!(result, Err(FilterError::Parse { .. })));
    }

    #[test]
    fn skips_invalid_line_when_configured() {
        let options = BuildOptions::new().with_invalid_rules(InvalidRulePolicy::Skip);
        let rules = build_rule_set(["||ads.example.com^", "@@"], &options).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn builds_from_text() {
        let rules = build_rule_set_from_text(
            "[Adblock Plus 2.0]\n! title\n||ads.example.com^\n||ads.example.com^\n",
            &BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn reports_dedupe_stats() {
        let inputs = ["||ads.example.com^", "||ads.example.com^", "banner", "! comment"];
        let (rules, stats) = build_rule_set_with_stats(inputs, &BuildOptions::default()).unwrap();
        assert_eq!(stats.before, 4);
        assert_eq!(stats.after, 3);
        assert_eq!(stats.deduped, 1);
        assert_eq!(rules.len(), 2);
    }
}
