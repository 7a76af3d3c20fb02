use std::iter;

use log::{debug, warn};

use abp_core::types::{BINARY_OPTIONS, DOMAIN_OPTION};
use abp_core::{
    DomainQualifier, FilterError, InvalidRulePolicy, OptionValue, ParseError, Rule, RuleOptions,
    UrlPattern,
};

use crate::pattern::compile_pattern;

const DOMAIN_PREFIX: &str = "domain=";

/// Parse one filter line.
///
/// Comments and cosmetic rules never fail; network rules fail on an empty
/// pattern or a malformed option list.
pub fn parse_rule(line: &str) -> Result<Rule, ParseError> {
    let text = line.trim();

    if is_comment_line(text) {
        return Ok(Rule::comment(line));
    }

    let is_cosmetic = text.contains("##") || text.contains("#@#");

    let (is_exception, text) = match text.strip_prefix("@@") {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (pattern_source, raw_options) = match split_rule_options(text) {
        (pattern, Some(options_text)) => (pattern, split_options(options_text)),
        (pattern, None) => (pattern, Vec::new()),
    };

    if is_cosmetic {
        let options = parse_options(&raw_options).unwrap_or_else(|e| {
            debug!("Ignoring options of cosmetic rule {:?}: {}", line, e);
            RuleOptions::new()
        });
        return Ok(Rule::cosmetic(line, is_exception, to_owned(&raw_options), options));
    }

    let options = parse_options(&raw_options)?;
    let regex = compile_pattern(pattern_source)?;

    Ok(Rule::network(
        line,
        is_exception,
        to_owned(&raw_options),
        options,
        UrlPattern::new(pattern_source, regex),
    ))
}

/// Parse a whole filter list, skipping blank lines.
pub fn parse_filter_list(text: &str, policy: InvalidRulePolicy) -> Result<Vec<Rule>, FilterError> {
    let mut rules = Vec::new();

    for line in text.lines() {
        if let Some(rule) = parse_line(line, policy)? {
            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Parse one line under `policy`; `Ok(None)` for blank or skipped lines.
pub(crate) fn parse_line(line: &str, policy: InvalidRulePolicy) -> Result<Option<Rule>, FilterError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    match parse_rule(line) {
        Ok(rule) => Ok(Some(rule)),
        Err(e) => match policy {
            InvalidRulePolicy::Fail => Err(FilterError::parse(line, e)),
            InvalidRulePolicy::Skip => {
                warn!("Skipping invalid rule {:?}: {}", line, e);
                Ok(None)
            }
        },
    }
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with("[Adblock")
}

fn split_rule_options(line: &str) -> (&str, Option<&str>) {
    match line.find('$') {
        Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
        None => (line, None),
    }
}

/// Split an options list at commas that start a known option.
///
/// Commas inside a `domain=` list are kept, so
/// `domain=a.com,b.com,third-party` yields `domain=a.com,b.com` and
/// `third-party`.
pub fn split_options(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for (pos, _) in text.match_indices(',') {
        if starts_known_option(&text[pos + 1..]) {
            parts.push(&text[start..pos]);
            start = pos + 1;
        }
    }
    parts.push(&text[start..]);

    parts
}

fn starts_known_option(text: &str) -> bool {
    let text = text.strip_prefix('~').unwrap_or(text);
    BINARY_OPTIONS
        .iter()
        .chain(iter::once(&DOMAIN_OPTION))
        .any(|name| text.starts_with(name))
}

fn parse_options(raw_options: &[&str]) -> Result<RuleOptions, ParseError> {
    let mut options = RuleOptions::new();

    // An empty token stays an option named "" that no context supplies.
    for raw in raw_options {
        let (name, value) = parse_option(raw)?;
        options.insert(name, value);
    }

    Ok(options)
}

/// Parse a single option token.
pub fn parse_option(text: &str) -> Result<(String, OptionValue), ParseError> {
    if text.starts_with(DOMAIN_PREFIX) {
        let domains = parse_domain_option(text)?;
        return Ok((DOMAIN_OPTION.to_string(), OptionValue::Domains(domains)));
    }

    let (include, name) = parse_negation(text);
    Ok((name.to_string(), OptionValue::Bool(include)))
}

/// Parse `domain=a.com|~b.a.com` (`,` also separates) into ordered qualifiers.
pub fn parse_domain_option(text: &str) -> Result<Vec<DomainQualifier>, ParseError> {
    let value = text
        .strip_prefix(DOMAIN_PREFIX)
        .ok_or_else(|| ParseError::MalformedDomainOption(text.to_string()))?;

    let domains: Vec<DomainQualifier> = value
        .split(['|', ','])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (include, domain) = parse_negation(part);
            DomainQualifier::new(include, domain)
        })
        .collect();

    if domains.is_empty() {
        return Err(ParseError::EmptyDomainList);
    }

    Ok(domains)
}

fn parse_negation(text: &str) -> (bool, &str) {
    (!text.starts_with('~'), text.trim_start_matches('~'))
}

fn to_owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
