//! A single parsed filter rule and its option evaluator.

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};

use crate::domain::domain_variants;
use crate::error::FilterError;
use crate::types::{
    ContextValue, DomainQualifier, OptionValue, RequestContext, RuleKind, RuleOptions,
    MATCH_CASE_OPTION,
};

// =============================================================================
// URL Pattern
// =============================================================================

/// Compiled URL matcher of a network rule.
///
/// Holds the regex source produced by the pattern compiler; the regex itself
/// is compiled on first use and cached.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    regex: String,
    compiled: OnceCell<Regex>,
}

impl UrlPattern {
    pub fn new(source: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            regex: regex.into(),
            compiled: OnceCell::new(),
        }
    }

    /// Pattern text as written in the rule (anchors included, options removed).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Regex source, non-capturing only.
    pub fn as_regex(&self) -> &str {
        &self.regex
    }

    /// Compile (once) and return the case-insensitive matcher.
    pub fn compiled(&self) -> Result<&Regex, FilterError> {
        self.compiled
            .get_or_try_init(|| RegexBuilder::new(&self.regex).case_insensitive(true).build())
            .map_err(FilterError::from)
    }

    /// Search the URL anywhere for the pattern.
    pub fn is_match(&self, url: &str) -> Result<bool, FilterError> {
        Ok(self.compiled()?.is_match(url))
    }
}

// =============================================================================
// Rule
// =============================================================================

/// One parsed filter line.
#[derive(Debug, Clone)]
pub struct Rule {
    raw_text: String,
    kind: RuleKind,
    is_exception: bool,
    raw_options: Vec<String>,
    options: RuleOptions,
    pattern: Option<UrlPattern>,
}

impl Rule {
    pub fn comment(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            kind: RuleKind::Comment,
            is_exception: false,
            raw_options: Vec::new(),
            options: RuleOptions::new(),
            pattern: None,
        }
    }

    pub fn cosmetic(
        raw_text: impl Into<String>,
        is_exception: bool,
        raw_options: Vec<String>,
        options: RuleOptions,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            kind: RuleKind::Cosmetic,
            is_exception,
            raw_options,
            options,
            pattern: None,
        }
    }

    pub fn network(
        raw_text: impl Into<String>,
        is_exception: bool,
        raw_options: Vec<String>,
        options: RuleOptions,
        pattern: UrlPattern,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            kind: RuleKind::Network,
            is_exception,
            raw_options,
            options,
            pattern: Some(pattern),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn is_comment(&self) -> bool {
        self.kind == RuleKind::Comment
    }

    pub fn is_cosmetic(&self) -> bool {
        self.kind == RuleKind::Cosmetic
    }

    pub fn is_exception(&self) -> bool {
        self.is_exception
    }

    pub fn options(&self) -> &RuleOptions {
        &self.options
    }

    /// Option tokens as split from the options text.
    pub fn raw_options(&self) -> &[String] {
        &self.raw_options
    }

    pub fn pattern(&self) -> Option<&UrlPattern> {
        self.pattern.as_ref()
    }

    /// Regex source of the URL matcher, if this rule has one.
    pub fn regex(&self) -> Option<&str> {
        self.pattern.as_ref().map(UrlPattern::as_regex)
    }

    /// Whether every option this rule requires can be supplied by `ctx`.
    pub fn matching_supported(&self, ctx: &RequestContext) -> bool {
        self.matching_supported_by(|name| ctx.contains_key(name))
    }

    /// Whether every required option (`match-case` aside) satisfies `has_option`.
    pub fn matching_supported_by<F>(&self, has_option: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self.kind {
            RuleKind::Comment | RuleKind::Cosmetic => false,
            RuleKind::Network => self
                .options
                .names()
                .filter(|name| *name != MATCH_CASE_OPTION)
                .all(has_option),
        }
    }

    /// Check options against `ctx`, then search the URL.
    ///
    /// Fails with [`FilterError::UnsupportedOption`] when `ctx` lacks a
    /// required option; check [`Rule::matching_supported`] first to avoid it.
    pub fn matches(&self, url: &str, ctx: &RequestContext) -> Result<bool, FilterError> {
        let pattern = match (self.kind, &self.pattern) {
            (RuleKind::Network, Some(pattern)) => pattern,
            _ => return Ok(false),
        };

        for (name, required) in self.options.iter() {
            if name == MATCH_CASE_OPTION {
                continue;
            }

            let supplied = ctx
                .get(name)
                .ok_or_else(|| FilterError::UnsupportedOption(name.to_string()))?;

            let passed = match (required, supplied) {
                (OptionValue::Domains(qualifiers), ContextValue::Domain(domain)) => {
                    domain_allowed(qualifiers, domain)
                }
                (OptionValue::Bool(required), ContextValue::Bool(supplied)) => required == supplied,
                _ => false,
            };
            if !passed {
                return Ok(false);
            }
        }

        pattern.is_match(url)
    }
}

/// Resolve `domain` against a `$domain=` list, most specific suffix first.
///
/// A domain with no matching qualifier is not allowed.
fn domain_allowed(qualifiers: &[DomainQualifier], domain: &str) -> bool {
    for candidate in domain_variants(domain) {
        if let Some(qualifier) = qualifiers
            .iter()
            .rev()
            .find(|q| q.domain.eq_ignore_ascii_case(candidate))
        {
            return qualifier.include;
        }
    }
    false
}
