//! Core type definitions for ABP rules
//!
//! These types describe a parsed rule's option requirements and the
//! caller-supplied context they are evaluated against.

use std::collections::HashMap;

// =============================================================================
// Known Options
// =============================================================================

/// Boolean options recognised by the parser.
///
/// Only these names (plus [`DOMAIN_OPTION`]) split an options list; a comma
/// followed by anything else stays inside the current option value.
pub const BINARY_OPTIONS: &[&str] = &[
    "script",
    "image",
    "stylesheet",
    "object",
    "xmlhttprequest",
    "object-subrequest",
    "subdocument",
    "document",
    "elemhide",
    "other",
    "background",
    "xbl",
    "ping",
    "dtd",
    "media",
    "third-party",
    "match-case",
    "collapse",
    "donottrack",
];

/// Name of the domain-list option.
pub const DOMAIN_OPTION: &str = "domain";

/// Accepted but never enforced.
pub const MATCH_CASE_OPTION: &str = "match-case";

// =============================================================================
// Rule Kind
// =============================================================================

/// Classification of a filter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `! ...` or `[Adblock ...]` header
    Comment,
    /// Element hiding rule (`##` / `#@#`), inert for URL matching
    Cosmetic,
    /// URL blocking or exception rule
    Network,
}

// =============================================================================
// Rule Options
// =============================================================================

/// One entry of a `$domain=` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainQualifier {
    /// `false` when the domain was written with a `~` prefix
    pub include: bool,
    pub domain: String,
}

impl DomainQualifier {
    pub fn new(include: bool, domain: impl Into<String>) -> Self {
        Self {
            include,
            domain: domain.into(),
        }
    }
}

/// Value a rule requires for one option.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
    /// `name` or `~name`
    Bool(bool),
    /// `domain=a.com|~b.a.com`, in input order
    Domains(Vec<DomainQualifier>),
}

/// Ordered option requirements of a rule.
///
/// Setting an option twice keeps its first position and the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RuleOptions {
    entries: Vec<(String, OptionValue)>,
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, OptionValue)> for RuleOptions {
    fn from_iter<I: IntoIterator<Item = (S, OptionValue)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (name, value) in iter {
            options.insert(name, value);
        }
        options
    }
}

// =============================================================================
// Request Context
// =============================================================================

/// Value supplied by the caller for one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    Bool(bool),
    /// Originating page domain, checked against `$domain=` lists
    Domain(String),
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Domain(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Domain(value)
    }
}

/// Attributes of a request being matched, keyed by option name.
///
/// Only the keys present here are considered supplied; a rule requiring any
/// other option cannot be evaluated against this context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    values: HashMap<String, ContextValue>,
}

impl RequestContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a boolean option such as `third-party` or `script`.
    pub fn with_option(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    /// Set the originating domain used by `$domain=` rules.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.set(DOMAIN_OPTION, ContextValue::Domain(domain.into()));
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ContextValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.values.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
