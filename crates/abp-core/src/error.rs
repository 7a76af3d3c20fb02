//! Error types for rule parsing and rule set construction.

/// Error raised while parsing a single filter line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Empty rule pattern")]
    EmptyPattern,
    #[error("Malformed domain option: {0}")]
    MalformedDomainOption(String),
    #[error("Domain option lists no domains")]
    EmptyDomainList,
    #[error("Regex rule has no alphanumeric content")]
    EmptyRegex,
    #[error("Invalid regex rule {pattern}: {source}")]
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

/// Error type for building and querying rule sets.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid rule {line:?}: {source}")]
    Parse { line: String, source: ParseError },
    /// A rule was evaluated against a context that lacks one of its options.
    #[error("Rule requires option {0}")]
    UnsupportedOption(String),
    #[error("Matcher construction failed: {0}")]
    EngineConstruction(#[from] regex::Error),
}

impl FilterError {
    pub fn parse(line: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            line: line.into(),
            source,
        }
    }
}
