//! AdBlock pattern to regex translation.
//!
//! Every group emitted here is non-capturing so that any number of compiled
//! patterns can be OR-joined into one regex.

use regex::RegexBuilder;

use abp_core::ParseError;

/// `^` separator: anything but a letter, digit or `_ - . %`, or the end.
const SEPARATOR: &str = r"(?:[^\w\d_\-.%]|$)";

/// `||` anchor: optional scheme, then optional subdomains (RFC 3986 appendix B).
const HOSTNAME_ANCHOR: &str = r"^(?:[^:/?#]+:)?(?://(?:[^/?#]*\.)?)?";

/// Translate a rule's pattern source into a regex.
///
/// `/body/` sources are regex literals and are passed through unchanged
/// after validation.
pub fn compile_pattern(source: &str) -> Result<String, ParseError> {
    if source.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    if let Some(body) = regex_literal_body(source) {
        return compile_regex_literal(body);
    }

    let (rest, end_anchor) = match source.strip_suffix('|') {
        Some(rest) => (rest, true),
        None => (source, false),
    };

    let mut regex = String::with_capacity(source.len() * 2);

    let body = match rest.strip_prefix("||") {
        Some(host) if !host.is_empty() || end_anchor => {
            regex.push_str(HOSTNAME_ANCHOR);
            host
        }
        _ => match rest.strip_prefix('|') {
            Some(body) => {
                regex.push('^');
                body
            }
            None => rest,
        },
    };

    for ch in body.chars() {
        match ch {
            '.' | '$' | '+' | '?' | '{' | '}' | '(' | ')' | '[' | ']' | '\\' | '|' => {
                regex.push('\\');
                regex.push(ch);
            }
            '^' => regex.push_str(SEPARATOR),
            '*' => regex.push_str(".*"),
            _ => regex.push(ch),
        }
    }

    if end_anchor {
        regex.push('$');
    }

    Ok(regex)
}

fn regex_literal_body(source: &str) -> Option<&str> {
    if source.len() >= 2 && source.starts_with('/') && source.ends_with('/') {
        Some(&source[1..source.len() - 1])
    } else {
        None
    }
}

fn compile_regex_literal(body: &str) -> Result<String, ParseError> {
    if !body.chars().any(char::is_alphanumeric) {
        return Err(ParseError::EmptyRegex);
    }

    RegexBuilder::new(body)
        .case_insensitive(true)
        .build()
        .map_err(|source| ParseError::InvalidRegex {
            pattern: body.to_string(),
            source,
        })?;

    Ok(body.to_string())
}
