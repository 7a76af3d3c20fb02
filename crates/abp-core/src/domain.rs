//! Domain suffix walking for `$domain=` resolution.
//!
//! # Examples
//!
//! ```
//! use abp_core::domain::domain_variants;
//!
//! let variants: Vec<&str> = domain_variants("foo.bar.example.com").collect();
//! assert_eq!(variants, ["foo.bar.example.com", "bar.example.com", "example.com"]);
//! ```

/// Iterator over the suffixes of a domain that still contain a dot.
pub struct DomainVariants<'a> {
    current: Option<&'a str>,
}

impl<'a> Iterator for DomainVariants<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let dot = current.find('.')?;
        self.current = Some(&current[dot + 1..]);
        Some(current)
    }
}

/// Walk domain suffixes from most specific down to the last two labels.
///
/// Single-label domains yield nothing.
pub fn domain_variants(domain: &str) -> DomainVariants<'_> {
    DomainVariants {
        current: Some(domain),
    }
}
