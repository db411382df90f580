//! Regex helpers shared by extractors, modifier rules and locale matchers.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};

/// Compile a case-insensitive pattern, naming it in the error on failure.
///
/// Case folding happens in the regex engine rather than by lower-casing the
/// input, so byte offsets of matches stay valid for the original text.
pub fn compile(name: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            name: name.to_string(),
            source,
        })
}

/// Compile `pattern` so it only matches at the beginning of a text,
/// allowing leading whitespace.
pub fn compile_begin(name: &str, pattern: &str) -> Result<Regex> {
    compile(name, &format!(r"^\s*(?:{pattern})"))
}

/// Compile `pattern` so it only matches at the end of a text,
/// allowing trailing whitespace.
pub fn compile_end(name: &str, pattern: &str) -> Result<Regex> {
    compile(name, &format!(r"(?:{pattern})\s*$"))
}
