//! Modifier and blacklist rules supplied by a locale to the merge engine.

use regex::Regex;

use crate::error::Result;
use crate::pattern;
use crate::types::{ExtractResult, ModifierKind, ModifierPosition};

/// A context word ("before", "since", "以降") that grows a span when it
/// sits directly next to it.
#[derive(Debug, Clone)]
pub struct ModifierRule {
    pub kind: ModifierKind,
    pub position: ModifierPosition,
    regex: Regex,
}

impl ModifierRule {
    /// Rule for a word that precedes the span. Matches at the end of the
    /// text before the span.
    pub fn prefix(kind: ModifierKind, source: &str) -> Result<Self> {
        let name = format!("modifier{kind:?}Prefix");
        Ok(Self {
            kind,
            position: ModifierPosition::Prefix,
            regex: pattern::compile_end(&name, source)?,
        })
    }

    /// Rule for a word that follows the span. Matches at the beginning of
    /// the text after the span.
    pub fn suffix(kind: ModifierKind, source: &str) -> Result<Self> {
        let name = format!("modifier{kind:?}Suffix");
        Ok(Self {
            kind,
            position: ModifierPosition::Suffix,
            regex: pattern::compile_begin(&name, source)?,
        })
    }

    /// Bytes of `after` consumed by the modifier, including the whitespace
    /// between the span and the word.
    pub fn match_suffix(&self, after: &str) -> Option<usize> {
        if self.position != ModifierPosition::Suffix {
            return None;
        }
        self.regex
            .find(after)
            .filter(|m| !m.as_str().trim().is_empty())
            .map(|m| m.end())
    }

    /// Offset in `before` where the modifier word starts.
    pub fn match_prefix(&self, before: &str) -> Option<usize> {
        if self.position != ModifierPosition::Prefix {
            return None;
        }
        self.regex
            .find(before)
            .filter(|m| !m.as_str().trim().is_empty())
            .map(|m| m.start())
    }
}

/// A known false-positive shape.
#[derive(Debug, Clone)]
pub enum BlacklistRule {
    /// Rejects spans whose text matches.
    Pattern(Regex),
    /// Rejects spans for which the function returns true, given the full text.
    Predicate(fn(&ExtractResult, &str) -> bool),
}

impl BlacklistRule {
    pub fn pattern(name: &str, source: &str) -> Result<Self> {
        pattern::compile(name, source).map(Self::Pattern)
    }

    #[must_use]
    pub fn rejects(&self, span: &ExtractResult, text: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(&span.text),
            Self::Predicate(check) => check(span, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_prefix_rule_finds_word_start() {
        let rule = ModifierRule::prefix(ModifierKind::Before, r"\bbefore\b").unwrap();
        assert_eq!(rule.match_prefix("meeting before "), Some(8));
        assert_eq!(rule.match_prefix("before the meeting "), None);
        assert_eq!(rule.match_suffix(" before"), None);
    }

    #[test]
    fn test_suffix_rule_counts_leading_space() {
        let rule = ModifierRule::suffix(ModifierKind::Since, r"\bonwards\b").unwrap();
        assert_eq!(rule.match_suffix(" onwards please"), Some(8));
        assert_eq!(rule.match_suffix(" and onwards"), None);
    }

    #[test]
    fn test_blacklist_pattern_and_predicate() {
        let text = "the 2nd";
        let span = ExtractResult::from_source(text, 4, 3, Category::Date);

        let pattern = BlacklistRule::pattern("ordinal", r"^\d{1,2}(?:st|nd|rd|th)$").unwrap();
        assert!(pattern.rejects(&span, text));

        let predicate = BlacklistRule::Predicate(|span, text| span.end() == text.len());
        assert!(predicate.rejects(&span, text));
    }
}
