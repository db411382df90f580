//! Category extractor trait and the table-driven implementation.

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::trace;

use crate::error::Result;
use crate::pattern;
use crate::tag::{generate_regex_tag, TypeTag};
use crate::types::{Category, ExtractResult};

/// A producer of candidate spans for one category of temporal expression.
///
/// Implementations must only return spans inside `text` and on character
/// boundaries; the merge engine trusts them.
pub trait DateTimeExtractor: Send + Sync {
    /// Category assigned to every span this extractor produces.
    fn category(&self) -> Category;

    /// Scan `text` and return candidate spans in the order found.
    fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult>;
}

/// Extractor driven by an ordered table of named regexes.
///
/// Each pattern is registered with its own [`TypeTag`]. When matches from
/// different patterns overlap, the longest wins and equal lengths go to the
/// pattern registered first.
pub struct RegexExtractor {
    category: Category,
    patterns: Vec<(TypeTag, Regex)>,
}

impl RegexExtractor {
    /// Compile a pattern table. Tags are named `{base_name}{suffix}`.
    pub fn new(category: Category, base_name: &str, table: &[(&str, &str)]) -> Result<Self> {
        let patterns = table
            .iter()
            .map(|(suffix, source)| {
                let tag = generate_regex_tag(base_name, suffix);
                pattern::compile(&tag.name, source).map(|regex| (tag, regex))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { category, patterns })
    }

    /// Tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.patterns.iter().map(|(tag, _)| tag)
    }
}

impl DateTimeExtractor for RegexExtractor {
    fn category(&self) -> Category {
        self.category
    }

    fn extract(&self, text: &str, _reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut candidates: Vec<(usize, usize, &TypeTag)> = Vec::new();
        for (tag, regex) in &self.patterns {
            for m in regex.find_iter(text) {
                if !m.as_str().trim().is_empty() {
                    candidates.push((m.start(), m.end(), tag));
                }
            }
        }

        // start ascending, longer first, then earlier registration
        candidates.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
        });

        let mut results = Vec::new();
        let mut last_end = 0;
        for (start, end, tag) in candidates {
            if start < last_end {
                continue;
            }
            results.push(
                ExtractResult::from_source(text, start, end - start, self.category)
                    .with_tag(tag.clone()),
            );
            last_end = end;
        }

        trace!(category = %self.category, found = results.len(), "table extraction");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_tags_follow_table_order() {
        let ex = RegexExtractor::new(
            Category::Time,
            "timeTest",
            &[("A", r"\d+pm"), ("B", r"\d+am")],
        )
        .unwrap();
        let tags: Vec<_> = ex.tags().collect();
        assert_eq!(tags[0].name, "timeTestA");
        assert_eq!(tags[1].name, "timeTestB");
        assert!(tags[0].priority < tags[1].priority);
    }

    #[test]
    fn test_longest_match_wins_inside_table() {
        let ex = RegexExtractor::new(
            Category::Date,
            "dateTest",
            &[("Day", r"\bfriday\b"), ("NextDay", r"\bnext friday\b")],
        )
        .unwrap();
        let spans = ex.extract("see you next friday", reference());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "next friday");
        assert_eq!(spans[0].tag.as_ref().unwrap().name, "dateTestNextDay");
    }

    #[test]
    fn test_equal_length_goes_to_earlier_pattern() {
        let ex = RegexExtractor::new(
            Category::Time,
            "timeTie",
            &[("First", r"\d{2}:\d{2}"), ("Second", r"\d\d:\d\d")],
        )
        .unwrap();
        let spans = ex.extract("at 10:30", reference());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].tag.as_ref().unwrap().name, "timeTieFirst");
    }

    #[test]
    fn test_case_insensitive_with_original_offsets() {
        let ex = RegexExtractor::new(Category::Holiday, "holidayTest", &[("Xmas", r"christmas")])
            .unwrap();
        let spans = ex.extract("Merry CHRISTMAS!", reference());
        assert_eq!(spans[0].start, 6);
        assert_eq!(spans[0].text, "CHRISTMAS");
    }

    #[test]
    fn test_non_overlapping_matches_all_kept() {
        let ex = RegexExtractor::new(Category::Time, "timeMulti", &[("Clock", r"\d{1,2}pm")])
            .unwrap();
        let spans = ex.extract("3pm or 5pm", reference());
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["3pm", "5pm"]);
    }
}
