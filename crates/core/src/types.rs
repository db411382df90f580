//! Core types for tempex.
//!
//! These types describe candidate spans as they flow from the category
//! extractors through the merge engine to the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::tag::TypeTag;

/// Kind of temporal expression a span was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "daterange")]
    DatePeriod,
    #[serde(rename = "datetime")]
    DateTime,
    #[serde(rename = "timerange")]
    TimePeriod,
    #[serde(rename = "datetimerange")]
    DateTimePeriod,
    #[serde(rename = "set")]
    Set,
    #[serde(rename = "holiday")]
    Holiday,
}

impl Category {
    /// Stable identifier used in output and pattern tag names.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::DatePeriod => "daterange",
            Self::DateTime => "datetime",
            Self::TimePeriod => "timerange",
            Self::DateTimePeriod => "datetimerange",
            Self::Set => "set",
            Self::Holiday => "holiday",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Meaning of a modifier word attached to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    Before,
    After,
    Until,
    Since,
}

/// Where a modifier word sits relative to the span it modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierPosition {
    /// The word precedes the span ("since 3pm").
    Prefix,
    /// The word follows the span ("3時以降").
    Suffix,
}

/// Fixed reference points that need no calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeReference {
    #[serde(rename = "PRESENT_REF")]
    Present,
    #[serde(rename = "PAST_REF")]
    Past,
    #[serde(rename = "FUTURE_REF")]
    Future,
}

impl TimeReference {
    /// Normalized reference code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Present => "PRESENT_REF",
            Self::Past => "PAST_REF",
            Self::Future => "FUTURE_REF",
        }
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A candidate span proposed by an extractor.
///
/// Offsets are byte offsets into the source text. `text` always equals
/// `source[start..start + length]`; spans are only ever grown through
/// [`ExtractResult::extended`], which re-slices the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    pub start: usize,
    pub length: usize,
    pub text: String,
    pub category: Category,
    /// Pattern that produced the span, when table-driven
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<TypeTag>,
    /// Modifiers attached during boundary extension, in application order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierKind>,
    /// Opaque per-category data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<JsonValue>,
}

impl ExtractResult {
    /// Build a span covering `source[start..start + length]`.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside `source` or splits a character.
    /// Extractors must never produce such spans.
    #[must_use]
    pub fn from_source(source: &str, start: usize, length: usize, category: Category) -> Self {
        Self {
            start,
            length,
            text: slice(source, start, start + length).to_string(),
            category,
            tag: None,
            modifiers: Vec::new(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: TypeTag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Exclusive end offset.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Half-open range intersection.
    #[must_use]
    pub fn overlaps(&self, other: &ExtractResult) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Return a copy grown to `[start, end)` with `modifier` recorded.
    ///
    /// The new range must contain the current one.
    #[must_use]
    pub fn extended(&self, source: &str, start: usize, end: usize, modifier: ModifierKind) -> Self {
        debug_assert!(start <= self.start && end >= self.end());
        let mut modifiers = self.modifiers.clone();
        modifiers.push(modifier);
        Self {
            start,
            length: end - start,
            text: slice(source, start, end).to_string(),
            category: self.category,
            tag: self.tag.clone(),
            modifiers,
            payload: self.payload.clone(),
        }
    }
}

fn slice(source: &str, start: usize, end: usize) -> &str {
    assert!(
        start <= end && end <= source.len(),
        "span {start}..{end} is outside text of length {}",
        source.len()
    );
    &source[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_slices_text() {
        let span = ExtractResult::from_source("meet at 10pm", 8, 4, Category::Time);
        assert_eq!(span.text, "10pm");
        assert_eq!(span.end(), 12);
    }

    #[test]
    fn test_overlap_is_half_open() {
        let source = "abcdefghij";
        let a = ExtractResult::from_source(source, 0, 4, Category::Date);
        let b = ExtractResult::from_source(source, 4, 3, Category::Time);
        let c = ExtractResult::from_source(source, 3, 2, Category::Time);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_extended_reslices_and_records_modifier() {
        let source = "meeting before 10pm";
        let span = ExtractResult::from_source(source, 15, 4, Category::Time);
        let grown = span.extended(source, 8, 19, ModifierKind::Before);
        assert_eq!(grown.text, "before 10pm");
        assert_eq!(grown.start, 8);
        assert_eq!(grown.length, 11);
        assert_eq!(grown.modifiers, vec![ModifierKind::Before]);
        // original untouched
        assert_eq!(span.text, "10pm");
    }

    #[test]
    #[should_panic(expected = "outside text")]
    fn test_out_of_bounds_span_panics() {
        let _ = ExtractResult::from_source("short", 3, 10, Category::Date);
    }

    #[test]
    fn test_category_ids() {
        assert_eq!(Category::DatePeriod.to_string(), "daterange");
        assert_eq!(
            serde_json::to_string(&Category::DateTimePeriod).unwrap(),
            "\"datetimerange\""
        );
    }

    #[test]
    fn test_time_reference_codes() {
        assert_eq!(TimeReference::Present.code(), "PRESENT_REF");
        assert_eq!(
            serde_json::to_string(&TimeReference::Future).unwrap(),
            "\"FUTURE_REF\""
        );
    }
}
