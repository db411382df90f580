//! Span merging and boundary extension.
//!
//! [`MergedExtractor`] runs every category extractor of a locale, folds the
//! candidate lists into one non-overlapping list, drops blacklisted spans
//! and grows the survivors over adjacent modifier words.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::locale::LocaleConfiguration;
use crate::types::{Category, ExtractResult, ModifierPosition};

/// Order in which category results are folded together. Earlier categories
/// win ties against later ones.
pub const CATEGORY_ORDER: [Category; 9] = [
    Category::Date,
    Category::Time,
    Category::Duration,
    Category::DatePeriod,
    Category::DateTime,
    Category::TimePeriod,
    Category::DateTimePeriod,
    Category::Set,
    Category::Holiday,
];

/// Combines the category extractors of one locale.
pub struct MergedExtractor<'a> {
    config: &'a dyn LocaleConfiguration,
}

impl<'a> MergedExtractor<'a> {
    pub fn new(config: &'a dyn LocaleConfiguration) -> Self {
        Self { config }
    }

    /// Extract every temporal span in `text`, ordered by start offset.
    pub fn extract(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        let mut spans = Vec::new();
        for category in CATEGORY_ORDER {
            let Some(extractor) = self.config.extractor(category) else {
                trace!(%category, "no extractor, skipping");
                continue;
            };
            add_to(&mut spans, extractor.extract(text, reference));
        }

        let spans = self.filter_blacklisted(text, spans);
        let mut spans = self.extend_with_modifiers(text, spans);
        spans.sort_by_key(|span| span.start);

        debug!(
            locale = %self.config.locale(),
            found = spans.len(),
            "merged extraction"
        );
        spans
    }

    fn filter_blacklisted(&self, text: &str, mut spans: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let blacklist = self.config.blacklist();
        spans.retain(|span| {
            let rejected = blacklist.iter().any(|rule| rule.rejects(span, text));
            if rejected {
                debug!(span = %span.text, category = %span.category, "blacklisted");
            }
            !rejected
        });
        spans
    }

    /// Grow spans over modifier words, left to right.
    ///
    /// Prefix words are only looked for after the end of the previous span,
    /// and suffix words only before the start of the next one, so a word is
    /// never claimed twice and spans stay disjoint.
    fn extend_with_modifiers(&self, text: &str, spans: Vec<ExtractResult>) -> Vec<ExtractResult> {
        let modifiers = self.config.modifiers();
        let mut extended = Vec::with_capacity(spans.len());
        let mut last_end = 0;

        let mut spans = spans.into_iter().peekable();
        while let Some(mut span) = spans.next() {
            let limit = spans.peek().map_or(text.len(), |next| next.start);

            for rule in modifiers {
                match rule.position {
                    ModifierPosition::Suffix => {
                        let after = &text[span.end()..limit.max(span.end())];
                        if let Some(len) = rule.match_suffix(after) {
                            span = span.extended(text, span.start, span.end() + len, rule.kind);
                        }
                    }
                    ModifierPosition::Prefix => {
                        let floor = last_end.min(span.start);
                        let before = &text[floor..span.start];
                        if let Some(offset) = rule.match_prefix(before) {
                            span = span.extended(text, floor + offset, span.end(), rule.kind);
                        }
                    }
                }
            }

            if !span.modifiers.is_empty() {
                trace!(span = %span.text, modifiers = ?span.modifiers, "extended");
            }
            last_end = span.end();
            extended.push(span);
        }

        extended
    }
}

/// Fold `src` into `dst`, keeping `dst` sorted and free of overlaps.
///
/// A new span replaces the spans it overlaps only when it is strictly longer
/// than the first of them. Spans it then fully covers from either edge are
/// dropped as well.
pub fn add_to(dst: &mut Vec<ExtractResult>, src: Vec<ExtractResult>) {
    for result in src {
        add_one(dst, result);
    }
}

fn add_one(dst: &mut Vec<ExtractResult>, result: ExtractResult) {
    let Some(index) = dst.iter().position(|e| e.overlaps(&result)) else {
        let at = dst.partition_point(|e| e.start <= result.start);
        dst.insert(at, result);
        return;
    };

    if result.length <= dst[index].length {
        trace!(kept = %dst[index].text, dropped = %result.text, "overlap, existing wins");
        return;
    }

    let mut end = index + 1;
    while end < dst.len() && dst[end].overlaps(&result) {
        end += 1;
    }
    dst.drain(index..end);

    let mut position = 0;
    let mut removed_before = 0;
    dst.retain(|e| {
        let subsumed = result.text.contains(e.text.as_str())
            && (e.start == result.start || e.end() == result.end());
        if subsumed && position < index {
            removed_before += 1;
        }
        position += 1;
        !subsumed
    });

    let at = (index - removed_before).min(dst.len());
    dst.insert(at, result);
}
