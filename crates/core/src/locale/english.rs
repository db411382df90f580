//! English (`en-us`) locale.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::Weekday;

use super::rules::{BlacklistRule, ModifierRule};
use super::{
    cached, normalize, Locale, LocaleConfiguration, LocaleResources, ParserPatternSources,
    ParserPatterns,
};
use crate::error::Result;
use crate::extractor::{DateTimeExtractor, RegexExtractor};
use crate::types::{Category, ExtractResult, ModifierKind, TimeReference};

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december";
const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const AMOUNT: &str = r"\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|twelve|fifteen|twenty|thirty";
const UNITS: &str = r"years?|months?|weeks?|days?|hours?|minutes?|mins?|seconds?|secs?";
const CLOCK: &str = r"\d{1,2}(?::\d{2})?(?:\s*(?:am|pm)\b|\s*[ap]\.m\.|\b)";

pub struct EnglishConfiguration {
    resources: LocaleResources,
}

pub(super) fn configuration() -> Result<&'static dyn LocaleConfiguration> {
    static CONFIG: OnceLock<Result<EnglishConfiguration>> = OnceLock::new();
    cached(CONFIG.get_or_init(EnglishConfiguration::build))
}

impl EnglishConfiguration {
    fn build() -> Result<Self> {
        Ok(Self {
            resources: LocaleResources {
                extractors: extractors()?,
                patterns: ParserPatterns::compile("English", &PATTERNS)?,
                modifiers: modifiers()?,
                blacklist: vec![
                    BlacklistRule::pattern("EnglishOrdinalDay", r"^\d{1,2}(?:st|nd|rd|th)$")?,
                    BlacklistRule::Predicate(is_age),
                    BlacklistRule::Predicate(is_modal_may),
                ],
                unit_map: HashMap::from([
                    ("year", "Y"),
                    ("years", "Y"),
                    ("yearly", "Y"),
                    ("annually", "Y"),
                    ("month", "MON"),
                    ("months", "MON"),
                    ("monthly", "MON"),
                    ("week", "W"),
                    ("weeks", "W"),
                    ("weekly", "W"),
                    ("day", "D"),
                    ("days", "D"),
                    ("daily", "D"),
                    ("hour", "H"),
                    ("hours", "H"),
                    ("hourly", "H"),
                    ("minute", "M"),
                    ("minutes", "M"),
                    ("min", "M"),
                    ("mins", "M"),
                    ("second", "S"),
                    ("seconds", "S"),
                    ("sec", "S"),
                    ("secs", "S"),
                ]),
                numbers: HashMap::from([
                    ("a", 1),
                    ("an", 1),
                    ("one", 1),
                    ("two", 2),
                    ("three", 3),
                    ("four", 4),
                    ("five", 5),
                    ("six", 6),
                    ("seven", 7),
                    ("eight", 8),
                    ("nine", 9),
                    ("ten", 10),
                    ("twelve", 12),
                    ("fifteen", 15),
                    ("twenty", 20),
                    ("thirty", 30),
                ]),
                day_offsets: vec![
                    ("the day after tomorrow", 2),
                    ("the day before yesterday", -2),
                    ("tomorrow", 1),
                    ("yesterday", -1),
                    ("today", 0),
                ],
                weekdays: vec![
                    ("monday", Weekday::Mon),
                    ("tuesday", Weekday::Tue),
                    ("wednesday", Weekday::Wed),
                    ("thursday", Weekday::Thu),
                    ("friday", Weekday::Fri),
                    ("saturday", Weekday::Sat),
                    ("sunday", Weekday::Sun),
                ],
                months: MONTHS.split('|').zip(1..).collect(),
                day_parts: vec![
                    ("morning", 8, 12),
                    ("afternoon", 12, 16),
                    ("evening", 16, 20),
                    ("tonight", 20, 24),
                    ("night", 20, 24),
                ],
                token_before_date: "on ",
                token_before_time: "at ",
            },
        })
    }
}

const PATTERNS: ParserPatternSources = ParserPatternSources {
    now: r"\b(?:right\s+now|now|currently|at\s+the\s+moment)\b",
    simple_time_of_today_after: r"\d{1,2}(?::\d{2})?\s*(?:am|pm)?\s+(?:tonight|this\s+(?:morning|afternoon|evening))\b",
    simple_time_of_today_before: r"\b(?:tonight|this\s+(?:morning|afternoon|evening))\s+(?:at\s+)?\d{1,2}",
    specific_time_of_day: r"\b(?:morning|afternoon|evening|night|tonight)\b",
    specific_end_of: r"\bend\s+of\s+(?:the\s+|this\s+)?(?:week|month|year)\b",
    unspecific_end_of: r"\b(?:eod|end\s+of\s+(?:the\s+)?day)\b",
    unit: r"\b(?:years?|yearly|annually|months?|monthly|weeks?|weekly|days?|daily|hours?|hourly|minutes?|mins?|seconds?|secs?)\b",
    date_number_connector: r"^(?:st|nd|rd|th)?\s*(?:of\s+)?(?:the\s+)?$",
    preposition: r"\b(?:at|on|in|by)\b",
    am_time: r"(?:\b|\d)am\b|(?:\b|\d)a\.m\.|\bmorning\b",
    pm_time: r"(?:\b|\d)pm\b|(?:\b|\d)p\.m\.|\b(?:afternoon|evening|night|tonight)\b",
};

fn extractors() -> Result<Vec<Box<dyn DateTimeExtractor>>> {
    let day_word = format!(
        r"today|tomorrow|yesterday|tonight|this\s+(?:morning|afternoon|evening)|(?:(?:next|last|this)\s+)?(?:{WEEKDAYS})"
    );

    let date = RegexExtractor::new(
        Category::Date,
        "EnglishDate",
        &[
            ("Iso", r"\b\d{4}-\d{1,2}-\d{1,2}\b"),
            (
                "RelativeDay",
                r"\b(?:the\s+day\s+after\s+tomorrow|the\s+day\s+before\s+yesterday|today|tomorrow|yesterday)\b",
            ),
            (
                "Weekday",
                format!(
                    r"\b(?:(?:next|last|this|following|upcoming|previous|past)\s+)?(?:{WEEKDAYS})\b"
                ).as_str(),
            ),
            (
                "MonthDay",
                format!(r"\b(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?\b").as_str(),
            ),
            (
                "DayOfMonth",
                format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:{MONTHS})\b").as_str(),
            ),
            ("Ordinal", r"\b\d{1,2}(?:st|nd|rd|th)\b"),
            (
                "EndOf",
                r"\bend\s+of\s+(?:the\s+|this\s+)?(?:week|month|year)\b",
            ),
        ],
    )?;

    let time = RegexExtractor::new(
        Category::Time,
        "EnglishTime",
        &[
            ("Meridiem", r"\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b"),
            ("DottedMeridiem", r"\b\d{1,2}(?::\d{2})?\s*[ap]\.m\."),
            ("Clock", r"\b\d{1,2}:\d{2}(?::\d{2})?\b"),
            ("OClock", r"\b\d{1,2}\s+o'clock\b"),
        ],
    )?;

    let duration = RegexExtractor::new(
        Category::Duration,
        "EnglishDuration",
        &[("Amount", format!(r"\b(?:{AMOUNT})\s+(?:{UNITS})\b").as_str())],
    )?;

    let date_period = RegexExtractor::new(
        Category::DatePeriod,
        "EnglishDatePeriod",
        &[
            (
                "RelativeUnit",
                r"\b(?:this|next|last|previous|following|coming|upcoming|past)\s+(?:week|month|year)\b",
            ),
            ("Month", format!(r"\b(?:{MONTHS})\b").as_str()),
        ],
    )?;

    let date_time = RegexExtractor::new(
        Category::DateTime,
        "EnglishDateTime",
        &[
            ("Now", r"\b(?:right\s+now|now|currently|at\s+the\s+moment)\b"),
            ("Past", r"\b(?:recently|previously|lately)\b"),
            ("Future", r"\b(?:as\s+soon\s+as\s+possible|asap)\b"),
            (
                "DayAtTime",
                format!(r"\b(?:{day_word})\s+(?:at\s+)?{CLOCK}").as_str(),
            ),
            (
                "TimeOnDay",
                format!(
                    r"\b\d{{1,2}}(?::\d{{2}})?\s*(?:am|pm)?\s+(?:{day_word})\b"
                ).as_str(),
            ),
            (
                "Iso",
                r"\b\d{4}-\d{1,2}-\d{1,2}[t\s]\d{1,2}:\d{2}(?::\d{2})?\b",
            ),
            ("EndOfDay", r"\b(?:eod|end\s+of\s+(?:the\s+)?day)\b"),
        ],
    )?;

    let time_period = RegexExtractor::new(
        Category::TimePeriod,
        "EnglishTimePeriod",
        &[
            (
                "FromTo",
                format!(r"\b(?:from\s+)?{CLOCK}\s*(?:to|until|till|through)\s+{CLOCK}").as_str(),
            ),
            ("Between", format!(r"\bbetween\s+{CLOCK}\s*and\s+{CLOCK}").as_str()),
            (
                "DayPart",
                r"\b(?:in\s+the\s+)?(?:morning|afternoon|evening)\b|\bat\s+night\b",
            ),
        ],
    )?;

    let date_time_period = RegexExtractor::new(
        Category::DateTimePeriod,
        "EnglishDateTimePeriod",
        &[(
            "DayPart",
            r"\b(?:tonight|last\s+night|(?:this|today|tomorrow|yesterday)\s+(?:morning|afternoon|evening|night))\b",
        )],
    )?;

    let set = RegexExtractor::new(
        Category::Set,
        "EnglishSet",
        &[
            (
                "Every",
                r"\bevery\s+(?:\d+\s+)?(?:years?|months?|weeks?|days?|hours?|minutes?)\b",
            ),
            ("Adverb", r"\b(?:daily|weekly|monthly|yearly|annually|hourly)\b"),
        ],
    )?;

    let holiday = RegexExtractor::new(
        Category::Holiday,
        "EnglishHoliday",
        &[
            ("Christmas", r"\bchristmas(?:\s+(?:day|eve))?\b"),
            ("NewYear", r"\bnew\s+year'?s(?:\s+(?:day|eve))?\b"),
            ("Halloween", r"\bhalloween\b"),
            ("Thanksgiving", r"\bthanksgiving(?:\s+day)?\b"),
            ("Valentine", r"\bvalentine'?s\s+day\b"),
            ("Independence", r"\bindependence\s+day\b"),
            ("Easter", r"\beaster(?:\s+(?:sunday|monday))?\b"),
        ],
    )?;

    Ok(vec![
        Box::new(date),
        Box::new(time),
        Box::new(duration),
        Box::new(date_period),
        Box::new(date_time),
        Box::new(time_period),
        Box::new(date_time_period),
        Box::new(set),
        Box::new(holiday),
    ])
}

fn modifiers() -> Result<Vec<ModifierRule>> {
    Ok(vec![
        ModifierRule::suffix(ModifierKind::Before, r"\b(?:or\s+earlier|or\s+before)\b")?,
        ModifierRule::suffix(ModifierKind::Since, r"\b(?:onwards?|or\s+later|and\s+later)\b")?,
        ModifierRule::prefix(
            ModifierKind::Before,
            r"\b(?:before|no\s+later\s+than|by|prior\s+to)\b",
        )?,
        ModifierRule::prefix(
            ModifierKind::After,
            r"\b(?:after|later\s+than|no\s+earlier\s+than)\b",
        )?,
        ModifierRule::prefix(ModifierKind::Until, r"\b(?:until|till|til|up\s+to)\b")?,
        ModifierRule::prefix(
            ModifierKind::Since,
            r"\b(?:since|starting(?:\s+(?:from|on|at))?)\b",
        )?,
    ])
}

/// "3 years old" is an age, not a duration.
fn is_age(span: &ExtractResult, text: &str) -> bool {
    span.category == Category::Duration
        && text
            .get(span.end()..)
            .and_then(|rest| rest.split_whitespace().next())
            .is_some_and(|word| word.eq_ignore_ascii_case("old"))
}

/// A bare "may" left after the fold is the modal verb; "may 5" survives
/// as a longer date span.
fn is_modal_may(span: &ExtractResult, _text: &str) -> bool {
    span.text.eq_ignore_ascii_case("may")
}

impl LocaleConfiguration for EnglishConfiguration {
    fn locale(&self) -> Locale {
        Locale::English
    }

    fn resources(&self) -> &LocaleResources {
        &self.resources
    }

    fn resolve_ambiguous_hour(&self, text: &str, hour: u32) -> u32 {
        let patterns = self.patterns();
        if patterns.am_time.is_match(text) {
            if hour >= 12 {
                hour - 12
            } else {
                hour
            }
        } else if patterns.pm_time.is_match(text) && hour < 12 {
            hour + 12
        } else {
            hour
        }
    }

    fn match_fixed_time_reference(&self, text: &str) -> Option<TimeReference> {
        let text = normalize(text);
        if text.split(' ').next_back() == Some("now") {
            return Some(TimeReference::Present);
        }
        match text.as_str() {
            "recently" | "previously" | "lately" => Some(TimeReference::Past),
            "as soon as possible" | "asap" => Some(TimeReference::Future),
            _ => None,
        }
    }

    fn resolve_relative_direction(&self, text: &str) -> i32 {
        let text = normalize(text);
        let mut words = text.split(' ');
        let first = words.next().unwrap_or_default();
        let last = words.next_back().unwrap_or(first);
        let is = |set: &[&str]| set.contains(&first) || set.contains(&last);

        if is(&["next", "following", "upcoming", "coming"]) {
            1
        } else if is(&["last", "previous", "past"]) {
            -1
        } else {
            0
        }
    }

    /// A bare "may" is far more often the modal verb than the month.
    fn is_ambiguous_token(&self, _text: &str, matched: &str) -> bool {
        matched.trim().eq_ignore_ascii_case("may")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> &'static dyn LocaleConfiguration {
        configuration().unwrap()
    }

    #[test]
    fn test_hour_disambiguation() {
        let c = config();
        assert_eq!(c.resolve_ambiguous_hour("10pm", 10), 22);
        assert_eq!(c.resolve_ambiguous_hour("10 in the morning", 22), 10);
        assert_eq!(c.resolve_ambiguous_hour("12am", 12), 0);
        assert_eq!(c.resolve_ambiguous_hour("tonight at 8", 8), 20);
        assert_eq!(c.resolve_ambiguous_hour("at 8", 8), 8);
    }

    #[test]
    fn test_hour_disambiguation_is_idempotent() {
        let c = config();
        for text in ["8am", "8pm", "noon", "tonight"] {
            for hour in 0..24 {
                let once = c.resolve_ambiguous_hour(text, hour);
                assert!(once < 24);
                assert_eq!(c.resolve_ambiguous_hour(text, once), once, "{text} {hour}");
            }
        }
    }

    #[test]
    fn test_fixed_references() {
        let c = config();
        assert_eq!(c.match_fixed_time_reference(" Right NOW "), Some(TimeReference::Present));
        assert_eq!(c.match_fixed_time_reference("lately"), Some(TimeReference::Past));
        assert_eq!(c.match_fixed_time_reference("ASAP"), Some(TimeReference::Future));
        assert_eq!(c.match_fixed_time_reference("snow"), None);
        assert_eq!(c.match_fixed_time_reference("hello"), None);
    }

    #[test]
    fn test_relative_direction() {
        let c = config();
        assert_eq!(c.resolve_relative_direction("next friday"), 1);
        assert_eq!(c.resolve_relative_direction("Last Week"), -1);
        assert_eq!(c.resolve_relative_direction("friday"), 0);
        assert_eq!(c.resolve_relative_direction(""), 0);
    }

    #[test]
    fn test_may_is_ambiguous() {
        let c = config();
        assert!(c.is_ambiguous_token("I may go", "May"));
        assert!(!c.is_ambiguous_token("may 5", "may 5"));
    }

    #[test]
    fn test_age_predicate() {
        let text = "he is 3 years old";
        let span = ExtractResult::from_source(text, 6, 7, Category::Duration);
        assert!(is_age(&span, text));

        let text = "wait 3 years please";
        let span = ExtractResult::from_source(text, 5, 7, Category::Duration);
        assert!(!is_age(&span, text));
    }

    #[test]
    fn test_modal_may_never_leaves_the_engine() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let merged = crate::merge::MergedExtractor::new(config());

        assert!(merged.extract("may I come", reference).is_empty());
        assert!(merged.extract("I May be late", reference).is_empty());

        let spans = merged.extract("see you may 5", reference);
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["may 5"]);
    }

    #[test]
    fn test_months_are_numbered() {
        let months = &config().resources().months;
        assert_eq!(months.first(), Some(&("january", 1)));
        assert_eq!(months.last(), Some(&("december", 12)));
    }

    #[test]
    fn test_extracts_dates() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let spans = config()
            .date_extractor()
            .unwrap()
            .extract("see you next Friday or on march 3rd", reference);
        let texts: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["next Friday", "march 3rd"]);
    }
}
