//! Resolution of merged spans into concrete values.
//!
//! The parsers here know nothing about any particular language. Every word
//! list, marker and direction rule comes from the [`LocaleConfiguration`]
//! the span was extracted with.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::locale::LocaleConfiguration;
use crate::types::{Category, ExtractResult, TimeReference};

/// A normalized temporal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resolution {
    Reference { reference: TimeReference },
    Date { date: NaiveDate },
    Time { time: NaiveTime },
    DateTime { datetime: NaiveDateTime },
    /// Half-open interval `[start, end)`
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Duration { seconds: i64 },
    /// Recurrence period, e.g. `P1W` or `PT1H`
    Set { period: String },
    Holiday { name: String },
}

impl Resolution {
    /// Short description using the locale's date and time connectors.
    pub fn describe(&self, config: &dyn LocaleConfiguration) -> String {
        let on = config.token_before_date();
        let at = config.token_before_time();
        match self {
            Self::Reference { reference } => reference.code().to_string(),
            Self::Date { date } => format!("{on}{}", date.format("%Y-%m-%d")),
            Self::Time { time } => format!("{at}{}", time.format("%H:%M")),
            Self::DateTime { datetime } => format!(
                "{on}{} {at}{}",
                datetime.format("%Y-%m-%d"),
                datetime.format("%H:%M")
            ),
            Self::Range { start, end } => format!(
                "{}/{}",
                start.format("%Y-%m-%dT%H:%M"),
                end.format("%Y-%m-%dT%H:%M")
            ),
            Self::Duration { seconds } => format_human(*seconds),
            Self::Set { period } => period.clone(),
            Self::Holiday { name } => name.clone(),
        }
    }
}

fn format_human(total: i64) -> String {
    let years = total / (365 * 86400);
    let days = (total % (365 * 86400)) / 86400;
    let hours = (total % 86400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if years > 0 {
        parts.push(format!("{years}y"));
    }
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join("")
}

/// Turns one span into a value, using only the locale contract.
pub trait DateTimeParser: Send + Sync {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution>;
}

pub struct DateParser;
pub struct TimeParser;
pub struct DurationParser;
pub struct DateTimeValueParser;
pub struct DatePeriodParser;
pub struct TimePeriodParser;
pub struct DateTimePeriodParser;
pub struct SetParser;
pub struct HolidayParser;

/// Resolve a span with the parser for its category.
pub fn resolve(
    config: &dyn LocaleConfiguration,
    span: &ExtractResult,
    reference: NaiveDateTime,
) -> Option<Resolution> {
    let parser: &dyn DateTimeParser = match span.category {
        Category::Date => config.date_parser(),
        Category::Time => config.time_parser(),
        Category::Duration => config.duration_parser(),
        Category::DateTime => &DateTimeValueParser,
        Category::DatePeriod => &DatePeriodParser,
        Category::TimePeriod => &TimePeriodParser,
        Category::DateTimePeriod => &DateTimePeriodParser,
        Category::Set => &SetParser,
        Category::Holiday => &HolidayParser,
    };
    let resolution = parser.parse(config, span, reference);
    trace!(span = %span.text, category = %span.category, ?resolution, "resolved");
    resolution
}

// =============================================================================
// Parsers
// =============================================================================

impl DateTimeParser for DateParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let found = find_date(config, &text, reference)?;
        Some(Resolution::Date { date: found.value })
    }
}

impl DateTimeParser for TimeParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let time = clock_time(config, &text, &text)?;
        Some(Resolution::Time { time })
    }
}

impl DateTimeParser for DurationParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let unit = find_unit(config, &text)?;
        let seconds = unit_seconds(unit.value)?.checked_mul(amount(config, &text)?)?;
        Some(Resolution::Duration { seconds })
    }
}

impl DateTimeParser for DateTimeValueParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        if let Some(reference) = config.match_fixed_time_reference(&text) {
            return Some(Resolution::Reference { reference });
        }

        let patterns = config.patterns();
        if patterns.unspecific_end_of.is_match(&text) {
            let datetime = reference.date().and_hms_opt(23, 59, 59)?;
            return Some(Resolution::DateTime { datetime });
        }

        // "tonight at 8" is always today, whatever day words follow
        let today = patterns.simple_time_of_today_after.is_match(&text)
            || patterns.simple_time_of_today_before.is_match(&text);
        let date = if today {
            None
        } else {
            find_date(config, &text, reference)
        };
        let (date, rest) = match date {
            Some(found) => (
                found.value,
                format!("{} {}", &text[..found.start], &text[found.end..]),
            ),
            None => (reference.date(), text.clone()),
        };

        let rest = patterns.preposition.replace_all(&rest, " ");
        match clock_time(config, &rest, &text) {
            Some(time) => Some(Resolution::DateTime {
                datetime: date.and_time(time),
            }),
            None if patterns.now.is_match(&text) => Some(Resolution::Reference {
                reference: TimeReference::Present,
            }),
            None => None,
        }
    }
}

impl DateTimeParser for DatePeriodParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;

        let (start, end) = match find_key(&text, config.resources().months.iter().copied()) {
            Some(month) => {
                let swift = direction_around(config, &text, month.start, month.end);
                let start = NaiveDate::from_ymd_opt(reference.year() + swift, month.value, 1)?;
                (start, start.checked_add_months(Months::new(1))?)
            }
            None => {
                let unit = find_unit(config, &text)?;
                let swift = direction_around(config, &text, unit.start, unit.end);
                period_bounds(reference.date(), unit.value, swift)?
            }
        };

        Some(Resolution::Range {
            start: start.and_hms_opt(0, 0, 0)?,
            end: end.and_hms_opt(0, 0, 0)?,
        })
    }
}

impl DateTimeParser for TimePeriodParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let date = reference.date();

        let clocks: Vec<_> = clock_regex().find_iter(&text).collect();
        if clocks.len() < 2 {
            let part = find_key(&text, day_parts(config))?;
            return day_part_range(date, part.value);
        }

        let (left, right) = text.split_at(clocks[1].start());
        let end = clock_time(config, right, right)?;
        let mut start = clock_time(config, left, left)?;
        // "from 3 to 5pm": the marker on the right covers both ends
        if !has_day_marker(config, left) && has_day_marker(config, right) {
            let shifted = clock_time(config, left, right)?;
            if shifted <= end {
                start = shifted;
            }
        }

        Some(Resolution::Range {
            start: date.and_time(start),
            end: date.and_time(end),
        })
    }
}

impl DateTimeParser for DateTimePeriodParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let part = find_key(&text, day_parts(config))?;
        let date = match find_date(config, &text, reference) {
            Some(found) => found.value,
            None => {
                let swift = config.resolve_relative_direction(&text);
                reference
                    .date()
                    .checked_add_signed(Duration::days(i64::from(swift)))?
            }
        };
        day_part_range(date, part.value)
    }
}

impl DateTimeParser for SetParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let text = core_text(config, span, reference)?;
        let unit = find_unit(config, &text)?;
        let n = amount(config, &text)?;
        let period = match unit.value {
            "H" | "M" | "S" => format!("PT{n}{}", unit.value),
            "MON" => format!("P{n}M"),
            id => format!("P{n}{id}"),
        };
        Some(Resolution::Set { period })
    }
}

impl DateTimeParser for HolidayParser {
    fn parse(
        &self,
        config: &dyn LocaleConfiguration,
        span: &ExtractResult,
        reference: NaiveDateTime,
    ) -> Option<Resolution> {
        let name = core_text(config, span, reference)?.trim().to_string();
        Some(Resolution::Holiday { name })
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Lower-cased text of the span without attached modifier words, or `None`
/// when the locale flags it as ambiguous.
fn core_text(
    config: &dyn LocaleConfiguration,
    span: &ExtractResult,
    reference: NaiveDateTime,
) -> Option<String> {
    let core = if span.modifiers.is_empty() {
        span.text.clone()
    } else {
        config
            .extractor(span.category)
            .and_then(|e| {
                e.extract(&span.text, reference)
                    .into_iter()
                    .max_by_key(|s| s.length)
            })
            .map_or_else(|| span.text.clone(), |s| s.text)
    };

    if config.is_ambiguous_token(&span.text, &core) {
        trace!(span = %span.text, "ambiguous token");
        return None;
    }
    Some(core.to_lowercase())
}

/// A table hit and where it sits in the searched text.
#[derive(Debug, Clone, Copy)]
struct Found<V> {
    value: V,
    start: usize,
    end: usize,
}

/// Earliest occurrence of any key, the longest one on ties.
///
/// Latin-script keys must stand as whole words; other scripts are written
/// without spaces and match anywhere.
fn find_key<'k, V>(text: &str, table: impl IntoIterator<Item = (&'k str, V)>) -> Option<Found<V>> {
    let mut best: Option<Found<V>> = None;
    for (key, value) in table {
        let Some(start) = find_word(text, key) else {
            continue;
        };
        let end = start + key.len();
        let better = best
            .as_ref()
            .map_or(true, |b| start < b.start || (start == b.start && end > b.end));
        if better {
            best = Some(Found { value, start, end });
        }
    }
    best
}

fn find_word(text: &str, key: &str) -> Option<usize> {
    if key.is_empty() {
        return None;
    }
    let delimited = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c));

    text.match_indices(key).map(|(i, _)| i).find(|&i| {
        if !delimited {
            return true;
        }
        let before = text[..i].chars().next_back();
        let after = text[i + key.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn day_parts(config: &dyn LocaleConfiguration) -> impl Iterator<Item = (&'static str, (u32, u32))> + '_ {
    config
        .resources()
        .day_parts
        .iter()
        .map(|&(key, start, end)| (key, (start, end)))
}

fn day_part_range(date: NaiveDate, (start, end): (u32, u32)) -> Option<Resolution> {
    let end = if end >= 24 {
        date.succ_opt()?.and_hms_opt(0, 0, 0)?
    } else {
        date.and_hms_opt(end, 0, 0)?
    };
    Some(Resolution::Range {
        start: date.and_hms_opt(start, 0, 0)?,
        end,
    })
}

/// Direction of the phrase around `[start, end)`: words before it, or the
/// single word right after it ("vendredi prochain").
fn direction_around(config: &dyn LocaleConfiguration, text: &str, start: usize, end: usize) -> i32 {
    let swift = config.resolve_relative_direction(&text[..end]);
    if swift != 0 {
        return swift;
    }
    let following = text[end..].split_whitespace().next().unwrap_or_default();
    config.resolve_relative_direction(&format!("{} {following}", &text[start..end]))
}

fn iso_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap())
}

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{1,2})(?:\s*(?::|h|時)\s*(\d{1,2}|半))?(?::(\d{2}))?").unwrap())
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

/// Find the calendar date a phrase names, trying the most explicit forms
/// first.
fn find_date(
    config: &dyn LocaleConfiguration,
    text: &str,
    reference: NaiveDateTime,
) -> Option<Found<NaiveDate>> {
    let resources = config.resources();
    let today = reference.date();

    if let Some(caps) = iso_date_regex().captures(text) {
        let whole = caps.get(0)?;
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return Some(Found {
            value: date,
            start: whole.start(),
            end: whole.end(),
        });
    }

    if let Some(m) = config.patterns().specific_end_of.find(text) {
        let unit = find_unit(config, m.as_str())?;
        let (_, next) = period_bounds(today, unit.value, 0)?;
        return Some(Found {
            value: next.pred_opt()?,
            start: m.start(),
            end: m.end(),
        });
    }

    if let Some(day) = find_key(text, resources.day_offsets.iter().copied()) {
        return Some(Found {
            value: today.checked_add_signed(Duration::days(day.value))?,
            start: day.start,
            end: day.end,
        });
    }

    if let Some(weekday) = find_key(text, resources.weekdays.iter().copied()) {
        let swift = direction_around(config, text, weekday.start, weekday.end);
        let monday = week_start(today)?;
        let offset = i64::from(weekday.value.num_days_from_monday()) + 7 * i64::from(swift);
        return Some(Found {
            value: monday.checked_add_signed(Duration::days(offset))?,
            start: weekday.start,
            end: weekday.end,
        });
    }

    month_day(config, text, today)
}

/// "march 15", "15th of march", "15 mars", "3月15日".
fn month_day(config: &dyn LocaleConfiguration, text: &str, today: NaiveDate) -> Option<Found<NaiveDate>> {
    let month = find_key(text, config.resources().months.iter().copied())?;
    let connector = &config.patterns().date_number_connector;

    let number = number_regex().find_iter(text).find(|m| {
        let gap = if m.start() >= month.end {
            &text[month.end..m.start()]
        } else if m.end() <= month.start {
            &text[m.end()..month.start]
        } else {
            return false;
        };
        connector.is_match(gap)
    })?;

    let day = number.as_str().parse().ok()?;
    Some(Found {
        value: NaiveDate::from_ymd_opt(today.year(), month.value, day)?,
        start: month.start.min(number.start()),
        end: month.end.max(number.end()),
    })
}

/// Parse the first clock reading in `digits`, using `context` to place
/// it in the morning or the evening.
fn clock_time(config: &dyn LocaleConfiguration, digits: &str, context: &str) -> Option<NaiveTime> {
    let caps = clock_regex().captures(digits)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2).map(|m| m.as_str()) {
        None => 0,
        Some("半") => 30,
        Some(m) => m.parse().ok()?,
    };
    let second: u32 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hour > 23 {
        return None;
    }

    if has_day_marker(config, context) || config.patterns().specific_time_of_day.is_match(context) {
        hour = config.resolve_ambiguous_hour(context, hour);
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn has_day_marker(config: &dyn LocaleConfiguration, text: &str) -> bool {
    let patterns = config.patterns();
    patterns.am_time.is_match(text) || patterns.pm_time.is_match(text)
}

fn find_unit(config: &dyn LocaleConfiguration, text: &str) -> Option<Found<&'static str>> {
    let m = config.patterns().unit.find(text)?;
    let id = config.unit_map().get(m.as_str().to_lowercase().as_str())?;
    Some(Found {
        value: *id,
        start: m.start(),
        end: m.end(),
    })
}

/// Leading count of a duration or recurrence, 1 when none is given.
///
/// `None` when the digits are there but do not fit an `i64`.
fn amount(config: &dyn LocaleConfiguration, text: &str) -> Option<i64> {
    if let Some(m) = number_regex().find(text) {
        return m.as_str().parse().ok();
    }
    Some(
        find_key(text, config.numbers().iter().map(|(k, v)| (*k, *v)))
            .map_or(1, |found| found.value),
    )
}

fn unit_seconds(unit: &str) -> Option<i64> {
    Some(match unit {
        "Y" => 365 * 86400,
        "MON" => 30 * 86400,
        "W" => 7 * 86400,
        "D" => 86400,
        "H" => 3600,
        "M" => 60,
        "S" => 1,
        _ => return None,
    })
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
}

/// `[start, end)` of the week, month, year or day containing `date`,
/// shifted by `swift` periods.
fn period_bounds(date: NaiveDate, unit: &str, swift: i32) -> Option<(NaiveDate, NaiveDate)> {
    let shift_months = |d: NaiveDate, n: i32| {
        if n >= 0 {
            d.checked_add_months(Months::new(n.unsigned_abs()))
        } else {
            d.checked_sub_months(Months::new(n.unsigned_abs()))
        }
    };

    match unit {
        "D" => {
            let start = date.checked_add_signed(Duration::days(i64::from(swift)))?;
            Some((start, start.succ_opt()?))
        }
        "W" => {
            let start =
                week_start(date)?.checked_add_signed(Duration::weeks(i64::from(swift)))?;
            Some((start, start.checked_add_signed(Duration::weeks(1))?))
        }
        "MON" => {
            let start = shift_months(date.with_day(1)?, swift)?;
            Some((start, shift_months(start, 1)?))
        }
        "Y" => {
            let year = date.year() + swift;
            Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
            ))
        }
        _ => None,
    }
}
