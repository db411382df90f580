//! Japanese (`ja-jp`) locale.
//!
//! Patterns here never use `\b`: Japanese text has no spaces, so word
//! boundaries would reject most real matches.

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

const AMOUNT: &str = r"\d+|[一二三四五六七八九十]";
const CLOCK: &str = r"(?:午前|午後|朝|夜)?\d{1,2}時(?:\d{1,2}分|半)?";
const DAY_WORD: &str = r"今日|明日|昨日|明後日|(?:来週|先週|今週)?の?[月火水木金土日]曜日";

pub struct JapaneseConfiguration {
    resources: LocaleResources,
}

pub(super) fn configuration() -> Result<&'static dyn LocaleConfiguration> {
    static CONFIG: OnceLock<Result<JapaneseConfiguration>> = OnceLock::new();
    cached(CONFIG.get_or_init(JapaneseConfiguration::build))
}

impl JapaneseConfiguration {
    fn build() -> Result<Self> {
        Ok(Self {
            resources: LocaleResources {
                extractors: extractors()?,
                patterns: ParserPatterns::compile("Japanese", &PATTERNS)?,
                modifiers: modifiers()?,
                blacklist: vec![
                    BlacklistRule::pattern("JapaneseDayNumber", r"^\d{1,2}号")?,
                    BlacklistRule::Predicate(is_age),
                    BlacklistRule::Predicate(is_now_compound),
                ],
                unit_map: HashMap::from([
                    ("年", "Y"),
                    ("年間", "Y"),
                    ("か月", "MON"),
                    ("ヶ月", "MON"),
                    ("カ月", "MON"),
                    ("月", "MON"),
                    ("週間", "W"),
                    ("週", "W"),
                    ("周", "W"),
                    ("日間", "D"),
                    ("日", "D"),
                    ("時間", "H"),
                    ("分間", "M"),
                    ("分", "M"),
                    ("秒", "S"),
                ]),
                numbers: HashMap::from([
                    ("一", 1),
                    ("二", 2),
                    ("三", 3),
                    ("四", 4),
                    ("五", 5),
                    ("六", 6),
                    ("七", 7),
                    ("八", 8),
                    ("九", 9),
                    ("十", 10),
                ]),
                day_offsets: vec![
                    ("明後日", 2),
                    ("一昨日", -2),
                    ("明日", 1),
                    ("翌日", 1),
                    ("昨日", -1),
                    ("今日", 0),
                ],
                weekdays: vec![
                    ("月曜日", Weekday::Mon),
                    ("火曜日", Weekday::Tue),
                    ("水曜日", Weekday::Wed),
                    ("木曜日", Weekday::Thu),
                    ("金曜日", Weekday::Fri),
                    ("土曜日", Weekday::Sat),
                    ("日曜日", Weekday::Sun),
                ],
                months: vec![
                    ("1月", 1),
                    ("2月", 2),
                    ("3月", 3),
                    ("4月", 4),
                    ("5月", 5),
                    ("6月", 6),
                    ("7月", 7),
                    ("8月", 8),
                    ("9月", 9),
                    ("10月", 10),
                    ("11月", 11),
                    ("12月", 12),
                ],
                day_parts: vec![
                    ("午前中", 8, 12),
                    ("午前", 8, 12),
                    ("朝", 8, 12),
                    ("午後", 12, 16),
                    ("夕方", 16, 20),
                    ("夜", 20, 24),
                    ("晩", 20, 24),
                ],
                token_before_date: "",
                token_before_time: "",
            },
        })
    }
}

const PATTERNS: ParserPatternSources = ParserPatternSources {
    now: r"今|現在|ただいま|只今",
    simple_time_of_today_after: r"(?:午前|午後)?\d{1,2}時(?:\d{1,2}分)?に?(?:今夜|今晩|今朝)",
    simple_time_of_today_before: r"(?:今夜|今晩|今朝|今日の(?:午前|午後|夜|朝))の?\d{1,2}時",
    specific_time_of_day: r"今朝|今夜|今晩|朝|夜|夕方|晩|午前|午後",
    specific_end_of: r"今週末|今月末|月末|今年末|年末",
    unspecific_end_of: r"今日中|一日の終わり",
    unit: r"年間|年|か月|ヶ月|カ月|週間|週|周|日間|日|時間|分間|分|秒|月",
    date_number_connector: r"^\s*$",
    preposition: r"の|に",
    am_time: r"午前|朝",
    pm_time: r"午後|夜|夕方|晩",
};

fn extractors() -> Result<Vec<Box<dyn DateTimeExtractor>>> {
    let date = RegexExtractor::new(
        Category::Date,
        "JapaneseDate",
        &[
            ("Iso", r"\d{4}-\d{1,2}-\d{1,2}"),
            ("MonthDay", r"\d{1,2}月\d{1,2}日"),
            ("RelativeDay", r"明後日|一昨日|明日|翌日|昨日|今日"),
            ("Weekday", r"(?:来週|先週|今週)?の?[月火水木金土日]曜日"),
            ("DayNumber", r"\d{1,2}[日号]"),
            ("EndOf", r"今週末|今月末|月末|今年末|年末"),
        ],
    )?;

    let time = RegexExtractor::new(
        Category::Time,
        "JapaneseTime",
        &[("Hour", CLOCK), ("Clock", r"\d{1,2}:\d{2}")],
    )?;

    let duration = RegexExtractor::new(
        Category::Duration,
        "JapaneseDuration",
        &[(
            "Amount",
            format!(r"(?:{AMOUNT})\s*(?:年間|年|か月|ヶ月|カ月|週間|週|周|日間|時間|分間|分|秒)")
                .as_str(),
        )],
    )?;

    let date_period = RegexExtractor::new(
        Category::DatePeriod,
        "JapaneseDatePeriod",
        &[
            ("Relative", r"来週|先週|今週|来月|先月|今月|来年|去年|昨年|今年"),
            ("Month", r"\d{1,2}月"),
        ],
    )?;

    let date_time = RegexExtractor::new(
        Category::DateTime,
        "JapaneseDateTime",
        &[
            ("Now", r"今|現在|ただいま|只今"),
            ("Past", r"最近|先ほど|さっき"),
            ("Future", r"至急|できるだけ早く|なるべく早く"),
            ("DayAtTime", format!(r"(?:{DAY_WORD})の?{CLOCK}").as_str()),
            ("TonightAtTime", format!(r"(?:今夜|今晩|今朝)の?{CLOCK}").as_str()),
            ("EndOfDay", r"今日中|一日の終わり"),
        ],
    )?;

    let time_period = RegexExtractor::new(
        Category::TimePeriod,
        "JapaneseTimePeriod",
        &[
            (
                "FromTo",
                format!(r"{CLOCK}(?:から|～|〜|-){CLOCK}(?:まで)?").as_str(),
            ),
            ("DayPart", r"午前中|午後|朝|夕方|夜|晩"),
        ],
    )?;

    let date_time_period = RegexExtractor::new(
        Category::DateTimePeriod,
        "JapaneseDateTimePeriod",
        &[
            ("This", r"今夜|今晩|今朝"),
            ("DayPart", r"(?:今日|明日|昨日)の?(?:朝|午前|午後|夕方|夜|晩)"),
        ],
    )?;

    let set = RegexExtractor::new(
        Category::Set,
        "JapaneseSet",
        &[
            ("Every", r"毎(?:日|週|月|年|時間)"),
            (
                "Interval",
                format!(r"(?:{AMOUNT})(?:日|週間|か月|ヶ月|年)(?:ごと|おき)").as_str(),
            ),
        ],
    )?;

    let holiday = RegexExtractor::new(
        Category::Holiday,
        "JapaneseHoliday",
        &[
            ("NewYear", r"元日|元旦|正月"),
            ("Christmas", r"クリスマス(?:イブ)?"),
            ("NewYearsEve", r"大晦日"),
            ("Children", r"こどもの日"),
            ("Culture", r"文化の日"),
            ("Valentine", r"バレンタインデー"),
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
        ModifierRule::suffix(ModifierKind::Before, r"以前|より前|前")?,
        ModifierRule::suffix(ModifierKind::After, r"以降|以後|より後|後")?,
        ModifierRule::prefix(ModifierKind::Until, r"直到|到")?,
        ModifierRule::suffix(ModifierKind::Until, r"まで")?,
        ModifierRule::prefix(ModifierKind::Since, r"自从|从|自")?,
        ModifierRule::suffix(ModifierKind::Since, r"以来|から|より")?,
    ])
}

/// "3周岁" is an age, not a duration of three weeks.
fn is_age(span: &ExtractResult, text: &str) -> bool {
    span.text.ends_with('周')
        && text
            .get(span.end()..)
            .is_some_and(|rest| rest.starts_with('岁'))
}

/// 今 that opens a word such as 今回, 今度 or 今後 does not mean "now".
fn is_now_compound(span: &ExtractResult, text: &str) -> bool {
    span.text == "今"
        && text
            .get(span.end()..)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|next| matches!(next, '回' | '度' | '後' | '更' | '頃' | '一'))
}

fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| text.starts_with(p))
}

fn ends_with_any(text: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| text.ends_with(s))
}

impl LocaleConfiguration for JapaneseConfiguration {
    fn locale(&self) -> Locale {
        Locale::Japanese
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
        if ends_with_any(&text, &["今", "現在", "ただいま", "只今"]) {
            return Some(TimeReference::Present);
        }
        match text.as_str() {
            "最近" | "先ほど" | "さっき" => Some(TimeReference::Past),
            "至急" | "できるだけ早く" | "なるべく早く" => Some(TimeReference::Future),
            _ => None,
        }
    }

    fn resolve_relative_direction(&self, text: &str) -> i32 {
        let text = normalize(text);
        if starts_with_any(&text, &["来", "次", "翌"]) || text.ends_with('後') {
            1
        } else if starts_with_any(&text, &["先", "前", "昨", "去"]) {
            -1
        } else {
            0
        }
    }
}
