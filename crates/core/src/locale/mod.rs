//! Locale configuration contract and registry.
//!
//! Each supported language implements [`LocaleConfiguration`] once. The
//! merge engine and the resolver are written against the trait only, so a
//! new language is a new table of patterns plus four small functions.

mod english;
mod french;
mod japanese;
mod rules;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extractor::DateTimeExtractor;
use crate::pattern;
use crate::resolve::{DateParser, DateTimeParser, DurationParser, TimeParser};
use crate::types::{Category, TimeReference};

pub use english::EnglishConfiguration;
pub use french::FrenchConfiguration;
pub use japanese::JapaneseConfiguration;
pub use rules::{BlacklistRule, ModifierRule};

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en-us")]
    English,
    #[serde(rename = "fr-fr")]
    French,
    #[serde(rename = "ja-jp")]
    Japanese,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::English, Locale::French, Locale::Japanese];

    /// Culture code, e.g. `fr-fr`.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en-us",
            Self::French => "fr-fr",
            Self::Japanese => "ja-jp",
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "english" => Ok(Self::English),
            "fr" | "fr-fr" | "french" => Ok(Self::French),
            "ja" | "ja-jp" | "japanese" => Ok(Self::Japanese),
            _ => Err(Error::UnknownLocale(s.to_string())),
        }
    }
}

/// Look up the shared configuration for a locale.
///
/// Configurations are built on first use and live for the rest of the
/// process. A compile failure is cached and returned on every lookup.
pub fn configuration(locale: Locale) -> Result<&'static dyn LocaleConfiguration> {
    match locale {
        Locale::English => english::configuration(),
        Locale::French => french::configuration(),
        Locale::Japanese => japanese::configuration(),
    }
}

/// Raw pattern sources for [`ParserPatterns`].
pub struct ParserPatternSources {
    pub now: &'static str,
    pub simple_time_of_today_after: &'static str,
    pub simple_time_of_today_before: &'static str,
    pub specific_time_of_day: &'static str,
    pub specific_end_of: &'static str,
    pub unspecific_end_of: &'static str,
    pub unit: &'static str,
    pub date_number_connector: &'static str,
    pub preposition: &'static str,
    pub am_time: &'static str,
    pub pm_time: &'static str,
}

/// Compiled matchers the resolver consults.
#[derive(Debug, Clone)]
pub struct ParserPatterns {
    pub now: Regex,
    pub simple_time_of_today_after: Regex,
    pub simple_time_of_today_before: Regex,
    pub specific_time_of_day: Regex,
    pub specific_end_of: Regex,
    pub unspecific_end_of: Regex,
    pub unit: Regex,
    pub date_number_connector: Regex,
    pub preposition: Regex,
    pub am_time: Regex,
    pub pm_time: Regex,
}

impl ParserPatterns {
    pub fn compile(prefix: &str, sources: &ParserPatternSources) -> Result<Self> {
        let build = |name: &str, source: &str| pattern::compile(&format!("{prefix}{name}"), source);
        Ok(Self {
            now: build("Now", sources.now)?,
            simple_time_of_today_after: build(
                "SimpleTimeOfTodayAfter",
                sources.simple_time_of_today_after,
            )?,
            simple_time_of_today_before: build(
                "SimpleTimeOfTodayBefore",
                sources.simple_time_of_today_before,
            )?,
            specific_time_of_day: build("SpecificTimeOfDay", sources.specific_time_of_day)?,
            specific_end_of: build("SpecificEndOf", sources.specific_end_of)?,
            unspecific_end_of: build("UnspecificEndOf", sources.unspecific_end_of)?,
            unit: build("Unit", sources.unit)?,
            date_number_connector: build("DateNumberConnector", sources.date_number_connector)?,
            preposition: build("Preposition", sources.preposition)?,
            am_time: build("AmTime", sources.am_time)?,
            pm_time: build("PmTime", sources.pm_time)?,
        })
    }
}

/// Data every locale provides. Built once, read-only afterwards.
pub struct LocaleResources {
    /// One extractor per category the locale supports
    pub extractors: Vec<Box<dyn DateTimeExtractor>>,
    pub patterns: ParserPatterns,
    /// Applied in order during boundary extension
    pub modifiers: Vec<ModifierRule>,
    pub blacklist: Vec<BlacklistRule>,
    /// Unit word to canonical unit id (`Y`, `MON`, `W`, `D`, `H`, `M`, `S`)
    pub unit_map: HashMap<&'static str, &'static str>,
    /// Number word to value
    pub numbers: HashMap<&'static str, i64>,
    /// Relative day words with their day offset
    pub day_offsets: Vec<(&'static str, i64)>,
    pub weekdays: Vec<(&'static str, Weekday)>,
    /// Month names with their number
    pub months: Vec<(&'static str, u32)>,
    /// Part-of-day words with their `[start, end)` hours
    pub day_parts: Vec<(&'static str, u32, u32)>,
    pub token_before_date: &'static str,
    pub token_before_time: &'static str,
}

/// Capability contract implemented once per language.
///
/// Nothing here may panic or fail: unrecognized input yields the identity
/// or "no match" result.
pub trait LocaleConfiguration: Send + Sync {
    fn locale(&self) -> Locale;

    fn resources(&self) -> &LocaleResources;

    /// Extractor for `category`, if the locale has one.
    fn extractor(&self, category: Category) -> Option<&dyn DateTimeExtractor> {
        self.resources()
            .extractors
            .iter()
            .find(|e| e.category() == category)
            .map(|e| e.as_ref())
    }

    fn date_extractor(&self) -> Option<&dyn DateTimeExtractor> {
        self.extractor(Category::Date)
    }

    fn time_extractor(&self) -> Option<&dyn DateTimeExtractor> {
        self.extractor(Category::Time)
    }

    fn duration_extractor(&self) -> Option<&dyn DateTimeExtractor> {
        self.extractor(Category::Duration)
    }

    fn date_parser(&self) -> &dyn DateTimeParser {
        &DateParser
    }

    fn time_parser(&self) -> &dyn DateTimeParser {
        &TimeParser
    }

    fn duration_parser(&self) -> &dyn DateTimeParser {
        &DurationParser
    }

    fn unit_map(&self) -> &HashMap<&'static str, &'static str> {
        &self.resources().unit_map
    }

    fn numbers(&self) -> &HashMap<&'static str, i64> {
        &self.resources().numbers
    }

    fn patterns(&self) -> &ParserPatterns {
        &self.resources().patterns
    }

    fn modifiers(&self) -> &[ModifierRule] {
        &self.resources().modifiers
    }

    fn blacklist(&self) -> &[BlacklistRule] {
        &self.resources().blacklist
    }

    fn token_before_date(&self) -> &str {
        self.resources().token_before_date
    }

    fn token_before_time(&self) -> &str {
        self.resources().token_before_time
    }

    /// Move a 12-hour clock hour into the half of the day the text names.
    ///
    /// Must be pure and idempotent for every hour in `0..=23`.
    fn resolve_ambiguous_hour(&self, text: &str, hour: u32) -> u32;

    /// Recognize the closed set of "now", "recently" and "as soon as
    /// possible" phrases.
    fn match_fixed_time_reference(&self, text: &str) -> Option<TimeReference>;

    /// `1` for "next", `-1` for "last", `0` otherwise. Looks at both ends of
    /// the text since the direction word may precede or follow the noun.
    fn resolve_relative_direction(&self, text: &str) -> i32;

    /// Flag tokens that look temporal but are not.
    fn is_ambiguous_token(&self, _text: &str, _matched: &str) -> bool {
        false
    }
}

/// Lower-case and collapse whitespace.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Turn a cached build result into a registry answer.
pub(crate) fn cached<T: LocaleConfiguration + 'static>(
    built: &'static Result<T>,
) -> Result<&'static dyn LocaleConfiguration> {
    match built {
        Ok(config) => Ok(config),
        Err(e) => Err(e.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_str() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::French);
        assert_eq!("EN_US".parse::<Locale>().unwrap(), Locale::English);
        assert_eq!(" ja-JP ".parse::<Locale>().unwrap(), Locale::Japanese);
    }

    #[test]
    fn test_unknown_locale() {
        let err = "xx-yy".parse::<Locale>().unwrap_err();
        assert!(matches!(err, Error::UnknownLocale(ref id) if id == "xx-yy"));
    }

    #[test]
    fn test_registry_returns_matching_locale() {
        for locale in Locale::ALL {
            let config = configuration(locale).unwrap();
            assert_eq!(config.locale(), locale);
        }
    }

    #[test]
    fn test_registry_is_shared() {
        let a = configuration(Locale::French).unwrap();
        let b = configuration(Locale::French).unwrap();
        assert!(std::ptr::eq(
            a.resources() as *const LocaleResources,
            b.resources() as *const LocaleResources
        ));
    }

    #[test]
    fn test_every_locale_has_every_category() {
        for locale in Locale::ALL {
            let config = configuration(locale).unwrap();
            for category in crate::merge::CATEGORY_ORDER {
                assert!(
                    config.extractor(category).is_some(),
                    "{locale} is missing a {category} extractor"
                );
            }
        }
    }

    #[test]
    fn test_default_ambiguity_rule() {
        let config = configuration(Locale::French).unwrap();
        assert!(!config.is_ambiguous_token("mai", "mai"));
    }
}
