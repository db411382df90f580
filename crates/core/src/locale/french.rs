//! French (`fr-fr`) locale.

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
use crate::types::{Category, ModifierKind, TimeReference};

const MONTHS: &str = "janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre";
const WEEKDAYS: &str = "lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche";
const AMOUNT: &str = r"\d+|une?|deux|trois|quatre|cinq|six|sept|huit|neuf|dix|douze|quinze|vingt|trente";
const UNITS: &str = r"ans?|années?|mois|semaines?|jours?|heures?|minutes?|secondes?";
const CLOCK: &str = r"\d{1,2}\s*(?:h|heures?)(?:\s*\d{2})?";
const DAY_PART: &str = r"du\s+matin|du\s+soir|de\s+l'après-midi";
const THIS_PART: &str = r"ce\s+soir|ce\s+matin|cet\s+après-midi|cette\s+nuit";

pub struct FrenchConfiguration {
    resources: LocaleResources,
}

pub(super) fn configuration() -> Result<&'static dyn LocaleConfiguration> {
    static CONFIG: OnceLock<Result<FrenchConfiguration>> = OnceLock::new();
    cached(CONFIG.get_or_init(FrenchConfiguration::build))
}

impl FrenchConfiguration {
    fn build() -> Result<Self> {
        Ok(Self {
            resources: LocaleResources {
                extractors: extractors()?,
                patterns: ParserPatterns::compile("French", &PATTERNS)?,
                modifiers: modifiers()?,
                blacklist: vec![BlacklistRule::pattern(
                    "FrenchOrdinalDay",
                    r"^\d{1,2}(?:er|e|ème)$",
                )?],
                unit_map: HashMap::from([
                    ("an", "Y"),
                    ("ans", "Y"),
                    ("année", "Y"),
                    ("années", "Y"),
                    ("annuel", "Y"),
                    ("annuellement", "Y"),
                    ("mois", "MON"),
                    ("mensuel", "MON"),
                    ("mensuellement", "MON"),
                    ("semaine", "W"),
                    ("semaines", "W"),
                    ("hebdomadaire", "W"),
                    ("hebdomadairement", "W"),
                    ("jour", "D"),
                    ("jours", "D"),
                    ("quotidien", "D"),
                    ("quotidiennement", "D"),
                    ("heure", "H"),
                    ("heures", "H"),
                    ("minute", "M"),
                    ("minutes", "M"),
                    ("seconde", "S"),
                    ("secondes", "S"),
                ]),
                numbers: HashMap::from([
                    ("un", 1),
                    ("une", 1),
                    ("deux", 2),
                    ("trois", 3),
                    ("quatre", 4),
                    ("cinq", 5),
                    ("six", 6),
                    ("sept", 7),
                    ("huit", 8),
                    ("neuf", 9),
                    ("dix", 10),
                    ("douze", 12),
                    ("quinze", 15),
                    ("vingt", 20),
                    ("trente", 30),
                ]),
                day_offsets: vec![
                    ("après-demain", 2),
                    ("avant-hier", -2),
                    ("demain", 1),
                    ("hier", -1),
                    ("aujourd'hui", 0),
                ],
                weekdays: vec![
                    ("lundi", Weekday::Mon),
                    ("mardi", Weekday::Tue),
                    ("mercredi", Weekday::Wed),
                    ("jeudi", Weekday::Thu),
                    ("vendredi", Weekday::Fri),
                    ("samedi", Weekday::Sat),
                    ("dimanche", Weekday::Sun),
                ],
                months: MONTHS.split('|').zip(1..).collect(),
                day_parts: vec![
                    ("matin", 8, 12),
                    ("après-midi", 12, 16),
                    ("soir", 16, 20),
                    ("nuit", 20, 24),
                ],
                token_before_date: "le ",
                token_before_time: "à ",
            },
        })
    }
}

const PATTERNS: ParserPatternSources = ParserPatternSources {
    now: r"\b(?:maintenant|en\s+ce\s+moment|actuellement|tout\s+de\s+suite)\b",
    simple_time_of_today_after: r"\d{1,2}\s*(?:h|heures?)(?:\s*\d{2})?\s+(?:ce\s+soir|ce\s+matin|cet\s+après-midi)\b",
    simple_time_of_today_before: r"\b(?:ce\s+soir|ce\s+matin|cet\s+après-midi)\s+(?:à\s+)?\d{1,2}",
    specific_time_of_day: r"\b(?:ce\s+soir|ce\s+matin|cet\s+après-midi|cette\s+nuit|du\s+matin|du\s+soir|de\s+l'après-midi)\b",
    specific_end_of: r"\bfin\s+(?:de\s+la\s+semaine|du\s+mois|de\s+l'année)\b",
    unspecific_end_of: r"\bfin\s+de\s+(?:la\s+)?journée\b",
    unit: r"\b(?:ans?|années?|annuel(?:lement)?|mois|mensuel(?:lement)?|semaines?|hebdomadaire(?:ment)?|jours?|quotidien(?:nement)?|heures?|minutes?|secondes?)\b",
    date_number_connector: r"^(?:er)?\s*(?:de\s+)?$",
    preposition: r"\b(?:à|le|en|vers)\b",
    am_time: r"\bdu\s+matin\b",
    pm_time: r"\b(?:du\s+soir|de\s+l'après-midi)\b",
};

fn extractors() -> Result<Vec<Box<dyn DateTimeExtractor>>> {
    let day_word = format!(
        r"aujourd'hui|après-demain|demain|hier|{THIS_PART}|(?:{WEEKDAYS})(?:\s+(?:prochain|dernier))?"
    );

    let date = RegexExtractor::new(
        Category::Date,
        "FrenchDate",
        &[
            ("Iso", r"\b\d{4}-\d{1,2}-\d{1,2}\b"),
            (
                "RelativeDay",
                r"\b(?:aujourd'hui|après-demain|avant-hier|demain|hier)\b",
            ),
            (
                "Weekday",
                format!(r"\b(?:{WEEKDAYS})(?:\s+(?:prochain|dernier))?\b").as_str(),
            ),
            (
                "DayMonth",
                format!(r"\b\d{{1,2}}(?:er)?\s+(?:de\s+)?(?:{MONTHS})\b").as_str(),
            ),
            ("Ordinal", r"\b\d{1,2}(?:er|ème|e)\b"),
            (
                "EndOf",
                r"\bfin\s+(?:de\s+la\s+semaine|du\s+mois|de\s+l'année)\b",
            ),
        ],
    )?;

    let time = RegexExtractor::new(
        Category::Time,
        "FrenchTime",
        &[
            ("HourMinute", r"\b\d{1,2}\s*h\s*\d{2}\b"),
            ("Hour", r"\b\d{1,2}\s*h\b"),
            (
                "Heures",
                format!(r"\b\d{{1,2}}\s+heures?(?:\s+(?:{DAY_PART}))?").as_str(),
            ),
            ("Clock", r"\b\d{1,2}:\d{2}\b"),
        ],
    )?;

    let duration = RegexExtractor::new(
        Category::Duration,
        "FrenchDuration",
        &[("Amount", format!(r"\b(?:{AMOUNT})\s+(?:{UNITS})\b").as_str())],
    )?;

    let date_period = RegexExtractor::new(
        Category::DatePeriod,
        "FrenchDatePeriod",
        &[
            (
                "This",
                r"\b(?:cette\s+semaine|ce\s+mois(?:-ci)?|cette\s+année)\b",
            ),
            (
                "Relative",
                r"\b(?:la\s+|le\s+|l')?(?:semaine|mois|année)\s+(?:prochaine?|dernière|dernier)\b",
            ),
            ("Month", format!(r"\b(?:{MONTHS})\b").as_str()),
        ],
    )?;

    let date_time = RegexExtractor::new(
        Category::DateTime,
        "FrenchDateTime",
        &[
            (
                "Now",
                r"\b(?:maintenant|en\s+ce\s+moment|actuellement|tout\s+de\s+suite)\b",
            ),
            ("Past", r"\b(?:récemment|précédemment|auparavant)\b"),
            ("Future", r"\b(?:dès\s+que\s+possible|dqp)\b"),
            (
                "DayAtTime",
                format!(r"\b(?:{day_word})\s+(?:à\s+)?{CLOCK}(?:\s+(?:{DAY_PART}))?").as_str(),
            ),
            (
                "TimeThisPart",
                format!(r"\b{CLOCK}\s+(?:{THIS_PART})\b").as_str(),
            ),
            ("EndOfDay", r"\bfin\s+de\s+(?:la\s+)?journée\b"),
        ],
    )?;

    let time_period = RegexExtractor::new(
        Category::TimePeriod,
        "FrenchTimePeriod",
        &[
            (
                "FromTo",
                format!(r"\b(?:de\s+)?{CLOCK}\s*(?:à|-)\s*{CLOCK}").as_str(),
            ),
            ("Between", format!(r"\bentre\s+{CLOCK}\s+et\s+{CLOCK}").as_str()),
            (
                "DayPart",
                r"\b(?:le\s+matin|l'après-midi|le\s+soir|la\s+nuit)\b",
            ),
        ],
    )?;

    let date_time_period = RegexExtractor::new(
        Category::DateTimePeriod,
        "FrenchDateTimePeriod",
        &[
            ("ThisPart", format!(r"\b(?:{THIS_PART})\b").as_str()),
            (
                "DayPart",
                r"\b(?:demain|hier)\s+(?:matin|soir|après-midi)\b",
            ),
        ],
    )?;

    let set = RegexExtractor::new(
        Category::Set,
        "FrenchSet",
        &[
            (
                "Every",
                r"\b(?:chaque|tous\s+les|toutes\s+les)\s+(?:\d+\s+)?(?:ans|années?|mois|semaines?|jours?|heures?|minutes?)\b",
            ),
            (
                "Adverb",
                r"\b(?:quotidiennement|hebdomadairement|mensuellement|annuellement)\b",
            ),
        ],
    )?;

    let holiday = RegexExtractor::new(
        Category::Holiday,
        "FrenchHoliday",
        &[
            ("Noel", r"\bno[eë]l\b"),
            ("NewYear", r"\b(?:jour\s+de\s+l'an|nouvel\s+an)\b"),
            ("Easter", r"\bpâques\b"),
            ("AllSaints", r"\btoussaint\b"),
            ("National", r"\bfête\s+nationale\b"),
            ("Valentine", r"\bsaint[\s-]valentin\b"),
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

/// Article that may sit between a prefix modifier and the date ("avant le 5 mai").
const ARTICLE: &str = r"(?:\s+(?:le|la|les|l'))?";

fn modifiers() -> Result<Vec<ModifierRule>> {
    Ok(vec![
        ModifierRule::suffix(ModifierKind::Before, r"\b(?:ou\s+avant|au\s+plus\s+tard)\b")?,
        ModifierRule::suffix(ModifierKind::Since, r"\b(?:ou\s+plus\s+tard|et\s+après)\b")?,
        ModifierRule::prefix(ModifierKind::Before, &format!(r"\bavant{ARTICLE}"))?,
        ModifierRule::prefix(ModifierKind::After, &format!(r"\baprès{ARTICLE}"))?,
        ModifierRule::prefix(ModifierKind::Until, r"\bjusqu'(?:à|au)\b")?,
        ModifierRule::prefix(
            ModifierKind::Since,
            &format!(r"\bdepuis{ARTICLE}|\bà\s+partir\s+(?:du|d'|de{ARTICLE})"),
        )?,
    ])
}

impl LocaleConfiguration for FrenchConfiguration {
    fn locale(&self) -> Locale {
        Locale::French
    }

    fn resources(&self) -> &LocaleResources {
        &self.resources
    }

    fn resolve_ambiguous_hour(&self, text: &str, hour: u32) -> u32 {
        let morning = normalize(text).ends_with("matin");
        if morning && hour >= 12 {
            hour - 12
        } else if !morning && hour < 12 {
            hour + 12
        } else {
            hour
        }
    }

    fn match_fixed_time_reference(&self, text: &str) -> Option<TimeReference> {
        let text = normalize(text);
        if text.ends_with("maintenant") {
            return Some(TimeReference::Present);
        }
        match text.as_str() {
            "récemment" | "précédemment" | "auparavant" => Some(TimeReference::Past),
            "dès que possible" | "dqp" => Some(TimeReference::Future),
            _ => None,
        }
    }

    fn resolve_relative_direction(&self, text: &str) -> i32 {
        let text = normalize(text);
        let either = |word: &str| text.starts_with(word) || text.ends_with(word);

        if either("prochain") || either("prochaine") {
            1
        } else if either("dernier") || either("dernière") {
            -1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> &'static dyn LocaleConfiguration {
        configuration().unwrap()
    }

    #[test]
    fn test_morning_hour_is_kept() {
        assert_eq!(config().resolve_ambiguous_hour("8 heures du matin", 8), 8);
    }

    #[test]
    fn test_morning_hour_is_pulled_back() {
        assert_eq!(config().resolve_ambiguous_hour("8 heures du matin", 20), 8);
    }

    #[test]
    fn test_non_morning_hour_is_pushed_forward() {
        let c = config();
        assert_eq!(c.resolve_ambiguous_hour("8 heures du soir", 8), 20);
        assert_eq!(c.resolve_ambiguous_hour("8 heures du soir", 20), 20);
    }

    #[test]
    fn test_hour_disambiguation_is_total_and_idempotent() {
        let c = config();
        for text in ["ce matin", "ce soir", "", "  MATIN  "] {
            for hour in 0..24 {
                let once = c.resolve_ambiguous_hour(text, hour);
                assert!(once < 24);
                assert_eq!(c.resolve_ambiguous_hour(text, once), once);
            }
        }
    }

    #[test]
    fn test_fixed_references() {
        let c = config();
        assert_eq!(c.match_fixed_time_reference("maintenant"), Some(TimeReference::Present));
        assert_eq!(
            c.match_fixed_time_reference("  tout de suite maintenant "),
            Some(TimeReference::Present)
        );
        assert_eq!(c.match_fixed_time_reference("Récemment"), Some(TimeReference::Past));
        assert_eq!(c.match_fixed_time_reference("auparavant"), Some(TimeReference::Past));
        assert_eq!(c.match_fixed_time_reference("DQP"), Some(TimeReference::Future));
        assert_eq!(
            c.match_fixed_time_reference("dès que   possible"),
            Some(TimeReference::Future)
        );
        assert_eq!(c.match_fixed_time_reference("bonjour"), None);
    }

    #[test]
    fn test_relative_direction() {
        let c = config();
        assert_eq!(c.resolve_relative_direction("vendredi prochain"), 1);
        assert_eq!(c.resolve_relative_direction("vendredi dernier"), -1);
        assert_eq!(c.resolve_relative_direction("vendredi"), 0);
        assert_eq!(c.resolve_relative_direction("  Prochaine semaine "), 1);
        assert_eq!(c.resolve_relative_direction("la semaine dernière"), -1);
    }

    #[test]
    fn test_no_ambiguous_tokens() {
        assert!(!config().is_ambiguous_token("mai", "mai"));
    }

    #[test]
    fn test_tokens_before_date_and_time() {
        let c = config();
        assert_eq!(c.token_before_date(), "le ");
        assert_eq!(c.token_before_time(), "à ");
    }

    #[test]
    fn test_prefix_modifiers_reach_over_articles() {
        let reference = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let merged = crate::merge::MergedExtractor::new(config());

        for (text, kind) in [
            ("depuis le 1er mai", ModifierKind::Since),
            ("avant le 5 mai", ModifierKind::Before),
            ("après la semaine prochaine", ModifierKind::After),
            ("à partir de la semaine prochaine", ModifierKind::Since),
            ("à partir du 3 mars", ModifierKind::Since),
        ] {
            let spans = merged.extract(text, reference);
            assert_eq!(spans.len(), 1, "{text}: {spans:?}");
            assert_eq!(spans[0].text, text);
            assert_eq!(spans[0].modifiers, vec![kind], "{text}");
        }
    }

    #[test]
    fn test_unit_map_keys_resolve() {
        let units = config().unit_map();
        assert_eq!(units.get("semaines"), Some(&"W"));
        assert_eq!(units.get("mois"), Some(&"MON"));
    }
}
