//! Tempex Core
//!
//! Finds temporal expressions (dates, times, durations, periods, recurring
//! sets, holidays) in free text and turns them into concrete values.
//!
//! # Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use tempex_core::{Locale, Recognizer, Resolution};
//!
//! let recognizer = Recognizer::new(Locale::English).unwrap();
//! let reference = NaiveDate::from_ymd_opt(2024, 1, 15)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//!
//! let found = recognizer.recognize_at("lunch tomorrow at 1pm", reference);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].span.text, "tomorrow at 1pm");
//!
//! let expected = NaiveDate::from_ymd_opt(2024, 1, 16)
//!     .unwrap()
//!     .and_hms_opt(13, 0, 0)
//!     .unwrap();
//! assert_eq!(
//!     found[0].resolution,
//!     Some(Resolution::DateTime { datetime: expected })
//! );
//! ```
//!
//! # Spans only
//!
//! ```
//! use tempex_core::{Locale, Recognizer};
//!
//! let recognizer = Recognizer::new("fr".parse::<Locale>().unwrap()).unwrap();
//! let spans = recognizer.extract("rendez-vous avant 22h");
//! assert_eq!(spans[0].text, "avant 22h");
//! ```

pub mod error;
pub mod extractor;
pub mod locale;
pub mod merge;
pub mod pattern;
pub mod resolve;
pub mod tag;
pub mod types;

pub use error::{Error, Result};
pub use extractor::{DateTimeExtractor, RegexExtractor};
pub use locale::{Locale, LocaleConfiguration};
pub use merge::{MergedExtractor, CATEGORY_ORDER};
pub use resolve::{resolve, DateTimeParser, Resolution};
pub use tag::{generate_regex_tag, TypeTag};
pub use types::*;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A recognized span paired with its value, if one could be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognized {
    pub span: ExtractResult,
    pub resolution: Option<Resolution>,
}

/// Main entry point - a recognizer bound to one locale.
///
/// Cheap to create and to copy: the locale data is shared process-wide.
#[derive(Clone, Copy)]
pub struct Recognizer {
    locale: Locale,
    config: &'static dyn LocaleConfiguration,
}

impl Recognizer {
    /// Create a recognizer for `locale`.
    ///
    /// Fails only if the locale's patterns do not compile.
    pub fn new(locale: Locale) -> Result<Self> {
        Ok(Self {
            locale,
            config: crate::locale::configuration(locale)?,
        })
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn configuration(&self) -> &'static dyn LocaleConfiguration {
        self.config
    }

    /// Extract spans relative to the current local time.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ExtractResult> {
        self.extract_at(text, Local::now().naive_local())
    }

    /// Extract spans relative to `reference`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tempex_core::{Category, Locale, Recognizer};
    ///
    /// let recognizer = Recognizer::new(Locale::Japanese).unwrap();
    /// let reference = NaiveDate::from_ymd_opt(2024, 1, 15)
    ///     .unwrap()
    ///     .and_hms_opt(9, 0, 0)
    ///     .unwrap();
    /// let spans = recognizer.extract_at("3時以降に電話して", reference);
    /// assert_eq!(spans[0].text, "3時以降");
    /// assert_eq!(spans[0].category, Category::Time);
    /// ```
    #[must_use]
    pub fn extract_at(&self, text: &str, reference: NaiveDateTime) -> Vec<ExtractResult> {
        MergedExtractor::new(self.config).extract(text, reference)
    }

    /// Extract and resolve relative to the current local time.
    #[must_use]
    pub fn recognize(&self, text: &str) -> Vec<Recognized> {
        self.recognize_at(text, Local::now().naive_local())
    }

    /// Extract and resolve relative to `reference`.
    #[must_use]
    pub fn recognize_at(&self, text: &str, reference: NaiveDateTime) -> Vec<Recognized> {
        self.extract_at(text, reference)
            .into_iter()
            .map(|span| {
                let resolution = resolve(self.config, &span, reference);
                Recognized { span, resolution }
            })
            .collect()
    }
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}
