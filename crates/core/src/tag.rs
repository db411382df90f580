//! Pattern tag allocation.
//!
//! Every named pattern gets a tag when it is registered. Tags carry a
//! priority taken from a process-wide counter, so a pattern registered
//! earlier always has a lower priority number than one registered later.
//! Extractors use that order to pick a single winner when several patterns
//! match the same text.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Last priority handed out. Only pattern registration touches it.
static PRIORITY: AtomicU32 = AtomicU32::new(0);

/// Name and registration priority of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    pub name: String,
    pub priority: u32,
}

impl TypeTag {
    #[must_use]
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }
}

/// Lower priority sorts first: earlier-registered wins.
impl Ord for TypeTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for TypeTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Allocate a tag named `{extractor_type}{suffix}` with the next priority.
///
/// The first tag in a process gets priority 1. Safe to call from several
/// threads at once.
///
/// # Examples
///
/// ```
/// use tempex_core::tag::generate_regex_tag;
///
/// let first = generate_regex_tag("date", "Weekday");
/// let second = generate_regex_tag("date", "MonthDay");
/// assert_eq!(first.name, "dateWeekday");
/// assert!(first.priority < second.priority);
/// ```
pub fn generate_regex_tag(extractor_type: &str, suffix: &str) -> TypeTag {
    let priority = PRIORITY.fetch_add(1, AtomicOrdering::Relaxed) + 1;
    TypeTag::new(format!("{extractor_type}{suffix}"), priority)
}
