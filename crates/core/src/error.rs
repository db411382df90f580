//! Error types for tempex.

/// Errors that can occur while building recognizers.
///
/// Recognition itself never fails: absence of a match is an empty result.
/// Errors only surface while locating or compiling a locale.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// No locale is registered under this identifier.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// A locale pattern failed to compile.
    #[error("invalid pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
