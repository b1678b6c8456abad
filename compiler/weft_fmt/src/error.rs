//! Formatter error types.

use weft_parse::SyntaxError;

/// An unusable style configuration.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("unknown style preset `{0}` (expected one of pep8, google, facebook)")]
    UnknownPreset(String),
    #[error("invalid style file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot encode style: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
    #[error("invalid regex for `{key}`: {source}")]
    InvalidRegex {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a source file could not be formatted.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The input does not tokenize or parse.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The style cannot be applied.
    #[error(transparent)]
    Style(#[from] StyleError),
    /// The formatted output no longer parses. This is a formatter bug; the
    /// output is withheld.
    #[error("formatted output does not parse: {source}")]
    Verify {
        #[source]
        source: SyntaxError,
    },
}

impl FormatError {
    /// True for errors caused by the input rather than by the formatter.
    pub fn is_input_error(&self) -> bool {
        matches!(self, FormatError::Syntax(_))
    }
}

/// A `--lines` argument that is not `START-END` with `1 <= START <= END`.
#[derive(Debug, thiserror::Error)]
#[error("invalid line range `{0}` (expected START-END, 1-based, START <= END)")]
pub struct LineRangeError(pub String);
