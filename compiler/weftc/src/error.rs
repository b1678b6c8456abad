//! CLI error types.

use std::path::PathBuf;

use weft_fmt::{FormatError, StyleError};

use crate::source::EncodingError;

/// Errors reported by the `weft` command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Bad command line.
    #[error("{0}")]
    Usage(String),
    /// A file or directory could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A source file is not in an encoding weft can read or write back.
    #[error("{}: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: EncodingError,
    },
    /// A style file or `--style` value is unusable.
    #[error("{}: {source}", path.display())]
    Style {
        path: PathBuf,
        #[source]
        source: StyleError,
    },
    /// One input could not be formatted.
    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
