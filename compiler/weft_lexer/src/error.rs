//! Tokenizer errors.

/// What went wrong while tokenizing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    /// A string literal runs to the end of its line (or of the file, for
    /// triple-quoted strings).
    #[error("unterminated string literal")]
    UnterminatedString,
    /// End of file inside brackets or after a backslash continuation.
    #[error("unexpected end of file in multi-line statement")]
    UnexpectedEof,
    /// A dedent that does not return to any enclosing indentation level.
    #[error("unindent does not match any outer indentation level")]
    InconsistentDedent,
    /// A closing bracket with no opening bracket.
    #[error("unmatched '{0}'")]
    UnmatchedBracket(char),
    /// A character that cannot start any token.
    #[error("invalid character {0:?}")]
    StrayCharacter(char),
}

/// A tokenizer failure at a 1-based line and column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{line}:{column}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: u32,
    pub column: u32,
}

impl LexError {
    pub(crate) fn new(kind: LexErrorKind, line: u32, column: u32) -> Self {
        LexError { kind, line, column }
    }
}
