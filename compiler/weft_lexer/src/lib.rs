//! Tokenizer for the weft formatter.
//!
//! Produces `(kind, text, start, end, line)` quintuples from `\n`-terminated
//! source text: names, numbers, strings (every prefix, triple-quoted and
//! continued across lines), operators mapped to their specific
//! [`TokenKind`], comments, NL for non-logical line ends, and the
//! indentation tokens NEWLINE / INDENT / DEDENT / ENDMARKER.
//!
//! The tokenizer is lazy ([`Tokenizer`] is an iterator) and restartable
//! (cloning it forks the stream). Sources with `\r\n` or `\r` line endings
//! go through [`normalize_newlines`] first.

mod error;
mod tokenizer;

use std::borrow::Cow;

pub use error::{LexError, LexErrorKind};
pub use tokenizer::Tokenizer;
pub use weft_grammar::TokenKind;

/// A source position: 1-based line, 0-based character column and byte
/// offset into the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

/// One token quintuple. `line` is the physical line (or lines, for a
/// multi-line string) the token was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub start: Pos,
    pub end: Pos,
    pub line: &'src str,
}

impl Token<'_> {
    /// Tokens the grammar consumes (everything but comments and NL).
    #[inline]
    pub fn is_significant(&self) -> bool {
        !self.kind.is_trivia()
    }
}

/// Tokenize a whole source eagerly.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    Tokenizer::new(src).collect()
}

/// Rewrite `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(src: &str) -> Cow<'_, str> {
    if memchr::memchr(b'\r', src.as_bytes()).is_none() {
        return Cow::Borrowed(src);
    }
    Cow::Owned(src.replace("\r\n", "\n").replace('\r', "\n"))
}

#[cfg(test)]
mod tests;
