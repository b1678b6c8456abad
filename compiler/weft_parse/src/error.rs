//! Parse error types.

use weft_grammar::{GrammarError, TokenKind};
use weft_lexer::LexError;

/// Why the engine rejected a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    /// The token kind has no label in the grammar.
    #[error("bad token")]
    BadToken,
    /// No arc of the current state accepts the token.
    #[error("bad input")]
    BadInput,
    /// The start symbol was complete but tokens remain.
    #[error("too much input")]
    TooMuchInput,
    /// The token stream ended before the start symbol was complete.
    #[error("incomplete input")]
    IncompleteInput,
}

/// A parse failure on one token, with the rules being parsed at the time.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {kind} at {token_kind} {token:?} while parsing {}", context.join(" > "))]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token_kind: TokenKind,
    pub token: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// Rule names on the parser stack, outermost first.
    pub context: Vec<&'static str>,
}

/// Anything that stops source text from becoming a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("tokenize error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

impl SyntaxError {
    /// 1-based line of the failure, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            SyntaxError::Lex(err) => Some(err.line),
            SyntaxError::Parse(err) => Some(err.line),
            SyntaxError::Grammar(_) => None,
        }
    }
}
