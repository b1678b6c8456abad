//! Parser for the weft formatter.
//!
//! Source text is tokenized by `weft_lexer`, the driver folds comments and
//! whitespace into token prefixes, and a table-driven engine built from the
//! `weft_grammar` automata assembles an arena [`Tree`]. Soft keywords
//! (`match`, `case`) are resolved by racing node-free copies of the parser
//! stack over a bounded lookahead window.
//!
//! Malformed input is a terminal error; there is no recovery.

mod driver;
mod engine;
mod error;
mod speculative;
mod stack;
mod tree;

pub use driver::{build_inputs, Driver, ParserConfig, DEFAULT_LOOKAHEAD_BUDGET};
pub use engine::Input;
pub use error::{ParseError, ParseErrorKind, SyntaxError};
pub use stack::ensure_sufficient_stack;
pub use tree::{NodeId, NodeKind, Tree};
pub use weft_grammar::{Grammar, Symbol, TokenKind};

/// Tokenize and parse `src` (with `\n` line endings) using the bundled
/// grammar.
pub fn parse_source(src: &str, config: &ParserConfig) -> Result<Tree, SyntaxError> {
    let grammar = Grammar::python()?;
    let tokens = weft_lexer::tokenize(src)?;
    let tree = Driver::new(grammar, *config).parse_tokens(src, &tokens)?;
    Ok(tree)
}
