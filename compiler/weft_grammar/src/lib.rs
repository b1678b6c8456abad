//! Grammar tables for the weft formatter.
//!
//! The grammar is written as EBNF rule text (`grammar.txt`) and turned into
//! one deterministic automaton per rule by [`Grammar::generate`]. The result
//! is immutable; [`Grammar::python`] builds the bundled grammar once and
//! shares it by reference with every parse, including parses running on
//! other threads.
//!
//! Token kinds and symbols share one label number space: token kinds are
//! numbered below 256, symbols from 256 upward, and label 0 is reserved as
//! the empty label.

mod generator;
mod symbol;
mod tables;
mod token;

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

pub use symbol::{Symbol, FIRST_SYMBOL_NUMBER};
pub use tables::{Dfa, DfaState, Label, LabelId, LabelTarget};
pub use token::TokenKind;

/// Rule text of the bundled grammar.
pub const GRAMMAR_TEXT: &str = include_str!("grammar.txt");

/// Failure to turn rule text into parse tables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar line {line}: {message}")]
    Syntax { line: u32, message: String },

    #[error("grammar line {line}: unknown name `{name}`")]
    UnknownName { line: u32, name: String },

    #[error("grammar line {line}: unknown operator '{op}'")]
    UnknownOperator { line: u32, op: String },

    #[error("rule `{0}` is defined twice")]
    DuplicateRule(String),

    #[error("rule `{0}` is never defined")]
    MissingRule(String),

    #[error("rule `{0}` is left-recursive")]
    LeftRecursion(String),

    #[error("rule `{rule}` is ambiguous: {label} begins both {first} and {second}")]
    Ambiguous {
        rule: String,
        label: String,
        first: String,
        second: String,
    },
}

/// Immutable parse tables.
#[derive(Debug)]
pub struct Grammar {
    start: Symbol,
    /// Indexed by [`Symbol::index`].
    dfas: Vec<Dfa>,
    labels: Vec<Label>,
    tokens: FxHashMap<TokenKind, LabelId>,
    keywords: FxHashMap<String, LabelId>,
    soft_keywords: FxHashMap<String, LabelId>,
}

static PYTHON: OnceLock<Result<Grammar, GrammarError>> = OnceLock::new();

impl Grammar {
    /// Generate tables from rule text. Every [`Symbol`] must have a rule.
    pub fn generate(text: &str, start: Symbol) -> Result<Grammar, GrammarError> {
        generator::generate(text, start)
    }

    /// The bundled grammar, generated on first use.
    pub fn python() -> Result<&'static Grammar, GrammarError> {
        PYTHON
            .get_or_init(|| Grammar::generate(GRAMMAR_TEXT, Symbol::FileInput))
            .as_ref()
            .map_err(Clone::clone)
    }

    #[inline]
    pub fn start(&self) -> Symbol {
        self.start
    }

    #[inline]
    pub fn dfa(&self, symbol: Symbol) -> &Dfa {
        &self.dfas[symbol.index()]
    }

    #[inline]
    pub fn label(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label of a plain (non-keyword) token kind.
    #[inline]
    pub fn token_label(&self, kind: TokenKind) -> Option<LabelId> {
        self.tokens.get(&kind).copied()
    }

    /// Label of a reserved keyword.
    #[inline]
    pub fn keyword_label(&self, text: &str) -> Option<LabelId> {
        self.keywords.get(text).copied()
    }

    /// Label of a soft keyword.
    #[inline]
    pub fn soft_keyword_label(&self, text: &str) -> Option<LabelId> {
        self.soft_keywords.get(text).copied()
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords.contains_key(text)
    }

    pub fn is_soft_keyword(&self, text: &str) -> bool {
        self.soft_keywords.contains_key(text)
    }

    /// Symbol targeted by a label, if it names a rule.
    #[inline]
    pub fn label_symbol(&self, id: LabelId) -> Option<Symbol> {
        match self.label(id).target {
            LabelTarget::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }
}
