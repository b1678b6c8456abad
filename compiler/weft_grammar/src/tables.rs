//! Parse table types: labels and per-symbol automata.

use rustc_hash::FxHashSet;

use crate::{Symbol, TokenKind};

/// Index into the label table. Label 0 is reserved for "empty".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub(crate) u16);

impl LabelId {
    /// The reserved empty label.
    pub const EMPTY: LabelId = LabelId(0);

    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// What a label matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelTarget {
    Empty,
    Token(TokenKind),
    Symbol(Symbol),
}

/// One entry of the label table.
///
/// Keyword labels target `NAME` and carry the keyword text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub target: LabelTarget,
    pub keyword: Option<Box<str>>,
}

impl Label {
    pub(crate) const EMPTY: Label = Label {
        target: LabelTarget::Empty,
        keyword: None,
    };

    /// Number in the shared token/symbol space.
    pub fn number(&self) -> u16 {
        match self.target {
            LabelTarget::Empty => 0,
            LabelTarget::Token(kind) => kind.number(),
            LabelTarget::Symbol(symbol) => symbol.number(),
        }
    }

    /// Human-readable form used in diagnostics.
    pub fn describe(&self) -> String {
        match (&self.keyword, self.target) {
            (Some(keyword), _) => format!("'{keyword}'"),
            (None, LabelTarget::Token(kind)) => kind.op_text().map_or_else(
                || kind.name().to_owned(),
                |op| format!("'{op}'"),
            ),
            (None, LabelTarget::Symbol(symbol)) => symbol.name().to_owned(),
            (None, LabelTarget::Empty) => "<empty>".to_owned(),
        }
    }
}

/// One DFA state: outgoing arcs in label order plus the accept flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) arcs: Vec<(LabelId, usize)>,
    pub(crate) is_final: bool,
}

impl DfaState {
    #[inline]
    pub fn arcs(&self) -> &[(LabelId, usize)] {
        &self.arcs
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Final with nowhere else to go: the frame can be popped eagerly.
    #[inline]
    pub fn is_accept_only(&self) -> bool {
        self.is_final && self.arcs.is_empty()
    }
}

/// Automaton of one grammar rule. State 0 is the start state.
#[derive(Clone, Debug)]
pub struct Dfa {
    pub(crate) states: Vec<DfaState>,
    pub(crate) first: FxHashSet<LabelId>,
}

impl Dfa {
    #[inline]
    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    #[inline]
    pub fn state(&self, index: usize) -> Option<&DfaState> {
        self.states.get(index)
    }

    /// Whether `label` can begin this rule.
    #[inline]
    pub fn starts_with(&self, label: LabelId) -> bool {
        self.first.contains(&label)
    }

    pub fn first_set(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.first.iter().copied()
    }
}
