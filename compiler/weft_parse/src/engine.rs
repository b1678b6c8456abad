//! Table-driven shift engine.
//!
//! The engine keeps a stack of `(symbol, state)` frames, one per rule being
//! recognised. Each token is offered to the arcs of the top frame's current
//! DFA state: an arc labelled with a rule whose first set contains the
//! token pushes that rule; an arc labelled with the token itself shifts it.
//! When no arc matches, an accepting frame is popped and the token retried
//! one level up.
//!
//! The transition logic is written once against [`ParseStack`] and runs on
//! two stacks: [`NodeStack`] builds the tree, [`Sketch`] only tracks states
//! and is cheap to clone for speculative parsing.

use smallvec::{smallvec, SmallVec};
use tracing::trace;
use weft_grammar::{Grammar, LabelId, Symbol, TokenKind};
use weft_lexer::Pos;

use crate::tree::{NodeId, Tree};
use crate::ParseErrorKind;

/// A significant token as the engine sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Input<'src> {
    pub kind: TokenKind,
    pub value: &'src str,
    pub prefix: &'src str,
    pub start: Pos,
}

/// Candidate labels of one token. Two candidates only for soft keywords.
pub(crate) type Candidates = SmallVec<[LabelId; 2]>;

/// Map a token to its candidate labels.
///
/// Reserved keywords map to their keyword label. Soft keywords can only
/// introduce a statement, so they are ambiguous (`[NAME, soft keyword]`, in
/// that order) right after a statement boundary and plain names elsewhere.
pub(crate) fn classify(
    grammar: &Grammar,
    input: &Input<'_>,
    last_token: Option<TokenKind>,
) -> Result<Candidates, ParseErrorKind> {
    if input.kind == TokenKind::Name {
        if let Some(keyword) = grammar.keyword_label(input.value) {
            return Ok(smallvec![keyword]);
        }
        if let Some(soft) = grammar.soft_keyword_label(input.value) {
            let name = grammar
                .token_label(TokenKind::Name)
                .ok_or(ParseErrorKind::BadToken)?;
            let at_statement_start = matches!(
                last_token,
                None | Some(
                    TokenKind::Indent
                        | TokenKind::Dedent
                        | TokenKind::Newline
                        | TokenKind::Semi
                        | TokenKind::Colon
                )
            );
            return Ok(if at_statement_start {
                smallvec![name, soft]
            } else {
                smallvec![name]
            });
        }
    }
    grammar
        .token_label(input.kind)
        .map(|label| smallvec![label])
        .ok_or(ParseErrorKind::BadToken)
}

/// Frame operations the transition function needs.
pub(crate) trait ParseStack {
    /// Symbol and DFA state of the top frame.
    fn top(&self) -> Option<(Symbol, usize)>;

    /// Move the top frame to `state` and open a frame for `symbol`.
    fn push(&mut self, symbol: Symbol, state: usize);

    /// Consume `input` in the top frame and move it to `state`.
    fn shift(&mut self, input: &Input<'_>, state: usize);

    /// Close the top frame. Returns `true` when the stack became empty.
    fn pop(&mut self) -> bool;

    /// Rule names on the stack, outermost first.
    fn context(&self) -> Vec<&'static str>;
}

/// Outcome of feeding one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// More tokens are expected.
    Continue,
    /// The start symbol is complete.
    Done,
}

/// Feed one classified token to `stack`.
pub(crate) fn add_token<S: ParseStack>(
    grammar: &Grammar,
    stack: &mut S,
    label: LabelId,
    input: &Input<'_>,
) -> Result<Step, ParseErrorKind> {
    'retry: loop {
        let (symbol, state) = stack.top().ok_or(ParseErrorKind::TooMuchInput)?;
        let dfa = grammar.dfa(symbol);
        let current = dfa.state(state).ok_or(ParseErrorKind::BadInput)?;

        for &(arc, next) in current.arcs() {
            if arc == label {
                stack.shift(input, next);
                trace!(symbol = %symbol, token = input.value, "shift");
                // Close every frame that can only accept from here.
                while let Some((top, top_state)) = stack.top() {
                    let accept_only = grammar
                        .dfa(top)
                        .state(top_state)
                        .is_some_and(weft_grammar::DfaState::is_accept_only);
                    if !accept_only {
                        break;
                    }
                    if stack.pop() {
                        return Ok(Step::Done);
                    }
                }
                return Ok(Step::Continue);
            }
            if let Some(inner) = grammar.label_symbol(arc) {
                if grammar.dfa(inner).starts_with(label) {
                    trace!(symbol = %inner, "push");
                    stack.push(inner, next);
                    continue 'retry;
                }
            }
        }

        if current.is_final() {
            trace!(symbol = %symbol, "pop");
            if stack.pop() {
                return Err(ParseErrorKind::TooMuchInput);
            }
        } else {
            return Err(ParseErrorKind::BadInput);
        }
    }
}

struct NodeFrame {
    symbol: Symbol,
    state: usize,
    children: Vec<NodeId>,
}

/// Stack that builds tree nodes as frames close.
pub(crate) struct NodeStack<'t> {
    tree: &'t mut Tree,
    frames: Vec<NodeFrame>,
    start: Symbol,
}

impl<'t> NodeStack<'t> {
    pub(crate) fn new(tree: &'t mut Tree, start: Symbol) -> Self {
        NodeStack {
            tree,
            frames: vec![NodeFrame {
                symbol: start,
                state: 0,
                children: Vec::new(),
            }],
            start,
        }
    }

    /// Symbols and states only, for speculative parsing.
    pub(crate) fn sketch(&self, last_token: Option<TokenKind>) -> Sketch {
        Sketch {
            frames: self
                .frames
                .iter()
                .map(|frame| (frame.symbol, frame.state))
                .collect(),
            last_token,
        }
    }
}

impl ParseStack for NodeStack<'_> {
    fn top(&self) -> Option<(Symbol, usize)> {
        self.frames.last().map(|frame| (frame.symbol, frame.state))
    }

    fn push(&mut self, symbol: Symbol, state: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.state = state;
        }
        self.frames.push(NodeFrame {
            symbol,
            state: 0,
            children: Vec::new(),
        });
    }

    fn shift(&mut self, input: &Input<'_>, state: usize) {
        let leaf = self.tree.new_leaf(
            input.kind,
            input.value,
            input.prefix,
            input.start.line,
            input.start.column,
        );
        if let Some(frame) = self.frames.last_mut() {
            frame.children.push(leaf);
            frame.state = state;
        }
    }

    fn pop(&mut self) -> bool {
        let Some(frame) = self.frames.pop() else {
            return true;
        };
        // A rule that matched a single child is represented by that child,
        // except for the start symbol which always gets its own node.
        let node = if frame.children.len() == 1 && frame.symbol != self.start {
            frame.children[0]
        } else {
            self.tree.new_interior(frame.symbol, frame.children)
        };
        match self.frames.last_mut() {
            Some(parent) => {
                parent.children.push(node);
                false
            }
            None => {
                self.tree.set_root(node);
                true
            }
        }
    }

    fn context(&self) -> Vec<&'static str> {
        self.frames.iter().map(|frame| frame.symbol.name()).collect()
    }
}

/// Node-free copy of a parser stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Sketch {
    frames: Vec<(Symbol, usize)>,
    pub(crate) last_token: Option<TokenKind>,
}

impl ParseStack for Sketch {
    fn top(&self) -> Option<(Symbol, usize)> {
        self.frames.last().copied()
    }

    fn push(&mut self, symbol: Symbol, state: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.1 = state;
        }
        self.frames.push((symbol, 0));
    }

    fn shift(&mut self, input: &Input<'_>, state: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.1 = state;
        }
        self.last_token = Some(input.kind);
    }

    fn pop(&mut self) -> bool {
        self.frames.pop();
        self.frames.is_empty()
    }

    fn context(&self) -> Vec<&'static str> {
        self.frames.iter().map(|(symbol, _)| symbol.name()).collect()
    }
}
