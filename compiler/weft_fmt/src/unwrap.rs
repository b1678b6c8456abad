//! Flatten an annotated tree into logical lines.
//!
//! Leaves are visited in source order. Statement and clause boundaries
//! start a new line; INDENT and DEDENT move the block depth. Everything
//! between two boundaries, comments inside brackets and trailing comments
//! included, becomes one [`LogicalLine`].

use weft_parse::{NodeId, Symbol, TokenKind, Tree};

use crate::annotate::Annotations;
use crate::line::LogicalLine;
use crate::style::Style;
use crate::token::FormatToken;

/// Keywords that open a statement or clause when they are a direct child of
/// a compound statement.
const CLAUSE_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "while", "for", "try", "except", "finally", "with", "def", "class",
    "async",
];

/// Soft keywords that open a clause only as the first child of their node.
const SOFT_CLAUSE_KEYWORDS: &[&str] = &["match", "case"];

struct Unwrapper<'a> {
    tree: &'a Tree,
    annotations: &'a Annotations,
    lines: Vec<LogicalLine>,
    current: LogicalLine,
    depth: usize,
    /// Extra depth for the line being started: an inline suite body.
    pending_extra_depth: usize,
    pending_docstring: bool,
}

/// Split the tree into logical lines with formatting information computed.
pub(crate) fn unwrap_tree(tree: &Tree, annotations: &Annotations, style: &Style) -> Vec<LogicalLine> {
    let Some(root) = tree.root() else {
        return Vec::new();
    };
    let mut unwrapper = Unwrapper {
        tree,
        annotations,
        lines: Vec::new(),
        current: LogicalLine::new(0),
        depth: 0,
        pending_extra_depth: 0,
        pending_docstring: false,
    };
    for leaf in tree.leaves(root) {
        unwrapper.visit_leaf(leaf);
    }
    unwrapper.start_new_line();

    let mut lines = unwrapper.lines;
    for line in &mut lines {
        line.mark_unbreakable_outside_brackets();
        line.calculate_formatting_information(style);
    }
    tracing::debug!(lines = lines.len(), "unwrapped logical lines");
    lines
}

impl Unwrapper<'_> {
    fn start_new_line(&mut self) {
        if !self.current.tokens.is_empty() {
            let finished = std::mem::replace(&mut self.current, LogicalLine::new(self.depth));
            self.lines.push(finished);
        }
        self.pending_extra_depth = 0;
        self.pending_docstring = false;
    }

    fn visit_leaf(&mut self, leaf: NodeId) {
        let tree = self.tree;
        match tree.token(leaf) {
            Some(TokenKind::Newline | TokenKind::Endmarker) => {
                self.start_new_line();
                return;
            }
            Some(TokenKind::Indent) => {
                self.start_new_line();
                self.depth += 1;
                return;
            }
            Some(TokenKind::Dedent) => {
                self.start_new_line();
                self.depth = self.depth.saturating_sub(1);
                return;
            }
            _ => {}
        }

        let mut is_keyword = false;
        if let Some(statement) = self.statement_started_by(leaf) {
            self.start_new_line();
            if self.is_inline_body(statement) {
                self.pending_extra_depth = 1;
            }
            self.pending_docstring = self.is_docstring(statement);
        } else if self.starts_clause(leaf) {
            self.start_new_line();
        }
        if self.is_soft_clause_keyword(leaf) {
            is_keyword = true;
        }
        self.append(leaf, is_keyword);
    }

    fn append(&mut self, leaf: NodeId, soft_keyword: bool) {
        let tree = self.tree;
        let Some(kind) = tree.token(leaf) else {
            return;
        };
        if self.current.tokens.is_empty() {
            self.current.depth = self.depth + self.pending_extra_depth;
            self.current.is_docstring = self.pending_docstring;
        }
        let mut token = FormatToken::new(leaf, kind, tree.value(leaf), tree.line(leaf), tree.column(leaf));
        token.is_keyword |= soft_keyword;
        token.subtypes = self.annotations.subtypes(leaf);
        token.node_split_penalty = self.annotations.split_penalty(leaf);
        token.must_split = self.annotations.must_split(leaf);
        token.after_continuation = tree.prefix(leaf).contains('\\');
        self.current.tokens.push(token);
    }

    /// The statement-like node whose first leaf is `leaf`: a simple
    /// statement, a decorator or an except clause.
    fn statement_started_by(&self, leaf: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        let mut node = leaf;
        while let Some(parent) = tree.parent(node) {
            if tree.first_leaf(parent) != Some(leaf) {
                return None;
            }
            if matches!(
                tree.symbol(parent),
                Some(Symbol::SimpleStmt | Symbol::Decorator | Symbol::ExceptClause)
            ) {
                return Some(parent);
            }
            node = parent;
        }
        None
    }

    /// A simple statement written after the colon of its header.
    fn is_inline_body(&self, statement: NodeId) -> bool {
        let tree = self.tree;
        if !tree.is_symbol(statement, Symbol::SimpleStmt) {
            return false;
        }
        let compound_parent = tree
            .parent(statement)
            .and_then(|parent| tree.symbol(parent))
            .is_some_and(Symbol::is_compound_statement);
        compound_parent && tree.prev_sibling(statement).is_some_and(|prev| tree.is_value(prev, ":"))
    }

    fn starts_clause(&self, leaf: NodeId) -> bool {
        let tree = self.tree;
        if !tree.is_token(leaf, TokenKind::Name) {
            return false;
        }
        let value = tree.value(leaf);
        let compound_parent = tree
            .parent(leaf)
            .and_then(|parent| tree.symbol(parent))
            .is_some_and(Symbol::is_compound_statement);
        if !compound_parent {
            return false;
        }
        if self.is_soft_clause_keyword(leaf) {
            return true;
        }
        if !CLAUSE_KEYWORDS.contains(&value) {
            return false;
        }
        !self
            .current
            .last()
            .is_some_and(|prev| prev.is_keyword_value("async"))
    }

    fn is_soft_clause_keyword(&self, leaf: NodeId) -> bool {
        let tree = self.tree;
        SOFT_CLAUSE_KEYWORDS.contains(&tree.value(leaf))
            && tree.is_token(leaf, TokenKind::Name)
            && tree.child_index(leaf) == Some(0)
            && tree
                .parent(leaf)
                .is_some_and(|parent| matches!(tree.symbol(parent), Some(Symbol::MatchStmt | Symbol::CaseBlock)))
    }

    /// A lone string statement opening a module, class or function body.
    fn is_docstring(&self, statement: NodeId) -> bool {
        let tree = self.tree;
        if !tree.is_symbol(statement, Symbol::SimpleStmt) || !self.is_string_statement(statement) {
            return false;
        }
        let Some(parent) = tree.parent(statement) else {
            return false;
        };
        match tree.symbol(parent) {
            Some(Symbol::FileInput) => self.first_code_statement(parent) == Some(statement),
            Some(Symbol::Funcdef | Symbol::Classdef) => true,
            Some(Symbol::Suite) => {
                let owner = tree.parent(parent).and_then(|owner| tree.symbol(owner));
                matches!(owner, Some(Symbol::Funcdef | Symbol::Classdef))
                    && self.first_code_statement(parent) == Some(statement)
            }
            _ => false,
        }
    }

    fn is_string_statement(&self, statement: NodeId) -> bool {
        let tree = self.tree;
        let children = tree.children(statement);
        let [expression, newline] = children else {
            return false;
        };
        if !tree.is_token(*newline, TokenKind::Newline) {
            return false;
        }
        if tree.is_token(*expression, TokenKind::String) {
            return true;
        }
        tree.is_symbol(*expression, Symbol::Atom)
            && tree
                .children(*expression)
                .iter()
                .all(|&part| tree.is_token(part, TokenKind::String))
    }

    /// First child of a body that is a statement other than a comment.
    fn first_code_statement(&self, body: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        tree.children(body).iter().copied().find(|&child| {
            !tree.is_leaf(child)
                && !tree
                    .child(child, 0)
                    .is_some_and(|first| tree.is_token(first, TokenKind::Comment))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
