//! Split penalty assignment.
//!
//! The penalty on a leaf is the cost of breaking the line right before it.
//! Tighter constructs get higher penalties, so the search prefers to split
//! at the loosest point of an expression: `or` before `and` before
//! comparisons before arithmetic, and so on down to atoms.

use weft_grammar::{Symbol, TokenKind};
use weft_parse::{ensure_sufficient_stack, NodeId, Tree};

use super::Annotations;
use crate::style::Style;

/// Never split here.
pub(crate) const UNBREAKABLE: i32 = 1000 * 1000;
pub(crate) const NAMED_ASSIGN: i32 = 15_000;
pub(crate) const DOTTED_NAME: i32 = 4_000;
pub(crate) const VERY_STRONGLY_CONNECTED: i32 = 3_500;
pub(crate) const STRONGLY_CONNECTED: i32 = 3_000;
pub(crate) const CONNECTED: i32 = 500;
pub(crate) const TOGETHER: i32 = 100;

const OR_TEST: i32 = 1_000;
const AND_TEST: i32 = 1_100;
const NOT_TEST: i32 = 1_200;
const COMPARISON: i32 = 1_300;
const STAR_EXPR: i32 = 1_300;
const EXPR: i32 = 1_400;
const XOR_EXPR: i32 = 1_500;
const AND_EXPR: i32 = 1_700;
const SHIFT_EXPR: i32 = 1_800;
const ARITH_EXPR: i32 = 1_900;
const TERM: i32 = 2_000;
const FACTOR: i32 = 2_100;
const ATOM: i32 = 2_300;
const ONE_ELEMENT_ARGUMENT: i32 = 500;

pub(super) fn assign(tree: &Tree, annotations: &mut Annotations, style: &Style) {
    if let Some(root) = tree.root() {
        PenaltyAssigner {
            tree,
            annotations,
            style,
        }
        .visit(root);
    }
}

struct PenaltyAssigner<'a> {
    tree: &'a Tree,
    annotations: &'a mut Annotations,
    style: &'a Style,
}

impl PenaltyAssigner<'_> {
    fn visit(&mut self, node: NodeId) {
        let Some(symbol) = self.tree.symbol(node) else {
            return;
        };
        ensure_sufficient_stack(|| match symbol {
            Symbol::ImportAsNames => self.import_as_names(node),
            Symbol::Classdef => self.classdef(node),
            Symbol::Funcdef => self.funcdef(node),
            Symbol::Lambdef => self.lambdef(node),
            Symbol::Parameters => self.parameters(node),
            Symbol::Arglist => self.arglist(node),
            Symbol::Argument => self.connect_around(node, "=", NAMED_ASSIGN),
            Symbol::Tname => self.connect_around(node, ":", NAMED_ASSIGN),
            Symbol::DottedName => {
                self.visit_children(node);
                for &child in self.tree.children(node).iter().skip(1) {
                    self.set_unbreakable(child);
                }
            }
            Symbol::Dictsetmaker => {
                self.visit_children(node);
                for &child in self.tree.children(node) {
                    if self.tree.is_token(child, TokenKind::Colon) {
                        self.set_recursive(child, STRONGLY_CONNECTED);
                    }
                }
            }
            Symbol::Trailer => self.trailer(node),
            Symbol::Power => self.power(node),
            Symbol::Atom => self.atom(node),
            Symbol::TestlistGexp => self.testlist_gexp(node),
            Symbol::OrTest => self.logical(node, OR_TEST),
            Symbol::AndTest => self.logical(node, AND_TEST),
            Symbol::NotTest => {
                self.visit_children(node);
                self.increase(node, NOT_TEST);
            }
            Symbol::Comparison => self.comparison(node),
            Symbol::StarExpr => {
                self.visit_children(node);
                self.increase(node, STAR_EXPR);
            }
            Symbol::Expr => self.bitwise(node, EXPR, "|"),
            Symbol::XorExpr => self.bitwise(node, XOR_EXPR, "^"),
            Symbol::AndExpr => self.bitwise(node, AND_EXPR, "&"),
            Symbol::ShiftExpr => {
                self.visit_children(node);
                self.increase(node, SHIFT_EXPR);
            }
            Symbol::ArithExpr => self.arithmetic(node, ARITH_EXPR, &["+", "-"]),
            Symbol::Term => self.arithmetic(node, TERM, &["*", "@", "/", "%", "//"]),
            Symbol::Factor => {
                self.visit_children(node);
                self.increase(node, FACTOR);
            }
            Symbol::Subscriptlist => self.subscriptlist(node),
            Symbol::CompFor => {
                self.set_first_leaf(node, 0);
                self.connect_tail(node, STRONGLY_CONNECTED);
                self.visit_children(node);
            }
            Symbol::CompIf => {
                if let Some(&keyword) = self.tree.children(node).first() {
                    self.set(keyword, self.style.split_penalty_before_if_expr);
                }
                self.connect_tail(node, STRONGLY_CONNECTED);
                self.visit_children(node);
            }
            Symbol::Test => {
                self.increase(node, OR_TEST);
                self.visit_children(node);
            }
            _ => self.visit_children(node),
        });
    }

    fn visit_children(&mut self, node: NodeId) {
        for &child in self.tree.children(node) {
            self.visit(child);
        }
    }

    fn get(&self, leaf: NodeId) -> i32 {
        self.annotations.split_penalty(leaf)
    }

    fn set(&mut self, leaf: NodeId, penalty: i32) {
        self.annotations.set_split_penalty(leaf, penalty);
    }

    fn set_first_leaf(&mut self, node: NodeId, penalty: i32) {
        if let Some(leaf) = self.tree.first_leaf(node) {
            self.set(leaf, penalty);
        }
    }

    fn set_recursive(&mut self, node: NodeId, penalty: i32) {
        for leaf in self.tree.leaves(node) {
            self.set(leaf, penalty);
        }
    }

    fn set_unbreakable(&mut self, node: NodeId) {
        self.set_recursive(node, UNBREAKABLE);
    }

    /// Every child after the first gets `penalty` on all its leaves.
    fn connect_tail(&mut self, node: NodeId, penalty: i32) {
        for &child in self.tree.children(node).iter().skip(1) {
            self.set_recursive(child, penalty);
        }
    }

    /// Add `amount` to every leaf of `node` except its first, and except
    /// opening parens and `for` keywords, which start their own scope.
    fn increase(&mut self, node: NodeId, amount: i32) {
        let first = self.tree.first_leaf(node);
        for leaf in self.tree.leaves(node) {
            if Some(leaf) == first || matches!(self.tree.value(leaf), "(" | "for") {
                continue;
            }
            let penalty = self.get(leaf);
            self.set(leaf, penalty.saturating_add(amount));
        }
    }

    fn decrease(&mut self, leaf: NodeId, amount: i32) {
        let penalty = self.get(leaf);
        self.set(leaf, if amount < penalty { penalty - amount } else { 0 });
    }

    fn import_as_names(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        for pair in children.windows(2) {
            if self.tree.is_token(pair[0], TokenKind::Comma) {
                self.set_first_leaf(pair[1], self.style.split_penalty_import_names);
            }
        }
    }

    fn classdef(&mut self, node: NodeId) {
        let children = self.tree.children(node).to_vec();
        if let Some(&name) = children.get(1) {
            self.set_unbreakable(name);
        }
        if children.len() > 4 {
            self.set_unbreakable(children[2]);
        }
        if let Some(&colon) = children.iter().rev().nth(1) {
            self.set_unbreakable(colon);
        }
        self.visit_children(node);
    }

    fn funcdef(&mut self, node: NodeId) {
        let children = self.tree.children(node).to_vec();
        if let Some(&name) = children.get(1) {
            self.set_unbreakable(name);
        }
        if let Some(&colon) = children.iter().find(|&&child| self.tree.is_token(child, TokenKind::Colon)) {
            self.set_unbreakable(colon);
        }
        self.visit_children(node);
    }

    fn lambdef(&mut self, node: NodeId) {
        let allow_multiline = self.style.allow_multiline_lambdas
            || self.tree.leaves(node).into_iter().any(|leaf| {
                self.tree.is_token(leaf, TokenKind::Comment)
                    && self.tree.value(leaf).contains("g-long-lambda")
            });
        let penalty = if allow_multiline {
            STRONGLY_CONNECTED
        } else {
            VERY_STRONGLY_CONNECTED
        };
        self.set_recursive(node, penalty);
    }

    fn parameters(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node);
        if let Some(&open) = children.first() {
            self.set_unbreakable(open);
        }
        if !(self.style.indent_closing_brackets || self.style.dedent_closing_brackets) {
            if let Some(&close) = children.last() {
                self.set_recursive(close, STRONGLY_CONNECTED);
            }
        }
    }

    fn arglist(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        for &child in children.iter().skip(1) {
            if self.tree.is_token(child, TokenKind::Comma) {
                self.set_unbreakable(child);
            }
        }
        for &child in &children {
            if self.tree.is_symbol(child, Symbol::Atom) {
                self.increase(child, CONNECTED);
            }
        }
    }

    /// Keep both sides of a `=` or `:` in an argument or parameter together.
    fn connect_around(&mut self, node: NodeId, op: &str, penalty: i32) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        for index in 1..children.len().saturating_sub(1) {
            if self.tree.is_value(children[index], op) {
                self.set_first_leaf(children[index], penalty);
                self.set_first_leaf(children[index + 1], penalty);
            }
        }
    }

    fn trailer(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        match children.as_slice() {
            [dot, name] if self.tree.is_value(*dot, ".") => {
                let (before, after) = if self.style.split_before_dot {
                    (VERY_STRONGLY_CONNECTED, DOTTED_NAME)
                } else {
                    (DOTTED_NAME, VERY_STRONGLY_CONNECTED)
                };
                self.set(*dot, before);
                self.set_first_leaf(*name, after);
            }
            [_, close] => self.set(*close, VERY_STRONGLY_CONNECTED),
            [open, argument, _] if self.tree.is_value(*open, "(") => {
                if !self.tree.is_symbol(*argument, Symbol::Arglist) {
                    if let Some(leaf) = self.tree.first_leaf(*argument) {
                        let penalty = self.get(leaf).max(ONE_ELEMENT_ARGUMENT);
                        self.set(leaf, penalty);
                    }
                }
            }
            _ => {}
        }
    }

    fn power(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        let start = usize::from(children.first().is_some_and(|&c| self.tree.is_value(c, "await")));
        let trailers: Vec<NodeId> = children
            .iter()
            .skip(start + 1)
            .copied()
            .take_while(|&child| self.tree.is_symbol(child, Symbol::Trailer))
            .collect();
        let Some(&first_trailer) = trailers.first() else {
            return;
        };

        // `name(`, `name[`: no break between the atom and its trailer.
        if let Some(&open) = self.tree.children(first_trailer).first() {
            if !self.tree.is_value(open, ".") {
                self.set_unbreakable(open);
            }
        }

        // Two trailers in a row form an unbreakable seam, unless the first
        // is a call whose parens may need to split.
        for pair in trailers.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if let Some(&last) = self.tree.children(previous).last() {
                if !self.tree.is_value(last, ")") {
                    self.set_recursive(last, STRONGLY_CONNECTED);
                }
            }
            if let Some(&first) = self.tree.children(current).first() {
                self.set_recursive(first, STRONGLY_CONNECTED);
            }
        }

        // No split before the closing bracket of a call or subscript.
        for &trailer in &trailers {
            let parts = self.tree.children(trailer).to_vec();
            let Some(&open) = parts.first() else {
                continue;
            };
            if !matches!(self.tree.value(open), "(" | "[") {
                continue;
            }
            if parts.len() <= 2 {
                if let Some(&close) = parts.last() {
                    self.set_recursive(close, STRONGLY_CONNECTED);
                }
                continue;
            }
            if self.tree.is_value(open, "[") {
                self.set_first_leaf(parts[1], STRONGLY_CONNECTED);
            }
            if self.style.indent_closing_brackets || self.style.dedent_closing_brackets {
                continue;
            }
            let mut close_index = parts.len() - 1;
            if self.tree.is_token(parts[close_index], TokenKind::Comment) {
                close_index -= 1;
            }
            let Some(&before_close) = parts.get(close_index.wrapping_sub(1)) else {
                continue;
            };
            let ends_with_comma = self
                .tree
                .last_leaf(before_close)
                .is_some_and(|leaf| self.tree.is_value(leaf, ","));
            if !ends_with_comma {
                let close = parts[close_index];
                if self.tree.is_value(close, "]") {
                    self.set_unbreakable(close);
                } else {
                    self.set(close, VERY_STRONGLY_CONNECTED);
                }
            }
        }
    }

    fn atom(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        let (Some(&open), Some(&close)) = (children.first(), children.last()) else {
            return;
        };
        if self.tree.is_value(open, "(") {
            if !self.tree.is_value(close, ")") {
                return;
            }
            let in_if = self
                .tree
                .parent(node)
                .is_some_and(|parent| self.tree.is_symbol(parent, Symbol::IfStmt));
            if in_if {
                self.set(close, STRONGLY_CONNECTED);
            } else {
                if children.len() > 2 {
                    self.set_first_leaf(children[1], EXPR);
                }
                self.set(close, ATOM);
            }
        } else if matches!(self.tree.value(open), "[" | "{") && children.len() == 2 {
            // Keep empty containers together.
            self.set_unbreakable(close);
        }
    }

    fn testlist_gexp(&mut self, node: NodeId) {
        self.visit_children(node);
        let mut previous_was_comma = false;
        for child in self.tree.children(node).to_vec() {
            if self.tree.is_token(child, TokenKind::Comma) {
                self.set_unbreakable(child);
                previous_was_comma = true;
            } else {
                if previous_was_comma {
                    self.set_first_leaf(child, TOGETHER);
                }
                previous_was_comma = false;
            }
        }
    }

    fn logical(&mut self, node: NodeId, penalty: i32) {
        self.visit_children(node);
        self.increase(node, penalty);
        let children = self.tree.children(node).to_vec();
        let mut index = 1;
        while index + 1 < children.len() {
            let target = if self.style.split_before_logical_operator {
                children[index]
            } else {
                children[index + 1]
            };
            if let Some(leaf) = self.tree.first_leaf(target) {
                self.decrease(leaf, penalty);
            }
            index += 2;
        }
    }

    fn comparison(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();
        if children.len() == 3 && self.strongly_connected_comparison(children[1]) {
            self.increase(children[1], VERY_STRONGLY_CONNECTED);
            self.set_first_leaf(children[2], STRONGLY_CONNECTED);
        } else {
            self.increase(node, COMPARISON);
        }
    }

    /// `==`, `in`, `not in` and `is not` bind their operands tightly.
    fn strongly_connected_comparison(&self, op: NodeId) -> bool {
        if self.tree.is_symbol(op, Symbol::CompOp) {
            let words: Vec<&str> = self
                .tree
                .children(op)
                .iter()
                .map(|&part| self.tree.value(part))
                .collect();
            return matches!(words.as_slice(), ["not", "in"] | ["is", "not"]);
        }
        self.tree.is_leaf(op) && matches!(self.tree.value(op), "==" | "in")
    }

    fn bitwise(&mut self, node: NodeId, penalty: i32, op: &str) {
        self.visit_children(node);
        self.increase(node, penalty);
        let children = self.tree.children(node).to_vec();
        let operator_penalty = self.style.split_penalty_bitwise_operator;
        for index in 1..children.len().saturating_sub(1) {
            if !self.tree.is_value(children[index], op) {
                continue;
            }
            if self.style.split_before_bitwise_operator {
                self.set(children[index], operator_penalty);
            } else {
                self.set_first_leaf(children[index + 1], operator_penalty);
            }
        }
    }

    fn arithmetic(&mut self, node: NodeId, penalty: i32, ops: &[&str]) {
        self.visit_children(node);
        self.increase(node, penalty);
        let children = self.tree.children(node).to_vec();
        let operator_penalty = self.style.split_penalty_arithmetic_operator;
        for index in 1..children.len().saturating_sub(1) {
            let child = children[index];
            if !(self.tree.is_leaf(child) && ops.contains(&self.tree.value(child))) {
                continue;
            }
            if self.style.split_before_arithmetic_operator {
                self.set(child, operator_penalty);
                self.set_first_leaf(children[index + 1], UNBREAKABLE);
            } else {
                self.set(child, UNBREAKABLE);
                self.set_first_leaf(children[index + 1], operator_penalty);
            }
        }
    }

    fn subscriptlist(&mut self, node: NodeId) {
        self.visit_children(node);
        self.set_first_leaf(node, 0);
        let children = self.tree.children(node).to_vec();
        for pair in children.windows(2) {
            if self.tree.is_token(pair[0], TokenKind::Comma) {
                self.set_first_leaf(pair[1], 0);
            }
        }
    }
}
