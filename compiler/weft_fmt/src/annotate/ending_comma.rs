//! The ending-comma heuristic.
//!
//! A list written with a comma after its last element asks to be laid out
//! one element per line. Every element's first leaf is marked must-split.
//! Lists holding comments are always marked, since the comments force
//! line breaks anyway.

use weft_grammar::{Symbol, TokenKind};
use weft_parse::{NodeId, Tree};

use super::Annotations;
use crate::style::Style;

pub(super) fn assign(tree: &Tree, annotations: &mut Annotations, style: &Style) {
    if style.disable_ending_comma_heuristic {
        return;
    }
    let Some(root) = tree.root() else {
        return;
    };
    for node in tree.pre_order(root) {
        let candidate = match tree.symbol(node) {
            Some(
                Symbol::Arglist
                | Symbol::Typedargslist
                | Symbol::TestlistGexp
                | Symbol::Listmaker
                | Symbol::Dictsetmaker
                | Symbol::Subscriptlist,
            ) => true,
            Some(Symbol::ImportAsNames) => tree
                .prev_sibling(node)
                .is_some_and(|prev| tree.is_value(prev, "(")),
            _ => false,
        };
        if candidate {
            mark_list(tree, annotations, node);
        }
    }
}

fn mark_list(tree: &Tree, annotations: &mut Annotations, node: NodeId) {
    let children = tree.children(node);
    let has_comments = tree
        .leaves(node)
        .into_iter()
        .any(|leaf| tree.is_token(leaf, TokenKind::Comment));

    if !has_comments {
        let in_parens = tree
            .parent(node)
            .and_then(|parent| tree.first_leaf(parent))
            .is_some_and(|leaf| tree.is_value(leaf, "("));
        let commas = children
            .iter()
            .filter(|&&child| tree.is_token(child, TokenKind::Comma))
            .count();
        // `(x,)` is a one-element tuple, `f(x,)` a single argument.
        if in_parens && commas < 2 {
            return;
        }
        if !children.last().is_some_and(|&last| tree.is_token(last, TokenKind::Comma)) {
            return;
        }
    }

    let mut mark = |element: NodeId| {
        if let Some(leaf) = tree.first_leaf(element) {
            annotations.set_must_split(leaf);
        }
    };
    if let Some(&first) = children.first() {
        mark(first);
    }
    let mut index = 0;
    while index + 1 < children.len() {
        if tree.is_token(children[index], TokenKind::Comma) {
            if tree.is_token(children[index + 1], TokenKind::Comment) {
                index += 1;
                if index + 1 >= children.len() {
                    break;
                }
            }
            mark(children[index + 1]);
        }
        index += 1;
    }
}
