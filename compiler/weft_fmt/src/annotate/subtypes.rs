//! Subtype assignment.
//!
//! Walks the tree once and tags leaves with [`Subtypes`] according to the
//! construct they appear in.

use weft_grammar::{Symbol, TokenKind};
use weft_parse::{ensure_sufficient_stack, NodeId, Tree};

use super::Annotations;
use crate::subtypes::Subtypes;

pub(super) fn assign(tree: &Tree, annotations: &mut Annotations) {
    if let Some(root) = tree.root() {
        SubtypeAssigner { tree, annotations }.visit(root);
    }
}

const COMPARISON_OPS: &[&str] = &["<", ">", "==", ">=", "<=", "!=", "in", "is"];

struct SubtypeAssigner<'a> {
    tree: &'a Tree,
    annotations: &'a mut Annotations,
}

impl SubtypeAssigner<'_> {
    fn visit(&mut self, node: NodeId) {
        let Some(symbol) = self.tree.symbol(node) else {
            return;
        };
        ensure_sufficient_stack(|| match symbol {
            Symbol::Dictsetmaker => self.dictsetmaker(node),
            Symbol::ExprStmt | Symbol::Annassign => {
                self.mark_operators(node, &["="], Subtypes::ASSIGN_OPERATOR);
            }
            Symbol::OrTest => self.mark_operators(node, &["or"], Subtypes::BINARY_OPERATOR),
            Symbol::AndTest => self.mark_operators(node, &["and"], Subtypes::BINARY_OPERATOR),
            Symbol::NotTest => self.mark_operators(node, &["not"], Subtypes::UNARY_OPERATOR),
            Symbol::Comparison => self.comparison(node),
            Symbol::StarExpr => self.mark_operators(
                node,
                &["*"],
                Subtypes::UNARY_OPERATOR | Subtypes::VARARGS_STAR,
            ),
            Symbol::Expr => self.mark_operators(node, &["|"], Subtypes::BINARY_OPERATOR),
            Symbol::XorExpr => self.mark_operators(node, &["^"], Subtypes::BINARY_OPERATOR),
            Symbol::AndExpr => self.mark_operators(node, &["&"], Subtypes::BINARY_OPERATOR),
            Symbol::ShiftExpr => {
                self.mark_operators(node, &["<<", ">>"], Subtypes::BINARY_OPERATOR);
            }
            Symbol::ArithExpr => self.mark_operators(node, &["+", "-"], Subtypes::BINARY_OPERATOR),
            Symbol::Term => self.mark_operators(
                node,
                &["*", "@", "/", "%", "//"],
                Subtypes::BINARY_OPERATOR,
            ),
            Symbol::Factor => self.mark_operators(node, &["+", "-", "~"], Subtypes::UNARY_OPERATOR),
            Symbol::Power => self.mark_operators(node, &["**"], Subtypes::BINARY_OPERATOR),
            Symbol::Trailer => self.mark_operators(node, &["[", "]"], Subtypes::SUBSCRIPT_BRACKET),
            Symbol::Subscript | Symbol::Sliceop => {
                self.mark_operators(node, &[":"], Subtypes::SUBSCRIPT_COLON);
            }
            Symbol::Argument | Symbol::Arglist => {
                self.arg_list(node);
                self.mark_arg_list(
                    node,
                    Subtypes::DEFAULT_OR_NAMED_ASSIGN,
                    Subtypes::DEFAULT_OR_NAMED_ASSIGN_ARG_LIST,
                );
            }
            Symbol::Tname => {
                self.arg_list(node);
                self.mark_typed_arg_list(node);
            }
            Symbol::Typedargslist => self.typedargslist(node),
            Symbol::Varargslist => {
                self.arg_list(node);
                self.mark_leaves(node, &["="], Subtypes::VARARGS_LIST);
            }
            Symbol::Decorator => self.mark_operators(node, &["@"], Subtypes::DECORATOR),
            Symbol::Funcdef => self.funcdef(node),
            Symbol::Parameters => self.parameters(node),
            Symbol::Lambdef => {
                self.add_recursive(node, Subtypes::LAMBDEF);
                self.visit_children(node);
            }
            Symbol::CompFor => self.comp_for(node),
            Symbol::CompIf => {
                self.add_recursive(node, Subtypes::COMP_IF);
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

    fn add(&mut self, leaf: NodeId, subtype: Subtypes) {
        self.annotations.add_subtype(leaf, subtype);
    }

    fn add_first_leaf(&mut self, node: NodeId, subtype: Subtypes) {
        if let Some(leaf) = self.tree.first_leaf(node) {
            self.add(leaf, subtype);
        }
    }

    fn add_recursive(&mut self, node: NodeId, subtype: Subtypes) {
        for leaf in self.tree.leaves(node) {
            self.add(leaf, subtype);
        }
    }

    /// Visit children, tagging direct leaf children whose text is in `ops`.
    fn mark_operators(&mut self, node: NodeId, ops: &[&str], subtype: Subtypes) {
        self.visit_children(node);
        self.mark_leaves(node, ops, subtype);
    }

    fn mark_leaves(&mut self, node: NodeId, ops: &[&str], subtype: Subtypes) {
        for &child in self.tree.children(node) {
            if self.tree.is_leaf(child) && ops.contains(&self.tree.value(child)) {
                self.add(child, subtype);
            }
        }
    }

    fn comparison(&mut self, node: NodeId) {
        self.mark_operators(node, COMPARISON_OPS, Subtypes::BINARY_OPERATOR);
        for &child in self.tree.children(node) {
            if self.tree.is_symbol(child, Symbol::CompOp) {
                for &part in self.tree.children(child) {
                    self.add(part, Subtypes::BINARY_OPERATOR);
                }
            }
        }
    }

    /// Shared handling of argument and parameter lists.
    fn arg_list(&mut self, node: NodeId) {
        for &child in self.tree.children(node) {
            self.visit(child);
            if !self.tree.is_leaf(child) {
                continue;
            }
            let subtype = match self.tree.value(child) {
                "=" => Subtypes::DEFAULT_OR_NAMED_ASSIGN,
                ":" => Subtypes::TYPED_NAME,
                "*" => Subtypes::VARARGS_STAR,
                "**" => Subtypes::KWARGS_STAR_STAR,
                _ => continue,
            };
            self.add(child, subtype);
        }
    }

    /// When any element of the list carries `marker`, tag the first leaf
    /// of every element with `list_subtype`.
    fn mark_arg_list(&mut self, node: NodeId, marker: Subtypes, list_subtype: Subtypes) {
        if !self.has_subtype(node, marker) {
            return;
        }
        let children = self.tree.children(node).to_vec();
        for child in children {
            if self.tree.is_symbol(child, Symbol::Atom) || self.tree.is_token(child, TokenKind::Comma) {
                continue;
            }
            self.add_first_leaf(child, list_subtype);
        }
    }

    fn mark_typed_arg_list(&mut self, node: NodeId) {
        self.mark_arg_list(
            node,
            Subtypes::DEFAULT_OR_NAMED_ASSIGN,
            Subtypes::DEFAULT_OR_NAMED_ASSIGN_ARG_LIST,
        );
        self.mark_arg_list(node, Subtypes::TYPED_NAME, Subtypes::TYPED_NAME_ARG_LIST);
    }

    fn has_subtype(&self, node: NodeId, subtype: Subtypes) -> bool {
        if self.tree.is_leaf(node) {
            return self.annotations.subtypes(node).contains(subtype);
        }
        self.tree.children(node).iter().any(|&child| {
            !matches!(
                self.tree.symbol(child),
                Some(Symbol::Atom | Symbol::Arglist | Symbol::Power)
            ) && self.has_subtype(child, subtype)
        })
    }

    fn typedargslist(&mut self, node: NodeId) {
        self.arg_list(node);
        // The `=` of an annotated parameter's default spaces like the
        // annotation colon.
        let children = self.tree.children(node).to_vec();
        for pair in children.windows(2) {
            if self.tree.is_symbol(pair[0], Symbol::Tname) && self.tree.is_value(pair[1], "=") {
                self.add(pair[1], Subtypes::TYPED_NAME);
            }
        }
        self.mark_typed_arg_list(node);
    }

    fn funcdef(&mut self, node: NodeId) {
        let name = self
            .tree
            .children(node)
            .iter()
            .copied()
            .find(|&child| self.tree.is_token(child, TokenKind::Name) && !self.tree.is_value(child, "def"));
        if let Some(name) = name {
            self.add(name, Subtypes::FUNC_DEF);
        }
        self.visit_children(node);
    }

    fn parameters(&mut self, node: NodeId) {
        self.arg_list(node);
        let children = self.tree.children(node);
        if children.len() > 2 {
            let start = children[1];
            let stop = children[children.len() - 2];
            self.add_first_leaf(start, Subtypes::PARAMETER_START);
            if let Some(leaf) = self.tree.last_leaf(stop) {
                self.add(leaf, Subtypes::PARAMETER_STOP);
            }
        }
    }

    fn comp_for(&mut self, node: NodeId) {
        self.add_recursive(node, Subtypes::COMP_FOR);
        if let Some(parent) = self.tree.parent(node) {
            let nested = matches!(
                self.tree.symbol(parent),
                Some(Symbol::CompFor | Symbol::CompIf)
            );
            if !nested {
                if let Some(&element) = self.tree.children(parent).first() {
                    self.add_recursive(element, Subtypes::COMP_EXPR);
                }
            }
        }
        self.visit_children(node);
    }

    fn dictsetmaker(&mut self, node: NodeId) {
        self.visit_children(node);
        let children = self.tree.children(node).to_vec();

        let mut generator = false;
        let mut dict_maker = false;
        for &child in &children {
            if self.tree.is_symbol(child, Symbol::CompFor) {
                generator = true;
                self.add_first_leaf(child, Subtypes::DICT_SET_GENERATOR);
            } else if matches!(
                self.tree.token(child),
                Some(TokenKind::Colon | TokenKind::DoubleStar)
            ) {
                dict_maker = true;
            }
        }
        if generator || !dict_maker {
            return;
        }

        let mut last_was_colon = false;
        let mut unpacking = false;
        for &child in &children {
            let token = self.tree.token(child);
            if token == Some(TokenKind::DoubleStar) {
                self.add(child, Subtypes::KWARGS_STAR_STAR);
            }
            if last_was_colon {
                self.add_first_leaf(child, Subtypes::DICTIONARY_VALUE);
            } else if !matches!(
                token,
                Some(TokenKind::Comment | TokenKind::Colon | TokenKind::Comma | TokenKind::LBrace)
            ) {
                let starts_unpacking = self
                    .tree
                    .first_leaf(child)
                    .is_some_and(|leaf| self.tree.is_value(leaf, "**"));
                if !unpacking || starts_unpacking {
                    self.add_first_leaf(child, Subtypes::DICTIONARY_KEY);
                }
                self.add_recursive(child, Subtypes::DICTIONARY_KEY_PART);
            }
            last_was_colon = token == Some(TokenKind::Colon);
            match token {
                Some(TokenKind::DoubleStar) => unpacking = true,
                Some(TokenKind::Colon | TokenKind::Comma) => unpacking = false,
                _ => {}
            }
        }
    }
}
