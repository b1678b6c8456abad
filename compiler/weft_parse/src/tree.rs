//! Arena-allocated concrete syntax tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Leaves keep
//! their source text and the whitespace/comment *prefix* that preceded them,
//! so concatenating `prefix + value` over all leaves in order reproduces the
//! source exactly. Annotations computed later are side tables indexed by
//! `NodeId`, never fields on `Node`.

use std::fmt::Write as _;

use weft_grammar::{Symbol, TokenKind};

/// Index of a node in its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A leaf token kind or an interior grammar symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Token(TokenKind),
    Symbol(Symbol),
}

#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    value: String,
    prefix: String,
    line: u32,
    column: u32,
}

/// Concrete syntax tree.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    /// Number of nodes ever allocated (detached ones included).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a detached leaf.
    pub fn new_leaf(
        &mut self,
        kind: TokenKind,
        value: impl Into<String>,
        prefix: impl Into<String>,
        line: u32,
        column: u32,
    ) -> NodeId {
        self.alloc(Node {
            kind: NodeKind::Token(kind),
            parent: None,
            children: Vec::new(),
            value: value.into(),
            prefix: prefix.into(),
            line,
            column,
        })
    }

    /// Allocate an interior node adopting `children`.
    pub fn new_interior(&mut self, symbol: Symbol, children: Vec<NodeId>) -> NodeId {
        let (line, column) = children
            .first()
            .map_or((0, 0), |&first| (self.nodes[first.index()].line, self.nodes[first.index()].column));
        let id = self.alloc(Node {
            kind: NodeKind::Symbol(symbol),
            parent: None,
            children,
            value: String::new(),
            prefix: String::new(),
            line,
            column,
        });
        for index in 0..self.nodes[id.index()].children.len() {
            let child = self.nodes[id.index()].children[index];
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    #[inline]
    pub fn token(&self, id: NodeId) -> Option<TokenKind> {
        match self.kind(id) {
            NodeKind::Token(kind) => Some(kind),
            NodeKind::Symbol(_) => None,
        }
    }

    #[inline]
    pub fn symbol(&self, id: NodeId) -> Option<Symbol> {
        match self.kind(id) {
            NodeKind::Symbol(symbol) => Some(symbol),
            NodeKind::Token(_) => None,
        }
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Token(_))
    }

    #[inline]
    pub fn is_token(&self, id: NodeId, kind: TokenKind) -> bool {
        self.token(id) == Some(kind)
    }

    #[inline]
    pub fn is_symbol(&self, id: NodeId, symbol: Symbol) -> bool {
        self.symbol(id) == Some(symbol)
    }

    /// Leaf text; empty for interior nodes.
    #[inline]
    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].value
    }

    /// Whether `id` is a leaf with exactly this text.
    #[inline]
    pub fn is_value(&self, id: NodeId, value: &str) -> bool {
        self.is_leaf(id) && self.value(id) == value
    }

    /// Prefix of a leaf, or of the first leaf below an interior node.
    pub fn prefix(&self, id: NodeId) -> &str {
        match self.first_leaf(id) {
            Some(leaf) => &self.nodes[leaf.index()].prefix,
            None => "",
        }
    }

    pub fn set_prefix(&mut self, id: NodeId, prefix: impl Into<String>) {
        if let Some(leaf) = self.first_leaf(id) {
            self.nodes[leaf.index()].prefix = prefix.into();
        }
    }

    /// 1-based source line of the node's first token.
    #[inline]
    pub fn line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].line
    }

    /// 0-based source column of the node's first token.
    #[inline]
    pub fn column(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].column
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    #[inline]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Position of `id` among its parent's children.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        self.child(parent, index + 1)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        index.checked_sub(1).and_then(|prev| self.child(parent, prev))
    }

    /// Leftmost leaf at or below `id`.
    pub fn first_leaf(&self, mut id: NodeId) -> Option<NodeId> {
        while !self.is_leaf(id) {
            id = *self.children(id).first()?;
        }
        Some(id)
    }

    /// Rightmost leaf at or below `id`.
    pub fn last_leaf(&self, mut id: NodeId) -> Option<NodeId> {
        while !self.is_leaf(id) {
            id = *self.children(id).last()?;
        }
        Some(id)
    }

    /// Nodes at or below `id` in pre-order.
    pub fn pre_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        order
    }

    /// Leaves at or below `id`, left to right.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.pre_order(id)
            .into_iter()
            .filter(|&node| self.is_leaf(node))
            .collect()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&node| self.parent(node))
    }

    /// Number of ancestors.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Attach a detached node as the `index`-th child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let children = &mut self.nodes[parent.index()].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Source text below `id`: every leaf's prefix followed by its value.
    pub fn source(&self, id: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.leaves(id) {
            out.push_str(&self.nodes[leaf.index()].prefix);
            out.push_str(&self.nodes[leaf.index()].value);
        }
        out
    }

    /// Source text of the whole tree.
    pub fn to_source(&self) -> String {
        self.root.map(|root| self.source(root)).unwrap_or_default()
    }

    /// Compact s-expression rendering used by tests and trace output.
    ///
    /// Interior nodes print as `(symbol child ...)`, leaves as their text
    /// (INDENT/DEDENT/NEWLINE/ENDMARKER by kind name).
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Token(kind) => {
                let value = self.value(id);
                if value.trim().is_empty() {
                    out.push_str(kind.name());
                } else {
                    out.push_str(value);
                }
            }
            NodeKind::Symbol(symbol) => {
                let _ = write!(out, "({symbol}");
                for &child in self.children(id) {
                    out.push(' ');
                    crate::ensure_sufficient_stack(|| self.dump_into(child, out));
                }
                out.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests;
