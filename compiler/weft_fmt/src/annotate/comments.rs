//! Comment splicing.
//!
//! The parser leaves comments in the prefix of the following leaf. Here
//! each comment becomes a COMMENT leaf of its own:
//!
//! - A comment alone on its line, ahead of a statement, becomes a
//!   one-comment `simple_stmt` inserted before that statement.
//! - A comment after code on the same line is inserted right after the
//!   last leaf of that line.
//! - A comment line inside an open bracket is inserted right before the
//!   leaf that follows it.
//!
//! The comment text is removed from the prefix afterwards, so later
//! passes see only whitespace and line continuations there.

use weft_grammar::{Symbol, TokenKind};
use weft_parse::{NodeId, Tree};

/// A comment found in a prefix, with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
struct PrefixComment {
    text: String,
    line: u32,
    column: u32,
    /// On the same physical line as the previous token.
    same_line: bool,
}

/// Running source position while walking leaves in order.
struct Cursor {
    line: u32,
    column: u32,
}

impl Cursor {
    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

pub(super) fn splice_comments(tree: &mut Tree) {
    let Some(root) = tree.root() else {
        return;
    };
    let mut cursor = Cursor { line: 1, column: 0 };
    let mut previous: Option<NodeId> = None;

    for leaf in tree.leaves(root) {
        let prefix = tree.prefix(leaf).to_owned();
        let comments = scan_prefix(&prefix, &mut cursor);
        if !comments.is_empty() {
            place_comments(tree, leaf, previous, comments);
            tree.set_prefix(leaf, strip_comments(&prefix));
        }
        cursor.advance(tree.value(leaf));
        previous = Some(leaf);
    }
}

/// Collect the comments of `prefix`, advancing `cursor` past it.
fn scan_prefix(prefix: &str, cursor: &mut Cursor) -> Vec<PrefixComment> {
    let mut comments = Vec::new();
    for (index, segment) in prefix.split_inclusive('\n').enumerate() {
        if let Some(hash) = segment.find('#') {
            let before = &segment[..hash];
            comments.push(PrefixComment {
                text: segment[hash..].trim_end().to_owned(),
                line: cursor.line,
                column: cursor.column + before.chars().count() as u32,
                same_line: index == 0,
            });
        }
        cursor.advance(segment);
    }
    comments
}

fn strip_comments(prefix: &str) -> String {
    prefix
        .split_inclusive('\n')
        .map(|segment| match segment.find('#') {
            Some(hash) if segment.ends_with('\n') => format!("{}\n", &segment[..hash]),
            Some(hash) => segment[..hash].to_owned(),
            None => segment.to_owned(),
        })
        .collect()
}

fn place_comments(
    tree: &mut Tree,
    leaf: NodeId,
    previous: Option<NodeId>,
    comments: Vec<PrefixComment>,
) {
    let statement_start = previous.map_or(true, |prev| {
        matches!(
            tree.token(prev),
            Some(TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        )
    });

    let mut own_line = Vec::new();
    for comment in comments {
        match previous {
            Some(prev) if comment.same_line && !statement_start => {
                let node = comment_leaf(tree, &comment);
                insert_after(tree, prev, node);
            }
            _ => own_line.push(comment),
        }
    }
    if own_line.is_empty() {
        return;
    }

    if statement_start {
        let anchor = statement_root(tree, leaf);
        for comment in own_line {
            let node = comment_leaf(tree, &comment);
            let stmt = tree.new_interior(Symbol::SimpleStmt, vec![node]);
            insert_before(tree, anchor, stmt);
        }
    } else {
        for comment in own_line {
            let node = comment_leaf(tree, &comment);
            insert_before(tree, leaf, node);
        }
    }
}

fn comment_leaf(tree: &mut Tree, comment: &PrefixComment) -> NodeId {
    tree.new_leaf(
        TokenKind::Comment,
        comment.text.clone(),
        "",
        comment.line,
        comment.column,
    )
}

/// Highest ancestor of `leaf` that starts with it, stopping below the file.
fn statement_root(tree: &Tree, leaf: NodeId) -> NodeId {
    let mut node = leaf;
    while let Some(parent) = tree.parent(node) {
        if tree.is_symbol(parent, Symbol::FileInput) || tree.first_leaf(parent) != Some(leaf) {
            break;
        }
        node = parent;
    }
    node
}

fn insert_before(tree: &mut Tree, anchor: NodeId, node: NodeId) {
    if let (Some(parent), Some(index)) = (tree.parent(anchor), tree.child_index(anchor)) {
        tree.insert_child(parent, index, node);
    }
}

fn insert_after(tree: &mut Tree, anchor: NodeId, node: NodeId) {
    if let (Some(parent), Some(index)) = (tree.parent(anchor), tree.child_index(anchor)) {
        tree.insert_child(parent, index + 1, node);
    }
}
