use pretty_assertions::assert_eq;

use super::*;

/// `x = 1` built by hand: (expr_stmt x = 1).
fn assignment() -> (Tree, NodeId, [NodeId; 3]) {
    let mut tree = Tree::new();
    let x = tree.new_leaf(TokenKind::Name, "x", "", 1, 0);
    let eq = tree.new_leaf(TokenKind::Equal, "=", " ", 1, 2);
    let one = tree.new_leaf(TokenKind::Number, "1", " ", 1, 4);
    let stmt = tree.new_interior(Symbol::ExprStmt, vec![x, eq, one]);
    tree.set_root(stmt);
    (tree, stmt, [x, eq, one])
}

#[test]
fn interior_nodes_adopt_children() {
    let (tree, stmt, [x, eq, one]) = assignment();
    assert_eq!(tree.children(stmt), &[x, eq, one]);
    assert_eq!(tree.parent(eq), Some(stmt));
    assert_eq!(tree.parent(stmt), None);
    assert_eq!(tree.line(stmt), 1);
    assert_eq!(tree.symbol(stmt), Some(Symbol::ExprStmt));
    assert_eq!(tree.token(one), Some(TokenKind::Number));
}

#[test]
fn sibling_navigation() {
    let (tree, _, [x, eq, one]) = assignment();
    assert_eq!(tree.next_sibling(x), Some(eq));
    assert_eq!(tree.prev_sibling(eq), Some(x));
    assert_eq!(tree.prev_sibling(x), None);
    assert_eq!(tree.next_sibling(one), None);
    assert_eq!(tree.child_index(one), Some(2));
}

#[test]
fn first_and_last_leaf() {
    let (tree, stmt, [x, _, one]) = assignment();
    assert_eq!(tree.first_leaf(stmt), Some(x));
    assert_eq!(tree.last_leaf(stmt), Some(one));
    assert_eq!(tree.first_leaf(one), Some(one));
}

#[test]
fn source_concatenates_prefixes_and_values() {
    let (tree, _, _) = assignment();
    assert_eq!(tree.to_source(), "x = 1");
}

#[test]
fn prefix_of_interior_node_is_first_leaf_prefix() {
    let (mut tree, stmt, [x, _, _]) = assignment();
    tree.set_prefix(stmt, "# lead\n");
    assert_eq!(tree.prefix(x), "# lead\n");
    assert_eq!(tree.prefix(stmt), "# lead\n");
}

#[test]
fn inserted_children_get_parents() {
    let (mut tree, stmt, [x, eq, one]) = assignment();
    let comment = tree.new_leaf(TokenKind::Comment, "# c", "  ", 1, 6);
    tree.append_child(stmt, comment);
    let first = tree.new_leaf(TokenKind::Comment, "# d", "", 1, 0);
    tree.insert_child(stmt, 0, first);
    assert_eq!(tree.children(stmt), &[first, x, eq, one, comment]);
    assert_eq!(tree.parent(comment), Some(stmt));
    assert_eq!(tree.leaves(stmt).len(), 5);
}

#[test]
fn traversal_orders() {
    let (tree, stmt, [x, eq, one]) = assignment();
    assert_eq!(tree.pre_order(stmt), vec![stmt, x, eq, one]);
    assert_eq!(tree.leaves(stmt), vec![x, eq, one]);
    assert_eq!(tree.depth(one), 1);
    assert_eq!(tree.ancestors(one).collect::<Vec<_>>(), vec![stmt]);
}

#[test]
fn dump_uses_kind_names_for_blank_leaves() {
    let mut tree = Tree::new();
    let pass = tree.new_leaf(TokenKind::Name, "pass", "", 1, 0);
    let newline = tree.new_leaf(TokenKind::Newline, "\n", "", 1, 4);
    let stmt = tree.new_interior(Symbol::SimpleStmt, vec![pass, newline]);
    assert_eq!(tree.dump(stmt), "(simple_stmt pass NEWLINE)");
}
