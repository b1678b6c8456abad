use pretty_assertions::assert_eq;
use weft_grammar::{Symbol, TokenKind};
use weft_parse::{parse_source, NodeId, ParserConfig, Tree};

use super::split_penalty::{DOTTED_NAME, UNBREAKABLE};
use super::*;

fn annotated_with(src: &str, style: &Style) -> (Tree, Annotations) {
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, style);
    (tree, annotations)
}

fn annotated(src: &str) -> (Tree, Annotations) {
    annotated_with(src, &Style::default())
}

/// The `nth` leaf (0-based) whose text is `value`.
fn leaf(tree: &Tree, value: &str, nth: usize) -> NodeId {
    let root = tree.root().unwrap();
    tree.leaves(root)
        .into_iter()
        .filter(|&leaf| tree.value(leaf) == value)
        .nth(nth)
        .unwrap_or_else(|| panic!("no leaf #{nth} with text {value:?}"))
}

fn parent_symbol(tree: &Tree, id: NodeId) -> Option<Symbol> {
    tree.parent(id).and_then(|parent| tree.symbol(parent))
}

// Comment splicing

#[test]
fn trailing_comment_follows_last_leaf() {
    let (tree, _) = annotated("x = 1  # one\n");
    let comment = leaf(&tree, "# one", 0);
    assert_eq!(tree.token(comment), Some(TokenKind::Comment));
    assert_eq!(tree.prev_sibling(comment), Some(leaf(&tree, "1", 0)));
    assert_eq!((tree.line(comment), tree.column(comment)), (1, 7));
}

#[test]
fn own_line_comment_becomes_statement() {
    let (tree, _) = annotated("# head\nx = 1\n");
    let root = tree.root().unwrap();
    assert_eq!(
        tree.dump(root),
        "(file_input (simple_stmt # head) (simple_stmt (expr_stmt x = 1) NEWLINE) ENDMARKER)"
    );
}

#[test]
fn comment_before_dedent_stays_in_block() {
    let (tree, _) = annotated("if x:\n    y\n    # end of block\nz\n");
    let comment = leaf(&tree, "# end of block", 0);
    let stmt = tree.parent(comment).unwrap();
    assert_eq!(tree.symbol(stmt), Some(Symbol::SimpleStmt));
    assert_eq!(parent_symbol(&tree, stmt), Some(Symbol::Suite));
    let next = tree.next_sibling(stmt).unwrap();
    assert_eq!(tree.token(next), Some(TokenKind::Dedent));
}

#[test]
fn comment_at_outer_level_precedes_next_statement() {
    let (tree, _) = annotated("if x:\n    y\n# outside\nz\n");
    let comment = leaf(&tree, "# outside", 0);
    let stmt = tree.parent(comment).unwrap();
    assert_eq!(parent_symbol(&tree, stmt), Some(Symbol::FileInput));
    let next = tree.next_sibling(stmt).unwrap();
    assert_eq!(tree.first_leaf(next), Some(leaf(&tree, "z", 0)));
}

#[test]
fn comment_between_decorator_and_def_keeps_order() {
    let (tree, _) = annotated("@dec\n# note\ndef f():\n    pass\n");
    let comment = leaf(&tree, "# note", 0);
    let stmt = tree.parent(comment).unwrap();
    assert_eq!(parent_symbol(&tree, stmt), Some(Symbol::Decorated));
    let next = tree.next_sibling(stmt).unwrap();
    assert_eq!(tree.symbol(next), Some(Symbol::Funcdef));
}

#[test]
fn comment_line_inside_brackets_precedes_next_element() {
    let (tree, _) = annotated("x = [\n    1,\n    # two\n    2,\n]\n");
    let comment = leaf(&tree, "# two", 0);
    assert_eq!(parent_symbol(&tree, comment), Some(Symbol::Listmaker));
    assert_eq!(tree.next_sibling(comment), Some(leaf(&tree, "2", 0)));
}

#[test]
fn trailing_whitespace_is_trimmed_from_comments() {
    let (tree, _) = annotated("x = 1  # padded   \n");
    leaf(&tree, "# padded", 0);
}

#[test]
fn prefixes_hold_no_comment_text() {
    let (tree, _) = annotated("# a\nx = [  # b\n    1,  # c\n]  # d\n# e\n");
    let root = tree.root().unwrap();
    for id in tree.leaves(root) {
        assert!(!tree.prefix(id).contains('#'), "{:?}", tree.prefix(id));
    }
    let comments = tree
        .leaves(root)
        .into_iter()
        .filter(|&id| tree.is_token(id, TokenKind::Comment))
        .count();
    assert_eq!(comments, 5);
}

// Subtypes

#[test]
fn keyword_arguments() {
    let (tree, ann) = annotated("f(a, b=1)\n");
    assert!(ann.subtypes(leaf(&tree, "=", 0)).contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN));
    assert!(ann
        .subtypes(leaf(&tree, "a", 0))
        .contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN_ARG_LIST));
}

#[test]
fn unary_and_binary_minus() {
    let (tree, ann) = annotated("x = -y\nz = a - b\n");
    assert!(ann.subtypes(leaf(&tree, "-", 0)).contains(Subtypes::UNARY_OPERATOR));
    assert!(ann.subtypes(leaf(&tree, "-", 1)).contains(Subtypes::BINARY_OPERATOR));
    assert!(ann.subtypes(leaf(&tree, "=", 0)).contains(Subtypes::ASSIGN_OPERATOR));
}

#[test]
fn dictionary_roles() {
    let (tree, ann) = annotated("d = {'a': 1, **rest}\n");
    assert!(ann.subtypes(leaf(&tree, "'a'", 0)).contains(Subtypes::DICTIONARY_KEY));
    assert!(ann.subtypes(leaf(&tree, "1", 0)).contains(Subtypes::DICTIONARY_VALUE));
    assert!(ann.subtypes(leaf(&tree, "**", 0)).contains(Subtypes::KWARGS_STAR_STAR));
    assert!(!ann.subtypes(leaf(&tree, "rest", 0)).contains(Subtypes::DICTIONARY_KEY));
}

#[test]
fn comprehension_roles() {
    let (tree, ann) = annotated("[x for x in y if x]\n");
    assert!(ann.subtypes(leaf(&tree, "x", 0)).contains(Subtypes::COMP_EXPR));
    assert!(ann.subtypes(leaf(&tree, "for", 0)).contains(Subtypes::COMP_FOR));
    assert!(ann.subtypes(leaf(&tree, "if", 0)).contains(Subtypes::COMP_IF));
}

#[test]
fn annotated_parameter_default() {
    let (tree, ann) = annotated("def f(a: int = 1, b=2):\n    pass\n");
    assert!(ann.subtypes(leaf(&tree, "f", 0)).contains(Subtypes::FUNC_DEF));
    let typed_eq = ann.subtypes(leaf(&tree, "=", 0));
    assert!(typed_eq.contains(Subtypes::TYPED_NAME | Subtypes::DEFAULT_OR_NAMED_ASSIGN));
    let plain_eq = ann.subtypes(leaf(&tree, "=", 1));
    assert!(!plain_eq.contains(Subtypes::TYPED_NAME));
    assert!(ann.subtypes(leaf(&tree, "a", 0)).contains(Subtypes::PARAMETER_START));
    assert!(ann.subtypes(leaf(&tree, "2", 0)).contains(Subtypes::PARAMETER_STOP));
}

// Split penalties

#[test]
fn call_paren_is_unbreakable() {
    let (tree, ann) = annotated("f(a)\n");
    assert_eq!(ann.split_penalty(leaf(&tree, "(", 0)), UNBREAKABLE);
}

#[test]
fn member_access_dot() {
    let (tree, ann) = annotated("x = a.b\n");
    assert_eq!(ann.split_penalty(leaf(&tree, ".", 0)), DOTTED_NAME);
}

#[test]
fn logical_operators_are_cheap_split_points() {
    let (tree, ann) = annotated("x = a and b\n");
    assert_eq!(ann.split_penalty(leaf(&tree, "and", 0)), 0);
    assert_eq!(ann.split_penalty(leaf(&tree, "b", 0)), 1_100);
}

// Ending comma

#[test]
fn trailing_comma_forces_one_per_line() {
    let (tree, ann) = annotated("f(a, b,)\n");
    assert!(ann.must_split(leaf(&tree, "a", 0)));
    assert!(ann.must_split(leaf(&tree, "b", 0)));
}

#[test]
fn single_element_tuple_is_not_split() {
    let (tree, ann) = annotated("t = (a,)\nf(b,)\n");
    assert!(!ann.must_split(leaf(&tree, "a", 0)));
    assert!(!ann.must_split(leaf(&tree, "b", 0)));
}

#[test]
fn heuristic_can_be_disabled() {
    let style = Style {
        disable_ending_comma_heuristic: true,
        ..Style::default()
    };
    let (tree, ann) = annotated_with("x = [a, b,]\n", &style);
    assert!(!ann.must_split(leaf(&tree, "a", 0)));
}
