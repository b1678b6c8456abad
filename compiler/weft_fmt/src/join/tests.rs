use pretty_assertions::assert_eq;
use weft_parse::{parse_source, ParserConfig};

use super::*;
use crate::annotate::annotate;
use crate::blank_lines::compute_newlines;
use crate::directives::mark_disabled;
use crate::unwrap::unwrap_tree;

fn merged_with(src: &str, style: &Style) -> Vec<PlacedLine> {
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, style);
    let mut lines = unwrap_tree(&tree, &annotations, style);
    mark_disabled(&mut lines, None);
    let newlines = compute_newlines(&lines, style, None);
    merge_lines(lines, &newlines, style)
}

fn texts(src: &str, style: &Style) -> Vec<String> {
    merged_with(src, style)
        .iter()
        .map(|placed| placed.line.flat_text())
        .collect()
}

#[test]
fn short_if_body_stays_on_its_line() {
    assert_eq!(texts("if x: y = 1\nz\n", &Style::default()), ["if x: y = 1", "z"]);
}

#[test]
fn if_else_chain_merges_when_each_part_does() {
    let src = "if a: b\nelse: c\n";
    assert_eq!(texts(src, &Style::default()), ["if a: b", "else: c"]);
}

#[test]
fn else_alone_does_not_merge() {
    let src = "if a:\n    b\nelse: c\n";
    assert_eq!(texts(src, &Style::default()), ["if a:", "b", "else:", "c"]);
}

#[test]
fn body_on_its_own_line_is_not_merged() {
    assert_eq!(texts("if x:\n    y\n", &Style::default()), ["if x:", "y"]);
}

#[test]
fn definitions_never_take_a_body() {
    assert_eq!(
        texts("def f(): return 1\n", &Style::default()),
        ["def f():", "return 1"]
    );
}

#[test]
fn style_can_forbid_joining() {
    let style = Style {
        join_multiple_lines: false,
        ..Style::default()
    };
    assert_eq!(texts("if x: y\n", &style), ["if x:", "y"]);
}

#[test]
fn long_bodies_are_split_off() {
    let style = Style {
        column_limit: 20,
        ..Style::default()
    };
    assert_eq!(
        texts("if x: yyyyyyyyyyyyyyyyyy\n", &style),
        ["if x:", "yyyyyyyyyyyyyyyyyy"]
    );
}

#[test]
fn merged_body_is_unbreakable() {
    let placed = merged_with("if x: y(a, b)\n", &Style::default());
    let tokens = &placed[0].line.tokens;
    let y = tokens.iter().position(|token| token.value == "y").unwrap();
    assert!(!tokens[y].can_break_before);
}

#[test]
fn disabled_lines_on_one_physical_line_are_emitted_once() {
    let src = "# fmt: off\nwhile  x:  y\nz\n";
    let placed = merged_with(src, &Style::default());
    assert_eq!(placed.len(), 3);
    assert!(placed[1].line.disable);
    let values: Vec<_> = placed[1].line.tokens.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, ["while", "x", ":", "y"]);
}

#[test]
fn newlines_follow_the_first_merged_line() {
    let placed = merged_with("a = 1\n\n\nif x: y\n", &Style::default());
    let counts: Vec<_> = placed.iter().map(|placed| placed.newlines).collect();
    assert_eq!(counts, [0, 2]);
}
