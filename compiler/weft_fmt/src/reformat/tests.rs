use pretty_assertions::assert_eq;
use weft_parse::{parse_source, ParserConfig};

use super::*;
use crate::annotate::annotate;
use crate::blank_lines::compute_newlines;
use crate::directives::mark_disabled;
use crate::join::merge_lines;
use crate::unwrap::unwrap_tree;

fn lines(src: &str, style: &Style) -> Vec<LogicalLine> {
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, style);
    unwrap_tree(&tree, &annotations, style)
}

fn render(src: &str, style: &Style) -> String {
    let mut all = lines(src, style);
    mark_disabled(&mut all, None);
    let newlines = compute_newlines(&all, style, None);
    let placed = merge_lines(all, &newlines, style);
    let keep_breaks = KeepBreaks::new(style).unwrap();
    Renderer::new(src, style, keep_breaks).render(&placed, src.len())
}

#[test]
fn shift_moves_right_and_left() {
    assert_eq!(shift("x = 1", 4), "    x = 1");
    assert_eq!(shift("        x", -4), "    x");
    assert_eq!(shift("  x", -4), "x");
    assert_eq!(shift("x", 0), "x");
}

#[test]
fn byte_offset_counts_characters() {
    assert_eq!(byte_offset("abc", 1), 1);
    assert_eq!(byte_offset("éx", 1), 2);
    assert_eq!(byte_offset("ab", 5), 2);
}

#[test]
fn short_line_fits() {
    let style = Style::default();
    assert!(fits_on_one_line(&lines("x = f(a, b)\n", &style)[0], &style));
}

#[test]
fn long_line_does_not_fit() {
    let style = Style {
        column_limit: 10,
        ..Style::default()
    };
    assert!(!fits_on_one_line(&lines("x = f(a, b)\n", &style)[0], &style));
}

#[test]
fn interior_comment_does_not_fit() {
    let style = Style::default();
    let line = &lines("x = [  # note\n    1]\n", &style)[0];
    assert!(!fits_on_one_line(line, &style));
}

#[test]
fn trailing_pylint_comment_is_not_counted() {
    let style = Style {
        column_limit: 12,
        ..Style::default()
    };
    let line = &lines("x = 1  # pylint: disable=line-too-long\n", &style)[0];
    assert!(fits_on_one_line(line, &style));
}

#[test]
fn renders_flat_lines_with_normalized_spacing() {
    let style = Style::default();
    assert_eq!(render("x=f( a,b )\n", &style), "x = f(a, b)\n");
}

#[test]
fn renders_blocks_with_indentation() {
    let style = Style::default();
    assert_eq!(
        render("if x:\n  y=1\n  z=2\n", &style),
        "if x:\n    y = 1\n    z = 2\n"
    );
}

#[test]
fn continuation_line_is_copied_and_reindented() {
    let style = Style::default();
    let src = "if x:\n  y = 1 + \\\n      2\n";
    assert_eq!(render(src, &style), "if x:\n    y = 1 + \\\n        2\n");
}

#[test]
fn multiline_string_body_is_not_shifted() {
    let style = Style::default();
    let src = "if x:\n  y = '''a\n  b''' + \\\n    c\n";
    assert_eq!(
        render(src, &style),
        "if x:\n    y = '''a\n  b''' + \\\n      c\n"
    );
}

#[test]
fn split_line_stays_within_limit() {
    let style = Style {
        column_limit: 40,
        ..Style::default()
    };
    let out = render("foo(aaaaaaaaaa, bbbbbbbbbb, cccccccccc, dddddddddd)\n", &style);
    assert!(out.lines().count() > 1);
    assert!(out.lines().all(|line| line.len() <= 40), "{out}");
}
