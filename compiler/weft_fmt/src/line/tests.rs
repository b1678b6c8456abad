use pretty_assertions::assert_eq;
use weft_parse::{parse_source, ParserConfig};

use super::*;
use crate::annotate::annotate;
use crate::unwrap::unwrap_tree;

fn lines(src: &str) -> Vec<LogicalLine> {
    let style = Style::default();
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, &style);
    unwrap_tree(&tree, &annotations, &style)
}

fn index_of(line: &LogicalLine, value: &str) -> usize {
    line.tokens.iter().position(|token| token.value == value).unwrap()
}

#[test]
fn brackets_are_matched() {
    let line = &lines("f(a, [b, c], {})\n")[0];
    let open = index_of(line, "(");
    let close = line.tokens.len() - 1;
    assert_eq!(line.tokens[open].matching_bracket, Some(close));
    assert_eq!(line.tokens[close].matching_bracket, Some(open));

    let square = index_of(line, "[");
    assert_eq!(line.tokens[square + 1].container_opening, Some(square));
    assert_eq!(line.tokens[open].container_elements, [open + 1, square, index_of(line, "{")]);
}

#[test]
fn widths_accumulate() {
    let line = &lines("x = f(a, b)\n")[0];
    assert_eq!(line.flat_width(), "x = f(a, b)".len());
    assert_eq!(line.flat_text(), "x = f(a, b)");
}

#[test]
fn multiline_string_counts_its_first_line() {
    let line = &lines("x = '''abc\ndefgh'''\n")[0];
    assert_eq!(line.flat_width(), "x = '''abc".len());
    assert_eq!(line.last_line(), 2);
    assert_eq!(line.tokens[2].last_line_width(), "defgh'''".len());
}

#[test]
fn definitions_and_decorators() {
    let all = lines("@d\nasync def f():\n    pass\nclass C: pass\n");
    assert!(all[0].is_decorator());
    assert!(all[1].is_definition());
    assert!(!all[2].is_definition());
    assert!(all[3].is_definition());
    assert!(all[3].starts_with_keyword("class"));
}

#[test]
fn comment_forces_break_after_it() {
    let line = &lines("x = [  # note\n    1,\n]\n")[0];
    let comment = index_of(line, "# note");
    assert!(!line.tokens[comment].can_break_before);
    assert!(line.tokens[comment + 1].must_break_before);
    assert_eq!(line.previous_code_token(comment + 1), Some(comment - 1));
}

#[test]
fn recalculation_is_idempotent() {
    let mut line = lines("y = g(1, 2) + h[3]\n").remove(0);
    let before: Vec<_> = line
        .tokens
        .iter()
        .map(|token| (token.total_length, token.split_penalty, token.can_break_before))
        .collect();
    line.calculate_formatting_information(&Style::default());
    let after: Vec<_> = line
        .tokens
        .iter()
        .map(|token| (token.total_length, token.split_penalty, token.can_break_before))
        .collect();
    assert_eq!(before, after);
}
