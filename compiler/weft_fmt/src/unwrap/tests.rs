use pretty_assertions::assert_eq;
use weft_parse::{parse_source, ParserConfig};

use super::*;
use crate::annotate::annotate;

fn lines_with(src: &str, style: &Style) -> Vec<LogicalLine> {
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, style);
    unwrap_tree(&tree, &annotations, style)
}

/// Each line as `depth|flat text`.
fn render(src: &str) -> Vec<String> {
    lines_with(src, &Style::default())
        .iter()
        .map(|line| format!("{}|{}", line.depth, line.flat_text()))
        .collect()
}

#[test]
fn empty_source_has_no_lines() {
    assert!(render("").is_empty());
}

#[test]
fn statements_and_blocks() {
    let src = "if a:\n    b = 1\n    c()\nelse:\n    d\ne\n";
    assert_eq!(
        render(src),
        ["0|if a:", "1|b = 1", "1|c()", "0|else:", "1|d", "0|e"]
    );
}

#[test]
fn inline_body_is_nested() {
    assert_eq!(render("while x: y()\n"), ["0|while x:", "1|y()"]);
}

#[test]
fn decorators_and_async_def() {
    let src = "@dec\n@other(1)\nasync def f(a, *, b=2):\n    await g()\n";
    assert_eq!(
        render(src),
        ["0|@dec", "0|@other(1)", "0|async def f(a, *, b=2):", "1|await g()"]
    );
}

#[test]
fn try_clauses_start_lines() {
    let src = "try:\n    x\nexcept ValueError as e:\n    y\nfinally:\n    z\n";
    assert_eq!(
        render(src),
        [
            "0|try:",
            "1|x",
            "0|except ValueError as e:",
            "1|y",
            "0|finally:",
            "1|z"
        ]
    );
}

#[test]
fn conditional_expression_stays_on_its_line() {
    assert_eq!(render("x = a if b else c\n"), ["0|x = a if b else c"]);
}

#[test]
fn comments_become_lines_or_trail() {
    let src = "# head\nx = 1  # trailing\ndef f():\n    pass\n    # inner\n# outer\n";
    assert_eq!(
        render(src),
        [
            "0|# head",
            "0|x = 1  # trailing",
            "0|def f():",
            "1|pass",
            "1|# inner",
            "0|# outer"
        ]
    );
}

#[test]
fn match_and_case_are_clause_keywords() {
    let src = "match p:\n    case 1:\n        pass\n    case _:\n        pass\n";
    let lines = lines_with(src, &Style::default());
    let starts: Vec<_> = lines.iter().map(|line| (line.depth, line.tokens[0].value.as_str())).collect();
    assert_eq!(starts, [(0, "match"), (1, "case"), (2, "pass"), (1, "case"), (2, "pass")]);
    assert!(lines[0].tokens[0].is_keyword);
    assert!(lines[1].tokens[0].is_keyword);
}

#[test]
fn match_as_a_name_is_not_a_keyword() {
    let lines = lines_with("match = 1\n", &Style::default());
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].tokens[0].is_keyword);
}

#[test]
fn docstrings_are_detected() {
    let src = "\"\"\"Module.\"\"\"\nclass A:\n    # note\n    \"\"\"Class.\"\"\"\n    x = \"not a docstring\"\n    \"neither\"\n";
    let lines = lines_with(src, &Style::default());
    let flags: Vec<_> = lines.iter().map(|line| line.is_docstring).collect();
    assert_eq!(flags, [true, false, false, true, false, false]);
}

#[test]
fn continuation_is_recorded() {
    let lines = lines_with("x = 1 + \\\n    2\n", &Style::default());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].has_continuation());
}

#[test]
fn tokens_outside_brackets_are_unbreakable() {
    let lines = lines_with("x = f(a, b)\n", &Style::default());
    let tokens = &lines[0].tokens;
    assert!(!tokens[1].can_break_before, "before `=`");
    assert!(!tokens[3].can_break_before, "before `(`");
    assert!(tokens[4].can_break_before, "before `a`");
}

#[test]
fn multiple_statements_per_line_stay_together() {
    assert_eq!(render("a = 1; b = 2\n"), ["0|a = 1; b = 2"]);
}
