use pretty_assertions::assert_eq;

use super::*;

fn format(src: &str) -> String {
    format_source(src, &Style::default(), &FormatOptions::default()).unwrap()
}

#[test]
fn empty_and_blank_input_format_to_nothing() {
    assert_eq!(format(""), "");
    assert_eq!(format("\n\n   \n"), "");
}

#[test]
fn line_endings_are_normalized() {
    assert_eq!(format("x=1\r\ny=2"), "x = 1\ny = 2\n");
}

#[test]
fn trailing_blank_lines_are_dropped() {
    assert_eq!(format("x = 1\n\n\n\n"), "x = 1\n");
}

#[test]
fn syntax_error_is_reported() {
    let err = format_source("def f(:\n", &Style::default(), &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::Syntax(_)));
}

#[test]
fn invalid_i18n_pattern_is_a_style_error() {
    let style = Style {
        i18n_comment: "(".to_owned(),
        ..Style::default()
    };
    let err = format_source("x = 1\n", &style, &FormatOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::Style(StyleError::InvalidRegex { .. })));
}

#[test]
fn line_ranges_limit_formatting() {
    let options = FormatOptions {
        lines: Some("2-2".parse().unwrap()),
        verify: true,
        ..FormatOptions::default()
    };
    let out = format_source("a=1\nb=2\nc=3\n", &Style::default(), &options).unwrap();
    assert_eq!(out, "a=1\nb = 2\nc=3\n");
}

#[test]
fn unchanged_source_has_empty_diff() {
    let diff = format_diff("x = 1\n", "a.py", &Style::default(), &FormatOptions::default()).unwrap();
    assert_eq!(diff, "");
}

#[test]
fn diff_names_both_sides() {
    let diff = format_diff("x=1\n", "a.py", &Style::default(), &FormatOptions::default()).unwrap();
    assert!(diff.starts_with("--- a.py\t(original)\n+++ a.py\t(reformatted)\n"));
    assert!(diff.contains("-x=1\n"));
    assert!(diff.contains("+x = 1\n"));
}

#[test]
fn blank_lines_inside_range_are_adjusted() {
    let options = FormatOptions {
        lines: Some("6-8".parse().unwrap()),
        ..FormatOptions::default()
    };
    let src = "a  =  1\n\n\n\n\ndef  f():\n    pass\nb=2\n";
    let out = format_source(src, &Style::default(), &options).unwrap();
    assert_eq!(out, "a  =  1\n\n\ndef f():\n    pass\n\n\nb = 2\n");
}

#[test]
fn unparsable_output_is_a_verify_error() {
    let err = verify("def f(:\n", &ParserConfig::default()).unwrap_err();
    assert!(matches!(err, FormatError::Verify { .. }), "{err}");
    assert!(!err.is_input_error());
    assert!(err.to_string().starts_with("formatted output does not parse"), "{err}");
    assert!(verify("x = 1\n", &ParserConfig::default()).is_ok());
}

#[test]
fn syntax_errors_are_input_errors() {
    let err = format_source("(\n", &Style::default(), &FormatOptions::default()).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn lookahead_budget_reaches_the_parser() {
    let src = "match x:\n    case 1:\n        pass\n";
    assert_eq!(format(src), src);
    let options = FormatOptions {
        parser: ParserConfig { lookahead_budget: 0 },
        ..FormatOptions::default()
    };
    let err = format_source(src, &Style::default(), &options).unwrap_err();
    assert!(matches!(err, FormatError::Syntax(_)), "{err}");
}
