use pretty_assertions::assert_eq;
use weft_parse::{parse_source, ParserConfig};

use super::*;
use crate::annotate::annotate;
use crate::unwrap::unwrap_tree;

fn lines_with(src: &str, style: &Style) -> Vec<LogicalLine> {
    let mut tree = parse_source(src, &ParserConfig::default()).unwrap();
    let annotations = annotate(&mut tree, style);
    unwrap_tree(&tree, &annotations, style)
}

fn disabled(src: &str, ranges: Option<&LineRanges>) -> Vec<bool> {
    let mut lines = lines_with(src, &Style::default());
    mark_disabled(&mut lines, ranges);
    lines.iter().map(|line| line.disable).collect()
}

#[test]
fn parses_ranges() {
    let ranges: LineRanges = "3-7".parse().unwrap();
    assert!(ranges.contains(3));
    assert!(ranges.contains(7));
    assert!(!ranges.contains(8));
    assert!(ranges.intersects(1, 3));
    assert!(!ranges.intersects(8, 9));
}

#[test]
fn rejects_bad_ranges() {
    for text in ["", "3", "a-b", "0-2", "5-4", "-4"] {
        assert!(text.parse::<LineRanges>().is_err(), "{text:?}");
    }
}

#[test]
fn ranges_extend() {
    let mut ranges: LineRanges = "1-2".parse().unwrap();
    ranges.extend(["10-12".parse::<LineRanges>().unwrap()]);
    assert!(ranges.contains(11));
    assert!(!ranges.contains(5));
}

#[test]
fn lines_outside_ranges_are_disabled() {
    let ranges: LineRanges = "2-2".parse().unwrap();
    assert_eq!(disabled("a=1\nb=2\nc=3\n", Some(&ranges)), [true, false, true]);
}

#[test]
fn multiline_statement_touching_a_range_is_formatted() {
    let ranges: LineRanges = "3-3".parse().unwrap();
    assert_eq!(disabled("a=1\nb=f(1,\n  2)\n", Some(&ranges)), [true, false]);
}

#[test]
fn disable_enable_region() {
    let src = "a=1\n# weft: disable\nb  =  2\nc  =  3\n# weft: enable\nd=4\n";
    assert_eq!(disabled(src, None), [false, false, true, true, false, false]);
}

#[test]
fn fmt_off_is_case_insensitive() {
    let src = "# FMT: OFF\nb  =  2\n# fmt: on\nc=3\n";
    assert_eq!(disabled(src, None), [false, true, false, false]);
}

#[test]
fn unterminated_disable_runs_to_end() {
    let src = "# fmt: off\nb  =  2\nc  =  3\n";
    assert_eq!(disabled(src, None), [false, true, true]);
}

#[test]
fn trailing_disable_covers_one_statement() {
    let src = "a  =  1  # fmt: off\nb  =  2\n";
    assert_eq!(disabled(src, None), [true, false]);
}

#[test]
fn i18n_calls_and_comments_keep_breaks() {
    let style = Style {
        i18n_comment: r"#\..*".to_owned(),
        i18n_function_call: vec!["_".to_owned()],
        ..Style::default()
    };
    let keep = KeepBreaks::new(&style).unwrap();
    let lines = lines_with("x = _('hello')\ny = 'a'  #. translators\nz = f('b')\n", &style);
    let kept: Vec<_> = lines.iter().map(|line| keep.applies_to(line)).collect();
    assert_eq!(kept, [true, true, false]);
}

#[test]
fn pylint_line_too_long_keeps_breaks() {
    let style = Style::default();
    let keep = KeepBreaks::new(&style).unwrap();
    let lines = lines_with("x = 1  # pylint: disable=line-too-long\n", &style);
    assert!(keep.applies_to(&lines[0]));
}

#[test]
fn invalid_i18n_regex_is_a_style_error() {
    let style = Style {
        i18n_comment: "(".to_owned(),
        ..Style::default()
    };
    assert!(matches!(KeepBreaks::new(&style), Err(StyleError::InvalidRegex { .. })));
}
