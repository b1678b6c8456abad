//! Vertical spacing between logical lines.
//!
//! Produces, for each logical line, the number of newlines written before
//! it: 0 for the first line, 1 for "directly below", 2 for one blank line
//! and so on. Lines that keep their layout also keep their original gap,
//! less any blank lines that fall inside a formatted line range.

use crate::directives::LineRanges;
use crate::line::LogicalLine;
use crate::style::Style;

const NO_BLANK_LINES: usize = 1;
const ONE_BLANK_LINE: usize = 2;

/// Clause keywords that continue a statement rather than follow it.
const CONTINUATION_CLAUSES: &[&str] = &["elif", "else", "except", "finally"];

/// Newlines before each line.
pub(crate) fn compute_newlines(
    lines: &[LogicalLine],
    style: &Style,
    ranges: Option<&LineRanges>,
) -> Vec<usize> {
    let mut newlines = vec![0; lines.len()];
    // Depths of definition headers whose body may still be open.
    let mut open_definitions: Vec<usize> = Vec::new();

    for index in 1..lines.len() {
        let (prev, line) = (&lines[index - 1], &lines[index]);

        let mut closed_definition = false;
        while open_definitions.last().is_some_and(|&depth| line.depth <= depth) {
            open_definitions.pop();
            closed_definition = true;
        }

        let count = if starts_definition(line) {
            definition_newlines(lines, index, style, &mut newlines)
        } else if line.is_docstring {
            docstring_newlines(prev, style)
        } else if closed_definition && !continues_statement(line) {
            after_definition_newlines(line, style)
        } else if line.depth == 0
            && line.first().is_some_and(|token| token.is_name())
            && (prev.starts_with_keyword("import") || prev.starts_with_keyword("from"))
        {
            1 + style.blank_lines_between_top_level_imports_and_variables as usize
        } else {
            preserved_newlines(prev, line)
        };
        newlines[index] = count;

        if line.is_definition() {
            open_definitions.push(line.depth);
        }
    }

    for index in 1..lines.len() {
        let (prev, line) = (&lines[index - 1], &lines[index]);
        if line.disable {
            newlines[index] = retained_newlines(prev, line, newlines[index], ranges);
        }
    }
    newlines[0] = 0;
    newlines
}

/// A definition header or the decorator that opens one.
fn starts_definition(line: &LogicalLine) -> bool {
    line.is_definition() || line.is_decorator()
}

fn continues_statement(line: &LogicalLine) -> bool {
    CONTINUATION_CLAUSES
        .iter()
        .any(|keyword| line.starts_with_keyword(keyword))
        || line.starts_with_keyword("case")
}

fn top_level_separation(style: &Style) -> usize {
    1 + style.blank_lines_around_top_level_definition as usize
}

/// Source lines between the end of `prev` and the start of `line`.
fn original_gap(prev: &LogicalLine, line: &LogicalLine) -> usize {
    line.first_line().saturating_sub(prev.last_line()) as usize
}

/// Newlines before a line that keeps its layout. Blank lines inside a
/// formatted range may still be removed, down to `computed`.
fn retained_newlines(
    prev: &LogicalLine,
    line: &LogicalLine,
    computed: usize,
    ranges: Option<&LineRanges>,
) -> usize {
    let gap = original_gap(prev, line);
    let deletable = ranges.map_or(0, |ranges| {
        (prev.last_line() + 1..line.first_line())
            .filter(|&blank| ranges.contains(blank))
            .count()
    });
    if deletable == 0 {
        gap.max(NO_BLANK_LINES)
    } else {
        gap.saturating_sub(deletable).max(computed).max(NO_BLANK_LINES)
    }
}

/// At most one blank line survives.
fn preserved_newlines(prev: &LogicalLine, line: &LogicalLine) -> usize {
    if original_gap(prev, line) > 1 {
        ONE_BLANK_LINE
    } else {
        NO_BLANK_LINES
    }
}

fn docstring_newlines(prev: &LogicalLine, style: &Style) -> usize {
    if prev.starts_with_keyword("class") && style.blank_line_before_class_docstring {
        ONE_BLANK_LINE
    } else if prev.is_comment() && style.blank_line_before_module_docstring {
        ONE_BLANK_LINE
    } else {
        NO_BLANK_LINES
    }
}

fn after_definition_newlines(line: &LogicalLine, style: &Style) -> usize {
    if line.depth == 0 {
        top_level_separation(style)
    } else {
        ONE_BLANK_LINE
    }
}

/// Newlines before a definition at `index`. A comment block directly above
/// it at the same depth is attached: the block takes the separation and the
/// definition follows the block directly.
fn definition_newlines(
    lines: &[LogicalLine],
    index: usize,
    style: &Style,
    newlines: &mut [usize],
) -> usize {
    let line = &lines[index];
    let prev = &lines[index - 1];
    if prev.is_decorator() {
        return NO_BLANK_LINES;
    }

    let mut block_start = index;
    while block_start > 0 {
        let above = &lines[block_start - 1];
        let below = &lines[block_start];
        if !above.is_comment() || above.depth != line.depth || original_gap(above, below) != 1 {
            break;
        }
        block_start -= 1;
    }

    let before_block = block_start.checked_sub(1).map(|i| &lines[i]);
    let separation = match before_block {
        None => 0,
        Some(above) if above.is_decorator() => NO_BLANK_LINES,
        Some(above) if above.depth < line.depth => {
            if above.is_definition() && style.blank_line_before_nested_class_or_def {
                ONE_BLANK_LINE
            } else {
                NO_BLANK_LINES
            }
        }
        Some(_) if line.depth == 0 => top_level_separation(style),
        Some(_) => ONE_BLANK_LINE,
    };

    if block_start == index {
        separation
    } else {
        newlines[block_start] = separation;
        NO_BLANK_LINES
    }
}
