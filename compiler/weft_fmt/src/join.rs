//! Line merging.
//!
//! Lines that keep their layout absorb any following lines written on the
//! same physical line, so they are emitted once. A short `if`/`elif`/`else`
//! body written on its header's line may stay there.

use crate::line::LogicalLine;
use crate::style::Style;

/// A logical line ready for layout, with the newlines written before it.
#[derive(Debug)]
pub(crate) struct PlacedLine {
    pub newlines: usize,
    pub line: LogicalLine,
}

pub(crate) fn merge_lines(mut lines: Vec<LogicalLine>, newlines: &[usize], style: &Style) -> Vec<PlacedLine> {
    let mut placed = Vec::with_capacity(lines.len());
    let mut last_was_merged = false;
    let mut index = 0;

    while index < lines.len() {
        let count = newlines.get(index).copied().unwrap_or(1);
        let mut line = std::mem::take(&mut lines[index]);
        index += 1;

        if line.disable {
            while index < lines.len() && lines[index].first_line() == line.last_line() {
                let absorbed = std::mem::take(&mut lines[index]);
                line.tokens.extend(absorbed.tokens);
                index += 1;
            }
            line.match_brackets();
            last_was_merged = false;
        } else if can_merge(&line, &lines[index..], last_was_merged, style) {
            let body = std::mem::take(&mut lines[index]);
            index += 1;
            // A lone multi-line string may be a shell shebang trick; leave it
            // exactly as written.
            line.disable = body.tokens.len() == 1 && body.tokens[0].is_multiline_string();
            line.tokens.extend(body.tokens);
            line.mark_unbreakable_outside_brackets();
            line.calculate_formatting_information(style);
            last_was_merged = true;
        } else {
            last_was_merged = false;
        }
        placed.push(PlacedLine { newlines: count, line });
    }
    placed
}

/// Can the first of `rest` join `line`?
fn can_merge(line: &LogicalLine, rest: &[LogicalLine], last_was_merged: bool, style: &Style) -> bool {
    let Some(body) = rest.first() else {
        return false;
    };
    let indent = line.depth * style.indent_width;
    if indent > style.column_limit || body.disable {
        return false;
    }
    // Only a header with a single-statement body qualifies.
    if let Some(after) = rest.get(1) {
        if after.depth >= body.depth && after.depth != line.depth {
            return false;
        }
    }
    if line.is_definition() || line.is_decorator() {
        return false;
    }

    let mut limit = style.column_limit - indent;
    if line.flat_width() >= limit {
        return false;
    }
    limit -= line.flat_width();
    let is_if = line.starts_with_keyword("if");
    let continues_if = last_was_merged && (line.starts_with_keyword("elif") || line.starts_with_keyword("else"));
    if !is_if && !continues_if {
        return false;
    }

    if body.tokens.len() == 1 && body.tokens[0].is_multiline_string() {
        return true;
    }
    if line.first_line() != body.first_line() {
        return false;
    }
    // One space separates the header's colon from the body.
    if body.flat_width() + 1 >= limit {
        return false;
    }
    style.join_multiple_lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
