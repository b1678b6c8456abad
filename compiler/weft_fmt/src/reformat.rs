//! Lay out and render logical lines.
//!
//! Each placed line goes down one of four paths:
//!
//! - lines marked disabled, and lines with a backslash continuation, are
//!   copied from the source, re-indented to their block depth;
//! - lines that must keep their line breaks (i18n, pylint) are replayed
//!   with the breaks they were written with;
//! - lines that fit within the column limit are laid out flat;
//! - everything else goes through the layout search.

use crate::decision::{DecisionState, Placement};
use crate::directives::KeepBreaks;
use crate::emitter::{Emitter, StringEmitter};
use crate::join::PlacedLine;
use crate::line::LogicalLine;
use crate::search::{find_layout, replay};
use crate::style::Style;

pub(crate) struct Renderer<'a> {
    source_lines: Vec<&'a str>,
    style: &'a Style,
    keep_breaks: KeepBreaks<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a str, style: &'a Style, keep_breaks: KeepBreaks<'a>) -> Self {
        Renderer {
            source_lines: source.split('\n').collect(),
            style,
            keep_breaks,
        }
    }

    pub fn render(&self, lines: &[PlacedLine], capacity: usize) -> String {
        let mut out = StringEmitter::with_capacity(capacity);
        for placed in lines {
            if !out.is_empty() {
                out.emit_newlines(placed.newlines.max(1));
            }
            self.render_line(&placed.line, &mut out);
        }
        out.output()
    }

    fn render_line(&self, line: &LogicalLine, out: &mut impl Emitter) {
        let style = self.style;
        let indent = line.depth * style.indent_width;
        if line.tokens.is_empty() {
            return;
        }
        if line.disable || line.has_continuation() {
            tracing::debug!(line = line.first_line(), "emitting line as written");
            self.render_verbatim(line, indent, out);
            return;
        }

        let initial = DecisionState::new(line, style, indent);
        let placements = if self.keep_breaks.applies_to(line) {
            original_layout(line, style, &initial)
        } else if fits_on_one_line(line, style) {
            line.tokens
                .iter()
                .skip(1)
                .map(|token| Placement::Spaces(token.spaces_required_before))
                .collect()
        } else if let Some(placements) = find_layout(line, style, &initial) {
            placements
        } else {
            tracing::debug!(line = line.first_line(), "no layout satisfies the split rules");
            original_layout(line, style, &initial)
        };
        render_tokens(line, indent, &placements, out);
    }

    /// Copy the source text of `line`, shifting every line that starts
    /// with a token by the same amount as the first.
    fn render_verbatim(&self, line: &LogicalLine, indent: usize, out: &mut impl Emitter) {
        let (Some(first), Some(last)) = (line.first(), line.last()) else {
            return;
        };
        let first_line = first.line as usize;
        let last_line = (last.end_line() as usize).max(first_line);
        let column = first.column as usize;
        let delta = indent as isize - column as isize;

        let Some(text) = self.source_line(first_line) else {
            return;
        };
        let start = byte_offset(text, column);
        let (lead, rest) = text.split_at(start);
        if delta == 0 && lead.chars().all(|c| c == ' ' || c == '\t') {
            out.emit(text);
        } else {
            out.emit_indent(indent);
            out.emit(rest);
        }

        for number in first_line + 1..=last_line {
            out.emit_newlines(1);
            let Some(text) = self.source_line(number) else {
                continue;
            };
            if starts_with_token(line, number as u32) {
                out.emit(&shift(text, delta));
            } else {
                out.emit(text);
            }
        }
    }

    fn source_line(&self, number: usize) -> Option<&'a str> {
        number
            .checked_sub(1)
            .and_then(|index| self.source_lines.get(index))
            .copied()
    }
}

/// The line as written: a new line wherever the source had one.
fn original_layout(line: &LogicalLine, style: &Style, initial: &DecisionState) -> Vec<Placement> {
    let decisions: Vec<bool> = line
        .tokens
        .windows(2)
        .map(|pair| !pair[1].after_continuation && pair[1].line > pair[0].end_line())
        .collect();
    replay(line, style, initial, &decisions)
}

/// Can the whole line go on one line without searching?
fn fits_on_one_line(line: &LogicalLine, style: &Style) -> bool {
    let tokens = &line.tokens;
    if style.split_arguments_when_comma_terminated
        && tokens
            .windows(2)
            .any(|pair| pair[1].value == ")" && pair[0].value == ",")
    {
        return false;
    }
    if style.force_multiline_dict && tokens.iter().any(|token| token.value == "{") {
        return false;
    }
    if tokens
        .iter()
        .any(|token| token.must_break_before || token.is_multiline_string())
    {
        return false;
    }

    let Some(mut last) = tokens.len().checked_sub(1) else {
        return true;
    };
    if tokens[last].is_pylint_comment() && last > 0 {
        last -= 1;
    }
    let indent = line.depth * style.indent_width;
    tokens[last].total_length + indent <= style.column_limit
        && !tokens[..last].iter().any(|token| token.is_comment())
}

fn render_tokens(line: &LogicalLine, indent: usize, placements: &[Placement], out: &mut impl Emitter) {
    let tokens = &line.tokens;
    out.emit_indent(indent);
    out.emit(&tokens[0].value);
    for (index, placement) in placements.iter().enumerate() {
        let Some(token) = tokens.get(index + 1) else {
            break;
        };
        match *placement {
            Placement::Spaces(spaces) => out.emit_indent(spaces),
            Placement::NewLine(column) => {
                // A comment that had a blank line above it keeps one.
                let previous = &tokens[index];
                let blank_above = token.is_comment() && token.line > previous.end_line() + 1;
                out.emit_newlines(if blank_above { 2 } else { 1 });
                out.emit_indent(column);
            }
        }
        out.emit(&token.value);
    }
}

/// Does a token other than a string's continuation start on `number`?
fn starts_with_token(line: &LogicalLine, number: u32) -> bool {
    let inside_string = line
        .tokens
        .iter()
        .any(|token| token.is_string() && token.line < number && number <= token.end_line());
    !inside_string && line.tokens.iter().any(|token| token.line == number)
}

/// Byte offset of character column `column` in `text`.
fn byte_offset(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Move `text` right by `delta` columns, or left by removing leading
/// whitespace, never more than there is.
fn shift(text: &str, delta: isize) -> String {
    if delta >= 0 {
        let mut shifted = " ".repeat(delta.unsigned_abs());
        shifted.push_str(text);
        return shifted;
    }
    let available = text.len() - text.trim_start_matches([' ', '\t']).len();
    let remove = delta.unsigned_abs().min(available);
    text[remove..].to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
