//! Weft Formatter
//!
//! Penalty-driven source formatter for Python code.
//!
//! # Architecture
//!
//! A file flows through the pipeline once:
//!
//! 1. **Parse**: `weft_parse` builds a concrete syntax tree that keeps every
//!    token, comment and blank line.
//! 2. **Annotate**: comments become leaves; every leaf gets formatting
//!    subtypes, a split penalty and forced-split marks.
//! 3. **Unwrap**: the tree is flattened into logical lines, one per
//!    statement or clause header.
//! 4. **Directives**: disable comments and line ranges pick the lines that
//!    keep their layout.
//! 5. **Blank lines and merging**: vertical spacing is decided and short
//!    `if` bodies may join their header.
//! 6. **Layout**: each line is laid out flat when it fits, otherwise by a
//!    best-first search for the cheapest set of line breaks.
//! 7. **Verify**: the output is parsed again before it is returned.
//!
//! # Modules
//!
//! - [`style`]: formatting options, presets and style files
//! - [`directives`]: line ranges and disable/enable comments
//! - [`error`]: error types

mod annotate;
mod blank_lines;
mod breaks;
mod decision;
pub mod directives;
mod emitter;
pub mod error;
mod join;
mod line;
mod reformat;
mod search;
mod spacing;
pub mod style;
mod subtypes;
mod token;
mod unwrap;

pub use directives::LineRanges;
pub use error::{FormatError, LineRangeError, StyleError};
pub use style::{Style, DEFAULT_SEARCH_NODE_BUDGET, PRESET_NAMES};
pub use weft_parse::ParserConfig;

use similar::TextDiff;
use weft_parse::parse_source;

use crate::directives::KeepBreaks;
use crate::reformat::Renderer;

/// Options for one formatting run, beyond the style.
#[derive(Clone, Debug)]
pub struct FormatOptions {
    /// Only format logical lines touching these ranges.
    pub lines: Option<LineRanges>,
    /// Parse the output again and fail if it does not parse.
    pub verify: bool,
    /// Parser settings, including the soft-keyword lookahead budget. Used
    /// for the input and for the verify pass.
    pub parser: ParserConfig,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            lines: None,
            verify: true,
            parser: ParserConfig::default(),
        }
    }
}

/// Format `source` according to `style`.
///
/// Line endings are normalized to `\n`. An input without any code or
/// comments formats to the empty string.
pub fn format_source(source: &str, style: &Style, options: &FormatOptions) -> Result<String, FormatError> {
    let source = normalize_line_endings(source);
    if source.trim().is_empty() {
        return Ok(String::new());
    }
    let keep_breaks = KeepBreaks::new(style)?;

    let mut tree = parse_source(&source, &options.parser)?;
    let annotations = annotate::annotate(&mut tree, style);
    let mut lines = unwrap::unwrap_tree(&tree, &annotations, style);
    directives::mark_disabled(&mut lines, options.lines.as_ref());
    let newlines = blank_lines::compute_newlines(&lines, style, options.lines.as_ref());
    let placed = join::merge_lines(lines, &newlines, style);

    let output = Renderer::new(&source, style, keep_breaks).render(&placed, source.len());
    if options.verify {
        verify(&output, &options.parser)?;
    }
    tracing::debug!(
        lines = placed.len(),
        changed = output != source,
        "formatted source"
    );
    Ok(output)
}

/// Format `source` and return a unified diff against it, or an empty
/// string if formatting changes nothing. `path` names both sides.
pub fn format_diff(source: &str, path: &str, style: &Style, options: &FormatOptions) -> Result<String, FormatError> {
    let formatted = format_source(source, style, options)?;
    Ok(unified_diff(source, &formatted, path))
}

/// Unified diff of `original` against `formatted`.
pub fn unified_diff(original: &str, formatted: &str, path: &str) -> String {
    if original == formatted {
        return String::new();
    }
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .context_radius(3)
        .header(&format!("{path}\t(original)"), &format!("{path}\t(reformatted)"))
        .to_string()
}

fn normalize_line_endings(source: &str) -> String {
    let mut text = weft_lexer::normalize_newlines(source).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// The output must still be a valid program.
fn verify(output: &str, config: &ParserConfig) -> Result<(), FormatError> {
    parse_source(output, config)
        .map(|_| ())
        .map_err(|source| FormatError::Verify { source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
