//! Comment directives and line ranges.
//!
//! Decides which logical lines keep the layout they were written with:
//! lines outside the requested line ranges, lines between a disable and an
//! enable comment, and statements carrying a trailing disable comment.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{LineRangeError, StyleError};
use crate::line::LogicalLine;
use crate::style::Style;

const DISABLE_PATTERN: &str = r"(?i)^#.*\b(?:weft:\s*disable|fmt: ?off)\b";
const ENABLE_PATTERN: &str = r"(?i)^#.*\b(?:weft:\s*enable|fmt: ?on)\b";
const PYLINT_LINE_TOO_LONG: &str = r"\bpylint:\s+disable=line-too-long\b";

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn is_disable_comment(text: &str) -> bool {
    static DISABLE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&DISABLE, DISABLE_PATTERN).is_some_and(|re| re.is_match(text.trim()))
}

fn is_enable_comment(text: &str) -> bool {
    static ENABLE: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&ENABLE, ENABLE_PATTERN).is_some_and(|re| re.is_match(text.trim()))
}

/// Inclusive, 1-based source line ranges to format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineRanges {
    ranges: Vec<(u32, u32)>,
}

impl LineRanges {
    pub fn new() -> Self {
        LineRanges::default()
    }

    pub fn push(&mut self, first: u32, last: u32) -> Result<(), LineRangeError> {
        if first == 0 || first > last {
            return Err(LineRangeError(format!("{first}-{last}")));
        }
        self.ranges.push((first, last));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Does any range overlap `first..=last`?
    pub fn intersects(&self, first: u32, last: u32) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| start <= last && first <= end)
    }

    /// Does any range contain `line`?
    pub fn contains(&self, line: u32) -> bool {
        self.intersects(line, line)
    }
}

impl FromStr for LineRanges {
    type Err = LineRangeError;

    /// Parse one `START-END` range.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || LineRangeError(text.to_owned());
        let (first, last) = text.trim().split_once('-').ok_or_else(invalid)?;
        let first: u32 = first.trim().parse().map_err(|_| invalid())?;
        let last: u32 = last.trim().parse().map_err(|_| invalid())?;
        let mut ranges = LineRanges::new();
        ranges.push(first, last).map_err(|_| invalid())?;
        Ok(ranges)
    }
}

impl Extend<LineRanges> for LineRanges {
    fn extend<I: IntoIterator<Item = LineRanges>>(&mut self, iter: I) {
        for other in iter {
            self.ranges.extend(other.ranges);
        }
    }
}

/// Mark lines that must be emitted as written.
pub(crate) fn mark_disabled(lines: &mut [LogicalLine], ranges: Option<&LineRanges>) {
    if let Some(ranges) = ranges {
        for line in lines.iter_mut() {
            line.disable = !ranges.intersects(line.first_line(), line.last_line());
        }
    }

    let mut index = 0;
    while index < lines.len() {
        let line = &mut lines[index];
        if line.is_comment() && line.first().is_some_and(|token| is_disable_comment(&token.value)) {
            index += 1;
            while index < lines.len() {
                let line = &mut lines[index];
                let reenables = line.is_comment()
                    && line.first().is_some_and(|token| {
                        is_enable_comment(&token.value) && !is_disable_comment(&token.value)
                    });
                if reenables {
                    break;
                }
                line.disable = true;
                index += 1;
            }
        } else if line
            .last()
            .is_some_and(|token| token.is_comment() && is_disable_comment(&token.value))
        {
            line.disable = true;
        }
        index += 1;
    }
}

/// Style-driven rules for lines whose line breaks are kept.
#[derive(Debug)]
pub(crate) struct KeepBreaks<'s> {
    i18n_comment: Option<Regex>,
    i18n_function_call: &'s [String],
}

impl<'s> KeepBreaks<'s> {
    pub(crate) fn new(style: &'s Style) -> Result<Self, StyleError> {
        let i18n_comment = if style.i18n_comment.is_empty() {
            None
        } else {
            let regex = Regex::new(&style.i18n_comment).map_err(|source| StyleError::InvalidRegex {
                key: "i18n_comment".to_owned(),
                source,
            })?;
            Some(regex)
        };
        Ok(KeepBreaks {
            i18n_comment,
            i18n_function_call: &style.i18n_function_call,
        })
    }

    /// The line holds a translatable string or asks linters to ignore its
    /// length; its tokens keep their original line breaks.
    pub(crate) fn applies_to(&self, line: &LogicalLine) -> bool {
        self.has_i18n(line) || has_pylint_line_too_long(line)
    }

    fn has_i18n(&self, line: &LogicalLine) -> bool {
        if let Some(regex) = &self.i18n_comment {
            if line
                .tokens
                .iter()
                .any(|token| token.is_comment() && regex.is_match(&token.value))
            {
                return true;
            }
        }
        line.tokens.windows(2).any(|pair| {
            pair[1].value == "(" && self.i18n_function_call.iter().any(|name| *name == pair[0].value)
        })
    }
}

fn has_pylint_line_too_long(line: &LogicalLine) -> bool {
    static PYLINT: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(regex) = cached(&PYLINT, PYLINT_LINE_TOO_LONG) else {
        return false;
    };
    line.tokens
        .iter()
        .any(|token| token.is_comment() && regex.is_match(&token.value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
