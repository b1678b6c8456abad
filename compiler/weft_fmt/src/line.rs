//! Logical lines.
//!
//! A logical line is the token sequence of one statement or clause header,
//! which the layout engine places on one or more physical lines.

use crate::annotate::split_penalty::UNBREAKABLE;
use crate::breaks;
use crate::spacing::space_required_between;
use crate::style::Style;
use crate::token::FormatToken;

#[derive(Clone, Debug, Default)]
pub(crate) struct LogicalLine {
    /// Block nesting level.
    pub depth: usize,
    pub tokens: Vec<FormatToken>,
    /// Emit the line as written.
    pub disable: bool,
    /// The line is a docstring: the first statement of a module, class or
    /// function body, consisting of a lone string.
    pub is_docstring: bool,
}

impl LogicalLine {
    pub fn new(depth: usize) -> Self {
        LogicalLine {
            depth,
            ..LogicalLine::default()
        }
    }

    #[inline]
    pub fn first(&self) -> Option<&FormatToken> {
        self.tokens.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&FormatToken> {
        self.tokens.last()
    }

    /// Source line of the first token.
    pub fn first_line(&self) -> u32 {
        self.first().map_or(0, |token| token.line)
    }

    /// Source line the last token ends on.
    pub fn last_line(&self) -> u32 {
        self.last().map_or(0, FormatToken::end_line)
    }

    /// A standalone comment line.
    pub fn is_comment(&self) -> bool {
        self.first().is_some_and(FormatToken::is_comment)
    }

    pub fn starts_with_keyword(&self, keyword: &str) -> bool {
        self.first().is_some_and(|token| token.is_keyword_value(keyword))
    }

    pub fn is_decorator(&self) -> bool {
        self.first().is_some_and(|token| token.value == "@")
    }

    /// A `def`, `async def` or `class` header.
    pub fn is_definition(&self) -> bool {
        match self.tokens.as_slice() {
            [first, second, ..] if first.is_keyword_value("async") => second.is_keyword_value("def"),
            [first, ..] => first.is_keyword_value("def") || first.is_keyword_value("class"),
            [] => false,
        }
    }

    /// A backslash continuation joins two of the line's tokens.
    pub fn has_continuation(&self) -> bool {
        self.tokens.iter().skip(1).any(|token| token.after_continuation)
    }

    /// Index of the previous token that is not a comment.
    pub fn previous_code_token(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|&i| !self.tokens[i].is_comment())
    }

    /// Link brackets to their partners and record container structure.
    pub fn match_brackets(&mut self) {
        let mut open: Vec<usize> = Vec::new();
        for index in 0..self.tokens.len() {
            self.tokens[index].matching_bracket = None;
            self.tokens[index].container_elements.clear();
            if self.tokens[index].closes_scope() {
                if let Some(opening) = open.pop() {
                    self.tokens[opening].matching_bracket = Some(index);
                    self.tokens[index].matching_bracket = Some(opening);
                    self.tokens[index].container_opening = Some(opening);
                    continue;
                }
            }
            self.tokens[index].container_opening = open.last().copied();
            if self.tokens[index].opens_scope() {
                open.push(index);
            }
        }

        for index in 0..self.tokens.len() {
            let Some(closing) = self.tokens[index].matching_bracket else {
                continue;
            };
            if !self.tokens[index].opens_scope() {
                continue;
            }
            let mut elements = Vec::new();
            let mut expect_element = true;
            for inner in index + 1..closing {
                let token = &self.tokens[inner];
                if token.container_opening != Some(index) || token.is_comment() {
                    continue;
                }
                if expect_element {
                    elements.push(inner);
                    expect_element = false;
                }
                if token.value == "," {
                    expect_element = true;
                }
            }
            self.tokens[index].container_elements = elements;
        }
    }

    /// Tokens outside every bracket cannot be split from the line start.
    pub fn mark_unbreakable_outside_brackets(&mut self) {
        let mut level = 0usize;
        for (index, token) in self.tokens.iter_mut().enumerate() {
            if index > 0 && level == 0 {
                token.node_split_penalty = UNBREAKABLE;
            }
            if token.opens_scope() {
                level += 1;
            } else if token.closes_scope() {
                level = level.saturating_sub(1);
            }
        }
    }

    /// Derive spacing, widths, and break information from the tokens.
    ///
    /// Everything is recomputed from the annotations, so calling this
    /// again after the token list changed is safe.
    pub fn calculate_formatting_information(&mut self, style: &Style) {
        self.match_brackets();
        let Some(first) = self.tokens.first_mut() else {
            return;
        };
        first.spaces_required_before = 0;
        first.total_length = first.width();
        first.split_penalty = first.node_split_penalty;
        first.must_break_before = false;
        first.can_break_before = false;

        for index in 1..self.tokens.len() {
            let (before, after) = self.tokens.split_at_mut(index);
            let prev = &before[index - 1];
            let cur = &mut after[0];

            cur.spaces_required_before = if cur.is_comment() {
                style.spaces_before_comment
            } else {
                0
            };
            if cur.spaces_required_before == 0 && space_required_between(prev, cur, style) {
                cur.spaces_required_before = 1;
            }
            cur.total_length = prev.total_length + cur.spaces_required_before + cur.width();
            cur.split_penalty = cur
                .node_split_penalty
                .saturating_add(breaks::split_penalty(prev, cur, style));
            cur.must_break_before = breaks::must_break_before(prev, cur);
            cur.can_break_before = cur.must_break_before || breaks::can_break_before(prev, cur, style);
        }
    }

    /// Width of the line laid out flat.
    pub fn flat_width(&self) -> usize {
        self.last().map_or(0, |token| token.total_length)
    }

    /// The tokens laid out flat on one line, without indentation.
    pub fn flat_text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(&" ".repeat(token.spaces_required_before));
            out.push_str(&token.value);
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
