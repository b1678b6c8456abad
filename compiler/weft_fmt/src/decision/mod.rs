//! Format decision state.
//!
//! A [`DecisionState`] is a point in the layout of one logical line: the
//! next token to place, the current column, and one [`BracketContext`] per
//! open bracket. Placing a token on the current line or on a new line moves
//! the state forward and returns the penalty that decision costs.

use smallvec::{smallvec, SmallVec};

use crate::line::LogicalLine;
use crate::style::Style;
use crate::subtypes::Subtypes;
use crate::token::FormatToken;

mod must_split;

/// Extra cost of a closing bracket that splits although its opener did not.
const BRACKET_MISMATCH_PENALTY: i64 = 100;

/// Layout facts for one open bracket (the line itself is the outermost).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct BracketContext {
    /// Column continuation lines inside the bracket start at.
    pub indent: usize,
    /// Column of the last line start within the bracket.
    pub last_space: usize,
    /// Column of the closing bracket when it goes on its own line.
    pub closing_scope_indent: usize,
    /// The line broke right after the opening bracket.
    pub split_before_closing_bracket: bool,
    pub num_line_splits: usize,
}

impl BracketContext {
    fn new(indent: usize, last_space: usize) -> Self {
        BracketContext {
            indent,
            last_space,
            closing_scope_indent: 0,
            split_before_closing_bracket: false,
            num_line_splits: 0,
        }
    }
}

/// Where a token was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Same line, after this many spaces.
    Spaces(usize),
    /// New line, starting at this column.
    NewLine(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct DecisionState {
    next: Option<usize>,
    column: usize,
    paren_level: usize,
    start_of_line_level: usize,
    lowest_level_on_line: usize,
    stack: SmallVec<[BracketContext; 4]>,
    first_indent: usize,
    last_placement: Placement,
}

/// The part of a state that identifies it in the search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    next: Option<usize>,
    column: usize,
    paren_level: usize,
    start_of_line_level: usize,
    lowest_level_on_line: usize,
    stack: Option<SmallVec<[BracketContext; 4]>>,
}

impl DecisionState {
    /// A state with the line's first token placed at `first_indent`.
    pub fn new(line: &LogicalLine, style: &Style, first_indent: usize) -> Self {
        let mut state = DecisionState {
            next: (!line.tokens.is_empty()).then_some(0),
            column: first_indent,
            paren_level: 0,
            start_of_line_level: 0,
            lowest_level_on_line: 0,
            stack: smallvec![BracketContext::new(first_indent, first_indent)],
            first_indent,
            last_placement: Placement::NewLine(first_indent),
        };
        state.move_to_next_token(line, style);
        state
    }

    /// Index of the token to place next; `None` once the line is done.
    #[inline]
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    #[cfg(test)]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Placement of the token placed most recently.
    #[inline]
    pub fn last_placement(&self) -> Placement {
        self.last_placement
    }

    /// Dedup key. A widened key leaves out the bracket stack.
    pub fn key(&self, widened: bool) -> StateKey {
        StateKey {
            next: self.next,
            column: self.column,
            paren_level: self.paren_level,
            start_of_line_level: self.start_of_line_level,
            lowest_level_on_line: self.lowest_level_on_line,
            stack: (!widened).then(|| self.stack.clone()),
        }
    }

    fn top(&self) -> &BracketContext {
        // The outermost context is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut BracketContext {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Place the next token and return the cost of doing so.
    pub fn add_token(&mut self, line: &LogicalLine, style: &Style, newline: bool, must_split: bool) -> i64 {
        let Some(index) = self.next else {
            return 0;
        };
        let mut penalty = if newline {
            self.add_token_on_newline(line, style, index, must_split)
        } else {
            self.add_token_on_current_line(line, style, index);
            0
        };
        let token = &line.tokens[index];
        if newline && token.value == "for" && token.subtypes.contains(Subtypes::COMP_FOR) {
            penalty += i64::from(style.split_penalty_comprehension);
        }
        penalty + self.move_to_next_token(line, style)
    }

    fn add_token_on_current_line(&mut self, line: &LogicalLine, style: &Style, index: usize) {
        let current = &line.tokens[index];
        let spaces = current.spaces_required_before;
        let column = self.column;
        if index > 0 && line.tokens[index - 1].opens_scope() {
            let top = self.top_mut();
            if current.is_comment() {
                top.closing_scope_indent = top.indent.saturating_sub(style.continuation_indent_width);
            } else {
                top.closing_scope_indent = column.saturating_sub(1);
                if style.align_closing_bracket_with_visual_indent {
                    top.closing_scope_indent += 1;
                }
                top.indent = column + spaces;
            }
        }
        self.column += spaces;
        self.last_placement = Placement::Spaces(spaces);
    }

    fn add_token_on_newline(&mut self, line: &LogicalLine, style: &Style, index: usize, must_split: bool) -> i64 {
        let tokens = &line.tokens;
        let current = &tokens[index];
        let previous = index.checked_sub(1).map(|i| &tokens[i]);

        self.column = self.newline_column(line, style, index);
        self.last_placement = Placement::NewLine(self.column);
        if !current.is_comment() {
            let column = self.column;
            self.top_mut().last_space = column;
        }
        self.start_of_line_level = self.paren_level;
        self.lowest_level_on_line = self.paren_level;

        if previous.is_some_and(|previous| follows_opening_bracket(tokens, index, previous)) {
            let dedent = if style.indent_closing_brackets {
                0
            } else {
                style.continuation_indent_width
            };
            let top = self.top_mut();
            top.closing_scope_indent = top.indent.saturating_sub(dedent);
            top.split_before_closing_bracket = true;
        }

        let mut penalty = i64::from(current.split_penalty);
        if must_split {
            return penalty;
        }
        if current.closes_scope() && !self.top().split_before_closing_bracket {
            penalty += BRACKET_MISMATCH_PENALTY;
        }
        // Breaking before a conditional expression or a comprehension does
        // not count as an added split.
        if current.value != "if" && current.value != "for" {
            let top = self.top_mut();
            top.num_line_splits += 1;
            penalty += i64::from(style.split_penalty_for_added_line_split) * top.num_line_splits as i64;
        }
        if current.opens_scope() && previous.is_some_and(FormatToken::opens_scope) {
            let after_name = index >= 2 && tokens[index - 2].is_name();
            if !after_name {
                penalty += 10;
            }
        }
        penalty + 10
    }

    /// Column a token placed on a new line starts at.
    fn newline_column(&self, line: &LogicalLine, style: &Style, index: usize) -> usize {
        let tokens = &line.tokens;
        let current = &tokens[index];
        let top = self.top();

        if current.closes_scope() {
            let right_after_opener = index
                .checked_sub(1)
                .is_some_and(|prev| follows_opening_bracket(tokens, index, &tokens[prev]));
            if right_after_opener {
                return top.indent.saturating_sub(style.continuation_indent_width);
            }
            return top.closing_scope_indent;
        }

        if style.indent_dictionary_value
            && index > 0
            && tokens[index - 1].value == ":"
            && current.subtypes.contains(Subtypes::DICTIONARY_VALUE)
        {
            return top.indent + style.continuation_indent_width;
        }

        // Continuation lines of a compound statement header must not line
        // up with the body.
        let closing_style = style.dedent_closing_brackets || style.indent_closing_brackets;
        if is_compound_statement(line) && (!closing_style || style.split_before_first_argument) {
            let body_indent = self.first_indent + style.indent_width;
            if body_indent == top.indent {
                return body_indent + style.continuation_indent_width;
            }
        }

        top.indent
    }

    /// Advance past the token just placed, opening or closing bracket
    /// contexts, and charge for running over the column limit.
    fn move_to_next_token(&mut self, line: &LogicalLine, style: &Style) -> i64 {
        let Some(index) = self.next else {
            return 0;
        };
        let current = &line.tokens[index];

        if !current.opens_scope() && !current.closes_scope() {
            self.lowest_level_on_line = self.lowest_level_on_line.min(self.paren_level);
        }
        if current.opens_scope() {
            let last_space = self.top().last_space;
            self.stack.push(BracketContext::new(
                style.continuation_indent_width + last_space,
                last_space,
            ));
            self.paren_level += 1;
        }
        if self.stack.len() > 1 && current.closes_scope() {
            let closed = self.stack.pop();
            let parent = self.top_mut();
            parent.last_space = if current.subtypes.contains(Subtypes::DICTIONARY_KEY_PART) {
                parent.indent
            } else {
                closed.map_or(parent.last_space, |closed| closed.last_space)
            };
            self.paren_level = self.paren_level.saturating_sub(1);
        }

        self.column += current.width();
        self.next = (index + 1 < line.tokens.len()).then_some(index + 1);

        let mut penalty = 0;
        if !current.is_pylint_comment() && self.column > style.column_limit {
            let excess = (self.column - style.column_limit) as i64;
            penalty += i64::from(style.split_penalty_excess_character) * excess;
        }
        if current.is_multiline_string() {
            self.column = current.last_line_width();
        }
        penalty
    }
}

/// `previous` is an opening bracket, or a comment right after one.
fn follows_opening_bracket(tokens: &[FormatToken], index: usize, previous: &FormatToken) -> bool {
    previous.opens_scope()
        || (previous.is_comment() && index >= 2 && tokens[index - 2].opens_scope())
}

/// The first keyword of the line, looking past `async`.
fn leading_keyword(line: &LogicalLine) -> Option<&FormatToken> {
    match line.tokens.as_slice() {
        [first, second, ..] if first.is_keyword_value("async") => Some(second),
        [first, ..] => Some(first),
        [] => None,
    }
}

fn is_compound_statement(line: &LogicalLine) -> bool {
    const COMPOUND: &[&str] = &["for", "while", "if", "elif", "with", "except", "def", "class"];
    leading_keyword(line).is_some_and(|token| token.is_keyword && COMPOUND.contains(&token.value.as_str()))
}

fn is_function_def(line: &LogicalLine) -> bool {
    leading_keyword(line).is_some_and(|token| token.is_keyword_value("def"))
}
