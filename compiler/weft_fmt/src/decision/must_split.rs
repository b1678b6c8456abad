//! Structural split rules.
//!
//! [`DecisionState::must_split`] forces a newline before the next token;
//! [`DecisionState::can_split`] forbids one. The rules are checked in a
//! fixed order and several return early, so reordering them changes output.

use super::{is_compound_statement, is_function_def, DecisionState};
use crate::annotate::split_penalty::UNBREAKABLE;
use crate::line::LogicalLine;
use crate::style::Style;
use crate::subtypes::Subtypes;

/// Remaining width below which a split after an opening bracket is forced,
/// as a fraction of the column limit.
const SQUISHED_FRACTION: f64 = 0.3;

impl DecisionState {
    /// May the next token go on a new line?
    pub fn can_split(&self, line: &LogicalLine, style: &Style, must_split: bool) -> bool {
        let Some(index) = self.next else {
            return false;
        };
        let tokens = &line.tokens;
        let current = &tokens[index];
        let previous = index.checked_sub(1).map(|i| &tokens[i]);

        if !must_split
            && current.subtypes.contains(Subtypes::DICTIONARY_KEY_PART)
            && !current.subtypes.contains(Subtypes::DICTIONARY_KEY)
            && !style.allow_multiline_dictionary_keys
        {
            return false;
        }
        if !must_split
            && current.subtypes.contains(Subtypes::DICTIONARY_VALUE)
            && !style.allow_split_before_dict_value
        {
            return false;
        }
        if let Some(previous) = previous {
            if previous.value == "(" && current.value == ")" && !style.allow_split_before_dict_value {
                // An empty call that is part of a dictionary value.
                let mut start = index - 1;
                while start > 0 && (tokens[start - 1].is_name() || tokens[start - 1].value == ".") {
                    start -= 1;
                }
                if tokens[start].subtypes.contains(Subtypes::DICTIONARY_VALUE) {
                    return false;
                }
            }
            if previous.value == "." && current.value == "." {
                return false;
            }
        }
        current.can_break_before
    }

    /// Must the next token go on a new line?
    pub fn must_split(&mut self, line: &LogicalLine, style: &Style) -> bool {
        let Some(index) = self.next else {
            return false;
        };
        let tokens = &line.tokens;
        let current = &tokens[index];
        if current.must_break_before {
            return true;
        }
        let Some(prev_index) = index.checked_sub(1) else {
            return false;
        };
        let previous = &tokens[prev_index];

        if style.split_all_comma_separated_values && previous.value == "," {
            return !current
                .subtypes
                .intersects(Subtypes::COMP_FOR | Subtypes::LAMBDEF);
        }

        if self.top().split_before_closing_bracket
            && ((matches!(current.value.as_str(), "}" | "]") && style.split_before_closing_bracket)
                || (current.closes_scope() && style.dedent_closing_brackets))
            && !current.subtypes.contains(Subtypes::SUBSCRIPT_BRACKET)
        {
            return current.node_split_penalty != UNBREAKABLE;
        }

        if current.value == ")"
            && previous.value == ","
            && current
                .matching_bracket
                .is_some_and(|opening| !is_single_element_tuple(line, opening))
        {
            return true;
        }

        if style.split_before_first_argument && is_compound_statement(line) && !is_function_def(line) {
            return false;
        }

        // List splitting.
        if style.dedent_closing_brackets || style.indent_closing_brackets || style.split_before_first_argument {
            let bracket_index = if current.closes_scope() { index } else { prev_index };
            let bracket = &tokens[bracket_index];
            if !bracket.subtypes.contains(Subtypes::SUBSCRIPT_BRACKET) {
                if bracket.opens_scope() {
                    if style.coalesce_brackets && current.opens_scope() {
                        return false;
                    }
                    if let Some(closing) = bracket.matching_bracket {
                        let last = if !is_last_scope_in_line(line, bracket_index) || bracket.container_opening.is_some() {
                            closing
                        } else {
                            last_token_in_line(line, closing)
                        };
                        if !self.fits_on_line(line, style, bracket_index, last) {
                            self.top_mut().split_before_closing_bracket = true;
                            return true;
                        }
                    }
                } else if (style.dedent_closing_brackets || style.indent_closing_brackets)
                    && current.closes_scope()
                {
                    return self.top().split_before_closing_bracket;
                }
            }
        }

        if style.split_before_expression_after_opening_paren
            && current.is_name()
            && previous.value == "("
            && previous.container_opening.is_none()
        {
            let after_keyword_or_operator = prev_index
                .checked_sub(1)
                .is_some_and(|i| !tokens[i].is_name() && !tokens[i].is_keyword);
            if after_keyword_or_operator && is_parenthesized_expression(line, index) {
                return true;
            }
        }

        if (current.is_name() || current.is_string()) && previous.value == "," {
            // A list of calls or `%` formats that does not fit goes one per line.
            let mut after = index + 1;
            let splits_for_call = if current.is_name() {
                while after < tokens.len() && (tokens[after].is_name() || tokens[after].value == ".") {
                    after += 1;
                }
                tokens.get(after).is_some_and(|token| token.value == "(")
            } else {
                while after < tokens.len() && tokens[after].is_string() {
                    after += 1;
                }
                tokens.get(after).is_some_and(|token| token.value == "%")
            };
            if splits_for_call {
                if let Some(opening) = current.container_opening {
                    let open = &tokens[opening];
                    if matches!(open.value.as_str(), "[" | "{") {
                        if let Some(closing) = open.matching_bracket {
                            if !self.fits_on_line(line, style, opening, closing) {
                                return true;
                            }
                        }
                    } else if tokens[after].value == "(" {
                        if let Some(closing) = tokens[after].matching_bracket {
                            if !self.fits_on_line(line, style, index, closing) {
                                return true;
                            }
                        }
                    }
                }
            }
        }

        if current.opens_scope()
            && previous.value == ","
            && !tokens
                .get(index + 1)
                .is_some_and(|next| next.subtypes.contains(Subtypes::DICTIONARY_KEY))
        {
            // A list of tuples that does not fit goes one per line.
            if let Some(opening) = current.container_opening {
                let open = &tokens[opening];
                if matches!(open.value.as_str(), "[" | "{")
                    && !open.subtypes.contains(Subtypes::SUBSCRIPT_BRACKET)
                {
                    if let Some(closing) = current.matching_bracket {
                        if !self.fits_on_line(line, style, index, closing) {
                            return true;
                        }
                    }
                }
            }
        }

        // Dict and set splitting.
        if style.each_dict_entry_on_separate_line
            && current.subtypes.contains(Subtypes::DICTIONARY_KEY)
            && !current.is_comment()
        {
            if previous.value == "{" && prev_index > 0 {
                if let Some(opening) = opening_bracket(line, prev_index - 1) {
                    let open = &tokens[opening];
                    let call_argument = open.value == "("
                        && opening > 0
                        && tokens[opening - 1].is_name();
                    if call_argument {
                        let dict_fits = previous
                            .matching_bracket
                            .is_some_and(|closing| self.fits_on_line(line, style, prev_index, closing));
                        let dict_followed = previous
                            .matching_bracket
                            .is_some_and(|closing| closing + 1 < tokens.len());
                        let builder_call = open
                            .matching_bracket
                            .and_then(|closing| tokens.get(closing + 1))
                            .is_some_and(|next| next.value == ".");
                        if dict_fits && dict_followed && !builder_call && scope_has_no_commas(line, prev_index) {
                            return false;
                        }
                    }
                }
            }
            return true;
        }

        if style.split_before_dict_set_generator && current.subtypes.contains(Subtypes::DICT_SET_GENERATOR) {
            return true;
        }

        if current.subtypes.contains(Subtypes::DICTIONARY_VALUE) && !current.opens_scope() {
            if let Some(opening) = opening_bracket(line, index) {
                if !self.each_dict_entry_fits_on_one_line(line, style, opening) {
                    return style.allow_split_before_dict_value;
                }
            }
        }

        if previous.value == "{" {
            if let Some(closing) = previous.matching_bracket {
                let ends_with_comma = closing > 0 && tokens[closing - 1].value == ",";
                if ends_with_comma && !self.fits_on_line(line, style, prev_index, closing) {
                    self.top_mut().split_before_closing_bracket = true;
                    return true;
                }
            }
        }

        // Argument list splitting.
        if style.split_before_named_assigns
            && !current.is_comment()
            && current.subtypes.contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN_ARG_LIST)
            && !matches!(previous.value.as_str(), "=" | ":" | "*" | "**")
            && !matches!(current.value.as_str(), ":" | "=" | "," | ")")
            && !is_function_definition(line, prev_index)
        {
            if previous.value == "(" {
                return previous
                    .matching_bracket
                    .is_some_and(|closing| !self.fits_on_line(line, style, prev_index, closing));
            }
            if let Some(opening) = opening_bracket(line, index) {
                return !self.container_fits_on_start_line(line, style, opening);
            }
        }

        if current.value != "{"
            && current.value != ")"
            && previous.value == "("
            && self.argument_list_has_dictionary_entry(line, style, index)
        {
            return true;
        }

        if style.split_arguments_when_comma_terminated {
            if let Some(opening) = opening_bracket(line, index) {
                let after_name = opening > 0 && tokens[opening - 1].is_name();
                let comma_terminated = tokens[opening]
                    .matching_bracket
                    .is_some_and(|closing| closing > 0 && tokens[closing - 1].value == ",");
                if after_name && matches!(previous.value.as_str(), "(" | ",") && comma_terminated {
                    return true;
                }
            }
        }

        if (current.is_name() || matches!(current.value.as_str(), "*" | "**")) && previous.value == "," {
            if self.nested_call_must_split(line, style, index) {
                return true;
            }
        }

        let pprevious = prev_index.checked_sub(1).map(|i| &tokens[i]);

        // A dictionary first argument that spans lines pushes the remaining
        // arguments too far right.
        if current.value == "{" && previous.value == "(" && pprevious.is_some_and(|token| token.is_name()) {
            if let Some(dict_end) = current.matching_bracket {
                let comma_follows = tokens.get(dict_end + 1).is_some_and(|next| next.value == ",");
                if comma_follows && !self.fits_on_line(line, style, index, dict_end) {
                    return true;
                }
            }
        }

        if current.is_name() && pprevious.is_some_and(|token| token.is_name()) && previous.value == "(" {
            let call_fits = previous
                .matching_bracket
                .is_some_and(|closing| self.fits_on_line(line, style, prev_index, closing));
            if !call_fits && is_function_call_with_arguments(line, index) {
                if style.split_before_expression_after_opening_paren || style.split_before_first_argument {
                    return true;
                }
                if self.nested_call_must_split(line, style, index) {
                    return true;
                }
            }
        }

        if previous.opens_scope()
            && !current.opens_scope()
            && !current.is_comment()
            && !previous.subtypes.contains(Subtypes::SUBSCRIPT_BRACKET)
        {
            if let Some(closing) = previous.matching_bracket {
                if !self.fits_on_line(line, style, prev_index, closing) {
                    let elements = &previous.container_elements;
                    if elements.len() == 1 {
                        return false;
                    }
                    let mut bounds = elements.clone();
                    bounds.push(closing);
                    for pair in bounds.windows(2) {
                        if !tokens[pair[0]].opens_scope() && !self.fits_on_line(line, style, pair[0], pair[1]) {
                            return true;
                        }
                    }
                    let remaining = style.column_limit.saturating_sub(self.column) as f64;
                    if remaining / (style.column_limit as f64) < SQUISHED_FRACTION {
                        return true;
                    }
                }
            }
        }

        if style.split_complex_comprehension && self.complex_comprehension_must_split(line, style, index) {
            return true;
        }

        // Keep breaks the author made before bitwise operators and comments.
        if style.split_before_bitwise_operator
            && matches!(current.value.as_str(), "&" | "|")
            && previous.end_line() < current.line
        {
            return true;
        }
        if current.is_comment() && previous.end_line() < current.line {
            return true;
        }

        false
    }

    /// Do the tokens `start..=end` fit after the current column?
    fn fits_on_line(&self, line: &LogicalLine, style: &Style, start: usize, end: usize) -> bool {
        let tokens = &line.tokens;
        let length = tokens[end].total_length.saturating_sub(tokens[start].total_length) + tokens[start].width();
        length + self.column <= style.column_limit
    }

    /// Would the bracketed list starting at `opening` fit at the current
    /// bracket indent?
    fn container_fits_on_start_line(&self, line: &LogicalLine, style: &Style, opening: usize) -> bool {
        let tokens = &line.tokens;
        tokens[opening].matching_bracket.map_or(true, |closing| {
            tokens[closing].total_length.saturating_sub(tokens[opening].total_length) + self.top().indent
                <= style.column_limit
        })
    }

    fn each_dict_entry_fits_on_one_line(&self, line: &LogicalLine, style: &Style, opening: usize) -> bool {
        let tokens = &line.tokens;
        let Some(closing) = tokens[opening].matching_bracket else {
            return true;
        };
        let mut bounds = tokens[opening].container_elements.clone();
        bounds.push(closing);
        bounds.windows(2).all(|pair| {
            let (start, next) = (pair[0], pair[1]);
            if !tokens[start].subtypes.contains(Subtypes::DICTIONARY_KEY) {
                return true;
            }
            let length = tokens[next - 1].total_length.saturating_sub(tokens[start].total_length)
                + tokens[start].width();
            length + self.top().indent <= style.column_limit
        })
    }

    /// The argument list opened right before `index` holds a dictionary too
    /// wide for the enclosing indent.
    fn argument_list_has_dictionary_entry(&self, line: &LogicalLine, style: &Style, index: usize) -> bool {
        let tokens = &line.tokens;
        let is_call_argument = tokens[index].container_opening.is_some_and(|opening| {
            tokens[opening].value == "(" && opening > 0 && tokens[opening - 1].is_name()
        });
        if !is_call_argument || self.stack.len() < 2 {
            return false;
        }
        let outer_indent = self.stack[self.stack.len() - 2].indent;
        let mut at = index;
        while at < tokens.len() {
            let token = &tokens[at];
            if token.value == "{" {
                return token.matching_bracket.is_some_and(|closing| {
                    tokens[closing].total_length.saturating_sub(token.total_length) + outer_indent
                        > style.column_limit
                });
            }
            if token.closes_scope() {
                break;
            }
            at = if token.opens_scope() {
                token.matching_bracket.unwrap_or(at) + 1
            } else {
                at + 1
            };
        }
        false
    }

    /// Inside an argument list, a call starting at `index` that does not
    /// fit, or is followed by more than a separator, goes on its own line.
    fn nested_call_must_split(&self, line: &LogicalLine, style: &Style, index: usize) -> bool {
        let tokens = &line.tokens;
        let in_call = opening_bracket(line, index).is_some_and(|opening| {
            tokens[opening].value == "("
                && opening > 0
                && (tokens[opening - 1].is_name() || matches!(tokens[opening - 1].value.as_str(), "*" | "**"))
        });
        if !in_call {
            return false;
        }
        let mut at = index;
        while at < tokens.len() {
            let token = &tokens[at];
            if token.value == "(" {
                let Some(closing) = token.matching_bracket else {
                    return false;
                };
                let followed_by_more = tokens
                    .get(closing + 1)
                    .is_some_and(|next| next.value != "," && !next.closes_scope());
                return !self.fits_on_line(line, style, index, closing) || followed_by_more;
            }
            if !(token.is_name() || matches!(token.value.as_str(), "*" | "**" | ".")) {
                return false;
            }
            at += 1;
        }
        false
    }

    /// A comprehension with several clauses that does not fit puts each
    /// clause on its own line.
    fn complex_comprehension_must_split(&self, line: &LogicalLine, style: &Style, index: usize) -> bool {
        let tokens = &line.tokens;
        let current = &tokens[index];
        let starts_clause = (current.value == "for" && current.subtypes.contains(Subtypes::COMP_FOR))
            || (current.value == "if" && current.subtypes.contains(Subtypes::COMP_IF));
        if !starts_clause {
            return false;
        }
        let Some(opening) = current.container_opening else {
            return false;
        };
        let Some(closing) = tokens[opening].matching_bracket else {
            return false;
        };
        let clauses = (opening + 1..closing)
            .filter(|&i| tokens[i].container_opening == Some(opening))
            .filter(|&i| {
                let token = &tokens[i];
                (token.value == "for" && token.subtypes.contains(Subtypes::COMP_FOR))
                    || (token.value == "if" && token.subtypes.contains(Subtypes::COMP_IF))
            })
            .count();
        clauses > 1 && !self.fits_on_line(line, style, opening, closing)
    }
}

/// The bracket a token belongs to: itself if it opens one, its partner if
/// it closes one, otherwise the innermost enclosing opener.
fn opening_bracket(line: &LogicalLine, index: usize) -> Option<usize> {
    let token = &line.tokens[index];
    if token.opens_scope() && token.matching_bracket.is_some() {
        Some(index)
    } else if token.closes_scope() {
        token.matching_bracket
    } else {
        token.container_opening
    }
}

/// No bracket opens after the one closed at `closing`.
fn is_last_scope_in_line(line: &LogicalLine, opening: usize) -> bool {
    let tokens = &line.tokens;
    let Some(closing) = tokens[opening].matching_bracket else {
        return true;
    };
    !tokens[closing + 1..].iter().any(|token| token.opens_scope())
}

/// The last token before a comment, or the line's last token.
fn last_token_in_line(line: &LogicalLine, mut index: usize) -> usize {
    while !line.tokens[index].is_comment() && index + 1 < line.tokens.len() {
        index += 1;
    }
    index
}

fn skip_scope(line: &LogicalLine, index: usize) -> usize {
    let token = &line.tokens[index];
    if token.opens_scope() {
        token.matching_bracket.unwrap_or(index + 1)
    } else {
        index + 1
    }
}

/// Does the bracket at `opening` hold exactly one comma at its own level?
fn is_single_element_tuple(line: &LogicalLine, opening: usize) -> bool {
    let Some(closing) = line.tokens[opening].matching_bracket else {
        return false;
    };
    let mut commas = 0;
    let mut at = opening + 1;
    while at < closing {
        if line.tokens[at].value == "," {
            commas += 1;
        }
        at = skip_scope(line, at).max(at + 1);
    }
    commas == 1
}

fn scope_has_no_commas(line: &LogicalLine, opening: usize) -> bool {
    let Some(closing) = line.tokens[opening].matching_bracket else {
        return true;
    };
    let mut at = opening + 1;
    while at < closing {
        if line.tokens[at].value == "," {
            return false;
        }
        at = skip_scope(line, at).max(at + 1);
    }
    true
}

/// `name(` followed by something other than `)`.
fn is_function_call_with_arguments(line: &LogicalLine, mut index: usize) -> bool {
    let tokens = &line.tokens;
    while index < tokens.len() {
        let token = &tokens[index];
        if token.value == "(" {
            return tokens.get(index + 1).is_some_and(|next| next.value != ")");
        }
        if !(token.is_name() || matches!(token.value.as_str(), "." | "=")) {
            return false;
        }
        index += 1;
    }
    false
}

/// Is the token at `index` the `(` of a function definition?
fn is_function_definition(line: &LogicalLine, index: usize) -> bool {
    line.tokens[index].value == "("
        && index > 0
        && line.tokens[index - 1].subtypes.contains(Subtypes::FUNC_DEF)
}

/// The expression starting at `index` runs to the `)` that closes the
/// bracket before it, with no top-level comma and nothing chained after.
fn is_parenthesized_expression(line: &LogicalLine, index: usize) -> bool {
    let tokens = &line.tokens;
    let Some(opening) = index.checked_sub(1) else {
        return false;
    };
    let Some(closing) = tokens[opening].matching_bracket else {
        return false;
    };
    let mut at = index;
    while at < closing {
        if tokens[at].value == "," {
            return false;
        }
        at = skip_scope(line, at).max(at + 1);
    }
    !tokens.get(closing + 1).is_some_and(|next| next.value == ".")
}
