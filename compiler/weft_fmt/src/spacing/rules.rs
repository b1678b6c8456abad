//! Declarative spacing rules.
//!
//! Rules are evaluated in order; the first matching rule determines the
//! action. Order matters: several later rules are only correct because an
//! earlier one already claimed the pairs they would get wrong.

use super::{SpaceAction, TokenMatcher, TokenPair};
use crate::style::Style;
use crate::subtypes::Subtypes;
use crate::token::FormatToken;

/// A declarative spacing rule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpaceRule {
    /// Human-readable name for debugging.
    pub name: &'static str,
    pub left: TokenMatcher,
    pub right: TokenMatcher,
    /// Extra condition over both tokens.
    pub when: Option<fn(&TokenPair<'_>) -> bool>,
    pub action: SpaceAction,
}

impl SpaceRule {
    const fn new(
        name: &'static str,
        left: TokenMatcher,
        right: TokenMatcher,
        action: SpaceAction,
    ) -> Self {
        SpaceRule {
            name,
            left,
            right,
            when: None,
            action,
        }
    }

    const fn when(mut self, guard: fn(&TokenPair<'_>) -> bool) -> Self {
        self.when = Some(guard);
        self
    }

    #[inline]
    pub fn matches(&self, pair: &TokenPair<'_>) -> bool {
        self.left.matches(pair.left)
            && self.right.matches(pair.right)
            && self.when.map_or(true, |guard| guard(pair))
    }
}

// Token predicates

fn is_comment(token: &FormatToken) -> bool {
    token.is_comment()
}

fn is_word_or_literal(token: &FormatToken) -> bool {
    token.is_keyword || token.is_name() || token.is_number() || token.is_string()
}

fn is_word(token: &FormatToken) -> bool {
    token.is_keyword || token.is_name()
}

fn is_string(token: &FormatToken) -> bool {
    token.is_string()
}

fn is_name(token: &FormatToken) -> bool {
    token.is_name()
}

fn has(token: &FormatToken, subtype: Subtypes) -> bool {
    token.subtypes.contains(subtype)
}

fn is_subscript_colon(token: &FormatToken) -> bool {
    has(token, Subtypes::SUBSCRIPT_COLON)
}

fn is_subscript_bracket(token: &FormatToken) -> bool {
    has(token, Subtypes::SUBSCRIPT_BRACKET)
}

fn is_typed_name(token: &FormatToken) -> bool {
    has(token, Subtypes::TYPED_NAME)
}

fn is_named_assign(token: &FormatToken) -> bool {
    has(token, Subtypes::DEFAULT_OR_NAMED_ASSIGN)
}

fn is_varargs_list(token: &FormatToken) -> bool {
    has(token, Subtypes::VARARGS_LIST)
}

fn is_star_or_star_star(token: &FormatToken) -> bool {
    token
        .subtypes
        .intersects(Subtypes::VARARGS_STAR | Subtypes::KWARGS_STAR_STAR)
}

fn is_decorator_at(token: &FormatToken) -> bool {
    token.value == "@" && has(token, Subtypes::DECORATOR)
}

fn is_binary_op_not_power(token: &FormatToken) -> bool {
    token.is_binary_op() && token.value != "**"
}

fn is_unary_op_not_not(token: &FormatToken) -> bool {
    token.is_unary_op() && token.value != "not"
}

fn is_operand_start(token: &FormatToken) -> bool {
    token.is_name() || token.is_number() || token.value == "("
}

// Pair guards

fn left_not_named_assign(pair: &TokenPair<'_>) -> bool {
    !is_named_assign(pair.left)
}

fn right_not_typed(pair: &TokenPair<'_>) -> bool {
    !is_typed_name(pair.right)
}

fn left_not_typed(pair: &TokenPair<'_>) -> bool {
    !is_typed_name(pair.left)
}

fn right_is_arg_list_assign(pair: &TokenPair<'_>) -> bool {
    has(pair.right, Subtypes::DEFAULT_OR_NAMED_ASSIGN_ARG_LIST)
}

fn right_is_plain_follower(pair: &TokenPair<'_>) -> bool {
    !matches!(pair.right.value.as_str(), "[" | ")" | "]" | "}" | ".") && !pair.right.is_binary_op()
}

fn left_is_binary(pair: &TokenPair<'_>) -> bool {
    pair.left.is_binary_op()
}

fn right_is_binary(pair: &TokenPair<'_>) -> bool {
    pair.right.is_binary_op()
}

fn left_not_none(pair: &TokenPair<'_>) -> bool {
    pair.left.value != "None"
}

fn right_not_none(pair: &TokenPair<'_>) -> bool {
    pair.right.value != "None"
}

fn brackets_pair_up(pair: &TokenPair<'_>) -> bool {
    pair.left.kind.closing_pair() == Some(pair.right.kind)
}

// Style flags

fn space_inside_brackets(style: &Style) -> bool {
    style.space_inside_brackets
}

fn space_before_closing_after_comma(style: &Style) -> bool {
    style.space_between_ending_comma_and_closing_bracket
}

fn spaces_around_power(style: &Style) -> bool {
    style.spaces_around_power_operator
}

fn spaces_around_named_assign(style: &Style) -> bool {
    style.spaces_around_default_or_named_assign
}

use SpaceAction::{NoSpace, Space, StyleFlag};
use TokenMatcher::{Any, Category, Exact, OneOf};

const DOTS: &[&str] = &[".", "..."];
const CALL_OR_INDEX: &[&str] = &["(", "["];

/// All spacing rules, in evaluation order.
pub(crate) static SPACE_RULES: &[SpaceRule] = &[
    // Comments carry their own spacing.
    SpaceRule::new("before comment", Any, Category(is_comment), NoSpace),
    SpaceRule::new(
        "between words and literals",
        Category(is_word_or_literal),
        Category(is_word_or_literal),
        Space,
    ),
    SpaceRule::new("comma before colon", Exact(","), Exact(":"), Space),
    SpaceRule::new(
        "colon after opening bracket",
        TokenMatcher::OPEN_DELIM,
        Exact(":"),
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "colon before closing bracket",
        Exact(":"),
        TokenMatcher::CLOSE_DELIM,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new("before colon or comma", Any, OneOf(&[":", ","]), NoSpace),
    SpaceRule::new(
        "ending comma",
        Exact(","),
        TokenMatcher::CLOSE_DELIM,
        StyleFlag(space_before_closing_after_comma),
    ),
    SpaceRule::new("after comma", Exact(","), Any, Space),
    SpaceRule::new("relative import", Exact("from"), OneOf(DOTS), Space),
    SpaceRule::new("relative import end", OneOf(DOTS), Exact("import"), Space),
    SpaceRule::new("assigned ellipsis", Exact("="), OneOf(DOTS), Space).when(left_not_named_assign),
    SpaceRule::new("annotated ellipsis", Exact(":"), OneOf(DOTS), Space),
    SpaceRule::new("between words", Category(is_word), Category(is_word), Space),
    SpaceRule::new("after slice colon", Category(is_subscript_colon), Any, NoSpace),
    SpaceRule::new("before slice colon", Any, Category(is_subscript_colon), NoSpace),
    SpaceRule::new("after annotation", Category(is_typed_name), Any, Space),
    SpaceRule::new("before annotation", Any, Category(is_typed_name), Space),
    SpaceRule::new("string keyword argument", Category(is_string), Exact("="), NoSpace)
        .when(right_is_arg_list_assign),
    SpaceRule::new("after string", Category(is_string), Any, Space).when(right_is_plain_follower),
    SpaceRule::new(
        "string before closing bracket",
        Category(is_string),
        TokenMatcher::CLOSE_DELIM,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "indexed string",
        Category(is_string),
        Category(is_subscript_bracket),
        NoSpace,
    ),
    SpaceRule::new(
        "binary then unary",
        Category(is_binary_op_not_power),
        TokenMatcher::UNARY_OP,
        Space,
    ),
    SpaceRule::new("keyword then unary", TokenMatcher::KEYWORD, TokenMatcher::UNARY_OP, Space),
    SpaceRule::new("unary then unary", TokenMatcher::UNARY_OP, TokenMatcher::UNARY_OP, NoSpace),
    SpaceRule::new("power after", Exact("**"), Any, StyleFlag(spaces_around_power)).when(left_is_binary),
    SpaceRule::new("power before", Any, Exact("**"), StyleFlag(spaces_around_power))
        .when(right_is_binary),
    SpaceRule::new("after binary operator", TokenMatcher::BINARY_OP, Any, Space),
    SpaceRule::new("before binary operator", Any, TokenMatcher::BINARY_OP, Space),
    SpaceRule::new(
        "unary operand",
        Category(is_unary_op_not_not),
        Category(is_operand_start),
        NoSpace,
    ),
    SpaceRule::new(
        "after named assign",
        Category(is_named_assign),
        Any,
        StyleFlag(spaces_around_named_assign),
    )
    .when(right_not_typed),
    SpaceRule::new(
        "before named assign",
        Any,
        Category(is_named_assign),
        StyleFlag(spaces_around_named_assign),
    )
    .when(left_not_typed),
    SpaceRule::new("after lambda default", Category(is_varargs_list), Any, NoSpace),
    SpaceRule::new("before lambda default", Any, Category(is_varargs_list), NoSpace),
    SpaceRule::new("after star", Category(is_star_or_star_star), Any, NoSpace),
    SpaceRule::new("decorator", Category(is_decorator_at), Any, NoSpace),
    SpaceRule::new("keyword then dot", TokenMatcher::KEYWORD, Exact("."), Space).when(left_not_none),
    SpaceRule::new("dot then keyword", Exact("."), TokenMatcher::KEYWORD, Space).when(right_not_none),
    SpaceRule::new("after dot", Exact("."), Any, NoSpace),
    SpaceRule::new("before dot", Any, Exact("."), NoSpace),
    SpaceRule::new(
        "empty brackets",
        TokenMatcher::OPEN_DELIM,
        TokenMatcher::CLOSE_DELIM,
        NoSpace,
    )
    .when(brackets_pair_up),
    SpaceRule::new(
        "nested opening brackets",
        TokenMatcher::OPEN_DELIM,
        TokenMatcher::OPEN_DELIM,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "nested closing brackets",
        TokenMatcher::CLOSE_DELIM,
        TokenMatcher::CLOSE_DELIM,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "call or index after bracket",
        TokenMatcher::CLOSE_DELIM,
        OneOf(CALL_OR_INDEX),
        NoSpace,
    ),
    SpaceRule::new(
        "first item",
        TokenMatcher::OPEN_DELIM,
        Category(is_word_or_literal),
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new("call or index", Category(is_name), OneOf(CALL_OR_INDEX), NoSpace),
    SpaceRule::new(
        "last item",
        Any,
        TokenMatcher::CLOSE_DELIM,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "unary first item",
        TokenMatcher::OPEN_DELIM,
        TokenMatcher::UNARY_OP,
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new(
        "star first item",
        TokenMatcher::OPEN_DELIM,
        Category(is_star_or_star_star),
        StyleFlag(space_inside_brackets),
    ),
    SpaceRule::new("before semicolon", Any, Exact(";"), NoSpace),
    SpaceRule::new(
        "parenthesised await",
        Exact("("),
        Exact("await"),
        StyleFlag(space_inside_brackets),
    ),
];
