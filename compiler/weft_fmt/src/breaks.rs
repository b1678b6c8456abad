//! Pairwise line-break rules.
//!
//! These look at two adjacent tokens and decide whether a break between
//! them is forbidden, required, or how much it costs on top of the
//! penalty the annotation passes gave the right token.

use crate::annotate::split_penalty::{STRONGLY_CONNECTED, UNBREAKABLE};
use crate::style::Style;
use crate::subtypes::Subtypes;
use crate::token::FormatToken;

const LOGICAL_OPERATORS: &[&str] = &["and", "or"];
const BITWISE_OPERATORS: &[&str] = &["&", "|", "^"];

/// Extra cost of breaking between `prev` and `cur`, added to the penalty
/// the annotation passes gave `cur`.
pub(crate) fn split_penalty(prev: &FormatToken, cur: &FormatToken, style: &Style) -> i32 {
    let (pval, cval) = (prev.value.as_str(), cur.value.as_str());
    if prev.is_keyword_value("not") {
        return UNBREAKABLE;
    }

    let (before_logical, after_logical) = (
        LOGICAL_OPERATORS.contains(&cval),
        LOGICAL_OPERATORS.contains(&pval),
    );
    if style.split_before_logical_operator {
        if after_logical {
            return style.split_penalty_logical_operator;
        }
        if before_logical {
            return 0;
        }
    } else {
        if after_logical {
            return 0;
        }
        if before_logical {
            return style.split_penalty_logical_operator;
        }
    }

    let (before_bitwise, after_bitwise) = (
        BITWISE_OPERATORS.contains(&cval),
        BITWISE_OPERATORS.contains(&pval),
    );
    if style.split_before_bitwise_operator {
        if after_bitwise {
            return style.split_penalty_bitwise_operator;
        }
        if before_bitwise {
            return 0;
        }
    } else {
        if after_bitwise {
            return 0;
        }
        if before_bitwise {
            return style.split_penalty_bitwise_operator;
        }
    }

    if cur.subtypes.intersects(Subtypes::COMP_FOR | Subtypes::COMP_IF) {
        return 0;
    }
    if prev.is_unary_op() {
        return style.split_penalty_after_unary_operator;
    }
    if pval == "," {
        return 0;
    }
    if pval == "**" || cval == "**" {
        return STRONGLY_CONNECTED;
    }
    if prev
        .subtypes
        .intersects(Subtypes::VARARGS_STAR | Subtypes::KWARGS_STAR_STAR)
    {
        return UNBREAKABLE;
    }
    if prev.opens_scope() && cval != "(" {
        return style.split_penalty_after_opening_bracket;
    }
    if cval == ":" || cval == "=" {
        return UNBREAKABLE;
    }
    if prev.subtypes.contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN)
        || cur.subtypes.contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN)
    {
        return UNBREAKABLE;
    }
    if cval == "==" {
        return STRONGLY_CONNECTED;
    }
    if cur.closes_scope() {
        return 100;
    }
    0
}

/// Whether the line must break before `cur`.
pub(crate) fn must_break_before(prev: &FormatToken, cur: &FormatToken) -> bool {
    if prev.is_comment() {
        return true;
    }
    // Adjacent string literals inside brackets go one per line.
    if cur.is_string() && prev.is_string() && cur.container_opening.is_some() {
        return true;
    }
    cur.must_split
}

/// Whether the line may break before `cur` at all.
pub(crate) fn can_break_before(prev: &FormatToken, cur: &FormatToken, style: &Style) -> bool {
    let (pval, cval) = (prev.value.as_str(), cur.value.as_str());
    if prev.is_keyword_value("yield") && cval == "from" {
        return false;
    }
    if matches!(pval, "async" | "await") && matches!(cval, "def" | "with" | "for") {
        return false;
    }
    if cur.split_penalty >= UNBREAKABLE {
        return false;
    }
    if pval == "@" {
        return false;
    }
    if cval == ":" || cval == "," {
        return false;
    }
    if prev.is_name() && (cval == "(" || cval == "[") {
        return false;
    }
    // A trailing comment stays on its line.
    if cur.is_comment() && prev.end_line() == cur.line {
        return false;
    }
    if prev.is_unary_op() {
        return false;
    }
    if !style.allow_split_before_default_or_named_assigns
        && (cur.subtypes.contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN)
            || prev.subtypes.contains(Subtypes::DEFAULT_OR_NAMED_ASSIGN))
    {
        return false;
    }
    true
}
