//! Horizontal spacing between adjacent tokens.
//!
//! Spacing is decided by the ordered table in [`rules`]: the first rule
//! whose matchers accept the token pair decides; if none does, the tokens
//! are separated by one space.

mod matcher;
mod rules;

pub(crate) use matcher::TokenMatcher;
pub(crate) use rules::{SpaceRule, SPACE_RULES};

use crate::style::Style;
use crate::token::FormatToken;

/// What a rule asks for.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SpaceAction {
    Space,
    NoSpace,
    /// Space only if the style flag is set.
    StyleFlag(fn(&Style) -> bool),
}

impl SpaceAction {
    #[inline]
    pub(crate) fn resolve(self, style: &Style) -> bool {
        match self {
            SpaceAction::Space => true,
            SpaceAction::NoSpace => false,
            SpaceAction::StyleFlag(flag) => flag(style),
        }
    }
}

/// Two adjacent tokens of a logical line.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TokenPair<'a> {
    pub left: &'a FormatToken,
    pub right: &'a FormatToken,
}

/// The first rule matching the pair, if any.
pub(crate) fn find_rule(pair: &TokenPair<'_>) -> Option<&'static SpaceRule> {
    SPACE_RULES.iter().find(|rule| rule.matches(pair))
}

/// Whether one space separates `left` and `right` when they share a line.
pub(crate) fn space_required_between(left: &FormatToken, right: &FormatToken, style: &Style) -> bool {
    let pair = TokenPair { left, right };
    find_rule(&pair).map_or(true, |rule| rule.action.resolve(style))
}
