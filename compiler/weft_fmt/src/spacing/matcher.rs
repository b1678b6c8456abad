//! Token matchers for spacing rules.

use crate::token::FormatToken;

/// Matches one side of a token pair.
///
/// - `Any` matches every token
/// - `Exact(",")` matches a token by its text
/// - `OneOf(&["(", "["])` matches any of several texts
/// - `Category(pred)` matches by a predicate over the token
#[derive(Clone, Copy, Debug)]
pub(crate) enum TokenMatcher {
    Any,
    Exact(&'static str),
    OneOf(&'static [&'static str]),
    Category(fn(&FormatToken) -> bool),
}

impl TokenMatcher {
    pub const OPEN_DELIM: TokenMatcher = TokenMatcher::Category(FormatToken::opens_scope);
    pub const CLOSE_DELIM: TokenMatcher = TokenMatcher::Category(FormatToken::closes_scope);
    pub const KEYWORD: TokenMatcher = TokenMatcher::Category(is_keyword);
    pub const UNARY_OP: TokenMatcher = TokenMatcher::Category(FormatToken::is_unary_op);
    pub const BINARY_OP: TokenMatcher = TokenMatcher::Category(FormatToken::is_binary_op);

    #[inline]
    pub fn matches(&self, token: &FormatToken) -> bool {
        match self {
            TokenMatcher::Any => true,
            TokenMatcher::Exact(text) => token.value == *text,
            TokenMatcher::OneOf(texts) => texts.contains(&token.value.as_str()),
            TokenMatcher::Category(predicate) => predicate(token),
        }
    }
}

fn is_keyword(token: &FormatToken) -> bool {
    token.is_keyword
}
