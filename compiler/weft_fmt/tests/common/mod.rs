//! Helpers shared by the integration tests.

use weft_lexer::{tokenize, TokenKind};

/// Tokens that carry meaning: no comments, blank lines, or block
/// structure, which formatting may legitimately reshape.
pub fn semantic_tokens(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .filter(|token| {
            token.is_significant()
                && !matches!(
                    token.kind,
                    TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Endmarker
                )
        })
        .map(|token| (token.kind, token.text.to_owned()))
        .collect()
}
