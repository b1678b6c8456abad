//! Parse driver: turns the token stream into engine input and runs the
//! engine to completion.
//!
//! Comments, NL tokens and whitespace never reach the grammar. Everything
//! between two significant tokens becomes the *prefix* of the second one,
//! so the tree reproduces the source byte for byte. INDENT tokens get an
//! empty value and leave their prefix to the first token of the block. A
//! DEDENT keeps the leading prefix lines that are still indented at the
//! closing block's column (comments trailing that block) and hands the rest
//! to the next token.

use tracing::debug;
use weft_grammar::{Grammar, TokenKind};
use weft_lexer::Token;

use crate::engine::{add_token, classify, Input, NodeStack, ParseStack, Step};
use crate::speculative::race;
use crate::tree::Tree;
use crate::{ParseError, ParseErrorKind};

/// Default number of significant tokens a soft-keyword race may examine.
pub const DEFAULT_LOOKAHEAD_BUDGET: usize = 1024;

/// Parser knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Tokens examined before a soft-keyword race is decided by declaration
    /// order.
    pub lookahead_budget: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            lookahead_budget: DEFAULT_LOOKAHEAD_BUDGET,
        }
    }
}

/// Width of leading whitespace (tabs to 8-column stops) and its byte length.
fn indent_width(line: &str) -> (usize, usize) {
    let mut width = 0;
    for (index, c) in line.char_indices() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / 8 + 1) * 8,
            _ => return (width, index),
        }
    }
    (width, line.len())
}

/// Length of the part of `prefix` that stays with a DEDENT closing a block
/// indented to `column`: whole lines up to the first non-blank line indented
/// less than `column`. Blank lines only go along when a consumed line
/// follows them.
fn dedent_prefix_len(prefix: &str, column: usize) -> usize {
    let mut consumed = 0;
    let mut blank = 0;
    for line in prefix.split_inclusive('\n') {
        if !line.ends_with('\n') {
            break;
        }
        let (width, text) = indent_width(line);
        if line[text..].trim().is_empty() {
            blank += line.len();
            continue;
        }
        if width < column {
            break;
        }
        consumed += blank + line.len();
        blank = 0;
    }
    consumed
}

/// Attach prefixes to the significant tokens of `tokens`.
pub fn build_inputs<'src>(src: &'src str, tokens: &[Token<'src>]) -> Vec<Input<'src>> {
    let mut inputs = Vec::with_capacity(tokens.len());
    let mut prefix_start = 0;
    let mut indent_columns = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Comment | TokenKind::Nl => {}
            TokenKind::Indent => {
                indent_columns.push(indent_width(token.text).0);
                inputs.push(Input {
                    kind: TokenKind::Indent,
                    value: "",
                    prefix: "",
                    start: token.start,
                });
            }
            TokenKind::Dedent => {
                let column = indent_columns.pop().unwrap_or(0);
                let pending = &src[prefix_start..token.start.offset.max(prefix_start)];
                let consumed = dedent_prefix_len(pending, column);
                inputs.push(Input {
                    kind: TokenKind::Dedent,
                    value: "",
                    prefix: &pending[..consumed],
                    start: token.start,
                });
                prefix_start += consumed;
            }
            kind => {
                inputs.push(Input {
                    kind,
                    value: token.text,
                    prefix: &src[prefix_start..token.start.offset],
                    start: token.start,
                });
                prefix_start = token.end.offset;
            }
        }
    }
    inputs
}

/// Runs the engine over prepared input.
pub struct Driver<'g> {
    grammar: &'g Grammar,
    config: ParserConfig,
}

impl<'g> Driver<'g> {
    pub fn new(grammar: &'g Grammar, config: ParserConfig) -> Self {
        Driver { grammar, config }
    }

    /// Parse a token stream read from `src`.
    pub fn parse_tokens<'src>(&self, src: &'src str, tokens: &[Token<'src>]) -> Result<Tree, ParseError> {
        let inputs = build_inputs(src, tokens);
        self.parse_inputs(&inputs)
    }

    fn parse_inputs(&self, inputs: &[Input<'_>]) -> Result<Tree, ParseError> {
        let grammar = self.grammar;
        let mut tree = Tree::new();
        let mut stack = NodeStack::new(&mut tree, grammar.start());
        let mut last_token = None;

        for (index, input) in inputs.iter().enumerate() {
            let fail = |kind: ParseErrorKind, stack: &NodeStack<'_>| error(kind, input, stack);
            let candidates = classify(grammar, input, last_token).map_err(|kind| fail(kind, &stack))?;
            let label = match candidates.as_slice() {
                [label] => *label,
                _ => {
                    let sketch = stack.sketch(last_token);
                    race(
                        grammar,
                        &sketch,
                        &candidates,
                        input,
                        &inputs[index + 1..],
                        self.config.lookahead_budget,
                    )
                    .map_err(|kind| fail(kind, &stack))?
                }
            };

            match add_token(grammar, &mut stack, label, input).map_err(|kind| fail(kind, &stack))? {
                Step::Continue => last_token = Some(input.kind),
                Step::Done => {
                    if let Some(extra) = inputs.get(index + 1) {
                        return Err(error(ParseErrorKind::TooMuchInput, extra, &stack));
                    }
                    debug!(nodes = tree.len(), "parsed");
                    return Ok(tree);
                }
            }
        }

        let (kind, value, line, column) = inputs.last().map_or((TokenKind::Endmarker, "", 1, 0), |input| {
            (input.kind, input.value, input.start.line, input.start.column)
        });
        Err(ParseError {
            kind: ParseErrorKind::IncompleteInput,
            token_kind: kind,
            token: value.to_owned(),
            line,
            column: column + 1,
            context: stack.context(),
        })
    }
}

fn error(kind: ParseErrorKind, input: &Input<'_>, stack: &NodeStack<'_>) -> ParseError {
    ParseError {
        kind,
        token_kind: input.kind,
        token: input.value.to_owned(),
        line: input.start.line,
        column: input.start.column + 1,
        context: stack.context(),
    }
}

#[cfg(test)]
mod tests;
