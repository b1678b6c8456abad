//! Format tokens.
//!
//! A [`FormatToken`] is one leaf of the tree plus everything the layout
//! engine needs to know about it. Tokens are owned by their
//! [`LogicalLine`](crate::line::LogicalLine) and refer to each other by index.

use weft_grammar::TokenKind;
use weft_parse::NodeId;

use crate::subtypes::Subtypes;

/// Python keywords. `match`, `case` and `_` are soft and only count in
/// statement position, which the unwrapper decides.
pub(crate) const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

#[derive(Clone, Debug)]
pub(crate) struct FormatToken {
    pub node: NodeId,
    pub kind: TokenKind,
    pub value: String,
    pub subtypes: Subtypes,
    /// Source line (1-based) and column (0-based) of the token's start.
    pub line: u32,
    pub column: u32,
    pub is_keyword: bool,
    /// A backslash continuation precedes the token in the source.
    pub after_continuation: bool,

    /// Penalty assigned to the leaf by the annotation passes.
    pub node_split_penalty: i32,
    /// Penalty of breaking before this token, pairwise rules included.
    pub split_penalty: i32,
    /// The ending-comma heuristic demands a break before this token.
    pub must_split: bool,

    pub spaces_required_before: usize,
    pub can_break_before: bool,
    pub must_break_before: bool,
    /// Width of the line up to and including this token, laid out flat.
    pub total_length: usize,

    /// For brackets: index of the partner bracket.
    pub matching_bracket: Option<usize>,
    /// Index of the innermost bracket enclosing this token.
    pub container_opening: Option<usize>,
    /// For opening brackets: indices of the first token of each element.
    pub container_elements: Vec<usize>,
}

impl FormatToken {
    pub fn new(node: NodeId, kind: TokenKind, value: impl Into<String>, line: u32, column: u32) -> Self {
        let value = value.into();
        let is_keyword = kind == TokenKind::Name && KEYWORDS.contains(&value.as_str());
        FormatToken {
            node,
            kind,
            value,
            subtypes: Subtypes::empty(),
            line,
            column,
            is_keyword,
            after_continuation: false,
            node_split_penalty: 0,
            split_penalty: 0,
            must_split: false,
            spaces_required_before: 0,
            can_break_before: false,
            must_break_before: false,
            total_length: 0,
            matching_bracket: None,
            container_opening: None,
            container_elements: Vec::new(),
        }
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::String
    }

    /// A non-keyword name.
    #[inline]
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name && !self.is_keyword
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    #[inline]
    pub fn opens_scope(&self) -> bool {
        self.kind.is_opening_bracket()
    }

    #[inline]
    pub fn closes_scope(&self) -> bool {
        self.kind.is_closing_bracket()
    }

    pub fn is_multiline_string(&self) -> bool {
        self.is_string() && self.value.contains('\n')
    }

    pub fn is_binary_op(&self) -> bool {
        self.subtypes.contains(Subtypes::BINARY_OPERATOR)
    }

    pub fn is_unary_op(&self) -> bool {
        self.subtypes.contains(Subtypes::UNARY_OPERATOR)
    }

    pub fn is_pylint_comment(&self) -> bool {
        self.is_comment() && self.value.contains("pylint:")
    }

    /// Is this `kw` as a keyword?
    #[inline]
    pub fn is_keyword_value(&self, kw: &str) -> bool {
        self.is_keyword && self.value == kw
    }

    /// Columns taken by the token laid out flat (its first line, for a
    /// multi-line string).
    pub fn width(&self) -> usize {
        self.value.split('\n').next().map_or(0, |first| first.chars().count())
    }

    /// Columns of the last line of a multi-line string.
    pub fn last_line_width(&self) -> usize {
        self.value.rsplit('\n').next().map_or(0, |last| last.chars().count())
    }

    /// Source line the token ends on.
    pub fn end_line(&self) -> u32 {
        self.line + self.value.matches('\n').count() as u32
    }
}
