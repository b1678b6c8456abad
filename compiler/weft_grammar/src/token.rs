//! Token kinds.
//!
//! Token kinds share the label space with grammar symbols: every kind is
//! numbered below 256 so a label can be classified by its number alone.

macro_rules! define_tokens {
    ($( $variant:ident = $name:literal $(, $op:literal)? ; )*) => {
        /// Kind of a lexical token.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum TokenKind {
            $( $variant, )*
        }

        impl TokenKind {
            /// Every token kind in numbering order.
            pub const ALL: &'static [TokenKind] = &[$( TokenKind::$variant, )*];

            /// Upper-case name used by the grammar text (`NAME`, `LPAR`, ...).
            pub fn name(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $name, )*
                }
            }

            /// Look up a kind by its grammar name.
            pub fn from_name(name: &str) -> Option<TokenKind> {
                match name {
                    $( $name => Some(TokenKind::$variant), )*
                    _ => None,
                }
            }

            /// Map operator text to its specific kind.
            pub fn from_op(op: &str) -> Option<TokenKind> {
                match op {
                    $( $( $op => Some(TokenKind::$variant), )? )*
                    _ => None,
                }
            }

            /// Source text of an operator kind.
            pub fn op_text(self) -> Option<&'static str> {
                match self {
                    $( $( TokenKind::$variant => Some($op), )? )*
                    _ => None,
                }
            }
        }
    };
}

define_tokens! {
    Endmarker = "ENDMARKER";
    Name = "NAME";
    Number = "NUMBER";
    String = "STRING";
    Newline = "NEWLINE";
    Indent = "INDENT";
    Dedent = "DEDENT";
    LPar = "LPAR", "(";
    RPar = "RPAR", ")";
    LSqb = "LSQB", "[";
    RSqb = "RSQB", "]";
    Colon = "COLON", ":";
    Comma = "COMMA", ",";
    Semi = "SEMI", ";";
    Plus = "PLUS", "+";
    Minus = "MINUS", "-";
    Star = "STAR", "*";
    Slash = "SLASH", "/";
    VBar = "VBAR", "|";
    Amper = "AMPER", "&";
    Less = "LESS", "<";
    Greater = "GREATER", ">";
    Equal = "EQUAL", "=";
    Dot = "DOT", ".";
    Percent = "PERCENT", "%";
    LBrace = "LBRACE", "{";
    RBrace = "RBRACE", "}";
    EqEqual = "EQEQUAL", "==";
    NotEqual = "NOTEQUAL", "!=";
    LessEqual = "LESSEQUAL", "<=";
    GreaterEqual = "GREATEREQUAL", ">=";
    Tilde = "TILDE", "~";
    Circumflex = "CIRCUMFLEX", "^";
    LeftShift = "LEFTSHIFT", "<<";
    RightShift = "RIGHTSHIFT", ">>";
    DoubleStar = "DOUBLESTAR", "**";
    PlusEqual = "PLUSEQUAL", "+=";
    MinEqual = "MINEQUAL", "-=";
    StarEqual = "STAREQUAL", "*=";
    SlashEqual = "SLASHEQUAL", "/=";
    PercentEqual = "PERCENTEQUAL", "%=";
    AmperEqual = "AMPEREQUAL", "&=";
    VBarEqual = "VBAREQUAL", "|=";
    CircumflexEqual = "CIRCUMFLEXEQUAL", "^=";
    LeftShiftEqual = "LEFTSHIFTEQUAL", "<<=";
    RightShiftEqual = "RIGHTSHIFTEQUAL", ">>=";
    DoubleStarEqual = "DOUBLESTAREQUAL", "**=";
    DoubleSlash = "DOUBLESLASH", "//";
    DoubleSlashEqual = "DOUBLESLASHEQUAL", "//=";
    At = "AT", "@";
    AtEqual = "ATEQUAL", "@=";
    RArrow = "RARROW", "->";
    ColonEqual = "COLONEQUAL", ":=";
    Ellipsis = "ELLIPSIS", "...";
    Op = "OP";
    Comment = "COMMENT";
    Nl = "NL";
    ErrorToken = "ERRORTOKEN";
}

impl TokenKind {
    /// Label number of this kind (always below 256).
    #[inline]
    pub fn number(self) -> u16 {
        self as u16
    }

    #[inline]
    pub fn is_opening_bracket(self) -> bool {
        matches!(self, TokenKind::LPar | TokenKind::LSqb | TokenKind::LBrace)
    }

    #[inline]
    pub fn is_closing_bracket(self) -> bool {
        matches!(self, TokenKind::RPar | TokenKind::RSqb | TokenKind::RBrace)
    }

    /// The closing bracket paired with an opening bracket.
    pub fn closing_pair(self) -> Option<TokenKind> {
        match self {
            TokenKind::LPar => Some(TokenKind::RPar),
            TokenKind::LSqb => Some(TokenKind::RSqb),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// Augmented assignment operators (`+=`, `<<=`, ...).
    pub fn is_augmented_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusEqual
                | TokenKind::MinEqual
                | TokenKind::StarEqual
                | TokenKind::SlashEqual
                | TokenKind::PercentEqual
                | TokenKind::AmperEqual
                | TokenKind::VBarEqual
                | TokenKind::CircumflexEqual
                | TokenKind::LeftShiftEqual
                | TokenKind::RightShiftEqual
                | TokenKind::DoubleStarEqual
                | TokenKind::DoubleSlashEqual
                | TokenKind::AtEqual
        )
    }

    /// Tokens that never reach the grammar: they are folded into prefixes.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Nl)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
