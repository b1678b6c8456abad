//! Grammar symbols (non-terminals).
//!
//! Each rule of `grammar.txt` has exactly one `Symbol`. Symbol numbers start
//! at 256 in declaration order so they never collide with token numbers.

macro_rules! define_symbols {
    ($( $variant:ident = $name:literal, )*) => {
        /// A grammar non-terminal.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Symbol {
            $( $variant, )*
        }

        impl Symbol {
            /// Every symbol in numbering order.
            pub const ALL: &'static [Symbol] = &[$( Symbol::$variant, )*];

            /// Rule name as written in the grammar text.
            pub fn name(self) -> &'static str {
                match self {
                    $( Symbol::$variant => $name, )*
                }
            }

            /// Look up a symbol by rule name.
            pub fn from_name(name: &str) -> Option<Symbol> {
                match name {
                    $( $name => Some(Symbol::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_symbols! {
    FileInput = "file_input",
    Decorator = "decorator",
    Decorators = "decorators",
    Decorated = "decorated",
    AsyncFuncdef = "async_funcdef",
    Funcdef = "funcdef",
    Parameters = "parameters",
    Typedargslist = "typedargslist",
    Tname = "tname",
    Varargslist = "varargslist",
    Stmt = "stmt",
    SimpleStmt = "simple_stmt",
    SmallStmt = "small_stmt",
    ExprStmt = "expr_stmt",
    Annassign = "annassign",
    TestlistStarExpr = "testlist_star_expr",
    Augassign = "augassign",
    DelStmt = "del_stmt",
    PassStmt = "pass_stmt",
    FlowStmt = "flow_stmt",
    BreakStmt = "break_stmt",
    ContinueStmt = "continue_stmt",
    ReturnStmt = "return_stmt",
    YieldStmt = "yield_stmt",
    RaiseStmt = "raise_stmt",
    ImportStmt = "import_stmt",
    ImportName = "import_name",
    ImportFrom = "import_from",
    ImportAsName = "import_as_name",
    DottedAsName = "dotted_as_name",
    ImportAsNames = "import_as_names",
    DottedAsNames = "dotted_as_names",
    DottedName = "dotted_name",
    GlobalStmt = "global_stmt",
    NonlocalStmt = "nonlocal_stmt",
    AssertStmt = "assert_stmt",
    CompoundStmt = "compound_stmt",
    AsyncStmt = "async_stmt",
    IfStmt = "if_stmt",
    WhileStmt = "while_stmt",
    ForStmt = "for_stmt",
    TryStmt = "try_stmt",
    WithStmt = "with_stmt",
    AsexprTest = "asexpr_test",
    ExceptClause = "except_clause",
    Suite = "suite",
    MatchStmt = "match_stmt",
    SubjectExpr = "subject_expr",
    CaseBlock = "case_block",
    Guard = "guard",
    Patterns = "patterns",
    Pattern = "pattern",
    NamedexprTest = "namedexpr_test",
    Test = "test",
    Lambdef = "lambdef",
    OrTest = "or_test",
    AndTest = "and_test",
    NotTest = "not_test",
    Comparison = "comparison",
    CompOp = "comp_op",
    StarExpr = "star_expr",
    Expr = "expr",
    XorExpr = "xor_expr",
    AndExpr = "and_expr",
    ShiftExpr = "shift_expr",
    ArithExpr = "arith_expr",
    Term = "term",
    Factor = "factor",
    Power = "power",
    Atom = "atom",
    Listmaker = "listmaker",
    TestlistGexp = "testlist_gexp",
    Trailer = "trailer",
    Subscriptlist = "subscriptlist",
    Subscript = "subscript",
    Sliceop = "sliceop",
    Exprlist = "exprlist",
    Testlist = "testlist",
    Dictsetmaker = "dictsetmaker",
    Classdef = "classdef",
    Arglist = "arglist",
    Argument = "argument",
    CompIter = "comp_iter",
    CompFor = "comp_for",
    CompIf = "comp_if",
    YieldExpr = "yield_expr",
    YieldArg = "yield_arg",
}

/// First symbol number; everything below is a token kind.
pub const FIRST_SYMBOL_NUMBER: u16 = 256;

impl Symbol {
    /// Number of this symbol in the shared label space (>= 256).
    #[inline]
    pub fn number(self) -> u16 {
        FIRST_SYMBOL_NUMBER + self as u16
    }

    /// Dense index for side tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_number(number: u16) -> Option<Symbol> {
        let index = number.checked_sub(FIRST_SYMBOL_NUMBER)?;
        Symbol::ALL.get(usize::from(index)).copied()
    }

    /// Statement-level compound constructs that own a suite.
    pub fn is_compound_statement(self) -> bool {
        matches!(
            self,
            Symbol::IfStmt
                | Symbol::WhileStmt
                | Symbol::ForStmt
                | Symbol::TryStmt
                | Symbol::WithStmt
                | Symbol::Funcdef
                | Symbol::Classdef
                | Symbol::MatchStmt
                | Symbol::CaseBlock
                | Symbol::AsyncStmt
                | Symbol::AsyncFuncdef
                | Symbol::Decorated
        )
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
