//! Formatting roles of individual tokens.
//!
//! Subtypes never affect meaning. They let the pairwise rules and the
//! decision engine tell apart tokens that look alike, such as the `*` of a
//! multiplication and the `*` of `*args`, or the `:` of a slice and the `:`
//! of a dictionary entry.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Subtypes: u32 {
        const UNARY_OPERATOR = 1 << 0;
        const BINARY_OPERATOR = 1 << 1;
        const SUBSCRIPT_COLON = 1 << 2;
        const SUBSCRIPT_BRACKET = 1 << 3;
        /// `=` of a keyword argument or parameter default.
        const DEFAULT_OR_NAMED_ASSIGN = 1 << 4;
        /// Any token of an argument list containing a keyword argument.
        const DEFAULT_OR_NAMED_ASSIGN_ARG_LIST = 1 << 5;
        const VARARGS_LIST = 1 << 6;
        const VARARGS_STAR = 1 << 7;
        const KWARGS_STAR_STAR = 1 << 8;
        const ASSIGN_OPERATOR = 1 << 9;
        /// First token of a dictionary key.
        const DICTIONARY_KEY = 1 << 10;
        /// Any token of a dictionary key.
        const DICTIONARY_KEY_PART = 1 << 11;
        /// First token of a dictionary value.
        const DICTIONARY_VALUE = 1 << 12;
        /// The `for` of a dict or set comprehension.
        const DICT_SET_GENERATOR = 1 << 13;
        const COMP_EXPR = 1 << 14;
        const COMP_FOR = 1 << 15;
        const COMP_IF = 1 << 16;
        const FUNC_DEF = 1 << 17;
        const DECORATOR = 1 << 18;
        /// A parameter annotation (`x: int`), including its default's `=`.
        const TYPED_NAME = 1 << 19;
        const TYPED_NAME_ARG_LIST = 1 << 20;
        const PARAMETER_START = 1 << 21;
        const PARAMETER_STOP = 1 << 22;
        const LAMBDEF = 1 << 23;
    }
}
