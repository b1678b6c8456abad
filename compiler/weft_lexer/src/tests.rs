use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn lex(src: &str) -> Vec<Token<'_>> {
    match tokenize(src) {
        Ok(tokens) => tokens,
        Err(err) => panic!("tokenizing {src:?} failed: {err}"),
    }
}

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).iter().map(|token| token.kind).collect()
}

fn lex_err(src: &str) -> LexError {
    match tokenize(src) {
        Ok(tokens) => panic!("expected an error, got {tokens:?}"),
        Err(err) => err,
    }
}

use TokenKind::{
    Colon, Comma, Comment, Dedent, Endmarker, Equal, Indent, LPar, Name, Newline, Nl, Number,
    Plus, RPar,
};

#[test]
fn simple_statement() {
    assert_eq!(kinds("x = 1\n"), vec![Name, Equal, Number, Newline, Endmarker]);
}

#[test]
fn indentation_tokens() {
    assert_eq!(
        kinds("if x:\n    y\n"),
        vec![Name, Name, Colon, Newline, Indent, Name, Newline, Dedent, Endmarker]
    );
}

#[test]
fn indent_token_carries_whitespace() {
    let tokens = lex("if x:\n\ty\n");
    let indent = tokens.iter().find(|token| token.kind == Indent);
    assert_eq!(indent.map(|token| token.text), Some("\t"));
}

#[test]
fn brackets_suppress_newlines() {
    assert_eq!(
        kinds("f(a,\n  b)\n"),
        vec![Name, LPar, Name, Comma, Nl, Name, RPar, Newline, Endmarker]
    );
}

#[test]
fn comments_and_blank_lines() {
    assert_eq!(
        kinds("# c\nx  # t\n\n"),
        vec![Comment, Nl, Name, Comment, Newline, Nl, Endmarker]
    );
}

#[test]
fn comment_lines_do_not_dedent() {
    assert_eq!(
        kinds("if x:\n    y\n# outer\n    z\n"),
        vec![
            Name, Name, Colon, Newline, Indent, Name, Newline, Comment, Nl, Name, Newline,
            Dedent, Endmarker
        ]
    );
}

#[test]
fn triple_quoted_string_spans_lines() {
    let tokens = lex("s = '''a\nb'''\n");
    let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![Name, Equal, TokenKind::String, Newline, Endmarker]);
    assert_eq!(tokens[2].text, "'''a\nb'''");
    assert_eq!(tokens[2].start.line, 1);
    assert_eq!(tokens[2].end.line, 2);
    assert_eq!(tokens[2].line, "s = '''a\nb'''\n");
}

#[test]
fn string_prefixes() {
    let tokens = lex("rb'x' f\"y{z}\" Br'''w'''\n");
    let strings: Vec<_> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::String)
        .map(|token| token.text)
        .collect();
    assert_eq!(strings, vec!["rb'x'", "f\"y{z}\"", "Br'''w'''"]);
}

#[test]
fn escaped_quotes_stay_inside_strings() {
    let tokens = lex("'a\\'b' \"c\\\\\"\n");
    assert_eq!(tokens[0].text, "'a\\'b'");
    assert_eq!(tokens[1].text, "\"c\\\\\"");
}

#[test]
fn non_ascii_inside_strings() {
    let tokens = lex("s = \"naïve é\" + '├──' + \"\\\\é\" + \"\\é\"\n");
    let strings: Vec<_> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::String)
        .map(|token| token.text)
        .collect();
    assert_eq!(strings, vec!["\"naïve é\"", "'├──'", "\"\\\\é\"", "\"\\é\""]);
    assert_eq!(tokens[4].start.column, 16);
}

#[test]
fn non_ascii_inside_triple_quoted_string() {
    let tokens = lex("x = '''ü\n\\ß'''\n");
    assert_eq!(tokens[2].text, "'''ü\n\\ß'''");
    assert_eq!(tokens[3].kind, Newline);
}

#[test]
fn missing_final_newline() {
    let tokens = lex("x");
    let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(kinds, vec![Name, Newline, Endmarker]);
    assert_eq!(tokens[1].text, "");
}

#[test]
fn empty_source() {
    assert_eq!(kinds(""), vec![Endmarker]);
}

#[test]
fn backslash_continuation() {
    assert_eq!(
        kinds("x = 1 + \\\n    2\n"),
        vec![Name, Equal, Number, Plus, Number, Newline, Endmarker]
    );
}

#[test]
fn numbers() {
    let tokens = lex("0x_ff 1.5e-3 10j .5 1_000\n");
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|token| token.kind == Number)
        .map(|token| token.text)
        .collect();
    assert_eq!(numbers, vec!["0x_ff", "1.5e-3", "10j", ".5", "1_000"]);
}

#[test]
fn longest_operator_wins() {
    use TokenKind::{ColonEqual, DoubleSlashEqual, DoubleStar, Ellipsis, RArrow};
    assert_eq!(
        kinds("a //= b ** c -> d := e ...\n"),
        vec![
            Name, DoubleSlashEqual, Name, DoubleStar, Name, RArrow, Name, ColonEqual, Name,
            Ellipsis, Newline, Endmarker
        ]
    );
}

#[test]
fn positions_are_character_columns() {
    let tokens = lex("é  cd\n");
    assert_eq!(tokens[1].start.column, 3);
    assert_eq!(tokens[1].start.offset, 4);
    assert_eq!(tokens[1].start.line, 1);
}

#[test]
fn error_unterminated_string() {
    let err = lex_err("'abc\n");
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!((err.line, err.column), (1, 1));
}

#[test]
fn error_unterminated_triple_string() {
    assert_eq!(lex_err("x = '''abc\n").kind, LexErrorKind::UnterminatedString);
}

#[test]
fn error_open_bracket_at_eof() {
    let err = lex_err("(\n");
    assert_eq!(err.kind, LexErrorKind::UnexpectedEof);
    assert_eq!(err.line, 2);
}

#[test]
fn error_inconsistent_dedent() {
    let err = lex_err("if x:\n    a\n  b\n");
    assert_eq!(err.kind, LexErrorKind::InconsistentDedent);
    assert_eq!((err.line, err.column), (3, 3));
}

#[test]
fn error_unmatched_and_stray() {
    assert_eq!(lex_err(")\n").kind, LexErrorKind::UnmatchedBracket(')'));
    assert_eq!(lex_err("a $ b\n").kind, LexErrorKind::StrayCharacter('$'));
    assert_eq!(lex_err("a $ b\n").to_string(), "1:3: invalid character '$'");
}

#[test]
fn tokenizer_is_restartable() {
    let mut tokenizer = Tokenizer::new("a\nb\n");
    let first = tokenizer.next();
    let fork = tokenizer.clone();
    let rest: Vec<_> = tokenizer.collect();
    let forked: Vec<_> = fork.collect();
    assert!(matches!(first, Some(Ok(Token { kind: Name, .. }))));
    assert_eq!(rest, forked);
}

#[test]
fn newline_normalization() {
    assert!(matches!(normalize_newlines("a\nb\n"), Cow::Borrowed(_)));
    assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
}

proptest! {
    #[test]
    fn token_text_matches_source_span(
        src in "([a-zé]{1,5}( [=+] ([a-z0-9]{1,5}|\"([a-zé├─ ]|\\\\[é\\\\]){0,4}\"))?\n){0,8}"
    ) {
        let tokens = tokenize(&src);
        prop_assert!(tokens.is_ok());
        let tokens = tokens.unwrap_or_default();
        let mut last = 0;
        for token in &tokens {
            prop_assert_eq!(token.text, &src[token.start.offset..token.end.offset]);
            prop_assert!(token.start.offset >= last);
            last = token.end.offset;
        }
    }
}
