use pretty_assertions::assert_eq;

use super::*;

fn inputs(src: &str) -> Vec<Input<'_>> {
    match weft_lexer::tokenize(src) {
        Ok(tokens) => build_inputs(src, &tokens),
        Err(err) => panic!("tokenizing failed: {err}"),
    }
}

#[test]
fn dedent_keeps_indented_comment_lines() {
    assert_eq!(dedent_prefix_len("    # a\n\n    # b\n  x", 4), 17);
    assert_eq!(dedent_prefix_len("\n# c\n", 4), 0);
    assert_eq!(dedent_prefix_len("        # deeper\n    ", 4), 17);
    assert_eq!(dedent_prefix_len("\t# tab\n", 8), 7);
}

#[test]
fn comments_fold_into_prefixes() {
    let inputs = inputs("# head\nx = 1  # tail\n");
    assert_eq!(inputs[0].prefix, "# head\n");
    assert_eq!(inputs[0].value, "x");
    // The trailing comment belongs to NEWLINE.
    let newline = inputs.iter().find(|input| input.kind == TokenKind::Newline);
    assert_eq!(newline.map(|input| input.prefix), Some("  # tail"));
}

#[test]
fn indent_hands_prefix_to_block() {
    let inputs = inputs("if x:\n    # first\n    y\n");
    let indent = inputs.iter().position(|input| input.kind == TokenKind::Indent);
    let Some(indent) = indent else {
        panic!("no INDENT");
    };
    assert_eq!(inputs[indent].prefix, "");
    assert_eq!(inputs[indent].value, "");
    assert_eq!(inputs[indent + 1].prefix, "    # first\n    ");
    assert_eq!(inputs[indent + 1].value, "y");
}

#[test]
fn dedent_splits_trailing_comments() {
    let inputs = inputs("if x:\n    a\n    # inner\n# outer\nb\n");
    let dedent = inputs.iter().position(|input| input.kind == TokenKind::Dedent);
    let Some(dedent) = dedent else {
        panic!("no DEDENT");
    };
    assert_eq!(inputs[dedent].prefix, "    # inner\n");
    assert_eq!(inputs[dedent + 1].prefix, "# outer\n");
    assert_eq!(inputs[dedent + 1].value, "b");
}

#[test]
fn prefixes_and_values_cover_the_source() {
    let src = "def f(a,\n      b):  # c\n    return a \\\n        + b\n\n\n# end\n";
    let rebuilt: String = inputs(src)
        .iter()
        .flat_map(|input| [input.prefix, input.value])
        .collect();
    assert_eq!(rebuilt, src);
}

#[test]
fn incomplete_input_is_reported() {
    let grammar = match Grammar::python() {
        Ok(grammar) => grammar,
        Err(err) => panic!("{err}"),
    };
    let src = "x = 1\n";
    let tokens = weft_lexer::tokenize(src).unwrap_or_default();
    // Drop ENDMARKER so the start symbol never completes.
    let truncated = &tokens[..tokens.len() - 1];
    let err = Driver::new(grammar, ParserConfig::default()).parse_tokens(src, truncated);
    assert_eq!(err.err().map(|err| err.kind), Some(ParseErrorKind::IncompleteInput));
}
