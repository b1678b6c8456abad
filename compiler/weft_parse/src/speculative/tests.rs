use pretty_assertions::assert_eq;
use weft_grammar::{Symbol, TokenKind};

use super::*;
use crate::build_inputs;
use crate::engine::NodeStack;
use crate::tree::Tree;

fn grammar() -> &'static Grammar {
    match Grammar::python() {
        Ok(grammar) => grammar,
        Err(err) => panic!("{err}"),
    }
}

/// Race the first token of `src` from the start of a file.
fn resolve(src: &'static str, budget: usize) -> Result<LabelId, ParseErrorKind> {
    let grammar = grammar();
    let tokens = weft_lexer::tokenize(src).unwrap_or_default();
    let inputs = build_inputs(src, &tokens);
    let mut tree = Tree::new();
    let stack = NodeStack::new(&mut tree, Symbol::FileInput);
    let candidates = classify(grammar, &inputs[0], None)?;
    assert_eq!(candidates.len(), 2, "{src:?} should start ambiguously");
    race(grammar, &stack.sketch(None), &candidates, &inputs[0], &inputs[1..], budget)
}

fn name_label() -> Option<LabelId> {
    grammar().token_label(TokenKind::Name)
}

fn match_label() -> Option<LabelId> {
    grammar().soft_keyword_label("match")
}

#[test]
fn call_named_match_resolves_to_name() {
    assert_eq!(resolve("match(x)\n", 1024).ok(), name_label());
}

#[test]
fn match_statement_resolves_to_keyword() {
    let src = "match(x):\n    case 1:\n        pass\n";
    assert_eq!(resolve(src, 1024).ok(), match_label());
}

#[test]
fn subject_name_decides_quickly() {
    assert_eq!(resolve("match x:\n    case 1:\n        pass\n", 1).ok(), match_label());
}

#[test]
fn exhausted_budget_picks_first_candidate() {
    // `(x` is valid for both readings; with two tokens of lookahead the
    // race is forced before the `:` decides it.
    let src = "match(x):\n    case 1:\n        pass\n";
    assert_eq!(resolve(src, 2).ok(), name_label());
}

#[test]
fn race_fails_when_every_reading_dies() {
    assert_eq!(resolve("match else\n", 1024), Err(ParseErrorKind::BadInput));
}

#[test]
fn soft_keywords_are_plain_names_mid_statement() {
    let grammar = grammar();
    let tokens = weft_lexer::tokenize("x = match\n").unwrap_or_default();
    let inputs = build_inputs("x = match\n", &tokens);
    let candidates = classify(grammar, &inputs[2], Some(TokenKind::Equal));
    assert_eq!(candidates.map(|labels| labels.len()), Ok(1));
}
