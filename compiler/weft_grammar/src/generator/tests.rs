use pretty_assertions::assert_eq;

use super::*;

fn rules(text: &str) -> (RuleDfas, LabelBuilder) {
    match read_rules(text) {
        Ok(pair) => pair,
        Err(err) => panic!("grammar failed to load: {err}"),
    }
}

#[test]
fn tokenize_joins_bracketed_lines() {
    let tokens = tokenize("atom: ('(' NAME\n      ')')\n# comment\n").unwrap_or_default();
    let newlines = tokens
        .iter()
        .filter(|(token, _)| *token == MetaToken::Newline)
        .count();
    assert_eq!(newlines, 1);
    assert_eq!(tokens.last().map(|(token, _)| token.clone()), Some(MetaToken::End));
}

#[test]
fn tokenize_marks_soft_literals() {
    let tokens = tokenize("case_block: \"case\" 'if'\n").unwrap_or_default();
    assert!(tokens.contains(&(
        MetaToken::Literal {
            text: "case".to_owned(),
            soft: true
        },
        1
    )));
    assert!(tokens.contains(&(
        MetaToken::Literal {
            text: "if".to_owned(),
            soft: false
        },
        1
    )));
}

#[test]
fn tokenize_rejects_unbalanced_brackets() {
    assert!(matches!(
        tokenize("stmt: (NAME\n"),
        Err(GrammarError::Syntax { .. })
    ));
    assert!(matches!(
        tokenize("stmt: NAME)\n"),
        Err(GrammarError::Syntax { line: 1, .. })
    ));
}

#[test]
fn repetition_produces_a_looping_state() {
    let (dfas, labels) = rules("dotted_name: NAME ('.' NAME)*\n");
    let dfa = &dfas[&Symbol::DottedName];
    let name = labels.tokens[&TokenKind::Name];
    let dot = labels.tokens[&TokenKind::Dot];

    assert_eq!(dfa.len(), 3);
    assert!(!dfa[0].is_final);
    let after_name = dfa[0].arcs[&name];
    assert!(dfa[after_name].is_final);
    let after_dot = dfa[after_name].arcs[&dot];
    assert_eq!(dfa[after_dot].arcs[&name], after_name);
}

#[test]
fn equivalent_states_are_merged() {
    // Both alternatives end in the same accepting state after simplification.
    let (dfas, _) = rules("pass_stmt: 'pass' | 'break'\n");
    let dfa = &dfas[&Symbol::PassStmt];
    assert_eq!(dfa.len(), 2);
    assert!(dfa[1].is_final);
    assert!(dfa[1].arcs.is_empty());
}

#[test]
fn keywords_and_soft_keywords_get_separate_labels() {
    let (_, labels) = rules("guard: 'if' \"match\" NAME\n");
    let keyword = labels.keywords["if"];
    let soft = labels.soft_keywords["match"];
    let name = labels.tokens[&TokenKind::Name];
    assert_ne!(keyword, soft);
    assert_ne!(soft, name);
    assert_eq!(labels.labels[soft.index()].target, LabelTarget::Token(TokenKind::Name));
    assert_eq!(labels.labels[soft.index()].describe(), "'match'");
}

#[test]
fn unknown_names_are_rejected() {
    assert!(matches!(
        read_rules("stmt: nonsense\n"),
        Err(GrammarError::UnknownName { line: 1, .. })
    ));
    assert!(matches!(
        read_rules("stmt: '$'\n"),
        Err(GrammarError::UnknownOperator { .. })
    ));
}

#[test]
fn duplicate_rules_are_rejected() {
    assert_eq!(
        read_rules("stmt: NAME\nstmt: NUMBER\n").err(),
        Some(GrammarError::DuplicateRule("stmt".to_owned()))
    );
}

#[test]
fn overlapping_first_sets_are_ambiguous() {
    let (dfas, labels) = rules("stmt: expr | NAME\nexpr: NAME\n");
    let mut first = FirstSets {
        dfas: &dfas,
        labels: &labels.labels,
        done: FxHashMap::default(),
    };
    assert!(matches!(
        first.compute(Symbol::Stmt),
        Err(GrammarError::Ambiguous { .. })
    ));
}

#[test]
fn left_recursion_is_detected() {
    let (dfas, labels) = rules("expr: expr '+' NAME | NAME\n");
    let mut first = FirstSets {
        dfas: &dfas,
        labels: &labels.labels,
        done: FxHashMap::default(),
    };
    assert_eq!(
        first.compute(Symbol::Expr).err(),
        Some(GrammarError::LeftRecursion("expr".to_owned()))
    );
}

#[test]
fn first_sets_follow_nested_rules() {
    let (dfas, labels) = rules("stmt: expr | 'pass'\nexpr: NAME | NUMBER\n");
    let mut first = FirstSets {
        dfas: &dfas,
        labels: &labels.labels,
        done: FxHashMap::default(),
    };
    let set = first.compute(Symbol::Stmt).unwrap_or_default();
    assert_eq!(set.len(), 3);
    assert!(set.contains(&labels.keywords["pass"]));
    assert!(set.contains(&labels.tokens[&TokenKind::Number]));
}

#[test]
fn missing_rules_fail_generation() {
    assert_eq!(
        generate("file_input: ENDMARKER\n", Symbol::FileInput).err(),
        Some(GrammarError::MissingRule("decorator".to_owned()))
    );
}
