//! Grammar generator.
//!
//! Rule text is read by a tiny meta-lexer, each rule is turned into an NFA
//! by recursive descent, subset construction yields a DFA, equivalent DFA
//! states are merged and finally first sets are computed. Overlapping first
//! sets at a rule's start state make the rule ambiguous for a one-token
//! lookahead parser and are rejected.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::tables::{Dfa, DfaState, Label, LabelId, LabelTarget};
use crate::{Grammar, GrammarError, Symbol, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq)]
enum MetaToken {
    Name(String),
    Literal { text: String, soft: bool },
    Op(char),
    Newline,
    End,
}

fn syntax(line: u32, message: impl Into<String>) -> GrammarError {
    GrammarError::Syntax {
        line,
        message: message.into(),
    }
}

/// Split grammar text into meta tokens. A newline outside brackets ends a
/// rule; blank and comment-only lines produce nothing.
fn tokenize(text: &str) -> Result<Vec<(MetaToken, u32)>, GrammarError> {
    let mut tokens = Vec::new();
    let mut depth = 0u32;
    let mut line = 0u32;

    for raw in text.lines() {
        line += 1;
        let mut chars = raw.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            match c {
                '#' => break,
                c if c.is_whitespace() => {}
                '(' | '[' => {
                    depth += 1;
                    tokens.push((MetaToken::Op(c), line));
                }
                ')' | ']' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| syntax(line, format!("unbalanced '{c}'")))?;
                    tokens.push((MetaToken::Op(c), line));
                }
                ':' | '|' | '*' | '+' => tokens.push((MetaToken::Op(c), line)),
                '\'' | '"' => {
                    let end = chars
                        .by_ref()
                        .find(|&(_, ch)| ch == c)
                        .map(|(end, _)| end)
                        .ok_or_else(|| syntax(line, "unterminated literal"))?;
                    tokens.push((
                        MetaToken::Literal {
                            text: raw[start + 1..end].to_owned(),
                            soft: c == '"',
                        },
                        line,
                    ));
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let mut end = raw.len();
                    while let Some(&(index, ch)) = chars.peek() {
                        if ch.is_ascii_alphanumeric() || ch == '_' {
                            chars.next();
                        } else {
                            end = index;
                            break;
                        }
                    }
                    tokens.push((MetaToken::Name(raw[start..end].to_owned()), line));
                }
                other => return Err(syntax(line, format!("unexpected character {other:?}"))),
            }
        }
        let open_rule = tokens
            .last()
            .is_some_and(|(token, _)| *token != MetaToken::Newline);
        if depth == 0 && open_rule {
            tokens.push((MetaToken::Newline, line));
        }
    }

    if depth != 0 {
        return Err(syntax(line, "unclosed bracket at end of grammar"));
    }
    tokens.push((MetaToken::End, line));
    Ok(tokens)
}

/// Interns labels while rules are read.
#[derive(Default)]
struct LabelBuilder {
    labels: Vec<Label>,
    symbols: FxHashMap<Symbol, LabelId>,
    tokens: FxHashMap<TokenKind, LabelId>,
    keywords: FxHashMap<String, LabelId>,
    soft_keywords: FxHashMap<String, LabelId>,
}

impl LabelBuilder {
    fn new() -> Self {
        LabelBuilder {
            labels: vec![Label::EMPTY],
            ..LabelBuilder::default()
        }
    }

    fn push(&mut self, label: Label) -> LabelId {
        let id = LabelId(self.labels.len() as u16);
        self.labels.push(label);
        id
    }

    fn symbol(&mut self, symbol: Symbol) -> LabelId {
        if let Some(&id) = self.symbols.get(&symbol) {
            return id;
        }
        let id = self.push(Label {
            target: LabelTarget::Symbol(symbol),
            keyword: None,
        });
        self.symbols.insert(symbol, id);
        id
    }

    fn token(&mut self, kind: TokenKind) -> LabelId {
        if let Some(&id) = self.tokens.get(&kind) {
            return id;
        }
        let id = self.push(Label {
            target: LabelTarget::Token(kind),
            keyword: None,
        });
        self.tokens.insert(kind, id);
        id
    }

    fn keyword(&mut self, text: &str, soft: bool) -> LabelId {
        let table = if soft {
            &self.soft_keywords
        } else {
            &self.keywords
        };
        if let Some(&id) = table.get(text) {
            return id;
        }
        let id = self.push(Label {
            target: LabelTarget::Token(TokenKind::Name),
            keyword: Some(text.into()),
        });
        if soft {
            self.soft_keywords.insert(text.to_owned(), id);
        } else {
            self.keywords.insert(text.to_owned(), id);
        }
        id
    }

    fn intern(&mut self, token: &MetaToken, line: u32) -> Result<LabelId, GrammarError> {
        match token {
            MetaToken::Name(name) => {
                if let Some(symbol) = Symbol::from_name(name) {
                    Ok(self.symbol(symbol))
                } else if let Some(kind) = TokenKind::from_name(name) {
                    Ok(self.token(kind))
                } else {
                    Err(GrammarError::UnknownName {
                        line,
                        name: name.clone(),
                    })
                }
            }
            MetaToken::Literal { text, soft } => {
                if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
                    Ok(self.keyword(text, *soft))
                } else if let Some(kind) = TokenKind::from_op(text) {
                    Ok(self.token(kind))
                } else {
                    Err(GrammarError::UnknownOperator {
                        line,
                        op: text.clone(),
                    })
                }
            }
            other => Err(syntax(line, format!("expected a name or literal, found {other:?}"))),
        }
    }
}

/// NFA of one rule. Arcs without a label are epsilon moves.
#[derive(Default)]
struct Nfa {
    arcs: Vec<Vec<(Option<LabelId>, usize)>>,
}

impl Nfa {
    fn new_state(&mut self) -> usize {
        self.arcs.push(Vec::new());
        self.arcs.len() - 1
    }

    fn add_arc(&mut self, from: usize, label: Option<LabelId>, to: usize) {
        self.arcs[from].push((label, to));
    }

    fn closure(&self, state: usize, set: &mut BTreeSet<usize>) {
        if !set.insert(state) {
            return;
        }
        for &(label, next) in &self.arcs[state] {
            if label.is_none() {
                self.closure(next, set);
            }
        }
    }
}

/// Recursive-descent reader of rule right-hand sides.
struct RuleReader<'t, 'l> {
    tokens: &'t [(MetaToken, u32)],
    pos: usize,
    labels: &'l mut LabelBuilder,
}

impl RuleReader<'_, '_> {
    fn peek(&self) -> &MetaToken {
        self.tokens
            .get(self.pos)
            .map_or(&MetaToken::End, |(token, _)| token)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |&(_, line)| line)
    }

    fn bump(&mut self) -> MetaToken {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn expect_op(&mut self, op: char) -> Result<(), GrammarError> {
        let line = self.line();
        match self.bump() {
            MetaToken::Op(c) if c == op => Ok(()),
            other => Err(syntax(line, format!("expected '{op}', found {other:?}"))),
        }
    }

    /// `rhs: alt ('|' alt)*`
    fn rhs(&mut self, nfa: &mut Nfa) -> Result<(usize, usize), GrammarError> {
        let (a, z) = self.alt(nfa)?;
        if *self.peek() != MetaToken::Op('|') {
            return Ok((a, z));
        }
        let start = nfa.new_state();
        let finish = nfa.new_state();
        nfa.add_arc(start, None, a);
        nfa.add_arc(z, None, finish);
        while *self.peek() == MetaToken::Op('|') {
            self.bump();
            let (a, z) = self.alt(nfa)?;
            nfa.add_arc(start, None, a);
            nfa.add_arc(z, None, finish);
        }
        Ok((start, finish))
    }

    /// `alt: item+`
    fn alt(&mut self, nfa: &mut Nfa) -> Result<(usize, usize), GrammarError> {
        let (a, mut b) = self.item(nfa)?;
        while matches!(
            self.peek(),
            MetaToken::Op('(' | '[') | MetaToken::Name(_) | MetaToken::Literal { .. }
        ) {
            let (c, d) = self.item(nfa)?;
            nfa.add_arc(b, None, c);
            b = d;
        }
        Ok((a, b))
    }

    /// `item: '[' rhs ']' | atom ['+' | '*']`
    fn item(&mut self, nfa: &mut Nfa) -> Result<(usize, usize), GrammarError> {
        if *self.peek() == MetaToken::Op('[') {
            self.bump();
            let (a, z) = self.rhs(nfa)?;
            self.expect_op(']')?;
            nfa.add_arc(a, None, z);
            return Ok((a, z));
        }
        let (a, z) = self.atom(nfa)?;
        match self.peek() {
            MetaToken::Op('+') => {
                self.bump();
                nfa.add_arc(z, None, a);
                Ok((a, z))
            }
            MetaToken::Op('*') => {
                self.bump();
                nfa.add_arc(z, None, a);
                Ok((a, a))
            }
            _ => Ok((a, z)),
        }
    }

    /// `atom: '(' rhs ')' | NAME | STRING`
    fn atom(&mut self, nfa: &mut Nfa) -> Result<(usize, usize), GrammarError> {
        if *self.peek() == MetaToken::Op('(') {
            self.bump();
            let pair = self.rhs(nfa)?;
            self.expect_op(')')?;
            return Ok(pair);
        }
        let line = self.line();
        let token = self.bump();
        let label = self.labels.intern(&token, line)?;
        let a = nfa.new_state();
        let z = nfa.new_state();
        nfa.add_arc(a, Some(label), z);
        Ok((a, z))
    }
}

/// DFA state under construction.
struct BuildState {
    nfaset: BTreeSet<usize>,
    is_final: bool,
    arcs: BTreeMap<LabelId, usize>,
}

fn make_dfa(nfa: &Nfa, start: usize, finish: usize) -> Vec<BuildState> {
    let mut initial = BTreeSet::new();
    nfa.closure(start, &mut initial);
    let mut states = vec![BuildState {
        is_final: initial.contains(&finish),
        nfaset: initial,
        arcs: BTreeMap::new(),
    }];

    // `states` grows while it is walked.
    let mut index = 0;
    while index < states.len() {
        let mut arcs: BTreeMap<LabelId, BTreeSet<usize>> = BTreeMap::new();
        for &nfa_state in &states[index].nfaset {
            for &(label, next) in &nfa.arcs[nfa_state] {
                if let Some(label) = label {
                    nfa.closure(next, arcs.entry(label).or_default());
                }
            }
        }
        for (label, nfaset) in arcs {
            let target = match states.iter().position(|state| state.nfaset == nfaset) {
                Some(existing) => existing,
                None => {
                    states.push(BuildState {
                        is_final: nfaset.contains(&finish),
                        nfaset,
                        arcs: BTreeMap::new(),
                    });
                    states.len() - 1
                }
            };
            states[index].arcs.insert(label, target);
        }
        index += 1;
    }
    states
}

/// Merge states with identical finality and arcs until nothing changes.
fn simplify_dfa(states: &mut Vec<BuildState>) {
    loop {
        let Some((keep, duplicate)) = find_equivalent(states) else {
            return;
        };
        states.remove(duplicate);
        for state in states.iter_mut() {
            for target in state.arcs.values_mut() {
                if *target == duplicate {
                    *target = keep;
                } else if *target > duplicate {
                    *target -= 1;
                }
            }
        }
    }
}

fn find_equivalent(states: &[BuildState]) -> Option<(usize, usize)> {
    for (i, left) in states.iter().enumerate() {
        for (j, right) in states.iter().enumerate().skip(i + 1) {
            if left.is_final == right.is_final && left.arcs == right.arcs {
                return Some((i, j));
            }
        }
    }
    None
}

struct FirstSets<'a> {
    dfas: &'a RuleDfas,
    labels: &'a [Label],
    // `None` marks a rule whose first set is being computed.
    done: FxHashMap<Symbol, Option<FxHashSet<LabelId>>>,
}

impl FirstSets<'_> {
    fn compute(&mut self, symbol: Symbol) -> Result<FxHashSet<LabelId>, GrammarError> {
        match self.done.get(&symbol) {
            Some(Some(first)) => return Ok(first.clone()),
            Some(None) => return Err(GrammarError::LeftRecursion(symbol.name().to_owned())),
            None => {}
        }
        self.done.insert(symbol, None);

        let dfa = self
            .dfas
            .get(&symbol)
            .ok_or_else(|| GrammarError::MissingRule(symbol.name().to_owned()))?;
        let arcs: Vec<LabelId> = dfa
            .first()
            .map(|state| state.arcs.keys().copied().collect())
            .unwrap_or_default();

        let mut total = FxHashSet::default();
        let mut owner: FxHashMap<LabelId, LabelId> = FxHashMap::default();
        for arc in arcs {
            let contributed = match self.labels[arc.index()].target {
                LabelTarget::Symbol(inner) => self.compute(inner)?,
                _ => std::iter::once(arc).collect(),
            };
            for label in contributed {
                if let Some(previous) = owner.insert(label, arc) {
                    if previous != arc {
                        return Err(GrammarError::Ambiguous {
                            rule: symbol.name().to_owned(),
                            label: self.labels[label.index()].describe(),
                            first: self.labels[previous.index()].describe(),
                            second: self.labels[arc.index()].describe(),
                        });
                    }
                }
                total.insert(label);
            }
        }

        self.done.insert(symbol, Some(total.clone()));
        Ok(total)
    }
}

type RuleDfas = FxHashMap<Symbol, Vec<BuildState>>;

/// Read every rule into a simplified DFA, interning labels on the way.
fn read_rules(text: &str) -> Result<(RuleDfas, LabelBuilder), GrammarError> {
    let tokens = tokenize(text)?;
    let mut labels = LabelBuilder::new();
    let mut dfas: RuleDfas = FxHashMap::default();

    let mut reader = RuleReader {
        tokens: &tokens,
        pos: 0,
        labels: &mut labels,
    };
    loop {
        let line = reader.line();
        match reader.bump() {
            MetaToken::End => break,
            MetaToken::Newline => continue,
            MetaToken::Name(name) => {
                let symbol = Symbol::from_name(&name)
                    .ok_or_else(|| GrammarError::UnknownName { line, name: name.clone() })?;
                reader.expect_op(':')?;
                let mut nfa = Nfa::default();
                let (a, z) = reader.rhs(&mut nfa)?;
                let line = reader.line();
                match reader.bump() {
                    MetaToken::Newline | MetaToken::End => {}
                    other => return Err(syntax(line, format!("unexpected {other:?} in rule `{name}`"))),
                }
                let mut dfa = make_dfa(&nfa, a, z);
                simplify_dfa(&mut dfa);
                if dfas.insert(symbol, dfa).is_some() {
                    return Err(GrammarError::DuplicateRule(name));
                }
            }
            other => return Err(syntax(line, format!("expected a rule name, found {other:?}"))),
        }
    }
    Ok((dfas, labels))
}

/// Build a grammar from rule text.
pub(crate) fn generate(text: &str, start: Symbol) -> Result<Grammar, GrammarError> {
    let (dfas, labels) = read_rules(text)?;
    let mut first_sets = FirstSets {
        dfas: &dfas,
        labels: &labels.labels,
        done: FxHashMap::default(),
    };
    let mut tables = Vec::with_capacity(Symbol::ALL.len());
    for &symbol in Symbol::ALL {
        let first = first_sets.compute(symbol)?;
        let states = dfas
            .get(&symbol)
            .ok_or_else(|| GrammarError::MissingRule(symbol.name().to_owned()))?
            .iter()
            .map(|state| DfaState {
                arcs: state.arcs.iter().map(|(&label, &next)| (label, next)).collect(),
                is_final: state.is_final,
            })
            .collect();
        tables.push(Dfa { states, first });
    }

    let LabelBuilder {
        labels,
        tokens,
        keywords,
        soft_keywords,
        ..
    } = labels;

    Ok(Grammar {
        start,
        dfas: tables,
        labels,
        tokens,
        keywords,
        soft_keywords,
    })
}

#[cfg(test)]
mod tests;
