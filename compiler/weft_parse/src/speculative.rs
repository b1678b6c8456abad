//! Soft-keyword disambiguation by bounded speculative parsing.
//!
//! When a token classifies to several labels, each candidate gets its own
//! [`Sketch`] of the parser stack and the upcoming tokens are fed to every
//! sketch in lockstep. A sketch dies on its first parse error. The race ends
//! as soon as one candidate is left, or, when the lookahead budget or the
//! token stream runs out, with the first surviving candidate in
//! classification order. Only the winner is then replayed on the real,
//! node-building stack, so no tree node is ever built speculatively.

use smallvec::SmallVec;
use tracing::trace;
use weft_grammar::{Grammar, LabelId};

use crate::engine::{add_token, classify, Input, Sketch, Step};
use crate::ParseErrorKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Alive,
    Finished,
    Dead,
}

struct Branch {
    label: LabelId,
    sketch: Sketch,
    status: Status,
}

impl Branch {
    fn feed(&mut self, grammar: &Grammar, label: LabelId, input: &Input<'_>) {
        self.status = match add_token(grammar, &mut self.sketch, label, input) {
            Ok(Step::Continue) => Status::Alive,
            Ok(Step::Done) => Status::Finished,
            Err(_) => Status::Dead,
        };
    }

    /// Feed a lookahead token, classifying it in this branch's context. A
    /// token that is itself ambiguous takes the first candidate this branch
    /// accepts.
    fn feed_next(&mut self, grammar: &Grammar, input: &Input<'_>) {
        let Ok(candidates) = classify(grammar, input, self.sketch.last_token) else {
            self.status = Status::Dead;
            return;
        };
        if let [label] = candidates.as_slice() {
            self.feed(grammar, *label, input);
            return;
        }
        for &label in &candidates {
            let mut trial = self.sketch.clone();
            if let Ok(step) = add_token(grammar, &mut trial, label, input) {
                self.sketch = trial;
                self.status = match step {
                    Step::Continue => Status::Alive,
                    Step::Done => Status::Finished,
                };
                return;
            }
        }
        self.status = Status::Dead;
    }

    fn is_alive(&self) -> bool {
        self.status != Status::Dead
    }
}

/// Pick the candidate label for `input` among `candidates`.
///
/// `base` is a sketch of the real stack before `input`; `lookahead` holds the
/// significant tokens after it. At most `budget` of them are examined.
pub(crate) fn race(
    grammar: &Grammar,
    base: &Sketch,
    candidates: &[LabelId],
    input: &Input<'_>,
    lookahead: &[Input<'_>],
    budget: usize,
) -> Result<LabelId, ParseErrorKind> {
    let mut branches: SmallVec<[Branch; 2]> = candidates
        .iter()
        .map(|&label| Branch {
            label,
            sketch: base.clone(),
            status: Status::Alive,
        })
        .collect();
    for branch in &mut branches {
        let label = branch.label;
        branch.feed(grammar, label, input);
    }

    let mut examined = 0;
    loop {
        let mut alive = branches.iter().filter(|branch| branch.is_alive());
        let Some(first) = alive.next() else {
            return Err(ParseErrorKind::BadInput);
        };
        let contested = alive.next().is_some();
        let exhausted = examined >= budget || examined >= lookahead.len();
        if !contested || exhausted {
            trace!(
                token = input.value,
                examined,
                forced = contested,
                "soft keyword resolved"
            );
            return Ok(first.label);
        }

        let next = &lookahead[examined];
        examined += 1;
        for branch in branches
            .iter_mut()
            .filter(|branch| branch.status == Status::Alive)
        {
            branch.feed_next(grammar, next);
        }
    }
}

#[cfg(test)]
mod tests;
