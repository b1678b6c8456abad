//! Minimum-penalty layout search.
//!
//! Best-first walk over decision states: each state has at most two
//! successors (next token on the current line or on a new line) and every
//! edge cost is non-negative, so the first finished state popped from the
//! queue is optimal. Ties go to the state pushed first, which favors the
//! same-line edge and so breaks as late as possible.
//!
//! States are deduplicated by their observable layout. Once the queue has
//! seen `search_node_budget` states, the dedup key drops the bracket stack,
//! which bounds the walk at the cost of optimality.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::decision::{DecisionState, Placement, StateKey};
use crate::line::LogicalLine;
use crate::style::Style;

/// A search node: the state after a decision and how it was reached.
struct SearchNode {
    state: DecisionState,
    newline: bool,
    parent: Option<usize>,
}

/// Find the cheapest layout for `line` starting from `initial`.
///
/// Returns the placement of every token after the first, or `None` if no
/// layout satisfies the split constraints.
pub(crate) fn find_layout(line: &LogicalLine, style: &Style, initial: &DecisionState) -> Option<Vec<Placement>> {
    let mut arena: Vec<SearchNode> = vec![SearchNode {
        state: initial.clone(),
        newline: false,
        parent: None,
    }];
    let mut queue: BinaryHeap<Reverse<(i64, u64, usize)>> = BinaryHeap::new();
    let mut count: u64 = 0;
    queue.push(Reverse((0, count, 0)));
    count += 1;

    let mut seen: FxHashSet<StateKey> = FxHashSet::default();
    let mut seen_widened: FxHashSet<StateKey> = FxHashSet::default();
    let budget = style.search_node_budget as u64;

    let finished = loop {
        let Reverse((penalty, _, node)) = queue.pop()?;
        if arena[node].state.next().is_none() {
            break node;
        }

        let widened = count > budget;
        let state = &arena[node].state;
        let fresh = if widened {
            seen_widened.insert(state.key(true))
        } else {
            seen_widened.insert(state.key(true));
            seen.insert(state.key(false))
        };
        if !fresh {
            continue;
        }

        for newline in [false, true] {
            let mut state = arena[node].state.clone();
            let must_split = state.must_split(line, style);
            if newline && !state.can_split(line, style, must_split) {
                continue;
            }
            if !newline && must_split {
                continue;
            }
            let cost = state.add_token(line, style, newline, must_split);
            arena.push(SearchNode {
                state,
                newline,
                parent: Some(node),
            });
            queue.push(Reverse((penalty + cost, count, arena.len() - 1)));
            count += 1;
        }
    };

    tracing::trace!(explored = count, nodes = arena.len(), "layout search finished");

    let mut decisions = Vec::new();
    let mut cursor = finished;
    while let Some(parent) = arena[cursor].parent {
        decisions.push(arena[cursor].newline);
        cursor = parent;
    }
    decisions.reverse();
    Some(replay(line, style, initial, &decisions))
}

/// Apply a sequence of newline decisions and record where each token lands.
pub(crate) fn replay(line: &LogicalLine, style: &Style, initial: &DecisionState, decisions: &[bool]) -> Vec<Placement> {
    let mut state = initial.clone();
    let mut placements = Vec::with_capacity(decisions.len());
    for &newline in decisions {
        let must_split = state.must_split(line, style);
        state.add_token(line, style, newline, must_split);
        placements.push(state.last_placement());
    }
    placements
}
