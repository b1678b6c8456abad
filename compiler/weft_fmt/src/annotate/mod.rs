//! Tree annotation passes.
//!
//! Before the tree is flattened into logical lines, a handful of passes
//! attach formatting facts to its leaves:
//!
//! 1. [`comments::splice_comments`] turns comments held in prefixes into
//!    COMMENT leaves placed where they belong.
//! 2. [`subtypes::assign`] records the formatting role of each token.
//! 3. [`split_penalty::assign`] prices a line break before each token.
//! 4. [`ending_comma::assign`] forces one element per line in lists that
//!    end with a comma.
//!
//! Results live in [`Annotations`], side tables indexed by [`NodeId`].

use weft_parse::{NodeId, Tree};

use crate::style::Style;
use crate::subtypes::Subtypes;

mod comments;
mod ending_comma;
pub(crate) mod split_penalty;
mod subtypes;

/// Per-node formatting facts. Only leaf entries are ever read.
#[derive(Clone, Debug)]
pub(crate) struct Annotations {
    subtypes: Vec<Subtypes>,
    split_penalty: Vec<i32>,
    must_split: Vec<bool>,
}

impl Annotations {
    fn new(len: usize) -> Self {
        Annotations {
            subtypes: vec![Subtypes::empty(); len],
            split_penalty: vec![0; len],
            must_split: vec![false; len],
        }
    }

    #[inline]
    pub(crate) fn subtypes(&self, id: NodeId) -> Subtypes {
        self.subtypes.get(id.index()).copied().unwrap_or_default()
    }

    pub(crate) fn add_subtype(&mut self, id: NodeId, subtype: Subtypes) {
        if let Some(slot) = self.subtypes.get_mut(id.index()) {
            *slot |= subtype;
        }
    }

    #[inline]
    pub(crate) fn split_penalty(&self, id: NodeId) -> i32 {
        self.split_penalty.get(id.index()).copied().unwrap_or(0)
    }

    pub(crate) fn set_split_penalty(&mut self, id: NodeId, penalty: i32) {
        if let Some(slot) = self.split_penalty.get_mut(id.index()) {
            *slot = penalty;
        }
    }

    #[inline]
    pub(crate) fn must_split(&self, id: NodeId) -> bool {
        self.must_split.get(id.index()).copied().unwrap_or(false)
    }

    pub(crate) fn set_must_split(&mut self, id: NodeId) {
        if let Some(slot) = self.must_split.get_mut(id.index()) {
            *slot = true;
        }
    }
}

/// Run every annotation pass over a freshly parsed tree.
///
/// Comment splicing adds nodes, so the side tables are sized afterwards.
pub(crate) fn annotate(tree: &mut Tree, style: &Style) -> Annotations {
    comments::splice_comments(tree);
    let mut annotations = Annotations::new(tree.len());
    subtypes::assign(tree, &mut annotations);
    split_penalty::assign(tree, &mut annotations, style);
    ending_comma::assign(tree, &mut annotations, style);
    annotations
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests can panic")]
mod tests;
