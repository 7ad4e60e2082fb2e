//! Finished syntax trees.
//!
//! A [`Tree`] owns the green tree, the source it was built from, the
//! statement checkpoints that make re-parsing resumable, and the
//! diagnostics. Green nodes are shared with any tree derived from this one
//! by an edit, so keeping old trees around is cheap.

mod node;
mod printer;

#[cfg(test)]
mod node_tests;

use std::sync::Arc;

use rowan::{GreenNode, TextSize};
use xsh_core::{LineIndex, Point};

use crate::cst::SyntaxNode;
use crate::diagnostics::Diagnostics;
use crate::scanner::{ScannerState, StateError};

pub use node::Node;
pub use printer::TreePrinter;

/// Scanner state at the start of a module-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub offset: TextSize,
    /// [`ScannerState::encode`] output.
    pub state: Box<[u8]>,
}

impl Checkpoint {
    pub fn decode_state(&self) -> Result<ScannerState, StateError> {
        ScannerState::decode(&self.state)
    }

    pub(crate) fn shifted(&self, delta: i64) -> Self {
        let moved = (u32::from(self.offset) as i64 + delta).max(0);
        Self {
            offset: TextSize::from(moved as u32),
            state: self.state.clone(),
        }
    }
}

/// How a tree was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Parsed from scratch.
    #[default]
    Full,
    /// One token replaced in place.
    Relex,
    /// A run of statements re-derived, the rest shared.
    Statements,
}

/// What an incremental parse managed to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReuseStats {
    pub strategy: Strategy,
    /// Module-level children taken over from the previous tree.
    pub reused_children: usize,
    /// Bytes of source scanned again.
    pub reparsed_bytes: u32,
}

#[derive(Debug, Clone)]
pub struct Tree {
    green: GreenNode,
    source: Arc<str>,
    checkpoints: Vec<Checkpoint>,
    diagnostics: Diagnostics,
    stats: ReuseStats,
}

impl Tree {
    pub(crate) fn new(
        green: GreenNode,
        source: Arc<str>,
        checkpoints: Vec<Checkpoint>,
        mut diagnostics: Diagnostics,
        stats: ReuseStats,
    ) -> Self {
        diagnostics.sort();
        Self {
            green,
            source,
            checkpoints,
            diagnostics,
            stats,
        }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Red tree over the green root. Cheap; build one per thread.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn root_node(&self) -> Node {
        Node::from(self.syntax())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    #[cfg(test)]
    pub(crate) fn shared_source(&self) -> &Arc<str> {
        &self.source
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub fn reuse_stats(&self) -> ReuseStats {
        self.stats
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.source)
    }

    pub fn point(&self, offset: u32) -> Point {
        self.line_index().point(offset)
    }

    pub fn printer(&self) -> TreePrinter<'_> {
        TreePrinter::new(self)
    }

    /// CST without trivia, one element per line.
    pub fn dump(&self) -> String {
        self.printer().dump()
    }
}
