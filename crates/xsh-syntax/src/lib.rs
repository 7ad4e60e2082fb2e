//! xsh-syntax: incremental, error-tolerant parser for xonsh-style source.
//!
//! Python statements and shell commands live side by side in the same file.
//! The parser always produces a tree; problems are reported as diagnostics
//! and as `Error`/`Missing` nodes inside it.
//!
//! # Example
//!
//! ```
//! use xsh_syntax::{InputEdit, apply_edit, parse};
//!
//! let source = "x = $(ls)\n";
//! let tree = parse(source).expect("default limits");
//! assert!(!tree.has_errors());
//!
//! let (edit, new_source) = InputEdit::replace(source, 6..8, "lsa");
//! let edited = apply_edit(&tree, &edit, &new_source).expect("valid edit");
//! assert_eq!(edited.source(), "x = $(lsa)\n");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cancel;
pub mod cst;
pub mod diagnostics;
pub mod grammar;
pub mod incremental;
pub mod parser;
pub mod persist;
pub mod scanner;
pub mod tree;

mod session;

#[cfg(test)]
mod persist_tests;

pub use cancel::CancellationFlag;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use incremental::EditedTree;
pub use scanner::StateError;
pub use session::{DEFAULT_RECURSION_FUEL, ParseSession};
pub use tree::{Node, Tree};
pub use xsh_core::{InputEdit, LineIndex, Point};

/// Errors that abort a parse or an edit.
///
/// Syntax problems are never reported here; they end up in the tree's
/// [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The session's cancellation flag was raised.
    #[error("parse cancelled")]
    Cancelled,

    /// Execution fuel exhausted (too many tokens consumed). Only with an
    /// explicit [`ParseSession::exec_fuel`] budget.
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    #[error("snapshot format {format} / grammar {grammar} is not supported")]
    SnapshotVersion { format: u16, grammar: u16 },

    #[error("snapshot was taken from a different source text")]
    SnapshotSourceMismatch,

    #[error("malformed snapshot: {0}")]
    Snapshot(String),

    #[error("corrupt scanner state: {0}")]
    CorruptScannerState(#[from] StateError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses `source` with the default [`ParseSession`].
pub fn parse(source: &str) -> Result<Tree> {
    ParseSession::new().parse(source)
}

/// Derives the tree for `new_source` from `tree` and the edit that turned
/// the old source into it.
pub fn apply_edit(tree: &Tree, edit: &InputEdit, new_source: &str) -> Result<Tree> {
    ParseSession::new().apply_edit(tree, edit, new_source)
}
