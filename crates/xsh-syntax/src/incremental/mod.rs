//! Incremental re-parsing.
//!
//! An edit is applied in two steps. [`Tree::edit`] first classifies the old
//! module-level children and checkpoints against the edit without touching
//! any text. Then the cheapest tier that is provably equivalent to a full
//! parse builds the new tree:
//!
//! 1. **Relex**: the edit stays inside one identifier, number, string,
//!    subprocess word or comment, and relexing its statement yields the same
//!    token kinds and the same scanner state at the next checkpoint. The new
//!    token is swapped in by path copy.
//! 2. **Statements**: parsing resumes at the last checkpoint before the edit
//!    and stops at the first old statement boundary past the edit whose
//!    recorded scanner state equals the live one. Everything outside the
//!    region is shared with the old root.
//!
//! When neither applies the source is parsed from scratch. A checkpoint that
//! fails to decode is skipped with a warning, never trusted.

mod edit;
mod relex;
mod reparse;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rowan::{GreenNode, GreenNodeData, GreenToken, GreenTokenData, NodeOrToken, TextRange, TextSize};
use tracing::debug;

use crate::diagnostics::DiagnosticMessage;
use crate::session::ParseSession;
use crate::tree::{Checkpoint, Tree};
use crate::{InputEdit, Result};

pub use edit::{ChildStatus, EditedChild, EditedTree};
pub(crate) use reparse::Resync;

pub(crate) fn apply_edit(
    session: &ParseSession,
    tree: &Tree,
    edit: &InputEdit,
    new_source: &str,
) -> Result<Tree> {
    session.check_cancelled()?;
    let edited = tree.edit(edit)?;
    edited.check_new_source(new_source)?;
    let source: Arc<str> = Arc::from(new_source);

    if !session.is_incremental() {
        return session.parse_full(source);
    }

    let _span = tracing::debug_span!(
        "apply_edit",
        start = edit.start_byte,
        old_end = edit.old_end_byte,
        new_end = edit.new_end_byte
    )
    .entered();

    if let Some(tree) = relex::relex(&edited, &source) {
        return Ok(tree);
    }
    if let Some(tree) = reparse::reparse(session, &edited, &source)? {
        return Ok(tree);
    }
    debug!("no usable checkpoint before the edit");
    session.parse_full(source)
}

type GreenChild<'a> = NodeOrToken<&'a GreenNodeData, &'a GreenTokenData>;

/// Children of a green node with their ranges relative to its start.
pub(crate) fn green_children(
    node: &GreenNodeData,
) -> impl Iterator<Item = (TextRange, GreenChild<'_>)> {
    node.children().scan(TextSize::from(0), |offset, child| {
        let len = match child {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        };
        let range = TextRange::at(*offset, len);
        *offset = range.end();
        Some((range, child))
    })
}

pub(crate) fn owned_child(child: GreenChild<'_>) -> NodeOrToken<GreenNode, GreenToken> {
    match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

/// A message from before the edit, with suppression that ran to the old end
/// of input now running to the new one.
pub(crate) fn carry_before(
    message: &DiagnosticMessage,
    old_eof: TextSize,
    new_eof: TextSize,
) -> DiagnosticMessage {
    let mut message = message.clone();
    let suppression = message.suppression_range;
    if suppression.end() == old_eof && suppression.start() <= new_eof {
        message.suppression_range = TextRange::new(suppression.start(), new_eof);
    }
    message
}

/// Old checkpoints at or after `from`, moved by `delta`.
pub(crate) fn shift_checkpoints(
    checkpoints: &[Checkpoint],
    from: TextSize,
    delta: i64,
) -> impl Iterator<Item = Checkpoint> {
    checkpoints
        .iter()
        .filter(move |c| c.offset >= from)
        .map(move |c| c.shifted(delta))
}
