//! Statement reuse: re-derive a run of module-level statements, share the
//! rest of the old root.

use std::sync::Arc;

use rowan::{GreenNode, TextSize};
use tracing::{debug, trace, warn};

use super::edit::{EditedTree, shift_offset};
use super::{carry_before, green_children, owned_child, shift_checkpoints};
use crate::Result;
use crate::cst::SyntaxKind;
use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::parser::{ParseOutput, Parser};
use crate::session::ParseSession;
use crate::tree::{Checkpoint, ReuseStats, Strategy, Tree};

/// Old statement boundaries the re-derived region may stop at.
#[derive(Debug)]
pub(crate) struct Resync {
    /// End of the replacement text; no stop before it.
    edit_end: TextSize,
    /// Boundaries after the edit, new-source offsets, ascending.
    boundaries: Vec<Checkpoint>,
}

impl Resync {
    /// Boundaries whose old offset carries a non-lexical diagnostic are
    /// left out: such a message may belong to the statement before.
    fn new(edited: &EditedTree<'_>) -> Self {
        let delta = edited.delta();
        let diagnostics = edited.tree().diagnostics();
        let boundaries = edited
            .shifted_checkpoints()
            .into_iter()
            .filter(|boundary| {
                let old = shift_offset(boundary.offset, -delta);
                !diagnostics
                    .iter()
                    .any(|d| d.range().start() == old && !d.kind().is_lexical_error())
            })
            .collect();
        Self {
            edit_end: TextSize::from(edited.input_edit().new_end_byte),
            boundaries,
        }
    }

    fn boundary_at(&self, offset: TextSize) -> Option<&Checkpoint> {
        self.boundaries
            .binary_search_by_key(&offset, |b| b.offset)
            .ok()
            .map(|found| &self.boundaries[found])
    }
}

impl Parser<'_> {
    /// Offset of the current statement when the region may end before it:
    /// past the edit, on an old boundary, in the scanner state recorded
    /// there, and with nothing reported at or after it yet.
    pub(crate) fn resync_point(&mut self, resync: &Resync) -> Option<TextSize> {
        let offset = self.current_span().start();
        if offset < resync.edit_end {
            return None;
        }
        let boundary = resync.boundary_at(offset)?;
        let live = self.snapshot_at(self.pos)?;
        match boundary.decode_state() {
            Ok(state) if state == *live => {}
            Ok(_) => {
                trace!(offset = u32::from(offset), "scanner state differs at old boundary");
                return None;
            }
            Err(err) => {
                warn!(offset = u32::from(offset), %err, "skipping corrupt checkpoint");
                return None;
            }
        }
        let reported_here = self
            .diagnostics
            .iter()
            .any(|d| d.range().start() >= offset && !d.kind().is_lexical_error());
        (!reported_here).then_some(offset)
    }
}

/// Re-derives the statements around the edit. `Ok(None)` when no usable
/// checkpoint precedes the edit.
pub(crate) fn reparse(
    session: &ParseSession,
    edited: &EditedTree<'_>,
    source: &Arc<str>,
) -> Result<Option<Tree>> {
    let resync = Resync::new(edited);
    for checkpoint in edited.resume_candidates() {
        let state = match checkpoint.decode_state() {
            Ok(state) => state,
            Err(err) => {
                warn!(
                    offset = u32::from(checkpoint.offset),
                    %err,
                    "corrupt checkpoint, trying an earlier one"
                );
                continue;
            }
        };
        session.check_cancelled()?;
        let mut parser = session.configure(Parser::resume(source, checkpoint.offset, state));
        parser.start_node(SyntaxKind::Module);
        let stop = parser.parse_module_items(Some(&resync));
        parser.eat_trivia();
        parser.finish_node();
        let region = parser.finish()?;

        match splice(edited, source, checkpoint.offset, stop, region) {
            Some(tree) => return Ok(Some(tree)),
            None => warn!(
                offset = u32::from(checkpoint.offset),
                "region does not line up with the old tree, trying an earlier checkpoint"
            ),
        }
    }
    Ok(None)
}

/// Old children before `start`, the region's children, old children from
/// the stop point on.
fn splice(
    edited: &EditedTree<'_>,
    source: &Arc<str>,
    start: TextSize,
    stop: Option<TextSize>,
    region: ParseOutput,
) -> Option<Tree> {
    let old = edited.tree();
    let delta = edited.delta();
    let old_stop = stop.map(|p| shift_offset(p, -delta));

    let mut prefix = Vec::new();
    let mut suffix = Vec::new();
    let mut suffix_start = None;
    for (range, child) in green_children(old.green()) {
        if range.start() < start {
            if range.end() > start {
                return None;
            }
            prefix.push(owned_child(child));
        } else if let Some(old_stop) = old_stop
            && range.start() >= old_stop
        {
            suffix_start.get_or_insert(range.start());
            suffix.push(owned_child(child));
        }
    }
    if let Some(old_stop) = old_stop
        && suffix_start != Some(old_stop)
    {
        return None;
    }

    let reused_children = prefix.len() + suffix.len();
    let children: Vec<_> = prefix
        .into_iter()
        .chain(region.green.children().map(owned_child))
        .chain(suffix)
        .collect();
    let green = GreenNode::new(SyntaxKind::Module.into(), children);
    if u32::from(green.text_len()) as usize != source.len() {
        return None;
    }

    let new_eof = TextSize::from(source.len() as u32);
    let old_eof = TextSize::from(old.source().len() as u32);
    let mut diagnostics = Diagnostics::new();
    for d in old.diagnostics().iter().filter(|d| d.range().start() < start) {
        diagnostics.push(carry_before(d, old_eof, new_eof));
    }
    let region_end = stop.unwrap_or(new_eof);
    for d in region.diagnostics.iter() {
        if stop.is_none_or(|p| d.range().start() < p) {
            diagnostics.push(d.clone());
        }
    }
    if let Some(old_stop) = old_stop {
        let after = old.diagnostics().iter().filter(|d| d.range().start() >= old_stop);
        for d in after {
            diagnostics.push(DiagnosticMessage::shifted(d, delta));
        }
    }

    let mut checkpoints: Vec<Checkpoint> = old
        .checkpoints()
        .iter()
        .take_while(|c| c.offset < start)
        .cloned()
        .collect();
    checkpoints.extend(region.checkpoints);
    if let Some(old_stop) = old_stop {
        checkpoints.extend(shift_checkpoints(old.checkpoints(), old_stop, delta));
    }

    let reparsed_bytes = u32::from(region_end - start);
    debug!(
        resume = u32::from(start),
        stop = ?stop.map(u32::from),
        reused_children,
        reparsed_bytes,
        "statements re-derived"
    );
    let stats = ReuseStats {
        strategy: Strategy::Statements,
        reused_children,
        reparsed_bytes,
    };
    Some(Tree::new(green, source.clone(), checkpoints, diagnostics, stats))
}
