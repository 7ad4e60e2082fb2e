//! Pure adjustment of an old tree to an edit, before anything is re-parsed.

use rowan::{Language, TextRange, TextSize};

use super::green_children;
use crate::cst::{SyntaxKind, XshLang};
use crate::tree::{Checkpoint, Tree};
use crate::{Error, InputEdit, Result};

/// Where a module-level child or checkpoint ends up after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Entirely before the edit, same offsets.
    Untouched,
    /// Entirely after the edit, moved by the length delta.
    Shifted,
    /// Overlaps the edited text.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditedChild {
    /// Index among the root's children, trivia included.
    pub index: usize,
    pub kind: SyntaxKind,
    pub old_range: TextRange,
    /// Range in the new source, `None` when stale.
    pub range: Option<TextRange>,
    pub status: ChildStatus,
}

/// An old tree seen through an edit.
#[derive(Debug, Clone)]
pub struct EditedTree<'t> {
    tree: &'t Tree,
    edit: InputEdit,
    children: Vec<EditedChild>,
}

impl Tree {
    /// Classifies the module-level children against `edit`.
    ///
    /// Fails when the edit does not describe a change of this tree's source.
    pub fn edit(&self, edit: &InputEdit) -> Result<EditedTree<'_>> {
        validate(self.source(), edit)?;
        let bounds = offsets(edit);
        let children = green_children(self.green())
            .enumerate()
            .map(|(index, (old, child))| {
                let status = classify_range(old, bounds);
                let range = match status {
                    ChildStatus::Untouched => Some(old),
                    ChildStatus::Shifted => Some(shift_range(old, edit.delta())),
                    ChildStatus::Stale => None,
                };
                EditedChild {
                    index,
                    kind: XshLang::kind_from_raw(child.kind()),
                    old_range: old,
                    range,
                    status,
                }
            })
            .collect();
        Ok(EditedTree {
            tree: self,
            edit: *edit,
            children,
        })
    }
}

impl<'t> EditedTree<'t> {
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn input_edit(&self) -> &InputEdit {
        &self.edit
    }

    pub fn delta(&self) -> i64 {
        self.edit.delta()
    }

    pub fn children(&self) -> &[EditedChild] {
        &self.children
    }

    pub fn stale_children(&self) -> impl Iterator<Item = &EditedChild> {
        self.children
            .iter()
            .filter(|c| c.status == ChildStatus::Stale)
    }

    pub fn checkpoint_status(&self, checkpoint: &Checkpoint) -> ChildStatus {
        let (start, old_end, _) = offsets(&self.edit);
        if checkpoint.offset < start {
            ChildStatus::Untouched
        } else if checkpoint.offset >= old_end {
            ChildStatus::Shifted
        } else {
            ChildStatus::Stale
        }
    }

    /// Checkpoints strictly before the edit, nearest first. A checkpoint
    /// whose offset carries a non-lexical diagnostic is skipped: the
    /// statement before it may have reported there, and a parse resumed at
    /// that offset would not report it again.
    pub fn resume_candidates(&self) -> impl Iterator<Item = &'t Checkpoint> {
        let start = offsets(&self.edit).0;
        let diagnostics = self.tree.diagnostics();
        self.tree
            .checkpoints()
            .iter()
            .rev()
            .filter(move |c| c.offset < start)
            .filter(move |c| {
                !diagnostics
                    .iter()
                    .any(|d| d.range().start() == c.offset && !d.kind().is_lexical_error())
            })
    }

    /// Checkpoints after the edit, in new-source offsets.
    pub fn shifted_checkpoints(&self) -> Vec<Checkpoint> {
        let delta = self.delta();
        self.tree
            .checkpoints()
            .iter()
            .filter(|c| self.checkpoint_status(c) == ChildStatus::Shifted)
            .map(|c| c.shifted(delta))
            .collect()
    }

    pub fn new_len(&self) -> u32 {
        let old_len = self.tree.source().len() as i64;
        (old_len + self.delta()) as u32
    }

    /// The replacement text must fit the edit exactly.
    pub(crate) fn check_new_source(&self, new_source: &str) -> Result<()> {
        if new_source.len() as u32 != self.new_len() {
            return Err(Error::InvalidEdit(format!(
                "new source is {} bytes, the edit implies {}",
                new_source.len(),
                self.new_len()
            )));
        }
        if !new_source.is_char_boundary(self.edit.new_end_byte as usize) {
            return Err(Error::InvalidEdit(
                "new end is not on a character boundary".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate(source: &str, edit: &InputEdit) -> Result<()> {
    let InputEdit {
        start_byte,
        old_end_byte,
        new_end_byte,
        ..
    } = *edit;
    if start_byte > old_end_byte || start_byte > new_end_byte {
        return Err(Error::InvalidEdit(format!(
            "edit starts at {start_byte} after its end"
        )));
    }
    if old_end_byte as usize > source.len() {
        return Err(Error::InvalidEdit(format!(
            "old end {old_end_byte} is past the source end {}",
            source.len()
        )));
    }
    if !source.is_char_boundary(start_byte as usize) || !source.is_char_boundary(old_end_byte as usize)
    {
        return Err(Error::InvalidEdit(
            "edit range is not on character boundaries".to_string(),
        ));
    }
    Ok(())
}

fn offsets(edit: &InputEdit) -> (TextSize, TextSize, TextSize) {
    (
        TextSize::from(edit.start_byte),
        TextSize::from(edit.old_end_byte),
        TextSize::from(edit.new_end_byte),
    )
}

fn classify_range(range: TextRange, (start, old_end, _): (TextSize, TextSize, TextSize)) -> ChildStatus {
    if range.end() <= start && range.start() < start {
        ChildStatus::Untouched
    } else if range.start() >= old_end {
        ChildStatus::Shifted
    } else if range.is_empty() && range.start() <= start {
        ChildStatus::Untouched
    } else {
        ChildStatus::Stale
    }
}

pub(crate) fn shift_offset(offset: TextSize, delta: i64) -> TextSize {
    let moved = (u32::from(offset) as i64 + delta).max(0);
    TextSize::from(moved as u32)
}

pub(crate) fn shift_range(range: TextRange, delta: i64) -> TextRange {
    TextRange::at(shift_offset(range.start(), delta), range.len())
}
