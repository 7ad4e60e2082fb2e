//! Token relex: an edit inside one token that leaves the token stream's
//! shape alone is applied by swapping that token.
//!
//! The grammar only ever looks at token kinds. When relexing from the
//! statement's checkpoint to the next one yields the same kinds at the same
//! relative spans and ends in the recorded scanner state, a full parse would
//! build the same tree around different text.

use std::cmp::Ordering;
use std::sync::Arc;

use rowan::{GreenToken, NodeOrToken, TextRange, TextSize, TokenAtOffset};
use tracing::{debug, trace, warn};

use super::carry_before;
use super::edit::{EditedTree, shift_offset, shift_range};
use crate::cst::SyntaxKind::{self, *};
use crate::cst::{SyntaxNode, SyntaxToken, TokenSet};
use crate::diagnostics::Diagnostics;
use crate::scanner::Lexer;
use crate::tree::{Checkpoint, ReuseStats, Strategy, Tree};

/// Tokens whose text may change without touching the structure around them.
const RELEXABLE: TokenSet = TokenSet::new(&[
    Name,
    Integer,
    Float,
    SyntaxKind::String,
    PathString,
    SubprocessWord,
    Comment,
]);

pub(crate) fn relex(edited: &EditedTree<'_>, source: &Arc<str>) -> Option<Tree> {
    let edit = edited.input_edit();
    let start = TextSize::from(edit.start_byte);
    let old_end = TextSize::from(edit.old_end_byte);
    let root = edited.tree().syntax();
    let candidates = match root.token_at_offset(start) {
        TokenAtOffset::None => return None,
        TokenAtOffset::Single(token) => vec![token],
        TokenAtOffset::Between(left, right) => vec![left, right],
    };
    candidates
        .into_iter()
        .filter(|token| {
            let range = token.text_range();
            RELEXABLE.contains(token.kind())
                && !range.is_empty()
                && range.start() <= start
                && old_end <= range.end()
        })
        .find_map(|token| relex_token(edited, source, &root, &token))
}

fn relex_token(
    edited: &EditedTree<'_>,
    source: &Arc<str>,
    root: &SyntaxNode,
    token: &SyntaxToken,
) -> Option<Tree> {
    let old = edited.tree();
    let delta = edited.delta();
    let token_range = token.text_range();

    let checkpoints = old.checkpoints();
    let after = checkpoints.partition_point(|c| c.offset <= token_range.start());
    let first = checkpoints.get(after.checked_sub(1)?)?;
    // No next checkpoint: the region runs to the end of input.
    let next = checkpoints.get(after);
    let lo = first.offset;
    let hi = next.map(|c| c.offset);
    if hi.is_some_and(|hi| hi < token_range.end()) {
        return None;
    }

    let before_hi = |offset: TextSize| hi.is_none_or(|hi| offset < hi);
    let touched = old.diagnostics().iter().any(|d| {
        let range = d.range();
        before_hi(range.start()) && (range.start() >= lo || range.end() > lo)
    });
    if touched {
        trace!("statement carries diagnostics, not relexing");
        return None;
    }

    let old_tokens = region_tokens(root, lo, hi)?;
    let edited_index = old_tokens.iter().position(|t| t == token)?;

    let (Ok(state), Ok(boundary)) = (
        first.decode_state(),
        next.map(Checkpoint::decode_state).transpose(),
    ) else {
        warn!(offset = u32::from(lo), "corrupt checkpoint around the edit");
        return None;
    };
    let mut lexer = Lexer::resume(source, lo, state);
    for (index, old_token) in old_tokens.iter().enumerate() {
        let new = lexer.next_token()?;
        let range = old_token.text_range();
        let expected = match index.cmp(&edited_index) {
            Ordering::Less => range,
            Ordering::Equal => TextRange::new(range.start(), shift_offset(range.end(), delta)),
            Ordering::Greater => shift_range(range, delta),
        };
        if new.kind != old_token.kind() || new.span != expected {
            trace!(
                expected = ?old_token.kind(),
                found = ?new.kind,
                "token stream changed shape"
            );
            return None;
        }
    }
    let lines_up = match (hi, &boundary) {
        (Some(hi), Some(boundary)) => {
            lexer.offset() == shift_offset(hi, delta) && lexer.state() == boundary
        }
        _ => lexer.next_token().is_none(),
    };
    if !lines_up {
        trace!("scanner state differs at the next checkpoint");
        return None;
    }

    let new_range = TextRange::new(token_range.start(), shift_offset(token_range.end(), delta));
    let replacement = GreenToken::new(token.kind().into(), &source[new_range]);
    let green = token.replace_with(replacement);

    let checkpoints: Vec<Checkpoint> = checkpoints
        .iter()
        .map(|c| {
            if c.offset <= token_range.start() {
                c.clone()
            } else {
                c.shifted(delta)
            }
        })
        .collect();

    let old_eof = TextSize::from(old.source().len() as u32);
    let new_eof = TextSize::from(source.len() as u32);
    let mut diagnostics = Diagnostics::new();
    for d in old.diagnostics() {
        if !before_hi(d.range().start()) {
            diagnostics.push(d.shifted(delta));
        } else {
            diagnostics.push(carry_before(d, old_eof, new_eof));
        }
    }

    let new_hi = hi.map_or(TextSize::from(source.len() as u32), |hi| shift_offset(hi, delta));
    let reparsed_bytes = u32::from(new_hi - lo);
    let reused_children = root.green().children().len().saturating_sub(1);
    debug!(
        kind = ?token.kind(),
        offset = u32::from(token_range.start()),
        reparsed_bytes,
        "token relexed in place"
    );
    let stats = ReuseStats {
        strategy: Strategy::Relex,
        reused_children,
        reparsed_bytes,
    };
    Some(Tree::new(green, source.clone(), checkpoints, diagnostics, stats))
}

/// Tokens scanned from the checkpoint at `lo` up to the one at `hi` (or the
/// end), in scan order. Tokens inside `Missing` nodes were never scanned and
/// are left out.
fn region_tokens(
    root: &SyntaxNode,
    lo: TextSize,
    hi: Option<TextSize>,
) -> Option<Vec<SyntaxToken>> {
    let statement = root.child_or_token_at_range(TextRange::at(lo, 1.into()))?;
    let mut cursor = match statement {
        NodeOrToken::Node(node) => node.first_token(),
        NodeOrToken::Token(token) => Some(token),
    };
    let mut tokens = Vec::new();
    while let Some(token) = cursor {
        let range = token.text_range();
        if let Some(hi) = hi
            && range.start() >= hi
            && !(range.is_empty() && token.kind() == Dedent)
        {
            break;
        }
        let missing = token.parent().is_some_and(|p| p.kind() == Missing);
        if !missing {
            tokens.push(token.clone());
        }
        cursor = token.next_token();
    }
    Some(tokens)
}
