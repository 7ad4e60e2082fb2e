use std::ops::Range;

use tracing::info;
use xsh_core::utils::preview;
use xsh_syntax::tree::Strategy;
use xsh_syntax::{InputEdit, ParseSession, Tree};

use super::fail;
use super::parse::dump;
use super::source_loader::SourceInput;

pub struct EditArgs {
    pub input: SourceInput,
    pub range: Range<usize>,
    pub text: String,
    pub incremental: bool,
    pub trivia: bool,
    pub spans: bool,
    pub color: bool,
}

pub fn run(args: EditArgs) {
    let source = args.input.load().unwrap_or_else(|msg| fail(msg));
    let session = ParseSession::new().incremental(args.incremental);
    let (tree, new_source) =
        apply(&session, &source.text, args.range, &args.text).unwrap_or_else(|msg| fail(msg));

    eprintln!("{}", summary(&tree));
    print!("{}", dump(&tree, args.trivia, args.spans));
    if !tree.diagnostics().is_empty() {
        eprint!(
            "{}",
            tree.diagnostics()
                .printer(&new_source)
                .path(&source.name)
                .colored(args.color)
                .render()
        );
    }
}

/// Parses `source`, replaces `range` with `text` and re-derives the tree.
pub fn apply(
    session: &ParseSession,
    source: &str,
    range: Range<usize>,
    text: &str,
) -> Result<(Tree, String), String> {
    if range.end > source.len() {
        return Err(format!(
            "range {}..{} is past the end of the source ({} bytes)",
            range.start,
            range.end,
            source.len()
        ));
    }
    if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
        return Err(format!(
            "range {}..{} splits a character",
            range.start, range.end
        ));
    }

    let tree = session.parse(source).map_err(|e| e.to_string())?;
    let (edit, new_source) = InputEdit::replace(source, range, text);
    info!(
        start = edit.start_byte,
        old_end = edit.old_end_byte,
        new_end = edit.new_end_byte,
        text = %preview(text, 40),
        "applying edit"
    );
    let edited = session
        .apply_edit(&tree, &edit, &new_source)
        .map_err(|e| e.to_string())?;
    Ok((edited, new_source))
}

pub fn summary(tree: &Tree) -> String {
    let stats = tree.reuse_stats();
    let strategy = match stats.strategy {
        Strategy::Full => "full parse",
        Strategy::Relex => "relexed one token",
        Strategy::Statements => "reparsed statements",
    };
    format!(
        "{}: reused {} children, scanned {} bytes",
        strategy, stats.reused_children, stats.reparsed_bytes
    )
}
