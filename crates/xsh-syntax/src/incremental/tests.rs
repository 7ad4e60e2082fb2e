use indoc::indoc;
use rowan::TextRange;

use super::ChildStatus;
use crate::tree::{Checkpoint, Strategy, Tree};
use crate::{CancellationFlag, DiagnosticKind, Error, InputEdit, ParseSession, apply_edit, parse};

fn full_dump(tree: &Tree) -> String {
    tree.printer().with_trivia(true).with_spans(true).dump()
}

fn diagnostics(tree: &Tree) -> Vec<(DiagnosticKind, TextRange, String)> {
    tree.diagnostics()
        .iter()
        .map(|d| (d.kind(), d.range(), d.message().to_string()))
        .collect()
}

fn offsets(tree: &Tree) -> Vec<u32> {
    tree.checkpoints().iter().map(|c| c.offset.into()).collect()
}

/// Applies the edit and checks the result against a parse from scratch.
fn edit_and_compare(source: &str, range: std::ops::Range<usize>, replacement: &str) -> Tree {
    let tree = parse(source).unwrap();
    let (edit, new_source) = InputEdit::replace(source, range, replacement);
    let edited = apply_edit(&tree, &edit, &new_source).unwrap();
    let fresh = parse(&new_source).unwrap();

    assert_eq!(edited.source(), new_source);
    assert_eq!(full_dump(&edited), full_dump(&fresh));
    assert_eq!(diagnostics(&edited), diagnostics(&fresh));
    assert_eq!(offsets(&edited), offsets(&fresh));
    edited
}

/// Same tree with the checkpoint at `offset` made undecodable.
fn corrupt_checkpoint(tree: &Tree, offset: u32) -> Tree {
    let checkpoints = tree
        .checkpoints()
        .iter()
        .map(|c| {
            if u32::from(c.offset) == offset {
                Checkpoint {
                    offset: c.offset,
                    state: Box::new([0xff]),
                }
            } else {
                c.clone()
            }
        })
        .collect();
    Tree::new(
        tree.green().clone(),
        tree.shared_source().clone(),
        checkpoints,
        tree.diagnostics().clone(),
        tree.reuse_stats(),
    )
}

#[test]
fn rename_inside_subprocess_word_relexes() {
    let edited = edit_and_compare("x = $(ls)\n", 6..8, "lsa");
    let stats = edited.reuse_stats();
    assert_eq!(stats.strategy, Strategy::Relex);
    assert_eq!(stats.reparsed_bytes, 11);
}

#[test]
fn relex_shares_untouched_statements() {
    let source = "first = 1\nsecond = 2\nthird = 3\n";
    let tree = parse(source).unwrap();
    let (edit, new_source) = InputEdit::replace(source, 10..16, "middle");
    let edited = apply_edit(&tree, &edit, &new_source).unwrap();

    assert_eq!(edited.reuse_stats().strategy, Strategy::Relex);
    assert_eq!(edited.reuse_stats().reused_children, 2);
    let old: Vec<_> = tree.green().children().collect();
    let new: Vec<_> = edited.green().children().collect();
    assert_eq!(old[0], new[0]);
    assert_eq!(old[2], new[2]);
    assert_ne!(old[1], new[1]);
}

#[test]
fn relex_inside_indented_block() {
    let source = indoc! {"
        if x:
            y = 1
        z = 2
    "};
    let edited = edit_and_compare(source, 14..15, "10");
    assert_eq!(edited.reuse_stats().strategy, Strategy::Relex);
}

#[test]
fn relex_shifts_later_diagnostics() {
    let edited = edit_and_compare("abc = 1\nx = 2;\n", 0..3, "abcd");
    assert_eq!(edited.reuse_stats().strategy, Strategy::Relex);
    let warning = edited.diagnostics().iter().next().unwrap();
    assert_eq!(warning.kind(), DiagnosticKind::RedundantSemicolon);
    assert_eq!(warning.range(), TextRange::new(14.into(), 15.into()));
}

#[test]
fn kind_change_reparses_one_statement() {
    let edited = edit_and_compare("a = 1\nb = 2\nc = 3\n", 10..11, "f(2)");
    let stats = edited.reuse_stats();
    assert_eq!(stats.strategy, Strategy::Statements);
    assert_eq!(stats.reused_children, 2);
    assert_eq!(stats.reparsed_bytes, 9);
    assert_eq!(offsets(&edited), [0, 6, 15]);
}

#[test]
fn earlier_diagnostics_survive_reparse() {
    let edited = edit_and_compare("a = 1;\nb = 2\n", 11..12, "f(2)");
    assert_eq!(edited.reuse_stats().strategy, Strategy::Statements);
    assert_eq!(edited.diagnostics().len(), 1);
}

#[test]
fn typing_a_subprocess_into_a_statement() {
    let edited = edit_and_compare("x = 1\ny = 2\n", 4..5, "$(ls -la)");
    assert_eq!(edited.reuse_stats().strategy, Strategy::Statements);
    assert!(!edited.has_errors());
}

#[test]
fn unclosed_region_swallows_the_rest() {
    let edited = edit_and_compare("x = 1\ny = 2\nz = 3\n", 4..5, "$(ls");
    assert!(edited.has_errors());
}

#[test]
fn closing_a_region_recovers() {
    let edited = edit_and_compare("x = $(ls\ny = 2\n", 8..8, ")");
    assert!(!edited.has_errors());
}

#[test]
fn opening_a_block() {
    let source = indoc! {"
        x = 1
        y = 2
        z = 3
    "};
    edit_and_compare(source, 6..6, "if x:\n    ");
}

#[test]
fn dedenting_a_block() {
    let source = indoc! {"
        if x:
            y = 1
            z = 2
        w = 3
    "};
    edit_and_compare(source, 16..20, "");
}

#[test]
fn unterminated_string_edit() {
    edit_and_compare("x = 'ab'\ny = 1\n", 5..6, "'");
}

#[test]
fn closing_quote_after_escaped_newline() {
    edit_and_compare("echo \"a\\\nls\n", 11..11, "\"");
    edit_and_compare("echo \" 'c' \\\n@$(which ls) -l\n", 14..14, "\"");
}

#[test]
fn resume_skips_checkpoint_carrying_earlier_report() {
    let source = "@(f(x)\n    2]\nx = 1\n";
    let tree = parse(source).unwrap();
    assert!(tree.diagnostics().iter().any(|d| d.range().start() == 14.into()));
    for at in 15..=20 {
        let edited = edit_and_compare(source, at..at, " ");
        assert!(edited.diagnostics().iter().any(|d| d.range().start() == 14.into()));
    }

    let (edit, _) = InputEdit::replace(source, 16..16, " ");
    let edited = tree.edit(&edit).unwrap();
    assert!(edited.resume_candidates().all(|c| c.offset != 14.into()));
}

#[test]
fn joining_two_lines() {
    edit_and_compare("a = 1\nb = 2\n", 5..6, " + ");
}

#[test]
fn edit_at_end_of_input() {
    edit_and_compare("a = 1\nb = 2\n", 12..12, "c = 3\n");
    edit_and_compare("a = 1\nb = 2", 11..11, " + 1");
}

#[test]
fn edit_of_empty_source() {
    let edited = edit_and_compare("", 0..0, "ls -la\n");
    assert_eq!(edited.reuse_stats().strategy, Strategy::Full);
}

#[test]
fn corrupt_checkpoint_falls_back_to_an_earlier_one() {
    let source = "a = 1\nb = 2\nc = 3\n";
    let tree = corrupt_checkpoint(&parse(source).unwrap(), 6);
    let (edit, new_source) = InputEdit::replace(source, 10..11, "f(2)");
    let edited = apply_edit(&tree, &edit, &new_source).unwrap();

    assert_eq!(edited.reuse_stats().strategy, Strategy::Statements);
    assert_eq!(edited.reuse_stats().reused_children, 1);
    assert_eq!(full_dump(&edited), full_dump(&parse(&new_source).unwrap()));
    assert_eq!(offsets(&edited), [0, 6, 15]);
}

#[test]
fn corrupt_only_checkpoint_parses_from_scratch() {
    let source = "x = 1\n";
    let tree = corrupt_checkpoint(&parse(source).unwrap(), 0);
    let (edit, new_source) = InputEdit::replace(source, 4..5, "2");
    let edited = apply_edit(&tree, &edit, &new_source).unwrap();

    assert_eq!(edited.reuse_stats().strategy, Strategy::Full);
    assert_eq!(full_dump(&edited), full_dump(&parse(&new_source).unwrap()));
    assert!(edited.checkpoints()[0].decode_state().is_ok());
}

#[test]
fn non_incremental_session_parses_from_scratch() {
    let session = ParseSession::new().incremental(false);
    let source = "x = $(ls)\n";
    let tree = session.parse(source).unwrap();
    let (edit, new_source) = InputEdit::replace(source, 6..8, "lsa");
    let edited = session.apply_edit(&tree, &edit, &new_source).unwrap();
    assert_eq!(edited.reuse_stats().strategy, Strategy::Full);
    assert_eq!(full_dump(&edited), full_dump(&parse(&new_source).unwrap()));
}

#[test]
fn cancelled_session_refuses_edits() {
    let flag = CancellationFlag::new();
    let session = ParseSession::new().cancellation(flag.clone());
    let source = "x = 1\n";
    let tree = session.parse(source).unwrap();

    flag.cancel();
    let (edit, new_source) = InputEdit::replace(source, 4..5, "2");
    let result = session.apply_edit(&tree, &edit, &new_source);
    assert_eq!(result.unwrap_err(), Error::Cancelled);
}

#[test]
fn edit_past_the_end_is_rejected() {
    let tree = parse("x = 1\n").unwrap();
    let (edit, new_source) = InputEdit::replace("x = 1\nand more\n", 6..10, "");
    let result = apply_edit(&tree, &edit, &new_source);
    assert!(matches!(result, Err(Error::InvalidEdit(_))));
}

#[test]
fn new_source_must_fit_the_edit() {
    let source = "x = 1\n";
    let tree = parse(source).unwrap();
    let (edit, _) = InputEdit::replace(source, 4..5, "22");
    let result = apply_edit(&tree, &edit, "x = 2\n");
    assert!(matches!(result, Err(Error::InvalidEdit(_))));
}

#[test]
fn edit_inside_a_character_is_rejected() {
    let source = "s = 'é'\n";
    let tree = parse(source).unwrap();
    let edit = InputEdit {
        start_byte: 6,
        old_end_byte: 6,
        new_end_byte: 6,
        ..InputEdit::replace(source, 5..5, "").0
    };
    let result = tree.edit(&edit);
    assert!(matches!(result, Err(Error::InvalidEdit(_))));
}

#[test]
fn classification_of_children() {
    let source = "a = 1\nb = 2\nc = 3\n";
    let tree = parse(source).unwrap();
    let (edit, _) = InputEdit::replace(source, 10..11, "f(2)");
    let edited = tree.edit(&edit).unwrap();

    let statuses: Vec<_> = edited.children().iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        [ChildStatus::Untouched, ChildStatus::Stale, ChildStatus::Shifted]
    );
    let last = &edited.children()[2];
    assert_eq!(last.range, Some(TextRange::new(15.into(), 21.into())));
    assert_eq!(edited.stale_children().count(), 1);

    let resume: Vec<u32> = edited.resume_candidates().map(|c| c.offset.into()).collect();
    assert_eq!(resume, [6, 0]);
    let shifted: Vec<u32> = edited
        .shifted_checkpoints()
        .iter()
        .map(|c| c.offset.into())
        .collect();
    assert_eq!(shifted, [15]);
}

#[test]
fn chained_edits_stay_equivalent() {
    let mut source = String::from("x = 1\nls -la\n");
    let mut tree = parse(&source).unwrap();
    let steps: &[(std::ops::Range<usize>, &str)] = &[
        (4..5, "$(ls)"),
        (6..8, "echo"),
        (0..0, "# note\n"),
        (25..25, " | grep x"),
    ];
    for (range, replacement) in steps {
        let (edit, new_source) = InputEdit::replace(&source, range.clone(), replacement);
        tree = apply_edit(&tree, &edit, &new_source).unwrap();
        source = new_source;
        assert_eq!(full_dump(&tree), full_dump(&parse(&source).unwrap()));
        assert_eq!(diagnostics(&tree), diagnostics(&parse(&source).unwrap()));
    }
}
