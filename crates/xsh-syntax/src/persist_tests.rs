use indoc::indoc;

use crate::{Error, InputEdit, Tree, parse};

const SOURCE: &str = indoc! {"
    x = 1;
    for f in $(ls -la):
        echo @(f)
    $(ls -la
"};

fn full_dump(tree: &Tree) -> String {
    tree.printer().with_trivia(true).with_spans(true).dump()
}

#[test]
fn snapshot_round_trip() {
    let tree = parse(SOURCE).unwrap();
    let bytes = tree.to_snapshot().unwrap();
    let restored = Tree::from_snapshot(&bytes, SOURCE).unwrap();

    assert_eq!(restored.green(), tree.green());
    assert_eq!(full_dump(&restored), full_dump(&tree));
    assert_eq!(restored.checkpoints(), tree.checkpoints());
    assert_eq!(restored.diagnostics(), tree.diagnostics());
    assert_eq!(restored.diagnostics().len(), 2);
}

#[test]
fn restored_tree_accepts_edits() {
    let tree = parse(SOURCE).unwrap();
    let restored = Tree::from_snapshot(&tree.to_snapshot().unwrap(), SOURCE).unwrap();

    let (edit, new_source) = InputEdit::replace(SOURCE, 4..5, "2");
    let edited = crate::apply_edit(&restored, &edit, &new_source).unwrap();
    assert_eq!(full_dump(&edited), full_dump(&parse(&new_source).unwrap()));
}

#[test]
fn other_format_version_is_rejected() {
    let mut bytes = parse("x = 1\n").unwrap().to_snapshot().unwrap();
    bytes[0] = 2;
    let err = Tree::from_snapshot(&bytes, "x = 1\n").unwrap_err();
    assert!(matches!(err, Error::SnapshotVersion { format: 2, .. }));
}

#[test]
fn other_source_is_rejected() {
    let bytes = parse("x = 1\n").unwrap().to_snapshot().unwrap();
    let err = Tree::from_snapshot(&bytes, "x = 2\n").unwrap_err();
    assert_eq!(err, Error::SnapshotSourceMismatch);

    let err = Tree::from_snapshot(&bytes, "x = 10\n").unwrap_err();
    assert_eq!(err, Error::SnapshotSourceMismatch);
}

#[test]
fn truncated_snapshot_is_rejected() {
    let bytes = parse(SOURCE).unwrap().to_snapshot().unwrap();
    let err = Tree::from_snapshot(&bytes[..bytes.len() / 2], SOURCE).unwrap_err();
    assert!(matches!(err, Error::Snapshot(_)));

    let err = Tree::from_snapshot(&[], SOURCE).unwrap_err();
    assert!(matches!(err, Error::Snapshot(_)));
}
