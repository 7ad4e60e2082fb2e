use crate::cst::SyntaxKind;
use crate::parse;

#[test]
fn assignment_fields() {
    let tree = parse("p = $(ls -la)\n").unwrap();
    let root = tree.root_node();
    assert_eq!(root.kind_name(), Some("module"));
    assert_eq!(root.named_child_count(), 1);

    let assignment = root.named_child(0).unwrap();
    assert_eq!(assignment.kind(), SyntaxKind::Assignment);
    assert_eq!(assignment.range(), root.range());

    let left = assignment.child_by_field_name("left").unwrap();
    assert_eq!(left.kind_name(), Some("identifier"));
    assert_eq!(left.text(), "p");

    let right = assignment.child_by_field_name("right").unwrap();
    assert_eq!(right.kind(), SyntaxKind::CapturedSubprocess);
    assert_eq!(right.text(), "$(ls -la)");
    assert_eq!((right.start_byte(), right.end_byte()), (4, 13));

    assert!(assignment.child_by_field_name("type").is_none());
    assert!(assignment.child_by_field_name("no_such_field").is_none());
}

#[test]
fn children_include_trivia() {
    let tree = parse("x = 1\n").unwrap();
    let assignment = tree.root_node().child(0).unwrap();

    let kinds: Vec<_> = assignment.children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        [
            SyntaxKind::Name,
            SyntaxKind::Whitespace,
            SyntaxKind::Equals,
            SyntaxKind::Whitespace,
            SyntaxKind::Integer,
            SyntaxKind::Newline,
        ]
    );
    assert_eq!(assignment.child_count(), 6);
    assert!(assignment.child(1).unwrap().is_trivia());
    assert!(assignment.child(6).is_none());

    let named: Vec<_> = assignment
        .named_children()
        .filter_map(|c| c.kind_name())
        .collect();
    assert_eq!(named, ["identifier", "integer"]);
}

#[test]
fn anonymous_tokens_have_their_text_as_name() {
    let tree = parse("x = 1\n").unwrap();
    let equals = tree.root_node().child(0).unwrap().child(2).unwrap();
    assert!(equals.is_token());
    assert!(!equals.is_named());
    assert_eq!(equals.kind_name(), Some("="));
    assert_eq!(equals.child_count(), 0);
}

#[test]
fn layout_tokens_have_no_name() {
    let tree = parse("x\n").unwrap();
    let newline = tree
        .root_node()
        .child(0)
        .unwrap()
        .children()
        .find(|c| c.kind() == SyntaxKind::Newline)
        .unwrap();
    assert_eq!(newline.kind_name(), None);
    assert!(!newline.is_named());
}

#[test]
fn parent_walks_up() {
    let tree = parse("echo @(1+1)\n").unwrap();
    let root = tree.root_node();
    let plus = root
        .syntax()
        .as_node()
        .unwrap()
        .descendants_with_tokens()
        .find(|e| e.kind() == SyntaxKind::Plus)
        .map(crate::Node::from)
        .unwrap();

    let binary = plus.parent().unwrap();
    assert_eq!(binary.kind(), SyntaxKind::BinaryOperator);
    assert_eq!(binary.child_by_field_name("left").unwrap().text(), "1");
    assert_eq!(binary.child_by_field_name("operator").unwrap().text(), "+");

    let evaluation = binary.parent().unwrap();
    assert_eq!(evaluation.kind(), SyntaxKind::PythonEvaluation);
    assert_eq!(
        evaluation.child_by_field_name("expression").unwrap(),
        binary
    );
    assert!(root.parent().is_none());
}

#[test]
fn errors_are_visible_from_ancestors() {
    let tree = parse("$(ls -la\n").unwrap();
    let root = tree.root_node();
    assert!(root.has_error());

    let statement = root.child(0).unwrap();
    assert_eq!(statement.kind(), SyntaxKind::ExpressionStatement);
    let error = statement.child(0).unwrap();
    assert!(error.is_error());
    assert!(!error.is_missing());

    let clean = parse("x = 1\n").unwrap();
    assert!(!clean.root_node().has_error());
}

#[test]
fn missing_node_is_reported() {
    let tree = parse("if x:\n").unwrap();
    let missing = tree
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Missing)
        .map(crate::Node::from)
        .unwrap();
    assert!(missing.is_missing());
    assert!(missing.has_error());
    assert_eq!(missing.kind_name(), Some("MISSING"));
    assert_eq!(missing.range().len(), 0.into());
}

#[test]
fn indexed_children_match_iteration() {
    let tree = parse("x = f(a, b)  # c\nls -la | wc\n").unwrap();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        let iterated: Vec<_> = node.children().collect();
        assert_eq!(iterated.len(), node.child_count());
        for (i, child) in iterated.iter().enumerate() {
            let indexed = node.child(i).unwrap();
            assert_eq!((indexed.kind(), indexed.range()), (child.kind(), child.range()));
        }
        assert!(node.child(iterated.len()).is_none());
        stack.extend(iterated);
    }
}

#[test]
fn macro_fields() {
    let tree = parse("y = f!(a)\ntimeit! ls -la\n").unwrap();
    let root = tree.root_node();

    let call = root
        .named_child(0)
        .unwrap()
        .child_by_field_name("right")
        .unwrap();
    assert_eq!(call.kind(), SyntaxKind::MacroCall);
    assert_eq!(call.child_by_field_name("function").unwrap().text(), "f");
    assert_eq!(call.child_by_field_name("arguments").unwrap().text(), "(a)");

    let command = root
        .named_child(1)
        .unwrap()
        .child_by_field_name("body")
        .unwrap();
    assert_eq!(command.kind(), SyntaxKind::SubprocessMacro);
    assert_eq!(command.child_by_field_name("name").unwrap().text(), "timeit");
    assert_eq!(command.child_by_field_name("argument").unwrap().text(), "ls -la");
}
