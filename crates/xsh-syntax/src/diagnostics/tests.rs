use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, range(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    let first = diagnostics.iter().next().unwrap();
    assert_eq!(first.message(), "expected an expression");
}

#[test]
fn expected_token_template() {
    assert_eq!(DiagnosticKind::ExpectedToken.message(None), "expected token");
    assert_eq!(
        DiagnosticKind::ExpectedToken.message(Some("`:`")),
        "expected `:`"
    );
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(0, 5))
        .message("primary")
        .related_to("related info", range(6, 10))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    let result = diagnostics.printer("hello world!").render();
    insta::assert_snapshot!(result, @r"
    error: missing closing `)`; primary
      |
    1 | hello world!
      | ^^^^^ ---- related info
    ");
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::RedundantSemicolon, range(0, 5))
        .fix("remove it", "fixed")
        .emit();

    let result = diagnostics.printer("hello world").render();
    insta::assert_snapshot!(result, @r"
    warning: redundant `;`
      |
    1 | hello world
      | ^^^^^
      |
    help: remove it
      |
    1 - hello world
    1 + fixed world
      |
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(0, 5))
        .message("test")
        .emit();

    let result = diagnostics.printer("hello").colored(true).render();
    assert!(result.contains("test"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.printer("source").render().is_empty());
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidCharacter, range(0, 5))
        .emit();

    let result = diagnostics.printer("hello world").path("script.xsh").render();
    insta::assert_snapshot!(result, @r"
    error: invalid character
     --> script.xsh:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, TextRange::empty(0.into()))
        .emit();

    let result = diagnostics.printer("hello").render();
    insta::assert_snapshot!(result, @r"
    error: expected an expression
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_multiple_diagnostics() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBracket, range(0, 5))
        .message("first error")
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(6, 10))
        .message("second error")
        .emit();

    let result = diagnostics.printer("hello world!").render();
    insta::assert_snapshot!(result, @r"
    error: missing closing `]`; first error
      |
    1 | hello world!
      | ^^^^^

    error: unexpected token: second error
      |
    1 | hello world!
      |       ^^^^
    ");
}

#[test]
fn plain_display() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(0, 8))
        .related_to("opened here", range(0, 2))
        .emit();

    let first = diagnostics.iter().next().unwrap();
    assert_eq!(
        first.to_string(),
        "error at 0..8: missing closing `)` (related: opened here at 0..2)"
    );
}

#[test]
fn collection_counts() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, TextRange::empty(0.into()))
        .emit();
    diagnostics
        .report(DiagnosticKind::RedundantSemicolon, TextRange::empty(1.into()))
        .emit();

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.has_warnings());
}

#[test]
fn kind_suppression_order() {
    assert!(DiagnosticKind::UnclosedParen.suppresses(&DiagnosticKind::UnexpectedToken));
    assert!(DiagnosticKind::ExpectedExpression.suppresses(&DiagnosticKind::InvalidCharacter));
    assert!(!DiagnosticKind::UnclosedParen.suppresses(&DiagnosticKind::UnclosedParen));
    assert!(!DiagnosticKind::UnexpectedToken.suppresses(&DiagnosticKind::UnclosedBrace));
}

#[test]
fn filtered_keeps_disjoint_spans() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(0, 5))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(10, 15))
        .emit();

    assert_eq!(diagnostics.filtered().len(), 2);
}

#[test]
fn filtered_suppresses_contained_lower_priority() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnterminatedSubprocess, range(0, 20))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(5, 15))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind(), DiagnosticKind::UnterminatedSubprocess);
}

#[test]
fn filtered_root_cause_beats_structural_at_same_start() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(3, 9))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, range(3, 4))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind(), DiagnosticKind::ExpectedExpression);
}

#[test]
fn filtered_uses_suppression_range() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, range(2, 3))
        .suppression_range(range(0, 12))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(6, 7))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].kind(), DiagnosticKind::ExpectedExpression);
}

#[test]
fn shifted_moves_every_range() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBrace, range(4, 8))
        .related_to("opened here", range(4, 5))
        .emit();

    let moved = diagnostics.iter().next().unwrap().shifted(3);
    assert_eq!(moved.range(), range(7, 11));
    assert_eq!(moved.related()[0].range(), range(7, 8));

    let back = moved.shifted(-3);
    assert_eq!(back.range(), range(4, 8));
}
