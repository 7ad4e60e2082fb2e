use rowan::NodeOrToken;

use super::shot;
use crate::tree::Strategy;
use crate::{InputEdit, apply_edit, parse};

#[test]
fn bare_command() {
    insta::assert_snapshot!(shot("ls -la\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "ls"
          SubprocessArgument
            SubprocessWord "-la"
        Newline "\n"
    "#);
}

#[test]
fn bare_command_without_final_newline() {
    insta::assert_snapshot!(shot("ls -la"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "ls"
          SubprocessArgument
            SubprocessWord "-la"
        Newline ""
    "#);
}

#[test]
fn captured_command_in_assignment() {
    insta::assert_snapshot!(shot("p = $(ls -la)\n"), @r#"
    Module
      Assignment
        Name "p"
        Equals "="
        CapturedSubprocess
          DollarParen "$("
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
            SubprocessArgument
              SubprocessWord "-la"
          ParenClose ")"
        Newline "\n"
    "#);
}

#[test]
fn python_evaluation_argument() {
    insta::assert_snapshot!(shot("echo @(1+1)\n"), @r#"
    Module
      BareSubprocess
        SubprocessCommand
          SubprocessArgument
            SubprocessWord "echo"
          SubprocessArgument
            PythonEvaluation
              AtParen "@("
              BinaryOperator
                Integer "1"
                Plus "+"
                Integer "1"
              ParenClose ")"
        Newline "\n"
    "#);
}

#[test]
fn word_edit_keeps_the_statement_shape() {
    let source = "x = $(ls)\n";
    let tree = parse(source).unwrap();
    let (edit, new_source) = InputEdit::replace(source, 8..8, "a");
    let edited = apply_edit(&tree, &edit, &new_source).unwrap();

    assert_eq!(edited.reuse_stats().strategy, Strategy::Relex);
    assert_eq!(edited.dump(), parse(&new_source).unwrap().dump());

    let old_tokens: Vec<_> = tree
        .syntax()
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .collect();
    let new_tokens: Vec<_> = edited
        .syntax()
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .collect();
    assert_eq!(old_tokens.len(), new_tokens.len());

    let changed: Vec<_> = old_tokens
        .iter()
        .zip(&new_tokens)
        .filter(|(old, new)| old.green() != new.green())
        .map(|(_, new)| new.text().to_string())
        .collect();
    assert_eq!(changed, ["lsa"]);
}

#[test]
fn unterminated_capture() {
    insta::assert_snapshot!(shot("$(ls -la\n"), @r#"
    Module
      ExpressionStatement
        Error
          DollarParen "$("
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
            SubprocessArgument
              SubprocessWord "-la"
          Unterminated ""
        Newline ""
    UnterminatedSubprocess 0..9: unterminated subprocess; expected `)`
    "#);
}

#[test]
fn unterminated_capture_after_a_statement() {
    insta::assert_snapshot!(shot("x = 1\n$(ls -la\n"), @r#"
    Module
      Assignment
        Name "x"
        Equals "="
        Integer "1"
        Newline "\n"
      ExpressionStatement
        Error
          DollarParen "$("
          SubprocessCommand
            SubprocessArgument
              SubprocessWord "ls"
            SubprocessArgument
              SubprocessWord "-la"
          Unterminated ""
        Newline ""
    UnterminatedSubprocess 6..15: unterminated subprocess; expected `)`
    "#);

    let tree = parse("x = 1\n$(ls -la\n").unwrap();
    let errors = tree
        .syntax()
        .descendants()
        .filter(|n| n.kind() == crate::cst::SyntaxKind::Error)
        .count();
    assert_eq!(errors, 1);
}
