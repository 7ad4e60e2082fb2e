use indoc::indoc;

use super::lexer::{Lexer, lex, token_text};
use crate::cst::SyntaxKind;

/// Format tokens without trivia (default for most tests)
fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

/// Format tokens with trivia included
fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let tokens = lex(input);
    let mut out = String::new();
    for token in tokens {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

#[test]
fn empty_input() {
    assert!(lex("").is_empty());
}

#[test]
fn bare_command() {
    insta::assert_snapshot!(snapshot_raw("ls -la"), @r#"
    SubprocessWord "ls"
    Whitespace " "
    SubprocessWord "-la"
    Newline ""
    "#);
}

#[test]
fn captured_subprocess_in_assignment() {
    insta::assert_snapshot!(snapshot("x = $(ls -la)"), @r#"
    Name "x"
    Equals "="
    DollarParen "$("
    SubprocessWord "ls"
    SubprocessWord "-la"
    ParenClose ")"
    Newline ""
    "#);
}

#[test]
fn python_evaluation_in_command() {
    insta::assert_snapshot!(snapshot("echo @(1+1)"), @r#"
    SubprocessWord "echo"
    AtParen "@("
    Integer "1"
    Plus "+"
    Integer "1"
    ParenClose ")"
    Newline ""
    "#);
}

#[test]
fn unterminated_capture() {
    insta::assert_snapshot!(snapshot("$(ls -la"), @r#"
    DollarParen "$("
    SubprocessWord "ls"
    SubprocessWord "-la"
    Unterminated ""
    Newline ""
    "#);
}

#[test]
fn indentation() {
    let input = indoc! {"
    if x:
        y
    z
    "};

    insta::assert_snapshot!(snapshot(input), @r#"
    KwIf "if"
    Name "x"
    Colon ":"
    Newline "\n"
    Indent ""
    Name "y"
    Newline "\n"
    Dedent ""
    Name "z"
    Newline "\n"
    "#);
}

#[test]
fn dedents_at_end_of_input() {
    insta::assert_snapshot!(snapshot("if x:\n    y"), @r#"
    KwIf "if"
    Name "x"
    Colon ":"
    Newline "\n"
    Indent ""
    Name "y"
    Newline ""
    Dedent ""
    "#);
}

#[test]
fn newlines_inside_brackets_are_trivia() {
    insta::assert_snapshot!(snapshot_raw("f(a,\n  b)\n"), @r#"
    Name "f"
    ParenOpen "("
    Name "a"
    Comma ","
    LineBreak "\n"
    Whitespace "  "
    Name "b"
    ParenClose ")"
    Newline "\n"
    "#);
}

#[test]
fn comments_and_blank_lines() {
    insta::assert_snapshot!(snapshot_raw("# hi\n\nx\n"), @r##"
    Comment "# hi"
    LineBreak "\n"
    LineBreak "\n"
    Name "x"
    Newline "\n"
    "##);
}

#[test]
fn environment_variables() {
    insta::assert_snapshot!(snapshot("$HOME\n${x + 1}\n"), @r#"
    EnvVariable "$HOME"
    Newline "\n"
    DollarBrace "${"
    Name "x"
    Plus "+"
    Integer "1"
    BraceClose "}"
    Newline "\n"
    "#);
}

#[test]
fn pipeline_redirect_and_background() {
    insta::assert_snapshot!(snapshot("ls -la | grep foo > out.txt 2>&1 &"), @r#"
    SubprocessWord "ls"
    SubprocessWord "-la"
    SubprocessPipe "|"
    SubprocessWord "grep"
    SubprocessWord "foo"
    Redirect ">"
    SubprocessWord "out.txt"
    StreamMerge "2>&1"
    Background "&"
    Newline ""
    "#);
}

#[test]
fn nested_parens_inside_words() {
    insta::assert_snapshot!(snapshot("$(echo (a b))"), @r#"
    DollarParen "$("
    SubprocessWord "echo"
    SubprocessWord "(a"
    SubprocessWord "b)"
    ParenClose ")"
    Newline ""
    "#);
}

#[test]
fn quoted_words() {
    insta::assert_snapshot!(snapshot(r#"echo "a b" 'c d'"#), @r#"
    SubprocessWord "echo"
    SubprocessWord "\"a b\""
    SubprocessWord "'c d'"
    Newline ""
    "#);
}

#[test]
fn unterminated_quote_ends_at_line_end() {
    insta::assert_snapshot!(snapshot("echo \"abc\nx = 1\n"), @r#"
    SubprocessWord "echo"
    LexError "\"abc"
    Newline "\n"
    Name "x"
    Equals "="
    Integer "1"
    Newline "\n"
    "#);
}

#[test]
fn env_prefix_before_command() {
    insta::assert_snapshot!(snapshot("$FOO=bar ls"), @r#"
    EnvPrefix "$FOO=bar"
    SubprocessWord "ls"
    Newline ""
    "#);
}

#[test]
fn xontrib_load() {
    insta::assert_snapshot!(snapshot("xontrib load abbrevs\n"), @r#"
    Xontrib "xontrib load"
    Name "abbrevs"
    Newline "\n"
    "#);
}

#[test]
fn mismatched_closer_falls_back_to_default_rules() {
    insta::assert_snapshot!(snapshot("$(ls ]"), @r#"
    DollarParen "$("
    SubprocessWord "ls"
    BracketClose "]"
    Unterminated ""
    Newline ""
    "#);
}

#[test]
fn semicolon_ends_bare_command() {
    insta::assert_snapshot!(snapshot("ls -l; x = 1"), @r#"
    SubprocessWord "ls"
    SubprocessWord "-l"
    Semicolon ";"
    Name "x"
    Equals "="
    Integer "1"
    Newline ""
    "#);
}

#[test]
fn python_comparison_is_not_a_sigil() {
    insta::assert_snapshot!(snapshot("a != b"), @r#"
    Name "a"
    NotEq "!="
    Name "b"
    Newline ""
    "#);
}

#[test]
fn mode_stack_returns_to_normal() {
    let source = "x = $(echo $[ls @(y)]) + 1";
    let mut lexer = Lexer::new(source);
    let mut saw_nested = false;
    while let Some(token) = lexer.next_token() {
        saw_nested |= lexer.state().depth() > 2;
        if token.kind == SyntaxKind::Plus {
            assert!(lexer.state().is_normal());
        }
    }
    assert!(saw_nested);
    assert!(lexer.state().is_normal());
}

#[test]
fn tokens_cover_source() {
    let source = indoc! {r#"
    for f in $(ls).split():
        echo @(f) | wc -c
    $PATH.append("/opt/bin")
    x = `.*\.py` + g`*.rs`
    "#};

    let mut end = 0;
    for token in lex(source) {
        assert_eq!(u32::from(token.span.start()) as usize, end);
        end = u32::from(token.span.end()) as usize;
    }
    assert_eq!(end, source.len());
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(snapshot("x = 1 °° 2"), @r#"
    Name "x"
    Equals "="
    Integer "1"
    Garbage "°°"
    Integer "2"
    Newline ""
    "#);
}

#[test]
fn quoted_word_stops_at_escaped_newline() {
    let input = "echo \"a\\\nls\"\n";
    let tokens: Vec<_> = lex(input)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .take(3)
        .map(|t| (t.kind, token_text(input, &t)))
        .collect();
    assert_eq!(
        tokens,
        [
            (SyntaxKind::SubprocessWord, "echo"),
            (SyntaxKind::LexError, "\"a\\"),
            (SyntaxKind::Newline, "\n"),
        ]
    );
}

#[test]
fn macro_call_bang_after_name() {
    insta::assert_snapshot!(snapshot("f!(x)"), @r#"
    Name "f"
    Bang "!"
    ParenOpen "("
    Name "x"
    ParenClose ")"
    Newline ""
    "#);
}

#[test]
fn subprocess_macro_argument_runs_to_line_end() {
    insta::assert_snapshot!(snapshot("timeit! ls -la | wc\nx"), @r#"
    SubprocessWord "timeit"
    Bang "!"
    MacroArgument "ls -la | wc"
    Newline "\n"
    Name "x"
    Newline ""
    "#);
}
