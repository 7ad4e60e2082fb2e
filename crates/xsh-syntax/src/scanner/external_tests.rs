use super::external::{looks_like_subprocess, scan};
use super::lexer::lex;
use super::state::{Mode, ScannerState};
use super::words::{self, WordContext};
use crate::cst::SyntaxKind;

#[test]
fn bare_command_detection() {
    let commands = [
        "ls -la",
        "ls --color=auto",
        "cd /tmp",
        "cd ..",
        "cd ~",
        "git commit -m 'msg'",
        "echo \"hi\"",
        "echo $HOME",
        "echo @(x)",
        "echo @$(which ls)",
        "ls `.*\\.py`",
        "sleep 1",
        "git status",
        "./configure --prefix=/usr",
        "../run.sh",
        "/bin/ls",
        "~/bin/tool",
        "$FOO=bar make",
        "timeit! ls",
        "ls!",
        "mkdir {a,b}",
        "ls @f`x`",
    ];
    for line in commands {
        assert!(looks_like_subprocess(line), "{line:?} should be a command");
    }
}

#[test]
fn python_lines_stay_python() {
    let python = [
        "x = 1",
        "x == 1",
        "f(x)",
        "print",
        "a - b",
        "a.b",
        "x[0]",
        "if x:",
        "for f in files:",
        "def f(x):",
        "x if y else z",
        "x in y",
        "not x",
        "return x",
        "yield x",
        "import os",
        "$PATH.append(x)",
        "$FOO = 1",
        "x -= 1",
        "ls # comment",
        "f!(x)",
        "with! x:",
        "",
    ];
    for line in python {
        assert!(!looks_like_subprocess(line), "{line:?} should stay Python");
    }
}

#[test]
fn operators_at_word_start() {
    let cases = [
        ("| wc", Some((SyntaxKind::SubprocessPipe, 1))),
        ("e| wc", Some((SyntaxKind::SubprocessPipe, 2))),
        ("err| wc", Some((SyntaxKind::SubprocessPipe, 4))),
        ("all| wc", Some((SyntaxKind::SubprocessPipe, 4))),
        ("&& b", Some((SyntaxKind::SubprocessAnd, 2))),
        ("|| b", Some((SyntaxKind::SubprocessOr, 2))),
        ("and b", Some((SyntaxKind::SubprocessAnd, 3))),
        ("or b", Some((SyntaxKind::SubprocessOr, 2))),
        ("> f", Some((SyntaxKind::Redirect, 1))),
        (">> f", Some((SyntaxKind::Redirect, 2))),
        ("< f", Some((SyntaxKind::Redirect, 1))),
        ("2> f", Some((SyntaxKind::Redirect, 2))),
        ("err>> f", Some((SyntaxKind::Redirect, 5))),
        ("a>f", Some((SyntaxKind::Redirect, 2))),
        ("2>&1", Some((SyntaxKind::StreamMerge, 4))),
        ("e>o ", Some((SyntaxKind::StreamMerge, 3))),
        ("err>out)", Some((SyntaxKind::StreamMerge, 7))),
        ("&", Some((SyntaxKind::Background, 1))),
        ("& )", Some((SyntaxKind::Background, 1))),
        ("orange", None),
        ("android", None),
        ("-la", None),
        ("&x", None),
    ];
    for (text, expected) in cases {
        assert_eq!(words::operator(text, false), expected, "{text:?}");
    }
}

#[test]
fn logical_words_are_commands_in_command_position() {
    assert_eq!(words::operator("and b", true), None);
    assert_eq!(words::operator("or b", true), None);
}

#[test]
fn word_boundaries() {
    let cases = [
        ("foo bar", WordContext::Line, 3),
        ("foo|bar", WordContext::Line, 3),
        ("foo;bar", WordContext::Line, 3),
        ("foo;bar", WordContext::Paren, 7),
        ("a)b", WordContext::Paren, 1),
        ("a)b", WordContext::Line, 3),
        ("a]b", WordContext::Bracket, 1),
        ("'a b' c", WordContext::Line, 5),
        ("\"a\\\" b\" c", WordContext::Line, 7),
        ("a\\ b c", WordContext::Line, 4),
        ("pre$HOME", WordContext::Line, 3),
        ("x@(y)", WordContext::Line, 1),
        ("a&&b", WordContext::Line, 1),
        ("a&b", WordContext::Line, 3),
        ("--opt=$x", WordContext::Line, 6),
        ("file{1,2}.txt", WordContext::Line, 4),
        ("{}", WordContext::Line, 2),
    ];
    for (text, ctx, len) in cases {
        assert_eq!(words::scan_word(text, ctx, 0).len, len, "{text:?} in {ctx:?}");
    }
}

#[test]
fn nested_delimiters_track_depth() {
    let word = words::scan_word("f(a(b)", WordContext::Paren, 0);
    assert_eq!((word.len, word.depth), (6, 1));

    let closing = words::scan_word("c))", WordContext::Paren, 1);
    assert_eq!((closing.len, closing.depth), (2, 0));
}

#[test]
fn unterminated_quotes() {
    let line = words::scan_word("'abc\nnext", WordContext::Line, 0);
    assert!(line.unterminated_quote);
    assert_eq!(line.len, 4);

    let paren = words::scan_word("\"abc\nnext", WordContext::Paren, 0);
    assert!(paren.unterminated_quote);
    assert_eq!(paren.len, 9);
}

#[test]
fn env_prefix_and_modifier() {
    assert_eq!(words::env_prefix_len("$A=1 cmd", WordContext::Line), Some(4));
    assert_eq!(words::env_prefix_len("$A= cmd", WordContext::Line), Some(3));
    assert_eq!(words::env_prefix_len("$A cmd", WordContext::Line), None);
    assert_eq!(words::modifier_len("@json cmd"), Some(5));
    assert_eq!(words::modifier_len("@(x)"), None);
}

#[test]
fn pending_dedents_come_first() {
    let source = "if a:\n    if b:\n        c\nd\n";
    let kinds: Vec<_> = lex(source)
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| !k.is_trivia())
        .collect();
    let d = kinds.len() - 2;
    assert_eq!(kinds[d], SyntaxKind::Name);
    assert_eq!(&kinds[d - 2..d], &[SyntaxKind::Dedent, SyntaxKind::Dedent]);
}

#[test]
fn scan_declines_plain_python() {
    let mut state = ScannerState::new();
    let source = "x = 1";
    let valid = state.valid_symbols();
    assert_eq!(scan(&mut state, source, 0, valid), None);
    assert_eq!(state.top(), Mode::Normal { brackets: 0 });
    assert!(!state.line_start());
}

#[test]
fn brace_expansion_groups() {
    assert_eq!(words::brace_expansion_len("{a,b}"), Some(5));
    assert_eq!(words::brace_expansion_len("{1..3}.log"), Some(6));
    assert_eq!(words::brace_expansion_len("{a,{b,c}}d"), Some(9));
    assert_eq!(words::brace_expansion_len("{}"), None);
    assert_eq!(words::brace_expansion_len("{ a,b}"), None);
    assert_eq!(words::brace_expansion_len("{a}"), None);
    assert_eq!(words::brace_expansion_len("{a,b"), None);
    assert_eq!(words::brace_expansion_len("{$x,y}"), None);
}

#[test]
fn macro_names() {
    assert_eq!(words::macro_name_len("timeit! ls"), Some(6));
    assert_eq!(words::macro_name_len("ls!"), Some(2));
    assert_eq!(words::macro_name_len("ls!\n"), Some(2));
    assert_eq!(words::macro_name_len("f!(x)"), None);
    assert_eq!(words::macro_name_len("x != y"), None);
    assert_eq!(words::macro_name_len("!x"), None);
}
