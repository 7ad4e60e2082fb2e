//! External scanner: the tokens no context-free rule can produce.
//!
//! Layout (newlines, indentation), mode openers and closers, environment
//! variables and everything inside subprocess regions. When it declines, the
//! default lexer takes over for one token.

use rowan::TextRange;

use super::Token;
use super::state::{Closer, MacroStage, Mode, ScannerState};
use super::words::{self, WordContext};
use crate::cst::{SyntaxKind, TokenSet};

/// Keywords that end a would-be bare command name: `x in y`, `a if b else c`.
const INFIX_KEYWORDS: &[&str] = &[
    "in", "is", "and", "or", "not", "if", "else", "for", "as", "from", "async", "await", "lambda",
];

/// Reserved words that never start a bare command.
const STATEMENT_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

/// Runs the scanner at `offset`.
///
/// Returns `None` to let the default lexer recognize the next token. Any
/// token returned has already been accounted for in `state`.
pub fn scan(
    state: &mut ScannerState,
    source: &str,
    offset: usize,
    valid: TokenSet,
) -> Option<Token> {
    let scanned = if valid.contains(SyntaxKind::Dedent) && state.take_pending_dedent() {
        token(SyntaxKind::Dedent, offset, 0)
    } else {
        match state.top() {
            Mode::Normal { .. } => scan_normal(state, source, offset, valid),
            Mode::Interp { closer, .. } => scan_interp(state, source, offset, valid, closer),
            _ => scan_subprocess(state, source, offset, valid),
        }?
    };
    state.clear_after_name();

    if !scanned.kind.is_trivia()
        && !matches!(
            scanned.kind,
            SyntaxKind::Newline | SyntaxKind::Indent | SyntaxKind::Dedent | SyntaxKind::Semicolon
        )
    {
        state.set_stmt_start(false);
    }
    Some(scanned)
}

fn token(kind: SyntaxKind, offset: usize, len: usize) -> Token {
    Token::new(
        kind,
        TextRange::at((offset as u32).into(), (len as u32).into()),
    )
}

fn scan_normal(
    state: &mut ScannerState,
    source: &str,
    offset: usize,
    valid: TokenSet,
) -> Option<Token> {
    use SyntaxKind::*;

    let rest = &source[offset..];
    if rest.is_empty() {
        return scan_end_of_input(state, offset);
    }

    let layout = state.at_layout_level();
    if let Some(len) = words::newline_len(rest) {
        if layout && !state.line_start() {
            state.begin_line();
            return Some(token(Newline, offset, len));
        }
        if layout {
            state.begin_line();
        }
        return Some(token(LineBreak, offset, len));
    }

    if layout && state.line_start() {
        let ws = words::horizontal_space_len(rest);
        if ws > 0 {
            state.record_indent_column(indent_width(&rest[..ws]));
            return Some(token(Whitespace, offset, ws));
        }
        if rest.starts_with('#') || words::continuation_len(rest).is_some() {
            return None;
        }
        if let Some(kind) = state.settle_indentation() {
            return Some(token(kind, offset, 0));
        }
    }

    if layout && state.at_statement_start() {
        if valid.contains(Xontrib)
            && let Some(len) = xontrib_len(rest)
        {
            return Some(token(Xontrib, offset, len));
        }
        if valid.contains(SubprocessWord)
            && state.can_push()
            && looks_like_subprocess(&rest[..words::line_len(rest)])
        {
            state.push(Mode::SubprocLine);
            let valid = state.valid_symbols();
            return scan_subprocess(state, source, offset, valid);
        }
    }

    scan_sigil(state, rest, offset, valid)
}

/// End of input in the base frame: close the logical line, then every open
/// indentation level.
fn scan_end_of_input(state: &mut ScannerState, offset: usize) -> Option<Token> {
    if let Mode::Normal { brackets } = state.top_mut() {
        *brackets = 0;
    }
    if !state.line_start() {
        state.begin_line();
        return Some(token(SyntaxKind::Newline, offset, 0));
    }
    if state.close_indent() {
        return Some(token(SyntaxKind::Dedent, offset, 0));
    }
    None
}

fn scan_interp(
    state: &mut ScannerState,
    source: &str,
    offset: usize,
    valid: TokenSet,
    closer: Closer,
) -> Option<Token> {
    use SyntaxKind::*;

    let rest = &source[offset..];
    if rest.is_empty() {
        state.pop_all();
        return Some(token(Unterminated, offset, 0));
    }
    if let Some(len) = words::newline_len(rest) {
        return Some(token(LineBreak, offset, len));
    }

    if let Mode::Interp { brackets: 0, .. } = state.top() {
        let close = match closer {
            Closer::Paren => (b')', ParenClose),
            Closer::Brace => (b'}', BraceClose),
        };
        if rest.as_bytes()[0] == close.0 {
            state.pop();
            return Some(token(close.1, offset, 1));
        }
    }

    scan_sigil(state, rest, offset, valid)
}

/// Mode openers and `$NAME`, shared by every mode.
fn scan_sigil(state: &mut ScannerState, rest: &str, offset: usize, valid: TokenSet) -> Option<Token> {
    use SyntaxKind::*;

    let bytes = rest.as_bytes();
    let (kind, len, mode) = match (bytes.first()?, bytes.get(1), bytes.get(2)) {
        (b'$', Some(b'('), _) => (DollarParen, 2, Some(Mode::SubprocParen { depth: 0 })),
        (b'$', Some(b'['), _) => (DollarBracket, 2, Some(Mode::SubprocBracket { depth: 0 })),
        (b'$', Some(b'{'), _) => (
            DollarBrace,
            2,
            Some(Mode::Interp {
                brackets: 0,
                closer: Closer::Brace,
            }),
        ),
        (b'$', Some(_), _) => {
            let len = words::ident_len(&rest[1..]);
            if len == 0 {
                return None;
            }
            (EnvVariable, len + 1, None)
        }
        // `name!(`: macro arguments, left to the default rules.
        (b'!', Some(b'('), _) if state.after_name() => return None,
        (b'!', Some(b'('), _) => (BangParen, 2, Some(Mode::SubprocParen { depth: 0 })),
        (b'!', Some(b'['), _) => (BangBracket, 2, Some(Mode::SubprocBracket { depth: 0 })),
        (b'@', Some(b'$'), Some(b'(')) => {
            (AtDollarParen, 3, Some(Mode::SubprocParen { depth: 0 }))
        }
        (b'@', Some(b'('), _) => (
            AtParen,
            2,
            Some(Mode::Interp {
                brackets: 0,
                closer: Closer::Paren,
            }),
        ),
        _ => return None,
    };

    if !valid.contains(kind) {
        return None;
    }
    match mode {
        Some(mode) => state.push(mode),
        None => state.set_cmd_start(false),
    }
    Some(token(kind, offset, len))
}

fn scan_subprocess(
    state: &mut ScannerState,
    source: &str,
    offset: usize,
    valid: TokenSet,
) -> Option<Token> {
    use SyntaxKind::*;

    let rest = &source[offset..];
    let mode = state.top();
    let ctx = match mode {
        Mode::SubprocParen { .. } => WordContext::Paren,
        Mode::SubprocBracket { .. } => WordContext::Bracket,
        _ => WordContext::Line,
    };

    if rest.is_empty() {
        if ctx == WordContext::Line {
            state.pop();
            state.begin_line();
            return Some(token(Newline, offset, 0));
        }
        state.pop_all();
        return Some(token(Unterminated, offset, 0));
    }

    let ws = words::horizontal_space_len(rest);
    if ws > 0 {
        return Some(token(Whitespace, offset, ws));
    }
    if let Some(len) = words::continuation_len(rest) {
        return Some(token(Whitespace, offset, len));
    }
    if let Some(len) = words::newline_len(rest) {
        if ctx == WordContext::Line {
            state.pop();
            state.begin_line();
            return Some(token(Newline, offset, len));
        }
        return Some(token(LineBreak, offset, len));
    }

    match state.macro_stage() {
        MacroStage::None => {}
        MacroStage::Bang if rest.starts_with('!') => {
            state.set_macro_stage(MacroStage::Argument);
            return Some(token(Bang, offset, 1));
        }
        MacroStage::Bang => state.set_macro_stage(MacroStage::None),
        MacroStage::Argument => {
            state.set_macro_stage(MacroStage::None);
            let len = words::line_len(rest);
            if len > 0 {
                return Some(token(MacroArgument, offset, len));
            }
        }
    }

    let first = rest.as_bytes()[0];
    if first == b'#' {
        return Some(token(Comment, offset, words::line_len(rest)));
    }

    match (mode, first) {
        (Mode::SubprocLine, b';') => {
            state.pop();
            state.set_stmt_start(true);
            return Some(token(Semicolon, offset, 1));
        }
        (Mode::SubprocParen { depth: 0 }, b')') => {
            state.pop();
            return Some(token(ParenClose, offset, 1));
        }
        (Mode::SubprocBracket { depth: 0 }, b']') => {
            state.pop();
            return Some(token(BracketClose, offset, 1));
        }
        (Mode::SubprocParen { .. }, b']') | (Mode::SubprocBracket { .. }, b')') => return None,
        _ => {}
    }

    if state.cmd_start() {
        if valid.contains(EnvPrefix)
            && let Some(len) = words::env_prefix_len(rest, ctx)
        {
            return Some(token(EnvPrefix, offset, len));
        }
        if valid.contains(SubprocessModifier)
            && let Some(len) = words::modifier_len(rest)
        {
            return Some(token(SubprocessModifier, offset, len));
        }
        if ctx == WordContext::Line
            && let Some(len) = words::macro_name_len(rest)
        {
            state.set_cmd_start(false);
            state.set_macro_stage(MacroStage::Bang);
            return Some(token(SubprocessWord, offset, len));
        }
    }

    if let Some((kind, len)) = words::operator(rest, state.cmd_start()) {
        state.set_cmd_start(matches!(kind, SubprocessPipe | SubprocessAnd | SubprocessOr));
        return Some(token(kind, offset, len));
    }

    if let Some(sigil) = scan_sigil(state, rest, offset, valid) {
        return Some(sigil);
    }

    if let Some(glob) = glob_literal(rest) {
        state.set_cmd_start(false);
        return Some(token(glob.0, offset, glob.1));
    }

    if let Some(len) = words::brace_expansion_len(rest) {
        state.set_cmd_start(false);
        return Some(token(BraceExpansion, offset, len));
    }

    let depth = match mode {
        Mode::SubprocParen { depth } | Mode::SubprocBracket { depth } => depth,
        _ => 0,
    };
    let word = words::scan_word(rest, ctx, depth);
    if word.len == 0 {
        return None;
    }
    match state.top_mut() {
        Mode::SubprocParen { depth } | Mode::SubprocBracket { depth } => *depth = word.depth,
        _ => {}
    }
    state.set_cmd_start(false);
    let kind = if word.unterminated_quote {
        LexError
    } else {
        SubprocessWord
    };
    Some(token(kind, offset, word.len))
}

/// Backtick search literal at word start, recognized by the default rules.
/// The prefix is a short letter flag or `@name`.
fn glob_literal(rest: &str) -> Option<(SyntaxKind, usize)> {
    let tick = rest.find('`')?;
    let prefix = &rest[..tick];
    let prefix_ok = match prefix.strip_prefix('@') {
        Some(name) => !name.is_empty() && words::ident_len(name) == name.len(),
        None => tick <= 2 && prefix.bytes().all(|b| b.is_ascii_alphabetic()),
    };
    if !prefix_ok {
        return None;
    }
    let mut lexer = <SyntaxKind as logos::Logos>::lexer(rest);
    let kind = lexer.next()?.ok()?;
    matches!(
        kind,
        SyntaxKind::RegexGlob
            | SyntaxKind::GlobPattern
            | SyntaxKind::RegexPathGlob
            | SyntaxKind::GlobPath
            | SyntaxKind::FormattedGlob
            | SyntaxKind::CustomFunctionGlob
    )
    .then(|| (kind, lexer.span().end))
}

/// Column width of leading whitespace. Tabs advance to the next multiple of
/// eight; form feeds reset the column.
fn indent_width(text: &str) -> u16 {
    let mut column: u16 = 0;
    for b in text.bytes() {
        column = match b {
            b'\t' => (column / 8).saturating_add(1).saturating_mul(8),
            b'\x0C' => 0,
            _ => column.saturating_add(1),
        };
    }
    column
}

/// `xontrib load` at statement start.
fn xontrib_len(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix("xontrib")?;
    let ws = words::horizontal_space_len(after);
    if ws == 0 {
        return None;
    }
    let load = after[ws..].strip_prefix("load")?;
    if !words::at_boundary(load) {
        return None;
    }
    Some("xontrib".len() + ws + "load".len())
}

/// Decides whether a logical line in statement position is a bare command.
///
/// A line reads as a command when it starts with an environment prefix or
/// a path, or when its first word is a non-keyword identifier followed by
/// something that cannot continue a host expression.
pub(crate) fn looks_like_subprocess(line: &str) -> bool {
    if line.trim_end().ends_with(':') {
        return false;
    }
    let bytes = line.as_bytes();

    if let Some(len) = env_assignment_len(line) {
        let rest = &line[len..];
        let ws = words::horizontal_space_len(rest);
        return ws > 0
            && rest[ws..]
                .bytes()
                .next()
                .is_some_and(|b| words::is_ident_start(b) || matches!(b, b'.' | b'/' | b'~'));
    }

    if line.starts_with("./") || line.starts_with("../") || line.starts_with('~') {
        return true;
    }
    if bytes.first() == Some(&b'/') && bytes.get(1).is_some_and(|b| b.is_ascii_alphanumeric()) {
        return true;
    }

    let name_len = words::ident_len(line);
    if name_len == 0 || STATEMENT_KEYWORDS.contains(&&line[..name_len]) {
        return false;
    }
    if words::macro_name_len(line).is_some() {
        return true;
    }
    let after = &line[name_len..];
    let ws = words::horizontal_space_len(after);
    if ws == 0 {
        return false;
    }
    argument_looks_shell(&after[ws..])
}

/// `$NAME=value` before a command; returns the length of the assignment.
fn env_assignment_len(line: &str) -> Option<usize> {
    let name = line.strip_prefix('$')?;
    let len = words::ident_len(name);
    if len == 0 || name.as_bytes().get(len) != Some(&b'=') {
        return None;
    }
    let value_start = 1 + len + 1;
    let value = words::scan_word(&line[value_start..], WordContext::Line, 0);
    Some(value_start + value.len)
}

/// The first thing after a command name that rules out a host expression.
fn argument_looks_shell(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    let second = bytes.get(1).copied();

    match first {
        b'#' => false,
        b'-' => second.is_some_and(|b| b == b'-' || b.is_ascii_alphabetic()),
        b'/' => second.is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'~')),
        b'~' | b'\'' | b'"' | b'$' | b'`' => true,
        b'{' => words::brace_expansion_len(arg).is_some(),
        b'.' => matches!(second, Some(b'/' | b'.')),
        b'@' => matches!(second, Some(b'(')) || arg.starts_with("@$(") || glob_literal(arg).is_some(),
        _ if words::is_ident_continue(first) => {
            let len = bytes.iter().take_while(|&&b| words::is_ident_continue(b)).count();
            !INFIX_KEYWORDS.contains(&&arg[..len])
        }
        _ => false,
    }
}
