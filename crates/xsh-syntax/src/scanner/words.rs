//! Shell word splitting for subprocess modes.
//!
//! Pure functions over the upcoming bytes; all delimiters are ASCII so byte
//! positions where they stop are always char boundaries.

use crate::cst::SyntaxKind;

/// Which frame the word is scanned in. Decides the closing delimiter and
/// whether `;` ends the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordContext {
    Paren,
    Bracket,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WordScan {
    pub len: usize,
    /// Frame depth after the word.
    pub depth: u16,
    pub unterminated_quote: bool,
}

/// Stream merges, longest first. Recognized only when followed by a boundary.
const STREAM_MERGES: &[&str] = &[
    "err>out", "out>err", "err>o", "out>e", "e>out", "o>err", "2>&1", "1>&2", "e>o", "o>e",
];

/// Stream prefixes of redirections, longest first.
const REDIRECT_PREFIXES: &[&str] = &["err", "out", "all", "2", "1", "e", "o", "a", "&", ""];

/// Stream prefixes of pipes, longest first.
const PIPE_PREFIXES: &[&str] = &["err", "all", "e", "a", ""];

pub(crate) fn is_horizontal_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\x0C')
}

pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn ident_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    if !bytes.first().copied().is_some_and(is_ident_start) {
        return 0;
    }
    bytes.iter().take_while(|&&b| is_ident_continue(b)).count()
}

pub(crate) fn horizontal_space_len(text: &str) -> usize {
    text.bytes().take_while(|&b| is_horizontal_space(b)).count()
}

/// `\n` or `\r\n` at the start of `text`.
pub(crate) fn newline_len(text: &str) -> Option<usize> {
    if text.starts_with('\n') {
        Some(1)
    } else if text.starts_with("\r\n") {
        Some(2)
    } else {
        None
    }
}

/// Backslash line continuation at the start of `text`.
pub(crate) fn continuation_len(text: &str) -> Option<usize> {
    text.strip_prefix('\\').and_then(newline_len).map(|len| len + 1)
}

/// Bytes up to, not including, the next newline.
pub(crate) fn line_len(text: &str) -> usize {
    text.find(['\n', '\r']).unwrap_or(text.len())
}

/// Word boundary: end of input, whitespace, or a delimiter that ends words.
pub(crate) fn at_boundary(text: &str) -> bool {
    match text.as_bytes().first() {
        None => true,
        Some(&b) => {
            is_horizontal_space(b) || matches!(b, b'\n' | b'\r' | b')' | b']' | b';' | b'|')
        }
    }
}

/// `$(`, `$[`, `${`, `$NAME`, `@(`, `@$(`, `!(` or `![` at the start of `text`.
pub(crate) fn starts_sigil(text: &str) -> bool {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.get(1)) {
        (Some(b'$'), Some(&b)) => matches!(b, b'(' | b'[' | b'{') || is_ident_start(b),
        (Some(b'@'), Some(b'(')) => true,
        (Some(b'@'), Some(b'$')) => bytes.get(2) == Some(&b'('),
        (Some(b'!'), Some(b'(' | b'[')) => true,
        _ => false,
    }
}

/// Scans one shell word (or word piece) starting at the beginning of `text`.
///
/// Stops before whitespace, pipes, `&&`, sigils that start a new argument
/// piece and the frame's closing delimiter at depth zero. Same-kind opening
/// delimiters raise the depth, matching closers lower it.
pub(crate) fn scan_word(text: &str, ctx: WordContext, mut depth: u16) -> WordScan {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\x0C' | b'\n' | b'\r' | b'|' => break,
            b';' if ctx == WordContext::Line => break,
            b'&' if bytes.get(i + 1) == Some(&b'&') || at_boundary(&text[i + 1..]) => break,
            b'$' | b'@' | b'!' if starts_sigil(&text[i..]) => break,
            b'{' if i > 0 && brace_expansion_len(&text[i..]).is_some() => break,
            b'\'' => match text[i + 1..].find('\'') {
                Some(close) if ctx != WordContext::Line || !text[i + 1..i + 1 + close].contains('\n') => {
                    i += close + 2;
                }
                _ => return unterminated(text, i, ctx, depth),
            },
            b'"' => match closing_double_quote(&text[i + 1..], ctx) {
                Some(close) => i += close + 2,
                None => return unterminated(text, i, ctx, depth),
            },
            b'\\' => {
                i += 1;
                if let Some(c) = text[i..].chars().next() {
                    i += c.len_utf8();
                }
            }
            b'(' => {
                if ctx == WordContext::Paren {
                    depth = depth.saturating_add(1);
                }
                i += 1;
            }
            b')' if ctx == WordContext::Paren => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            b'[' => {
                if ctx == WordContext::Bracket {
                    depth = depth.saturating_add(1);
                }
                i += 1;
            }
            b']' if ctx == WordContext::Bracket => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    WordScan {
        len: i,
        depth,
        unterminated_quote: false,
    }
}

/// Offset of the closing `"` within `text` (which starts after the opening
/// quote), honoring backslash escapes. Line words may not span lines, not
/// even through an escaped newline: the quote ends where [`unterminated`]
/// would cut it.
fn closing_double_quote(text: &str, ctx: WordContext) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i),
            b'\\' if ctx == WordContext::Line && continuation_len(&text[i..]).is_some() => {
                return None;
            }
            b'\\' => i += 2,
            b'\n' if ctx == WordContext::Line => return None,
            _ => i += 1,
        }
    }
    None
}

/// An unclosed quote swallows the rest of the line (line frames) or the rest
/// of the input.
fn unterminated(text: &str, from: usize, ctx: WordContext, depth: u16) -> WordScan {
    let len = match ctx {
        WordContext::Line => from + line_len(&text[from..]),
        _ => text.len(),
    };
    WordScan {
        len,
        depth,
        unterminated_quote: true,
    }
}

/// Subprocess operator at word start: pipes, logical operators, background,
/// redirections and stream merges.
pub(crate) fn operator(text: &str, cmd_start: bool) -> Option<(SyntaxKind, usize)> {
    use SyntaxKind::*;

    if text.starts_with("&&") {
        return Some((SubprocessAnd, 2));
    }
    if text.starts_with("||") {
        return Some((SubprocessOr, 2));
    }
    if !cmd_start {
        for (word, kind) in [("and", SubprocessAnd), ("or", SubprocessOr)] {
            if text.starts_with(word) && at_boundary(&text[word.len()..]) && text.len() > word.len()
            {
                return Some((kind, word.len()));
            }
        }
    }

    for merge in STREAM_MERGES {
        if text.starts_with(merge) && at_boundary(&text[merge.len()..]) {
            return Some((StreamMerge, merge.len()));
        }
    }

    for prefix in PIPE_PREFIXES {
        if let Some(rest) = text.strip_prefix(prefix)
            && rest.starts_with('|')
            && !rest.starts_with("||")
        {
            return Some((SubprocessPipe, prefix.len() + 1));
        }
    }

    for prefix in REDIRECT_PREFIXES {
        let Some(rest) = text.strip_prefix(prefix) else {
            continue;
        };
        if rest.starts_with(">>") {
            return Some((Redirect, prefix.len() + 2));
        }
        if rest.starts_with('>') {
            return Some((Redirect, prefix.len() + 1));
        }
    }
    if text.starts_with('<') {
        return Some((Redirect, 1));
    }

    if text.starts_with('&') && at_boundary(&text[1..]) {
        return Some((Background, 1));
    }

    None
}

/// `$NAME=value` at command start: returns the length including the value.
pub(crate) fn env_prefix_len(text: &str, ctx: WordContext) -> Option<usize> {
    let name = text.strip_prefix('$')?;
    let len = ident_len(name);
    if len == 0 || name.as_bytes().get(len) != Some(&b'=') {
        return None;
    }
    let head = 1 + len + 1;
    let value = scan_word(&text[head..], ctx, 0);
    if value.unterminated_quote {
        return None;
    }
    Some(head + value.len)
}

/// `{a,b}`, `{a,{b,c}}` or `{1..9}` at the start of `text`.
///
/// The group needs a `,` or `..` at its own level and may not hold blanks,
/// quotes, sigils or command punctuation, so `{}` and `{ x }` stay words.
pub(crate) fn brace_expansion_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut depth = 0u32;
    let mut expands = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return expands.then_some(i + 1);
                }
            }
            b',' if depth == 1 => expands = true,
            b'.' if depth == 1 && bytes.get(i + 1) == Some(&b'.') => expands = true,
            b'\\' if !matches!(bytes.get(i + 1), None | Some(b'\n' | b'\r')) => i += 1,
            b' ' | b'\t' | b'\x0C' | b'\n' | b'\r' | b'\\' => return None,
            b'\'' | b'"' | b'`' | b'$' | b'@' => return None,
            b'(' | b')' | b'[' | b']' | b';' | b'|' | b'&' | b'<' | b'>' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// `name!` before a blank or the line end: a command taking the rest of
/// the line as one raw argument. Returns the length of the name.
pub(crate) fn macro_name_len(text: &str) -> Option<usize> {
    let len = ident_len(text);
    if len == 0 {
        return None;
    }
    let after = text[len..].strip_prefix('!')?;
    match after.as_bytes().first() {
        None | Some(b'\n' | b'\r') => Some(len),
        Some(&b) if is_horizontal_space(b) => Some(len),
        _ => None,
    }
}

/// `@name` modifier in command position.
pub(crate) fn modifier_len(text: &str) -> Option<usize> {
    let name = text.strip_prefix('@')?;
    let len = ident_len(name);
    (len > 0 && at_boundary(&name[len..])).then_some(len + 1)
}
