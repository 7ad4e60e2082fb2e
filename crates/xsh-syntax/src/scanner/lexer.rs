//! Token stream: the external scanner first, the logos-derived default
//! lexer when it declines.
//!
//! Produces span-based tokens without storing text - text is sliced from
//! source only when needed.
//!
//! ## Error handling
//!
//! Consecutive characters no rule accepts are coalesced into one `Garbage`
//! token. Coalescing stops at characters the scanner may claim (`$`, `!`,
//! `@`) and at line ends, so layout and sigils survive garbage.

use logos::Logos;
use rowan::{TextRange, TextSize};

use super::external;
use super::state::ScannerState;
use crate::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

/// Resumable tokenizer over a whole source text.
///
/// Offsets are absolute, also when resumed in the middle of the text.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    state: ScannerState,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::resume(source, TextSize::from(0), ScannerState::new())
    }

    /// Continues scanning at `offset` as if everything before it had been
    /// scanned ending in `state`.
    pub fn resume(source: &'src str, offset: TextSize, state: ScannerState) -> Self {
        Self {
            source,
            offset: usize::from(offset).min(source.len()),
            state,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn offset(&self) -> TextSize {
        TextSize::from(self.offset as u32)
    }

    /// State the next token will be scanned from.
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let valid = self.state.valid_symbols();
        if let Some(token) = external::scan(&mut self.state, self.source, self.offset, valid) {
            self.offset = usize::from(token.span.end());
            return Some(token);
        }

        if self.offset >= self.source.len() {
            return None;
        }

        let token = self.default_token();
        self.state.observe(token.kind);
        self.offset = usize::from(token.span.end());
        Some(token)
    }

    /// One token from the context-free rules.
    fn default_token(&self) -> Token {
        let start = self.offset;
        let mut lexer = SyntaxKind::lexer(&self.source[start..]);
        match lexer.next() {
            Some(Ok(kind)) => Token::new(kind, span(start, start + lexer.span().end)),
            _ => {
                let end = self.garbage_end(start + lexer.span().end.max(1));
                Token::new(SyntaxKind::Garbage, span(start, end))
            }
        }
    }

    fn garbage_end(&self, mut end: usize) -> usize {
        while end < self.source.len() {
            let rest = &self.source[end..];
            if rest.starts_with(['$', '!', '@', '\n', '\r']) {
                break;
            }
            let mut lexer = SyntaxKind::lexer(rest);
            match lexer.next() {
                Some(Err(())) => end += lexer.span().end.max(1),
                _ => break,
            }
        }
        ceil_char_boundary(self.source, end)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn span(start: usize, end: usize) -> TextRange {
    TextRange::new((start as u32).into(), (end as u32).into())
}

fn ceil_char_boundary(source: &str, mut index: usize) -> usize {
    while index < source.len() && !source.is_char_boundary(index) {
        index += 1;
    }
    index.min(source.len())
}

/// Tokenizes a whole source text from a fresh state.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
