//! Parser state machine and low-level operations.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};
use tracing::trace;

use crate::Error;
use crate::cancel::CancellationFlag;
use crate::cst::{SyntaxKind, TokenSet};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::scanner::{Lexer, ScannerState, Token, token_text};
use crate::tree;

/// Everything a finished parse hands back.
#[derive(Debug)]
pub struct ParseOutput {
    pub green: GreenNode,
    pub diagnostics: Diagnostics,
    pub checkpoints: Vec<tree::Checkpoint>,
    pub exec_fuel_consumed: u32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenDelimiter {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

/// Recursive descent over a lazily scanned token stream.
///
/// Trivia tokens are buffered and flushed when starting a new node. Tokens
/// are pulled from the scanner on demand, so a resumed parse that stops
/// early never scans the rest of the input.
pub struct Parser<'src> {
    pub(crate) source: &'src str,
    lexer: Lexer<'src>,
    lexer_done: bool,
    pub(crate) tokens: Vec<Token>,
    /// Scanner state before token `i`, kept where a statement may begin.
    snapshots: Vec<(usize, ScannerState)>,
    pub(crate) pos: usize,
    pub(crate) trivia_buffer: Vec<Token>,
    pub(crate) builder: GreenNodeBuilder<'static>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) checkpoints: Vec<tree::Checkpoint>,
    pub(crate) depth: u32,
    pub(crate) last_diagnostic_pos: Option<TextSize>,
    pub(crate) delimiter_stack: Vec<OpenDelimiter>,
    pub(crate) debug_fuel: Cell<u32>,
    exec_fuel_initial: Option<u32>,
    exec_fuel_remaining: Option<u32>,
    recursion_fuel_limit: Option<u32>,
    cancellation: Option<CancellationFlag>,
    fatal_error: Option<Error>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_lexer(Lexer::new(source))
    }

    /// Parser whose tokens continue a scan that stopped at `offset` in
    /// `state`.
    pub fn resume(source: &'src str, offset: TextSize, state: ScannerState) -> Self {
        Self::with_lexer(Lexer::resume(source, offset, state))
    }

    fn with_lexer(lexer: Lexer<'src>) -> Self {
        Self {
            source: lexer.source(),
            lexer,
            lexer_done: false,
            tokens: Vec::with_capacity(64),
            snapshots: Vec::new(),
            pos: 0,
            trivia_buffer: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            checkpoints: Vec::new(),
            depth: 0,
            last_diagnostic_pos: None,
            delimiter_stack: Vec::with_capacity(8),
            debug_fuel: Cell::new(256),
            exec_fuel_initial: None,
            exec_fuel_remaining: None,
            recursion_fuel_limit: None,
            cancellation: None,
            fatal_error: None,
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel_initial = limit;
        self.exec_fuel_remaining = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel_limit = limit;
        self
    }

    pub fn with_cancellation(mut self, flag: Option<CancellationFlag>) -> Self {
        self.cancellation = flag;
        self
    }

    /// Parses a whole module.
    pub fn parse(mut self) -> Result<ParseOutput, Error> {
        self.parse_module();
        self.finish()
    }

    pub(crate) fn finish(mut self) -> Result<ParseOutput, Error> {
        self.drain_trivia();
        if let Some(err) = self.fatal_error {
            return Err(err);
        }
        let exec_fuel_consumed = match (self.exec_fuel_initial, self.exec_fuel_remaining) {
            (Some(initial), Some(remaining)) => initial.saturating_sub(remaining),
            _ => 0,
        };
        Ok(ParseOutput {
            green: self.builder.finish(),
            diagnostics: self.diagnostics,
            checkpoints: self.checkpoints,
            exec_fuel_consumed,
        })
    }

    pub(crate) fn has_fatal_error(&self) -> bool {
        self.fatal_error.is_some()
    }

    /// Makes sure token `index` is scanned. Returns `false` past the end.
    fn fill(&mut self, index: usize) -> bool {
        while self.tokens.len() <= index && !self.lexer_done {
            let state = self.lexer.state();
            if state.at_statement_start() && state.is_normal() {
                self.snapshots.push((self.tokens.len(), state.clone()));
            }
            match self.lexer.next_token() {
                Some(token) => {
                    self.report_lexical_error(token);
                    self.tokens.push(token);
                }
                None => self.lexer_done = true,
            }
        }
        index < self.tokens.len()
    }

    fn report_lexical_error(&mut self, token: Token) {
        let kind = match token.kind {
            SyntaxKind::Garbage => DiagnosticKind::InvalidCharacter,
            SyntaxKind::LexError => DiagnosticKind::UnterminatedString,
            _ => return,
        };
        self.diagnostics.report(kind, token.span).emit();
    }

    /// Scanner state the token at `index` was scanned from, when it was
    /// scanned in statement position.
    pub(crate) fn snapshot_at(&self, index: usize) -> Option<&ScannerState> {
        self.snapshots
            .binary_search_by_key(&index, |(i, _)| *i)
            .ok()
            .map(|found| &self.snapshots[found].1)
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.nth_raw(0)
    }

    fn reset_debug_fuel(&self) {
        self.debug_fuel.set(256);
    }

    /// Raw lookahead, trivia included. `Error` stands for end of input.
    pub(crate) fn nth_raw(&mut self, lookahead: usize) -> SyntaxKind {
        self.ensure_progress();
        let index = self.pos + lookahead;
        if self.fill(index) {
            self.tokens[index].kind
        } else {
            SyntaxKind::Error
        }
    }

    fn consume_exec_fuel(&mut self) {
        if let Some(flag) = &self.cancellation
            && flag.is_cancelled()
        {
            if self.fatal_error.is_none() {
                self.fatal_error = Some(Error::Cancelled);
            }
            return;
        }
        if let Some(ref mut remaining) = self.exec_fuel_remaining {
            if *remaining == 0 {
                if self.fatal_error.is_none() {
                    trace!("exec fuel exhausted");
                    self.fatal_error = Some(Error::ExecFuelExhausted);
                }
                return;
            }
            *remaining -= 1;
        }
    }

    pub(crate) fn current_span(&mut self) -> TextRange {
        self.skip_trivia_to_buffer();
        if self.fill(self.pos) {
            self.tokens[self.pos].span
        } else {
            TextRange::empty(self.eof_offset())
        }
    }

    pub(crate) fn eof_offset(&self) -> TextSize {
        TextSize::from(self.source.len() as u32)
    }

    pub(crate) fn eof(&mut self) -> bool {
        !self.fill(self.pos)
    }

    pub(crate) fn should_stop(&mut self) -> bool {
        self.has_fatal_error() || self.eof()
    }

    pub(crate) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// LL(k) lookahead past trivia.
    pub(crate) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        let mut count = 0;
        let mut index = self.pos;
        while self.fill(index) {
            let kind = self.tokens[index].kind;
            if !kind.is_trivia() {
                if count == n {
                    return kind;
                }
                count += 1;
            }
            index += 1;
        }
        SyntaxKind::Error
    }

    pub(crate) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.peek_nth(1) == kind
    }

    /// The next raw token continues the current one without trivia between.
    pub(crate) fn adjacent_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.nth_raw(0))
    }

    pub(crate) fn skip_trivia_to_buffer(&mut self) {
        while self.fill(self.pos) && self.tokens[self.pos].kind.is_trivia() {
            self.trivia_buffer.push(self.tokens[self.pos]);
            self.pos += 1;
        }
    }

    pub(crate) fn drain_trivia(&mut self) {
        for token in self.trivia_buffer.drain(..) {
            let text = token_text(self.source, &token);
            self.builder.token(token.kind.into(), text);
        }
    }

    pub(crate) fn eat_trivia(&mut self) {
        self.skip_trivia_to_buffer();
        self.drain_trivia();
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.drain_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at EOF");
        self.reset_debug_fuel();
        self.consume_exec_fuel();

        self.drain_trivia();

        let token = self.tokens[self.pos];
        let text = token_text(self.source, &token);
        self.builder.token(token.kind.into(), text);
        self.pos += 1;
    }

    pub(crate) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        if self.currently_is(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Zero-width stand-in for a required element that is absent.
    pub(crate) fn missing(&mut self, kind: SyntaxKind) {
        self.start_node(SyntaxKind::Missing);
        self.builder.token(kind.into(), "");
        self.finish_node();
    }

    /// On mismatch: emit diagnostic and insert a `Missing` node of the
    /// expected kind without consuming.
    pub(crate) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::ExpectedToken, what);
        self.missing(kind);
        false
    }

    pub(crate) fn current_suppression_span(&mut self) -> TextRange {
        let eof = self.eof_offset();
        self.delimiter_stack
            .last()
            .map(|d| TextRange::new(d.span.start(), eof))
            .unwrap_or_else(|| self.current_span())
    }

    fn should_report(&mut self, pos: TextSize) -> bool {
        if self.last_diagnostic_pos == Some(pos) {
            return false;
        }
        self.last_diagnostic_pos = Some(pos);
        true
    }

    fn bump_as_error(&mut self) {
        if !self.eof() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    fn get_error_ranges(&mut self) -> Option<(TextRange, TextRange)> {
        let range = self.current_span();
        // Lexical errors were reported when scanned.
        if matches!(self.current(), SyntaxKind::Garbage | SyntaxKind::LexError) {
            return None;
        }
        if !self.should_report(range.start()) {
            return None;
        }
        let suppression = self.current_suppression_span();
        Some((range, suppression))
    }

    pub(crate) fn error(&mut self, kind: DiagnosticKind) {
        let Some((range, suppression)) = self.get_error_ranges() else {
            return;
        };
        self.diagnostics
            .report(kind, range)
            .suppression_range(suppression)
            .emit();
    }

    pub(crate) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let Some((range, suppression)) = self.get_error_ranges() else {
            return;
        };
        self.diagnostics
            .report(kind, range)
            .message(message)
            .suppression_range(suppression)
            .emit();
    }

    pub(crate) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    pub(crate) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Reports, then wraps everything up to the next recovery token into one
    /// `Error` node.
    pub(crate) fn error_recover(&mut self, kind: DiagnosticKind, message: &str, recovery: TokenSet) {
        if self.currently_is_one_of(recovery) || self.should_stop() {
            self.error_msg(kind, message);
            return;
        }

        trace!(?kind, at = u32::from(self.current_span().start()), "recovering");
        self.start_node(SyntaxKind::Error);
        self.error_msg(kind, message);
        while !self.currently_is_one_of(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    pub(crate) fn enter_recursion(&mut self) -> bool {
        if let Some(limit) = self.recursion_fuel_limit
            && self.depth >= limit
        {
            if self.fatal_error.is_none() {
                trace!(depth = self.depth, "recursion limit reached");
                self.fatal_error = Some(Error::RecursionLimitExceeded);
            }
            return false;
        }
        self.depth += 1;
        self.reset_debug_fuel();
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.reset_debug_fuel();
    }

    pub(crate) fn push_delimiter(&mut self, kind: SyntaxKind) {
        let span = self.current_span();
        self.delimiter_stack.push(OpenDelimiter { kind, span });
    }

    pub(crate) fn pop_delimiter(&mut self) -> Option<OpenDelimiter> {
        self.delimiter_stack.pop()
    }

    pub(crate) fn error_unclosed_delimiter(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        related_msg: impl Into<String>,
        open_range: TextRange,
    ) {
        let current = self.current_span();
        if !self.should_report(current.start()) {
            return;
        }
        // Use full range for easier downstream error suppression
        let full_range = TextRange::new(open_range.start(), current.end());
        self.diagnostics
            .report(kind, full_range)
            .message(message)
            .related_to(related_msg, open_range)
            .emit();
    }

    pub(crate) fn report_with_fix(
        &mut self,
        kind: DiagnosticKind,
        range: TextRange,
        fix_description: impl Into<String>,
        fix_replacement: impl Into<String>,
    ) {
        if !self.should_report(range.start()) {
            return;
        }
        self.diagnostics
            .report(kind, range)
            .fix(fix_description, fix_replacement)
            .emit();
    }

    /// Records a resume point when the current token starts a statement
    /// scanned from the base frame.
    pub(crate) fn record_checkpoint(&mut self) {
        self.skip_trivia_to_buffer();
        if !self.fill(self.pos) {
            return;
        }
        let offset = self.tokens[self.pos].span.start();
        if self.checkpoints.last().is_some_and(|c| c.offset == offset) {
            return;
        }
        let Some(state) = self.snapshot_at(self.pos) else {
            return;
        };
        let state = state.encode().into_boxed_slice();
        self.checkpoints.push(tree::Checkpoint { offset, state });
    }
}
