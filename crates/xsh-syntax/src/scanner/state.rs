//! Scanner state: the mode stack and layout bookkeeping threaded through
//! scanning.
//!
//! Everything the scanner knows about the text behind the cursor lives here,
//! so a state decoded from a checkpoint resumes scanning with exactly the
//! decisions the original scan would have made.

use crate::cst::{SyntaxKind, TokenSet, token_sets};

/// Version byte leading every encoded state. Bump on any layout or
/// behavior change of the scanner.
pub const STATE_FORMAT_VERSION: u8 = 2;

/// Frames above this depth are refused; the opener falls back to the
/// default lexer.
pub const MAX_MODE_DEPTH: usize = 255;

/// Indentation levels above this depth are treated as the deepest level.
pub const MAX_INDENT_DEPTH: usize = 100;

/// Which delimiter closes an interpolation region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Closer {
    /// `@( ... )`
    Paren,
    /// `${ ... }`
    Brace,
}

/// One frame of the mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Host expression grammar. Only ever the bottom frame.
    Normal { brackets: u16 },
    /// Shell words inside `$(`, `!(` or `@$(`.
    SubprocParen { depth: u16 },
    /// Shell words inside `$[` or `![`.
    SubprocBracket { depth: u16 },
    /// Bare subprocess statement, closed by the end of the line.
    SubprocLine,
    /// Host expression inside `@(` or `${`.
    Interp { brackets: u16, closer: Closer },
}

impl Mode {
    pub fn is_subprocess(self) -> bool {
        matches!(
            self,
            Mode::SubprocParen { .. } | Mode::SubprocBracket { .. } | Mode::SubprocLine
        )
    }

    fn tag(self) -> u8 {
        match self {
            Mode::Normal { .. } => 0,
            Mode::SubprocParen { .. } => 1,
            Mode::SubprocBracket { .. } => 2,
            Mode::SubprocLine => 3,
            Mode::Interp {
                closer: Closer::Paren,
                ..
            } => 4,
            Mode::Interp {
                closer: Closer::Brace,
                ..
            } => 5,
        }
    }

    fn counter(self) -> u16 {
        match self {
            Mode::Normal { brackets } | Mode::Interp { brackets, .. } => brackets,
            Mode::SubprocParen { depth } | Mode::SubprocBracket { depth } => depth,
            Mode::SubprocLine => 0,
        }
    }

    fn from_parts(tag: u8, counter: u16) -> Result<Self, StateError> {
        Ok(match tag {
            0 => Mode::Normal { brackets: counter },
            1 => Mode::SubprocParen { depth: counter },
            2 => Mode::SubprocBracket { depth: counter },
            3 if counter == 0 => Mode::SubprocLine,
            3 => return Err(StateError::BadCounter),
            4 => Mode::Interp {
                brackets: counter,
                closer: Closer::Paren,
            },
            5 => Mode::Interp {
                brackets: counter,
                closer: Closer::Brace,
            },
            other => return Err(StateError::UnknownMode(other)),
        })
    }
}

/// Progress through a `cmd! raw text` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum MacroStage {
    #[default]
    None,
    /// The command name is out, its `!` comes next.
    Bang,
    /// The rest of the line is one raw argument.
    Argument,
}

/// A decoded state failed its consistency checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("scanner state is empty")]
    Empty,
    #[error("scanner state version {found} does not match {STATE_FORMAT_VERSION}")]
    Version { found: u8 },
    #[error("scanner state truncated")]
    Truncated,
    #[error("unknown scanner mode tag {0}")]
    UnknownMode(u8),
    #[error("mode stack must start with a single normal frame")]
    BadBaseFrame,
    #[error("subprocess line frame must sit directly on the base frame")]
    BadLineFrame,
    #[error("subprocess line frame with a counter or inside brackets")]
    BadCounter,
    #[error("mode stack deeper than {MAX_MODE_DEPTH}")]
    TooDeep,
    #[error("indentation stack must start at column 0 and strictly increase")]
    BadIndents,
    #[error("{0} pending dedents outside the layout level")]
    BadPendingDedents(u16),
    #[error("unknown flag bits {0:#04x}")]
    BadFlags(u8),
    #[error("macro flags outside a subprocess line")]
    BadMacroFlags,
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
}

const FLAG_LINE_START: u8 = 1 << 0;
const FLAG_STMT_START: u8 = 1 << 1;
const FLAG_CMD_START: u8 = 1 << 2;
const FLAG_INDENT_COLUMN: u8 = 1 << 3;
const FLAG_AFTER_NAME: u8 = 1 << 4;
const FLAG_MACRO_BANG: u8 = 1 << 5;
const FLAG_MACRO_ARGUMENT: u8 = 1 << 6;
const KNOWN_FLAGS: u8 = FLAG_LINE_START
    | FLAG_STMT_START
    | FLAG_CMD_START
    | FLAG_INDENT_COLUMN
    | FLAG_AFTER_NAME
    | FLAG_MACRO_BANG
    | FLAG_MACRO_ARGUMENT;

/// Mode stack plus layout flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannerState {
    modes: Vec<Mode>,
    indents: Vec<u16>,
    pending_dedents: u16,
    /// Width of the leading whitespace of the current line, once measured.
    indent_column: Option<u16>,
    /// No significant token seen on the current logical line yet.
    line_start: bool,
    /// Next significant token begins a statement.
    stmt_start: bool,
    /// Next word in the top subprocess frame begins a command.
    cmd_start: bool,
    /// Last token was an identifier from the default lexer, so `!(` right
    /// here opens macro arguments.
    after_name: bool,
    macro_stage: MacroStage,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerState {
    pub fn new() -> Self {
        Self {
            modes: vec![Mode::Normal { brackets: 0 }],
            indents: vec![0],
            pending_dedents: 0,
            indent_column: None,
            line_start: true,
            stmt_start: true,
            cmd_start: false,
            after_name: false,
            macro_stage: MacroStage::None,
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn depth(&self) -> usize {
        self.modes.len()
    }

    pub fn top(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Normal { brackets: 0 })
    }

    /// Only the base frame is on the stack.
    pub fn is_normal(&self) -> bool {
        self.modes.len() == 1
    }

    pub fn indents(&self) -> &[u16] {
        &self.indents
    }

    pub fn at_statement_start(&self) -> bool {
        self.stmt_start
    }

    pub(crate) fn line_start(&self) -> bool {
        self.line_start
    }

    pub(crate) fn cmd_start(&self) -> bool {
        self.cmd_start
    }

    pub(crate) fn after_name(&self) -> bool {
        self.after_name
    }

    pub(crate) fn clear_after_name(&mut self) {
        self.after_name = false;
    }

    pub(crate) fn macro_stage(&self) -> MacroStage {
        self.macro_stage
    }

    pub(crate) fn set_macro_stage(&mut self, stage: MacroStage) {
        self.macro_stage = stage;
    }

    pub(crate) fn set_cmd_start(&mut self, value: bool) {
        self.cmd_start = value;
    }

    pub(crate) fn set_stmt_start(&mut self, value: bool) {
        self.stmt_start = value;
    }

    /// Base frame with no open brackets: newlines are significant.
    pub(crate) fn at_layout_level(&self) -> bool {
        matches!(self.modes.as_slice(), [Mode::Normal { brackets: 0 }])
    }

    pub(crate) fn can_push(&self) -> bool {
        self.modes.len() < MAX_MODE_DEPTH
    }

    pub(crate) fn push(&mut self, mode: Mode) {
        debug_assert!(self.can_push());
        self.modes.push(mode);
        self.cmd_start = mode.is_subprocess();
    }

    /// Pops the top frame, never the base one.
    pub(crate) fn pop(&mut self) {
        if self.modes.len() > 1 {
            self.modes.pop();
        }
        self.cmd_start = false;
        self.macro_stage = MacroStage::None;
    }

    /// Drops every frame above the base one.
    pub(crate) fn pop_all(&mut self) {
        self.modes.truncate(1);
        self.cmd_start = false;
        self.macro_stage = MacroStage::None;
    }

    pub(crate) fn top_mut(&mut self) -> &mut Mode {
        let last = self.modes.len() - 1;
        &mut self.modes[last]
    }

    pub(crate) fn begin_line(&mut self) {
        self.line_start = true;
        self.stmt_start = true;
        self.indent_column = None;
    }

    pub(crate) fn record_indent_column(&mut self, column: u16) {
        self.indent_column = Some(column);
    }

    /// Resolves indentation at the first significant character of a line.
    ///
    /// Returns the layout token to emit, if any. Further dedents are queued.
    pub(crate) fn settle_indentation(&mut self) -> Option<SyntaxKind> {
        self.line_start = false;
        let column = self.indent_column.take().unwrap_or(0);
        let current = self.indents.last().copied().unwrap_or(0);

        if column > current {
            if self.indents.len() >= MAX_INDENT_DEPTH {
                return None;
            }
            self.indents.push(column);
            return Some(SyntaxKind::Indent);
        }

        let mut dedents = 0u16;
        while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| top > column) {
            self.indents.pop();
            dedents += 1;
        }
        if dedents == 0 {
            return None;
        }
        self.pending_dedents = dedents - 1;
        Some(SyntaxKind::Dedent)
    }

    pub(crate) fn take_pending_dedent(&mut self) -> bool {
        if self.pending_dedents == 0 {
            return false;
        }
        self.pending_dedents -= 1;
        true
    }

    /// Pops one indentation level at end of input.
    pub(crate) fn close_indent(&mut self) -> bool {
        if self.indents.len() > 1 {
            self.indents.pop();
            return true;
        }
        false
    }

    /// Token kinds the scanner may produce from this state.
    pub fn valid_symbols(&self) -> TokenSet {
        use SyntaxKind::*;

        let openers = if self.can_push() {
            token_sets::MODE_OPENERS
        } else {
            TokenSet::EMPTY
        };

        let set = match self.top() {
            Mode::Normal { brackets } => {
                let mut set = openers
                    .without(TokenSet::single(AtParen))
                    .union(TokenSet::new(&[EnvVariable, LineBreak]));
                if brackets == 0 {
                    set = set.union(token_sets::LAYOUT);
                    if self.stmt_start {
                        set = set.union(TokenSet::new(&[SubprocessWord, EnvPrefix, Xontrib]));
                    }
                }
                set
            }
            Mode::Interp { closer, .. } => {
                let close = match closer {
                    Closer::Paren => ParenClose,
                    Closer::Brace => BraceClose,
                };
                openers
                    .without(TokenSet::single(AtParen))
                    .union(TokenSet::new(&[EnvVariable, LineBreak, Unterminated, close]))
            }
            mode => {
                let mut set = openers.union(TokenSet::new(&[
                    EnvVariable,
                    SubprocessWord,
                    SubprocessPipe,
                    SubprocessAnd,
                    SubprocessOr,
                    Background,
                    Redirect,
                    StreamMerge,
                    BraceExpansion,
                    LexError,
                    Whitespace,
                    Comment,
                ]));
                if self.cmd_start {
                    set = set.union(TokenSet::new(&[EnvPrefix, SubprocessModifier]));
                }
                match self.macro_stage {
                    MacroStage::None => {}
                    MacroStage::Bang => set = set.union(TokenSet::single(Bang)),
                    MacroStage::Argument => set = set.union(TokenSet::single(MacroArgument)),
                }
                set.union(match mode {
                    Mode::SubprocParen { .. } => TokenSet::new(&[ParenClose, LineBreak, Unterminated]),
                    Mode::SubprocBracket { .. } => {
                        TokenSet::new(&[BracketClose, LineBreak, Unterminated])
                    }
                    _ => TokenSet::new(&[Newline, Semicolon]),
                })
            }
        };

        if self.pending_dedents > 0 {
            set.union(TokenSet::single(Dedent))
        } else {
            set
        }
    }

    /// Bookkeeping for a token produced by the default lexer.
    pub(crate) fn observe(&mut self, kind: SyntaxKind) {
        use SyntaxKind::*;

        self.after_name = kind == Name;
        if kind.is_trivia() {
            return;
        }
        self.line_start = false;
        self.cmd_start = false;

        match self.top_mut() {
            Mode::Normal { brackets } | Mode::Interp { brackets, .. } => match kind {
                ParenOpen | BracketOpen | BraceOpen => *brackets = brackets.saturating_add(1),
                ParenClose | BracketClose | BraceClose => *brackets = brackets.saturating_sub(1),
                _ => {}
            },
            _ => {}
        }

        self.stmt_start = self.at_layout_level() && matches!(kind, Semicolon | Colon);
    }

    /// Compact, versioned byte encoding.
    ///
    /// Layout: version, flags, pending dedents (u16 LE), indent column
    /// (u16 LE, present with its flag), mode count (u8) followed by one tag
    /// byte and a u16 LE counter per frame, indent count (u8) followed by u16
    /// LE columns.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.modes.len() * 3 + self.indents.len() * 2);
        out.push(STATE_FORMAT_VERSION);

        let mut flags = 0;
        if self.line_start {
            flags |= FLAG_LINE_START;
        }
        if self.stmt_start {
            flags |= FLAG_STMT_START;
        }
        if self.cmd_start {
            flags |= FLAG_CMD_START;
        }
        if self.indent_column.is_some() {
            flags |= FLAG_INDENT_COLUMN;
        }
        if self.after_name {
            flags |= FLAG_AFTER_NAME;
        }
        flags |= match self.macro_stage {
            MacroStage::None => 0,
            MacroStage::Bang => FLAG_MACRO_BANG,
            MacroStage::Argument => FLAG_MACRO_ARGUMENT,
        };
        out.push(flags);
        out.extend_from_slice(&self.pending_dedents.to_le_bytes());
        if let Some(column) = self.indent_column {
            out.extend_from_slice(&column.to_le_bytes());
        }

        out.push(self.modes.len() as u8);
        for mode in &self.modes {
            out.push(mode.tag());
            out.extend_from_slice(&mode.counter().to_le_bytes());
        }

        out.push(self.indents.len() as u8);
        for column in &self.indents {
            out.extend_from_slice(&column.to_le_bytes());
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        let mut reader = Reader { bytes, pos: 0 };

        let version = reader.u8().map_err(|_| StateError::Empty)?;
        if version != STATE_FORMAT_VERSION {
            return Err(StateError::Version { found: version });
        }

        let flags = reader.u8()?;
        if flags & !KNOWN_FLAGS != 0 {
            return Err(StateError::BadFlags(flags & !KNOWN_FLAGS));
        }
        let macro_stage = match (flags & FLAG_MACRO_BANG != 0, flags & FLAG_MACRO_ARGUMENT != 0) {
            (false, false) => MacroStage::None,
            (true, false) => MacroStage::Bang,
            (false, true) => MacroStage::Argument,
            (true, true) => return Err(StateError::BadMacroFlags),
        };
        let pending_dedents = reader.u16()?;
        let indent_column = if flags & FLAG_INDENT_COLUMN != 0 {
            Some(reader.u16()?)
        } else {
            None
        };

        let mode_count = reader.u8()? as usize;
        let mut modes = Vec::with_capacity(mode_count);
        for _ in 0..mode_count {
            let tag = reader.u8()?;
            let counter = reader.u16()?;
            modes.push(Mode::from_parts(tag, counter)?);
        }

        let indent_count = reader.u8()? as usize;
        let mut indents = Vec::with_capacity(indent_count);
        for _ in 0..indent_count {
            indents.push(reader.u16()?);
        }

        if reader.pos != bytes.len() {
            return Err(StateError::TrailingBytes(bytes.len() - reader.pos));
        }

        let state = Self {
            modes,
            indents,
            pending_dedents,
            indent_column,
            line_start: flags & FLAG_LINE_START != 0,
            stmt_start: flags & FLAG_STMT_START != 0,
            cmd_start: flags & FLAG_CMD_START != 0,
            after_name: flags & FLAG_AFTER_NAME != 0,
            macro_stage,
        };
        state.validate()?;
        Ok(state)
    }

    fn validate(&self) -> Result<(), StateError> {
        let Some((base, rest)) = self.modes.split_first() else {
            return Err(StateError::BadBaseFrame);
        };
        if !matches!(base, Mode::Normal { .. }) {
            return Err(StateError::BadBaseFrame);
        }
        if self.modes.len() > MAX_MODE_DEPTH {
            return Err(StateError::TooDeep);
        }
        for (i, mode) in rest.iter().enumerate() {
            match mode {
                Mode::Normal { .. } => return Err(StateError::BadBaseFrame),
                Mode::SubprocLine if i != 0 => return Err(StateError::BadLineFrame),
                _ => {}
            }
        }
        if self.modes.iter().any(|m| *m == Mode::SubprocLine) && base.counter() != 0 {
            return Err(StateError::BadCounter);
        }

        if self.indents.first() != Some(&0)
            || self.indents.len() > MAX_INDENT_DEPTH
            || self.indents.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(StateError::BadIndents);
        }
        if self.pending_dedents > 0 && !self.at_layout_level() {
            return Err(StateError::BadPendingDedents(self.pending_dedents));
        }
        if self.macro_stage != MacroStage::None && self.top() != Mode::SubprocLine {
            return Err(StateError::BadMacroFlags);
        }
        Ok(())
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn u8(&mut self) -> Result<u8, StateError> {
        let byte = *self.bytes.get(self.pos).ok_or(StateError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    fn u16(&mut self) -> Result<u16, StateError> {
        let lo = self.u8()?;
        let hi = self.u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }
}
