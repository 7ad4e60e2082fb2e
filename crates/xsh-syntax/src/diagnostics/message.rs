use rowan::{TextRange, TextSize};
use serde::{Deserialize, Serialize};

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics have overlapping spans, the higher-priority one
/// suppresses the lower-priority one. This prevents cascading error noise.
///
/// Priority rationale:
/// - Unclosed delimiters swallow everything up to the end of their region
/// - Expected-something errors are root causes the user should fix first
/// - Lexical errors pin down a bad character or quote
/// - Misplaced tokens are often consequences of earlier errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    // These cause cascading errors throughout the rest of the region
    UnclosedParen,
    UnclosedBracket,
    UnclosedBrace,
    UnterminatedSubprocess,

    // User omitted something required - root cause errors
    ExpectedExpression,
    ExpectedName,
    ExpectedCommand,
    ExpectedIndentedBlock,
    ExpectedToken,
    ExpectedNewline,

    // Scanner could not classify the input
    UnterminatedString,
    InvalidCharacter,

    // User wrote something that doesn't belong
    UnexpectedIndent,
    UnexpectedToken,

    // Valid, but worth a look
    RedundantSemicolon,
}

impl DiagnosticKind {
    /// Default severity for this kind.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::RedundantSemicolon => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind suppresses `other` when spans overlap.
    ///
    /// Uses enum discriminant ordering: lower position = higher priority.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Unclosed regions cascade, but a root cause at the same position wins.
    pub fn is_structural_error(&self) -> bool {
        matches!(
            self,
            Self::UnclosedParen
                | Self::UnclosedBracket
                | Self::UnclosedBrace
                | Self::UnterminatedSubprocess
        )
    }

    /// Root cause errors - user omitted something required.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedExpression
                | Self::ExpectedName
                | Self::ExpectedCommand
                | Self::ExpectedIndentedBlock
                | Self::ExpectedToken
                | Self::ExpectedNewline
        )
    }

    /// Lexical errors come from `Garbage` and `LexError` tokens.
    pub fn is_lexical_error(&self) -> bool {
        matches!(self, Self::UnterminatedString | Self::InvalidCharacter)
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedParen => "missing closing `)`",
            Self::UnclosedBracket => "missing closing `]`",
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnterminatedSubprocess => "unterminated subprocess",

            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedName => "expected a name",
            Self::ExpectedCommand => "expected a command",
            Self::ExpectedIndentedBlock => "expected an indented block",
            Self::ExpectedToken => "expected token",
            Self::ExpectedNewline => "expected end of statement",

            Self::UnterminatedString => "unterminated string",
            Self::InvalidCharacter => "invalid character",

            Self::UnexpectedIndent => "unexpected indent",
            Self::UnexpectedToken => "unexpected token",

            Self::RedundantSemicolon => "redundant `;`",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnclosedParen
            | Self::UnclosedBracket
            | Self::UnclosedBrace
            | Self::UnterminatedSubprocess => {
                format!("{}; {{}}", self.fallback_message())
            }
            Self::ExpectedToken => "expected {}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    /// The range used for suppression logic. Errors within another error's
    /// suppression_range may be suppressed. Defaults to `range`; the parser
    /// widens it to the innermost open delimiter.
    pub(crate) suppression_range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            suppression_range: range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn related(&self) -> &[RelatedInfo] {
        &self.related
    }

    pub fn fix(&self) -> Option<&Fix> {
        self.fix.as_ref()
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Same message with every range moved by `delta` bytes.
    pub(crate) fn shifted(&self, delta: i64) -> Self {
        let shift = |range: TextRange| {
            let start = shift_offset(range.start(), delta);
            TextRange::at(start, range.len())
        };
        Self {
            range: shift(self.range),
            suppression_range: shift(self.suppression_range),
            related: self
                .related
                .iter()
                .map(|r| RelatedInfo::new(shift(r.range), r.message.clone()))
                .collect(),
            ..self.clone()
        }
    }
}

fn shift_offset(offset: TextSize, delta: i64) -> TextSize {
    let moved = (u32::from(offset) as i64 + delta).max(0);
    TextSize::from(moved as u32)
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
