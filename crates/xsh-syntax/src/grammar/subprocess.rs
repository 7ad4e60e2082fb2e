//! Subprocess regions and shell command syntax.

use super::precedence::{self, Assoc, level};
use super::{ARGUMENT_PIECES, dispatch};
use crate::cst::SyntaxKind::{self, *};
use crate::cst::token_sets::ARG_PIECE_FIRST;
use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Body {
    /// Shell commands joined by pipes and logical operators.
    Commands,
    /// Python expression list.
    Expressions,
    /// A single Python expression.
    Expression,
}

#[derive(Debug, Clone, Copy)]
struct Region {
    opener: SyntaxKind,
    node: SyntaxKind,
    closer: SyntaxKind,
    body: Body,
    unclosed: DiagnosticKind,
}

impl Region {
    const fn new(
        opener: SyntaxKind,
        node: SyntaxKind,
        closer: SyntaxKind,
        body: Body,
        unclosed: DiagnosticKind,
    ) -> Self {
        Self {
            opener,
            node,
            closer,
            body,
            unclosed,
        }
    }
}

const REGIONS: &[Region] = &[
    Region::new(
        DollarParen,
        CapturedSubprocess,
        ParenClose,
        Body::Commands,
        DiagnosticKind::UnterminatedSubprocess,
    ),
    Region::new(
        BangParen,
        CapturedSubprocessObject,
        ParenClose,
        Body::Commands,
        DiagnosticKind::UnterminatedSubprocess,
    ),
    Region::new(
        DollarBracket,
        UncapturedSubprocess,
        BracketClose,
        Body::Commands,
        DiagnosticKind::UnterminatedSubprocess,
    ),
    Region::new(
        BangBracket,
        UncapturedSubprocessObject,
        BracketClose,
        Body::Commands,
        DiagnosticKind::UnterminatedSubprocess,
    ),
    Region::new(
        AtDollarParen,
        TokenizedSubstitution,
        ParenClose,
        Body::Commands,
        DiagnosticKind::UnterminatedSubprocess,
    ),
    Region::new(
        AtParen,
        PythonEvaluation,
        ParenClose,
        Body::Expressions,
        DiagnosticKind::UnclosedParen,
    ),
    Region::new(
        DollarBrace,
        EnvVariableBraced,
        BraceClose,
        Body::Expression,
        DiagnosticKind::UnclosedBrace,
    ),
];

fn region(opener: SyntaxKind) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.opener == opener)
}

fn closer_text(closer: SyntaxKind) -> &'static str {
    match closer {
        ParenClose => "`)`",
        BracketClose => "`]`",
        _ => "`}`",
    }
}

impl Parser<'_> {
    /// A command line at statement level.
    pub(crate) fn parse_bare_subprocess(&mut self) {
        self.start_node(BareSubprocess);
        self.parse_subprocess_bp(level::SUBPROC_BACKGROUND);
        self.end_simple_statement();
        self.finish_node();
    }

    /// Sigil region: `$(...)`, `![...]`, `@(...)`, `${...}` and friends.
    ///
    /// The node kind is decided at the end. A region the input cuts off
    /// becomes an `Error` node spanning everything it swallowed.
    pub(crate) fn parse_region(&mut self) {
        self.assert_region_opener();
        let Some(region) = region(self.current()) else {
            self.error_and_bump(DiagnosticKind::UnexpectedToken);
            return;
        };
        let checkpoint = self.checkpoint();
        self.push_delimiter(region.opener);
        self.bump();

        match region.body {
            Body::Commands => self.parse_subprocess_bp(level::SUBPROC_BACKGROUND),
            Body::Expressions => self.parse_expression_list(),
            Body::Expression => self.parse_expression(),
        }

        let kind = self.finish_region(region);
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    fn finish_region(&mut self, region: &Region) -> SyntaxKind {
        loop {
            let current = self.current();
            if current == region.closer {
                self.pop_delimiter();
                self.bump();
                return region.node;
            }
            if matches!(current, Unterminated | Newline | Dedent) || self.should_stop() {
                if let Some(open) = self.pop_delimiter() {
                    let detail = format!("expected {}", closer_text(region.closer));
                    self.error_unclosed_delimiter(region.unclosed, detail, "opened here", open.span);
                }
                self.eat_token(Unterminated);
                return Error;
            }
            self.error_and_bump_msg(
                DiagnosticKind::UnexpectedToken,
                format!("expected {} to close the region", closer_text(region.closer)),
            );
        }
    }

    /// Commands joined by the operators in [`precedence::SUBPROCESS`].
    fn parse_subprocess_bp(&mut self, min: u8) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_command();
        while let Some(op) = precedence::subprocess(self.current()) {
            if op.level < min {
                break;
            }
            self.start_node_at(checkpoint, op.node);
            self.bump();
            if op.assoc != Assoc::Postfix {
                self.parse_subprocess_bp(op.rhs_level());
            }
            self.finish_node();
        }
        self.exit_recursion();
    }

    /// `$A=1 $B=2 cmd args`
    fn parse_command(&mut self) {
        if !self.currently_is(EnvPrefix) {
            self.parse_command_body();
            return;
        }
        self.start_node(EnvScopedCommand);
        while self.currently_is(EnvPrefix) {
            self.bump();
        }
        self.parse_command_body();
        self.finish_node();
    }

    fn parse_command_body(&mut self) {
        if self.currently_is(SubprocessWord) && self.nth_raw(1) == Bang {
            self.parse_subprocess_macro();
        } else {
            self.parse_simple_command();
        }
    }

    /// `cmd! raw text`: the rest of the line reaches the command unsplit.
    fn parse_subprocess_macro(&mut self) {
        self.start_node(SubprocessMacro);
        self.bump();
        self.bump();
        self.eat_token(MacroArgument);
        self.finish_node();
    }

    fn parse_simple_command(&mut self) {
        self.start_node(SubprocessCommand);
        while self.currently_is(SubprocessModifier) {
            self.bump();
        }
        let mut empty = true;
        loop {
            match self.current() {
                Redirect => self.parse_redirect(),
                StreamMerge => self.bump(),
                kind if ARG_PIECE_FIRST.contains(kind) => self.parse_subprocess_argument(),
                _ => break,
            }
            empty = false;
        }
        if empty {
            self.error(DiagnosticKind::ExpectedCommand);
            self.missing(SubprocessWord);
        }
        self.finish_node();
    }

    /// `> file`, `2>> log`, `< input`
    fn parse_redirect(&mut self) {
        self.start_node(SubprocessRedirect);
        self.bump();
        if self.currently_is_one_of(ARG_PIECE_FIRST) {
            self.parse_subprocess_argument();
        } else {
            self.error_msg(DiagnosticKind::ExpectedToken, "a redirect target");
            self.missing(SubprocessWord);
        }
        self.finish_node();
    }

    /// Pieces with no whitespace between them form one argument:
    /// `file_$(date).log`.
    fn parse_subprocess_argument(&mut self) {
        self.start_node(SubprocessArgument);
        self.parse_argument_piece();
        while self.adjacent_is_one_of(ARG_PIECE_FIRST) {
            self.parse_argument_piece();
        }
        self.finish_node();
    }

    fn parse_argument_piece(&mut self) {
        match dispatch(ARGUMENT_PIECES, self.current()) {
            Some(production) => production(self),
            None => self.bump(),
        }
    }
}
