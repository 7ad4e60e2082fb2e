//! Statements, blocks and the module loop.

use rowan::TextSize;

use super::conflicts;
use super::{STATEMENTS, dispatch};
use crate::cst::SyntaxKind::{self, *};
use crate::cst::TokenSet;
use crate::cst::token_sets::{LINE_END, STATEMENT_RECOVERY};
use crate::diagnostics::DiagnosticKind;
use crate::incremental::Resync;
use crate::parser::Parser;

/// `from . import x`, `from ... import x`
const RELATIVE_DOTS: TokenSet = TokenSet::new(&[Dot, Ellipsis]);

impl Parser<'_> {
    pub(crate) fn parse_module(&mut self) {
        self.start_node(Module);
        self.parse_module_items(None);
        self.eat_trivia();
        self.finish_node();
    }

    /// Module-level statements until end of input.
    ///
    /// With `resync`, stops before the first statement whose start lines up
    /// with a reusable boundary of the previous tree and returns its offset.
    pub(crate) fn parse_module_items(&mut self, resync: Option<&Resync>) -> Option<TextSize> {
        loop {
            self.skip_trivia_to_buffer();
            if self.should_stop() {
                return None;
            }
            if let Some(resync) = resync
                && let Some(offset) = self.resync_point(resync)
            {
                return Some(offset);
            }
            self.record_checkpoint();
            self.parse_statement();
        }
    }

    pub(crate) fn parse_statement(&mut self) {
        let kind = self.current();
        if let Some(production) = dispatch(STATEMENTS, kind) {
            production(self);
            return;
        }
        match kind {
            Newline | Semicolon | Dedent => {
                self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "empty statement")
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Indented statements where no block may start. Kept together in one
    /// `Error` node with their layout tokens.
    pub(crate) fn parse_unexpected_indent(&mut self) {
        self.assert_current(Indent);
        self.start_node(Error);
        self.error(DiagnosticKind::UnexpectedIndent);
        self.bump();
        self.parse_statements_until_dedent();
        self.eat_token(Dedent);
        self.finish_node();
    }

    fn parse_statements_until_dedent(&mut self) {
        while !self.should_stop() && !self.currently_is(Dedent) {
            self.parse_statement();
        }
    }

    /// Consumes the statement terminator. Returns `true` when another
    /// statement follows on the same line.
    pub(crate) fn end_simple_statement(&mut self) -> bool {
        if !self.currently_is_one_of(LINE_END) && !self.should_stop() {
            self.error_recover(
                DiagnosticKind::ExpectedNewline,
                "unexpected tokens after statement",
                STATEMENT_RECOVERY,
            );
        }
        match self.current() {
            Newline => {
                self.bump();
                false
            }
            Semicolon => {
                let span = self.current_span();
                self.bump();
                if self.currently_is(Newline) {
                    self.report_with_fix(
                        DiagnosticKind::RedundantSemicolon,
                        span,
                        "remove the `;`",
                        "",
                    );
                    self.bump();
                    return false;
                }
                !self.should_stop()
            }
            _ => false,
        }
    }

    /// `:` already consumed. Indented statements or the rest of the line.
    pub(crate) fn parse_block(&mut self) {
        self.start_node(Block);
        if self.currently_is(Newline) {
            let newline = self.current_span();
            self.bump();
            if self.eat_token(Indent) {
                self.parse_statements_until_dedent();
                self.eat_token(Dedent);
            } else {
                self.diagnostics
                    .report(DiagnosticKind::ExpectedIndentedBlock, newline)
                    .emit();
                self.missing(Indent);
            }
        } else if self.should_stop() || self.currently_is(Dedent) {
            self.error(DiagnosticKind::ExpectedIndentedBlock);
            self.missing(Indent);
        } else {
            self.parse_statement();
            while self.previous_is(Semicolon) && !self.should_stop() {
                self.parse_statement();
            }
        }
        self.finish_node();
    }

    fn previous_is(&self, kind: SyntaxKind) -> bool {
        self.tokens[..self.pos]
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .is_some_and(|t| t.kind == kind)
    }

    /// Expression list, then assignment or plain expression.
    pub(crate) fn parse_expression_statement(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expression_list();
        let kind = conflicts::STATEMENT.resolve(self.current());
        self.start_node_at(checkpoint, kind);
        match kind {
            Assignment => self.parse_assignment_rest(),
            AugmentedAssignment => {
                self.bump();
                self.parse_assignment_value();
            }
            _ => {}
        }
        self.end_simple_statement();
        self.finish_node();
    }

    /// After the targets: `= value`, `: type` or `: type = value`.
    fn parse_assignment_rest(&mut self) {
        if self.eat_token(Colon) {
            self.parse_expression();
            if self.eat_token(Equals) {
                self.parse_assignment_value();
            }
            return;
        }
        self.expect(Equals, "`=`");
        self.parse_assignment_value();
    }

    /// Right side of `=`; further `=` nest another assignment.
    fn parse_assignment_value(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expression_list();
        if self.currently_is(Equals) {
            self.start_node_at(checkpoint, Assignment);
            self.bump();
            self.parse_assignment_value();
            self.finish_node();
        }
    }

    pub(crate) fn parse_keyword_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.end_simple_statement();
        self.finish_node();
    }

    pub(crate) fn parse_return_statement(&mut self) {
        self.assert_current(KwReturn);
        self.start_node(ReturnStatement);
        self.bump();
        if self.at_expression_start() {
            self.parse_expression_list();
        }
        self.end_simple_statement();
        self.finish_node();
    }

    pub(crate) fn parse_delete_statement(&mut self) {
        self.assert_current(KwDel);
        self.start_node(DeleteStatement);
        self.bump();
        self.parse_expression_list();
        self.end_simple_statement();
        self.finish_node();
    }

    /// `raise [value [from cause]]`
    pub(crate) fn parse_raise_statement(&mut self) {
        self.assert_current(KwRaise);
        self.start_node(RaiseStatement);
        self.bump();
        if self.at_expression_start() {
            self.parse_expression();
            if self.eat_token(KwFrom) {
                self.parse_expression();
            }
        }
        self.end_simple_statement();
        self.finish_node();
    }

    pub(crate) fn parse_assert_statement(&mut self) {
        self.assert_current(KwAssert);
        self.start_node(AssertStatement);
        self.bump();
        self.parse_expression();
        if self.eat_token(Comma) {
            self.parse_expression();
        }
        self.end_simple_statement();
        self.finish_node();
    }

    /// `global a, b` and `nonlocal a, b`
    pub(crate) fn parse_name_list_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect_name();
        while self.eat_token(Comma) {
            self.expect_name();
        }
        self.end_simple_statement();
        self.finish_node();
    }

    pub(crate) fn expect_name(&mut self) -> bool {
        if self.eat_token(Name) {
            return true;
        }
        self.error(DiagnosticKind::ExpectedName);
        self.missing(Name);
        false
    }

    fn parse_dotted_name(&mut self) {
        self.start_node(DottedName);
        self.expect_name();
        while self.currently_is(Dot) && self.next_is(Name) {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// `a.b` or `a.b as c`
    fn parse_import_name(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_dotted_name();
        if self.currently_is(KwAs) {
            self.start_node_at(checkpoint, AliasedImport);
            self.bump();
            self.expect_name();
            self.finish_node();
        }
    }

    pub(crate) fn parse_import_statement(&mut self) {
        self.assert_current(KwImport);
        self.start_node(ImportStatement);
        self.bump();
        self.parse_import_name();
        while self.eat_token(Comma) {
            self.parse_import_name();
        }
        self.end_simple_statement();
        self.finish_node();
    }

    /// `from module import names`, `from . import (a, b)`, `from m import *`
    pub(crate) fn parse_import_from_statement(&mut self) {
        self.assert_current(KwFrom);
        self.start_node(ImportFromStatement);
        self.bump();

        if self.currently_is_one_of(RELATIVE_DOTS) {
            self.start_node(RelativeImport);
            while self.currently_is_one_of(RELATIVE_DOTS) {
                self.bump();
            }
            if self.currently_is(Name) {
                self.parse_dotted_name();
            }
            self.finish_node();
        } else {
            self.parse_dotted_name();
        }

        self.expect(KwImport, "`import`");

        match self.current() {
            Star => {
                self.start_node(WildcardImport);
                self.bump();
                self.finish_node();
            }
            ParenOpen => {
                self.push_delimiter(ParenOpen);
                self.bump();
                while self.currently_is(Name) {
                    self.parse_import_name();
                    if !self.eat_token(Comma) {
                        break;
                    }
                }
                self.close_bracket(ParenClose);
            }
            _ => {
                self.parse_import_name();
                while self.eat_token(Comma) {
                    self.parse_import_name();
                }
            }
        }
        self.end_simple_statement();
        self.finish_node();
    }

    /// `xontrib load a b.c`
    pub(crate) fn parse_xontrib_statement(&mut self) {
        self.assert_current(Xontrib);
        self.start_node(XontribStatement);
        self.bump();
        self.parse_dotted_name();
        while self.currently_is(Name) {
            self.parse_dotted_name();
        }
        self.end_simple_statement();
        self.finish_node();
    }

    pub(crate) fn parse_if_statement(&mut self) {
        self.assert_current(KwIf);
        self.start_node(IfStatement);
        self.bump();
        self.parse_condition_and_block();
        while self.currently_is(KwElif) {
            self.start_node(ElifClause);
            self.bump();
            self.parse_condition_and_block();
            self.finish_node();
        }
        self.parse_else_clause();
        self.finish_node();
    }

    fn parse_condition_and_block(&mut self) {
        self.parse_expression();
        self.expect(Colon, "`:`");
        self.parse_block();
    }

    fn parse_else_clause(&mut self) {
        if !self.currently_is(KwElse) {
            return;
        }
        self.start_node(ElseClause);
        self.bump();
        self.expect(Colon, "`:`");
        self.parse_block();
        self.finish_node();
    }

    pub(crate) fn parse_while_statement(&mut self) {
        self.assert_current(KwWhile);
        self.start_node(WhileStatement);
        self.bump();
        self.parse_condition_and_block();
        self.parse_else_clause();
        self.finish_node();
    }

    /// `[async] for targets in values: block [else: block]`
    pub(crate) fn parse_for_statement(&mut self) {
        self.start_node(ForStatement);
        self.eat_token(KwAsync);
        self.expect(KwFor, "`for`");
        self.parse_target_list();
        self.expect(KwIn, "`in`");
        self.parse_expression_list();
        self.expect(Colon, "`:`");
        self.parse_block();
        self.parse_else_clause();
        self.finish_node();
    }

    pub(crate) fn parse_try_statement(&mut self) {
        self.assert_current(KwTry);
        self.start_node(TryStatement);
        self.bump();
        self.expect(Colon, "`:`");
        self.parse_block();

        while self.currently_is(KwExcept) {
            self.start_node(ExceptClause);
            self.bump();
            if self.at_expression_start() {
                self.parse_expression();
                if self.eat_token(KwAs) {
                    self.expect_name();
                }
            }
            self.expect(Colon, "`:`");
            self.parse_block();
            self.finish_node();
        }

        self.parse_else_clause();

        if self.currently_is(KwFinally) {
            self.start_node(FinallyClause);
            self.bump();
            self.expect(Colon, "`:`");
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }

    /// `[async] with item [as target], ...: block`
    pub(crate) fn parse_with_statement(&mut self) {
        let block_macro = self.currently_is(KwWith) && self.nth_raw(1) == Bang;
        self.start_node(if block_macro {
            BlockMacroStatement
        } else {
            WithStatement
        });
        self.eat_token(KwAsync);
        self.expect(KwWith, "`with`");
        if block_macro {
            self.bump();
        }
        loop {
            self.start_node(WithItem);
            self.parse_expression();
            if self.eat_token(KwAs) {
                self.parse_target();
            }
            self.finish_node();
            if !self.eat_token(Comma) {
                break;
            }
        }
        self.expect(Colon, "`:`");
        self.parse_block();
        self.finish_node();
    }

    /// `[async] def name(params) [-> type]: block`
    pub(crate) fn parse_function_definition(&mut self) {
        self.start_node(FunctionDefinition);
        self.eat_token(KwAsync);
        self.expect(KwDef, "`def`");
        self.expect_name();
        self.parse_parameters();
        if self.eat_token(Arrow) {
            self.parse_expression();
        }
        self.expect(Colon, "`:`");
        self.parse_block();
        self.finish_node();
    }

    fn parse_parameters(&mut self) {
        self.start_node(Parameters);
        if self.currently_is(ParenOpen) {
            self.push_delimiter(ParenOpen);
            self.bump();
            self.parse_parameter_items(ParenClose, true);
            self.close_bracket(ParenClose);
        } else {
            self.error_msg(DiagnosticKind::ExpectedToken, "`(`");
            self.missing(ParenOpen);
        }
        self.finish_node();
    }

    /// `class Name[(bases)]: block`
    pub(crate) fn parse_class_definition(&mut self) {
        self.assert_current(KwClass);
        self.start_node(ClassDefinition);
        self.bump();
        self.expect_name();
        if self.currently_is(ParenOpen) {
            self.parse_argument_list();
        }
        self.expect(Colon, "`:`");
        self.parse_block();
        self.finish_node();
    }

    /// `@decorator` lines, then the definition they apply to.
    /// `@.env[...] = x` is an expression statement; any other `@` opens
    /// decorators.
    pub(crate) fn parse_at_statement(&mut self) {
        self.assert_current(At);
        if self.nth_raw(1) == Dot {
            self.parse_expression_statement();
        } else {
            self.parse_decorated_definition();
        }
    }

    pub(crate) fn parse_decorated_definition(&mut self) {
        self.assert_current(At);
        self.start_node(DecoratedDefinition);
        while self.currently_is(At) {
            self.start_node(Decorator);
            self.bump();
            self.parse_expression();
            if !self.currently_is(Newline) {
                self.error_recover(
                    DiagnosticKind::ExpectedNewline,
                    "decorator must end the line",
                    STATEMENT_RECOVERY,
                );
            }
            self.eat_token(Newline);
            self.finish_node();
        }
        match self.current() {
            KwDef => self.parse_function_definition(),
            KwClass => self.parse_class_definition(),
            KwAsync if self.next_is(KwDef) => self.parse_function_definition(),
            _ => {
                self.error_msg(DiagnosticKind::ExpectedToken, "`def` or `class`");
                self.missing(KwDef);
            }
        }
        self.finish_node();
    }

    /// `async def`, `async for`, `async with`
    pub(crate) fn parse_async_statement(&mut self) {
        self.assert_current(KwAsync);
        match self.peek_nth(1) {
            KwDef => self.parse_function_definition(),
            KwFor => self.parse_for_statement(),
            KwWith => self.parse_with_statement(),
            _ => {
                self.start_node(ExpressionStatement);
                self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "`async` must precede `def`, `for` or `with`",
                );
                if self.at_expression_start() {
                    self.parse_expression_list();
                }
                self.end_simple_statement();
                self.finish_node();
            }
        }
    }
}
