//! Atoms: names, literals and bracketed displays.

use super::conflicts;
use super::{ATOMS, dispatch};
use crate::cst::SyntaxKind::{self, *};
use crate::cst::TokenSet;
use crate::cst::token_sets::{BRACKET_RECOVERY, CLOSERS, LITERALS};
use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;

/// Where a missing operand is reported without consuming anything.
const EXPR_RECOVERY: TokenSet = CLOSERS.union(TokenSet::new(&[
    Newline,
    Semicolon,
    Dedent,
    Colon,
    Comma,
    Equals,
    AugAssign,
    Arrow,
    KwElse,
    KwIn,
    KwFor,
    KwAs,
    KwFrom,
    KwImport,
    Unterminated,
]));

impl Parser<'_> {
    pub(crate) fn parse_atom(&mut self) {
        let kind = self.current();
        if let Some(production) = dispatch(ATOMS, kind) {
            production(self);
            return;
        }
        match kind {
            SyntaxKind::String => self.parse_strings(),
            Name | EnvVariable => self.bump(),
            _ if LITERALS.contains(kind) => self.bump(),
            _ => self.parse_missing_expression(),
        }
    }

    /// `@.env`, `@.imp.json`: the session object.
    pub(crate) fn parse_at_object(&mut self) {
        self.assert_current(At);
        if self.nth_raw(1) != Dot {
            self.error_and_bump_msg(
                DiagnosticKind::ExpectedExpression,
                "`@` starts an expression only as `@.name`",
            );
            return;
        }
        self.start_node(AtObject);
        self.bump();
        self.bump();
        self.expect_name();
        self.finish_node();
    }

    /// Adjacent string literals form one `ConcatenatedString`.
    fn parse_strings(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        if !self.currently_is(SyntaxKind::String) {
            return;
        }
        self.start_node_at(checkpoint, ConcatenatedString);
        while self.currently_is(SyntaxKind::String) {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_missing_expression(&mut self) {
        if self.should_stop() || self.currently_is_one_of(EXPR_RECOVERY) {
            self.error(DiagnosticKind::ExpectedExpression);
            self.missing(Name);
            return;
        }
        self.error_and_bump(DiagnosticKind::ExpectedExpression);
    }

    /// `()`, `(x)`, `(x,)`, `(x for x in y)`
    pub(crate) fn parse_parenthesized(&mut self) {
        self.assert_current(ParenOpen);
        let checkpoint = self.checkpoint();
        self.push_delimiter(ParenOpen);
        self.bump();

        if self.currently_is(ParenClose) {
            self.start_node_at(checkpoint, Tuple);
            self.close_bracket(ParenClose);
            self.finish_node();
            return;
        }

        self.parse_expression();
        let kind = conflicts::PAREN.resolve(self.current());
        self.start_node_at(checkpoint, kind);
        match kind {
            Tuple => self.parse_sequence_rest(ParenClose),
            GeneratorExpression => self.parse_comprehension_clauses(),
            _ => {}
        }
        self.close_bracket(ParenClose);
        self.finish_node();
    }

    /// `[]`, `[a, b]`, `[x for x in y]`
    pub(crate) fn parse_list(&mut self) {
        self.assert_current(BracketOpen);
        let checkpoint = self.checkpoint();
        self.push_delimiter(BracketOpen);
        self.bump();

        if self.currently_is(BracketClose) {
            self.start_node_at(checkpoint, List);
            self.close_bracket(BracketClose);
            self.finish_node();
            return;
        }

        self.parse_expression();
        let kind = conflicts::LIST.resolve(self.current());
        self.start_node_at(checkpoint, kind);
        if kind == ListComprehension {
            self.parse_comprehension_clauses();
        } else {
            self.parse_sequence_rest(BracketClose);
        }
        self.close_bracket(BracketClose);
        self.finish_node();
    }

    /// Dictionaries, sets and their comprehensions.
    pub(crate) fn parse_brace(&mut self) {
        self.assert_current(BraceOpen);
        let checkpoint = self.checkpoint();
        self.push_delimiter(BraceOpen);
        self.bump();

        if self.currently_is(BraceClose) {
            self.start_node_at(checkpoint, Dictionary);
            self.close_bracket(BraceClose);
            self.finish_node();
            return;
        }

        if self.currently_is(DoubleStar) {
            self.start_node_at(checkpoint, Dictionary);
            self.parse_dictionary_splat();
            self.parse_dictionary_rest();
            self.close_bracket(BraceClose);
            self.finish_node();
            return;
        }

        let item = self.checkpoint();
        self.parse_expression();
        match conflicts::BRACE.resolve(self.current()) {
            Dictionary => {
                self.start_node_at(item, Pair);
                self.bump();
                self.parse_expression();
                self.finish_node();

                let kind = conflicts::DICTIONARY.resolve(self.current());
                self.start_node_at(checkpoint, kind);
                if kind == DictionaryComprehension {
                    self.parse_comprehension_clauses();
                } else {
                    self.parse_dictionary_rest();
                }
            }
            SetComprehension => {
                self.start_node_at(checkpoint, SetComprehension);
                self.parse_comprehension_clauses();
            }
            _ => {
                self.start_node_at(checkpoint, Set);
                self.parse_sequence_rest(BraceClose);
            }
        }
        self.close_bracket(BraceClose);
        self.finish_node();
    }

    fn parse_dictionary_rest(&mut self) {
        while self.eat_token(Comma) {
            if self.currently_is(DoubleStar) {
                self.parse_dictionary_splat();
                continue;
            }
            if !self.at_expression_start() {
                break;
            }
            self.start_node(Pair);
            self.parse_expression();
            self.expect(Colon, "`:`");
            self.parse_expression();
            self.finish_node();
        }
    }

    /// `, item` repeated, trailing comma allowed.
    fn parse_sequence_rest(&mut self, closer: SyntaxKind) {
        while self.eat_token(Comma) {
            if self.currently_is(closer) || !self.at_expression_start() {
                break;
            }
            self.parse_expression();
        }
    }

    /// Consumes `closer` of the innermost open delimiter. Junk before it
    /// becomes one `Error` node; a closer that never comes is reported over
    /// the whole region and replaced by a `Missing` node.
    pub(crate) fn close_bracket(&mut self, closer: SyntaxKind) {
        if !self.currently_is_one_of(BRACKET_RECOVERY) && !self.should_stop() {
            self.error_recover(
                DiagnosticKind::UnexpectedToken,
                "unexpected token before closing bracket",
                BRACKET_RECOVERY,
            );
        }
        let open = self.pop_delimiter();
        if self.eat_token(closer) {
            return;
        }
        let kind = match closer {
            ParenClose => DiagnosticKind::UnclosedParen,
            BracketClose => DiagnosticKind::UnclosedBracket,
            _ => DiagnosticKind::UnclosedBrace,
        };
        if let Some(open) = open {
            let detail = format!("{} is never closed", opener_text(open.kind));
            self.error_unclosed_delimiter(kind, detail, "opened here", open.span);
        }
        self.missing(closer);
    }

    /// `yield`, `yield a, b`, `yield from it`
    pub(crate) fn parse_yield(&mut self) {
        self.assert_current(KwYield);
        self.start_node(Yield);
        self.bump();
        if self.eat_token(KwFrom) {
            self.parse_expression();
        } else if self.at_expression_start() {
            self.parse_expression_list();
        }
        self.finish_node();
    }
}

fn opener_text(opener: SyntaxKind) -> &'static str {
    match opener {
        ParenOpen => "`(`",
        BracketOpen => "`[`",
        _ => "`{`",
    }
}
