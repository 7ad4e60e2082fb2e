//! Python expressions: Pratt loop, postfix chains, call arguments,
//! parameters and comprehension clauses.

use rowan::Checkpoint;

use super::conflicts;
use super::precedence::{self, Assoc, level};
use crate::cst::SyntaxKind::{self, *};
use crate::cst::TokenSet;
use crate::cst::token_sets::{COMPARISON_OPERATORS, EXPR_FIRST};
use crate::parser::Parser;

/// Tokens an expression may start with, `yield` included.
const EXPRESSION_START: TokenSet = EXPR_FIRST.union(TokenSet::single(KwYield));

impl Parser<'_> {
    pub(crate) fn at_expression_start(&mut self) -> bool {
        self.currently_is_one_of(EXPRESSION_START)
    }

    pub(crate) fn parse_expression(&mut self) {
        self.parse_expr_bp(level::EXPRESSION);
    }

    /// `a, b, *c` wrapped in `ExpressionList` only when a comma is present.
    pub(crate) fn parse_expression_list(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_expression();
        if !self.currently_is(Comma) {
            return;
        }
        self.start_node_at(checkpoint, ExpressionList);
        while self.eat_token(Comma) {
            if !self.at_expression_start() {
                break;
            }
            self.parse_expression();
        }
        self.finish_node();
    }

    /// Assignment and loop targets. Binds tighter than comparisons so `in`
    /// stays available to the enclosing `for`.
    pub(crate) fn parse_target(&mut self) {
        self.parse_expr_bp(level::BITWISE_OR);
    }

    pub(crate) fn parse_target_list(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_target();
        if !self.currently_is(Comma) {
            return;
        }
        self.start_node_at(checkpoint, ExpressionList);
        while self.eat_token(Comma) {
            if !self.at_expression_start() {
                break;
            }
            self.parse_target();
        }
        self.finish_node();
    }

    /// Expression whose operators all bind at least as tight as `min`.
    pub(crate) fn parse_expr_bp(&mut self, min: u8) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.parse_prefix();
        self.parse_infix(checkpoint, min);
        self.exit_recursion();
    }

    fn parse_prefix(&mut self) {
        let kind = self.current();
        if kind == Star {
            self.start_node(ListSplat);
            self.bump();
            self.parse_expr_bp(level::BITWISE_OR);
            self.finish_node();
            return;
        }
        let Some(op) = precedence::prefix(kind) else {
            self.parse_primary();
            return;
        };
        if op.node == Lambda {
            self.parse_lambda();
            return;
        }
        self.start_node(op.node);
        self.bump();
        self.parse_expr_bp(op.rhs_level());
        self.finish_node();
    }

    fn parse_infix(&mut self, checkpoint: Checkpoint, min: u8) {
        loop {
            let kind = self.current();
            let Some(op) = precedence::infix(kind) else {
                break;
            };
            if op.level < min {
                break;
            }
            if kind == KwNot && !self.next_is(KwIn) {
                break;
            }
            match op.assoc {
                Assoc::Chained => self.parse_comparison_chain(checkpoint),
                _ if op.node == ConditionalExpression => self.parse_conditional(checkpoint),
                _ => {
                    self.start_node_at(checkpoint, op.node);
                    self.bump();
                    self.parse_expr_bp(op.rhs_level());
                    self.finish_node();
                }
            }
        }
    }

    /// `a < b <= c`, `x not in y`, `x is not None`: one node, many operands.
    fn parse_comparison_chain(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, ComparisonOperator);
        while self.at_comparison_operator() {
            match self.current() {
                KwNot => {
                    self.bump();
                    self.bump();
                }
                KwIs => {
                    self.bump();
                    self.eat_token(KwNot);
                }
                _ => self.bump(),
            }
            self.parse_expr_bp(level::BITWISE_OR);
        }
        self.finish_node();
    }

    fn at_comparison_operator(&mut self) -> bool {
        match self.current() {
            KwNot => self.next_is(KwIn),
            kind => COMPARISON_OPERATORS.contains(kind),
        }
    }

    /// `body if condition else alternative`, body already parsed.
    fn parse_conditional(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, ConditionalExpression);
        self.bump();
        self.parse_expr_bp(level::OR);
        self.expect(KwElse, "`else`");
        self.parse_expr_bp(level::CONDITIONAL);
        self.finish_node();
    }

    /// Atom followed by calls, subscripts, attributes and help suffixes.
    fn parse_primary(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_atom();
        while let Some(op) = precedence::postfix(self.current()) {
            if op.node == MacroCall && self.nth_raw(1) != ParenOpen {
                break;
            }
            self.start_node_at(checkpoint, op.node);
            match op.node {
                Call => self.parse_argument_list(),
                MacroCall => {
                    self.bump();
                    self.parse_argument_list();
                }
                Subscript => self.parse_subscript(),
                Attribute => {
                    self.bump();
                    self.expect_name();
                }
                _ => self.bump(),
            }
            self.finish_node();
        }
    }

    fn parse_subscript(&mut self) {
        self.assert_current(BracketOpen);
        self.push_delimiter(BracketOpen);
        self.bump();
        self.parse_slice_or_expression();
        while self.eat_token(Comma) {
            if self.currently_is(BracketClose) {
                break;
            }
            self.parse_slice_or_expression();
        }
        self.close_bracket(BracketClose);
    }

    /// `a`, `a:b`, `:b:c`, `::`
    fn parse_slice_or_expression(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.currently_is(Colon) {
            self.parse_expression();
            if !self.currently_is(Colon) {
                return;
            }
        }
        for _ in 0..2 {
            if !self.eat_token(Colon) {
                break;
            }
            if self.at_expression_start() {
                self.parse_expression();
            }
        }
        self.start_node_at(checkpoint, Slice);
        self.finish_node();
    }

    /// `(args)` after a callee or class name.
    pub(crate) fn parse_argument_list(&mut self) {
        self.assert_current(ParenOpen);
        let checkpoint = self.checkpoint();
        self.push_delimiter(ParenOpen);
        self.bump();

        if self.currently_is(ParenClose) {
            self.start_node_at(checkpoint, ArgumentList);
            self.close_bracket(ParenClose);
            self.finish_node();
            return;
        }

        let positional = self.parse_argument();
        let kind = if positional {
            conflicts::ARGUMENT.resolve(self.current())
        } else {
            ArgumentList
        };
        self.start_node_at(checkpoint, kind);
        if kind == GeneratorExpression {
            self.parse_comprehension_clauses();
        } else {
            while self.eat_token(Comma) {
                if !self.at_expression_start() && !self.currently_is(DoubleStar) {
                    break;
                }
                self.parse_argument();
            }
        }
        self.close_bracket(ParenClose);
        self.finish_node();
    }

    /// Returns `true` for a plain positional argument.
    fn parse_argument(&mut self) -> bool {
        match self.current() {
            DoubleStar => {
                self.parse_dictionary_splat();
                false
            }
            Name if self.next_is(Equals) => {
                self.start_node(KeywordArgument);
                self.bump();
                self.bump();
                self.parse_expression();
                self.finish_node();
                false
            }
            Star => {
                self.parse_expression();
                false
            }
            _ => {
                self.parse_expression();
                true
            }
        }
    }

    pub(crate) fn parse_dictionary_splat(&mut self) {
        self.assert_current(DoubleStar);
        self.start_node(DictionarySplat);
        self.bump();
        self.parse_expr_bp(level::BITWISE_OR);
        self.finish_node();
    }

    /// `for x in xs if p(x) for y in x ...` after the element.
    pub(crate) fn parse_comprehension_clauses(&mut self) {
        self.parse_for_in_clause();
        loop {
            match self.current() {
                KwFor | KwAsync => self.parse_for_in_clause(),
                KwIf => {
                    self.start_node(IfClause);
                    self.bump();
                    self.parse_expr_bp(level::OR);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_for_in_clause(&mut self) {
        self.start_node(ForInClause);
        self.eat_token(KwAsync);
        self.expect(KwFor, "`for`");
        self.parse_target_list();
        self.expect(KwIn, "`in`");
        self.parse_expr_bp(level::OR);
        self.finish_node();
    }

    /// `lambda params: body`
    fn parse_lambda(&mut self) {
        self.assert_current(KwLambda);
        self.start_node(Lambda);
        self.bump();
        if !self.currently_is(Colon) {
            self.start_node(LambdaParameters);
            self.parse_parameter_items(Colon, false);
            self.finish_node();
        }
        self.expect(Colon, "`:`");
        self.parse_expr_bp(level::LAMBDA);
        self.finish_node();
    }

    /// Comma-separated parameters up to `closer`. Annotations only when
    /// `typed`, since a lambda's `:` ends its parameters.
    pub(crate) fn parse_parameter_items(&mut self, closer: SyntaxKind, typed: bool) {
        while !self.currently_is(closer) && !self.should_stop() {
            if !self.parse_parameter(typed) {
                break;
            }
            if !self.eat_token(Comma) {
                break;
            }
        }
    }

    fn parse_parameter(&mut self, typed: bool) -> bool {
        let checkpoint = self.checkpoint();
        match self.current() {
            // Positional-only and keyword-only markers.
            Slash => {
                self.bump();
                return true;
            }
            Star if !self.next_is(Name) => {
                self.bump();
                return true;
            }
            Star | DoubleStar => {
                let kind = if self.currently_is(Star) {
                    ListSplatPattern
                } else {
                    DictionarySplatPattern
                };
                self.start_node(kind);
                self.bump();
                self.expect_name();
                self.finish_node();
            }
            Name => self.bump(),
            _ => return false,
        }

        let mut kind = None;
        if typed && self.eat_token(Colon) {
            self.parse_expression();
            kind = Some(TypedParameter);
        }
        if self.eat_token(Equals) {
            self.parse_expression();
            kind = Some(match kind {
                Some(_) => TypedDefaultParameter,
                None => DefaultParameter,
            });
        }
        if let Some(kind) = kind {
            self.start_node_at(checkpoint, kind);
            self.finish_node();
        }
        true
    }
}
