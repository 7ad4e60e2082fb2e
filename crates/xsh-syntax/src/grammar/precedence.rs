//! Operator binding table.
//!
//! Levels grow with binding strength. The Pratt loops in `expressions` and
//! `subprocess` read every decision from these tables, so the table is the
//! single source of truth for operator precedence.

use crate::cst::SyntaxKind::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    /// `a < b < c` is one comparison node with three operands.
    Chained,
    Prefix,
    Postfix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub token: SyntaxKind,
    pub level: u8,
    pub assoc: Assoc,
    pub node: SyntaxKind,
}

impl OperatorInfo {
    const fn new(token: SyntaxKind, level: u8, assoc: Assoc, node: SyntaxKind) -> Self {
        Self {
            token,
            level,
            assoc,
            node,
        }
    }

    /// Minimum level for the right operand.
    pub fn rhs_level(&self) -> u8 {
        match self.assoc {
            Assoc::Left | Assoc::Chained => self.level + 1,
            Assoc::Right | Assoc::Prefix | Assoc::Postfix => self.level,
        }
    }
}

pub mod level {
    pub const SUBPROC_BACKGROUND: u8 = 1;
    pub const SUBPROC_LOGICAL: u8 = 2;
    pub const SUBPROC_PIPE: u8 = 3;
    pub const NAMED_EXPR: u8 = 4;
    pub const LAMBDA: u8 = 5;
    pub const CONDITIONAL: u8 = 6;
    pub const OR: u8 = 10;
    pub const AND: u8 = 11;
    pub const NOT: u8 = 12;
    pub const COMPARE: u8 = 13;
    pub const BITWISE_OR: u8 = 14;
    pub const BITWISE_XOR: u8 = 15;
    pub const BITWISE_AND: u8 = 16;
    pub const SHIFT: u8 = 17;
    pub const PLUS: u8 = 18;
    pub const TIMES: u8 = 19;
    pub const UNARY: u8 = 20;
    pub const POWER: u8 = 21;
    pub const AWAIT: u8 = 22;
    pub const CALL: u8 = 23;

    /// Any expression, walrus included.
    pub const EXPRESSION: u8 = NAMED_EXPR;
}

use Assoc::*;

pub const INFIX: &[OperatorInfo] = &[
    OperatorInfo::new(ColonEquals, level::NAMED_EXPR, Right, NamedExpression),
    OperatorInfo::new(KwIf, level::CONDITIONAL, Right, ConditionalExpression),
    OperatorInfo::new(KwOr, level::OR, Left, BooleanOperator),
    OperatorInfo::new(PipePipe, level::OR, Left, BooleanOperator),
    OperatorInfo::new(KwAnd, level::AND, Left, BooleanOperator),
    OperatorInfo::new(AmpAmp, level::AND, Left, BooleanOperator),
    OperatorInfo::new(Less, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(Greater, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(LessEq, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(GreaterEq, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(EqEq, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(NotEq, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(KwIn, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(KwIs, level::COMPARE, Chained, ComparisonOperator),
    // `not in`
    OperatorInfo::new(KwNot, level::COMPARE, Chained, ComparisonOperator),
    OperatorInfo::new(Pipe, level::BITWISE_OR, Left, BinaryOperator),
    OperatorInfo::new(Caret, level::BITWISE_XOR, Left, BinaryOperator),
    OperatorInfo::new(Amp, level::BITWISE_AND, Left, BinaryOperator),
    OperatorInfo::new(ShiftLeft, level::SHIFT, Left, BinaryOperator),
    OperatorInfo::new(ShiftRight, level::SHIFT, Left, BinaryOperator),
    OperatorInfo::new(Plus, level::PLUS, Left, BinaryOperator),
    OperatorInfo::new(Minus, level::PLUS, Left, BinaryOperator),
    OperatorInfo::new(Star, level::TIMES, Left, BinaryOperator),
    OperatorInfo::new(Slash, level::TIMES, Left, BinaryOperator),
    OperatorInfo::new(DoubleSlash, level::TIMES, Left, BinaryOperator),
    OperatorInfo::new(Percent, level::TIMES, Left, BinaryOperator),
    OperatorInfo::new(At, level::TIMES, Left, BinaryOperator),
    OperatorInfo::new(DoubleStar, level::POWER, Right, BinaryOperator),
];

pub const PREFIX: &[OperatorInfo] = &[
    OperatorInfo::new(KwLambda, level::LAMBDA, Prefix, Lambda),
    OperatorInfo::new(KwNot, level::NOT, Prefix, NotOperator),
    OperatorInfo::new(Minus, level::UNARY, Prefix, UnaryOperator),
    OperatorInfo::new(Plus, level::UNARY, Prefix, UnaryOperator),
    OperatorInfo::new(Tilde, level::UNARY, Prefix, UnaryOperator),
    OperatorInfo::new(KwAwait, level::AWAIT, Prefix, Await),
];

pub const POSTFIX: &[OperatorInfo] = &[
    OperatorInfo::new(ParenOpen, level::CALL, Postfix, Call),
    OperatorInfo::new(BracketOpen, level::CALL, Postfix, Subscript),
    OperatorInfo::new(Dot, level::CALL, Postfix, Attribute),
    OperatorInfo::new(Question, level::CALL, Postfix, HelpExpression),
    OperatorInfo::new(DoubleQuestion, level::CALL, Postfix, SuperHelpExpression),
    OperatorInfo::new(Bang, level::CALL, Postfix, MacroCall),
];

/// Operators between commands inside a subprocess region.
pub const SUBPROCESS: &[OperatorInfo] = &[
    OperatorInfo::new(
        Background,
        level::SUBPROC_BACKGROUND,
        Postfix,
        BackgroundCommand,
    ),
    OperatorInfo::new(SubprocessAnd, level::SUBPROC_LOGICAL, Left, SubprocessLogical),
    OperatorInfo::new(SubprocessOr, level::SUBPROC_LOGICAL, Left, SubprocessLogical),
    OperatorInfo::new(SubprocessPipe, level::SUBPROC_PIPE, Left, SubprocessPipeline),
];

fn find(table: &'static [OperatorInfo], kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    table.iter().find(|op| op.token == kind)
}

pub fn infix(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    find(INFIX, kind)
}

pub fn prefix(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    find(PREFIX, kind)
}

pub fn postfix(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    find(POSTFIX, kind)
}

pub fn subprocess(kind: SyntaxKind) -> Option<&'static OperatorInfo> {
    find(SUBPROCESS, kind)
}
